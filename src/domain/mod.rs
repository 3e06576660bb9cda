//! Domain layer containing the proxy's view of upstream resources.
//!
//! # Module Organization
//!
//! - `run` - Run status classification and the polling delay schedule
//! - `message` - Thread messages and assistant-reply extraction

pub mod message;
pub mod run;

pub use message::{latest_assistant_message, MessageRole, ThreadMessage};
pub use run::{PollSchedule, Run, RunPhase, RunStatus};
