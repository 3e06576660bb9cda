//! Assistant Command Handlers
//!
//! One handler per proxied operation against the upstream assistant API.
//!
//! ## Commands
//! - `CreateThread` - Open a new thread
//! - `SendQuery` - Append a message to a thread
//! - `StartRun` - Start an assistant run over a thread
//! - `AwaitRunReply` - Poll a run to completion and return the assistant reply

mod await_run_reply;
mod create_thread;
mod send_query;
mod start_run;

pub use await_run_reply::{
    AwaitRunReplyCommand, AwaitRunReplyError, AwaitRunReplyHandler, AwaitRunReplyResult,
};
pub use create_thread::CreateThreadHandler;
pub use send_query::{SendQueryCommand, SendQueryError, SendQueryHandler};
pub use start_run::{StartRunCommand, StartRunError, StartRunHandler};
