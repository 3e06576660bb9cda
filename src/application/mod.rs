//! Application layer - Commands and Handlers.
//!
//! This layer validates requests and coordinates calls through the ports.

pub mod handlers;

pub use handlers::assistant::{
    AwaitRunReplyCommand, AwaitRunReplyError, AwaitRunReplyHandler, AwaitRunReplyResult,
    CreateThreadHandler, SendQueryCommand, SendQueryError, SendQueryHandler, StartRunCommand,
    StartRunError, StartRunHandler,
};
