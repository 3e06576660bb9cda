//! Assistant API Adapters.
//!
//! Implementations of the AssistantApi port.
//!
//! ## Available Adapters
//!
//! - `OpenAIAssistantsClient` - OpenAI Assistants v2 over HTTP
//! - `MockAssistantApi` - Scriptable mock for testing

mod mock_assistant_api;
mod openai_assistants;

pub use mock_assistant_api::{MockAssistantApi, MockCall, MockOperation};
pub use openai_assistants::{OpenAIAssistantsClient, OpenAIAssistantsConfig};
