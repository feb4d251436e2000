//! OpenAI-compatible request/response types and the upstream wire format
//!
//! Some request fields are deserialized for client compatibility but ignored
//! (e.g., `model`, `stream`).

mod caption;
mod chat;
mod error;
mod model;

pub use caption::*;
pub use chat::*;
pub use error::*;
pub use model::*;
