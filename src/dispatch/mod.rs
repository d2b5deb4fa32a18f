//! Command front ends over the engine.
//!
//! - [`command`]: parsing a text line into an operation word and tokens
//! - [`dispatcher`]: routing commands to operations on the image store
//! - [`session`]: the single-image editing workflow

pub mod command;
pub mod dispatcher;
pub mod session;

pub use command::Command;
pub use dispatcher::{Dispatcher, Executed, ScriptEvent, ScriptFailure, ScriptReport};
pub use session::Session;
