//! HTTP handler that turns a natural-language prompt into source code via an
//! OpenAI chat completion.

pub mod api;
pub mod config;
pub mod error;
pub mod fence;
pub mod handlers;
pub mod openai;
pub mod services;

pub use handlers::Handler;
