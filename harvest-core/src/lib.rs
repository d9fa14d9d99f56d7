pub mod config;
pub mod error;
pub mod har;
pub mod models;
pub mod render;

pub use config::HarvestConfig;
pub use error::HarvestError;
pub use models::{ChatSession, ChatTurn, Transaction};
pub use render::{MarkdownRenderer, ResponseRenderer};
