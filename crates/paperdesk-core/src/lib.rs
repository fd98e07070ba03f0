pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod models;
pub mod stats;
pub mod storage;

pub use config::AppConfig;
pub use context::ContextBuilder;
pub use error::{PaperdeskError, Result};
pub use models::*;
pub use stats::PaperStats;
pub use storage::topic_store::{TopicBucket, TopicStore, display_name, normalize_topic_key};
