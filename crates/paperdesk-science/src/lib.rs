//! paperdesk science: arXiv search, result normalization, topic-cached repository.

pub mod arxiv;
pub mod error;
pub mod http;
pub mod identifiers;
pub mod normalize;
pub mod repository;

pub use arxiv::{ArxivClient, ArxivEntry};
pub use error::{Result, ScienceError};
pub use normalize::normalize;
pub use repository::{PaperRepository, PaperSearch, SearchOutcome};
