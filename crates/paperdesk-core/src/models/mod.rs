pub mod conversation;
pub mod paper;
pub mod session;

pub use conversation::{ConversationSession, ConversationTurn, Role};
pub use paper::{PaperRecord, StoredPaper};
pub use session::{ExchangeState, ResearchSession};
