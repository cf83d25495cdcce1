//! The guided runtime: which node is current, what the agent may pick next, and what was
//! captured along the way.

mod engine;
mod history;
mod resolve;

pub use engine::{Choice, Selection, Traversal};
pub use history::{CapturedAnswers, HistoryEntry};
pub use resolve::{MISSING_SCRIPT, ResolvedScript, ScriptSource, StartTier, resolve_start};
