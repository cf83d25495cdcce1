//! Prelude module for convenient imports
//!
//! Re-exports the types most call-handling code needs: the document model, the traversal
//! engine, the stores and the report builders.
//!
//! # Example
//!
//! ```rust,no_run
//! use playbook::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let mut store = MemoryStore::new();
//! let mut document = PlaybookDocument::default();
//! let step = document.add_node(NodeKind::Checklist);
//! document.connect(START_NODE_ID, &step, "Verify")?;
//! store.save("compliance", &document)?;
//!
//! let loaded = store.load("compliance")?;
//! let call = Traversal::new(&loaded);
//! println!("{:?}", call.current_options());
//! # Ok(())
//! # }
//! ```

// Document model
pub use crate::document::{
    Carrier, ChecklistItem, FlowEdge, FlowNode, ItemKind, NodeData, NodeKind, PlaybookDocument,
    Position, QuoteSettings, START_NODE_ID,
};

// Runtime
pub use crate::answers::{AnswerStore, ChecklistAnswer};
pub use crate::traversal::{CapturedAnswers, Choice, HistoryEntry, Traversal};

// Rendering and reports
pub use crate::report::{ComplianceLog, DocumentExport, LayoutSpacing, auto_layout};
pub use crate::template::{QuoteForm, fill_template, render_quote};

// Persistence and configuration
pub use crate::config::Config;
pub use crate::store::{FileStore, MemoryStore, PlaybookStore};

// Error types
pub use crate::error::{EditError, ImportError, StoreError, TraversalError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
