//! # Playbook - Call-Script Flow Engine
//!
//! **Playbook** models branching call scripts for insurance call centers and walks an
//! agent through them one step at a time. A playbook is a directed graph of typed steps
//! (scripts, carrier lookups, quote builders, compliance checklists and fill-in-the-blank
//! word tracks) stored as a JSON document.
//!
//! ## Core Workflow
//!
//! 1.  **Load a Playbook**: Read a [`document::PlaybookDocument`] from a [`store::PlaybookStore`]
//!     (a directory of JSON files or an in-memory map). Partial documents are completed with defaults.
//! 2.  **Start a Call**: Create a [`traversal::Traversal`] over the document. It resolves the start
//!     step and exposes the current step and the options leaving it.
//! 3.  **Capture Answers**: Select a carrier and call type, tick checklist items, fill word-track
//!     variables or quote inputs. Nothing is committed until the agent moves on.
//! 4.  **Advance**: Each transition snapshots the step and its answers into the call history.
//! 5.  **Report**: Build the [`report::ComplianceLog`] from the history, or export the whole
//!     playbook as text with [`report::DocumentExport`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use playbook::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let store = FileStore::new("playbooks");
//!     let document = store.load("auto_quote")?;
//!
//!     let mut call = Traversal::new(&document);
//!     while let Some(node) = call.current_node() {
//!         println!("[{}] {}", node.kind().display_name(), node.label());
//!         if call.is_terminal() {
//!             break;
//!         }
//!         if matches!(node.data, NodeData::CarrierLookup(_)) {
//!             call.select_carrier("1")?;
//!         }
//!         call.choose(0)?;
//!     }
//!
//!     if let Some(log) = ComplianceLog::from_history(call.history()) {
//!         println!("{}", log.render_now());
//!     }
//!     Ok(())
//! }
//! ```

pub mod answers;
pub mod config;
pub mod document;
pub mod error;
pub mod prelude;
pub mod report;
pub mod store;
pub mod template;
pub mod traversal;
