//! Artifacts produced from a call or a playbook: the compliance log, the full text export
//! and the auto-layout of the editor canvas.

mod compliance;
mod export;
mod layout;

pub use compliance::{ComplianceLog, ComplianceSection};
pub use export::{DEFAULT_DEPTH_LIMIT, DocumentExport};
pub use layout::{Layout, LayoutSpacing, Rank, auto_layout, rank_nodes, reachable};
