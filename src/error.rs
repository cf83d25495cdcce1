use thiserror::Error;

/// Errors raised by a playbook store for operations that require an existing source.
///
/// Loading a missing playbook is not an error; see [`crate::store::PlaybookStore::load`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Playbook '{0}' does not exist")]
    NotFound(String),

    #[error("Invalid playbook name '{0}': names may not be empty or contain path separators")]
    InvalidName(String),

    #[error("I/O error on playbook '{name}': {message}")]
    Io { name: String, message: String },

    #[error("Failed to parse playbook '{name}': {message}")]
    Parse { name: String, message: String },

    #[error("Failed to serialize playbook '{name}': {message}")]
    Serialize { name: String, message: String },
}

/// Errors that abort an import before anything is written to the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("Import payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Import payload is missing the required '{0}' field")]
    MissingField(&'static str),

    #[error("A playbook named '{0}' already exists")]
    NameTaken(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised by the traversal engine when a caller violates a transition precondition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraversalError {
    #[error("The playbook has no nodes to traverse")]
    NoCurrentNode,

    #[error("Node '{target_id}' is not reachable by an edge from node '{from_id}'")]
    NotAnOption { from_id: String, target_id: String },

    #[error("Carrier lookup node '{node_id}' requires a carrier to be selected before continuing")]
    CarrierNotSelected { node_id: String },

    #[error("Carrier '{0}' is not defined in this playbook")]
    UnknownCarrier(String),

    #[error("History index {index} is out of range (history has {len} entries)")]
    HistoryIndexOutOfRange { index: usize, len: usize },
}

/// Errors raised by editor actions on a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    #[error("Edge index {0} is out of range")]
    EdgeNotFound(usize),

    #[error("Carrier '{0}' not found")]
    CarrierNotFound(String),

    #[error("A playbook must define at least one call type")]
    EmptyCallTypes,
}
