use super::{PlaybookStore, normalize_name};
use crate::document::PlaybookDocument;
use crate::error::ImportError;
use serde_json::Value;
use tracing::info;

/// What to do when the import target name is already taken.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImportConflict {
    #[default]
    Abort,
    Overwrite,
    /// Store under this name instead.
    RenameTo(String),
}

/// Parses an uploaded playbook. `nodes` and `edges` must be present; everything else is
/// defaulted like a regular load.
pub fn parse_import(json: &str) -> Result<PlaybookDocument, ImportError> {
    let value: Value = serde_json::from_str(json).map_err(|e| ImportError::InvalidJson(e.to_string()))?;
    let Some(object) = value.as_object() else {
        return Err(ImportError::InvalidJson("expected a JSON object".to_string()));
    };
    for field in ["nodes", "edges"] {
        if !object.contains_key(field) {
            return Err(ImportError::MissingField(field));
        }
    }
    serde_json::from_value(value).map_err(|e| ImportError::InvalidJson(e.to_string()))
}

/// Validates `json` and stores it. Returns the key the playbook was stored under.
///
/// Nothing is written when validation fails or the conflict policy refuses.
pub fn import_into<S: PlaybookStore + ?Sized>(
    store: &mut S,
    name: &str,
    json: &str,
    conflict: ImportConflict,
) -> Result<String, ImportError> {
    let mut document = parse_import(json)?;

    let key = match &conflict {
        ImportConflict::RenameTo(alternative) if store.exists(name)? => normalize_name(alternative)?,
        _ => normalize_name(name)?,
    };
    if conflict != ImportConflict::Overwrite && store.exists(&key)? {
        return Err(ImportError::NameTaken(key));
    }

    document.filename = Some(key.clone());
    store.save(&key, &document)?;
    info!(playbook = %key, nodes = document.nodes.len(), "imported playbook");
    Ok(key)
}
