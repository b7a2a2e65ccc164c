//! dmcfg: load device model configuration values into SQLite storage.
//!
//! Two independent utilities live here: a configuration loader that
//! writes variable attribute values into an initialized device model
//! database, and a snake_case converter used by the code generation
//! tooling.

pub mod casing;
pub mod document;
pub mod error;
pub mod storage;

use std::path::Path;

pub use casing::{CasingError, to_snake_case};
pub use document::{AttributeType, ComponentEntry, ConfigDocument, VariableEntry};
pub use error::AppError;
pub use storage::{DeviceModelStorage, ImportSummary};

/// Apply the configuration document at `config_path` to the device model
/// storage at `db_path`.
///
/// The document is parsed and validated up front; all updates then run
/// in a single transaction, so a failure leaves no partial changes
/// behind.
pub async fn apply_config(config_path: &Path, db_path: &Path) -> Result<ImportSummary, AppError> {
    let document = ConfigDocument::load(config_path)?;
    let storage = DeviceModelStorage::open(db_path).await?;
    let summary = storage.apply(&document).await?;
    storage.close().await;
    Ok(summary)
}
