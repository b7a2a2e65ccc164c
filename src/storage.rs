//! SQLite access to the device model storage.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::document::ConfigDocument;
use crate::error::AppError;

/// Relations this crate consumes; created by the external initialization step.
const REQUIRED_TABLES: [&str; 3] = ["COMPONENT", "VARIABLE", "VARIABLE_ATTRIBUTE"];

/// Targets exactly one VARIABLE_ATTRIBUTE row per (component, variable,
/// attribute type) triple. `IS` keeps absent identity fields matching
/// stored NULLs.
const UPDATE_VARIABLE_ATTRIBUTE: &str = "UPDATE VARIABLE_ATTRIBUTE \
     SET VALUE = ? \
     WHERE VARIABLE_ID = ( \
     SELECT VARIABLE.ID \
     FROM VARIABLE \
     JOIN COMPONENT ON COMPONENT.ID = VARIABLE.COMPONENT_ID \
     WHERE COMPONENT.NAME = ? \
     AND COMPONENT.INSTANCE IS ? \
     AND COMPONENT.EVSE_ID IS ? \
     AND COMPONENT.CONNECTOR_ID IS ? \
     AND VARIABLE.NAME = ? \
     AND VARIABLE.INSTANCE IS ?) \
     AND TYPE_ID = ?";

/// Counters for one configuration import pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    /// Attribute rows whose VALUE column was written.
    pub updated: u64,
    /// Document leaves that matched no stored row.
    pub unmatched: u64,
}

/// Handle to an initialized device model storage database.
pub struct DeviceModelStorage {
    pool: SqlitePool,
}

impl DeviceModelStorage {
    /// Open an existing device model database.
    ///
    /// The database file must already exist and carry the COMPONENT,
    /// VARIABLE and VARIABLE_ATTRIBUTE relations; this crate never
    /// creates or migrates the schema.
    pub async fn open(path: &Path) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::new().filename(path).create_if_missing(false);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let storage = Self { pool };
        storage.verify_schema().await?;
        Ok(storage)
    }

    async fn verify_schema(&self) -> Result<(), AppError> {
        let mut missing = Vec::new();
        for table in REQUIRED_TABLES {
            let found =
                sqlx::query("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?")
                    .bind(table)
                    .fetch_optional(&self.pool)
                    .await?;
            if found.is_none() {
                missing.push(table);
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::MissingSchema(missing.join(", ")))
        }
    }

    /// Write every attribute value in `document` within a single transaction.
    ///
    /// A leaf that matches no stored row is counted and logged, not an
    /// error; rows are owned by the initialization step and never created
    /// here.
    pub async fn apply(&self, document: &ConfigDocument) -> Result<ImportSummary, AppError> {
        let mut summary = ImportSummary::default();
        let mut tx = self.pool.begin().await?;

        for component in &document.components {
            for variable in &component.variables {
                for (attribute_type, value) in &variable.attributes {
                    let result = sqlx::query(UPDATE_VARIABLE_ATTRIBUTE)
                        .bind(value)
                        .bind(&component.name)
                        .bind(&component.instance)
                        .bind(component.evse_id)
                        .bind(component.connector_id)
                        .bind(&variable.name)
                        .bind(&variable.instance)
                        .bind(attribute_type.type_id())
                        .execute(&mut *tx)
                        .await?;

                    if result.rows_affected() == 0 {
                        warn!(
                            "No matching variable attribute row for {}/{} ({})",
                            component.name, variable.name, attribute_type
                        );
                        summary.unmatched += 1;
                    } else {
                        debug!(
                            "Set {}/{} ({}) to '{}'",
                            component.name, variable.name, attribute_type, value
                        );
                        summary.updated += result.rows_affected();
                    }
                }
            }
        }

        tx.commit().await?;
        Ok(summary)
    }

    /// Close the underlying connection pool.
    pub async fn close(self) {
        self.pool.close().await;
    }
}
