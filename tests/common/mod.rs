//! Shared testing utilities for dmcfg tests.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use tempfile::TempDir;

/// Schema normally created by the external initialization step.
const DEVICE_MODEL_SCHEMA: [&str; 3] = [
    "CREATE TABLE COMPONENT ( \
        ID INTEGER PRIMARY KEY AUTOINCREMENT, \
        NAME TEXT NOT NULL, \
        INSTANCE TEXT, \
        EVSE_ID INTEGER, \
        CONNECTOR_ID INTEGER)",
    "CREATE TABLE VARIABLE ( \
        ID INTEGER PRIMARY KEY AUTOINCREMENT, \
        COMPONENT_ID INTEGER NOT NULL REFERENCES COMPONENT (ID), \
        NAME TEXT NOT NULL, \
        INSTANCE TEXT)",
    "CREATE TABLE VARIABLE_ATTRIBUTE ( \
        VARIABLE_ID INTEGER NOT NULL REFERENCES VARIABLE (ID), \
        TYPE_ID INTEGER NOT NULL, \
        VALUE TEXT)",
];

/// Testing harness providing an isolated database and config directory.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a new isolated environment.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        Self { root }
    }

    /// Path to the device model database inside the environment.
    pub fn db_path(&self) -> PathBuf {
        self.root.path().join("device_model.db")
    }

    /// Write a configuration document and return its path.
    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.root.path().join("config.json");
        fs::write(&path, content).expect("Failed to write test config");
        path
    }

    /// Create the device model database with the standard schema.
    pub async fn init_db(&self) -> SqlitePool {
        let options =
            SqliteConnectOptions::new().filename(self.db_path()).create_if_missing(true);
        let pool =
            SqlitePool::connect_with(options).await.expect("Failed to create test database");
        for statement in DEVICE_MODEL_SCHEMA {
            sqlx::query(statement).execute(&pool).await.expect("Failed to create test schema");
        }
        pool
    }

    /// Create the database file without any tables.
    pub async fn init_empty_db(&self) {
        let options =
            SqliteConnectOptions::new().filename(self.db_path()).create_if_missing(true);
        let pool =
            SqlitePool::connect_with(options).await.expect("Failed to create test database");
        // Force the file onto disk; an unused connection may leave nothing behind.
        sqlx::query("PRAGMA user_version = 1").execute(&pool).await.expect("Failed to touch db");
        pool.close().await;
    }

    /// Build a command for invoking the compiled `dmcfg` binary.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("dmcfg").expect("Failed to locate dmcfg binary");
        cmd.current_dir(self.root.path());
        cmd
    }
}

/// Insert a COMPONENT row and return its ID.
#[allow(dead_code)]
pub async fn seed_component(
    pool: &SqlitePool,
    name: &str,
    instance: Option<&str>,
    evse_id: Option<i64>,
    connector_id: Option<i64>,
) -> i64 {
    sqlx::query("INSERT INTO COMPONENT (NAME, INSTANCE, EVSE_ID, CONNECTOR_ID) VALUES (?, ?, ?, ?)")
        .bind(name)
        .bind(instance)
        .bind(evse_id)
        .bind(connector_id)
        .execute(pool)
        .await
        .expect("Failed to seed COMPONENT row")
        .last_insert_rowid()
}

/// Insert a VARIABLE row and return its ID.
#[allow(dead_code)]
pub async fn seed_variable(
    pool: &SqlitePool,
    component_id: i64,
    name: &str,
    instance: Option<&str>,
) -> i64 {
    sqlx::query("INSERT INTO VARIABLE (COMPONENT_ID, NAME, INSTANCE) VALUES (?, ?, ?)")
        .bind(component_id)
        .bind(name)
        .bind(instance)
        .execute(pool)
        .await
        .expect("Failed to seed VARIABLE row")
        .last_insert_rowid()
}

/// Insert a VARIABLE_ATTRIBUTE row.
#[allow(dead_code)]
pub async fn seed_attribute(pool: &SqlitePool, variable_id: i64, type_id: i64, value: Option<&str>) {
    sqlx::query("INSERT INTO VARIABLE_ATTRIBUTE (VARIABLE_ID, TYPE_ID, VALUE) VALUES (?, ?, ?)")
        .bind(variable_id)
        .bind(type_id)
        .bind(value)
        .execute(pool)
        .await
        .expect("Failed to seed VARIABLE_ATTRIBUTE row");
}

/// Read back the VALUE column for one attribute row.
#[allow(dead_code)]
pub async fn attribute_value(pool: &SqlitePool, variable_id: i64, type_id: i64) -> Option<String> {
    sqlx::query_scalar("SELECT VALUE FROM VARIABLE_ATTRIBUTE WHERE VARIABLE_ID = ? AND TYPE_ID = ?")
        .bind(variable_id)
        .bind(type_id)
        .fetch_one(pool)
        .await
        .expect("Failed to read VARIABLE_ATTRIBUTE row")
}
