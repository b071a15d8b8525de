use std::future::Future;

use uuid::Uuid;

use crate::config::SharedSecret;
use crate::error::RegistryError;

use super::{WorkerRecord, WorkerRegistry};

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn count_records(dir: &std::path::Path) -> Result<usize, String> {
    let entries = std::fs::read_dir(dir).map_err(|err| format!("read_dir failed: {}", err))?;
    let mut count = 0usize;
    for entry in entries {
        entry.map_err(|err| format!("read_dir entry failed: {}", err))?;
        count = count.saturating_add(1);
    }
    Ok(count)
}

#[test]
fn register_with_correct_key_persists_record() -> Result<(), String> {
    run_async_test(async {
        let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let registry = WorkerRegistry::open(dir.path().join("workers"))
            .map_err(|err| format!("open failed: {}", err))?;
        let secret = SharedSecret::new("abc123");

        let record = registry
            .register(&secret, "abc123", "127.0.0.1")
            .await
            .map_err(|err| format!("register failed: {}", err))?;
        Uuid::parse_str(&record.id).map_err(|err| format!("id is not a UUID: {}", err))?;

        let path = dir.path().join("workers").join(&record.id);
        let content =
            std::fs::read_to_string(&path).map_err(|err| format!("read failed: {}", err))?;
        let persisted: WorkerRecord =
            serde_json::from_str(&content).map_err(|err| format!("parse failed: {}", err))?;
        if persisted.id != record.id || persisted.address != "127.0.0.1" {
            return Err("Persisted record does not match returned record".to_owned());
        }
        Ok(())
    })
}

#[test]
fn register_with_wrong_key_persists_nothing() -> Result<(), String> {
    run_async_test(async {
        let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let workers_dir = dir.path().join("workers");
        let registry =
            WorkerRegistry::open(&workers_dir).map_err(|err| format!("open failed: {}", err))?;
        let secret = SharedSecret::new("abc123");

        match registry.register(&secret, "wrong", "127.0.0.1").await {
            Err(RegistryError::WrongKey) => {}
            Err(err) => return Err(format!("Unexpected error: {}", err)),
            Ok(record) => return Err(format!("Expected rejection, got id {}", record.id)),
        }
        if count_records(&workers_dir)? != 0 {
            return Err("Expected no persisted records".to_owned());
        }
        Ok(())
    })
}

#[test]
fn each_registration_issues_a_fresh_id() -> Result<(), String> {
    run_async_test(async {
        let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
        let workers_dir = dir.path().join("workers");
        let registry =
            WorkerRegistry::open(&workers_dir).map_err(|err| format!("open failed: {}", err))?;
        let secret = SharedSecret::new("abc123");

        let first = registry
            .register(&secret, "abc123", "10.0.0.1")
            .await
            .map_err(|err| format!("first register failed: {}", err))?;
        let second = registry
            .register(&secret, "abc123", "10.0.0.2")
            .await
            .map_err(|err| format!("second register failed: {}", err))?;
        if first.id == second.id {
            return Err("Expected distinct worker ids".to_owned());
        }
        if count_records(&workers_dir)? != 2 {
            return Err("Expected one record per registration".to_owned());
        }
        Ok(())
    })
}
