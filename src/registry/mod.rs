#[cfg(test)]
mod tests;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::config::SharedSecret;
use crate::error::RegistryError;

/// Identity issued to a remote worker node. One JSON file per id under the
/// workers directory; written once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerRecord {
    pub id: String,
    pub address: String,
}

/// Issues and persists worker identities. Registration is independent of
/// job state; each call stands alone and relies only on the atomicity of a
/// single record write.
#[derive(Debug)]
pub struct WorkerRegistry {
    dir: PathBuf,
}

impl WorkerRegistry {
    /// Opens the registry, creating the workers directory when missing.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|err| RegistryError::CreateDir {
            path: dir.clone(),
            source: err,
        })?;
        Ok(Self { dir })
    }

    /// Registers a worker: verifies the presented key against the injected
    /// secret, mints a fresh id, and persists the record before returning.
    /// When persistence fails no record is considered registered.
    ///
    /// # Errors
    ///
    /// Returns `WrongKey` for a bad secret and a persistence error when the
    /// record cannot be written.
    pub async fn register(
        &self,
        secret: &SharedSecret,
        presented_key: &str,
        address: &str,
    ) -> Result<WorkerRecord, RegistryError> {
        if !secret.verify(presented_key) {
            return Err(RegistryError::WrongKey);
        }

        let record = WorkerRecord {
            id: Uuid::new_v4().to_string(),
            address: address.to_owned(),
        };
        self.persist(&record).await?;
        info!("Registered worker {} from {}", record.id, record.address);
        Ok(record)
    }

    /// Writes the record to a temporary file first and renames it into
    /// place, so a crash mid-write never leaves a partial record behind.
    async fn persist(&self, record: &WorkerRecord) -> Result<(), RegistryError> {
        let body =
            serde_json::to_vec(record).map_err(|err| RegistryError::Serialize { source: err })?;
        let path = self.dir.join(&record.id);
        let staging = self.dir.join(format!("{}.tmp", record.id));

        tokio::fs::write(&staging, body)
            .await
            .map_err(|err| RegistryError::Persist {
                path: staging.clone(),
                source: err,
            })?;
        tokio::fs::rename(&staging, &path)
            .await
            .map_err(|err| RegistryError::Persist { path, source: err })
    }
}
