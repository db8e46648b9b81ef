use std::fs;
use std::path::{Path, PathBuf};

use dcf_valuation_core::persistence::{InMemoryRecordStore, PersistedValuation, RecordStore};
use dcf_valuation_core::{DcfError, DcfResult};
use uuid::Uuid;

/// Record store kept in a single JSON document, rewritten on every save.
pub struct JsonFileStore {
    path: PathBuf,
    records: InMemoryRecordStore,
}

impl JsonFileStore {
    /// Open `path`; a missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> DcfResult<Self> {
        let path = path.as_ref().to_path_buf();
        let records = if path.exists() {
            let contents = fs::read_to_string(&path)
                .map_err(|e| DcfError::Store(format!("cannot read {}: {e}", path.display())))?;
            serde_json::from_str(&contents)?
        } else {
            log::info!("no store at {}; starting empty", path.display());
            InMemoryRecordStore::new()
        };
        Ok(JsonFileStore { path, records })
    }

    fn flush(&self) -> DcfResult<()> {
        let json = serde_json::to_string_pretty(&self.records)?;
        fs::write(&self.path, json)
            .map_err(|e| DcfError::Store(format!("cannot write {}: {e}", self.path.display())))
    }
}

impl RecordStore for JsonFileStore {
    fn get(&self, user: &str, id: Uuid) -> DcfResult<Option<PersistedValuation>> {
        self.records.get(user, id)
    }

    fn list(&self, user: &str) -> DcfResult<Vec<PersistedValuation>> {
        self.records.list(user)
    }

    fn upsert(&mut self, user: &str, record: PersistedValuation) -> DcfResult<()> {
        self.records.upsert(user, record)?;
        self.flush()
    }
}
