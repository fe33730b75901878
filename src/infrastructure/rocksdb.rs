use crate::domain::ports::SettingsStore;
use crate::domain::settings::ElevateSettings;
use crate::error::{ElevateError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family holding the settings of each form template.
pub const CF_SETTINGS: &str = "elevate_settings";

/// A persistent settings store backed by RocksDB.
///
/// Keys are template ids, values the JSON form of `ElevateSettings`.
/// `Clone` shares the underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDBSettingsStore {
    db: Arc<DB>,
}

impl RocksDBSettingsStore {
    /// Opens or creates a RocksDB instance at the specified path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_settings = ColumnFamilyDescriptor::new(CF_SETTINGS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_settings])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn settings_cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_SETTINGS).ok_or_else(|| {
            ElevateError::InternalError(Box::new(std::io::Error::other(
                "Settings column family not found",
            )))
        })
    }
}

#[async_trait]
impl SettingsStore for RocksDBSettingsStore {
    async fn load(&self, template_id: &str) -> Result<Option<ElevateSettings>> {
        let cf = self.settings_cf()?;
        match self.db.get_cf(cf, template_id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, template_id: &str, settings: ElevateSettings) -> Result<()> {
        let cf = self.settings_cf()?;
        let value = serde_json::to_vec(&settings)?;
        self.db.put_cf(cf, template_id.as_bytes(), value)?;
        Ok(())
    }
}
