use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};

use crate::domain::ledger::TenantLedger;
use crate::domain::ports::{LedgerStore, PropertyDirectory, PropertyRegistrar, VersionedLedger};
use crate::domain::property::Property;
use crate::error::{LedgerError, Result};

/// Column Family for storing tenant ledgers.
pub const CF_LEDGERS: &str = "ledgers";
/// Column Family for storing properties.
pub const CF_PROPERTIES: &str = "properties";

/// A persistent store implementation using RocksDB.
///
/// Handles storage for both `TenantLedger` and `Property` entities using
/// separate Column Families. Ledger values carry their revision; `insert`
/// and `commit` run the read-check-write under a process-wide gate, which is
/// what provides the per-tenant atomicity for this single-process backend.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    write_gate: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("ledgers" and
    /// "properties") exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_ledgers = ColumnFamilyDescriptor::new(CF_LEDGERS, Options::default());
        let cf_properties = ColumnFamilyDescriptor::new(CF_PROPERTIES, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_ledgers, cf_properties])?;

        Ok(Self {
            db: Arc::new(db),
            write_gate: Arc::new(Mutex::new(())),
        })
    }

    fn cf_handle(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            LedgerError::PersistenceFailure(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }

    fn read_ledger(&self, tenant_id: &str) -> Result<Option<VersionedLedger>> {
        let cf = self.cf_handle(CF_LEDGERS)?;
        match self.db.get_cf(cf, tenant_id.as_bytes())? {
            Some(bytes) => {
                let versioned = serde_json::from_slice(&bytes).map_err(|e| {
                    LedgerError::PersistenceFailure(Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("Deserialization error: {e}"),
                    )))
                })?;
                Ok(Some(versioned))
            }
            None => Ok(None),
        }
    }

    fn write_ledger(&self, versioned: &VersionedLedger) -> Result<()> {
        let cf = self.cf_handle(CF_LEDGERS)?;
        let value = serde_json::to_vec(versioned).map_err(|e| {
            LedgerError::PersistenceFailure(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization error: {e}"),
            )))
        })?;
        self.db
            .put_cf(cf, versioned.ledger.tenant_id.as_bytes(), value)?;
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for RocksDBStore {
    async fn load(&self, tenant_id: &str) -> Result<Option<VersionedLedger>> {
        self.read_ledger(tenant_id)
    }

    async fn insert(&self, ledger: TenantLedger) -> Result<()> {
        let _gate = self
            .write_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if self.read_ledger(&ledger.tenant_id)?.is_some() {
            return Err(LedgerError::ConcurrencyConflict(ledger.tenant_id));
        }
        self.write_ledger(&VersionedLedger {
            ledger,
            revision: 1,
        })
    }

    async fn commit(&self, ledger: TenantLedger, expected_revision: u64) -> Result<()> {
        let _gate = self
            .write_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        match self.read_ledger(&ledger.tenant_id)? {
            Some(stored) if stored.revision == expected_revision => {
                self.write_ledger(&VersionedLedger {
                    ledger,
                    revision: expected_revision + 1,
                })
            }
            _ => Err(LedgerError::ConcurrencyConflict(ledger.tenant_id)),
        }
    }

    async fn remove(&self, tenant_id: &str) -> Result<()> {
        let _gate = self
            .write_gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let cf = self.cf_handle(CF_LEDGERS)?;
        self.db.delete_cf(cf, tenant_id.as_bytes())?;
        Ok(())
    }

    async fn all(&self) -> Result<Vec<TenantLedger>> {
        let cf = self.cf_handle(CF_LEDGERS)?;
        let mut ledgers = Vec::new();
        let iter = self.db.iterator_cf(cf, rocksdb::IteratorMode::Start);

        for item in iter {
            let (_key, value) = item?;
            let versioned: VersionedLedger = serde_json::from_slice(&value).map_err(|e| {
                LedgerError::PersistenceFailure(Box::new(std::io::Error::other(format!(
                    "Failed to deserialize ledger: {e}"
                ))))
            })?;
            ledgers.push(versioned.ledger);
        }

        // Keys are tenant ids, so the iteration order is already sorted, but
        // the contract is explicit about it.
        ledgers.sort_by(|a, b| a.tenant_id.cmp(&b.tenant_id));
        Ok(ledgers)
    }
}

#[async_trait]
impl PropertyDirectory for RocksDBStore {
    async fn resolve_code(&self, code: &str) -> Result<Option<Property>> {
        let cf = self.cf_handle(CF_PROPERTIES)?;
        let iter = self.db.iterator_cf(cf, rocksdb::IteratorMode::Start);

        for item in iter {
            let (_key, value) = item?;
            let property: Property = serde_json::from_slice(&value).map_err(|e| {
                LedgerError::PersistenceFailure(Box::new(std::io::Error::other(format!(
                    "Failed to deserialize property: {e}"
                ))))
            })?;
            if property.code == code {
                return Ok(Some(property));
            }
        }
        Ok(None)
    }

    async fn get(&self, property_id: &str) -> Result<Option<Property>> {
        let cf = self.cf_handle(CF_PROPERTIES)?;
        match self.db.get_cf(cf, property_id.as_bytes())? {
            Some(bytes) => {
                let property = serde_json::from_slice(&bytes).map_err(|e| {
                    LedgerError::PersistenceFailure(Box::new(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("Deserialization error: {e}"),
                    )))
                })?;
                Ok(Some(property))
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl PropertyRegistrar for RocksDBStore {
    async fn register(&self, property: Property) -> Result<()> {
        let cf = self.cf_handle(CF_PROPERTIES)?;
        let value = serde_json::to_vec(&property).map_err(|e| {
            LedgerError::PersistenceFailure(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization error: {e}"),
            )))
        })?;
        self.db.put_cf(cf, property.id.as_bytes(), value)?;
        Ok(())
    }
}
