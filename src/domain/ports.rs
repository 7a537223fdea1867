use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ledger::TenantLedger;
use crate::domain::property::Property;
use crate::error::Result;

/// A ledger snapshot paired with the storage revision it was loaded at.
///
/// `LedgerStore::commit` must be handed the same revision back; the store
/// rejects the write if anything else committed in between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedLedger {
    pub ledger: TenantLedger,
    pub revision: u64,
}

/// Keyed persistence for tenant ledgers.
///
/// Implementations must make `insert`, `commit` and `remove` atomic per
/// tenant: either the whole write lands or none of it does.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn load(&self, tenant_id: &str) -> Result<Option<VersionedLedger>>;
    /// Creates the ledger; fails with `ConcurrencyConflict` when one already
    /// exists for the tenant.
    async fn insert(&self, ledger: TenantLedger) -> Result<()>;
    /// Replaces the ledger iff the stored revision equals `expected_revision`;
    /// fails with `ConcurrencyConflict` otherwise, writing nothing.
    async fn commit(&self, ledger: TenantLedger, expected_revision: u64) -> Result<()>;
    /// Removes the ledger. Succeeds when none exists.
    async fn remove(&self, tenant_id: &str) -> Result<()>;
    /// Every stored ledger, ordered by tenant id, for reporting.
    async fn all(&self) -> Result<Vec<TenantLedger>>;
}

/// Read side of the property directory. The ledger never writes properties.
#[async_trait]
pub trait PropertyDirectory: Send + Sync {
    async fn resolve_code(&self, code: &str) -> Result<Option<Property>>;
    async fn get(&self, property_id: &str) -> Result<Option<Property>>;
}

/// Write side of the property directory. Hosts use this to seed properties;
/// the engine itself only ever reads through `PropertyDirectory`.
#[async_trait]
pub trait PropertyRegistrar: Send + Sync {
    async fn register(&self, property: Property) -> Result<()>;
}

/// Time source for the engine. A port so replay and tests can pin dates.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub type LedgerStoreBox = Box<dyn LedgerStore>;
pub type PropertyDirectoryBox = Box<dyn PropertyDirectory>;
pub type PropertyRegistrarBox = Box<dyn PropertyRegistrar>;
pub type ClockBox = Box<dyn Clock>;
