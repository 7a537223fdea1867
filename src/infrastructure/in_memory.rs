use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ledger::TenantLedger;
use crate::domain::ports::{LedgerStore, PropertyDirectory, PropertyRegistrar, VersionedLedger};
use crate::domain::property::Property;
use crate::error::{LedgerError, Result};

/// A thread-safe in-memory ledger store with optimistic revisions.
///
/// Uses `Arc<RwLock<HashMap<..>>>` for shared concurrent access; `Clone`
/// shares the underlying map. Revisions start at 1 and bump on every commit.
/// Ideal for testing or hosting without persistence.
#[derive(Default, Clone)]
pub struct InMemoryLedgerStore {
    ledgers: Arc<RwLock<HashMap<String, VersionedLedger>>>,
}

impl InMemoryLedgerStore {
    /// Creates a new, empty in-memory ledger store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn load(&self, tenant_id: &str) -> Result<Option<VersionedLedger>> {
        let ledgers = self.ledgers.read().await;
        Ok(ledgers.get(tenant_id).cloned())
    }

    async fn insert(&self, ledger: TenantLedger) -> Result<()> {
        let mut ledgers = self.ledgers.write().await;
        if ledgers.contains_key(&ledger.tenant_id) {
            return Err(LedgerError::ConcurrencyConflict(ledger.tenant_id));
        }
        ledgers.insert(
            ledger.tenant_id.clone(),
            VersionedLedger {
                ledger,
                revision: 1,
            },
        );
        Ok(())
    }

    async fn commit(&self, ledger: TenantLedger, expected_revision: u64) -> Result<()> {
        let mut ledgers = self.ledgers.write().await;
        match ledgers.get_mut(&ledger.tenant_id) {
            Some(stored) if stored.revision == expected_revision => {
                stored.ledger = ledger;
                stored.revision += 1;
                Ok(())
            }
            _ => Err(LedgerError::ConcurrencyConflict(ledger.tenant_id)),
        }
    }

    async fn remove(&self, tenant_id: &str) -> Result<()> {
        let mut ledgers = self.ledgers.write().await;
        ledgers.remove(tenant_id);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<TenantLedger>> {
        let ledgers = self.ledgers.read().await;
        let mut all: Vec<_> = ledgers.values().map(|v| v.ledger.clone()).collect();
        all.sort_by(|a, b| a.tenant_id.cmp(&b.tenant_id));
        Ok(all)
    }
}

/// A thread-safe in-memory property directory.
///
/// The `PropertyDirectory` port is read-only; writes go through
/// `PropertyRegistrar` (or `seed` in tests).
#[derive(Default, Clone)]
pub struct InMemoryPropertyDirectory {
    properties: Arc<RwLock<HashMap<String, Property>>>,
}

impl InMemoryPropertyDirectory {
    /// Creates a new, empty in-memory property directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Infallible insert used by test fixtures.
    pub async fn seed(&self, property: Property) {
        let mut properties = self.properties.write().await;
        properties.insert(property.id.clone(), property);
    }
}

#[async_trait]
impl PropertyDirectory for InMemoryPropertyDirectory {
    async fn resolve_code(&self, code: &str) -> Result<Option<Property>> {
        let properties = self.properties.read().await;
        Ok(properties.values().find(|p| p.code == code).cloned())
    }

    async fn get(&self, property_id: &str) -> Result<Option<Property>> {
        let properties = self.properties.read().await;
        Ok(properties.get(property_id).cloned())
    }
}

#[async_trait]
impl PropertyRegistrar for InMemoryPropertyDirectory {
    async fn register(&self, property: Property) -> Result<()> {
        self.seed(property).await;
        Ok(())
    }
}
