use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::calculator::{self, FineEstimate};
use crate::domain::ledger::{PaymentReceipt, TenantLedger};
use crate::domain::money::Balance;
use crate::domain::ports::{ClockBox, LedgerStoreBox, PropertyDirectoryBox, VersionedLedger};
use crate::domain::property::Property;
use crate::error::{LedgerError, Result};

/// The entry point for ledger operations.
///
/// Owns the storage ports and enforces the per-tenant mutation scope:
/// `link`, `unlink` and `process_payment` for one tenant are serialized by a
/// per-tenant lock held across the whole read-compute-write sequence.
/// Different tenants never contend. `estimate_fine` is read-only and takes
/// no lock. The store's revision check is the second guard, covering
/// external writers the lock registry cannot see.
pub struct RentEngine {
    ledgers: LedgerStoreBox,
    properties: PropertyDirectoryBox,
    clock: ClockBox,
    tenant_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl RentEngine {
    pub fn new(ledgers: LedgerStoreBox, properties: PropertyDirectoryBox, clock: ClockBox) -> Self {
        Self {
            ledgers,
            properties,
            clock,
            tenant_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Resolves `code` and opens a ledger for the tenant.
    ///
    /// Idempotent: an already-linked tenant gets the existing ledger back
    /// unchanged. Re-initializing the deposit here would erase the financial
    /// effect of the fine history, so it never happens.
    pub async fn link(&self, tenant_id: &str, code: &str) -> Result<TenantLedger> {
        let lock = self.tenant_lock(tenant_id).await;
        let _guard = lock.lock().await;

        let property = self
            .properties
            .resolve_code(code)
            .await?
            .ok_or_else(|| LedgerError::InvalidCode(code.to_string()))?;

        if let Some(existing) = self.ledgers.load(tenant_id).await? {
            debug!(
                tenant = tenant_id,
                property = %existing.ledger.property_id,
                "link is a no-op, tenant already has a ledger"
            );
            return Ok(existing.ledger);
        }

        let today = self.clock.now().date_naive();
        let ledger = TenantLedger::open(tenant_id, &property, today);
        self.ledgers.insert(ledger.clone()).await?;
        info!(tenant = tenant_id, property = %property.id, code, "tenant linked");
        Ok(ledger)
    }

    /// Deletes the tenant's ledger and with it the property linkage.
    ///
    /// Irreversible; outstanding fines are not reconciled. A no-op when no
    /// ledger exists, since the observable end state is the same.
    pub async fn unlink(&self, tenant_id: &str) -> Result<()> {
        let lock = self.tenant_lock(tenant_id).await;
        let _guard = lock.lock().await;

        self.ledgers.remove(tenant_id).await?;
        info!(tenant = tenant_id, "tenant unlinked");
        Ok(())
    }

    /// Live fine preview against current state. Never appends to history,
    /// never touches the deposit.
    pub async fn estimate_fine(&self, tenant_id: &str) -> Result<FineEstimate> {
        let versioned = self.require_ledger(tenant_id).await?;
        let property = self.property_of(&versioned.ledger).await?;

        let today = self.clock.now().date_naive();
        Ok(calculator::estimate(
            property.due_date,
            versioned.ledger.last_payment_date,
            today,
        ))
    }

    /// Charges rent: computes the fine, deducts it from the deposit, records
    /// history and advances `last_payment_date`, committed as one unit.
    ///
    /// On `ConcurrencyConflict` nothing was written and the call is safe to
    /// retry; after a success a retry would charge again.
    pub async fn process_payment(&self, tenant_id: &str) -> Result<PaymentReceipt> {
        let lock = self.tenant_lock(tenant_id).await;
        let _guard = lock.lock().await;

        let VersionedLedger {
            mut ledger,
            revision,
        } = self.require_ledger(tenant_id).await?;
        let property = self.property_of(&ledger).await?;

        let now = self.clock.now();
        let estimate = calculator::estimate(
            property.due_date,
            ledger.last_payment_date,
            now.date_naive(),
        );
        let receipt = ledger.apply_payment(&property, estimate, now);
        self.ledgers.commit(ledger, revision).await?;

        if receipt.fine_charged > Balance::ZERO {
            warn!(
                tenant = tenant_id,
                fine = %receipt.fine_charged,
                days_late = estimate.days_late,
                "late payment, fine deducted from deposit"
            );
        } else {
            info!(tenant = tenant_id, "payment processed, no fine");
        }
        Ok(receipt)
    }

    /// Consumes the engine and returns every ledger for reporting.
    pub async fn into_ledgers(self) -> Result<Vec<TenantLedger>> {
        self.ledgers.all().await
    }

    async fn tenant_lock(&self, tenant_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.tenant_locks.lock().await;
        locks.entry(tenant_id.to_string()).or_default().clone()
    }

    async fn require_ledger(&self, tenant_id: &str) -> Result<VersionedLedger> {
        self.ledgers
            .load(tenant_id)
            .await?
            .ok_or_else(|| LedgerError::NotLinked(tenant_id.to_string()))
    }

    async fn property_of(&self, ledger: &TenantLedger) -> Result<Property> {
        self.properties.get(&ledger.property_id).await?.ok_or_else(|| {
            LedgerError::PersistenceFailure(Box::new(std::io::Error::other(format!(
                "property {} missing for tenant {}",
                ledger.property_id, ledger.tenant_id
            ))))
        })
    }
}
