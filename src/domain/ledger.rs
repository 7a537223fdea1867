use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::calculator::FineEstimate;
use crate::domain::money::Balance;
use crate::domain::property::Property;

/// Days the initial `last_payment_date` is backdated at link time, so an
/// unpaid first cycle is immediately delinquent once the due date passes.
pub const LINK_BACKDATE_DAYS: u64 = 30;

/// One deduction taken from the security deposit.
///
/// Zero-fine payments are never recorded here; the sequence is chronological
/// and append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FineRecord {
    pub date: DateTime<Utc>,
    pub amount_deducted: Balance,
    pub days_late: i64,
    /// Human label of the cycle, e.g. "November 2024".
    pub rent_month: String,
}

/// One processed rent payment, most-recent-first in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentTransaction {
    pub date: DateTime<Utc>,
    /// The rent charged, independent of any fine.
    pub amount_paid: Balance,
    /// Fine deducted from the deposit in the same call; zero when on time.
    pub fine_deducted: Balance,
    pub rent_month: String,
    /// Display/reconciliation reference only, never a concurrency token.
    pub transaction_id: Uuid,
}

/// What `process_payment` reports back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaymentReceipt {
    pub fine_charged: Balance,
}

/// Per-tenant record of deposit balance plus fine and payment history.
///
/// Created exactly once when a tenant links to a property and destroyed only
/// on unlink. The deposit has a single mutation path (`apply_payment`), so
/// `current_deposit` always equals the initial security deposit minus the
/// sum of `fine_history` deductions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantLedger {
    pub tenant_id: String,
    pub property_id: String,
    /// Signed: fines may push the balance below zero.
    pub current_deposit: Balance,
    pub last_payment_date: NaiveDate,
    pub move_in_date: NaiveDate,
    /// Chronological, append-only.
    pub fine_history: Vec<FineRecord>,
    /// Most-recent-first, append-only.
    pub payment_history: Vec<PaymentTransaction>,
}

impl TenantLedger {
    /// Opens the ledger at link time, seeded with the property's security
    /// deposit and a `last_payment_date` backdated by [`LINK_BACKDATE_DAYS`].
    pub fn open(tenant_id: impl Into<String>, property: &Property, today: NaiveDate) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            property_id: property.id.clone(),
            current_deposit: property.security_deposit,
            last_payment_date: today - Days::new(LINK_BACKDATE_DAYS),
            move_in_date: today,
            fine_history: Vec::new(),
            payment_history: Vec::new(),
        }
    }

    /// Applies one rent payment as a single unit: deducts the fine (the
    /// balance has no floor at zero), records the deduction when nonzero,
    /// prepends the transaction, and advances `last_payment_date`.
    ///
    /// The caller must already hold the per-tenant mutation scope; this
    /// method only transitions state in memory.
    pub fn apply_payment(
        &mut self,
        property: &Property,
        estimate: FineEstimate,
        now: DateTime<Utc>,
    ) -> PaymentReceipt {
        // One label per call, shared by both records, so they agree even if
        // the call straddles a clock tick.
        let rent_month = now.format("%B %Y").to_string();

        self.current_deposit -= estimate.fine;

        if estimate.fine > Balance::ZERO {
            self.fine_history.push(FineRecord {
                date: now,
                amount_deducted: estimate.fine,
                days_late: estimate.days_late,
                rent_month: rent_month.clone(),
            });
        }

        self.payment_history.insert(
            0,
            PaymentTransaction {
                date: now,
                amount_paid: property.rent_amount,
                fine_deducted: estimate.fine,
                rent_month,
                transaction_id: Uuid::new_v4(),
            },
        );

        self.last_payment_date = now.date_naive();

        PaymentReceipt {
            fine_charged: estimate.fine,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calculator;
    use rust_decimal_macros::dec;

    fn sample_property() -> Property {
        Property {
            id: "prop-1".into(),
            owner_id: "owner-1".into(),
            code: "AB12CD".into(),
            due_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            rent_amount: Balance::new(dec!(1500)),
            security_deposit: Balance::new(dec!(5000)),
            owner_payout_id: "owner@bank".into(),
        }
    }

    fn midnight(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(chrono::NaiveTime::MIN)
            .and_utc()
    }

    #[test]
    fn test_open_backdates_last_payment() {
        let property = sample_property();
        let today = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let ledger = TenantLedger::open("tenant-1", &property, today);

        assert_eq!(ledger.current_deposit, Balance::new(dec!(5000)));
        assert_eq!(
            ledger.last_payment_date,
            NaiveDate::from_ymd_opt(2024, 12, 11).unwrap()
        );
        assert_eq!(ledger.move_in_date, today);
        assert!(ledger.fine_history.is_empty());
        assert!(ledger.payment_history.is_empty());
    }

    #[test]
    fn test_apply_payment_with_fine() {
        let property = sample_property();
        let mut ledger = TenantLedger::open(
            "tenant-1",
            &property,
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        );

        let now = midnight(2025, 1, 13);
        let estimate =
            calculator::estimate(property.due_date, ledger.last_payment_date, now.date_naive());
        let receipt = ledger.apply_payment(&property, estimate, now);

        assert_eq!(receipt.fine_charged, Balance::new(dec!(400)));
        assert_eq!(ledger.current_deposit, Balance::new(dec!(4600)));
        assert_eq!(ledger.last_payment_date, now.date_naive());

        assert_eq!(ledger.fine_history.len(), 1);
        let fine = &ledger.fine_history[0];
        assert_eq!(fine.amount_deducted, Balance::new(dec!(400)));
        assert_eq!(fine.days_late, 3);

        assert_eq!(ledger.payment_history.len(), 1);
        let txn = &ledger.payment_history[0];
        assert_eq!(txn.amount_paid, Balance::new(dec!(1500)));
        assert_eq!(txn.fine_deducted, Balance::new(dec!(400)));
        assert_eq!(txn.rent_month, fine.rent_month);
    }

    #[test]
    fn test_on_time_payment_records_no_fine() {
        let property = sample_property();
        let mut ledger = TenantLedger::open(
            "tenant-1",
            &property,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        );

        let now = midnight(2025, 1, 10);
        let estimate =
            calculator::estimate(property.due_date, ledger.last_payment_date, now.date_naive());
        let receipt = ledger.apply_payment(&property, estimate, now);

        assert_eq!(receipt.fine_charged, Balance::ZERO);
        assert_eq!(ledger.current_deposit, Balance::new(dec!(5000)));
        assert!(ledger.fine_history.is_empty());
        assert_eq!(ledger.payment_history.len(), 1);
        assert_eq!(ledger.payment_history[0].fine_deducted, Balance::ZERO);
    }

    #[test]
    fn test_payment_history_is_most_recent_first() {
        let property = sample_property();
        let mut ledger = TenantLedger::open(
            "tenant-1",
            &property,
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        );

        for day in 13..16 {
            let now = midnight(2025, 1, day);
            let estimate = calculator::estimate(
                property.due_date,
                ledger.last_payment_date,
                now.date_naive(),
            );
            ledger.apply_payment(&property, estimate, now);
        }

        assert_eq!(ledger.payment_history.len(), 3);
        assert_eq!(ledger.payment_history[0].date, midnight(2025, 1, 15));
        assert_eq!(ledger.payment_history[2].date, midnight(2025, 1, 13));
    }

    #[test]
    fn test_deposit_equals_initial_minus_fines() {
        let property = sample_property();
        let mut ledger = TenantLedger::open(
            "tenant-1",
            &property,
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        );

        // Late payment, then an on-time one; the invariant must hold across both.
        for day in [13, 14] {
            let now = midnight(2025, 1, day);
            let estimate = calculator::estimate(
                property.due_date,
                ledger.last_payment_date,
                now.date_naive(),
            );
            ledger.apply_payment(&property, estimate, now);
        }

        let deducted = ledger
            .fine_history
            .iter()
            .fold(Balance::ZERO, |acc, f| acc + f.amount_deducted);
        assert_eq!(
            ledger.current_deposit,
            property.security_deposit - deducted
        );
    }

    #[test]
    fn test_transaction_ids_are_unique() {
        let property = sample_property();
        let mut ledger = TenantLedger::open(
            "tenant-1",
            &property,
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        );

        for day in 13..15 {
            let now = midnight(2025, 1, day);
            let estimate = calculator::estimate(
                property.due_date,
                ledger.last_payment_date,
                now.date_naive(),
            );
            ledger.apply_payment(&property, estimate, now);
        }

        assert_ne!(
            ledger.payment_history[0].transaction_id,
            ledger.payment_history[1].transaction_id
        );
    }
}
