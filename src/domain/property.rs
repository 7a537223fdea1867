use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::money::Balance;

/// A rental unit as published by the property directory.
///
/// The ledger treats this as a read-only, externally versioned snapshot:
/// a later change to the rent amount never rewrites already-recorded
/// payment transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub owner_id: String,
    /// Shareable code a tenant presents to `link`.
    pub code: String,
    /// The calendar date rent is owed.
    pub due_date: NaiveDate,
    pub rent_amount: Balance,
    pub security_deposit: Balance,
    /// Where rent is forwarded. Opaque to the ledger.
    pub owner_payout_id: String,
}

/// Generates a shareable 6-character uppercase property code.
pub fn generate_code() -> String {
    Uuid::new_v4().simple().to_string()[..6].to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_code_shape() {
        let code = generate_code();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_generated_codes_differ() {
        assert_ne!(generate_code(), generate_code());
    }
}
