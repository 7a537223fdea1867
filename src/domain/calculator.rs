use chrono::NaiveDate;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::domain::money::Balance;

/// Outcome of evaluating lateness for one rent cycle.
///
/// `cycle_day` is 1-indexed with day 1 being the due date itself; it is 0
/// when the cycle is already settled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FineEstimate {
    pub fine: Balance,
    pub days_late: i64,
    pub cycle_day: i64,
}

/// Computes the penalty owed for a late rent payment.
///
/// Pure, total and deterministic: the same three dates always produce the
/// same estimate, so the read-only display path and the authoritative
/// payment path can never disagree. Inputs are calendar dates; time-of-day
/// is never significant.
///
/// The escalation doubles per late day with no cap: 1 day late owes 100,
/// 2 days 200, 3 days 400, and so on.
pub fn estimate(due_date: NaiveDate, last_payment_date: NaiveDate, today: NaiveDate) -> FineEstimate {
    // Paid on or after the due date: the cycle is settled, nothing owed.
    if last_payment_date >= due_date {
        return FineEstimate {
            fine: Balance::ZERO,
            days_late: 0,
            cycle_day: 0,
        };
    }

    // Due date not yet passed. The due date itself never accrues a fine.
    if today <= due_date {
        return FineEstimate {
            fine: Balance::ZERO,
            days_late: 0,
            cycle_day: 1,
        };
    }

    let days_late = (today - due_date).num_days();
    FineEstimate {
        fine: escalated_fine(days_late),
        days_late,
        cycle_day: days_late + 1,
    }
}

/// 100 for the first late day, doubling every further day. Saturates at the
/// representable maximum so the calculator stays total.
fn escalated_fine(days_late: i64) -> Balance {
    let mut fine = Balance::new(dec!(100));
    for _ in 1..days_late {
        fine = fine.saturating_double();
        if fine == Balance::MAX {
            break;
        }
    }
    fine
}
