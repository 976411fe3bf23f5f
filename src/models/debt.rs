//! This file defines a debt entry with its total, what has been paid so far,
//! and a due date.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::models::{DatabaseID, UserID};

/// Money owed by the user, tracked towards a due date.
///
/// `outstanding` and `paid_ratio` are presentational derivations recomputed
/// on read, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    /// The ID of the debt.
    pub id: DatabaseID,
    /// The ID of the user that owes the debt.
    pub user_id: UserID,
    /// The display name of the debt.
    pub name: String,
    /// The full amount owed.
    pub total_amount: f64,
    /// The amount paid off so far.
    pub paid_amount: f64,
    /// When the debt is due.
    pub due_date: Date,
    /// When the debt record was created.
    pub created_at: OffsetDateTime,
}

impl Debt {
    /// The amount still owed, floored at zero.
    pub fn outstanding(&self) -> f64 {
        (self.total_amount - self.paid_amount).max(0.0)
    }

    /// The fraction paid off, clamped to `[0, 1]`. Zero when the total is
    /// zero or negative.
    pub fn paid_ratio(&self) -> f64 {
        if self.total_amount <= 0.0 {
            0.0
        } else {
            (self.paid_amount / self.total_amount).clamp(0.0, 1.0)
        }
    }
}

#[cfg(test)]
mod debt_tests {
    use time::{OffsetDateTime, macros::date};

    use crate::models::{Debt, UserID};

    fn debt(total_amount: f64, paid_amount: f64) -> Debt {
        Debt {
            id: 1,
            user_id: UserID::new(1),
            name: "Car loan".to_owned(),
            total_amount,
            paid_amount,
            due_date: date!(2026 - 01 - 31),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn outstanding_is_total_minus_paid() {
        assert_eq!(debt(1000.0, 250.0).outstanding(), 750.0);
    }

    #[test]
    fn outstanding_is_floored_at_zero_when_overpaid() {
        assert_eq!(debt(1000.0, 1200.0).outstanding(), 0.0);
    }

    #[test]
    fn paid_ratio_is_fraction_of_total() {
        assert_eq!(debt(1000.0, 250.0).paid_ratio(), 0.25);
    }

    #[test]
    fn paid_ratio_is_clamped_to_one_when_overpaid() {
        assert_eq!(debt(1000.0, 1200.0).paid_ratio(), 1.0);
    }

    #[test]
    fn paid_ratio_is_zero_for_zero_total() {
        assert_eq!(debt(0.0, 50.0).paid_ratio(), 0.0);
    }
}
