//! This file defines a recurring subscription entry.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::models::{DatabaseID, UserID};

/// A recurring payment the user wants to keep an eye on.
///
/// Subscriptions are independent of the category aggregate: they are recorded
/// and summed for a monthly total display, nothing more.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// The ID of the subscription.
    pub id: DatabaseID,
    /// The ID of the user that recorded the subscription.
    pub user_id: UserID,
    /// The display name of the subscription.
    pub name: String,
    /// The amount charged per billing cycle. Always greater than zero.
    pub amount: f64,
    /// The next (or reference) billing date.
    pub date: Date,
    /// An opaque reference to an icon image, if any.
    pub icon_ref: Option<String>,
    /// When the subscription record was created.
    pub created_at: OffsetDateTime,
}

/// Sum the amounts of the given subscriptions for the monthly total display.
pub fn monthly_total(subscriptions: &[Subscription]) -> f64 {
    subscriptions
        .iter()
        .map(|subscription| subscription.amount)
        .sum()
}
