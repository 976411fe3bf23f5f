//! Defines the subscription store trait.

use crate::{
    Error,
    models::{DatabaseID, Subscription, UserID},
};

/// Handles the creation and retrieval of subscriptions.
pub trait SubscriptionStore {
    /// Insert a new subscription with a caller-chosen ID into the store.
    fn create(&mut self, subscription: Subscription) -> Result<Subscription, Error>;

    /// Get a subscription by its ID, scoped to `user_id`.
    fn get(&self, subscription_id: DatabaseID, user_id: UserID) -> Result<Subscription, Error>;

    /// Get all subscriptions for a given user.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Subscription>, Error>;

    /// Replace a subscription's fields wholesale. Returns false if the
    /// subscription was not found.
    fn update(&mut self, subscription: Subscription) -> Result<bool, Error>;

    /// Delete a subscription. Returns false if the subscription was not
    /// found.
    fn delete(&mut self, subscription_id: DatabaseID, user_id: UserID) -> Result<bool, Error>;
}
