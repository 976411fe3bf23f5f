//! Defines the debt store trait.

use crate::{
    Error,
    models::{DatabaseID, Debt, UserID},
};

/// Handles the creation and retrieval of debts.
pub trait DebtStore {
    /// Insert a new debt with a caller-chosen ID into the store.
    fn create(&mut self, debt: Debt) -> Result<Debt, Error>;

    /// Get a debt by its ID, scoped to `user_id`.
    fn get(&self, debt_id: DatabaseID, user_id: UserID) -> Result<Debt, Error>;

    /// Get all debts for a given user.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Debt>, Error>;

    /// Replace a debt's fields wholesale. Returns false if the debt was not
    /// found.
    fn update(&mut self, debt: Debt) -> Result<bool, Error>;

    /// Delete a debt. Returns false if the debt was not found.
    fn delete(&mut self, debt_id: DatabaseID, user_id: UserID) -> Result<bool, Error>;
}
