//! Defines the user store trait.

use crate::{
    Error,
    models::{PasswordHash, User, UserID, Username},
};

/// Handles the creation and retrieval of users.
pub trait UserStore {
    /// Insert a new user with a caller-chosen ID into the store.
    ///
    /// Implementations must reject a duplicate username with
    /// [Error::UsernameTaken].
    fn create(&mut self, user: User) -> Result<User, Error>;

    /// Get a user by their ID.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Get the user matching the `(username, password_hash)` pair, or
    /// [Error::NotFound] if no user matches.
    fn get_by_credentials(
        &self,
        username: &Username,
        password_hash: &PasswordHash,
    ) -> Result<User, Error>;

    /// Delete a user and, through the store's foreign keys, everything the
    /// user owns. Returns false if the user was not found.
    fn delete(&mut self, id: UserID) -> Result<bool, Error>;
}
