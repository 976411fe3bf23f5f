//! Registration and authentication of user accounts.

use crate::{
    Error, IdGenerator,
    models::{PasswordHash, User, UserID, Username},
    stores::UserStore,
};

/// How many times registration will regenerate a user ID that turned out to
/// be taken before giving up.
const MAX_ID_ATTEMPTS: u32 = 8;

/// Registers and authenticates users against a [UserStore].
#[derive(Debug, Clone)]
pub struct Authenticator<S> {
    store: S,
    ids: IdGenerator,
}

impl<S: UserStore> Authenticator<S> {
    /// Create an authenticator over the given user store.
    pub fn new(store: S) -> Self {
        Self {
            store,
            ids: IdGenerator::new(),
        }
    }

    /// Register a new user and return their ID.
    ///
    /// The username must be globally unique (case-sensitive). The new user's
    /// ID is generated, verified unused in the store, and regenerated on
    /// collision, so the returned ID is guaranteed to identify this user.
    ///
    /// # Errors
    /// Returns [Error::UsernameTaken] if the username is already in use,
    /// [Error::EmptyName] if the username is empty, or an [Error::SqlError]
    /// for unexpected store failures.
    pub fn register(&mut self, username: &str, password: &str) -> Result<UserID, Error> {
        let username = Username::new(username)?;
        let password_hash = PasswordHash::from_raw_password(password);

        // IDs are only probabilistically unique, so verify against the store
        // and retry on the (vanishingly rare) collision.
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = UserID::new(self.ids.generate());

            match self.store.get(id) {
                Ok(_) => continue,
                Err(Error::NotFound) => {}
                Err(error) => return Err(error),
            }

            let user = self
                .store
                .create(User::new(id, username.clone(), password_hash.clone()))?;
            tracing::info!("registered user {} as {}", user.username(), user.id());

            return Ok(user.id());
        }

        tracing::error!("exhausted {MAX_ID_ATTEMPTS} attempts to generate an unused user ID");
        Err(Error::StorageUnavailable(
            "could not allocate a unique user ID".to_string(),
        ))
    }

    /// Authenticate a user by username and password.
    ///
    /// Returns the matching user's ID, or `None` when no user matches the
    /// `(username, password digest)` pair. No lockout or backoff is applied
    /// here; that is a deployment concern.
    ///
    /// # Errors
    /// This function will return an error if the store fails.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<UserID>, Error> {
        let username = Username::new_unchecked(username);
        let password_hash = PasswordHash::from_raw_password(password);

        match self.store.get_by_credentials(&username, &password_hash) {
            Ok(user) => Ok(Some(user.id())),
            Err(Error::NotFound) => {
                tracing::debug!("authentication failed for {username}");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }
}
