//! Spendtrack is a personal finance tracker core: per-user budget categories,
//! expenses, subscriptions, and debts backed by a SQLite database.
//!
//! The centrepiece is the [Ledger] engine, which keeps each category's
//! `spent_amount` aggregate synchronized with the expense records that
//! reference it. Every expense mutation and the matching aggregate adjustment
//! are applied in a single database transaction, so no caller can observe an
//! expense without its effect on the category total (or vice versa).
//!
//! UI concerns live outside this crate; the CLI binary is a thin consumer of
//! the same public API any front end would use.

#![warn(missing_docs)]

pub mod auth;
pub mod db;
pub mod id;
pub mod ledger;
pub mod models;
pub mod session;
pub mod stores;

pub use auth::Authenticator;
pub use id::IdGenerator;
pub use ledger::Ledger;
pub use session::Session;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested record could not be found.
    ///
    /// This is a recoverable condition: callers should check that the ID is
    /// correct and that the record has been created. Internally, this error
    /// may occur when a query returns no rows.
    #[error("the requested record could not be found")]
    NotFound,

    /// The acting user's own account record is gone (deleted elsewhere, or
    /// the session is stale).
    ///
    /// This is fatal to the current session: callers must clear the session
    /// and force re-authentication rather than retry.
    #[error("your account information could not be found, please sign in again")]
    MissingUser,

    /// The username chosen at registration is already in use.
    ///
    /// Usernames are matched case-sensitively. The caller should retry with a
    /// different name.
    #[error("the username is already taken")]
    UsernameTaken,

    /// An amount that must be strictly positive was zero or negative.
    ///
    /// Expense and subscription amounts record money spent, so zero and
    /// negative values are rejected before anything is written.
    #[error("amount must be greater than zero, got {0}")]
    NonPositiveAmount(f64),

    /// An empty string was used where a name is required.
    #[error("name cannot be empty")]
    EmptyName,

    /// The backing store is temporarily unavailable (the database is busy or
    /// locked by another writer).
    ///
    /// The core performs no automatic retry; it is the caller's decision
    /// whether to retry or surface the failure.
    #[error("the store is temporarily unavailable: {0}")]
    StorageUnavailable(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("username") =>
            {
                Error::UsernameTaken
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if matches!(
                    sql_error.code,
                    rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
                ) =>
            {
                Error::StorageUnavailable(desc.clone())
            }
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
