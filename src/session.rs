//! Process-local record of who is signed in.

use std::sync::Mutex;

use crate::models::UserID;

/// Holds the currently signed-in user, if any.
///
/// A `Session` is an explicit object injected into whatever front end needs
/// "the current user", not a process-wide global. It has no influence on the
/// core: the stores and the ledger engine always take the acting `UserID` as
/// a parameter. When an operation fails with
/// [Error::MissingUser](crate::Error::MissingUser), the caller should
/// [log_out](Session::log_out) and force re-authentication.
#[derive(Debug, Default)]
pub struct Session {
    current_user: Mutex<Option<UserID>>,
}

impl Session {
    /// Create an empty session with nobody signed in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `user_id` as the signed-in user.
    ///
    /// # Panics
    /// Panics if the session lock is poisoned.
    pub fn log_in(&self, user_id: UserID) {
        *self.current_user.lock().unwrap() = Some(user_id);
    }

    /// The currently signed-in user, or `None` if nobody is signed in.
    ///
    /// # Panics
    /// Panics if the session lock is poisoned.
    pub fn current_user(&self) -> Option<UserID> {
        *self.current_user.lock().unwrap()
    }

    /// Clear the session.
    ///
    /// # Panics
    /// Panics if the session lock is poisoned.
    pub fn log_out(&self) {
        *self.current_user.lock().unwrap() = None;
    }
}

#[cfg(test)]
mod session_tests {
    use crate::models::UserID;

    use super::Session;

    #[test]
    fn new_session_has_no_user() {
        assert_eq!(Session::new().current_user(), None);
    }

    #[test]
    fn log_in_records_the_user() {
        let session = Session::new();

        session.log_in(UserID::new(42));

        assert_eq!(session.current_user(), Some(UserID::new(42)));
    }

    #[test]
    fn log_out_clears_the_user() {
        let session = Session::new();
        session.log_in(UserID::new(42));

        session.log_out();

        assert_eq!(session.current_user(), None);
    }
}
