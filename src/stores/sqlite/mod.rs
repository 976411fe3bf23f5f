//! SQLite-backed implementations of the store traits.
//!
//! Each store holds a clone of the same `Arc<Mutex<Connection>>`, so the
//! whole per-user data set lives in one database file and the ledger store
//! can wrap multi-table operations in a single SQL transaction.

mod category;
mod debt;
mod expense;
mod ledger;
mod subscription;
mod user;

pub use category::SQLiteCategoryStore;
pub use debt::SQLiteDebtStore;
pub use expense::SQLiteExpenseStore;
pub use ledger::SQLiteLedgerStore;
pub use subscription::SQLiteSubscriptionStore;
pub use user::SQLiteUserStore;
