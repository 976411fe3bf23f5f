//! Contains traits and implementations for objects that store the domain
//! [models](crate::models).

mod category;
mod debt;
mod expense;
mod ledger;
mod subscription;
mod user;

pub mod sqlite;

pub use category::CategoryStore;
pub use debt::DebtStore;
pub use expense::ExpenseStore;
pub use ledger::LedgerStore;
pub use subscription::SubscriptionStore;
pub use user::UserStore;
