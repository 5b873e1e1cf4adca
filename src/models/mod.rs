//! The domain models: accounts, transactions and the ID of their owning user.

mod account;
mod transaction;
mod user;

pub use account::{Account, AccountKind, NewAccount};
pub use transaction::{NewTransaction, Transaction, TransactionKind, TransactionUpdate};
pub use user::UserId;
