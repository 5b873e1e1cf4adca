//! Contains traits and implementations for objects that store the domain
//! [models](crate::models).
//!
//! The account ledger and the transaction log are deliberately independent
//! stores: neither knows about the other, and nothing here spans both in one
//! transaction. Keeping each side consistent with the other is the job of the
//! [posting](crate::posting) module.

mod account;
mod transaction;

pub mod sqlite;

pub use account::AccountStore;
pub use transaction::TransactionStore;
