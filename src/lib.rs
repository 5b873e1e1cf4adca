//! Pocketledger is the bookkeeping core of a personal finance tracker.
//!
//! Users own accounts, and record income and expenses against them as
//! transactions. Each account carries a materialized `balance` that must
//! always equal its initial balance plus the signed sum of every transaction
//! still on record for it. This crate owns that mechanism:
//!
//! - The [account ledger](stores::AccountStore) holds accounts and exposes
//!   atomic balance reads and adjustments.
//! - The [transaction log](stores::TransactionStore) holds the signed entries
//!   and knows nothing about balances.
//! - The [posting] module ties the two together: every create, delete or
//!   amend of a transaction goes through a fixed balance-then-log write
//!   sequence so the materialized balance tracks the log.
//!
//! The two writes are issued against independent stores with no shared
//! transaction boundary. When the second write fails after the first has
//! succeeded, the posting surfaces [Error::PartialFailure] so callers can
//! warn the user that the balance may be out of sync instead of reporting a
//! generic error.
//!
//! Authentication, HTTP routing, budgets and reporting live outside this
//! crate. Callers pass in the [UserId](models::UserId) issued by the auth
//! layer; every operation checks ownership and answers [Error::NotFound] for
//! rows belonging to anyone else.

#![warn(missing_docs)]

mod database_id;
mod db;
mod error;
pub mod models;
pub mod posting;
pub mod stores;

pub use database_id::{AccountId, DatabaseId, TransactionId};
pub use db::initialize;
pub use error::Error;
