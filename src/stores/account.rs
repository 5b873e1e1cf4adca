//! Defines the account store trait, the ledger side of the bookkeeping core.

use rust_decimal::Decimal;

use crate::{
    Error,
    database_id::AccountId,
    models::{Account, NewAccount, UserId},
};

/// Handles the creation and retrieval of accounts and owns every write to the
/// materialized `balance` field.
///
/// Every method takes the ID of the calling user and only ever touches rows
/// owned by that user; rows owned by anyone else answer [Error::NotFound].
pub trait AccountStore {
    /// Create a new account for `owner` with the given starting balance.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyAccountName] if the name is empty,
    /// - [Error::NegativeInitialBalance] if the starting balance is below zero,
    /// - [Error::SqlError] if there is an unexpected SQL error.
    fn create(&mut self, owner: UserId, new_account: NewAccount) -> Result<Account, Error>;

    /// Retrieve the account with `id`, if it exists and belongs to `owner`.
    fn get(&self, id: AccountId, owner: UserId) -> Result<Account, Error>;

    /// Retrieve all accounts owned by `owner`, in no particular order.
    fn get_all(&self, owner: UserId) -> Result<Vec<Account>, Error>;

    /// Overwrite the balance of the account with `id`.
    ///
    /// This is the raw balance edit: it does not consult the transaction log
    /// and effectively resets the baseline the log's entries accumulate on
    /// top of. Postings never use this; they go through
    /// [adjust_balance](AccountStore::adjust_balance).
    fn set_balance(
        &mut self,
        id: AccountId,
        owner: UserId,
        balance: Decimal,
    ) -> Result<Account, Error>;

    /// Atomically add the signed `delta` to the balance of the account with
    /// `id`, returning the account with its new balance.
    ///
    /// The read-add-write happens inside a single store-level transaction, so
    /// two concurrent adjustments against the same account both land; neither
    /// overwrites the other's result.
    fn adjust_balance(
        &mut self,
        id: AccountId,
        owner: UserId,
        delta: Decimal,
    ) -> Result<Account, Error>;

    /// Delete the account with `id` along with every transaction recorded
    /// against it.
    ///
    /// The cascade happens within this store's backing database in a single
    /// operation, so the account and its history disappear together.
    fn delete(&mut self, id: AccountId, owner: UserId) -> Result<(), Error>;
}
