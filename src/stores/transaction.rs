//! Defines the transaction store trait, the log side of the bookkeeping core.

use crate::{
    Error,
    database_id::{AccountId, TransactionId},
    models::{NewTransaction, Transaction, TransactionUpdate, UserId},
};

/// Handles the creation and retrieval of transactions.
///
/// The store records entries and nothing more: it never verifies or adjusts
/// account balances. Callers that change a transaction's contribution to a
/// balance are responsible for reconciling the ledger, which is what the
/// [posting](crate::posting) module does.
pub trait TransactionStore {
    /// Record a new transaction for `owner`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NonPositiveAmount] if the amount is zero or negative,
    /// - [Error::SqlError] if there is an unexpected SQL error.
    fn create(&mut self, owner: UserId, new_transaction: NewTransaction)
    -> Result<Transaction, Error>;

    /// Retrieve the transaction with `id`, if it exists and belongs to
    /// `owner`.
    fn get(&self, id: TransactionId, owner: UserId) -> Result<Transaction, Error>;

    /// Retrieve all transactions owned by `owner`, in no particular order.
    ///
    /// Each call re-reads from the store; two calls with no intervening
    /// mutation return the same set.
    fn get_all(&self, owner: UserId) -> Result<Vec<Transaction>, Error>;

    /// Retrieve all of `owner`'s transactions posted against one account.
    fn get_for_account(&self, account_id: AccountId, owner: UserId)
    -> Result<Vec<Transaction>, Error>;

    /// Overwrite fields of the transaction with `id` in place.
    ///
    /// The update is applied blindly; the previous amount and kind are gone
    /// once this returns. Callers that need them must capture them first.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NonPositiveAmount] if a replacement amount is zero or negative,
    /// - [Error::NotFound] if the transaction is missing or not owned by `owner`,
    /// - [Error::SqlError] if there is an unexpected SQL error.
    fn update(
        &mut self,
        id: TransactionId,
        owner: UserId,
        update: TransactionUpdate,
    ) -> Result<Transaction, Error>;

    /// Remove the transaction with `id` without touching any account balance.
    fn delete(&mut self, id: TransactionId, owner: UserId) -> Result<(), Error>;
}
