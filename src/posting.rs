//! Keeps account balances synchronized with the transaction log.
//!
//! Every user action that touches the transaction log also changes the
//! owning account's materialized balance, and the two live in independent
//! stores. This module is the only place with cross-store knowledge: each
//! operation runs a fixed two-write sequence, balance first, log second,
//! with no rollback phase.
//!
//! A posting moves through `Idle -> BalanceWritten -> Committed` when both
//! writes succeed. If the log write fails after the balance write, the
//! posting ends in a failed state where the balance no longer matches the
//! log. There is no automatic transition out of that state: the error is
//! surfaced as [Error::PartialFailure] with the delta that was applied, and
//! recovery is an out-of-band corrective write (retry the log half, or reset
//! the balance through [AccountStore::set_balance]).
//!
//! The ledger write itself uses [AccountStore::adjust_balance] rather than
//! read-compute-overwrite, so two concurrent postings against one account
//! both land instead of the later one clobbering the earlier one's balance.

use std::fmt::Display;

use rust_decimal::Decimal;

use crate::{
    Error,
    database_id::{AccountId, TransactionId},
    models::{Account, NewTransaction, Transaction, TransactionUpdate, UserId},
    stores::{AccountStore, TransactionStore},
};

/// Which posting flow a [partial failure](Error::PartialFailure) interrupted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostingOperation {
    /// Recording a new transaction.
    Post,
    /// Removing a transaction and undoing its contribution.
    Reverse,
    /// Editing a transaction's contribution in place.
    Amend,
}

impl Display for PostingOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostingOperation::Post => write!(f, "post"),
            PostingOperation::Reverse => write!(f, "reverse"),
            PostingOperation::Amend => write!(f, "amend"),
        }
    }
}

/// The outcome of a successful posting: the transaction as recorded in the
/// log, and the account with the balance it ended up at.
#[derive(Debug, Clone, PartialEq)]
pub struct Posted {
    /// The transaction as recorded in the log.
    pub transaction: Transaction,
    /// The owning account, with its adjusted balance.
    pub account: Account,
}

/// Record a new transaction for `owner` and apply its contribution to the
/// owning account's balance.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] or [Error::EmptyCategory] if the input is
///   malformed (checked before any write),
/// - [Error::NotFound] if the account is missing or not owned by `owner`
///   (the posting aborts before any write),
/// - [Error::PartialFailure] if the balance was adjusted but the log write
///   failed.
pub fn post_transaction<A, T>(
    accounts: &mut A,
    transactions: &mut T,
    owner: UserId,
    new_transaction: NewTransaction,
) -> Result<Posted, Error>
where
    A: AccountStore,
    T: TransactionStore,
{
    if new_transaction.amount <= Decimal::ZERO {
        return Err(Error::NonPositiveAmount(new_transaction.amount));
    }

    if new_transaction.category.trim().is_empty() {
        return Err(Error::EmptyCategory);
    }

    let delta = new_transaction.kind.signed(new_transaction.amount);
    let account_id = new_transaction.account_id;

    let (account, transaction) =
        balance_then_log(accounts, owner, account_id, delta, PostingOperation::Post, || {
            transactions.create(owner, new_transaction)
        })?;

    Ok(Posted {
        transaction,
        account,
    })
}

/// Remove the transaction with `id`, undoing its contribution to the owning
/// account's balance. Returns the account with its restored balance.
///
/// The reversing delta is exactly the negation of the delta applied when the
/// transaction was posted, so posting and immediately reversing leaves the
/// balance bit-for-bit where it started.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if the transaction (or its account) is missing or not
///   owned by `owner` (the posting aborts before any write),
/// - [Error::PartialFailure] if the balance was adjusted but the log delete
///   failed. The transaction is still on record at that point and reversing
///   it again would double-count, so the error must not be retried blindly.
pub fn reverse_transaction<A, T>(
    accounts: &mut A,
    transactions: &mut T,
    owner: UserId,
    id: TransactionId,
) -> Result<Account, Error>
where
    A: AccountStore,
    T: TransactionStore,
{
    let transaction = transactions.get(id, owner)?;
    let reverse_delta = -transaction.signed_amount();

    let (account, ()) = balance_then_log(
        accounts,
        owner,
        transaction.account_id,
        reverse_delta,
        PostingOperation::Reverse,
        || transactions.delete(id, owner),
    )?;

    Ok(account)
}

/// Edit the transaction with `id` in place.
///
/// Edits that change the transaction's contribution (`kind` or `amount`) are
/// treated as reverse-then-apply: the old contribution is captured before the
/// log overwrites it, its negation and the new contribution are combined into
/// one ledger adjustment, and only then is the log row updated. A blind field
/// overwrite would silently detach the balance from the log.
///
/// Edits that leave the contribution unchanged (description, date, category)
/// take the simple-update path with no balance side effect.
///
/// # Errors
/// This function will return a:
/// - [Error::NonPositiveAmount] or [Error::EmptyCategory] if the input is
///   malformed (checked before any write),
/// - [Error::NotFound] if the transaction is missing or not owned by `owner`,
/// - [Error::PartialFailure] if the balance was adjusted but the log update
///   failed.
pub fn amend_transaction<A, T>(
    accounts: &mut A,
    transactions: &mut T,
    owner: UserId,
    id: TransactionId,
    update: TransactionUpdate,
) -> Result<Posted, Error>
where
    A: AccountStore,
    T: TransactionStore,
{
    if let Some(amount) = update.amount {
        if amount <= Decimal::ZERO {
            return Err(Error::NonPositiveAmount(amount));
        }
    }

    if let Some(category) = &update.category {
        if category.trim().is_empty() {
            return Err(Error::EmptyCategory);
        }
    }

    // Capture the old contribution before the log overwrites it; the log has
    // no memory of the previous amount once updated.
    let existing = transactions.get(id, owner)?;
    let reversal = -existing.signed_amount();
    let application = update
        .kind
        .unwrap_or(existing.kind)
        .signed(update.amount.unwrap_or(existing.amount));
    let net_delta = reversal + application;

    if net_delta == Decimal::ZERO {
        let transaction = transactions.update(id, owner, update)?;
        let account = accounts.get(transaction.account_id, owner)?;

        return Ok(Posted {
            transaction,
            account,
        });
    }

    let account_id = existing.account_id;
    let (account, transaction) = balance_then_log(
        accounts,
        owner,
        account_id,
        net_delta,
        PostingOperation::Amend,
        || transactions.update(id, owner, update),
    )?;

    Ok(Posted {
        transaction,
        account,
    })
}

/// The two-phase write sequence every posting runs: adjust the account
/// balance, then mutate the transaction log.
///
/// A failure in the first phase leaves both stores untouched and propagates
/// as-is. A failure in the second phase is wrapped in
/// [Error::PartialFailure], because at that point the balance has been
/// adjusted with nothing in the log to justify it.
fn balance_then_log<A, F, R>(
    accounts: &mut A,
    owner: UserId,
    account_id: AccountId,
    delta: Decimal,
    operation: PostingOperation,
    log_write: F,
) -> Result<(Account, R), Error>
where
    A: AccountStore,
    F: FnOnce() -> Result<R, Error>,
{
    let account = accounts.adjust_balance(account_id, owner, delta)?;

    match log_write() {
        Ok(result) => Ok((account, result)),
        Err(source) => {
            tracing::error!(
                "{operation} posting against account {account_id} left an inconsistent balance: \
                the balance was adjusted by {delta} but the transaction log write failed: {source}"
            );

            Err(Error::PartialFailure {
                operation,
                account_id,
                applied_delta: delta,
                source: Box::new(source),
            })
        }
    }
}
