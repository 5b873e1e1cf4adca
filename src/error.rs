//! Defines the crate level error type.

use rust_decimal::Decimal;

use crate::{database_id::AccountId, posting::PostingOperation};

/// The errors that may occur while managing accounts, transactions and
/// balances.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used as an account name.
    #[error("account name cannot be empty")]
    EmptyAccountName,

    /// A negative amount was used as the initial balance for a new account.
    #[error("{0} is not a valid initial balance, accounts must start at zero or above")]
    NegativeInitialBalance(Decimal),

    /// A zero or negative amount was used for a transaction.
    ///
    /// Transaction amounts are unsigned magnitudes. The direction of the
    /// money flow is carried by the transaction kind, not by the sign of the
    /// amount.
    #[error("{0} is not a valid transaction amount, amounts must be greater than zero")]
    NonPositiveAmount(Decimal),

    /// An empty string was used as a transaction category.
    #[error("transaction category cannot be empty")]
    EmptyCategory,

    /// A string that is neither `INCOME` nor `EXPENSE` was used as a
    /// transaction kind, or a string that is neither `CURRENT` nor `SAVINGS`
    /// was used as an account kind.
    #[error("\"{0}\" is not a recognised kind")]
    UnknownKind(String),

    /// A monetary column in the database could not be parsed as a decimal.
    ///
    /// This only happens when a row was written by something other than this
    /// crate; amounts are stored as decimal strings.
    #[error("could not parse stored amount \"{0}\" as a decimal")]
    InvalidDecimal(String),

    /// The requested account or transaction is missing, or is owned by a
    /// different user.
    ///
    /// Ownership failures deliberately answer the same way as missing rows so
    /// that one user cannot probe for the existence of another user's data.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The balance write of a posting succeeded but the transaction log write
    /// failed.
    ///
    /// The account balance no longer matches the transaction log: it is off
    /// by exactly `applied_delta`. There is no automatic compensation; the
    /// caller should tell the user their balance may be out of sync and
    /// either retry the log half of the operation or correct the balance by
    /// hand.
    #[error(
        "{operation} posting against account {account_id}: the balance was adjusted by \
        {applied_delta} but the transaction log write failed: {source}"
    )]
    PartialFailure {
        /// Which posting flow was interrupted.
        operation: PostingOperation,
        /// The account whose balance was already adjusted.
        account_id: AccountId,
        /// The signed delta that was applied to the balance before the
        /// failure.
        applied_delta: Decimal,
        /// The error returned by the transaction log.
        source: Box<Error>,
    },

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl Error {
    /// Whether this error means the caller supplied malformed input.
    ///
    /// Validation errors never mutate state and are always recoverable by
    /// correcting the input and trying again.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::EmptyAccountName
                | Error::NegativeInitialBalance(_)
                | Error::NonPositiveAmount(_)
                | Error::EmptyCategory
                | Error::UnknownKind(_)
        )
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}
