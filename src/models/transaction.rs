//! Defines a transaction and its supporting types.

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    database_id::{AccountId, TransactionId},
    models::UserId,
};

/// Whether a transaction brings money into an account or takes money out.
///
/// The kind fixes the sign convention for the whole crate: an income of
/// amount `A` contributes `+A` to the owning account's balance, an expense of
/// amount `A` contributes `-A`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// Money earned, contributes positively to the balance.
    Income,
    /// Money spent, contributes negatively to the balance.
    Expense,
}

impl TransactionKind {
    /// Apply this kind's sign to an unsigned `amount`.
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            TransactionKind::Income => amount,
            TransactionKind::Expense => -amount,
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "INCOME"),
            TransactionKind::Expense => write!(f, "EXPENSE"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "INCOME" => Ok(TransactionKind::Income),
            "EXPENSE" => Ok(TransactionKind::Expense),
            other => Err(Error::UnknownKind(other.to_owned())),
        }
    }
}

/// A single signed monetary entry recorded against exactly one account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that owns the transaction.
    pub user_id: UserId,
    /// The account the transaction is posted against.
    pub account_id: AccountId,
    /// Whether this is an income or an expense.
    pub kind: TransactionKind,
    /// The unsigned amount of money in dollars. Always greater than zero.
    pub amount: Decimal,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
    /// The category of the transaction, e.g. "Groceries", "Rent".
    pub category: String,
}

impl Transaction {
    /// The contribution this transaction makes to its account's balance.
    pub fn signed_amount(&self) -> Decimal {
        self.kind.signed(self.amount)
    }
}

/// The fields needed to record a new [Transaction].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// The account to post the transaction against.
    pub account_id: AccountId,
    /// Whether this is an income or an expense.
    pub kind: TransactionKind,
    /// The unsigned amount of money in dollars. Must be greater than zero.
    pub amount: Decimal,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
    /// The category of the transaction. Must not be empty.
    pub category: String,
}

/// An in-place edit of a [Transaction]. `None` fields are left unchanged.
///
/// Note that the transaction log applies these blindly. Changing `kind` or
/// `amount` changes the transaction's contribution to its account's balance,
/// so those edits must go through
/// [amend_transaction](crate::posting::amend_transaction), which captures the
/// old contribution before it is overwritten and reconciles the balance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionUpdate {
    /// Replace the transaction kind.
    pub kind: Option<TransactionKind>,
    /// Replace the amount. Must be greater than zero when present.
    pub amount: Option<Decimal>,
    /// Replace the description.
    pub description: Option<String>,
    /// Replace the date.
    pub date: Option<Date>,
    /// Replace the category.
    pub category: Option<String>,
}

#[cfg(test)]
mod transaction_kind_tests {
    use std::str::FromStr;

    use rust_decimal_macros::dec;

    use crate::Error;

    use super::TransactionKind;

    #[test]
    fn income_is_positive() {
        assert_eq!(dec!(42.50), TransactionKind::Income.signed(dec!(42.50)));
    }

    #[test]
    fn expense_is_negative() {
        assert_eq!(dec!(-42.50), TransactionKind::Expense.signed(dec!(42.50)));
    }

    #[test]
    fn parses_known_kinds() {
        assert_eq!(
            Ok(TransactionKind::Income),
            TransactionKind::from_str("INCOME")
        );
        assert_eq!(
            Ok(TransactionKind::Expense),
            TransactionKind::from_str("EXPENSE")
        );
    }

    #[test]
    fn rejects_unknown_kind() {
        assert_eq!(
            Err(Error::UnknownKind("TRANSFER".to_owned())),
            TransactionKind::from_str("TRANSFER")
        );
    }

    #[test]
    fn display_round_trips() {
        for kind in [TransactionKind::Income, TransactionKind::Expense] {
            assert_eq!(Ok(kind), TransactionKind::from_str(&kind.to_string()));
        }
    }
}
