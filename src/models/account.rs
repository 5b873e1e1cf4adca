//! Defines an account and its supporting types.

use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::AccountId, models::UserId};

/// The kind of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountKind {
    /// An everyday cheque/current account.
    Current,
    /// A savings account.
    Savings,
}

impl Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountKind::Current => write!(f, "CURRENT"),
            AccountKind::Savings => write!(f, "SAVINGS"),
        }
    }
}

impl FromStr for AccountKind {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "CURRENT" => Ok(AccountKind::Current),
            "SAVINGS" => Ok(AccountKind::Savings),
            other => Err(Error::UnknownKind(other.to_owned())),
        }
    }
}

/// A named monetary bucket owned by a user.
///
/// `balance` is a materialized aggregate, not a value computed from the
/// transaction log on read: it is expected to equal the initial balance the
/// account was created with plus the signed sum of every transaction
/// currently recorded against the account. The [posting](crate::posting)
/// module maintains that equality; writing the balance through any other path
/// resets the baseline instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The ID of the account.
    pub id: AccountId,
    /// The user that owns the account.
    pub user_id: UserId,
    /// The display name of the account.
    pub name: String,
    /// The kind of account.
    pub kind: AccountKind,
    /// The current balance in dollars.
    pub balance: Decimal,
    /// Whether the client should preselect this account in forms.
    pub is_default: bool,
}

/// The fields needed to create a new [Account].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAccount {
    /// The display name of the account. Must not be empty.
    pub name: String,
    /// The kind of account.
    pub kind: AccountKind,
    /// The starting balance in dollars. Must not be negative.
    pub balance: Decimal,
    /// Whether the client should preselect this account in forms.
    pub is_default: bool,
}

#[cfg(test)]
mod account_kind_tests {
    use std::str::FromStr;

    use crate::Error;

    use super::AccountKind;

    #[test]
    fn parses_known_kinds() {
        assert_eq!(Ok(AccountKind::Current), AccountKind::from_str("CURRENT"));
        assert_eq!(Ok(AccountKind::Savings), AccountKind::from_str("SAVINGS"));
    }

    #[test]
    fn rejects_unknown_kind() {
        assert_eq!(
            Err(Error::UnknownKind("CHEQUE".to_owned())),
            AccountKind::from_str("CHEQUE")
        );
    }

    #[test]
    fn display_round_trips() {
        for kind in [AccountKind::Current, AccountKind::Savings] {
            assert_eq!(Ok(kind), AccountKind::from_str(&kind.to_string()));
        }
    }
}
