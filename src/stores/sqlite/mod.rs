//! SQLite backed implementations of the store traits.
//!
//! Both stores share one connection behind an `Arc<Mutex<..>>`: SQLite only
//! allows one writer at a time, and the shared lock serialises store calls
//! from concurrent requests. Note that sharing a connection does *not* make a
//! balance write and a log write atomic with each other; those are still two
//! independent store calls.

mod account;
mod transaction;

pub use account::{SQLiteAccountStore, create_account_table, map_account_row};
pub use transaction::{SQLiteTransactionStore, create_transaction_table, map_transaction_row};

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize};

/// Create the account and transaction stores backed by `connection`.
///
/// This function will modify the database by adding the tables for the domain
/// models.
pub fn create_sqlite_stores(
    connection: Connection,
) -> Result<(SQLiteAccountStore, SQLiteTransactionStore), Error> {
    initialize(&connection)?;

    let connection = Arc::new(Mutex::new(connection));

    Ok((
        SQLiteAccountStore::new(connection.clone()),
        SQLiteTransactionStore::new(connection),
    ))
}

/// Build a `rusqlite::Error` for a TEXT column holding a value the domain
/// model cannot represent.
fn invalid_text_column(index: usize, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        index,
        rusqlite::types::Type::Text,
        format!("unrecognised value \"{value}\"").into(),
    )
}
