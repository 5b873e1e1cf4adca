//! Implements a SQLite backed transaction store.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, Row};
use rust_decimal::Decimal;

use crate::{
    Error,
    database_id::{AccountId, TransactionId},
    models::{NewTransaction, Transaction, TransactionKind, TransactionUpdate, UserId},
    stores::{TransactionStore, sqlite::invalid_text_column},
};

/// Stores transactions in a SQLite database.
///
/// The `account_id` column is a foreign key into the account table with a
/// delete cascade, so the account table must be set up on the same database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    fn create(
        &mut self,
        owner: UserId,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        if new_transaction.amount <= Decimal::ZERO {
            return Err(Error::NonPositiveAmount(new_transaction.amount));
        }

        let connection = self.connection.lock().map_err(|_| Error::DatabaseLockError)?;

        let transaction = connection
            .prepare(
                "INSERT INTO \"transaction\"
                 (user_id, account_id, kind, amount, description, date, category)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 RETURNING id, user_id, account_id, kind, amount, description, date, category",
            )?
            .query_row(
                (
                    owner.as_i64(),
                    new_transaction.account_id,
                    new_transaction.kind.to_string(),
                    new_transaction.amount.to_string(),
                    &new_transaction.description,
                    new_transaction.date,
                    &new_transaction.category,
                ),
                map_transaction_row,
            )?;

        Ok(transaction)
    }

    fn get(&self, id: TransactionId, owner: UserId) -> Result<Transaction, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLockError)?;

        let transaction = connection
            .prepare(
                "SELECT id, user_id, account_id, kind, amount, description, date, category
                 FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
            )?
            .query_row((id, owner.as_i64()), map_transaction_row)?;

        Ok(transaction)
    }

    fn get_all(&self, owner: UserId) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(
                "SELECT id, user_id, account_id, kind, amount, description, date, category
                 FROM \"transaction\" WHERE user_id = ?1",
            )?
            .query_map((owner.as_i64(),), map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
            .collect()
    }

    fn get_for_account(
        &self,
        account_id: AccountId,
        owner: UserId,
    ) -> Result<Vec<Transaction>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(
                "SELECT id, user_id, account_id, kind, amount, description, date, category
                 FROM \"transaction\" WHERE account_id = ?1 AND user_id = ?2",
            )?
            .query_map((account_id, owner.as_i64()), map_transaction_row)?
            .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
            .collect()
    }

    fn update(
        &mut self,
        id: TransactionId,
        owner: UserId,
        update: TransactionUpdate,
    ) -> Result<Transaction, Error> {
        if let Some(amount) = update.amount {
            if amount <= Decimal::ZERO {
                return Err(Error::NonPositiveAmount(amount));
            }
        }

        let connection = self.connection.lock().map_err(|_| Error::DatabaseLockError)?;
        let sql_transaction = connection.unchecked_transaction()?;

        let existing = sql_transaction
            .prepare(
                "SELECT id, user_id, account_id, kind, amount, description, date, category
                 FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
            )?
            .query_row((id, owner.as_i64()), map_transaction_row)?;

        let updated = Transaction {
            kind: update.kind.unwrap_or(existing.kind),
            amount: update.amount.unwrap_or(existing.amount),
            description: update.description.unwrap_or(existing.description),
            date: update.date.unwrap_or(existing.date),
            category: update.category.unwrap_or(existing.category),
            ..existing
        };

        sql_transaction.execute(
            "UPDATE \"transaction\"
             SET kind = ?1, amount = ?2, description = ?3, date = ?4, category = ?5
             WHERE id = ?6 AND user_id = ?7",
            (
                updated.kind.to_string(),
                updated.amount.to_string(),
                &updated.description,
                updated.date,
                &updated.category,
                id,
                owner.as_i64(),
            ),
        )?;

        sql_transaction.commit()?;

        Ok(updated)
    }

    fn delete(&mut self, id: TransactionId, owner: UserId) -> Result<(), Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLockError)?;

        let rows_deleted = connection.execute(
            "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
            (id, owner.as_i64()),
        )?;

        if rows_deleted == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

/// Create the transaction table in the database.
///
/// The account table must exist before this is called; the foreign key on
/// `account_id` cascades account deletion to the transactions recorded
/// against it.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                account_id INTEGER NOT NULL,
                kind TEXT NOT NULL,
                amount TEXT NOT NULL,
                description TEXT NOT NULL,
                date TEXT NOT NULL,
                category TEXT NOT NULL,
                FOREIGN KEY(account_id) REFERENCES account(id) ON DELETE CASCADE
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_account ON \"transaction\"(account_id);",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user ON \"transaction\"(user_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [Transaction].
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserId::new(row.get(1)?);
    let account_id = row.get(2)?;

    let kind_text: String = row.get(3)?;
    let kind =
        TransactionKind::from_str(&kind_text).map_err(|_| invalid_text_column(3, &kind_text))?;

    let amount_text: String = row.get(4)?;
    let amount =
        Decimal::from_str(&amount_text).map_err(|_| invalid_text_column(4, &amount_text))?;

    let description = row.get(5)?;
    let date = row.get(6)?;
    let category = row.get(7)?;

    Ok(Transaction {
        id,
        user_id,
        account_id,
        kind,
        amount,
        description,
        date,
        category,
    })
}
