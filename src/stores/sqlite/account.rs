//! Implements a SQLite backed account store.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, Row};
use rust_decimal::Decimal;

use crate::{
    Error,
    database_id::AccountId,
    models::{Account, AccountKind, NewAccount, UserId},
    stores::{AccountStore, sqlite::invalid_text_column},
};

/// Stores accounts in a SQLite database.
///
/// Balances are stored as decimal strings rather than REAL columns so that
/// monetary accumulation never goes through binary floating point.
#[derive(Debug, Clone)]
pub struct SQLiteAccountStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteAccountStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl AccountStore for SQLiteAccountStore {
    fn create(&mut self, owner: UserId, new_account: NewAccount) -> Result<Account, Error> {
        if new_account.name.trim().is_empty() {
            return Err(Error::EmptyAccountName);
        }

        if new_account.balance < Decimal::ZERO {
            return Err(Error::NegativeInitialBalance(new_account.balance));
        }

        let connection = self.connection.lock().map_err(|_| Error::DatabaseLockError)?;

        let account = connection
            .prepare(
                "INSERT INTO account (user_id, name, kind, balance, is_default)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING id, user_id, name, kind, balance, is_default",
            )?
            .query_row(
                (
                    owner.as_i64(),
                    &new_account.name,
                    new_account.kind.to_string(),
                    new_account.balance.to_string(),
                    new_account.is_default,
                ),
                map_account_row,
            )?;

        Ok(account)
    }

    fn get(&self, id: AccountId, owner: UserId) -> Result<Account, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLockError)?;

        let account = connection
            .prepare(
                "SELECT id, user_id, name, kind, balance, is_default FROM account
                 WHERE id = ?1 AND user_id = ?2",
            )?
            .query_row((id, owner.as_i64()), map_account_row)?;

        Ok(account)
    }

    fn get_all(&self, owner: UserId) -> Result<Vec<Account>, Error> {
        self.connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?
            .prepare(
                "SELECT id, user_id, name, kind, balance, is_default FROM account
                 WHERE user_id = ?1",
            )?
            .query_map((owner.as_i64(),), map_account_row)?
            .map(|maybe_account| maybe_account.map_err(|error| error.into()))
            .collect()
    }

    fn set_balance(
        &mut self,
        id: AccountId,
        owner: UserId,
        balance: Decimal,
    ) -> Result<Account, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLockError)?;

        let account = connection
            .prepare(
                "UPDATE account SET balance = ?1 WHERE id = ?2 AND user_id = ?3
                 RETURNING id, user_id, name, kind, balance, is_default",
            )?
            .query_row((balance.to_string(), id, owner.as_i64()), map_account_row)?;

        Ok(account)
    }

    fn adjust_balance(
        &mut self,
        id: AccountId,
        owner: UserId,
        delta: Decimal,
    ) -> Result<Account, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLockError)?;

        // The read and the write share one SQL transaction (and one lock
        // acquisition), so concurrent adjustments cannot interleave and drop
        // each other's delta.
        let transaction = connection.unchecked_transaction()?;

        let balance_text: String = transaction
            .prepare("SELECT balance FROM account WHERE id = ?1 AND user_id = ?2")?
            .query_row((id, owner.as_i64()), |row| row.get(0))?;
        let balance = Decimal::from_str(&balance_text)
            .map_err(|_| Error::InvalidDecimal(balance_text.clone()))?;

        let account = transaction
            .prepare(
                "UPDATE account SET balance = ?1 WHERE id = ?2 AND user_id = ?3
                 RETURNING id, user_id, name, kind, balance, is_default",
            )?
            .query_row(
                ((balance + delta).to_string(), id, owner.as_i64()),
                map_account_row,
            )?;

        transaction.commit()?;

        Ok(account)
    }

    fn delete(&mut self, id: AccountId, owner: UserId) -> Result<(), Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLockError)?;

        // Transactions referencing the account are removed by the foreign key
        // cascade in the same statement.
        let rows_deleted = connection.execute(
            "DELETE FROM account WHERE id = ?1 AND user_id = ?2",
            (id, owner.as_i64()),
        )?;

        if rows_deleted == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

/// Create the account table in the database.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                kind TEXT NOT NULL,
                balance TEXT NOT NULL,
                is_default INTEGER NOT NULL DEFAULT 0
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_account_user ON account(user_id);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an [Account].
pub fn map_account_row(row: &Row) -> Result<Account, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserId::new(row.get(1)?);
    let name = row.get(2)?;

    let kind_text: String = row.get(3)?;
    let kind = AccountKind::from_str(&kind_text).map_err(|_| invalid_text_column(3, &kind_text))?;

    let balance_text: String = row.get(4)?;
    let balance =
        Decimal::from_str(&balance_text).map_err(|_| invalid_text_column(4, &balance_text))?;

    let is_default = row.get(5)?;

    Ok(Account {
        id,
        user_id,
        name,
        kind,
        balance,
        is_default,
    })
}

#[cfg(test)]
mod sqlite_account_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use rust_decimal_macros::dec;

    use crate::{
        Error,
        db::initialize,
        models::{AccountKind, NewAccount, UserId},
        stores::AccountStore,
    };

    use super::SQLiteAccountStore;

    fn get_test_store() -> SQLiteAccountStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SQLiteAccountStore::new(Arc::new(Mutex::new(connection)))
    }

    fn new_account() -> NewAccount {
        NewAccount {
            name: "Everyday".to_owned(),
            kind: AccountKind::Current,
            balance: dec!(100.00),
            is_default: false,
        }
    }

    #[test]
    fn create_and_get_account() {
        let mut store = get_test_store();
        let owner = UserId::new(1);

        let created = store
            .create(owner, new_account())
            .expect("Could not create account");

        let got = store.get(created.id, owner).expect("Could not get account");

        assert_eq!(created, got);
        assert_eq!(dec!(100.00), got.balance);
        assert_eq!(AccountKind::Current, got.kind);
    }

    #[test]
    fn create_fails_on_empty_name() {
        let mut store = get_test_store();

        let result = store.create(
            UserId::new(1),
            NewAccount {
                name: "  ".to_owned(),
                ..new_account()
            },
        );

        assert_eq!(Err(Error::EmptyAccountName), result);
    }

    #[test]
    fn create_fails_on_negative_initial_balance() {
        let mut store = get_test_store();

        let result = store.create(
            UserId::new(1),
            NewAccount {
                balance: dec!(-0.01),
                ..new_account()
            },
        );

        assert_eq!(Err(Error::NegativeInitialBalance(dec!(-0.01))), result);
    }

    #[test]
    fn get_fails_for_other_users_account() {
        let mut store = get_test_store();
        let account = store.create(UserId::new(1), new_account()).unwrap();

        let result = store.get(account.id, UserId::new(2));

        assert_eq!(Err(Error::NotFound), result);
    }

    #[test]
    fn get_all_only_returns_owned_accounts() {
        let mut store = get_test_store();
        let owner = UserId::new(1);
        let other_user = UserId::new(2);
        let owned = store.create(owner, new_account()).unwrap();
        store
            .create(
                other_user,
                NewAccount {
                    name: "Someone else's".to_owned(),
                    ..new_account()
                },
            )
            .unwrap();

        let got = store.get_all(owner).unwrap();

        assert_eq!(vec![owned], got);
    }

    #[test]
    fn set_balance_overwrites() {
        let mut store = get_test_store();
        let owner = UserId::new(1);
        let account = store.create(owner, new_account()).unwrap();

        let updated = store
            .set_balance(account.id, owner, dec!(12.34))
            .expect("Could not set balance");

        assert_eq!(dec!(12.34), updated.balance);
        assert_eq!(dec!(12.34), store.get(account.id, owner).unwrap().balance);
    }

    #[test]
    fn set_balance_fails_for_other_users_account() {
        let mut store = get_test_store();
        let account = store.create(UserId::new(1), new_account()).unwrap();

        let result = store.set_balance(account.id, UserId::new(2), dec!(0));

        assert_eq!(Err(Error::NotFound), result);
    }

    #[test]
    fn adjust_balance_applies_signed_deltas() {
        let mut store = get_test_store();
        let owner = UserId::new(1);
        let account = store.create(owner, new_account()).unwrap();

        store.adjust_balance(account.id, owner, dec!(50.00)).unwrap();
        let updated = store.adjust_balance(account.id, owner, dec!(-30.00)).unwrap();

        assert_eq!(dec!(120.00), updated.balance);
    }

    #[test]
    fn adjust_balance_is_exact_at_currency_scale() {
        let mut store = get_test_store();
        let owner = UserId::new(1);
        let account = store
            .create(
                owner,
                NewAccount {
                    balance: dec!(0.00),
                    ..new_account()
                },
            )
            .unwrap();

        // 0.1 + 0.2 is the classic binary float trap.
        store.adjust_balance(account.id, owner, dec!(0.10)).unwrap();
        let updated = store.adjust_balance(account.id, owner, dec!(0.20)).unwrap();

        assert_eq!(dec!(0.30), updated.balance);
    }

    #[test]
    fn adjust_balance_fails_for_missing_account() {
        let mut store = get_test_store();

        let result = store.adjust_balance(999, UserId::new(1), dec!(1.00));

        assert_eq!(Err(Error::NotFound), result);
    }

    #[test]
    fn delete_removes_account_and_its_transactions() {
        let mut store = get_test_store();
        let owner = UserId::new(1);
        let account = store.create(owner, new_account()).unwrap();

        {
            let connection = store.connection.lock().unwrap();
            connection
                .execute(
                    "INSERT INTO \"transaction\"
                     (user_id, account_id, kind, amount, description, date, category)
                     VALUES (?1, ?2, 'EXPENSE', '30.00', 'groceries', '2025-01-15', 'Food')",
                    (owner.as_i64(), account.id),
                )
                .unwrap();
        }

        store.delete(account.id, owner).expect("Could not delete account");

        assert_eq!(Err(Error::NotFound), store.get(account.id, owner));
        let remaining: i64 = store
            .connection
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(id) FROM \"transaction\"", [], |row| row.get(0))
            .unwrap();
        assert_eq!(0, remaining, "expected the cascade to remove the transaction");
    }

    #[test]
    fn delete_fails_for_other_users_account() {
        let mut store = get_test_store();
        let account = store.create(UserId::new(1), new_account()).unwrap();

        let result = store.delete(account.id, UserId::new(2));

        assert_eq!(Err(Error::NotFound), result);
    }
}
