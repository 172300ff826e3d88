//! Session handle over one pooled SQLite connection.
//!
//! # Commit discipline
//!
//! A `Session` never holds a transaction between calls. Reads run directly on
//! the connection and therefore always observe the latest committed state.
//! Every write opens a transaction, runs its statements and commits before
//! returning. Two writes issued back to back are two separate commits. A write
//! split across several statements (key sets larger than the bind limit) still
//! commits once, or not at all.
//!
//! Cancellation is dropping the future: an uncommitted transaction is rolled
//! back when it goes out of scope.

use log::debug;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Connection, FromRow, Sqlite, SqlitePool};

use super::value::{arguments, Value};
use crate::error_handling::StoreResult;

/// A connection checked out of the pool for the duration of one logical request.
pub struct Session {
    conn: PoolConnection<Sqlite>,
}

impl Session {
    /// Checks a connection out of `pool`.
    ///
    /// # Errors
    ///
    /// `StoreError::Timeout` when the pool stays exhausted past its acquire
    /// timeout, `StoreError::Transport` for any other connection failure.
    pub async fn acquire(pool: &SqlitePool) -> StoreResult<Self> {
        let conn = pool.acquire().await?;
        Ok(Self { conn })
    }

    pub fn from_connection(conn: PoolConnection<Sqlite>) -> Self {
        Self { conn }
    }

    /// Releases the connection back to the pool.
    pub fn into_connection(self) -> PoolConnection<Sqlite> {
        self.conn
    }

    pub(crate) async fn fetch_all<'q, E>(
        &mut self,
        sql: &'q str,
        args: SqliteArguments<'q>,
    ) -> StoreResult<Vec<E>>
    where
        E: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        debug!("execute: {sql}");
        let rows = sqlx::query_as_with::<_, E, _>(sql, args)
            .fetch_all(&mut *self.conn)
            .await?;
        Ok(rows)
    }

    pub(crate) async fn fetch_optional<'q, E>(
        &mut self,
        sql: &'q str,
        args: SqliteArguments<'q>,
    ) -> StoreResult<Option<E>>
    where
        E: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        debug!("execute: {sql}");
        let row = sqlx::query_as_with::<_, E, _>(sql, args)
            .fetch_optional(&mut *self.conn)
            .await?;
        Ok(row)
    }

    pub(crate) async fn fetch_count<'q>(
        &mut self,
        sql: &'q str,
        args: SqliteArguments<'q>,
    ) -> StoreResult<i64> {
        debug!("execute: {sql}");
        let count = sqlx::query_scalar_with::<_, i64, _>(sql, args)
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(count)
    }

    /// Runs one write statement in its own transaction and commits it.
    ///
    /// Returns the number of affected rows.
    pub(crate) async fn execute_commit<'q>(
        &mut self,
        sql: &'q str,
        args: SqliteArguments<'q>,
    ) -> StoreResult<u64> {
        let mut tx = self.conn.begin().await?;
        debug!("execute: {sql}");
        let result = sqlx::query_with(sql, args).execute(&mut *tx).await?;
        tx.commit().await?;
        debug!("commit: {} row(s) affected", result.rows_affected());
        Ok(result.rows_affected())
    }

    /// Runs `statements` in one transaction.
    ///
    /// Commits only when they affect exactly `expected_rows` rows in total and
    /// rolls back otherwise. Returns the number of affected rows either way.
    pub(crate) async fn execute_all_commit(
        &mut self,
        statements: &[(String, Vec<Value>)],
        expected_rows: u64,
    ) -> StoreResult<u64> {
        let mut tx = self.conn.begin().await?;
        let mut affected = 0;
        for (sql, values) in statements {
            debug!("execute: {sql}");
            let result = sqlx::query_with(sql, arguments(values)?)
                .execute(&mut *tx)
                .await?;
            affected += result.rows_affected();
        }
        if affected == expected_rows {
            tx.commit().await?;
            debug!("commit: {affected} row(s) affected");
        } else {
            tx.rollback().await?;
            debug!("rollback: {affected} of {expected_rows} row(s) affected");
        }
        Ok(affected)
    }

    /// Runs one `... RETURNING *` write statement, commits it and returns the row.
    pub(crate) async fn fetch_one_commit<'q, E>(
        &mut self,
        sql: &'q str,
        args: SqliteArguments<'q>,
    ) -> StoreResult<E>
    where
        E: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let mut tx = self.conn.begin().await?;
        debug!("execute: {sql}");
        let row = sqlx::query_as_with::<_, E, _>(sql, args)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        debug!("commit: 1 row returned");
        Ok(row)
    }
}
