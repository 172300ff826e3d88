//! Generic record store.
//!
//! `RecordStore<E>` provides create/retrieve/update/delete, bulk variants,
//! filtered lookup and get-or-create for any `Entity`. It holds no records and
//! no connection: every operation takes the caller's `Session`, runs its
//! statements through it and returns owned copies of the rows.
//!
//! # Invariants
//!
//! - Absence is always reported: `retrieve`, `update`, `delete` fail with
//!   `StoreError::NotFound`, and bulk operations fail as a whole if any key is
//!   missing. Only the filter lookups return `None`.
//! - Input is validated before the first statement runs.
//! - Each write is committed on its own. `update` and `delete` read first and
//!   write second, with no lock held in between.

use std::collections::BTreeSet;
use std::marker::PhantomData;

use log::{debug, warn};
use sqlx::sqlite::SqliteArguments;

use super::entity::{CreateInput, Entity, UpdateInput, UpdateMode};
use super::filter::Filter;
use super::session::Session;
use super::sql::{KeyOrder, TableBinding, MAX_BIND_VARIABLES};
use super::status::StatusResponse;
use super::trusted::TrustedRecordStore;
use super::value::{arguments, FieldMap, Value};
use crate::error_handling::{StoreError, StoreResult};

/// CRUD access to the table bound by `E`.
#[derive(Debug, Clone)]
pub struct RecordStore<E: Entity> {
    binding: TableBinding,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> RecordStore<E> {
    /// Resolves the entity binding.
    ///
    /// # Errors
    ///
    /// `StoreError::InvalidBinding` when the table or a column is not a plain
    /// identifier, or the primary key is not one of the declared columns.
    pub fn new() -> StoreResult<Self> {
        Ok(Self {
            binding: TableBinding::resolve::<E>()?,
            _entity: PhantomData,
        })
    }

    /// Primary-key column resolved for this entity type.
    pub fn primary_key(&self) -> &'static str {
        self.binding.primary_key
    }

    pub fn table(&self) -> &'static str {
        self.binding.table
    }

    /// Entry point for trusted callers that update from raw field maps.
    pub fn trusted(&self) -> TrustedRecordStore<'_, E> {
        TrustedRecordStore::new(self)
    }

    pub(crate) fn binding(&self) -> &TableBinding {
        &self.binding
    }

    /// Persists a new record and returns it with every store-assigned value.
    pub async fn create(&self, session: &mut Session, input: &E::Create) -> StoreResult<E> {
        input.validate()?;
        let fields = input.fields();
        self.binding.check_fields(fields.keys())?;

        let sql = self.binding.insert(&fields);
        let created: E = session
            .fetch_one_commit(&sql, arguments(fields.values())?)
            .await
            .inspect_err(|e| log_write_failure(self.table(), "create", e))?;
        debug!("Created {} {}", self.table(), created.key());
        Ok(created)
    }

    /// Returns the record with primary key `key`.
    ///
    /// The row is read from the store on every call, so the result reflects
    /// the latest committed state.
    pub async fn retrieve(&self, session: &mut Session, key: &E::Key) -> StoreResult<E> {
        let sql = self.binding.select_by_key();
        let key_value: Value = key.clone().into();
        session
            .fetch_optional::<E>(&sql, arguments([&key_value])?)
            .await?
            .ok_or_else(|| {
                debug!("{} {} not found", self.table(), key);
                StoreError::not_found(self.table(), [key])
            })
    }

    /// Re-reads `record` from the store.
    pub async fn refresh(&self, session: &mut Session, record: &E) -> StoreResult<E> {
        self.retrieve(session, &record.key()).await
    }

    /// Returns every record whose key is in `keys`, ordered by key.
    ///
    /// Fails with `NotFound` listing the missing keys if any key is absent;
    /// a partial result is never returned. Duplicate keys are looked up once.
    pub async fn bulk_retrieve(
        &self,
        session: &mut Session,
        keys: &[E::Key],
    ) -> StoreResult<Vec<E>> {
        let wanted: BTreeSet<E::Key> = keys.iter().cloned().collect();
        let found = self.fetch_by_keys(session, &wanted).await?;
        if found.len() == wanted.len() {
            return Ok(found);
        }

        let present: BTreeSet<E::Key> = found.iter().map(|r| r.key()).collect();
        let missing: Vec<&E::Key> = wanted.difference(&present).collect();
        debug!("{} bulk lookup missing keys {:?}", self.table(), missing);
        Err(StoreError::not_found(self.table(), missing))
    }

    /// Returns whichever records exist for `keys`, ordered by key, never failing on absence.
    pub async fn get_by_ids(
        &self,
        session: &mut Session,
        keys: &[E::Key],
    ) -> StoreResult<Vec<E>> {
        let wanted: BTreeSet<E::Key> = keys.iter().cloned().collect();
        self.fetch_by_keys(session, &wanted).await
    }

    async fn fetch_by_keys(
        &self,
        session: &mut Session,
        keys: &BTreeSet<E::Key>,
    ) -> StoreResult<Vec<E>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let values: Vec<Value> = keys.iter().cloned().map(Into::into).collect();
        let mut found: Vec<E> = Vec::with_capacity(values.len());
        for chunk in values.chunks(MAX_BIND_VARIABLES) {
            let sql = self.binding.select_by_keys(chunk.len());
            found.extend(session.fetch_all::<E>(&sql, arguments(chunk)?).await?);
        }
        found.sort_by_key(|r| r.key());
        Ok(found)
    }

    /// Returns every record, ordered by primary key ascending.
    pub async fn list(&self, session: &mut Session) -> StoreResult<Vec<E>> {
        let sql = self.binding.select_all();
        session.fetch_all(&sql, SqliteArguments::default()).await
    }

    /// Number of stored records.
    pub async fn count(&self, session: &mut Session) -> StoreResult<i64> {
        let sql = self.binding.count();
        session.fetch_count(&sql, SqliteArguments::default()).await
    }

    /// Updates the record with primary key `key` and returns its pre-update snapshot.
    ///
    /// With `UpdateMode::Partial` only the fields set in `input` are written;
    /// with `UpdateMode::Full` unset fields are reset to their defaults.
    /// Callers that need the new values must `retrieve` again.
    pub async fn update(
        &self,
        session: &mut Session,
        key: &E::Key,
        input: &E::Update,
        mode: UpdateMode,
    ) -> StoreResult<E> {
        input.validate()?;
        let fields = mode.assignments(input);
        self.binding.check_assignments(&fields)?;
        self.update_fields(session, key, &fields).await
    }

    /// Applies `fields` to one record. Shared with the trusted entry point.
    pub(crate) async fn update_fields(
        &self,
        session: &mut Session,
        key: &E::Key,
        fields: &FieldMap,
    ) -> StoreResult<E> {
        let snapshot = self.retrieve(session, key).await?;
        if fields.is_empty() {
            debug!("Nothing to update for {} {}", self.table(), key);
            return Ok(snapshot);
        }

        let key_value: Value = key.clone().into();
        let sql = self.binding.update_by_key(fields);
        let affected = session
            .execute_commit(&sql, arguments(fields.values().chain([&key_value]))?)
            .await
            .inspect_err(|e| log_write_failure(self.table(), "update", e))?;
        if affected == 0 {
            // Deleted by someone else between the read and the write
            warn!("{} {} vanished before update", self.table(), key);
            return Err(StoreError::not_found(self.table(), [key]));
        }
        debug!("Updated {} {}", self.table(), key);
        Ok(snapshot)
    }

    /// Updates every record in `keys` and returns their pre-update snapshots.
    ///
    /// Gated by the same all-or-nothing existence check as `bulk_retrieve`:
    /// nothing is written if any key is missing. The write itself is also
    /// all-or-nothing: if a record vanishes between the check and the write,
    /// the write is rolled back and the vanished keys are reported as `NotFound`.
    pub async fn bulk_update(
        &self,
        session: &mut Session,
        keys: &[E::Key],
        input: &E::Update,
        mode: UpdateMode,
    ) -> StoreResult<Vec<E>> {
        input.validate()?;
        let fields = mode.assignments(input);
        self.binding.check_assignments(&fields)?;

        let snapshots = self.bulk_retrieve(session, keys).await?;
        if fields.is_empty() || snapshots.is_empty() {
            return Ok(snapshots);
        }

        let key_values: Vec<Value> = snapshots.iter().map(|r| r.key().into()).collect();
        let keys_per_statement = MAX_BIND_VARIABLES.saturating_sub(fields.len()).max(1);
        let statements: Vec<(String, Vec<Value>)> = key_values
            .chunks(keys_per_statement)
            .map(|chunk| {
                let sql = self.binding.update_by_keys(&fields, chunk.len());
                let binds: Vec<Value> = fields.values().chain(chunk).cloned().collect();
                (sql, binds)
            })
            .collect();

        let expected = snapshots.len() as u64;
        let affected = session
            .execute_all_commit(&statements, expected)
            .await
            .inspect_err(|e| log_write_failure(self.table(), "bulk update", e))?;
        if affected != expected {
            let snapshot_keys: Vec<E::Key> = snapshots.iter().map(|r| r.key()).collect();
            let present: BTreeSet<E::Key> = self
                .get_by_ids(session, &snapshot_keys)
                .await?
                .iter()
                .map(|r| r.key())
                .collect();
            let mut vanished: Vec<E::Key> = snapshot_keys
                .iter()
                .filter(|k| !present.contains(*k))
                .cloned()
                .collect();
            if vanished.is_empty() {
                vanished = snapshot_keys;
            }
            warn!(
                "{} bulk update touched {affected} of {expected} record(s), rolled back",
                self.table()
            );
            return Err(StoreError::not_found(self.table(), vanished));
        }
        debug!("Bulk updated {affected} {} record(s)", self.table());
        Ok(snapshots)
    }

    /// Deletes the record with primary key `key`.
    pub async fn delete(
        &self,
        session: &mut Session,
        key: &E::Key,
    ) -> StoreResult<StatusResponse> {
        self.retrieve(session, key).await?;

        let key_value: Value = key.clone().into();
        let sql = self.binding.delete_by_key();
        let affected = session
            .execute_commit(&sql, arguments([&key_value])?)
            .await
            .inspect_err(|e| log_write_failure(self.table(), "delete", e))?;
        if affected == 0 {
            warn!("{} {} vanished before delete", self.table(), key);
            return Err(StoreError::not_found(self.table(), [key]));
        }
        debug!("Deleted {} {}", self.table(), key);
        Ok(StatusResponse::success())
    }

    /// Deletes every record. Succeeds even when the table is already empty.
    pub async fn delete_all(&self, session: &mut Session) -> StoreResult<StatusResponse> {
        let sql = self.binding.delete_all();
        let affected = session
            .execute_commit(&sql, SqliteArguments::default())
            .await
            .inspect_err(|e| log_write_failure(self.table(), "delete all", e))?;
        debug!("Deleted all {affected} {} record(s)", self.table());
        Ok(StatusResponse::success())
    }

    /// First record (lowest key) matching `filter`, or `None`.
    pub async fn get_first_by_filter(
        &self,
        session: &mut Session,
        filter: &Filter,
    ) -> StoreResult<Option<E>> {
        self.find_one(session, filter, KeyOrder::Ascending).await
    }

    /// Last record (highest key) matching `filter`, or `None`.
    pub async fn get_last_by_filter(
        &self,
        session: &mut Session,
        filter: &Filter,
    ) -> StoreResult<Option<E>> {
        self.find_one(session, filter, KeyOrder::Descending).await
    }

    async fn find_one(
        &self,
        session: &mut Session,
        filter: &Filter,
        order: KeyOrder,
    ) -> StoreResult<Option<E>> {
        self.binding.check_fields(filter.conditions().keys())?;
        let (sql, binds) = self.binding.select_filtered(filter, order);
        session.fetch_optional(&sql, arguments(binds.iter())?).await
    }

    /// Returns the first record whose fields equal every field of `input`,
    /// creating one when none matches.
    ///
    /// Two concurrent callers can both miss and both create.
    pub async fn get_or_create(
        &self,
        session: &mut Session,
        input: &E::Create,
    ) -> StoreResult<E> {
        input.validate()?;
        let filter = Filter::from(input.fields());
        if let Some(existing) = self.get_first_by_filter(session, &filter).await? {
            debug!("Found existing {} {}", self.table(), existing.key());
            return Ok(existing);
        }
        self.create(session, input).await
    }
}

fn log_write_failure(table: &str, operation: &str, error: &StoreError) {
    match error {
        StoreError::Conflict { message, .. } => {
            warn!("{operation} on {table} rejected: {message}")
        }
        other => warn!("{operation} on {table} failed: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::ErrorKind;
    use crate::storage::test_helpers::{create_test_session, new_payment, Payment, PaymentUpdate};
    use sqlx::FromRow;

    #[derive(Debug, Clone, FromRow)]
    struct Orphan {
        code: i64,
    }

    impl Entity for Orphan {
        const TABLE: &'static str = "orphans";
        const PRIMARY_KEY: &'static str = "id";
        const COLUMNS: &'static [&'static str] = &["code"];

        type Key = i64;
        type Create = crate::storage::test_helpers::NewPayment;
        type Update = PaymentUpdate;

        fn key(&self) -> i64 {
            self.code
        }
    }

    #[test]
    fn test_undeclared_primary_key_is_invalid_binding() {
        let err = RecordStore::<Orphan>::new().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidBinding);
    }

    #[test]
    fn test_primary_key_is_resolved_from_binding() {
        let store = RecordStore::<Payment>::new().unwrap();
        assert_eq!(store.primary_key(), "id");
        assert_eq!(store.table(), "payments");
    }

    #[tokio::test]
    async fn test_create_validates_before_touching_store() {
        let mut session = create_test_session().await;
        let store = RecordStore::<Payment>::new().unwrap();

        let err = store
            .create(&mut session, &new_payment("", 5))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(store.count(&mut session).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_partial_update_with_nothing_set_returns_snapshot() {
        let mut session = create_test_session().await;
        let store = RecordStore::<Payment>::new().unwrap();
        let created = store
            .create(&mut session, &new_payment("A", 10))
            .await
            .unwrap();

        let snapshot = store
            .update(
                &mut session,
                &created.id,
                &PaymentUpdate::default(),
                UpdateMode::Partial,
            )
            .await
            .unwrap();
        assert_eq!(snapshot, created);
        assert_eq!(store.retrieve(&mut session, &created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_refresh_sees_committed_changes() {
        let mut session = create_test_session().await;
        let store = RecordStore::<Payment>::new().unwrap();
        let created = store
            .create(&mut session, &new_payment("A", 10))
            .await
            .unwrap();

        let update = PaymentUpdate {
            amount: Some(99),
            ..Default::default()
        };
        store
            .update(&mut session, &created.id, &update, UpdateMode::Partial)
            .await
            .unwrap();

        let refreshed = store.refresh(&mut session, &created).await.unwrap();
        assert_eq!(refreshed.amount, 99);
        assert_eq!(refreshed.name, "A");
    }

    #[tokio::test]
    async fn test_unknown_filter_field_is_rejected() {
        let mut session = create_test_session().await;
        let store = RecordStore::<Payment>::new().unwrap();

        let err = store
            .get_first_by_filter(&mut session, &Filter::new().eq("colour", "red"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
