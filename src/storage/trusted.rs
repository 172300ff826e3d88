//! Trusted update path.
//!
//! Internal callers sometimes hold an untyped field map rather than a
//! validated update input. This view is the only way to apply such a map; it
//! skips input-shape validation but still rejects unknown columns and
//! primary-key assignments, since those would corrupt the statement or the
//! record's identity.

use log::debug;

use super::entity::Entity;
use super::session::Session;
use super::store::RecordStore;
use super::value::FieldMap;
use crate::error_handling::StoreResult;

/// Borrowed view of a `RecordStore` exposing unvalidated operations.
pub struct TrustedRecordStore<'a, E: Entity> {
    store: &'a RecordStore<E>,
}

impl<'a, E: Entity> TrustedRecordStore<'a, E> {
    pub(crate) fn new(store: &'a RecordStore<E>) -> Self {
        Self { store }
    }

    /// Writes exactly the fields in `fields` and returns the pre-update snapshot.
    ///
    /// Fails with `NotFound` if the record does not exist.
    pub async fn update_with_partial_fields(
        &self,
        session: &mut Session,
        key: &E::Key,
        fields: &FieldMap,
    ) -> StoreResult<E> {
        self.store.binding().check_assignments(fields)?;
        debug!(
            "Trusted update of {} {} ({} field(s))",
            self.store.table(),
            key,
            fields.len()
        );
        self.store.update_fields(session, key, fields).await
    }
}
