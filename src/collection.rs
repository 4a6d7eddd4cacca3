//! Pure transforms over the in-memory record collection.
//!
//! Nothing here performs I/O; the store sequences these between its read and
//! write phases, so a failed precondition check means the write never happens.

use crate::error::{Result, StoreError};
use crate::types::{Patch, Query, RawRecord, RecordId};
use std::collections::HashSet;

/// Extract the id of a record.
pub(crate) fn record_id(record: &RawRecord) -> Result<RecordId> {
    let value = record
        .get("id")
        .ok_or_else(|| StoreError::InvalidRecord("missing id field".to_string()))?;
    RecordId::from_value(value).ok_or_else(|| {
        StoreError::InvalidRecord("id must be an integer or a string".to_string())
    })
}

/// Position of the record with the given id, if any.
pub(crate) fn position_of(records: &[RawRecord], id: &RecordId) -> Option<usize> {
    records
        .iter()
        .position(|record| record.get("id").and_then(RecordId::from_value).as_ref() == Some(id))
}

/// Whether every queried field is present on the record with an equal value.
///
/// An empty query matches every record.
pub(crate) fn matches(record: &RawRecord, query: &Query) -> bool {
    query
        .iter()
        .all(|(field, expected)| record.get(field) == Some(expected))
}

/// Shallow-merge a patch into a record: fields named in the patch overwrite
/// same-named fields, all others are preserved.
pub(crate) fn merge(record: &mut RawRecord, patch: &Patch) {
    for (field, value) in patch {
        record.insert(field.clone(), value.clone());
    }
}

/// Reject any incoming record whose id is already taken, either by the
/// existing collection or by an earlier record in the same batch.
pub(crate) fn check_unique(existing: &[RawRecord], incoming: &[RawRecord]) -> Result<()> {
    let mut seen: HashSet<RecordId> = HashSet::with_capacity(existing.len() + incoming.len());
    for record in existing {
        seen.insert(record_id(record)?);
    }
    for record in incoming {
        let id = record_id(record)?;
        if !seen.insert(id.clone()) {
            return Err(StoreError::DuplicateId(id));
        }
    }
    Ok(())
}
