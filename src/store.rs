//! The record store: read-modify-write operations over one backing file.

use crate::backing::BackingFile;
use crate::collection;
use crate::error::{Result, StoreError};
use crate::types::{Patch, Query, RawRecord, RecordId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::path::Path;

/// A record store persisting one collection of `T` to a single JSON file.
///
/// The store owns only the resolved file path. Every operation re-reads the
/// collection from disk, applies its transform in memory, and (for mutations)
/// rewrites the whole file before returning, so the file is the single source
/// of truth across calls and can never hold a half-applied collection.
///
/// No lock is held across the read-check-write span: interleaved operations
/// on the same path can race, with the last write winning. Callers needing
/// isolation must serialize calls externally.
///
/// `T` must serialize to a JSON object carrying an `id` field (integer or
/// string), unique within the collection. `Store<serde_json::Value>` covers
/// the schemaless case.
pub struct Store<T> {
    file: BackingFile,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Store<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Open a store on the given file.
    ///
    /// Relative filenames resolve against the current working directory at
    /// construction time. The file itself is created lazily, containing an
    /// empty collection, the first time any operation touches it.
    pub fn open(filename: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            file: BackingFile::resolve(filename)?,
            _marker: PhantomData,
        })
    }

    /// Absolute path of the backing file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Return the full collection.
    pub fn get_all(&self) -> Result<Vec<T>> {
        decode(self.file.load()?)
    }

    /// Return the first `n` records; `n` past the end returns everything.
    pub fn get(&self, n: usize) -> Result<Vec<T>> {
        let mut records = self.file.load()?;
        records.truncate(n);
        decode(records)
    }

    /// Return every record whose fields equal all queried values.
    ///
    /// An empty query matches the whole collection.
    pub fn get_by(&self, query: &Query) -> Result<Vec<T>> {
        let records = self.file.load()?;
        decode(
            records
                .into_iter()
                .filter(|record| collection::matches(record, query))
                .collect(),
        )
    }

    /// Append one record, failing if its id is already taken.
    pub fn add(&self, item: T) -> Result<T> {
        let mut records = self.file.load()?;
        let record = encode(&item)?;
        collection::check_unique(&records, std::slice::from_ref(&record))?;
        records.push(record);
        self.file.store(&records)?;
        Ok(item)
    }

    /// Append a batch of records, failing with the first duplicate id found
    /// against the existing collection or within the batch itself.
    pub fn add_many(&self, items: Vec<T>) -> Result<Vec<T>> {
        let mut records = self.file.load()?;
        let incoming = items.iter().map(encode).collect::<Result<Vec<_>>>()?;
        collection::check_unique(&records, &incoming)?;
        records.extend(incoming);
        self.file.store(&records)?;
        Ok(items)
    }

    /// Shallow-merge `patch` into every record matching `query`, returning
    /// how many records were updated.
    pub fn update(&self, query: &Query, patch: &Patch) -> Result<usize> {
        let mut records = self.file.load()?;
        let mut updated = 0;
        for record in records.iter_mut() {
            if collection::matches(record, query) {
                collection::merge(record, patch);
                updated += 1;
            }
        }
        if updated == 0 {
            return Err(StoreError::NoMatch);
        }
        self.file.store(&records)?;
        Ok(updated)
    }

    /// Shallow-merge `patch` into the record with the given id.
    pub fn update_by_id(&self, id: impl Into<RecordId>, patch: &Patch) -> Result<bool> {
        let id = id.into();
        let mut records = self.file.load()?;
        let position =
            collection::position_of(&records, &id).ok_or(StoreError::NotFound(id))?;
        collection::merge(&mut records[position], patch);
        self.file.store(&records)?;
        Ok(true)
    }

    /// Remove the record with the given id.
    pub fn delete_by_id(&self, id: impl Into<RecordId>) -> Result<bool> {
        let id = id.into();
        let mut records = self.file.load()?;
        let position =
            collection::position_of(&records, &id).ok_or(StoreError::NotFound(id))?;
        records.remove(position);
        self.file.store(&records)?;
        Ok(true)
    }

    /// Replace the collection with an empty one.
    pub fn clear(&self) -> Result<Vec<T>> {
        self.file.store(&[])?;
        Ok(Vec::new())
    }
}

/// Decode raw records into `T` values.
fn decode<T: DeserializeOwned>(records: Vec<RawRecord>) -> Result<Vec<T>> {
    records
        .into_iter()
        .map(|record| {
            serde_json::from_value(Value::Object(record))
                .map_err(|e| StoreError::Deserialization(e.to_string()))
        })
        .collect()
}

/// Encode a `T` into its at-rest object form, validating its id.
fn encode<T: Serialize>(item: &T) -> Result<RawRecord> {
    match serde_json::to_value(item)? {
        Value::Object(record) => {
            collection::record_id(&record)?;
            Ok(record)
        }
        _ => Err(StoreError::InvalidRecord(
            "record must serialize to a JSON object".to_string(),
        )),
    }
}
