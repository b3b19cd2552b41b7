//! Access to the NetBox inventory-of-record.
//!
//! The reconciler only sees the [`DcimApi`] trait; [`client::NetboxClient`]
//! talks REST, and tests use an in-memory implementation.

pub mod client;
#[cfg(test)]
pub mod memory;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{AgentError, Result};

pub use client::NetboxClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    DeviceRoles,
    DeviceTypes,
    Platforms,
    Sites,
    Devices,
    DeviceBays,
    Interfaces,
    Tags,
}

impl Collection {
    /// Path below `/api/`.
    pub fn path(self) -> &'static str {
        match self {
            Collection::DeviceRoles => "dcim/device-roles",
            Collection::DeviceTypes => "dcim/device-types",
            Collection::Platforms => "dcim/platforms",
            Collection::Sites => "dcim/sites",
            Collection::Devices => "dcim/devices",
            Collection::DeviceBays => "dcim/device-bays",
            Collection::Interfaces => "dcim/interfaces",
            Collection::Tags => "extras/tags",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Filter parameters, sent as a query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query(Vec<(String, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        f.write_str(&rendered.join("&"))
    }
}

/// A NetBox object as returned by the API.
///
/// Changes go through [`Record::set`] so that `save` only sends the fields
/// that were touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    #[serde(skip)]
    changed: BTreeSet<String>,
}

impl Record {
    #[cfg(test)]
    pub fn new(id: u64, fields: Map<String, Value>) -> Self {
        Record {
            id,
            fields,
            changed: BTreeSet::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|value| !value.is_null())
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Id of a related object, whether NetBox nested it (`{"id": 3, ...}`)
    /// or it was written as a bare key.
    pub fn nested_id(&self, key: &str) -> Option<u64> {
        match self.get(key)? {
            Value::Object(nested) => nested.get("id").and_then(Value::as_u64),
            other => other.as_u64(),
        }
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.fields.insert(key.to_string(), value);
        self.changed.insert(key.to_string());
    }

    /// Fields modified since the record was fetched or last saved.
    pub fn changes(&self) -> Map<String, Value> {
        self.changed
            .iter()
            .filter_map(|key| self.fields.get(key).map(|value| (key.clone(), value.clone())))
            .collect()
    }

    pub fn mark_saved(&mut self) {
        self.changed.clear();
    }
}

/// The operations the reconciler needs from the inventory-of-record.
pub trait DcimApi {
    /// Every record matching `query`.
    fn filter(&self, collection: Collection, query: &Query) -> Result<Vec<Record>>;

    /// Create a record; fails when a required relation does not resolve.
    fn create(&self, collection: Collection, fields: Value) -> Result<Record>;

    /// Persist the fields changed on a previously fetched record.
    fn save(&self, collection: Collection, record: &mut Record) -> Result<()>;

    /// Single lookup. More than one match is an error.
    fn get(&self, collection: Collection, query: &Query) -> Result<Option<Record>> {
        let mut found = self.filter(collection, query)?;
        match found.len() {
            0 | 1 => Ok(found.pop()),
            count => Err(AgentError::MultipleResults {
                collection: collection.path(),
                query: query.to_string(),
                count,
            }),
        }
    }
}
