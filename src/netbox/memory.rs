//! In-memory NetBox used by the reconciliation tests.

use serde_json::{json, Map, Value};
use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::error::{AgentError, Result};
use crate::netbox::{Collection, DcimApi, Query, Record};

#[derive(Default)]
pub struct MemoryDcim {
    tables: RefCell<BTreeMap<Collection, Vec<Record>>>,
    next_id: RefCell<u64>,
    creates: RefCell<Vec<Collection>>,
    saves: RefCell<Vec<Collection>>,
}

impl MemoryDcim {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record directly, bypassing create accounting.
    pub fn insert(&self, collection: Collection, fields: Value) -> Record {
        let record = self.store(collection, fields);
        self.materialize(collection, record)
    }

    pub fn creates(&self, collection: Collection) -> usize {
        self.creates
            .borrow()
            .iter()
            .filter(|created| **created == collection)
            .count()
    }

    pub fn saves(&self, collection: Collection) -> usize {
        self.saves
            .borrow()
            .iter()
            .filter(|saved| **saved == collection)
            .count()
    }

    pub fn all(&self, collection: Collection) -> Vec<Record> {
        let stored = self
            .tables
            .borrow()
            .get(&collection)
            .cloned()
            .unwrap_or_default();
        stored
            .into_iter()
            .map(|record| self.materialize(collection, record))
            .collect()
    }

    /// The bay holding `device_id`, if any.
    pub fn bay_of(&self, device_id: u64) -> Option<Record> {
        self.all(Collection::DeviceBays)
            .into_iter()
            .find(|bay| bay.nested_id("installed_device") == Some(device_id))
    }

    fn store(&self, collection: Collection, fields: Value) -> Record {
        let mut next_id = self.next_id.borrow_mut();
        *next_id += 1;
        let fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let record = Record::new(*next_id, fields);
        self.tables
            .borrow_mut()
            .entry(collection)
            .or_default()
            .push(record.clone());
        record
    }

    fn find_by_id(&self, collection: Collection, id: u64) -> Option<Record> {
        self.tables
            .borrow()
            .get(&collection)?
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }

    /// Devices report the bay they sit in, like the real API does.
    fn materialize(&self, collection: Collection, mut record: Record) -> Record {
        if collection != Collection::Devices {
            return record;
        }

        let holder = self
            .tables
            .borrow()
            .get(&Collection::DeviceBays)
            .and_then(|bays| {
                bays.iter()
                    .find(|bay| bay.nested_id("installed_device") == Some(record.id))
                    .cloned()
            });

        let parent = holder.and_then(|bay| {
            let chassis = self.find_by_id(Collection::Devices, bay.nested_id("device")?)?;
            Some(json!({
                "id": chassis.id,
                "name": chassis.get("name").cloned().unwrap_or(Value::Null),
                "device_bay": {"id": bay.id, "name": bay.str_field("name")},
            }))
        });
        record
            .fields
            .insert("parent_device".to_string(), parent.unwrap_or(Value::Null));
        record
    }

    fn matches(record: &Record, key: &str, expected: &str) -> bool {
        if key == "id" {
            return record.id.to_string() == expected;
        }
        if let Some(relation) = key.strip_suffix("_id") {
            return record.nested_id(relation).map(|id| id.to_string()).as_deref()
                == Some(expected);
        }
        match record.get(key) {
            Some(Value::String(actual)) => actual == expected,
            Some(other) => other.to_string() == expected,
            None => false,
        }
    }

    fn require(&self, collection: Collection, fields: &Value, key: &str) -> Result<()> {
        let id = fields.get(key).and_then(Value::as_u64);
        match id.and_then(|id| self.find_by_id(collection, id)) {
            Some(_) => Ok(()),
            None => Err(AgentError::Api {
                status: 400,
                body: format!("{{\"{}\": [\"This field is required.\"]}}", key),
            }),
        }
    }
}

impl DcimApi for MemoryDcim {
    fn filter(&self, collection: Collection, query: &Query) -> Result<Vec<Record>> {
        Ok(self
            .all(collection)
            .into_iter()
            .filter(|record| {
                query
                    .pairs()
                    .iter()
                    .all(|(key, value)| Self::matches(record, key, value))
            })
            .collect())
    }

    fn create(&self, collection: Collection, fields: Value) -> Result<Record> {
        if collection == Collection::Devices {
            self.require(Collection::DeviceTypes, &fields, "device_type")?;
            self.require(Collection::DeviceRoles, &fields, "role")?;
        }
        self.creates.borrow_mut().push(collection);
        let record = self.store(collection, fields);
        Ok(self.materialize(collection, record))
    }

    fn save(&self, collection: Collection, record: &mut Record) -> Result<()> {
        let changes = record.changes();
        {
            let mut tables = self.tables.borrow_mut();
            let stored = tables
                .get_mut(&collection)
                .and_then(|records| records.iter_mut().find(|stored| stored.id == record.id))
                .ok_or(AgentError::Api {
                    status: 404,
                    body: format!("{} {} not found", collection, record.id),
                })?;
            for (key, value) in changes {
                stored.fields.insert(key, value);
            }
        }
        self.saves.borrow_mut().push(collection);
        record.mark_saved();
        Ok(())
    }
}
