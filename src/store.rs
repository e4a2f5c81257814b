//! The record store: owns the student collection and keeps it persisted.

use crate::codec;
use crate::error::Result;
use crate::storage::KeyValueStorage;
use crate::subscriptions::{StoreEvent, SubscriptionConfig, SubscriptionHandle, SubscriptionManager};
use crate::types::{SortDirection, SortField, Student, StudentUpdate};
use tracing::{debug, info, warn};

/// Key under which the collection is stored by default.
pub const DEFAULT_STORAGE_KEY: &str = "students";

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Storage key holding the serialized collection.
    pub storage_key: String,

    /// Buffer size for subscriptions created through `subscribe_default`.
    pub event_buffer_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            event_buffer_size: 256,
        }
    }
}

/// In-memory student collection persisted to a key/value backend.
///
/// Records keep insertion order. Every successful mutation rewrites the full
/// collection to storage and notifies subscribers. Duplicate identifiers and
/// unknown identifiers are reported as `Ok(false)`; errors are reserved for
/// storage failures.
pub struct RecordStore<S> {
    config: StoreConfig,

    storage: S,

    students: Vec<Student>,

    subscriptions: SubscriptionManager,
}

impl<S: KeyValueStorage> RecordStore<S> {
    /// Create a store over `storage` and restore any persisted collection.
    pub fn open(storage: S, config: StoreConfig) -> Result<Self> {
        let mut store = Self {
            config,
            storage,
            students: Vec::new(),
            subscriptions: SubscriptionManager::new(),
        };
        store.restore()?;
        Ok(store)
    }

    /// Create a store with the default configuration.
    pub fn with_storage(storage: S) -> Result<Self> {
        Self::open(storage, StoreConfig::default())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The underlying storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    // --- Record Operations ---

    /// Append a student. Returns `false` if the identifier is already taken.
    pub fn add(&mut self, student: Student) -> Result<bool> {
        if self.find_by_id(&student.student_id).is_some() {
            warn!(student_id = %student.student_id, "rejected duplicate student id");
            return Ok(false);
        }

        self.students.push(student);
        if let Err(e) = self.persist() {
            self.students.pop();
            return Err(e);
        }

        if let Some(student) = self.students.last() {
            debug!(student_id = %student.student_id, "added student");
            self.subscriptions.broadcast(StoreEvent::Added {
                student: student.clone(),
            });
        }
        Ok(true)
    }

    /// Find a student by identifier.
    pub fn find_by_id(&self, student_id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.student_id == student_id)
    }

    /// Replace the mutable fields of a student. Returns `false` if no
    /// student has that identifier.
    pub fn update(&mut self, student_id: &str, fields: StudentUpdate) -> Result<bool> {
        let Some(index) = self.position(student_id) else {
            warn!(student_id, "update of unknown student");
            return Ok(false);
        };

        let previous = self.students[index].clone();
        self.students[index].apply(fields);
        if let Err(e) = self.persist() {
            self.students[index] = previous;
            return Err(e);
        }

        debug!(student_id, "updated student");
        self.subscriptions.broadcast(StoreEvent::Updated {
            student: self.students[index].clone(),
        });
        Ok(true)
    }

    /// Remove a student. Returns `false` if no student has that identifier.
    pub fn delete(&mut self, student_id: &str) -> Result<bool> {
        let Some(index) = self.position(student_id) else {
            warn!(student_id, "delete of unknown student");
            return Ok(false);
        };

        let removed = self.students.remove(index);
        if let Err(e) = self.persist() {
            self.students.insert(index, removed);
            return Err(e);
        }

        debug!(student_id, "deleted student");
        self.subscriptions.broadcast(StoreEvent::Deleted {
            student_id: removed.student_id,
        });
        Ok(true)
    }

    /// All students in insertion order.
    pub fn get_all(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Students whose name or identifier contains `keyword`, ignoring case.
    ///
    /// Stored order is preserved. Accents are significant: "an" does not
    /// match "Trần".
    pub fn search(&self, keyword: &str) -> Vec<&Student> {
        let needle = keyword.to_lowercase();
        self.students
            .iter()
            .filter(|s| s.matches_lowercase(&needle))
            .collect()
    }

    /// Students ordered by `field`. The stored order is not changed.
    pub fn sort_by_field(&self, field: SortField, direction: SortDirection) -> Vec<&Student> {
        sort_students(self.students.iter().collect(), field, direction)
    }

    // --- Persistence ---

    /// Write the full collection to storage.
    pub fn persist(&self) -> Result<()> {
        let blob = codec::encode(&self.students)?;
        self.storage.set_item(&self.config.storage_key, &blob)?;
        debug!(
            key = %self.config.storage_key,
            count = self.students.len(),
            bytes = blob.len(),
            "persisted students"
        );
        Ok(())
    }

    /// Replace the in-memory collection with the persisted one.
    ///
    /// A missing key yields an empty collection. On error the in-memory
    /// collection is left unchanged.
    pub fn restore(&mut self) -> Result<()> {
        let students = match self.storage.get_item(&self.config.storage_key)? {
            Some(blob) => codec::decode(&blob)?,
            None => Vec::new(),
        };

        info!(
            key = %self.config.storage_key,
            count = students.len(),
            "restored students"
        );
        self.students = students;
        self.subscriptions.broadcast(StoreEvent::Restored {
            count: self.students.len(),
        });
        Ok(())
    }

    // --- Subscriptions ---

    /// Subscribe to change events.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        self.subscriptions.subscribe(config)
    }

    /// Subscribe to every event with the configured buffer size.
    pub fn subscribe_default(&self) -> SubscriptionHandle {
        self.subscriptions.subscribe(SubscriptionConfig {
            buffer_size: self.config.event_buffer_size,
            ..Default::default()
        })
    }

    pub fn subscriptions(&self) -> &SubscriptionManager {
        &self.subscriptions
    }

    fn position(&self, student_id: &str) -> Option<usize> {
        self.students.iter().position(|s| s.student_id == student_id)
    }
}

/// Stable sort of a listing by identifier or GPA.
pub fn sort_students<'a>(
    mut students: Vec<&'a Student>,
    field: SortField,
    direction: SortDirection,
) -> Vec<&'a Student> {
    students.sort_by(|a, b| {
        let ordering = match field {
            SortField::StudentId => a.student_id.cmp(&b.student_id),
            SortField::Gpa => a.gpa.value().total_cmp(&b.gpa.value()),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    students
}
