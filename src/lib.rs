//! # Student Records
//!
//! A small student-records store: add, edit, delete, search and sort student
//! records, persisted as a single JSON blob in a key/value backend.
//!
//! ## Core Concepts
//!
//! - **RecordStore**: the ordered collection, unique by student id, written
//!   back to storage after every mutation
//! - **Storage**: string key/value backends (in-memory or on disk)
//! - **Subscriptions**: change events for view layers
//! - **Session**: form validation, edit mode, delete confirmation and sort
//!   toggling on top of a store
//!
//! ## Example
//!
//! ```ignore
//! use student_records::{Gpa, MemoryStorage, RecordStore, SortDirection, SortField, Student};
//!
//! let mut store = RecordStore::with_storage(MemoryStorage::new())?;
//!
//! let added = store.add(Student::new(
//!     "SV001",
//!     "Nguyễn Văn An",
//!     student_records::parse_birth_date("2002-05-15")?,
//!     "CNTT-K15",
//!     Gpa::new(3.45)?,
//! ))?;
//! assert!(added);
//!
//! let best_first = store.sort_by_field(SortField::Gpa, SortDirection::Desc);
//! ```

pub mod codec;
pub mod error;
pub mod session;
pub mod storage;
pub mod store;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use error::{Result, StoreError, ValidationError};
pub use session::{
    count_summary, sample_students, FieldError, FormErrors, FormField, Session, SortState,
    StudentDraft, StudentForm, SubmitOutcome,
};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{sort_students, RecordStore, StoreConfig, DEFAULT_STORAGE_KEY};
pub use subscriptions::{
    DropReason, StoreEvent, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle,
    SubscriptionId, SubscriptionManager,
};
pub use types::*;
