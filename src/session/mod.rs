//! Presentation state layered on top of a `RecordStore`.
//!
//! A view layer renders and forwards user actions; everything that is not
//! rendering lives here:
//! - form validation (`StudentForm`)
//! - add-vs-edit mode and the pending delete confirmation
//! - two-axis sort toggling (`SortState`)
//! - search, and seeding an empty store with sample students
//!
//! Any mutation or search resets the sort state, so the listing goes back to
//! stored order.

mod form;
mod sort;

pub use form::{FieldError, FormErrors, FormField, StudentDraft, StudentForm};
pub use sort::SortState;

use crate::codec;
use crate::error::Result;
use crate::storage::KeyValueStorage;
use crate::store::RecordStore;
use crate::types::{SortDirection, SortField, Student};
use tracing::info;

/// Sample students used to populate an empty store.
const SAMPLE_STUDENTS: &str = r#"[
    {"studentId":"SV001","fullName":"Nguyễn Văn An","birthDate":"2002-05-15","className":"CNTT-K15","gpa":3.45},
    {"studentId":"SV002","fullName":"Trần Thị Bình","birthDate":"2002-08-20","className":"CNTT-K15","gpa":3.78},
    {"studentId":"SV003","fullName":"Lê Hoàng Cường","birthDate":"2003-01-10","className":"KTPM-K16","gpa":3.12},
    {"studentId":"SV004","fullName":"Phạm Thu Hà","birthDate":"2002-12-25","className":"CNTT-K15","gpa":3.92},
    {"studentId":"SV005","fullName":"Hoàng Minh Đức","birthDate":"2003-03-08","className":"KTPM-K16","gpa":2.88}
]"#;

/// The built-in sample students.
pub fn sample_students() -> Result<Vec<Student>> {
    codec::decode(SAMPLE_STUDENTS)
}

/// Listing caption, e.g. `Total: 5 students`.
pub fn count_summary(count: usize) -> String {
    format!("Total: {} students", count)
}

/// Result of submitting the student form.
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// A new student was added.
    Added(String),
    /// The student being edited was updated.
    Updated(String),
    /// Validation failed; nothing changed.
    Rejected(FormErrors),
    /// The student being edited no longer exists.
    Missing(String),
}

/// Interactive session over a record store.
pub struct Session<S> {
    store: RecordStore<S>,

    /// Identifier of the student currently being edited.
    editing: Option<String>,

    /// Identifier awaiting delete confirmation.
    pending_delete: Option<String>,

    sort: SortState,
}

impl<S: KeyValueStorage> Session<S> {
    pub fn new(store: RecordStore<S>) -> Self {
        Self {
            store,
            editing: None,
            pending_delete: None,
            sort: SortState::new(),
        }
    }

    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    pub fn into_store(self) -> RecordStore<S> {
        self.store
    }

    pub fn sort_state(&self) -> SortState {
        self.sort
    }

    /// Populate an empty store with the sample students. Returns how many
    /// were added.
    pub fn seed_if_empty(&mut self) -> Result<usize> {
        if !self.store.is_empty() {
            return Ok(0);
        }

        let mut added = 0;
        for student in sample_students()? {
            if self.store.add(student)? {
                added += 1;
            }
        }
        info!(count = added, "seeded sample students");
        Ok(added)
    }

    /// The listing in its current sort order (stored order if unsorted).
    pub fn listing(&self) -> Vec<&Student> {
        match self.sort.active() {
            Some((field, direction)) => self.store.sort_by_field(field, direction),
            None => self.store.get_all().iter().collect(),
        }
    }

    // --- Editing ---

    /// Enter edit mode for `student_id`, returning the prefilled form.
    pub fn begin_edit(&mut self, student_id: &str) -> Option<StudentForm> {
        let form = StudentForm::from_student(self.store.find_by_id(student_id)?);
        self.editing = Some(student_id.to_string());
        Some(form)
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// Validate the form and add a new student or update the one being
    /// edited.
    ///
    /// In edit mode the identifier typed in the form is ignored; the edited
    /// record keeps its identifier.
    pub fn submit(&mut self, form: &StudentForm) -> Result<SubmitOutcome> {
        let draft = match form.validate() {
            Ok(draft) => draft,
            Err(errors) => return Ok(SubmitOutcome::Rejected(errors)),
        };

        if let Some(student_id) = self.editing.clone() {
            if !self.store.update(&student_id, draft.update)? {
                self.editing = None;
                return Ok(SubmitOutcome::Missing(student_id));
            }
            self.editing = None;
            self.sort.reset();
            return Ok(SubmitOutcome::Updated(student_id));
        }

        let student_id = draft.student_id.clone();
        if !self.store.add(draft.into_student())? {
            let mut errors = FormErrors::new();
            errors.insert(FormField::StudentId, FieldError::DuplicateId);
            return Ok(SubmitOutcome::Rejected(errors));
        }
        self.sort.reset();
        Ok(SubmitOutcome::Added(student_id))
    }

    // --- Deleting ---

    /// Ask for confirmation before deleting. Returns false for an unknown id.
    pub fn request_delete(&mut self, student_id: &str) -> bool {
        if self.store.find_by_id(student_id).is_none() {
            return false;
        }
        self.pending_delete = Some(student_id.to_string());
        true
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the student awaiting confirmation.
    pub fn confirm_delete(&mut self) -> Result<bool> {
        let Some(student_id) = self.pending_delete.take() else {
            return Ok(false);
        };

        let deleted = self.store.delete(&student_id)?;
        if deleted {
            if self.editing.as_deref() == Some(student_id.as_str()) {
                self.editing = None;
            }
            self.sort.reset();
        }
        Ok(deleted)
    }

    // --- Listing ---

    /// Search by name or identifier. A blank keyword lists everything.
    pub fn search(&mut self, keyword: &str) -> Vec<&Student> {
        self.sort.reset();
        let keyword = keyword.trim();
        if keyword.is_empty() {
            self.store.get_all().iter().collect()
        } else {
            self.store.search(keyword)
        }
    }

    pub fn toggle_sort_by_id(&mut self) -> Vec<&Student> {
        let direction = self.sort.toggle_id();
        self.sorted(SortField::StudentId, direction)
    }

    pub fn toggle_sort_by_gpa(&mut self) -> Vec<&Student> {
        let direction = self.sort.toggle_gpa();
        self.sorted(SortField::Gpa, direction)
    }

    fn sorted(&self, field: SortField, direction: SortDirection) -> Vec<&Student> {
        self.store.sort_by_field(field, direction)
    }
}
