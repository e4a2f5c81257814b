//! Two-axis sort toggling for a listing.

use crate::types::{SortDirection, SortField};

/// Which sort, if any, the listing currently shows.
///
/// At most one axis is active. Identifier sorting starts ascending and GPA
/// sorting starts descending (best students first); clicking the active
/// axis again flips its direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortState {
    by_id: Option<SortDirection>,
    by_gpa: Option<SortDirection>,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate or flip the identifier axis. Returns the new direction.
    pub fn toggle_id(&mut self) -> SortDirection {
        self.by_gpa = None;
        let next = match self.by_id {
            Some(SortDirection::Asc) => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        self.by_id = Some(next);
        next
    }

    /// Activate or flip the GPA axis. Returns the new direction.
    pub fn toggle_gpa(&mut self) -> SortDirection {
        self.by_id = None;
        let next = match self.by_gpa {
            Some(SortDirection::Desc) => SortDirection::Asc,
            _ => SortDirection::Desc,
        };
        self.by_gpa = Some(next);
        next
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn by_id(&self) -> Option<SortDirection> {
        self.by_id
    }

    pub fn by_gpa(&self) -> Option<SortDirection> {
        self.by_gpa
    }

    /// The active axis and its direction.
    pub fn active(&self) -> Option<(SortField, SortDirection)> {
        match (self.by_id, self.by_gpa) {
            (Some(direction), _) => Some((SortField::StudentId, direction)),
            (None, Some(direction)) => Some((SortField::Gpa, direction)),
            (None, None) => None,
        }
    }
}
