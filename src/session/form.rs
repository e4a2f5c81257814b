//! Input validation for the student form.

use crate::error::ValidationError;
use crate::types::{parse_birth_date, Gpa, Student, StudentUpdate};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Fields of the student form, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    StudentId,
    FullName,
    BirthDate,
    ClassName,
    Gpa,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::StudentId,
        FormField::FullName,
        FormField::BirthDate,
        FormField::ClassName,
        FormField::Gpa,
    ];

    /// Message shown when the field is left empty.
    fn required_message(self) -> &'static str {
        match self {
            FormField::StudentId => "Please enter the student ID.",
            FormField::FullName => "Please enter the full name.",
            FormField::BirthDate => "Please choose a birth date.",
            FormField::ClassName => "Please enter the class.",
            FormField::Gpa => "Please enter the GPA.",
        }
    }
}

/// Why a single field was rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum FieldError {
    #[error("{}", .0.required_message())]
    Required(FormField),

    #[error("Please enter a valid date (YYYY-MM-DD).")]
    InvalidDate,

    #[error("Please enter a valid GPA.")]
    InvalidGpa,

    #[error("GPA must be between 0 and 4.")]
    GpaOutOfRange,

    #[error("Student ID already exists. Please use another ID.")]
    DuplicateId,
}

/// Per-field validation failures.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormErrors {
    errors: BTreeMap<FormField, FieldError>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FormField, error: FieldError) {
        self.errors.insert(field, error);
    }

    pub fn get(&self, field: FormField) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &FieldError)> {
        self.errors.iter().map(|(field, error)| (*field, error))
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.errors.values().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join(" "))
    }
}

/// Raw form input as typed by the user.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StudentForm {
    pub student_id: String,
    pub full_name: String,
    pub birth_date: String,
    pub class_name: String,
    pub gpa: String,
}

impl StudentForm {
    /// Prefill the form from a stored student.
    pub fn from_student(student: &Student) -> Self {
        Self {
            student_id: student.student_id.clone(),
            full_name: student.full_name.clone(),
            birth_date: student.birth_date.format(crate::types::DATE_FORMAT).to_string(),
            class_name: student.class_name.clone(),
            gpa: student.gpa.to_string(),
        }
    }

    fn raw(&self, field: FormField) -> &str {
        match field {
            FormField::StudentId => &self.student_id,
            FormField::FullName => &self.full_name,
            FormField::BirthDate => &self.birth_date,
            FormField::ClassName => &self.class_name,
            FormField::Gpa => &self.gpa,
        }
    }

    /// Trimmed value of a required field.
    fn required(&self, field: FormField) -> Result<&str, FieldError> {
        let value = self.raw(field).trim();
        if value.is_empty() {
            return Err(FieldError::Required(field));
        }
        Ok(value)
    }

    fn birth_date_value(&self) -> Result<NaiveDate, FieldError> {
        let value = self.required(FormField::BirthDate)?;
        parse_birth_date(value).map_err(|_| FieldError::InvalidDate)
    }

    fn gpa_value(&self) -> Result<Gpa, FieldError> {
        let value = self.required(FormField::Gpa)?;
        value.parse::<Gpa>().map_err(|e| match e {
            ValidationError::GpaOutOfRange(_) => FieldError::GpaOutOfRange,
            _ => FieldError::InvalidGpa,
        })
    }

    /// Validate a single field. Inputs are trimmed first.
    pub fn validate_field(&self, field: FormField) -> Result<(), FieldError> {
        match field {
            FormField::BirthDate => self.birth_date_value().map(|_| ()),
            FormField::Gpa => self.gpa_value().map(|_| ()),
            _ => self.required(field).map(|_| ()),
        }
    }

    /// Validate every field, collecting all failures.
    pub fn validate(&self) -> Result<StudentDraft, FormErrors> {
        let student_id = self.required(FormField::StudentId);
        let full_name = self.required(FormField::FullName);
        let birth_date = self.birth_date_value();
        let class_name = self.required(FormField::ClassName);
        let gpa = self.gpa_value();

        match (student_id, full_name, birth_date, class_name, gpa) {
            (Ok(student_id), Ok(full_name), Ok(birth_date), Ok(class_name), Ok(gpa)) => {
                Ok(StudentDraft {
                    student_id: student_id.to_string(),
                    update: StudentUpdate {
                        full_name: full_name.to_string(),
                        birth_date,
                        class_name: class_name.to_string(),
                        gpa,
                    },
                })
            }
            (student_id, full_name, birth_date, class_name, gpa) => {
                let mut errors = FormErrors::new();
                let results = [
                    (FormField::StudentId, student_id.err()),
                    (FormField::FullName, full_name.err()),
                    (FormField::BirthDate, birth_date.err()),
                    (FormField::ClassName, class_name.err()),
                    (FormField::Gpa, gpa.err()),
                ];
                for (field, error) in results {
                    if let Some(error) = error {
                        errors.insert(field, error);
                    }
                }
                Err(errors)
            }
        }
    }
}

/// A validated form, ready to be added or applied as an update.
#[derive(Clone, Debug, PartialEq)]
pub struct StudentDraft {
    pub student_id: String,
    pub update: StudentUpdate,
}

impl StudentDraft {
    pub fn into_student(self) -> Student {
        Student::new(
            self.student_id,
            self.update.full_name,
            self.update.birth_date,
            self.update.class_name,
            self.update.gpa,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> StudentForm {
        StudentForm {
            student_id: " SV006 ".into(),
            full_name: "  Đỗ Thị Mai ".into(),
            birth_date: "2003-07-01".into(),
            class_name: "KTPM-K16".into(),
            gpa: "3.5".into(),
        }
    }

    #[test]
    fn test_valid_form_is_trimmed() {
        let draft = filled().validate().unwrap();
        assert_eq!(draft.student_id, "SV006");
        assert_eq!(draft.update.full_name, "Đỗ Thị Mai");
        assert_eq!(draft.update.gpa.value(), 3.5);

        let student = draft.into_student();
        assert_eq!(student.formatted_birth_date(), "01/07/2003");
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let errors = StudentForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 5);
        for field in FormField::ALL {
            assert_eq!(errors.get(field), Some(&FieldError::Required(field)));
        }
        assert_eq!(
            errors.get(FormField::Gpa).unwrap().to_string(),
            "Please enter the GPA."
        );
    }

    #[test]
    fn test_gpa_errors() {
        let mut form = filled();
        form.gpa = "abc".into();
        assert_eq!(form.validate_field(FormField::Gpa), Err(FieldError::InvalidGpa));

        form.gpa = "4.5".into();
        assert_eq!(
            form.validate_field(FormField::Gpa),
            Err(FieldError::GpaOutOfRange)
        );

        form.gpa = "-1".into();
        assert_eq!(
            form.validate_field(FormField::Gpa),
            Err(FieldError::GpaOutOfRange)
        );

        form.gpa = "4".into();
        assert!(form.validate_field(FormField::Gpa).is_ok());
    }

    #[test]
    fn test_errors_match_per_field_checks() {
        let form = StudentForm {
            student_id: "SV007".into(),
            full_name: "   ".into(),
            birth_date: "07/01/2003".into(),
            class_name: "CNTT-K15".into(),
            gpa: "9".into(),
        };
        let errors = form.validate().unwrap_err();

        assert_eq!(errors.len(), 3);
        for field in FormField::ALL {
            assert_eq!(errors.get(field), form.validate_field(field).err().as_ref());
        }
        assert_eq!(errors.get(FormField::Gpa), Some(&FieldError::GpaOutOfRange));
    }

    #[test]
    fn test_invalid_date() {
        let mut form = filled();
        form.birth_date = "2003-02-30".into();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(FormField::BirthDate), Some(&FieldError::InvalidDate));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_prefill_round_trips() {
        let student = filled().validate().unwrap().into_student();
        let form = StudentForm::from_student(&student);
        assert_eq!(form.validate().unwrap().into_student(), student);
    }
}
