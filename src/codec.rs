//! Encoding of the persisted student blob.
//!
//! The blob is a JSON array of objects with the fields
//! `studentId`, `fullName`, `birthDate`, `className` and `gpa`.

use crate::error::{Result, StoreError};
use crate::types::Student;
use std::collections::HashSet;

/// Encode the full collection as a JSON array.
pub fn encode(students: &[Student]) -> Result<String> {
    serde_json::to_string(students).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Decode a JSON array back into typed records.
///
/// Fails on malformed JSON, invalid field values, or duplicate identifiers.
pub fn decode(blob: &str) -> Result<Vec<Student>> {
    let students: Vec<Student> =
        serde_json::from_str(blob).map_err(|e| StoreError::Deserialization(e.to_string()))?;

    let mut seen = HashSet::with_capacity(students.len());
    for student in &students {
        if !seen.insert(student.student_id.as_str()) {
            return Err(StoreError::Corruption(format!(
                "Duplicate student id in persisted data: {}",
                student.student_id
            )));
        }
    }

    Ok(students)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{parse_birth_date, Gpa};

    #[test]
    fn test_decode_numeric_string_gpa() {
        let blob = r#"[{"studentId":"SV001","fullName":"Nguyễn Văn An","birthDate":"2002-05-15","className":"CNTT-K15","gpa":"3.45"}]"#;
        let students = decode(blob).unwrap();
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].gpa.value(), 3.45);
        assert_eq!(students[0].birth_date, parse_birth_date("2002-05-15").unwrap());
    }

    #[test]
    fn test_encode_layout() {
        let students = vec![Student::new(
            "SV003",
            "Lê Hoàng Cường",
            parse_birth_date("2003-01-10").unwrap(),
            "KTPM-K16",
            Gpa::new(3.12).unwrap(),
        )];
        let blob = encode(&students).unwrap();
        assert_eq!(
            blob,
            r#"[{"studentId":"SV003","fullName":"Lê Hoàng Cường","birthDate":"2003-01-10","className":"KTPM-K16","gpa":3.12}]"#
        );
    }

    #[test]
    fn test_decode_empty_array() {
        assert!(decode("[]").unwrap().is_empty());
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert!(matches!(decode("{not json"), Err(StoreError::Deserialization(_))));
        assert!(matches!(decode("{}"), Err(StoreError::Deserialization(_))));
    }

    #[test]
    fn test_decode_rejects_bad_fields() {
        let bad_date = r#"[{"studentId":"A","fullName":"x","birthDate":"15/05/2002","className":"c","gpa":3}]"#;
        let bad_gpa = r#"[{"studentId":"A","fullName":"x","birthDate":"2002-05-15","className":"c","gpa":9.1}]"#;
        let missing = r#"[{"studentId":"A","fullName":"x","birthDate":"2002-05-15","gpa":3}]"#;
        assert!(matches!(decode(bad_date), Err(StoreError::Deserialization(_))));
        assert!(matches!(decode(bad_gpa), Err(StoreError::Deserialization(_))));
        assert!(matches!(decode(missing), Err(StoreError::Deserialization(_))));
    }

    #[test]
    fn test_decode_rejects_duplicate_ids() {
        let blob = r#"[
            {"studentId":"A","fullName":"x","birthDate":"2002-05-15","className":"c","gpa":3},
            {"studentId":"A","fullName":"y","birthDate":"2002-05-16","className":"c","gpa":2}
        ]"#;
        assert!(matches!(decode(blob), Err(StoreError::Corruption(_))));
    }
}
