//! Entities projected from stored documents.
//!
//! Stored bodies are schema-less JSON maps. Strings are taken verbatim,
//! numbers and booleans are rendered as strings, and anything else reads as
//! absent.

use medrecords_storage::{CollectionPath, Document, Fields, StorageResult};
use serde_json::Value;

use crate::paths;

/// Body field names.
pub mod fields {
    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const DOB: &str = "dob";
    pub const FILENAME: &str = "filename";
    pub const GS_REF: &str = "gsRef";
    pub const PATIENT_ID: &str = "patientID";
    pub const TEXT: &str = "text";
    pub const AUTHOR: &str = "author";
    pub const DATE: &str = "date";
}

/// Reads a body field as text.
pub(crate) fn text(body: &Fields, name: &str) -> Option<String> {
    match body.get(name)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A patient. Patients are created outside the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub id: String,
    pub name: Option<String>,
    pub dob: Option<String>,
}

impl Patient {
    /// Builds a patient, falling back to the document key when the body
    /// carries no `id`.
    #[must_use]
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: text(&doc.fields, fields::ID).unwrap_or_else(|| doc.id().to_string()),
            name: text(&doc.fields, fields::NAME),
            dob: text(&doc.fields, fields::DOB),
        }
    }

    /// Collection holding this patient's files.
    pub fn files_path(&self) -> StorageResult<CollectionPath> {
        paths::files(&self.id)
    }
}

/// A file attached to a patient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub id: Option<String>,
    pub filename: Option<String>,
    pub gs_ref: Option<String>,
    pub patient_id: Option<String>,
}

impl File {
    #[must_use]
    pub fn from_fields(body: &Fields) -> Self {
        Self {
            id: text(body, fields::ID),
            filename: text(body, fields::FILENAME),
            gs_ref: text(body, fields::GS_REF),
            patient_id: text(body, fields::PATIENT_ID),
        }
    }

    #[must_use]
    pub fn from_document(doc: &Document) -> Self {
        Self::from_fields(&doc.fields)
    }

    /// Collection holding this file's comments, or `None` when the body
    /// lacks either ancestor key.
    pub fn comments_path(&self) -> Option<StorageResult<CollectionPath>> {
        match (&self.patient_id, &self.id) {
            (Some(patient_id), Some(file_id)) => Some(paths::comments(patient_id, file_id)),
            _ => None,
        }
    }
}

/// A comment on a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: Option<String>,
    pub text: Option<String>,
    pub author: Option<String>,
    pub date: Option<String>,
}

impl Comment {
    #[must_use]
    pub fn from_fields(body: &Fields) -> Self {
        Self {
            id: text(body, fields::ID),
            text: text(body, fields::TEXT),
            author: text(body, fields::AUTHOR),
            date: text(body, fields::DATE),
        }
    }

    #[must_use]
    pub fn from_document(doc: &Document) -> Self {
        Self::from_fields(&doc.fields)
    }
}
