//! Collection layout of the records store.
//!
//! ```text
//! patients/{patientId}
//! patients/{patientId}/files/{fileId}
//! patients/{patientId}/files/{fileId}/comments/{commentId}
//! ```
//!
//! Nothing is addressed by a bare id: every path is built from all of its
//! ancestor keys.

use medrecords_storage::{CollectionPath, DocumentPath, StorageResult};

/// Root collection of patient documents.
pub const PATIENTS: &str = "patients";
/// Sub-collection of files under a patient.
pub const FILES: &str = "files";
/// Sub-collection of comments under a file.
pub const COMMENTS: &str = "comments";

/// `patients`
pub fn patients() -> StorageResult<CollectionPath> {
    CollectionPath::root(PATIENTS)
}

/// `patients/{patient_id}`
pub fn patient(patient_id: &str) -> StorageResult<DocumentPath> {
    patients()?.doc(patient_id)
}

/// `patients/{patient_id}/files`
pub fn files(patient_id: &str) -> StorageResult<CollectionPath> {
    patient(patient_id)?.child(FILES)
}

/// `patients/{patient_id}/files/{file_id}/comments`
pub fn comments(patient_id: &str, file_id: &str) -> StorageResult<CollectionPath> {
    files(patient_id)?.doc(file_id)?.child(COMMENTS)
}

/// `patients/{patient_id}/files/{file_id}/comments/{comment_id}`
pub fn comment(patient_id: &str, file_id: &str, comment_id: &str) -> StorageResult<DocumentPath> {
    comments(patient_id, file_id)?.doc(comment_id)
}
