//! Object types for the records entities.

use std::any::Any;

use async_graphql::Value;
use async_graphql::dynamic::{Field, FieldFuture, Object, TypeRef};

use crate::model::{Comment, File, Patient};
use crate::resolvers::NestedResolver;

pub const PATIENT: &str = "Patient";
pub const FILE: &str = "File";
pub const COMMENT: &str = "Comment";

/// A field projecting one text attribute of the parent entity.
fn text_field<T: Any + Send + Sync>(
    name: &str,
    type_ref: TypeRef,
    read: fn(&T) -> Option<&str>,
) -> Field {
    Field::new(name, type_ref, move |ctx| {
        FieldFuture::new(async move {
            let parent = ctx.parent_value.try_downcast_ref::<T>()?;
            Ok(read(parent).map(|s| Value::String(s.to_string())))
        })
    })
}

pub fn patient_type() -> Object {
    Object::new(PATIENT)
        .description("A patient. Patients are created outside this API.")
        .field(text_field::<Patient>(
            "id",
            TypeRef::named_nn(TypeRef::ID),
            |p| Some(p.id.as_str()),
        ))
        .field(text_field::<Patient>(
            "name",
            TypeRef::named(TypeRef::STRING),
            |p| p.name.as_deref(),
        ))
        .field(text_field::<Patient>(
            "dob",
            TypeRef::named(TypeRef::STRING),
            |p| p.dob.as_deref(),
        ))
        .field(
            Field::new(
                "files",
                TypeRef::named_nn_list(FILE),
                NestedResolver::patient_files(),
            )
            .description("Files stored under this patient"),
        )
}

pub fn file_type() -> Object {
    Object::new(FILE)
        .description("A file attached to a patient record")
        .field(text_field::<File>("id", TypeRef::named(TypeRef::ID), |f| {
            f.id.as_deref()
        }))
        .field(text_field::<File>(
            "filename",
            TypeRef::named(TypeRef::STRING),
            |f| f.filename.as_deref(),
        ))
        .field(
            text_field::<File>("gsRef", TypeRef::named(TypeRef::STRING), |f| {
                f.gs_ref.as_deref()
            })
            .description("Opaque reference to the stored blob"),
        )
        .field(
            Field::new(
                "comments",
                TypeRef::named_nn_list(COMMENT),
                NestedResolver::file_comments(),
            )
            .description("Comments on this file"),
        )
        .field(text_field::<File>(
            "patientID",
            TypeRef::named(TypeRef::STRING),
            |f| f.patient_id.as_deref(),
        ))
}

pub fn comment_type() -> Object {
    Object::new(COMMENT)
        .description("A comment on a file")
        .field(text_field::<Comment>(
            "id",
            TypeRef::named(TypeRef::ID),
            |c| c.id.as_deref(),
        ))
        .field(text_field::<Comment>(
            "text",
            TypeRef::named(TypeRef::STRING),
            |c| c.text.as_deref(),
        ))
        .field(text_field::<Comment>(
            "author",
            TypeRef::named(TypeRef::STRING),
            |c| c.author.as_deref(),
        ))
        .field(text_field::<Comment>(
            "date",
            TypeRef::named(TypeRef::STRING),
            |c| c.date.as_deref(),
        ))
}
