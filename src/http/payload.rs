use std::collections::BTreeMap;
use std::path::PathBuf;

use serde_json::Value;

use crate::error::HttpError;

/// Request body handed to a [`RequestExecutor`](super::RequestExecutor).
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Objects and arrays are sent as JSON, scalars as plain text.
    Json(Value),
    Raw(String),
    /// Form upload: each field maps to a file on disk, `data` carries the
    /// text fields.
    Multipart {
        files: BTreeMap<String, PathBuf>,
        data: Option<Value>,
    },
}

impl Payload {
    /// Interprets a JSON payload, treating `{"files": {...}, "data": ...}`
    /// as a multipart upload.
    ///
    /// # Errors
    ///
    /// Returns an error when `files` is not an object of string paths.
    pub fn from_json(value: Value) -> Result<Self, HttpError> {
        let Value::Object(mut object) = value else {
            return Ok(Payload::Json(value));
        };
        let Some(files_value) = object.remove("files") else {
            return Ok(Payload::Json(Value::Object(object)));
        };
        let Value::Object(entries) = files_value else {
            return Err(HttpError::InvalidFilesPayload);
        };
        let mut files = BTreeMap::new();
        for (field, path) in entries {
            let Value::String(path) = path else {
                return Err(HttpError::InvalidFilesPayload);
            };
            files.insert(field, PathBuf::from(path));
        }
        let data = object.remove("data").filter(|data| !data.is_null());
        Ok(Payload::Multipart { files, data })
    }

    /// The value recorded alongside a request in the load-test report.
    #[must_use]
    pub fn echo(&self) -> Value {
        match self {
            Payload::Json(value) => value.clone(),
            Payload::Raw(text) => Value::String(text.clone()),
            Payload::Multipart { data, .. } => data.clone().unwrap_or(Value::Null),
        }
    }
}
