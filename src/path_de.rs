//! serde with the JSON path of the first failure attached.
use serde::de::DeserializeOwned;

use crate::error::Error;

/// Where inside the document deserialization failed, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathError {
    pub path: String,
    pub message: String,
}

impl PathError {
    pub fn into_model_error(self) -> Error {
        Error::Model { path: self.path, message: self.message }
    }

    pub fn into_type_error(self) -> Error {
        Error::TypeDescriptor { path: self.path, message: self.message }
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for PathError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        PathError { path: err.path().to_string(), message: err.into_inner().to_string() }
    }
}

pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, PathError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    Ok(serde_path_to_error::deserialize::<_, T>(de)?)
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, PathError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    Ok(serde_path_to_error::deserialize::<_, T>(de)?)
}
