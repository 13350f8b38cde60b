//! Class metadata the reference navigator encodes and decodes objects with.
//!
//! ```json
//! {
//!   "classes": {
//!     "Cat":    { "properties": { "lives": "int" } },
//!     "Circle": { "properties": { "kind": "string", "radius": "float" } }
//!   }
//! }
//! ```
use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::Result;
use crate::path_de::PathError;
use crate::types::TypeDescriptor;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClassMetadata {
    #[serde(skip)]
    pub name: String,
    /// declaration order is encoding order
    #[serde(default)]
    pub properties: IndexMap<String, TypeDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Model {
    #[serde(default)]
    classes: IndexMap<String, ClassMetadata>,
}

impl ClassMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), properties: IndexMap::new() }
    }

    pub fn property(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.properties.insert(name.into(), ty);
        self
    }
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(src: &str) -> Result<Self> {
        let model: Model = crate::path_de::from_str_with_path(src).map_err(PathError::into_model_error)?;
        Ok(model.named())
    }

    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let model: Model = crate::path_de::from_slice_with_path(bytes).map_err(PathError::into_model_error)?;
        Ok(model.named())
    }

    pub fn with_class(mut self, class: ClassMetadata) -> Self {
        self.classes.insert(class.name.clone(), class);
        self
    }

    pub fn class(&self, name: &str) -> Option<&ClassMetadata> {
        self.classes.get(name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassMetadata> {
        self.classes.values()
    }

    // names live in the map keys on disk
    fn named(mut self) -> Self {
        for (name, class) in self.classes.iter_mut() {
            class.name = name.clone();
        }
        self
    }
}
