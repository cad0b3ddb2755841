use std::collections::HashMap;

use thiserror::Error;

use crate::types::TypeDescriptor;

/// A type lookup failed for an infrastructural reason (unreadable entry,
/// malformed classfile). "Not found" is `Ok(None)`, not an error.
#[derive(Debug, Error)]
#[error("failed to load type `{name}`")]
pub struct ProviderError {
    pub name: String,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl ProviderError {
    pub fn new(
        name: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            source: Box::new(source),
        }
    }
}

/// The reflection facility boundary: binary name to descriptor.
pub trait TypeProvider {
    fn find_type(&self, binary_name: &str) -> Result<Option<TypeDescriptor>, ProviderError>;
}

/// In-memory provider over a fixed set of descriptors.
#[derive(Debug, Default)]
pub struct MapProvider {
    types: HashMap<String, TypeDescriptor>,
}

impl MapProvider {
    pub fn new(types: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        Self {
            types: types
                .into_iter()
                .map(|ty| (ty.binary_name.clone(), ty))
                .collect(),
        }
    }
}

impl TypeProvider for MapProvider {
    fn find_type(&self, binary_name: &str) -> Result<Option<TypeDescriptor>, ProviderError> {
        Ok(self.types.get(binary_name).cloned())
    }
}
