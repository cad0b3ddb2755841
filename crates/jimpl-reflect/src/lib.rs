//! Platform-independent view of Java types for implementation synthesis.
//!
//! The synthesizer never touches a reflection runtime or classfile bytes
//! directly; it works against immutable [`TypeDescriptor`]s obtained from a
//! [`TypeProvider`]. The host implementation backs the trait with classpath
//! lookups; tests back it with an in-memory map.

#![forbid(unsafe_code)]

mod collect;
mod provider;
mod types;

pub use crate::collect::{generation_plan, CollectError, GenerationPlan};
pub use crate::provider::{MapProvider, ProviderError, TypeProvider};
pub use crate::types::{
    ConstructorDescriptor, JavaType, MethodDescriptor, MethodKey, Modifiers, TypeDescriptor,
    TypeKind, TypeParameter,
};
