//! Up-front screening of synthesis targets.
//!
//! A target that cannot be subclassed in source is rejected here, before any
//! filesystem or compiler work starts.

use std::fmt;

use jimpl_reflect::{TypeDescriptor, TypeKind};

const PRIMITIVE_NAMES: [&str; 9] = [
    "void", "boolean", "byte", "char", "short", "int", "long", "float", "double",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IneligibleReason {
    ArrayType,
    PrimitiveType,
    EnumType,
    FinalType,
    PrivateType,
    LocalOrAnonymousType,
    SealedType,
    RecordType,
}

impl fmt::Display for IneligibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IneligibleReason::ArrayType => "array types cannot be extended",
            IneligibleReason::PrimitiveType => "primitive types cannot be extended",
            IneligibleReason::EnumType => "enum types cannot be extended",
            IneligibleReason::FinalType => "final types cannot be extended",
            IneligibleReason::PrivateType => "the type is not visible outside its declaring class",
            IneligibleReason::LocalOrAnonymousType => {
                "local and anonymous types cannot be named in source"
            }
            IneligibleReason::SealedType => "sealed types admit no further subclasses",
            IneligibleReason::RecordType => "record types cannot be extended",
        };
        f.write_str(text)
    }
}

/// Reject names that can never resolve to an extensible declaration, before
/// any classpath lookup.
pub fn reject_by_name(type_name: &str) -> Option<IneligibleReason> {
    if type_name.ends_with("[]") || type_name.starts_with('[') {
        return Some(IneligibleReason::ArrayType);
    }
    if PRIMITIVE_NAMES.contains(&type_name) {
        return Some(IneligibleReason::PrimitiveType);
    }
    None
}

/// Check a resolved target. The first failing rule wins; callers report a
/// single reason.
pub fn check(target: &TypeDescriptor) -> Result<(), IneligibleReason> {
    match target.kind {
        TypeKind::Array => return Err(IneligibleReason::ArrayType),
        TypeKind::Primitive => return Err(IneligibleReason::PrimitiveType),
        TypeKind::Enum => return Err(IneligibleReason::EnumType),
        TypeKind::Record => return Err(IneligibleReason::RecordType),
        TypeKind::Class | TypeKind::Interface | TypeKind::Annotation => {}
    }
    // The enum root itself is an abstract class, but extending it is as
    // impossible as extending a declared enum.
    if target.binary_name == "java.lang.Enum" || target.modifiers.is_enum() {
        return Err(IneligibleReason::EnumType);
    }
    if target.modifiers.is_final() {
        return Err(IneligibleReason::FinalType);
    }
    if target.modifiers.is_private() {
        return Err(IneligibleReason::PrivateType);
    }
    if target.local_or_anonymous {
        return Err(IneligibleReason::LocalOrAnonymousType);
    }
    if target.sealed {
        return Err(IneligibleReason::SealedType);
    }
    Ok(())
}
