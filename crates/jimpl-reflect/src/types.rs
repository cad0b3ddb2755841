use std::path::PathBuf;

/// JVM access and property flags, with the effective nested-class flags
/// already merged in for nested types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers(pub u16);

impl Modifiers {
    pub const PUBLIC: u16 = 0x0001;
    pub const PRIVATE: u16 = 0x0002;
    pub const PROTECTED: u16 = 0x0004;
    pub const STATIC: u16 = 0x0008;
    pub const FINAL: u16 = 0x0010;
    pub const SYNCHRONIZED: u16 = 0x0020;
    pub const VARARGS: u16 = 0x0080;
    pub const NATIVE: u16 = 0x0100;
    pub const INTERFACE: u16 = 0x0200;
    pub const ABSTRACT: u16 = 0x0400;
    pub const STRICT: u16 = 0x0800;
    pub const SYNTHETIC: u16 = 0x1000;
    pub const BRIDGE: u16 = 0x0040;
    pub const ENUM: u16 = 0x4000;

    fn has(self, flag: u16) -> bool {
        self.0 & flag != 0
    }

    pub fn is_public(self) -> bool {
        self.has(Self::PUBLIC)
    }

    pub fn is_private(self) -> bool {
        self.has(Self::PRIVATE)
    }

    pub fn is_protected(self) -> bool {
        self.has(Self::PROTECTED)
    }

    pub fn is_static(self) -> bool {
        self.has(Self::STATIC)
    }

    pub fn is_final(self) -> bool {
        self.has(Self::FINAL)
    }

    pub fn is_abstract(self) -> bool {
        self.has(Self::ABSTRACT)
    }

    pub fn is_interface(self) -> bool {
        self.has(Self::INTERFACE)
    }

    pub fn is_enum(self) -> bool {
        self.has(Self::ENUM)
    }

    pub fn is_varargs(self) -> bool {
        self.has(Self::VARARGS)
    }

    /// Synthetic members and bridge methods are JVM artifacts, never source
    /// obligations.
    pub fn is_synthetic_or_bridge(self) -> bool {
        self.has(Self::SYNTHETIC) || self.has(Self::BRIDGE)
    }

    /// Source keywords in `java.lang.reflect.Modifier` order, with
    /// `abstract`, `native`, and `transient`/varargs stripped — they are
    /// meaningless on a concrete stub.
    pub fn source_tokens(self) -> Vec<&'static str> {
        let mut tokens = Vec::new();
        if self.has(Self::PUBLIC) {
            tokens.push("public");
        }
        if self.has(Self::PROTECTED) {
            tokens.push("protected");
        }
        if self.has(Self::PRIVATE) {
            tokens.push("private");
        }
        if self.has(Self::STATIC) {
            tokens.push("static");
        }
        if self.has(Self::FINAL) {
            tokens.push("final");
        }
        if self.has(Self::SYNCHRONIZED) {
            tokens.push("synchronized");
        }
        if self.has(Self::STRICT) {
            tokens.push("strictfp");
        }
        tokens
    }
}

/// A type as it appears in a member signature.
///
/// `erased` is the canonical erased name (`int`, `java.util.List`,
/// `java.lang.String[]`) and is what signature identity is computed from.
/// `source` is the full source rendering, generics included
/// (`java.util.List<? extends T>`); for non-generic members the two match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JavaType {
    pub erased: String,
    pub source: String,
}

const PRIMITIVES: [&str; 8] = [
    "boolean", "byte", "char", "short", "int", "long", "float", "double",
];

impl JavaType {
    pub fn void() -> Self {
        Self::simple("void")
    }

    /// A type whose source rendering equals its erased name.
    pub fn simple(name: impl Into<String>) -> Self {
        let erased = name.into();
        Self {
            source: erased.clone(),
            erased,
        }
    }

    pub fn generic(erased: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            erased: erased.into(),
            source: source.into(),
        }
    }

    pub fn is_void(&self) -> bool {
        self.erased == "void"
    }

    pub fn is_boolean(&self) -> bool {
        self.erased == "boolean"
    }

    pub fn is_primitive(&self) -> bool {
        PRIMITIVES.contains(&self.erased.as_str())
    }
}

/// A formal type parameter with its source-level bounds
/// (`T extends java.lang.Number & java.lang.Comparable<T>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: String,
    pub bounds: Vec<String>,
}

impl TypeParameter {
    pub fn unbounded(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    pub modifiers: Modifiers,
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<JavaType>,
    pub return_type: JavaType,
    /// Declared checked exceptions, in source form.
    pub throws: Vec<String>,
}

impl MethodDescriptor {
    pub fn key(&self) -> MethodKey {
        MethodKey {
            name: self.name.clone(),
            parameters: self.parameters.iter().map(|p| p.erased.clone()).collect(),
            return_type: self.return_type.erased.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorDescriptor {
    pub modifiers: Modifiers,
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<JavaType>,
    pub throws: Vec<String>,
}

/// Signature identity for deduplication: name, erased parameter types, and
/// erased return type. Exact match only — covariant returns that differ
/// textually are distinct obligations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodKey {
    pub name: String,
    pub parameters: Vec<String>,
    pub return_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Annotation,
    Enum,
    Record,
    Primitive,
    Array,
}

/// Immutable snapshot of one Java type. Owned by the caller; the synthesizer
/// never mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Dot-separated binary name, `$` separating nested types
    /// (`a.b.Outer$Inner`).
    pub binary_name: String,
    pub kind: TypeKind,
    pub modifiers: Modifiers,
    /// Binary name of the superclass; `None` for `java.lang.Object`,
    /// primitives, and interfaces modeled without one.
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub type_parameters: Vec<TypeParameter>,
    /// Declared methods in classfile order (initializers excluded).
    pub methods: Vec<MethodDescriptor>,
    /// Declared constructors in classfile order.
    pub constructors: Vec<ConstructorDescriptor>,
    /// Sealed types declare permitted subclasses and admit no others.
    pub sealed: bool,
    /// Local and anonymous classes have no source-referenceable name.
    pub local_or_anonymous: bool,
    /// The classpath entry the type was loaded from, when known.
    pub origin: Option<PathBuf>,
}

impl TypeDescriptor {
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface | TypeKind::Annotation)
    }

    /// Package name, empty for the default package.
    pub fn package(&self) -> &str {
        match self.binary_name.rfind('.') {
            Some(idx) => &self.binary_name[..idx],
            None => "",
        }
    }

    /// Simple name: the segment after the last `.` and `$`.
    pub fn simple_name(&self) -> &str {
        let after_dot = match self.binary_name.rfind('.') {
            Some(idx) => &self.binary_name[idx + 1..],
            None => &self.binary_name,
        };
        match after_dot.rfind('$') {
            Some(idx) => &after_dot[idx + 1..],
            None => after_dot,
        }
    }

    /// Canonical (source-level) name: nested-type `$` rewritten to `.`.
    pub fn canonical_name(&self) -> String {
        self.binary_name.replace('$', ".")
    }
}
