//! The generic `Signature` attribute grammar (JVMS 4.7.9.1).
//!
//! Signatures describe what descriptors erase: formal type parameters and
//! their bounds, parameterized supertypes, type-variable uses, wildcard
//! arguments, and generic `throws` clauses.

use crate::descriptor::BaseType;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSignature {
    pub type_parameters: Vec<TypeParameter>,
    pub superclass: ClassTypeSignature,
    pub interfaces: Vec<ClassTypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<TypeSignature>,
    /// `None` for `void`.
    pub return_type: Option<TypeSignature>,
    /// Class-type or type-variable signatures from `^` throws clauses.
    pub throws: Vec<TypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: String,
    pub class_bound: Option<TypeSignature>,
    pub interface_bounds: Vec<TypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    Base(BaseType),
    Class(ClassTypeSignature),
    TypeVariable(String),
    Array(Box<TypeSignature>),
}

/// `La/b/Outer<X>.Inner<Y>;` — an outermost name plus nested projections,
/// each with its own type arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTypeSignature {
    /// Internal (slash-separated) name of the outermost class in the chain.
    pub name: String,
    pub type_arguments: Vec<TypeArgument>,
    /// `.Inner<Args>` suffixes, outermost first.
    pub inner: Vec<(String, Vec<TypeArgument>)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArgument {
    /// `*`
    Wildcard,
    /// `+X` — `? extends X`
    Extends(TypeSignature),
    /// `-X` — `? super X`
    Super(TypeSignature),
    Exact(TypeSignature),
}

pub fn parse_class_signature(sig: &str) -> Result<ClassSignature> {
    let mut p = Parser::new(sig);
    let type_parameters = p.type_parameters()?;
    let superclass = p.class_type_signature()?;
    let mut interfaces = Vec::new();
    while !p.at_end() {
        interfaces.push(p.class_type_signature()?);
    }
    Ok(ClassSignature {
        type_parameters,
        superclass,
        interfaces,
    })
}

pub fn parse_method_signature(sig: &str) -> Result<MethodSignature> {
    let mut p = Parser::new(sig);
    let type_parameters = p.type_parameters()?;
    p.expect('(')?;
    let mut parameters = Vec::new();
    while !p.eat(')') {
        parameters.push(p.type_signature()?);
    }
    let return_type = if p.eat('V') {
        None
    } else {
        Some(p.type_signature()?)
    };
    let mut throws = Vec::new();
    while p.eat('^') {
        let thrown = match p.peek()? {
            'T' => p.type_variable()?,
            _ => TypeSignature::Class(p.class_type_signature()?),
        };
        throws.push(thrown);
    }
    p.finish()?;
    Ok(MethodSignature {
        type_parameters,
        parameters,
        return_type,
        throws,
    })
}

struct Parser<'a> {
    source: &'a str,
    rest: &'a str,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            rest: source,
        }
    }

    fn error(&self) -> Error {
        Error::InvalidSignature(self.source.to_string())
    }

    fn at_end(&self) -> bool {
        self.rest.is_empty()
    }

    fn finish(&self) -> Result<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    fn peek(&self) -> Result<char> {
        self.rest.chars().next().ok_or_else(|| self.error())
    }

    fn bump(&mut self) -> Result<char> {
        let c = self.peek()?;
        self.rest = &self.rest[c.len_utf8()..];
        Ok(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if let Some(after) = self.rest.strip_prefix(expected) {
            self.rest = after;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error())
        }
    }

    /// Identifier: any run of chars excluding the signature metacharacters.
    fn identifier(&mut self) -> Result<String> {
        let end = self
            .rest
            .find(|c| ".;[/<>:".contains(c))
            .unwrap_or(self.rest.len());
        if end == 0 {
            return Err(self.error());
        }
        let (ident, rest) = self.rest.split_at(end);
        self.rest = rest;
        Ok(ident.to_string())
    }

    fn type_parameters(&mut self) -> Result<Vec<TypeParameter>> {
        if !self.eat('<') {
            return Ok(Vec::new());
        }
        let mut params = Vec::new();
        while !self.eat('>') {
            let name = self.identifier()?;
            self.expect(':')?;
            // The class bound may be empty (`T::Ljava/lang/Runnable;`).
            let class_bound = match self.peek()? {
                ':' => None,
                _ => Some(self.type_signature()?),
            };
            let mut interface_bounds = Vec::new();
            while self.eat(':') {
                interface_bounds.push(self.type_signature()?);
            }
            params.push(TypeParameter {
                name,
                class_bound,
                interface_bounds,
            });
        }
        if params.is_empty() {
            return Err(self.error());
        }
        Ok(params)
    }

    fn type_signature(&mut self) -> Result<TypeSignature> {
        match self.peek()? {
            'L' => Ok(TypeSignature::Class(self.class_type_signature()?)),
            'T' => self.type_variable(),
            '[' => {
                self.bump()?;
                Ok(TypeSignature::Array(Box::new(self.type_signature()?)))
            }
            tag => {
                if let Some(base) = BaseType::from_signature_tag(tag) {
                    self.bump()?;
                    Ok(TypeSignature::Base(base))
                } else {
                    Err(self.error())
                }
            }
        }
    }

    fn type_variable(&mut self) -> Result<TypeSignature> {
        self.expect('T')?;
        let name = self.identifier()?;
        self.expect(';')?;
        Ok(TypeSignature::TypeVariable(name))
    }

    fn class_type_signature(&mut self) -> Result<ClassTypeSignature> {
        self.expect('L')?;
        let mut name = self.identifier()?;
        while self.eat('/') {
            name.push('/');
            name.push_str(&self.identifier()?);
        }
        let type_arguments = self.type_arguments()?;
        let mut inner = Vec::new();
        while self.eat('.') {
            let segment = self.identifier()?;
            let args = self.type_arguments()?;
            inner.push((segment, args));
        }
        self.expect(';')?;
        Ok(ClassTypeSignature {
            name,
            type_arguments,
            inner,
        })
    }

    fn type_arguments(&mut self) -> Result<Vec<TypeArgument>> {
        if !self.eat('<') {
            return Ok(Vec::new());
        }
        let mut args = Vec::new();
        while !self.eat('>') {
            let arg = match self.peek()? {
                '*' => {
                    self.bump()?;
                    TypeArgument::Wildcard
                }
                '+' => {
                    self.bump()?;
                    TypeArgument::Extends(self.type_signature()?)
                }
                '-' => {
                    self.bump()?;
                    TypeArgument::Super(self.type_signature()?)
                }
                _ => TypeArgument::Exact(self.type_signature()?),
            };
            args.push(arg);
        }
        if args.is_empty() {
            return Err(self.error());
        }
        Ok(args)
    }
}

impl BaseType {
    fn from_signature_tag(tag: char) -> Option<Self> {
        Some(match tag {
            'B' => BaseType::Byte,
            'C' => BaseType::Char,
            'D' => BaseType::Double,
            'F' => BaseType::Float,
            'I' => BaseType::Int,
            'J' => BaseType::Long,
            'S' => BaseType::Short,
            'Z' => BaseType::Boolean,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn class_signature_with_bounded_parameter() {
        let sig = parse_class_signature(
            "<T:Ljava/lang/Number;:Ljava/lang/Comparable<TT;>;>Ljava/lang/Object;Ljava/util/List<TT;>;",
        )
        .unwrap();
        assert_eq!(sig.type_parameters.len(), 1);
        let param = &sig.type_parameters[0];
        assert_eq!(param.name, "T");
        assert_eq!(
            param.class_bound,
            Some(TypeSignature::Class(ClassTypeSignature {
                name: "java/lang/Number".to_string(),
                type_arguments: vec![],
                inner: vec![],
            }))
        );
        assert_eq!(param.interface_bounds.len(), 1);
        assert_eq!(sig.superclass.name, "java/lang/Object");
        assert_eq!(sig.interfaces.len(), 1);
        assert_eq!(sig.interfaces[0].name, "java/util/List");
    }

    #[test]
    fn method_signature_with_generics_and_throws() {
        let sig = parse_method_signature(
            "<X:Ljava/lang/Object;>(TX;Ljava/util/List<+Ljava/lang/Number;>;)TX;^Ljava/io/IOException;",
        )
        .unwrap();
        assert_eq!(sig.type_parameters[0].name, "X");
        assert_eq!(sig.parameters.len(), 2);
        assert_eq!(
            sig.parameters[0],
            TypeSignature::TypeVariable("X".to_string())
        );
        assert_eq!(
            sig.return_type,
            Some(TypeSignature::TypeVariable("X".to_string()))
        );
        assert_eq!(sig.throws.len(), 1);
    }

    #[test]
    fn method_signature_void_and_wildcards() {
        let sig = parse_method_signature("(Ljava/util/Map<*-TV;>;)V").unwrap();
        assert_eq!(sig.return_type, None);
        match &sig.parameters[0] {
            TypeSignature::Class(class) => {
                assert_eq!(
                    class.type_arguments,
                    vec![
                        TypeArgument::Wildcard,
                        TypeArgument::Super(TypeSignature::TypeVariable("V".to_string())),
                    ]
                );
            }
            other => panic!("expected class signature, got {other:?}"),
        }
    }

    #[test]
    fn nested_generic_class_signature() {
        let sig = parse_method_signature("()La/Outer<TT;>.Inner<Ljava/lang/String;>;").unwrap();
        match sig.return_type.unwrap() {
            TypeSignature::Class(class) => {
                assert_eq!(class.name, "a/Outer");
                assert_eq!(class.inner.len(), 1);
                assert_eq!(class.inner[0].0, "Inner");
            }
            other => panic!("expected class signature, got {other:?}"),
        }
    }

    #[test]
    fn rejects_truncated_signatures() {
        assert!(parse_method_signature("(").is_err());
        assert!(parse_class_signature("<T:>Ljava/lang/Object;").is_err());
        assert!(parse_method_signature("()Ljava/lang/String").is_err());
    }
}
