//! Lowering parsed classfiles into reflection descriptors.
//!
//! Erased types come from member descriptors; where a generic `Signature`
//! attribute is present it supplies the source rendering (type variables,
//! bounds, wildcards, generic throws). Internal `/` separators become `.`;
//! nested-type `$` separators are left for the renderer to rewrite.

use jimpl_classfile::{
    ClassFile, ClassMember, ClassTypeSignature, FieldType, MethodSignature, ReturnType,
    TypeArgument, TypeSignature,
};
use jimpl_reflect::{
    ConstructorDescriptor, JavaType, MethodDescriptor, Modifiers, TypeDescriptor, TypeKind,
    TypeParameter,
};

use crate::ClasspathError;

const OBJECT: &str = "java.lang.Object";

pub fn lower_classfile(classfile: &ClassFile) -> Result<TypeDescriptor, ClasspathError> {
    let binary_name = classfile.this_class.replace('/', ".");

    // Nested types carry their declared access in the InnerClasses attribute;
    // the classfile-level flags lose `private`/`protected`/`static`.
    let own_info = classfile.own_inner_class_info();
    let modifiers = Modifiers(own_info.map_or(classfile.access_flags, |info| info.access_flags));
    let local_or_anonymous =
        own_info.is_some_and(|info| info.inner_name.is_none() || info.outer_class.is_none());

    let superclass = classfile.super_class.as_ref().map(|s| s.replace('/', "."));
    let kind = classify(classfile.access_flags, superclass.as_deref());

    let class_signature = match classfile.signature.as_deref() {
        Some(sig) => Some(jimpl_classfile::parse_class_signature(sig)?),
        None => None,
    };
    let type_parameters = class_signature
        .as_ref()
        .map(|sig| lower_type_parameters(&sig.type_parameters))
        .unwrap_or_default();

    let mut methods = Vec::new();
    let mut constructors = Vec::new();
    for member in &classfile.methods {
        match member.name.as_str() {
            "<clinit>" => {}
            "<init>" => constructors.push(lower_constructor(member)?),
            _ => methods.push(lower_method(member)?),
        }
    }

    Ok(TypeDescriptor {
        binary_name,
        kind,
        modifiers,
        superclass,
        interfaces: classfile
            .interfaces
            .iter()
            .map(|i| i.replace('/', "."))
            .collect(),
        type_parameters,
        methods,
        constructors,
        sealed: !classfile.permitted_subclasses.is_empty(),
        local_or_anonymous,
        origin: None,
    })
}

fn classify(access_flags: u16, superclass: Option<&str>) -> TypeKind {
    if access_flags & 0x2000 != 0 {
        TypeKind::Annotation
    } else if access_flags & 0x0200 != 0 {
        TypeKind::Interface
    } else if access_flags & 0x4000 != 0 {
        TypeKind::Enum
    } else if superclass == Some("java.lang.Record") {
        TypeKind::Record
    } else {
        TypeKind::Class
    }
}

fn lower_method(member: &ClassMember) -> Result<MethodDescriptor, ClasspathError> {
    let descriptor = jimpl_classfile::parse_method_descriptor(&member.descriptor)?;
    let signature = parse_member_signature(member, &descriptor)?;

    let erased_params: Vec<String> = descriptor.params.iter().map(erased_field_type).collect();
    let parameters = zip_parameters(&erased_params, signature.as_ref());

    let erased_return = match &descriptor.return_type {
        ReturnType::Void => "void".to_string(),
        ReturnType::Type(ty) => erased_field_type(ty),
    };
    let return_type = match signature.as_ref() {
        Some(sig) => match &sig.return_type {
            Some(ty) => JavaType::generic(erased_return, render_type(ty)),
            None => JavaType::void(),
        },
        None => JavaType::simple(erased_return),
    };

    Ok(MethodDescriptor {
        name: member.name.clone(),
        modifiers: Modifiers(member.access_flags),
        type_parameters: signature
            .as_ref()
            .map(|sig| lower_type_parameters(&sig.type_parameters))
            .unwrap_or_default(),
        parameters,
        return_type,
        throws: lower_throws(member, signature.as_ref()),
    })
}

fn lower_constructor(member: &ClassMember) -> Result<ConstructorDescriptor, ClasspathError> {
    let descriptor = jimpl_classfile::parse_method_descriptor(&member.descriptor)?;
    let signature = parse_member_signature(member, &descriptor)?;
    let erased_params: Vec<String> = descriptor.params.iter().map(erased_field_type).collect();

    Ok(ConstructorDescriptor {
        modifiers: Modifiers(member.access_flags),
        type_parameters: signature
            .as_ref()
            .map(|sig| lower_type_parameters(&sig.type_parameters))
            .unwrap_or_default(),
        parameters: zip_parameters(&erased_params, signature.as_ref()),
        throws: lower_throws(member, signature.as_ref()),
    })
}

/// A generic signature only describes the source-level parameter list; when
/// the compiler prepended synthetic parameters (inner-class constructors),
/// arities diverge and the erased view is the safe one.
fn parse_member_signature(
    member: &ClassMember,
    descriptor: &jimpl_classfile::MethodDescriptor,
) -> Result<Option<MethodSignature>, ClasspathError> {
    let Some(sig) = member.signature.as_deref() else {
        return Ok(None);
    };
    let parsed = jimpl_classfile::parse_method_signature(sig)?;
    if parsed.parameters.len() != descriptor.params.len() {
        tracing::debug!(
            target = "jimpl.classpath",
            method = %member.name,
            "generic signature arity differs from descriptor; using erased view"
        );
        return Ok(None);
    }
    Ok(Some(parsed))
}

fn zip_parameters(erased: &[String], signature: Option<&MethodSignature>) -> Vec<JavaType> {
    match signature {
        Some(sig) => erased
            .iter()
            .zip(&sig.parameters)
            .map(|(erased, sig_ty)| JavaType::generic(erased.clone(), render_type(sig_ty)))
            .collect(),
        None => erased.iter().cloned().map(JavaType::simple).collect(),
    }
}

fn lower_throws(member: &ClassMember, signature: Option<&MethodSignature>) -> Vec<String> {
    if let Some(sig) = signature {
        if !sig.throws.is_empty() {
            return sig.throws.iter().map(render_type).collect();
        }
    }
    member
        .exceptions
        .iter()
        .map(|e| e.replace('/', "."))
        .collect()
}

fn lower_type_parameters(params: &[jimpl_classfile::TypeParameter]) -> Vec<TypeParameter> {
    params
        .iter()
        .map(|param| {
            let mut bounds = Vec::new();
            if let Some(class_bound) = &param.class_bound {
                let rendered = render_type(class_bound);
                if rendered != OBJECT {
                    bounds.push(rendered);
                }
            }
            bounds.extend(param.interface_bounds.iter().map(render_type));
            TypeParameter {
                name: param.name.clone(),
                bounds,
            }
        })
        .collect()
}

fn erased_field_type(ty: &FieldType) -> String {
    match ty {
        FieldType::Base(base) => base.keyword().to_string(),
        FieldType::Object(name) => name.replace('/', "."),
        FieldType::Array(component) => format!("{}[]", erased_field_type(component)),
    }
}

fn render_type(ty: &TypeSignature) -> String {
    match ty {
        TypeSignature::Base(base) => base.keyword().to_string(),
        TypeSignature::TypeVariable(name) => name.clone(),
        TypeSignature::Array(component) => format!("{}[]", render_type(component)),
        TypeSignature::Class(class) => render_class_type(class),
    }
}

fn render_class_type(class: &ClassTypeSignature) -> String {
    let mut out = class.name.replace('/', ".");
    out.push_str(&render_type_arguments(&class.type_arguments));
    for (segment, arguments) in &class.inner {
        out.push('.');
        out.push_str(segment);
        out.push_str(&render_type_arguments(arguments));
    }
    out
}

fn render_type_arguments(arguments: &[TypeArgument]) -> String {
    if arguments.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = arguments
        .iter()
        .map(|arg| match arg {
            TypeArgument::Wildcard => "?".to_string(),
            TypeArgument::Extends(ty) => format!("? extends {}", render_type(ty)),
            TypeArgument::Super(ty) => format!("? super {}", render_type(ty)),
            TypeArgument::Exact(ty) => render_type(ty),
        })
        .collect();
    format!("<{}>", rendered.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jimpl_classfile::InnerClassInfo;

    fn member(name: &str, flags: u16, descriptor: &str) -> ClassMember {
        ClassMember {
            access_flags: flags,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            signature: None,
            exceptions: vec![],
        }
    }

    fn classfile(name: &str, flags: u16, superclass: Option<&str>) -> ClassFile {
        ClassFile {
            minor_version: 0,
            major_version: 61,
            access_flags: flags,
            this_class: name.to_string(),
            super_class: superclass.map(str::to_string),
            interfaces: vec![],
            methods: vec![],
            signature: None,
            inner_classes: vec![],
            permitted_subclasses: vec![],
        }
    }

    const PUBLIC: u16 = 0x0001;
    const INTERFACE: u16 = 0x0200 | 0x0400;

    #[test]
    fn lowers_interface_with_method() {
        let mut cf = classfile("p/Runner", PUBLIC | INTERFACE, Some("java/lang/Object"));
        cf.methods.push(member("run", PUBLIC | 0x0400, "()V"));

        let ty = lower_classfile(&cf).unwrap();
        assert_eq!(ty.binary_name, "p.Runner");
        assert_eq!(ty.kind, TypeKind::Interface);
        assert_eq!(ty.methods.len(), 1);
        assert!(ty.methods[0].return_type.is_void());
        assert!(ty.constructors.is_empty());
    }

    #[test]
    fn generic_signature_drives_source_types() {
        let mut cf = classfile("p/Mapper", PUBLIC | INTERFACE, Some("java/lang/Object"));
        let mut map = member(
            "map",
            PUBLIC | 0x0400,
            "(Ljava/util/List;)Ljava/lang/Object;",
        );
        map.signature =
            Some("<R:Ljava/lang/Object;>(Ljava/util/List<+TR;>;)TR;^Ljava/io/IOException;".to_string());
        cf.methods.push(map);

        let ty = lower_classfile(&cf).unwrap();
        let method = &ty.methods[0];
        assert_eq!(method.type_parameters.len(), 1);
        assert_eq!(method.type_parameters[0].name, "R");
        assert!(method.type_parameters[0].bounds.is_empty());
        assert_eq!(method.parameters[0].erased, "java.util.List");
        assert_eq!(method.parameters[0].source, "java.util.List<? extends R>");
        assert_eq!(method.return_type.source, "R");
        assert_eq!(method.return_type.erased, "java.lang.Object");
        assert_eq!(method.throws, vec!["java.io.IOException".to_string()]);
    }

    #[test]
    fn constructors_and_checked_exceptions_lower() {
        let mut cf = classfile("p/Base", PUBLIC | 0x0400, Some("java/lang/Object"));
        let mut ctor = member("<init>", 0x0004, "(I)V");
        ctor.exceptions = vec!["java/io/IOException".to_string()];
        cf.methods.push(ctor);
        cf.methods.push(member("<clinit>", 0x0008, "()V"));

        let ty = lower_classfile(&cf).unwrap();
        assert_eq!(ty.constructors.len(), 1);
        assert!(ty.constructors[0].modifiers.is_protected());
        assert_eq!(ty.constructors[0].parameters[0].erased, "int");
        assert_eq!(ty.constructors[0].throws, vec!["java.io.IOException".to_string()]);
        assert!(ty.methods.is_empty());
    }

    #[test]
    fn nested_type_uses_inner_class_flags() {
        let mut cf = classfile("p/Outer$Inner", PUBLIC, Some("java/lang/Object"));
        cf.inner_classes.push(InnerClassInfo {
            inner_class: "p/Outer$Inner".to_string(),
            outer_class: Some("p/Outer".to_string()),
            inner_name: Some("Inner".to_string()),
            access_flags: 0x0002 | 0x0008,
        });

        let ty = lower_classfile(&cf).unwrap();
        assert!(ty.modifiers.is_private());
        assert!(!ty.local_or_anonymous);
    }

    #[test]
    fn anonymous_class_is_flagged() {
        let mut cf = classfile("p/Outer$1", 0, Some("java/lang/Object"));
        cf.inner_classes.push(InnerClassInfo {
            inner_class: "p/Outer$1".to_string(),
            outer_class: None,
            inner_name: None,
            access_flags: 0,
        });
        let ty = lower_classfile(&cf).unwrap();
        assert!(ty.local_or_anonymous);
    }

    #[test]
    fn record_and_sealed_classification() {
        let record = classfile("p/Point", PUBLIC | 0x0010, Some("java/lang/Record"));
        assert_eq!(lower_classfile(&record).unwrap().kind, TypeKind::Record);

        let mut sealed = classfile("p/Shape", PUBLIC | 0x0400, Some("java/lang/Object"));
        sealed.permitted_subclasses = vec!["p/Circle".to_string()];
        assert!(lower_classfile(&sealed).unwrap().sealed);
    }

    #[test]
    fn class_type_parameters_keep_nontrivial_bounds() {
        let mut cf = classfile("p/Box", PUBLIC | 0x0400, Some("java/lang/Object"));
        cf.signature = Some(
            "<T:Ljava/lang/Object;N:Ljava/lang/Number;:Ljava/lang/Comparable<TN;>;>Ljava/lang/Object;"
                .to_string(),
        );
        let ty = lower_classfile(&cf).unwrap();
        assert_eq!(ty.type_parameters.len(), 2);
        assert!(ty.type_parameters[0].bounds.is_empty());
        assert_eq!(
            ty.type_parameters[1].bounds,
            vec![
                "java.lang.Number".to_string(),
                "java.lang.Comparable<N>".to_string()
            ]
        );
    }
}
