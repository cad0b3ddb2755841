//! Renders a [`GenerationPlan`] into compilable Java source.
//!
//! Pure text construction: no I/O, no errors. The output is the minimal
//! valid concrete subtype — forwarding constructors plus default-value
//! method stubs — escaped so the file is encoding-independent.

#![forbid(unsafe_code)]

pub mod tokens;

use std::fmt::Write as _;

use jimpl_reflect::{
    ConstructorDescriptor, GenerationPlan, JavaType, MethodDescriptor, Modifiers, TypeDescriptor,
    TypeParameter,
};

use crate::tokens::{
    join_mapped, CLASS, EXTENDS, FALSE_LITERAL, IMPLEMENTS, IMPL_SUFFIX, INDENT, LINE,
    NULL_LITERAL, PACKAGE, PUBLIC, RETURN, SUPER, THROWS, ZERO_LITERAL,
};

/// The name of the synthesized type: `<SimpleName>Impl`.
pub fn implementation_name(target: &TypeDescriptor) -> String {
    format!("{}{IMPL_SUFFIX}", target.simple_name())
}

/// Render the full compilation unit for `target`.
pub fn render(target: &TypeDescriptor, plan: &GenerationPlan) -> String {
    let mut out = String::new();

    let package = target.package();
    if !package.is_empty() {
        let _ = writeln!(out, "{PACKAGE} {package};");
        out.push_str(LINE);
    }

    out.push_str(&class_header(target));
    out.push_str(LINE);

    for ctor in &plan.constructors {
        out.push_str(LINE);
        out.push_str(&constructor_stub(target, ctor));
    }
    for method in &plan.methods {
        out.push_str(LINE);
        out.push_str(&method_stub(method));
    }

    out.push('}');
    out.push_str(LINE);

    finalize(&out)
}

fn class_header(target: &TypeDescriptor) -> String {
    let relation = if target.is_interface() {
        IMPLEMENTS
    } else {
        EXTENDS
    };
    let mut header = format!(
        "{PUBLIC} {CLASS} {}{}",
        implementation_name(target),
        type_parameter_list(&target.type_parameters)
    );
    let _ = write!(
        header,
        " {relation} {}{} {{",
        target.canonical_name(),
        type_argument_list(&target.type_parameters)
    );
    header
}

/// `<T, U extends a.B & c.D>` — declaration form, bounds kept.
fn type_parameter_list(params: &[TypeParameter]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let rendered = join_mapped(params, |param| {
        if param.bounds.is_empty() {
            param.name.clone()
        } else {
            format!("{} {EXTENDS} {}", param.name, param.bounds.join(" & "))
        }
    });
    format!("<{rendered}>")
}

/// `<T, U>` — use form, names only, forwarded to the supertype.
fn type_argument_list(params: &[TypeParameter]) -> String {
    if params.is_empty() {
        return String::new();
    }
    format!("<{}>", join_mapped(params, |param| param.name.clone()))
}

fn constructor_stub(target: &TypeDescriptor, ctor: &ConstructorDescriptor) -> String {
    let mut stub = String::new();
    stub.push_str(INDENT);
    let mods = modifier_prefix(ctor.modifiers);
    let _ = write!(
        stub,
        "{mods}{}{}({})",
        type_parameter_prefix(&ctor.type_parameters),
        implementation_name(target),
        parameter_list(&ctor.parameters, ctor.modifiers)
    );
    stub.push_str(&throws_clause(&ctor.throws));
    stub.push_str(" {");
    stub.push_str(LINE);

    let forwarded = argument_names(ctor.parameters.len()).join(", ");
    let _ = write!(stub, "{INDENT}{INDENT}{SUPER}({forwarded});");
    stub.push_str(LINE);
    stub.push_str(INDENT);
    stub.push('}');
    stub.push_str(LINE);
    stub
}

fn method_stub(method: &MethodDescriptor) -> String {
    let mut stub = String::new();
    stub.push_str(INDENT);
    let mods = modifier_prefix(method.modifiers);
    let _ = write!(
        stub,
        "{mods}{}{} {}({})",
        type_parameter_prefix(&method.type_parameters),
        method.return_type.source,
        method.name,
        parameter_list(&method.parameters, method.modifiers)
    );
    stub.push_str(&throws_clause(&method.throws));
    stub.push_str(" {");
    stub.push_str(LINE);
    stub.push_str(INDENT);
    stub.push_str(INDENT);
    stub.push_str(&body_statement(&method.return_type));
    stub.push_str(LINE);
    stub.push_str(INDENT);
    stub.push('}');
    stub.push_str(LINE);
    stub
}

/// The one-statement body: nothing to return for void, `false` for boolean,
/// zero for the remaining primitives, `null` for references.
fn body_statement(return_type: &JavaType) -> String {
    if return_type.is_void() {
        return format!("{RETURN};");
    }
    let value = if return_type.is_boolean() {
        FALSE_LITERAL
    } else if return_type.is_primitive() {
        ZERO_LITERAL
    } else {
        NULL_LITERAL
    };
    format!("{RETURN} {value};")
}

fn modifier_prefix(modifiers: Modifiers) -> String {
    let tokens = modifiers.source_tokens();
    if tokens.is_empty() {
        String::new()
    } else {
        let mut prefix = tokens.join(" ");
        prefix.push(' ');
        prefix
    }
}

fn type_parameter_prefix(params: &[TypeParameter]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        let mut prefix = type_parameter_list(params);
        prefix.push(' ');
        prefix
    }
}

fn parameter_list(parameters: &[JavaType], modifiers: Modifiers) -> String {
    let names = argument_names(parameters.len());
    let last = parameters.len().saturating_sub(1);
    let rendered: Vec<String> = parameters
        .iter()
        .enumerate()
        .map(|(i, ty)| {
            let text = if modifiers.is_varargs() && i == last {
                vararg_source(&ty.source)
            } else {
                ty.source.clone()
            };
            format!("{text} {}", names[i])
        })
        .collect();
    rendered.join(", ")
}

/// Positional parameter names; classfiles compiled without `-parameters`
/// carry none, and the reflection view the original tool used reported the
/// same `argN` names.
fn argument_names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("arg{i}")).collect()
}

fn vararg_source(source: &str) -> String {
    match source.strip_suffix("[]") {
        Some(component) => format!("{component}..."),
        None => source.to_string(),
    }
}

fn throws_clause(throws: &[String]) -> String {
    if throws.is_empty() {
        String::new()
    } else {
        format!(" {THROWS} {}", throws.join(", "))
    }
}

/// Escape every char at or above U+0080 to `\uXXXX` (one escape per UTF-16
/// code unit) and rewrite the reflection-level nested-type separator to the
/// source-level dot.
fn finalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut units = [0u16; 2];
    for c in text.chars() {
        if c == '$' {
            out.push('.');
        } else if (c as u32) < 0x80 {
            out.push(c);
        } else {
            for unit in c.encode_utf16(&mut units) {
                let _ = write!(out, "\\u{:04x}", unit);
            }
        }
    }
    out
}
