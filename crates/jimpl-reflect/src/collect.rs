use std::collections::{HashSet, VecDeque};

use thiserror::Error;

use crate::provider::{ProviderError, TypeProvider};
use crate::types::{ConstructorDescriptor, MethodDescriptor, MethodKey, TypeDescriptor};

/// Resolved obligations for one synthesis run. Built per invocation, never
/// cached.
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    /// Empty for interface targets.
    pub constructors: Vec<ConstructorDescriptor>,
    /// Deduplicated, in deterministic collection order.
    pub methods: Vec<MethodDescriptor>,
}

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("class `{0}` has no usable constructor")]
    NoUsableConstructor(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Build the generation plan for `target`.
///
/// Method obligations come from two walks sharing one dedup set, keyed by
/// [`MethodKey`] with the most-derived declaration winning:
///
///  1. the public, non-static method surface: the target's own methods, its
///     superclass chain bottom-up, then its superinterfaces breadth-first
///     (for an interface target only the interface hierarchy — `Object`'s
///     members are not part of an interface's surface);
///  2. every declared method of the superclass chain that is both abstract
///     and public-or-protected, catching protected abstracts that never
///     surface publicly.
///
/// For a class target only obligations whose winning declaration is abstract
/// are kept; an interface target keeps its whole surface.
pub fn generation_plan(
    provider: &dyn TypeProvider,
    target: &TypeDescriptor,
) -> Result<GenerationPlan, CollectError> {
    let constructors = constructor_obligations(target)?;
    let methods = method_obligations(provider, target)?;
    Ok(GenerationPlan {
        constructors,
        methods,
    })
}

/// Declared non-private constructors in declaration order.
pub fn constructor_obligations(
    target: &TypeDescriptor,
) -> Result<Vec<ConstructorDescriptor>, CollectError> {
    if target.is_interface() {
        return Ok(Vec::new());
    }
    let usable: Vec<ConstructorDescriptor> = target
        .constructors
        .iter()
        .filter(|ctor| !ctor.modifiers.is_private())
        .cloned()
        .collect();
    if usable.is_empty() {
        return Err(CollectError::NoUsableConstructor(target.binary_name.clone()));
    }
    Ok(usable)
}

pub fn method_obligations(
    provider: &dyn TypeProvider,
    target: &TypeDescriptor,
) -> Result<Vec<MethodDescriptor>, CollectError> {
    let mut chosen: Vec<MethodDescriptor> = Vec::new();
    let mut seen: HashSet<MethodKey> = HashSet::new();
    let mut interface_queue: VecDeque<String> = VecDeque::new();

    // Superclass chain, target first. Interfaces contribute through the
    // breadth-first queue instead.
    let chain = superclass_chain(provider, target)?;

    for ty in &chain {
        for method in &ty.methods {
            if is_surface_method(method) {
                insert(&mut chosen, &mut seen, method);
            }
        }
        interface_queue.extend(ty.interfaces.iter().cloned());
    }

    let mut visited: HashSet<String> = HashSet::new();
    while let Some(name) = interface_queue.pop_front() {
        if !visited.insert(name.clone()) {
            continue;
        }
        let Some(iface) = resolve_ancestor(provider, &name)? else {
            continue;
        };
        for method in &iface.methods {
            if is_surface_method(method) {
                insert(&mut chosen, &mut seen, method);
            }
        }
        interface_queue.extend(iface.interfaces.iter().cloned());
    }

    // Abstract ancestors: protected abstract methods never appear in the
    // public surface but still block instantiation.
    for ty in &chain {
        for method in &ty.methods {
            let mods = method.modifiers;
            if mods.is_abstract()
                && (mods.is_public() || mods.is_protected())
                && !mods.is_static()
                && !mods.is_synthetic_or_bridge()
            {
                insert(&mut chosen, &mut seen, method);
            }
        }
    }

    if !target.is_interface() {
        chosen.retain(|method| method.modifiers.is_abstract());
    }
    Ok(chosen)
}

fn insert(chosen: &mut Vec<MethodDescriptor>, seen: &mut HashSet<MethodKey>, method: &MethodDescriptor) {
    if seen.insert(method.key()) {
        chosen.push(method.clone());
    }
}

fn is_surface_method(method: &MethodDescriptor) -> bool {
    let mods = method.modifiers;
    mods.is_public() && !mods.is_static() && !mods.is_synthetic_or_bridge()
}

/// Target plus resolved superclasses, most-derived first. An interface
/// target contributes only itself: its classfile-level `Object` superclass
/// is not part of its method surface.
fn superclass_chain(
    provider: &dyn TypeProvider,
    target: &TypeDescriptor,
) -> Result<Vec<TypeDescriptor>, CollectError> {
    let mut chain = vec![target.clone()];
    if target.is_interface() {
        return Ok(chain);
    }
    let mut next = target.superclass.clone();
    while let Some(name) = next {
        match resolve_ancestor(provider, &name)? {
            Some(ancestor) => {
                next = ancestor.superclass.clone();
                chain.push(ancestor);
            }
            None => break,
        }
    }
    Ok(chain)
}

fn resolve_ancestor(
    provider: &dyn TypeProvider,
    name: &str,
) -> Result<Option<TypeDescriptor>, CollectError> {
    let found = provider.find_type(name)?;
    if found.is_none() {
        tracing::warn!(
            target = "jimpl.reflect",
            ancestor = name,
            "ancestor type not found on the classpath; hierarchy walk stops here"
        );
    }
    Ok(found)
}
