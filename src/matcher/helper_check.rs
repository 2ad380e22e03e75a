use super::{Mismatch, MismatchReason};
use crate::environment::EnvironmentSymbolTable;
use crate::jvm::{BinaryName, MemberAccess, MethodAccessFlags, MethodDescriptor, UnqualifiedName};
use crate::reference::{HelperClass, ReferenceModel, Source, Symbol, Visibility};
use std::collections::{BTreeMap, BTreeSet, HashSet};

type MethodKey = (UnqualifiedName, MethodDescriptor<BinaryName>);

/// Concrete helpers must implement every abstract method they inherit
///
/// Helpers compiled against one version of a library interface can end up missing methods added
/// to that interface in a later version, which would only fail once the method gets called.
pub fn unimplemented_methods(
    model: &ReferenceModel,
    table: &EnvironmentSymbolTable,
    mismatches: &mut Vec<Mismatch>,
) {
    for helper in model.helpers.values() {
        if helper.is_abstract || helper.is_interface || helper.super_types().next().is_none() {
            continue;
        }

        let mut abstract_methods: BTreeMap<MethodKey, BinaryName> = BTreeMap::new();
        let mut plain_methods: BTreeSet<MethodKey> = BTreeSet::new();
        let mut visited = HashSet::new();
        collect_methods(
            &helper.name,
            model,
            table,
            &mut visited,
            &mut abstract_methods,
            &mut plain_methods,
        );

        for ((name, descriptor), declared_in) in abstract_methods {
            if plain_methods.contains(&(name.clone(), descriptor.clone())) {
                continue;
            }
            mismatches.push(Mismatch {
                symbol: Some(Symbol::Method {
                    owner: helper.name.clone(),
                    name,
                    descriptor,
                }),
                reason: MismatchReason::UnimplementedAbstractMethod { declared_in },
                sources: BTreeSet::from([declaration(helper)]),
            });
        }
    }
}

/// Walk the hierarchy of a type, through both helpers and library types
///
/// Library types the environment doesn't have are skipped: they are reported on their own.
fn collect_methods(
    class: &BinaryName,
    model: &ReferenceModel,
    table: &EnvironmentSymbolTable,
    visited: &mut HashSet<BinaryName>,
    abstract_methods: &mut BTreeMap<MethodKey, BinaryName>,
    plain_methods: &mut BTreeSet<MethodKey>,
) {
    if !visited.insert(class.clone()) {
        return;
    }

    let super_types: Vec<BinaryName> = if let Some(helper) = model.helpers.get(class) {
        for method in helper.methods.iter().filter(|method| !method.is_static) {
            let key = (method.name.clone(), method.descriptor.clone());
            if method.is_abstract {
                abstract_methods.entry(key).or_insert_with(|| class.clone());
            } else {
                plain_methods.insert(key);
            }
        }
        helper.super_types().cloned().collect()
    } else if let Some(description) = table.class(class) {
        for method in description
            .methods
            .iter()
            .filter(|method| !method.access_flags.is_static())
        {
            let key = (method.name.clone(), method.descriptor.clone());
            if method.access_flags.contains(MethodAccessFlags::ABSTRACT) {
                abstract_methods.entry(key).or_insert_with(|| class.clone());
            } else if !method.access_flags.is_private() {
                plain_methods.insert(key);
            }
        }
        description.super_types().cloned().collect()
    } else {
        return;
    };

    for super_type in &super_types {
        collect_methods(
            super_type,
            model,
            table,
            visited,
            abstract_methods,
            plain_methods,
        );
    }
}

/// Fields accessed on helpers must be declared by the helper or inherited from a supertype
pub fn helper_field_accesses(
    model: &ReferenceModel,
    table: &EnvironmentSymbolTable,
    mismatches: &mut Vec<Mismatch>,
) {
    for (symbol, sources) in &model.helper_field_accesses {
        let (owner, name, descriptor) = match symbol {
            Symbol::Field {
                owner,
                name,
                descriptor,
            } => (owner, name, descriptor),
            _ => continue,
        };

        let mut visited = HashSet::new();
        let mut pending = vec![owner.clone()];
        let mut reason = Some(MismatchReason::Missing);
        while let Some(class) = pending.pop() {
            if !visited.insert(class.clone()) {
                continue;
            }
            if let Some(helper) = model.helpers.get(&class) {
                if helper
                    .fields
                    .iter()
                    .any(|field| &field.name == name && &field.descriptor == descriptor)
                {
                    reason = None;
                    break;
                }
                // Superclass gets searched before interfaces
                let super_types: Vec<BinaryName> = helper.super_types().cloned().collect();
                pending.extend(super_types.into_iter().rev());
                continue;
            }

            let inherited = Symbol::Field {
                owner: class.clone(),
                name: name.clone(),
                descriptor: descriptor.clone(),
            };
            if let Some(actual) = table.lookup(&inherited) {
                let required = Visibility::required_for_member(owner, &class);
                reason = if actual.visibility.satisfies(required) {
                    None
                } else {
                    Some(MismatchReason::VisibilityTooRestrictive {
                        required,
                        actual: actual.visibility,
                    })
                };
                break;
            }
        }

        if let Some(reason) = reason {
            mismatches.push(Mismatch {
                symbol: Some(symbol.clone()),
                reason,
                sources: sources.clone(),
            });
        }
    }
}

fn declaration(helper: &HelperClass) -> Source {
    Source {
        class: helper.name.clone(),
        line: None,
    }
}
