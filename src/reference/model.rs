use super::{Flags, MergeConflict, Source, Symbol};
use crate::jvm::{BinaryName, FieldType, MethodDescriptor, UnqualifiedName};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

/// What is required of one symbol, and from where
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Requirement {
    pub flags: Flags,
    pub sources: BTreeSet<Source>,
}

impl Requirement {
    pub fn new(flags: Flags, source: Source) -> Requirement {
        Requirement {
            flags,
            sources: BTreeSet::from([source]),
        }
    }

    /// Combine requirements on the same symbol (see [`Flags::merge`])
    pub fn merge(&self, other: &Requirement, symbol: &Symbol) -> Result<Requirement, MergeConflict> {
        let flags = self
            .flags
            .merge(&other.flags)
            .map_err(|conflict| MergeConflict {
                symbol: symbol.clone(),
                conflict,
            })?;
        Ok(Requirement {
            flags,
            sources: self.sources.union(&other.sources).cloned().collect(),
        })
    }
}

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct HelperMethod {
    pub name: UnqualifiedName,
    pub descriptor: MethodDescriptor<BinaryName>,
    pub is_abstract: bool,
    pub is_static: bool,
}

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct HelperField {
    pub name: UnqualifiedName,
    pub descriptor: FieldType<BinaryName>,
}

/// Shape of a class shipped as part of a module
///
/// Helpers get injected alongside the instrumentation, so instead of being looked up they are
/// checked for whether they still fit into the library's class hierarchy.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct HelperClass {
    pub name: BinaryName,
    pub is_abstract: bool,
    pub is_interface: bool,
    pub super_class: Option<BinaryName>,
    pub interfaces: Vec<BinaryName>,
    pub methods: BTreeSet<HelperMethod>,
    pub fields: BTreeSet<HelperField>,
}

impl HelperClass {
    /// Supertypes, superclass first
    pub fn super_types(&self) -> impl Iterator<Item = &BinaryName> + '_ {
        self.super_class.iter().chain(self.interfaces.iter())
    }
}

/// Everything a module needs from the environment it gets applied to
///
/// There is at most one requirement per symbol: requirements discovered at different sites are
/// merged. All collections are ordered, so equal models compare (and iterate) identically.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ReferenceModel {
    pub module: String,

    /// Requirements on classes and members outside of the module
    pub references: BTreeMap<Symbol, Requirement>,

    /// Classes shipped with the module
    pub helpers: BTreeMap<BinaryName, HelperClass>,

    /// Fields accessed on a helper class, which the helper may inherit from a library class
    pub helper_field_accesses: BTreeMap<Symbol, BTreeSet<Source>>,
}

impl ReferenceModel {
    pub fn new(module: impl Into<String>) -> ReferenceModel {
        ReferenceModel {
            module: module.into(),
            references: BTreeMap::new(),
            helpers: BTreeMap::new(),
            helper_field_accesses: BTreeMap::new(),
        }
    }

    /// Add a requirement, merging it into any existing requirement on the same symbol
    pub fn require(&mut self, symbol: Symbol, requirement: Requirement) -> Result<(), MergeConflict> {
        match self.references.entry(symbol) {
            Entry::Vacant(vacant) => {
                vacant.insert(requirement);
            }
            Entry::Occupied(mut occupied) => {
                let merged = occupied.get().merge(&requirement, occupied.key())?;
                occupied.insert(merged);
            }
        }
        Ok(())
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&Requirement> {
        self.references.get(symbol)
    }

    /// Number of required symbols
    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn is_helper(&self, class: &BinaryName) -> bool {
        self.helpers.contains_key(class)
    }

    /// Combine two partial models of the same module
    ///
    /// Requirements are unioned and requirements on the same symbol are merged, so this is
    /// commutative and `a.merge(&a) == Ok(a)`. Helper descriptions for the same class come from
    /// the same class file, so whichever sorts first is kept.
    pub fn merge(&self, other: &ReferenceModel) -> Result<ReferenceModel, MergeConflict> {
        let mut merged = ReferenceModel::new(std::cmp::min(&self.module, &other.module).clone());

        merged.references = self.references.clone();
        for (symbol, requirement) in &other.references {
            merged.require(symbol.clone(), requirement.clone())?;
        }

        merged.helpers = self.helpers.clone();
        for (name, helper) in &other.helpers {
            match merged.helpers.entry(name.clone()) {
                Entry::Vacant(vacant) => {
                    vacant.insert(helper.clone());
                }
                Entry::Occupied(mut occupied) => {
                    if helper < occupied.get() {
                        occupied.insert(helper.clone());
                    }
                }
            }
        }

        merged.helper_field_accesses = self.helper_field_accesses.clone();
        for (symbol, sources) in &other.helper_field_accesses {
            merged
                .helper_field_accesses
                .entry(symbol.clone())
                .or_default()
                .extend(sources.iter().cloned());
        }

        Ok(merged)
    }
}
