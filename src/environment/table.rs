use super::{ClassDescription, Environment};
use crate::jvm::{
    BinaryName, FieldType, MemberAccess, MethodDescriptor, Name, UnqualifiedName, Version,
};
use crate::reference::{ClassKind, Flags, Ownership, Symbol, Visibility};
use crate::util::Trie;
use elsa::sync::FrozenMap;
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Weak};

/// What an environment actually provides, resolved lazily and memoized
///
/// The table only holds a weak reference to its environment: once the environment is dropped,
/// lookups of anything not already resolved report the symbol as absent (without memoizing that
/// answer, since it says nothing about the environment itself).
///
/// An environment which can't describe `java/lang/Object` is given its well-known members. Other
/// classes under the platform prefixes (usually the excluded `java/` namespace) that the
/// environment can't describe are assumed to have whatever member is looked up through them.
///
/// Both maps are insert-only, so concurrent lookups of the same symbol may both do the work but
/// only the first answer is kept and handed out.
pub struct EnvironmentSymbolTable {
    environment: Weak<Environment>,
    environment_name: String,
    runtime_version: Version,
    classes: FrozenMap<BinaryName, Box<Option<ClassDescription>>>,
    symbols: FrozenMap<Symbol, Box<Option<Flags>>>,
    platform: Trie<()>,
}

impl EnvironmentSymbolTable {
    pub fn new(environment: &Arc<Environment>) -> EnvironmentSymbolTable {
        EnvironmentSymbolTable::with_platform(environment, Trie::new())
    }

    /// Table which assumes classes under some prefixes exist even if it can't see them
    pub fn with_platform(
        environment: &Arc<Environment>,
        platform: Trie<()>,
    ) -> EnvironmentSymbolTable {
        EnvironmentSymbolTable {
            environment: Arc::downgrade(environment),
            environment_name: environment.name().to_owned(),
            runtime_version: environment.provider().runtime_version(),
            classes: FrozenMap::new(),
            symbols: FrozenMap::new(),
            platform,
        }
    }

    pub fn environment_name(&self) -> &str {
        &self.environment_name
    }

    /// Highest class file version the environment can load
    pub fn runtime_version(&self) -> Version {
        self.runtime_version
    }

    /// Is the environment still around?
    pub fn is_live(&self) -> bool {
        self.environment.strong_count() > 0
    }

    /// Resolve a class
    pub fn class(&self, name: &BinaryName) -> Option<&ClassDescription> {
        if let Some(resolved) = self.classes.get(name) {
            return resolved.as_ref();
        }

        let environment = self.environment.upgrade()?;
        let description = match environment.provider().describe_class(name) {
            Ok(None) if *name == BinaryName::OBJECT => Some(ClassDescription::object()),
            Ok(description) => description,
            Err(err) => {
                log::debug!("In {}: {}", self.environment_name, err);
                None
            }
        };
        drop(environment);

        self.classes
            .insert(name.clone(), Box::new(description))
            .as_ref()
    }

    /// Actual flags of a symbol, or `None` if the environment doesn't have it
    pub fn lookup(&self, symbol: &Symbol) -> Option<&Flags> {
        if let Some(resolved) = self.symbols.get(symbol) {
            return resolved.as_ref();
        }
        if !self.is_live() {
            return None;
        }

        let flags = match symbol {
            Symbol::Class(name) => self.class(name).map(|class| {
                Flags::new(Visibility::of_class(class.access_flags))
                    .with_kind(ClassKind::of_class(class.access_flags))
            }),
            Symbol::Field {
                owner,
                name,
                descriptor,
            } => self.find_field(owner, name, descriptor, false, &mut HashSet::new()),
            Symbol::Method {
                owner,
                name,
                descriptor,
            } => self.find_method(owner, name, descriptor, false, &mut HashSet::new()),
        };

        // The environment may have gone away part way through resolution
        if flags.is_none() && !self.is_live() {
            return None;
        }
        self.symbols.insert(symbol.clone(), Box::new(flags)).as_ref()
    }

    /// Find a field on a class or its supertypes
    fn find_field(
        &self,
        class: &BinaryName,
        name: &UnqualifiedName,
        descriptor: &FieldType<BinaryName>,
        inherited: bool,
        visited: &mut HashSet<BinaryName>,
    ) -> Option<Flags> {
        if !visited.insert(class.clone()) {
            return None;
        }
        let description = match self.class(class) {
            Some(description) => description,
            None => return self.assumed_member(class),
        };
        if let Some(field) = description.declared_field(name, descriptor) {
            if !(inherited && field.access_flags.is_private()) {
                return Some(member_flags(field.access_flags));
            }
        }
        description
            .super_types()
            .find_map(|super_type| self.find_field(super_type, name, descriptor, true, visited))
    }

    /// Find a method on a class or its supertypes
    ///
    /// Private methods are never inherited, and neither are static methods of interfaces.
    fn find_method(
        &self,
        class: &BinaryName,
        name: &UnqualifiedName,
        descriptor: &MethodDescriptor<BinaryName>,
        inherited: bool,
        visited: &mut HashSet<BinaryName>,
    ) -> Option<Flags> {
        if !visited.insert(class.clone()) {
            return None;
        }
        let description = match self.class(class) {
            Some(description) => description,
            None => return self.assumed_member(class),
        };
        if let Some(method) = description.declared_method(name, descriptor) {
            let access_flags = method.access_flags;
            let hidden = access_flags.is_private()
                || (description.is_interface() && access_flags.is_static());
            if !(inherited && hidden) {
                return Some(member_flags(access_flags));
            }
        }
        description
            .super_types()
            .find_map(|super_type| self.find_method(super_type, name, descriptor, true, visited))
    }

    /// Platform classes the environment can't describe are taken to have any member asked of them
    fn assumed_member(&self, class: &BinaryName) -> Option<Flags> {
        if self.platform.lookup(class.as_str()).is_none() || !self.is_live() {
            return None;
        }
        log::debug!(
            "In {}: {} is not described, assuming it has the member",
            self.environment_name,
            class
        );
        Some(Flags::new(Visibility::Public))
    }
}

fn member_flags(access_flags: impl MemberAccess) -> Flags {
    Flags::new(Visibility::of_member(access_flags)).with_ownership(Ownership::of_member(access_flags))
}

impl fmt::Debug for EnvironmentSymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentSymbolTable")
            .field("environment", &self.environment_name)
            .field("runtime_version", &self.runtime_version)
            .field("live", &self.is_live())
            .finish()
    }
}
