//! What a runtime environment provides
//!
//! An [`Environment`] is a handle the host creates for each classloading context it wants
//! verified. Everything in this crate refers to environments weakly: the host's `Arc` is the
//! only thing keeping one alive.

mod class_path;
mod provider;
mod static_provider;
mod table;

pub use class_path::*;
pub use provider::*;
pub use static_provider::*;
pub use table::*;

use std::fmt;

/// A runtime context supplying a concrete set of classes
pub struct Environment {
    name: String,
    provider: Box<dyn SymbolProvider>,
}

impl Environment {
    pub fn new(name: impl Into<String>, provider: impl SymbolProvider + 'static) -> Environment {
        Environment {
            name: name.into(),
            provider: Box::new(provider),
        }
    }

    /// Name used in diagnostics
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn provider(&self) -> &dyn SymbolProvider {
        self.provider.as_ref()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::{
        BinaryName, ClassAccessFlags, FieldAccessFlags, MethodAccessFlags, Name, ParseDescriptor,
        UnqualifiedName, Version,
    };
    use crate::reference::{ClassKind, Ownership, Symbol, Visibility};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn class(name: &str) -> BinaryName {
        BinaryName::from_dotted_or_internal(name).unwrap()
    }

    fn method(owner: &str, name: &str, descriptor: &str) -> Symbol {
        Symbol::Method {
            owner: class(owner),
            name: UnqualifiedName::from_string(name.to_owned()).unwrap(),
            descriptor: crate::jvm::MethodDescriptor::parse(descriptor).unwrap(),
        }
    }

    fn field(owner: &str, name: &str, descriptor: &str) -> Symbol {
        Symbol::Field {
            owner: class(owner),
            name: UnqualifiedName::from_string(name.to_owned()).unwrap(),
            descriptor: crate::jvm::FieldType::parse(descriptor).unwrap(),
        }
    }

    /// `Base` declares a few members, `Client extends Base implements Api`
    fn library() -> StaticProvider {
        let mut provider = StaticProvider::new(Version::JAVA11);

        let mut base = ClassDescription::new(class("org.lib.Base"), ClassAccessFlags::PUBLIC);
        base.add_method(MethodAccessFlags::PUBLIC, "close", "()V").unwrap();
        base.add_method(MethodAccessFlags::PRIVATE, "reset", "()V").unwrap();
        base.add_field(FieldAccessFlags::PROTECTED, "state", "I").unwrap();
        provider.add_class(base);

        let mut api = ClassDescription::new(
            class("org.lib.Api"),
            ClassAccessFlags::PUBLIC | ClassAccessFlags::INTERFACE | ClassAccessFlags::ABSTRACT,
        );
        api.add_method(
            MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
            "create",
            "()Lorg/lib/Api;",
        )
        .unwrap();
        provider.add_class(api);

        let mut client = ClassDescription::new(class("org.lib.Client"), ClassAccessFlags::empty());
        client.set_super_class(Some(class("org.lib.Base")));
        client.add_interface(class("org.lib.Api"));
        provider.add_class(client);

        provider.add_unresolvable(class("org.lib.Broken"), "missing org/dep/Gone");
        provider
    }

    #[test]
    fn class_flags() {
        let environment = Arc::new(Environment::new("app", library()));
        let table = EnvironmentSymbolTable::new(&environment);
        assert_eq!(table.runtime_version(), Version::JAVA11);

        let api = table.lookup(&Symbol::Class(class("org.lib.Api"))).unwrap();
        assert_eq!(api.visibility, Visibility::Public);
        assert_eq!(api.kind, Some(ClassKind::Interface));

        let client = table.lookup(&Symbol::Class(class("org.lib.Client"))).unwrap();
        assert_eq!(client.visibility, Visibility::Package);
        assert_eq!(client.kind, Some(ClassKind::Class));

        assert_eq!(table.lookup(&Symbol::Class(class("org.lib.Nope"))), None);
    }

    #[test]
    fn members_are_inherited() {
        let environment = Arc::new(Environment::new("app", library()));
        let table = EnvironmentSymbolTable::new(&environment);

        let close = table.lookup(&method("org.lib.Client", "close", "()V")).unwrap();
        assert_eq!(close.ownership, Some(Ownership::Instance));
        assert_eq!(close.visibility, Visibility::Public);

        // Static interface methods belong to the interface alone
        let create = table
            .lookup(&method("org.lib.Api", "create", "()Lorg/lib/Api;"))
            .unwrap();
        assert_eq!(create.ownership, Some(Ownership::Static));
        assert_eq!(
            table.lookup(&method("org.lib.Client", "create", "()Lorg/lib/Api;")),
            None
        );

        let state = table.lookup(&field("org.lib.Client", "state", "I")).unwrap();
        assert_eq!(state.visibility, Visibility::Protected);

        // Descriptors are part of the identity
        assert_eq!(table.lookup(&field("org.lib.Client", "state", "J")), None);
        assert_eq!(table.lookup(&method("org.lib.Client", "close", "()I")), None);
    }

    #[test]
    fn private_members_are_not_inherited() {
        let environment = Arc::new(Environment::new("app", library()));
        let table = EnvironmentSymbolTable::new(&environment);

        let reset = table.lookup(&method("org.lib.Base", "reset", "()V")).unwrap();
        assert_eq!(reset.visibility, Visibility::Private);
        assert_eq!(table.lookup(&method("org.lib.Client", "reset", "()V")), None);
    }

    #[test]
    fn object_members_are_always_there() {
        let environment = Arc::new(Environment::new("app", library()));
        let table = EnvironmentSymbolTable::new(&environment);

        let to_string = table
            .lookup(&method("org.lib.Client", "toString", "()Ljava/lang/String;"))
            .unwrap();
        assert_eq!(to_string.visibility, Visibility::Public);
        assert_eq!(to_string.ownership, Some(Ownership::Instance));

        let clone = table
            .lookup(&method("org.lib.Api", "clone", "()Ljava/lang/Object;"))
            .unwrap();
        assert_eq!(clone.visibility, Visibility::Protected);
        assert_eq!(table.lookup(&method("org.lib.Client", "toString", "()V")), None);
    }

    #[test]
    fn platform_supertypes_are_assumed() {
        let mut provider = library();
        let mut list = ClassDescription::new(class("org.lib.Items"), ClassAccessFlags::PUBLIC);
        list.set_super_class(Some(class("java.util.AbstractList")));
        provider.add_class(list);
        let environment = Arc::new(Environment::new("app", provider));
        let size = method("org.lib.Items", "size", "()I");

        let strict = EnvironmentSymbolTable::new(&environment);
        assert_eq!(strict.lookup(&size), None);

        let platform = std::iter::once(("java/", ())).collect();
        let table = EnvironmentSymbolTable::with_platform(&environment, platform);
        let flags = table.lookup(&size).unwrap();
        assert_eq!(flags.visibility, Visibility::Public);
        assert_eq!(flags.ownership, None);

        // Only platform classes get the benefit of the doubt
        assert_eq!(table.lookup(&method("org.lib.Client", "size", "()I")), None);
    }

    #[test]
    fn resolution_errors_are_absent() {
        let environment = Arc::new(Environment::new("app", library()));
        let table = EnvironmentSymbolTable::new(&environment);
        assert_eq!(table.lookup(&Symbol::Class(class("org.lib.Broken"))), None);
        assert_eq!(table.lookup(&method("org.lib.Broken", "run", "()V")), None);
    }

    struct CountingProvider {
        inner: StaticProvider,
        calls: Arc<AtomicUsize>,
    }

    impl SymbolProvider for CountingProvider {
        fn runtime_version(&self) -> Version {
            self.inner.runtime_version()
        }

        fn describe_class(
            &self,
            name: &BinaryName,
        ) -> Result<Option<ClassDescription>, ResolutionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.describe_class(name)
        }
    }

    #[test]
    fn lookups_are_memoized() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = CountingProvider {
            inner: library(),
            calls: calls.clone(),
        };
        let environment = Arc::new(Environment::new("app", provider));
        let table = EnvironmentSymbolTable::new(&environment);

        let close = method("org.lib.Client", "close", "()V");
        assert!(table.lookup(&close).is_some());
        let after_first = calls.load(Ordering::SeqCst);
        assert_eq!(after_first, 2);

        assert!(table.lookup(&close).is_some());
        assert!(table.lookup(&Symbol::Class(class("org.lib.Base"))).is_some());
        assert!(table.lookup(&Symbol::Class(class("org.lib.Nope"))).is_none());
        assert!(table.lookup(&Symbol::Class(class("org.lib.Nope"))).is_none());
        assert_eq!(calls.load(Ordering::SeqCst), after_first + 1);
    }

    #[test]
    fn table_does_not_keep_environment_alive() {
        let environment = Arc::new(Environment::new("app", library()));
        let table = EnvironmentSymbolTable::new(&environment);
        let close = method("org.lib.Client", "close", "()V");
        assert!(table.lookup(&close).is_some());

        let weak = Arc::downgrade(&environment);
        drop(environment);
        assert!(weak.upgrade().is_none());
        assert!(!table.is_live());

        // Already resolved answers stay, but nothing new gets resolved (or memoized)
        assert!(table.lookup(&close).is_some());
        assert_eq!(table.lookup(&Symbol::Class(class("org.lib.Api"))), None);
    }
}
