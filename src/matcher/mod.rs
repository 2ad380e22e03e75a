//! Matching what a module requires against what an environment provides

mod helper_check;
mod verdict;

pub use verdict::*;

use crate::environment::EnvironmentSymbolTable;
use crate::reference::{ReferenceModel, Symbol};

/// Check every requirement of a module against an environment
///
/// This depends only on the model and on what the table resolves to, so the same inputs always
/// give the same verdict. Mismatches come out in symbol order, followed by problems with the
/// module's helper classes.
pub fn check(model: &ReferenceModel, table: &EnvironmentSymbolTable) -> Verdict {
    let runtime_version = table.runtime_version();
    let mut mismatches = vec![];

    for (symbol, requirement) in &model.references {
        // Members of a missing class would only repeat that the class is missing
        if !symbol.is_class() {
            let owner = Symbol::Class(symbol.owner().clone());
            if model.references.contains_key(&owner) && table.lookup(&owner).is_none() {
                continue;
            }
        }

        let required = &requirement.flags;
        let mismatch = |reason| Mismatch {
            symbol: Some(symbol.clone()),
            reason,
            sources: requirement.sources.clone(),
        };

        let actual = match table.lookup(symbol) {
            Some(actual) => actual,
            None => {
                mismatches.push(mismatch(MismatchReason::Missing));
                continue;
            }
        };

        if !actual.visibility.satisfies(required.visibility) {
            mismatches.push(mismatch(MismatchReason::VisibilityTooRestrictive {
                required: required.visibility,
                actual: actual.visibility,
            }));
        }
        if let (Some(required), Some(actual)) = (required.ownership, actual.ownership) {
            if required != actual {
                mismatches.push(mismatch(MismatchReason::WrongStaticness { required, actual }));
            }
        }
        if let (Some(required), Some(actual)) = (required.kind, actual.kind) {
            if required != actual {
                mismatches.push(mismatch(MismatchReason::WrongKind { required, actual }));
            }
        }
        if let Some(required) = required.min_version {
            if required > runtime_version {
                mismatches.push(mismatch(MismatchReason::UnsupportedRuntimeVersion {
                    required,
                    runtime: runtime_version,
                }));
            }
        }
    }

    helper_check::unimplemented_methods(model, table, &mut mismatches);
    helper_check::helper_field_accesses(model, table, &mut mismatches);

    Verdict::from_mismatches(mismatches)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::environment::{ClassDescription, Environment, StaticProvider};
    use crate::jvm::{
        BinaryName, ClassAccessFlags, FieldAccessFlags, FieldType, MethodAccessFlags,
        MethodDescriptor, Name, ParseDescriptor, UnqualifiedName, Version,
    };
    use crate::reference::{
        ClassKind, Flags, HelperClass, HelperField, HelperMethod, Ownership, Requirement, Source,
        Visibility,
    };
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn class(name: &str) -> BinaryName {
        BinaryName::from_dotted_or_internal(name).unwrap()
    }

    fn member_name(name: &str) -> UnqualifiedName {
        UnqualifiedName::from_string(name.to_owned()).unwrap()
    }

    fn method(owner: &str, name: &str, descriptor: &str) -> Symbol {
        Symbol::Method {
            owner: class(owner),
            name: member_name(name),
            descriptor: MethodDescriptor::parse(descriptor).unwrap(),
        }
    }

    fn source(line: u16) -> Source {
        Source {
            class: class("com.acme.Advice"),
            line: Some(line),
        }
    }

    fn library() -> StaticProvider {
        let mut provider = StaticProvider::new(Version::JAVA11);

        let mut client = ClassDescription::new(class("org.lib.Client"), ClassAccessFlags::PUBLIC);
        client.add_method(MethodAccessFlags::PUBLIC, "send", "()V").unwrap();
        client
            .add_method(MethodAccessFlags::PROTECTED, "prepare", "()V")
            .unwrap();
        client
            .add_method(
                MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
                "create",
                "()Lorg/lib/Client;",
            )
            .unwrap();
        client
            .add_field(FieldAccessFlags::PROTECTED, "timeout", "I")
            .unwrap();
        provider.add_class(client);

        let mut listener = ClassDescription::new(
            class("org.lib.Listener"),
            ClassAccessFlags::PUBLIC | ClassAccessFlags::INTERFACE | ClassAccessFlags::ABSTRACT,
        );
        listener
            .add_method(
                MethodAccessFlags::PUBLIC | MethodAccessFlags::ABSTRACT,
                "onEvent",
                "()V",
            )
            .unwrap();
        provider.add_class(listener);
        provider
    }

    fn require(model: &mut ReferenceModel, symbol: Symbol, flags: Flags, line: u16) {
        model
            .require(symbol, Requirement::new(flags, source(line)))
            .unwrap();
    }

    fn client_model() -> ReferenceModel {
        let mut model = ReferenceModel::new("acme");
        require(
            &mut model,
            Symbol::Class(class("org.lib.Client")),
            Flags::new(Visibility::Public)
                .with_kind(ClassKind::Class)
                .with_min_version(Version::JAVA8),
            10,
        );
        require(
            &mut model,
            method("org.lib.Client", "send", "()V"),
            Flags::new(Visibility::Protected)
                .with_ownership(Ownership::Instance)
                .with_min_version(Version::JAVA8),
            11,
        );
        require(
            &mut model,
            method("org.lib.Client", "create", "()Lorg/lib/Client;"),
            Flags::new(Visibility::Protected).with_ownership(Ownership::Static),
            12,
        );
        model
    }

    fn table_for(provider: StaticProvider) -> (Arc<Environment>, EnvironmentSymbolTable) {
        let environment = Arc::new(Environment::new("app", provider));
        let table = EnvironmentSymbolTable::new(&environment);
        (environment, table)
    }

    #[test]
    fn compatible() {
        let (_environment, table) = table_for(library());
        assert_eq!(check(&client_model(), &table), Verdict::Compatible);
        assert_eq!(check(&ReferenceModel::new("empty"), &table), Verdict::Compatible);
    }

    #[test]
    fn missing_method() {
        let mut provider = library();
        provider
            .class_mut(&class("org.lib.Client"))
            .unwrap()
            .methods
            .retain(|method| method.name.as_str() != "send");
        let (_environment, table) = table_for(provider);

        let verdict = check(&client_model(), &table);
        let mismatches = verdict.mismatches();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].symbol, Some(method("org.lib.Client", "send", "()V")));
        assert_eq!(mismatches[0].reason, MismatchReason::Missing);
        assert_eq!(mismatches[0].sources, BTreeSet::from([source(11)]));
    }

    #[test]
    fn missing_class_is_reported_once() {
        let mut provider = library();
        provider.remove_class(&class("org.lib.Client"));
        let (_environment, table) = table_for(provider);

        let verdict = check(&client_model(), &table);
        assert_eq!(verdict.mismatches().len(), 1);
        assert_eq!(
            verdict.mismatches()[0].symbol,
            Some(Symbol::Class(class("org.lib.Client")))
        );
    }

    #[test]
    fn flag_mismatches() {
        let (_environment, table) = table_for(library());
        let mut model = ReferenceModel::new("acme");
        require(
            &mut model,
            method("org.lib.Client", "prepare", "()V"),
            Flags::new(Visibility::Public).with_ownership(Ownership::Instance),
            20,
        );
        require(
            &mut model,
            method("org.lib.Client", "send", "()V"),
            Flags::new(Visibility::Protected).with_ownership(Ownership::Static),
            21,
        );
        require(
            &mut model,
            Symbol::Class(class("org.lib.Listener")),
            Flags::new(Visibility::Public).with_kind(ClassKind::Class),
            22,
        );
        require(
            &mut model,
            Symbol::Field {
                owner: class("org.lib.Client"),
                name: member_name("timeout"),
                descriptor: FieldType::int(),
            },
            Flags::new(Visibility::Protected)
                .with_ownership(Ownership::Instance)
                .with_min_version(Version::JAVA17),
            23,
        );

        let verdict = check(&model, &table);
        let reasons: Vec<_> = verdict
            .mismatches()
            .iter()
            .map(|mismatch| mismatch.reason.clone())
            .collect();
        assert_eq!(
            reasons,
            vec![
                MismatchReason::WrongKind {
                    required: ClassKind::Class,
                    actual: ClassKind::Interface,
                },
                MismatchReason::UnsupportedRuntimeVersion {
                    required: Version::JAVA17,
                    runtime: Version::JAVA11,
                },
                MismatchReason::VisibilityTooRestrictive {
                    required: Visibility::Public,
                    actual: Visibility::Protected,
                },
                MismatchReason::WrongStaticness {
                    required: Ownership::Static,
                    actual: Ownership::Instance,
                },
            ]
        );
    }

    fn listener_helper(methods: &[&str]) -> HelperClass {
        HelperClass {
            name: class("com.acme.TracingListener"),
            is_abstract: false,
            is_interface: false,
            super_class: Some(BinaryName::OBJECT),
            interfaces: vec![class("org.lib.Listener")],
            methods: methods
                .iter()
                .map(|name| HelperMethod {
                    name: member_name(name),
                    descriptor: MethodDescriptor::parse("()V").unwrap(),
                    is_abstract: false,
                    is_static: false,
                })
                .collect(),
            fields: BTreeSet::new(),
        }
    }

    #[test]
    fn helpers_implement_abstract_methods() {
        let (_environment, table) = table_for(library());

        let mut model = ReferenceModel::new("acme");
        let helper = listener_helper(&["onEvent"]);
        model.helpers.insert(helper.name.clone(), helper);
        assert_eq!(check(&model, &table), Verdict::Compatible);

        let mut model = ReferenceModel::new("acme");
        let helper = listener_helper(&["onOtherEvent"]);
        model.helpers.insert(helper.name.clone(), helper);
        let verdict = check(&model, &table);
        assert_eq!(verdict.mismatches().len(), 1);
        assert_eq!(
            verdict.mismatches()[0].symbol,
            Some(method("com.acme.TracingListener", "onEvent", "()V"))
        );
        assert_eq!(
            verdict.mismatches()[0].reason,
            MismatchReason::UnimplementedAbstractMethod {
                declared_in: class("org.lib.Listener"),
            }
        );
    }

    #[test]
    fn helper_fields_may_be_inherited() {
        let (_environment, table) = table_for(library());

        let helper = HelperClass {
            name: class("com.acme.TimedClient"),
            is_abstract: false,
            is_interface: false,
            super_class: Some(class("org.lib.Client")),
            interfaces: vec![],
            methods: BTreeSet::new(),
            fields: BTreeSet::from([HelperField {
                name: member_name("started"),
                descriptor: FieldType::long(),
            }]),
        };
        let field = |name: &str, descriptor: FieldType<BinaryName>| Symbol::Field {
            owner: class("com.acme.TimedClient"),
            name: member_name(name),
            descriptor,
        };

        let mut model = ReferenceModel::new("acme");
        model.helpers.insert(helper.name.clone(), helper);
        for (line, symbol) in [
            field("started", FieldType::long()),
            field("timeout", FieldType::int()),
            field("retries", FieldType::int()),
        ]
        .into_iter()
        .enumerate()
        {
            model
                .helper_field_accesses
                .entry(symbol)
                .or_default()
                .insert(source(line as u16));
        }

        let verdict = check(&model, &table);
        assert_eq!(verdict.mismatches().len(), 1);
        assert_eq!(
            verdict.mismatches()[0].symbol,
            Some(field("retries", FieldType::int()))
        );
        assert_eq!(verdict.mismatches()[0].reason, MismatchReason::Missing);
    }

    #[test]
    fn checking_is_repeatable() {
        let mut provider = library();
        provider.remove_class(&class("org.lib.Listener"));
        let (_environment, table) = table_for(provider);
        let mut model = client_model();
        require(
            &mut model,
            Symbol::Class(class("org.lib.Listener")),
            Flags::new(Visibility::Public),
            30,
        );

        let first = check(&model, &table);
        assert!(!first.is_compatible());
        for _ in 0..3 {
            assert_eq!(check(&model, &table), first);
        }
    }
}
