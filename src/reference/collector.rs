use super::{
    ClassKind, ExtractionError, ExtractionErrorKind, Flags, HelperClass, HelperField,
    HelperMethod, MergeConflict, Ownership, ReferenceModel, Requirement, Source, Symbol,
    Visibility,
};
use crate::jvm::bytecode::{Instruction, Instructions};
use crate::jvm::class_file::{
    Attribute, BootstrapMethods, ClassFile, Constant, ConstantIndex, LineNumberTable, MemberRef,
};
use crate::jvm::{
    self, BinaryName, ClassAccessFlags, FieldType, MethodAccessFlags, MethodDescriptor, Name,
    ParseDescriptor, UnqualifiedName, Version,
};
use crate::util::Trie;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// A unit of instrumentation: the compiled helper classes that get injected together
#[derive(Clone, Debug)]
pub struct ModuleDefinition {
    name: String,
    helpers: BTreeMap<BinaryName, Vec<u8>>,
    entry_points: Vec<BinaryName>,
}

impl ModuleDefinition {
    pub fn new(name: impl Into<String>) -> ModuleDefinition {
        ModuleDefinition {
            name: name.into(),
            helpers: BTreeMap::new(),
            entry_points: vec![],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register the class file of a helper class
    pub fn add_helper(&mut self, name: BinaryName, class_file: Vec<u8>) {
        self.helpers.insert(name, class_file);
    }

    /// Register a class from which scanning starts
    ///
    /// Without any entry points, every helper is scanned.
    pub fn add_entry_point(&mut self, name: BinaryName) {
        self.entry_points.push(name);
    }

    pub fn is_helper(&self, name: &BinaryName) -> bool {
        self.helpers.contains_key(name)
    }

    pub fn helper_names(&self) -> impl Iterator<Item = &BinaryName> + '_ {
        self.helpers.keys()
    }
}

/// Static extraction of a module's references
///
/// Scanning starts from the entry points and transitively follows every helper class those use.
/// Each helper class produces its own partial model and partial models are merged. No module code
/// is ever run.
pub struct ReferenceCollector<'a> {
    module: &'a ModuleDefinition,

    /// Prefixes of classes which are never checked (eg. `java/`)
    excluded: &'a Trie<()>,
}

impl<'a> ReferenceCollector<'a> {
    pub fn new(module: &'a ModuleDefinition, excluded: &'a Trie<()>) -> ReferenceCollector<'a> {
        ReferenceCollector { module, excluded }
    }

    pub fn collect(&self) -> Result<ReferenceModel, ExtractionError> {
        let mut queue: VecDeque<BinaryName> = if self.module.entry_points.is_empty() {
            self.module.helpers.keys().cloned().collect()
        } else {
            self.module.entry_points.iter().cloned().collect()
        };
        let mut visited: BTreeSet<BinaryName> = BTreeSet::new();
        let mut model = ReferenceModel::new(self.module.name.clone());

        while let Some(name) = queue.pop_front() {
            if !visited.insert(name.clone()) {
                continue;
            }
            let error = |kind| ExtractionError {
                class: name.clone(),
                kind,
            };

            let bytes = self
                .module
                .helpers
                .get(&name)
                .ok_or_else(|| error(ExtractionErrorKind::MissingHelper))?;
            let class = ClassFile::parse(bytes)
                .map_err(|err| error(ExtractionErrorKind::MalformedClass(err)))?;
            let declared_name = class
                .name()
                .map_err(|err| error(ExtractionErrorKind::MalformedClass(err)))?;
            if declared_name != name {
                return Err(error(ExtractionErrorKind::NameMismatch(declared_name)));
            }

            let mut scanner = ClassScanner::new(self, &class, &name);
            scanner
                .scan()
                .map_err(|err| error(ExtractionErrorKind::MalformedClass(err)))?;
            let ClassScanner {
                partial,
                used_helpers,
                conflict,
                ..
            } = scanner;
            if let Some(conflict) = conflict {
                return Err(error(ExtractionErrorKind::Conflict(conflict)));
            }

            log::debug!(
                "Collected {} references from helper {} of module {}",
                partial.len(),
                name,
                self.module.name
            );
            model = model
                .merge(&partial)
                .map_err(|conflict| error(ExtractionErrorKind::Conflict(conflict)))?;
            queue.extend(used_helpers.into_iter().filter(|used| !visited.contains(used)));
        }

        Ok(model)
    }

    fn is_excluded(&self, class: &BinaryName) -> bool {
        self.excluded.lookup(class.as_str()).is_some()
    }
}

/// Collects the references made from one helper class
struct ClassScanner<'c, 'a> {
    collector: &'c ReferenceCollector<'a>,
    class: &'c ClassFile,
    this_class: &'c BinaryName,
    partial: ReferenceModel,
    used_helpers: BTreeSet<BinaryName>,

    /// First conflict found (scanning carries on so that one error doesn't hide the class)
    conflict: Option<MergeConflict>,
}

impl<'c, 'a> ClassScanner<'c, 'a> {
    fn new(
        collector: &'c ReferenceCollector<'a>,
        class: &'c ClassFile,
        this_class: &'c BinaryName,
    ) -> ClassScanner<'c, 'a> {
        ClassScanner {
            collector,
            class,
            this_class,
            partial: ReferenceModel::new(collector.module.name.clone()),
            used_helpers: BTreeSet::new(),
            conflict: None,
        }
    }

    fn version(&self) -> Version {
        self.class.version
    }

    fn scan(&mut self) -> Result<(), jvm::Error> {
        let helper = self.describe_helper()?;
        let declaration = Source {
            class: self.this_class.clone(),
            line: None,
        };
        if let Some(super_class) = &helper.super_class {
            self.class_reference(super_class, Some(ClassKind::Class), &declaration);
        }
        for interface in &helper.interfaces {
            self.class_reference(interface, Some(ClassKind::Interface), &declaration);
        }
        self.partial.helpers.insert(helper.name.clone(), helper);

        let class = self.class;
        let bootstrap_methods: BootstrapMethods =
            Attribute::find(&class.attributes, &class.constants)?.unwrap_or_default();

        for method in &class.methods {
            let code = match method.code(&class.constants)? {
                Some(code) => code,
                None => continue,
            };
            let lines: LineNumberTable =
                Attribute::find(&code.attributes, &class.constants)?.unwrap_or_default();
            for instruction in Instructions::new(&code.code_array) {
                let (offset, instruction) = instruction?;
                let source = Source {
                    class: self.this_class.clone(),
                    line: lines.line_at(offset),
                };
                self.instruction(instruction, &source, &bootstrap_methods)?;
            }
        }

        Ok(())
    }

    /// Declared shape of the class being scanned
    fn describe_helper(&self) -> Result<HelperClass, jvm::Error> {
        let constants = &self.class.constants;
        let mut methods = BTreeSet::new();
        for method in &self.class.methods {
            methods.insert(HelperMethod {
                name: method.name(constants)?,
                descriptor: method.descriptor(constants)?,
                is_abstract: method.access_flags.contains(MethodAccessFlags::ABSTRACT),
                is_static: method.access_flags.contains(MethodAccessFlags::STATIC),
            });
        }
        let mut fields = BTreeSet::new();
        for field in &self.class.fields {
            fields.insert(HelperField {
                name: field.name(constants)?,
                descriptor: field.descriptor(constants)?,
            });
        }
        Ok(HelperClass {
            name: self.this_class.clone(),
            is_abstract: self.class.access_flags.contains(ClassAccessFlags::ABSTRACT),
            is_interface: self.class.is_interface(),
            super_class: self.class.super_class_name()?,
            interfaces: self.class.interface_names()?,
            methods,
            fields,
        })
    }

    fn instruction(
        &mut self,
        instruction: Instruction,
        source: &Source,
        bootstrap_methods: &BootstrapMethods,
    ) -> Result<(), jvm::Error> {
        let class = self.class;
        let constants = &class.constants;
        match instruction {
            Instruction::GetStatic(idx) | Instruction::PutStatic(idx) => {
                let field = constants.get_field_ref(idx)?;
                self.field_reference(field, Ownership::Static, source)?;
            }
            Instruction::GetField(idx) | Instruction::PutField(idx) => {
                let field = constants.get_field_ref(idx)?;
                self.field_reference(field, Ownership::Instance, source)?;
            }
            Instruction::InvokeStatic(idx) => {
                let method = constants.get_method_ref(idx)?;
                self.method_reference(method, Ownership::Static, source)?;
            }
            Instruction::InvokeVirtual(idx)
            | Instruction::InvokeSpecial(idx)
            | Instruction::InvokeInterface { method: idx, .. } => {
                let method = constants.get_method_ref(idx)?;
                self.method_reference(method, Ownership::Instance, source)?;
            }
            Instruction::InvokeDynamic(idx) => {
                self.invoke_dynamic(idx, source, bootstrap_methods)?;
            }
            Instruction::Ldc(idx) => {
                if let Constant::Class(_) = constants.get(idx)? {
                    let name = constants.get_class_name(idx)?;
                    if let Some(class) = resolve_class_name(name)? {
                        self.class_reference(&class, None, source);
                    }
                }
            }
            other => {
                if let Some(idx) = other.class_operand() {
                    let name = constants.get_class_name(idx)?;
                    if let Some(class) = resolve_class_name(name)? {
                        self.class_reference(&class, None, source);
                    }
                }
            }
        }
        Ok(())
    }

    /// Bootstrap method owner, and the methods passed as method handles to the bootstrap method
    fn invoke_dynamic(
        &mut self,
        idx: ConstantIndex,
        source: &Source,
        bootstrap_methods: &BootstrapMethods,
    ) -> Result<(), jvm::Error> {
        let class = self.class;
        let constants = &class.constants;
        let bootstrap_idx = match constants.get(idx)? {
            Constant::InvokeDynamic {
                bootstrap_method, ..
            } => *bootstrap_method,
            _ => {
                return Err(jvm::Error::WrongConstantKind {
                    index: idx.0,
                    expected: "InvokeDynamic",
                })
            }
        };
        let bootstrap = match bootstrap_methods.0.get(bootstrap_idx as usize) {
            Some(bootstrap) => bootstrap,
            None => return Err(jvm::Error::BadConstantIndex(bootstrap_idx)),
        };

        let (_, bootstrap_method) = constants.get_method_handle(bootstrap.method)?;
        if let Some(owner) = resolve_class_name(bootstrap_method.class)? {
            self.class_reference(&owner, None, source);
        }

        for argument in &bootstrap.arguments {
            if let Constant::MethodHandle { .. } = constants.get(*argument)? {
                let (kind, member) = constants.get_method_handle(*argument)?;
                match kind {
                    // `REF_getField` and `REF_putField`
                    1 | 3 => self.field_reference(member, Ownership::Instance, source)?,
                    // `REF_getStatic` and `REF_putStatic`
                    2 | 4 => self.field_reference(member, Ownership::Static, source)?,
                    // `REF_invokeVirtual` to `REF_invokeInterface`
                    5 | 7 | 8 | 9 => self.method_reference(member, Ownership::Instance, source)?,
                    6 => self.method_reference(member, Ownership::Static, source)?,
                    _ => {
                        if let Some(owner) = resolve_class_name(member.class)? {
                            self.class_reference(&owner, None, source);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn field_reference(
        &mut self,
        field: MemberRef<'_>,
        ownership: Ownership,
        source: &Source,
    ) -> Result<(), jvm::Error> {
        let owner = match resolve_class_name(field.class)? {
            Some(owner) => owner,
            None => return Ok(()),
        };
        let name = parse_member_name(field.name)?;
        let descriptor = FieldType::<BinaryName>::parse(field.descriptor)
            .map_err(|err| bad_descriptor(field.descriptor, err))?;

        self.class_reference(&owner, None, source);
        if let Some(field_class) = descriptor.underlying_class() {
            self.class_reference(field_class, None, source);
        }

        let symbol = Symbol::Field {
            owner: owner.clone(),
            name,
            descriptor,
        };
        if self.collector.module.is_helper(&owner) {
            self.partial
                .helper_field_accesses
                .entry(symbol)
                .or_default()
                .insert(source.clone());
        } else if !self.collector.is_excluded(&owner) {
            let flags = Flags::new(Visibility::required_for_member(self.this_class, &owner))
                .with_ownership(ownership)
                .with_min_version(self.version());
            self.require(symbol, Requirement::new(flags, source.clone()));
        }
        Ok(())
    }

    fn method_reference(
        &mut self,
        method: MemberRef<'_>,
        ownership: Ownership,
        source: &Source,
    ) -> Result<(), jvm::Error> {
        let descriptor = MethodDescriptor::<BinaryName>::parse(method.descriptor)
            .map_err(|err| bad_descriptor(method.descriptor, err))?;
        for class in descriptor.referenced_classes() {
            self.class_reference(class, None, source);
        }

        // Methods on arrays (eg. `clone`) are always there
        if method.class.starts_with('[') {
            if let Some(element) = resolve_class_name(method.class)? {
                self.class_reference(&element, None, source);
            }
            return Ok(());
        }

        let owner = parse_class_name(method.class)?;
        let kind = if method.is_interface {
            ClassKind::Interface
        } else {
            ClassKind::Class
        };
        self.class_reference(&owner, Some(kind), source);

        // Calls on helpers aren't checked, even when the helper inherits the method from a
        // library type
        if self.collector.module.is_helper(&owner) || self.collector.is_excluded(&owner) {
            return Ok(());
        }
        let symbol = Symbol::Method {
            owner: owner.clone(),
            name: parse_member_name(method.name)?,
            descriptor,
        };
        let flags = Flags::new(Visibility::required_for_member(self.this_class, &owner))
            .with_ownership(ownership)
            .with_min_version(self.version());
        self.require(symbol, Requirement::new(flags, source.clone()));
        Ok(())
    }

    /// Reference to a class, or a note that a helper is used if the class is part of the module
    fn class_reference(&mut self, class: &BinaryName, kind: Option<ClassKind>, source: &Source) {
        if self.collector.module.is_helper(class) {
            if class != self.this_class {
                self.used_helpers.insert(class.clone());
            }
            return;
        }
        if self.collector.is_excluded(class) {
            return;
        }
        let mut flags = Flags::new(Visibility::required_for_class(self.this_class, class))
            .with_min_version(self.version());
        flags.kind = kind;
        self.require(Symbol::Class(class.clone()), Requirement::new(flags, source.clone()));
    }

    fn require(&mut self, symbol: Symbol, requirement: Requirement) {
        if let Err(conflict) = self.partial.require(symbol, requirement) {
            log::debug!("{} in {}", conflict, self.this_class);
            self.conflict.get_or_insert(conflict);
        }
    }
}

/// Class named by a class constant, reducing arrays to their element class
///
/// Arrays of primitives have no class.
fn resolve_class_name(name: &str) -> Result<Option<BinaryName>, jvm::Error> {
    if name.starts_with('[') {
        let array = FieldType::<BinaryName>::parse(name).map_err(|err| bad_descriptor(name, err))?;
        Ok(array.underlying_class().cloned())
    } else {
        parse_class_name(name).map(Some)
    }
}

fn parse_class_name(name: &str) -> Result<BinaryName, jvm::Error> {
    BinaryName::from_string(name.to_owned()).map_err(jvm::Error::BadName)
}

fn parse_member_name(name: &str) -> Result<UnqualifiedName, jvm::Error> {
    UnqualifiedName::from_string(name.to_owned()).map_err(jvm::Error::BadName)
}

fn bad_descriptor(descriptor: &str, err: std::io::Error) -> jvm::Error {
    jvm::Error::BadDescriptor {
        descriptor: descriptor.to_owned(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::jvm::bytecode::opcode;
    use crate::jvm::class_file::{ClassFileBuilder, FieldAccess, Handle, Invoke};
    use crate::jvm::FieldAccessFlags;

    fn class(name: &str) -> BinaryName {
        BinaryName::from_dotted_or_internal(name).unwrap()
    }

    fn java_excluded() -> Trie<()> {
        let mut trie = Trie::new();
        trie.insert("java/", ());
        trie
    }

    /// `com/acme/Advice` calling into `org/lib` and into `com/acme/Support`
    fn module() -> ModuleDefinition {
        let advice = class("com.acme.Advice");
        let mut builder = ClassFileBuilder::new(
            advice.clone(),
            Some(BinaryName::OBJECT),
            ClassAccessFlags::PUBLIC,
        );
        builder
            .add_method(
                MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
                "onEnter",
                "(Lorg/lib/Request;)V",
                |code| {
                    code.line(20)?;
                    code.op(opcode::ALOAD_0)?;
                    code.invoke(Invoke::Virtual, "org/lib/Request", "url", "()Lorg/lib/Url;")?;
                    code.op(opcode::POP)?;
                    code.line(21)?;
                    code.field(FieldAccess::GetStatic, "org/lib/Config", "DEBUG", "Z")?;
                    code.op(opcode::POP)?;
                    code.invoke(Invoke::Static, "com/acme/Support", "help", "()V")?;
                    code.invoke(Invoke::Static, "java/lang/System", "nanoTime", "()J")?;
                    code.op(0x58)?; // pop2
                    code.type_op(opcode::ANEWARRAY, "[Lorg/lib/Header;")?;
                    code.op(opcode::POP)?;
                    code.op(opcode::RETURN)
                },
            )
            .unwrap();

        let support = class("com.acme.Support");
        let mut support_builder =
            ClassFileBuilder::new(support.clone(), Some(class("org.lib.Base")), ClassAccessFlags::PUBLIC);
        support_builder.add_interface(class("org.lib.Listener"));
        support_builder
            .add_field(FieldAccessFlags::PRIVATE, "own", "I")
            .unwrap();
        support_builder
            .add_method(
                MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
                "help",
                "()V",
                |code| {
                    code.field(FieldAccess::GetStatic, "com/acme/Support", "inherited", "I")?;
                    code.op(opcode::POP)?;
                    code.op(opcode::RETURN)
                },
            )
            .unwrap();

        let mut module = ModuleDefinition::new("acme");
        module.add_helper(advice.clone(), builder.to_bytes().unwrap());
        module.add_helper(support, support_builder.to_bytes().unwrap());
        module.add_entry_point(advice);
        module
    }

    #[test]
    fn collects_library_references() {
        let excluded = java_excluded();
        let module = module();
        let model = ReferenceCollector::new(&module, &excluded).collect().unwrap();

        let request = Symbol::Class(class("org.lib.Request"));
        let url_method = Symbol::Method {
            owner: class("org.lib.Request"),
            name: UnqualifiedName::from_string(String::from("url")).unwrap(),
            descriptor: MethodDescriptor::parse("()Lorg/lib/Url;").unwrap(),
        };
        let debug_field = Symbol::Field {
            owner: class("org.lib.Config"),
            name: UnqualifiedName::from_string(String::from("DEBUG")).unwrap(),
            descriptor: FieldType::boolean(),
        };

        let request_requirement = model.get(&request).unwrap();
        assert_eq!(request_requirement.flags.visibility, Visibility::Public);
        assert_eq!(request_requirement.flags.kind, Some(ClassKind::Class));
        assert_eq!(request_requirement.flags.min_version, Some(Version::JAVA8));

        let url_requirement = model.get(&url_method).unwrap();
        assert_eq!(url_requirement.flags.ownership, Some(Ownership::Instance));
        assert_eq!(url_requirement.flags.visibility, Visibility::Protected);
        assert_eq!(
            url_requirement.sources.iter().next().unwrap().line,
            Some(20)
        );

        let debug_requirement = model.get(&debug_field).unwrap();
        assert_eq!(debug_requirement.flags.ownership, Some(Ownership::Static));
        assert_eq!(debug_requirement.sources.iter().next().unwrap().line, Some(21));

        // Return types, array elements, and supertypes of helpers
        assert!(model.get(&Symbol::Class(class("org.lib.Url"))).is_some());
        assert!(model.get(&Symbol::Class(class("org.lib.Header"))).is_some());
        assert_eq!(
            model.get(&Symbol::Class(class("org.lib.Base"))).unwrap().flags.kind,
            Some(ClassKind::Class)
        );
        assert_eq!(
            model
                .get(&Symbol::Class(class("org.lib.Listener")))
                .unwrap()
                .flags
                .kind,
            Some(ClassKind::Interface)
        );

        // Excluded and helper classes are not requirements
        assert!(model.references.keys().all(|symbol| !symbol.owner().as_str().starts_with("java/")));
        assert!(model.get(&Symbol::Class(class("com.acme.Support"))).is_none());
        assert!(model.is_helper(&class("com.acme.Support")));

        // Field accessed on a helper but not declared by it
        assert_eq!(model.helper_field_accesses.len(), 1);
    }

    #[test]
    fn method_handles_of_call_sites() {
        let name = class("com.acme.Lambdas");
        let mut builder =
            ClassFileBuilder::new(name.clone(), Some(BinaryName::OBJECT), ClassAccessFlags::PUBLIC);
        let bootstrap = builder
            .add_bootstrap_method(
                Handle {
                    kind: 6,
                    class: "org/lib/Factory",
                    name: "link",
                    descriptor: "(Ljava/lang/invoke/MethodHandles$Lookup;Ljava/lang/String;Ljava/lang/invoke/MethodType;)Ljava/lang/invoke/CallSite;",
                },
                &[
                    Handle {
                        kind: 2,
                        class: "org/lib/Config",
                        name: "LEVEL",
                        descriptor: "I",
                    },
                    Handle {
                        kind: 3,
                        class: "org/lib/Request",
                        name: "body",
                        descriptor: "Lorg/lib/Body;",
                    },
                    Handle {
                        kind: 5,
                        class: "org/lib/Request",
                        name: "url",
                        descriptor: "()Lorg/lib/Url;",
                    },
                ],
            )
            .unwrap();
        builder
            .add_method(
                MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
                "make",
                "()Ljava/lang/Runnable;",
                |code| {
                    code.line(30)?;
                    code.invoke_dynamic(bootstrap, "run", "()Ljava/lang/Runnable;")?;
                    code.op(opcode::ARETURN)
                },
            )
            .unwrap();
        let mut module = ModuleDefinition::new("lambdas");
        module.add_helper(name, builder.to_bytes().unwrap());

        let excluded = java_excluded();
        let model = ReferenceCollector::new(&module, &excluded).collect().unwrap();
        let member = |owner: &str, name: &str| {
            let name = UnqualifiedName::from_string(name.to_owned()).unwrap();
            (class(owner), name)
        };

        assert!(model.get(&Symbol::Class(class("org.lib.Factory"))).is_some());

        let (owner, level) = member("org.lib.Config", "LEVEL");
        let level = model
            .get(&Symbol::Field {
                owner,
                name: level,
                descriptor: FieldType::int(),
            })
            .unwrap();
        assert_eq!(level.flags.ownership, Some(Ownership::Static));
        assert_eq!(level.sources.iter().next().unwrap().line, Some(30));

        let (owner, body) = member("org.lib.Request", "body");
        let body = model
            .get(&Symbol::Field {
                owner,
                name: body,
                descriptor: FieldType::object(class("org.lib.Body")),
            })
            .unwrap();
        assert_eq!(body.flags.ownership, Some(Ownership::Instance));
        assert!(model.get(&Symbol::Class(class("org.lib.Body"))).is_some());

        let (owner, url) = member("org.lib.Request", "url");
        let url = model
            .get(&Symbol::Method {
                owner,
                name: url,
                descriptor: MethodDescriptor::parse("()Lorg/lib/Url;").unwrap(),
            })
            .unwrap();
        assert_eq!(url.flags.ownership, Some(Ownership::Instance));
    }

    #[test]
    fn missing_and_malformed_helpers() {
        let excluded = java_excluded();
        let mut module = module();
        module.add_entry_point(class("com.acme.Ghost"));
        let err = ReferenceCollector::new(&module, &excluded).collect().unwrap_err();
        assert_eq!(err.class, class("com.acme.Ghost"));
        assert!(matches!(err.kind, ExtractionErrorKind::MissingHelper));

        let mut broken = ModuleDefinition::new("broken");
        broken.add_helper(class("com.acme.Broken"), vec![0xCA, 0xFE]);
        let err = ReferenceCollector::new(&broken, &excluded).collect().unwrap_err();
        assert!(matches!(err.kind, ExtractionErrorKind::MalformedClass(_)));
    }

    #[test]
    fn conflicting_ownership() {
        let name = class("com.acme.Confused");
        let mut builder =
            ClassFileBuilder::new(name.clone(), Some(BinaryName::OBJECT), ClassAccessFlags::PUBLIC);
        builder
            .add_method(MethodAccessFlags::STATIC, "run", "()V", |code| {
                code.field(FieldAccess::GetStatic, "org/lib/Config", "level", "I")?;
                code.op(opcode::POP)?;
                code.op(opcode::ACONST_NULL)?;
                code.field(FieldAccess::GetField, "org/lib/Config", "level", "I")?;
                code.op(opcode::POP)?;
                code.op(opcode::RETURN)
            })
            .unwrap();
        let mut module = ModuleDefinition::new("confused");
        module.add_helper(name, builder.to_bytes().unwrap());

        let excluded = java_excluded();
        let err = ReferenceCollector::new(&module, &excluded).collect().unwrap_err();
        assert!(matches!(err.kind, ExtractionErrorKind::Conflict(_)));
    }

    #[test]
    fn helper_registered_under_wrong_name() {
        let builder = ClassFileBuilder::new(
            class("com.acme.Real"),
            Some(BinaryName::OBJECT),
            ClassAccessFlags::PUBLIC,
        );
        let mut module = ModuleDefinition::new("renamed");
        module.add_helper(class("com.acme.Alias"), builder.to_bytes().unwrap());

        let excluded = java_excluded();
        let err = ReferenceCollector::new(&module, &excluded).collect().unwrap_err();
        assert_eq!(err.class, class("com.acme.Alias"));
        assert!(matches!(
            &err.kind,
            ExtractionErrorKind::NameMismatch(found) if found == &class("com.acme.Real")
        ));
    }
}
