use crate::jvm::bytecode::{opcode, Instruction};
use crate::jvm::class_file::{
    AttributeLike, BootstrapMethod, BootstrapMethods, ClassFile, Code, ConstantIndex,
    ConstantsPool, Field, LineNumber, LineNumberTable, Method,
};
use crate::jvm::{
    BinaryName, ClassAccessFlags, Error, FieldAccessFlags, MethodAccessFlags, MethodDescriptor,
    ParseDescriptor, Version,
};

/// Incrementally assemble a class file
///
/// This is the inverse of [`ClassFile::parse`], mostly useful for synthesizing small classes
/// (eg. in tests or tooling). No stack map frames are computed, so the output should not be fed
/// to a verifying JVM.
pub struct ClassFileBuilder {
    version: Version,
    access_flags: ClassAccessFlags,
    constants: ConstantsPool,
    this_class: BinaryName,
    super_class: Option<BinaryName>,
    interfaces: Vec<BinaryName>,
    fields: Vec<Field>,
    methods: Vec<Method>,
    bootstrap_methods: Vec<BootstrapMethod>,
}

/// Member a method handle constant points to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle<'h> {
    /// `REF_getField` (1) through `REF_invokeInterface` (9)
    pub kind: u8,
    pub class: &'h str,
    pub name: &'h str,
    pub descriptor: &'h str,
}

impl ClassFileBuilder {
    /// Start a class (use `ClassAccessFlags::INTERFACE | ClassAccessFlags::ABSTRACT` for
    /// interfaces, which should extend `java/lang/Object`)
    pub fn new(
        name: BinaryName,
        super_class: Option<BinaryName>,
        access_flags: ClassAccessFlags,
    ) -> ClassFileBuilder {
        ClassFileBuilder {
            version: Version::JAVA8,
            access_flags,
            constants: ConstantsPool::new(),
            this_class: name,
            super_class,
            interfaces: vec![],
            fields: vec![],
            methods: vec![],
            bootstrap_methods: vec![],
        }
    }

    pub fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    pub fn add_interface(&mut self, interface: BinaryName) {
        self.interfaces.push(interface);
    }

    pub fn add_field(
        &mut self,
        access_flags: FieldAccessFlags,
        name: &str,
        descriptor: &str,
    ) -> Result<(), Error> {
        let field = Field {
            access_flags,
            name_index: self.constants.get_utf8(name)?,
            descriptor_index: self.constants.get_utf8(descriptor)?,
            attributes: vec![],
        };
        self.fields.push(field);
        Ok(())
    }

    /// Add a method without code (abstract or native)
    pub fn add_abstract_method(
        &mut self,
        access_flags: MethodAccessFlags,
        name: &str,
        descriptor: &str,
    ) -> Result<(), Error> {
        let method = Method {
            access_flags,
            name_index: self.constants.get_utf8(name)?,
            descriptor_index: self.constants.get_utf8(descriptor)?,
            attributes: vec![],
        };
        self.methods.push(method);
        Ok(())
    }

    /// Add a method with a body
    ///
    /// The body gets assembled by `generate`, which should end with some return instruction.
    pub fn add_method(
        &mut self,
        access_flags: MethodAccessFlags,
        name: &str,
        descriptor: &str,
        generate: impl FnOnce(&mut CodeWriter<'_>) -> Result<(), Error>,
    ) -> Result<(), Error> {
        let parsed = MethodDescriptor::<BinaryName>::parse(descriptor).map_err(|err| {
            Error::BadDescriptor {
                descriptor: descriptor.to_owned(),
                message: err.to_string(),
            }
        })?;
        let mut locals = parsed.parameter_slots();
        if !access_flags.contains(MethodAccessFlags::STATIC) {
            locals += 1;
        }

        let mut writer = CodeWriter {
            constants: &mut self.constants,
            code_array: vec![],
            line_numbers: vec![],
        };
        generate(&mut writer)?;
        let CodeWriter {
            code_array,
            line_numbers,
            ..
        } = writer;

        let mut attributes = vec![];
        if !line_numbers.is_empty() {
            attributes.push(LineNumberTable(line_numbers).encode(&mut self.constants)?);
        }
        let code = Code {
            max_stack: 16,
            max_locals: locals,
            code_array,
            exception_table: vec![],
            attributes,
        };

        let method = Method {
            access_flags,
            name_index: self.constants.get_utf8(name)?,
            descriptor_index: self.constants.get_utf8(descriptor)?,
            attributes: vec![code.encode(&mut self.constants)?],
        };
        self.methods.push(method);
        Ok(())
    }

    /// Register a bootstrap method for `invokedynamic`, returning its index
    pub fn add_bootstrap_method(
        &mut self,
        method: Handle<'_>,
        arguments: &[Handle<'_>],
    ) -> Result<u16, Error> {
        let method = self.method_handle(method)?;
        let arguments = arguments
            .iter()
            .map(|argument| self.method_handle(*argument))
            .collect::<Result<Vec<_>, Error>>()?;
        let index = u16::try_from(self.bootstrap_methods.len())
            .map_err(|_| Error::Overflow("bootstrap methods"))?;
        self.bootstrap_methods.push(BootstrapMethod { method, arguments });
        Ok(index)
    }

    fn method_handle(&mut self, handle: Handle<'_>) -> Result<ConstantIndex, Error> {
        let member = match handle.kind {
            1..=4 => self
                .constants
                .get_field_ref(handle.class, handle.name, handle.descriptor)?,
            kind => self.constants.get_method_ref(
                handle.class,
                handle.name,
                handle.descriptor,
                kind == 9,
            )?,
        };
        self.constants.add_method_handle(handle.kind, member)
    }

    /// Finish the class
    pub fn build(mut self) -> Result<ClassFile, Error> {
        let this_class = self.constants.get_class(&self.this_class)?;
        let super_class = match &self.super_class {
            Some(super_class) => self.constants.get_class(super_class)?,
            None => super::ConstantIndex(0),
        };
        let interfaces = self
            .interfaces
            .iter()
            .map(|interface| self.constants.get_class(interface))
            .collect::<Result<Vec<_>, Error>>()?;
        let mut attributes = vec![];
        if !self.bootstrap_methods.is_empty() {
            let bootstrap_methods = BootstrapMethods(self.bootstrap_methods);
            attributes.push(bootstrap_methods.encode(&mut self.constants)?);
        }
        Ok(ClassFile {
            version: self.version,
            constants: self.constants.into_pool(),
            access_flags: self.access_flags,
            this_class,
            super_class,
            interfaces,
            fields: self.fields,
            methods: self.methods,
            attributes,
        })
    }

    /// Finish the class and serialize it
    pub fn to_bytes(self) -> Result<Vec<u8>, Error> {
        self.build()?.to_bytes()
    }
}

/// How a field is accessed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAccess {
    GetStatic,
    PutStatic,
    GetField,
    PutField,
}

/// How a method is invoked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invoke {
    Virtual,
    Special,
    Static,
    /// `invokeinterface`
    Interface,
    /// `invokestatic` (or `invokespecial`) on an interface method
    StaticInterface,
}

/// Assembles the code of one method
pub struct CodeWriter<'a> {
    constants: &'a mut ConstantsPool,
    code_array: Vec<u8>,
    line_numbers: Vec<LineNumber>,
}

impl<'a> CodeWriter<'a> {
    /// Mark the next instruction as starting a new source line
    pub fn line(&mut self, line_number: u16) -> Result<(), Error> {
        let start_pc =
            u16::try_from(self.code_array.len()).map_err(|_| Error::Overflow("code array"))?;
        self.line_numbers.push(LineNumber {
            start_pc,
            line_number,
        });
        Ok(())
    }

    /// Append a raw instruction
    pub fn push(&mut self, instruction: Instruction) -> Result<(), Error> {
        instruction.encode(&mut self.code_array)
    }

    /// Append a single-byte instruction such as `return` (see [`opcode`])
    pub fn op(&mut self, op: u8) -> Result<(), Error> {
        self.push(Instruction::Other(op))
    }

    pub fn field(
        &mut self,
        access: FieldAccess,
        class: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<(), Error> {
        let field = self.constants.get_field_ref(class, name, descriptor)?;
        self.push(match access {
            FieldAccess::GetStatic => Instruction::GetStatic(field),
            FieldAccess::PutStatic => Instruction::PutStatic(field),
            FieldAccess::GetField => Instruction::GetField(field),
            FieldAccess::PutField => Instruction::PutField(field),
        })
    }

    pub fn invoke(
        &mut self,
        invoke: Invoke,
        class: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<(), Error> {
        let is_interface = matches!(invoke, Invoke::Interface | Invoke::StaticInterface);
        let method = self
            .constants
            .get_method_ref(class, name, descriptor, is_interface)?;
        self.push(match invoke {
            Invoke::Virtual => Instruction::InvokeVirtual(method),
            Invoke::Special => Instruction::InvokeSpecial(method),
            Invoke::Static | Invoke::StaticInterface => Instruction::InvokeStatic(method),
            Invoke::Interface => {
                let parsed = MethodDescriptor::<BinaryName>::parse(descriptor).map_err(|err| {
                    Error::BadDescriptor {
                        descriptor: descriptor.to_owned(),
                        message: err.to_string(),
                    }
                })?;
                let count = 1 + parsed.parameter_slots();
                let count = u8::try_from(count).map_err(|_| Error::Overflow("argument count"))?;
                Instruction::InvokeInterface { method, count }
            }
        })
    }

    /// `new`, `anewarray`, `checkcast`, or `instanceof` on a class (or array descriptor)
    pub fn type_op(&mut self, op: u8, class: &str) -> Result<(), Error> {
        let class = self.constants.get_class_raw(class)?;
        self.push(match op {
            opcode::NEW => Instruction::New(class),
            opcode::ANEWARRAY => Instruction::ANewArray(class),
            opcode::CHECKCAST => Instruction::CheckCast(class),
            opcode::INSTANCEOF => Instruction::InstanceOf(class),
            _ => return Err(Error::UnknownOpcode { opcode: op, offset: 0 }),
        })
    }

    /// `invokedynamic` through a bootstrap method from [`ClassFileBuilder::add_bootstrap_method`]
    pub fn invoke_dynamic(
        &mut self,
        bootstrap_method: u16,
        name: &str,
        descriptor: &str,
    ) -> Result<(), Error> {
        let call_site = self
            .constants
            .add_invoke_dynamic(bootstrap_method, name, descriptor)?;
        self.push(Instruction::InvokeDynamic(call_site))
    }

    /// Load a class literal (eg. `Foo.class`)
    pub fn ldc_class(&mut self, class: &str) -> Result<(), Error> {
        let class = self.constants.get_class_raw(class)?;
        self.push(Instruction::Ldc(class))
    }

    pub fn ldc_string(&mut self, string: &str) -> Result<(), Error> {
        let string = self.constants.get_string(string)?;
        self.push(Instruction::Ldc(string))
    }
}
