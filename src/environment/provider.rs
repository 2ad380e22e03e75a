use crate::jvm::class_file::ClassFile;
use crate::jvm::{
    self, BinaryName, ClassAccessFlags, FieldAccessFlags, FieldType, MethodAccessFlags,
    MethodDescriptor, Name, ParseDescriptor, UnqualifiedName, Version,
};
use std::fmt;

/// Capability to look at the classes an environment has available right now
///
/// Implementations must be deterministic for a given environment: describing the same class
/// twice should give the same answer.
pub trait SymbolProvider: Send + Sync {
    /// Highest class file version the environment's runtime can load
    fn runtime_version(&self) -> Version;

    /// Describe a class, or `None` if there is no such class
    ///
    /// An error means the class exists in some form but could not be resolved (eg. because one
    /// of its own dependencies is missing).
    fn describe_class(&self, name: &BinaryName) -> Result<Option<ClassDescription>, ResolutionError>;
}

/// A class which exists, but could not be resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionError {
    pub class: BinaryName,
    pub message: String,
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to resolve {}: {}", self.class, self.message)
    }
}

impl std::error::Error for ResolutionError {}

/// Declared shape of a class in an environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDescription {
    pub name: BinaryName,
    pub access_flags: ClassAccessFlags,
    pub super_class: Option<BinaryName>,
    pub interfaces: Vec<BinaryName>,
    pub methods: Vec<MethodDescription>,
    pub fields: Vec<FieldDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescription {
    pub name: UnqualifiedName,
    pub descriptor: MethodDescriptor<BinaryName>,
    pub access_flags: MethodAccessFlags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescription {
    pub name: UnqualifiedName,
    pub descriptor: FieldType<BinaryName>,
    pub access_flags: FieldAccessFlags,
}

impl ClassDescription {
    /// Description of a class without any members, extending `java/lang/Object`
    pub fn new(name: BinaryName, access_flags: ClassAccessFlags) -> ClassDescription {
        let super_class = if name == BinaryName::OBJECT {
            None
        } else {
            Some(BinaryName::OBJECT)
        };
        ClassDescription {
            name,
            access_flags,
            super_class,
            interfaces: vec![],
            methods: vec![],
            fields: vec![],
        }
    }

    /// Members of `java/lang/Object`, which every environment has
    ///
    /// Used when an environment is unable to describe its own root class.
    pub fn object() -> ClassDescription {
        let public = MethodAccessFlags::PUBLIC;
        let public_final = MethodAccessFlags::PUBLIC | MethodAccessFlags::FINAL;
        let object = || FieldType::object(BinaryName::OBJECT);
        let method = |access_flags: MethodAccessFlags,
                      name: &'static str,
                      parameters: Vec<FieldType<BinaryName>>,
                      return_type: Option<FieldType<BinaryName>>| {
            MethodDescription {
                name: UnqualifiedName::constant(name),
                descriptor: MethodDescriptor {
                    parameters,
                    return_type,
                },
                access_flags,
            }
        };

        let mut description = ClassDescription::new(BinaryName::OBJECT, ClassAccessFlags::PUBLIC);
        description.methods = vec![
            method(public, "<init>", vec![], None),
            method(public, "equals", vec![object()], Some(FieldType::boolean())),
            method(public, "hashCode", vec![], Some(FieldType::int())),
            method(
                public,
                "toString",
                vec![],
                Some(FieldType::object(BinaryName::STRING)),
            ),
            method(
                public_final | MethodAccessFlags::NATIVE,
                "getClass",
                vec![],
                Some(FieldType::object(BinaryName::CLASS)),
            ),
            method(public_final, "notify", vec![], None),
            method(public_final, "notifyAll", vec![], None),
            method(public_final, "wait", vec![], None),
            method(public_final, "wait", vec![FieldType::long()], None),
            method(
                public_final,
                "wait",
                vec![FieldType::long(), FieldType::int()],
                None,
            ),
            method(MethodAccessFlags::PROTECTED, "clone", vec![], Some(object())),
            method(MethodAccessFlags::PROTECTED, "finalize", vec![], None),
        ];
        description
    }

    pub fn set_super_class(&mut self, super_class: Option<BinaryName>) {
        self.super_class = super_class;
    }

    pub fn add_interface(&mut self, interface: BinaryName) {
        self.interfaces.push(interface);
    }

    pub fn add_method(
        &mut self,
        access_flags: MethodAccessFlags,
        name: &str,
        descriptor: &str,
    ) -> Result<(), jvm::Error> {
        self.methods.push(MethodDescription {
            name: UnqualifiedName::from_string(name.to_owned()).map_err(jvm::Error::BadName)?,
            descriptor: MethodDescriptor::parse(descriptor)
                .map_err(|err| bad_descriptor(descriptor, err))?,
            access_flags,
        });
        Ok(())
    }

    pub fn add_field(
        &mut self,
        access_flags: FieldAccessFlags,
        name: &str,
        descriptor: &str,
    ) -> Result<(), jvm::Error> {
        self.fields.push(FieldDescription {
            name: UnqualifiedName::from_string(name.to_owned()).map_err(jvm::Error::BadName)?,
            descriptor: FieldType::parse(descriptor)
                .map_err(|err| bad_descriptor(descriptor, err))?,
            access_flags,
        });
        Ok(())
    }

    /// Read the description out of a parsed class file
    pub fn from_class_file(class: &ClassFile) -> Result<ClassDescription, jvm::Error> {
        let constants = &class.constants;
        let methods = class
            .methods
            .iter()
            .map(|method| {
                Ok(MethodDescription {
                    name: method.name(constants)?,
                    descriptor: method.descriptor(constants)?,
                    access_flags: method.access_flags,
                })
            })
            .collect::<Result<Vec<_>, jvm::Error>>()?;
        let fields = class
            .fields
            .iter()
            .map(|field| {
                Ok(FieldDescription {
                    name: field.name(constants)?,
                    descriptor: field.descriptor(constants)?,
                    access_flags: field.access_flags,
                })
            })
            .collect::<Result<Vec<_>, jvm::Error>>()?;
        Ok(ClassDescription {
            name: class.name()?,
            access_flags: class.access_flags,
            super_class: class.super_class_name()?,
            interfaces: class.interface_names()?,
            methods,
            fields,
        })
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags.contains(ClassAccessFlags::INTERFACE)
    }

    pub fn declared_method(
        &self,
        name: &UnqualifiedName,
        descriptor: &MethodDescriptor<BinaryName>,
    ) -> Option<&MethodDescription> {
        self.methods
            .iter()
            .find(|method| &method.name == name && &method.descriptor == descriptor)
    }

    pub fn declared_field(
        &self,
        name: &UnqualifiedName,
        descriptor: &FieldType<BinaryName>,
    ) -> Option<&FieldDescription> {
        self.fields
            .iter()
            .find(|field| &field.name == name && &field.descriptor == descriptor)
    }

    /// Supertypes, superclass first
    pub fn super_types(&self) -> impl Iterator<Item = &BinaryName> + '_ {
        self.super_class.iter().chain(self.interfaces.iter())
    }
}

fn bad_descriptor(descriptor: &str, err: std::io::Error) -> jvm::Error {
    jvm::Error::BadDescriptor {
        descriptor: descriptor.to_owned(),
        message: err.to_string(),
    }
}
