use crate::jvm::class_file::{
    Attribute, Code, ConstantIndex, ConstantPool, Deserialize, Serialize,
};
use crate::jvm::{
    BinaryName, Error, FieldAccessFlags, FieldType, MethodAccessFlags, MethodDescriptor, Name,
    ParseDescriptor, UnqualifiedName,
};
use byteorder::{ReadBytesExt, WriteBytesExt};

/// Field declared by a class or interface
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.5
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub access_flags: FieldAccessFlags,
    pub name_index: ConstantIndex,
    pub descriptor_index: ConstantIndex,
    pub attributes: Vec<Attribute>,
}

/// Method declared by a class or interface
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.6
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub access_flags: MethodAccessFlags,
    pub name_index: ConstantIndex,
    pub descriptor_index: ConstantIndex,
    pub attributes: Vec<Attribute>,
}

fn member_name(constants: &ConstantPool, index: ConstantIndex) -> Result<UnqualifiedName, Error> {
    let name = constants.get_utf8(index)?;
    UnqualifiedName::from_string(name.to_owned()).map_err(Error::BadName)
}

fn bad_descriptor(descriptor: &str, err: std::io::Error) -> Error {
    Error::BadDescriptor {
        descriptor: descriptor.to_owned(),
        message: err.to_string(),
    }
}

impl Field {
    pub fn name(&self, constants: &ConstantPool) -> Result<UnqualifiedName, Error> {
        member_name(constants, self.name_index)
    }

    pub fn descriptor(&self, constants: &ConstantPool) -> Result<FieldType<BinaryName>, Error> {
        let descriptor = constants.get_utf8(self.descriptor_index)?;
        FieldType::parse(descriptor).map_err(|err| bad_descriptor(descriptor, err))
    }
}

impl Method {
    pub fn name(&self, constants: &ConstantPool) -> Result<UnqualifiedName, Error> {
        member_name(constants, self.name_index)
    }

    pub fn descriptor(
        &self,
        constants: &ConstantPool,
    ) -> Result<MethodDescriptor<BinaryName>, Error> {
        let descriptor = constants.get_utf8(self.descriptor_index)?;
        MethodDescriptor::parse(descriptor).map_err(|err| bad_descriptor(descriptor, err))
    }

    /// Decoded code attribute (abstract and native methods have none)
    pub fn code(&self, constants: &ConstantPool) -> Result<Option<Code>, Error> {
        Attribute::find(&self.attributes, constants)
    }
}

impl Serialize for Field {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.access_flags.serialize(writer)?;
        self.name_index.serialize(writer)?;
        self.descriptor_index.serialize(writer)?;
        self.attributes.serialize(writer)?;
        Ok(())
    }
}

impl Deserialize for Field {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        Ok(Field {
            access_flags: FieldAccessFlags::deserialize(reader)?,
            name_index: ConstantIndex::deserialize(reader)?,
            descriptor_index: ConstantIndex::deserialize(reader)?,
            attributes: Vec::deserialize(reader)?,
        })
    }
}

impl Serialize for Method {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.access_flags.serialize(writer)?;
        self.name_index.serialize(writer)?;
        self.descriptor_index.serialize(writer)?;
        self.attributes.serialize(writer)?;
        Ok(())
    }
}

impl Deserialize for Method {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        Ok(Method {
            access_flags: MethodAccessFlags::deserialize(reader)?,
            name_index: ConstantIndex::deserialize(reader)?,
            descriptor_index: ConstantIndex::deserialize(reader)?,
            attributes: Vec::deserialize(reader)?,
        })
    }
}

