use crate::jvm::class_file::{
    Attribute, ConstantIndex, ConstantPool, Deserialize, Field, Method, Serialize,
};
use crate::jvm::{BinaryName, ClassAccessFlags, Error, Name, Version};
use byteorder::{ReadBytesExt, WriteBytesExt};

/// Representation of the [`class` file format of the JVM][0]
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html
#[derive(Debug, Clone, PartialEq)]
pub struct ClassFile {
    pub version: Version,
    pub constants: ConstantPool,
    pub access_flags: ClassAccessFlags,
    pub this_class: ConstantIndex,

    /// Zero for `java/lang/Object` (and `module-info`)
    pub super_class: ConstantIndex,
    pub interfaces: Vec<ConstantIndex>,
    pub fields: Vec<Field>,
    pub methods: Vec<Method>,
    pub attributes: Vec<Attribute>,
}

impl ClassFile {
    /// Magic header bytes that go at the front of the serialized class file
    const MAGIC: [u8; 4] = [0xCA, 0xFE, 0xBA, 0xBE];

    /// Parse a complete class file
    pub fn parse(mut bytes: &[u8]) -> Result<ClassFile, Error> {
        let class = ClassFile::deserialize(&mut bytes)?;
        if bytes.is_empty() {
            Ok(class)
        } else {
            Err(Error::TrailingBytes(bytes.len()))
        }
    }

    /// Serialize into a fresh buffer
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut bytes = vec![];
        self.serialize(&mut bytes)?;
        Ok(bytes)
    }

    pub fn is_interface(&self) -> bool {
        self.access_flags.contains(ClassAccessFlags::INTERFACE)
    }

    pub fn name(&self) -> Result<BinaryName, Error> {
        self.class_name_at(self.this_class)
    }

    pub fn super_class_name(&self) -> Result<Option<BinaryName>, Error> {
        if self.super_class.0 == 0 {
            Ok(None)
        } else {
            self.class_name_at(self.super_class).map(Some)
        }
    }

    pub fn interface_names(&self) -> Result<Vec<BinaryName>, Error> {
        self.interfaces
            .iter()
            .map(|idx| self.class_name_at(*idx))
            .collect()
    }

    fn class_name_at(&self, index: ConstantIndex) -> Result<BinaryName, Error> {
        let name = self.constants.get_class_name(index)?;
        BinaryName::from_string(name.to_owned()).map_err(Error::BadName)
    }
}

impl Serialize for ClassFile {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_all(&ClassFile::MAGIC)?;
        self.version.serialize(writer)?;
        self.constants.serialize(writer)?;
        self.access_flags.serialize(writer)?;
        self.this_class.serialize(writer)?;
        self.super_class.serialize(writer)?;
        self.interfaces.serialize(writer)?;
        self.fields.serialize(writer)?;
        self.methods.serialize(writer)?;
        self.attributes.serialize(writer)?;
        Ok(())
    }
}

impl Deserialize for ClassFile {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        let mut magic = [0; 4];
        reader.read_exact(&mut magic)?;
        if magic != ClassFile::MAGIC {
            return Err(Error::BadMagic(magic));
        }
        Ok(ClassFile {
            version: Version::deserialize(reader)?,
            constants: ConstantPool::deserialize(reader)?,
            access_flags: ClassAccessFlags::deserialize(reader)?,
            this_class: ConstantIndex::deserialize(reader)?,
            super_class: ConstantIndex::deserialize(reader)?,
            interfaces: Vec::deserialize(reader)?,
            fields: Vec::deserialize(reader)?,
            methods: Vec::deserialize(reader)?,
            attributes: Vec::deserialize(reader)?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bad_magic() {
        let bytes = [0xCA, 0xFE, 0xD0, 0x0D, 0, 0, 0, 52];
        assert!(matches!(
            ClassFile::parse(&bytes),
            Err(Error::BadMagic([0xCA, 0xFE, 0xD0, 0x0D]))
        ));
    }

    #[test]
    fn truncated() {
        let bytes = [0xCA, 0xFE, 0xBA, 0xBE, 0, 0];
        assert!(matches!(ClassFile::parse(&bytes), Err(Error::IoError(_))));
    }
}
