use crate::jvm::class_file::{ConstantIndex, ConstantPool, Deserialize, Serialize};
use crate::jvm::Error;
use byteorder::{ReadBytesExt, WriteBytesExt};

/// Attributes (used in classes, fields, methods, and even on some attributes)
///
/// Attributes are kept in their raw form and only the ones we care about get decoded, on demand
/// (see [`AttributeLike`]).
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.7
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name_index: ConstantIndex,
    pub info: Vec<u8>,
}

impl Attribute {
    /// Name of the attribute, looked up in the constant pool
    pub fn name<'a>(&self, constants: &'a ConstantPool) -> Result<&'a str, Error> {
        constants.get_utf8(self.name_index)
    }

    /// Find and decode the first attribute of a given type
    pub fn find<A: AttributeLike>(
        attributes: &[Attribute],
        constants: &ConstantPool,
    ) -> Result<Option<A>, Error> {
        for attribute in attributes {
            if attribute.name(constants)? == A::NAME {
                return A::decode(&attribute.info).map(Some);
            }
        }
        Ok(None)
    }
}

impl Serialize for Attribute {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.name_index.serialize(writer)?;

        // Attribute info length is 4 bytes
        let len = u32::try_from(self.info.len()).map_err(|_| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "attribute too long")
        })?;
        len.serialize(writer)?;
        writer.write_all(&self.info)?;

        Ok(())
    }
}

impl Deserialize for Attribute {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        let name_index = ConstantIndex::deserialize(reader)?;
        let len = u32::deserialize(reader)?;
        let mut info = vec![0; len as usize];
        reader.read_exact(&mut info)?;
        Ok(Attribute { name_index, info })
    }
}

/// Attributes are all stored in the same way (see `Attribute`), but internally
/// they represent very different things. This trait is implemented by the ones
/// we know how to decode.
pub trait AttributeLike: Serialize + Deserialize {
    /// Name of the attribute
    const NAME: &'static str;

    /// Decode the attribute from its raw info, requiring that all of the info is consumed
    fn decode(mut info: &[u8]) -> Result<Self, Error> {
        let decoded = Self::deserialize(&mut info)?;
        if info.is_empty() {
            Ok(decoded)
        } else {
            Err(Error::TrailingBytes(info.len()))
        }
    }

    /// Encode the attribute into its raw form
    fn encode(&self, constants: &mut super::ConstantsPool) -> Result<Attribute, Error> {
        let name_index = constants.get_utf8(Self::NAME)?;
        let mut info = vec![];
        self.serialize(&mut info)?;
        Ok(Attribute { name_index, info })
    }
}

/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.7.3
#[derive(Debug, Clone, PartialEq)]
pub struct Code {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code_array: Vec<u8>,
    pub exception_table: Vec<ExceptionHandler>,
    pub attributes: Vec<Attribute>,
}

impl Serialize for Code {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.max_stack.serialize(writer)?;
        self.max_locals.serialize(writer)?;
        let len = u32::try_from(self.code_array.len()).map_err(|_| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "code array too long")
        })?;
        len.serialize(writer)?;
        writer.write_all(&self.code_array)?;
        self.exception_table.serialize(writer)?;
        self.attributes.serialize(writer)?;
        Ok(())
    }
}

impl Deserialize for Code {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        let max_stack = u16::deserialize(reader)?;
        let max_locals = u16::deserialize(reader)?;
        let code_len = u32::deserialize(reader)?;
        let mut code_array = vec![0; code_len as usize];
        reader.read_exact(&mut code_array)?;
        Ok(Code {
            max_stack,
            max_locals,
            code_array,
            exception_table: Vec::deserialize(reader)?,
            attributes: Vec::deserialize(reader)?,
        })
    }
}

impl AttributeLike for Code {
    const NAME: &'static str = "Code";
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExceptionHandler {
    /// Start of exception handler range (inclusive)
    pub start_pc: u16,

    /// End of exception handler range (exclusive)
    pub end_pc: u16,

    /// Start of the exception handler
    pub handler_pc: u16,

    /// Class of exceptions caught (zero means any)
    pub catch_type: ConstantIndex,
}

impl Serialize for ExceptionHandler {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.start_pc.serialize(writer)?;
        self.end_pc.serialize(writer)?;
        self.handler_pc.serialize(writer)?;
        self.catch_type.serialize(writer)?;
        Ok(())
    }
}

impl Deserialize for ExceptionHandler {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        Ok(ExceptionHandler {
            start_pc: u16::deserialize(reader)?,
            end_pc: u16::deserialize(reader)?,
            handler_pc: u16::deserialize(reader)?,
            catch_type: ConstantIndex::deserialize(reader)?,
        })
    }
}

/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.7.12
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineNumberTable(pub Vec<LineNumber>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineNumber {
    /// Offset in the code array where the line starts
    pub start_pc: u16,
    pub line_number: u16,
}

impl LineNumberTable {
    /// Source line of the instruction at some offset in the code
    ///
    /// Entries need not be sorted, so this picks the closest entry starting at or before `pc`.
    pub fn line_at(&self, pc: usize) -> Option<u16> {
        self.0
            .iter()
            .filter(|entry| entry.start_pc as usize <= pc)
            .max_by_key(|entry| entry.start_pc)
            .map(|entry| entry.line_number)
    }
}

impl Serialize for LineNumberTable {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

impl Deserialize for LineNumberTable {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        Ok(LineNumberTable(Vec::deserialize(reader)?))
    }
}

impl AttributeLike for LineNumberTable {
    const NAME: &'static str = "LineNumberTable";
}

impl Serialize for LineNumber {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.start_pc.serialize(writer)?;
        self.line_number.serialize(writer)?;
        Ok(())
    }
}

impl Deserialize for LineNumber {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        Ok(LineNumber {
            start_pc: u16::deserialize(reader)?,
            line_number: u16::deserialize(reader)?,
        })
    }
}

/// Bootstrap methods referenced by `invokedynamic` instructions and dynamic constants
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.7.23
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BootstrapMethods(pub Vec<BootstrapMethod>);

#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapMethod {
    /// Method handle constant
    pub method: ConstantIndex,

    /// Static arguments passed to the bootstrap method
    pub arguments: Vec<ConstantIndex>,
}

impl Serialize for BootstrapMethods {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

impl Deserialize for BootstrapMethods {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        Ok(BootstrapMethods(Vec::deserialize(reader)?))
    }
}

impl AttributeLike for BootstrapMethods {
    const NAME: &'static str = "BootstrapMethods";
}

impl Serialize for BootstrapMethod {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.method.serialize(writer)?;
        self.arguments.serialize(writer)?;
        Ok(())
    }
}

impl Deserialize for BootstrapMethod {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        Ok(BootstrapMethod {
            method: ConstantIndex::deserialize(reader)?,
            arguments: Vec::deserialize(reader)?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn line_lookup() {
        let table = LineNumberTable(vec![
            LineNumber {
                start_pc: 4,
                line_number: 11,
            },
            LineNumber {
                start_pc: 0,
                line_number: 10,
            },
            LineNumber {
                start_pc: 9,
                line_number: 14,
            },
        ]);
        assert_eq!(table.line_at(0), Some(10));
        assert_eq!(table.line_at(3), Some(10));
        assert_eq!(table.line_at(4), Some(11));
        assert_eq!(table.line_at(100), Some(14));
        assert_eq!(LineNumberTable::default().line_at(0), None);
    }

    #[test]
    fn trailing_bytes_rejected() {
        let info: Vec<u8> = vec![0, 1, 0, 0, 0, 7, 0xFF];
        assert!(matches!(
            LineNumberTable::decode(&info),
            Err(Error::TrailingBytes(1))
        ));
        let table = LineNumberTable::decode(&info[..6]).unwrap();
        assert_eq!(table.line_at(0), Some(7));
    }
}
