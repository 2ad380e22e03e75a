use crate::jvm::{ClassAccessFlags, Error, FieldAccessFlags, MethodAccessFlags, Version};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

/// Binary encoding of class file structures
///
/// Sequences are prefixed by a `u16` count and constant tags are a single byte, which is
/// specific enough to the class file format that a dedicated pair of traits reads better
/// than a general serialization framework.
pub trait Serialize: Sized {
    /// Write into a binary output stream
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()>;
}

/// Inverse of [`Serialize`]
pub trait Deserialize: Sized {
    /// Read from a binary input stream
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error>;
}

/// Multi-byte integers in class files are big-endian
macro_rules! integer_format {
    ($($int:ty => $write:ident, $read:ident;)*) => {
        $(
            impl Serialize for $int {
                fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
                    writer.$write::<BigEndian>(*self)
                }
            }

            impl Deserialize for $int {
                fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
                    Ok(reader.$read::<BigEndian>()?)
                }
            }
        )*
    };
}

integer_format! {
    u16 => write_u16, read_u16;
    u32 => write_u32, read_u32;
}

impl Serialize for u8 {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u8(*self)
    }
}

impl Deserialize for u8 {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        Ok(reader.read_u8()?)
    }
}

/// Size in `u16` is the first thing serialized/deserialized
impl<A: Serialize> Serialize for Vec<A> {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        let len = u16::try_from(self.len()).map_err(|_| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "sequence too long")
        })?;
        len.serialize(writer)?;
        self.iter().try_for_each(|element| element.serialize(writer))
    }
}

impl<A: Deserialize> Deserialize for Vec<A> {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        let len = u16::deserialize(reader)?;
        (0..len).map(|_| A::deserialize(reader)).collect()
    }
}

/// Flags are written as their raw bits. Unknown bits read from a class file are dropped.
macro_rules! access_flags_format {
    ($($flags:ident),*) => {
        $(
            impl Serialize for $flags {
                fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
                    self.bits().serialize(writer)
                }
            }

            impl Deserialize for $flags {
                fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
                    Ok($flags::from_bits_truncate(u16::deserialize(reader)?))
                }
            }
        )*
    };
}

access_flags_format!(ClassAccessFlags, MethodAccessFlags, FieldAccessFlags);

/// Minor version comes first in the class file
impl Serialize for Version {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.minor_version.serialize(writer)?;
        self.major_version.serialize(writer)?;
        Ok(())
    }
}

impl Deserialize for Version {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        let minor_version = u16::deserialize(reader)?;
        let major_version = u16::deserialize(reader)?;
        Ok(Version {
            major_version,
            minor_version,
        })
    }
}
