use crate::jvm::class_file::{Deserialize, Serialize};
use crate::jvm::{BinaryName, Error, Name};
use crate::util::{Offset, OffsetVec, Width};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::collections::HashMap;

/// Index into the constant pool
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct ConstantIndex(pub u16);

impl Serialize for ConstantIndex {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        self.0.serialize(writer)
    }
}

impl Deserialize for ConstantIndex {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        Ok(ConstantIndex(u16::deserialize(reader)?))
    }
}

/// Constants as in the constant pool
///
/// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.4
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// Class or an interface (the name may be an array descriptor)
    Class(ConstantIndex),

    /// Field
    FieldRef {
        class: ConstantIndex,
        name_and_type: ConstantIndex,
    },

    /// Method (this combines `Methodref` and `InterfaceMethodref`)
    MethodRef {
        class: ConstantIndex,
        name_and_type: ConstantIndex,
        is_interface: bool,
    },

    /// Constant object of type `java.lang.String`
    String(ConstantIndex),

    Integer(i32),
    Float(f32),
    Long(i64),
    Double(f64),

    /// Name and a type (eg. for a field or a method)
    NameAndType {
        name: ConstantIndex,
        descriptor: ConstantIndex,
    },

    /// Constant UTF-8 encoded raw string value
    ///
    /// Despite the name, the encoding is not quite UTF-8 (the encoding of the
    /// null character `\u{0000}` and the encoding of supplementary characters
    /// is different).
    Utf8(String),

    /// Constant object of type `java.lang.invoke.MethodHandle`
    MethodHandle { reference_kind: u8, member: ConstantIndex },

    MethodType { descriptor: ConstantIndex },

    /// Dynamically-computed constant
    Dynamic {
        bootstrap_method: u16,
        name_and_type: ConstantIndex,
    },

    /// Dynamically-computed call site
    InvokeDynamic {
        bootstrap_method: u16,
        name_and_type: ConstantIndex,
    },

    Module(ConstantIndex),
    Package(ConstantIndex),
}

/// `long` and `double` constants take two slots in the pool
impl Width for Constant {
    fn width(&self) -> usize {
        match self {
            Constant::Long(_) | Constant::Double(_) => 2,
            _ => 1,
        }
    }
}

impl Serialize for Constant {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            Constant::Utf8(string) => {
                1u8.serialize(writer)?;
                let buffer: Vec<u8> = encode_modified_utf8(string);
                let len = u16::try_from(buffer.len()).map_err(|_| {
                    std::io::Error::new(std::io::ErrorKind::InvalidInput, "UTF-8 constant too long")
                })?;
                len.serialize(writer)?;
                writer.write_all(&buffer)?;
            }
            Constant::Integer(integer) => {
                3u8.serialize(writer)?;
                writer.write_i32::<BigEndian>(*integer)?;
            }
            Constant::Float(float) => {
                4u8.serialize(writer)?;
                writer.write_f32::<BigEndian>(*float)?;
            }
            Constant::Long(long) => {
                5u8.serialize(writer)?;
                writer.write_i64::<BigEndian>(*long)?;
            }
            Constant::Double(double) => {
                6u8.serialize(writer)?;
                writer.write_f64::<BigEndian>(*double)?;
            }
            Constant::Class(name) => {
                7u8.serialize(writer)?;
                name.serialize(writer)?;
            }
            Constant::String(utf8) => {
                8u8.serialize(writer)?;
                utf8.serialize(writer)?;
            }
            Constant::FieldRef {
                class,
                name_and_type,
            } => {
                9u8.serialize(writer)?;
                class.serialize(writer)?;
                name_and_type.serialize(writer)?;
            }
            Constant::MethodRef {
                class,
                name_and_type,
                is_interface,
            } => {
                (if !is_interface { 10u8 } else { 11u8 }).serialize(writer)?;
                class.serialize(writer)?;
                name_and_type.serialize(writer)?;
            }
            Constant::NameAndType { name, descriptor } => {
                12u8.serialize(writer)?;
                name.serialize(writer)?;
                descriptor.serialize(writer)?;
            }
            Constant::MethodHandle {
                reference_kind,
                member,
            } => {
                15u8.serialize(writer)?;
                reference_kind.serialize(writer)?;
                member.serialize(writer)?;
            }
            Constant::MethodType { descriptor } => {
                16u8.serialize(writer)?;
                descriptor.serialize(writer)?;
            }
            Constant::Dynamic {
                bootstrap_method,
                name_and_type,
            } => {
                17u8.serialize(writer)?;
                bootstrap_method.serialize(writer)?;
                name_and_type.serialize(writer)?;
            }
            Constant::InvokeDynamic {
                bootstrap_method,
                name_and_type,
            } => {
                18u8.serialize(writer)?;
                bootstrap_method.serialize(writer)?;
                name_and_type.serialize(writer)?;
            }
            Constant::Module(name) => {
                19u8.serialize(writer)?;
                name.serialize(writer)?;
            }
            Constant::Package(name) => {
                20u8.serialize(writer)?;
                name.serialize(writer)?;
            }
        }
        Ok(())
    }
}

impl Constant {
    /// Read one constant, given the pool index at which it is being read (for error reporting)
    fn deserialize_at<R: ReadBytesExt>(reader: &mut R, index: u16) -> Result<Constant, Error> {
        let tag = u8::deserialize(reader)?;
        let constant = match tag {
            1 => {
                let len = u16::deserialize(reader)?;
                let mut buffer = vec![0; len as usize];
                reader.read_exact(&mut buffer)?;
                Constant::Utf8(decode_modified_utf8(&buffer))
            }
            3 => Constant::Integer(reader.read_i32::<BigEndian>()?),
            4 => Constant::Float(reader.read_f32::<BigEndian>()?),
            5 => Constant::Long(reader.read_i64::<BigEndian>()?),
            6 => Constant::Double(reader.read_f64::<BigEndian>()?),
            7 => Constant::Class(ConstantIndex::deserialize(reader)?),
            8 => Constant::String(ConstantIndex::deserialize(reader)?),
            9 => Constant::FieldRef {
                class: ConstantIndex::deserialize(reader)?,
                name_and_type: ConstantIndex::deserialize(reader)?,
            },
            10 | 11 => Constant::MethodRef {
                class: ConstantIndex::deserialize(reader)?,
                name_and_type: ConstantIndex::deserialize(reader)?,
                is_interface: tag == 11,
            },
            12 => Constant::NameAndType {
                name: ConstantIndex::deserialize(reader)?,
                descriptor: ConstantIndex::deserialize(reader)?,
            },
            15 => Constant::MethodHandle {
                reference_kind: u8::deserialize(reader)?,
                member: ConstantIndex::deserialize(reader)?,
            },
            16 => Constant::MethodType {
                descriptor: ConstantIndex::deserialize(reader)?,
            },
            17 => Constant::Dynamic {
                bootstrap_method: u16::deserialize(reader)?,
                name_and_type: ConstantIndex::deserialize(reader)?,
            },
            18 => Constant::InvokeDynamic {
                bootstrap_method: u16::deserialize(reader)?,
                name_and_type: ConstantIndex::deserialize(reader)?,
            },
            19 => Constant::Module(ConstantIndex::deserialize(reader)?),
            20 => Constant::Package(ConstantIndex::deserialize(reader)?),
            _ => return Err(Error::UnknownConstantTag { tag, index }),
        };
        Ok(constant)
    }
}

/// Field or method referenced from the constant pool, with all indirections resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberRef<'a> {
    /// Owner class (or array descriptor, for methods like `clone` on arrays)
    pub class: &'a str,
    pub name: &'a str,
    pub descriptor: &'a str,

    /// Only ever true for `InterfaceMethodref`
    pub is_interface: bool,
}

/// Constant pool of a class file
///
/// Indexing starts at 1 and `long`/`double` entries take up two indices.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantPool(OffsetVec<Constant>);

impl ConstantPool {
    pub fn new() -> ConstantPool {
        ConstantPool(OffsetVec::new_starting_at(Offset(1)))
    }

    /// Number of constants in the pool
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConstantIndex, &Constant)> + '_ {
        self.0
            .iter()
            .map(|(offset, constant)| (ConstantIndex(offset.0 as u16), constant))
    }

    pub fn get(&self, index: ConstantIndex) -> Result<&Constant, Error> {
        self.0
            .get_offset(Offset(index.0 as usize))
            .ok_or(Error::BadConstantIndex(index.0))
    }

    pub fn get_utf8(&self, index: ConstantIndex) -> Result<&str, Error> {
        match self.get(index)? {
            Constant::Utf8(string) => Ok(string),
            _ => Err(Error::WrongConstantKind {
                index: index.0,
                expected: "Utf8",
            }),
        }
    }

    /// Raw name of a class constant (either a binary name, or an array descriptor)
    pub fn get_class_name(&self, index: ConstantIndex) -> Result<&str, Error> {
        match self.get(index)? {
            Constant::Class(name) => self.get_utf8(*name),
            _ => Err(Error::WrongConstantKind {
                index: index.0,
                expected: "Class",
            }),
        }
    }

    pub fn get_name_and_type(&self, index: ConstantIndex) -> Result<(&str, &str), Error> {
        match self.get(index)? {
            Constant::NameAndType { name, descriptor } => {
                Ok((self.get_utf8(*name)?, self.get_utf8(*descriptor)?))
            }
            _ => Err(Error::WrongConstantKind {
                index: index.0,
                expected: "NameAndType",
            }),
        }
    }

    pub fn get_field_ref(&self, index: ConstantIndex) -> Result<MemberRef<'_>, Error> {
        match self.get(index)? {
            Constant::FieldRef {
                class,
                name_and_type,
            } => {
                let (name, descriptor) = self.get_name_and_type(*name_and_type)?;
                Ok(MemberRef {
                    class: self.get_class_name(*class)?,
                    name,
                    descriptor,
                    is_interface: false,
                })
            }
            _ => Err(Error::WrongConstantKind {
                index: index.0,
                expected: "Fieldref",
            }),
        }
    }

    pub fn get_method_ref(&self, index: ConstantIndex) -> Result<MemberRef<'_>, Error> {
        match self.get(index)? {
            Constant::MethodRef {
                class,
                name_and_type,
                is_interface,
            } => {
                let (name, descriptor) = self.get_name_and_type(*name_and_type)?;
                Ok(MemberRef {
                    class: self.get_class_name(*class)?,
                    name,
                    descriptor,
                    is_interface: *is_interface,
                })
            }
            _ => Err(Error::WrongConstantKind {
                index: index.0,
                expected: "Methodref",
            }),
        }
    }

    /// Method handle, as its reference kind (1 to 9) and the field or method it points at
    pub fn get_method_handle(&self, index: ConstantIndex) -> Result<(u8, MemberRef<'_>), Error> {
        match self.get(index)? {
            Constant::MethodHandle {
                reference_kind,
                member,
            } => {
                let member = match reference_kind {
                    1..=4 => self.get_field_ref(*member)?,
                    _ => self.get_method_ref(*member)?,
                };
                Ok((*reference_kind, member))
            }
            _ => Err(Error::WrongConstantKind {
                index: index.0,
                expected: "MethodHandle",
            }),
        }
    }

    /// Add a constant, provided there is space for it
    ///
    /// Note: the largest valid index is 65535, indexing starts at 1, and some constants take two
    /// spaces.
    fn push_constant(&mut self, constant: Constant) -> Result<ConstantIndex, Error> {
        let offset = self.0.offset_len().0;
        if offset + constant.width() > u16::MAX as usize {
            return Err(Error::ConstantPoolOverflow);
        }
        self.0.push(constant);
        Ok(ConstantIndex(offset as u16))
    }
}

impl Default for ConstantPool {
    fn default() -> Self {
        ConstantPool::new()
    }
}

/// The count written first is one more than the largest index
impl Serialize for ConstantPool {
    fn serialize<W: WriteBytesExt>(&self, writer: &mut W) -> std::io::Result<()> {
        (self.0.offset_len().0 as u16).serialize(writer)?;
        for (_, constant) in self.0.iter() {
            constant.serialize(writer)?;
        }
        Ok(())
    }
}

impl Deserialize for ConstantPool {
    fn deserialize<R: ReadBytesExt>(reader: &mut R) -> Result<Self, Error> {
        let count = u16::deserialize(reader)?;
        let mut pool = ConstantPool::new();
        while pool.0.offset_len().0 < count as usize {
            let index = pool.0.offset_len().0 as u16;
            let constant = Constant::deserialize_at(reader, index)?;
            pool.0.push(constant);
        }
        Ok(pool)
    }
}

/// Class file constants pool builder
///
/// The pool is append only and deduplicates entries, so asking twice for the same class or member
/// returns the same index.
pub struct ConstantsPool {
    constants: ConstantPool,

    utf8s: HashMap<String, ConstantIndex>,
    classes: HashMap<ConstantIndex, ConstantIndex>,
    strings: HashMap<ConstantIndex, ConstantIndex>,
    integers: HashMap<i32, ConstantIndex>,
    name_and_types: HashMap<(ConstantIndex, ConstantIndex), ConstantIndex>,
    fieldrefs: HashMap<(ConstantIndex, ConstantIndex), ConstantIndex>,
    methodrefs: HashMap<(ConstantIndex, ConstantIndex, bool), ConstantIndex>,
}

impl ConstantsPool {
    /// Make a fresh empty constants pool
    pub fn new() -> ConstantsPool {
        ConstantsPool {
            constants: ConstantPool::new(),
            utf8s: HashMap::new(),
            classes: HashMap::new(),
            strings: HashMap::new(),
            integers: HashMap::new(),
            name_and_types: HashMap::new(),
            fieldrefs: HashMap::new(),
            methodrefs: HashMap::new(),
        }
    }

    /// Consume the builder and return the final pool
    pub fn into_pool(self) -> ConstantPool {
        self.constants
    }

    /// Get or insert a utf8 constant
    pub fn get_utf8(&mut self, utf8: &str) -> Result<ConstantIndex, Error> {
        if let Some(idx) = self.utf8s.get(utf8) {
            return Ok(*idx);
        }
        let idx = self
            .constants
            .push_constant(Constant::Utf8(utf8.to_owned()))?;
        self.utf8s.insert(utf8.to_owned(), idx);
        Ok(idx)
    }

    /// Get or insert a class constant from its raw name (binary name or array descriptor)
    pub fn get_class_raw(&mut self, name: &str) -> Result<ConstantIndex, Error> {
        let utf8 = self.get_utf8(name)?;
        if let Some(idx) = self.classes.get(&utf8) {
            return Ok(*idx);
        }
        let idx = self.constants.push_constant(Constant::Class(utf8))?;
        self.classes.insert(utf8, idx);
        Ok(idx)
    }

    /// Get or insert a class constant
    pub fn get_class(&mut self, name: &BinaryName) -> Result<ConstantIndex, Error> {
        self.get_class_raw(name.as_str())
    }

    /// Get or insert a string constant
    pub fn get_string(&mut self, string: &str) -> Result<ConstantIndex, Error> {
        let utf8 = self.get_utf8(string)?;
        if let Some(idx) = self.strings.get(&utf8) {
            return Ok(*idx);
        }
        let idx = self.constants.push_constant(Constant::String(utf8))?;
        self.strings.insert(utf8, idx);
        Ok(idx)
    }

    /// Get or insert an integer constant
    pub fn get_integer(&mut self, integer: i32) -> Result<ConstantIndex, Error> {
        if let Some(idx) = self.integers.get(&integer) {
            return Ok(*idx);
        }
        let idx = self.constants.push_constant(Constant::Integer(integer))?;
        self.integers.insert(integer, idx);
        Ok(idx)
    }

    /// Add a long constant (these are not deduplicated)
    pub fn add_long(&mut self, long: i64) -> Result<ConstantIndex, Error> {
        self.constants.push_constant(Constant::Long(long))
    }

    /// Add a method handle constant (these are not deduplicated)
    pub fn add_method_handle(
        &mut self,
        reference_kind: u8,
        member: ConstantIndex,
    ) -> Result<ConstantIndex, Error> {
        self.constants.push_constant(Constant::MethodHandle {
            reference_kind,
            member,
        })
    }

    /// Add a dynamically-computed call site (these are not deduplicated)
    pub fn add_invoke_dynamic(
        &mut self,
        bootstrap_method: u16,
        name: &str,
        descriptor: &str,
    ) -> Result<ConstantIndex, Error> {
        let name_and_type = self.get_name_and_type(name, descriptor)?;
        self.constants.push_constant(Constant::InvokeDynamic {
            bootstrap_method,
            name_and_type,
        })
    }

    /// Get or insert a name & type constant
    pub fn get_name_and_type(
        &mut self,
        name: &str,
        descriptor: &str,
    ) -> Result<ConstantIndex, Error> {
        let key = (self.get_utf8(name)?, self.get_utf8(descriptor)?);
        if let Some(idx) = self.name_and_types.get(&key) {
            return Ok(*idx);
        }
        let idx = self.constants.push_constant(Constant::NameAndType {
            name: key.0,
            descriptor: key.1,
        })?;
        self.name_and_types.insert(key, idx);
        Ok(idx)
    }

    /// Get or insert a field reference
    pub fn get_field_ref(
        &mut self,
        class: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<ConstantIndex, Error> {
        let key = (
            self.get_class_raw(class)?,
            self.get_name_and_type(name, descriptor)?,
        );
        if let Some(idx) = self.fieldrefs.get(&key) {
            return Ok(*idx);
        }
        let idx = self.constants.push_constant(Constant::FieldRef {
            class: key.0,
            name_and_type: key.1,
        })?;
        self.fieldrefs.insert(key, idx);
        Ok(idx)
    }

    /// Get or insert a method reference (`is_interface` selects `InterfaceMethodref`)
    pub fn get_method_ref(
        &mut self,
        class: &str,
        name: &str,
        descriptor: &str,
        is_interface: bool,
    ) -> Result<ConstantIndex, Error> {
        let key = (
            self.get_class_raw(class)?,
            self.get_name_and_type(name, descriptor)?,
            is_interface,
        );
        if let Some(idx) = self.methodrefs.get(&key) {
            return Ok(*idx);
        }
        let idx = self.constants.push_constant(Constant::MethodRef {
            class: key.0,
            name_and_type: key.1,
            is_interface,
        })?;
        self.methodrefs.insert(key, idx);
        Ok(idx)
    }
}

impl Default for ConstantsPool {
    fn default() -> Self {
        ConstantsPool::new()
    }
}

/// Encode a string into modified UTF-8
///
/// See <https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.4.7>
pub fn encode_modified_utf8(string: &str) -> Vec<u8> {
    let mut buffer: Vec<u8> = vec![];
    for c in string.chars() {
        // Handle the exception for how `\u{0000}` is represented
        let len: usize = if c == '\u{0000}' { 2 } else { c.len_utf8() };
        let code: u32 = c as u32;

        match len {
            1 => buffer.push(code as u8),
            2 => {
                buffer.push((code >> 6 & 0x1F) as u8 | 0b1100_0000);
                buffer.push((code & 0x3F) as u8 | 0b1000_0000);
            }
            3 => {
                buffer.push((code >> 12 & 0x0F) as u8 | 0b1110_0000);
                buffer.push((code >> 6 & 0x3F) as u8 | 0b1000_0000);
                buffer.push((code & 0x3F) as u8 | 0b1000_0000);
            }

            // Supplementary characters: main divergence from unicode
            _ => {
                buffer.push(0b1110_1101);
                buffer.push(((code >> 16 & 0x0F) as u8).wrapping_sub(1) & 0x0F | 0b1010_0000);
                buffer.push((code >> 10 & 0x3F) as u8 | 0b1000_0000);

                buffer.push(0b1110_1101);
                buffer.push(((code >> 6 & 0x0F) as u8) | 0b1011_0000);
                buffer.push((code & 0x3F) as u8 | 0b1000_0000);
            }
        }
    }
    buffer
}

/// Decode modified UTF-8
///
/// Every one, two, or three byte group encodes one UTF-16 code unit (supplementary characters
/// show up as surrogate pairs). Malformed groups and unpaired surrogates decode to U+FFFD.
pub fn decode_modified_utf8(bytes: &[u8]) -> String {
    let mut units: Vec<u16> = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        let b0 = bytes[idx] as u16;
        let continuation = |offset: usize| -> Option<u16> {
            bytes
                .get(idx + offset)
                .filter(|b| *b & 0b1100_0000 == 0b1000_0000)
                .map(|b| (*b & 0x3F) as u16)
        };
        if b0 & 0x80 == 0 {
            units.push(b0);
            idx += 1;
        } else if b0 & 0b1110_0000 == 0b1100_0000 {
            match continuation(1) {
                Some(b1) => {
                    units.push((b0 & 0x1F) << 6 | b1);
                    idx += 2;
                }
                None => {
                    units.push(0xFFFD);
                    idx += 1;
                }
            }
        } else if b0 & 0b1111_0000 == 0b1110_0000 {
            match (continuation(1), continuation(2)) {
                (Some(b1), Some(b2)) => {
                    units.push((b0 & 0x0F) << 12 | b1 << 6 | b2);
                    idx += 3;
                }
                _ => {
                    units.push(0xFFFD);
                    idx += 1;
                }
            }
        } else {
            units.push(0xFFFD);
            idx += 1;
        }
    }
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn modified_utf8() {
        assert_eq!(encode_modified_utf8("a\x00a"), vec![97, 192, 128, 97]);
        for string in ["hello", "a\x00a", "\u{00e9}t\u{00e9}", "\u{2603}", "\u{1F600}!"] {
            assert_eq!(decode_modified_utf8(&encode_modified_utf8(string)), string);
        }
        assert_eq!(decode_modified_utf8(&[0xC0]), "\u{FFFD}");
    }

    #[test]
    fn builder_deduplicates() {
        let mut pool = ConstantsPool::new();
        let first = pool
            .get_method_ref("a/B", "run", "()V", false)
            .unwrap();
        let second = pool
            .get_method_ref("a/B", "run", "()V", false)
            .unwrap();
        let interface = pool.get_method_ref("a/B", "run", "()V", true).unwrap();
        assert_eq!(first, second);
        assert_ne!(first, interface);

        let long = pool.add_long(7).unwrap();
        let after_long = pool.get_utf8("after").unwrap();
        assert_eq!(after_long.0, long.0 + 2);

        let pool = pool.into_pool();
        let method = pool.get_method_ref(first).unwrap();
        assert_eq!(method.class, "a/B");
        assert_eq!(method.name, "run");
        assert_eq!(method.descriptor, "()V");
        assert!(!method.is_interface);
        assert!(pool.get_method_ref(interface).unwrap().is_interface);

        assert!(matches!(
            pool.get(ConstantIndex(long.0 + 1)),
            Err(Error::BadConstantIndex(_))
        ));
        assert!(matches!(
            pool.get_utf8(first),
            Err(Error::WrongConstantKind { .. })
        ));
    }

    #[test]
    fn pool_round_trip() {
        let mut builder = ConstantsPool::new();
        builder.get_class(&BinaryName::OBJECT).unwrap();
        builder.add_long(-1).unwrap();
        builder.get_field_ref("a/B", "count", "I").unwrap();
        let pool = builder.into_pool();

        let mut bytes = vec![];
        pool.serialize(&mut bytes).unwrap();
        let reread = ConstantPool::deserialize(&mut bytes.as_slice()).unwrap();
        assert_eq!(pool, reread);
    }

    #[test]
    fn unknown_tag() {
        let bytes: Vec<u8> = vec![0, 2, 42];
        assert!(matches!(
            ConstantPool::deserialize(&mut bytes.as_slice()),
            Err(Error::UnknownConstantTag { tag: 42, index: 1 })
        ));
    }
}
