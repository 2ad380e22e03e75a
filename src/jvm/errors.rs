use std::fmt;

/// Ways reading (or writing) a class file can go wrong
#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),

    /// Class file did not start with `0xCAFEBABE`
    BadMagic([u8; 4]),

    /// Constant pool entry has a tag we don't know about
    UnknownConstantTag { tag: u8, index: u16 },

    /// Constant pool index is zero, out of range, or points at the second slot of a wide constant
    BadConstantIndex(u16),

    /// Constant pool entry exists, but is not of the expected sort
    WrongConstantKind { index: u16, expected: &'static str },

    /// Constant pool is full (only relevant when writing)
    ConstantPoolOverflow,

    BadDescriptor { descriptor: String, message: String },
    BadName(String),

    /// Method code contains an opcode not defined by the JVM specification
    UnknownOpcode { opcode: u8, offset: usize },

    /// Method code ends partway through an instruction
    TruncatedCode(usize),

    /// There is input left over after the class file (or an attribute) was parsed
    TrailingBytes(usize),

    /// A value is too large to be encoded
    Overflow(&'static str),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::IoError(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IoError(err) => write!(f, "I/O error: {}", err),
            Error::BadMagic(magic) => write!(f, "bad class file magic {:02X?}", magic),
            Error::UnknownConstantTag { tag, index } => {
                write!(f, "unknown constant tag {} at index {}", tag, index)
            }
            Error::BadConstantIndex(index) => write!(f, "bad constant pool index {}", index),
            Error::WrongConstantKind { index, expected } => {
                write!(f, "constant at index {} is not a {}", index, expected)
            }
            Error::ConstantPoolOverflow => f.write_str("constant pool overflow"),
            Error::BadDescriptor {
                descriptor,
                message,
            } => write!(f, "bad descriptor '{}': {}", descriptor, message),
            Error::BadName(message) => write!(f, "bad name: {}", message),
            Error::UnknownOpcode { opcode, offset } => {
                write!(f, "unknown opcode 0x{:02X} at offset {}", opcode, offset)
            }
            Error::TruncatedCode(offset) => write!(f, "code truncated at offset {}", offset),
            Error::TrailingBytes(count) => write!(f, "{} unexpected trailing bytes", count),
            Error::Overflow(what) => write!(f, "{} is too large to encode", what),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}
