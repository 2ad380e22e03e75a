//! Read (and write) JVM class files
//!
//! Only the parts of the class file format which matter for figuring out what a class links
//! against are decoded: the constant pool, the class hierarchy, declared members, and the
//! instructions in method bodies.
//!
//! ### Simple example
//!
//! Assembling a class file and reading back its hierarchy:
//!
//! ```
//! use linkguard::jvm::class_file::{ClassFile, ClassFileBuilder};
//! use linkguard::jvm::*;
//!
//! # fn generate_class() -> Result<(), Error> {
//! let name = BinaryName::from_dotted_or_internal("me.acme.Point").map_err(Error::BadName)?;
//! let mut builder = ClassFileBuilder::new(
//!     name.clone(),
//!     Some(BinaryName::OBJECT),
//!     ClassAccessFlags::PUBLIC,
//! );
//! builder.add_field(FieldAccessFlags::PUBLIC | FieldAccessFlags::FINAL, "x", "I")?;
//!
//! let class = ClassFile::parse(&builder.to_bytes()?)?;
//! assert_eq!(class.name()?, name);
//! assert_eq!(class.super_class_name()?, Some(BinaryName::OBJECT));
//! # Ok(())
//! # }
//! # generate_class().unwrap();
//! ```

mod access_flags;
pub mod bytecode;
pub mod class_file;
mod descriptors;
mod errors;
mod names;
mod version;

pub use access_flags::*;
pub use descriptors::*;
pub use errors::*;
pub use names::*;
pub use version::*;
