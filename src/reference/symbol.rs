use crate::jvm::{BinaryName, FieldType, MethodDescriptor, RenderDescriptor, UnqualifiedName};
use std::fmt;

/// Class, field, or method that some code links against
///
/// Symbols order by variant first (classes, then fields, then methods) and then by owner, which
/// is the order in which mismatches get reported.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Symbol {
    Class(BinaryName),
    Field {
        owner: BinaryName,
        name: UnqualifiedName,
        descriptor: FieldType<BinaryName>,
    },
    Method {
        owner: BinaryName,
        name: UnqualifiedName,
        descriptor: MethodDescriptor<BinaryName>,
    },
}

impl Symbol {
    /// Class on which the symbol is found (classes are their own owner)
    pub fn owner(&self) -> &BinaryName {
        match self {
            Symbol::Class(name) => name,
            Symbol::Field { owner, .. } | Symbol::Method { owner, .. } => owner,
        }
    }

    pub fn is_class(&self) -> bool {
        matches!(self, Symbol::Class(_))
    }
}

/// Classes display in dotted form, members as `owner#name` followed by their descriptor
impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Class(name) => write!(f, "{}", name),
            Symbol::Field {
                owner,
                name,
                descriptor,
            } => write!(f, "{}#{}:{}", owner, name, descriptor.render()),
            Symbol::Method {
                owner,
                name,
                descriptor,
            } => write!(f, "{}#{}{}", owner, name, descriptor.render()),
        }
    }
}

/// Location in a module from which a symbol is referenced
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Source {
    pub class: BinaryName,

    /// Only known when the class was compiled with line numbers
    pub line: Option<u16>,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.class, line),
            None => write!(f, "{}", self.class),
        }
    }
}
