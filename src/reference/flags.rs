use crate::jvm::{BinaryName, ClassAccessFlags, MemberAccess, Version};
use std::fmt;

/// Visibility, ordered from most restrictive to least restrictive
///
/// As a requirement, this is the _minimum_ visibility the referenced symbol must have.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Visibility {
    Private,
    Package,
    Protected,
    Public,
}

impl Visibility {
    /// Is a symbol with this visibility accessible where `required` is needed?
    pub fn satisfies(self, required: Visibility) -> bool {
        self >= required
    }

    pub fn of_class(access_flags: ClassAccessFlags) -> Visibility {
        if access_flags.contains(ClassAccessFlags::PUBLIC) {
            Visibility::Public
        } else {
            Visibility::Package
        }
    }

    pub fn of_member(access_flags: impl MemberAccess) -> Visibility {
        if access_flags.is_public() {
            Visibility::Public
        } else if access_flags.is_protected() {
            Visibility::Protected
        } else if access_flags.is_private() {
            Visibility::Private
        } else {
            Visibility::Package
        }
    }

    /// Least visibility a class needs for `from` to be able to use it
    pub fn required_for_class(from: &BinaryName, to: &BinaryName) -> Visibility {
        if from == to {
            Visibility::Private
        } else if from.same_package(to) {
            Visibility::Package
        } else {
            Visibility::Public
        }
    }

    /// Least visibility a member of `owner` needs for `from` to be able to use it
    ///
    /// Outside the package, `protected` is assumed to be enough since `from` could be a subclass.
    pub fn required_for_member(from: &BinaryName, owner: &BinaryName) -> Visibility {
        if from == owner {
            Visibility::Private
        } else if from.same_package(owner) {
            Visibility::Package
        } else {
            Visibility::Protected
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Visibility::Private => "private",
            Visibility::Package => "package-private",
            Visibility::Protected => "protected",
            Visibility::Public => "public",
        })
    }
}

/// Whether a member belongs to the class or to its instances
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Ownership {
    Static,
    Instance,
}

impl Ownership {
    pub fn of_member(access_flags: impl MemberAccess) -> Ownership {
        if access_flags.is_static() {
            Ownership::Static
        } else {
            Ownership::Instance
        }
    }
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Ownership::Static => "static",
            Ownership::Instance => "non-static",
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ClassKind {
    Class,
    Interface,
}

impl ClassKind {
    pub fn of_class(access_flags: ClassAccessFlags) -> ClassKind {
        if access_flags.contains(ClassAccessFlags::INTERFACE) {
            ClassKind::Interface
        } else {
            ClassKind::Class
        }
    }
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
        })
    }
}

/// Capabilities of a symbol
///
/// When attached to a reference these are what the referencing code needs. When coming from an
/// environment, they are what is actually there (in which case `min_version` is unused).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Flags {
    pub visibility: Visibility,

    /// Only meaningful for methods and fields
    pub ownership: Option<Ownership>,

    /// Only meaningful for classes
    pub kind: Option<ClassKind>,

    /// Class file version of the code which made the reference
    pub min_version: Option<Version>,
}

/// Two requirements on the same symbol which cannot both hold
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum FlagConflict {
    Ownership(Ownership, Ownership),
    Kind(ClassKind, ClassKind),
}

impl fmt::Display for FlagConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagConflict::Ownership(a, b) => write!(f, "required to be both {} and {}", a, b),
            FlagConflict::Kind(a, b) => write!(f, "required to be both a {} and an {}", a, b),
        }
    }
}

impl Flags {
    pub const fn new(visibility: Visibility) -> Flags {
        Flags {
            visibility,
            ownership: None,
            kind: None,
            min_version: None,
        }
    }

    pub fn with_ownership(self, ownership: Ownership) -> Flags {
        Flags {
            ownership: Some(ownership),
            ..self
        }
    }

    pub fn with_kind(self, kind: ClassKind) -> Flags {
        Flags {
            kind: Some(kind),
            ..self
        }
    }

    pub fn with_min_version(self, version: Version) -> Flags {
        Flags {
            min_version: Some(version),
            ..self
        }
    }

    /// Combine two requirements on the same symbol
    ///
    /// The combination demands everything either side demands: the higher minimum visibility
    /// and the higher minimum version. Requiring both ownerships (or both kinds) is a conflict.
    /// The result doesn't depend on the order of the arguments.
    pub fn merge(&self, other: &Flags) -> Result<Flags, FlagConflict> {
        let ownership = match (self.ownership, other.ownership) {
            (Some(a), Some(b)) if a != b => {
                return Err(FlagConflict::Ownership(a.min(b), a.max(b)));
            }
            (a, b) => a.or(b),
        };
        let kind = match (self.kind, other.kind) {
            (Some(a), Some(b)) if a != b => return Err(FlagConflict::Kind(a.min(b), a.max(b))),
            (a, b) => a.or(b),
        };
        Ok(Flags {
            visibility: self.visibility.max(other.visibility),
            ownership,
            kind,
            min_version: self.min_version.max(other.min_version),
        })
    }

    /// Do these (actual) flags fulfill the `required` ones?
    ///
    /// Versions are not compared here: they are checked against the runtime version of the
    /// environment instead.
    pub fn satisfies(&self, required: &Flags) -> bool {
        self.visibility.satisfies(required.visibility)
            && required.ownership.map_or(true, |o| self.ownership == Some(o))
            && required.kind.map_or(true, |k| self.kind == Some(k))
    }
}
