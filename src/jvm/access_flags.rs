use bitflags::bitflags;

bitflags! {
    /// Class modifiers, see [table 4.1-B][0]
    ///
    /// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.1-200-E.1
    pub struct ClassAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const FINAL = 0x0010;
        const SUPER = 0x0020;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
    }

    /// Method modifiers, see [table 4.6-A][0]
    ///
    /// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.6-200-A.1
    pub struct MethodAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SYNCHRONIZED = 0x0020;
        const BRIDGE = 0x0040;
        const VARARGS = 0x0080;
        const NATIVE = 0x0100;
        const ABSTRACT = 0x0400;
        const SYNTHETIC = 0x1000;
    }

    /// Field modifiers, see [table 4.5-A][0]
    ///
    /// [0]: https://docs.oracle.com/javase/specs/jvms/se15/html/jvms-4.html#jvms-4.5-200-A.1
    pub struct FieldAccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const VOLATILE = 0x0040;
        const TRANSIENT = 0x0080;
        const SYNTHETIC = 0x1000;
    }
}

/// Visibility and static-ness of a method or field
pub trait MemberAccess: Copy {
    fn is_public(self) -> bool;
    fn is_protected(self) -> bool;
    fn is_private(self) -> bool;
    fn is_static(self) -> bool;
}

macro_rules! member_access {
    ($flags:ident) => {
        impl MemberAccess for $flags {
            fn is_public(self) -> bool {
                self.contains($flags::PUBLIC)
            }

            fn is_protected(self) -> bool {
                self.contains($flags::PROTECTED)
            }

            fn is_private(self) -> bool {
                self.contains($flags::PRIVATE)
            }

            fn is_static(self) -> bool {
                self.contains($flags::STATIC)
            }
        }
    };
}

member_access!(MethodAccessFlags);
member_access!(FieldAccessFlags);
