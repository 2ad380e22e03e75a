use std::fmt;

/// Version of the class file, which is used to verify that the JVM has the
/// necessary features to interpret the class
///
/// Versions order by major version first, then minor version.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Version {
    pub major_version: u16,
    pub minor_version: u16,
}

impl Version {
    /// JVM class file version corresponding to Java SE 8 (released March 2014)
    pub const JAVA8: Version = Version::major(52);

    /// JVM class file version corresponding to Java SE 11 (released September 2018)
    pub const JAVA11: Version = Version::major(55);

    /// JVM class file version corresponding to Java SE 17 (released September 2021)
    pub const JAVA17: Version = Version::major(61);

    /// Version with a minor version of 0
    pub const fn major(major_version: u16) -> Version {
        Version {
            major_version,
            minor_version: 0,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major_version, self.minor_version)
    }
}
