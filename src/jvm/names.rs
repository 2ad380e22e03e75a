use std::borrow::Cow;
use std::fmt;

/// Validated JVM names
///
/// Names are stored as `Cow<'static, str>` so that well-known names can be constants.
pub trait Name: Sized {
    /// Validate and wrap a name
    fn from_string(name: String) -> Result<Self, String>;

    fn as_str(&self) -> &str;
}

macro_rules! name_type {
    ($(#[$attr:meta])* $name:ident, $validate:path) => {
        $(#[$attr])*
        #[derive(Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
        pub struct $name(Cow<'static, str>);

        impl $name {
            pub(crate) const fn constant(value: &'static str) -> $name {
                $name(Cow::Borrowed(value))
            }
        }

        impl Name for $name {
            fn from_string(name: String) -> Result<$name, String> {
                $validate(&name)?;
                Ok($name(Cow::Owned(name)))
            }

            fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

name_type!(
    /// Name of a method or field
    ///
    /// See <https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.2.2>
    UnqualifiedName,
    validate_unqualified
);

name_type!(
    /// Name of a class or interface, in internal form (eg. `java/lang/Object`)
    ///
    /// See <https://docs.oracle.com/javase/specs/jvms/se16/html/jvms-4.html#jvms-4.2.1>
    BinaryName,
    validate_binary
);

fn validate_unqualified(name: &str) -> Result<(), String> {
    if name.is_empty() {
        Err(String::from("empty member name"))
    } else if let Some(bad) = name.chars().find(|c| matches!(c, '.' | ';' | '[' | '/')) {
        Err(format!("'{}' in member name '{}'", bad, name))
    } else {
        Ok(())
    }
}

fn validate_binary(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err(String::from("empty class name"));
    }
    for segment in name.split('/') {
        validate_unqualified(segment).map_err(|err| format!("{} (in class name '{}')", err, name))?;
    }
    Ok(())
}

impl fmt::Display for UnqualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Classes display in the dotted source form (eg. `java.lang.Object`)
impl fmt::Display for BinaryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dotted())
    }
}

impl UnqualifiedName {
    pub const INIT: UnqualifiedName = UnqualifiedName::constant("<init>");
    pub const CLINIT: UnqualifiedName = UnqualifiedName::constant("<clinit>");
}

impl BinaryName {
    pub const OBJECT: BinaryName = BinaryName::constant("java/lang/Object");
    pub const STRING: BinaryName = BinaryName::constant("java/lang/String");
    pub const CLASS: BinaryName = BinaryName::constant("java/lang/Class");
    pub const RUNNABLE: BinaryName = BinaryName::constant("java/lang/Runnable");

    /// Parse either the internal form (`a/b/C`) or the dotted form (`a.b.C`) of a class name
    pub fn from_dotted_or_internal(name: &str) -> Result<BinaryName, String> {
        BinaryName::from_string(name.replace('.', "/"))
    }

    /// Source form of the name (`a.b.C`)
    pub fn to_dotted(&self) -> String {
        self.0.replace('/', ".")
    }

    /// Runtime package of the class, without the trailing `/` (empty for the default package)
    pub fn package(&self) -> &str {
        self.0.rsplit_once('/').map_or("", |(package, _)| package)
    }

    pub fn same_package(&self, other: &BinaryName) -> bool {
        self.package() == other.package()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn validation() {
        assert!(BinaryName::from_string(String::from("a/b/C")).is_ok());
        assert!(BinaryName::from_string(String::from("a/b/C$Inner")).is_ok());
        assert!(BinaryName::from_string(String::from("")).is_err());
        assert!(BinaryName::from_string(String::from("a//C")).is_err());
        assert!(BinaryName::from_string(String::from("a/b;/C")).is_err());
        assert!(UnqualifiedName::from_string(String::from("field")).is_ok());
        assert!(UnqualifiedName::from_string(String::from("a.b")).is_err());
        assert_eq!(UnqualifiedName::INIT.as_str(), "<init>");
    }

    #[test]
    fn packages() {
        let name = BinaryName::from_dotted_or_internal("com.acme.http.Client").unwrap();
        assert_eq!(name.as_str(), "com/acme/http/Client");
        assert_eq!(name.package(), "com/acme/http");
        assert_eq!(name.to_dotted(), "com.acme.http.Client");
        assert_eq!(name.to_string(), "com.acme.http.Client");

        let default_package = BinaryName::from_string(String::from("Main")).unwrap();
        assert_eq!(default_package.package(), "");

        let sibling = BinaryName::from_string(String::from("com/acme/http/Request")).unwrap();
        assert!(name.same_package(&sibling));
        assert!(!name.same_package(&BinaryName::OBJECT));
    }
}
