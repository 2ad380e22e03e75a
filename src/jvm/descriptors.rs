use super::{BinaryName, Name};
use std::io::{Error, ErrorKind, Result};

/// Types which have a descriptor string form (eg. `[Ljava/lang/String;` or `(IJ)V`)
pub trait RenderDescriptor {
    fn render(&self) -> String {
        let mut out = String::new();
        self.write_descriptor(&mut out);
        out
    }

    fn write_descriptor(&self, out: &mut String);
}

/// Types which can be read back from their descriptor form
pub trait ParseDescriptor: Sized {
    /// Parse a complete descriptor, rejecting leftover input
    fn parse(source: &str) -> Result<Self> {
        let mut cursor = DescriptorCursor::new(source);
        let parsed = Self::read(&mut cursor)?;
        if cursor.peek().is_some() {
            return Err(cursor.error(ErrorKind::InvalidInput, "leftover input"));
        }
        Ok(parsed)
    }

    /// Read one descriptor from the front of the cursor
    fn read(cursor: &mut DescriptorCursor<'_>) -> Result<Self>;
}

/// Position in a descriptor being parsed
pub struct DescriptorCursor<'a> {
    source: &'a str,
    position: usize,
}

impl<'a> DescriptorCursor<'a> {
    pub fn new(source: &'a str) -> DescriptorCursor<'a> {
        DescriptorCursor {
            source,
            position: 0,
        }
    }

    pub fn peek(&self) -> Option<char> {
        self.source[self.position..].chars().next()
    }

    pub fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    /// Consume `expected`, or fail
    fn expect(&mut self, expected: char) -> Result<()> {
        match self.next() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(self.error(
                ErrorKind::InvalidInput,
                &format!("expected '{}' but found '{}'", expected, c),
            )),
            None => Err(self.error(
                ErrorKind::UnexpectedEof,
                &format!("expected '{}'", expected),
            )),
        }
    }

    /// Consume everything up to (and including) `terminator`, returning what came before it
    fn take_until(&mut self, terminator: char) -> Result<&'a str> {
        let rest = &self.source[self.position..];
        match rest.find(terminator) {
            Some(end) => {
                self.position += end + terminator.len_utf8();
                Ok(&rest[..end])
            }
            None => Err(self.error(
                ErrorKind::UnexpectedEof,
                &format!("missing '{}'", terminator),
            )),
        }
    }

    fn error(&self, kind: ErrorKind, message: &str) -> Error {
        Error::new(
            kind,
            format!("{} at offset {} of '{}'", message, self.position, self.source),
        )
    }
}

/// Primitive types
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum BaseType {
    Byte,
    Char,
    Double,
    Float,
    Int,
    Long,
    Short,
    Boolean,
}

impl BaseType {
    const ALL: [(char, BaseType); 8] = [
        ('B', BaseType::Byte),
        ('C', BaseType::Char),
        ('D', BaseType::Double),
        ('F', BaseType::Float),
        ('I', BaseType::Int),
        ('J', BaseType::Long),
        ('S', BaseType::Short),
        ('Z', BaseType::Boolean),
    ];

    fn from_char(c: char) -> Option<BaseType> {
        BaseType::ALL
            .iter()
            .find(|(tag, _)| *tag == c)
            .map(|(_, base)| *base)
    }

    fn tag(self) -> char {
        BaseType::ALL
            .iter()
            .find(|(_, base)| *base == self)
            .map_or('V', |(tag, _)| *tag)
    }

    /// Does a value of this type take two local variable (or operand stack) slots?
    pub fn is_wide(self) -> bool {
        matches!(self, BaseType::Long | BaseType::Double)
    }
}

impl RenderDescriptor for BaseType {
    fn write_descriptor(&self, out: &mut String) {
        out.push(self.tag());
    }
}

impl ParseDescriptor for BaseType {
    fn read(cursor: &mut DescriptorCursor<'_>) -> Result<BaseType> {
        match cursor.next() {
            Some(c) => BaseType::from_char(c).ok_or_else(|| {
                cursor.error(ErrorKind::InvalidInput, &format!("'{}' is not a base type", c))
            }),
            None => Err(cursor.error(ErrorKind::UnexpectedEof, "missing base type")),
        }
    }
}

impl RenderDescriptor for BinaryName {
    fn write_descriptor(&self, out: &mut String) {
        out.push('L');
        out.push_str(self.as_str());
        out.push(';');
    }
}

impl ParseDescriptor for BinaryName {
    fn read(cursor: &mut DescriptorCursor<'_>) -> Result<BinaryName> {
        cursor.expect('L')?;
        let name = cursor.take_until(';')?;
        BinaryName::from_string(name.to_owned())
            .map_err(|message| cursor.error(ErrorKind::InvalidInput, &message))
    }
}

/// Type of a field, parameter, or return value
///
/// `Class` is the representation of class names (usually [`BinaryName`]).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum FieldType<Class> {
    Base(BaseType),
    Object(Class),

    /// Array with at least one dimension, whose element is never itself an array
    Array {
        dimensions: u8,
        element: Box<FieldType<Class>>,
    },
}

impl<C> FieldType<C> {
    pub const fn object(class_name: C) -> FieldType<C> {
        FieldType::Object(class_name)
    }

    pub const fn int() -> FieldType<C> {
        FieldType::Base(BaseType::Int)
    }

    pub const fn long() -> FieldType<C> {
        FieldType::Base(BaseType::Long)
    }

    pub const fn boolean() -> FieldType<C> {
        FieldType::Base(BaseType::Boolean)
    }

    /// Class at the bottom of the type, if there is one
    ///
    /// Arrays of objects reduce to their element class while primitive arrays have no class.
    pub fn underlying_class(&self) -> Option<&C> {
        match self {
            FieldType::Base(_) => None,
            FieldType::Object(class) => Some(class),
            FieldType::Array { element, .. } => element.underlying_class(),
        }
    }

    /// Number of local variable slots a value of this type occupies
    pub fn slot_width(&self) -> u16 {
        match self {
            FieldType::Base(base) if base.is_wide() => 2,
            _ => 1,
        }
    }
}

impl<C: RenderDescriptor> RenderDescriptor for FieldType<C> {
    fn write_descriptor(&self, out: &mut String) {
        match self {
            FieldType::Base(base) => base.write_descriptor(out),
            FieldType::Object(class) => class.write_descriptor(out),
            FieldType::Array {
                dimensions,
                element,
            } => {
                out.extend(std::iter::repeat('[').take(*dimensions as usize));
                element.write_descriptor(out);
            }
        }
    }
}

impl<C: ParseDescriptor> ParseDescriptor for FieldType<C> {
    fn read(cursor: &mut DescriptorCursor<'_>) -> Result<FieldType<C>> {
        let mut dimensions: u8 = 0;
        while cursor.peek() == Some('[') {
            cursor.next();
            dimensions = dimensions.checked_add(1).ok_or_else(|| {
                cursor.error(ErrorKind::InvalidInput, "more than 255 array dimensions")
            })?;
        }

        let element = match cursor.peek() {
            Some('L') => FieldType::Object(C::read(cursor)?),
            Some(_) => FieldType::Base(BaseType::read(cursor)?),
            None => return Err(cursor.error(ErrorKind::UnexpectedEof, "missing field type")),
        };
        if dimensions == 0 {
            Ok(element)
        } else {
            Ok(FieldType::Array {
                dimensions,
                element: Box::new(element),
            })
        }
    }
}

/// Parameter and return types of a method
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct MethodDescriptor<Class> {
    pub parameters: Vec<FieldType<Class>>,

    /// `None` for `void`
    pub return_type: Option<FieldType<Class>>,
}

impl<C> MethodDescriptor<C> {
    /// Classes mentioned in the parameters or return type (array types reduced to their element)
    pub fn referenced_classes(&self) -> impl Iterator<Item = &C> + '_ {
        self.parameters
            .iter()
            .chain(self.return_type.iter())
            .filter_map(FieldType::underlying_class)
    }

    /// Local variable slots taken up by the parameters (not counting `this`)
    pub fn parameter_slots(&self) -> u16 {
        self.parameters.iter().map(FieldType::slot_width).sum()
    }
}

impl<C: RenderDescriptor> RenderDescriptor for MethodDescriptor<C> {
    fn write_descriptor(&self, out: &mut String) {
        out.push('(');
        for parameter in &self.parameters {
            parameter.write_descriptor(out);
        }
        out.push(')');
        match &self.return_type {
            Some(return_type) => return_type.write_descriptor(out),
            None => out.push('V'),
        }
    }
}

impl<C: ParseDescriptor> ParseDescriptor for MethodDescriptor<C> {
    fn read(cursor: &mut DescriptorCursor<'_>) -> Result<MethodDescriptor<C>> {
        cursor.expect('(')?;
        let mut parameters = vec![];
        loop {
            match cursor.peek() {
                Some(')') => break,
                Some(_) => parameters.push(FieldType::read(cursor)?),
                None => return Err(cursor.error(ErrorKind::UnexpectedEof, "missing ')'")),
            }
        }
        cursor.expect(')')?;

        let return_type = if cursor.peek() == Some('V') {
            cursor.next();
            None
        } else {
            Some(FieldType::read(cursor)?)
        };
        Ok(MethodDescriptor {
            parameters,
            return_type,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    type Field = FieldType<BinaryName>;
    type Method = MethodDescriptor<BinaryName>;

    #[test]
    fn method_descriptors() {
        let source = "(I[[Ljava/lang/String;[JLjava/lang/Integer;D)Ljava/lang/Object;";
        let descriptor = Method::parse(source).unwrap();
        assert_eq!(descriptor.parameters.len(), 5);
        assert_eq!(descriptor.parameters[0], Field::int());
        assert_eq!(
            descriptor.parameters[1],
            FieldType::Array {
                dimensions: 2,
                element: Box::new(FieldType::object(BinaryName::STRING)),
            }
        );
        assert_eq!(descriptor.return_type, Some(FieldType::object(BinaryName::OBJECT)));
        assert_eq!(descriptor.parameter_slots(), 6);
        assert_eq!(descriptor.render(), source);

        let classes: Vec<&str> = descriptor
            .referenced_classes()
            .map(|class| class.as_str())
            .collect();
        assert_eq!(
            classes,
            vec!["java/lang/String", "java/lang/Integer", "java/lang/Object"]
        );

        let void = Method::parse("()V").unwrap();
        assert!(void.parameters.is_empty());
        assert_eq!(void.return_type, None);
    }

    #[test]
    fn malformed_descriptors() {
        assert!(Method::parse("(I").is_err());
        assert!(Method::parse("I)V").is_err());
        assert!(Method::parse("()").is_err());
        assert!(Field::parse("Ljava/lang/Object").is_err());
        assert!(Field::parse("Q").is_err());
        assert!(Field::parse("II").is_err());
        assert!(Field::parse("[").is_err());
        assert!(Field::parse("V").is_err());
    }

    #[test]
    fn primitive_arrays_have_no_class() {
        let typ = Field::parse("[[I").unwrap();
        assert_eq!(typ.underlying_class(), None);
        assert_eq!(typ.render(), "[[I");
        let typ = Field::parse("[Ljava/lang/Object;").unwrap();
        assert_eq!(typ.underlying_class(), Some(&BinaryName::OBJECT));
    }
}
