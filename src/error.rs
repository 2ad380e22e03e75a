use std::fmt;
use std::io;
use std::path::PathBuf;

/// Ways the command line tool can fail (as opposed to a module being incompatible)
#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    Walk(walkdir::Error),
    MissingArgument(&'static str),

    /// Class file whose path doesn't correspond to a valid class name
    BadClassPath(PathBuf),
    BadClassName(String),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Error {
        Error::Walk(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "{}", err),
            Error::Walk(err) => write!(f, "{}", err),
            Error::MissingArgument(argument) => write!(f, "missing argument `{}`", argument),
            Error::BadClassPath(path) => {
                write!(f, "{} is not the path of a class file", path.display())
            }
            Error::BadClassName(name) => write!(f, "invalid class name {}", name),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Walk(err) => Some(err),
            _ => None,
        }
    }
}
