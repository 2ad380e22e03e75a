use crate::jvm::{BinaryName, Version};
use crate::reference::{ClassKind, Ownership, Source, Symbol, Visibility};
use std::collections::BTreeSet;
use std::fmt;

/// Outcome of matching a module against an environment
///
/// Anything other than `Compatible` means the module must not be applied.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Verdict {
    Compatible,
    Incompatible(Vec<Mismatch>),
}

impl Verdict {
    /// Compatible exactly when there are no mismatches
    pub fn from_mismatches(mismatches: Vec<Mismatch>) -> Verdict {
        if mismatches.is_empty() {
            Verdict::Compatible
        } else {
            Verdict::Incompatible(mismatches)
        }
    }

    /// Incompatible because of one problem unrelated to any symbol
    pub fn failed(reason: MismatchReason) -> Verdict {
        Verdict::Incompatible(vec![Mismatch {
            symbol: None,
            reason,
            sources: BTreeSet::new(),
        }])
    }

    pub fn is_compatible(&self) -> bool {
        matches!(self, Verdict::Compatible)
    }

    pub fn mismatches(&self) -> &[Mismatch] {
        match self {
            Verdict::Compatible => &[],
            Verdict::Incompatible(mismatches) => mismatches,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Compatible => f.write_str("compatible"),
            Verdict::Incompatible(mismatches) => {
                write!(f, "incompatible ({} mismatches)", mismatches.len())?;
                for mismatch in mismatches {
                    write!(f, "\n  {}", mismatch)?;
                }
                Ok(())
            }
        }
    }
}

/// One reason a module doesn't fit an environment
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Mismatch {
    /// Offending symbol (absent when the whole module is at fault)
    pub symbol: Option<Symbol>,
    pub reason: MismatchReason,

    /// Where in the module the symbol is used
    pub sources: BTreeSet<Source>,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = self.sources.iter().next() {
            write!(f, "{} ", source)?;
            if self.sources.len() > 1 {
                write!(f, "(and {} more) ", self.sources.len() - 1)?;
            }
        }
        match &self.symbol {
            Some(symbol) => write!(f, "{}: {}", symbol, self.reason),
            None => write!(f, "{}", self.reason),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum MismatchReason {
    /// The environment has no such symbol (or it failed to resolve)
    Missing,

    VisibilityTooRestrictive {
        required: Visibility,
        actual: Visibility,
    },

    WrongStaticness {
        required: Ownership,
        actual: Ownership,
    },

    /// The module was compiled for a newer runtime than the environment runs
    UnsupportedRuntimeVersion { required: Version, runtime: Version },

    /// Class is used as an interface but is a class, or the other way around
    WrongKind { required: ClassKind, actual: ClassKind },

    /// A concrete helper class doesn't implement an abstract method it inherits
    UnimplementedAbstractMethod { declared_in: BinaryName },

    /// References of the module could not be extracted
    ExtractionFailed(String),

    /// Unexpected failure while checking
    CheckFailed(String),
}

impl fmt::Display for MismatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchReason::Missing => f.write_str("missing"),
            MismatchReason::VisibilityTooRestrictive { required, actual } => {
                write!(f, "is {} but must be at least {}", actual, required)
            }
            MismatchReason::WrongStaticness { required, actual } => {
                write!(f, "is {} but must be {}", actual, required)
            }
            MismatchReason::UnsupportedRuntimeVersion { required, runtime } => write!(
                f,
                "needs class file version {} but the runtime supports up to {}",
                required, runtime
            ),
            MismatchReason::WrongKind { required, actual } => {
                write!(f, "is a {} but must be a {}", actual, required)
            }
            MismatchReason::UnimplementedAbstractMethod { declared_in } => {
                write!(f, "abstract method from {} is not implemented", declared_in)
            }
            MismatchReason::ExtractionFailed(message) => {
                write!(f, "references could not be extracted: {}", message)
            }
            MismatchReason::CheckFailed(message) => write!(f, "check failed: {}", message),
        }
    }
}
