//! Link-time safety checks for instrumentation modules
//!
//! Instrumentation modules are compiled against one version of a library, but get applied to
//! whatever version of the library an application actually has. Before a module is applied, the
//! [`verifier::Verifier`] checks that every class, method, and field the module's helper classes
//! link against exists in the target environment with compatible flags.
//!
//! The pieces, from the bottom up:
//!
//!   - [`jvm`] reads (and writes) class files
//!   - [`reference`] extracts what a module needs from its helper classes
//!   - [`environment`] resolves what an environment provides, lazily
//!   - [`matcher`] compares the two into a [`matcher::Verdict`]
//!   - [`verifier`] ties these together with caching which never keeps environments alive

pub mod environment;
pub mod jvm;
pub mod matcher;
pub mod reference;
pub mod settings;
pub mod util;
pub mod verifier;

pub use environment::{Environment, SymbolProvider};
pub use matcher::Verdict;
pub use settings::Settings;
pub use verifier::{Policy, Verifier};
