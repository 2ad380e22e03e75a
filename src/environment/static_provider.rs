use super::{ClassDescription, ResolutionError, SymbolProvider};
use crate::jvm::{BinaryName, Version};
use std::collections::HashMap;

/// Provider over a fixed, in-memory set of classes
#[derive(Debug, Clone)]
pub struct StaticProvider {
    runtime_version: Version,
    classes: HashMap<BinaryName, ClassDescription>,

    /// Classes which exist but fail to resolve, along with why
    unresolvable: HashMap<BinaryName, String>,
}

impl StaticProvider {
    pub fn new(runtime_version: Version) -> StaticProvider {
        StaticProvider {
            runtime_version,
            classes: HashMap::new(),
            unresolvable: HashMap::new(),
        }
    }

    pub fn add_class(&mut self, class: ClassDescription) {
        self.classes.insert(class.name.clone(), class);
    }

    pub fn remove_class(&mut self, name: &BinaryName) -> Option<ClassDescription> {
        self.classes.remove(name)
    }

    /// Mutable access to a class description, eg. to remove one of its members
    pub fn class_mut(&mut self, name: &BinaryName) -> Option<&mut ClassDescription> {
        self.classes.get_mut(name)
    }

    /// Make a class fail resolution
    pub fn add_unresolvable(&mut self, name: BinaryName, message: impl Into<String>) {
        self.unresolvable.insert(name, message.into());
    }
}

impl SymbolProvider for StaticProvider {
    fn runtime_version(&self) -> Version {
        self.runtime_version
    }

    fn describe_class(&self, name: &BinaryName) -> Result<Option<ClassDescription>, ResolutionError> {
        if let Some(message) = self.unresolvable.get(name) {
            return Err(ResolutionError {
                class: name.clone(),
                message: message.clone(),
            });
        }
        Ok(self.classes.get(name).cloned())
    }
}
