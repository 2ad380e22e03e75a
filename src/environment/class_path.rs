use super::{ClassDescription, ResolutionError, SymbolProvider};
use crate::jvm::class_file::ClassFile;
use crate::jvm::{BinaryName, Name, Version};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Provider over directories of compiled classes, laid out by package (`a/b/C.class`)
///
/// Earlier roots shadow later ones, like on a JVM class path.
#[derive(Debug, Clone)]
pub struct ClassPathProvider {
    roots: Vec<PathBuf>,
    runtime_version: Version,
}

impl ClassPathProvider {
    pub fn new(roots: Vec<PathBuf>, runtime_version: Version) -> ClassPathProvider {
        ClassPathProvider {
            roots,
            runtime_version,
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

impl SymbolProvider for ClassPathProvider {
    fn runtime_version(&self) -> Version {
        self.runtime_version
    }

    fn describe_class(&self, name: &BinaryName) -> Result<Option<ClassDescription>, ResolutionError> {
        let relative = format!("{}.class", name.as_str());
        let resolution_error = |message: String| ResolutionError {
            class: name.clone(),
            message,
        };

        for root in &self.roots {
            let path = root.join(&relative);
            let bytes = match fs::read(&path) {
                Ok(bytes) => bytes,
                Err(err) if err.kind() == ErrorKind::NotFound => continue,
                Err(err) => {
                    return Err(resolution_error(format!("{}: {}", path.display(), err)));
                }
            };
            log::debug!("Describing {} from {}", name, path.display());
            let class = ClassFile::parse(&bytes)
                .map_err(|err| resolution_error(format!("{}: {}", path.display(), err)))?;
            let description = ClassDescription::from_class_file(&class)
                .map_err(|err| resolution_error(format!("{}: {}", path.display(), err)))?;
            if &description.name != name {
                return Err(resolution_error(format!(
                    "{} contains {}",
                    path.display(),
                    description.name
                )));
            }
            return Ok(Some(description));
        }
        Ok(None)
    }
}
