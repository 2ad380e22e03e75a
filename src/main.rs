mod error;

use clap::{crate_authors, crate_version, value_parser, Arg, ArgAction, Command};
use error::Error;
use linkguard::environment::{ClassPathProvider, Environment};
use linkguard::jvm::{BinaryName, Version};
use linkguard::reference::ModuleDefinition;
use linkguard::{Settings, Verifier};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::exit;
use std::sync::Arc;
use walkdir::WalkDir;

fn main() -> Result<(), Error> {
    env_logger::init();

    let matches = Command::new("linkguard")
        .version(crate_version!())
        .author(crate_authors!())
        .about("Checks that a module's helper classes link against the classes on a class path")
        .arg(
            Arg::new("module")
                .long("module")
                .value_name("DIRECTORY")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Sets the directory of compiled helper classes to check"),
        )
        .arg(
            Arg::new("name")
                .long("name")
                .value_name("NAME")
                .help("Sets the module name used in diagnostics (defaults to the directory name)"),
        )
        .arg(
            Arg::new("entry")
                .long("entry")
                .value_name("CLASS")
                .action(ArgAction::Append)
                .help("Adds a helper class from which scanning starts (defaults to all helpers)"),
        )
        .arg(
            Arg::new("classpath")
                .long("classpath")
                .value_name("DIRECTORY")
                .required(true)
                .action(ArgAction::Append)
                .value_parser(value_parser!(PathBuf))
                .help("Adds a directory of library classes to check against"),
        )
        .arg(
            Arg::new("runtime version")
                .long("runtime-version")
                .value_name("MAJOR")
                .value_parser(value_parser!(u16))
                .default_value("61")
                .help("Sets the highest class file major version the runtime supports"),
        )
        .arg(
            Arg::new("exclude")
                .long("exclude")
                .value_name("PREFIX")
                .action(ArgAction::Append)
                .help("Adds a prefix of classes which are assumed to always be present"),
        )
        .get_matches();

    let module_path = matches
        .get_one::<PathBuf>("module")
        .ok_or(Error::MissingArgument("module"))?;
    let module_name = match matches.get_one::<String>("name") {
        Some(name) => name.clone(),
        None => module_path
            .file_name()
            .map_or_else(|| String::from("module"), |name| name.to_string_lossy().into_owned()),
    };
    let class_path: Vec<PathBuf> = matches
        .get_many::<PathBuf>("classpath")
        .ok_or(Error::MissingArgument("classpath"))?
        .cloned()
        .collect();
    let runtime_version = Version::major(
        *matches
            .get_one::<u16>("runtime version")
            .ok_or(Error::MissingArgument("runtime-version"))?,
    );

    let mut module = load_module(&module_name, module_path)?;
    for entry in matches.get_many::<String>("entry").into_iter().flatten() {
        let entry = BinaryName::from_dotted_or_internal(entry).map_err(Error::BadClassName)?;
        module.add_entry_point(entry);
    }

    let mut settings = Settings::new();
    settings
        .excluded_prefixes
        .extend(matches.get_many::<String>("exclude").into_iter().flatten().cloned());

    let verifier = Verifier::new(settings, vec![module]);
    let environment = Arc::new(Environment::new(
        "class path",
        ClassPathProvider::new(class_path, runtime_version),
    ));

    let verdict = verifier.verify(&module_name, &environment);
    println!("{}: {}", module_name, verdict);
    if !verdict.is_compatible() {
        exit(1);
    }
    Ok(())
}

/// Collect every class file under a directory as a helper
fn load_module(name: &str, root: &Path) -> Result<ModuleDefinition, Error> {
    let mut module = ModuleDefinition::new(name);
    for entry in WalkDir::new(root).follow_links(true) {
        let path = entry?.into_path();
        if !path.is_file() || path.extension().map_or(true, |ext| ext != "class") {
            continue;
        }
        let file_stem = path.file_stem().map(|stem| stem.to_string_lossy());
        if matches!(file_stem.as_deref(), Some("module-info" | "package-info")) {
            continue;
        }

        let class_name = path
            .strip_prefix(root)
            .ok()
            .and_then(|relative| relative.with_extension("").to_str().map(str::to_owned))
            .ok_or_else(|| Error::BadClassPath(path.clone()))?;
        let class_name = class_name.replace(std::path::MAIN_SEPARATOR, "/");
        let class_name = BinaryName::from_dotted_or_internal(&class_name)
            .map_err(|_| Error::BadClassPath(path.clone()))?;

        log::info!("Reading helper {} from '{}'", class_name, path.display());
        module.add_helper(class_name, fs::read(&path)?);
    }
    Ok(module)
}
