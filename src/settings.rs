/// Configuration of a [`crate::verifier::Verifier`], read once when it is constructed
#[derive(Clone, Debug)]
pub struct Settings {
    /// Prefixes (written `java/` or `java.`) of classes which modules may reference without
    /// them being checked
    ///
    /// These are classes every environment is assumed to provide, so references to them are
    /// dropped during extraction. When an environment can't describe one of them, members looked
    /// up through it are assumed to be there too.
    pub excluded_prefixes: Vec<String>,

    /// Prefixes of classes for which verification is skipped entirely (see
    /// [`crate::verifier::Policy::Ignore`])
    pub ignored_prefixes: Vec<String>,

    /// Prefixes carved back out of `ignored_prefixes`
    ///
    /// The longest matching prefix wins, so allowing `com/acme/app/` while ignoring `com/acme/`
    /// ignores everything under `com/acme/` except for the app package.
    pub allowed_prefixes: Vec<String>,

    /// Most verdicts kept before the oldest ones get evicted
    pub verdict_cache_capacity: usize,

    /// How many (module, environment) rejections are remembered to avoid logging the same
    /// rejection over and over
    pub rejection_log_capacity: usize,
}

impl Settings {
    pub fn new() -> Settings {
        Settings {
            excluded_prefixes: vec![String::from("java/")],
            ignored_prefixes: vec![],
            allowed_prefixes: vec![],
            verdict_cache_capacity: 4096,
            rejection_log_capacity: 256,
        }
    }
}

impl Default for Settings {
    fn default() -> Settings {
        Settings::new()
    }
}
