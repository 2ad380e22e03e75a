use crate::util::Trie;

/// What to do about a class
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Policy {
    /// Never instrumented, so never verified
    Ignore,

    /// Goes through verification as usual
    Allow,
}

/// Rules deciding which classes are off-limits, by longest matching prefix
///
/// Names and prefixes may be written in dotted (`com.acme.Foo`) or internal (`com/acme/Foo`)
/// form. Classes matching no rule are allowed.
#[derive(Clone, Debug, Default)]
pub struct IgnoredTypes {
    rules: Trie<Policy>,
}

impl IgnoredTypes {
    pub fn new() -> IgnoredTypes {
        IgnoredTypes { rules: Trie::new() }
    }

    pub fn ignore(&mut self, prefix: &str) -> &mut IgnoredTypes {
        self.rules.insert(&internal_form(prefix), Policy::Ignore);
        self
    }

    pub fn allow(&mut self, prefix: &str) -> &mut IgnoredTypes {
        self.rules.insert(&internal_form(prefix), Policy::Allow);
        self
    }

    pub fn classify(&self, name: &str) -> Policy {
        self.rules
            .lookup(&internal_form(name))
            .copied()
            .unwrap_or(Policy::Allow)
    }

    /// Number of registered rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

pub(crate) fn internal_form(name: &str) -> String {
    name.replace('.', "/")
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn longest_rule_wins() {
        let mut ignored = IgnoredTypes::new();
        ignored
            .ignore("com.acme.")
            .allow("com/acme/app/")
            .ignore("com.acme.app.Generated");

        assert_eq!(ignored.classify("com.acme.Util"), Policy::Ignore);
        assert_eq!(ignored.classify("com/acme/app/Main"), Policy::Allow);
        assert_eq!(ignored.classify("com.acme.app.Generated$1"), Policy::Ignore);
        assert_eq!(ignored.classify("org.lib.Client"), Policy::Allow);
        assert_eq!(ignored.len(), 3);
    }

    #[test]
    fn later_rules_overwrite() {
        let mut ignored = IgnoredTypes::new();
        ignored.ignore("org/lib/");
        assert_eq!(ignored.classify("org.lib.Client"), Policy::Ignore);
        ignored.allow("org.lib.");
        assert_eq!(ignored.classify("org.lib.Client"), Policy::Allow);
        assert_eq!(ignored.len(), 1);
    }

    #[test]
    fn empty_allows_everything() {
        assert!(IgnoredTypes::new().is_empty());
        assert_eq!(IgnoredTypes::default().classify("anything"), Policy::Allow);
    }
}
