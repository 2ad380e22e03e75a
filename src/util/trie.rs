use std::collections::HashMap;

/// Map from string prefixes to values, queried by longest matching prefix
///
/// Prefixes match as raw strings: registering `com/acme` also matches `com/acmex/Foo`. Lookups
/// take time proportional to the length of the name being classified, not the number of
/// registered prefixes.
#[derive(Clone, Debug)]
pub struct Trie<V> {
    root: Node<V>,
    len: usize,
}

#[derive(Clone, Debug)]
struct Node<V> {
    value: Option<V>,
    children: HashMap<char, Node<V>>,
}

impl<V> Node<V> {
    fn new() -> Node<V> {
        Node {
            value: None,
            children: HashMap::new(),
        }
    }
}

impl<V> Trie<V> {
    pub fn new() -> Trie<V> {
        Trie {
            root: Node::new(),
            len: 0,
        }
    }

    /// Register a prefix, returning the value it previously mapped to (if any)
    pub fn insert(&mut self, prefix: &str, value: V) -> Option<V> {
        let mut node = &mut self.root;
        for c in prefix.chars() {
            node = node.children.entry(c).or_insert_with(Node::new);
        }
        let previous = node.value.replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Value of the longest registered prefix of `name`
    pub fn lookup(&self, name: &str) -> Option<&V> {
        let mut node = &self.root;
        let mut found = node.value.as_ref();
        for c in name.chars() {
            match node.children.get(&c) {
                Some(child) => node = child,
                None => break,
            }
            if let Some(value) = &node.value {
                found = Some(value);
            }
        }
        found
    }

    /// Is this exact prefix registered?
    pub fn contains(&self, prefix: &str) -> bool {
        let mut node = &self.root;
        for c in prefix.chars() {
            match node.children.get(&c) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.value.is_some()
    }

    /// Number of registered prefixes
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Trie::new()
    }
}

impl<S: AsRef<str>, V> FromIterator<(S, V)> for Trie<V> {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        let mut trie = Trie::new();
        for (prefix, value) in iter {
            trie.insert(prefix.as_ref(), value);
        }
        trie
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn longest_prefix_wins() {
        let mut trie = Trie::new();
        trie.insert("abc", 0);
        trie.insert("abcd", 10);
        trie.insert("abcde", 20);

        assert_eq!(trie.lookup("abc"), Some(&0));
        assert_eq!(trie.lookup("abcd"), Some(&10));
        assert_eq!(trie.lookup("abcdefg"), Some(&20));
        assert_eq!(trie.lookup("abcx"), Some(&0));
        assert_eq!(trie.lookup("ab"), None);
        assert_eq!(trie.lookup(""), None);
        assert_eq!(trie.len(), 3);

        assert_eq!(trie.insert("abc", 12), Some(0));
        assert_eq!(trie.lookup("abc"), Some(&12));
        assert_eq!(trie.lookup("abcd"), Some(&10));
        assert_eq!(trie.len(), 3);
    }

    #[test]
    fn prefixes_are_not_token_aware() {
        let trie: Trie<&str> = vec![("com/acme", "acme"), ("com/acme/internal/", "internal")]
            .into_iter()
            .collect();
        assert_eq!(trie.lookup("com/acmex/Foo"), Some(&"acme"));
        assert_eq!(trie.lookup("com/acme/internal/Foo"), Some(&"internal"));
        assert_eq!(trie.lookup("com/acme/internal"), Some(&"acme"));
        assert!(trie.contains("com/acme"));
        assert!(!trie.contains("com/ac"));
    }

    #[test]
    fn empty_prefix_matches_everything() {
        let mut trie = Trie::new();
        trie.insert("", 1);
        trie.insert("x", 2);
        assert_eq!(trie.lookup("anything"), Some(&1));
        assert_eq!(trie.lookup("xyz"), Some(&2));
    }
}
