//! Compressed suffix trie.
//!
//! Suffixes are stored label by label in reverse order, so `us.gov.pl` is
//! the path `pl` -> `gov` -> `us`. A node is either a [`TrieNode::Leaf`]
//! (a valid suffix with nothing below it) or a [`TrieNode::Branch`]. A branch
//! may itself be a valid suffix while also having children (`cn` and
//! `gov.cn`); this is its `end` flag.
//!
//! Wildcard and exception rules need no special handling at build time: the
//! list spells them as ordinary labels (`*` and `!www`), and the matcher
//! interprets those keys.

use std::borrow::Cow;
use std::collections::HashMap;

/// Label matching any single label at its level
pub const WILDCARD: &str = "*";

/// Prefix of a label excluded from a wildcard level
pub const EXCEPTION_PREFIX: char = '!';

/// A position in the suffix trie
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrieNode {
    /// Valid suffix with no longer suffix below it
    Leaf,
    /// Interior node, possibly a valid suffix itself
    Branch(Branch),
}

impl TrieNode {
    /// Turn a leaf into a terminal branch so a longer path can pass through it
    fn make_branch(&mut self) -> &mut Branch {
        if let TrieNode::Leaf = self {
            *self = TrieNode::Branch(Branch::terminal());
        }
        let TrieNode::Branch(branch) = self else {
            unreachable!("leaf converted to branch above")
        };
        branch
    }

    /// Check if the path to this node is a complete suffix
    pub fn is_suffix(&self) -> bool {
        match self {
            TrieNode::Leaf => true,
            TrieNode::Branch(branch) => branch.end,
        }
    }
}

/// Interior trie node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Branch {
    /// The path up to this node is a complete suffix
    end: bool,
    children: HashMap<String, TrieNode>,
}

impl Branch {
    fn terminal() -> Self {
        Self {
            end: true,
            children: HashMap::new(),
        }
    }

    /// Check if the path up to this branch is a complete suffix
    pub fn is_end(&self) -> bool {
        self.end
    }

    /// Look up a child by label, ignoring ASCII case
    pub fn child(&self, label: &str) -> Option<&TrieNode> {
        let key: Cow<'_, str> = if label.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(label.to_ascii_lowercase())
        } else {
            Cow::Borrowed(label)
        };
        self.children.get(key.as_ref())
    }

    /// Check if this level matches any label
    pub fn has_wildcard(&self) -> bool {
        self.children.contains_key(WILDCARD)
    }

    /// Check if `label` is excluded from this wildcard level
    pub fn has_exception(&self, label: &str) -> bool {
        let mut key = String::with_capacity(label.len() + 1);
        key.push(EXCEPTION_PREFIX);
        key.push_str(label);
        key.make_ascii_lowercase();
        self.children.contains_key(&key)
    }

    /// Number of direct children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Check if the branch has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Insert a reversed-label path ending in a leaf
    fn insert(&mut self, path: &[&str]) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };

        let mut node = self;
        for label in parents {
            node = node
                .children
                .entry((*label).to_string())
                .or_insert_with(|| TrieNode::Branch(Branch::default()))
                .make_branch();
        }

        match node.children.get_mut(*last) {
            Some(TrieNode::Leaf) => {}
            Some(TrieNode::Branch(branch)) => branch.end = true,
            None => {
                node.children.insert((*last).to_string(), TrieNode::Leaf);
            }
        }
    }

    /// Install a single-label suffix as a terminal branch
    fn insert_top_level(&mut self, label: &str) {
        match self.children.get_mut(label) {
            Some(TrieNode::Leaf) => {}
            Some(TrieNode::Branch(branch)) => branch.end = true,
            None => {
                self.children
                    .insert(label.to_string(), TrieNode::Branch(Branch::terminal()));
            }
        }
    }

    /// Rewrite every terminal branch without children into a leaf
    fn collapse(&mut self) {
        for child in self.children.values_mut() {
            let childless_end = match child {
                TrieNode::Branch(branch) => {
                    branch.collapse();
                    branch.end && branch.children.is_empty()
                }
                TrieNode::Leaf => false,
            };
            if childless_end {
                *child = TrieNode::Leaf;
            }
        }
    }
}

/// Compiled, immutable suffix trie
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuffixTrie {
    root: Branch,
    suffix_count: usize,
}

impl SuffixTrie {
    /// Compile a suffix collection (e.g. `com`, `co.uk`, `*.ck`, `!www.ck`).
    ///
    /// Empty entries are ignored. The result does not depend on duplicate
    /// entries and is identical for the same input.
    pub fn compile<S: AsRef<str>>(suffixes: &[S]) -> Self {
        let mut root = Branch::default();
        let mut suffix_count = 0;

        for suffix in suffixes {
            let suffix = suffix.as_ref();
            if suffix.is_empty() {
                continue;
            }

            if suffix.contains('.') {
                let mut labels: Vec<&str> = suffix.split('.').collect();
                labels.reverse();
                root.insert(&labels);
            } else {
                root.insert_top_level(suffix);
            }
            suffix_count += 1;
        }

        root.collapse();
        // An empty suffix is never valid
        root.end = false;

        Self { root, suffix_count }
    }

    /// Root branch; the traversal starts here
    pub fn root(&self) -> &Branch {
        &self.root
    }

    /// Number of non-empty entries read, counting duplicates and Unicode twins
    pub fn suffix_count(&self) -> usize {
        self.suffix_count
    }

    /// Check if the trie holds no suffixes
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}
