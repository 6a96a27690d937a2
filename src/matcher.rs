//! Longest-suffix-match traversal.
//!
//! Labels are walked from the rightmost to the leftmost against the suffix
//! trie, counting how many of them belong to the suffix. The count alone
//! determines the split: the suffix is the last `count` labels, the domain is
//! the label before them, and the subdomain is everything before the domain.

use crate::normalize::looks_like_ipv4;
use crate::trie::{Branch, SuffixTrie, TrieNode};
use crate::types::ExtractResult;

/// Count how many trailing labels of `labels` form the longest matching suffix
pub fn suffix_label_count(trie: &SuffixTrie, labels: &[&str]) -> usize {
    let mut node: &Branch = trie.root();
    let mut count = 0;

    for label in labels.iter().rev() {
        // A suffix ends here (cn), but a longer one may continue (gov.cn)
        if node.is_end() {
            if let Some(child) = node.child(label) {
                count += 1;
                match child {
                    TrieNode::Branch(next) => {
                        node = next;
                        continue;
                    }
                    TrieNode::Leaf => break,
                }
            }
        }

        // Wildcard level: any label is part of the suffix unless excepted
        if node.has_wildcard() {
            if !node.has_exception(label) {
                count += 1;
            }
            break;
        }

        match node.child(label) {
            Some(TrieNode::Branch(next)) => {
                count += 1;
                node = next;
            }
            Some(TrieNode::Leaf) => {
                count += 1;
                break;
            }
            None => break,
        }
    }

    count
}

/// Split a bare host into subdomain, domain, suffix and registered domain.
///
/// IPv4 literals are returned as the domain and registered domain. A host
/// without any known suffix yields an empty result.
pub fn split_host_parts(trie: &SuffixTrie, host: &str, ignore_subdomains: bool) -> ExtractResult {
    let mut result = ExtractResult::default();

    if looks_like_ipv4(host) {
        result.domain = host.to_string();
        result.registered_domain = host.to_string();
        return result;
    }

    let labels: Vec<&str> = host.split('.').collect();
    let label_count = labels.len();
    let suffix_len = suffix_label_count(trie, &labels);

    if suffix_len == 0 {
        return result;
    }

    result.suffix = labels[label_count - suffix_len..].join(".");

    if suffix_len < label_count {
        let domain = labels[label_count - suffix_len - 1];
        result.domain = domain.to_string();

        if !ignore_subdomains && label_count - suffix_len >= 2 {
            // Slice the original host so its formatting survives untouched
            let end = host.len() - domain.len() - result.suffix.len() - 2;
            result.subdomain = host[..end].to_string();
        }
    }

    if !result.domain.is_empty() && !result.suffix.is_empty() {
        result.registered_domain = format!("{}.{}", result.domain, result.suffix);
    }

    result
}
