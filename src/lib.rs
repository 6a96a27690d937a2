//! tldextract-r - Fast subdomain, domain and public suffix extraction for Rust
//!
//! Splits a URL or hostname into subdomain, domain, public suffix and
//! registered domain using the Public Suffix List (PSL):
//! - Multi-label suffixes (`co.uk`, `gov.cn`)
//! - Wildcard suffixes (`*.ck`) and their exceptions (`!www.ck`)
//! - ICANN-only or ICANN + PRIVATE suffixes
//! - IPv4 literals, ports, userinfo and paths in the input
//! - Managed on-disk cache with mirror download and in-place refresh
//!
//! Lookups walk a label-reversed trie, one step per host label.
//!
//! # Example
//!
//! ```rust
//! use tldextract_r::{parse_suffix_list, ExtractRequest, TldExtractor};
//!
//! let list = "
//! // ===BEGIN ICANN DOMAINS===
//! com
//! ua
//! com.ua
//! *.ck
//! !www.ck
//! // ===BEGIN PRIVATE DOMAINS===
//! blogspot.com
//! ";
//!
//! let extractor = TldExtractor::from_suffix_lists(&parse_suffix_list(list), false);
//!
//! let result = extractor.extract_url("https://maps.google.com.ua/a/long/path?query=42");
//! assert_eq!(result.subdomain, "maps");
//! assert_eq!(result.domain, "google");
//! assert_eq!(result.suffix, "com.ua");
//! assert_eq!(result.registered_domain, "google.com.ua");
//!
//! let request = ExtractRequest::new("www.ck").with_ignore_subdomains(true);
//! assert_eq!(extractor.extract(&request).registered_domain, "www.ck");
//! ```
//!
//! # Result Fields
//!
//! | Input | Subdomain | Domain | Suffix | Registered domain |
//! |-------|-----------|--------|--------|-------------------|
//! | `a.b.com` | `a` | `b` | `com` | `b.com` |
//! | `maps.google.com.ua` | `maps` | `google` | `com.ua` | `google.com.ua` |
//! | `www.ck` | | `www` | `ck` | `www.ck` |
//! | `x.ck` | | | `x.ck` | |
//! | `192.168.1.1` | | `192.168.1.1` | | `192.168.1.1` |
//! | `example.invalid` | | | | |
//!
//! A host with no known suffix is not an error; every field is simply empty.

pub mod error;
pub mod extractor;
pub mod matcher;
pub mod normalize;
pub mod psl;
pub mod trie;
pub mod types;

// Re-export commonly used items
pub use error::{DownloadErrorKind, Result, TldError};
pub use extractor::{ExtractorOptions, TldExtractor};
pub use matcher::{split_host_parts, suffix_label_count};
pub use normalize::{extract_host, looks_like_ipv4, parse_port, split_host, to_punycode};
pub use psl::{
    load_suffix_list, parse_suffix_list, HttpFetcher, SuffixListFetcher, SuffixLists,
    DEFAULT_PSL_FILENAME, DEFAULT_UPDATE_INTERVAL, PUBLIC_SUFFIX_LIST_SOURCES,
};
pub use trie::{Branch, SuffixTrie, TrieNode};
pub use types::{ExtractRequest, ExtractResult, HostParts};
