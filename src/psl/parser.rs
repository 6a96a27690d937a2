use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::error::{Result, TldError};

/// Comment line that opens the PRIVATE section of the list
pub const PRIVATE_DOMAINS_MARKER: &str = "// ===BEGIN PRIVATE DOMAINS===";

/// Suffixes classified by section.
///
/// Each entry is in ASCII (Punycode) form. When conversion changed an entry,
/// the original Unicode form follows it in the same collections so that both
/// spellings match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuffixLists {
    /// ICANN suffixes (e.g. `com`, `co.uk`)
    pub public: Vec<String>,
    /// PRIVATE suffixes (e.g. `blogspot.com`)
    pub private: Vec<String>,
    /// Both sections, in list order
    pub all: Vec<String>,
}

impl SuffixLists {
    /// Suffixes to compile: ICANN only, or everything
    pub fn select(&self, include_private: bool) -> &[String] {
        if include_private {
            &self.all
        } else {
            &self.public
        }
    }

    fn push(&mut self, suffix: String, private: bool) {
        if private {
            self.private.push(suffix.clone());
        } else {
            self.public.push(suffix.clone());
        }
        self.all.push(suffix);
    }
}

/// Classify Public Suffix List text into ICANN and PRIVATE suffixes.
///
/// Lines that fail IDNA conversion are logged and skipped.
pub fn parse_suffix_list(text: &str) -> SuffixLists {
    let mut lists = SuffixLists::default();
    let mut in_private = false;

    for (line_num, line) in text.lines().enumerate() {
        let line_num = line_num + 1;
        let line = line.trim();

        if line == PRIVATE_DOMAINS_MARKER {
            in_private = true;
        }
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        // Rules end at the first whitespace
        let rule = match line.split_whitespace().next() {
            Some(rule) => rule,
            None => continue,
        };

        let ascii = match idna::domain_to_ascii(rule) {
            Ok(ascii) if !ascii.is_empty() => ascii,
            Ok(_) => {
                warn!(
                    "skipping suffix list line {}: `{}` is empty after conversion",
                    line_num, rule
                );
                continue;
            }
            Err(e) => {
                warn!("skipping suffix list line {}: `{}`: {}", line_num, rule, e);
                continue;
            }
        };

        let changed = ascii != rule;
        lists.push(ascii, in_private);
        if changed {
            lists.push(rule.to_string(), in_private);
        }
    }

    debug!(
        "classified {} public and {} private suffixes",
        lists.public.len(),
        lists.private.len()
    );
    lists
}

/// Classify a suffix list held in memory as raw bytes (e.g. a download).
pub fn parse_suffix_list_bytes(bytes: &[u8]) -> Result<SuffixLists> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| TldError::InvalidSuffixList(format!("not UTF-8: {}", e)))?;
    Ok(parse_suffix_list(text))
}

/// Read and classify a suffix list file.
pub fn load_suffix_list(path: impl AsRef<Path>) -> Result<SuffixLists> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| TldError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_suffix_list(&text))
}
