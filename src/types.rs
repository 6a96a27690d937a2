use serde::Serialize;

/// Extraction request
#[derive(Debug, Clone, Default)]
pub struct ExtractRequest {
    /// URL or bare hostname
    pub url: String,
    /// Convert the host to Punycode (lower-cased ASCII) before matching
    pub convert_to_punycode: bool,
    /// Leave the subdomain empty
    pub ignore_subdomains: bool,
}

impl ExtractRequest {
    /// Create a request with default flags
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            convert_to_punycode: false,
            ignore_subdomains: false,
        }
    }

    /// Set Punycode conversion
    pub fn with_punycode(mut self, convert: bool) -> Self {
        self.convert_to_punycode = convert;
        self
    }

    /// Set subdomain suppression
    pub fn with_ignore_subdomains(mut self, ignore: bool) -> Self {
        self.ignore_subdomains = ignore;
        self
    }
}

/// Result of splitting a host against the suffix trie.
///
/// Every string field is empty when not applicable. An IPv4 literal only
/// populates `domain` and `registered_domain`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractResult {
    pub subdomain: String,
    pub domain: String,
    pub suffix: String,
    pub registered_domain: String,
    /// Port found after the host, if it was a valid integer in `[0, 65535]`
    pub port: Option<u16>,
}

/// Output of the host normalizer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostParts<'a> {
    /// Bare host: no scheme, userinfo, port, path, query or fragment
    pub host: &'a str,
    /// Everything from the first `:`, `/`, `?`, `&` or `#` after the host
    pub after_host: &'a str,
    pub port: Option<u16>,
}
