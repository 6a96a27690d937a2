//! Extractor module.
//!
//! Owns the compiled suffix trie and the source it was built from. Extraction
//! reads a shared handle to the trie; an update builds a complete new trie and
//! swaps the handle, so extractions already running keep the trie they started
//! with.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use crate::error::{Result, TldError};
use crate::matcher::split_host_parts;
use crate::normalize::{split_host, to_punycode};
use crate::psl::{
    default_data_dir, download_suffix_list, load_suffix_list, needs_download, HttpFetcher,
    SuffixListFetcher, SuffixLists, DEFAULT_PSL_FILENAME, DEFAULT_UPDATE_INTERVAL,
    PUBLIC_SUFFIX_LIST_SOURCES,
};
use crate::trie::SuffixTrie;
use crate::types::{ExtractRequest, ExtractResult};

/// Extractor builder options.
#[derive(Debug, Clone)]
pub struct ExtractorOptions {
    /// Caller-supplied suffix list. Falls back to the managed cache when unset
    /// or when its directory is unreachable.
    pub cache_file_path: Option<PathBuf>,
    /// Compile PRIVATE suffixes (e.g. `blogspot.com`) along with ICANN ones
    pub include_private_suffixes: bool,
    /// Directory of the managed cache
    pub data_dir: Option<PathBuf>,
    /// Mirrors used to download the managed cache, in order
    pub mirrors: Vec<String>,
    /// Age after which the managed cache is downloaded again
    pub update_interval: Duration,
    /// Download the managed cache at startup when missing or stale
    pub auto_update: bool,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            cache_file_path: None,
            include_private_suffixes: false,
            data_dir: None,
            mirrors: PUBLIC_SUFFIX_LIST_SOURCES
                .iter()
                .map(|url| url.to_string())
                .collect(),
            update_interval: DEFAULT_UPDATE_INTERVAL,
            auto_update: true,
        }
    }
}

impl ExtractorOptions {
    /// Create new extractor options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a caller-supplied suffix list file.
    ///
    /// The file is used when its parent directory exists; otherwise the
    /// managed cache is used. A bare file name such as `list.dat` resolves
    /// against the current directory and counts as caller-supplied.
    pub fn with_cache_file_path(mut self, path: impl AsRef<Path>) -> Self {
        self.cache_file_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Include PRIVATE suffixes.
    pub fn with_private_suffixes(mut self, include: bool) -> Self {
        self.include_private_suffixes = include;
        self
    }

    /// Set the managed cache directory.
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Replace the download mirrors.
    pub fn with_mirrors<I, S>(mut self, mirrors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mirrors = mirrors.into_iter().map(Into::into).collect();
        self
    }

    /// Set the managed cache update interval.
    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    /// Enable or disable the startup download.
    pub fn with_auto_update(mut self, auto_update: bool) -> Self {
        self.auto_update = auto_update;
        self
    }

    /// Resolve the suffix list location
    fn resolve_source(&self) -> SuffixSource {
        if let Some(ref path) = self.cache_file_path {
            let parent = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => Path::new("."),
            };
            if parent.is_dir() {
                return SuffixSource::Custom(path.clone());
            }
            tracing::warn!(
                path = %path.display(),
                "suffix list directory unreachable, using managed cache"
            );
        }

        let dir = self.data_dir.clone().unwrap_or_else(default_data_dir);
        SuffixSource::Managed(dir.join(DEFAULT_PSL_FILENAME))
    }
}

/// Where the compiled suffixes came from
#[derive(Debug, Clone, PartialEq, Eq)]
enum SuffixSource {
    /// Cache maintained by this crate; can be updated from the mirrors
    Managed(PathBuf),
    /// Caller-supplied file
    Custom(PathBuf),
    /// Suffix lists handed over in memory
    Memory,
}

impl SuffixSource {
    fn path(&self) -> Option<&Path> {
        match self {
            SuffixSource::Managed(path) | SuffixSource::Custom(path) => Some(path),
            SuffixSource::Memory => None,
        }
    }
}

impl fmt::Display for SuffixSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuffixSource::Managed(path) => write!(f, "managed list {}", path.display()),
            SuffixSource::Custom(path) => write!(f, "custom list {}", path.display()),
            SuffixSource::Memory => write!(f, "in-memory list"),
        }
    }
}

/// Splits URLs into subdomain, domain, suffix and registered domain.
///
/// `TldExtractor` is `Send + Sync`; share it behind an `Arc` and call
/// [`extract`](Self::extract) from any number of threads.
pub struct TldExtractor {
    trie: RwLock<Arc<SuffixTrie>>,
    source: SuffixSource,
    include_private_suffixes: bool,
    mirrors: Vec<String>,
    fetcher: Box<dyn SuffixListFetcher>,
    update_lock: Mutex<()>,
}

impl TldExtractor {
    /// Create an extractor, downloading the managed cache over HTTP if needed.
    pub fn new(options: ExtractorOptions) -> Result<Self> {
        Self::with_fetcher(options, Box::new(HttpFetcher))
    }

    /// Create an extractor using a custom fetcher for the managed cache.
    pub fn with_fetcher(
        options: ExtractorOptions,
        fetcher: Box<dyn SuffixListFetcher>,
    ) -> Result<Self> {
        let source = options.resolve_source();

        let mut downloaded = None;
        if let SuffixSource::Managed(ref path) = source {
            if options.auto_update && needs_download(path, options.update_interval) {
                match download_suffix_list(path, &options.mirrors, fetcher.as_ref()) {
                    Ok(lists) => downloaded = Some(lists),
                    Err(e) if path.exists() => {
                        tracing::warn!(error = %e, "update failed, using existing suffix list");
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        let lists = match downloaded {
            Some(lists) => lists,
            None => match source.path() {
                Some(path) => load_suffix_list(path)?,
                None => SuffixLists::default(),
            },
        };

        let trie = SuffixTrie::compile(lists.select(options.include_private_suffixes));
        tracing::info!(
            suffixes = trie.suffix_count(),
            private = options.include_private_suffixes,
            "suffix trie compiled"
        );

        Ok(Self {
            trie: RwLock::new(Arc::new(trie)),
            source,
            include_private_suffixes: options.include_private_suffixes,
            mirrors: options.mirrors,
            fetcher,
            update_lock: Mutex::new(()),
        })
    }

    /// Create an extractor from suffix lists already in memory.
    pub fn from_suffix_lists(lists: &SuffixLists, include_private_suffixes: bool) -> Self {
        let trie = SuffixTrie::compile(lists.select(include_private_suffixes));
        Self {
            trie: RwLock::new(Arc::new(trie)),
            source: SuffixSource::Memory,
            include_private_suffixes,
            mirrors: Vec::new(),
            fetcher: Box::new(HttpFetcher),
            update_lock: Mutex::new(()),
        }
    }

    /// Extract the parts of a URL.
    pub fn extract(&self, request: &ExtractRequest) -> ExtractResult {
        let parts = split_host(&request.url);
        let trie = self.trie();

        if request.convert_to_punycode {
            return match to_punycode(parts.host) {
                Some(host) => ExtractResult {
                    port: parts.port,
                    ..split_host_parts(&trie, &host, request.ignore_subdomains)
                },
                None => ExtractResult::default(),
            };
        }

        ExtractResult {
            port: parts.port,
            ..split_host_parts(&trie, parts.host, request.ignore_subdomains)
        }
    }

    /// Extract the parts of a URL with default flags.
    pub fn extract_url(&self, url: &str) -> ExtractResult {
        self.extract(&ExtractRequest::new(url))
    }

    /// Current trie. Stays valid after an update swaps in a new one.
    pub fn trie(&self) -> Arc<SuffixTrie> {
        self.trie.read().clone()
    }

    /// Number of suffix list entries read into the current trie
    pub fn suffix_count(&self) -> usize {
        self.trie.read().suffix_count()
    }

    /// Check if the suffix list is the managed cache
    pub fn is_managed(&self) -> bool {
        matches!(self.source, SuffixSource::Managed(_))
    }

    /// Path of the suffix list file, if any
    pub fn cache_file_path(&self) -> Option<&Path> {
        self.source.path()
    }

    /// Download the managed cache from the mirrors and swap in a new trie.
    ///
    /// On failure the current trie stays in use.
    pub fn update(&self) -> Result<()> {
        let path = match self.source {
            SuffixSource::Managed(ref path) => path,
            SuffixSource::Custom(_) | SuffixSource::Memory => {
                return Err(TldError::NotManaged(self.source.to_string()))
            }
        };

        let _lock = self.update_lock.lock();
        let lists = download_suffix_list(path, &self.mirrors, self.fetcher.as_ref())?;
        self.swap(&lists);
        Ok(())
    }

    /// Re-read the suffix list file and swap in a new trie.
    pub fn reload(&self) -> Result<()> {
        let path = self
            .source
            .path()
            .ok_or_else(|| TldError::NotManaged(self.source.to_string()))?;

        let _lock = self.update_lock.lock();
        let lists = load_suffix_list(path)?;
        self.swap(&lists);
        Ok(())
    }

    fn swap(&self, lists: &SuffixLists) {
        let trie = Arc::new(SuffixTrie::compile(
            lists.select(self.include_private_suffixes),
        ));
        let suffixes = trie.suffix_count();
        *self.trie.write() = trie;
        tracing::info!(suffixes, "suffix trie swapped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::psl::parse_suffix_list;
    use crate::psl::source::tests::MemoryFetcher;
    use std::fs;

    const MIRROR: &str = "https://mirror.example/public_suffix_list.dat";

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tldextract_r_extractor_{}", name));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn memory_extractor() -> TldExtractor {
        let lists = parse_suffix_list(
            "com\nco.uk\nuk\n*.ck\n!www.ck\n// ===BEGIN PRIVATE DOMAINS===\nblogspot.com\n",
        );
        TldExtractor::from_suffix_lists(&lists, false)
    }

    #[test]
    fn test_options_builder_pattern() {
        let options = ExtractorOptions::new()
            .with_cache_file_path("/tmp/psl.dat")
            .with_private_suffixes(true)
            .with_data_dir("/tmp/data")
            .with_mirrors(["https://a.example", "https://b.example"])
            .with_update_interval(Duration::from_secs(60))
            .with_auto_update(false);

        assert_eq!(options.cache_file_path, Some(PathBuf::from("/tmp/psl.dat")));
        assert!(options.include_private_suffixes);
        assert_eq!(options.data_dir, Some(PathBuf::from("/tmp/data")));
        assert_eq!(options.mirrors.len(), 2);
        assert_eq!(options.update_interval, Duration::from_secs(60));
        assert!(!options.auto_update);
    }

    #[test]
    fn test_default_options() {
        let options = ExtractorOptions::default();
        assert!(options.cache_file_path.is_none());
        assert!(!options.include_private_suffixes);
        assert_eq!(options.mirrors.len(), PUBLIC_SUFFIX_LIST_SOURCES.len());
        assert_eq!(options.update_interval, DEFAULT_UPDATE_INTERVAL);
        assert!(options.auto_update);
    }

    #[test]
    fn test_resolve_source_unreachable_dir_uses_managed() {
        let options = ExtractorOptions::new()
            .with_cache_file_path("/nonexistent/dir/psl.dat")
            .with_data_dir("/tmp/managed");
        assert_eq!(
            options.resolve_source(),
            SuffixSource::Managed(PathBuf::from("/tmp/managed").join(DEFAULT_PSL_FILENAME))
        );
    }

    #[test]
    fn test_extract_with_port_and_path() {
        let extractor = memory_extractor();
        let result = extractor.extract_url("https://user@www.example.co.uk:8080/a?b=c");
        assert_eq!(result.subdomain, "www");
        assert_eq!(result.domain, "example");
        assert_eq!(result.suffix, "co.uk");
        assert_eq!(result.registered_domain, "example.co.uk");
        assert_eq!(result.port, Some(8080));
    }

    #[test]
    fn test_private_suffixes_excluded_by_default() {
        let extractor = memory_extractor();
        let result = extractor.extract_url("me.blogspot.com");
        assert_eq!(result.suffix, "com");
        assert_eq!(result.domain, "blogspot");
        assert_eq!(result.subdomain, "me");

        let lists = parse_suffix_list("com\n// ===BEGIN PRIVATE DOMAINS===\nblogspot.com\n");
        let private = TldExtractor::from_suffix_lists(&lists, true);
        let result = private.extract_url("me.blogspot.com");
        assert_eq!(result.suffix, "blogspot.com");
        assert_eq!(result.domain, "me");
    }

    #[test]
    fn test_punycode_conversion() {
        let lists = parse_suffix_list("de\nрф\n");
        let extractor = TldExtractor::from_suffix_lists(&lists, false);

        let request = ExtractRequest::new("https://www.München.de/").with_punycode(true);
        let result = extractor.extract(&request);
        assert_eq!(result.subdomain, "www");
        assert_eq!(result.domain, "xn--mnchen-3ya");
        assert_eq!(result.suffix, "de");

        // the Unicode spelling of a suffix matches without conversion too
        let result = extractor.extract_url("пример.рф");
        assert_eq!(result.domain, "пример");
        assert_eq!(result.suffix, "рф");
    }

    #[test]
    fn test_ipv4_keeps_port() {
        let extractor = memory_extractor();
        let result = extractor.extract_url("http://192.168.1.1:8000/index.html");
        assert_eq!(result.domain, "192.168.1.1");
        assert_eq!(result.registered_domain, "192.168.1.1");
        assert_eq!(result.suffix, "");
        assert_eq!(result.port, Some(8000));
    }

    #[test]
    fn test_memory_extractor_cannot_update() {
        let extractor = memory_extractor();
        assert!(!extractor.is_managed());
        assert!(extractor.cache_file_path().is_none());
        assert!(matches!(extractor.update(), Err(TldError::NotManaged(_))));
        match extractor.reload() {
            Err(TldError::NotManaged(source)) => assert_eq!(source, "in-memory list"),
            other => panic!("expected NotManaged, got {:?}", other),
        }
    }

    #[test]
    fn test_bare_file_name_is_custom_source() {
        let options = ExtractorOptions::new().with_cache_file_path("list.dat");
        assert_eq!(
            options.resolve_source(),
            SuffixSource::Custom(PathBuf::from("list.dat"))
        );

        let options = ExtractorOptions::new()
            .with_cache_file_path("/nonexistent/dir/list.dat")
            .with_data_dir("/var/cache/psl");
        assert_eq!(
            options.resolve_source(),
            SuffixSource::Managed(PathBuf::from("/var/cache/psl").join(DEFAULT_PSL_FILENAME))
        );
    }

    #[test]
    fn test_custom_list_cannot_update() {
        let dir = temp_dir("custom");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("my_list.dat");
        fs::write(&path, "com\n").unwrap();

        let extractor = TldExtractor::with_fetcher(
            ExtractorOptions::new().with_cache_file_path(&path),
            Box::new(MemoryFetcher::new(&[])),
        )
        .unwrap();

        assert!(!extractor.is_managed());
        assert_eq!(extractor.cache_file_path(), Some(path.as_path()));
        match extractor.update() {
            Err(TldError::NotManaged(source)) => {
                assert_eq!(source, format!("custom list {}", path.display()))
            }
            other => panic!("expected NotManaged, got {:?}", other),
        }

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_custom_list_missing_file_is_fatal() {
        let dir = temp_dir("custom_missing");
        fs::create_dir_all(&dir).unwrap();

        let result = TldExtractor::with_fetcher(
            ExtractorOptions::new().with_cache_file_path(dir.join("absent.dat")),
            Box::new(MemoryFetcher::new(&[])),
        );
        assert!(matches!(result, Err(TldError::SourceUnavailable { .. })));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_managed_cache_downloaded_at_startup() {
        let dir = temp_dir("managed_download");
        let fetcher = MemoryFetcher::new(&[(MIRROR, "com\nco.uk\n")]);

        let extractor = TldExtractor::with_fetcher(
            ExtractorOptions::new()
                .with_data_dir(&dir)
                .with_mirrors([MIRROR]),
            Box::new(fetcher),
        )
        .unwrap();

        assert!(extractor.is_managed());
        assert!(dir.join(DEFAULT_PSL_FILENAME).exists());
        assert_eq!(extractor.extract_url("a.example.co.uk").suffix, "co.uk");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_managed_cache_download_failure_without_file() {
        let dir = temp_dir("managed_no_file");

        let result = TldExtractor::with_fetcher(
            ExtractorOptions::new()
                .with_data_dir(&dir)
                .with_mirrors([MIRROR]),
            Box::new(MemoryFetcher::new(&[])),
        );
        assert!(matches!(result, Err(TldError::DownloadFailed { .. })));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_managed_cache_stale_download_failure_uses_existing() {
        let dir = temp_dir("managed_stale");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(DEFAULT_PSL_FILENAME), "org\n").unwrap();

        let extractor = TldExtractor::with_fetcher(
            ExtractorOptions::new()
                .with_data_dir(&dir)
                .with_mirrors([MIRROR])
                .with_update_interval(Duration::ZERO),
            Box::new(MemoryFetcher::new(&[])),
        )
        .unwrap();

        assert_eq!(extractor.extract_url("www.example.org").domain, "example");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_update_swaps_trie() {
        let dir = temp_dir("update_swap");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(DEFAULT_PSL_FILENAME), "com\n").unwrap();
        let fetcher = MemoryFetcher::new(&[(MIRROR, "com\nuk\nco.uk\n")]);

        let extractor = TldExtractor::with_fetcher(
            ExtractorOptions::new()
                .with_data_dir(&dir)
                .with_mirrors([MIRROR])
                .with_auto_update(false),
            Box::new(fetcher),
        )
        .unwrap();

        let before = extractor.trie();
        assert_eq!(extractor.extract_url("www.example.co.uk").suffix, "");
        assert_eq!(extractor.suffix_count(), 1);

        extractor.update().unwrap();

        assert_eq!(extractor.extract_url("www.example.co.uk").suffix, "co.uk");
        assert_eq!(extractor.suffix_count(), 3);
        // the old handle still answers from the old list
        assert_eq!(before.suffix_count(), 1);
        assert_eq!(split_host_parts(&before, "www.example.co.uk", false).suffix, "");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_failed_update_keeps_current_trie() {
        let dir = temp_dir("update_fail");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(DEFAULT_PSL_FILENAME), "com\n").unwrap();

        let extractor = TldExtractor::with_fetcher(
            ExtractorOptions::new()
                .with_data_dir(&dir)
                .with_mirrors([MIRROR])
                .with_auto_update(false),
            Box::new(MemoryFetcher::new(&[])),
        )
        .unwrap();

        assert!(matches!(
            extractor.update(),
            Err(TldError::DownloadFailed { .. })
        ));
        assert_eq!(extractor.extract_url("www.example.com").domain, "example");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_reload_custom_list() {
        let dir = temp_dir("reload");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("list.dat");
        fs::write(&path, "com\n").unwrap();

        let extractor =
            TldExtractor::new(ExtractorOptions::new().with_cache_file_path(&path)).unwrap();
        assert_eq!(extractor.extract_url("a.b.net").suffix, "");

        fs::write(&path, "com\nnet\n").unwrap();
        extractor.reload().unwrap();
        assert_eq!(extractor.extract_url("a.b.net").suffix, "net");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_concurrent_extraction() {
        let extractor = Arc::new(memory_extractor());

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let extractor = Arc::clone(&extractor);
                scope.spawn(move || {
                    for _ in 0..100 {
                        let result = extractor.extract_url("maps.example.co.uk");
                        assert_eq!(result.registered_domain, "example.co.uk");
                    }
                });
            }
        });
    }
}
