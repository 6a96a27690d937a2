//! Suffix list sources: the managed on-disk cache and the mirrors that feed it.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::error::{DownloadErrorKind, Result, TldError};

use super::parser::{parse_suffix_list_bytes, SuffixLists};

/// Default file name of the managed suffix list cache
pub const DEFAULT_PSL_FILENAME: &str = "public_suffix_list.dat";

/// Default update interval: 3 days
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(3 * 24 * 60 * 60);

/// Mirrors tried in order when refreshing the managed cache
pub const PUBLIC_SUFFIX_LIST_SOURCES: &[&str] = &[
    "https://publicsuffix.org/list/public_suffix_list.dat",
    "https://raw.githubusercontent.com/publicsuffix/list/master/public_suffix_list.dat",
];

/// Directory holding the managed cache when none is configured
pub fn default_data_dir() -> PathBuf {
    std::env::temp_dir().join("tldextract-r")
}

/// Trait for fetching raw suffix list bytes from a mirror
pub trait SuffixListFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// HTTP fetcher
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher;

impl SuffixListFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = ureq::get(url).call().map_err(|e| TldError::DownloadFailed {
            kind: DownloadErrorKind::Request,
            message: format!("GET {} failed: {}", url, e),
        })?;

        let (_, body) = response.into_parts();
        let mut reader = body.into_reader();
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

/// Check if the cache at `path` is missing, empty or older than `max_age`
pub fn needs_download(path: &Path, max_age: Duration) -> bool {
    match fs::metadata(path) {
        Ok(meta) => {
            if meta.len() == 0 {
                return true;
            }
            match meta.modified() {
                Ok(mtime) => SystemTime::now()
                    .duration_since(mtime)
                    .map(|d| d > max_age)
                    .unwrap_or(true),
                Err(_) => true,
            }
        }
        Err(_) => true,
    }
}

/// Verify downloaded bytes form a usable suffix list
pub fn verify_suffix_list(bytes: &[u8]) -> Result<SuffixLists> {
    let lists = parse_suffix_list_bytes(bytes)?;
    if lists.public.is_empty() {
        return Err(TldError::InvalidSuffixList(
            "list contains no ICANN suffixes".to_string(),
        ));
    }
    Ok(lists)
}

/// Download the suffix list into `path`, trying `mirrors` in order.
///
/// The body is written to a temporary sibling file, verified, then renamed
/// over `path`. On success the classified lists are returned so the caller
/// does not need to re-read the file.
pub fn download_suffix_list(
    path: &Path,
    mirrors: &[String],
    fetcher: &dyn SuffixListFetcher,
) -> Result<SuffixLists> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    for url in mirrors {
        tracing::info!(url = %url, path = %path.display(), "downloading public suffix list");

        let bytes = match fetcher.fetch(url) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "mirror failed");
                continue;
            }
        };

        let lists = match verify_suffix_list(&bytes) {
            Ok(lists) => lists,
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "verification failed");
                continue;
            }
        };

        let tmp_path = path.with_extension("tmp");
        if let Err(e) = store_suffix_list(&bytes, &tmp_path, path) {
            tracing::warn!(
                url = %url,
                path = %path.display(),
                error = %e,
                "failed to store downloaded list"
            );
            let _ = fs::remove_file(&tmp_path);
            continue;
        }

        tracing::info!(
            url = %url,
            suffixes = lists.all.len(),
            "public suffix list updated"
        );
        return Ok(lists);
    }

    Err(TldError::DownloadFailed {
        kind: DownloadErrorKind::AllMirrorsFailed,
        message: format!(
            "failed to fetch the public suffix list from all {} mirrors",
            mirrors.len()
        ),
    })
}

/// Write `bytes` to `tmp_path`, then move it over `path`
fn store_suffix_list(bytes: &[u8], tmp_path: &Path, path: &Path) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp_path)?;
    file.write_all(bytes)?;
    file.flush()?;
    drop(file);
    fs::rename(tmp_path, path)
}
