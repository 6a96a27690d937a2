pub mod parser;
pub mod source;

pub use parser::{
    load_suffix_list, parse_suffix_list, parse_suffix_list_bytes, SuffixLists,
    PRIVATE_DOMAINS_MARKER,
};
pub use source::{
    default_data_dir, download_suffix_list, needs_download, verify_suffix_list, HttpFetcher,
    SuffixListFetcher, DEFAULT_PSL_FILENAME, DEFAULT_UPDATE_INTERVAL, PUBLIC_SUFFIX_LIST_SOURCES,
};
