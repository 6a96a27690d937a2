use std::path::PathBuf;
use std::process;

use log::{error, LevelFilter};
use structopt::StructOpt;

use tldextract_r::{ExtractRequest, ExtractResult, ExtractorOptions, TldExtractor};

/// Extract subdomain, domain, suffix and registered domain from URLs.
#[derive(Debug, StructOpt)]
#[structopt(name = "tldextract")]
struct Opt {
    /// Include PRIVATE suffixes (e.g. blogspot.com)
    #[structopt(short = "p", long = "private")]
    private: bool,

    /// Convert hosts to Punycode before matching
    #[structopt(long)]
    punycode: bool,

    /// Leave the subdomain empty
    #[structopt(short = "i", long = "ignore-subdomains")]
    ignore_subdomains: bool,

    /// Custom Public Suffix List file
    #[structopt(long = "cache", parse(from_os_str))]
    cache: Option<PathBuf>,

    /// Refresh the managed Public Suffix List before extracting
    #[structopt(long)]
    update: bool,

    /// Print results as JSON lines
    #[structopt(long)]
    json: bool,

    /// Verbose logging
    #[structopt(short = "v", long)]
    verbose: bool,

    /// URLs or hostnames
    #[structopt(required = true)]
    urls: Vec<String>,
}

fn print_plain(url: &str, result: &ExtractResult) {
    println!("{}", url);
    println!("  subdomain:         {}", result.subdomain);
    println!("  domain:            {}", result.domain);
    println!("  suffix:            {}", result.suffix);
    println!("  registered domain: {}", result.registered_domain);
    if let Some(port) = result.port {
        println!("  port:              {}", port);
    }
}

fn main() {
    let opt = Opt::from_args();

    let level = if opt.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let mut options = ExtractorOptions::new().with_private_suffixes(opt.private);
    if let Some(ref path) = opt.cache {
        options = options.with_cache_file_path(path);
    }

    let extractor = match TldExtractor::new(options) {
        Ok(extractor) => extractor,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    if opt.update {
        if let Err(e) = extractor.update() {
            error!("{}", e);
            process::exit(1);
        }
    }

    for url in &opt.urls {
        let request = ExtractRequest::new(url.as_str())
            .with_punycode(opt.punycode)
            .with_ignore_subdomains(opt.ignore_subdomains);
        let result = extractor.extract(&request);

        if opt.json {
            match serde_json::to_string(&result) {
                Ok(line) => println!("{}", line),
                Err(e) => error!("{}: {}", url, e),
            }
        } else {
            print_plain(url, &result);
        }
    }
}
