mod echo;

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use folio_core::{Article, FolioError, HttpOptions, OutputFormat, ReadOptions, Reader};
use owo_colors::OwoColorize;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::echo::{
    print_article_details, print_banner, print_error, print_info, print_step, print_success, print_timing,
    print_warning,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for the article
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Markdown,
    Html,
    Text,
    Json,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: markdown, html, text, json", s)),
        }
    }
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Markdown => OutputFormat::Markdown,
            Format::Html => OutputFormat::Html,
            Format::Text => OutputFormat::PlainText,
            Format::Json => OutputFormat::Json,
        }
    }
}

/// Read web articles into clean HTML, Markdown or text
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Read web articles into clean HTML, Markdown or text", long_about = None)]
struct Args {
    /// Article URL (http or https)
    #[arg(value_name = "URL")]
    url: String,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (markdown, html, text, json)
    #[arg(short, long, default_value = "markdown", value_name = "FORMAT")]
    format: Format,

    /// HTTP timeout in seconds (default: none)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Send the mobile User-Agent
    #[arg(long)]
    mobile: bool,

    /// Follow "next page" links and merge them into one article
    #[arg(long)]
    multipage: bool,

    /// Maximum number of pages merged by --multipage
    #[arg(long, default_value = "10", value_name = "NUM")]
    page_limit: usize,

    /// Keep in-page anchors as #fragment links
    #[arg(long)]
    deep_links: bool,

    /// Emit a full HTML document instead of the body fragment
    #[arg(long)]
    headers: bool,

    /// Do not prepend the article title as a heading
    #[arg(long)]
    no_headline: bool,

    /// Decode with the HTTP header charset when it disagrees with the document
    #[arg(long)]
    prefer_header_encoding: bool,

    /// Replace images with numbered <!--IMG_n--> markers
    #[arg(long)]
    placeholders: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn http_options(&self) -> HttpOptions {
        let defaults = HttpOptions::default();
        HttpOptions {
            request_timeout: self.timeout,
            use_mobile_user_agent: self.mobile,
            user_agent: self.user_agent.clone().unwrap_or_else(|| defaults.user_agent.clone()),
            user_agent_mobile: self.user_agent.clone().unwrap_or_else(|| defaults.user_agent_mobile.clone()),
            multipage_limit: self.page_limit,
            ..defaults
        }
    }

    fn read_options(&self) -> ReadOptions {
        ReadOptions::builder()
            .include_headers(self.headers)
            .include_headline(!self.no_headline)
            .use_deep_links(self.deep_links)
            .prefer_html_encoding(!self.prefer_header_encoding)
            .multipage_download(self.multipage)
            .replace_images_with_placeholders(self.placeholders)
            .build()
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "folio_core=debug" } else { "folio_core=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Cancels `token` on the first Ctrl-C.
fn cancel_on_interrupt(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });
}

async fn read_article(args: &Args, cancel: &CancellationToken) -> anyhow::Result<Article> {
    let reader = Reader::with_http_options(args.http_options()).context("Failed to build HTTP client")?;
    let options = args.read_options();

    match reader.read_with_cancellation(&args.url, &options, cancel).await {
        Ok(article) => Ok(article),
        Err(FolioError::Cancelled) => {
            print_error("Interrupted");
            Err(FolioError::Cancelled.into())
        }
        Err(err) => Err(err).with_context(|| format!("Failed to read {}", args.url)),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
        print_step(1, 3, &format!("Reading {}", args.url.bright_white().underline()));
    }

    let cancel = CancellationToken::new();
    cancel_on_interrupt(cancel.clone());

    let started = Instant::now();
    let article = read_article(&args, &cancel).await?;

    if args.verbose {
        print_timing("Read", started.elapsed());
        print_article_details(&article);
        print_step(2, 3, &format!("Rendering {:?}", args.format));
    }

    if !article.content_extracted {
        print_warning("No readable content found; output is the page body");
    }

    let output = article.to_format(args.format.into()).context("Failed to render article")?;

    if args.verbose {
        print_step(3, 3, "Writing output");
    }

    match &args.output {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    Ok(())
}
