use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use sitecrawl_core::crawl::CrawlOptions;
use sitecrawl_core::report::{ReportFormat, render_report, save_report};
use sitecrawl_scanner::{CrawlResult, RetryPolicy, ScopeMode};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{Level, warn};
use url::Url;

/// Where and how the finished crawl is written.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: ReportFormat,
    pub pretty: bool,
    pub output: Option<PathBuf>,
}

/// Parse a seed URL, adding http:// when it has no http(s) scheme
pub fn parse_url_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    // Try to parse as-is
    if let Ok(url) = Url::parse(line)
        && matches!(url.scheme(), "http" | "https")
        && url.host_str().is_some()
    {
        return Some(line.to_string());
    }

    // Try adding http://
    let with_scheme = format!("http://{}", line);
    if let Ok(url) = Url::parse(&with_scheme)
        && url.host_str().is_some()
    {
        return Some(with_scheme);
    }

    warn!("Skipping invalid URL '{}'", line);
    None
}

/// Expand `~` in a user supplied output path
pub fn resolve_output_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

pub fn crawl_options_from_args(args: &ArgMatches, show_progress_bars: bool) -> Result<CrawlOptions> {
    let raw_url = args
        .get_one::<String>("url")
        .ok_or_else(|| anyhow!("--url is required"))?;
    let url = parse_url_line(raw_url).ok_or_else(|| anyhow!("Invalid seed URL '{}'", raw_url))?;

    let scope = if args.get_flag("any-host") {
        ScopeMode::AnyHost
    } else {
        ScopeMode::SameHost
    };

    let retry_policy = match args.get_one::<String>("retry-policy").map(String::as_str) {
        Some("never") => RetryPolicy::Never,
        _ => RetryPolicy::OnRediscovery,
    };

    Ok(CrawlOptions {
        url,
        threads: args.get_one::<usize>("threads").copied().unwrap_or(10),
        timeout_secs: args.get_one::<u64>("timeout").copied().unwrap_or(10),
        scope,
        retry_policy,
        show_progress_bars,
    })
}

pub fn output_options_from_args(args: &ArgMatches) -> Result<OutputOptions> {
    let format_name = args
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("json");
    let format = ReportFormat::from_str(format_name)
        .ok_or_else(|| anyhow!("Unknown report format '{}'", format_name))?;

    Ok(OutputOptions {
        format,
        pretty: args.get_flag("pretty"),
        output: args
            .get_one::<String>("output")
            .map(|raw| resolve_output_path(raw)),
    })
}

/// Render the crawl result and write it to the output file or stdout
pub fn emit_report(result: &CrawlResult, options: &OutputOptions) -> Result<()> {
    let content = render_report(result, options.format, options.pretty)
        .context("Failed to render report")?;

    match options.output {
        Some(ref path) => save_report(&content, path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", content).context("Failed to write report to stdout")?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout carries only the report.
pub fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}
