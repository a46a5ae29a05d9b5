// Report generation from crawl results

use serde::{Deserialize, Serialize};
use sitecrawl_scanner::CrawlResult;
use sitecrawl_scanner::normalize::host_of;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Json,
    Text,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(ReportFormat::Json),
            "text" | "txt" => Some(ReportFormat::Text),
            _ => None,
        }
    }
}

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n";

/// Extract the path component from a URL
pub fn extract_url_path(url: &str) -> String {
    Url::parse(url)
        .ok()
        .map(|u| {
            let path = u.path().to_string();
            if path.is_empty() || path == "/" {
                "/".to_string()
            } else {
                path
            }
        })
        .unwrap_or_else(|| url.to_string())
}

pub fn render_report(
    result: &CrawlResult,
    format: ReportFormat,
    pretty: bool,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Json => generate_json_report(result, pretty),
        ReportFormat::Text => Ok(generate_text_report(result)),
    }
}

/// URL -> `{title, links}`. Compact output keeps record order; pretty output
/// sorts by URL and indents.
pub fn generate_json_report(result: &CrawlResult, pretty: bool) -> Result<String, serde_json::Error> {
    if pretty {
        serde_json::to_string_pretty(&result.pages.sorted())
    } else {
        serde_json::to_string(&result.pages)
    }
}

pub fn generate_text_report(result: &CrawlResult) -> String {
    let mut report = String::new();

    report.push_str(RULE);
    report.push_str("                             SITECRAWL REPORT\n");
    report.push_str(RULE);
    report.push('\n');

    let status = if result.interrupted {
        "Interrupted (partial results)"
    } else {
        "Completed"
    };

    report.push_str(&format!("Seed:         {}\n", result.seed));
    report.push_str(&format!(
        "Scope:        {}\n",
        result.scope_host.as_deref().unwrap_or("any host")
    ));
    report.push_str(&format!("Status:       {}\n", status));
    report.push_str(&format!("Rounds:       {}\n", result.rounds));
    report.push_str(&format!("Pages Found:  {}\n", result.pages.len()));
    report.push_str(&format!("Failed URLs:  {}\n", result.failed.len()));
    report.push_str(&format!(
        "Generated:    {}\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    report.push('\n');

    report.push_str(RULE);
    report.push_str("PAGES\n");
    report.push_str(RULE);
    report.push('\n');

    if result.pages.is_empty() {
        report.push_str("  (nothing crawled)\n\n");
    }

    let mut by_host: BTreeMap<String, Vec<(&str, &sitecrawl_scanner::PageRecord)>> =
        BTreeMap::new();
    for (url, page) in result.pages.iter() {
        let host = host_of(url).unwrap_or_else(|| "unknown".to_string());
        by_host.entry(host).or_default().push((url, page));
    }

    for (host, pages) in by_host.iter() {
        report.push_str(&format!("## {}\n", host));
        report.push_str(&format!("  {} pages found\n\n", pages.len()));

        for (idx, (url, page)) in pages.iter().enumerate() {
            let prefix = if idx == pages.len() - 1 { "└── " } else { "├── " };
            report.push_str(&format!(
                "{}{}  \"{}\" ({} links)\n",
                prefix,
                extract_url_path(url),
                page.title.trim(),
                page.links.len()
            ));
        }
        report.push('\n');
    }

    if !result.failed.is_empty() {
        report.push_str(RULE);
        report.push_str("FAILED\n");
        report.push_str(RULE);
        report.push('\n');

        for (url, reason) in result.failed.iter() {
            report.push_str(&format!("  ✗ {}  {}\n", url, reason));
        }
        report.push('\n');
    }

    report.push_str(RULE);
    report.push_str("                              End of Report\n");
    report.push_str(RULE);

    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
