pub mod crawl;
pub mod report;

use colored::Colorize;

pub fn print_banner() {
    eprintln!(
        "{} {}",
        "sitecrawl".bright_cyan().bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    eprintln!("{}", "same-site page and link mapper".dimmed());
    eprintln!();
}
