use clap::ArgMatches;
use colored::Colorize;
use sitecrawl::commands::command_argument_builder;
use sitecrawl::handlers::{
    crawl_options_from_args, emit_report, init_tracing, output_options_from_args,
};
use sitecrawl_core::crawl::execute_crawl;
use sitecrawl_core::print_banner;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    init_tracing(chosen_command.get_count("verbose"));

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    match chosen_command.subcommand() {
        Some(("crawl", primary_command)) => {
            if let Err(e) = handle_crawl(primary_command, quiet).await {
                eprintln!("{} {:#}", "[!]".red().bold(), e);
                std::process::exit(1);
            }
        }
        _ => {
            // No subcommand provided, show usage
            let _ = command_argument_builder().print_help();
        }
    }
}

async fn handle_crawl(sub_matches: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    let options = crawl_options_from_args(sub_matches, !quiet)?;
    let output = output_options_from_args(sub_matches)?;

    if !quiet {
        eprintln!("{} {}", "Crawling".bright_cyan().bold(), options.url);
        eprintln!("Workers: {}", options.threads);
        eprintln!("Timeout: {}s", options.timeout_secs);
        eprintln!("Scope:   {:?}\n", options.scope);
    }

    let progress_callback: Option<sitecrawl::CrawlProgressCallback> = if quiet {
        None
    } else {
        Some(Arc::new(|msg: String| tracing::debug!("{}", msg)))
    };

    let result = execute_crawl(options, progress_callback).await?;

    if !quiet {
        if result.interrupted {
            eprintln!(
                "{} Interrupted: emitting {} pages recorded so far",
                "[!]".yellow().bold(),
                result.pages.len()
            );
        } else if result.is_empty() {
            eprintln!("{} Nothing to crawl: the seed could not be fetched", "[!]".yellow().bold());
        } else {
            eprintln!(
                "{} Crawled {} pages in {} rounds ({} failed)",
                "[+]".green().bold(),
                result.pages.len(),
                result.rounds,
                result.failed.len()
            );
        }
    }

    emit_report(&result, &output)?;

    if let Some(ref path) = output.output
        && !quiet
    {
        eprintln!("{} Report saved to {}", "[+]".green().bold(), path.display());
    }

    Ok(())
}
