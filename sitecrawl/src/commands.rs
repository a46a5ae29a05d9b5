use clap::{arg, command};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitecrawl")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitecrawl")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and progress output").required(false))
        .arg(
            arg!(-v --"verbose" ... "Increase log verbosity (-v info, -vv debug)")
                .required(false)
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl a site from a seed URL and emit a map of every page's title and \
                links.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The seed URL to crawl (http:// is assumed when no scheme is given)"),
                )
                .arg(
                    arg!(--"any-host")
                        .required(false)
                        .help("Follow links to any host (default: stay on the seed's host)")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(-t --"threads" <NUM_WORKERS>)
                        .required(false)
                        .help("The number of concurrent fetches per round.")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("Request timeout in seconds")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .default_value("10"),
                )
                .arg(
                    arg!(--"retry-policy" <POLICY>)
                        .required(false)
                        .help(
                            "What to do with URLs that failed: retry when another page links \
                        to them again, or never fetch them again",
                        )
                        .value_parser(["rediscover", "never"])
                        .default_value("rediscover"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: print to stdout)"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: json, text")
                        .value_parser(["json", "text"])
                        .default_value("json"),
                )
                .arg(
                    arg!(--"pretty")
                        .required(false)
                        .help("Indent JSON output and sort it by URL")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}
