pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    OutputOptions, crawl_options_from_args, emit_report, output_options_from_args,
    parse_url_line, resolve_output_path,
};

// Re-export crawl functionality from sitecrawl-core
pub use sitecrawl_core::crawl::{CrawlOptions, CrawlProgressCallback, execute_crawl};
