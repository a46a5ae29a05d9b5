use crate::normalize::normalize;
use crate::result::PageRecord;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Title recorded for pages without a `<title>` element.
pub const MISSING_TITLE: &str = "None";

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("static selector"));
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));

/// Pull the title and every anchor href out of `page_content`.
///
/// Links keep their order of appearance and are not deduplicated. Each href
/// is resolved with [`normalize`] against `base_url`.
pub fn extract(page_content: &str, base_url: &str) -> PageRecord {
    let document = Html::parse_document(page_content);

    let title = match document.select(&TITLE_SELECTOR).next() {
        Some(element) => element.text().collect::<String>(),
        None => {
            debug!("No title element on {}", base_url);
            MISSING_TITLE.to_string()
        }
    };

    let mut links = Vec::new();
    for element in document.select(&LINK_SELECTOR) {
        if let Some(href) = element.value().attr("href") {
            match normalize(base_url, href) {
                Ok(absolute_url) => links.push(absolute_url),
                Err(e) => warn!("Dropping link {:?} on {}: {}", href, base_url, e),
            }
        }
    }

    PageRecord::new(title, links)
}
