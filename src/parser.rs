use crate::models::{ItemRecord, UNNAMED};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::debug;

/// Present once the shop grid has been rendered.
pub const LISTING_MARKER: &str = "a.kfds-c-shop-item";
/// Present once the product carousel of a detail page has been rendered.
pub const DETAIL_MARKER: &str = "img.kfds-c-carousel-product-img";

const NAME_SELECTOR: &str = "span.shop-item-title.kfds-font-size-22.kfds-font-bold.break-long-words";
const TAG_ROW_SELECTOR: &str = "li.kfds-lyt-between.kfds-font-size-hint";
const DESC_CONTAINER_SELECTOR: &str = "div.kfds-c-product-detail-res-width";
const DESC_SELECTOR: &str = "p.line-breaks.kfds-c-word-wrap";
const PRICE_SELECTOR: &str = "span.kfds-font-size-24.kfds-font-bold";

// Tag rows also carry the "N sold" counter, which is not a tag.
const SOLD_MARKER: &str = "sold";

fn selector(css: &str) -> Selector {
    // Only called with the constant selectors above.
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e:?}"))
}

fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>()
}

/// Collects the item links of a rendered shop page, in page order and
/// without duplicates.
pub fn parse_listing(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let link_selector = selector(LISTING_MARKER);

    let mut ids = Vec::new();
    let mut seen_hrefs: HashSet<&str> = HashSet::new();
    for element in document.select(&link_selector) {
        if let Some(href) = element.value().attr("href") {
            if !href.is_empty() && seen_hrefs.insert(href) {
                ids.push(href.to_string());
            }
        }
    }

    ids
}

/// Extracts an item record from a rendered detail page. Every field is
/// looked up on its own; a missing node only defaults that one field.
pub fn parse_item(html: &str) -> ItemRecord {
    let document = Html::parse_document(html);

    let record = ItemRecord {
        name: extract_name(&document),
        image: extract_image(&document),
        tags: extract_tags(&document),
        description: extract_description(&document),
        price: extract_price(&document),
    };

    debug!("Name found: {}", record.name);
    debug!("Image found: {}", record.image);
    debug!("Tags found: {}", record.tags);
    debug!("Description found: {}", record.description);
    debug!("Price found: {}", record.price);

    record
}

fn extract_name(document: &Html) -> String {
    document
        .select(&selector(NAME_SELECTOR))
        .next()
        .map(|el| element_text(el).trim().to_string())
        .unwrap_or_else(|| UNNAMED.to_string())
}

fn extract_image(document: &Html) -> String {
    document
        .select(&selector(DETAIL_MARKER))
        .next()
        .and_then(|el| el.value().attr("src"))
        .unwrap_or_default()
        .to_string()
}

fn extract_tags(document: &Html) -> String {
    let span_selector = selector("span");

    for row in document.select(&selector(TAG_ROW_SELECTOR)) {
        if let Some(span) = row.select(&span_selector).next() {
            let text = element_text(span);
            if !text.contains(SOLD_MARKER) {
                return text.trim().to_string();
            }
        }
    }

    String::new()
}

fn extract_description(document: &Html) -> String {
    document
        .select(&selector(DESC_CONTAINER_SELECTOR))
        .next()
        .and_then(|container| container.select(&selector(DESC_SELECTOR)).next())
        .map(|el| element_text(el).trim().to_string())
        .unwrap_or_default()
}

fn extract_price(document: &Html) -> String {
    document
        .select(&selector(PRICE_SELECTOR))
        .next()
        .map(|el| element_text(el).trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAIL_PAGE: &str = r#"
        <html><body>
          <div class="kfds-c-carousel">
            <img class="kfds-c-carousel-product-img" src="https://storage.ko-fi.com/cdn/useruploads/post/abc.png">
          </div>
          <span class="shop-item-title kfds-font-size-22 kfds-font-bold break-long-words">
            Sketch Commission
          </span>
          <ul>
            <li class="kfds-lyt-between kfds-font-size-hint"><span>12 sold</span></li>
            <li class="kfds-lyt-between kfds-font-size-hint"><span> Commission </span><span>ignored</span></li>
            <li class="kfds-lyt-between kfds-font-size-hint"><span>Digital</span></li>
          </ul>
          <div class="kfds-c-product-detail-res-width">
            <p class="line-breaks kfds-c-word-wrap">
              One character, flat colours.
            </p>
          </div>
          <span class="kfds-font-size-24 kfds-font-bold"> $15 </span>
        </body></html>
    "#;

    #[test]
    fn parses_all_fields_from_detail_page() {
        let record = parse_item(DETAIL_PAGE);
        assert_eq!(record.name, "Sketch Commission");
        assert_eq!(record.image, "https://storage.ko-fi.com/cdn/useruploads/post/abc.png");
        assert_eq!(record.tags, "Commission");
        assert_eq!(record.description, "One character, flat colours.");
        assert_eq!(record.price, "$15");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let record = parse_item("<html><body><p>Nothing to see</p></body></html>");
        assert_eq!(
            record,
            ItemRecord {
                name: "Unnamed".to_string(),
                image: String::new(),
                tags: String::new(),
                description: String::new(),
                price: String::new(),
            }
        );
    }

    #[test]
    fn one_missing_field_keeps_the_others() {
        let html = DETAIL_PAGE.replace("kfds-font-size-24 kfds-font-bold", "something-else");
        let record = parse_item(&html);
        assert_eq!(record.price, "");
        assert_eq!(record.name, "Sketch Commission");
        assert_eq!(record.tags, "Commission");
    }

    #[test]
    fn tags_empty_when_every_row_is_a_sold_counter() {
        let html = r#"
            <li class="kfds-lyt-between kfds-font-size-hint"><span>3 sold</span></li>
            <li class="kfds-lyt-between kfds-font-size-hint">no span here</li>
        "#;
        assert_eq!(parse_item(html).tags, "");
    }

    #[test]
    fn sold_check_is_case_sensitive() {
        let html = r#"<li class="kfds-lyt-between kfds-font-size-hint"><span>SOLD OUT soon</span></li>"#;
        assert_eq!(parse_item(html).tags, "SOLD OUT soon");
    }

    #[test]
    fn image_without_src_defaults_to_empty() {
        let html = r#"<img class="kfds-c-carousel-product-img">"#;
        assert_eq!(parse_item(html).image, "");
    }

    #[test]
    fn description_needs_its_container() {
        let html = r#"<p class="line-breaks kfds-c-word-wrap">Loose paragraph</p>"#;
        assert_eq!(parse_item(html).description, "");
    }

    #[test]
    fn listing_keeps_page_order_and_drops_duplicates() {
        let html = r#"
            <div>
              <a class="kfds-c-shop-item" href="/s/b2">B</a>
              <a class="kfds-c-shop-item" href="/s/a1">A</a>
              <a class="kfds-c-shop-item" href="/s/b2">B again</a>
              <a class="kfds-c-shop-item">no link</a>
              <a class="other" href="/s/zz">not an item</a>
              <a class="kfds-c-shop-item" href="/s/c3">C</a>
            </div>
        "#;
        assert_eq!(parse_listing(html), vec!["/s/b2", "/s/a1", "/s/c3"]);
    }

    #[test]
    fn large_listing_with_repeats_is_deduplicated() {
        let mut html = String::from("<div>");
        for round in 0..3 {
            for n in 0..500 {
                html.push_str(&format!(r#"<a class="kfds-c-shop-item" href="/s/{n}">{round}</a>"#));
            }
        }
        html.push_str("</div>");

        let ids = parse_listing(&html);
        assert_eq!(ids.len(), 500);
        assert_eq!(ids.first().map(String::as_str), Some("/s/0"));
        assert_eq!(ids.last().map(String::as_str), Some("/s/499"));
    }

    #[test]
    fn empty_shop_lists_nothing() {
        assert!(parse_listing("<html><body></body></html>").is_empty());
    }
}
