use crate::models::{Document, HEADING_LEVELS, Headings};
use once_cell::sync::Lazy;
use scraper::{Html, Node, Selector};
use std::collections::BTreeMap;
use url::Url;

// Cached selectors, parsed once per process
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("title selector should be valid"));
static META_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[name]").expect("meta[name] selector should be valid"));
static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("a[href] selector should be valid"));
static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("img selector should be valid"));
static HEADING_SELECTORS: Lazy<[Selector; HEADING_LEVELS]> = Lazy::new(|| {
    std::array::from_fn(|idx| {
        Selector::parse(&format!("h{}", idx + 1)).expect("heading selector should be valid")
    })
});

/// Elements whose text never reaches the reader
const HIDDEN_TEXT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Parses `html` into a [`Document`], resolving links against `base_url`.
///
/// Malformed markup never fails: anything missing comes back empty.
pub fn parse(html: &str, base_url: &str) -> Document {
    let document = Html::parse_document(html);
    let base = Url::parse(base_url).ok();

    Document {
        url: base_url.to_string(),
        title: extract_title(&document),
        meta_tags: extract_meta_tags(&document),
        headings: extract_headings(&document),
        body_text: extract_body_text(&document),
        links: extract_links(&document, base.as_ref()),
        image_alt_texts: extract_image_alts(&document),
    }
}

fn extract_title(document: &Html) -> String {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

fn extract_meta_tags(document: &Html) -> BTreeMap<String, String> {
    let mut metas = BTreeMap::new();

    for element in document.select(&META_SELECTOR) {
        if let Some(name) = element.value().attr("name")
            && !name.is_empty()
        {
            let content = element.value().attr("content").unwrap_or("");
            // Later tags overwrite earlier ones with the same name
            metas.insert(name.to_string(), content.to_string());
        }
    }

    metas
}

fn extract_headings(document: &Html) -> Headings {
    Headings::new(std::array::from_fn(|idx| {
        document
            .select(&HEADING_SELECTORS[idx])
            .map(|el| el.text().collect::<String>().trim().to_string())
            .collect()
    }))
}

fn extract_body_text(document: &Html) -> String {
    let mut parts = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            matches!(ancestor.value(), Node::Element(el) if HIDDEN_TEXT_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(" ")
}

fn extract_links(document: &Html, base: Option<&Url>) -> Vec<String> {
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|el| el.value().attr("href"))
        .map(|href| resolve_href(base, href))
        .collect()
}

/// Joins `href` onto `base`, keeping the raw href when that is impossible
pub fn resolve_href(base: Option<&Url>, href: &str) -> String {
    base.and_then(|base| base.join(href).ok())
        .map(|url| url.to_string())
        .unwrap_or_else(|| href.to_string())
}

fn extract_image_alts(document: &Html) -> Vec<String> {
    document
        .select(&IMG_SELECTOR)
        .map(|el| el.value().attr("alt").unwrap_or("").to_string())
        .collect()
}
