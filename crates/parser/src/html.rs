use scraper::{Html, Selector};
use url::Url;

use seocrawl_core::{urltools, ParsedPage};

/// Extract title, meta description, canonical link, headings, links and
/// image alt text from one HTML document. `page_url` is the URL the
/// document was fetched from (used to resolve relative links); `base_url`
/// is the crawl's seed URL (used to decide internal vs external).
pub fn parse_html(page_url: &Url, base_url: &Url, html_str: &str) -> ParsedPage {
    let document = Html::parse_document(html_str);

    let title = selector("title")
        .and_then(|s| document.select(&s).next())
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    let meta_description = extract_meta_content(&document, "description");

    let canonical = selector("link[rel='canonical' i]")
        .and_then(|s| document.select(&s).next())
        .and_then(|el| el.value().attr("href"))
        .and_then(|href| urltools::normalize(page_url, href))
        .map(|u| u.to_string());

    let headings = extract_headings(&document);
    let (internal_links, external_links) = extract_links(&document, page_url, base_url);
    let images = extract_images(&document);

    ParsedPage {
        title,
        meta_description,
        canonical,
        headings,
        internal_links,
        external_links,
        images,
    }
}

fn selector(s: &str) -> Option<Selector> {
    Selector::parse(s).ok()
}

fn extract_headings(document: &Html) -> Vec<(String, String)> {
    let Some(sel) = selector("h1, h2, h3, h4, h5, h6") else {
        return vec![];
    };
    document
        .select(&sel)
        .filter_map(|el| {
            let text = el.text().collect::<String>().trim().to_string();
            if text.is_empty() {
                return None;
            }
            Some((el.value().name().to_ascii_lowercase(), text))
        })
        .collect()
}

fn extract_links(document: &Html, page_url: &Url, base_url: &Url) -> (Vec<String>, Vec<String>) {
    let mut internal = Vec::new();
    let mut external = Vec::new();
    let Some(sel) = selector("a[href]") else {
        return (internal, external);
    };
    for el in document.select(&sel) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        if href.is_empty() {
            continue;
        }
        let Some(resolved) = urltools::normalize(page_url, href) else {
            continue;
        };
        if !urltools::allowed_scheme(&resolved) {
            continue;
        }
        if urltools::same_host(&resolved, base_url) {
            internal.push(resolved.to_string());
        } else {
            external.push(resolved.to_string());
        }
    }
    (internal, external)
}

fn extract_images(document: &Html) -> Vec<String> {
    let Some(sel) = selector("img[alt]") else {
        return vec![];
    };
    document
        .select(&sel)
        .filter_map(|el| {
            el.value()
                .attr("alt")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
        .collect()
}

fn extract_meta_content(document: &Html, name: &str) -> Option<String> {
    let sel_str = format!("meta[name='{name}' i]");
    selector(&sel_str)
        .and_then(|s| document.select(&s).next())
        .and_then(|el| el.value().attr("content").map(|s| s.to_string()))
}
