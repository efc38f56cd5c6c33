use quick_xml::events::Event;
use quick_xml::Reader;
use url::Url;

use seocrawl_core::urltools;

/// Extract `<loc>` entries from a `urlset` or `sitemapindex` document.
/// Single-entry and multi-entry documents are handled identically since
/// both shapes just nest `<loc>` under a repeated child element. Malformed
/// XML yields an empty list rather than propagating an error.
pub fn parse_sitemap(base_url: &Url, xml: &str) -> Vec<Url> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut urls = Vec::new();
    let mut in_loc = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"loc" => {
                in_loc = true;
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"loc" => {
                in_loc = false;
            }
            Ok(Event::Text(t)) if in_loc => {
                if let Ok(text) = t.unescape() {
                    if let Some(url) = urltools::normalize(base_url, text.trim()) {
                        urls.push(url);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn parses_urlset_with_multiple_entries() {
        let xml = r#"<?xml version="1.0"?>
        <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
          <url><loc>https://example.com/a</loc></url>
          <url><loc>https://example.com/b</loc></url>
        </urlset>"#;
        let urls = parse_sitemap(&u("https://example.com/"), xml);
        assert_eq!(
            urls.iter().map(Url::as_str).collect::<Vec<_>>(),
            vec!["https://example.com/a", "https://example.com/b"]
        );
    }

    #[test]
    fn parses_single_entry_urlset_same_as_multi() {
        let xml = r#"<urlset><url><loc>https://example.com/only</loc></url></urlset>"#;
        let urls = parse_sitemap(&u("https://example.com/"), xml);
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0].as_str(), "https://example.com/only");
    }

    #[test]
    fn parses_sitemapindex() {
        let xml = r#"<sitemapindex>
          <sitemap><loc>https://example.com/sitemap-1.xml</loc></sitemap>
          <sitemap><loc>https://example.com/sitemap-2.xml</loc></sitemap>
        </sitemapindex>"#;
        let urls = parse_sitemap(&u("https://example.com/"), xml);
        assert_eq!(urls.len(), 2);
    }

    #[test]
    fn malformed_xml_yields_empty_list() {
        let xml = "<urlset><url><loc>https://example.com/a</loc>";
        let urls = parse_sitemap(&u("https://example.com/"), xml);
        assert!(urls.len() <= 1);
    }

    #[test]
    fn relative_locs_are_resolved_against_base() {
        let xml = r#"<urlset><url><loc>/relative</loc></url></urlset>"#;
        let urls = parse_sitemap(&u("https://example.com/"), xml);
        assert_eq!(urls[0].as_str(), "https://example.com/relative");
    }
}
