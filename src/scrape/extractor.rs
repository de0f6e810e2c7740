//! Anchor extraction from listing pages.
//!
//! Markup is scanned as a stream of tags with `lol_html`. No document tree
//! is built, so each result comes from exactly one `<a>` start tag in the
//! input, in the order the tags appear.

use lol_html::errors::RewritingError;
use lol_html::{HtmlRewriter, Settings, element};
use tracing::{debug, info, instrument};

use crate::download::{DownloadError, HttpClient};

/// Scrapes listing pages for links ending in a fixed suffix.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    client: HttpClient,
    base_url: String,
    suffix: String,
}

impl LinkExtractor {
    /// Creates an extractor for the site at `base_url`.
    ///
    /// Trailing slashes are trimmed from `base_url` so that page paths and
    /// root-relative hrefs join without doubling the separator.
    #[must_use]
    pub fn new(client: HttpClient, base_url: impl Into<String>, suffix: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            suffix: suffix.into(),
        }
    }

    /// Returns the site's base origin.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the suffix links are filtered by.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Builds the listing page URL for a category path segment.
    #[must_use]
    pub fn page_url(&self, segment: &str) -> String {
        format!("{}/{}", self.base_url, segment.trim_start_matches('/'))
    }

    /// Fetches `page_url` and returns matching links in document order.
    ///
    /// The body is fed to the scanner chunk by chunk as it arrives.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the page cannot be fetched or its body
    /// breaks off midway. A page with no matching anchors is not an error.
    #[instrument(skip(self), fields(suffix = %self.suffix))]
    pub async fn extract_links(&self, page_url: &str) -> Result<Vec<String>, DownloadError> {
        let mut response = self.client.fetch_page(page_url).await?;

        let mut links = Vec::new();
        let mut scanner = AnchorScanner::new(&self.base_url, &self.suffix, &mut links);
        let mut bytes_read = 0usize;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| DownloadError::network(page_url, e))?
        {
            bytes_read += chunk.len();
            scanner
                .feed(&chunk)
                .map_err(|e| DownloadError::page_scan(page_url, e))?;
        }
        scanner
            .finish()
            .map_err(|e| DownloadError::page_scan(page_url, e))?;

        info!(page = %page_url, bytes = bytes_read, count = links.len(), "extracted links");
        Ok(links)
    }
}

/// Incremental scanner that collects matching anchor hrefs.
///
/// Feed markup in chunks of any size; tags split across chunks are
/// reassembled. A tag still open when [`finish`](Self::finish) is called is
/// discarded and never matches.
pub struct AnchorScanner<'h> {
    rewriter: HtmlRewriter<'h, fn(&[u8])>,
}

impl<'h> AnchorScanner<'h> {
    /// Creates a scanner pushing resolved matches onto `links`.
    #[must_use]
    pub fn new(base_url: &'h str, suffix: &'h str, links: &'h mut Vec<String>) -> Self {
        let base_url = base_url.trim_end_matches('/');
        let rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![element!("a[href]", move |el| {
                    if let Some(href) = el.get_attribute("href") {
                        if href.ends_with(suffix) {
                            let resolved = resolve_href(base_url, &href);
                            debug!(href = %href, url = %resolved, "matched link");
                            links.push(resolved);
                        }
                    }
                    Ok(())
                })],
                ..Settings::default()
            },
            discard_output as fn(&[u8]),
        );
        Self { rewriter }
    }

    /// Scans the next chunk of markup.
    ///
    /// # Errors
    ///
    /// Returns the rewriter's error if scanning cannot continue.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), RewritingError> {
        self.rewriter.write(chunk)
    }

    /// Ends the input.
    ///
    /// # Errors
    ///
    /// Returns the rewriter's error if the trailing input cannot be flushed.
    pub fn finish(self) -> Result<(), RewritingError> {
        self.rewriter.end()
    }
}

// Only the handler side effects are wanted, not the rewritten markup.
fn discard_output(_: &[u8]) {}

/// Returns every anchor `href` in `html` ending with `suffix`, resolved
/// against `base_url`, in document order and including duplicates.
///
/// Markup is scanned leniently. A tag cut off by the end of input never
/// matches.
///
/// # Errors
///
/// Returns the rewriter's error if scanning cannot continue.
pub fn extract_matching_links(
    html: &str,
    base_url: &str,
    suffix: &str,
) -> Result<Vec<String>, RewritingError> {
    let mut links = Vec::new();
    let mut scanner = AnchorScanner::new(base_url, suffix, &mut links);
    scanner.feed(html.as_bytes())?;
    scanner.finish()?;
    Ok(links)
}

/// Resolves an `href` against the base origin.
///
/// Fully qualified `http(s)` URLs are kept; anything else is appended to the
/// origin as-is.
#[must_use]
pub fn resolve_href(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{base_url}{href}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const BASE: &str = "https://ffxiv.tylian.net";

    #[test]
    fn test_extract_filters_by_suffix() {
        let html = r#"<html><body>
            <a href="/ex3/a.mp3">A</a>
            <a href="/ex3/b.png">B</a>
            <a href="/ex3/c.mp3">C</a>
        </body></html>"#;

        let links = extract_matching_links(html, BASE, "mp3").unwrap();

        assert_eq!(
            links,
            vec![
                "https://ffxiv.tylian.net/ex3/a.mp3".to_string(),
                "https://ffxiv.tylian.net/ex3/c.mp3".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_keeps_duplicates_in_document_order() {
        let html = r#"<a href="/x/2.mp3"></a><a href="/x/1.mp3"></a><a href="/x/2.mp3"></a>"#;

        let links = extract_matching_links(html, BASE, "mp3").unwrap();

        assert_eq!(
            links,
            vec![
                format!("{BASE}/x/2.mp3"),
                format!("{BASE}/x/1.mp3"),
                format!("{BASE}/x/2.mp3"),
            ]
        );
    }

    #[test]
    fn test_extract_no_matches_is_empty() {
        let html = r#"<p>nothing here</p><a href="/index.html">home</a><a>no href</a>"#;
        assert!(extract_matching_links(html, BASE, "mp3").unwrap().is_empty());
    }

    #[test]
    fn test_extract_empty_document() {
        assert!(extract_matching_links("", BASE, "mp3").unwrap().is_empty());
    }

    #[test]
    fn test_extract_ignores_other_elements_with_href() {
        let html = r#"<link href="/style.mp3"><area href="/map.mp3"><a href="/ok.mp3">ok</a>"#;

        let links = extract_matching_links(html, BASE, "mp3").unwrap();

        assert_eq!(links, vec![format!("{BASE}/ok.mp3")]);
    }

    #[test]
    fn test_extract_truncated_mid_tag_keeps_earlier_matches() {
        let html = r#"<a href="/ex3/a.mp3">A</a><a href="/ex3/b.mp3"#;

        let links = extract_matching_links(html, BASE, "mp3").unwrap();

        assert_eq!(links, vec![format!("{BASE}/ex3/a.mp3")]);
    }

    #[test]
    fn test_extract_truncated_after_attribute_value() {
        let html = r#"<a href="/ex3/a.mp3">A</a><a href="/ex3/b.mp3""#;

        let links = extract_matching_links(html, BASE, "mp3").unwrap();

        assert_eq!(links, vec![format!("{BASE}/ex3/a.mp3")]);
    }

    #[test]
    fn test_extract_matches_uppercase_tag_names() {
        let html = r#"<A HREF="/ex1/Loud.mp3">loud</A>"#;

        let links = extract_matching_links(html, BASE, "mp3").unwrap();

        assert_eq!(links, vec![format!("{BASE}/ex1/Loud.mp3")]);
    }

    #[test]
    fn test_extract_suffix_is_case_sensitive() {
        let html = r#"<a href="/ex1/a.MP3">a</a>"#;
        assert!(extract_matching_links(html, BASE, "mp3").unwrap().is_empty());
    }

    #[test]
    fn test_extract_trims_base_trailing_slash() {
        let html = r#"<a href="/ex2/a.mp3">a</a>"#;

        let links = extract_matching_links(html, "https://ffxiv.tylian.net/", "mp3").unwrap();

        assert_eq!(links, vec![format!("{BASE}/ex2/a.mp3")]);
    }

    #[test]
    fn test_resolve_href_keeps_absolute_urls() {
        assert_eq!(
            resolve_href(BASE, "https://cdn.example.test/a.mp3"),
            "https://cdn.example.test/a.mp3"
        );
        assert_eq!(resolve_href(BASE, "/ex3/a.mp3"), format!("{BASE}/ex3/a.mp3"));
    }

    #[test]
    fn test_page_url_joins_segment() {
        let extractor = LinkExtractor::new(HttpClient::new(), "https://ffxiv.tylian.net/", "mp3");
        assert_eq!(extractor.page_url("ex3"), "https://ffxiv.tylian.net/ex3");
        assert_eq!(extractor.base_url(), BASE);
        assert_eq!(extractor.suffix(), "mp3");
    }

    #[test]
    fn test_extract_unclosed_anchor_counted_once() {
        let html = r#"<p><a href="/ex3/a.mp3">A</p><p>next paragraph</p>"#;

        let links = extract_matching_links(html, BASE, "mp3").unwrap();

        assert_eq!(links, vec![format!("{BASE}/ex3/a.mp3")]);
    }

    #[test]
    fn test_extract_misnested_anchors_follow_start_tags() {
        let html = r#"<a href="/1.mp3"><div>text<a href="/2.mp3">x</a></div>"#;

        let links = extract_matching_links(html, BASE, "mp3").unwrap();

        assert_eq!(links, vec![format!("{BASE}/1.mp3"), format!("{BASE}/2.mp3")]);
    }

    #[test]
    fn test_extract_formatting_reopened_across_blocks_counted_once() {
        let html = r#"<b><a href="/ex1/x.mp3">x</b><div>after</div><table><td>cell</td></table>"#;

        let links = extract_matching_links(html, BASE, "mp3").unwrap();

        assert_eq!(links, vec![format!("{BASE}/ex1/x.mp3")]);
    }

    #[test]
    fn test_scanner_reassembles_tags_split_across_chunks() {
        let html = r#"<ul><li><a href="/ex2/first.mp3">1</a></li><li><a href="/ex2/second.mp3">2</a></li></ul>"#;
        let mut links = Vec::new();
        let mut scanner = AnchorScanner::new(BASE, "mp3", &mut links);
        for chunk in html.as_bytes().chunks(5) {
            scanner.feed(chunk).unwrap();
        }
        scanner.finish().unwrap();

        assert_eq!(
            links,
            vec![format!("{BASE}/ex2/first.mp3"), format!("{BASE}/ex2/second.mp3")]
        );
    }

    #[test]
    fn test_scanner_drops_tag_open_at_finish() {
        let mut links = Vec::new();
        let mut scanner = AnchorScanner::new(BASE, "mp3", &mut links);
        scanner.feed(br#"<a href="/ex3/a.mp3">A</a>"#).unwrap();
        scanner.feed(br#"<a href="/ex3/b"#).unwrap();
        scanner.feed(br#".mp3" class="song""#).unwrap();
        scanner.finish().unwrap();

        assert_eq!(links, vec![format!("{BASE}/ex3/a.mp3")]);
    }

    #[test]
    fn test_extract_ignores_anchor_text_inside_script() {
        let html = r#"<script>var s = '<a href="/ex3/fake.mp3">';</script><a href="/ex3/real.mp3">r</a>"#;

        let links = extract_matching_links(html, BASE, "mp3").unwrap();

        assert_eq!(links, vec![format!("{BASE}/ex3/real.mp3")]);
    }
}
