//! New York Times Top Stories source.
//!
//! Articles are listed through the
//! [Top Stories API](https://developer.nytimes.com/docs/top-stories-product/1/overview),
//! which returns a `results` array of `{title, abstract, url, ...}` objects.
//!
//! The full body is then pulled from the article page itself by splitting on
//! the CSS class NYT uses for story paragraphs. This is brittle by nature: when
//! the marker is missing, or anything else goes wrong, the listing abstract is
//! used instead.

use crate::models::Article;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use scraper::Html;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

const TOP_STORIES_BASE: &str = "https://api.nytimes.com/svc/topstories/v2/";

/// Opening tag of the first story paragraph on an article page.
pub const PARAGRAPH_MARKER: &str = r#"<p class="css-at9mc1 evys1bk0">"#;
const PARAGRAPH_END: &str = "</p>";

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Why the article body could not be recovered.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("article page has no story paragraph marker")]
    MissingMarker,
    #[error("story paragraph is not closed")]
    Unterminated,
}

#[derive(Debug, Deserialize)]
struct TopStories {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

/// Build the Top Stories endpoint for `section`, with the key as a query pair.
fn listing_url(section: &str, api_key: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(TOP_STORIES_BASE)?.join(&format!("{section}.json"))?;
    url.query_pairs_mut().append_pair("api-key", api_key);
    Ok(url)
}

/// Take the first `limit` articles from a Top Stories response body.
///
/// Fewer than `limit` results are returned as-is. Entries past `limit` are
/// never decoded, so a malformed one there cannot fail the listing.
pub fn parse_listing(body: &str, limit: usize) -> Result<Vec<Article>, serde_json::Error> {
    let listing: TopStories = serde_json::from_str(body)?;
    listing
        .results
        .into_iter()
        .take(limit)
        .map(serde_json::from_value::<Article>)
        .collect()
}

/// List up to `limit` articles from a Top Stories section.
///
/// # Returns
///
/// `None` when the API answers with a non-success status, the request cannot
/// be sent, or the body is not a listing. The caller treats that as terminal.
#[instrument(level = "info", skip(client, api_key))]
pub async fn index_articles(
    client: &Client,
    api_key: &str,
    section: &str,
    limit: usize,
) -> Option<Vec<Article>> {
    let url = match listing_url(section, api_key) {
        Ok(url) => url,
        Err(e) => {
            warn!(error = %e, "Invalid Top Stories section");
            return None;
        }
    };

    let response = match client.get(url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            warn!(error = %e.without_url(), "Top Stories request failed");
            return None;
        }
    };

    let status = response.status();
    if !status.is_success() {
        warn!(status = status.as_u16(), "Top Stories returned an error status");
        return None;
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!(error = %e.without_url(), "Failed reading Top Stories body");
            return None;
        }
    };

    match parse_listing(&body, limit) {
        Ok(articles) => {
            info!(count = articles.len(), "Indexed NYT articles");
            Some(articles)
        }
        Err(e) => {
            warn!(error = %e, "Top Stories body is not a listing");
            None
        }
    }
}

/// Pull the first story paragraph out of an article page.
///
/// The paragraph is located by raw substring search; any inline markup inside
/// it is reduced to text and whitespace is collapsed.
pub fn extract_story_text(html: &str) -> Result<String, ExtractError> {
    let (_, rest) = html
        .split_once(PARAGRAPH_MARKER)
        .ok_or(ExtractError::MissingMarker)?;
    let (inner, _) = rest
        .split_once(PARAGRAPH_END)
        .ok_or(ExtractError::Unterminated)?;

    let fragment = Html::parse_fragment(inner);
    let text = fragment.root_element().text().collect::<String>();
    Ok(WHITESPACE.replace_all(text.trim(), " ").into_owned())
}

async fn fetch_story_text(client: &Client, url: &str) -> Result<String, ExtractError> {
    let html = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    debug!(bytes = html.len(), "Fetched article page");
    extract_story_text(&html)
}

/// Keep extracted text, or substitute the article abstract on failure.
///
/// The error, if any, is returned alongside so the caller can mention it.
pub fn text_or_abstract(
    article: &Article,
    extracted: Result<String, ExtractError>,
) -> (String, Option<ExtractError>) {
    match extracted {
        Ok(text) => {
            info!(bytes = text.len(), "Extracted article text");
            (text, None)
        }
        Err(e) => {
            warn!(error = %e, "Falling back to article abstract");
            (article.summary.clone(), Some(e))
        }
    }
}

/// The article body, or its abstract when the page cannot be used.
#[instrument(level = "info", skip_all, fields(url = %article.url))]
pub async fn fetch_full_text(client: &Client, article: &Article) -> (String, Option<ExtractError>) {
    text_or_abstract(article, fetch_story_text(client, &article.url).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(n: usize) -> String {
        let results = (1..=n)
            .map(|i| {
                format!(
                    r#"{{"section":"world","title":"Title {i}","abstract":"Abstract {i}","url":"https://www.nytimes.com/{i}.html","byline":"By Someone"}}"#
                )
            })
            .collect::<Vec<_>>()
            .join(",");
        format!(r#"{{"status":"OK","num_results":{n},"results":[{results}]}}"#)
    }

    #[test]
    fn test_listing_url_carries_key() {
        let url = listing_url("world", "k&y").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.nytimes.com/svc/topstories/v2/world.json?api-key=k%26y"
        );
    }

    #[test]
    fn test_parse_listing_takes_first_n() {
        let articles = parse_listing(&listing(8), 5).unwrap();
        assert_eq!(articles.len(), 5);
        for (i, article) in articles.iter().enumerate() {
            let n = i + 1;
            assert_eq!(article.title, format!("Title {n}"));
            assert_eq!(article.summary, format!("Abstract {n}"));
            assert_eq!(article.url, format!("https://www.nytimes.com/{n}.html"));
        }
    }

    #[test]
    fn test_parse_listing_ignores_entries_past_limit() {
        let body = r#"{"status":"OK","results":[
            {"title":"Title 1","abstract":"Abstract 1","url":"https://www.nytimes.com/1.html"},
            {"title":"Title 2","abstract":"Abstract 2","url":"https://www.nytimes.com/2.html"},
            {"title":"Title 3","abstract":"Abstract 3","url":"https://www.nytimes.com/3.html"},
            {"title":"Title 4","abstract":"Abstract 4","url":"https://www.nytimes.com/4.html"},
            {"title":"Title 5","abstract":"Abstract 5","url":"https://www.nytimes.com/5.html"},
            {"title":"Section front","url":"https://www.nytimes.com/section/world"}
        ]}"#;
        let articles = parse_listing(body, 5).unwrap();
        assert_eq!(articles.len(), 5);
        assert_eq!(articles[4].title, "Title 5");

        assert!(parse_listing(body, 6).is_err());
    }

    #[test]
    fn test_parse_listing_accepts_short_results() {
        let articles = parse_listing(&listing(3), 5).unwrap();
        assert_eq!(articles.len(), 3);
    }

    #[test]
    fn test_parse_listing_without_results() {
        let articles = parse_listing(r#"{"status":"OK"}"#, 5).unwrap();
        assert!(articles.is_empty());
    }

    #[test]
    fn test_extract_story_text() {
        let html = r#"<html><body><p class="other">nav</p>
            <p class="css-at9mc1 evys1bk0">The <a href="/x">council</a> met
            on Tuesday.</p><p class="css-at9mc1 evys1bk0">Second.</p></body></html>"#;
        assert_eq!(
            extract_story_text(html).unwrap(),
            "The council met on Tuesday."
        );
    }

    #[test]
    fn test_extract_without_marker() {
        let html = "<html><body><p>Nothing to see</p></body></html>";
        assert!(matches!(
            extract_story_text(html),
            Err(ExtractError::MissingMarker)
        ));
    }

    #[test]
    fn test_extract_unterminated_paragraph() {
        let html = r#"<p class="css-at9mc1 evys1bk0">cut off"#;
        assert!(matches!(
            extract_story_text(html),
            Err(ExtractError::Unterminated)
        ));
    }

    #[test]
    fn test_missing_marker_uses_abstract_exactly() {
        let article = Article {
            title: "Title".into(),
            summary: "  Abstract with   spacing.  ".into(),
            url: "https://www.nytimes.com/x.html".into(),
            published: None,
        };
        let (text, err) = text_or_abstract(&article, extract_story_text("<p>paywall</p>"));
        assert_eq!(text, "  Abstract with   spacing.  ");
        assert!(matches!(err, Some(ExtractError::MissingMarker)));
    }

    #[tokio::test]
    async fn test_unreachable_page_falls_back_to_abstract() {
        let article = Article {
            title: "Title".into(),
            summary: "The abstract, verbatim.".into(),
            url: "http://127.0.0.1:1/unreachable".into(),
            published: None,
        };
        let (text, err) = fetch_full_text(&Client::new(), &article).await;
        assert_eq!(text, "The abstract, verbatim.");
        assert!(err.is_some());
    }
}
