//! Data models shared across the pipeline.
//!
//! This module defines the transient, per-run data structures:
//! - [`Credentials`]: API keys read from the local credentials file
//! - [`Article`]: A headline/abstract/URL triple from the news listing
//! - [`AudioJob`] and [`AudioClip`]: Records returned by the audio service
//! - [`JobPair`]: The two job identifiers a generation request produces
//!
//! Field names follow the JSON returned by the remote services, so most
//! structs deserialize directly from response bodies.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

/// A single service entry in the credentials file.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceKey {
    /// The API key, used verbatim.
    pub api_key: String,
}

/// API keys for the two authenticated services.
///
/// # JSON Shape
///
/// ```text
/// {"nytimes": {"api_key": "..."}, "anthropic": {"api_key": "..."}}
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    /// Key for the New York Times Top Stories API.
    pub nytimes: ServiceKey,
    /// Key for the Anthropic Messages API.
    pub anthropic: ServiceKey,
}

/// A news article as listed by the Top Stories API.
///
/// Articles are immutable once fetched; the selected one drives the rest
/// of the run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Article {
    /// The article headline.
    pub title: String,
    /// The short summary shown in the listing.
    #[serde(rename = "abstract")]
    pub summary: String,
    /// The canonical article URL.
    pub url: String,
    /// Publication timestamp, when the listing provides a parseable one.
    #[serde(default, rename = "published_date", deserialize_with = "lenient_timestamp")]
    pub published: Option<DateTime<FixedOffset>>,
}

/// Accept RFC 3339 timestamps and quietly drop anything else.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| DateTime::parse_from_rfc3339(&s).ok()))
}

/// A job record returned by `POST /api/generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioJob {
    /// Opaque job identifier.
    pub id: String,
}

/// A job-status record returned by `GET /api/get`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AudioClip {
    /// Opaque job identifier.
    pub id: String,
    /// Rendering status, e.g. `"submitted"`, `"queued"` or `"streaming"`.
    pub status: String,
    /// Playable URL once the clip is streaming.
    #[serde(default)]
    pub audio_url: Option<String>,
}

impl AudioClip {
    /// Whether this clip has reached the terminal `streaming` state.
    pub fn is_streaming(&self) -> bool {
        self.status == "streaming"
    }
}

/// The two job identifiers produced by one generation request.
///
/// The service always renders two variations; they are polled and reported
/// together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPair {
    pub first: String,
    pub second: String,
}

impl JobPair {
    /// Take the first two jobs of a generate response.
    ///
    /// Returns `None` when the response carries fewer than two jobs.
    pub fn from_jobs(jobs: &[AudioJob]) -> Option<Self> {
        match jobs {
            [first, second, ..] => Some(Self {
                first: first.id.clone(),
                second: second.id.clone(),
            }),
            _ => None,
        }
    }

    /// Comma-separated identifiers, as the status endpoint expects them.
    pub fn joined(&self) -> String {
        format!("{},{}", self.first, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_deserialization() {
        let json = r#"{"nytimes":{"api_key":"A"},"anthropic":{"api_key":"B"}}"#;
        let creds: Credentials = serde_json::from_str(json).unwrap();
        assert_eq!(creds.nytimes.api_key, "A");
        assert_eq!(creds.anthropic.api_key, "B");
    }

    #[test]
    fn test_article_reads_abstract_field() {
        let json = r#"{
            "title": "Headline",
            "abstract": "Short summary",
            "url": "https://www.nytimes.com/2025/05/06/world/story.html",
            "published_date": "2025-05-06T05:00:27-04:00"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.title, "Headline");
        assert_eq!(article.summary, "Short summary");
        assert!(article.published.is_some());
    }

    #[test]
    fn test_article_tolerates_bad_timestamp() {
        let json = r#"{"title":"t","abstract":"a","url":"u","published_date":"yesterday"}"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.published, None);

        let json = r#"{"title":"t","abstract":"a","url":"u"}"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.published, None);
    }

    #[test]
    fn test_clip_streaming() {
        let json = r#"[
            {"id":"a","status":"streaming","audio_url":"https://cdn.example/a.mp3"},
            {"id":"b","status":"queued"}
        ]"#;
        let clips: Vec<AudioClip> = serde_json::from_str(json).unwrap();
        assert!(clips[0].is_streaming());
        assert!(!clips[1].is_streaming());
        assert_eq!(clips[1].audio_url, None);
    }

    #[test]
    fn test_job_pair_needs_two_jobs() {
        let jobs = vec![
            AudioJob { id: "a".into() },
            AudioJob { id: "b".into() },
            AudioJob { id: "c".into() },
        ];
        let pair = JobPair::from_jobs(&jobs).unwrap();
        assert_eq!(pair.joined(), "a,b");

        assert!(JobPair::from_jobs(&jobs[..1]).is_none());
        assert!(JobPair::from_jobs(&[]).is_none());
    }
}
