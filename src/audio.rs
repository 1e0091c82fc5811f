//! Song rendering through a Suno-compatible HTTP bridge.
//!
//! Two endpoints are used, both relative to a configurable base URL:
//! - `POST /api/generate` starts an asynchronous render and returns job records
//! - `GET /api/get?ids=a,b` reports the status of those jobs
//!
//! Waiting for a render is expressed as a [`PollPolicy`] run against a
//! [`StatusSource`] and a [`Clock`], so the loop can be exercised without a
//! network or real sleeps.

use crate::models::{AudioClip, AudioJob, JobPair};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("audio service returned status {0}")]
    Status(u16),
    #[error("expected two audio jobs, got {0}")]
    TooFewJobs(usize),
    #[error("expected two status records, got {0}")]
    TooFewClips(usize),
}

/// Wrap generated lyrics in the fixed chiptune style instruction.
pub fn chiptune_prompt(lyrics: &str) -> String {
    format!(
        "An 8bit chiptune style song with the following lyrics: {lyrics}. \
         The music should have a retro video game feel, with characteristic \
         electronic bleeps and bloops."
    )
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    make_instrumental: bool,
    wait_audio: bool,
}

/// Where job statuses come from.
pub trait StatusSource {
    /// Fetch status records for both jobs in one query.
    async fn statuses(&self, jobs: &JobPair) -> Result<Vec<AudioClip>, AudioError>;
}

/// Source of the pause between polls.
pub trait Clock {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Client for the audio generation bridge.
#[derive(Debug, Clone)]
pub struct SunoClient {
    client: Client,
    base_url: String,
}

impl SunoClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn status_url(&self, jobs: &JobPair) -> String {
        format!(
            "{}/api/get?ids={},{}",
            self.base_url,
            urlencoding::encode(&jobs.first),
            urlencoding::encode(&jobs.second)
        )
    }

    /// Start rendering `lyrics` as a chiptune song without waiting for audio.
    ///
    /// # Errors
    ///
    /// A non-200 answer is [`AudioError::Status`]; a response with fewer than
    /// two jobs is [`AudioError::TooFewJobs`].
    #[instrument(level = "info", skip_all, fields(base_url = %self.base_url))]
    pub async fn generate(&self, lyrics: &str) -> Result<JobPair, AudioError> {
        let prompt = chiptune_prompt(lyrics);
        let body = GenerateRequest {
            prompt: &prompt,
            make_instrumental: false,
            wait_audio: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            warn!(status = status.as_u16(), "Audio generation refused");
            return Err(AudioError::Status(status.as_u16()));
        }

        let jobs: Vec<AudioJob> = response.json().await?;
        let pair = JobPair::from_jobs(&jobs).ok_or(AudioError::TooFewJobs(jobs.len()))?;
        info!(ids = %pair.joined(), "Audio generation started");
        Ok(pair)
    }
}

impl StatusSource for SunoClient {
    #[instrument(level = "debug", skip_all, fields(ids = %jobs.joined()))]
    async fn statuses(&self, jobs: &JobPair) -> Result<Vec<AudioClip>, AudioError> {
        let response = self.client.get(self.status_url(jobs)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AudioError::Status(status.as_u16()));
        }
        let clips: Vec<AudioClip> = response.json().await?;
        debug!(count = clips.len(), "Fetched audio status");
        Ok(clips)
    }
}

/// Result of waiting on a job pair.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The first job reached `streaming` on attempt `attempts`.
    Ready {
        clips: Vec<AudioClip>,
        attempts: u32,
    },
    /// The attempt budget ran out.
    TimedOut { attempts: u32 },
}

/// Fixed-interval, bounded wait for a job pair.
///
/// Only the first record of each status response gates success.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
    pub is_terminal: fn(&AudioClip) -> bool,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 60,
            interval: Duration::from_secs(5),
            is_terminal: AudioClip::is_streaming,
        }
    }
}

impl PollPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
            ..Self::default()
        }
    }

    /// Poll `source` until the first clip is terminal or the budget is spent.
    ///
    /// Each non-terminal poll is followed by one `interval` pause, including
    /// the last.
    ///
    /// # Errors
    ///
    /// A failed status query, or an empty status response, ends the wait.
    #[instrument(level = "info", skip_all, fields(ids = %jobs.joined(), max_attempts = self.max_attempts))]
    pub async fn wait<S, C>(&self, source: &S, clock: &C, jobs: &JobPair) -> Result<PollOutcome, AudioError>
    where
        S: StatusSource,
        C: Clock,
    {
        for attempt in 1..=self.max_attempts {
            let clips = source.statuses(jobs).await?;
            let first = clips.first().ok_or(AudioError::TooFewClips(0))?;
            if (self.is_terminal)(first) {
                info!(attempt, "Audio ready");
                return Ok(PollOutcome::Ready {
                    clips,
                    attempts: attempt,
                });
            }
            debug!(attempt, status = %first.status, "Audio still rendering");
            crate::console::say(
                crate::console::Tone::Notice,
                "Audio generation in progress. Waiting...",
            );
            clock.sleep(self.interval).await;
        }
        warn!(attempts = self.max_attempts, "Audio generation timed out");
        Ok(PollOutcome::TimedOut {
            attempts: self.max_attempts,
        })
    }
}
