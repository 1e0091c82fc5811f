//! # Radio AI
//!
//! Turns a news story into a short 8-bit chiptune song: the user picks an
//! article from the New York Times Top Stories, revises a lyrics request in
//! their editor, Anthropic writes the lyrics, and a Suno-compatible bridge
//! renders the audio.
//!
//! ## Usage
//!
//! ```sh
//! radio_ai --creds creds.json --template request.txt
//! ```
//!
//! ## Architecture
//!
//! The run is a single linear pipeline; the first failure ends it:
//! 1. **Credentials**: Read API keys from a local JSON file
//! 2. **Articles**: List top stories and let the user choose one
//! 3. **Request**: Fetch the story text, merge it into the template, edit it
//! 4. **Lyrics**: One Anthropic Messages call
//! 5. **Audio**: Submit the render, poll until the first clip streams, report URLs

use clap::Parser;
use reqwest::Client;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod audio;
mod cli;
mod config;
mod console;
mod credentials;
mod editor;
mod lyrics;
mod models;
mod prompt;
mod report;
mod scrapers;

use audio::{AudioError, PollOutcome, PollPolicy, SunoClient, TokioClock};
use cli::Cli;
use config::{ConfigError, Settings};
use console::{paint, say, Tone};
use credentials::{load_credentials, CredentialsError};
use editor::{edit_until_done, EditorError, ExternalEditor};
use lyrics::{AnthropicLyrics, LyricsError, LyricsModel};
use models::Article;
use prompt::{compose_request, load_template, TemplateError};

/// Why a run stopped early.
#[derive(Debug, Error)]
enum RunError {
    #[error("Failed to load settings: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to load credentials: {0}")]
    Credentials(#[from] CredentialsError),
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to fetch news articles")]
    NoArticles,
    #[error("Failed to create request template: {0}")]
    Template(#[from] TemplateError),
    #[error("Failed to edit request: {0}")]
    Editor(#[from] EditorError),
    #[error("Failed to read console input: {0}")]
    Console(#[from] io::Error),
    #[error("Failed to generate lyrics: {0}")]
    Lyrics(#[from] LyricsError),
    #[error("Audio generation failed: {0}")]
    Audio(#[from] AudioError),
    #[error("Failed to generate audio: timed out after {0} status checks")]
    TimedOut(u32),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("radio_ai starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let outcome = run(&args).await;
    let elapsed = start_time.elapsed();
    match outcome {
        Ok(()) => {
            info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(?elapsed, error = %e, "Run aborted");
            say(Tone::Failure, format!("{e}. Exiting."));
            ExitCode::FAILURE
        }
    }
}

/// Print the list, read a choice and echo the selected article.
fn select_article<'a, R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    articles: &'a [Article],
) -> io::Result<&'a Article> {
    console::display_articles(out, articles)?;
    let choice = console::choose_article(input, out, articles.len())?;
    let selected = &articles[choice - 1];

    writeln!(out, "{}", paint(Tone::Step, "\nSelected Article:"))?;
    writeln!(out, "{}", paint(Tone::Notice, &format!("Title: {}", selected.title)))?;
    writeln!(out, "{}", paint(Tone::Body, &format!("Abstract: {}", selected.summary)))?;
    writeln!(out, "{}", paint(Tone::Link, &format!("URL: {}", selected.url)))?;
    Ok(selected)
}

#[instrument(level = "info", skip_all)]
async fn run(args: &Cli) -> Result<(), RunError> {
    say(Tone::Banner, "Welcome to RADIO.AI MVP!");
    let settings: Settings = config::load_settings(args)?;

    say(Tone::Step, "Loading credentials...");
    let creds = load_credentials(&settings.creds_path)?;
    say(Tone::Done, "Credentials loaded successfully.");

    let client = Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;

    // ---- Articles ----
    say(
        Tone::Step,
        format!(
            "Fetching {} articles from NYTimes API...",
            settings.article_count
        ),
    );
    let articles = scrapers::nyt::index_articles(
        &client,
        &creds.nytimes.api_key,
        &settings.news_section,
        settings.article_count,
    )
    .await
    .filter(|articles| !articles.is_empty())
    .ok_or(RunError::NoArticles)?;
    say(
        Tone::Done,
        format!("Successfully fetched {} articles.", articles.len()),
    );

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    let selected = select_article(&mut input, &mut out, &articles)?;

    // ---- Request ----
    say(Tone::Step, "Fetching full article text...");
    let (full_text, fallback) = scrapers::nyt::fetch_full_text(&client, selected).await;
    match fallback {
        None => say(Tone::Done, "Full article text fetched successfully."),
        Some(e) => {
            say(Tone::Notice, format!("Failed to fetch full article text: {e}"));
            say(Tone::Notice, "Using article abstract as fallback.");
        }
    }

    say(Tone::Step, "Creating request template...");
    let template = load_template(&settings.template_path)?;
    let request = compose_request(selected, &full_text, &template);
    say(Tone::Done, "Request template created successfully.");

    let editor = ExternalEditor::new(settings.editor.clone());
    let request = edit_until_done(&editor, &mut input, &mut out, request)?;

    // ---- Lyrics ----
    say(Tone::Step, "\nGenerating lyrics based on the edited request...");
    let model = AnthropicLyrics::new(
        client.clone(),
        creds.anthropic.api_key.clone(),
        settings.model.clone(),
        settings.max_tokens,
    );
    let lyrics = model.complete(&request).await?;
    say(Tone::Done, "\nGenerated Lyrics:");
    say(Tone::Notice, &lyrics);

    // ---- Audio ----
    say(Tone::Step, "\nGenerating 8bit chiptune style music...");
    let suno = SunoClient::new(client, settings.audio_base_url.clone());
    let jobs = suno.generate(&lyrics).await?;
    say(Tone::Done, "Audio generation initiated successfully.");
    say(Tone::Step, format!("Audio generation IDs: {}", jobs.joined()));

    say(Tone::Step, "Checking audio generation status...");
    let policy = PollPolicy::new(settings.poll_attempts, settings.poll_interval);
    match policy.wait(&suno, &TokioClock, &jobs).await? {
        PollOutcome::Ready { clips, attempts } => {
            info!(attempts, "Audio generation completed");
            say(Tone::Done, "Audio generation completed.");
            let lines = report::clip_lines(&clips)?;
            report::print_audio_urls(&mut out, &lines)?;
            Ok(())
        }
        PollOutcome::TimedOut { attempts } => Err(RunError::TimedOut(attempts)),
    }
}
