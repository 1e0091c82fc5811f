//! Final console report for a rendered song.

use crate::audio::AudioError;
use crate::console::{paint, Tone};
use crate::models::AudioClip;
use std::io::{self, Write};

/// One `N. id ==> url` line per job of the pair.
///
/// # Errors
///
/// [`AudioError::TooFewClips`] when the status response did not cover both jobs.
pub fn clip_lines(clips: &[AudioClip]) -> Result<[String; 2], AudioError> {
    let [first, second, ..] = clips else {
        return Err(AudioError::TooFewClips(clips.len()));
    };
    let line = |n: usize, clip: &AudioClip| {
        format!(
            "{n}. {} ==> {}",
            clip.id,
            clip.audio_url.as_deref().unwrap_or("(no audio url yet)")
        )
    };
    Ok([line(1, first), line(2, second)])
}

/// Print the report lines under their heading.
pub fn print_audio_urls<W: Write>(out: &mut W, lines: &[String]) -> io::Result<()> {
    writeln!(out, "{}", paint(Tone::Done, "Audio URLs (8bit chiptune style):"))?;
    for line in lines {
        writeln!(out, "{}", paint(Tone::Notice, line))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(id: &str, url: Option<&str>) -> AudioClip {
        AudioClip {
            id: id.into(),
            status: "streaming".into(),
            audio_url: url.map(str::to_string),
        }
    }

    #[test]
    fn test_clip_lines() {
        let clips = vec![
            clip("a1", Some("https://cdn1.suno.ai/a1.mp3")),
            clip("b2", Some("https://cdn1.suno.ai/b2.mp3")),
        ];
        let lines = clip_lines(&clips).unwrap();
        assert_eq!(lines[0], "1. a1 ==> https://cdn1.suno.ai/a1.mp3");
        assert_eq!(lines[1], "2. b2 ==> https://cdn1.suno.ai/b2.mp3");
    }

    #[test]
    fn test_second_clip_may_lack_url() {
        let clips = vec![clip("a1", Some("https://cdn1.suno.ai/a1.mp3")), clip("b2", None)];
        let lines = clip_lines(&clips).unwrap();
        assert_eq!(lines[1], "2. b2 ==> (no audio url yet)");
    }

    #[test]
    fn test_short_status_response_is_error() {
        let clips = vec![clip("a1", Some("u"))];
        assert!(matches!(clip_lines(&clips), Err(AudioError::TooFewClips(1))));
    }

    #[test]
    fn test_print_audio_urls() {
        let clips = vec![clip("a1", Some("u1")), clip("b2", Some("u2"))];
        let mut out = Vec::new();
        print_audio_urls(&mut out, &clip_lines(&clips).unwrap()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Audio URLs (8bit chiptune style):"));
        assert!(text.contains("1. a1 ==> u1"));
        assert!(text.contains("2. b2 ==> u2"));
    }
}
