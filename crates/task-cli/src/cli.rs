//! Argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use task_http::DEFAULT_BASE_URL;
use task_types::{DeReverbParams, JobRequest, PitchParams, TaskSpec};

#[derive(Debug, Parser)]
#[command(name = "audio-task", version, about = "Run a remote audio processing job")]
pub struct Cli {
    /// Bearer token for the task API.
    #[arg(long, env = "AUDIO_TASK_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[arg(long, env = "AUDIO_TASK_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Remove reverb from a recording.
    DeReverb {
        file: PathBuf,
        #[arg(long, default_value_t = 1)]
        style: u32,
    },
    /// Shift pitch without re-encoding loss.
    Pitch {
        file: PathBuf,
        /// Semitones, may be negative.
        #[arg(long, allow_negative_numbers = true)]
        pitch: f64,
        #[arg(long)]
        fp: bool,
        #[arg(long)]
        tp: bool,
    },
}

impl Cli {
    /// Task descriptor and request for the chosen subcommand.
    pub fn job(&self) -> (TaskSpec, JobRequest) {
        match &self.command {
            Command::DeReverb { file, style } => (
                TaskSpec::de_reverb(),
                JobRequest::new(file, &self.api_key).with_params(DeReverbParams { style: *style }),
            ),
            Command::Pitch {
                file,
                pitch,
                fp,
                tp,
            } => (
                TaskSpec::lossless_pitch(),
                JobRequest::new(file, &self.api_key).with_params(PitchParams {
                    pitch: *pitch,
                    fp: *fp,
                    tp: *tp,
                }),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pitch_with_negative_value() {
        let cli = Cli::try_parse_from([
            "audio-task",
            "--api-key",
            "k",
            "pitch",
            "song.mp3",
            "--pitch",
            "-2",
            "--tp",
        ])
        .unwrap();
        let (task, req) = cli.job();
        assert_eq!(task.name, "lossless-pitch");
        assert_eq!(req.credential(), "k");
        assert_eq!(
            req.parameters(),
            &[
                ("pitch".to_string(), "-2".to_string()),
                ("fp".to_string(), "false".to_string()),
                ("tp".to_string(), "true".to_string()),
            ]
        );
        assert_eq!(cli.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn de_reverb_defaults_style() {
        let cli = Cli::try_parse_from([
            "audio-task",
            "--api-key",
            "k",
            "--base-url",
            "http://localhost:1/api",
            "de-reverb",
            "a.mp3",
        ])
        .unwrap();
        let (task, req) = cli.job();
        assert_eq!(task, TaskSpec::de_reverb());
        assert_eq!(req.parameters(), &[("style".to_string(), "1".to_string())]);
        assert_eq!(cli.base_url, "http://localhost:1/api");
    }
}
