use std::path::PathBuf;

use clap::Parser;

use crate::batch::ChannelIdMode;

pub const USAGE: &str = "Usage:
  linear-ingest <channel_id> <youtube_url> [--dry-run]
  linear-ingest --json list.json [--delay-seconds 3] [--dry-run] [--continue-on-error] [--channel-id-mode id|number]
  linear-ingest --probe <youtube_url>
  linear-ingest --html-file page.html";

/// Ingest YouTube videos into linear channels of the central catalog.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Channel id (single mode). Internal id, channel number or legacy id.
    pub channel_id: Option<String>,

    /// YouTube url (single mode)
    pub url: Option<String>,

    /// Batch file: {"channels":[{"name":..,"urls":[..]}]}
    #[clap(long = "json", value_name = "PATH")]
    pub json_path: Option<PathBuf>,

    /// Pause between inserts in batch mode, in seconds
    #[clap(long, default_value_t = 3.0)]
    pub delay_seconds: f64,

    /// Don't post to the catalog, only log payloads
    #[clap(long, default_value = "false")]
    pub dry_run: bool,

    /// In batch mode, keep going when a url fails
    #[clap(long, default_value = "false")]
    pub continue_on_error: bool,

    /// Identifier sent as channel_id in batch mode
    #[clap(long, value_enum, default_value_t = ChannelIdMode::Id)]
    pub channel_id_mode: ChannelIdMode,

    /// Print title and duration of a video and exit
    #[clap(long, value_name = "URL", conflicts_with = "html_file")]
    pub probe: Option<String>,

    /// Print title and duration extracted from a saved watch page and exit
    #[clap(long, value_name = "PATH")]
    pub html_file: Option<PathBuf>,

    /// Yaml config file
    #[clap(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Insert delay, negative or non-finite values mean no delay.
    pub fn delay(&self) -> std::time::Duration {
        std::time::Duration::try_from_secs_f64(self.delay_seconds).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_batch_flags() {
        let args = Args::parse_from([
            "linear-ingest",
            "--json",
            "list.json",
            "--delay-seconds",
            "0.5",
            "--continue-on-error",
            "--channel-id-mode",
            "number",
        ]);
        assert_eq!(args.json_path, Some(PathBuf::from("list.json")));
        assert_eq!(args.delay(), Duration::from_millis(500));
        assert!(args.continue_on_error);
        assert!(!args.dry_run);
        assert_eq!(args.channel_id_mode, ChannelIdMode::Number);
    }

    #[test]
    fn test_single_mode_defaults() {
        let args = Args::parse_from(["linear-ingest", "7", "https://youtu.be/dQw4w9WgXcQ"]);
        assert_eq!(args.channel_id.as_deref(), Some("7"));
        assert_eq!(args.url.as_deref(), Some("https://youtu.be/dQw4w9WgXcQ"));
        assert_eq!(args.delay(), Duration::from_secs(3));
        assert_eq!(args.channel_id_mode, ChannelIdMode::Id);
    }

    #[test]
    fn test_negative_delay_is_zero() {
        let args = Args::parse_from(["linear-ingest", "--json", "a.json", "--delay-seconds=-1"]);
        assert_eq!(args.delay(), Duration::ZERO);
    }

    #[test]
    fn test_probe_conflicts_with_html_file() {
        assert!(Args::try_parse_from([
            "linear-ingest",
            "--probe",
            "https://youtu.be/x",
            "--html-file",
            "a.html"
        ])
        .is_err());
    }
}
