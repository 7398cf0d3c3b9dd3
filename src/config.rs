use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use indoc::indoc;
use thiserror::Error;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(
    name = "step-replay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Replay a scripted walkthrough step by step in floating terminal windows",
    after_help = indoc! {"
        Keys:
          Right, Space   apply the next step
          Left           undo the last step
          q, Esc, Ctrl+C quit

        The replay starts paused; the first key press only starts it.
        Drag a window by its body, resize it by its border or corners.
    "}
)]
pub struct Cli {
    /// Script to replay (JSON). Uses the bundled demo when omitted.
    #[arg(short = 's', long = "script", value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// How long a window stays highlighted after a step touches it.
    #[arg(long = "highlight-ms", value_name = "MS", default_value_t = 800)]
    pub highlight_ms: u64,

    /// Start playing immediately instead of waiting for a first key press.
    #[arg(long = "no-pause")]
    pub no_pause: bool,

    /// Jump to this 0-based global step before handing over control.
    #[arg(short = 'g', long = "goto", value_name = "N")]
    pub goto: Option<usize>,

    /// Print the accumulated state as JSON instead of starting the UI.
    #[arg(long = "dump")]
    pub dump: bool,

    /// Append diagnostics to this file.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Maximum level written to the log file.
    #[arg(long = "log-level", value_name = "LEVEL", default_value_t = Level::INFO)]
    pub log_level: Level,

    /// Input poll interval of the UI loop.
    #[arg(long = "tick-ms", value_name = "MS", default_value_t = 16)]
    pub tick_ms: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("highlight delay must be between 50 and 10000 ms, got {0}")]
    HighlightDelay(u64),
    #[error("tick interval must be between 1 and 1000 ms, got {0}")]
    TickInterval(u64),
}

/// Script source selected on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    Demo,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayConfig {
    pub script: ScriptSource,
    pub highlight_delay: Duration,
    pub start_paused: bool,
    pub goto: Option<usize>,
    pub dump: bool,
    pub log_file: Option<PathBuf>,
    pub log_level: Level,
    pub tick_interval: Duration,
}

impl TryFrom<&Cli> for ReplayConfig {
    type Error = ConfigError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        if !(50..=10_000).contains(&cli.highlight_ms) {
            return Err(ConfigError::HighlightDelay(cli.highlight_ms));
        }
        if !(1..=1_000).contains(&cli.tick_ms) {
            return Err(ConfigError::TickInterval(cli.tick_ms));
        }
        Ok(Self {
            script: cli
                .script
                .clone()
                .map_or(ScriptSource::Demo, ScriptSource::File),
            highlight_delay: Duration::from_millis(cli.highlight_ms),
            start_paused: !cli.no_pause,
            goto: cli.goto,
            dump: cli.dump,
            log_file: cli.log_file.clone(),
            log_level: cli.log_level,
            tick_interval: Duration::from_millis(cli.tick_ms),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("step-replay").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn defaults() {
        let config = ReplayConfig::try_from(&parse(&[])).unwrap();
        assert_eq!(config.script, ScriptSource::Demo);
        assert_eq!(config.highlight_delay, Duration::from_millis(800));
        assert!(config.start_paused);
        assert!(!config.dump);
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.tick_interval, Duration::from_millis(16));
    }

    #[test]
    fn explicit_options() {
        let cli = parse(&[
            "--script",
            "walkthrough.json",
            "--highlight-ms",
            "250",
            "--no-pause",
            "--goto",
            "4",
            "--dump",
            "--log-level",
            "debug",
        ]);
        let config = ReplayConfig::try_from(&cli).unwrap();
        assert_eq!(
            config.script,
            ScriptSource::File(PathBuf::from("walkthrough.json"))
        );
        assert_eq!(config.highlight_delay, Duration::from_millis(250));
        assert!(!config.start_paused);
        assert_eq!(config.goto, Some(4));
        assert!(config.dump);
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let err = ReplayConfig::try_from(&parse(&["--highlight-ms", "10"])).unwrap_err();
        assert_eq!(err, ConfigError::HighlightDelay(10));
        let err = ReplayConfig::try_from(&parse(&["--tick-ms", "0"])).unwrap_err();
        assert_eq!(err, ConfigError::TickInterval(0));
    }
}
