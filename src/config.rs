// config.rs

use crate::cli::Args;
use crate::meter::{ParseError, Subdivision, Tempo, TimeSignature};
use log::{debug, info};
use std::error::Error;
use std::fmt;
use std::time::Duration;

/// How long `stop` waits for the beat loop to exit.
pub const GRACE_PERIOD: Duration = Duration::from_millis(200);
/// How long a beat flash stays lit before reverting to neutral.
pub const FLASH_HOLD: Duration = Duration::from_millis(70);
/// UI redraw / queue polling interval.
pub const UI_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read or a key had the wrong type
    Source(::config::ConfigError),
    /// A time signature or subdivision value was not recognised
    Invalid(ParseError),
    /// A tempo outside the playable range
    TempoOutOfRange(i64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Source(e) => write!(f, "configuration error: {}", e),
            ConfigError::Invalid(e) => write!(f, "configuration error: {}", e),
            ConfigError::TempoOutOfRange(bpm) => write!(
                f,
                "configuration error: bpm {} outside {}-{}",
                bpm,
                Tempo::MIN,
                Tempo::MAX
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Source(e) => Some(e),
            ConfigError::Invalid(e) => Some(e),
            ConfigError::TempoOutOfRange(_) => None,
        }
    }
}

impl From<::config::ConfigError> for ConfigError {
    fn from(e: ::config::ConfigError) -> Self {
        ConfigError::Source(e)
    }
}

impl From<ParseError> for ConfigError {
    fn from(e: ParseError) -> Self {
        ConfigError::Invalid(e)
    }
}

/// Startup settings: defaults, then the optional config file, then the command line
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub tempo: Tempo,
    pub time_signature: TimeSignature,
    pub subdivision: Subdivision,
    pub mute: bool,
    pub autostart: bool,
    pub headless: bool,
    pub measures: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tempo: Tempo::default(),
            time_signature: TimeSignature::default(),
            subdivision: Subdivision::default(),
            mute: false,
            autostart: false,
            headless: false,
            measures: None,
        }
    }
}

impl Config {
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let defaults = Config::default();
        let mut builder = ::config::Config::builder()
            .set_default("bpm", i64::from(defaults.tempo.bpm()))?
            .set_default("time_signature", defaults.time_signature.to_string())?
            .set_default("subdivision", defaults.subdivision.name().to_string())?
            .set_default("mute", defaults.mute)?;

        if let Some(path) = &args.config {
            info!("Loading configuration from {}", path.display());
            builder = builder.add_source(::config::File::from(path.as_path()));
        }

        let settings = builder
            .set_override_option("bpm", args.bpm.map(i64::from))?
            .set_override_option(
                "time_signature",
                args.time_signature.map(|sig| sig.to_string()),
            )?
            .set_override_option("subdivision", args.subdivision.map(|sub| sub.name().to_string()))?
            .set_override_option("mute", args.mute.then_some(true))?
            .build()?;

        let bpm = settings.get_int("bpm")?;
        if bpm < i64::from(Tempo::MIN) || bpm > i64::from(Tempo::MAX) {
            return Err(ConfigError::TempoOutOfRange(bpm));
        }
        let time_signature: TimeSignature = settings.get_string("time_signature")?.parse()?;
        let subdivision: Subdivision = settings.get_string("subdivision")?.parse()?;
        let mute = settings.get_bool("mute")?;

        let config = Config {
            tempo: Tempo::new(bpm as u32),
            time_signature,
            subdivision,
            mute,
            autostart: args.start || args.headless,
            headless: args.headless,
            measures: args.measures,
        };
        debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;

    #[test]
    fn test_defaults_without_arguments() {
        let args = Args::parse_from(["tempokeeper"]);
        let config = Config::load(&args).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.tempo.bpm(), 80);
    }

    #[test]
    fn test_command_line_overrides_defaults() {
        let args = Args::parse_from([
            "tempokeeper",
            "--bpm",
            "132",
            "--time-signature",
            "3/4",
            "--subdivision",
            "triplet",
            "--mute",
        ]);
        let config = Config::load(&args).unwrap();
        assert_eq!(config.tempo.bpm(), 132);
        assert_eq!(config.time_signature.numerator(), 3);
        assert_eq!(config.subdivision, Subdivision::Triplet);
        assert!(config.mute);
    }

    #[test]
    fn test_file_then_command_line() {
        let path = std::env::temp_dir().join(format!(
            "tempokeeper-config-{}.toml",
            std::process::id()
        ));
        fs::write(
            &path,
            "bpm = 100\ntime_signature = \"5/4\"\nsubdivision = \"eighth\"\nmute = true\n",
        )
        .unwrap();

        let path_str = path.to_str().unwrap();
        let args = Args::parse_from(["tempokeeper", "--config", path_str, "--bpm", "150"]);
        let config = Config::load(&args).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.tempo.bpm(), 150);
        assert_eq!(config.time_signature.numerator(), 5);
        assert_eq!(config.subdivision, Subdivision::Eighth);
        assert!(config.mute);
    }

    #[test]
    fn test_out_of_range_file_tempo_is_rejected() {
        let path = std::env::temp_dir().join(format!(
            "tempokeeper-bad-config-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "bpm = 300\n").unwrap();

        let args = Args::parse_from(["tempokeeper", "--config", path.to_str().unwrap()]);
        let result = Config::load(&args);
        fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(ConfigError::TempoOutOfRange(300))));
    }

    #[test]
    fn test_headless_implies_autostart() {
        let args = Args::parse_from(["tempokeeper", "--headless", "--measures", "2"]);
        let config = Config::load(&args).unwrap();
        assert!(config.headless);
        assert!(config.autostart);
        assert_eq!(config.measures, Some(2));
    }
}
