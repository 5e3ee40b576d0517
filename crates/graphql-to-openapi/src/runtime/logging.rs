//! Logging config
//!
//! Log output goes to stderr unless a log directory is configured, in which
//! case a rolling log file is written instead.

use std::{fmt, path::PathBuf, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer};
use tracing::Level;
use tracing_appender::rolling::Rotation;

/// Logging related options
#[derive(Debug, Deserialize, JsonSchema)]
pub struct Logging {
    /// The log level to use for tracing
    #[serde(default = "default_level", deserialize_with = "parse_str")]
    #[schemars(schema_with = "level")]
    pub level: Level,

    /// Directory to write log files into. Logs go to stderr when unset
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Log file rotation period to use when a log path is provided
    #[serde(default, deserialize_with = "parse_str")]
    pub rotation: LogRotation,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: default_level(),
            path: None,
            rotation: LogRotation::default(),
        }
    }
}

/// How often the log file is rolled over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, JsonSchema)]
#[schemars(rename_all = "lowercase")]
pub enum LogRotation {
    Minutely,
    Hourly,
    #[default]
    Daily,
    Never,
}

impl FromStr for LogRotation {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        [
            LogRotation::Minutely,
            LogRotation::Hourly,
            LogRotation::Daily,
            LogRotation::Never,
        ]
        .into_iter()
        .find(|rotation| rotation.to_string().eq_ignore_ascii_case(raw.trim()))
        .ok_or_else(|| format!("unknown log rotation '{raw}', expected minutely, hourly, daily or never"))
    }
}

impl fmt::Display for LogRotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogRotation::Minutely => "minutely",
            LogRotation::Hourly => "hourly",
            LogRotation::Daily => "daily",
            LogRotation::Never => "never",
        })
    }
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Minutely => Rotation::MINUTELY,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

const fn default_level() -> Level {
    Level::INFO
}

/// Deserialize a string field through its `FromStr` implementation
fn parse_str<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

fn level(generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
    /// Log level
    #[derive(JsonSchema)]
    #[schemars(rename_all = "lowercase")]
    // Only used to derive the schema of `tracing::Level`
    #[allow(dead_code)]
    enum Level {
        Trace,
        Debug,
        Info,
        Warn,
        Error,
    }

    Level::json_schema(generator)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use tracing::Level;
    use tracing_appender::rolling::Rotation;

    use super::{LogRotation, Logging};

    #[rstest]
    #[case(LogRotation::Minutely, Rotation::MINUTELY)]
    #[case(LogRotation::Hourly, Rotation::HOURLY)]
    #[case(LogRotation::Daily, Rotation::DAILY)]
    #[case(LogRotation::Never, Rotation::NEVER)]
    fn maps_to_appender_rotation(#[case] rotation: LogRotation, #[case] expected: Rotation) {
        assert_eq!(Rotation::from(rotation), expected);
    }

    #[rstest]
    #[case("daily", LogRotation::Daily)]
    #[case("NEVER", LogRotation::Never)]
    #[case(" Minutely ", LogRotation::Minutely)]
    fn parses_rotation_in_any_casing(#[case] raw: &str, #[case] expected: LogRotation) {
        assert_eq!(raw.parse::<LogRotation>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_rotation() {
        let error = serde_json::from_value::<Logging>(serde_json::json!({ "rotation": "weekly" }))
            .unwrap_err();

        assert!(error.to_string().starts_with("unknown log rotation 'weekly'"));
    }

    #[test]
    fn reads_level_and_defaults_rotation() {
        let logging: Logging =
            serde_json::from_value(serde_json::json!({ "level": "warn", "path": "logs" })).unwrap();

        assert_eq!(logging.level, Level::WARN);
        assert_eq!(logging.rotation, LogRotation::Daily);
        assert_eq!(logging.path.as_deref().and_then(|p| p.to_str()), Some("logs"));
    }
}
