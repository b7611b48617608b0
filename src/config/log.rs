use serde::{Deserialize, Serialize};

pub static DEFAULT_CONFIG: &[u8] = include_bytes!("../../default_config/log.toml");

#[derive(Serialize, Deserialize, Debug)]
pub struct LogConfig {
    #[serde(default)]
    pub max_level: Level,
    #[serde(default = "default_time_format")]
    pub time_format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            max_level: Level::Info,
            time_format: default_time_format(),
        }
    }
}

fn default_time_format() -> String {
    "[year]-[month]-[day] [hour]:[minute]:[second]".into()
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default)]
pub enum Level {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl Level {
    pub fn as_tracing_level(&self) -> tracing::Level {
        match self {
            Level::Trace => tracing::Level::TRACE,
            Level::Debug => tracing::Level::DEBUG,
            Level::Info => tracing::Level::INFO,
            Level::Warn => tracing::Level::WARN,
            Level::Error => tracing::Level::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let conf: LogConfig = toml::from_slice(DEFAULT_CONFIG).unwrap();
        assert!(matches!(conf.max_level, Level::Info));
        assert_eq!(conf.time_format, LogConfig::default().time_format);
    }
}
