use crate::config::Config;
use log::{LevelFilter, SetLoggerError};
use simplelog::{self, ConfigBuilder};

/// Dependency modules silenced unless the level is TRACE.
const FILTERED_MODULES: &[&str] = &[
    "sqlx", "sea_orm", "tower", "hyper", "hyper_util", "axum", "reqwest", "rustls", "h2",
];

pub struct Logger {}

impl Logger {
    /// Installs a terminal logger at the configured level.
    ///
    /// Fails if a global logger was already installed, which happens when a test
    /// binary initializes logging twice.
    pub fn init_logger(config: &Config) -> Result<(), SetLoggerError> {
        let level = config.log_level_filter;
        simplelog::TermLogger::init(
            Self::convert_level_filter(level),
            Self::build_log_config(Self::should_filter_dependencies(level)),
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        )
    }

    fn convert_level_filter(level: LevelFilter) -> simplelog::LevelFilter {
        match level {
            LevelFilter::Off => simplelog::LevelFilter::Off,
            LevelFilter::Error => simplelog::LevelFilter::Error,
            LevelFilter::Warn => simplelog::LevelFilter::Warn,
            LevelFilter::Info => simplelog::LevelFilter::Info,
            LevelFilter::Debug => simplelog::LevelFilter::Debug,
            LevelFilter::Trace => simplelog::LevelFilter::Trace,
        }
    }

    fn should_filter_dependencies(level: LevelFilter) -> bool {
        level != LevelFilter::Trace
    }

    fn build_log_config(apply_filters: bool) -> simplelog::Config {
        let mut builder = ConfigBuilder::new();
        builder.set_time_format_rfc3339();

        if apply_filters {
            for module in FILTERED_MODULES {
                builder.add_filter_ignore_str(module);
            }
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_http_stacks_are_filtered() {
        for module in ["reqwest", "hyper", "rustls", "sea_orm"] {
            assert!(FILTERED_MODULES.contains(&module), "{module} should be filtered");
        }
    }

    #[test]
    fn only_trace_shows_dependency_logs() {
        assert!(!Logger::should_filter_dependencies(LevelFilter::Trace));
        for level in [
            LevelFilter::Off,
            LevelFilter::Error,
            LevelFilter::Warn,
            LevelFilter::Info,
            LevelFilter::Debug,
        ] {
            assert!(Logger::should_filter_dependencies(level));
        }
    }

    #[test]
    fn level_conversion_preserves_ordering() {
        assert_eq!(
            Logger::convert_level_filter(LevelFilter::Warn) as u8,
            simplelog::LevelFilter::Warn as u8
        );
        assert_eq!(
            Logger::convert_level_filter(LevelFilter::Trace) as u8,
            simplelog::LevelFilter::Trace as u8
        );
    }

    #[test]
    fn log_config_builds_with_and_without_filters() {
        let _filtered = Logger::build_log_config(true);
        let _unfiltered = Logger::build_log_config(false);
    }
}
