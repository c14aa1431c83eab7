//! Logger setup for the terminal front end.
//!
//! The viewer owns stdout while it runs, so records go to stderr (the
//! `env_logger` default) and can be redirected with `2> meshview.log`.

use std::sync::Once;

use log::LevelFilter;

/// Where the viewer's log filter comes from.
///
/// An explicit `filter` wins over `RUST_LOG`; with neither, everything at
/// `fallback_level` and above is shown. Filters use the `env_logger` syntax,
/// so `"meshview_core=debug"` logs every operator applied to the scene and
/// `"meshview_core::raster=trace"` logs every dropped segment.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: Option<String>,
    /// Kept at `Warn` by default: stderr draws over the viewer unless redirected
    pub fallback_level: LevelFilter,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: None,
            fallback_level: LevelFilter::Warn,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

impl LoggingConfig {
    /// The filter string to install, given the value of `RUST_LOG`.
    fn resolve_filter(&self, env_filter: Option<String>) -> String {
        self.filter
            .clone()
            .or(env_filter)
            .unwrap_or_else(|| self.fallback_level.to_string().to_lowercase())
    }
}

static INIT: Once = Once::new();

/// Install the viewer's logger. Only the first call has any effect, so the
/// snapshot example and the binary can both call it unconditionally.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = config.resolve_filter(std::env::var("RUST_LOG").ok());
        env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .init();

        log::debug!("viewer logging filter: {}", filter);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_precedence() {
        let config = LoggingConfig::default();
        assert_eq!(config.resolve_filter(None), "warn");
        assert_eq!(config.resolve_filter(Some("info".into())), "info");

        let config = LoggingConfig {
            filter: Some("meshview_core=debug".into()),
            ..LoggingConfig::default()
        };
        assert_eq!(config.resolve_filter(Some("info".into())), "meshview_core=debug");
    }
}
