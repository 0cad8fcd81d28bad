//! Process settings from the environment

use tracing_subscriber::EnvFilter;

const LOG_VAR: &str = "RDIALOG_LOG";
const NO_DBUS_VAR: &str = "RDIALOG_NO_DBUS";
const DEFAULT_LOG: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `tracing` filter directive
    pub log_filter: String,
    /// Skip the session bus and show notifications through the dialog host
    pub no_dbus: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG.to_string(),
            no_dbus: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let log_filter = lookup(LOG_VAR)
            .or_else(|| lookup("RUST_LOG"))
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG.to_string());
        let no_dbus = lookup(NO_DBUS_VAR).is_some_and(|value| !value.is_empty() && value != "0");
        Self { log_filter, no_dbus }
    }

    /// The log filter, or the default when the directive does not parse.
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        assert_eq!(settings(&[]), Settings::default());
    }

    #[test]
    fn test_log_filter_precedence() {
        assert_eq!(settings(&[("RUST_LOG", "info")]).log_filter, "info");
        assert_eq!(
            settings(&[("RUST_LOG", "info"), ("RDIALOG_LOG", "debug")]).log_filter,
            "debug"
        );
        assert_eq!(settings(&[("RDIALOG_LOG", " ")]).log_filter, "warn");
    }

    #[test]
    fn test_no_dbus_flag() {
        assert!(settings(&[("RDIALOG_NO_DBUS", "1")]).no_dbus);
        assert!(settings(&[("RDIALOG_NO_DBUS", "yes")]).no_dbus);
        assert!(!settings(&[("RDIALOG_NO_DBUS", "0")]).no_dbus);
        assert!(!settings(&[("RDIALOG_NO_DBUS", "")]).no_dbus);
    }
}
