//! Environment variable configuration
//!
//! Provides environment variable overrides for run settings.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "SUITECHECK";

/// Overrides read from `SUITECHECK_*` variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Test filter from SUITECHECK_FILTER
    pub filter: Option<String>,
    /// Verbose from SUITECHECK_VERBOSE
    pub verbose: Option<bool>,
    /// Output format from SUITECHECK_FORMAT
    pub format: Option<String>,
    /// Log level from SUITECHECK_LOG
    pub log_level: Option<String>,
    /// Config file from SUITECHECK_CONFIG
    pub config_file: Option<String>,
    /// Report file from SUITECHECK_OUTPUT
    pub output: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            filter: get_env("FILTER"),
            verbose: get_env_bool("VERBOSE"),
            format: get_env("FORMAT"),
            log_level: get_env("LOG"),
            config_file: get_env("CONFIG"),
            output: get_env("OUTPUT"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.filter.is_some()
            || self.verbose.is_some()
            || self.format.is_some()
            || self.log_level.is_some()
            || self.config_file.is_some()
            || self.output.is_some()
    }

    /// Print current environment configuration
    pub fn print_summary(&self) {
        println!("Environment Configuration:");
        println!("  {}_FILTER:   {:?}", ENV_PREFIX, self.filter);
        println!("  {}_VERBOSE:  {:?}", ENV_PREFIX, self.verbose);
        println!("  {}_FORMAT:   {:?}", ENV_PREFIX, self.format);
        println!("  {}_LOG:      {:?}", ENV_PREFIX, self.log_level);
        println!("  {}_CONFIG:   {:?}", ENV_PREFIX, self.config_file);
        println!("  {}_OUTPUT:   {:?}", ENV_PREFIX, self.output);
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Builder for setting environment variables (useful for testing)
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

impl EnvBuilder {
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_FILTER"), filter.into()));
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_VERBOSE"), verbose.to_string()));
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_FORMAT"), format.into()));
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_LOG"), level.into()));
        self
    }

    pub fn output(mut self, path: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_OUTPUT"), path.into()));
        self
    }

    /// Apply environment variables
    pub fn apply(self) {
        for (key, value) in self.vars {
            env::set_var(key, value);
        }
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        self.apply();

        EnvGuard { previous }
    }
}

impl Default for EnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that restores environment variables on drop
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Print all SUITECHECK environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {ENV_PREFIX}_FILTER     Regular expression selecting test cases");
    println!("  {ENV_PREFIX}_VERBOSE    Print PASS and MISS lines (true/false)");
    println!("  {ENV_PREFIX}_FORMAT     Summary format (text, json, json-pretty)");
    println!("  {ENV_PREFIX}_LOG        Log level (trace, debug, info, warn, error)");
    println!("  {ENV_PREFIX}_CONFIG     Path to configuration file");
    println!("  {ENV_PREFIX}_OUTPUT     File receiving the report instead of stdout");
    println!();
    println!("Example:");
    println!("  export {ENV_PREFIX}_FILTER='^Test(Push|Pop)'");
    println!("  suitecheck run -v");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_config_default() {
        let config = EnvConfig::default();
        assert!(config.filter.is_none());
        assert!(!config.has_any());
    }

    #[test]
    fn test_env_builder() {
        let _guard = EnvBuilder::new()
            .filter("^TestAdd$")
            .format("json")
            .apply_scoped();

        let config = EnvConfig::load();
        assert_eq!(config.filter, Some("^TestAdd$".to_string()));
        assert_eq!(config.format, Some("json".to_string()));
        assert!(config.has_any());
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = EnvBuilder::new().verbose(true).apply_scoped();
        assert_eq!(EnvConfig::load().verbose, Some(true));
    }

    #[test]
    fn test_guard_restores_previous_value() {
        let key = format!("{ENV_PREFIX}_LOG");
        env::remove_var(&key);
        {
            let _guard = EnvBuilder::new().log_level("debug").apply_scoped();
            assert_eq!(env::var(&key).ok(), Some("debug".to_string()));
        }
        assert!(env::var(&key).is_err());
    }
}
