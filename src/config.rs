//! Runtime configuration for org resolution and logging.
//!
//! Configuration is a plain value handed to each operation. The only knobs are
//! the trace level and the command used to reach `sfdx`; both can be set from
//! the environment and overridden explicitly.
use std::fmt;

/// Environment variable overriding the trace level.
pub const TRACE_LEVEL_ENV: &str = "SFCONN_TRACE_LEVEL";
/// Environment variable overriding the `sfdx` command (parsed via shell-words).
pub const SFDX_COMMAND_ENV: &str = "SFCONN_SFDX_COMMAND";
/// Command used when no override is present.
pub const DEFAULT_SFDX_COMMAND: &str = "sfdx";

/// Logging verbosity for classified errors.
///
/// `-1` is silent, `0` logs the client-facing message, anything above `0`
/// also logs detail, stack, and raw tool output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct TraceLevel(pub i32);

impl TraceLevel {
    pub const SILENT: TraceLevel = TraceLevel(-1);
    pub const BASIC: TraceLevel = TraceLevel(0);
    pub const VERBOSE: TraceLevel = TraceLevel(1);

    pub fn logs_errors(self) -> bool {
        self.0 >= 0
    }

    pub fn is_verbose(self) -> bool {
        self.0 > 0
    }

    /// Parse a trace level as written in the environment.
    pub fn parse(raw: &str) -> Option<TraceLevel> {
        raw.trim().parse::<i32>().ok().map(TraceLevel)
    }
}

impl fmt::Display for TraceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Settings shared by the resolver, the connection builder, and file helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub trace_level: TraceLevel,
    pub sfdx_command: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            trace_level: TraceLevel::default(),
            sfdx_command: DEFAULT_SFDX_COMMAND.to_string(),
        }
    }
}

impl Config {
    /// Build a config from process environment overrides.
    pub fn from_env() -> Config {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// Invalid trace levels are ignored so a typo never blocks a session.
    pub fn from_lookup<F>(lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(raw) = lookup(TRACE_LEVEL_ENV) {
            match TraceLevel::parse(&raw) {
                Some(level) => config.trace_level = level,
                None => tracing::warn!(
                    value = raw.as_str(),
                    "ignoring invalid {TRACE_LEVEL_ENV}"
                ),
            }
        }
        if let Some(command) = lookup(SFDX_COMMAND_ENV) {
            if !command.trim().is_empty() {
                config.sfdx_command = command;
            }
        }
        config
    }

    /// Explicit trace level override; wins over the environment.
    pub fn with_trace_level(mut self, level: TraceLevel) -> Config {
        self.trace_level = level;
        self
    }

    pub fn with_sfdx_command(mut self, command: impl Into<String>) -> Config {
        self.sfdx_command = command.into();
        self
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
