//! `pdukit_log` v1:
//! Process-wide `tracing` subscriber setup for the `pdukit` binaries.
//!
//! Library crates only emit events; this crate decides where they go.

use std::fmt;

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive string.
pub const C_ENV_LOG_FILTER: &str = "PDUKIT_LOG";

/// Fallback log level when [`C_ENV_LOG_FILTER`] is unset or invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumLogLevel {
    /// Disable all output.
    Off,
    /// Failures only.
    Error,
    /// Failures and warnings (default).
    #[default]
    Warn,
    /// Progress messages.
    Info,
    /// Per-step details.
    Debug,
    /// Everything.
    Trace,
}

impl EnumLogLevel {
    /// Map `-q` / repeated `-v` flags onto a level.
    pub fn from_verbosity(n_verbose: u8, if_quiet: bool) -> Self {
        if if_quiet {
            return Self::Error;
        }
        match n_verbose {
            0 => Self::Warn,
            1 => Self::Info,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    /// `EnvFilter` directive for this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for EnumLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subscriber options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecLogOptions {
    /// Fallback level.
    pub level: EnumLogLevel,
    /// Read directives from [`C_ENV_LOG_FILTER`] before falling back to `level`.
    pub if_use_env: bool,
    /// Emit ANSI colors.
    pub if_ansi: bool,
    /// Print the event target (module path).
    pub if_show_target: bool,
}

impl Default for SpecLogOptions {
    fn default() -> Self {
        Self {
            level: EnumLogLevel::Warn,
            if_use_env: true,
            if_ansi: false,
            if_show_target: false,
        }
    }
}

/// Build the filter used by [`init_logging`].
pub fn derive_env_filter(options: &SpecLogOptions) -> EnvFilter {
    if options.if_use_env
        && let Ok(filter) = EnvFilter::try_from_env(C_ENV_LOG_FILTER)
    {
        return filter;
    }
    EnvFilter::new(options.level.as_str())
}

/// Install a global fmt subscriber writing to stderr.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_logging(options: &SpecLogOptions) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(derive_env_filter(options))
        .with_writer(std::io::stderr)
        .with_ansi(options.if_ansi)
        .with_target(options.if_show_target)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_verbosity() {
        assert_eq!(EnumLogLevel::from_verbosity(0, false), EnumLogLevel::Warn);
        assert_eq!(EnumLogLevel::from_verbosity(1, false), EnumLogLevel::Info);
        assert_eq!(EnumLogLevel::from_verbosity(2, false), EnumLogLevel::Debug);
        assert_eq!(EnumLogLevel::from_verbosity(9, false), EnumLogLevel::Trace);
        assert_eq!(EnumLogLevel::from_verbosity(3, true), EnumLogLevel::Error);
    }

    #[test]
    fn test_derive_env_filter_uses_level_without_env() {
        let options = SpecLogOptions {
            level: EnumLogLevel::Debug,
            if_use_env: false,
            ..SpecLogOptions::default()
        };
        assert_eq!(derive_env_filter(&options).to_string(), "debug");
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        let options = SpecLogOptions {
            if_use_env: false,
            ..SpecLogOptions::default()
        };
        let _ = init_logging(&options);
        assert!(!init_logging(&options));
    }
}
