//! Process logging bootstrap.
//!
//! # Responsibility
//! - Start rolling file logs once per process.
//! - Capture panics as sanitized log events.
//!
//! # Invariants
//! - Init is idempotent for an identical `LoggingConfig`.
//! - Re-initialization with a different level or directory is rejected.
//! - Initialization never panics.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "movieshelf";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static ACTIVE_LOGGING: OnceCell<ActiveLogging> = OnceCell::new();
static PANIC_HOOK_INSTALLED: OnceCell<()> = OnceCell::new();

struct ActiveLogging {
    config: LoggingConfig,
    _handle: LoggerHandle,
}

/// Validated logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    level: &'static str,
    log_dir: PathBuf,
}

impl LoggingConfig {
    /// Accepts `trace|debug|info|warn|error` (case-insensitive, `warning`
    /// allowed) and an absolute directory.
    pub fn new(level: &str, log_dir: impl AsRef<Path>) -> Result<Self, LoggingError> {
        let level = match level.trim().to_ascii_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" | "warning" => "warn",
            "error" => "error",
            other => return Err(LoggingError::UnsupportedLevel(other.to_string())),
        };

        let log_dir = log_dir.as_ref();
        if log_dir.as_os_str().is_empty() || !log_dir.is_absolute() {
            return Err(LoggingError::RelativeDirectory(log_dir.to_path_buf()));
        }

        Ok(Self {
            level,
            log_dir: log_dir.to_path_buf(),
        })
    }

    /// Build-mode default level inside `log_dir`.
    pub fn with_default_level(log_dir: impl AsRef<Path>) -> Result<Self, LoggingError> {
        Self::new(default_log_level(), log_dir)
    }

    pub fn level(&self) -> &'static str {
        self.level
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    UnsupportedLevel(String),
    RelativeDirectory(PathBuf),
    CreateDirectory { path: PathBuf, message: String },
    Backend(String),
    AlreadyInitialized { active: LoggingConfig },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::RelativeDirectory(path) => write!(
                f,
                "log_dir must be an absolute path, got `{}`",
                path.display()
            ),
            Self::CreateDirectory { path, message } => write!(
                f,
                "failed to create log directory `{}`: {message}",
                path.display()
            ),
            Self::Backend(message) => write!(f, "failed to start logger: {message}"),
            Self::AlreadyInitialized { active } => write!(
                f,
                "logging already initialized with level `{}` at `{}`; refusing to switch",
                active.level,
                active.log_dir.display()
            ),
        }
    }
}

impl Error for LoggingError {}

/// Starts file logging for the process.
///
/// # Errors
/// - `AlreadyInitialized` when a different config is already active.
/// - `CreateDirectory` / `Backend` when the log sink cannot be set up.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let active = ACTIVE_LOGGING.get_or_try_init(|| start_logger(config))?;
    if active.config != *config {
        return Err(LoggingError::AlreadyInitialized {
            active: active.config.clone(),
        });
    }
    Ok(())
}

/// Active logging config, or `None` before [`init_logging`] succeeds.
pub fn logging_status() -> Option<LoggingConfig> {
    ACTIVE_LOGGING.get().map(|active| active.config.clone())
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(config: &LoggingConfig) -> Result<ActiveLogging, LoggingError> {
    std::fs::create_dir_all(&config.log_dir).map_err(|err| LoggingError::CreateDirectory {
        path: config.log_dir.clone(),
        message: err.to_string(),
    })?;

    let handle = Logger::try_with_str(config.level)
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(config.log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook_once();

    info!(
        "event=app_start module=core status=ok platform={} version={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION")
    );
    info!(
        "event=logging_init module=core status=ok level={} log_dir={}",
        config.level,
        config.log_dir.display()
    );

    Ok(ActiveLogging {
        config: config.clone(),
        _handle: handle,
    })
}

fn install_panic_hook_once() {
    PANIC_HOOK_INSTALLED.get_or_init(|| {
        let previous_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            // Payload may echo entity text; strip newlines and cap length.
            let location = panic_info
                .location()
                .map(|loc| format!("{}:{}", loc.file(), loc.line()))
                .unwrap_or_else(|| "unknown".to_string());
            let payload = panic_payload_summary(panic_info);
            error!("event=panic_captured module=core status=error location={location} payload={payload}");
            previous_hook(panic_info);
        }));
    });
}

fn panic_payload_summary(info: &std::panic::PanicHookInfo<'_>) -> String {
    let payload = info
        .payload()
        .downcast_ref::<&str>()
        .map(|message| (*message).to_string())
        .or_else(|| info.payload().downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());

    sanitize_message(&payload, MAX_PANIC_PAYLOAD_CHARS)
}

fn sanitize_message(value: &str, max_chars: usize) -> String {
    let normalized = value.replace(['\n', '\r'], " ");
    let mut truncated = normalized.chars().take(max_chars).collect::<String>();
    if normalized.chars().count() > max_chars {
        truncated.push_str("...");
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, sanitize_message, LoggingConfig, LoggingError};

    #[test]
    fn config_normalizes_level_names() {
        let dir = std::env::temp_dir();
        assert_eq!(LoggingConfig::new("INFO", &dir).unwrap().level(), "info");
        assert_eq!(LoggingConfig::new(" warning ", &dir).unwrap().level(), "warn");
    }

    #[test]
    fn config_rejects_unknown_level_and_relative_dir() {
        let err = LoggingConfig::new("verbose", std::env::temp_dir()).unwrap_err();
        assert_eq!(err, LoggingError::UnsupportedLevel("verbose".to_string()));

        let err = LoggingConfig::new("info", "logs/dev").unwrap_err();
        assert!(matches!(err, LoggingError::RelativeDirectory(_)));
    }

    #[test]
    fn sanitize_message_strips_newlines_and_truncates() {
        let sanitized = sanitize_message("line1\nline2\rline3", 8);
        assert!(!sanitized.contains('\n'));
        assert!(!sanitized.contains('\r'));
        assert!(sanitized.ends_with("..."));
    }

    #[test]
    fn init_is_idempotent_and_rejects_reconfiguration() {
        // The logger outlives the test, so the directory is left in place.
        let dir = std::env::temp_dir().join(format!("movieshelf-logging-{}", std::process::id()));
        let config = LoggingConfig::new("info", &dir).unwrap();
        let other_level = LoggingConfig::new("debug", &dir).unwrap();

        init_logging(&config).unwrap();
        init_logging(&config).unwrap();

        let err = init_logging(&other_level).unwrap_err();
        assert!(matches!(err, LoggingError::AlreadyInitialized { .. }));
        assert_eq!(logging_status(), Some(config));
    }
}
