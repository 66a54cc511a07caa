//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{path::PathBuf, str::FromStr, time::Duration};

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::domain::navigation::DEFAULT_SCROLL_THRESHOLD;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "devguide";
const DEFAULT_DEBOUNCE_MS: u64 = 500;
const DEFAULT_POLL_INTERVAL_MS: u64 = 250;
const DEFAULT_PREVIEW_DIR: &str = "/tmp/devguide-preview";
const DEFAULT_SUBMIT_DELAY_MS: u64 = 1_000;
const DEFAULT_STATUS_TTL_MS: u64 = 10_000;

/// Command-line arguments for the devguide binary.
#[derive(Debug, Parser)]
#[command(
    name = "devguide",
    version,
    about = "Live HTML/CSS sandbox and contact form tools for the web development guide"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "DEVGUIDE_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub logging: LoggingOverrides,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Compose a markup file and a style file into one preview document.
    Render(RenderArgs),
    /// Run an interactive sandbox session that publishes previews to a directory.
    Sandbox(Box<SandboxArgs>),
    /// Validate and submit one contact form message.
    Contact(ContactArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct LoggingOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    /// HTML document to render.
    #[arg(value_name = "MARKUP", value_hint = ValueHint::FilePath)]
    pub markup: PathBuf,

    /// Style sheet injected before `</head>`.
    #[arg(value_name = "STYLE", value_hint = ValueHint::FilePath)]
    pub style: PathBuf,

    /// Write the composed document here instead of stdout.
    #[arg(long, short, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct SandboxArgs {
    /// HTML file watched as the markup editor.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub markup: Option<PathBuf>,

    /// CSS file watched as the style editor.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub style: Option<PathBuf>,

    /// Start from the card example instead of the blank template.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub example: bool,

    #[command(flatten)]
    pub overrides: PreviewOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct PreviewOverrides {
    /// Override the directory previews are written to.
    #[arg(long = "preview-out-dir", value_name = "PATH")]
    pub out_dir: Option<PathBuf>,

    /// Override the quiet period before an edit is rendered.
    #[arg(long = "preview-debounce-ms", value_name = "MILLIS")]
    pub debounce_ms: Option<u64>,

    /// Override how often source files are checked for changes.
    #[arg(long = "preview-poll-ms", value_name = "MILLIS")]
    pub poll_interval_ms: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct ContactArgs {
    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub email: String,

    #[arg(long, default_value = "")]
    pub subject: String,

    #[arg(long, default_value = "")]
    pub message: String,

    #[command(flatten)]
    pub overrides: ContactOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ContactOverrides {
    /// Override the simulated delivery delay.
    #[arg(long = "contact-submit-delay-ms", value_name = "MILLIS")]
    pub submit_delay_ms: Option<u64>,

    /// Override how long status messages stay visible.
    #[arg(long = "contact-status-ttl-ms", value_name = "MILLIS")]
    pub status_ttl_ms: Option<u64>,
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub preview: PreviewSettings,
    pub contact: ContactSettings,
    pub navigation: NavigationSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct PreviewSettings {
    pub debounce: Duration,
    pub poll_interval: Duration,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ContactSettings {
    pub submit_delay: Duration,
    pub status_ttl: Duration,
}

#[derive(Debug, Clone)]
pub struct NavigationSettings {
    pub scroll_threshold: f64,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("DEVGUIDE").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    raw.apply_logging_overrides(&cli.logging);
    match cli.command.as_ref() {
        Some(Command::Sandbox(args)) => raw.apply_preview_overrides(&args.overrides),
        Some(Command::Contact(args)) => raw.apply_contact_overrides(&args.overrides),
        Some(Command::Render(_)) | None => {}
    }

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    preview: RawPreviewSettings,
    contact: RawContactSettings,
    navigation: RawNavigationSettings,
}

impl RawSettings {
    fn apply_logging_overrides(&mut self, overrides: &LoggingOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }

    fn apply_preview_overrides(&mut self, overrides: &PreviewOverrides) {
        if let Some(dir) = overrides.out_dir.as_ref() {
            self.preview.output_dir = Some(dir.clone());
        }
        if let Some(millis) = overrides.debounce_ms {
            self.preview.debounce_ms = Some(millis);
        }
        if let Some(millis) = overrides.poll_interval_ms {
            self.preview.poll_interval_ms = Some(millis);
        }
    }

    fn apply_contact_overrides(&mut self, overrides: &ContactOverrides) {
        if let Some(millis) = overrides.submit_delay_ms {
            self.contact.submit_delay_ms = Some(millis);
        }
        if let Some(millis) = overrides.status_ttl_ms {
            self.contact.status_ttl_ms = Some(millis);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            preview,
            contact,
            navigation,
        } = raw;

        Ok(Self {
            logging: build_logging_settings(logging)?,
            preview: build_preview_settings(preview)?,
            contact: build_contact_settings(contact)?,
            navigation: build_navigation_settings(navigation)?,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_preview_settings(preview: RawPreviewSettings) -> Result<PreviewSettings, LoadError> {
    let debounce = positive_millis(
        preview.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS),
        "preview.debounce_ms",
    )?;
    let poll_interval = positive_millis(
        preview.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS),
        "preview.poll_interval_ms",
    )?;

    let output_dir = preview
        .output_dir
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PREVIEW_DIR));
    if output_dir.as_os_str().is_empty() {
        return Err(LoadError::invalid(
            "preview.output_dir",
            "path must not be empty",
        ));
    }

    Ok(PreviewSettings {
        debounce,
        poll_interval,
        output_dir,
    })
}

fn build_contact_settings(contact: RawContactSettings) -> Result<ContactSettings, LoadError> {
    let submit_delay =
        Duration::from_millis(contact.submit_delay_ms.unwrap_or(DEFAULT_SUBMIT_DELAY_MS));
    let status_ttl = positive_millis(
        contact.status_ttl_ms.unwrap_or(DEFAULT_STATUS_TTL_MS),
        "contact.status_ttl_ms",
    )?;

    Ok(ContactSettings {
        submit_delay,
        status_ttl,
    })
}

fn build_navigation_settings(
    navigation: RawNavigationSettings,
) -> Result<NavigationSettings, LoadError> {
    let scroll_threshold = navigation
        .scroll_threshold
        .unwrap_or(DEFAULT_SCROLL_THRESHOLD);
    if !scroll_threshold.is_finite() || scroll_threshold < 0.0 {
        return Err(LoadError::invalid(
            "navigation.scroll_threshold",
            "must be a finite, non-negative number of pixels",
        ));
    }

    Ok(NavigationSettings { scroll_threshold })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPreviewSettings {
    debounce_ms: Option<u64>,
    poll_interval_ms: Option<u64>,
    output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawContactSettings {
    submit_delay_ms: Option<u64>,
    status_ttl_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawNavigationSettings {
    scroll_threshold: Option<f64>,
}

fn positive_millis(value: u64, key: &'static str) -> Result<Duration, LoadError> {
    if value == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }
    Ok(Duration::from_millis(value))
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}
