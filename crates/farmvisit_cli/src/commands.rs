//! Command implementations; each returns the text to print.

use farmvisit_core::config::{ENV_API_BASE_URL, ENV_API_TIMEOUT_SECS};
use farmvisit_core::gate::step_gate::resume_step;
use farmvisit_core::{
    allowed_content_types, assemble, can_access_step, core_version, last_completed_step,
    ping as core_ping, validate_session, validate_step, Attachment, AttachmentError, Choice,
    CommodityKind, ConfigError, FormFlow, FormSession, HttpTransport, StepId, SubmitConfig,
    SubmitError, TransportError, ValidationContext, ValidationReport,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum CliError {
    Io { path: PathBuf, source: std::io::Error },
    Json { path: PathBuf, source: serde_json::Error },
    UnknownStep(u8),
    UnsupportedPhoto(PathBuf),
    Attachment(AttachmentError),
    Invalid(ValidationReport),
    Config(ConfigError),
    Transport(TransportError),
    Submit(SubmitError),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read `{}`: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "`{}` is not a survey session: {source}", path.display())
            }
            Self::UnknownStep(step) => write!(f, "unknown step {step}; expected 1-5"),
            Self::UnsupportedPhoto(path) => write!(
                f,
                "`{}` is not a supported photo; accepted types: {}",
                path.display(),
                allowed_content_types().join(", ")
            ),
            Self::Attachment(err) => write!(f, "{err}"),
            Self::Invalid(report) => {
                writeln!(f, "{} issue(s) found", report.len())?;
                write!(f, "{}", render_issues(report))
            }
            Self::Config(err) => write!(f, "{err}"),
            Self::Transport(err) => write!(f, "{err}"),
            Self::Submit(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Attachment(err) => Some(err),
            Self::Invalid(report) => Some(report),
            Self::Config(err) => Some(err),
            Self::Transport(err) => Some(err),
            Self::Submit(err) => Some(err),
            Self::UnknownStep(_) | Self::UnsupportedPhoto(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TransportError> for CliError {
    fn from(value: TransportError) -> Self {
        Self::Transport(value)
    }
}

impl From<AttachmentError> for CliError {
    fn from(value: AttachmentError) -> Self {
        Self::Attachment(value)
    }
}

impl From<SubmitError> for CliError {
    fn from(value: SubmitError) -> Self {
        match value {
            SubmitError::Invalid(report) => Self::Invalid(report),
            other => Self::Submit(other),
        }
    }
}

/// Connection flags for `submit`; unset values fall back to the environment.
#[derive(Debug, Clone, Default)]
pub struct SubmitArgs {
    pub api_base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl SubmitArgs {
    fn config(&self) -> Result<SubmitConfig, ConfigError> {
        SubmitConfig::from_lookup(|key| {
            if key == ENV_API_BASE_URL {
                self.api_base_url.clone()
            } else if key == ENV_API_TIMEOUT_SECS {
                self.timeout_secs.map(|secs| secs.to_string())
            } else {
                None
            }
        })
    }
}

pub fn parse_kind(raw: &str) -> Result<CommodityKind, String> {
    CommodityKind::parse(raw).ok_or_else(|| {
        let expected = CommodityKind::ALL
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("unknown commodity kind `{raw}`; expected one of {expected}")
    })
}

pub fn ping() -> String {
    format!(
        "farmvisit_core ping={}\nfarmvisit_core version={}",
        core_ping(),
        core_version()
    )
}

pub fn template(kind: CommodityKind) -> Result<String, CliError> {
    let mut session = FormSession::new();
    session.select_commodity(kind);
    session.to_json_pretty().map_err(|source| CliError::Json {
        path: PathBuf::from("<template>"),
        source,
    })
}

pub fn check(file: &Path, step: Option<u8>, photo: Option<&Path>) -> Result<String, CliError> {
    let session = load_session(file, photo)?;
    let ctx = ValidationContext::current();
    let (scope, report) = match step {
        Some(index) => {
            let step = StepId::from_index(index).ok_or(CliError::UnknownStep(index))?;
            (
                format!("step {} ({})", step.index(), step.title()),
                validate_step(step, &session, &ctx),
            )
        }
        None => ("session".to_string(), validate_session(&session, &ctx)),
    };
    if report.is_valid() {
        Ok(format!("{scope} is valid"))
    } else {
        Err(CliError::Invalid(report))
    }
}

pub fn gate(file: &Path) -> Result<String, CliError> {
    let session = load_session(file, None)?;
    let mut output = format!("last completed step: {}\n", last_completed_step(&session));
    for step in StepId::ALL {
        let state = if can_access_step(step, &session) {
            "open"
        } else {
            "locked"
        };
        let _ = writeln!(
            output,
            "{} {:<18} {:<26} {state}",
            step.index(),
            step.title(),
            step.route()
        );
    }
    let _ = write!(output, "resume at: {}", resume_step(&session).route());
    Ok(output)
}

pub fn payload(file: &Path, photo: Option<&Path>) -> Result<String, CliError> {
    let session = load_session(file, photo)?;
    let payload = assemble(&session);
    let mut output = String::new();
    for (key, value) in payload.fields() {
        let _ = writeln!(output, "{key}={value}");
    }
    for part in payload.attachments() {
        let _ = writeln!(
            output,
            "{}=@{} ({}, {} bytes)",
            part.field,
            part.file_name,
            part.content_type,
            part.bytes.len()
        );
    }
    Ok(output.trim_end().to_string())
}

pub fn submit(file: &Path, photo: Option<&Path>, args: &SubmitArgs) -> Result<String, CliError> {
    let mut session = load_session(file, None)?;
    session.clear_attachment();
    let mut flow = FormFlow::with_session(session);
    if let Some(path) = photo {
        flow.stage_attachment(read_photo(path)?)?;
    }

    let config = args.config()?;
    let transport = HttpTransport::new(&config)?;
    let receipt = flow.submit(&transport, &ValidationContext::current())?;
    Ok(format!(
        "submitted to {} (status {})",
        transport.endpoint(),
        receipt.status
    ))
}

fn load_session(file: &Path, photo: Option<&Path>) -> Result<FormSession, CliError> {
    let raw = fs::read_to_string(file).map_err(|source| CliError::Io {
        path: file.to_path_buf(),
        source,
    })?;
    let mut session = FormSession::from_json(&raw).map_err(|source| CliError::Json {
        path: file.to_path_buf(),
        source,
    })?;
    if let Some(path) = photo {
        session.set_attachment(read_photo(path)?);
    }
    Ok(session)
}

fn read_photo(path: &Path) -> Result<Attachment, CliError> {
    let raw_path = path.to_string_lossy();
    let content_type = Attachment::content_type_for_path(&raw_path)
        .ok_or_else(|| CliError::UnsupportedPhoto(path.to_path_buf()))?;
    let bytes = fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());
    Ok(Attachment::new(file_name, content_type, bytes))
}

fn render_issues(report: &ValidationReport) -> String {
    report
        .field_errors()
        .into_iter()
        .map(|(path, message)| format!("  {path}: {message}"))
        .collect::<Vec<_>>()
        .join("\n")
}
