//! Transport seam for survey submission.
//!
//! # Invariants
//! - A send is all-or-nothing: any error means the server did not accept the
//!   survey.
//! - Non-2xx responses are errors carrying status and body.

use super::assembler::SubmissionPayload;
use crate::config::SubmitConfig;
use log::{error, info, warn};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use reqwest::Url;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Server acknowledgment of an accepted survey.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub status: u16,
    pub body: String,
}

#[derive(Debug)]
pub enum TransportError {
    /// Request could not be built or the connection failed.
    Http(reqwest::Error),
    /// The server answered with a non-success status.
    Status { status: u16, body: String },
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http(err) => write!(f, "submission request failed: {err}"),
            Self::Status { status, body } => {
                write!(f, "submission rejected with status {status}")?;
                if !body.trim().is_empty() {
                    write!(f, ": {}", body.trim())?;
                }
                Ok(())
            }
        }
    }
}

impl Error for TransportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            Self::Status { .. } => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Delivers an assembled payload to the backend.
pub trait Transport {
    fn send(&self, payload: &SubmissionPayload) -> Result<SubmitReceipt, TransportError>;
}

/// `multipart/form-data` POST to the configured survey endpoint.
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(config: &SubmitConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("farmvisit/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn build_form(payload: &SubmissionPayload) -> Result<Form, TransportError> {
        let mut form = Form::new();
        for (key, value) in payload.fields() {
            form = form.text(key.clone(), value.clone());
        }
        for attachment in payload.attachments() {
            let part = Part::bytes(attachment.bytes.clone())
                .file_name(attachment.file_name.clone())
                .mime_str(&attachment.content_type)?;
            form = form.part(attachment.field.clone(), part);
        }
        Ok(form)
    }
}

impl Transport for HttpTransport {
    fn send(&self, payload: &SubmissionPayload) -> Result<SubmitReceipt, TransportError> {
        let started_at = Instant::now();
        let form = Self::build_form(payload)?;

        let request = self.client.post(self.endpoint.clone()).multipart(form);
        let response = match request.send() {
            Ok(response) => response,
            Err(err) => {
                error!(
                    "event=http_send module=transport status=error duration_ms={} error_code=request_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        let status = response.status();
        let body = match response.text() {
            Ok(body) => body,
            Err(err) => {
                warn!(
                    "event=http_send module=transport status=degraded error_code=body_read http_status={} error={}",
                    status.as_u16(),
                    err
                );
                String::new()
            }
        };
        if !status.is_success() {
            error!(
                "event=http_send module=transport status=error duration_ms={} error_code=http_status http_status={}",
                started_at.elapsed().as_millis(),
                status.as_u16()
            );
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!(
            "event=http_send module=transport status=ok duration_ms={} http_status={}",
            started_at.elapsed().as_millis(),
            status.as_u16()
        );
        Ok(SubmitReceipt {
            status: status.as_u16(),
            body,
        })
    }
}
