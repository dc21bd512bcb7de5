//! Geolocation acquisition for the identity step.
//!
//! # Responsibility
//! - Describe a platform position provider and its failure reasons.
//! - Apply an acquired fix to the session coordinates.
//!
//! # See also
//! - `locator` for caching and the single-outstanding-request rule.

pub mod locator;

use crate::model::session::FormSession;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub use locator::{LocationRequest, Locator};

/// Request options handed to the platform provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeolocationOptions {
    pub high_accuracy: bool,
    pub timeout: Duration,
    /// Oldest cached fix that may be reused.
    pub maximum_age: Duration,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::from_secs(60),
        }
    }
}

/// One position reading in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Accuracy radius in meters, when the platform reports one.
    pub accuracy_m: Option<f64>,
}

impl GeoFix {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_m: None,
        }
    }
}

/// Platform capability returning a single position reading.
pub trait GeolocationProvider {
    fn current_position(&self, options: &GeolocationOptions) -> Result<GeoFix, GeolocationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeolocationError {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    /// Another request is still outstanding.
    RequestPending,
    Other(String),
}

impl GeolocationError {
    /// Maps W3C-style platform codes (1 denied, 2 unavailable, 3 timeout).
    pub fn from_platform_code(code: u16, message: &str) -> Self {
        match code {
            1 => Self::PermissionDenied,
            2 => Self::PositionUnavailable,
            3 => Self::Timeout,
            _ => Self::Other(message.trim().to_string()),
        }
    }

    /// Blocking alert text shown to the officer.
    pub fn alert_message(&self) -> String {
        match self {
            Self::PermissionDenied => {
                "Location permission was denied. Allow location access or enter the coordinates manually."
                    .to_string()
            }
            Self::PositionUnavailable => {
                "Location is unavailable. Move to an open area and retry, or enter the coordinates manually."
                    .to_string()
            }
            Self::Timeout => {
                "Getting the location took too long. Retry, or enter the coordinates manually.".to_string()
            }
            Self::RequestPending => "A location request is already in progress.".to_string(),
            Self::Other(message) if message.is_empty() => {
                "Could not get the location. Enter the coordinates manually.".to_string()
            }
            Self::Other(message) => format!("Could not get the location: {message}"),
        }
    }
}

impl Display for GeolocationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "geolocation permission denied"),
            Self::PositionUnavailable => write!(f, "geolocation position unavailable"),
            Self::Timeout => write!(f, "geolocation timed out"),
            Self::RequestPending => write!(f, "geolocation request already pending"),
            Self::Other(message) => write!(f, "geolocation failed: {message}"),
        }
    }
}

impl Error for GeolocationError {}

/// Writes a fix into the session coordinates with six decimals.
pub fn apply_fix(session: &mut FormSession, fix: &GeoFix) {
    session.identity.latitude = format!("{:.6}", fix.latitude);
    session.identity.longitude = format!("{:.6}", fix.longitude);
}
