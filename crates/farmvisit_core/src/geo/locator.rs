//! Location request coordination.
//!
//! # Invariants
//! - At most one request is outstanding at a time.
//! - A fix younger than `maximum_age` is reused without asking the provider.
//! - `complete` always clears the outstanding request, success or failure.

use super::{GeoFix, GeolocationError, GeolocationOptions, GeolocationProvider};
use log::{info, warn};
use std::time::Instant;

/// What the caller has to do after `Locator::begin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationRequest {
    /// A recent fix is available; no platform call is needed.
    Cached(GeoFix),
    /// Ask the platform with these options, then call `complete`.
    Started(GeolocationOptions),
}

#[derive(Debug, Clone, Default)]
pub struct Locator {
    options: GeolocationOptions,
    cached: Option<(GeoFix, Instant)>,
    pending: bool,
}

impl Locator {
    pub fn new(options: GeolocationOptions) -> Self {
        Self {
            options,
            cached: None,
            pending: false,
        }
    }

    pub fn options(&self) -> &GeolocationOptions {
        &self.options
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Starts a request, or serves a recent cached fix.
    ///
    /// # Errors
    /// `RequestPending` while another request is outstanding.
    pub fn begin(&mut self, now: Instant) -> Result<LocationRequest, GeolocationError> {
        if self.pending {
            return Err(GeolocationError::RequestPending);
        }
        if let Some((fix, acquired_at)) = self.cached {
            if now.saturating_duration_since(acquired_at) <= self.options.maximum_age {
                info!("event=geo_locate module=geo status=cached");
                return Ok(LocationRequest::Cached(fix));
            }
        }
        self.pending = true;
        info!("event=geo_locate module=geo status=start");
        Ok(LocationRequest::Started(self.options))
    }

    /// Finishes the outstanding request with the platform result.
    pub fn complete(
        &mut self,
        result: Result<GeoFix, GeolocationError>,
        now: Instant,
    ) -> Result<GeoFix, GeolocationError> {
        self.pending = false;
        match result {
            Ok(fix) => {
                self.cached = Some((fix, now));
                info!("event=geo_locate module=geo status=ok");
                Ok(fix)
            }
            Err(err) => {
                warn!("event=geo_locate module=geo status=error reason={err}");
                Err(err)
            }
        }
    }

    /// Runs a whole request against a synchronous provider.
    pub fn locate<P: GeolocationProvider + ?Sized>(
        &mut self,
        provider: &P,
        now: Instant,
    ) -> Result<GeoFix, GeolocationError> {
        match self.begin(now)? {
            LocationRequest::Cached(fix) => Ok(fix),
            LocationRequest::Started(options) => {
                let result = provider.current_position(&options);
                self.complete(result, now)
            }
        }
    }
}
