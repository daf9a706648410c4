//! HTTP client for communicating with a TechnoVE charging station.

use std::time::Duration;

use reqwest::{header, Client, Method, Response};
use serde_json::Value;
use tracing::{debug, warn};

use technove_core::{api, Result, Station, StationInfo, TechnoVEError, MIN_CURRENT};

/// Port the station firmware listens on.
const DEFAULT_PORT: u16 = 80;

/// Per-request timeout applied when the builder is not told otherwise.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Retries after a failed attempt (three attempts total by default).
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Initial delay before the first retry; doubles on each further attempt.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Ceiling for the exponential retry backoff.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Accept header the station firmware expects on every request.
const ACCEPT_HEADER: &str = "application/json, text/plain, */*";

/// Exponential backoff delay for a retry, capped at [`MAX_RETRY_DELAY`].
fn retry_backoff(initial: Duration, attempt: u32) -> Duration {
    initial
        .saturating_mul(2u32.saturating_pow(attempt))
        .min(MAX_RETRY_DELAY)
}

/// Asynchronous client for the local HTTP API of a TechnoVE station.
///
/// The client keeps the connection configuration (host, port, timeout, retry
/// policy) fixed for its lifetime and caches the last station snapshot
/// fetched by [`update`](Self::update).
///
/// # Retry Logic
///
/// Requests that fail at the transport level (connection refused, reset,
/// timeout) are retried with exponential backoff before the error surfaces
/// as [`TechnoVEError::Connection`] or [`TechnoVEError::ConnectionTimeout`].
/// Unexpected HTTP statuses and malformed payloads are never retried.
///
/// # Resource Lifecycle
///
/// The underlying `reqwest::Client` is a handle to a lazily-opened connection
/// pool. If the builder is given one via [`TechnoVEBuilder::session`], the
/// pool is shared with the caller; otherwise the client builds its own.
/// Either way the pool is released when the last handle is dropped, on every
/// exit path, so there is no close call to forget.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use technove::TechnoVE;
///
/// # async fn example() -> technove::Result<()> {
/// let mut station = TechnoVE::builder("192.168.1.25")
///     .request_timeout(Duration::from_secs(4))
///     .max_retries(1)
///     .build()?;
///
/// let snapshot = station.update().await?;
/// println!("Firmware {}", snapshot.info.version);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TechnoVE {
    client: Client,
    host: String,
    base_url: String,
    request_timeout: Duration,
    max_retries: u32,
    retry_delay: Duration,
    station: Option<Station>,
}

/// Builder for [`TechnoVE`] clients.
///
/// Defaults: port 80, 8 s request timeout, 2 retries starting at 500 ms, and
/// an owned connection pool.
#[derive(Debug, Clone, Default)]
pub struct TechnoVEBuilder {
    host: String,
    port: Option<u16>,
    session: Option<Client>,
    request_timeout: Option<Duration>,
    max_retries: Option<u32>,
    retry_delay: Option<Duration>,
}

impl TechnoVEBuilder {
    /// Port the station listens on.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Use an existing HTTP connection pool instead of creating one.
    ///
    /// `reqwest::Client` is a cheap clonable handle; passing one in lets
    /// several station clients (or the surrounding application) share
    /// connections. The per-request timeout still applies.
    pub fn session(mut self, session: Client) -> Self {
        self.session = Some(session);
        self
    }

    /// Per-request timeout, owned and shared pools alike.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// How many times a failed attempt is retried before giving up.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Initial delay between retries; doubles each attempt, capped at 5 s.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    /// Build the client, creating an owned connection pool if none was
    /// supplied.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn build(self) -> Result<TechnoVE> {
        let host = self.host;
        let client = match self.session {
            Some(session) => session,
            None => Client::builder()
                .user_agent(concat!("technove/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| TechnoVEError::Connection {
                    host: host.clone(),
                    message: format!("failed to create HTTP client: {}", e),
                })?,
        };

        let port = self.port.unwrap_or(DEFAULT_PORT);

        Ok(TechnoVE {
            client,
            base_url: format!("http://{}:{}", host, port),
            host,
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            retry_delay: self.retry_delay.unwrap_or(DEFAULT_RETRY_DELAY),
            station: None,
        })
    }
}

impl TechnoVE {
    /// Create a client for the station at `host` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(host: &str) -> Result<Self> {
        Self::builder(host).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(host: &str) -> TechnoVEBuilder {
        TechnoVEBuilder {
            host: host.to_string(),
            ..TechnoVEBuilder::default()
        }
    }

    /// Last successfully fetched snapshot, if any.
    pub fn station(&self) -> Option<&Station> {
        self.station.as_ref()
    }

    /// Map a transport error onto the connection taxonomy.
    ///
    /// Timeouts get their own variant; everything else the transport can
    /// throw (refused, reset, unreachable) collapses into `Connection`.
    fn connection_error(&self, err: reqwest::Error) -> TechnoVEError {
        if err.is_timeout() {
            TechnoVEError::ConnectionTimeout {
                host: self.host.clone(),
            }
        } else {
            TechnoVEError::Connection {
                host: self.host.clone(),
                message: err.to_string(),
            }
        }
    }

    /// Interpret a response from the station.
    ///
    /// The firmware answers JSON on the read endpoints and plain text (for
    /// example `"ok"`) on the control endpoints; plain text passes through
    /// as a JSON string. 4xx/5xx statuses and unparseable JSON are reported
    /// as errors that are never retried.
    async fn handle_response(&self, response: Response, uri: &str) -> Result<Value> {
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("")
            .to_string();

        // A failure while streaming the body is as transient as one while
        // connecting, so it joins the retryable class.
        let text = response
            .text()
            .await
            .map_err(|e| TechnoVEError::Connection {
                host: self.host.clone(),
                message: format!("failed to read response body from {}: {}", uri, e),
            })?;

        if status.is_client_error() || status.is_server_error() {
            let message = if text.is_empty() {
                status.canonical_reason().unwrap_or("unknown").to_string()
            } else {
                text
            };
            return Err(TechnoVEError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if content_type.contains("application/json") {
            serde_json::from_str(&text).map_err(|e| {
                TechnoVEError::InvalidResponse(format!("malformed JSON from {}: {}", uri, e))
            })
        } else {
            Ok(Value::String(text))
        }
    }

    /// Issue a request to the station with automatic retry logic.
    ///
    /// Only connection-class failures are retried, with exponential backoff
    /// capped at [`MAX_RETRY_DELAY`]. The final error surfaces unchanged.
    async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, uri);
        let mut attempt = 0;

        loop {
            let mut request = self
                .client
                .request(method.clone(), &url)
                .timeout(self.request_timeout)
                .header(header::ACCEPT, ACCEPT_HEADER);
            if let Some(body) = &body {
                request = request.json(body);
            }

            debug!("Sending {} {} (attempt {})", method, url, attempt + 1);

            let result = match request.send().await {
                Ok(response) => self.handle_response(response, uri).await,
                Err(e) => Err(self.connection_error(e)),
            };

            match result {
                Ok(value) => return Ok(value),
                Err(e) if e.is_connection_error() && attempt < self.max_retries => {
                    let delay = retry_backoff(self.retry_delay, attempt);
                    warn!(
                        "Request to {} failed ({}), retrying in {:?}",
                        url, e, delay
                    );
                    attempt += 1;
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    if e.is_connection_error() {
                        warn!("Giving up on {} after {} attempts", url, attempt + 1);
                    }
                    return Err(e);
                }
            }
        }
    }

    /// Fetch the current state of the station.
    ///
    /// On success the cached snapshot is replaced and the new one returned.
    /// On any failure the previous snapshot is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the station is unreachable, answers with an
    /// unexpected status, or returns an empty or malformed snapshot.
    pub async fn update(&mut self) -> Result<Station> {
        let data = self
            .request(Method::GET, "/station/get/info", None)
            .await?;

        let fields = match &data {
            Value::Null => return Err(TechnoVEError::EmptyResponse),
            Value::Object(fields) => fields,
            _ => {
                return Err(TechnoVEError::InvalidResponse(
                    "expected a JSON object from /station/get/info".to_string(),
                ))
            }
        };
        if fields.is_empty() {
            return Err(TechnoVEError::EmptyResponse);
        }

        let info: StationInfo = serde_json::from_value(data)
            .map_err(|e| TechnoVEError::InvalidResponse(format!("unexpected payload: {}", e)))?;

        let station = Station::new(info);
        self.station = Some(station.clone());
        Ok(station)
    }

    /// Enable or disable auto-charge.
    ///
    /// # Errors
    ///
    /// Returns an error if the station rejects the setting or is unreachable.
    pub async fn set_auto_charge(&self, enabled: bool) -> Result<()> {
        let body = serde_json::to_value(api::AutoChargeRequest { activated: enabled })?;
        self.request(Method::POST, "/station/set/automatic", Some(body))
            .await
            .map(|_| ())
    }

    /// Start or stop charging the plugged-in vehicle.
    ///
    /// The station rejects manual control while auto-charge is enabled, so
    /// the call is refused up front when the cached snapshot reports
    /// auto-charge. Run [`update`](Self::update) first for a fresh verdict.
    ///
    /// # Errors
    ///
    /// Returns [`TechnoVEError::AutoChargeEnabled`] without touching the
    /// network when auto-charge is on, or a transport/status error from the
    /// request itself.
    pub async fn set_charging_enabled(&self, enabled: bool) -> Result<()> {
        if let Some(station) = &self.station {
            if station.info.auto_charge {
                return Err(TechnoVEError::AutoChargeEnabled);
            }
        }

        let action = if enabled { "start" } else { "stop" };
        self.request(Method::GET, &format!("/station/control/{}", action), None)
            .await
            .map(|_| ())
    }

    /// Set the max charging current, in amps.
    ///
    /// This is the charge speed control the hardware exposes. Values below
    /// [`MIN_CURRENT`] are rejected up front since the firmware would
    /// silently ignore them; values above the station's installed limit are
    /// rejected when a snapshot is cached to compare against. While the
    /// station is in sharing mode the sharing config owns per-station
    /// limits and the call is refused.
    ///
    /// # Errors
    ///
    /// Returns [`TechnoVEError::SharingModeEnabled`],
    /// [`TechnoVEError::CurrentTooLow`], or [`TechnoVEError::CurrentTooHigh`]
    /// without touching the network, or a transport/status error from the
    /// request itself.
    pub async fn set_max_current(&self, max_current: u32) -> Result<()> {
        if let Some(station) = &self.station {
            if station.info.in_sharing_mode {
                return Err(TechnoVEError::SharingModeEnabled);
            }
        }
        if max_current < MIN_CURRENT {
            return Err(TechnoVEError::CurrentTooLow {
                value: max_current,
                min: MIN_CURRENT,
            });
        }
        if let Some(station) = &self.station {
            if max_current > station.info.max_station_current {
                return Err(TechnoVEError::CurrentTooHigh {
                    value: max_current,
                    max: station.info.max_station_current,
                });
            }
        }

        let body = serde_json::to_value(api::MaxCurrentRequest::new(max_current))?;
        self.request(Method::POST, "/station/control/partage", Some(body))
            .await
            .map(|_| ())
    }

    /// Opt the station in or out of the utility's high-tariff schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the station rejects the setting or is unreachable.
    pub async fn set_high_tariff_schedule(&self, enabled: bool) -> Result<()> {
        let body = serde_json::to_value(api::HighTariffScheduleRequest { activated: enabled })?;
        self.request(Method::POST, "/station/schedule/high/activate", Some(body))
            .await
            .map(|_| ())
    }
}
