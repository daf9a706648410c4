//! Test support: an in-process mock TechnoVE station.
//!
//! Binds an axum server on a random local port, speaks the station's little
//! REST dialect, records every request it sees, and can be scripted to
//! answer with arbitrary bodies, statuses, or delays.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tokio::net::TcpListener;

use technove::{TechnoVE, TechnoVEBuilder};

/// One request the mock station saw.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

/// Scripted answer for the info endpoint.
#[derive(Debug, Clone)]
pub struct ScriptedResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub body: String,
}

/// Shared state behind the mock station's handlers.
#[derive(Debug, Clone)]
pub struct MockStationState {
    /// Requests seen, in arrival order
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    /// Current script for `/station/get/info`
    info_response: Arc<Mutex<ScriptedResponse>>,
    /// How many requests are still to be answered slowly
    slow_responses: Arc<Mutex<u32>>,
    /// How long a slow answer sleeps
    slow_delay: Arc<Mutex<Duration>>,
}

impl Default for MockStationState {
    fn default() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            info_response: Arc::new(Mutex::new(ScriptedResponse {
                status: StatusCode::OK,
                content_type: "application/json".to_string(),
                body: sample_info().to_string(),
            })),
            slow_responses: Arc::new(Mutex::new(0)),
            slow_delay: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }
}

impl MockStationState {
    fn record(&self, method: &str, path: &str, body: Option<Value>) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            path: path.to_string(),
            body,
        });
    }

    // Requests are recorded before stalling so timed-out attempts still
    // count; the handler future is dropped once the client hangs up.
    async fn maybe_stall(&self) {
        let delay = {
            let mut remaining = self.slow_responses.lock().unwrap();
            if *remaining == 0 {
                return;
            }
            *remaining -= 1;
            *self.slow_delay.lock().unwrap()
        };
        tokio::time::sleep(delay).await;
    }
}

/// Snapshot payload a healthy station would return.
pub fn sample_info() -> Value {
    serde_json::json!({
        "auto_charge": false,
        "conflictInSharingConfig": false,
        "current": 0,
        "energySession": 0.0,
        "energyTotal": 1234567,
        "highChargePeriodActive": false,
        "id": "02:42:ac:11:00:02",
        "inSharingMode": false,
        "isBatteryProtected": false,
        "isSessionActive": false,
        "isStaticIp": false,
        "isUpToDate": true,
        "lastCharge": "1701732900,0,2",
        "maxChargePourcentage": 80.0,
        "maxCurrent": 24,
        "maxStationCurrent": 32,
        "name": "Garage",
        "network_ssid": "Home Wi-Fi",
        "normalPeriodActive": true,
        "rssi": -61,
        "status": 65,
        "time": 1701732900000i64,
        "version": "1.82",
        "voltageIn": 240,
        "voltageOut": 240
    })
}

/// Mock station implementation.
#[derive(Debug)]
pub struct MockStation {
    state: MockStationState,
    port: u16,
}

impl MockStation {
    /// Start a mock station on a random local port.
    pub async fn start() -> Self {
        let state = MockStationState::default();
        let app = create_router(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock station");
        let port = listener.local_addr().expect("mock station address").port();

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Mock station error: {}", e);
            }
        });

        // Give the listener a moment to come up.
        for _ in 0..20 {
            if tokio::net::TcpStream::connect(("127.0.0.1", port))
                .await
                .is_ok()
            {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        Self { state, port }
    }

    /// Builder for a client pointed at this station, with test-friendly
    /// timings (250 ms request timeout, 25 ms initial retry delay).
    pub fn client(&self) -> TechnoVEBuilder {
        TechnoVE::builder("127.0.0.1")
            .port(self.port)
            .request_timeout(Duration::from_millis(250))
            .retry_delay(Duration::from_millis(25))
    }

    /// All requests the station has seen so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Requests the station has seen for one path.
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }

    /// Script the info endpoint to answer with a JSON body.
    pub fn respond_with_json(&self, body: &Value) {
        self.respond_with(StatusCode::OK, "application/json", &body.to_string());
    }

    /// Script the info endpoint to answer with an arbitrary response.
    pub fn respond_with(&self, status: StatusCode, content_type: &str, body: &str) {
        *self.state.info_response.lock().unwrap() = ScriptedResponse {
            status,
            content_type: content_type.to_string(),
            body: body.to_string(),
        };
    }

    /// Answer the next `count` requests only after `delay` has passed.
    pub fn stall_next(&self, count: u32, delay: Duration) {
        *self.state.slow_responses.lock().unwrap() = count;
        *self.state.slow_delay.lock().unwrap() = delay;
    }
}

fn create_router(state: MockStationState) -> Router {
    Router::new()
        .route("/station/get/info", get(get_info_handler))
        .route("/station/set/automatic", post(set_automatic_handler))
        .route("/station/control/start", get(control_start_handler))
        .route("/station/control/stop", get(control_stop_handler))
        .route("/station/control/partage", post(control_partage_handler))
        .route(
            "/station/schedule/high/activate",
            post(schedule_high_handler),
        )
        .with_state(state)
}

// Handler functions

async fn get_info_handler(State(state): State<MockStationState>) -> Response {
    state.record("GET", "/station/get/info", None);
    state.maybe_stall().await;

    let script = state.info_response.lock().unwrap().clone();
    (
        script.status,
        [(header::CONTENT_TYPE, script.content_type)],
        script.body,
    )
        .into_response()
}

async fn set_automatic_handler(
    State(state): State<MockStationState>,
    Json(body): Json<Value>,
) -> Response {
    state.record("POST", "/station/set/automatic", Some(body));
    state.maybe_stall().await;
    plain_ok()
}

async fn control_start_handler(State(state): State<MockStationState>) -> Response {
    state.record("GET", "/station/control/start", None);
    state.maybe_stall().await;
    plain_ok()
}

async fn control_stop_handler(State(state): State<MockStationState>) -> Response {
    state.record("GET", "/station/control/stop", None);
    state.maybe_stall().await;
    plain_ok()
}

async fn control_partage_handler(
    State(state): State<MockStationState>,
    Json(body): Json<Value>,
) -> Response {
    state.record("POST", "/station/control/partage", Some(body));
    state.maybe_stall().await;
    plain_ok()
}

async fn schedule_high_handler(
    State(state): State<MockStationState>,
    Json(body): Json<Value>,
) -> Response {
    state.record("POST", "/station/schedule/high/activate", Some(body));
    state.maybe_stall().await;
    plain_ok()
}

// The real firmware answers the control endpoints with bare text.
fn plain_ok() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "ok".to_string(),
    )
        .into_response()
}
