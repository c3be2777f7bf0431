//! Local stand-in for the SDM API and the OAuth token endpoint.
#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Form, Json, Router,
};
use nest_exporter::config::{NestConfig, OAuthConfig};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const PROJECT_ID: &str = "project-1";
pub const ACCESS_TOKEN: &str = "fresh-access-token";
pub const REFRESH_TOKEN: &str = "refresh-token";

pub struct MockState {
    pub devices_status: Mutex<StatusCode>,
    pub devices_body: Mutex<Value>,
    pub token_status: Mutex<StatusCode>,
    pub token_calls: AtomicUsize,
    pub device_calls: AtomicUsize,
    pub last_token_form: Mutex<HashMap<String, String>>,
    pub refresh_tokens_seen: Mutex<Vec<String>>,
    pub token_expires_in: Mutex<i64>,
    /// When set, each token response carries a new `rotated-{n}` refresh token
    pub rotate_refresh: AtomicBool,
}

pub struct MockNest {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockNest {
    pub async fn start() -> Self {
        let state = Arc::new(MockState {
            devices_status: Mutex::new(StatusCode::OK),
            devices_body: Mutex::new(two_device_body()),
            token_status: Mutex::new(StatusCode::OK),
            token_calls: AtomicUsize::new(0),
            device_calls: AtomicUsize::new(0),
            last_token_form: Mutex::new(HashMap::new()),
            refresh_tokens_seen: Mutex::new(Vec::new()),
            token_expires_in: Mutex::new(3599),
            rotate_refresh: AtomicBool::new(false),
        });

        let app = Router::new()
            .route("/token", post(token))
            .route("/v1/enterprises/{project}/devices/", get(devices))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn nest_config(&self) -> NestConfig {
        NestConfig {
            api_url: format!("{}/v1/", self.base_url),
            project_id: PROJECT_ID.into(),
            timeout_ms: 2000,
            oauth: OAuthConfig {
                client_id: "client-id".into(),
                client_secret: "client-secret".into(),
                refresh_token: REFRESH_TOKEN.into(),
                token_url: format!("{}/token", self.base_url),
                token: None,
            },
        }
    }

    pub fn set_devices_response(&self, status: StatusCode, body: Value) {
        *self.state.devices_status.lock().unwrap() = status;
        *self.state.devices_body.lock().unwrap() = body;
    }

    pub fn set_token_status(&self, status: StatusCode) {
        *self.state.token_status.lock().unwrap() = status;
    }

    pub fn set_token_expires_in(&self, secs: i64) {
        *self.state.token_expires_in.lock().unwrap() = secs;
    }

    pub fn rotate_refresh_tokens(&self) {
        self.state.rotate_refresh.store(true, Ordering::SeqCst);
    }

    pub fn refresh_tokens_seen(&self) -> Vec<String> {
        self.state.refresh_tokens_seen.lock().unwrap().clone()
    }

    pub fn token_calls(&self) -> usize {
        self.state.token_calls.load(Ordering::SeqCst)
    }

    pub fn device_calls(&self) -> usize {
        self.state.device_calls.load(Ordering::SeqCst)
    }
}

async fn token(
    State(state): State<Arc<MockState>>,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let call = state.token_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(refresh_token) = form.get("refresh_token") {
        state
            .refresh_tokens_seen
            .lock()
            .unwrap()
            .push(refresh_token.clone());
    }
    *state.last_token_form.lock().unwrap() = form;

    let status = *state.token_status.lock().unwrap();
    if status != StatusCode::OK {
        return (status, Json(json!({ "error": "invalid_grant" })));
    }

    let mut body = json!({
        "access_token": ACCESS_TOKEN,
        "token_type": "Bearer",
        "expires_in": *state.token_expires_in.lock().unwrap(),
        "scope": "https://www.googleapis.com/auth/sdm.service"
    });
    if state.rotate_refresh.load(Ordering::SeqCst) {
        body["refresh_token"] = json!(format!("rotated-{}", call));
    }

    (StatusCode::OK, Json(body))
}

async fn devices(
    State(state): State<Arc<MockState>>,
    Path(project): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.device_calls.fetch_add(1, Ordering::SeqCst);

    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", ACCESS_TOKEN))
        .unwrap_or(false);
    if !authorized || project != PROJECT_ID {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "unauthenticated" })));
    }

    let status = *state.devices_status.lock().unwrap();
    let body = state.devices_body.lock().unwrap().clone();
    (status, Json(body))
}

pub fn thermostat(name: &str, label: &str, ambient_c: f64, status: &str, mode: &str) -> Value {
    json!({
        "name": name,
        "type": "sdm.devices.types.THERMOSTAT",
        "traits": {
            "sdm.devices.traits.Info": { "customName": label },
            "sdm.devices.traits.Humidity": { "ambientHumidityPercent": 45 },
            "sdm.devices.traits.Temperature": { "ambientTemperatureCelsius": ambient_c },
            "sdm.devices.traits.ThermostatTemperatureSetpoint": {
                "heatCelsius": 20.0,
                "coolCelsius": 25.0
            },
            "sdm.devices.traits.ThermostatHvac": { "status": status },
            "sdm.devices.traits.ThermostatMode": { "mode": mode }
        }
    })
}

/// One thermostat and one camera.
pub fn two_device_body() -> Value {
    json!({
        "devices": [
            thermostat("enterprises/project-1/devices/thermo-1", "Living Room", 20.0, "HEATING", "HEAT"),
            {
                "name": "enterprises/project-1/devices/cam-1",
                "type": "sdm.devices.types.CAMERA",
                "traits": {
                    "sdm.devices.traits.Info": { "customName": "Front Door" }
                }
            }
        ]
    })
}
