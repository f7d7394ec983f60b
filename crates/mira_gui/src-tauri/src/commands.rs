//! Tauri commands: settings, chat session, window controls.
//! The Tauri `#[command]` wrappers delegate to testable plain functions over
//! an explicit [`AppState`]; the web view has no other way to reach the OS.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use mira_client::config::{self, Config, WindowBounds};
use mira_client::{ApiClient, ChatReply, ChatSession, ConnectionMode, EmotionalState};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tauri::{AppHandle, Emitter, State, WebviewWindow};
use tracing::{error, info, warn};

pub const CONFIG_CHANGED_EVENT: &str = "config-changed";
const API_BASE_URL_KEY: &str = "apiBaseUrl";

/// Everything the commands operate on. Managed by Tauri; no globals.
pub struct AppState {
    pub session: ChatSession,
    config: Mutex<Config>,
    config_path: PathBuf,
}

impl AppState {
    pub fn new(config: Config, config_path: PathBuf) -> Self {
        let session = ChatSession::new(ApiClient::new(config.api_base_url.clone()));
        Self::with_session(config, config_path, session)
    }

    pub fn with_session(config: Config, config_path: PathBuf, session: ChatSession) -> Self {
        Self {
            session,
            config: Mutex::new(config),
            config_path,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    fn config(&self) -> MutexGuard<'_, Config> {
        self.config.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── Settings ────────────────────────────────────────────────────────────

/// Payload of the `config-changed` event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigChange {
    pub key: String,
    pub value: Value,
}

pub fn do_get_config(state: &AppState) -> Config {
    state.config().clone()
}

/// Set `key` (dot path), persist, and apply `apiBaseUrl` to the session.
/// A failed write is logged; the in-memory change still stands.
pub fn do_set_config(state: &AppState, key: &str, value: Value) -> Result<ConfigChange, String> {
    let mut cfg = state.config();
    cfg.set_path(key, value.clone()).map_err(|e| e.to_string())?;
    if let Err(e) = config::save(&state.config_path, &cfg) {
        error!(error = %e, "failed to save config");
    }
    if key == API_BASE_URL_KEY {
        state.session.set_base_url(&cfg.api_base_url);
    }
    info!(key, "config updated");
    Ok(ConfigChange {
        key: key.to_string(),
        value,
    })
}

/// [`do_set_config`], then hand the change to `notify`. The change is already
/// saved at that point, so a failed notification is logged and not reported.
pub fn do_set_config_and_notify<E: std::fmt::Display>(
    state: &AppState,
    key: &str,
    value: Value,
    notify: impl FnOnce(&ConfigChange) -> Result<(), E>,
) -> Result<bool, String> {
    let change = do_set_config(state, key, value)?;
    if let Err(e) = notify(&change) {
        warn!(key, error = %e, "failed to emit {}", CONFIG_CHANGED_EVENT);
    }
    Ok(true)
}

/// Record the main window's bounds and persist the config.
pub fn do_save_window_bounds(state: &AppState, bounds: WindowBounds) -> Result<(), String> {
    let mut cfg = state.config();
    cfg.window_bounds = bounds;
    config::save(&state.config_path, &cfg).map_err(|e| e.to_string())
}

// ── Chat session ────────────────────────────────────────────────────────

/// Emotional state plus its rendered label and status line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmotionStatus {
    pub state: EmotionalState,
    pub label: String,
    pub status_line: String,
}

impl From<EmotionalState> for EmotionStatus {
    fn from(state: EmotionalState) -> Self {
        Self {
            label: state.display_label().to_string(),
            status_line: state.status_line(),
            state,
        }
    }
}

/// Result of the startup handshake, shown as a toast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StartupReport {
    pub mode: ConnectionMode,
    pub notice: String,
    pub status: EmotionStatus,
}

pub async fn do_send_message(state: &AppState, text: &str) -> Option<ChatReply> {
    state.session.send_message(text).await
}

pub async fn do_check_health(state: &AppState) -> bool {
    state.session.check_health().await
}

pub async fn do_fetch_initial_state(state: &AppState) -> Option<EmotionalState> {
    state.session.fetch_initial_state().await
}

pub async fn do_initialize(state: &AppState) -> StartupReport {
    let mode = state.session.initialize().await;
    StartupReport {
        mode,
        notice: mode.notice().to_string(),
        status: state.session.current_state().into(),
    }
}

pub fn do_emotion_status(state: &AppState) -> EmotionStatus {
    state.session.current_state().into()
}

// ── Tauri command wrappers ──────────────────────────────────────────────

#[tauri::command]
pub fn get_config(state: State<'_, AppState>) -> Config {
    do_get_config(&state)
}

#[tauri::command]
pub fn set_config(
    app: AppHandle,
    state: State<'_, AppState>,
    key: String,
    value: Value,
) -> Result<bool, String> {
    do_set_config_and_notify(&state, &key, value, |change| {
        app.emit(CONFIG_CHANGED_EVENT, change.clone())
    })
}

#[tauri::command]
pub async fn send_message(
    state: State<'_, AppState>,
    text: String,
) -> Result<Option<ChatReply>, String> {
    Ok(do_send_message(&state, &text).await)
}

#[tauri::command]
pub async fn check_health(state: State<'_, AppState>) -> Result<bool, String> {
    Ok(do_check_health(&state).await)
}

#[tauri::command]
pub async fn fetch_initial_state(
    state: State<'_, AppState>,
) -> Result<Option<EmotionalState>, String> {
    Ok(do_fetch_initial_state(&state).await)
}

#[tauri::command]
pub async fn initialize_session(state: State<'_, AppState>) -> Result<StartupReport, String> {
    Ok(do_initialize(&state).await)
}

#[tauri::command]
pub fn emotion_status(state: State<'_, AppState>) -> EmotionStatus {
    do_emotion_status(&state)
}

#[tauri::command]
pub fn minimize_window(window: WebviewWindow) -> Result<(), String> {
    window.minimize().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn toggle_maximize_window(window: WebviewWindow) -> Result<(), String> {
    let result = if window.is_maximized().map_err(|e| e.to_string())? {
        window.unmaximize()
    } else {
        window.maximize()
    };
    result.map_err(|e| e.to_string())
}

#[tauri::command]
pub fn close_window(window: WebviewWindow) -> Result<(), String> {
    window.close().map_err(|e| e.to_string())
}
