//! Tauri application library: one chat window over the shared Mira client.

pub mod commands;
pub mod window;

use std::path::PathBuf;

use mira_client::config;
use tauri::{Manager, WindowEvent};
use tracing::{error, warn};

use commands::AppState;

const FALLBACK_CONFIG_FILE: &str = "mira-config.json";

pub fn run() {
    mira_client::init_tracing("info");

    let config_path = config::resolve_path(None).unwrap_or_else(|| {
        warn!("cannot determine config dir, using {}", FALLBACK_CONFIG_FILE);
        PathBuf::from(FALLBACK_CONFIG_FILE)
    });
    let cfg = config::load_or_default(&config_path);
    let bounds = cfg.window_bounds.clone();

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            window::focus_main_window(app);
        }))
        .manage(AppState::new(cfg, config_path))
        .invoke_handler(tauri::generate_handler![
            commands::get_config,
            commands::set_config,
            commands::send_message,
            commands::check_health,
            commands::fetch_initial_state,
            commands::initialize_session,
            commands::emotion_status,
            commands::minimize_window,
            commands::toggle_maximize_window,
            commands::close_window,
        ])
        .setup(move |app| {
            window::create_main_window(app.handle(), &bounds)?;
            Ok(())
        })
        .on_window_event(|win, event| {
            if win.label() != window::MAIN_WINDOW {
                return;
            }
            if let WindowEvent::CloseRequested { .. } = event {
                let state = win.state::<AppState>();
                let saved = window::capture_bounds(win)
                    .map_err(|e| e.to_string())
                    .and_then(|b| commands::do_save_window_bounds(&state, b));
                if let Err(e) = saved {
                    error!(error = %e, "failed to persist window bounds");
                }
            }
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
