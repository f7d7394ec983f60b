//! Main window creation, bounds capture, and bringing the window back to the
//! front when a second launch is redirected to this instance.

use mira_client::config::{WindowBounds, MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};
use tauri::{
    AppHandle, Manager, Runtime, WebviewUrl, WebviewWindow, WebviewWindowBuilder, Window,
};
use tracing::warn;

pub const MAIN_WINDOW: &str = "main";

/// Open the main window at the saved size (and position, when known).
pub fn create_main_window(app: &AppHandle, bounds: &WindowBounds) -> tauri::Result<WebviewWindow> {
    let url = WebviewUrl::App("index.html".into());
    let mut builder = WebviewWindowBuilder::new(app, MAIN_WINDOW, url)
        .title("Mira")
        .inner_size(
            bounds.width.max(MIN_WINDOW_WIDTH),
            bounds.height.max(MIN_WINDOW_HEIGHT),
        )
        .min_inner_size(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);
    if let (Some(x), Some(y)) = (bounds.x, bounds.y) {
        builder = builder.position(x, y);
    }
    let window = builder.build()?;

    #[cfg(debug_assertions)]
    if std::env::args().any(|a| a == "--dev") {
        window.open_devtools();
    }

    Ok(window)
}

/// Current logical size and position of `window`.
pub fn capture_bounds(window: &Window) -> tauri::Result<WindowBounds> {
    let scale = window.scale_factor()?;
    let size = window.inner_size()?.to_logical::<f64>(scale);
    let position = window.outer_position()?.to_logical::<f64>(scale);
    Ok(WindowBounds {
        width: size.width,
        height: size.height,
        x: Some(position.x),
        y: Some(position.y),
    })
}

/// The window operations needed to restore and focus a window.
pub trait Restorable {
    fn is_minimized(&self) -> tauri::Result<bool>;
    fn unminimize(&self) -> tauri::Result<()>;
    fn show(&self) -> tauri::Result<()>;
    fn set_focus(&self) -> tauri::Result<()>;
}

impl<R: Runtime> Restorable for WebviewWindow<R> {
    fn is_minimized(&self) -> tauri::Result<bool> {
        WebviewWindow::is_minimized(self)
    }

    fn unminimize(&self) -> tauri::Result<()> {
        WebviewWindow::unminimize(self)
    }

    fn show(&self) -> tauri::Result<()> {
        WebviewWindow::show(self)
    }

    fn set_focus(&self) -> tauri::Result<()> {
        WebviewWindow::set_focus(self)
    }
}

/// Unminimize if needed, then show and focus.
pub fn restore_and_focus(window: &impl Restorable) -> tauri::Result<()> {
    if window.is_minimized()? {
        window.unminimize()?;
    }
    window.show()?;
    window.set_focus()
}

/// Handler for a second launch: surface the existing main window.
pub fn focus_main_window<R: Runtime>(app: &AppHandle<R>) {
    let Some(window) = app.get_webview_window(MAIN_WINDOW) else {
        warn!("second instance launched before the main window exists");
        return;
    };
    if let Err(e) = restore_and_focus(&window) {
        warn!(error = %e, "failed to focus main window");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct FakeWindow {
        minimized: Cell<bool>,
        calls: RefCell<Vec<&'static str>>,
    }

    impl Restorable for FakeWindow {
        fn is_minimized(&self) -> tauri::Result<bool> {
            Ok(self.minimized.get())
        }

        fn unminimize(&self) -> tauri::Result<()> {
            self.minimized.set(false);
            self.calls.borrow_mut().push("unminimize");
            Ok(())
        }

        fn show(&self) -> tauri::Result<()> {
            self.calls.borrow_mut().push("show");
            Ok(())
        }

        fn set_focus(&self) -> tauri::Result<()> {
            self.calls.borrow_mut().push("set_focus");
            Ok(())
        }
    }

    #[test]
    fn minimized_window_is_restored_then_focused() {
        let window = FakeWindow::default();
        window.minimized.set(true);

        restore_and_focus(&window).unwrap();

        assert!(!window.minimized.get());
        assert_eq!(*window.calls.borrow(), vec!["unminimize", "show", "set_focus"]);
    }

    #[test]
    fn visible_window_is_only_focused() {
        let window = FakeWindow::default();

        restore_and_focus(&window).unwrap();

        assert_eq!(*window.calls.borrow(), vec!["show", "set_focus"]);
    }
}
