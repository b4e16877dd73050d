use tauri::{AppHandle, Manager, Runtime, WebviewWindow};
use tauri_plugin_clipboard_manager::ClipboardExt;

use crate::{
    append_desktop_log, autostart, image_download, main_window, menu_refresh,
    update_checker::{self, UpdateCheckMode},
    window_fade::FadeTarget,
    window_geometry::{WindowGeometry, WorkArea},
    ShellState, MAIN_WINDOW_LABEL,
};

pub(crate) trait ShellWindow: FadeTarget {
    fn is_visible(&self) -> bool;
    fn set_always_on_top(&self, enabled: bool) -> Result<(), String>;
    fn apply_geometry(&self, geometry: WindowGeometry) -> Result<(), String>;
}

// Host runtime operations the action dispatcher needs.
pub(crate) trait ShellHost {
    type Window: ShellWindow;

    fn main_window(&self) -> Option<Self::Window>;
    fn create_main_window(&self, state: &ShellState) -> Result<(), String>;
    fn work_area(&self) -> Option<WorkArea>;
    fn apply_autostart(&self, enabled: bool);
    fn refresh_menus(&self, state: &ShellState);
    fn check_for_updates(&self, mode: UpdateCheckMode);
    fn save_image(&self, url: String);
    fn write_clipboard(&self, text: &str) -> Result<(), String>;
    fn exit(&self, code: i32);
}

pub(crate) struct TauriHost<R: Runtime> {
    app_handle: AppHandle<R>,
}

impl<R: Runtime> TauriHost<R> {
    pub(crate) fn new(app_handle: AppHandle<R>) -> Self {
        Self { app_handle }
    }
}

impl<R: Runtime> ShellHost for TauriHost<R> {
    type Window = WebviewWindow<R>;

    fn main_window(&self) -> Option<Self::Window> {
        self.app_handle.get_webview_window(MAIN_WINDOW_LABEL)
    }

    fn create_main_window(&self, state: &ShellState) -> Result<(), String> {
        main_window::create_main_window(&self.app_handle, state).map(|_| ())
    }

    fn work_area(&self) -> Option<WorkArea> {
        main_window::primary_work_area(&self.app_handle)
    }

    fn apply_autostart(&self, enabled: bool) {
        autostart::apply_autostart(&self.app_handle, enabled);
    }

    fn refresh_menus(&self, state: &ShellState) {
        menu_refresh::refresh_menus(&self.app_handle, state);
    }

    fn check_for_updates(&self, mode: UpdateCheckMode) {
        update_checker::spawn_update_check(self.app_handle.clone(), mode);
    }

    fn save_image(&self, url: String) {
        image_download::spawn_save_image(self.app_handle.clone(), url);
    }

    fn write_clipboard(&self, text: &str) -> Result<(), String> {
        self.app_handle
            .clipboard()
            .write_text(text.to_string())
            .map_err(|error| format!("Failed to write clipboard: {error}"))
    }

    fn exit(&self, code: i32) {
        self.app_handle.exit(code);
    }
}

// The window is transparent, so opacity is applied to the page document.
impl<R: Runtime> FadeTarget for WebviewWindow<R> {
    fn set_opacity(&self, opacity: f64) {
        let script = format!("document.documentElement.style.opacity = '{opacity:.2}';");
        if let Err(error) = self.eval(&script) {
            append_desktop_log(&format!("failed to set main window opacity: {error}"));
        }
    }

    fn show(&self) {
        if let Err(error) = WebviewWindow::show(self) {
            append_desktop_log(&format!("failed to show main window: {error}"));
            return;
        }
        if let Err(error) = self.set_focus() {
            append_desktop_log(&format!("failed to focus main window: {error}"));
        }
    }

    fn hide(&self) {
        if let Err(error) = WebviewWindow::hide(self) {
            append_desktop_log(&format!("failed to hide main window: {error}"));
        }
    }
}

impl<R: Runtime> ShellWindow for WebviewWindow<R> {
    fn is_visible(&self) -> bool {
        match WebviewWindow::is_visible(self) {
            Ok(visible) => visible,
            Err(error) => {
                append_desktop_log(&format!("failed to read main window visibility: {error}"));
                false
            }
        }
    }

    fn set_always_on_top(&self, enabled: bool) -> Result<(), String> {
        WebviewWindow::set_always_on_top(self, enabled)
            .map_err(|error| format!("Failed to set always-on-top: {error}"))
    }

    fn apply_geometry(&self, geometry: WindowGeometry) -> Result<(), String> {
        self.set_size(tauri::LogicalSize::new(
            f64::from(geometry.size.width),
            f64::from(geometry.size.height),
        ))
        .map_err(|error| format!("Failed to resize main window: {error}"))?;
        self.set_position(tauri::LogicalPosition::new(
            f64::from(geometry.position.x),
            f64::from(geometry.position.y),
        ))
        .map_err(|error| format!("Failed to move main window: {error}"))
    }
}
