use std::process::{Command, Stdio};
use tauri::{AppHandle, LogicalPosition, Manager, WebviewWindow};
use url::Url;

use crate::{
    append_desktop_log, desktop_bridge, menu_render, menu_template, shell_host::TauriHost,
    shell_locale, tray_actions::MenuAction, tray_menu_handler, BridgeResult, ContextMenuPoint,
    ImageContextMenuRequest, ShellState, EVENT_WINDOW_DRAG_STARTED, MAIN_WINDOW_LABEL,
};

fn parse_openable_url(raw_url: &str) -> Result<Url, String> {
    let trimmed = raw_url.trim();
    if trimmed.is_empty() {
        return Err("Missing external URL.".to_string());
    }

    let parsed = Url::parse(trimmed).map_err(|error| format!("Invalid URL: {error}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(format!(
            "Unsupported URL scheme '{scheme}', only http/https are allowed."
        )),
    }
}

#[cfg(target_os = "macos")]
const BROWSER_LAUNCHER: Option<(&str, &[&str])> = Some(("open", &[]));

#[cfg(target_os = "windows")]
const BROWSER_LAUNCHER: Option<(&str, &[&str])> =
    Some(("rundll32", &["url.dll,FileProtocolHandler"]));

#[cfg(all(unix, not(target_os = "macos")))]
const BROWSER_LAUNCHER: Option<(&str, &[&str])> = Some(("xdg-open", &[]));

#[cfg(not(any(target_os = "macos", target_os = "windows", unix)))]
const BROWSER_LAUNCHER: Option<(&str, &[&str])> = None;

fn open_url_with_system_browser(url: &Url) -> Result<(), String> {
    let (program, args) = BROWSER_LAUNCHER
        .ok_or_else(|| "Opening external URLs is not supported on this platform.".to_string())?;
    Command::new(program)
        .args(args)
        .arg(url.as_str())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|error| format!("Failed to run '{program}': {error}"))
}

fn language_action(raw: &str) -> Result<MenuAction, String> {
    shell_locale::normalize_language(raw)
        .map(MenuAction::SetLanguage)
        .ok_or_else(|| format!("Unsupported language '{}'.", raw.trim()))
}

fn main_window(app_handle: &AppHandle) -> Result<WebviewWindow, String> {
    app_handle
        .get_webview_window(MAIN_WINDOW_LABEL)
        .ok_or_else(|| "Main window not found.".to_string())
}

fn popup_menu(
    app_handle: &AppHandle,
    entries: &[menu_template::MenuEntry],
    x: f64,
    y: f64,
) -> Result<(), String> {
    let window = main_window(app_handle)?;
    let menu = menu_render::build_menu(app_handle, entries)?;
    window
        .popup_menu_at(&menu, LogicalPosition::new(x, y))
        .map_err(|error| format!("Failed to show context menu: {error}"))
}

fn shell_state(app_handle: &AppHandle) -> Result<tauri::State<'_, ShellState>, String> {
    app_handle
        .try_state::<ShellState>()
        .ok_or_else(|| "Shell state is not initialized.".to_string())
}

#[tauri::command]
pub(crate) fn window_drag(app_handle: AppHandle) -> BridgeResult {
    let result = main_window(&app_handle).and_then(|window| {
        window
            .start_dragging()
            .map_err(|error| format!("Failed to start window drag: {error}"))
    });
    match result {
        Ok(()) => {
            desktop_bridge::emit_to_page(&app_handle, EVENT_WINDOW_DRAG_STARTED, ());
            BridgeResult::ok()
        }
        Err(error) => {
            append_desktop_log(&error);
            BridgeResult::failed(error)
        }
    }
}

#[tauri::command]
pub(crate) fn open_in_browser(url: String) -> BridgeResult {
    let result = parse_openable_url(&url)
        .and_then(|parsed| open_url_with_system_browser(&parsed));
    if let Err(error) = &result {
        append_desktop_log(&format!("open in browser failed: {error}"));
    }
    result.into()
}

#[tauri::command]
pub(crate) fn image_context_menu(
    app_handle: AppHandle,
    request: ImageContextMenuRequest,
) -> BridgeResult {
    let result = shell_state(&app_handle).and_then(|state| {
        state.set_pending_image_url(request.src_url);
        let entries = menu_template::image_context_menu(&state.i18n);
        popup_menu(&app_handle, &entries, request.x, request.y)
    });
    if let Err(error) = &result {
        append_desktop_log(&format!("image context menu failed: {error}"));
    }
    result.into()
}

#[tauri::command]
pub(crate) fn window_context_menu(app_handle: AppHandle, point: ContextMenuPoint) -> BridgeResult {
    let result = shell_state(&app_handle).and_then(|state| {
        let entries = menu_template::window_context_menu(&state.i18n);
        popup_menu(&app_handle, &entries, point.x, point.y)
    });
    if let Err(error) = &result {
        append_desktop_log(&format!("window context menu failed: {error}"));
    }
    result.into()
}

#[tauri::command]
pub(crate) fn set_language(app_handle: AppHandle, lang: String) -> BridgeResult {
    let result = language_action(&lang).and_then(|action| {
        let state = shell_state(&app_handle)?;
        tray_menu_handler::dispatch(&TauriHost::new(app_handle.clone()), &state, action);
        Ok(())
    });
    if let Err(error) = &result {
        append_desktop_log(&format!("set language failed: {error}"));
    }
    result.into()
}

#[tauri::command]
pub(crate) fn get_current_language(app_handle: AppHandle) -> String {
    match app_handle.try_state::<ShellState>() {
        Some(state) => state.i18n.language().to_string(),
        None => crate::BASE_LANGUAGE.to_string(),
    }
}

#[tauri::command]
pub(crate) fn get_available_languages() -> Vec<String> {
    shell_locale::available_languages()
        .into_iter()
        .map(str::to_string)
        .collect()
}
