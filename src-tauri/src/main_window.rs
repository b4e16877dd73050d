use tauri::{
    webview::PageLoadEvent, AppHandle, Manager, PhysicalPosition, PhysicalSize, Runtime,
    WebviewUrl, WebviewWindow, WebviewWindowBuilder, Window, WindowEvent,
};
use url::Url;

use crate::{
    append_desktop_log, desktop_bridge,
    settings_store::{WindowPosition, WindowSize},
    shell_config,
    shell_host::{ShellHost, TauriHost},
    window_actions,
    window_geometry::{self, WorkArea},
    ShellState, APP_NAME, MAIN_WINDOW_LABEL,
};

const FALLBACK_WORK_AREA: WorkArea = WorkArea {
    x: 0,
    y: 0,
    width: 1280,
    height: 800,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CloseDecision {
    AllowClose,
    HideInstead,
}

pub(crate) fn decide_close(is_quitting: bool) -> CloseDecision {
    if is_quitting {
        CloseDecision::AllowClose
    } else {
        CloseDecision::HideInstead
    }
}

// Closing only hides the window unless a quit is in progress.
pub(crate) fn handle_close_request<H: ShellHost>(host: &H, state: &ShellState) -> CloseDecision {
    let decision = decide_close(state.is_quitting());
    if decision == CloseDecision::HideInstead {
        window_actions::hide_main_window(host, state);
    }
    decision
}

pub(crate) fn primary_work_area<R: Runtime>(app_handle: &AppHandle<R>) -> Option<WorkArea> {
    let monitor = match app_handle.primary_monitor() {
        Ok(Some(monitor)) => monitor,
        Ok(None) => {
            append_desktop_log("no primary monitor reported");
            return None;
        }
        Err(error) => {
            append_desktop_log(&format!("failed to query primary monitor: {error}"));
            return None;
        }
    };

    let scale_factor = monitor.scale_factor();
    let area = monitor.work_area();
    let position = area.position.to_logical::<f64>(scale_factor);
    let size = area.size.to_logical::<f64>(scale_factor);
    Some(WorkArea {
        x: position.x.round() as i32,
        y: position.y.round() as i32,
        width: size.width.round() as u32,
        height: size.height.round() as u32,
    })
}

pub(crate) fn create_main_window<R: Runtime>(
    app_handle: &AppHandle<R>,
    state: &ShellState,
) -> Result<WebviewWindow<R>, String> {
    if let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) {
        return Ok(window);
    }

    let area = primary_work_area(app_handle).unwrap_or(FALLBACK_WORK_AREA);
    let geometry =
        window_geometry::resolve_window_geometry(&state.settings, area, WindowSize::DEFAULT);
    let app_url = Url::parse(&state.app_url)
        .map_err(|error| format!("Invalid app url {}: {}", state.app_url, error))?;

    state.arm_reveal_on_load();
    let url = WebviewUrl::External(app_url);
    let builder = WebviewWindowBuilder::new(app_handle, MAIN_WINDOW_LABEL, url)
        .title(APP_NAME)
        .inner_size(
            f64::from(geometry.size.width),
            f64::from(geometry.size.height),
        )
        .position(
            f64::from(geometry.position.x),
            f64::from(geometry.position.y),
        )
        .decorations(false)
        .resizable(true)
        .visible(false)
        .skip_taskbar(true)
        .always_on_top(state.always_on_top())
        .transparent(true)
        .initialization_script(&desktop_bridge::bridge_script(&state.app_url))
        .on_page_load(|window, payload| {
            if !matches!(payload.event(), PageLoadEvent::Finished) {
                return;
            }
            append_desktop_log(&format!("page-load finished: {}", payload.url()));

            let app_handle = window.app_handle().clone();
            let Some(state) = app_handle.try_state::<ShellState>() else {
                return;
            };
            if !shell_config::same_origin(&state.app_url, payload.url()) {
                append_desktop_log(&format!(
                    "page left the app origin, desktop bridge inactive: {}",
                    payload.url()
                ));
            }
            if state.take_reveal_on_load() {
                window_actions::show_main_window(&TauriHost::new(app_handle.clone()), &state);
            }
        });

    let window = builder
        .build()
        .map_err(|error| format!("Failed to create main window: {error}"))?;

    #[cfg(target_os = "macos")]
    {
        if let Err(error) = app_handle.set_activation_policy(tauri::ActivationPolicy::Regular) {
            append_desktop_log(&format!("failed to show dock icon: {error}"));
        }
    }

    append_desktop_log(&format!(
        "main window created at x={} y={} size={}x{}",
        geometry.position.x, geometry.position.y, geometry.size.width, geometry.size.height
    ));
    Ok(window)
}

pub(crate) fn handle_window_event<R: Runtime>(window: &Window<R>, event: &WindowEvent) {
    if window.label() != MAIN_WINDOW_LABEL {
        return;
    }
    let app_handle = window.app_handle();
    let Some(state) = app_handle.try_state::<ShellState>() else {
        return;
    };

    match event {
        WindowEvent::Moved(position) => persist_position(window, &state, *position),
        WindowEvent::Resized(size) => persist_size(window, &state, *size),
        WindowEvent::CloseRequested { api, .. } => {
            let host = TauriHost::new(app_handle.clone());
            if handle_close_request(&host, &state) == CloseDecision::HideInstead {
                api.prevent_close();
            }
        }
        WindowEvent::Destroyed => {
            append_desktop_log("main window destroyed");
            #[cfg(target_os = "macos")]
            {
                if let Err(error) =
                    app_handle.set_activation_policy(tauri::ActivationPolicy::Accessory)
                {
                    append_desktop_log(&format!("failed to hide dock icon: {error}"));
                }
            }
        }
        _ => {}
    }
}

fn persist_position<R: Runtime>(
    window: &Window<R>,
    state: &ShellState,
    position: PhysicalPosition<i32>,
) {
    let Ok(scale_factor) = window.scale_factor() else {
        return;
    };
    let logical = position.to_logical::<f64>(scale_factor);
    let position = WindowPosition {
        x: logical.x.round() as i32,
        y: logical.y.round() as i32,
    };
    if let Err(error) = state.settings.set_window_position(position) {
        append_desktop_log(&format!("failed to persist window position: {error}"));
    }
}

fn persist_size<R: Runtime>(window: &Window<R>, state: &ShellState, size: PhysicalSize<u32>) {
    // Minimizing reports a zero size on Windows.
    if size.width == 0 || size.height == 0 {
        return;
    }
    let Ok(scale_factor) = window.scale_factor() else {
        return;
    };
    let logical = size.to_logical::<f64>(scale_factor);
    let size = WindowSize {
        width: logical.width.round() as u32,
        height: logical.height.round() as u32,
    };
    if let Err(error) = state.settings.set_window_size(size) {
        append_desktop_log(&format!("failed to persist window size: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{decide_close, handle_close_request, CloseDecision};
    use crate::{
        settings_store::{test_support::MemorySettingsStore, ShellSettings},
        shell_host::{test_support::FakeHost, ShellWindow},
        window_fade::test_support::SurfaceCall,
        ShellState,
    };

    fn state() -> ShellState {
        let settings = ShellSettings::new(Arc::new(MemorySettingsStore::default()));
        ShellState::new(settings, "en", "https://ai.acary.app/chat".to_string())
    }

    #[test]
    fn close_without_quit_hides_the_window() {
        assert_eq!(decide_close(false), CloseDecision::HideInstead);
    }

    #[test]
    fn close_while_quitting_proceeds() {
        assert_eq!(decide_close(true), CloseDecision::AllowClose);
    }

    #[test]
    fn close_request_hides_window_and_keeps_running() {
        let state = state();
        let host = FakeHost::with_window(true);

        assert_eq!(
            handle_close_request(&host, &state),
            CloseDecision::HideInstead
        );
        assert_eq!(host.window().surface_calls(), vec![SurfaceCall::Hide]);
        assert!(!host.window().is_visible());
        assert!(!state.is_quitting());
    }

    #[test]
    fn close_request_while_quitting_lets_the_window_close() {
        let state = state();
        let host = FakeHost::with_window(true);
        state.mark_quitting();

        assert_eq!(handle_close_request(&host, &state), CloseDecision::AllowClose);
        assert!(host.window().surface_calls().is_empty());
        assert!(host.window().is_visible());
    }
}
