use tauri::{AppHandle, Manager, Runtime};

use crate::{
    append_desktop_log, append_shutdown_log,
    settings_store::WindowSize,
    shell_host::{ShellHost, ShellWindow, TauriHost},
    tray_actions::{self, MenuAction},
    update_checker::UpdateCheckMode,
    window_actions,
    window_geometry::{self, WindowGeometry},
    ShellState,
};

// Entry point for every native menu event: tray, context menus and the app menu.
pub fn handle_menu_event<R: Runtime>(app_handle: &AppHandle<R>, menu_id: &str) {
    let Some(action) = tray_actions::action_from_menu_id(menu_id) else {
        return;
    };
    let Some(state) = app_handle.try_state::<ShellState>() else {
        append_desktop_log(&format!("menu action {menu_id} ignored: shell state missing"));
        return;
    };
    dispatch(&TauriHost::new(app_handle.clone()), &state, action);
}

fn log_persist_error(setting: &str, result: Result<(), String>) {
    if let Err(error) = result {
        append_desktop_log(&format!("failed to persist {setting}: {error}"));
    }
}

pub(crate) fn dispatch<H: ShellHost>(host: &H, state: &ShellState, action: MenuAction) {
    match action {
        MenuAction::OpenWindow => window_actions::show_main_window(host, state),
        MenuAction::CheckUpdates => host.check_for_updates(UpdateCheckMode::Verbose),
        MenuAction::ToggleAlwaysOnTop => {
            let enabled = state.toggle_always_on_top();
            if let Some(window) = host.main_window() {
                if let Err(error) = window.set_always_on_top(enabled) {
                    append_desktop_log(&error);
                }
            }
            log_persist_error("always-on-top", state.settings.set_always_on_top(enabled));
        }
        MenuAction::ToggleAnimations => {
            let enabled = state.toggle_animations();
            log_persist_error("animations", state.settings.set_animations_enabled(enabled));
        }
        MenuAction::ToggleStartup => {
            let enabled = state.toggle_open_at_startup();
            log_persist_error("open-at-startup", state.settings.set_open_at_startup(enabled));
            host.apply_autostart(enabled);
        }
        MenuAction::ResetWindow => reset_window(host, state),
        MenuAction::SetLanguage(language) => {
            let Some(language) = state.i18n.set_language(language) else {
                append_desktop_log(&format!("language {language} is not bundled"));
                return;
            };
            log_persist_error("language", state.settings.set_language(language));
            host.refresh_menus(state);
        }
        MenuAction::Quit => {
            state.mark_quitting();
            append_shutdown_log("quit requested from menu, exiting desktop process");
            host.exit(0);
        }
        MenuAction::DownloadImage => match state.pending_image_url() {
            Some(url) => host.save_image(url),
            None => append_desktop_log("download image ignored: no image selected"),
        },
        MenuAction::CopyImageUrl => match state.pending_image_url() {
            Some(url) => {
                if let Err(error) = host.write_clipboard(&url) {
                    append_desktop_log(&error);
                }
            }
            None => append_desktop_log("copy image url ignored: no image selected"),
        },
    }
}

// Size and position are persisted as two separate writes.
fn reset_window<H: ShellHost>(host: &H, state: &ShellState) {
    let size = WindowSize::DEFAULT;
    log_persist_error("window size", state.settings.set_window_size(size));

    let Some(area) = host.work_area() else {
        append_desktop_log("reset window: no monitor work area, position left unchanged");
        return;
    };
    let position = window_geometry::bottom_right_position(area, size);
    log_persist_error("window position", state.settings.set_window_position(position));

    if let Some(window) = host.main_window() {
        if let Err(error) = window.apply_geometry(WindowGeometry { position, size }) {
            append_desktop_log(&error);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::dispatch;
    use crate::{
        settings_store::{
            test_support::MemorySettingsStore, ShellSettings, WindowPosition, WindowSize,
            KEY_ALWAYS_ON_TOP, KEY_ANIMATIONS_ENABLED, KEY_LANGUAGE, KEY_OPEN_AT_STARTUP,
            KEY_WINDOW_POSITION, KEY_WINDOW_SIZE,
        },
        shell_host::test_support::{FakeHost, HostCall},
        tray_actions::MenuAction,
        update_checker::UpdateCheckMode,
        window_geometry::WindowGeometry,
        ShellState,
    };

    fn state_with(store: &Arc<MemorySettingsStore>) -> ShellState {
        ShellState::new(
            ShellSettings::new(store.clone()),
            "en",
            "https://ai.acary.app/chat".to_string(),
        )
    }

    fn fresh_state() -> (Arc<MemorySettingsStore>, ShellState) {
        let store = Arc::new(MemorySettingsStore::with(&[]));
        let state = state_with(&store);
        (store, state)
    }

    #[test]
    fn toggle_always_on_top_applies_to_existing_window_and_persists() {
        let (store, state) = fresh_state();
        let host = FakeHost::with_window(true);

        dispatch(&host, &state, MenuAction::ToggleAlwaysOnTop);

        assert!(!state.always_on_top());
        assert_eq!(host.calls(), vec![HostCall::AlwaysOnTop(false)]);
        assert_eq!(store.writes(), vec![KEY_ALWAYS_ON_TOP.to_string()]);
        assert!(!state.settings.always_on_top());
    }

    #[test]
    fn toggle_always_on_top_only_persists_without_window() {
        let (store, state) = fresh_state();
        let host = FakeHost::without_window();

        dispatch(&host, &state, MenuAction::ToggleAlwaysOnTop);

        assert!(host.calls().is_empty());
        assert_eq!(store.writes(), vec![KEY_ALWAYS_ON_TOP.to_string()]);
    }

    #[test]
    fn toggle_animations_flips_flag_and_persists() {
        let store = Arc::new(MemorySettingsStore::with(&[(
            KEY_ANIMATIONS_ENABLED,
            json!(true),
        )]));
        let state = state_with(&store);

        dispatch(&FakeHost::without_window(), &state, MenuAction::ToggleAnimations);

        assert!(!state.animations_enabled());
        assert!(!state.settings.animations_enabled());
    }

    #[test]
    fn toggle_startup_persists_then_registers_autostart() {
        let (store, state) = fresh_state();
        let host = FakeHost::without_window();

        dispatch(&host, &state, MenuAction::ToggleStartup);

        assert_eq!(host.calls(), vec![HostCall::Autostart(false)]);
        assert!(!state.settings.open_at_startup());
        assert_eq!(store.writes(), vec![KEY_OPEN_AT_STARTUP.to_string()]);
    }

    #[test]
    fn reset_window_persists_default_geometry_and_applies_it() {
        let store = Arc::new(MemorySettingsStore::with(&[
            (KEY_WINDOW_POSITION, json!({"x": 40, "y": 40})),
            (KEY_WINDOW_SIZE, json!({"width": 800, "height": 600})),
        ]));
        let state = state_with(&store);
        let host = FakeHost::with_window(true);

        dispatch(&host, &state, MenuAction::ResetWindow);

        let expected = WindowGeometry {
            position: WindowPosition { x: 1510, y: 370 },
            size: WindowSize::DEFAULT,
        };
        assert_eq!(host.calls(), vec![HostCall::Geometry(expected)]);
        assert_eq!(state.settings.window_size(), WindowSize::DEFAULT);
        assert_eq!(state.settings.window_position(), expected.position);
    }

    #[test]
    fn reset_window_without_work_area_only_resets_size() {
        let (store, state) = fresh_state();
        let host = FakeHost::with_window(true).without_work_area();

        dispatch(&host, &state, MenuAction::ResetWindow);

        assert!(host.calls().is_empty());
        assert_eq!(store.writes(), vec![KEY_WINDOW_SIZE.to_string()]);
    }

    #[test]
    fn set_language_switches_persists_and_refreshes_menus() {
        let (store, state) = fresh_state();
        let host = FakeHost::without_window();

        dispatch(&host, &state, MenuAction::SetLanguage("fr"));

        assert_eq!(state.i18n.language(), "fr");
        assert_eq!(state.settings.language().as_deref(), Some("fr"));
        assert_eq!(store.writes(), vec![KEY_LANGUAGE.to_string()]);
        assert_eq!(host.calls(), vec![HostCall::RefreshMenus("fr")]);
    }

    #[test]
    fn check_updates_from_menu_is_verbose() {
        let (_store, state) = fresh_state();
        let host = FakeHost::without_window();

        dispatch(&host, &state, MenuAction::CheckUpdates);

        assert_eq!(
            host.calls(),
            vec![HostCall::CheckForUpdates(UpdateCheckMode::Verbose)]
        );
    }

    #[test]
    fn quit_marks_quitting_before_exit() {
        let (_store, state) = fresh_state();
        let host = FakeHost::with_window(true);

        dispatch(&host, &state, MenuAction::Quit);

        assert!(state.is_quitting());
        assert_eq!(host.calls(), vec![HostCall::Exit(0)]);
    }

    #[test]
    fn image_actions_use_the_pending_image_url() {
        let (_store, state) = fresh_state();
        let host = FakeHost::without_window();

        dispatch(&host, &state, MenuAction::DownloadImage);
        assert!(host.calls().is_empty());

        state.set_pending_image_url("https://cdn.acary.app/cat.png".to_string());
        dispatch(&host, &state, MenuAction::DownloadImage);
        dispatch(&host, &state, MenuAction::CopyImageUrl);

        assert_eq!(
            host.calls(),
            vec![
                HostCall::SaveImage("https://cdn.acary.app/cat.png".to_string()),
                HostCall::Clipboard("https://cdn.acary.app/cat.png".to_string()),
            ]
        );
    }

    #[test]
    fn open_window_creates_missing_window() {
        let (_store, state) = fresh_state();
        let host = FakeHost::without_window();

        dispatch(&host, &state, MenuAction::OpenWindow);

        assert_eq!(host.calls(), vec![HostCall::CreateMainWindow]);
    }
}
