use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

use tauri::{AppHandle, Manager, Runtime};
use tauri_plugin_global_shortcut::{GlobalShortcutExt, Shortcut, ShortcutState};

use crate::{
    append_desktop_log, append_shutdown_log, ShellState, MAIN_WINDOW_LABEL, RELOAD_COOLDOWN,
    RELOAD_SHORTCUT,
};

// Drops reload requests that arrive within `cooldown` of the last accepted one.
#[derive(Debug)]
pub(crate) struct ReloadDebounce {
    cooldown: Duration,
    last_fired: Mutex<Option<Instant>>,
}

impl Default for ReloadDebounce {
    fn default() -> Self {
        Self::new(RELOAD_COOLDOWN)
    }
}

impl ReloadDebounce {
    pub(crate) fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_fired: Mutex::new(None),
        }
    }

    pub(crate) fn try_fire(&self, now: Instant) -> bool {
        let Ok(mut last_fired) = self.last_fired.lock() else {
            return false;
        };
        match *last_fired {
            Some(previous) if now.saturating_duration_since(previous) < self.cooldown => false,
            _ => {
                *last_fired = Some(now);
                true
            }
        }
    }
}

pub(crate) fn register_reload_shortcut<R: Runtime>(app_handle: &AppHandle<R>) -> Result<(), String> {
    let shortcut = RELOAD_SHORTCUT
        .parse::<Shortcut>()
        .map_err(|error| format!("Invalid reload shortcut {RELOAD_SHORTCUT}: {error}"))?;

    let global_shortcut = app_handle.global_shortcut();
    if global_shortcut.is_registered(shortcut) {
        return Ok(());
    }

    global_shortcut
        .on_shortcut(shortcut, |app, _shortcut, event| {
            if event.state() == ShortcutState::Pressed {
                reload_main_window(app);
            }
        })
        .map_err(|error| format!("Failed to register reload shortcut {RELOAD_SHORTCUT}: {error}"))
}

pub(crate) fn unregister_all_shortcuts<R: Runtime>(app_handle: &AppHandle<R>) {
    if let Err(error) = app_handle.global_shortcut().unregister_all() {
        append_shutdown_log(&format!("failed to unregister global shortcuts: {error}"));
    }
}

fn reload_main_window<R: Runtime>(app_handle: &AppHandle<R>) {
    let Some(state) = app_handle.try_state::<ShellState>() else {
        return;
    };
    if !state.reload_debounce.try_fire(Instant::now()) {
        return;
    }

    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        append_desktop_log("reload skipped: main window not found");
        return;
    };
    append_desktop_log("reloading main window");
    if let Err(error) = window.eval("window.location.reload();") {
        append_desktop_log(&format!("failed to reload main window: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_press_fires() {
        let debounce = ReloadDebounce::new(Duration::from_millis(500));
        assert!(debounce.try_fire(Instant::now()));
    }

    #[test]
    fn presses_inside_cooldown_are_dropped() {
        let debounce = ReloadDebounce::new(Duration::from_millis(500));
        let start = Instant::now();

        assert!(debounce.try_fire(start));
        assert!(!debounce.try_fire(start + Duration::from_millis(100)));
        assert!(!debounce.try_fire(start + Duration::from_millis(499)));
        assert!(debounce.try_fire(start + Duration::from_millis(500)));
    }

    #[test]
    fn dropped_presses_do_not_extend_the_cooldown() {
        let debounce = ReloadDebounce::new(Duration::from_millis(500));
        let start = Instant::now();

        assert!(debounce.try_fire(start));
        assert!(!debounce.try_fire(start + Duration::from_millis(400)));
        assert!(debounce.try_fire(start + Duration::from_millis(600)));
    }
}
