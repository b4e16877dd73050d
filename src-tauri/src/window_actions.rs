use crate::{
    append_desktop_log,
    shell_host::{ShellHost, ShellWindow},
    ShellState,
};

pub(crate) fn show_main_window<H: ShellHost>(host: &H, state: &ShellState) {
    match host.main_window() {
        Some(window) => state
            .fade
            .fade_in(&window, state.animations_enabled(), || {}),
        None => create_main_window(host, state),
    }
}

pub(crate) fn hide_main_window<H: ShellHost>(host: &H, state: &ShellState) {
    let Some(window) = host.main_window() else {
        append_desktop_log("hide_main_window skipped: main window not found");
        return;
    };
    state
        .fade
        .fade_out(&window, state.animations_enabled(), || {});
}

pub(crate) fn toggle_main_window<H: ShellHost>(host: &H, state: &ShellState) {
    match host.main_window() {
        None => create_main_window(host, state),
        Some(window) if window.is_visible() => {
            state
                .fade
                .fade_out(&window, state.animations_enabled(), || {})
        }
        Some(window) => state
            .fade
            .fade_in(&window, state.animations_enabled(), || {}),
    }
}

fn create_main_window<H: ShellHost>(host: &H, state: &ShellState) {
    if let Err(error) = host.create_main_window(state) {
        append_desktop_log(&format!("failed to create main window: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        settings_store::{test_support::MemorySettingsStore, ShellSettings},
        shell_host::test_support::{FakeHost, HostCall},
        window_fade::test_support::SurfaceCall,
    };

    fn state() -> ShellState {
        let settings = ShellSettings::new(Arc::new(MemorySettingsStore::default()));
        ShellState::new(settings, "en", "https://ai.acary.app/chat".to_string())
    }

    #[test]
    fn toggle_creates_window_when_absent() {
        let host = FakeHost::without_window();
        toggle_main_window(&host, &state());
        assert_eq!(host.calls(), vec![HostCall::CreateMainWindow]);
    }

    #[test]
    fn toggle_hides_visible_window_and_shows_hidden_one() {
        let state = state();
        let host = FakeHost::with_window(true);

        toggle_main_window(&host, &state);
        assert!(!host.window().is_visible());

        toggle_main_window(&host, &state);
        assert!(host.window().is_visible());
        assert_eq!(
            host.window().surface_calls(),
            vec![SurfaceCall::Hide, SurfaceCall::Show]
        );
    }

    #[test]
    fn show_uses_existing_window_without_creating() {
        let host = FakeHost::with_window(false);
        show_main_window(&host, &state());
        assert!(host.calls().is_empty());
        assert_eq!(host.window().surface_calls(), vec![SurfaceCall::Show]);
    }
}
