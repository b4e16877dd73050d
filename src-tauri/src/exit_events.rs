use tauri::{AppHandle, Manager, Runtime};

use crate::{append_shutdown_log, append_update_log, reload_shortcut, ShellState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExitDecision {
    BeginQuit,
    AlreadyQuitting,
}

pub(crate) fn decide_exit(is_quitting: bool) -> ExitDecision {
    if is_quitting {
        ExitDecision::AlreadyQuitting
    } else {
        ExitDecision::BeginQuit
    }
}

// The main window only hides on close, so an exit request without our own quit
// flag comes from the host (app menu Quit, Cmd+Q, Dock Quit) and is honoured.
pub(crate) fn record_exit_request(state: &ShellState, code: Option<i32>) -> ExitDecision {
    let decision = decide_exit(state.is_quitting());
    match decision {
        ExitDecision::BeginQuit => {
            state.mark_quitting();
            append_shutdown_log(&format!("host requested exit with code {code:?}"));
        }
        ExitDecision::AlreadyQuitting => {
            append_shutdown_log(&format!("exit requested with code {code:?}"));
        }
    }
    decision
}

pub(crate) fn handle_exit_requested<R: Runtime>(app_handle: &AppHandle<R>, code: Option<i32>) {
    if let Some(state) = app_handle.try_state::<ShellState>() {
        record_exit_request(&state, code);
    }
}

pub(crate) fn handle_exit_event<R: Runtime>(app_handle: &AppHandle<R>) {
    reload_shortcut::unregister_all_shortcuts(app_handle);

    let Some(state) = app_handle.try_state::<ShellState>() else {
        return;
    };
    if let Some(update) = state.take_deferred_update() {
        append_update_log(&format!("installing deferred update {} on exit", update.version()));
        if let Err(error) = update.install() {
            append_update_log(&format!("deferred update install failed: {error}"));
        }
    }
    append_shutdown_log("desktop process exiting");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{decide_exit, record_exit_request, ExitDecision};
    use crate::{
        settings_store::{test_support::MemorySettingsStore, ShellSettings},
        ShellState,
    };

    fn state() -> ShellState {
        let settings = ShellSettings::new(Arc::new(MemorySettingsStore::default()));
        ShellState::new(settings, "en", "https://ai.acary.app/chat".to_string())
    }

    #[test]
    fn host_quit_without_code_marks_quitting() {
        let state = state();

        assert_eq!(record_exit_request(&state, None), ExitDecision::BeginQuit);
        assert!(state.is_quitting());
    }

    #[test]
    fn menu_quit_is_recognised_as_already_quitting() {
        let state = state();
        state.mark_quitting();

        assert_eq!(
            record_exit_request(&state, Some(0)),
            ExitDecision::AlreadyQuitting
        );
        assert!(state.is_quitting());
    }

    #[test]
    fn decide_exit_never_keeps_the_process_alive() {
        assert_eq!(decide_exit(false), ExitDecision::BeginQuit);
        assert_eq!(decide_exit(true), ExitDecision::AlreadyQuitting);
    }
}
