use tauri::{AppHandle, Runtime};
use tauri_plugin_autostart::ManagerExt;

use crate::append_desktop_log;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AutostartChange {
    Enable,
    Disable,
    Keep,
}

fn decide_autostart_change(requested: bool, registered: Option<bool>) -> AutostartChange {
    match (requested, registered) {
        (true, Some(true)) | (false, Some(false)) => AutostartChange::Keep,
        (true, _) => AutostartChange::Enable,
        (false, _) => AutostartChange::Disable,
    }
}

// Registers or removes the login item. Platforms without support log and move on.
pub(crate) fn apply_autostart<R: Runtime>(app_handle: &AppHandle<R>, enabled: bool) {
    let autolaunch = app_handle.autolaunch();
    let registered = match autolaunch.is_enabled() {
        Ok(registered) => Some(registered),
        Err(error) => {
            append_desktop_log(&format!("failed to read autostart registration: {error}"));
            None
        }
    };

    let result = match decide_autostart_change(enabled, registered) {
        AutostartChange::Keep => return,
        AutostartChange::Enable => autolaunch.enable(),
        AutostartChange::Disable => autolaunch.disable(),
    };

    match result {
        Ok(()) => append_desktop_log(&format!(
            "autostart {}",
            if enabled { "enabled" } else { "disabled" }
        )),
        Err(error) => append_desktop_log(&format!("failed to update autostart: {error}")),
    }
}

#[cfg(test)]
mod tests {
    use super::{decide_autostart_change, AutostartChange};

    #[test]
    fn matching_registration_is_left_alone() {
        assert_eq!(decide_autostart_change(true, Some(true)), AutostartChange::Keep);
        assert_eq!(decide_autostart_change(false, Some(false)), AutostartChange::Keep);
    }

    #[test]
    fn mismatched_or_unknown_registration_is_rewritten() {
        assert_eq!(decide_autostart_change(true, Some(false)), AutostartChange::Enable);
        assert_eq!(decide_autostart_change(false, Some(true)), AutostartChange::Disable);
        assert_eq!(decide_autostart_change(true, None), AutostartChange::Enable);
        assert_eq!(decide_autostart_change(false, None), AutostartChange::Disable);
    }
}
