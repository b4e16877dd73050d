use tauri::{
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    AppHandle, Manager, Runtime,
};

use crate::{
    append_desktop_log, menu_refresh, shell_host::TauriHost, window_actions, ShellState, TRAY_ID,
};

pub(crate) fn setup_tray<R: Runtime>(
    app_handle: &AppHandle<R>,
    state: &ShellState,
) -> Result<(), String> {
    if app_handle.tray_by_id(TRAY_ID).is_some() {
        append_desktop_log("tray already exists, skipping creation");
        return Ok(());
    }

    let menu = menu_refresh::build_tray_menu(app_handle, state)?;

    // Menu clicks go through the app-wide menu handler registered on the builder.
    let tray_builder = TrayIconBuilder::with_id(TRAY_ID)
        .menu(&menu)
        .tooltip(state.i18n.t("tray.tooltip"))
        .icon(tauri::include_image!("./icons/tray.png"))
        .show_menu_on_left_click(false)
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                let app_handle = tray.app_handle();
                if let Some(state) = app_handle.try_state::<ShellState>() {
                    let host = TauriHost::new(app_handle.clone());
                    window_actions::toggle_main_window(&host, &state);
                }
            }
        });

    #[cfg(target_os = "macos")]
    let tray_builder = tray_builder.icon_as_template(true);

    tray_builder
        .build(app_handle)
        .map_err(|error| format!("Failed to create tray icon: {error}"))?;
    Ok(())
}
