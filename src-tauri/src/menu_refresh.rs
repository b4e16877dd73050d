use tauri::{AppHandle, Runtime};

use crate::{
    append_desktop_log,
    menu_render::build_menu,
    menu_template::{self, MenuPlatform},
    shell_locale, ShellState, APP_NAME, TRAY_ID,
};

pub(crate) fn build_tray_menu<R: Runtime>(
    app_handle: &AppHandle<R>,
    state: &ShellState,
) -> Result<tauri::menu::Menu<R>, String> {
    let entries = menu_template::tray_menu(
        state.tray_toggles(),
        &state.i18n,
        &shell_locale::available_languages(),
        MenuPlatform::current(),
    );
    build_menu(app_handle, &entries)
}

pub(crate) fn refresh_menus<R: Runtime>(app_handle: &AppHandle<R>, state: &ShellState) {
    if let Some(tray) = app_handle.tray_by_id(TRAY_ID) {
        match build_tray_menu(app_handle, state) {
            Ok(menu) => {
                if let Err(error) = tray.set_menu(Some(menu)) {
                    append_desktop_log(&format!("failed to replace tray menu: {error}"));
                }
            }
            Err(error) => append_desktop_log(&format!("failed to rebuild tray menu: {error}")),
        }
        if let Err(error) = tray.set_tooltip(Some(state.i18n.t("tray.tooltip"))) {
            append_desktop_log(&format!("failed to update tray tooltip: {error}"));
        }
    }

    install_application_menu(app_handle, state);
}

pub(crate) fn install_application_menu<R: Runtime>(app_handle: &AppHandle<R>, state: &ShellState) {
    let entries =
        menu_template::application_menu(APP_NAME, &state.i18n, MenuPlatform::current());
    if entries.is_empty() {
        if let Err(error) = app_handle.remove_menu() {
            append_desktop_log(&format!("failed to remove application menu: {error}"));
        }
        return;
    }

    match build_menu(app_handle, &entries) {
        Ok(menu) => {
            if let Err(error) = app_handle.set_menu(menu) {
                append_desktop_log(&format!("failed to install application menu: {error}"));
            }
        }
        Err(error) => append_desktop_log(&format!("failed to build application menu: {error}")),
    }
}
