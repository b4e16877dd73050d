use std::sync::Arc;
use tauri::{App, Manager, RunEvent, Runtime};
use tauri_plugin_autostart::MacosLauncher;

use crate::{
    append_desktop_log, append_startup_log, autostart, exit_events, logging, main_window,
    menu_refresh, reload_shortcut,
    settings_store::{JsonFileStore, ShellSettings},
    shell_config,
    shell_host::TauriHost,
    shell_locale, tray_menu_handler, tray_setup,
    update_checker::{self, UpdateCheckMode},
    window_actions, ShellState, DESKTOP_LOG_FILE, SETTINGS_FILE, STARTUP_UPDATE_CHECK_DELAY,
};

fn manage_shell_state<R: Runtime>(app: &App<R>) {
    if app.try_state::<ShellState>().is_some() {
        append_startup_log("shell state already initialized, reusing it");
        return;
    }

    let settings_path = match app.path().app_config_dir() {
        Ok(dir) => dir.join(SETTINGS_FILE),
        Err(error) => {
            append_startup_log(&format!(
                "failed to resolve app config dir, using temp dir: {error}"
            ));
            std::env::temp_dir().join(SETTINGS_FILE)
        }
    };
    append_startup_log(&format!("settings path: {}", settings_path.display()));
    let settings = ShellSettings::new(Arc::new(JsonFileStore::open(settings_path)));

    let language = shell_locale::resolve_language(
        settings.language().as_deref(),
        shell_locale::host_locale_candidates(),
    );
    let app_url = shell_config::resolve_app_url();
    append_startup_log(&format!("language={language} app_url={app_url}"));

    app.manage(ShellState::new(settings, language, app_url));
}

fn start_shell<R: Runtime>(app: &App<R>) {
    manage_shell_state(app);

    let app_handle = app.handle().clone();
    let state = app.state::<ShellState>();

    autostart::apply_autostart(&app_handle, state.open_at_startup());

    if let Err(error) = tray_setup::setup_tray(&app_handle, &state) {
        append_startup_log(&format!("failed to initialize tray: {error}"));
    }

    if let Err(error) = main_window::create_main_window(&app_handle, &state) {
        append_startup_log(&format!("failed to create main window: {error}"));
    }

    menu_refresh::install_application_menu(&app_handle, &state);

    // Tray-only until a window is created.
    #[cfg(target_os = "macos")]
    {
        if app_handle.get_webview_window(crate::MAIN_WINDOW_LABEL).is_none() {
            if let Err(error) = app_handle.set_activation_policy(tauri::ActivationPolicy::Accessory)
            {
                append_startup_log(&format!("failed to hide dock icon: {error}"));
            }
        }
    }

    if let Err(error) = reload_shortcut::register_reload_shortcut(&app_handle) {
        append_startup_log(&error);
    }

    let update_app_handle = app_handle.clone();
    tauri::async_runtime::spawn(async move {
        tokio::time::sleep(STARTUP_UPDATE_CHECK_DELAY).await;
        update_checker::spawn_update_check(update_app_handle, UpdateCheckMode::Silent);
    });
}

pub(crate) fn run() {
    logging::init_console_logger();
    append_startup_log("desktop process starting");

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app_handle, _args, _cwd| {
            append_desktop_log("second instance launched, focusing existing window");
            if let Some(state) = app_handle.try_state::<ShellState>() {
                window_actions::show_main_window(&TauriHost::new(app_handle.clone()), &state);
            }
        }))
        .plugin(tauri_plugin_autostart::init(MacosLauncher::LaunchAgent, None))
        .plugin(tauri_plugin_clipboard_manager::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_global_shortcut::Builder::new().build())
        .plugin(tauri_plugin_os::init())
        .plugin(tauri_plugin_updater::Builder::new().build())
        .invoke_handler(tauri::generate_handler![
            crate::desktop_bridge_commands::window_drag,
            crate::desktop_bridge_commands::open_in_browser,
            crate::desktop_bridge_commands::image_context_menu,
            crate::desktop_bridge_commands::window_context_menu,
            crate::desktop_bridge_commands::set_language,
            crate::desktop_bridge_commands::get_current_language,
            crate::desktop_bridge_commands::get_available_languages,
        ])
        .on_menu_event(|app_handle, event| {
            tray_menu_handler::handle_menu_event(app_handle, event.id().as_ref());
        })
        .on_window_event(main_window::handle_window_event)
        .setup(|app| {
            let log_path =
                logging::resolve_desktop_log_path(app.path().app_log_dir().ok(), DESKTOP_LOG_FILE);
            logging::init_file_log(log_path.clone());
            append_startup_log(&format!("desktop log path: {}", log_path.display()));

            start_shell(app);
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            #[cfg(target_os = "macos")]
            RunEvent::Reopen {
                has_visible_windows: false,
                ..
            } => {
                if let Some(state) = app_handle.try_state::<ShellState>() {
                    window_actions::show_main_window(&TauriHost::new(app_handle.clone()), &state);
                }
            }
            RunEvent::ExitRequested { code, .. } => {
                exit_events::handle_exit_requested(app_handle, code);
            }
            RunEvent::Exit => {
                exit_events::handle_exit_event(app_handle);
            }
            _ => {}
        });
}
