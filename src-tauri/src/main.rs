#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_runtime;
mod app_types;
mod autostart;
mod desktop_bridge;
mod desktop_bridge_commands;
mod exit_events;
mod image_download;
mod logging;
mod main_window;
mod menu_refresh;
mod menu_render;
mod menu_template;
mod reload_shortcut;
mod settings_store;
mod shell_config;
mod shell_host;
mod shell_locale;
mod tray_actions;
mod tray_menu_handler;
mod tray_setup;
mod update_checker;
mod window_actions;
mod window_fade;
mod window_geometry;

pub(crate) use app_constants::*;
pub(crate) use app_types::{
    AtomicFlagGuard, BridgeResult, ContextMenuPoint, DownloadCompletePayload,
    ImageContextMenuRequest, ShellState, UpdateProgressPayload,
};
pub(crate) use logging::{
    append_desktop_log, append_shutdown_log, append_startup_log, append_update_log,
};

fn main() {
    app_runtime::run();
}
