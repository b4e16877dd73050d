use serde::Serialize;
use tauri::{AppHandle, Emitter, Runtime};
use url::Url;

use crate::{append_desktop_log, MAIN_WINDOW_LABEL};

const BRIDGE_TEMPLATE: &str = include_str!("desktop_bridge.js");
const ALLOWED_ORIGIN_PLACEHOLDER: &str = "__ALLOWED_ORIGIN__";

fn origin_literal(app_url: &str) -> String {
    let origin = Url::parse(app_url)
        .map(|url| url.origin().ascii_serialization())
        .unwrap_or_default();
    serde_json::to_string(&origin).unwrap_or_else(|_| "\"\"".to_string())
}

// Page script exposing `window.desktopShell`, restricted to the app's origin.
pub(crate) fn bridge_script(app_url: &str) -> String {
    BRIDGE_TEMPLATE.replace(ALLOWED_ORIGIN_PLACEHOLDER, &origin_literal(app_url))
}

pub(crate) fn emit_to_page<R, S>(app_handle: &AppHandle<R>, event: &str, payload: S)
where
    R: Runtime,
    S: Serialize + Clone,
{
    if let Err(error) = app_handle.emit_to(MAIN_WINDOW_LABEL, event, payload) {
        append_desktop_log(&format!("failed to emit {event} to main window: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_script_embeds_the_app_origin() {
        let script = bridge_script("https://ai.acary.app/chat");
        assert!(script.contains(r#"const allowedOrigin = "https://ai.acary.app";"#));
        assert!(!script.contains(ALLOWED_ORIGIN_PLACEHOLDER));
    }

    #[test]
    fn bridge_script_keeps_explicit_ports() {
        let script = bridge_script("http://localhost:3000/");
        assert!(script.contains(r#""http://localhost:3000""#));
    }

    #[test]
    fn bridge_script_invokes_every_registered_command() {
        let script = bridge_script("https://ai.acary.app/chat");
        for command in [
            "window_drag",
            "open_in_browser",
            "image_context_menu",
            "window_context_menu",
            "set_language",
            "get_current_language",
            "get_available_languages",
        ] {
            assert!(script.contains(&format!("'{command}'")), "missing {command}");
        }
    }
}
