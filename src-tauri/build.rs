fn main() {
    tauri_build::try_build(
        tauri_build::Attributes::new().app_manifest(tauri_build::AppManifest::new().commands(&[
            "window_drag",
            "open_in_browser",
            "image_context_menu",
            "window_context_menu",
            "set_language",
            "get_current_language",
            "get_available_languages",
        ])),
    )
    .expect("failed to run tauri-build");
}
