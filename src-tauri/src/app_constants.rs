use std::time::Duration;

pub const APP_NAME: &str = "AI";
pub const DEFAULT_APP_URL: &str = "https://ai.acary.app/chat";
pub const APP_URL_ENV: &str = "AI_TRAY_APP_URL";
pub const LOCALE_ENV: &str = "AI_TRAY_LOCALE";

pub const MAIN_WINDOW_LABEL: &str = "main";
pub const TRAY_ID: &str = "ai-chat-tray";

pub const SETTINGS_FILE: &str = "settings.json";
pub const DESKTOP_LOG_FILE: &str = "desktop.log";

pub const BASE_LANGUAGE: &str = "en";

pub const DEFAULT_WINDOW_WIDTH: u32 = 400;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 700;
pub const WINDOW_SCREEN_MARGIN: i32 = 10;

pub const FADE_STEP: f64 = 0.15;
pub const FADE_INTERVAL: Duration = Duration::from_millis(5);

pub const RELOAD_SHORTCUT: &str = "CommandOrControl+R";
pub const RELOAD_COOLDOWN: Duration = Duration::from_millis(500);

pub const STARTUP_UPDATE_CHECK_DELAY: Duration = Duration::from_secs(5);
pub const UPDATE_CHECK_TIMEOUT: Duration = Duration::from_secs(30);
pub const UPDATE_PROGRESS_INTERVAL: Duration = Duration::from_millis(250);

pub const IMAGE_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);
pub const IMAGE_MAX_REDIRECTS: usize = 5;
pub const IMAGE_FALLBACK_FILE_NAME: &str = "image.png";
pub const IMAGE_FILE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

pub const EVENT_UPDATE_PROGRESS: &str = "update-progress";
pub const EVENT_DOWNLOAD_COMPLETE: &str = "download-complete";
pub const EVENT_WINDOW_DRAG_STARTED: &str = "window-drag-started";
