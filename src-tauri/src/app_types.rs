use serde::{Deserialize, Serialize};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use crate::{
    menu_template::TrayToggles, reload_shortcut::ReloadDebounce, settings_store::ShellSettings,
    shell_locale::ShellI18n, update_checker::DownloadedUpdate, window_fade::FadeController,
};

pub(crate) struct ShellState {
    pub(crate) settings: ShellSettings,
    pub(crate) i18n: ShellI18n,
    pub(crate) app_url: String,
    pub(crate) fade: FadeController,
    pub(crate) reload_debounce: ReloadDebounce,
    pub(crate) update_in_progress: AtomicBool,
    is_quitting: AtomicBool,
    always_on_top: AtomicBool,
    animations_enabled: AtomicBool,
    open_at_startup: AtomicBool,
    reveal_on_load: AtomicBool,
    pending_image_url: Mutex<Option<String>>,
    deferred_update: Mutex<Option<DownloadedUpdate>>,
}

impl ShellState {
    pub(crate) fn new(settings: ShellSettings, language: &'static str, app_url: String) -> Self {
        let always_on_top = settings.always_on_top();
        let animations_enabled = settings.animations_enabled();
        let open_at_startup = settings.open_at_startup();

        Self {
            settings,
            i18n: ShellI18n::new(language),
            app_url,
            fade: FadeController::default(),
            reload_debounce: ReloadDebounce::default(),
            update_in_progress: AtomicBool::new(false),
            is_quitting: AtomicBool::new(false),
            always_on_top: AtomicBool::new(always_on_top),
            animations_enabled: AtomicBool::new(animations_enabled),
            open_at_startup: AtomicBool::new(open_at_startup),
            reveal_on_load: AtomicBool::new(false),
            pending_image_url: Mutex::new(None),
            deferred_update: Mutex::new(None),
        }
    }

    pub(crate) fn is_quitting(&self) -> bool {
        self.is_quitting.load(Ordering::Acquire)
    }

    pub(crate) fn mark_quitting(&self) {
        self.is_quitting.store(true, Ordering::Release);
    }

    pub(crate) fn always_on_top(&self) -> bool {
        self.always_on_top.load(Ordering::Acquire)
    }

    pub(crate) fn animations_enabled(&self) -> bool {
        self.animations_enabled.load(Ordering::Acquire)
    }

    pub(crate) fn open_at_startup(&self) -> bool {
        self.open_at_startup.load(Ordering::Acquire)
    }

    // Flips the flag and returns the new value.
    pub(crate) fn toggle_always_on_top(&self) -> bool {
        !self.always_on_top.fetch_xor(true, Ordering::AcqRel)
    }

    pub(crate) fn toggle_animations(&self) -> bool {
        !self.animations_enabled.fetch_xor(true, Ordering::AcqRel)
    }

    pub(crate) fn toggle_open_at_startup(&self) -> bool {
        !self.open_at_startup.fetch_xor(true, Ordering::AcqRel)
    }

    pub(crate) fn tray_toggles(&self) -> TrayToggles {
        TrayToggles {
            always_on_top: self.always_on_top(),
            animations_enabled: self.animations_enabled(),
            open_at_startup: self.open_at_startup(),
        }
    }

    pub(crate) fn arm_reveal_on_load(&self) {
        self.reveal_on_load.store(true, Ordering::Release);
    }

    // True once per armed window, for its first finished page load.
    pub(crate) fn take_reveal_on_load(&self) -> bool {
        self.reveal_on_load.swap(false, Ordering::AcqRel)
    }

    pub(crate) fn set_pending_image_url(&self, url: String) {
        if let Ok(mut guard) = self.pending_image_url.lock() {
            *guard = Some(url);
        }
    }

    pub(crate) fn pending_image_url(&self) -> Option<String> {
        self.pending_image_url
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }

    pub(crate) fn store_deferred_update(&self, update: DownloadedUpdate) {
        if let Ok(mut guard) = self.deferred_update.lock() {
            *guard = Some(update);
        }
    }

    pub(crate) fn take_deferred_update(&self) -> Option<DownloadedUpdate> {
        self.deferred_update
            .lock()
            .ok()
            .and_then(|mut guard| guard.take())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct BridgeResult {
    pub(crate) ok: bool,
    pub(crate) reason: Option<String>,
}

impl BridgeResult {
    pub(crate) fn ok() -> Self {
        Self {
            ok: true,
            reason: None,
        }
    }

    pub(crate) fn failed(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
        }
    }
}

impl From<Result<(), String>> for BridgeResult {
    fn from(result: Result<(), String>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(reason) => Self::failed(reason),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateProgressPayload {
    pub(crate) percent: f64,
    pub(crate) speed: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DownloadCompletePayload {
    pub(crate) success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
}

impl DownloadCompletePayload {
    pub(crate) fn saved(file_path: String) -> Self {
        Self {
            success: true,
            file_path: Some(file_path),
            error: None,
        }
    }

    pub(crate) fn failed(error: String) -> Self {
        Self {
            success: false,
            file_path: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageContextMenuRequest {
    pub(crate) src_url: String,
    pub(crate) x: f64,
    pub(crate) y: f64,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub(crate) struct ContextMenuPoint {
    pub(crate) x: f64,
    pub(crate) y: f64,
}

pub(crate) struct AtomicFlagGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> AtomicFlagGuard<'a> {
    pub(crate) fn try_set(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag })
    }
}

impl Drop for AtomicFlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
