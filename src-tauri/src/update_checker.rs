use std::time::{Duration, Instant};

use tauri::{AppHandle, Manager, Runtime};
use tauri_plugin_dialog::{DialogExt, MessageDialogButtons, MessageDialogKind};
use tauri_plugin_updater::{Update, UpdaterExt};
use tokio::sync::oneshot;

use crate::{
    append_update_log, desktop_bridge, shell_locale::ShellI18n, AtomicFlagGuard, ShellState,
    UpdateProgressPayload, EVENT_UPDATE_PROGRESS, UPDATE_CHECK_TIMEOUT, UPDATE_PROGRESS_INTERVAL,
};

// Silent checks run at startup and keep quiet when nothing is new.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UpdateCheckMode {
    Verbose,
    Silent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UpdatePhase {
    Checking,
    NoUpdate,
    UpdateAvailable,
    Downloading,
    Downloaded,
    InstallNow,
    Deferred,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InstallDecision {
    InstallNow,
    Defer,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum UpdateError {
    #[error("failed to initialize updater: {0}")]
    Init(String),
    #[error("update check timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),
    #[error("failed to check for updates: {0}")]
    Check(String),
    #[error("failed to download update: {0}")]
    Download(String),
    #[error("failed to install update: {0}")]
    Install(String),
}

pub(crate) struct DownloadedUpdate {
    update: Update,
    bytes: Vec<u8>,
}

impl DownloadedUpdate {
    pub(crate) fn version(&self) -> &str {
        &self.update.version
    }

    pub(crate) fn install(&self) -> Result<(), UpdateError> {
        self.update
            .install(&self.bytes)
            .map_err(|error| UpdateError::Install(error.to_string()))
    }
}

// Turns download chunks into throttled `update-progress` payloads.
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    interval: Duration,
    started: Instant,
    last_emitted: Option<Instant>,
    downloaded: u64,
    total: Option<u64>,
}

impl ProgressTracker {
    pub(crate) fn new(interval: Duration, started: Instant) -> Self {
        Self {
            interval,
            started,
            last_emitted: None,
            downloaded: 0,
            total: None,
        }
    }

    pub(crate) fn record(
        &mut self,
        chunk_length: usize,
        content_length: Option<u64>,
        now: Instant,
    ) -> Option<UpdateProgressPayload> {
        self.downloaded += chunk_length as u64;
        if content_length.is_some() {
            self.total = content_length;
        }

        if let Some(last_emitted) = self.last_emitted {
            if now.saturating_duration_since(last_emitted) < self.interval {
                return None;
            }
        }
        self.last_emitted = Some(now);
        Some(self.snapshot(now))
    }

    pub(crate) fn finish(&self, now: Instant) -> UpdateProgressPayload {
        UpdateProgressPayload {
            percent: 100.0,
            ..self.snapshot(now)
        }
    }

    fn snapshot(&self, now: Instant) -> UpdateProgressPayload {
        let percent = match self.total {
            Some(total) if total > 0 => (self.downloaded as f64 / total as f64 * 100.0).min(100.0),
            _ => 0.0,
        };
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        let speed = if elapsed > 0.0 {
            self.downloaded as f64 / elapsed
        } else {
            0.0
        };
        UpdateProgressPayload { percent, speed }
    }
}

fn announces_no_update(mode: UpdateCheckMode) -> bool {
    mode == UpdateCheckMode::Verbose
}

fn error_message_key(error: &UpdateError) -> &'static str {
    match error {
        UpdateError::Init(_) | UpdateError::Timeout(_) | UpdateError::Check(_) => {
            "dialog.update.errorMessage"
        }
        UpdateError::Download(_) => "dialog.update.downloadErrorMessage",
        UpdateError::Install(_) => "dialog.update.installErrorMessage",
    }
}

fn decide_install(restart_now: bool) -> InstallDecision {
    if restart_now {
        InstallDecision::InstallNow
    } else {
        InstallDecision::Defer
    }
}

fn log_phase(phase: UpdatePhase, detail: &str) {
    if detail.is_empty() {
        append_update_log(&format!("phase={phase:?}"));
    } else {
        append_update_log(&format!("phase={phase:?} {detail}"));
    }
}

pub(crate) fn spawn_update_check<R: Runtime>(app_handle: AppHandle<R>, mode: UpdateCheckMode) {
    tauri::async_runtime::spawn(async move {
        run_update_check(app_handle, mode).await;
    });
}

async fn run_update_check<R: Runtime>(app_handle: AppHandle<R>, mode: UpdateCheckMode) {
    let Some(state) = app_handle.try_state::<ShellState>() else {
        append_update_log("update check skipped: shell state not ready");
        return;
    };
    let Some(_in_progress) = AtomicFlagGuard::try_set(&state.update_in_progress) else {
        append_update_log("update check ignored: another check is running");
        return;
    };

    if let Err(error) = check_download_install(&app_handle, &state, mode).await {
        log_phase(UpdatePhase::Failed, &error.to_string());
        let message = state
            .i18n
            .t_with(error_message_key(&error), &[("message", &error.to_string())]);
        inform(
            &app_handle,
            state.i18n.t("dialog.update.error"),
            message,
            MessageDialogKind::Error,
        )
        .await;
    }
}

async fn check_download_install<R: Runtime>(
    app_handle: &AppHandle<R>,
    state: &ShellState,
    mode: UpdateCheckMode,
) -> Result<(), UpdateError> {
    let i18n = &state.i18n;
    log_phase(
        UpdatePhase::Checking,
        &format!(
            "mode={mode:?} current_version={}",
            app_handle.package_info().version
        ),
    );

    let Some(update) = check_for_update(app_handle).await? else {
        log_phase(UpdatePhase::NoUpdate, "");
        if announces_no_update(mode) {
            inform(
                app_handle,
                i18n.t("dialog.update.title"),
                i18n.t("dialog.update.noUpdates"),
                MessageDialogKind::Info,
            )
            .await;
        }
        return Ok(());
    };

    log_phase(
        UpdatePhase::UpdateAvailable,
        &format!("latest_version={}", update.version),
    );
    if !ask_to_download(app_handle, i18n, &update.version).await {
        log_phase(UpdatePhase::Deferred, "download postponed by user");
        return Ok(());
    }

    log_phase(UpdatePhase::Downloading, "");
    let bytes = download_with_progress(app_handle, &update).await?;
    log_phase(UpdatePhase::Downloaded, &format!("bytes={}", bytes.len()));
    let downloaded = DownloadedUpdate { update, bytes };

    let restart_now = ask(
        app_handle,
        i18n.t("dialog.update.downloaded"),
        i18n.t("dialog.update.readyToInstall"),
        i18n.t("dialog.update.restart"),
        i18n.t("dialog.update.later"),
    )
    .await;

    match decide_install(restart_now) {
        InstallDecision::InstallNow => {
            log_phase(
                UpdatePhase::InstallNow,
                &format!("version={}", downloaded.version()),
            );
            downloaded.install()?;
            state.mark_quitting();
            app_handle.restart();
        }
        InstallDecision::Defer => {
            log_phase(
                UpdatePhase::Deferred,
                &format!("version={} installs on exit", downloaded.version()),
            );
            state.store_deferred_update(downloaded);
        }
    }
    Ok(())
}

async fn check_for_update<R: Runtime>(
    app_handle: &AppHandle<R>,
) -> Result<Option<Update>, UpdateError> {
    let updater = app_handle
        .updater_builder()
        .timeout(UPDATE_CHECK_TIMEOUT)
        .build()
        .map_err(|error| UpdateError::Init(error.to_string()))?;

    match tokio::time::timeout(UPDATE_CHECK_TIMEOUT, updater.check()).await {
        Ok(result) => result.map_err(|error| UpdateError::Check(error.to_string())),
        Err(_) => Err(UpdateError::Timeout(UPDATE_CHECK_TIMEOUT)),
    }
}

async fn ask_to_download<R: Runtime>(
    app_handle: &AppHandle<R>,
    i18n: &ShellI18n,
    version: &str,
) -> bool {
    let message = format!(
        "{}\n\n{}",
        i18n.t_with("dialog.update.newVersion", &[("version", version)]),
        i18n.t("dialog.update.downloadQuestion")
    );
    ask(
        app_handle,
        i18n.t("dialog.update.available"),
        message,
        i18n.t("dialog.update.download"),
        i18n.t("dialog.update.later"),
    )
    .await
}

async fn download_with_progress<R: Runtime>(
    app_handle: &AppHandle<R>,
    update: &Update,
) -> Result<Vec<u8>, UpdateError> {
    let mut tracker = ProgressTracker::new(UPDATE_PROGRESS_INTERVAL, Instant::now());
    let bytes = update
        .download(
            |chunk_length, content_length| {
                let now = Instant::now();
                if let Some(progress) = tracker.record(chunk_length, content_length, now) {
                    desktop_bridge::emit_to_page(app_handle, EVENT_UPDATE_PROGRESS, progress);
                }
            },
            || {},
        )
        .await
        .map_err(|error| UpdateError::Download(error.to_string()))?;

    desktop_bridge::emit_to_page(
        app_handle,
        EVENT_UPDATE_PROGRESS,
        tracker.finish(Instant::now()),
    );
    Ok(bytes)
}

async fn ask<R: Runtime>(
    app_handle: &AppHandle<R>,
    title: String,
    message: String,
    confirm_label: String,
    cancel_label: String,
) -> bool {
    let (sender, receiver) = oneshot::channel();
    app_handle
        .dialog()
        .message(message)
        .title(title)
        .kind(MessageDialogKind::Info)
        .buttons(MessageDialogButtons::OkCancelCustom(confirm_label, cancel_label))
        .show(move |confirmed| {
            let _ = sender.send(confirmed);
        });
    receiver.await.unwrap_or(false)
}

async fn inform<R: Runtime>(
    app_handle: &AppHandle<R>,
    title: String,
    message: String,
    kind: MessageDialogKind,
) {
    let (sender, receiver) = oneshot::channel();
    app_handle
        .dialog()
        .message(message)
        .title(title)
        .kind(kind)
        .buttons(MessageDialogButtons::Ok)
        .show(move |_| {
            let _ = sender.send(());
        });
    let _ = receiver.await;
}
