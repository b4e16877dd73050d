use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use reqwest::{header::LOCATION, redirect::Policy, Response, StatusCode};
use tauri::{AppHandle, Manager, Runtime};
use tauri_plugin_dialog::DialogExt;
use tokio::{fs, io::AsyncWriteExt};
use url::Url;

use crate::{
    append_desktop_log, desktop_bridge, DownloadCompletePayload, ShellState,
    EVENT_DOWNLOAD_COMPLETE, IMAGE_DOWNLOAD_TIMEOUT, IMAGE_FALLBACK_FILE_NAME,
    IMAGE_FILE_EXTENSIONS, IMAGE_MAX_REDIRECTS,
};

#[derive(Debug, thiserror::Error)]
pub(crate) enum DownloadError {
    #[error("invalid image url: {0}")]
    InvalidUrl(String),
    #[error("unsupported url scheme '{0}', only http/https are allowed")]
    UnsupportedScheme(String),
    #[error("too many redirects (limit {0})")]
    TooManyRedirects(usize),
    #[error("redirect response without a usable Location header")]
    MissingLocation,
    #[error("server responded with HTTP {0}")]
    HttpStatus(u16),
    #[error("download timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn parse_image_url(raw: &str) -> Result<Url, DownloadError> {
    let parsed =
        Url::parse(raw.trim()).map_err(|error| DownloadError::InvalidUrl(error.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(DownloadError::UnsupportedScheme(scheme.to_string())),
    }
}

fn redirect_target(current: &Url, response: &Response) -> Result<Url, DownloadError> {
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.trim().is_empty())
        .ok_or(DownloadError::MissingLocation)?;
    let target = current
        .join(location.trim())
        .map_err(|error| DownloadError::InvalidUrl(error.to_string()))?;
    parse_image_url(target.as_str())
}

pub(crate) fn suggested_file_name(raw_url: &str) -> String {
    Url::parse(raw_url)
        .ok()
        .and_then(|url| {
            url.path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| IMAGE_FALLBACK_FILE_NAME.to_string())
}

// GET with manual 301/302 handling, a hop limit and an overall deadline.
pub(crate) struct ImageDownloader {
    client: reqwest::Client,
    max_redirects: usize,
    deadline: Duration,
}

impl ImageDownloader {
    pub(crate) fn new(deadline: Duration, max_redirects: usize) -> Result<Self, DownloadError> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()?;
        Ok(Self {
            client,
            max_redirects,
            deadline,
        })
    }

    // Streams the image to `destination`. The file is only created for the final
    // response and is removed again if anything fails afterwards.
    pub(crate) async fn download(
        &self,
        url: &str,
        destination: &Path,
    ) -> Result<u64, DownloadError> {
        let mut created = false;
        let result = match tokio::time::timeout(
            self.deadline,
            self.fetch_to_file(url, destination, &mut created),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(DownloadError::Timeout(self.deadline)),
        };

        if result.is_err() && created {
            if let Err(error) = fs::remove_file(destination).await {
                append_desktop_log(&format!(
                    "failed to remove partial download {}: {}",
                    destination.display(),
                    error
                ));
            }
        }
        result
    }

    async fn fetch_to_file(
        &self,
        url: &str,
        destination: &Path,
        created: &mut bool,
    ) -> Result<u64, DownloadError> {
        let mut current = parse_image_url(url)?;
        let mut redirects = 0;

        let mut response = loop {
            let response = self.client.get(current.clone()).send().await?;
            match response.status() {
                StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND => {
                    if redirects >= self.max_redirects {
                        return Err(DownloadError::TooManyRedirects(self.max_redirects));
                    }
                    redirects += 1;
                    current = redirect_target(&current, &response)?;
                    append_desktop_log(&format!("image download redirected to {current}"));
                }
                status if status.is_success() => break response,
                status => return Err(DownloadError::HttpStatus(status.as_u16())),
            }
        };

        let io_error = |source: io::Error| DownloadError::Io {
            path: destination.to_path_buf(),
            source,
        };
        let mut file = fs::File::create(destination).await.map_err(io_error)?;
        *created = true;

        let mut written = 0_u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await.map_err(io_error)?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(io_error)?;
        Ok(written)
    }
}

async fn download_and_notify<R: Runtime>(
    app_handle: AppHandle<R>,
    url: String,
    destination: PathBuf,
) {
    let result = match ImageDownloader::new(IMAGE_DOWNLOAD_TIMEOUT, IMAGE_MAX_REDIRECTS) {
        Ok(downloader) => downloader.download(&url, &destination).await,
        Err(error) => Err(error),
    };

    let payload = match result {
        Ok(bytes) => {
            append_desktop_log(&format!(
                "image saved: {} ({} bytes)",
                destination.display(),
                bytes
            ));
            DownloadCompletePayload::saved(destination.display().to_string())
        }
        Err(error) => {
            append_desktop_log(&format!("image download failed for {url}: {error}"));
            DownloadCompletePayload::failed(error.to_string())
        }
    };
    desktop_bridge::emit_to_page(&app_handle, EVENT_DOWNLOAD_COMPLETE, payload);
}

// Asks where to save the image, then downloads it in the background.
pub(crate) fn spawn_save_image<R: Runtime>(app_handle: AppHandle<R>, url: String) {
    let Some(state) = app_handle.try_state::<ShellState>() else {
        return;
    };

    let mut dialog = app_handle
        .dialog()
        .file()
        .set_title(state.i18n.t("dialog.save.title"))
        .set_file_name(suggested_file_name(&url))
        .add_filter(state.i18n.t("dialog.save.images"), IMAGE_FILE_EXTENSIONS)
        .add_filter(state.i18n.t("dialog.save.allFiles"), &["*"]);
    if let Ok(download_dir) = app_handle.path().download_dir() {
        dialog = dialog.set_directory(download_dir);
    }

    let task_handle = app_handle.clone();
    dialog.save_file(move |file_path| {
        let Some(file_path) = file_path else {
            append_desktop_log("image save cancelled");
            return;
        };
        let destination = match file_path.into_path() {
            Ok(path) => path,
            Err(error) => {
                append_desktop_log(&format!("unusable save path for image: {error}"));
                return;
            }
        };
        tauri::async_runtime::spawn(download_and_notify(task_handle, url, destination));
    });
}
