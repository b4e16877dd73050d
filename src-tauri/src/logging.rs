use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::OnceLock,
};

static DESKTOP_LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

pub fn init_console_logger() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info,ai_chat_tray=debug"),
    )
    .try_init();
}

pub fn resolve_desktop_log_path(log_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    log_dir
        .unwrap_or_else(std::env::temp_dir)
        .join(file_name)
}

pub fn init_file_log(path: PathBuf) {
    if let Some(parent) = path.parent() {
        if let Err(error) = fs::create_dir_all(parent) {
            log::warn!(
                "failed to create desktop log directory {}: {}",
                parent.display(),
                error
            );
            return;
        }
    }
    let _ = DESKTOP_LOG_PATH.set(path);
}

fn format_log_line(category: &str, message: &str) -> String {
    format!(
        "[{}] [{}] {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        category,
        message
    )
}

fn append_line(path: &Path, line: &str) {
    let result = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut file| file.write_all(line.as_bytes()));
    if let Err(error) = result {
        log::warn!("failed to append desktop log {}: {}", path.display(), error);
    }
}

fn append_log(category: &'static str, message: &str) {
    log::info!(target: category, "{message}");
    if let Some(path) = DESKTOP_LOG_PATH.get() {
        append_line(path, &format_log_line(category, message));
    }
}

pub fn append_desktop_log(message: &str) {
    append_log("desktop", message);
}

pub fn append_startup_log(message: &str) {
    append_log("startup", message);
}

pub fn append_update_log(message: &str) {
    append_log("update", message);
}

pub fn append_shutdown_log(message: &str) {
    append_log("shutdown", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_log_line_includes_category_and_message() {
        let line = format_log_line("startup", "tray created");
        assert!(line.ends_with("[startup] tray created\n"));
        assert!(line.starts_with('['));
    }

    #[test]
    fn append_line_creates_and_appends_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("desktop.log");

        append_line(&path, "first\n");
        append_line(&path, "second\n");

        let content = fs::read_to_string(&path).expect("read log");
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn resolve_desktop_log_path_joins_file_name() {
        let path = resolve_desktop_log_path(Some(PathBuf::from("/var/log/ai")), "desktop.log");
        assert_eq!(path, PathBuf::from("/var/log/ai/desktop.log"));
    }
}
