use std::borrow::Cow;

use crate::shell_locale;

pub const MENU_OPEN_WINDOW: &str = "open-window";
pub const MENU_CHECK_UPDATES: &str = "check-updates";
pub const MENU_TOGGLE_ALWAYS_ON_TOP: &str = "toggle-always-on-top";
pub const MENU_TOGGLE_ANIMATIONS: &str = "toggle-animations";
pub const MENU_TOGGLE_STARTUP: &str = "toggle-startup";
pub const MENU_RESET_WINDOW: &str = "reset-window";
pub const MENU_SET_LANGUAGE_PREFIX: &str = "set-language-";
pub const MENU_QUIT: &str = "quit-app";
pub const MENU_DOWNLOAD_IMAGE: &str = "download-image";
pub const MENU_COPY_IMAGE_URL: &str = "copy-image-url";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    OpenWindow,
    CheckUpdates,
    ToggleAlwaysOnTop,
    ToggleAnimations,
    ToggleStartup,
    ResetWindow,
    SetLanguage(&'static str),
    Quit,
    DownloadImage,
    CopyImageUrl,
}

impl MenuAction {
    pub fn menu_id(&self) -> Cow<'static, str> {
        match self {
            MenuAction::OpenWindow => Cow::Borrowed(MENU_OPEN_WINDOW),
            MenuAction::CheckUpdates => Cow::Borrowed(MENU_CHECK_UPDATES),
            MenuAction::ToggleAlwaysOnTop => Cow::Borrowed(MENU_TOGGLE_ALWAYS_ON_TOP),
            MenuAction::ToggleAnimations => Cow::Borrowed(MENU_TOGGLE_ANIMATIONS),
            MenuAction::ToggleStartup => Cow::Borrowed(MENU_TOGGLE_STARTUP),
            MenuAction::ResetWindow => Cow::Borrowed(MENU_RESET_WINDOW),
            MenuAction::SetLanguage(language) => {
                Cow::Owned(format!("{MENU_SET_LANGUAGE_PREFIX}{language}"))
            }
            MenuAction::Quit => Cow::Borrowed(MENU_QUIT),
            MenuAction::DownloadImage => Cow::Borrowed(MENU_DOWNLOAD_IMAGE),
            MenuAction::CopyImageUrl => Cow::Borrowed(MENU_COPY_IMAGE_URL),
        }
    }
}

pub fn action_from_menu_id(menu_id: &str) -> Option<MenuAction> {
    match menu_id {
        MENU_OPEN_WINDOW => Some(MenuAction::OpenWindow),
        MENU_CHECK_UPDATES => Some(MenuAction::CheckUpdates),
        MENU_TOGGLE_ALWAYS_ON_TOP => Some(MenuAction::ToggleAlwaysOnTop),
        MENU_TOGGLE_ANIMATIONS => Some(MenuAction::ToggleAnimations),
        MENU_TOGGLE_STARTUP => Some(MenuAction::ToggleStartup),
        MENU_RESET_WINDOW => Some(MenuAction::ResetWindow),
        MENU_QUIT => Some(MenuAction::Quit),
        MENU_DOWNLOAD_IMAGE => Some(MenuAction::DownloadImage),
        MENU_COPY_IMAGE_URL => Some(MenuAction::CopyImageUrl),
        other => {
            let language = other.strip_prefix(MENU_SET_LANGUAGE_PREFIX)?;
            shell_locale::available_languages()
                .into_iter()
                .find(|code| *code == language)
                .map(MenuAction::SetLanguage)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_from_menu_id_maps_all_known_actions() {
        for action in [
            MenuAction::OpenWindow,
            MenuAction::CheckUpdates,
            MenuAction::ToggleAlwaysOnTop,
            MenuAction::ToggleAnimations,
            MenuAction::ToggleStartup,
            MenuAction::ResetWindow,
            MenuAction::SetLanguage("fr"),
            MenuAction::Quit,
            MenuAction::DownloadImage,
            MenuAction::CopyImageUrl,
        ] {
            assert_eq!(action_from_menu_id(&action.menu_id()), Some(action));
        }
    }

    #[test]
    fn language_ids_use_the_set_language_prefix() {
        assert_eq!(MenuAction::SetLanguage("en").menu_id(), "set-language-en");
    }

    #[test]
    fn action_from_menu_id_rejects_unknown_ids_and_languages() {
        assert_eq!(action_from_menu_id("unknown-menu"), None);
        assert_eq!(action_from_menu_id("set-language-de"), None);
        assert_eq!(action_from_menu_id("set-language-"), None);
    }
}
