//! Declarative menu descriptions. Nothing here touches the host runtime;
//! `menu_render` turns these entries into native menus.

use crate::{shell_locale::ShellI18n, tray_actions::MenuAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Normal,
    Checkbox,
    Radio,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeRole {
    About,
    Services,
    Hide,
    HideOthers,
    ShowAll,
    Quit,
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuLeaf {
    pub label: String,
    pub kind: ItemKind,
    pub checked: bool,
    pub action: MenuAction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuEntry {
    Separator,
    Item(MenuLeaf),
    Submenu {
        label: String,
        entries: Vec<MenuEntry>,
    },
    Native {
        role: NativeRole,
        label: Option<String>,
    },
}

impl MenuEntry {
    fn normal(label: String, action: MenuAction) -> Self {
        MenuEntry::Item(MenuLeaf {
            label,
            kind: ItemKind::Normal,
            checked: false,
            action,
        })
    }

    fn checkbox(label: String, checked: bool, action: MenuAction) -> Self {
        MenuEntry::Item(MenuLeaf {
            label,
            kind: ItemKind::Checkbox,
            checked,
            action,
        })
    }

    fn native(role: NativeRole) -> Self {
        MenuEntry::Native { role, label: None }
    }

    fn native_labeled(role: NativeRole, label: String) -> Self {
        MenuEntry::Native {
            role,
            label: Some(label),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuPlatform {
    MacOs,
    Other,
}

impl MenuPlatform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            MenuPlatform::MacOs
        } else {
            MenuPlatform::Other
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrayToggles {
    pub always_on_top: bool,
    pub animations_enabled: bool,
    pub open_at_startup: bool,
}

pub fn tray_menu(
    toggles: TrayToggles,
    i18n: &ShellI18n,
    languages: &[&'static str],
    platform: MenuPlatform,
) -> Vec<MenuEntry> {
    let mut entries = vec![
        MenuEntry::normal(i18n.t("tray.open"), MenuAction::OpenWindow),
        MenuEntry::normal(i18n.t("tray.checkUpdates"), MenuAction::CheckUpdates),
        MenuEntry::checkbox(
            i18n.t("tray.alwaysOnTop"),
            toggles.always_on_top,
            MenuAction::ToggleAlwaysOnTop,
        ),
        MenuEntry::checkbox(
            i18n.t("tray.animations"),
            toggles.animations_enabled,
            MenuAction::ToggleAnimations,
        ),
        MenuEntry::checkbox(
            i18n.t("tray.launchAtStartup"),
            toggles.open_at_startup,
            MenuAction::ToggleStartup,
        ),
        MenuEntry::normal(i18n.t("tray.resetWindow"), MenuAction::ResetWindow),
    ];

    if platform == MenuPlatform::MacOs {
        entries.push(MenuEntry::Separator);
        entries.push(MenuEntry::native_labeled(
            NativeRole::Services,
            i18n.t("tray.services"),
        ));
    }

    if languages.len() > 1 {
        let current = i18n.language();
        let language_items = languages
            .iter()
            .map(|language| {
                MenuEntry::Item(MenuLeaf {
                    label: language.to_uppercase(),
                    kind: ItemKind::Radio,
                    checked: *language == current,
                    action: MenuAction::SetLanguage(language),
                })
            })
            .collect();
        entries.push(MenuEntry::Submenu {
            label: i18n.t("tray.language"),
            entries: language_items,
        });
    }

    entries.push(MenuEntry::Separator);
    entries.push(MenuEntry::normal(i18n.t("tray.quit"), MenuAction::Quit));
    entries
}

pub fn window_context_menu(i18n: &ShellI18n) -> Vec<MenuEntry> {
    vec![
        MenuEntry::native_labeled(NativeRole::Copy, i18n.t("context.copy")),
        MenuEntry::native_labeled(NativeRole::Paste, i18n.t("context.paste")),
        MenuEntry::Separator,
        MenuEntry::native_labeled(NativeRole::SelectAll, i18n.t("context.selectAll")),
    ]
}

pub fn image_context_menu(i18n: &ShellI18n) -> Vec<MenuEntry> {
    vec![
        MenuEntry::normal(i18n.t("context.downloadImage"), MenuAction::DownloadImage),
        MenuEntry::Separator,
        MenuEntry::normal(i18n.t("context.copyImageUrl"), MenuAction::CopyImageUrl),
    ]
}

// Application menu bar. Only macOS shows one; elsewhere it is empty.
pub fn application_menu(app_name: &str, i18n: &ShellI18n, platform: MenuPlatform) -> Vec<MenuEntry> {
    if platform != MenuPlatform::MacOs {
        return Vec::new();
    }

    vec![
        MenuEntry::Submenu {
            label: app_name.to_string(),
            entries: vec![
                MenuEntry::native(NativeRole::About),
                MenuEntry::Separator,
                MenuEntry::native(NativeRole::Services),
                MenuEntry::Separator,
                MenuEntry::native(NativeRole::Hide),
                MenuEntry::native(NativeRole::HideOthers),
                MenuEntry::native(NativeRole::ShowAll),
                MenuEntry::Separator,
                MenuEntry::native(NativeRole::Quit),
            ],
        },
        MenuEntry::Submenu {
            label: i18n.t("menu.edit"),
            entries: vec![
                MenuEntry::native(NativeRole::Undo),
                MenuEntry::native(NativeRole::Redo),
                MenuEntry::Separator,
                MenuEntry::native(NativeRole::Cut),
                MenuEntry::native(NativeRole::Copy),
                MenuEntry::native(NativeRole::Paste),
                MenuEntry::native(NativeRole::SelectAll),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound_actions(entries: &[MenuEntry]) -> Vec<MenuAction> {
        let mut actions = Vec::new();
        collect_actions(entries, &mut actions);
        actions
    }

    fn collect_actions(entries: &[MenuEntry], actions: &mut Vec<MenuAction>) {
        for entry in entries {
            match entry {
                MenuEntry::Item(leaf) => actions.push(leaf.action),
                MenuEntry::Submenu { entries, .. } => collect_actions(entries, actions),
                MenuEntry::Separator | MenuEntry::Native { .. } => {}
            }
        }
    }

    const TOGGLES: TrayToggles = TrayToggles {
        always_on_top: true,
        animations_enabled: false,
        open_at_startup: true,
    };

    fn leaf(entries: &[MenuEntry], action: MenuAction) -> Option<&MenuLeaf> {
        entries.iter().find_map(|entry| match entry {
            MenuEntry::Item(leaf) if leaf.action == action => Some(leaf),
            _ => None,
        })
    }

    #[test]
    fn tray_menu_reflects_toggle_states() {
        let i18n = ShellI18n::new("en");
        let entries = tray_menu(TOGGLES, &i18n, &["en", "fr"], MenuPlatform::Other);

        let on_top = leaf(&entries, MenuAction::ToggleAlwaysOnTop).expect("always on top item");
        assert_eq!(on_top.kind, ItemKind::Checkbox);
        assert!(on_top.checked);
        assert_eq!(on_top.label, "Always on Top");

        let animations = leaf(&entries, MenuAction::ToggleAnimations).expect("animations item");
        assert!(!animations.checked);

        assert_eq!(
            entries.last(),
            Some(&MenuEntry::Item(MenuLeaf {
                label: "Quit".to_string(),
                kind: ItemKind::Normal,
                checked: false,
                action: MenuAction::Quit,
            }))
        );
    }

    #[test]
    fn tray_menu_language_submenu_checks_current_language() {
        let i18n = ShellI18n::new("fr");
        let entries = tray_menu(TOGGLES, &i18n, &["en", "fr"], MenuPlatform::Other);

        let submenu = entries
            .iter()
            .find_map(|entry| match entry {
                MenuEntry::Submenu { label, entries } => Some((label, entries)),
                _ => None,
            })
            .expect("language submenu");
        assert_eq!(submenu.0, "Language");

        let radios: Vec<(&str, bool)> = submenu
            .1
            .iter()
            .filter_map(|entry| match entry {
                MenuEntry::Item(leaf) if leaf.kind == ItemKind::Radio => {
                    Some((leaf.label.as_str(), leaf.checked))
                }
                _ => None,
            })
            .collect();
        assert_eq!(radios, vec![("EN", false), ("FR", true)]);
    }

    #[test]
    fn tray_menu_omits_language_submenu_for_single_language() {
        let i18n = ShellI18n::new("en");
        let entries = tray_menu(TOGGLES, &i18n, &["en"], MenuPlatform::Other);
        assert!(!entries
            .iter()
            .any(|entry| matches!(entry, MenuEntry::Submenu { .. })));
    }

    #[test]
    fn bound_actions_include_nested_language_items() {
        let i18n = ShellI18n::new("en");
        let entries = tray_menu(TOGGLES, &i18n, &["en", "fr"], MenuPlatform::Other);
        let actions = bound_actions(&entries);

        assert!(actions.contains(&MenuAction::SetLanguage("en")));
        assert!(actions.contains(&MenuAction::SetLanguage("fr")));
        assert!(actions.contains(&MenuAction::ResetWindow));
        assert_eq!(actions.len(), 9);
    }

    #[test]
    fn macos_tray_menu_adds_services_after_reset_window() {
        let i18n = ShellI18n::new("en");
        let entries = tray_menu(TOGGLES, &i18n, &["en", "fr"], MenuPlatform::MacOs);

        let reset_index = entries
            .iter()
            .position(|entry| matches!(entry, MenuEntry::Item(leaf) if leaf.action == MenuAction::ResetWindow))
            .expect("reset item");
        assert_eq!(entries[reset_index + 1], MenuEntry::Separator);
        assert_eq!(
            entries[reset_index + 2],
            MenuEntry::Native {
                role: NativeRole::Services,
                label: Some("Services".to_string()),
            }
        );
    }

    #[test]
    fn image_context_menu_offers_download_and_copy() {
        let i18n = ShellI18n::new("fr");
        let entries = image_context_menu(&i18n);
        assert_eq!(
            bound_actions(&entries),
            vec![MenuAction::DownloadImage, MenuAction::CopyImageUrl]
        );
        assert_eq!(
            leaf(&entries, MenuAction::DownloadImage).map(|leaf| leaf.label.as_str()),
            Some("Télécharger l'image")
        );
    }

    #[test]
    fn window_context_menu_uses_native_edit_roles() {
        let i18n = ShellI18n::new("en");
        let roles: Vec<NativeRole> = window_context_menu(&i18n)
            .into_iter()
            .filter_map(|entry| match entry {
                MenuEntry::Native { role, .. } => Some(role),
                _ => None,
            })
            .collect();
        assert_eq!(
            roles,
            vec![NativeRole::Copy, NativeRole::Paste, NativeRole::SelectAll]
        );
    }

    #[test]
    fn application_menu_is_macos_only() {
        let i18n = ShellI18n::new("en");
        assert!(application_menu("AI", &i18n, MenuPlatform::Other).is_empty());

        let entries = application_menu("AI", &i18n, MenuPlatform::MacOs);
        let labels: Vec<&str> = entries
            .iter()
            .filter_map(|entry| match entry {
                MenuEntry::Submenu { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["AI", "Edit"]);
    }
}
