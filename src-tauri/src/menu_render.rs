use tauri::{
    menu::{CheckMenuItem, IsMenuItem, Menu, MenuItem, PredefinedMenuItem, Submenu},
    Manager, Runtime,
};

use crate::menu_template::{ItemKind, MenuEntry, MenuLeaf, NativeRole};

type RenderedItem<R> = Box<dyn IsMenuItem<R>>;

pub fn build_menu<R, M>(manager: &M, entries: &[MenuEntry]) -> Result<Menu<R>, String>
where
    R: Runtime,
    M: Manager<R>,
{
    let items = render_entries(manager, entries)?;
    let item_refs: Vec<&dyn IsMenuItem<R>> = items.iter().map(Box::as_ref).collect();
    Menu::with_items(manager, &item_refs).map_err(|error| format!("Failed to build menu: {error}"))
}

fn render_entries<R, M>(manager: &M, entries: &[MenuEntry]) -> Result<Vec<RenderedItem<R>>, String>
where
    R: Runtime,
    M: Manager<R>,
{
    entries
        .iter()
        .map(|entry| render_entry(manager, entry))
        .collect()
}

fn render_entry<R, M>(manager: &M, entry: &MenuEntry) -> Result<RenderedItem<R>, String>
where
    R: Runtime,
    M: Manager<R>,
{
    match entry {
        MenuEntry::Separator => PredefinedMenuItem::separator(manager)
            .map(|item| Box::new(item) as RenderedItem<R>)
            .map_err(|error| format!("Failed to create menu separator: {error}")),
        MenuEntry::Item(leaf) => render_leaf(manager, leaf),
        MenuEntry::Submenu { label, entries } => {
            let children = render_entries(manager, entries)?;
            let child_refs: Vec<&dyn IsMenuItem<R>> = children.iter().map(Box::as_ref).collect();
            Submenu::with_items(manager, label, true, &child_refs)
                .map(|submenu| Box::new(submenu) as RenderedItem<R>)
                .map_err(|error| format!("Failed to create submenu '{label}': {error}"))
        }
        MenuEntry::Native { role, label } => render_native(manager, *role, label.as_deref())
            .map(|item| Box::new(item) as RenderedItem<R>)
            .map_err(|error| format!("Failed to create {role:?} menu item: {error}")),
    }
}

// Radio entries render as check items; the template decides which one is checked.
fn render_leaf<R, M>(manager: &M, leaf: &MenuLeaf) -> Result<RenderedItem<R>, String>
where
    R: Runtime,
    M: Manager<R>,
{
    let id = leaf.action.menu_id().into_owned();
    match leaf.kind {
        ItemKind::Normal => MenuItem::with_id(manager, id, &leaf.label, true, None::<&str>)
            .map(|item| Box::new(item) as RenderedItem<R>),
        ItemKind::Checkbox | ItemKind::Radio => {
            CheckMenuItem::with_id(manager, id, &leaf.label, true, leaf.checked, None::<&str>)
                .map(|item| Box::new(item) as RenderedItem<R>)
        }
    }
    .map_err(|error| format!("Failed to create menu item '{}': {error}", leaf.label))
}

fn render_native<R, M>(
    manager: &M,
    role: NativeRole,
    label: Option<&str>,
) -> tauri::Result<PredefinedMenuItem<R>>
where
    R: Runtime,
    M: Manager<R>,
{
    match role {
        NativeRole::About => PredefinedMenuItem::about(manager, label, None),
        NativeRole::Services => PredefinedMenuItem::services(manager, label),
        NativeRole::Hide => PredefinedMenuItem::hide(manager, label),
        NativeRole::HideOthers => PredefinedMenuItem::hide_others(manager, label),
        NativeRole::ShowAll => PredefinedMenuItem::show_all(manager, label),
        NativeRole::Quit => PredefinedMenuItem::quit(manager, label),
        NativeRole::Undo => PredefinedMenuItem::undo(manager, label),
        NativeRole::Redo => PredefinedMenuItem::redo(manager, label),
        NativeRole::Cut => PredefinedMenuItem::cut(manager, label),
        NativeRole::Copy => PredefinedMenuItem::copy(manager, label),
        NativeRole::Paste => PredefinedMenuItem::paste(manager, label),
        NativeRole::SelectAll => PredefinedMenuItem::select_all(manager, label),
    }
}
