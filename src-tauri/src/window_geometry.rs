use crate::{
    append_desktop_log,
    settings_store::{ShellSettings, WindowPosition, WindowSize},
    WINDOW_SCREEN_MARGIN,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkArea {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    pub position: WindowPosition,
    pub size: WindowSize,
}

pub fn effective_size(stored: WindowSize, default_size: WindowSize) -> WindowSize {
    WindowSize {
        width: if stored.width > 0 {
            stored.width
        } else {
            default_size.width
        },
        height: if stored.height > 0 {
            stored.height
        } else {
            default_size.height
        },
    }
}

// `0` or negative coordinates mean the position was never recorded.
pub fn is_recorded_position(position: WindowPosition) -> bool {
    position.x > 0 && position.y > 0
}

pub fn bottom_right_position(area: WorkArea, size: WindowSize) -> WindowPosition {
    let right = i64::from(area.x) + i64::from(area.width);
    let bottom = i64::from(area.y) + i64::from(area.height);
    WindowPosition {
        x: clamp_to_i32(right - i64::from(size.width) - i64::from(WINDOW_SCREEN_MARGIN)),
        y: clamp_to_i32(bottom - i64::from(size.height) - i64::from(WINDOW_SCREEN_MARGIN)),
    }
}

fn clamp_to_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

// Computes the main window geometry. When no usable position is stored the
// bottom-right default is written back so later launches reuse it.
pub fn resolve_window_geometry(
    settings: &ShellSettings,
    area: WorkArea,
    default_size: WindowSize,
) -> WindowGeometry {
    let size = effective_size(settings.window_size(), default_size);
    let stored_position = settings.window_position();

    if is_recorded_position(stored_position) {
        append_desktop_log(&format!(
            "using saved window position: x={} y={}",
            stored_position.x, stored_position.y
        ));
        return WindowGeometry {
            position: stored_position,
            size,
        };
    }

    let position = bottom_right_position(area, size);
    append_desktop_log(&format!(
        "computed bottom-right window position: x={} y={}",
        position.x, position.y
    ));
    if let Err(error) = settings.set_window_position(position) {
        append_desktop_log(&format!("failed to persist default window position: {error}"));
    }

    WindowGeometry { position, size }
}
