#![allow(
    clippy::allow_attributes,
    reason = "allow attributes are needed for wasm"
)]

// wgpu refuses to configure a surface larger than the max texture extent:
// "`Surface` width and height must be within the maximum supported texture size."
const MAX_SURFACE_EXTENT: f32 = 2048.0;

/// Browser inner size clamped to what the render surface accepts.
#[cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "only the wasm resize system uses it")
)]
fn clamp_surface_size(width: f32, height: f32) -> (f32, f32) {
    (width.min(MAX_SURFACE_EXTENT), height.min(MAX_SURFACE_EXTENT))
}

/// Follows the browser's inner size so the canvas keeps filling the page.
#[cfg(target_arch = "wasm32")]
pub fn handle_browser_resize(
    mut primary_query: bevy::ecs::system::Query<
        &mut bevy::window::Window,
        bevy::ecs::query::With<bevy::window::PrimaryWindow>,
    >,
) {
    let Some(wasm_window) = web_sys::window() else {
        return;
    };
    let (Ok(inner_width), Ok(inner_height)) = (wasm_window.inner_width(), wasm_window.inner_height())
    else {
        return;
    };
    let (Some(target_width), Some(target_height)) = (inner_width.as_f64(), inner_height.as_f64())
    else {
        return;
    };
    let (width, height) = clamp_surface_size(target_width as f32, target_height as f32);

    for mut window in &mut primary_query {
        if (window.resolution.width() - width).abs() > f32::EPSILON
            || (window.resolution.height() - height).abs() > f32::EPSILON
        {
            window.resolution.set(width, height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversized_browser_is_clamped() {
        assert_eq!(clamp_surface_size(1284.0, 2418.0), (1284.0, 2048.0), "height not clamped");
        assert_eq!(clamp_surface_size(360.0, 640.0), (360.0, 640.0), "small size changed");
    }
}
