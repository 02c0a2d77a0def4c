use bevy::prelude::*;

/// Which moment of a press gesture a pointer query is interested in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase {
    JustPressed,
    Held,
    JustReleased,
}

/// Screen position (logical window pixels, origin top-left) of the mouse or
/// the first touch in the requested phase.
pub fn pointer_screen_position(
    phase: PointerPhase,
    button_input: &ButtonInput<MouseButton>,
    touch_input: &Touches,
    windows: &Query<&Window>,
) -> Option<Vec2> {
    let mouse_in_phase = match phase {
        PointerPhase::JustPressed => button_input.just_pressed(MouseButton::Left),
        PointerPhase::Held => button_input.pressed(MouseButton::Left),
        PointerPhase::JustReleased => button_input.just_released(MouseButton::Left),
    };
    if mouse_in_phase {
        return windows.get_single().ok()?.cursor_position();
    }

    let touch = match phase {
        PointerPhase::JustPressed => touch_input.iter_just_pressed().next(),
        PointerPhase::Held => touch_input.iter().next(),
        PointerPhase::JustReleased => touch_input.iter_just_released().next(),
    }?;
    Some(touch.position())
}

pub fn just_pressed_screen_position(
    button_input: &ButtonInput<MouseButton>,
    touch_input: &Touches,
    windows: &Query<&Window>,
) -> Option<Vec2> {
    pointer_screen_position(PointerPhase::JustPressed, button_input, touch_input, windows)
}

pub fn pressed_screen_position(
    button_input: &ButtonInput<MouseButton>,
    touch_input: &Touches,
    windows: &Query<&Window>,
) -> Option<Vec2> {
    pointer_screen_position(PointerPhase::Held, button_input, touch_input, windows)
}

pub fn just_released_screen_position(
    button_input: &ButtonInput<MouseButton>,
    touch_input: &Touches,
    windows: &Query<&Window>,
) -> Option<Vec2> {
    pointer_screen_position(PointerPhase::JustReleased, button_input, touch_input, windows)
}

/// Converts a window position into 2D world space through the first camera.
pub fn screen_to_world(
    position: Vec2,
    camera: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    let (camera, camera_transform) = camera.get_single().ok()?;
    camera.viewport_to_world_2d(camera_transform, position).ok()
}

/// Converts a 2D world position into window space through the first camera.
pub fn world_to_screen(
    position: Vec2,
    camera: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    let (camera, camera_transform) = camera.get_single().ok()?;
    camera
        .world_to_viewport(camera_transform, position.extend(0.0))
        .ok()
}
