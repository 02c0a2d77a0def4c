use bevy::prelude::*;
use bits_helpers::input::{
    just_pressed_screen_position, just_released_screen_position, pressed_screen_position,
    screen_to_world,
};

use crate::cell::{CellId, OccupiedCell};
use crate::registry::DropZoneRegistry;
use crate::resolver::PlacementResolver;
use crate::screen::Token;
use crate::tween::TokenTween;

/// The only data a drag carries: a short tag naming the dragged item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragPayload {
    tag: String,
}

impl DragPayload {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

/// Marks an entity that starts a drag carrying `payload` when pressed.
#[derive(Component, Clone, Debug)]
pub struct DragSource {
    pub payload: DragPayload,
}

/// Drag controller of one cell: accepts drops of a single recognized tag.
#[derive(Component, Clone, Debug)]
pub struct DropZone {
    cell: CellId,
    accepted_tag: String,
}

impl DropZone {
    pub fn new(cell: CellId, accepted_tag: impl Into<String>) -> Self {
        Self {
            cell,
            accepted_tag: accepted_tag.into(),
        }
    }

    pub const fn cell(&self) -> CellId {
        self.cell
    }

    /// Moves the token here if the payload is the recognized one.
    ///
    /// Returns whether the drop was consumed; a foreign tag leaves `occupied`
    /// untouched.
    pub fn accept(&self, payload: &DragPayload, occupied: &mut OccupiedCell) -> bool {
        if payload.tag() != self.accepted_tag {
            return false;
        }
        occupied.set(self.cell);
        true
    }
}

/// Hover feedback of a zone while a drag is in progress.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZoneHover {
    #[default]
    Idle,
    Candidate,
}

#[derive(Clone, Debug)]
struct ActiveDrag {
    payload: DragPayload,
    pointer: Vec2,
}

/// The drag gesture in progress, if any. Pointer positions are window space.
#[derive(Resource, Default, Debug)]
pub struct DragSession {
    active: Option<ActiveDrag>,
}

impl DragSession {
    pub fn begin(&mut self, payload: DragPayload, pointer: Vec2) {
        self.active = Some(ActiveDrag { payload, pointer });
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.active.as_ref().map(|drag| drag.pointer)
    }

    fn move_to(&mut self, pointer: Vec2) {
        if let Some(drag) = self.active.as_mut() {
            drag.pointer = pointer;
        }
    }

    fn end(&mut self) -> Option<DragPayload> {
        self.active.take().map(|drag| drag.payload)
    }
}

/// A drag released over a zone.
#[derive(Event, Clone, Debug)]
pub struct ZoneDropped {
    pub cell: CellId,
    pub payload: DragPayload,
}

/// A drag that ended without reaching any zone. Never changes state.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragCancelled {
    OutsideZones,
    Interrupted,
}

pub fn start_token_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    windows: Query<&Window>,
    resolver: Res<PlacementResolver>,
    tokens: Query<(&TokenTween, &DragSource), With<Token>>,
    mut session: ResMut<DragSession>,
) {
    if session.is_active() {
        return;
    }
    let Some(pointer) = just_pressed_screen_position(&buttons, &touch_input, &windows) else {
        return;
    };

    // The token is a circle; presses in the corners of its box miss it.
    let radius = resolver.token_diameter() / 2.0;
    for (tween, source) in &tokens {
        let center = resolver.to_window(tween.position()) + Vec2::splat(radius);
        if pointer.distance(center) <= radius {
            debug!("drag of {:?} started", source.payload.tag());
            session.begin(source.payload.clone(), pointer);
            return;
        }
    }
}

pub fn track_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    windows: Query<&Window>,
    registry: Res<DropZoneRegistry>,
    mut session: ResMut<DragSession>,
    mut zones: Query<(&DropZone, &mut ZoneHover)>,
) {
    if let Some(pointer) = pressed_screen_position(&buttons, &touch_input, &windows) {
        session.move_to(pointer);
    }

    let hovered = session.pointer().and_then(|pointer| registry.zone_at(pointer));
    for (zone, mut hover) in &mut zones {
        let next = if hovered == Some(zone.cell()) {
            ZoneHover::Candidate
        } else {
            ZoneHover::Idle
        };
        if *hover != next {
            *hover = next;
        }
    }
}

pub fn finish_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    keys: Res<ButtonInput<KeyCode>>,
    windows: Query<&Window>,
    registry: Res<DropZoneRegistry>,
    mut session: ResMut<DragSession>,
    mut dropped: EventWriter<ZoneDropped>,
    mut cancelled: EventWriter<DragCancelled>,
) {
    if !session.is_active() {
        return;
    }

    if keys.just_pressed(KeyCode::Escape) || touch_input.any_just_canceled() {
        session.end();
        cancelled.send(DragCancelled::Interrupted);
        return;
    }

    if let Some(pointer) = just_released_screen_position(&buttons, &touch_input, &windows) {
        let Some(payload) = session.end() else {
            return;
        };
        match registry.zone_at(pointer) {
            Some(cell) => {
                dropped.send(ZoneDropped { cell, payload });
            }
            None => {
                cancelled.send(DragCancelled::OutsideZones);
            }
        }
        return;
    }

    // Released somewhere we could not locate (cursor left the window).
    if !buttons.pressed(MouseButton::Left) && touch_input.iter().next().is_none() {
        session.end();
        cancelled.send(DragCancelled::Interrupted);
    }
}

/// Delivers each drop to the controller of the zone it landed on.
pub fn handle_zone_drops(
    mut drops: EventReader<ZoneDropped>,
    zones: Query<&DropZone>,
    mut occupied: ResMut<OccupiedCell>,
) {
    for drop in drops.read() {
        let Some(zone) = zones.iter().find(|zone| zone.cell() == drop.cell) else {
            continue;
        };
        if zone.accept(&drop.payload, occupied.bypass_change_detection()) {
            occupied.set_changed();
            info!("token placed on cell {}", zone.cell());
        } else {
            debug!(
                "cell {} ignored a drop tagged {:?}",
                zone.cell(),
                drop.payload.tag()
            );
        }
    }
}

pub fn log_cancelled_drags(mut cancelled: EventReader<DragCancelled>) {
    for cancel in cancelled.read() {
        debug!("drag cancelled: {cancel:?}");
    }
}

/// Translucent copy of the token following the pointer during a drag.
#[derive(Component)]
pub struct DragGhost;

pub fn update_drag_ghost(
    session: Res<DragSession>,
    camera: Query<(&Camera, &GlobalTransform)>,
    mut ghosts: Query<(&mut Transform, &mut Visibility), With<DragGhost>>,
) {
    let world = session
        .pointer()
        .and_then(|pointer| screen_to_world(pointer, &camera));
    for (mut transform, mut visibility) in &mut ghosts {
        match world {
            Some(position) => {
                transform.translation.x = position.x;
                transform.translation.y = position.y;
                *visibility = Visibility::Visible;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}
