use bevy::prelude::*;
use bevy::utils::HashMap;
use bits_helpers::input::world_to_screen;

use crate::cell::CellId;
use crate::drag::DropZone;

/// Last known window-space bounds of every mounted drop zone.
///
/// Entries are only ever inserted or replaced. A zone that has not been laid
/// out yet simply has no entry.
#[derive(Resource, Default, Debug)]
pub struct DropZoneRegistry {
    bounds: HashMap<CellId, Rect>,
}

impl DropZoneRegistry {
    /// Records the bounds of `cell`, returning whether anything changed.
    pub fn upsert(&mut self, cell: CellId, rect: Rect) -> bool {
        self.bounds.insert(cell, rect) != Some(rect)
    }

    pub fn lookup(&self, cell: CellId) -> Option<Rect> {
        self.bounds.get(&cell).copied()
    }

    /// The zone whose bounds contain `point`, if any. Zones never overlap.
    pub fn zone_at(&self, point: Vec2) -> Option<CellId> {
        self.bounds
            .iter()
            .find(|(_, rect)| rect.contains(point))
            .map(|(cell, _)| *cell)
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

/// Projects every zone's sprite into window space and records it.
///
/// Runs each frame; the registry's change tick only moves when a zone really
/// moved, so the resolver sees layout changes in the same frame.
pub fn register_zone_bounds(
    zones: Query<(&DropZone, &Sprite, &GlobalTransform)>,
    camera: Query<(&Camera, &GlobalTransform)>,
    mut registry: ResMut<DropZoneRegistry>,
) {
    let mut changed = false;
    for (zone, sprite, transform) in &zones {
        let half = sprite.custom_size.unwrap_or(Vec2::ONE) / 2.0;
        let center = transform.translation().truncate();
        // World y points up, window y points down.
        let (Some(top_left), Some(bottom_right)) = (
            world_to_screen(center + Vec2::new(-half.x, half.y), &camera),
            world_to_screen(center + Vec2::new(half.x, -half.y), &camera),
        ) else {
            continue;
        };
        let rect = Rect::from_corners(top_left, bottom_right);
        if registry.bypass_change_detection().upsert(zone.cell(), rect) {
            debug!("zone {} registered at {:?}", zone.cell(), rect);
            changed = true;
        }
    }
    if changed {
        registry.set_changed();
    }
}

#[cfg(test)]
mod tests {
    use bevy::render::camera::{ManualTextureViews, camera_system};
    use bevy::window::{
        PrimaryWindow, WindowCreated, WindowResized, WindowResolution, WindowScaleFactorChanged,
    };

    use super::*;
    use crate::cell::screen_rect;

    #[test]
    fn lookup_returns_latest_upsert() {
        let mut registry = DropZoneRegistry::default();
        let cell = CellId::new(3);
        assert_eq!(registry.lookup(cell), None, "unregistered cell has bounds");

        registry.upsert(cell, screen_rect(0.0, 0.0, 10.0, 10.0));
        registry.upsert(cell, screen_rect(50.0, 60.0, 10.0, 10.0));

        assert_eq!(
            registry.lookup(cell),
            Some(screen_rect(50.0, 60.0, 10.0, 10.0)),
            "lookup did not return the last upsert"
        );
        assert_eq!(registry.len(), 1, "upsert duplicated the entry");
    }

    #[test]
    fn upsert_reports_only_real_changes() {
        let mut registry = DropZoneRegistry::default();
        let cell = CellId::new(0);
        let rect = screen_rect(1.0, 2.0, 3.0, 4.0);

        assert!(registry.upsert(cell, rect), "first upsert is a change");
        assert!(!registry.upsert(cell, rect), "identical upsert is not a change");
        assert!(
            registry.upsert(cell, screen_rect(1.0, 2.0, 3.0, 5.0)),
            "resize is a change"
        );
    }

    #[test]
    fn zone_at_hits_the_containing_zone() {
        let mut registry = DropZoneRegistry::default();
        registry.upsert(CellId::new(1), screen_rect(0.0, 0.0, 100.0, 100.0));
        registry.upsert(CellId::new(2), screen_rect(108.0, 0.0, 100.0, 100.0));

        assert_eq!(registry.zone_at(Vec2::new(150.0, 50.0)), Some(CellId::new(2)));
        assert_eq!(registry.zone_at(Vec2::new(104.0, 50.0)), None, "gap hit a zone");
    }

    /// A 360x640 window looked at by a default 2D camera, so world (0, 0) is
    /// window (180, 320).
    fn projected_app() -> App {
        let mut app = App::new();
        app.init_resource::<DropZoneRegistry>()
            .init_resource::<Assets<Image>>()
            .init_resource::<ManualTextureViews>()
            .add_event::<WindowCreated>()
            .add_event::<WindowResized>()
            .add_event::<WindowScaleFactorChanged>()
            .add_event::<AssetEvent<Image>>()
            .add_systems(
                Update,
                (camera_system::<OrthographicProjection>, register_zone_bounds).chain(),
            );
        app.world_mut().spawn((
            Window {
                resolution: WindowResolution::new(360.0, 640.0),
                ..default()
            },
            PrimaryWindow,
        ));
        app.world_mut().spawn(Camera2d);
        app
    }

    fn spawn_zone(app: &mut App, id: u8, center: Vec2) -> Entity {
        app.world_mut()
            .spawn((
                DropZone::new(CellId::new(id), "red_circle"),
                Sprite::from_color(Color::WHITE, Vec2::splat(100.0)),
                GlobalTransform::from_translation(center.extend(0.0)),
            ))
            .id()
    }

    fn assert_near(actual: Option<Rect>, expected: Rect) {
        let Some(actual) = actual else {
            panic!("zone was never registered");
        };
        assert!(
            actual.min.abs_diff_eq(expected.min, 1e-3)
                && actual.max.abs_diff_eq(expected.max, 1e-3),
            "registered {actual:?}, expected {expected:?}"
        );
    }

    #[test]
    fn sprites_are_registered_in_window_space() {
        let mut app = projected_app();
        spawn_zone(&mut app, 5, Vec2::ZERO);
        spawn_zone(&mut app, 9, Vec2::new(108.0, -108.0));

        app.update();

        let registry = app.world().resource::<DropZoneRegistry>();
        assert_near(registry.lookup(CellId::new(5)), screen_rect(130.0, 270.0, 100.0, 100.0));
        // Lower in the world is further down the window.
        assert_near(registry.lookup(CellId::new(9)), screen_rect(238.0, 378.0, 100.0, 100.0));
    }

    #[test]
    fn registry_change_tick_moves_only_when_a_zone_moves() {
        let mut app = projected_app();
        let zone = spawn_zone(&mut app, 5, Vec2::ZERO);
        app.update();
        let registered = app.world().resource_ref::<DropZoneRegistry>().last_changed();

        app.update();
        assert_eq!(
            app.world().resource_ref::<DropZoneRegistry>().last_changed(),
            registered,
            "unchanged layout flagged the registry"
        );

        if let Some(mut transform) = app.world_mut().get_mut::<GlobalTransform>(zone) {
            *transform = GlobalTransform::from_translation(Vec3::new(0.0, 50.0, 0.0));
        }
        app.update();

        let registry = app.world().resource_ref::<DropZoneRegistry>();
        assert_ne!(registry.last_changed(), registered, "moved zone went unnoticed");
        assert_near(registry.lookup(CellId::new(5)), screen_rect(130.0, 220.0, 100.0, 100.0));
    }
}
