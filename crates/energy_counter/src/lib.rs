use bevy::prelude::*;
use bits_helpers::cleanup::despawn_with;

pub mod cell;
pub mod drag;
pub mod layout;
pub mod registry;
pub mod resolver;
mod ribbit;
pub mod screen;
pub mod tween;

use drag::{
    DragCancelled, ZoneDropped, finish_drag, handle_zone_drops, log_cancelled_drags,
    start_token_drag, track_drag, update_drag_ghost,
};
use layout::CounterLayout;
use registry::register_zone_bounds;
use resolver::resolve_token_target;
use ribbit::EnergyCounter;
use screen::{
    CounterScreenElement, CounterState, discard_screen_state, draw_token, highlight_zones,
    mount_screen, setup_camera, watch_orientation,
};
use tween::advance_token_tweens;

/// Counter screen: drop zones, the token and the drag gesture between them.
#[derive(Default)]
pub struct CounterPlugin {
    pub layout: CounterLayout,
}

impl Plugin for CounterPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.layout.clone())
            .init_state::<CounterState>()
            .add_event::<ZoneDropped>()
            .add_event::<DragCancelled>()
            .add_systems(Startup, setup_camera)
            .add_systems(Update, mount_screen.run_if(in_state(CounterState::Mounting)))
            .add_systems(
                Update,
                (
                    register_zone_bounds,
                    start_token_drag,
                    track_drag,
                    finish_drag,
                    handle_zone_drops,
                    log_cancelled_drags,
                    resolve_token_target,
                    advance_token_tweens,
                    draw_token,
                    update_drag_ghost,
                    highlight_zones,
                    watch_orientation,
                )
                    .chain()
                    .run_if(in_state(CounterState::Active)),
            )
            .add_systems(
                OnExit(CounterState::Active),
                (despawn_with::<CounterScreenElement>, discard_screen_state),
            );
    }
}

pub fn run() {
    bits_helpers::get_default_app::<EnergyCounter>(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    )
    .add_plugins(CounterPlugin::default())
    .run();
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::cell::{CellId, OccupiedCell, screen_rect};
    use crate::drag::{DragPayload, DropZone};
    use crate::registry::DropZoneRegistry;
    use crate::resolver::PlacementResolver;
    use crate::screen::Token;
    use crate::tween::{TOKEN_TWEEN_DURATION, TokenTween};

    const TAG: &str = "red_circle";

    /// The drop-to-animation half of the frame, without window or renderer.
    fn counter_app() -> (App, Entity) {
        let mut app = App::new();
        app.init_resource::<Time>()
            .init_resource::<DropZoneRegistry>()
            .insert_resource(OccupiedCell::new(CellId::new(0)))
            .insert_resource(PlacementResolver::new(80.0))
            .add_event::<ZoneDropped>()
            .add_systems(
                Update,
                (handle_zone_drops, resolve_token_target, advance_token_tweens).chain(),
            );
        for id in 0..=10 {
            app.world_mut().spawn(DropZone::new(CellId::new(id), TAG));
        }
        let token = app
            .world_mut()
            .spawn((Token, TokenTween::at(Vec2::ZERO)))
            .id();
        (app, token)
    }

    fn step(app: &mut App, delta: Duration) {
        app.world_mut().resource_mut::<Time>().advance_by(delta);
        app.update();
    }

    fn tween(app: &App, token: Entity) -> TokenTween {
        app.world()
            .get::<TokenTween>(token)
            .cloned()
            .unwrap_or_else(|| panic!("token lost its tween"))
    }

    fn drop_on(app: &mut App, id: u8) {
        app.world_mut().send_event(ZoneDropped {
            cell: CellId::new(id),
            payload: DragPayload::new(TAG),
        });
    }

    #[test]
    fn empty_registry_keeps_token_at_origin() {
        let (mut app, token) = counter_app();

        step(&mut app, Duration::from_millis(16));

        assert_eq!(tween(&app, token).position(), Vec2::ZERO);
    }

    #[test]
    fn drop_on_unlaid_cell_catches_up_once_registered() {
        let (mut app, token) = counter_app();
        drop_on(&mut app, 5);
        step(&mut app, Duration::ZERO);

        assert!(app.world().resource::<OccupiedCell>().is(CellId::new(5)));
        assert_eq!(tween(&app, token).target(), Vec2::ZERO, "no bounds yet");

        app.world_mut()
            .resource_mut::<DropZoneRegistry>()
            .upsert(CellId::new(5), screen_rect(100.0, 200.0, 100.0, 100.0));
        step(&mut app, TOKEN_TWEEN_DURATION);

        assert_eq!(tween(&app, token).position(), Vec2::new(110.0, 210.0));
    }

    #[test]
    fn new_drop_mid_animation_restarts_from_current_position() {
        let (mut app, token) = counter_app();
        {
            let mut registry = app.world_mut().resource_mut::<DropZoneRegistry>();
            registry.upsert(CellId::new(0), screen_rect(0.0, 0.0, 100.0, 100.0));
            registry.upsert(CellId::new(5), screen_rect(100.0, 200.0, 100.0, 100.0));
        }
        step(&mut app, TOKEN_TWEEN_DURATION);
        assert_eq!(tween(&app, token).position(), Vec2::new(10.0, 10.0));

        drop_on(&mut app, 5);
        step(&mut app, Duration::from_millis(100));
        let intermediate = tween(&app, token).position();
        assert_ne!(intermediate, Vec2::new(10.0, 10.0), "token did not start moving");

        drop_on(&mut app, 0);
        step(&mut app, Duration::ZERO);
        let restarted = tween(&app, token);
        assert_eq!(restarted.position(), intermediate, "token jumped on retarget");
        assert_eq!(restarted.target(), Vec2::new(10.0, 10.0));

        step(&mut app, TOKEN_TWEEN_DURATION);
        assert_eq!(tween(&app, token).position(), Vec2::new(10.0, 10.0));
    }

    #[test]
    fn foreign_drop_leaves_token_where_it_is() {
        let (mut app, token) = counter_app();
        app.world_mut()
            .resource_mut::<DropZoneRegistry>()
            .upsert(CellId::new(7), screen_rect(0.0, 0.0, 100.0, 100.0));
        app.world_mut().send_event(ZoneDropped {
            cell: CellId::new(7),
            payload: DragPayload::new("blue_square"),
        });

        step(&mut app, TOKEN_TWEEN_DURATION);

        assert!(app.world().resource::<OccupiedCell>().is(CellId::new(0)));
        assert_eq!(tween(&app, token).position(), Vec2::ZERO);
    }
}
