use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use bits_helpers::input::screen_to_world;

use crate::cell::OccupiedCell;
use crate::drag::{DragGhost, DragPayload, DragSession, DragSource, DropZone, ZoneHover};
use crate::layout::{CounterLayout, Orientation};
use crate::registry::DropZoneRegistry;
use crate::resolver::{FALLBACK_POINT, PlacementResolver};
use crate::tween::TokenTween;

const ZONE_COLOR: Color = Color::srgb(0.83, 0.83, 0.83);
const OCCUPIED_ZONE_COLOR: Color = Color::srgb(0.65, 0.65, 0.65);
const CANDIDATE_ZONE_COLOR: Color = Color::srgb(1.0, 0.85, 0.4);
const TOKEN_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);
const GHOST_COLOR: Color = Color::srgba(1.0, 0.0, 0.0, 0.5);
const TITLE_BAR_COLOR: Color = Color::srgb(0.38, 0.49, 0.55);

const LABEL_FONT_SIZE: f32 = 60.0;
const TITLE_FONT_SIZE: f32 = 30.0;

#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CounterState {
    #[default]
    Mounting,
    Active,
}

/// Everything spawned for one mount of the counter screen.
#[derive(Component)]
pub struct CounterScreenElement;

#[derive(Component)]
pub struct Token;

/// Orientation the current screen was mounted for.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct MountedOrientation(pub Orientation);

pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Builds a fresh counter screen: new registry, token back on the initial cell.
pub fn mount_screen(
    mut commands: Commands,
    layout: Res<CounterLayout>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut next_state: ResMut<NextState<CounterState>>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let orientation = Orientation::from_size(window.size());
    let chrome_height = layout.chrome_height(orientation);
    let resolver =
        PlacementResolver::new(layout.token_diameter()).with_chrome_offset(chrome_height);

    commands.insert_resource(DropZoneRegistry::default());
    commands.insert_resource(OccupiedCell::new(layout.initial_cell()));
    commands.insert_resource(DragSession::default());
    commands.insert_resource(resolver);
    commands.insert_resource(MountedOrientation(orientation));

    // The content area sits below the title bar.
    let content_center = Vec2::new(0.0, -chrome_height / 2.0);
    let cells = layout.cells(orientation);
    for placement in &cells {
        commands
            .spawn((
                Sprite::from_color(ZONE_COLOR, Vec2::splat(layout.cell_size())),
                Transform::from_translation((content_center + placement.center).extend(0.0)),
                DropZone::new(placement.cell, layout.token_tag()),
                ZoneHover::default(),
                CounterScreenElement,
            ))
            .with_child((
                Text2d::new(placement.cell.to_string()),
                TextFont {
                    font_size: LABEL_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::WHITE),
                Transform::from_xyz(0.0, 0.0, 1.0),
            ));
    }

    let radius = layout.token_diameter() / 2.0;
    commands.spawn((
        Mesh2d(meshes.add(Circle::new(radius))),
        MeshMaterial2d(materials.add(TOKEN_COLOR)),
        Transform::from_xyz(0.0, 0.0, 10.0),
        Token,
        TokenTween::at(FALLBACK_POINT),
        DragSource {
            payload: DragPayload::new(layout.token_tag()),
        },
        CounterScreenElement,
    ));

    commands.spawn((
        Mesh2d(meshes.add(Circle::new(radius))),
        MeshMaterial2d(materials.add(GHOST_COLOR)),
        Transform::from_xyz(0.0, 0.0, 20.0),
        Visibility::Hidden,
        DragGhost,
        CounterScreenElement,
    ));

    if chrome_height > 0.0 {
        spawn_title_bar(&mut commands, chrome_height);
    }

    info!("mounted {orientation} counter with {} cells", cells.len());
    next_state.set(CounterState::Active);
}

fn spawn_title_bar(commands: &mut Commands, height: f32) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(0.0),
                width: Val::Percent(100.0),
                height: Val::Px(height),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(TITLE_BAR_COLOR),
            CounterScreenElement,
        ))
        .with_child((
            Text::new("ENERGY COUNTER"),
            TextFont {
                font_size: TITLE_FONT_SIZE,
                ..default()
            },
            TextColor(Color::WHITE),
        ));
}

/// Per-mount state does not outlive the screen.
pub fn discard_screen_state(mut commands: Commands) {
    commands.remove_resource::<DropZoneRegistry>();
    commands.remove_resource::<OccupiedCell>();
    commands.remove_resource::<DragSession>();
    commands.remove_resource::<MountedOrientation>();
    info!("counter unmounted");
}

/// A rotation remounts the screen; a resize within the same orientation only
/// moves zones, which the registry picks up on its own.
pub fn watch_orientation(
    mut resized: EventReader<WindowResized>,
    mounted: Res<MountedOrientation>,
    mut next_state: ResMut<NextState<CounterState>>,
) {
    let Some(last) = resized.read().last() else {
        return;
    };
    let orientation = Orientation::from_size(Vec2::new(last.width, last.height));
    if orientation != mounted.0 {
        info!("rotated to {orientation}, remounting");
        next_state.set(CounterState::Mounting);
    }
}

/// Places the token mesh where its tween currently is.
pub fn draw_token(
    resolver: Res<PlacementResolver>,
    camera: Query<(&Camera, &GlobalTransform)>,
    mut tokens: Query<(&TokenTween, &mut Transform), With<Token>>,
) {
    let radius = resolver.token_diameter() / 2.0;
    for (tween, mut transform) in &mut tokens {
        let center = resolver.to_window(tween.position()) + Vec2::splat(radius);
        let Some(world) = screen_to_world(center, &camera) else {
            continue;
        };
        transform.translation.x = world.x;
        transform.translation.y = world.y;
    }
}

pub fn highlight_zones(
    occupied: Res<OccupiedCell>,
    mut zones: Query<(&DropZone, &ZoneHover, &mut Sprite)>,
) {
    for (zone, hover, mut sprite) in &mut zones {
        let color = match hover {
            ZoneHover::Candidate => CANDIDATE_ZONE_COLOR,
            ZoneHover::Idle if occupied.is(zone.cell()) => OCCUPIED_ZONE_COLOR,
            ZoneHover::Idle => ZONE_COLOR,
        };
        if sprite.color != color {
            sprite.color = color;
        }
    }
}
