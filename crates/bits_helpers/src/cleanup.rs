use bevy::prelude::*;

/// Despawns every entity (and its children) tagged with the marker `M`.
///
/// Bits tag the entities belonging to one screen with a marker component and
/// register `despawn_with::<Marker>` on the screen's exit schedule.
pub fn despawn_with<M: Component>(mut commands: Commands, query: Query<Entity, With<M>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Component)]
    struct ScreenElement;

    #[test]
    fn despawns_only_marked_entities() {
        let mut app = App::new();
        app.add_systems(Update, despawn_with::<ScreenElement>);

        let parent = app.world_mut().spawn(ScreenElement).id();
        let child = app.world_mut().spawn_empty().id();
        app.world_mut().entity_mut(parent).add_child(child);
        let survivor = app.world_mut().spawn_empty().id();

        app.update();

        assert!(!app.world().entities().contains(parent), "marked entity survived");
        assert!(!app.world().entities().contains(child), "child of marked entity survived");
        assert!(app.world().entities().contains(survivor), "unmarked entity was despawned");
    }
}
