use bevy::prelude::*;

use crate::cell::{CellId, OccupiedCell};
use crate::registry::DropZoneRegistry;
use crate::screen::Token;
use crate::tween::TokenTween;

/// Where the token goes while its cell has no known bounds.
pub const FALLBACK_POINT: Vec2 = Vec2::ZERO;

/// Computes the token's top-left draw position from the occupied cell.
///
/// The result is in the token's placement space: window space shifted up by
/// the height of any chrome (title bar) drawn above the counter.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct PlacementResolver {
    token_diameter: f32,
    chrome_offset: f32,
}

impl PlacementResolver {
    pub const fn new(token_diameter: f32) -> Self {
        Self {
            token_diameter,
            chrome_offset: 0.0,
        }
    }

    pub const fn with_chrome_offset(mut self, chrome_offset: f32) -> Self {
        self.chrome_offset = chrome_offset;
        self
    }

    pub const fn token_diameter(&self) -> f32 {
        self.token_diameter
    }

    pub const fn chrome_offset(&self) -> f32 {
        self.chrome_offset
    }

    pub fn resolve(&self, occupied: Option<CellId>, registry: &DropZoneRegistry) -> Vec2 {
        let Some(bounds) = occupied.and_then(|cell| registry.lookup(cell)) else {
            return FALLBACK_POINT;
        };
        let radius = self.token_diameter / 2.0;
        let center = bounds.center() - Vec2::new(0.0, self.chrome_offset);
        center - Vec2::splat(radius)
    }

    /// Converts a placement-space point back to window space.
    pub fn to_window(&self, point: Vec2) -> Vec2 {
        point + Vec2::new(0.0, self.chrome_offset)
    }
}

/// Points the token's tween at the freshly resolved target. Cheap enough to
/// run every frame; the tween ignores an unchanged target.
pub fn resolve_token_target(
    resolver: Res<PlacementResolver>,
    occupied: Res<OccupiedCell>,
    registry: Res<DropZoneRegistry>,
    mut tokens: Query<&mut TokenTween, With<Token>>,
) {
    let target = resolver.resolve(occupied.get(), &registry);
    for mut tween in &mut tokens {
        if tween.target() != target {
            tween.retarget(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::screen_rect;

    #[test]
    fn nothing_occupied_resolves_to_origin() {
        let mut registry = DropZoneRegistry::default();
        registry.upsert(CellId::new(0), screen_rect(10.0, 10.0, 100.0, 100.0));

        let resolver = PlacementResolver::new(80.0);
        assert_eq!(resolver.resolve(None, &registry), FALLBACK_POINT);
    }

    #[test]
    fn unregistered_cell_resolves_to_origin() {
        let registry = DropZoneRegistry::default();
        let resolver = PlacementResolver::new(80.0);

        assert_eq!(
            resolver.resolve(Some(CellId::new(0)), &registry),
            Vec2::ZERO,
            "empty registry must fall back to the origin"
        );
    }

    #[test]
    fn token_is_centered_in_the_occupied_cell() {
        let mut registry = DropZoneRegistry::default();
        registry.upsert(CellId::new(5), screen_rect(100.0, 200.0, 100.0, 100.0));

        let resolver = PlacementResolver::new(80.0);
        assert_eq!(
            resolver.resolve(Some(CellId::new(5)), &registry),
            Vec2::new(110.0, 210.0),
            "top-left must be the cell center minus the token radius"
        );
    }

    #[test]
    fn chrome_offset_moves_the_target_up() {
        let mut registry = DropZoneRegistry::default();
        registry.upsert(CellId::new(5), screen_rect(100.0, 200.0, 100.0, 100.0));

        let resolver = PlacementResolver::new(80.0).with_chrome_offset(64.0);
        let target = resolver.resolve(Some(CellId::new(5)), &registry);

        assert_eq!(target, Vec2::new(110.0, 146.0));
        assert_eq!(resolver.to_window(target), Vec2::new(110.0, 210.0));
    }
}
