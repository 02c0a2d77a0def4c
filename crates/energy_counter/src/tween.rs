use std::time::Duration;

use bevy::math::cubic_splines::CubicSegment;
use bevy::prelude::*;

pub const TOKEN_TWEEN_DURATION: Duration = Duration::from_millis(300);

/// Fast-out-slow-in: quick start, long gentle landing.
fn smoothed(t: f32) -> f32 {
    CubicSegment::new_bezier((0.4, 0.0), (0.2, 1.0)).ease(t)
}

/// Fixed-duration eased move of the token between two placement points.
///
/// Retargeting mid-flight restarts the move from wherever the token is at that
/// moment, so the token never jumps.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct TokenTween {
    from: Vec2,
    to: Vec2,
    elapsed: Duration,
    duration: Duration,
}

impl TokenTween {
    /// A tween resting at `point`.
    pub const fn at(point: Vec2) -> Self {
        Self {
            from: point,
            to: point,
            elapsed: TOKEN_TWEEN_DURATION,
            duration: TOKEN_TWEEN_DURATION,
        }
    }

    pub const fn target(&self) -> Vec2 {
        self.to
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn position(&self) -> Vec2 {
        if self.is_finished() {
            return self.to;
        }
        let t = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.from.lerp(self.to, smoothed(t))
    }

    pub fn retarget(&mut self, to: Vec2) {
        if to == self.to {
            return;
        }
        self.from = self.position();
        self.to = to;
        self.elapsed = Duration::ZERO;
    }

    pub fn advance(&mut self, delta: Duration) -> Vec2 {
        self.elapsed = (self.elapsed + delta).min(self.duration);
        self.position()
    }
}

pub fn advance_token_tweens(time: Res<Time>, mut tweens: Query<&mut TokenTween>) {
    for mut tween in &mut tweens {
        if !tween.is_finished() {
            tween.advance(time.delta());
        }
    }
}
