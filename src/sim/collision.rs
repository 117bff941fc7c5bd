//! Collision detection and response against static geometry
//!
//! A [`Geometry`] is the pluggable collision strategy of a session: the flat
//! court (walls, ceiling, floor, rectangular bars) or the cup room (four
//! walls, floor, cylindrical pillars). Both resolve contacts after the
//! integrator has moved the ball, clamping it back inside and reflecting the
//! offending velocity component scaled by restitution.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::level::{Goal, Level, Obstacle, Rect};
use crate::consts::*;
use crate::tuning::Tuning;
use crate::{Dimension, ground};

/// Contacts resolved during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contact {
    /// Surfaces the ball was pushed out of
    pub hits: u32,
    /// The ball bounced off the floor
    pub floor: bool,
    /// The floor bounce left too little vertical speed; the ball is resting
    pub settled: bool,
}

/// Static collision strategy
pub trait Geometry {
    fn dimension(&self) -> Dimension;

    fn supports_goal(&self, goal: &Goal) -> bool;

    fn supports_obstacle(&self, obstacle: &Obstacle) -> bool;

    /// Whether a point lies inside the playfield
    fn contains(&self, pos: Vec3) -> bool;

    /// Resolve boundary and obstacle contacts for a ball already moved this
    /// frame. A floor bounce slower than `tuning.settle_speed` settles the
    /// ball and skips obstacle resolution.
    fn resolve(&self, level: &Level, ball: &mut Ball, restitution: f32, tuning: &Tuning) -> Contact;
}

/// Flat court: a `width` x `height` box, y-up, floor at y = 0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatCourt {
    pub width: f32,
    pub height: f32,
}

impl Default for FlatCourt {
    fn default() -> Self {
        Self {
            width: COURT_WIDTH,
            height: COURT_HEIGHT,
        }
    }
}

impl Geometry for FlatCourt {
    fn dimension(&self) -> Dimension {
        Dimension::Flat
    }

    fn supports_goal(&self, goal: &Goal) -> bool {
        matches!(goal, Goal::Square { .. })
    }

    fn supports_obstacle(&self, obstacle: &Obstacle) -> bool {
        matches!(obstacle, Obstacle::Block(_))
    }

    fn contains(&self, pos: Vec3) -> bool {
        (0.0..=self.width).contains(&pos.x) && (0.0..=self.height).contains(&pos.y) && pos.z == 0.0
    }

    fn resolve(&self, level: &Level, ball: &mut Ball, restitution: f32, tuning: &Tuning) -> Contact {
        let r = tuning.ball_radius;
        let mut contact = Contact::default();

        // Side walls
        if ball_wall_collision(&mut ball.pos.x, &mut ball.vel.x, r, self.width - r, restitution) {
            contact.hits += 1;
        }

        // Ceiling
        if ball.pos.y > self.height - r {
            ball.pos.y = self.height - r;
            ball.vel.y = -ball.vel.y * restitution;
            contact.hits += 1;
        }

        if ball_floor_collision(ball, r, restitution, tuning.settle_speed, &mut contact) {
            return contact;
        }

        for obstacle in &level.obstacles {
            if let Obstacle::Block(rect) = obstacle
                && ball_rect_collision(ball, rect, r, restitution)
            {
                contact.hits += 1;
            }
        }

        contact
    }
}

/// Cup room: walls at x = ±half_width and z = ±half_depth, floor at y = 0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CupRoom {
    pub half_width: f32,
    pub half_depth: f32,
}

impl Default for CupRoom {
    fn default() -> Self {
        Self {
            half_width: ROOM_HALF_WIDTH,
            half_depth: ROOM_HALF_DEPTH,
        }
    }
}

impl Geometry for CupRoom {
    fn dimension(&self) -> Dimension {
        Dimension::Spatial
    }

    fn supports_goal(&self, goal: &Goal) -> bool {
        matches!(goal, Goal::Cup { .. })
    }

    fn supports_obstacle(&self, obstacle: &Obstacle) -> bool {
        matches!(obstacle, Obstacle::Pillar { .. })
    }

    fn contains(&self, pos: Vec3) -> bool {
        pos.x.abs() <= self.half_width && pos.z.abs() <= self.half_depth && pos.y >= 0.0
    }

    fn resolve(&self, level: &Level, ball: &mut Ball, restitution: f32, tuning: &Tuning) -> Contact {
        let r = tuning.ball_radius;
        let mut contact = Contact::default();

        let (min_x, max_x) = (-self.half_width + r, self.half_width - r);
        if ball_wall_collision(&mut ball.pos.x, &mut ball.vel.x, min_x, max_x, restitution) {
            contact.hits += 1;
        }
        let (min_z, max_z) = (-self.half_depth + r, self.half_depth - r);
        if ball_wall_collision(&mut ball.pos.z, &mut ball.vel.z, min_z, max_z, restitution) {
            contact.hits += 1;
        }

        if ball_floor_collision(ball, r, restitution, tuning.settle_speed, &mut contact) {
            return contact;
        }

        for obstacle in &level.obstacles {
            if let Obstacle::Pillar { base, radius } = *obstacle
                && ball_pillar_collision(ball, base, radius, r, restitution)
            {
                contact.hits += 1;
            }
        }

        contact
    }
}

/// Clamp one axis into `[min, max]`, reflecting its velocity on contact.
/// Returns true if either bound was hit.
pub fn ball_wall_collision(pos: &mut f32, vel: &mut f32, min: f32, max: f32, restitution: f32) -> bool {
    if *pos < min {
        *pos = min;
        *vel = -*vel * restitution;
        true
    } else if *pos > max {
        *pos = max;
        *vel = -*vel * restitution;
        true
    } else {
        false
    }
}

/// Floor bounce plus settle check. Returns true if the ball settled.
fn ball_floor_collision(
    ball: &mut Ball,
    radius: f32,
    restitution: f32,
    settle_speed: f32,
    contact: &mut Contact,
) -> bool {
    if ball.pos.y >= radius {
        return false;
    }
    ball.pos.y = radius;
    ball.vel.y = -ball.vel.y * restitution;
    contact.hits += 1;
    contact.floor = true;

    if ball.vel.y.abs() < settle_speed {
        ball.settle();
        contact.settled = true;
        return true;
    }
    false
}

/// Resolve a ball overlapping an axis-aligned bar.
///
/// Pushes out along the axis of smaller penetration. The push direction comes
/// from the ball's position relative to the bar centre; velocity on that axis
/// is reflected and scaled only while it still points into the bar.
pub fn ball_rect_collision(ball: &mut Ball, rect: &Rect, radius: f32, restitution: f32) -> bool {
    let p = ball.pos;
    let overlaps = p.x + radius > rect.min.x
        && p.x - radius < rect.max.x
        && p.y + radius > rect.min.y
        && p.y - radius < rect.max.y;
    if !overlaps {
        return false;
    }

    let overlap_x = (p.x + radius - rect.min.x).min(rect.max.x - (p.x - radius));
    let overlap_y = (p.y + radius - rect.min.y).min(rect.max.y - (p.y - radius));
    let center = rect.center();

    if overlap_x < overlap_y {
        let dir = push_direction(p.x - center.x, ball.vel.x);
        ball.pos.x += dir * overlap_x;
        if ball.vel.x * dir < 0.0 {
            ball.vel.x = -ball.vel.x * restitution;
        }
    } else {
        let dir = push_direction(p.y - center.y, ball.vel.y);
        ball.pos.y += dir * overlap_y;
        if ball.vel.y * dir < 0.0 {
            ball.vel.y = -ball.vel.y * restitution;
        }
    }
    true
}

/// Sign of the push-out: away from the centre, else against the velocity
fn push_direction(offset: f32, vel: f32) -> f32 {
    if offset != 0.0 {
        offset.signum()
    } else if vel != 0.0 {
        -vel.signum()
    } else {
        1.0
    }
}

/// Resolve a ball overlapping a vertical cylinder (horizontal plane only)
pub fn ball_pillar_collision(
    ball: &mut Ball,
    base: Vec2,
    pillar_radius: f32,
    radius: f32,
    restitution: f32,
) -> bool {
    let offset = ground(ball.pos) - base;
    let reach = pillar_radius + radius;
    let dist = offset.length();
    if dist >= reach {
        return false;
    }

    let normal = if dist > 1e-6 {
        offset / dist
    } else {
        // Dead centre: back out along the incoming direction
        let back = -ground(ball.vel).normalize_or_zero();
        if back == Vec2::ZERO { Vec2::X } else { back }
    };

    let pushed = base + normal * reach;
    ball.pos.x = pushed.x;
    ball.pos.z = pushed.y;

    let planar = ground(ball.vel);
    let vn = planar.dot(normal);
    if vn < 0.0 {
        let reflected = planar - (1.0 + restitution) * vn * normal;
        ball.vel.x = reflected.x;
        ball.vel.z = reflected.y;
    }
    true
}

/// Ball centre strictly inside a square goal
pub fn square_capture(origin: Vec2, size: f32, pos: Vec3) -> bool {
    pos.x > origin.x && pos.x < origin.x + size && pos.y > origin.y && pos.y < origin.y + size
}

/// Ball below the rim and horizontally inside the cup
pub fn cup_capture(base: Vec2, radius: f32, rim_height: f32, pos: Vec3) -> bool {
    pos.y < rim_height && ground(pos).distance(base) < radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ball::BallState;
    use proptest::prelude::*;

    fn empty_level(goal: Goal) -> Level {
        Level {
            start: Vec3::ZERO,
            goal,
            obstacles: Vec::new(),
        }
    }

    fn flat_level() -> Level {
        empty_level(Goal::Square {
            origin: Vec2::new(340.0, 700.0),
            size: 40.0,
        })
    }

    fn flying(pos: Vec3, vel: Vec3) -> Ball {
        Ball {
            pos,
            vel,
            state: BallState::InFlight,
        }
    }

    #[test]
    fn test_floor_bounce_scales_speed() {
        let tuning = Tuning::flat();
        let mut ball = flying(Vec3::new(200.0, 5.0, 0.0), Vec3::new(30.0, -500.0, 0.0));

        let contact = FlatCourt::default().resolve(&flat_level(), &mut ball, 0.9, &tuning);
        assert!(contact.floor);
        assert!(!contact.settled);
        assert_eq!(ball.pos.y, tuning.ball_radius);
        assert!((ball.vel.y - 450.0).abs() < 1e-3);
        assert!(ball.launched());
    }

    #[test]
    fn test_floor_settle_zeroes_velocity() {
        let tuning = Tuning::flat();
        let mut ball = flying(Vec3::new(200.0, 5.0, 0.0), Vec3::new(30.0, -100.0, 0.0));

        // 100 * 0.2 = 20 < settle speed 60
        let contact = FlatCourt::default().resolve(&flat_level(), &mut ball, 0.2, &tuning);
        assert!(contact.settled);
        assert_eq!(ball.vel, Vec3::ZERO);
        assert!(!ball.launched());
    }

    #[test]
    fn test_side_wall_clamps_to_radius() {
        let tuning = Tuning::flat();
        let court = FlatCourt::default();
        let mut ball = flying(Vec3::new(-3.0, 300.0, 0.0), Vec3::new(-200.0, 0.0, 0.0));

        let contact = court.resolve(&flat_level(), &mut ball, 0.9, &tuning);
        assert_eq!(contact.hits, 1);
        assert_eq!(ball.pos.x, tuning.ball_radius);
        assert!((ball.vel.x - 180.0).abs() < 1e-3);

        let mut ball = flying(Vec3::new(399.0, 300.0, 0.0), Vec3::new(200.0, 0.0, 0.0));
        court.resolve(&flat_level(), &mut ball, 0.9, &tuning);
        assert_eq!(court.width - ball.pos.x, tuning.ball_radius);
        assert!(ball.vel.x < 0.0);
    }

    #[test]
    fn test_ceiling_bounce() {
        let tuning = Tuning::flat();
        let court = FlatCourt::default();
        let mut ball = flying(Vec3::new(100.0, 799.0, 0.0), Vec3::new(0.0, 400.0, 0.0));
        court.resolve(&flat_level(), &mut ball, 0.9, &tuning);
        assert_eq!(ball.pos.y, court.height - tuning.ball_radius);
        assert!((ball.vel.y + 360.0).abs() < 1e-3);
    }

    #[test]
    fn test_rect_shallow_axis_from_above() {
        // Bar spans x 150..250, y 380..400; ball lands on top near the middle
        let rect = Rect::new(150.0, 380.0, 100.0, 20.0);
        let mut ball = flying(Vec3::new(200.0, 415.0, 0.0), Vec3::new(10.0, -300.0, 0.0));

        assert!(ball_rect_collision(&mut ball, &rect, 20.0, 0.5));
        assert!((ball.pos.y - 420.0).abs() < 1e-4);
        assert!((ball.vel.y - 150.0).abs() < 1e-3);
        assert_eq!(ball.vel.x, 10.0);
    }

    #[test]
    fn test_rect_side_hit() {
        let rect = Rect::new(150.0, 380.0, 100.0, 20.0);
        let mut ball = flying(Vec3::new(135.0, 390.0, 0.0), Vec3::new(100.0, 0.0, 0.0));

        assert!(ball_rect_collision(&mut ball, &rect, 20.0, 0.9));
        assert!((ball.pos.x - 130.0).abs() < 1e-4);
        assert!((ball.vel.x + 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_rect_zero_velocity_pushes_away_from_center() {
        // Velocity on the penetrating axis is zero; push still goes upward
        let rect = Rect::new(150.0, 380.0, 100.0, 20.0);
        let mut ball = flying(Vec3::new(200.0, 410.0, 0.0), Vec3::new(50.0, 0.0, 0.0));

        assert!(ball_rect_collision(&mut ball, &rect, 20.0, 0.9));
        assert!((ball.pos.y - 420.0).abs() < 1e-4);
    }

    #[test]
    fn test_rect_miss() {
        let rect = Rect::new(150.0, 380.0, 100.0, 20.0);
        let mut ball = flying(Vec3::new(100.0, 390.0, 0.0), Vec3::new(100.0, 0.0, 0.0));
        let before = ball.clone();
        assert!(!ball_rect_collision(&mut ball, &rect, 20.0, 0.9));
        assert_eq!(ball, before);
    }

    #[test]
    fn test_pillar_pushes_out_radially() {
        let mut ball = flying(Vec3::new(0.25, 0.5, 0.0), Vec3::new(-2.0, 0.0, 0.0));
        assert!(ball_pillar_collision(&mut ball, Vec2::ZERO, 0.2, 0.1, 0.5));
        assert!((ground(ball.pos).length() - 0.3).abs() < 1e-5);
        assert!((ball.vel.x - 1.0).abs() < 1e-5);
        assert_eq!(ball.pos.y, 0.5);
    }

    #[test]
    fn test_room_walls_and_floor() {
        let tuning = Tuning::spatial();
        let room = CupRoom::default();
        let level = empty_level(Goal::Cup {
            base: Vec2::new(0.0, -2.0),
            radius: 0.3,
            rim_height: 0.25,
        });
        let mut ball = flying(Vec3::new(2.5, 1.0, -3.5), Vec3::new(1.0, 0.0, -1.0));

        let contact = room.resolve(&level, &mut ball, 0.9, &tuning);
        assert_eq!(contact.hits, 2);
        assert!((ball.pos.x - (room.half_width - tuning.ball_radius)).abs() < 1e-6);
        assert!((ball.pos.z + (room.half_depth - tuning.ball_radius)).abs() < 1e-6);
        assert!(ball.vel.x < 0.0 && ball.vel.z > 0.0);

        let mut ball = flying(Vec3::new(0.0, 0.05, 0.0), Vec3::new(1.0, -0.05, 0.5));
        let contact = room.resolve(&level, &mut ball, 0.9, &tuning);
        assert!(contact.settled);
        assert_eq!(ball.vel, Vec3::ZERO);
    }

    proptest! {
        #[test]
        fn prop_floor_bounce_keeps_restitution_fraction(
            speed in 1.0f32..5000.0,
            restitution in 0.05f32..1.0,
        ) {
            let tuning = Tuning::flat();
            let mut ball = flying(Vec3::new(200.0, 10.0, 0.0), Vec3::new(0.0, -speed, 0.0));
            let contact = FlatCourt::default().resolve(&flat_level(), &mut ball, restitution, &tuning);

            prop_assert!(contact.floor);
            prop_assert!(ball.pos.y >= tuning.ball_radius);
            let expected = speed * restitution;
            if expected < tuning.settle_speed {
                prop_assert_eq!(ball.vel, Vec3::ZERO);
                prop_assert!(!ball.launched());
            } else {
                prop_assert!((ball.vel.y - expected).abs() <= expected * 1e-5);
            }
        }

        #[test]
        fn prop_walls_never_penetrate(
            x in -500.0f32..900.0,
            vx in -3000.0f32..3000.0,
        ) {
            let tuning = Tuning::flat();
            let court = FlatCourt::default();
            let mut ball = flying(Vec3::new(x, 300.0, 0.0), Vec3::new(vx, 0.0, 0.0));
            court.resolve(&flat_level(), &mut ball, 0.9, &tuning);

            prop_assert!(ball.pos.x >= tuning.ball_radius);
            prop_assert!(ball.pos.x <= court.width - tuning.ball_radius);
        }
    }
}
