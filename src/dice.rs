// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Probability Boundary Suite ("The Odds Lab") - Resting-Body Simulation

//! Approximate dice kinematics: per-tick Euler steps until each die rests.
//!
//! Update order per tick (must not be reordered, replays depend on it):
//!
//! 1. `velocity.y -= gravity_per_tick`
//! 2. `position += velocity`
//! 3. `orientation += angular_velocity`
//! 4. below the floor: clamp, flip and damp `velocity.y`, apply friction to
//!    the whole velocity and damping to the whole angular velocity
//! 5. `‖velocity‖ < linear_rest_epsilon` and `|angular_velocity.x| <
//!    angular_rest_epsilon` zero both vectors and mark the body resting
//!
//! There is no collision between dice and no torque from impacts.

use serde::{Deserialize, Serialize};

use crate::random::RandomSource;
use crate::types::Vec3;

// ─── PhysicsParams ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// `g · dt` for one tick.
    pub gravity_per_tick: f64,
    /// Height of a die's centre when lying on the floor.
    pub rest_height: f64,
    pub restitution: f64,
    pub friction: f64,
    pub angular_damping: f64,
    pub linear_rest_epsilon: f64,
    pub angular_rest_epsilon: f64,
    /// Horizontal launch speed is drawn from `±horizontal_launch / 2`.
    pub horizontal_launch: f64,
    /// Vertical launch speed is drawn from `[min, min + span)`.
    pub vertical_launch_min: f64,
    pub vertical_launch_span: f64,
    /// Spin on each axis is drawn from `±spin_launch / 2`.
    pub spin_launch: f64,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity_per_tick: 0.001,
            rest_height: 0.5,
            restitution: 0.5,
            friction: 0.98,
            angular_damping: 0.95,
            linear_rest_epsilon: 0.001,
            angular_rest_epsilon: 0.01,
            horizontal_launch: 0.3,
            vertical_launch_min: 0.3,
            vertical_launch_span: 0.5,
            spin_launch: 0.3,
        }
    }
}

// ─── DiceBody ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiceBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Accumulated Euler angles (radians), for display only.
    pub orientation: Vec3,
    pub resting: bool,
}

impl DiceBody {
    /// A motionless die at `position`. It is not marked resting until a tick
    /// confirms it.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            orientation: Vec3::ZERO,
            resting: false,
        }
    }
}

/// Start a roll: reset to `spawn` with randomized launch and spin.
///
/// Samples are consumed in the order vx, vy, vz, wx, wy, wz.
pub fn launch<R: RandomSource>(body: DiceBody, spawn: Vec3, params: &PhysicsParams, source: &mut R) -> DiceBody {
    let vx = (source.next_unit() - 0.5) * params.horizontal_launch;
    let vy = source.next_unit() * params.vertical_launch_span + params.vertical_launch_min;
    let vz = (source.next_unit() - 0.5) * params.horizontal_launch;
    let mut spin = || (source.next_unit() - 0.5) * params.spin_launch;
    let (wx, wy, wz) = (spin(), spin(), spin());
    DiceBody {
        position: spawn,
        velocity: Vec3::new(vx, vy, vz),
        angular_velocity: Vec3::new(wx, wy, wz),
        orientation: body.orientation,
        resting: false,
    }
}

/// Advance one tick. Resting bodies are returned unchanged.
pub fn step(body: DiceBody, params: &PhysicsParams) -> DiceBody {
    if body.resting {
        return body;
    }
    let mut b = body;

    b.velocity.y -= params.gravity_per_tick;
    b.position += b.velocity;
    b.orientation += b.angular_velocity;

    if b.position.y < params.rest_height {
        b.position.y = params.rest_height;
        b.velocity.y *= -params.restitution;
        b.velocity *= params.friction;
        b.angular_velocity *= params.angular_damping;
    }

    if b.velocity.length() < params.linear_rest_epsilon
        && b.angular_velocity.x.abs() < params.angular_rest_epsilon
    {
        b.velocity = Vec3::ZERO;
        b.angular_velocity = Vec3::ZERO;
        b.resting = true;
    }
    b
}

// ─── DiceTray ───────────────────────────────────────────────────────────────

/// Independent dice sharing one set of physics constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiceTray {
    pub params: PhysicsParams,
    pub bodies: Vec<DiceBody>,
    spawns: Vec<Vec3>,
    /// Ticks since the last launch.
    pub ticks: u64,
}

/// Spawn point for die `i` of `n`: a row spaced 1.2 apart at height 2.
pub fn spawn_point(i: usize, n: usize) -> Vec3 {
    let offset = i as f64 - (n as f64 - 1.0) / 2.0;
    Vec3::new(offset * 1.2, 2.0, 0.0)
}

impl DiceTray {
    pub fn new(count: usize, params: PhysicsParams) -> Self {
        let spawns: Vec<Vec3> = (0..count).map(|i| spawn_point(i, count)).collect();
        let bodies = spawns
            .iter()
            .map(|&p| DiceBody { resting: true, ..DiceBody::at(p) })
            .collect();
        Self { params, bodies, spawns, ticks: 0 }
    }

    /// Launch every die. Overwrites any roll still in flight.
    pub fn launch<R: RandomSource>(&mut self, source: &mut R) {
        for (body, &spawn) in self.bodies.iter_mut().zip(&self.spawns) {
            *body = launch(*body, spawn, &self.params, source);
        }
        self.ticks = 0;
    }

    /// Advance every die by one tick.
    pub fn step(&mut self) {
        for body in self.bodies.iter_mut() {
            *body = step(*body, &self.params);
        }
        self.ticks += 1;
    }

    pub fn all_resting(&self) -> bool {
        self.bodies.iter().all(|b| b.resting)
    }

    /// Step until every die rests or `max_ticks` elapse. Returns the ticks
    /// taken, or `None` if the budget ran out first.
    pub fn settle(&mut self, max_ticks: u64) -> Option<u64> {
        let start = self.ticks;
        while !self.all_resting() {
            if self.ticks - start >= max_ticks {
                return None;
            }
            self.step();
        }
        Some(self.ticks - start)
    }
}

/// Face value `floor(u · 6) + 1`.
pub fn face(u: f64) -> u8 {
    ((u * 6.0) as u8).min(5) + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedSource, SeededSource};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn slow_die_on_the_floor_rests_next_tick() {
        let params = PhysicsParams::default();
        let body = DiceBody {
            velocity: Vec3::new(0.0005, 0.0, 0.0),
            angular_velocity: Vec3::new(0.005, 0.2, 0.0),
            ..DiceBody::at(Vec3::new(0.0, 0.5, 0.0))
        };
        let next = step(body, &params);
        assert!(next.resting);
        assert_eq!(next.velocity, Vec3::ZERO);
        assert_eq!(next.angular_velocity, Vec3::ZERO);
        assert_eq!(next.position.y, 0.5);
    }

    #[test]
    fn first_tick_in_the_air_follows_update_order() {
        let params = PhysicsParams::default();
        let body = DiceBody {
            velocity: Vec3::new(0.1, 0.4, -0.05),
            angular_velocity: Vec3::new(0.1, 0.0, 0.02),
            ..DiceBody::at(Vec3::new(0.0, 2.0, 0.0))
        };
        let next = step(body, &params);
        assert_eq!(next.velocity.y, 0.4 - 0.001);
        assert_eq!(next.position, Vec3::new(0.1, 2.0 + (0.4 - 0.001), -0.05));
        assert_eq!(next.orientation, Vec3::new(0.1, 0.0, 0.02));
        assert!(!next.resting);
    }

    #[test]
    fn floor_contact_bounces_and_damps() {
        let params = PhysicsParams::default();
        let body = DiceBody {
            velocity: Vec3::new(0.1, -0.2, 0.0),
            angular_velocity: Vec3::new(0.2, 0.2, 0.2),
            ..DiceBody::at(Vec3::new(0.0, 0.6, 0.0))
        };
        let next = step(body, &params);
        assert_eq!(next.position.y, 0.5);
        assert!(close(next.velocity.y, 0.201 * 0.5 * 0.98));
        assert!(close(next.velocity.x, 0.1 * 0.98));
        assert!(close(next.angular_velocity.x, 0.2 * 0.95));
        assert!(!next.resting);
    }

    #[test]
    fn resting_body_is_frozen() {
        let params = PhysicsParams::default();
        let body = DiceBody { resting: true, ..DiceBody::at(Vec3::new(1.0, 0.5, 1.0)) };
        assert_eq!(step(body, &params), body);
    }

    #[test]
    fn launch_consumes_samples_in_axis_order() {
        let params = PhysicsParams::default();
        let mut source = ScriptedSource::new(vec![1.0 - 1e-12, 0.5, 0.0, 0.75, 0.25, 0.5]);
        let body = launch(DiceBody::at(Vec3::ZERO), Vec3::new(0.0, 2.0, 0.0), &params, &mut source);
        assert!(close(body.velocity.x, 0.15));
        assert!(close(body.velocity.y, 0.55));
        assert!(close(body.velocity.z, -0.15));
        assert!(close(body.angular_velocity.x, 0.075));
        assert!(close(body.angular_velocity.y, -0.075));
        assert_eq!(body.angular_velocity.z, 0.0);
        assert_eq!(body.position, Vec3::new(0.0, 2.0, 0.0));
        assert!(!body.resting);
        assert_eq!(source.consumed(), 6);
    }

    #[test]
    fn tray_settles_after_a_launch() {
        let mut tray = DiceTray::new(3, PhysicsParams::default());
        assert!(tray.all_resting());
        tray.launch(&mut SeededSource::new(5));
        assert!(!tray.all_resting());
        let ticks = tray.settle(100_000).expect("dice should come to rest");
        assert!(ticks > 0);
        for b in &tray.bodies {
            assert_eq!(b.position.y, 0.5);
            assert_eq!(b.velocity, Vec3::ZERO);
        }
    }

    #[test]
    fn relaunch_overwrites_a_roll_in_flight() {
        let mut tray = DiceTray::new(2, PhysicsParams::default());
        let mut rng = SeededSource::new(9);
        tray.launch(&mut rng);
        for _ in 0..10 {
            tray.step();
        }
        tray.launch(&mut rng);
        assert_eq!(tray.ticks, 0);
        assert_eq!(tray.bodies[0].position, spawn_point(0, 2));
    }

    #[test]
    fn spawn_row_is_centred() {
        assert_eq!(spawn_point(0, 3), Vec3::new(-1.2, 2.0, 0.0));
        assert_eq!(spawn_point(1, 3), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(spawn_point(2, 3), Vec3::new(1.2, 2.0, 0.0));
    }

    #[test]
    fn face_covers_one_to_six() {
        assert_eq!(face(0.0), 1);
        assert_eq!(face(0.5), 4);
        assert_eq!(face(0.999_999), 6);
    }
}
