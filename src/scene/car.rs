//! Scripted car motion along the fixed city route.
//!
//! A small explicit state machine driven purely by elapsed time and
//! position thresholds, fully decoupled from rendering: advance down
//! the main street, slow into a right-hand turn, accelerate out of it,
//! and respawn at the start once the side street ends.

use glam::{Quat, Vec3};

/// Cruising speed in world units per second.
const NORMAL_SPEED: f32 = 6.0;
/// Speed at the apex of the turn.
const TURN_SPEED: f32 = 2.0;
/// Exponential rate at which speed recovers after the turn.
const SPEED_RECOVERY_RATE: f32 = 3.0;
/// X coordinate where the turn begins.
const TURN_START_X: f32 = -63.5;
/// X coordinate where the turn ends.
const TURN_END_X: f32 = -64.0;
/// Z coordinate entering the turn.
const TURN_START_Z: f32 = 1.5;
/// Z coordinate leaving the turn.
const TURN_END_Z: f32 = 11.0;
/// Z coordinate past which the route restarts.
const ROUTE_END_Z: f32 = 48.0;
/// Spawn pose at the start of the route.
const SPAWN_POSITION: Vec3 = Vec3::new(55.0, -1.78, 1.5);
const RESPAWN_POSITION: Vec3 = Vec3::new(55.0, -1.78, 2.0);
const SPAWN_HEADING: f32 = -90.0;

/// Headlight mount offsets in car-local space (left, right).
const HEADLIGHT_OFFSETS: [Vec3; 2] =
    [Vec3::new(1.2, 0.3, -5.2), Vec3::new(2.2, 0.3, -5.2)];

/// Phase of the scripted route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarState {
    /// Driving down the main street (decreasing x).
    Advancing,
    /// Sweeping through the right-hand corner.
    Turning,
    /// Driving up the side street (increasing z) until respawn.
    AdvancingPostTurn,
}

/// World-space pose of the car: position plus heading about +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarPose {
    /// Car origin in world space.
    pub position: Vec3,
    /// Heading in degrees (rotation about world +Y).
    pub heading_deg: f32,
}

/// World-space placement of one headlight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadlightPose {
    /// Lamp position.
    pub position: Vec3,
    /// Normalized beam direction.
    pub direction: Vec3,
}

impl CarPose {
    /// Place both headlights for this pose.
    ///
    /// `aim` is the beam direction in car-local space (the user can tilt
    /// it); offsets and aim are rotated into world space by the heading.
    #[must_use]
    pub fn headlight_poses(&self, aim: Vec3) -> [HeadlightPose; 2] {
        let rotation = Quat::from_rotation_y(self.heading_deg.to_radians());
        let direction = (rotation * aim).normalize_or_zero();
        HEADLIGHT_OFFSETS.map(|offset| HeadlightPose {
            position: self.position + rotation * offset,
            direction,
        })
    }
}

/// Advances a [`CarPose`] along the scripted route each frame.
pub struct CarAnimator {
    position: Vec3,
    heading_deg: f32,
    state: CarState,
    turn_progress: f32,
    current_speed: f32,
}

impl Default for CarAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl CarAnimator {
    /// Create an animator at the route's spawn pose.
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: SPAWN_POSITION,
            heading_deg: SPAWN_HEADING,
            state: CarState::Advancing,
            turn_progress: 0.0,
            current_speed: NORMAL_SPEED,
        }
    }

    /// Current pose.
    #[must_use]
    pub fn pose(&self) -> CarPose {
        CarPose {
            position: self.position,
            heading_deg: self.heading_deg,
        }
    }

    /// Current route phase.
    #[must_use]
    pub fn state(&self) -> CarState {
        self.state
    }

    /// Advance the route by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        match self.state {
            CarState::Advancing => {
                if self.position.x > TURN_START_X {
                    self.position.x -= self.current_speed * dt;
                } else {
                    self.state = CarState::Turning;
                    self.turn_progress = 0.0;
                }
            }
            CarState::Turning => {
                if self.turn_progress < 1.0 {
                    let t = self.turn_progress;
                    self.current_speed = lerp(NORMAL_SPEED, TURN_SPEED, t);
                    // Blend position along the corner with a sinusoidal
                    // bulge so the car sweeps an arc instead of cutting
                    // the corner.
                    let arc = (t * std::f32::consts::PI).sin();
                    self.position.x = lerp(TURN_START_X, TURN_END_X, t);
                    self.position.z = lerp(TURN_START_Z, TURN_END_Z, t) + arc;
                    self.heading_deg = lerp(SPAWN_HEADING, 0.0, t);
                    self.turn_progress +=
                        (self.current_speed / NORMAL_SPEED) * dt * 0.7;
                } else {
                    // Snap to the exact corner exit so the residual of
                    // the last fractional step never accumulates.
                    self.position.x = TURN_END_X;
                    self.position.z = TURN_END_Z;
                    self.heading_deg = 0.0;
                    self.state = CarState::AdvancingPostTurn;
                    self.current_speed = TURN_SPEED;
                }
            }
            CarState::AdvancingPostTurn => {
                self.current_speed = lerp(
                    self.current_speed,
                    NORMAL_SPEED,
                    dt * SPEED_RECOVERY_RATE,
                );
                self.position.z += self.current_speed * dt;

                if self.position.z > ROUTE_END_Z {
                    self.position = RESPAWN_POSITION;
                    self.heading_deg = SPAWN_HEADING;
                    self.state = CarState::Advancing;
                    self.current_speed = NORMAL_SPEED;
                }
            }
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(animator: &mut CarAnimator, seconds: f32) {
        let dt = 1.0 / 60.0;
        let steps = (seconds / dt) as u32;
        for _ in 0..steps {
            animator.update(dt);
        }
    }

    #[test]
    fn advances_down_the_main_street_then_turns() {
        let mut car = CarAnimator::new();
        assert_eq!(car.state(), CarState::Advancing);
        // 118.5 units at 6 u/s is just under 20 s.
        run(&mut car, 21.0);
        assert_eq!(car.state(), CarState::Turning);
        assert!(car.pose().position.x <= TURN_START_X);
    }

    #[test]
    fn completes_the_turn_facing_the_side_street() {
        let mut car = CarAnimator::new();
        run(&mut car, 25.0);
        assert_eq!(car.state(), CarState::AdvancingPostTurn);
        assert_eq!(car.pose().heading_deg, 0.0);
        let p = car.pose().position;
        // Out of the corner the car holds the side-street lane (fixed
        // x) and drives up it (growing z).
        assert!((p.x - TURN_END_X).abs() < 1e-4);
        assert!(p.z >= TURN_END_Z);
    }

    #[test]
    fn respawns_after_the_side_street() {
        let mut car = CarAnimator::new();
        // Long enough to finish the whole route at least once.
        run(&mut car, 40.0);
        assert_eq!(car.state(), CarState::Advancing);
        let p = car.pose().position;
        assert!(p.x <= RESPAWN_POSITION.x);
        assert_eq!(car.pose().heading_deg, SPAWN_HEADING);
    }

    #[test]
    fn headlights_rotate_with_the_heading() {
        let pose = CarPose {
            position: Vec3::new(10.0, 0.0, 0.0),
            heading_deg: -90.0,
        };
        let aim = Vec3::new(0.0, -0.3, 1.0);
        let [left, right] = pose.headlight_poses(aim);

        // Heading -90 rotates local (x, y, z) onto (-z, y, -x)... check:
        // Quat::from_rotation_y(-90deg) maps +Z to -X and +X to +Z.
        let rot = Quat::from_rotation_y((-90.0_f32).to_radians());
        assert!(
            (left.position - (pose.position + rot * HEADLIGHT_OFFSETS[0]))
                .length()
                < 1e-4
        );
        assert!(
            (right.position - (pose.position + rot * HEADLIGHT_OFFSETS[1]))
                .length()
                < 1e-4
        );
        // Both beams share one normalized direction.
        assert!((left.direction - right.direction).length() < 1e-6);
        assert!((left.direction.length() - 1.0).abs() < 1e-5);
    }
}
