//! State discretization for the flappy environment
//!
//! The trainer needs a finite state space that can be enumerated in full
//! before training starts. The bucket widths are a tuning knob, not a
//! structural contract, so they live in a [`Discretizer`] value instead of
//! constants.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    game::mechanics::{FlappyGame, GameConfig},
};

/// Discretized observation of the game.
///
/// - `distance_bucket`: horizontal distance to the next pipe, clamped
/// - `offset_bucket`: vertical offset between bird and gap center (0 while
///   the next pipe is still far away)
/// - `velocity_bucket`: current vertical velocity of the bird
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlappyState {
    pub distance_bucket: i32,
    pub offset_bucket: i32,
    pub velocity_bucket: i32,
}

/// Maps game situations onto [`FlappyState`] buckets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Discretizer {
    distance_divisor: i64,
    offset_divisor: i64,
    velocity_divisor: i64,
}

impl Default for Discretizer {
    fn default() -> Self {
        Self {
            distance_divisor: 10,
            offset_divisor: 10,
            velocity_divisor: 5,
        }
    }
}

impl Discretizer {
    pub fn new(distance_divisor: i64, offset_divisor: i64, velocity_divisor: i64) -> Result<Self> {
        for (name, value) in [
            ("distance", distance_divisor),
            ("offset", offset_divisor),
            ("velocity", velocity_divisor),
        ] {
            if value <= 0 {
                return Err(Error::InvalidDiscretizer {
                    message: format!("{name} divisor must be positive, got {value}"),
                });
            }
        }
        Ok(Self {
            distance_divisor,
            offset_divisor,
            velocity_divisor,
        })
    }

    /// Distance beyond which the next pipe is treated as "far away".
    fn max_distance(&self, config: &GameConfig) -> i64 {
        config.pipe_distance + self.distance_divisor
    }

    /// Discretize the current game situation.
    pub fn state_of(&self, game: &FlappyGame) -> FlappyState {
        let config = game.config();
        let next_pipe = game.next_pipe();

        let distance = (next_pipe.x - game.progress()).min(self.max_distance(config));
        // while the pipe is out of sight range the vertical offset is noise
        let offset = if distance > config.pipe_distance {
            0.0
        } else {
            game.bird().y - next_pipe.gap_y
        };

        FlappyState {
            distance_bucket: distance.div_euclid(self.distance_divisor) as i32,
            offset_bucket: (offset as i64).div_euclid(self.offset_divisor) as i32,
            velocity_bucket: (game.bird().velocity as i64).div_euclid(self.velocity_divisor) as i32,
        }
    }

    /// Enumerate every state [`Discretizer::state_of`] can ever produce for
    /// the given game configuration.
    ///
    /// The Q-table is initialized over exactly this set, so the ranges here
    /// must cover all reachable observations: distances up to the clamp,
    /// offsets across the whole field, velocities from a fresh flap down to
    /// the worst-case fall.
    pub fn enumerate_states(&self, config: &GameConfig) -> Vec<FlappyState> {
        let max_distance_bucket = self.max_distance(config).div_euclid(self.distance_divisor) as i32;
        let offset_span = config.field_height.div_euclid(self.offset_divisor) as i32;
        let min_velocity_bucket =
            (config.jump_velocity as i64).div_euclid(self.velocity_divisor) as i32;
        let max_velocity_bucket =
            (max_fall_velocity(config) as i64).div_euclid(self.velocity_divisor) as i32;

        let mut states = Vec::new();
        for distance_bucket in 0..=max_distance_bucket {
            for offset_bucket in -offset_span..=offset_span {
                for velocity_bucket in min_velocity_bucket..=max_velocity_bucket {
                    states.push(FlappyState {
                        distance_bucket,
                        offset_bucket,
                        velocity_bucket,
                    });
                }
            }
        }
        states
    }
}

/// Upper bound on the bird's downward velocity.
///
/// Simulates the worst case: the bird tips over the ceiling with one full
/// gravity increment already applied and falls the entire field. One frame of
/// slack is included because the killing frame's velocity is never observed.
fn max_fall_velocity(config: &GameConfig) -> f64 {
    let height = config.field_height as f64;
    let mut y = 0.0;
    let mut velocity = config.gravity;
    while y < height {
        y += velocity;
        velocity += config.gravity;
    }
    velocity
}
