//! Flappy Bird game mechanics
//!
//! Headless simulation of a side-scrolling bird-and-pipes game. The world
//! scrolls at a fixed horizontal speed; the bird only moves vertically. All
//! horizontal positions are integers so that "bird is exactly at the pipe" is
//! an equality check, not an epsilon comparison.

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Horizontal screen position of the bird; pipes scroll towards it.
pub const CAMERA_OFFSET: i64 = 100;

/// One of the two things the bird can do each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlappyAction {
    /// Kick the bird upwards
    Flap,
    /// Let gravity act
    Glide,
}

/// Tunable game parameters.
///
/// `horizontal_speed` must divide `pipe_start_offset` and `pipe_distance`,
/// otherwise the scroll position never lands exactly on a pipe and the
/// pass/collide check at the pipe can never trigger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Height of the playing field in pixels
    pub field_height: i64,
    /// Scroll distance to the first pipe
    pub pipe_start_offset: i64,
    /// Horizontal spacing between consecutive pipes
    pub pipe_distance: i64,
    /// Vertical size of the gap in each pipe
    pub pipe_space: i64,
    /// Number of pipes kept alive in the scrolling ring
    pub pipe_count: usize,
    /// Scroll speed in pixels per frame
    pub horizontal_speed: i64,
    /// Downward acceleration per frame
    pub gravity: f64,
    /// Vertical velocity set by a flap (negative = up)
    pub jump_velocity: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_height: 480,
            pipe_start_offset: 1000,
            pipe_distance: 300,
            pipe_space: 100,
            pipe_count: 5,
            horizontal_speed: 5,
            gravity: 0.5,
            jump_velocity: -7.0,
        }
    }
}

/// The player avatar. Vertical position grows downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bird {
    pub y: f64,
    pub velocity: f64,
}

impl Bird {
    fn new(y: f64) -> Self {
        Self { y, velocity: 0.0 }
    }

    fn step(&mut self, action: FlappyAction, config: &GameConfig) {
        if action == FlappyAction::Flap {
            self.velocity = config.jump_velocity;
        }
        self.y += self.velocity;
        self.velocity += config.gravity;
    }
}

/// A pipe pair, reduced to its gap: world x position and gap center height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    pub x: i64,
    pub gap_y: f64,
}

impl Pipe {
    fn generate(x: i64, field_height: i64, rng: &mut StdRng) -> Self {
        // gap center lands in the middle half of the field
        let half = field_height / 2;
        let gap_y = half + rng.random_range(-half..=half) / 2;
        Self {
            x,
            gap_y: gap_y as f64,
        }
    }

    /// Screen-space x of the pipe for a given scroll position.
    pub fn screen_x(&self, progress: i64) -> i64 {
        CAMERA_OFFSET + self.x - progress
    }
}

/// What one frame produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepStatus {
    Normal,
    /// The bird cleared a pipe gap; score went up by one
    Passed,
    /// The bird hit the floor, the ceiling or a pipe; the game has already
    /// been reset for the next episode
    Collided(EpisodeSummary),
}

/// Final numbers of a finished episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    /// Pipes cleared
    pub score: u64,
    /// Scroll distance covered
    pub progress: i64,
}

/// The Flappy Bird world: one bird, a scrolling ring of pipes, a score.
#[derive(Debug, Clone)]
pub struct FlappyGame {
    config: GameConfig,
    rng: StdRng,
    progress: i64,
    score: u64,
    next_pipe_x: i64,
    bird: Bird,
    pipes: VecDeque<Pipe>,
}

impl FlappyGame {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_rng(&mut rand::rng()))
    }

    /// Deterministic pipe layout for reproducible runs.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        assert!(config.pipe_count > 0, "pipe_count must be at least 1");
        let mut game = Self {
            config,
            rng,
            progress: 0,
            score: 0,
            next_pipe_x: 0,
            bird: Bird::new(0.0),
            pipes: VecDeque::with_capacity(config.pipe_count),
        };
        game.reset();
        game
    }

    fn reset(&mut self) {
        self.progress = 0;
        self.score = 0;
        self.next_pipe_x =
            self.config.pipe_start_offset + self.config.pipe_count as i64 * self.config.pipe_distance;
        self.bird = Bird::new(self.config.field_height as f64 / 2.0);
        self.pipes.clear();
        for i in 0..self.config.pipe_count {
            self.pipes.push_back(Pipe::generate(
                self.config.pipe_start_offset + i as i64 * self.config.pipe_distance,
                self.config.field_height,
                &mut self.rng,
            ));
        }
    }

    fn restart(&mut self) -> EpisodeSummary {
        let summary = EpisodeSummary {
            score: self.score,
            progress: self.progress,
        };
        self.reset();
        summary
    }

    fn recycle_front_pipe(&mut self) {
        self.pipes.pop_front();
        self.pipes.push_back(Pipe::generate(
            self.next_pipe_x,
            self.config.field_height,
            &mut self.rng,
        ));
        self.next_pipe_x += self.config.pipe_distance;
    }

    /// Advance the world by one frame.
    pub fn step(&mut self, action: FlappyAction) -> StepStatus {
        self.bird.step(action, &self.config);
        self.progress += self.config.horizontal_speed;

        let height = self.config.field_height as f64;
        if self.bird.y < 0.0 {
            self.bird.y = 0.0;
        }
        if self.bird.y > height {
            self.bird.y = height;
        }

        // recycle the front pipe once it has scrolled off behind the camera
        if let Some(front) = self.pipes.front()
            && front.screen_x(self.progress) < 0
        {
            self.recycle_front_pipe();
        }

        if self.bird.y >= height || self.bird.y <= 0.0 {
            return StepStatus::Collided(self.restart());
        }

        let upcoming = self.next_pipe();
        if self.progress == upcoming.x {
            if (self.bird.y - upcoming.gap_y).abs() > self.config.pipe_space as f64 / 2.0 {
                return StepStatus::Collided(self.restart());
            }
            self.score += 1;
            return StepStatus::Passed;
        }

        StepStatus::Normal
    }

    /// The nearest pipe the bird has not yet reached.
    pub fn next_pipe(&self) -> Pipe {
        self.pipes
            .iter()
            .find(|pipe| pipe.x >= self.progress)
            .or_else(|| self.pipes.back())
            .copied()
            .expect("pipe ring is never empty")
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn progress(&self) -> i64 {
        self.progress
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    #[cfg(test)]
    pub(crate) fn place_bird(&mut self, y: f64, velocity: f64) {
        self.bird = Bird { y, velocity };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> FlappyGame {
        FlappyGame::with_seed(GameConfig::default(), 7)
    }

    #[test]
    fn flap_resets_velocity_and_gravity_accumulates() {
        let mut game = game();
        let start_y = game.bird().y;

        game.step(FlappyAction::Flap);
        assert_eq!(game.bird().y, start_y - 7.0);
        assert_eq!(game.bird().velocity, -6.5);

        game.step(FlappyAction::Glide);
        assert_eq!(game.bird().y, start_y - 13.5);
        assert_eq!(game.bird().velocity, -6.0);
    }

    #[test]
    fn gliding_forever_ends_on_the_floor() {
        let mut game = game();
        let mut frames = 0;
        loop {
            frames += 1;
            match game.step(FlappyAction::Glide) {
                StepStatus::Collided(summary) => {
                    assert_eq!(summary.score, 0);
                    assert_eq!(summary.progress, frames * 5);
                    break;
                }
                StepStatus::Normal => assert!(frames < 1000, "bird never hit the floor"),
                StepStatus::Passed => panic!("cannot pass a pipe while dropping from the start"),
            }
        }

        // game has reset for the next episode
        assert_eq!(game.progress(), 0);
        assert_eq!(game.score(), 0);
        assert_eq!(game.bird().y, 240.0);
        assert_eq!(game.bird().velocity, 0.0);
    }

    #[test]
    fn crossing_the_gap_center_scores() {
        let mut game = game();
        let pipe = game.next_pipe();

        // scroll up to one frame short of the pipe, keeping the bird alive
        while game.progress() < pipe.x - game.config().horizontal_speed {
            game.place_bird(pipe.gap_y, 0.0);
            assert_eq!(game.step(FlappyAction::Glide), StepStatus::Normal);
        }

        game.place_bird(pipe.gap_y, 0.0);
        assert_eq!(game.step(FlappyAction::Glide), StepStatus::Passed);
        assert_eq!(game.score(), 1);
    }

    #[test]
    fn missing_the_gap_collides_and_resets() {
        let mut game = game();
        let pipe = game.next_pipe();

        while game.progress() < pipe.x - game.config().horizontal_speed {
            game.place_bird(pipe.gap_y, 0.0);
            game.step(FlappyAction::Glide);
        }

        // park the bird well outside the gap for the deciding frame
        let miss_y = if pipe.gap_y > 240.0 {
            pipe.gap_y - 60.0
        } else {
            pipe.gap_y + 60.0
        };
        game.place_bird(miss_y, 0.0);
        assert!(matches!(
            game.step(FlappyAction::Glide),
            StepStatus::Collided(_)
        ));
        assert_eq!(game.progress(), 0);
    }

    #[test]
    fn pipes_are_recycled_as_the_world_scrolls() {
        let mut game = game();
        let first_pipe = game.next_pipe();
        let pipe_count = game.config().pipe_count;

        // scroll past the first pipe and far enough for it to leave the screen
        let target = first_pipe.x + CAMERA_OFFSET + 5;
        while game.progress() < target {
            game.place_bird(game.next_pipe().gap_y, 0.0);
            game.step(FlappyAction::Glide);
        }

        assert_eq!(game.pipes.len(), pipe_count);
        assert!(game.pipes.iter().all(|pipe| pipe.x != first_pipe.x));
        assert!(game.next_pipe().x >= game.progress());
    }

    #[test]
    fn gap_centers_stay_in_the_middle_half_of_the_field() {
        let mut game = game();
        for _ in 0..200 {
            let pipe = game.next_pipe();
            assert!(pipe.gap_y >= 120.0 && pipe.gap_y <= 360.0, "gap_y {}", pipe.gap_y);
            // force a recycle by scrolling a full pipe distance
            let target = game.progress() + game.config().pipe_distance;
            while game.progress() < target {
                game.place_bird(game.next_pipe().gap_y, 0.0);
                game.step(FlappyAction::Glide);
            }
        }
    }

    #[test]
    fn same_seed_produces_identical_worlds() {
        let mut a = FlappyGame::with_seed(GameConfig::default(), 99);
        let mut b = FlappyGame::with_seed(GameConfig::default(), 99);

        for i in 0..500 {
            let action = if i % 25 == 0 {
                FlappyAction::Flap
            } else {
                FlappyAction::Glide
            };
            assert_eq!(a.step(action), b.step(action));
            assert_eq!(a.bird(), b.bird());
            assert_eq!(a.next_pipe(), b.next_pipe());
        }
    }
}
