//! Environment adapter bridging the game to the trainer
//!
//! Translates between the trainer's state/action/reward view and the game's
//! frame-level mechanics: discretizes observations, applies each chosen
//! action over a block of frames, and converts step statuses into rewards.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    game::{
        discretize::{Discretizer, FlappyState},
        mechanics::{EpisodeSummary, FlappyAction, FlappyGame, StepStatus},
    },
    ports::{Environment, StepOutcome},
};

/// Rewards handed to the trainer per frame outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardSchedule {
    /// Reward for clearing a pipe gap
    pub passed: f64,
    /// Reward for any collision
    pub collided: f64,
    /// Reward for an uneventful frame
    pub step: f64,
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            passed: 300.0,
            collided: -300.0,
            step: 0.0,
        }
    }
}

/// Running tally of finished episodes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EpisodeStats {
    pub episodes: u64,
    pub best_score: u64,
    pub total_score: u64,
    pub last: Option<EpisodeSummary>,
}

impl EpisodeStats {
    pub fn mean_score(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_score as f64 / self.episodes as f64
        }
    }

    fn record(&mut self, summary: EpisodeSummary) {
        self.episodes += 1;
        self.best_score = self.best_score.max(summary.score);
        self.total_score += summary.score;
        self.last = Some(summary);
    }
}

/// [`Environment`] implementation over [`FlappyGame`].
///
/// Each [`advance`](Environment::advance) plays a block of `frame_skip`
/// frames: the chosen action on the first frame, gliding on the rest, with
/// the rewards of all frames summed. Collisions inside the block reset the
/// game and the block keeps running in the fresh episode.
pub struct FlappyEnvironment {
    game: FlappyGame,
    discretizer: Discretizer,
    rewards: RewardSchedule,
    frame_skip: u32,
    announce: bool,
    stats: EpisodeStats,
}

impl FlappyEnvironment {
    pub fn new(game: FlappyGame, discretizer: Discretizer) -> Self {
        Self {
            game,
            discretizer,
            rewards: RewardSchedule::default(),
            frame_skip: 10,
            announce: false,
            stats: EpisodeStats::default(),
        }
    }

    pub fn with_rewards(mut self, rewards: RewardSchedule) -> Self {
        self.rewards = rewards;
        self
    }

    /// Frames played per action; clamped to at least 1.
    pub fn with_frame_skip(mut self, frame_skip: u32) -> Self {
        self.frame_skip = frame_skip.max(1);
        self
    }

    /// Print a line for every finished episode (used by evaluation runs).
    pub fn with_announcements(mut self, announce: bool) -> Self {
        self.announce = announce;
        self
    }

    pub fn stats(&self) -> &EpisodeStats {
        &self.stats
    }

    pub fn game(&self) -> &FlappyGame {
        &self.game
    }

    fn record_episode(&mut self, summary: EpisodeSummary) {
        self.stats.record(summary);
        if self.announce {
            println!(
                "Episode {}: score {}, progress {}",
                self.stats.episodes, summary.score, summary.progress
            );
        }
    }
}

impl Environment for FlappyEnvironment {
    type State = FlappyState;
    type Action = FlappyAction;

    fn actions(&self) -> Vec<FlappyAction> {
        vec![FlappyAction::Flap, FlappyAction::Glide]
    }

    fn all_states(&self) -> Vec<FlappyState> {
        self.discretizer.enumerate_states(self.game.config())
    }

    fn current_state(&self) -> FlappyState {
        self.discretizer.state_of(&self.game)
    }

    fn advance(&mut self, action: FlappyAction) -> Result<StepOutcome> {
        let mut total = 0.0;
        for frame in 0..self.frame_skip {
            let frame_action = if frame == 0 { action } else { FlappyAction::Glide };
            total += match self.game.step(frame_action) {
                StepStatus::Normal => self.rewards.step,
                StepStatus::Passed => self.rewards.passed,
                StepStatus::Collided(summary) => {
                    self.record_episode(summary);
                    self.rewards.collided
                }
            };
        }
        Ok(StepOutcome::Reward(total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::mechanics::GameConfig;

    fn environment() -> FlappyEnvironment {
        FlappyEnvironment::new(
            FlappyGame::with_seed(GameConfig::default(), 21),
            Discretizer::default(),
        )
    }

    #[test]
    fn advance_plays_a_whole_frame_block() {
        let mut env = environment();
        let outcome = env.advance(FlappyAction::Glide).unwrap();

        assert_eq!(outcome, StepOutcome::Reward(0.0));
        assert_eq!(env.game().progress(), 50); // 10 frames at speed 5
    }

    #[test]
    fn uneventful_frames_earn_the_step_reward() {
        let mut env = environment().with_rewards(RewardSchedule {
            passed: 300.0,
            collided: -300.0,
            step: -0.5,
        });
        let outcome = env.advance(FlappyAction::Glide).unwrap();
        assert_eq!(outcome, StepOutcome::Reward(-5.0));
    }

    #[test]
    fn collisions_are_rewarded_and_recorded() {
        let mut env = environment();

        // dropping from the start hits the floor after a few frame blocks
        let mut collision_reward = None;
        for _ in 0..20 {
            if let StepOutcome::Reward(reward) = env.advance(FlappyAction::Glide).unwrap()
                && reward < 0.0
            {
                collision_reward = Some(reward);
                break;
            }
        }

        assert_eq!(collision_reward, Some(-300.0));
        assert_eq!(env.stats().episodes, 1);
        assert_eq!(env.stats().best_score, 0);
        assert!(env.stats().last.unwrap().progress > 0);
    }

    #[test]
    fn frame_skip_of_one_steps_a_single_frame() {
        let mut env = environment().with_frame_skip(1);
        env.advance(FlappyAction::Glide).unwrap();
        assert_eq!(env.game().progress(), 5);
    }

    #[test]
    fn state_space_matches_the_discretizer() {
        let env = environment();
        let states = env.all_states();
        assert_eq!(states.len(), 32 * 97 * 7);
        assert!(states.contains(&env.current_state()));
    }

    #[test]
    fn action_set_is_fixed() {
        let env = environment();
        assert_eq!(env.actions(), vec![FlappyAction::Flap, FlappyAction::Glide]);
    }
}
