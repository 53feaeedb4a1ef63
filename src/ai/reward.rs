use std::collections::VecDeque;

use crate::game::EpisodeStatus;

/// Food distances kept for the oscillation check.
const HISTORY_LEN: usize = 4;

/// Reward constants applied on top of the raw game outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardConfig {
    pub food_reward: f32,
    pub collision_penalty: f32,
    pub closer_reward: f32,
    pub farther_penalty: f32,
    pub loop_penalty: f32,
}

impl Default for RewardConfig {
    fn default() -> Self {
        RewardConfig {
            food_reward: 10.0,
            collision_penalty: -10.0,
            closer_reward: 1.0,
            farther_penalty: -1.0,
            loop_penalty: -11.0,
        }
    }
}

/// Shapes per-step rewards from the episode status, score change, and the
/// recent history of head-to-food distances.
#[derive(Debug, Clone)]
pub struct RewardShaper {
    config: RewardConfig,
    distances: VecDeque<i32>,
}

impl RewardShaper {
    pub fn new(config: RewardConfig) -> Self {
        RewardShaper {
            config,
            distances: VecDeque::with_capacity(HISTORY_LEN),
        }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Reward for the step that just happened.
    ///
    /// Precedence: terminal status, then food, then a period-2 loop, then
    /// the distance trend against two steps back.
    pub fn reward(
        &mut self,
        status: EpisodeStatus,
        score: u32,
        old_score: u32,
        distance: i32,
    ) -> f32 {
        match status {
            EpisodeStatus::Collision => return self.config.collision_penalty,
            EpisodeStatus::Timeout => return self.config.loop_penalty,
            EpisodeStatus::Running => {}
        }

        if score > old_score {
            self.distances.clear();
            self.distances.push_back(distance);
            return self.config.food_reward;
        }

        if self.distances.len() == HISTORY_LEN {
            self.distances.pop_front();
        }
        self.distances.push_back(distance);

        if self.is_oscillating() {
            return self.config.loop_penalty;
        }

        let n = self.distances.len();
        if n < 3 {
            return 0.0;
        }
        let current = self.distances[n - 1];
        let earlier = self.distances[n - 3];
        match current.cmp(&earlier) {
            std::cmp::Ordering::Less => self.config.closer_reward,
            std::cmp::Ordering::Greater => self.config.farther_penalty,
            std::cmp::Ordering::Equal => 0.0,
        }
    }

    /// `d[t] == d[t-2]` and `d[t-1] == d[t-3]` over a full history.
    fn is_oscillating(&self) -> bool {
        if self.distances.len() < HISTORY_LEN {
            return false;
        }
        let d = &self.distances;
        d[3] == d[1] && d[2] == d[0]
    }

    /// Forget the distance history. Called at the end of every episode.
    pub fn reset(&mut self) {
        self.distances.clear();
    }

    pub fn history(&self) -> impl Iterator<Item = &i32> {
        self.distances.iter()
    }
}

impl Default for RewardShaper {
    fn default() -> Self {
        Self::new(RewardConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(shaper: &mut RewardShaper, distances: &[i32]) -> Vec<f32> {
        distances
            .iter()
            .map(|&d| shaper.reward(EpisodeStatus::Running, 0, 0, d))
            .collect()
    }

    #[test]
    fn test_terminal_rewards() {
        let mut shaper = RewardShaper::default();
        assert_eq!(shaper.reward(EpisodeStatus::Collision, 3, 3, 5), -10.0);
        assert_eq!(shaper.reward(EpisodeStatus::Timeout, 3, 3, 5), -11.0);
        // A collision outranks a score increase.
        assert_eq!(shaper.reward(EpisodeStatus::Collision, 4, 3, 0), -10.0);
    }

    #[test]
    fn test_food_reward_resets_history() {
        let mut shaper = RewardShaper::default();
        feed(&mut shaper, &[8, 7, 6]);
        assert_eq!(shaper.reward(EpisodeStatus::Running, 1, 0, 12), 10.0);
        assert_eq!(shaper.history().copied().collect::<Vec<_>>(), vec![12]);
    }

    #[test]
    fn test_distance_trend() {
        let mut shaper = RewardShaper::default();
        // Not enough history for the first two steps.
        assert_eq!(feed(&mut shaper, &[10, 9, 8]), vec![0.0, 0.0, 1.0]);

        let mut shaper = RewardShaper::default();
        assert_eq!(feed(&mut shaper, &[5, 6, 7]), vec![0.0, 0.0, -1.0]);

        let mut shaper = RewardShaper::default();
        assert_eq!(feed(&mut shaper, &[5, 6, 5]), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_oscillation_penalty() {
        let mut shaper = RewardShaper::default();
        let rewards = feed(&mut shaper, &[5, 4, 5, 4]);
        assert_eq!(rewards[3], -11.0);
    }

    #[test]
    fn test_food_beats_oscillation() {
        let mut shaper = RewardShaper::default();
        feed(&mut shaper, &[5, 4, 5]);
        assert_eq!(shaper.reward(EpisodeStatus::Running, 1, 0, 4), 10.0);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut shaper = RewardShaper::default();
        feed(&mut shaper, &[9, 8, 7, 6, 5, 4]);
        assert_eq!(shaper.history().copied().collect::<Vec<_>>(), vec![7, 6, 5, 4]);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut shaper = RewardShaper::default();
        feed(&mut shaper, &[5, 4, 5]);
        shaper.reset();
        // A loop can no longer complete on the next step.
        assert_eq!(shaper.reward(EpisodeStatus::Running, 0, 0, 4), 0.0);
    }
}
