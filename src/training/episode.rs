use crate::ai::SnakeAgent;
use crate::game::{EpisodeStatus, SnakeEnvironment, StepResult};
use crate::training::replay_buffer::Transition;

/// Everything that happened during one training step.
#[derive(Debug, Clone, Copy)]
pub struct StepRecord {
    pub transition: Transition,
    pub result: StepResult,
    /// Loss of the short-memory update on this transition.
    pub loss: f32,
}

/// Observe, act, shape the reward, train on the step, and store it.
pub fn training_step<G: SnakeEnvironment>(agent: &mut SnakeAgent, game: &mut G) -> StepRecord {
    let state = agent.get_state(game);
    let old_score = game.score();
    let action = agent.get_action(&state);

    let result = game.play_step(action);
    let next_state = agent.get_state(game);
    let reward = agent.calculate_reward(
        result.status,
        result.score,
        old_score,
        game.food_distance(),
    );

    let transition = Transition {
        state,
        action,
        reward,
        next_state,
        done: result.done,
    };
    let metrics = agent.train_short_memory(&transition);
    agent.remember(transition);

    StepRecord {
        transition,
        result,
        loss: metrics.loss,
    }
}

/// Outcome of a game played without exploration or learning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreedyGame {
    pub score: u32,
    pub steps: usize,
    pub status: EpisodeStatus,
}

/// Reset `game` and play it to the end with greedy actions.
///
/// `on_frame` sees the game after the reset and after every step.
pub fn play_greedy_game<G, F>(agent: &SnakeAgent, game: &mut G, mut on_frame: F) -> GreedyGame
where
    G: SnakeEnvironment,
    F: FnMut(&G),
{
    game.reset();
    on_frame(game);

    let mut steps = 0;
    loop {
        let state = agent.get_state(game);
        let result = game.play_step(agent.greedy_action(&state));
        steps += 1;
        on_frame(game);

        if result.done {
            return GreedyGame {
                score: result.score,
                steps,
                status: result.status,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AgentConfig;
    use crate::game::{GameConfig, SnakeGame};

    fn test_agent(dir: &std::path::Path) -> SnakeAgent {
        SnakeAgent::with_seed(
            AgentConfig {
                hidden_size: 16,
                batch_size: 8,
                model_dir: dir.to_path_buf(),
                ..Default::default()
            },
            21,
        )
    }

    #[test]
    fn test_training_step_stores_transition() {
        let dir = tempfile::tempdir().unwrap();
        let mut agent = test_agent(dir.path());
        let mut game = SnakeGame::with_seed(GameConfig::small(), 3);

        let record = training_step(&mut agent, &mut game);

        assert_eq!(agent.memory().len(), 1);
        assert_eq!(agent.memory().iter().next(), Some(&record.transition));
        assert_eq!(record.transition.done, record.result.done);
        assert_eq!(agent.trainer().step_count(), 1);
        assert!(record.loss.is_finite());
    }

    #[test]
    fn test_training_step_collision_reward() {
        let dir = tempfile::tempdir().unwrap();
        let mut agent = test_agent(dir.path());
        let mut game = SnakeGame::with_seed(GameConfig::small(), 4);

        let mut record = training_step(&mut agent, &mut game);
        while !record.result.done {
            record = training_step(&mut agent, &mut game);
        }
        match record.result.status {
            EpisodeStatus::Collision => assert_eq!(record.transition.reward, -10.0),
            EpisodeStatus::Timeout => assert_eq!(record.transition.reward, -11.0),
            EpisodeStatus::Running => unreachable!(),
        }
    }

    #[test]
    fn test_play_greedy_game_terminates() {
        let dir = tempfile::tempdir().unwrap();
        let agent = test_agent(dir.path());
        let mut game = SnakeGame::with_seed(GameConfig::small(), 5);

        let mut frames = 0;
        let outcome = play_greedy_game(&agent, &mut game, |_| frames += 1);

        assert!(outcome.status.is_done());
        assert_eq!(frames, outcome.steps + 1);
        // Greedy play does not learn.
        assert_eq!(agent.trainer().step_count(), 0);
        assert!(agent.memory().is_empty());
    }
}
