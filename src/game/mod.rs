//! Headless Snake simulation: grid geometry, heading-relative actions, the
//! game engine, and a text renderer.

mod action;
mod config;
mod engine;
mod render;
mod state;

pub use action::{Action, Direction, NUM_ACTIONS};
pub use config::GameConfig;
pub use engine::SnakeGame;
pub use render::RenderContext;
pub use state::{EpisodeStatus, Point, StepResult};

/// The narrow view of a Snake game the agent trains against.
pub trait SnakeEnvironment {
    fn head(&self) -> Point;

    fn direction(&self) -> Direction;

    fn food(&self) -> Point;

    fn score(&self) -> u32;

    /// True if `point` is outside the grid or on the snake's body (head excluded).
    fn is_collision(&self, point: Point) -> bool;

    /// Advance one frame with a heading-relative action.
    fn play_step(&mut self, action: Action) -> StepResult;

    /// Start a new episode.
    fn reset(&mut self);

    /// Manhattan distance from the head to the food.
    fn food_distance(&self) -> i32 {
        self.head().manhattan_distance(self.food())
    }
}
