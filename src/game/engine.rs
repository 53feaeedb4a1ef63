use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::action::{Action, Direction};
use super::config::GameConfig;
use super::state::{EpisodeStatus, Point, StepResult};
use super::SnakeEnvironment;

/// Headless Snake simulation driven by heading-relative actions.
pub struct SnakeGame {
    config: GameConfig,
    /// Body segments, head at the front.
    snake: VecDeque<Point>,
    direction: Direction,
    food: Point,
    score: u32,
    best_score: u32,
    frame_iteration: usize,
    rng: StdRng,
}

impl SnakeGame {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Deterministic food placement for tests and reproducible runs.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        let mut game = SnakeGame {
            config,
            snake: VecDeque::new(),
            direction: Direction::Right,
            food: Point::new(0, 0),
            score: 0,
            best_score: 0,
            frame_iteration: 0,
            rng,
        };
        game.reset();
        game
    }

    pub fn width(&self) -> usize {
        self.config.grid_width
    }

    pub fn height(&self) -> usize {
        self.config.grid_height
    }

    /// Body segments, head first.
    pub fn body(&self) -> impl Iterator<Item = &Point> {
        self.snake.iter()
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snake.is_empty()
    }

    /// Best score over all episodes played on this instance.
    pub fn best_score(&self) -> u32 {
        self.best_score.max(self.score)
    }

    pub fn frame_iteration(&self) -> usize {
        self.frame_iteration
    }

    /// Place food at a fixed cell. Used to script scenarios in tests.
    pub fn set_food(&mut self, food: Point) {
        self.food = food;
    }

    fn is_in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.x < self.config.grid_width as i32
            && point.y >= 0
            && point.y < self.config.grid_height as i32
    }

    fn place_food(&mut self) {
        let free: Vec<Point> = (0..self.config.grid_height as i32)
            .flat_map(|y| (0..self.config.grid_width as i32).map(move |x| Point::new(x, y)))
            .filter(|p| !self.snake.contains(p))
            .collect();
        // A full board leaves nowhere to put food; the head keeps it out of reach.
        self.food = if free.is_empty() {
            self.head()
        } else {
            free[self.rng.random_range(0..free.len())]
        };
    }
}

impl SnakeEnvironment for SnakeGame {
    fn head(&self) -> Point {
        self.snake[0]
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn food(&self) -> Point {
        self.food
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn is_collision(&self, point: Point) -> bool {
        !self.is_in_bounds(point) || self.snake.iter().skip(1).any(|p| *p == point)
    }

    fn play_step(&mut self, action: Action) -> StepResult {
        self.frame_iteration += 1;

        self.direction = self.direction.turned(action);
        let new_head = self.head().step(self.direction);
        self.snake.push_front(new_head);

        let status = if self.is_collision(new_head) {
            EpisodeStatus::Collision
        } else if self.frame_iteration > self.config.frame_timeout_multiplier * self.snake.len()
        {
            EpisodeStatus::Timeout
        } else {
            EpisodeStatus::Running
        };

        if status.is_done() {
            return StepResult {
                reward: self.config.collision_penalty,
                done: true,
                score: self.score,
                status,
            };
        }

        let mut reward = 0.0;
        if new_head == self.food {
            self.score += 1;
            reward = self.config.food_reward;
            self.place_food();
        } else {
            self.snake.pop_back();
        }

        StepResult {
            reward,
            done: false,
            score: self.score,
            status,
        }
    }

    fn reset(&mut self) {
        self.best_score = self.best_score.max(self.score);
        self.score = 0;
        self.frame_iteration = 0;
        self.direction = Direction::Right;

        let head = Point::new(
            (self.config.grid_width / 2) as i32,
            (self.config.grid_height / 2) as i32,
        );
        self.snake = (0..self.config.initial_snake_length.max(1) as i32)
            .map(|i| Point::new(head.x - i, head.y))
            .collect();
        self.place_food();
    }
}
