use burn::prelude::*;
use burn::tensor::TensorData;

use crate::game::{Direction, Point, SnakeEnvironment};

/// Number of features in an encoded state.
pub const STATE_SIZE: usize = 11;

/// Binary feature vector describing the game from the snake's point of view.
///
/// ```text
/// [0..3)   danger straight, right, left (relative to the heading)
/// [3..7)   moving left, right, up, down
/// [7..11)  food left, right, up, down (relative to the head)
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector([f32; STATE_SIZE]);

impl StateVector {
    pub fn from_flags(flags: [bool; STATE_SIZE]) -> Self {
        StateVector(flags.map(|f| if f { 1.0 } else { 0.0 }))
    }

    pub fn features(&self) -> &[f32; STATE_SIZE] {
        &self.0
    }

    pub fn zeros() -> Self {
        StateVector([0.0; STATE_SIZE])
    }
}

/// Encode the observables of a game into a [`StateVector`].
///
/// `is_collision` answers whether a cell is a wall or part of the body.
pub fn encode(
    head: Point,
    direction: Direction,
    food: Point,
    is_collision: impl Fn(Point) -> bool,
) -> StateVector {
    let danger_straight = is_collision(head.step(direction));
    let danger_right = is_collision(head.step(direction.clockwise()));
    let danger_left = is_collision(head.step(direction.counter_clockwise()));

    StateVector::from_flags([
        danger_straight,
        danger_right,
        danger_left,
        direction == Direction::Left,
        direction == Direction::Right,
        direction == Direction::Up,
        direction == Direction::Down,
        food.x < head.x,
        food.x > head.x,
        food.y < head.y,
        food.y > head.y,
    ])
}

/// Encode the current state of any [`SnakeEnvironment`].
pub fn encode_game<G: SnakeEnvironment + ?Sized>(game: &G) -> StateVector {
    encode(game.head(), game.direction(), game.food(), |p| {
        game.is_collision(p)
    })
}

/// Encode a single state as a tensor of shape [1, 11].
pub fn state_to_tensor<B: Backend>(state: &StateVector, device: &B::Device) -> Tensor<B, 2> {
    states_to_tensor(std::slice::from_ref(state), device)
}

/// Stack states into a tensor of shape [n, 11].
pub fn states_to_tensor<B: Backend>(states: &[StateVector], device: &B::Device) -> Tensor<B, 2> {
    let mut flat = Vec::with_capacity(states.len() * STATE_SIZE);
    for state in states {
        flat.extend_from_slice(state.features());
    }
    Tensor::from_data(TensorData::new(flat, [states.len(), STATE_SIZE]), device)
}
