use super::action::Direction;

/// A cell on the game grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbouring cell one step in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn manhattan_distance(self, other: Point) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// How the last step left the episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeStatus {
    Running,
    /// Hit a wall or the snake's own body.
    Collision,
    /// Frame budget ran out without a collision.
    Timeout,
}

impl EpisodeStatus {
    pub fn is_done(self) -> bool {
        !matches!(self, EpisodeStatus::Running)
    }
}

/// Outcome of a single `play_step`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    /// Raw game reward. The agent shapes its own reward on top of this.
    pub reward: f32,
    pub done: bool,
    pub score: u32,
    pub status: EpisodeStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_step() {
        let p = Point::new(5, 5);
        assert_eq!(p.step(Direction::Right), Point::new(6, 5));
        assert_eq!(p.step(Direction::Left), Point::new(4, 5));
        assert_eq!(p.step(Direction::Down), Point::new(5, 6));
        assert_eq!(p.step(Direction::Up), Point::new(5, 4));
    }

    #[test]
    fn test_manhattan_distance() {
        assert_eq!(Point::new(0, 0).manhattan_distance(Point::new(3, 4)), 7);
        assert_eq!(Point::new(3, 4).manhattan_distance(Point::new(0, 0)), 7);
        assert_eq!(Point::new(2, 2).manhattan_distance(Point::new(2, 2)), 0);
    }

    #[test]
    fn test_episode_status_done() {
        assert!(!EpisodeStatus::Running.is_done());
        assert!(EpisodeStatus::Collision.is_done());
        assert!(EpisodeStatus::Timeout.is_done());
    }
}
