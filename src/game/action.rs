/// Absolute heading of the snake on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Headings in clockwise order, starting from Right.
    pub const CLOCKWISE: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    /// Grid delta (dx, dy) for one step. y grows downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    fn clockwise_index(self) -> usize {
        match self {
            Direction::Right => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Up => 3,
        }
    }

    /// Heading after a quarter turn clockwise.
    pub fn clockwise(self) -> Direction {
        Self::CLOCKWISE[(self.clockwise_index() + 1) % 4]
    }

    /// Heading after a quarter turn counter-clockwise.
    pub fn counter_clockwise(self) -> Direction {
        Self::CLOCKWISE[(self.clockwise_index() + 3) % 4]
    }

    /// Heading after applying a relative action.
    pub fn turned(self, action: Action) -> Direction {
        match action {
            Action::Straight => self,
            Action::Right => self.clockwise(),
            Action::Left => self.counter_clockwise(),
        }
    }
}

/// Number of relative actions the agent chooses from.
pub const NUM_ACTIONS: usize = 3;

/// Heading-relative move, encoded one-hot as `[straight, right, left]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Straight,
    Right,
    Left,
}

impl Action {
    pub const ALL: [Action; NUM_ACTIONS] = [Action::Straight, Action::Right, Action::Left];

    /// Position of the "1" in the one-hot encoding.
    pub fn index(self) -> usize {
        match self {
            Action::Straight => 0,
            Action::Right => 1,
            Action::Left => 2,
        }
    }

    /// Inverse of [`Action::index`]. Returns `None` for indices >= 3.
    pub fn from_index(index: usize) -> Option<Action> {
        Self::ALL.get(index).copied()
    }

    pub fn one_hot(self) -> [u8; NUM_ACTIONS] {
        let mut encoded = [0u8; NUM_ACTIONS];
        encoded[self.index()] = 1;
        encoded
    }
}
