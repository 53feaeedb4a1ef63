use std::fmt::Write;

use super::engine::SnakeGame;
use super::SnakeEnvironment;

/// Text renderer state, built once and passed to every draw call.
pub struct RenderContext {
    frame: String,
    frames_drawn: u64,
}

impl RenderContext {
    pub fn new() -> Self {
        RenderContext {
            frame: String::new(),
            frames_drawn: 0,
        }
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Draw the board into the internal buffer and return it.
    ///
    /// `@` is the head, `o` the body, `*` the food, `#` the walls.
    pub fn render(&mut self, game: &SnakeGame) -> &str {
        let width = game.width();
        let height = game.height();
        let mut grid = vec![vec![' '; width]; height];

        let food = game.food();
        if let Some(cell) = cell_mut(&mut grid, food.x, food.y) {
            *cell = '*';
        }
        for (i, p) in game.body().enumerate() {
            if let Some(cell) = cell_mut(&mut grid, p.x, p.y) {
                *cell = if i == 0 { '@' } else { 'o' };
            }
        }

        self.frame.clear();
        let border = "#".repeat(width + 2);
        let _ = writeln!(self.frame, "{border}");
        for row in &grid {
            self.frame.push('#');
            self.frame.extend(row.iter());
            self.frame.push('#');
            self.frame.push('\n');
        }
        let _ = writeln!(self.frame, "{border}");
        let _ = writeln!(
            self.frame,
            "Score: {}  Best: {}",
            game.score(),
            game.best_score()
        );

        self.frames_drawn += 1;
        &self.frame
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_mut(grid: &mut [Vec<char>], x: i32, y: i32) -> Option<&mut char> {
    if x < 0 || y < 0 {
        return None;
    }
    grid.get_mut(y as usize)?.get_mut(x as usize)
}
