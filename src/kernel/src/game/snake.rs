//! Turn-based snake.
//!
//! The snake advances one cell per direction key, so the game runs entirely
//! off keyboard interrupts and needs no timer.

use crate::terminal::{ConsoleWriter, Foreground, KeyOutcome};
use core::fmt::Write;
use log::debug;
use serpent_hal::Console;

/// Board width including walls.
pub const WIDTH: i32 = 30;

/// Board height including walls.
pub const HEIGHT: i32 = 15;

/// Longest snake the board keeps track of.
pub const MAX_LENGTH: usize = 100;

const WALL: char = '#';
const HEAD: char = 'O';
const BODY: char = 'o';
const FOOD: char = '@';
const EMPTY: char = ' ';

const POINTS_PER_FOOD: u32 = 10;
const SEED: u32 = 12345;

/// A board cell.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Point {
    const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }

    fn is_wall(self) -> bool {
        self.x <= 0 || self.x >= WIDTH - 1 || self.y <= 0 || self.y >= HEIGHT - 1
    }

    fn step(self, direction: Direction) -> Self {
        match direction {
            Direction::Up => Point::new(self.x, self.y - 1),
            Direction::Right => Point::new(self.x + 1, self.y),
            Direction::Down => Point::new(self.x, self.y + 1),
            Direction::Left => Point::new(self.x - 1, self.y),
        }
    }
}

/// Heading of the snake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Towards the last column.
    Right,
    /// Towards the last row.
    Down,
    /// Towards column 0.
    Left,
}

impl Direction {
    fn from_key(key: char) -> Option<Self> {
        match key {
            'w' => Some(Direction::Up),
            'd' => Some(Direction::Right),
            's' => Some(Direction::Down),
            'a' => Some(Direction::Left),
            _ => None,
        }
    }

    fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }
}

/// Linear congruential generator for food placement.
struct Lcg(u32);

impl Lcg {
    fn next_below(&mut self, max: u32) -> u32 {
        self.0 = self.0.wrapping_mul(1_103_515_245).wrapping_add(12345) & 0x7fff_ffff;
        self.0 % max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Welcome screen shown, waiting for the first key.
    Waiting,
    Running,
    Over,
}

/// The game state.
pub struct Snake {
    body: [Point; MAX_LENGTH],
    len: usize,
    direction: Direction,
    food: Point,
    score: u32,
    rng: Lcg,
    state: State,
}

impl Snake {
    /// Creates a game; nothing is placed until [`Foreground::start`].
    pub const fn new() -> Self {
        Snake {
            body: [Point::new(0, 0); MAX_LENGTH],
            len: 0,
            direction: Direction::Right,
            food: Point::new(0, 0),
            score: 0,
            rng: Lcg(SEED),
            state: State::Over,
        }
    }

    /// Position of the head.
    pub fn head(&self) -> Point {
        self.body[0]
    }

    /// Occupied cells, head first.
    pub fn body(&self) -> &[Point] {
        &self.body[..self.len]
    }

    /// Current food cell.
    pub fn food(&self) -> Point {
        self.food
    }

    /// Current heading.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Current score.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Returns `true` after a collision, until restart.
    pub fn is_over(&self) -> bool {
        self.state == State::Over
    }

    /// Returns `true` while the welcome screen waits for a key.
    pub fn is_waiting(&self) -> bool {
        self.state == State::Waiting
    }

    fn reset(&mut self) {
        self.len = 1;
        self.body[0] = Point::new(WIDTH / 2, HEIGHT / 2);
        self.direction = Direction::Right;
        self.score = 0;
        self.state = State::Waiting;
        self.place_food();
    }

    fn place_food(&mut self) {
        loop {
            let x = self.rng.next_below((WIDTH - 2) as u32) as i32 + 1;
            let y = self.rng.next_below((HEIGHT - 2) as u32) as i32 + 1;
            let candidate = Point::new(x, y);
            if !self.body().contains(&candidate) {
                self.food = candidate;
                return;
            }
        }
    }

    /// Moves one cell in the current direction.
    fn advance(&mut self, console: &mut dyn Console) -> KeyOutcome {
        let head = self.head().step(self.direction);
        let tail = self.body[self.len - 1];

        for i in (1..self.len).rev() {
            self.body[i] = self.body[i - 1];
        }
        self.body[0] = head;

        if head.is_wall() || self.body[1..self.len].contains(&head) {
            self.state = State::Over;
            debug!("snake: collision at ({}, {}), score {}", head.x, head.y, self.score);
            self.render(console);
            console.write_str("game over! press r to restart or q to quit\n");
            return KeyOutcome::Continue;
        }

        if head == self.food {
            self.score += POINTS_PER_FOOD;
            self.body[self.len] = tail;
            self.len += 1;
            if self.len >= MAX_LENGTH {
                self.render(console);
                console.write_str("You win! The snake can't grow anymore!\n");
                return KeyOutcome::Terminal;
            }
            self.place_food();
        }

        self.render(console);
        KeyOutcome::Continue
    }

    fn cell(&self, point: Point) -> char {
        if point.is_wall() {
            WALL
        } else if point == self.head() {
            HEAD
        } else if self.body()[1..].contains(&point) {
            BODY
        } else if point == self.food {
            FOOD
        } else {
            EMPTY
        }
    }

    fn welcome(&self, console: &mut dyn Console) {
        console.clear();
        console.write_str("Welcome to the snake game!\n");
        console.write_str("Press 'q' to quit the game.\n");
        console.write_str("Press 'w' (up), 'a' (left), 's' (down), 'd' (right) to move.\n");
        console.write_str("Press any key to start the game.\n");
    }

    /// Draws the board, score and controls.
    fn render(&self, console: &mut dyn Console) {
        console.clear();
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                console.write_char(self.cell(Point::new(x, y)));
            }
            console.write_char('\n');
        }
        let _ = write!(ConsoleWriter::new(console), "\nScore: {}\n", self.score);
        console.write_str("Controls: W (up), A (left), S (down), D (right), Q (quit)\n");
        console.write_str("Movement: Snake only moves when you press a key\n");
    }
}

impl Default for Snake {
    fn default() -> Self {
        Self::new()
    }
}

impl Foreground for Snake {
    fn start(&mut self, console: &mut dyn Console) {
        self.reset();
        self.welcome(console);
    }

    fn on_key(&mut self, key: char, console: &mut dyn Console) -> KeyOutcome {
        // Controls ignore shift and caps lock.
        let key = key.to_ascii_lowercase();
        if key == 'q' {
            console.clear();
            console.write_str("you quit the game!\n");
            console.write_str("returning to shell...\n");
            return KeyOutcome::QuitRequested;
        }

        if self.is_waiting() {
            self.state = State::Running;
            self.render(console);
            return KeyOutcome::Continue;
        }

        if self.is_over() {
            return if key == 'r' {
                KeyOutcome::RestartRequested
            } else {
                KeyOutcome::Continue
            };
        }

        match Direction::from_key(key) {
            Some(direction) if direction != self.direction.opposite() => {
                self.direction = direction;
                self.advance(console)
            }
            _ => KeyOutcome::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockConsole;

    fn started() -> (Snake, MockConsole) {
        let mut game = Snake::new();
        let mut console = MockConsole::default();
        game.start(&mut console);
        assert_eq!(game.on_key(' ', &mut console), KeyOutcome::Continue);
        (game, console)
    }

    #[test]
    fn test_start_shows_welcome_until_a_key() {
        let mut game = Snake::new();
        let mut console = MockConsole::default();
        game.start(&mut console);
        assert!(game.is_waiting());
        assert!(console.output.starts_with("Welcome to the snake game!\n"));
        assert!(console.output.ends_with("Press any key to start the game.\n"));
        assert!(!console.output.contains("Score:"));

        console.output.clear();
        assert_eq!(game.on_key('w', &mut console), KeyOutcome::Continue);
        assert!(!game.is_waiting());
        // The first key only starts the round.
        assert_eq!(game.head(), Point::new(15, 7));
        assert!(console.output.starts_with("##############################\n"));
        assert!(console.output.contains("Score: 0"));
        assert_eq!(console.clears, 2);
    }

    #[test]
    fn test_start_places_snake_and_food() {
        let (game, _) = started();
        assert_eq!(game.head(), Point::new(15, 7));
        assert_eq!(game.body().len(), 1);
        assert!(!game.food().is_wall());
        assert_ne!(game.food(), game.head());
    }

    #[test]
    fn test_quit_from_welcome_screen() {
        let mut game = Snake::new();
        let mut console = MockConsole::default();
        game.start(&mut console);
        assert_eq!(game.on_key('q', &mut console), KeyOutcome::QuitRequested);
    }

    #[test]
    fn test_controls_ignore_case() {
        let (mut game, mut console) = started();
        game.food = Point::new(1, 1);
        game.on_key('W', &mut console);
        assert_eq!(game.head(), Point::new(15, 6));
        assert_eq!(game.on_key('Q', &mut console), KeyOutcome::QuitRequested);
    }

    #[test]
    fn test_move_and_reverse_is_ignored() {
        let (mut game, mut console) = started();
        game.food = Point::new(1, 1);

        assert_eq!(game.on_key('d', &mut console), KeyOutcome::Continue);
        assert_eq!(game.head(), Point::new(16, 7));

        assert_eq!(game.on_key('a', &mut console), KeyOutcome::Continue);
        assert_eq!(game.head(), Point::new(16, 7));
        assert_eq!(game.direction(), Direction::Right);

        game.on_key('w', &mut console);
        assert_eq!(game.head(), Point::new(16, 6));
    }

    #[test]
    fn test_eating_grows() {
        let (mut game, mut console) = started();
        game.food = Point::new(16, 7);
        game.on_key('d', &mut console);
        assert_eq!(game.score(), 10);
        assert_eq!(game.body(), [Point::new(16, 7), Point::new(15, 7)]);
        assert_ne!(game.food(), Point::new(16, 7));
    }

    #[test]
    fn test_wall_collision_then_restart() {
        let (mut game, mut console) = started();
        game.food = Point::new(1, 1);
        for _ in 0..7 {
            assert_eq!(game.on_key('w', &mut console), KeyOutcome::Continue);
        }
        assert!(game.is_over());
        assert!(console.output.contains("game over!"));
        assert_eq!(game.on_key('w', &mut console), KeyOutcome::Continue);
        assert_eq!(game.on_key('R', &mut console), KeyOutcome::RestartRequested);

        game.start(&mut console);
        assert!(!game.is_over());
        assert!(game.is_waiting());
        assert_eq!(game.head(), Point::new(15, 7));
    }

    #[test]
    fn test_quit() {
        let (mut game, mut console) = started();
        assert_eq!(game.on_key('q', &mut console), KeyOutcome::QuitRequested);
        assert!(console.output.ends_with("returning to shell...\n"));
    }

    #[test]
    fn test_other_keys_are_ignored() {
        let (mut game, mut console) = started();
        let head = game.head();
        assert_eq!(game.on_key('x', &mut console), KeyOutcome::Continue);
        assert_eq!(game.on_key('r', &mut console), KeyOutcome::Continue);
        assert_eq!(game.head(), head);
    }

    #[test]
    fn test_food_stays_inside_walls() {
        let mut game = Snake::new();
        game.reset();
        for _ in 0..200 {
            game.place_food();
            let food = game.food();
            assert!(food.x >= 1 && food.x <= WIDTH - 2);
            assert!(food.y >= 1 && food.y <= HEIGHT - 2);
        }
    }
}
