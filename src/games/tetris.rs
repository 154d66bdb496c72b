//! Tetris
//!
//! Discrete 10×20 well on a gravity interval. Pieces come from a 7-bag,
//! rotate through index remaps of one canonical 4×4 matrix with horizontal
//! wall kicks, and lock when they cannot fall further.

use glam::Vec2;

use super::{Cadence, Game, GameKind};
use crate::consts::WORLD_WIDTH;
use crate::highscores::{BestScore, Scoreboard};
use crate::input::{Direction, Intent};
use crate::renderer::{Color, Scene};
use crate::sim::{RandomSource, Status, shuffle};
use crate::tuning::TetrisTuning;

pub const COLS: usize = 10;
pub const ROWS: usize = 20;
pub const CELL_SIZE: f32 = 24.0;
pub const BOARD_WIDTH: f32 = COLS as f32 * CELL_SIZE;
pub const BOARD_HEIGHT: f32 = ROWS as f32 * CELL_SIZE;
pub const BOARD_X: f32 = (WORLD_WIDTH - BOARD_WIDTH) / 2.0;
pub const BOARD_Y: f32 = 90.0;

const SPAWN_ROW: i32 = -1;
const SPAWN_COL: i32 = 3;
const KICKS: [i32; 5] = [0, -1, 1, -2, 2];
const LINE_POINTS: [u32; 5] = [0, 100, 300, 500, 800];
const PREVIEW_CELL: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Canonical occupancy in a 4×4 frame, rows top to bottom
    pub fn matrix(self) -> [[u8; 4]; 4] {
        match self {
            PieceKind::I => [[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]],
            PieceKind::J => [[1, 0, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            PieceKind::L => [[0, 0, 1, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            PieceKind::O => [[0, 1, 1, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            PieceKind::S => [[0, 1, 1, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            PieceKind::T => [[0, 1, 0, 0], [1, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            PieceKind::Z => [[1, 1, 0, 0], [0, 1, 1, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        }
    }

    pub fn color(self) -> Color {
        match self {
            PieceKind::I => Color::hex(0x3ad9ff),
            PieceKind::J => Color::hex(0x5d86ff),
            PieceKind::L => Color::hex(0xff9d4d),
            PieceKind::O => Color::hex(0xffde59),
            PieceKind::S => Color::hex(0x58f08d),
            PieceKind::T => Color::hex(0xbe6bff),
            PieceKind::Z => Color::hex(0xff6a7e),
        }
    }

    pub fn letter(self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::J => "J",
            PieceKind::L => "L",
            PieceKind::O => "O",
            PieceKind::S => "S",
            PieceKind::T => "T",
            PieceKind::Z => "Z",
        }
    }
}

/// Occupied `(row, col)` offsets inside the 4×4 frame after `rotation` quarter turns
pub fn rotated_cells(kind: PieceKind, rotation: u8) -> [(i32, i32); 4] {
    let mut cells = [(0, 0); 4];
    let mut n = 0;
    for (r, row) in kind.matrix().iter().enumerate() {
        for (c, &filled) in row.iter().enumerate() {
            if filled == 0 || n == cells.len() {
                continue;
            }
            let (r, c) = (r as i32, c as i32);
            cells[n] = match rotation % 4 {
                0 => (r, c),
                1 => (c, 3 - r),
                2 => (3 - r, 3 - c),
                _ => (3 - c, r),
            };
            n += 1;
        }
    }
    cells
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    /// Top-left of the 4×4 frame; may be negative while entering the well
    pub row: i32,
    pub col: i32,
    pub rotation: u8,
}

impl Piece {
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            row: SPAWN_ROW,
            col: SPAWN_COL,
            rotation: 0,
        }
    }

    /// Absolute `(row, col)` cells on the board
    pub fn cells(&self) -> [(i32, i32); 4] {
        rotated_cells(self.kind, self.rotation).map(|(r, c)| (self.row + r, self.col + c))
    }

    pub fn shifted(self, rows: i32, cols: i32) -> Self {
        Self {
            row: self.row + rows,
            col: self.col + cols,
            ..self
        }
    }

    pub fn rotated(self) -> Self {
        Self {
            rotation: (self.rotation + 1) % 4,
            ..self
        }
    }
}

/// The settled cells of the well
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub cells: [[Option<PieceKind>; COLS]; ROWS],
}

impl Default for Board {
    fn default() -> Self {
        Self {
            cells: [[None; COLS]; ROWS],
        }
    }
}

impl Board {
    pub fn get(&self, row: usize, col: usize) -> Option<PieceKind> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// Side walls and floor are solid; the space above row 0 is open
    pub fn collides(&self, piece: &Piece) -> bool {
        piece.cells().iter().any(|&(row, col)| {
            if col < 0 || col >= COLS as i32 || row >= ROWS as i32 {
                return true;
            }
            row >= 0 && self.cells[row as usize][col as usize].is_some()
        })
    }

    /// Settle `piece`; returns true if any of its cells sat above the well
    pub fn merge(&mut self, piece: &Piece) -> bool {
        let mut overflow = false;
        for (row, col) in piece.cells() {
            if row < 0 {
                overflow = true;
                continue;
            }
            if let Some(slot) = self
                .cells
                .get_mut(row as usize)
                .and_then(|r| r.get_mut(col as usize))
            {
                *slot = Some(piece.kind);
            }
        }
        overflow
    }

    pub fn is_row_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(Option::is_some)
    }

    /// Remove full rows, shifting the rest down; returns how many went
    pub fn clear_lines(&mut self) -> u32 {
        let kept: Vec<[Option<PieceKind>; COLS]> = self
            .cells
            .iter()
            .filter(|row| row.iter().any(Option::is_none))
            .copied()
            .collect();
        let cleared = ROWS - kept.len();
        if cleared == 0 {
            return 0;
        }
        let mut next = [[None; COLS]; ROWS];
        next[cleared..].copy_from_slice(&kept);
        self.cells = next;
        cleared as u32
    }
}

/// Points for clearing `lines` at once at `level`
pub fn line_points(lines: u32, level: u32) -> u32 {
    LINE_POINTS.get(lines as usize).copied().unwrap_or(0) * level
}

/// 7-bag randomiser
#[derive(Debug, Clone, Default)]
pub struct Bag {
    pending: Vec<PieceKind>,
}

impl Bag {
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn refill(&mut self, rng: &mut dyn RandomSource) {
        let mut fresh = PieceKind::ALL;
        shuffle(rng, &mut fresh);
        self.pending = fresh.to_vec();
    }

    pub fn draw(&mut self, rng: &mut dyn RandomSource) -> PieceKind {
        if self.pending.is_empty() {
            self.refill(rng);
        }
        self.pending.remove(0)
    }
}

pub struct Tetris {
    pub tuning: TetrisTuning,
    pub status: Status,
    pub board: Scoreboard,
    pub well: Board,
    pub active: Option<Piece>,
    pub next: PieceKind,
    pub bag: Bag,
    pub lines: u32,
    pub level: u32,
    rng: Box<dyn RandomSource>,
}

impl Tetris {
    pub fn new(tuning: TetrisTuning, rng: Box<dyn RandomSource>, best: BestScore) -> Self {
        Self {
            tuning,
            status: Status::Ready,
            board: Scoreboard::new(best),
            well: Board::default(),
            active: None,
            next: PieceKind::T,
            bag: Bag::default(),
            lines: 0,
            level: 1,
            rng,
        }
    }

    pub fn start(&mut self) {
        self.well = Board::default();
        self.bag.refill(self.rng.as_mut());
        let first = self.bag.draw(self.rng.as_mut());
        self.next = self.bag.draw(self.rng.as_mut());
        self.lines = 0;
        self.level = 1;
        self.board.reset();
        self.status = Status::Playing;
        log::info!("Tetris: start");

        let piece = Piece::spawn(first);
        if self.well.collides(&piece) {
            self.game_over();
            return;
        }
        self.active = Some(piece);
    }

    fn game_over(&mut self) {
        self.status = Status::GameOver;
        self.active = None;
        self.board.finalize();
        log::info!(
            "Tetris: stack over, score {} after {} lines",
            self.board.score,
            self.lines
        );
    }

    /// Bring in the previewed piece; colliding at spawn ends the run
    fn spawn_next(&mut self) {
        let piece = Piece::spawn(self.next);
        self.next = self.bag.draw(self.rng.as_mut());
        if self.well.collides(&piece) {
            self.game_over();
            return;
        }
        self.active = Some(piece);
    }

    /// Move the active piece if the target is free
    pub fn try_move(&mut self, rows: i32, cols: i32) -> bool {
        if !self.status.is_playing() {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };
        let candidate = piece.shifted(rows, cols);
        if self.well.collides(&candidate) {
            return false;
        }
        self.active = Some(candidate);
        true
    }

    /// Quarter turn with horizontal kicks; unchanged if every kick collides
    pub fn rotate(&mut self) -> bool {
        if !self.status.is_playing() {
            return false;
        }
        let Some(piece) = self.active else {
            return false;
        };
        let turned = piece.rotated();
        let kicked = KICKS
            .iter()
            .map(|&offset| turned.shifted(0, offset))
            .find(|candidate| !self.well.collides(candidate));
        match kicked {
            Some(candidate) => {
                self.active = Some(candidate);
                true
            }
            None => false,
        }
    }

    pub fn hard_drop(&mut self) {
        if !self.status.is_playing() {
            return;
        }
        while self.try_move(1, 0) {}
        self.lock();
    }

    /// Gravity tick: fall one row or lock in place
    pub fn drop_step(&mut self) {
        if !self.try_move(1, 0) {
            self.lock();
        }
    }

    fn lock(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };
        if self.well.merge(&piece) {
            self.game_over();
            return;
        }

        let cleared = self.well.clear_lines();
        if cleared > 0 {
            let points = line_points(cleared, self.level);
            self.lines += cleared;
            self.level = self.tuning.level(self.lines);
            self.board.award(points);
            log::debug!("Tetris: cleared {cleared} for {points}");
        }
        self.spawn_next();
    }

    /// Where the active piece would come to rest
    pub fn landing(&self) -> Option<Piece> {
        let mut piece = self.active?;
        while !self.well.collides(&piece.shifted(1, 0)) {
            piece = piece.shifted(1, 0);
        }
        Some(piece)
    }

    fn paint_cell(scene: &mut Scene, origin: Vec2, size: f32, row: i32, col: i32, color: Color) {
        scene.fill_rect(
            origin.x + col as f32 * size + 1.0,
            origin.y + row as f32 * size + 1.0,
            size - 2.0,
            size - 2.0,
            color,
        );
    }
}

impl Game for Tetris {
    fn kind(&self) -> GameKind {
        GameKind::Tetris
    }

    fn status(&self) -> Status {
        self.status
    }

    fn score(&self) -> u32 {
        self.board.score
    }

    fn best(&self) -> u32 {
        self.board.best()
    }

    fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::Move(Direction::Left) => {
                self.try_move(0, -1);
            }
            Intent::Move(Direction::Right) => {
                self.try_move(0, 1);
            }
            Intent::Move(Direction::Down) => {
                self.try_move(1, 0);
            }
            Intent::Move(Direction::Up) | Intent::Rotate => {
                self.rotate();
            }
            Intent::Primary => match self.status {
                Status::Playing => self.hard_drop(),
                Status::Paused => self.status = Status::Playing,
                Status::Ready | Status::GameOver => self.start(),
            },
            Intent::Confirm if self.status.is_idle() => self.start(),
            Intent::Restart => self.start(),
            Intent::Pause => self.status = self.status.toggle_pause(),
            _ => {}
        }
    }

    fn advance(&mut self, _dt: f32) {
        if self.status.is_playing() {
            self.drop_step();
        }
    }

    fn cadence(&self) -> Cadence {
        Cadence::Interval {
            ms: self.tuning.drop_interval_ms(self.level),
        }
    }

    fn stats(&self) -> Vec<(&'static str, String)> {
        vec![
            ("lines", self.lines.to_string()),
            ("level", self.level.to_string()),
            ("next", self.next.letter().to_string()),
        ]
    }

    fn paint(&self, scene: &mut Scene) {
        scene.background(Color::hex(0x070d14));
        scene.fill_rect(
            BOARD_X,
            BOARD_Y,
            BOARD_WIDTH,
            BOARD_HEIGHT,
            Color::rgba(4, 12, 22, 0.86),
        );

        let origin = Vec2::new(BOARD_X, BOARD_Y);
        for (r, row) in self.well.cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if let Some(kind) = cell {
                    Self::paint_cell(scene, origin, CELL_SIZE, r as i32, c as i32, kind.color());
                }
            }
        }

        if let Some(piece) = self.active {
            for (row, col) in piece.cells() {
                if row >= 0 {
                    Self::paint_cell(scene, origin, CELL_SIZE, row, col, piece.kind.color());
                }
            }
        }

        let grid = Color::rgba(127, 255, 243, 0.11);
        for x in 0..=COLS {
            let at = BOARD_X + x as f32 * CELL_SIZE;
            scene.line(Vec2::new(at, BOARD_Y), Vec2::new(at, BOARD_Y + BOARD_HEIGHT), grid, 1.0);
        }
        for y in 0..=ROWS {
            let at = BOARD_Y + y as f32 * CELL_SIZE;
            scene.line(Vec2::new(BOARD_X, at), Vec2::new(BOARD_X + BOARD_WIDTH, at), grid, 1.0);
        }
        scene.stroke_rect(
            BOARD_X + 0.5,
            BOARD_Y + 0.5,
            BOARD_WIDTH - 1.0,
            BOARD_HEIGHT - 1.0,
            Color::rgba(97, 216, 255, 0.34),
            2.0,
        );

        // Next piece, top right above the well
        if self.status != Status::Ready {
            let preview = Vec2::new(BOARD_X + BOARD_WIDTH - 4.0 * PREVIEW_CELL, 24.0);
            for (row, col) in rotated_cells(self.next, 0) {
                Self::paint_cell(scene, preview, PREVIEW_CELL, row, col, self.next.color());
            }
        }
    }
}
