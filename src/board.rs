use std::fmt;
use std::sync::OnceLock;

use serde::{Serialize, Serializer};

pub const BOARD_ROWS: u8 = 8;
pub const BOARD_COLS: u8 = 10;
pub const BOARD_SIZE: u8 = BOARD_ROWS * BOARD_COLS;

pub fn numbers() -> impl Iterator<Item = u8> {
    1..=BOARD_SIZE
}

pub fn is_on_board(number: u8) -> bool {
    (1..=BOARD_SIZE).contains(&number)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct BoardPosition {
    pub row: u8,
    pub col: u8,
}

impl BoardPosition {
    pub fn number(&self) -> u8 {
        self.row * BOARD_COLS + self.col + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalBand {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalBand {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub vertical: VerticalBand,
    pub horizontal: HorizontalBand,
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vertical = match self.vertical {
            VerticalBand::Top => "Top",
            VerticalBand::Middle => "Middle",
            VerticalBand::Bottom => "Bottom",
        };
        let horizontal = match self.horizontal {
            HorizontalBand::Left => "Left",
            HorizontalBand::Center => "Center",
            HorizontalBand::Right => "Right",
        };
        write!(f, "{vertical}-{horizontal}")
    }
}

impl Serialize for Region {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug)]
pub struct BoardTopology {
    neighbors: Vec<Vec<u8>>,
}

impl BoardTopology {
    pub fn get() -> &'static BoardTopology {
        static TOPOLOGY: OnceLock<BoardTopology> = OnceLock::new();
        TOPOLOGY.get_or_init(BoardTopology::build)
    }

    fn build() -> Self {
        let neighbors = numbers().map(moore_neighbors).collect();
        Self { neighbors }
    }

    /// Empty for numbers off the board.
    pub fn neighbors(&self, number: u8) -> &[u8] {
        if !is_on_board(number) {
            return &[];
        }
        &self.neighbors[(number - 1) as usize]
    }
}

pub fn position(number: u8) -> BoardPosition {
    let n = number.saturating_sub(1);
    BoardPosition {
        row: n / BOARD_COLS,
        col: n % BOARD_COLS,
    }
}

pub fn neighbors(number: u8) -> &'static [u8] {
    BoardTopology::get().neighbors(number)
}

pub fn region(number: u8) -> Region {
    let pos = position(number);
    let vertical = match pos.row {
        0..=2 => VerticalBand::Top,
        3..=4 => VerticalBand::Middle,
        _ => VerticalBand::Bottom,
    };
    let horizontal = match pos.col {
        0..=3 => HorizontalBand::Left,
        4..=5 => HorizontalBand::Center,
        _ => HorizontalBand::Right,
    };
    Region {
        vertical,
        horizontal,
    }
}

fn moore_neighbors(number: u8) -> Vec<u8> {
    let pos = position(number);
    let (row, col) = (pos.row as i16, pos.col as i16);
    let mut out = Vec::with_capacity(8);
    for dr in -1..=1i16 {
        for dc in -1..=1i16 {
            if dr == 0 && dc == 0 {
                continue;
            }
            let (r, c) = (row + dr, col + dc);
            if (0..BOARD_ROWS as i16).contains(&r) && (0..BOARD_COLS as i16).contains(&c) {
                out.push((r * BOARD_COLS as i16 + c + 1) as u8);
            }
        }
    }
    out
}
