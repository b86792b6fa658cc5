use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};


pub const NUM_ROWS: u8 = 8;
pub const NUM_COLS: u8 = 8;
pub const NUM_SQUARES: usize = NUM_ROWS as usize * NUM_COLS as usize;


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Row {
    idx: u8, // 0-based
}

impl Row {
    pub fn from_zero_based(idx: u8) -> Option<Self> {
        (idx < NUM_ROWS).then_some(Self { idx })
    }
    pub fn from_algebraic(ch: char) -> Option<Self> {
        let idx = (ch as u32).checked_sub('1' as u32)?;
        Self::from_zero_based(u8::try_from(idx).ok()?)
    }
    pub fn to_zero_based(self) -> u8 { self.idx }
    pub fn to_algebraic(self) -> char { (self.idx + b'1') as char }
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + Clone {
        (0..NUM_ROWS).map(|idx| Self { idx })
    }
}


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Col {
    idx: u8, // 0-based
}

impl Col {
    pub fn from_zero_based(idx: u8) -> Option<Self> {
        (idx < NUM_COLS).then_some(Self { idx })
    }
    pub fn from_algebraic(ch: char) -> Option<Self> {
        let idx = (ch as u32).checked_sub('a' as u32)?;
        Self::from_zero_based(u8::try_from(idx).ok()?)
    }
    pub fn to_zero_based(self) -> u8 { self.idx }
    pub fn to_algebraic(self) -> char { (self.idx + b'a') as char }
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + Clone {
        (0..NUM_COLS).map(|idx| Self { idx })
    }
}


// A board square. Ordered rank-first, so sorted squares read a1, b1, ..., h8.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub row: Row,
    pub col: Col,
}

impl Coord {
    pub const fn new(row: Row, col: Col) -> Self { Self { row, col } }

    // Accepts "e4" and "E4". Anything else, including surrounding garbage, is rejected.
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let (col, row) = s.trim().chars().collect_tuple()?;
        Some(Coord {
            row: Row::from_algebraic(row)?,
            col: Col::from_algebraic(col.to_ascii_lowercase())?,
        })
    }

    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.col.to_algebraic(), self.row.to_algebraic())
    }

    // Dense index in 0..NUM_SQUARES, used to address per-square storage.
    pub fn to_index(self) -> usize {
        usize::from(self.row.to_zero_based()) * usize::from(NUM_COLS)
            + usize::from(self.col.to_zero_based())
    }

    pub fn all() -> impl Iterator<Item = Coord> {
        Row::all().cartesian_product(Col::all()).map(|(row, col)| Coord { row, col })
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({}{})", self.col.to_algebraic(), self.row.to_algebraic())
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.col.to_algebraic(), self.row.to_algebraic())
    }
}

// On the wire squares are plain strings like "e4".
impl Serialize for Coord {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_algebraic())
    }
}

impl<'de> Deserialize<'de> for Coord {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Coord::from_algebraic(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid square: {s:?}")))
    }
}
