use enum_map::Enum;
use strum::{EnumIter, IntoEnumIterator};


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Enum, EnumIter)]
pub enum Force {
    White,
    Black,
}

impl Force {
    pub fn opponent(self) -> Force {
        match self {
            Force::White => Force::Black,
            Force::Black => Force::White,
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            Force::White => "white",
            Force::Black => "black",
        }
    }

    // Authority sends colors as words in arbitrary case ("white", "WHITE", "White").
    pub fn from_wire(s: &str) -> Option<Self> {
        Force::iter().find(|force| force.wire_name().eq_ignore_ascii_case(s.trim()))
    }

    // First letter of the color word; used as the asset key prefix.
    pub fn asset_prefix(self) -> char {
        match self {
            Force::White => 'w',
            Force::Black => 'b',
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Force::White => "White",
            Force::Black => "Black",
        }
    }
}
