// Visual grid: what each of the 64 squares shows. `BoardView` is repainted from a
// `BoardState` and never read back to infer game state.

use std::collections::{BTreeSet, HashMap};

use log::warn;
use strum::IntoEnumIterator;

use crate::board::BoardState;
use crate::coord::{Coord, NUM_SQUARES};
use crate::force::Force;
use crate::piece::{Piece, PieceKind, piece_to_pictogram};


pub const DEFAULT_PLACEHOLDER_GLYPH: char = '?';

// Visual asset table, keyed by `Piece::asset_key`.
#[derive(Clone, Debug)]
pub struct PieceGlyphs {
    glyphs: HashMap<String, char>,
    placeholder: char,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PieceVisual {
    pub piece: Piece,
    pub glyph: char,
    // Asset was missing and `glyph` is the placeholder.
    pub is_placeholder: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct SquareView {
    pub piece: Option<PieceVisual>,
    pub selected: bool,
    pub valid_move: bool,
    pub check: bool,
}

#[derive(Clone, Debug)]
pub struct BoardView {
    squares: [SquareView; NUM_SQUARES],
    glyphs: PieceGlyphs,
}

impl PieceGlyphs {
    pub fn pictograms() -> Self {
        let glyphs = Force::iter()
            .flat_map(|force| PieceKind::iter().map(move |kind| Piece::new(kind, force)))
            .map(|piece| (piece.asset_key(), piece_to_pictogram(piece.kind, piece.force)))
            .collect();
        PieceGlyphs { glyphs, placeholder: DEFAULT_PLACEHOLDER_GLYPH }
    }

    // Only `overrides` keys are replaced; other pieces keep their pictograms.
    pub fn with_overrides(overrides: &HashMap<String, char>, placeholder: char) -> Self {
        let mut glyphs = Self::pictograms();
        for (key, &glyph) in overrides {
            glyphs.glyphs.insert(key.to_ascii_lowercase(), glyph);
        }
        glyphs.placeholder = placeholder;
        glyphs
    }

    pub fn remove(&mut self, asset_key: &str) { self.glyphs.remove(asset_key); }

    pub fn visual(&self, piece: Piece) -> PieceVisual {
        let key = piece.asset_key();
        match self.glyphs.get(&key) {
            Some(&glyph) => PieceVisual { piece, glyph, is_placeholder: false },
            None => {
                warn!("Failed to load image for {}", piece.description());
                PieceVisual {
                    piece,
                    glyph: self.placeholder,
                    is_placeholder: true,
                }
            }
        }
    }
}

impl BoardView {
    pub fn new(glyphs: PieceGlyphs) -> Self {
        BoardView {
            squares: [SquareView::default(); NUM_SQUARES],
            glyphs,
        }
    }

    pub fn square(&self, coord: Coord) -> &SquareView { &self.squares[coord.to_index()] }

    pub fn squares(&self) -> impl Iterator<Item = (Coord, &SquareView)> {
        Coord::all().map(|coord| (coord, self.square(coord)))
    }

    pub fn num_pieces(&self) -> usize { self.squares.iter().filter(|sq| sq.piece.is_some()).count() }

    // Repaints pieces so that each square shows exactly what `board` assigns it. Marks are
    // left untouched; they are owned by `highlight` and `mark_check`.
    pub fn render(&mut self, board: &BoardState) {
        for square in self.squares.iter_mut() {
            square.piece = None;
        }
        for (coord, piece) in board.iter() {
            self.squares[coord.to_index()].piece = Some(self.glyphs.visual(piece));
        }
    }

    // Clears every selection/validity/check mark, then marks `selected` and each of
    // `valid_moves`.
    pub fn highlight(&mut self, selected: Option<Coord>, valid_moves: &BTreeSet<Coord>) {
        for square in self.squares.iter_mut() {
            square.selected = false;
            square.valid_move = false;
            square.check = false;
        }
        if let Some(coord) = selected {
            self.squares[coord.to_index()].selected = true;
        }
        for coord in valid_moves {
            self.squares[coord.to_index()].valid_move = true;
        }
    }

    pub fn mark_check(&mut self, coord: Coord) { self.squares[coord.to_index()].check = true; }

    pub fn clear(&mut self) {
        self.squares = [SquareView::default(); NUM_SQUARES];
    }
}
