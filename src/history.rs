use enum_map::EnumMap;
use itertools::Itertools;
use strum::IntoEnumIterator;

use crate::force::Force;
use crate::piece::{PieceKind, piece_to_pictogram};


// Rendered move descriptions in completion order. Append-only within a game.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct MoveHistory {
    entries: Vec<String>,
    // Index of the bottom-most visible entry.
    scroll: usize,
}

impl MoveHistory {
    pub fn new() -> Self { Self::default() }

    pub fn entries(&self) -> &[String] { &self.entries }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    // Appends and scrolls to the new entry.
    pub fn record_move(&mut self, entry: String) {
        self.entries.push(entry);
        self.scroll = self.entries.len() - 1;
    }

    pub fn scroll_up(&mut self, lines: usize) { self.scroll = self.scroll.saturating_sub(lines); }
    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = (self.scroll + lines).min(self.entries.len().saturating_sub(1));
    }

    // Up to `height` entries ending with the scroll position, paired with 1-based numbers.
    pub fn visible(&self, height: usize) -> impl Iterator<Item = (usize, &str)> {
        let end = if self.entries.is_empty() { 0 } else { self.scroll + 1 };
        let start = end.saturating_sub(height);
        (start..end).map(|idx| (idx + 1, self.entries[idx].as_str()))
    }

    pub fn clear(&mut self) { *self = Self::default(); }
}


// Captured pieces count per (color, type). Counts only grow within a game.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CapturedTally {
    counts: EnumMap<Force, EnumMap<PieceKind, u32>>,
}

impl CapturedTally {
    pub fn new() -> Self { Self::default() }

    pub fn record_capture(&mut self, force: Force, kind: PieceKind) { self.counts[force][kind] += 1; }

    pub fn count(&self, force: Force, kind: PieceKind) -> u32 { self.counts[force][kind] }

    pub fn total(&self) -> u32 { self.counts.values().flat_map(|m| m.values()).sum() }

    // Non-zero tallies of pieces of the given color, in piece order.
    pub fn captured(&self, force: Force) -> impl Iterator<Item = (PieceKind, u32)> + '_ {
        PieceKind::iter()
            .map(move |kind| (kind, self.counts[force][kind]))
            .filter(|&(_, count)| count > 0)
    }

    // E.g. "♟×2 ♞". Count is omitted when it is one.
    pub fn render(&self, force: Force) -> String {
        self.captured(force)
            .map(|(kind, count)| {
                let pictogram = piece_to_pictogram(kind, force);
                if count == 1 { pictogram.to_string() } else { format!("{pictogram}×{count}") }
            })
            .join(" ")
    }

    pub fn clear(&mut self) { *self = Self::default(); }
}


#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn repeated_captures_aggregate() {
        let mut tally = CapturedTally::new();
        tally.record_capture(Force::White, PieceKind::Pawn);
        tally.record_capture(Force::White, PieceKind::Pawn);
        assert_eq!(tally.count(Force::White, PieceKind::Pawn), 2);
        assert_eq!(tally.count(Force::Black, PieceKind::Pawn), 0);
        assert_eq!(tally.count(Force::White, PieceKind::Knight), 0);
        assert_eq!(tally.total(), 2);
    }

    #[test]
    fn tally_rendering() {
        let mut tally = CapturedTally::new();
        tally.record_capture(Force::Black, PieceKind::Knight);
        tally.record_capture(Force::Black, PieceKind::Pawn);
        tally.record_capture(Force::Black, PieceKind::Pawn);
        assert_eq!(tally.render(Force::Black), "♟×2 ♞");
        assert_eq!(tally.render(Force::White), "");
        tally.clear();
        assert_eq!(tally.total(), 0);
    }

    #[test]
    fn history_scrolls_to_newest() {
        let mut history = MoveHistory::new();
        assert_eq!(history.visible(3).count(), 0);
        for entry in ["e2-e4", "e7-e5", "Ng1-f3", "Nb8-c6"] {
            history.record_move(entry.to_owned());
        }
        assert_eq!(
            history.visible(2).collect_vec(),
            vec![(3, "Ng1-f3"), (4, "Nb8-c6")]
        );
        history.scroll_up(2);
        assert_eq!(history.visible(2).collect_vec(), vec![(1, "e2-e4"), (2, "e7-e5")]);
        history.scroll_up(10);
        assert_eq!(history.visible(2).collect_vec(), vec![(1, "e2-e4")]);
        history.scroll_down(10);
        assert_eq!(history.visible(1).collect_vec(), vec![(4, "Nb8-c6")]);
        history.scroll_up(3);
        history.record_move("Bf1-b5".to_owned());
        assert_eq!(history.visible(1).collect_vec(), vec![(5, "Bf1-b5")]);
    }
}
