use chessboard_client::board_view::{BoardView, SquareView};
use chessboard_client::client::ClientState;
use chessboard_client::coord::{Col, Coord, NUM_COLS, NUM_ROWS, Row};
use chessboard_client::force::Force;
use chessboard_client::piece::{PieceKind, piece_to_pictogram};
use chessboard_client::promotion::PendingPromotion;
use console::Style;
use itertools::{EitherOrBoth, Itertools};


// Each square is printed as " x ". Board rows and columns are framed by headers on all sides.
pub const SQUARE_WIDTH: u16 = 3;
pub const BOARD_WIDTH: usize = (NUM_COLS as usize + 2) * SQUARE_WIDTH as usize;
pub const BOARD_HEIGHT: usize = NUM_ROWS as usize + 2;
pub const HISTORY_HEIGHT: usize = BOARD_HEIGHT;
const PANEL_GAP: &str = "    ";

// Keys accepted by the promotion prompt. Knight is `k` because `n` starts a new game.
pub const PROMOTION_KEYS: [char; 4] = ['q', 'r', 'b', 'k'];

pub fn promotion_choice(key: char) -> Option<PieceKind> {
    match key.to_ascii_lowercase() {
        'q' => Some(PieceKind::Queen),
        'r' => Some(PieceKind::Rook),
        'b' => Some(PieceKind::Bishop),
        'k' => Some(PieceKind::Knight),
        _ => None,
    }
}

// Maps a terminal cell of the board drawn at the top-left corner to the square under it.
pub fn square_at(column: u16, row: u16) -> Option<Coord> {
    let x = (column / SQUARE_WIDTH).checked_sub(1)?;
    let y = row.checked_sub(1)?;
    let col = Col::from_zero_based(u8::try_from(x).ok()?)?;
    let row = Row::from_zero_based((NUM_ROWS - 1).checked_sub(u8::try_from(y).ok()?)?)?;
    Some(Coord::new(row, col))
}

fn format_square(ch: char) -> String { format!(" {} ", ch) }

fn square_style(coord: Coord, square: &SquareView) -> Style {
    let base = Style::new().color256(233);
    if square.check {
        base.on_red()
    } else if square.selected {
        base.on_color256(117)
    } else if square.valid_move {
        base.on_color256(151)
    } else if (coord.row.to_zero_based() + coord.col.to_zero_based()) % 2 == 0 {
        base.on_color256(222)
    } else {
        base.on_color256(230)
    }
}

fn render_square(coord: Coord, square: &SquareView) -> String {
    let (glyph, placeholder) = match square.piece {
        Some(visual) => (visual.glyph, visual.is_placeholder),
        None if square.valid_move => ('·', false),
        None => (' ', false),
    };
    let mut style = square_style(coord, square);
    if placeholder {
        style = style.dim();
    }
    style.apply_to(format_square(glyph)).to_string()
}

fn render_col_header() -> String {
    let mut ret = format_square(' ');
    for col in Col::all() {
        ret.push_str(&format_square(col.to_algebraic()));
    }
    ret.push_str(&format_square(' '));
    ret
}

pub fn render_board(view: &BoardView) -> Vec<String> {
    let mut lines = vec![render_col_header()];
    for row in Row::all().rev() {
        let mut line = format_square(row.to_algebraic());
        for col in Col::all() {
            let coord = Coord::new(row, col);
            line.push_str(&render_square(coord, view.square(coord)));
        }
        line.push_str(&format_square(row.to_algebraic()));
        lines.push(line);
    }
    lines.push(render_col_header());
    lines
}

pub fn render_history(state: &ClientState) -> Vec<String> {
    let mut lines = vec![Style::new().bold().apply_to("Moves").to_string()];
    lines.extend(
        state
            .history()
            .visible(HISTORY_HEIGHT - 1)
            .map(|(idx, entry)| format!("{idx:>3}. {entry}")),
    );
    lines
}

pub fn render_captured(state: &ClientState) -> String {
    let tally = state.captured();
    format!("Captured: {} | {}", tally.render(Force::White), tally.render(Force::Black))
}

pub fn render_promotion_prompt(pending: &PendingPromotion) -> String {
    let choices = pending
        .choices()
        .iter()
        .zip(PROMOTION_KEYS)
        .map(|(piece, key)| {
            format!("[{}] {}", key, piece_to_pictogram(piece.kind, piece.force))
        })
        .join("  ");
    format!("Promote pawn on {}: {}  [Esc] cancel", pending.square, choices)
}

// Board with the move log to its right, followed by the status area.
pub fn render_client(state: &ClientState) -> Vec<String> {
    let mut lines = render_board(state.board_view())
        .into_iter()
        .zip_longest(render_history(state))
        .map(|pair| match pair {
            EitherOrBoth::Both(board, history) => format!("{board}{PANEL_GAP}{history}"),
            EitherOrBoth::Left(board) => board,
            EitherOrBoth::Right(history) => {
                format!("{}{PANEL_GAP}{history}", " ".repeat(BOARD_WIDTH))
            }
        })
        .collect_vec();
    lines.push(String::new());
    let status_style = if state.status_view().notice().is_some() {
        Style::new().red()
    } else {
        Style::new()
    };
    lines.push(status_style.apply_to(state.status_view().status_line()).to_string());
    if let Some(banner) = state.status_view().result_banner() {
        lines.push(Style::new().magenta().bold().apply_to(format!("*** {banner} ***")).to_string());
    }
    lines.push(render_captured(state));
    if let Some(pending) = state.pending_promotion() {
        lines.push(Style::new().yellow().apply_to(render_promotion_prompt(&pending)).to_string());
    }
    lines
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sq(s: &str) -> Coord { Coord::from_algebraic(s).unwrap() }

    #[test]
    fn square_at_corners() {
        // Row 1 of the terminal is rank 8, column 3..5 is file a.
        assert_eq!(square_at(3, 1), Some(sq("a8")));
        assert_eq!(square_at(5, 1), Some(sq("a8")));
        assert_eq!(square_at(6, 1), Some(sq("b8")));
        assert_eq!(square_at(24, 8), Some(sq("h1")));
        assert_eq!(square_at(26, 8), Some(sq("h1")));
        assert_eq!(square_at(12, 5), Some(sq("d4")));
    }

    #[test]
    fn square_at_headers_and_outside() {
        assert_eq!(square_at(0, 0), None);
        assert_eq!(square_at(4, 0), None);
        assert_eq!(square_at(2, 4), None);
        assert_eq!(square_at(27, 4), None);
        assert_eq!(square_at(4, 9), None);
        assert_eq!(square_at(500, 500), None);
    }

    #[test]
    fn board_layout() {
        let view = BoardView::new(chessboard_client::board_view::PieceGlyphs::pictograms());
        let lines = render_board(&view);
        assert_eq!(lines.len(), BOARD_HEIGHT);
        assert_eq!(console::strip_ansi_codes(&lines[0]), "    a  b  c  d  e  f  g  h    ");
        assert!(console::strip_ansi_codes(&lines[1]).starts_with(" 8 "));
        assert!(console::strip_ansi_codes(&lines[8]).starts_with(" 1 "));
        assert!(lines.iter().all(|l| console::measure_text_width(l) == BOARD_WIDTH));
    }

    #[test]
    fn promotion_keys_match_choices() {
        let pending = PendingPromotion { square: sq("e8"), force: Force::White };
        for (piece, key) in pending.choices().into_iter().zip(PROMOTION_KEYS) {
            assert_eq!(promotion_choice(key), Some(piece.kind));
        }
        assert_eq!(promotion_choice('n'), None);
        assert_eq!(promotion_choice('Q'), Some(PieceKind::Queen));
    }

    #[test]
    fn promotion_prompt_offers_promoter_pieces() {
        let pending = PendingPromotion { square: sq("c1"), force: Force::Black };
        assert_eq!(
            render_promotion_prompt(&pending),
            "Promote pawn on c1: [q] ♛  [r] ♜  [b] ♝  [k] ♞  [Esc] cancel"
        );
    }
}
