use crate::board::{Board, Color, PieceKind, Square};
use crate::movegen::Move;

/// Half-move count at which the fifty-move rule applies.
pub const FIFTY_MOVE_LIMIT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    /// Short castling, toward the h-file rook.
    Kingside,
    /// Long castling, toward the a-file rook.
    Queenside,
}

impl CastleSide {
    pub fn rook_col(&self) -> u8 {
        match self {
            CastleSide::Kingside => 7,
            CastleSide::Queenside => 0,
        }
    }

    pub fn rook_origin(&self, color: Color) -> Square {
        Square::new(color.back_row(), self.rook_col())
    }
}

/// Set-once flags recording whether a king or rook has left its origin square.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CastlingRights {
    king_moved: [bool; 2],
    // [color][side], side 0 = kingside
    rook_moved: [[bool; 2]; 2],
}

fn color_index(color: Color) -> usize {
    match color {
        Color::White => 0,
        Color::Black => 1,
    }
}

fn side_index(side: CastleSide) -> usize {
    match side {
        CastleSide::Kingside => 0,
        CastleSide::Queenside => 1,
    }
}

impl CastlingRights {
    pub fn king_moved(&self, color: Color) -> bool {
        self.king_moved[color_index(color)]
    }

    pub fn rook_moved(&self, color: Color, side: CastleSide) -> bool {
        self.rook_moved[color_index(color)][side_index(side)]
    }

    pub fn can_castle(&self, color: Color, side: CastleSide) -> bool {
        !self.king_moved(color) && !self.rook_moved(color, side)
    }
}

/// Everything about a game that the board alone does not record.
///
/// One value per game. Legality, terminal detection and search all read it;
/// only the caller mutates it, after a move has actually been applied.
#[derive(Debug, Clone, Default)]
pub struct GameState {
    castling: CastlingRights,
    last_move: Option<Move>,
    position_history: Vec<String>,
    half_move_clock: u32,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the state of a fresh game.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// A copy carrying rights, last move and clock but no position history.
    pub fn fork(&self) -> Self {
        Self {
            castling: self.castling,
            last_move: self.last_move,
            position_history: Vec::new(),
            half_move_clock: self.half_move_clock,
        }
    }

    pub fn castling(&self) -> &CastlingRights {
        &self.castling
    }

    pub fn king_moved(&self, color: Color) -> bool {
        self.castling.king_moved(color)
    }

    pub fn rook_moved(&self, color: Color, side: CastleSide) -> bool {
        self.castling.rook_moved(color, side)
    }

    pub fn set_king_moved(&mut self, color: Color) {
        self.castling.king_moved[color_index(color)] = true;
    }

    pub fn set_rook_moved(&mut self, color: Color, side: CastleSide) {
        self.castling.rook_moved[color_index(color)][side_index(side)] = true;
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.last_move.as_ref()
    }

    pub fn set_last_move(&mut self, mv: Move) {
        self.last_move = Some(mv);
    }

    pub fn record_position(&mut self, board: &Board) {
        self.position_history.push(board.position_key());
    }

    /// How many times `board` appears in the recorded history.
    pub fn occurrences(&self, board: &Board) -> usize {
        let key = board.position_key();
        self.position_history.iter().filter(|p| **p == key).count()
    }

    pub fn position_history(&self) -> &[String] {
        &self.position_history
    }

    /// Records `board` and reports whether it has now been seen three times.
    ///
    /// Recording is a side effect: call this exactly once per finalized
    /// position. Calling it twice for the same position counts it twice.
    pub fn is_threefold_repetition(&mut self, board: &Board) -> bool {
        self.record_position(board);
        self.occurrences(board) >= 3
    }

    pub fn half_move_clock(&self) -> u32 {
        self.half_move_clock
    }

    pub fn increment_half_move_clock(&mut self) {
        self.half_move_clock += 1;
    }

    pub fn reset_half_move_clock(&mut self) {
        self.half_move_clock = 0;
    }

    pub fn is_fifty_move_rule(&self) -> bool {
        self.half_move_clock >= FIFTY_MOVE_LIMIT
    }

    /// Bookkeeping for a move about to be played on `before`: last move,
    /// castling flags, and the half-move clock (reset on pawn moves and
    /// captures, advanced otherwise). Does not touch position history.
    pub fn note_move(&mut self, before: &Board, mv: &Move) {
        let en_passant = mv.piece.kind == PieceKind::Pawn
            && mv.from.col != mv.to.col
            && before.is_empty(mv.to);
        let capture = en_passant || !before.is_empty(mv.to);

        if mv.piece.kind == PieceKind::Pawn || capture {
            self.reset_half_move_clock();
        } else {
            self.increment_half_move_clock();
        }

        match mv.piece.kind {
            PieceKind::King => self.set_king_moved(mv.piece.color),
            PieceKind::Rook => {
                for side in [CastleSide::Kingside, CastleSide::Queenside] {
                    if mv.from == side.rook_origin(mv.piece.color) {
                        self.set_rook_moved(mv.piece.color, side);
                    }
                }
            }
            _ => {}
        }

        // Landing on an enemy rook's corner takes that castling right away for good.
        let opponent = mv.piece.color.opposite();
        for side in [CastleSide::Kingside, CastleSide::Queenside] {
            if mv.to == side.rook_origin(opponent) {
                self.set_rook_moved(opponent, side);
            }
        }

        self.set_last_move(*mv);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Piece;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn repetition_trips_on_third_record() {
        let board = Board::new();
        let mut state = GameState::new();
        assert!(!state.is_threefold_repetition(&board));
        assert!(!state.is_threefold_repetition(&board));
        assert!(state.is_threefold_repetition(&board));
    }

    #[test]
    fn double_checking_one_position_inflates_count() {
        let start = Board::new();
        let knight = Piece::new(PieceKind::Knight, Color::White);
        let other = start.with_move(&Move::new(sq("g1"), sq("f3"), knight));
        let mut state = GameState::new();

        // Two logical visits of `start`, but the second is checked twice.
        assert!(!state.is_threefold_repetition(&start));
        assert!(!state.is_threefold_repetition(&other));
        assert!(!state.is_threefold_repetition(&start));
        assert!(state.is_threefold_repetition(&start));
    }

    #[test]
    fn occurrences_is_pure() {
        let board = Board::new();
        let mut state = GameState::new();
        state.record_position(&board);
        assert_eq!(state.occurrences(&board), 1);
        assert_eq!(state.occurrences(&board), 1);
        assert_eq!(state.occurrences(&Board::empty()), 0);
    }

    #[test]
    fn half_move_clock() {
        let mut state = GameState::new();
        for _ in 0..49 {
            state.increment_half_move_clock();
        }
        assert!(!state.is_fifty_move_rule());
        state.increment_half_move_clock();
        assert!(state.is_fifty_move_rule());
        state.reset_half_move_clock();
        assert_eq!(state.half_move_clock(), 0);
    }

    #[test]
    fn castling_flags_are_set_once() {
        let mut state = GameState::new();
        assert!(state.castling().can_castle(Color::White, CastleSide::Kingside));
        state.set_rook_moved(Color::White, CastleSide::Kingside);
        assert!(state.rook_moved(Color::White, CastleSide::Kingside));
        assert!(!state.rook_moved(Color::White, CastleSide::Queenside));
        assert!(!state.rook_moved(Color::Black, CastleSide::Kingside));
        state.set_king_moved(Color::Black);
        assert!(!state.castling().can_castle(Color::Black, CastleSide::Queenside));
    }

    #[test]
    fn capture_on_rook_corner_removes_right() {
        let board: Board = "r3k2r/8/8/8/8/7r/8/R3K2R".parse().unwrap();
        let mut state = GameState::new();

        let black_rook = Piece::new(PieceKind::Rook, Color::Black);
        state.note_move(&board, &Move::new(sq("h3"), sq("h1"), black_rook));
        assert!(state.rook_moved(Color::White, CastleSide::Kingside));
        assert!(!state.rook_moved(Color::White, CastleSide::Queenside));
        assert!(!state.rook_moved(Color::Black, CastleSide::Kingside));

        let queen = Piece::new(PieceKind::Queen, Color::White);
        state.note_move(&board, &Move::new(sq("a7"), sq("a8"), queen));
        assert!(state.rook_moved(Color::Black, CastleSide::Queenside));
        assert!(!state.rook_moved(Color::Black, CastleSide::Kingside));
    }

    #[test]
    fn note_move_updates_rights_and_clock() {
        let board: Board = "r3k2r/8/8/8/8/8/4P3/R3K2R".parse().unwrap();
        let mut state = GameState::new();

        let rook = Piece::new(PieceKind::Rook, Color::White);
        let mv = Move::new(sq("h1"), sq("h5"), rook);
        state.note_move(&board, &mv);
        assert!(state.rook_moved(Color::White, CastleSide::Kingside));
        assert!(!state.rook_moved(Color::White, CastleSide::Queenside));
        assert_eq!(state.half_move_clock(), 1);
        assert_eq!(state.last_move(), Some(&mv));

        let pawn = Piece::new(PieceKind::Pawn, Color::White);
        state.note_move(&board, &Move::new(sq("e2"), sq("e4"), pawn));
        assert_eq!(state.half_move_clock(), 0);

        let king = Piece::new(PieceKind::King, Color::Black);
        state.note_move(&board, &Move::new(sq("e8"), sq("d8"), king));
        assert!(state.king_moved(Color::Black));
        assert_eq!(state.half_move_clock(), 1);

        let black_rook = Piece::new(PieceKind::Rook, Color::Black);
        state.note_move(&board, &Move::new(sq("a8"), sq("a1"), black_rook));
        assert_eq!(state.half_move_clock(), 0);
        assert!(state.rook_moved(Color::Black, CastleSide::Queenside));
    }

    #[test]
    fn fork_drops_history_only() {
        let mut state = GameState::new();
        state.record_position(&Board::new());
        state.set_king_moved(Color::White);
        state.increment_half_move_clock();
        let forked = state.fork();
        assert!(forked.position_history().is_empty());
        assert!(forked.king_moved(Color::White));
        assert_eq!(forked.half_move_clock(), 1);

        state.reset();
        assert!(!state.king_moved(Color::White));
        assert!(state.position_history().is_empty());
    }
}
