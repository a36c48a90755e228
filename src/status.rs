use crate::board::{Board, Color, Piece, PieceKind, Square};
use crate::movegen::{is_legal_move, is_square_attacked, Move};
use crate::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    Check,
    Checkmate { winner: Color },
    Stalemate,
    ThreefoldRepetition,
    FiftyMoveRule,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::Ongoing | GameStatus::Check)
    }
}

/// A board without a king of `color` is never in check.
pub fn is_in_check(board: &Board, color: Color) -> bool {
    match board.find_king(color) {
        Some(king) => is_square_attacked(board, king, color),
        None => false,
    }
}

fn escapes_check(board: &Board, piece: Piece, from: Square, to: Square, state: &GameState) -> bool {
    is_legal_move(board, piece, from, to, state)
        && !is_in_check(&board.with_move(&Move::new(from, to, piece)), piece.color)
}

fn has_legal_move(board: &Board, color: Color, state: &GameState) -> bool {
    board.pieces(color).any(|(from, piece)| {
        Square::all().any(|to| is_legal_move(board, piece, from, to, state))
    })
}

/// In check with no move that gets out of it. King steps are tried before
/// anything else, and the first escape found ends the search.
pub fn is_checkmate(board: &Board, color: Color, state: &GameState) -> bool {
    if !is_in_check(board, color) {
        return false;
    }
    let Some(king_square) = board.find_king(color) else {
        return false;
    };

    let king = Piece::new(PieceKind::King, color);
    for dr in -1..=1 {
        for dc in -1..=1 {
            if let Some(to) = king_square.offset(dr, dc) {
                if escapes_check(board, king, king_square, to, state) {
                    return false;
                }
            }
        }
    }

    !board.pieces(color).any(|(from, piece)| {
        Square::all().any(|to| escapes_check(board, piece, from, to, state))
    })
}

pub fn is_stalemate(board: &Board, color: Color, state: &GameState) -> bool {
    !is_in_check(board, color) && !has_legal_move(board, color, state)
}

/// Overall status for the side about to move. Repetition is read with the
/// pure occurrence count, so this never records anything.
pub fn game_status(board: &Board, to_move: Color, state: &GameState) -> GameStatus {
    if is_checkmate(board, to_move, state) {
        return GameStatus::Checkmate {
            winner: to_move.opposite(),
        };
    }
    if is_stalemate(board, to_move, state) {
        return GameStatus::Stalemate;
    }
    if state.occurrences(board) >= 3 {
        return GameStatus::ThreefoldRepetition;
    }
    if state.is_fifty_move_rule() {
        return GameStatus::FiftyMoveRule;
    }
    if is_in_check(board, to_move) {
        return GameStatus::Check;
    }
    GameStatus::Ongoing
}
