use std::fmt;

use crate::board::{Board, Color, Piece, PieceKind, Square};
use crate::state::{CastleSide, GameState};
use crate::status::is_in_check;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
}

impl Move {
    pub fn new(from: Square, to: Square, piece: Piece) -> Self {
        Self { from, to, piece }
    }

    pub fn is_double_pawn_push(&self) -> bool {
        self.piece.kind == PieceKind::Pawn
            && self.from.col == self.to.col
            && self.from.row.abs_diff(self.to.row) == 2
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

fn delta(from: Square, to: Square) -> (i8, i8) {
    (to.row as i8 - from.row as i8, to.col as i8 - from.col as i8)
}

fn is_knight_shape(dr: i8, dc: i8) -> bool {
    matches!((dr.abs(), dc.abs()), (1, 2) | (2, 1))
}

fn is_rook_shape(dr: i8, dc: i8) -> bool {
    (dr == 0) != (dc == 0)
}

fn is_bishop_shape(dr: i8, dc: i8) -> bool {
    dr != 0 && dr.abs() == dc.abs()
}

/// True when every square strictly between `from` and `to` is empty.
/// The two squares must share a row, column or diagonal.
fn path_clear(board: &Board, from: Square, to: Square) -> bool {
    let (dr, dc) = delta(from, to);
    let (step_r, step_c) = (dr.signum(), dc.signum());
    let mut current = from.offset(step_r, step_c);
    while let Some(sq) = current {
        if sq == to {
            return true;
        }
        if !board.is_empty(sq) {
            return false;
        }
        current = sq.offset(step_r, step_c);
    }
    true
}

/// Whether `piece` standing on `from` attacks `target`.
///
/// Shape and path clearance only: pawns attack their two forward diagonals,
/// and nothing here looks at the attacker's own king.
pub fn attacks(board: &Board, from: Square, piece: Piece, target: Square) -> bool {
    let (dr, dc) = delta(from, target);
    match piece.kind {
        PieceKind::Pawn => dr == piece.color.pawn_direction() && dc.abs() == 1,
        PieceKind::Knight => is_knight_shape(dr, dc),
        PieceKind::Bishop => is_bishop_shape(dr, dc) && path_clear(board, from, target),
        PieceKind::Rook => is_rook_shape(dr, dc) && path_clear(board, from, target),
        PieceKind::Queen => {
            (is_rook_shape(dr, dc) || is_bishop_shape(dr, dc)) && path_clear(board, from, target)
        }
        PieceKind::King => (dr, dc) != (0, 0) && dr.abs() <= 1 && dc.abs() <= 1,
    }
}

/// Whether any piece of `color`'s opponent attacks `square`.
pub fn is_square_attacked(board: &Board, square: Square, color: Color) -> bool {
    board
        .pieces(color.opposite())
        .any(|(from, piece)| attacks(board, from, piece, square))
}

/// Full legality test for moving `piece` from `from` to `to`.
///
/// Checks the destination, the piece's movement rules (including en passant
/// and castling, which consult `state`), and finally that the mover's king is
/// not in check on the resulting board. Never mutates anything.
pub fn is_legal_move(
    board: &Board,
    piece: Piece,
    from: Square,
    to: Square,
    state: &GameState,
) -> bool {
    if from == to || board.piece_at(from) != Some(piece) {
        return false;
    }
    if matches!(board.piece_at(to), Some(target) if target.color == piece.color) {
        return false;
    }

    let (dr, dc) = delta(from, to);
    let shape_ok = match piece.kind {
        PieceKind::Pawn => is_pawn_move(board, piece, from, to, state),
        PieceKind::King => {
            (dr.abs() <= 1 && dc.abs() <= 1) || is_castling_move(board, piece, from, to, state)
        }
        _ => attacks(board, from, piece, to),
    };
    if !shape_ok {
        return false;
    }

    let next = board.with_move(&Move::new(from, to, piece));
    !is_in_check(&next, piece.color)
}

fn is_pawn_move(board: &Board, pawn: Piece, from: Square, to: Square, state: &GameState) -> bool {
    let dir = pawn.color.pawn_direction();
    let (dr, dc) = delta(from, to);

    if dc == 0 {
        if dr == dir {
            return board.is_empty(to);
        }
        if dr == 2 * dir && from.row == pawn.color.pawn_start_row() {
            let crossed = from.offset(dir, 0);
            return crossed.map_or(false, |sq| board.is_empty(sq)) && board.is_empty(to);
        }
        return false;
    }

    if dc.abs() != 1 || dr != dir {
        return false;
    }
    match board.piece_at(to) {
        Some(target) => target.color != pawn.color,
        None => is_en_passant(board, pawn, from, to, state.last_move()),
    }
}

/// The previous move must be an enemy pawn's two-square advance that landed
/// beside `from`, in the column the capturing pawn is moving into.
fn is_en_passant(
    board: &Board,
    pawn: Piece,
    from: Square,
    to: Square,
    last: Option<&Move>,
) -> bool {
    let Some(last) = last else {
        return false;
    };
    last.is_double_pawn_push()
        && last.piece.color != pawn.color
        && last.to.row == from.row
        && last.to.col == to.col
        && board.piece_at(last.to) == Some(last.piece)
}

fn is_castling_move(
    board: &Board,
    king: Piece,
    from: Square,
    to: Square,
    state: &GameState,
) -> bool {
    let home = Square::new(king.color.back_row(), 4);
    if from != home || to.row != from.row || from.col.abs_diff(to.col) != 2 {
        return false;
    }
    if state.king_moved(king.color) {
        return false;
    }

    let (side, step) = if to.col > from.col {
        (CastleSide::Kingside, 1)
    } else {
        (CastleSide::Queenside, -1)
    };
    let rook_square = side.rook_origin(king.color);
    if state.rook_moved(king.color, side)
        || board.piece_at(rook_square) != Some(Piece::new(PieceKind::Rook, king.color))
    {
        return false;
    }
    if !path_clear(board, from, rook_square) {
        return false;
    }
    if is_in_check(board, king.color) {
        return false;
    }

    let crossed = match from.offset(0, step) {
        Some(sq) => sq,
        None => return false,
    };
    !is_square_attacked(board, crossed, king.color) && !is_square_attacked(board, to, king.color)
}

/// Every legal move for `color`, in board order (top-left first).
pub fn generate_legal_moves(board: &Board, color: Color, state: &GameState) -> Vec<Move> {
    let mut moves = Vec::new();
    for (from, piece) in board.pieces(color) {
        for to in Square::all() {
            if !is_legal_move(board, piece, from, to, state) {
                continue;
            }
            let mv = Move::new(from, to, piece);
            // is_legal_move already rules this out; keep the check at the boundary.
            if !is_in_check(&board.with_move(&mv), color) {
                moves.push(mv);
            }
        }
    }
    moves
}

/// Legal destinations for the piece on `from`, if any.
pub fn legal_moves_from(board: &Board, from: Square, state: &GameState) -> Vec<Move> {
    let Some(piece) = board.piece_at(from) else {
        return Vec::new();
    };
    Square::all()
        .filter(|&to| is_legal_move(board, piece, from, to, state))
        .map(|to| Move::new(from, to, piece))
        .collect()
}
