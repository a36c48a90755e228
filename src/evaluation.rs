use crate::board::{Board, Color, Piece, PieceKind, Square};

type PieceSquareTable = [[i32; 8]; 8];

// Tables are written from White's side: row 0 is the eighth rank.

const PAWN_TABLE: PieceSquareTable = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [50, 50, 50, 50, 50, 50, 50, 50],
    [10, 10, 20, 30, 30, 20, 10, 10],
    [5, 5, 10, 25, 25, 10, 5, 5],
    [0, 0, 0, 20, 20, 0, 0, 0],
    [5, -5, -10, 0, 0, -10, -5, 5],
    [5, 10, 10, -20, -20, 10, 10, 5],
    [0, 0, 0, 0, 0, 0, 0, 0],
];

const KNIGHT_TABLE: PieceSquareTable = [
    [-50, -40, -30, -30, -30, -30, -40, -50],
    [-40, -20, 0, 0, 0, 0, -20, -40],
    [-30, 0, 10, 15, 15, 10, 0, -30],
    [-30, 5, 15, 20, 20, 15, 5, -30],
    [-30, 0, 15, 20, 20, 15, 0, -30],
    [-30, 5, 10, 15, 15, 10, 5, -30],
    [-40, -20, 0, 5, 5, 0, -20, -40],
    [-50, -40, -30, -30, -30, -30, -40, -50],
];

const BISHOP_TABLE: PieceSquareTable = [
    [-20, -10, -10, -10, -10, -10, -10, -20],
    [-10, 0, 0, 0, 0, 0, 0, -10],
    [-10, 0, 5, 10, 10, 5, 0, -10],
    [-10, 5, 5, 10, 10, 5, 5, -10],
    [-10, 0, 10, 10, 10, 10, 0, -10],
    [-10, 10, 10, 10, 10, 10, 10, -10],
    [-10, 5, 0, 0, 0, 0, 5, -10],
    [-20, -10, -10, -10, -10, -10, -10, -20],
];

const ROOK_TABLE: PieceSquareTable = [
    [0, 0, 0, 0, 0, 0, 0, 0],
    [5, 10, 10, 10, 10, 10, 10, 5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [-5, 0, 0, 0, 0, 0, 0, -5],
    [0, 0, 0, 5, 5, 0, 0, 0],
];

const QUEEN_TABLE: PieceSquareTable = [
    [-20, -10, -10, -5, -5, -10, -10, -20],
    [-10, 0, 0, 0, 0, 0, 0, -10],
    [-10, 0, 5, 5, 5, 5, 0, -10],
    [-5, 0, 5, 5, 5, 5, 0, -5],
    [0, 0, 5, 5, 5, 5, 0, -5],
    [-10, 5, 5, 5, 5, 5, 0, -10],
    [-10, 0, 5, 0, 0, 0, 0, -10],
    [-20, -10, -10, -5, -5, -10, -10, -20],
];

const KING_TABLE: PieceSquareTable = [
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-30, -40, -40, -50, -50, -40, -40, -30],
    [-20, -30, -30, -40, -40, -30, -30, -20],
    [-10, -20, -20, -20, -20, -20, -20, -10],
    [20, 20, 0, 0, 0, 0, 20, 20],
    [20, 30, 10, 0, 0, 10, 30, 20],
];

/// Material plus piece-square evaluation.
pub struct Evaluator {
    pub pawn_value: i32,
    pub knight_value: i32,
    pub bishop_value: i32,
    pub rook_value: i32,
    pub queen_value: i32,
    pub king_value: i32,

    pub pawn_position_bonus: PieceSquareTable,
    pub knight_position_bonus: PieceSquareTable,
    pub bishop_position_bonus: PieceSquareTable,
    pub rook_position_bonus: PieceSquareTable,
    pub queen_position_bonus: PieceSquareTable,
    pub king_position_bonus: PieceSquareTable,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            pawn_value: 100,
            knight_value: 320,
            bishop_value: 330,
            rook_value: 500,
            queen_value: 900,
            king_value: 20000,

            pawn_position_bonus: PAWN_TABLE,
            knight_position_bonus: KNIGHT_TABLE,
            bishop_position_bonus: BISHOP_TABLE,
            rook_position_bonus: ROOK_TABLE,
            queen_position_bonus: QUEEN_TABLE,
            king_position_bonus: KING_TABLE,
        }
    }

    /// Score of `board` from `ai_color`'s point of view: its pieces add,
    /// the opponent's subtract.
    pub fn evaluate(&self, board: &Board, ai_color: Color) -> i32 {
        let mut score = 0;
        for square in Square::all() {
            if let Some(piece) = board.piece_at(square) {
                let value = self.piece_value(piece, square);
                score += if piece.color == ai_color {
                    value
                } else {
                    -value
                };
            }
        }
        score
    }

    pub fn material_value(&self, kind: PieceKind) -> i32 {
        match kind {
            PieceKind::Pawn => self.pawn_value,
            PieceKind::Knight => self.knight_value,
            PieceKind::Bishop => self.bishop_value,
            PieceKind::Rook => self.rook_value,
            PieceKind::Queen => self.queen_value,
            PieceKind::King => self.king_value,
        }
    }

    /// Material plus positional bonus. Black reads the tables upside down.
    pub fn piece_value(&self, piece: Piece, square: Square) -> i32 {
        let row = match piece.color {
            Color::White => square.row as usize,
            Color::Black => 7 - square.row as usize,
        };
        let col = square.col as usize;

        let position_bonus = match piece.kind {
            PieceKind::Pawn => self.pawn_position_bonus[row][col],
            PieceKind::Knight => self.knight_position_bonus[row][col],
            PieceKind::Bishop => self.bishop_position_bonus[row][col],
            PieceKind::Rook => self.rook_position_bonus[row][col],
            PieceKind::Queen => self.queen_position_bonus[row][col],
            PieceKind::King => self.king_position_bonus[row][col],
        };

        self.material_value(piece.kind) + position_bonus
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Static evaluation with the standard weights.
pub fn evaluate_board(board: &Board, ai_color: Color) -> i32 {
    Evaluator::new().evaluate(board, ai_color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn board(fen: &str) -> Board {
        fen.parse().unwrap()
    }

    #[test]
    fn starting_position_is_balanced() {
        let b = Board::new();
        assert_eq!(evaluate_board(&b, Color::White), 0);
        assert_eq!(evaluate_board(&b, Color::Black), 0);
    }

    #[test]
    fn score_is_antisymmetric_in_ai_color() {
        let b = board("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R");
        assert_eq!(evaluate_board(&b, Color::White), -evaluate_board(&b, Color::Black));
    }

    #[test]
    fn material_counts_toward_owner() {
        // Kings on mirrored squares cancel; an extra white queen on d1 is worth 900 - 5.
        let b = board("4k3/8/8/8/8/8/8/3QK3");
        assert_eq!(evaluate_board(&b, Color::White), 895);
        assert_eq!(evaluate_board(&b, Color::Black), -895);
    }

    #[test]
    fn black_tables_are_mirrored() {
        let eval = Evaluator::new();
        let white_knight = Piece::new(PieceKind::Knight, Color::White);
        let black_knight = Piece::new(PieceKind::Knight, Color::Black);
        let f3: Square = "f3".parse().unwrap();
        let f6: Square = "f6".parse().unwrap();
        assert_eq!(eval.piece_value(white_knight, f3), 330);
        assert_eq!(eval.piece_value(black_knight, f6), 330);

        let white_pawn = Piece::new(PieceKind::Pawn, Color::White);
        let black_pawn = Piece::new(PieceKind::Pawn, Color::Black);
        assert_eq!(eval.piece_value(white_pawn, "e7".parse().unwrap()), 150);
        assert_eq!(eval.piece_value(black_pawn, "e2".parse().unwrap()), 150);
        assert_eq!(eval.piece_value(white_pawn, "d2".parse().unwrap()), 80);
    }

    #[test]
    fn developing_a_knight_helps() {
        let start = Board::new();
        let developed = board("rnbqkbnr/pppppppp/8/8/8/5N2/PPPPPPPP/RNBQKB1R");
        assert!(evaluate_board(&developed, Color::White) > evaluate_board(&start, Color::White));
    }
}
