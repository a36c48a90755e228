use std::fmt;
use std::str::FromStr;

use crate::error::ChessError;
use crate::movegen::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(&self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a single pawn step. White plays up the board toward row 0.
    pub fn pawn_direction(&self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    pub fn pawn_start_row(&self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    pub fn back_row(&self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

impl FromStr for Color {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "w" | "white" => Ok(Color::White),
            "b" | "black" => Ok(Color::Black),
            _ => Err(ChessError::InvalidColor(s.to_string())),
        }
    }
}

/// A piece is identified by its kind and color, and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self { kind, color }
    }

    /// FEN letter: upper case for White, lower case for Black.
    pub fn symbol(&self) -> char {
        let c = self.kind.to_char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_symbol(c: char) -> Option<Piece> {
        let kind = PieceKind::from_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(kind, color))
    }
}

/// Board coordinate. Row 0 is Black's back rank (rank 8), column 0 is the a-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// The square `dr` rows and `dc` columns away, if it is still on the board.
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Square> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// All 64 squares, row by row from the top of the board.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|row| (0..8u8).map(move |col| Square::new(row, col)))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let file = (b'a' + self.col) as char;
        let rank = 8 - self.row;
        write!(f, "{}{}", file, rank)
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(ChessError::InvalidSquare(s.to_string()));
        }
        let file = bytes[0].to_ascii_lowercase();
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
            return Err(ChessError::InvalidSquare(s.to_string()));
        }
        Ok(Square::new(8 - (rank - b'0'), file - b'a'))
    }
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    /// The standard starting layout.
    pub fn new() -> Self {
        let mut board = Board::empty();
        for color in [Color::White, Color::Black] {
            let back = color.back_row();
            let pawns = color.pawn_start_row();
            for (col, &kind) in BACK_RANK.iter().enumerate() {
                board.set(Square::new(back, col as u8), Some(Piece::new(kind, color)));
                board.set(
                    Square::new(pawns, col as u8),
                    Some(Piece::new(PieceKind::Pawn, color)),
                );
            }
        }
        board
    }

    pub fn empty() -> Self {
        Self {
            squares: [[None; 8]; 8],
        }
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.row as usize][square.col as usize]
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.row as usize][square.col as usize] = piece;
    }

    fn take(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.row as usize][square.col as usize].take()
    }

    /// Every occupied square holding a piece of `color`.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| match self.piece_at(sq) {
            Some(piece) if piece.color == color => Some((sq, piece)),
            _ => None,
        })
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        let king = Piece::new(PieceKind::King, color);
        Square::all().find(|&sq| self.piece_at(sq) == Some(king))
    }

    /// Applies `mv` in place and returns the captured piece, if any.
    ///
    /// En passant and castling are recognised from the board alone: a pawn
    /// stepping diagonally onto an empty square takes the pawn beside it, and
    /// a king moving two columns brings the corner rook over to the square it
    /// crossed. No legality checking happens here.
    pub fn apply_move(&mut self, mv: &Move) -> Option<Piece> {
        let mut captured = self.take(mv.to);

        match mv.piece.kind {
            PieceKind::Pawn if mv.from.col != mv.to.col && captured.is_none() => {
                let beside = Square::new(mv.from.row, mv.to.col);
                if matches!(
                    self.piece_at(beside),
                    Some(p) if p.kind == PieceKind::Pawn && p.color != mv.piece.color
                ) {
                    captured = self.take(beside);
                }
            }
            PieceKind::King if mv.from.row == mv.to.row && mv.from.col.abs_diff(mv.to.col) == 2 => {
                let (rook_col, rook_to) = if mv.to.col > mv.from.col {
                    (7, mv.from.col + 1)
                } else {
                    (0, mv.from.col - 1)
                };
                let rook = self.take(Square::new(mv.from.row, rook_col));
                self.set(Square::new(mv.from.row, rook_to), rook);
            }
            _ => {}
        }

        self.set(mv.from, None);
        self.set(mv.to, Some(mv.piece));
        captured
    }

    /// A scratch copy of the board with `mv` applied.
    pub fn with_move(&self, mv: &Move) -> Board {
        let mut next = self.clone();
        next.apply_move(mv);
        next
    }

    /// Canonical serialization used for repetition detection.
    pub fn position_key(&self) -> String {
        let mut key = String::with_capacity(71);
        for (row, squares) in self.squares.iter().enumerate() {
            if row > 0 {
                key.push('/');
            }
            for square in squares {
                key.push(square.map_or('.', |p| p.symbol()));
            }
        }
        key
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl FromStr for Board {
    type Err = ChessError;

    /// Parses the piece-placement field of a FEN record. Any trailing FEN
    /// fields are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let placement = s
            .split_whitespace()
            .next()
            .ok_or_else(|| ChessError::InvalidFen("empty input".to_string()))?;
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return Err(ChessError::InvalidFen(format!(
                "expected 8 rows, found {}",
                rows.len()
            )));
        }

        let mut board = Board::empty();
        for (row, text) in rows.iter().enumerate() {
            let mut col = 0u8;
            for c in text.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(ChessError::InvalidFen(format!("bad empty run {c:?}")));
                    }
                    col += skip as u8;
                } else {
                    let piece = Piece::from_symbol(c)
                        .ok_or_else(|| ChessError::InvalidFen(format!("unknown piece {c:?}")))?;
                    if col >= 8 {
                        return Err(ChessError::InvalidFen(format!("row {} is too long", row + 1)));
                    }
                    board.set(Square::new(row as u8, col), Some(piece));
                    col += 1;
                }
                if col > 8 {
                    return Err(ChessError::InvalidFen(format!("row {} is too long", row + 1)));
                }
            }
            if col != 8 {
                return Err(ChessError::InvalidFen(format!("row {} is too short", row + 1)));
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut result = String::new();
        for (row, squares) in self.squares.iter().enumerate() {
            result.push((b'8' - row as u8) as char);
            result.push(' ');
            for (col, square) in squares.iter().enumerate() {
                result.push(square.map_or('.', |p| p.symbol()));
                if col < 7 {
                    result.push(' ');
                }
            }
            result.push('\n');
        }
        result.push_str("  a b c d e f g h\n");
        write!(f, "{}", result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn starting_layout() {
        let board = Board::new();
        assert_eq!(board.pieces(Color::White).count(), 16);
        assert_eq!(board.pieces(Color::Black).count(), 16);
        assert_eq!(board.piece_at(sq("e1")), Some(Piece::new(PieceKind::King, Color::White)));
        assert_eq!(board.piece_at(sq("d8")), Some(Piece::new(PieceKind::Queen, Color::Black)));
        assert_eq!(board.piece_at(sq("a2")), Some(Piece::new(PieceKind::Pawn, Color::White)));
        assert!(board.is_empty(sq("e4")));
        assert_eq!(board.find_king(Color::Black), Some(sq("e8")));
    }

    #[test]
    fn square_notation() {
        assert_eq!(sq("a8"), Square::new(0, 0));
        assert_eq!(sq("h1"), Square::new(7, 7));
        assert_eq!(sq("e2"), Square::new(6, 4));
        assert_eq!(Square::new(4, 3).to_string(), "d4");
        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("e".parse::<Square>().is_err());
    }

    #[test]
    fn offset_stays_on_board() {
        assert_eq!(sq("a1").offset(-1, 1), Some(sq("b2")));
        assert_eq!(sq("a1").offset(1, 0), None);
        assert_eq!(sq("h8").offset(0, 1), None);
    }

    #[test]
    fn fen_placement_matches_new() {
        let parsed: Board = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
            .parse()
            .unwrap();
        assert_eq!(parsed, Board::new());
    }

    #[test]
    fn fen_rejects_malformed_rows() {
        assert!("8/8/8/8/8/8/8".parse::<Board>().is_err());
        assert!("9/8/8/8/8/8/8/8".parse::<Board>().is_err());
        assert!("ppppppppp/8/8/8/8/8/8/8".parse::<Board>().is_err());
        assert!("7/8/8/8/8/8/8/8".parse::<Board>().is_err());
        assert!("x7/8/8/8/8/8/8/8".parse::<Board>().is_err());
    }

    #[test]
    fn apply_plain_capture() {
        let mut board: Board = "4k3/8/8/3p4/4P3/8/8/4K3".parse().unwrap();
        let pawn = Piece::new(PieceKind::Pawn, Color::White);
        let captured = board.apply_move(&Move::new(sq("e4"), sq("d5"), pawn));
        assert_eq!(captured, Some(Piece::new(PieceKind::Pawn, Color::Black)));
        assert_eq!(board.piece_at(sq("d5")), Some(pawn));
        assert!(board.is_empty(sq("e4")));
    }

    #[test]
    fn apply_en_passant_removes_passed_pawn() {
        let mut board: Board = "4k3/8/8/3pP3/8/8/8/4K3".parse().unwrap();
        let pawn = Piece::new(PieceKind::Pawn, Color::White);
        let captured = board.apply_move(&Move::new(sq("e5"), sq("d6"), pawn));
        assert_eq!(captured, Some(Piece::new(PieceKind::Pawn, Color::Black)));
        assert!(board.is_empty(sq("d5")));
        assert_eq!(board.piece_at(sq("d6")), Some(pawn));
    }

    #[test]
    fn apply_castling_moves_rook() {
        let mut board: Board = "r3k2r/8/8/8/8/8/8/R3K2R".parse().unwrap();
        let white_king = Piece::new(PieceKind::King, Color::White);
        let black_king = Piece::new(PieceKind::King, Color::Black);
        board.apply_move(&Move::new(sq("e1"), sq("g1"), white_king));
        board.apply_move(&Move::new(sq("e8"), sq("c8"), black_king));

        assert_eq!(board.piece_at(sq("f1")), Some(Piece::new(PieceKind::Rook, Color::White)));
        assert!(board.is_empty(sq("h1")));
        assert_eq!(board.piece_at(sq("d8")), Some(Piece::new(PieceKind::Rook, Color::Black)));
        assert!(board.is_empty(sq("a8")));
    }

    #[test]
    fn with_move_leaves_original_alone() {
        let board = Board::new();
        let pawn = Piece::new(PieceKind::Pawn, Color::White);
        let next = board.with_move(&Move::new(sq("e2"), sq("e4"), pawn));
        assert_eq!(board, Board::new());
        assert_ne!(board.position_key(), next.position_key());
    }

    #[test]
    fn position_key_layout() {
        assert_eq!(
            Board::new().position_key(),
            "rnbqkbnr/pppppppp/......../......../......../......../PPPPPPPP/RNBQKBNR"
        );
    }
}
