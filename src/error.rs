use thiserror::Error;

use crate::board::Color;
use crate::movegen::Move;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    #[error("invalid square notation: {0:?}")]
    InvalidSquare(String),

    #[error("invalid move notation: {0:?}")]
    InvalidMove(String),

    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    #[error("invalid FEN placement: {0}")]
    InvalidFen(String),

    #[error("illegal move: {0}")]
    IllegalMove(Move),

    #[error("it is {expected:?}'s turn, not {found:?}'s")]
    WrongSide { expected: Color, found: Color },

    #[error("the game is already over")]
    GameOver,
}
