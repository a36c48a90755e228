pub mod board;
pub mod error;
pub mod evaluation;
pub mod game;
pub mod movegen;
pub mod search;
pub mod state;
pub mod status;

pub use board::{Board, Color, Piece, PieceKind, Square};
pub use error::ChessError;
pub use evaluation::{evaluate_board, Evaluator};
pub use game::Game;
pub use movegen::{generate_legal_moves, is_legal_move, is_square_attacked, Move};
pub use search::{
    make_ai_move, minimax, GeneratedOrdering, MoveOrdering, RandomOrdering, Search, SearchConfig,
    SearchResult, MATE_SCORE,
};
pub use state::{CastleSide, GameState};
pub use status::{game_status, is_checkmate, is_in_check, is_stalemate, GameStatus};
