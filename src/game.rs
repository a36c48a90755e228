use log::debug;

use crate::board::{Board, Color, Square};
use crate::error::ChessError;
use crate::movegen::{generate_legal_moves, is_legal_move, Move};
use crate::search::{MoveOrdering, RandomOrdering, Search};
use crate::state::GameState;
use crate::status::{game_status, GameStatus};

/// One game: the board, its bookkeeping, whose turn it is, and the engine
/// that answers for either side.
pub struct Game<O: MoveOrdering = RandomOrdering> {
    board: Board,
    state: GameState,
    to_move: Color,
    search: Search<O>,
}

impl Game<RandomOrdering> {
    pub fn new() -> Self {
        Self::from_board(Board::new(), Color::White)
    }

    pub fn from_board(board: Board, to_move: Color) -> Self {
        Self::with_search(board, to_move, Search::new())
    }
}

impl Default for Game<RandomOrdering> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: MoveOrdering> Game<O> {
    pub fn with_search(board: Board, to_move: Color, search: Search<O>) -> Self {
        let mut state = GameState::new();
        state.record_position(&board);
        Self {
            board,
            state,
            to_move,
            search,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn to_move(&self) -> Color {
        self.to_move
    }

    pub fn search_mut(&mut self) -> &mut Search<O> {
        &mut self.search
    }

    pub fn status(&self) -> GameStatus {
        game_status(&self.board, self.to_move, &self.state)
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        generate_legal_moves(&self.board, self.to_move, &self.state)
    }

    /// Reads coordinate notation such as `e2e4` against the current board.
    pub fn parse_move(&self, text: &str) -> Result<Move, ChessError> {
        let text = text.trim();
        if text.len() != 4 || !text.is_ascii() {
            return Err(ChessError::InvalidMove(text.to_string()));
        }
        let from: Square = text[..2].parse()?;
        let to: Square = text[2..].parse()?;
        let piece = self
            .board
            .piece_at(from)
            .ok_or_else(|| ChessError::InvalidMove(text.to_string()))?;
        Ok(Move::new(from, to, piece))
    }

    /// Plays a move for the side to move after checking it is legal.
    pub fn play(&mut self, mv: Move) -> Result<GameStatus, ChessError> {
        if self.status().is_over() {
            return Err(ChessError::GameOver);
        }
        if mv.piece.color != self.to_move {
            return Err(ChessError::WrongSide {
                expected: self.to_move,
                found: mv.piece.color,
            });
        }
        if !is_legal_move(&self.board, mv.piece, mv.from, mv.to, &self.state) {
            return Err(ChessError::IllegalMove(mv));
        }
        Ok(self.commit(mv))
    }

    /// Lets the engine move for the side to move. `Ok(None)` means there was
    /// no legal move to make.
    pub fn play_engine(&mut self) -> Result<Option<Move>, ChessError> {
        if self.status().is_over() {
            return Err(ChessError::GameOver);
        }
        let result = self
            .search
            .find_best_move(&self.board, self.to_move, &self.state);
        match result.best_move {
            Some(mv) => {
                self.commit(mv);
                Ok(Some(mv))
            }
            None => Ok(None),
        }
    }

    fn commit(&mut self, mv: Move) -> GameStatus {
        self.state.note_move(&self.board, &mv);
        self.board.apply_move(&mv);
        self.state.record_position(&self.board);
        self.to_move = self.to_move.opposite();

        let status = self.status();
        debug!(
            "{} played, clock {}, status {:?}",
            mv,
            self.state.half_move_clock(),
            status
        );
        status
    }
}
