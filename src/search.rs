use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, trace};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::board::{Board, Color};
use crate::evaluation::Evaluator;
use crate::movegen::{generate_legal_moves, Move};
use crate::state::GameState;
use crate::status::is_in_check;

/// Score of a position where the side to move has been mated.
pub const MATE_SCORE: i32 = 99_999;
pub const DRAW_SCORE: i32 = 0;
pub const DEFAULT_DEPTH: u32 = 3;

/// Decides the order in which sibling moves are searched.
pub trait MoveOrdering {
    fn order(&mut self, moves: &mut [Move]);
}

/// Shuffles siblings so equal-scoring moves vary from game to game.
pub struct RandomOrdering {
    rng: SmallRng,
}

impl RandomOrdering {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomOrdering {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveOrdering for RandomOrdering {
    fn order(&mut self, moves: &mut [Move]) {
        moves.shuffle(&mut self.rng);
    }
}

/// Leaves moves in generation order. Fully deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeneratedOrdering;

impl MoveOrdering for GeneratedOrdering {
    fn order(&mut self, _moves: &mut [Move]) {}
}

#[derive(Debug, Clone, Copy)]
pub struct SearchConfig {
    /// Plies searched from the root, the root move included.
    pub depth: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: i32,
    pub nodes: u64,
}

pub struct Search<O: MoveOrdering = RandomOrdering> {
    evaluator: Evaluator,
    ordering: O,
    config: SearchConfig,
    nodes_searched: u64,
    abort: Option<Arc<AtomicBool>>,
}

impl Search<RandomOrdering> {
    pub fn new() -> Self {
        Self::with_ordering(RandomOrdering::new())
    }
}

impl Default for Search<RandomOrdering> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: MoveOrdering> Search<O> {
    pub fn with_ordering(ordering: O) -> Self {
        Self {
            evaluator: Evaluator::new(),
            ordering,
            config: SearchConfig::default(),
            nodes_searched: 0,
            abort: None,
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn set_max_depth(&mut self, depth: u32) {
        self.config.depth = depth;
    }

    pub fn get_nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// Flag that, once raised from any thread, winds the current search
    /// down: interior nodes fall back to the static evaluation and the root
    /// returns the best move found so far.
    pub fn stop_handle(&mut self) -> Arc<AtomicBool> {
        self.abort
            .get_or_insert_with(|| Arc::new(AtomicBool::new(false)))
            .clone()
    }

    fn stopped(&self) -> bool {
        self.abort
            .as_ref()
            .map_or(false, |flag| flag.load(Ordering::Relaxed))
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Depth-limited minimax with alpha-beta pruning, scored for `ai_color`.
    ///
    /// `maximizing` means `ai_color` is to move. A side with no legal moves
    /// scores as mated (±`MATE_SCORE`) if it is in check, otherwise as a draw.
    #[allow(clippy::too_many_arguments)]
    pub fn minimax(
        &mut self,
        board: &Board,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        ai_color: Color,
        state: &GameState,
    ) -> i32 {
        self.nodes_searched += 1;

        if depth == 0 || self.stopped() {
            return self.evaluator.evaluate(board, ai_color);
        }

        let side = if maximizing {
            ai_color
        } else {
            ai_color.opposite()
        };
        let mut moves = generate_legal_moves(board, side, state);
        if moves.is_empty() {
            if is_in_check(board, side) {
                return if maximizing { -MATE_SCORE } else { MATE_SCORE };
            }
            return DRAW_SCORE;
        }

        self.ordering.order(&mut moves);

        if maximizing {
            let mut best = i32::MIN;
            for mv in moves {
                let (child, child_state) = play(board, state, &mv);
                let score =
                    self.minimax(&child, depth - 1, alpha, beta, false, ai_color, &child_state);
                best = best.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    trace!("beta cutoff after {} at depth {}", mv, depth);
                    break;
                }
            }
            best
        } else {
            let mut best = i32::MAX;
            for mv in moves {
                let (child, child_state) = play(board, state, &mv);
                let score =
                    self.minimax(&child, depth - 1, alpha, beta, true, ai_color, &child_state);
                best = best.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    trace!("alpha cutoff after {} at depth {}", mv, depth);
                    break;
                }
            }
            best
        }
    }

    /// Picks the move for `ai_color` with the best minimax score.
    pub fn find_best_move(
        &mut self,
        board: &Board,
        ai_color: Color,
        state: &GameState,
    ) -> SearchResult {
        self.nodes_searched = 0;

        let mut moves = generate_legal_moves(board, ai_color, state);
        self.ordering.order(&mut moves);

        let mut best_move = None;
        let mut best_score = i32::MIN;
        let mut alpha = i32::MIN;
        let beta = i32::MAX;
        let child_depth = self.config.depth.saturating_sub(1);

        for mv in moves {
            if best_move.is_some() && self.stopped() {
                debug!("search stopped with {} nodes searched", self.nodes_searched);
                break;
            }

            let (child, child_state) = play(board, state, &mv);
            let score =
                self.minimax(&child, child_depth, alpha, beta, false, ai_color, &child_state);
            debug!("root move {} scored {}", mv, score);

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            alpha = alpha.max(best_score);
        }

        match best_move {
            Some(mv) => info!(
                "{:?} plays {} (score {}, {} nodes)",
                ai_color, mv, best_score, self.nodes_searched
            ),
            None => info!("{:?} has no legal move", ai_color),
        }

        SearchResult {
            best_move,
            score: if best_move.is_some() { best_score } else { 0 },
            nodes: self.nodes_searched,
        }
    }

    /// Board after `ai_color`'s chosen move, with that move stored as the
    /// last move in `state`. The input board comes back unchanged when there
    /// is nothing to play; callers detect mate and stalemate themselves.
    pub fn make_ai_move(&mut self, board: &Board, ai_color: Color, state: &mut GameState) -> Board {
        match self.find_best_move(board, ai_color, state).best_move {
            Some(mv) => {
                let next = board.with_move(&mv);
                state.set_last_move(mv);
                next
            }
            None => board.clone(),
        }
    }
}

fn play(board: &Board, state: &GameState, mv: &Move) -> (Board, GameState) {
    let mut child_state = state.fork();
    child_state.note_move(board, mv);
    (board.with_move(mv), child_state)
}

/// Minimax with the standard evaluator and randomized ordering.
pub fn minimax(
    board: &Board,
    depth: u32,
    alpha: i32,
    beta: i32,
    maximizing: bool,
    ai_color: Color,
    state: &GameState,
) -> i32 {
    Search::new().minimax(board, depth, alpha, beta, maximizing, ai_color, state)
}

/// Computer move at the default depth of three plies.
///
/// Only the last move is stored in `state`. Callers that also track castling
/// rights and the half-move clock should pair `Search::find_best_move` with
/// `GameState::note_move`, as `Game::play_engine` does.
pub fn make_ai_move(board: &Board, ai_color: Color, state: &mut GameState) -> Board {
    Search::new().make_ai_move(board, ai_color, state)
}
