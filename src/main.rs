use std::io::{self, Write};

use clap::Parser;
use log::info;
use minimax_chess::{Board, Color, Game, GameStatus, RandomOrdering, Search, SearchConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Play chess against a minimax engine", long_about = None)]
struct Args {
    /// Search depth in plies
    #[arg(long, default_value_t = 3)]
    depth: u32,
    /// Seed for move ordering; omit for a fresh game every run
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many plies
    #[arg(long, default_value_t = 200)]
    max_plies: usize,
    /// Side played from stdin (w or b); both sides are the engine otherwise
    #[arg(long)]
    human: Option<Color>,
    /// Starting placement in FEN
    #[arg(long)]
    fen: Option<String>,
    /// Side to move first (w or b)
    #[arg(long, default_value = "w")]
    to_move: Color,
}

fn describe(status: GameStatus) -> String {
    match status {
        GameStatus::Checkmate { winner } => format!("{winner:?} wins by checkmate"),
        GameStatus::Stalemate => "Draw by stalemate".to_string(),
        GameStatus::ThreefoldRepetition => "Draw by threefold repetition".to_string(),
        GameStatus::FiftyMoveRule => "Draw by the fifty-move rule".to_string(),
        GameStatus::Check | GameStatus::Ongoing => "Unfinished".to_string(),
    }
}

/// Reads moves until one is accepted. Returns false when the player quits.
fn human_turn(game: &mut Game) -> anyhow::Result<bool> {
    loop {
        print!("{:?} to move: ", game.to_move());
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            return Ok(false);
        }
        let input = input.trim();
        if input == "quit" {
            return Ok(false);
        }

        match game.parse_move(input).and_then(|mv| game.play(mv)) {
            Ok(_) => return Ok(true),
            Err(err) => {
                println!("{err}. Legal moves are:");
                let moves: Vec<String> =
                    game.legal_moves().iter().map(|mv| mv.to_string()).collect();
                println!("{}", moves.join(" "));
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let board = match &args.fen {
        Some(fen) => fen.parse::<Board>()?,
        None => Board::new(),
    };
    let ordering = args
        .seed
        .map_or_else(RandomOrdering::new, RandomOrdering::seeded);
    let search = Search::with_ordering(ordering).with_config(SearchConfig { depth: args.depth });
    let mut game = Game::with_search(board, args.to_move, search);

    info!("depth {}, human {:?}", args.depth, args.human);
    println!("{}", game.board());

    for _ in 0..args.max_plies {
        if game.status().is_over() {
            break;
        }

        if args.human == Some(game.to_move()) {
            if !human_turn(&mut game)? {
                println!("Thanks for playing!");
                return Ok(());
            }
        } else {
            match game.play_engine()? {
                Some(mv) => println!("Engine plays {mv}"),
                None => break,
            }
        }

        println!("\n{}", game.board());
        if game.status() == GameStatus::Check {
            println!("Check!");
        }
    }

    println!("{}", describe(game.status()));
    Ok(())
}
