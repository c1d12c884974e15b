use clap::Parser;
use fifteen_engine::engine::Game;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Board edge length (an NxN board), between 2 and 10
    #[clap(short, long, default_value_t = 4)]
    size: usize,

    /// Number of seeded shuffles to play through
    #[clap(short, long, default_value_t = 20)]
    boards: usize,

    /// Seed of the first board; board i uses start_seed + i
    #[clap(long, default_value_t = 0)]
    start_seed: u64,

    /// Give up on a board after this many hint-driven moves
    #[clap(short, long, default_value_t = 1000)]
    move_limit: u32,
}

fn main() {
    let args = Args::parse();
    let mut game = match Game::new(args.size) {
        Ok(game) => game,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };
    // This is a batch consumer; the hint cooldown is a UX knob.
    game.set_hint_cooldown(Duration::ZERO);

    println!(
        "Playing the hint heuristic on {} shuffled {}x{} boards (move limit {})...",
        args.boards, args.size, args.size, args.move_limit
    );

    let mut solved_moves: Vec<u32> = Vec::new();

    for board_index in 0..args.boards {
        let seed = args.start_seed + board_index as u64;
        game.reset();
        game.shuffle_seeded(seed);
        game.clear_events();

        while !game.is_won() && game.moves() < args.move_limit {
            match game.request_hint() {
                Ok(Some(hint)) => {
                    if let Err(err) = game.request_move(hint.value) {
                        eprintln!(
                            "Warning: hint chose tile {} on board {} (seed {}) but the move was rejected: {}",
                            hint.value, board_index, seed, err
                        );
                        break;
                    }
                }
                Ok(None) => {
                    eprintln!(
                        "Warning: no suggestion available on board {} (seed {}).",
                        board_index, seed
                    );
                    break;
                }
                Err(err) => {
                    eprintln!(
                        "Warning: hint request failed on board {} (seed {}): {}",
                        board_index, seed, err
                    );
                    break;
                }
            }
            game.clear_events();
        }

        if game.is_won() {
            println!(
                "Board {:>3} (seed {:>3}): solved in {} moves",
                board_index,
                seed,
                game.moves()
            );
            solved_moves.push(game.moves());
        } else {
            println!(
                "Board {:>3} (seed {:>3}): unsolved after {} moves",
                board_index,
                seed,
                game.moves()
            );
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Solved {}/{} boards", solved_moves.len(), args.boards);
    if !solved_moves.is_empty() {
        let total: u32 = solved_moves.iter().sum();
        println!(
            "Average moves on solved boards: {:.1}",
            total as f64 / solved_moves.len() as f64
        );
    }
}
