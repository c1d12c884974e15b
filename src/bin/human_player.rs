use clap::Parser;
use fifteen_engine::engine::{Game, GameEvent};
use std::io::{self, Write};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Board edge length (an NxN board), between 2 and 10
    #[clap(short, long, default_value_t = 4)]
    size: usize,
}

fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Drains the engine's event queue and narrates the interesting ones.
/// Board changes are ignored here because the loop re-renders every turn.
fn report_events(game: &mut Game, started: Instant) {
    while let Some(event) = game.poll_event() {
        match event {
            GameEvent::Won => {
                println!();
                println!("---------------------");
                println!("🎉 Solved in {} moves and {}! 🎉", game.moves(), format_elapsed(started.elapsed()));
                println!("---------------------");
            }
            GameEvent::ShuffleComplete => {
                println!("Board shuffled. Go!");
            }
            GameEvent::BoardChanged { .. }
            | GameEvent::ShuffleStepped { .. }
            | GameEvent::IllegalMove { .. }
            | GameEvent::Hint { .. }
            | GameEvent::HintRejected { .. } => {}
        }
    }
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

    println!(
        "Welcome to the {}-puzzle! Tiles on their home square show up green.",
        args.size * args.size - 1
    );
    println!("Type 's' to shuffle and start playing.");

    let mut started = Instant::now();
    let mut hint_highlight: Option<usize> = None;

    loop {
        println!();
        println!("{}", game.board().to_string_with_highlight(hint_highlight));
        if game.is_playing() || game.is_won() {
            println!("Moves: {}   Time: {}", game.moves(), format_elapsed(started.elapsed()));
        }

        print!("Enter a tile to move, 's' to shuffle, 'h' for a hint, 'r' to reset, 'q' to quit: ");
        io::stdout().flush().unwrap();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            println!("Error reading input. Please try again.");
            continue;
        }

        match input.trim() {
            "q" => {
                println!("Thanks for playing!");
                break;
            }
            "s" => {
                game.shuffle();
                started = Instant::now();
                hint_highlight = None;
            }
            "r" => {
                game.reset();
                hint_highlight = None;
                println!("Board reset. Shuffle to start a new round.");
            }
            "h" => match game.request_hint() {
                Ok(Some(hint)) => {
                    println!("Hint: {}", hint.rationale);
                    hint_highlight = Some(hint.index);
                }
                Ok(None) => println!("No suggestion available."),
                Err(err) => println!("{}", err),
            },
            other => match other.parse::<u8>() {
                Ok(value) => match game.request_move(value) {
                    Ok(()) => hint_highlight = None,
                    Err(err) => println!("{}", err),
                },
                Err(_) => {
                    println!("Unrecognized input. Use a tile number, 's', 'h', 'r' or 'q'.")
                }
            },
        }

        report_events(&mut game, started);
    }
}
