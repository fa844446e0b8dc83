use anyhow::Context as _;
use oxid2048_engine::{Direction, GameMode, GameSession, TileSeed, WINNING_TILE};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Game variant: classic, expanded, reverse or gravity
    #[arg(long, default_value_t = GameMode::Classic)]
    mode: GameMode,
    /// Seed for tile spawning (32 hex digits); random when omitted
    #[arg(long)]
    seed: Option<TileSeed>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { mode, seed } = arg;

    let seed = seed.unwrap_or_else(rand::random);
    let mut session = GameSession::with_seed(*mode, seed);

    eprintln!("Mode: {mode}, seed: {seed}");
    eprintln!("Enter u/d/l/r (or up/down/left/right) to slide, q to quit.");
    print_state(&session);

    for line in std::io::stdin().lines() {
        let line = line.context("Failed to read from stdin")?;
        let token = line.trim();
        if token.is_empty() {
            continue;
        }
        if matches!(token, "q" | "quit") {
            break;
        }
        let input = match token.parse::<Direction>() {
            Ok(input) => input,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        let outcome = session.play(input);
        if !outcome.moved {
            eprintln!("Nothing moved.");
            continue;
        }
        print_state(&session);
        if outcome.reached_win {
            println!("You reached {WINNING_TILE}! Keep going or press q to quit.");
        }
        if session.session_state().is_game_over() {
            println!("Game over!");
            break;
        }
    }

    let stats = session.stats();
    println!(
        "Final score: {}, max tile: {}, moves: {}",
        stats.score(),
        stats.max_tile(),
        stats.moves()
    );
    Ok(())
}

fn print_state(session: &GameSession) {
    println!("{}", session.grid());
    println!("score: {}", session.score());
    println!();
}
