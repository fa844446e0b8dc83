use clap::{Parser, Subcommand};

use self::{auto_play::AutoPlayArg, play::PlayArg, suggest::SuggestArg};

mod auto_play;
mod play;
mod search_arg;
mod suggest;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a game manually, one direction per line on stdin
    Play(#[clap(flatten)] PlayArg),
    /// Let the expectimax AI play a batch of games and write a JSON report
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Print the AI's chosen direction for a single grid
    Suggest(#[clap(flatten)] SuggestArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
        Mode::Suggest(arg) => suggest::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition_is_valid() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_samples_must_be_positive() {
        let parse = |samples: &str| {
            CommandArgs::try_parse_from(["oxid2048", "suggest", "2,0/0,2", "--samples", samples])
        };
        assert!(parse("0").is_err());
        let args = parse("2").unwrap();
        assert!(matches!(args.mode, Some(Mode::Suggest(_))));
    }
}
