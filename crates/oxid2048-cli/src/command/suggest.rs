use oxid2048_ai::{Searcher, best_direction};
use oxid2048_engine::{Grid, TileSeed};

use super::search_arg::SearchArg;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SuggestArg {
    /// Grid to analyze: rows separated by `/`, cells by `,` (e.g. "2,0,0,2/0,4,0,0/0,0,0,0/0,0,0,8")
    grid: Grid,
    #[clap(flatten)]
    search: SearchArg,
    /// Seed for chance-node sampling (32 hex digits); random when omitted
    #[arg(long)]
    seed: Option<TileSeed>,
}

pub(crate) fn run(arg: &SuggestArg) -> anyhow::Result<()> {
    let SuggestArg { grid, search, seed } = arg;

    let evaluator = search.build_evaluator()?;
    let breakdown = evaluator.breakdown(grid);
    let seed = seed.unwrap_or_else(rand::random);
    let mut searcher = Searcher::with_seed(Box::new(evaluator), search.config(), seed);

    let scores = searcher.evaluate_directions(grid);
    let best = best_direction(&scores);

    println!("{grid}");
    println!();
    match best {
        Some(direction) => println!("direction: {direction}"),
        None => println!("direction: none"),
    }
    for (direction, score) in &scores {
        println!("  {direction:<5} {score:>14.3}");
    }

    println!();
    println!("heuristic breakdown:");
    for c in &breakdown {
        println!(
            "  {:<16} raw {:>10.3} x {:>5.2} = {:>12.3}",
            c.name, c.raw, c.weight, c.weighted
        );
    }
    println!(
        "  {:<16} {:>35.3}",
        "total",
        breakdown.iter().map(|c| c.weighted).sum::<f64>()
    );

    eprintln!("searched {} nodes (seed {seed})", searcher.stats().nodes);
    Ok(())
}
