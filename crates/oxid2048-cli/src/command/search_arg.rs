use std::path::PathBuf;

use clap::builder::TypedValueParser as _;
use oxid2048_ai::SearchConfig;
use oxid2048_evaluator::{HeuristicEvaluator, HeuristicWeights};

use crate::util;

/// Search options shared by the AI commands.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SearchArg {
    /// Search depth, counting agent and chance levels
    #[arg(long, default_value_t = SearchConfig::default().depth)]
    depth: usize,
    /// Empty cells sampled per chance node
    #[arg(long, default_value_t = SearchConfig::default().sample_cells,
          value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    samples: usize,
    /// Path to a heuristic weights file (JSON); the reference weights are used when omitted
    #[arg(long)]
    weights: Option<PathBuf>,
}

impl SearchArg {
    pub(crate) fn config(&self) -> SearchConfig {
        SearchConfig {
            depth: self.depth,
            sample_cells: self.samples,
        }
    }

    pub(crate) fn load_weights(&self) -> anyhow::Result<HeuristicWeights> {
        match &self.weights {
            Some(path) => util::read_weights_file(path),
            None => Ok(HeuristicWeights::default()),
        }
    }

    pub(crate) fn build_evaluator(&self) -> anyhow::Result<HeuristicEvaluator> {
        Ok(HeuristicEvaluator::new(self.load_weights()?))
    }
}
