//! Statistical utilities for summarizing batches of games.
//!
//! - [`descriptive`]: mean, median, variance and spread of per-game measures
//! - [`percentiles`]: nearest-rank percentiles
//! - [`tally`]: occurrence counts of discrete outcomes (e.g. the max tile of each game)
//!
//! # Examples
//!
//! ```
//! use oxid2048_stats::{descriptive::DescriptiveStats, percentiles::Percentiles, tally::Tally};
//!
//! let scores = [1200.0, 3400.0, 2800.0, 5100.0];
//! let stats = DescriptiveStats::new(scores).unwrap();
//! assert_eq!(stats.max, 5100.0);
//!
//! let percentiles = Percentiles::new(&scores, &[50.0]);
//! assert_eq!(percentiles.get(50.0), Some(3400.0));
//!
//! let max_tiles: Tally<u32> = [256, 512, 512, 1024].into_iter().collect();
//! assert_eq!(max_tiles.at_least(&512), 3);
//! ```

pub mod descriptive;
pub mod percentiles;
pub mod tally;
