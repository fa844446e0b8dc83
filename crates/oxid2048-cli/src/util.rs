use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use oxid2048_evaluator::HeuristicWeights;

/// Writes `value` as pretty JSON to `output_path`, or to stdout when no path is given.
pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    match output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_json(BufWriter::new(file), value)
                .with_context(|| format!("Failed to write JSON to {}", path.display()))
        }
        None => write_json(io::stdout().lock(), value).context("Failed to write JSON to stdout"),
    }
}

fn write_json<W, T>(mut writer: W, value: &T) -> anyhow::Result<()>
where
    W: Write,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Reads heuristic weights from a JSON file and rejects non-finite values.
pub fn read_weights_file(path: &Path) -> anyhow::Result<HeuristicWeights> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open weights file: {}", path.display()))?;
    let weights: HeuristicWeights = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse weights JSON file: {}", path.display()))?;
    weights
        .validate()
        .with_context(|| format!("Invalid weights file: {}", path.display()))?;
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use super::*;

    #[test]
    fn test_saved_weights_read_back() {
        let path = env::temp_dir().join(format!("oxid2048-weights-{}.json", process::id()));
        let weights = HeuristicWeights {
            smoothness: 0.5,
            ..HeuristicWeights::default()
        };
        save_json(&weights, Some(&path)).unwrap();
        let read = read_weights_file(&path);
        fs::remove_file(&path).unwrap();
        assert_eq!(read.unwrap(), weights);
    }

    #[test]
    fn test_missing_weights_file_names_path() {
        let path = env::temp_dir().join("oxid2048-no-such-weights.json");
        let err = read_weights_file(&path).unwrap_err();
        assert!(err.to_string().contains("oxid2048-no-such-weights.json"));
    }
}
