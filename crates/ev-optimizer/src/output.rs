//! Result files of a meta-optimization run.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use ev_params::{describe_space_json, ParameterSpace};
use ev_types::{internal_error, EvResult};

use crate::trial::Trial;

pub const VARIABLES_FILE: &str = "VAR.csv";
pub const OBJECTIVES_FILE: &str = "FUN.csv";
pub const CONFIGURATIONS_FILE: &str = "CONFIGURATIONS.txt";
pub const TRIALS_FILE: &str = "trials.json";
pub const PARAMETER_SPACE_FILE: &str = "parameterSpace.json";

/// Write a numeric matrix without headers, one row per line.
pub fn write_matrix<P: AsRef<Path>>(path: P, rows: &[Vec<f64>]) -> EvResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path.as_ref())
        .map_err(|e| internal_error!("Cannot create {}: {}", path.as_ref().display(), e))?;
    for row in rows {
        writer
            .write_record(row.iter().map(|v| v.to_string()))
            .map_err(|e| internal_error!("Cannot write {}: {}", path.as_ref().display(), e))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `VAR.csv`, `FUN.csv` and `CONFIGURATIONS.txt` for the completed
/// trials in `front` (row `i` of each file belongs to the same trial) and
/// every trial to `trials.json`. Returns the written paths.
pub fn write_results<P: AsRef<Path>>(dir: P, front: &[&Trial], trials: &[Trial]) -> EvResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let completed: Vec<&Trial> = front.iter().copied().filter(|t| t.result.is_some()).collect();
    let variables: Vec<Vec<f64>> = completed.iter().map(|t| t.vector.clone()).collect();
    let objectives: Vec<Vec<f64>> = completed
        .iter()
        .filter_map(|t| t.result.as_ref().map(|r| r.objectives.clone()))
        .collect();

    let var_path = dir.join(VARIABLES_FILE);
    write_matrix(&var_path, &variables)?;
    let fun_path = dir.join(OBJECTIVES_FILE);
    write_matrix(&fun_path, &objectives)?;

    let config_path = dir.join(CONFIGURATIONS_FILE);
    let mut file = fs::File::create(&config_path)?;
    for trial in &completed {
        writeln!(file, "{}", trial.configuration)?;
    }

    let trials_path = dir.join(TRIALS_FILE);
    fs::write(&trials_path, serde_json::to_string_pretty(trials)?)?;

    info!("Wrote {} non-dominated configurations to {}", completed.len(), dir.display());
    Ok(vec![var_path, fun_path, config_path, trials_path])
}

/// Write the JSON description of the searched space next to the results.
pub fn write_parameter_space<P: AsRef<Path>>(dir: P, space: &ParameterSpace) -> EvResult<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let path = dir.join(PARAMETER_SPACE_FILE);
    fs::write(&path, describe_space_json(space)?)?;
    Ok(path)
}
