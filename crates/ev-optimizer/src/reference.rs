use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, info};

use ev_types::{column_bounds, normalize, EvResult, EvaluationError};

/// A reference front with its per-objective bounds and normalized form,
/// computed once.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceFront {
    name: String,
    points: Vec<Vec<f64>>,
    mins: Vec<f64>,
    maxs: Vec<f64>,
    normalized: Vec<Vec<f64>>,
}

impl ReferenceFront {
    pub fn new(name: impl Into<String>, points: Vec<Vec<f64>>) -> EvResult<Self> {
        let name = name.into();
        let invalid = |message: String| EvaluationError::ReferenceFront {
            source_name: name.clone(),
            message,
        };
        let dimension = match points.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(invalid("the front is empty".to_string()).into()),
        };
        if let Some(row) = points.iter().position(|p| p.len() != dimension) {
            return Err(invalid(format!(
                "row {} has {} values, expected {}",
                row + 1,
                points[row].len(),
                dimension
            ))
            .into());
        }
        if points.iter().flatten().any(|v| !v.is_finite()) {
            return Err(invalid("the front contains non-finite values".to_string()).into());
        }

        let (mins, maxs) = column_bounds(&points);
        let normalized = normalize(&points, &mins, &maxs);
        Ok(Self {
            name,
            points,
            mins,
            maxs,
            normalized,
        })
    }

    /// Read a delimited numeric matrix, one point per row. Values may be
    /// separated by commas, tabs or spaces.
    pub fn from_file<P: AsRef<Path>>(path: P) -> EvResult<Self> {
        let path = path.as_ref();
        info!("Loading reference front from: {}", path.display());
        let name = path.display().to_string();
        let failed = |message: String| EvaluationError::ReferenceFront {
            source_name: name.clone(),
            message,
        };

        let content = std::fs::read_to_string(path)?;
        let delimiter = detect_delimiter(&content);
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let mut points = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| failed(format!("line {}: {}", line + 1, e)))?;
            let row = record
                .iter()
                .filter(|field| !field.is_empty())
                .map(|field| {
                    field
                        .parse::<f64>()
                        .map_err(|e| failed(format!("line {}: '{}' is not a number: {}", line + 1, field, e)))
                })
                .collect::<Result<Vec<f64>, _>>()?;
            if !row.is_empty() {
                points.push(row);
            }
        }
        debug!("Read {} points from {}", points.len(), path.display());
        Self::new(name, points)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    pub fn dimension(&self) -> usize {
        self.mins.len()
    }

    pub fn mins(&self) -> &[f64] {
        &self.mins
    }

    pub fn maxs(&self) -> &[f64] {
        &self.maxs
    }

    pub fn normalized(&self) -> &[Vec<f64>] {
        &self.normalized
    }

    /// Normalize `front` with this front's bounds.
    pub fn normalize(&self, front: &[Vec<f64>]) -> Vec<Vec<f64>> {
        normalize(front, &self.mins, &self.maxs)
    }
}

fn detect_delimiter(content: &str) -> u8 {
    let sample = content.lines().find(|line| !line.trim().is_empty()).unwrap_or("");
    if sample.contains(',') {
        b','
    } else if sample.contains('\t') {
        b'\t'
    } else {
        b' '
    }
}
