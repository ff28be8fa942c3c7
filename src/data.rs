// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use histgraph::Summary;
use thiserror::Error;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Error, Debug)]
pub enum DataError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("{path} is not a JSON array of numbers: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("{path}: element {index} is not a finite number")]
    NonFinite { path: String, index: usize },
    #[error("{path}: element {index} is negative ({value})")]
    Negative {
        path: String,
        index: usize,
        value: f64,
    },
}

/// Turn counts of a set of games, in the order they were recorded.
#[derive(Clone, Debug)]
pub struct GameLengths {
    path: PathBuf,
    values: Vec<f64>,
}

impl GameLengths {
    /// Reads a JSON array of numbers. Any element that is not a number, or
    /// is not a valid turn count, fails the whole load.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|source| DataError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let values: Vec<f64> =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| DataError::Json {
                path: path.display().to_string(),
                source,
            })?;

        debug!("loaded {} game lengths from {}", values.len(), path.display());

        Self::from_values(path, values)
    }

    pub fn from_values(path: impl AsRef<Path>, values: Vec<f64>) -> Result<Self, DataError> {
        let path = path.as_ref();

        for (index, value) in values.iter().copied().enumerate() {
            if !value.is_finite() {
                return Err(DataError::NonFinite {
                    path: path.display().to_string(),
                    index,
                });
            }
            if value < 0.0 {
                return Err(DataError::Negative {
                    path: path.display().to_string(),
                    index,
                    value,
                });
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn summary(&self) -> Option<Summary> {
        Summary::of(&self.values)
    }
}

/// Loads every file independently. On failure all of the errors are
/// returned, so one bad file never hides a problem with another.
pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<GameLengths>, Vec<DataError>> {
    let mut loaded = Vec::with_capacity(paths.len());
    let mut errors = Vec::new();

    for path in paths {
        match GameLengths::load(path) {
            Ok(lengths) => loaded.push(lengths),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(loaded)
    } else {
        Err(errors)
    }
}
