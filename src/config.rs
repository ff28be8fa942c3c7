// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use histgraph::Bins;
use rustcommon_logger::LevelFilter;
use serde_derive::*;
use thiserror::Error;

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    general: General,
    #[serde(default)]
    chart: Chart,
    #[serde(default)]
    simulation: Simulation,
}

#[derive(Copy, Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Default for Level {
    fn default() -> Self {
        Level::Info
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => LevelFilter::Error,
            Level::Warn => LevelFilter::Warn,
            Level::Info => LevelFilter::Info,
            Level::Debug => LevelFilter::Debug,
            Level::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct General {
    #[serde(default)]
    logging: Level,
}

impl General {
    pub fn logging(&self) -> Level {
        self.logging
    }

    pub fn set_logging(&mut self, level: Level) {
        self.logging = level;
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Chart {
    #[serde(default = "default_title")]
    title: String,
    #[serde(default = "default_x_label")]
    x_label: String,
    y_label: Option<String>,
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
    #[serde(default = "default_grid")]
    grid: bool,
    #[serde(default)]
    density: bool,
    #[serde(default)]
    bins_start: i64,
    #[serde(default = "default_bins_end")]
    bins_end: i64,
    x_max: Option<f64>,
}

fn default_title() -> String {
    "Game Lengths".to_string()
}

fn default_x_label() -> String {
    "# Turns".to_string()
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    960
}

fn default_grid() -> bool {
    true
}

fn default_bins_end() -> i64 {
    1000
}

impl Default for Chart {
    fn default() -> Self {
        Self {
            title: default_title(),
            x_label: default_x_label(),
            y_label: None,
            width: default_width(),
            height: default_height(),
            grid: default_grid(),
            density: false,
            bins_start: 0,
            bins_end: default_bins_end(),
            x_max: None,
        }
    }
}

impl Chart {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub fn x_label(&self) -> &str {
        &self.x_label
    }

    pub fn set_x_label(&mut self, label: String) {
        self.x_label = label;
    }

    /// the y-axis label, falling back to one matching the normalisation
    pub fn y_label(&self) -> &str {
        match &self.y_label {
            Some(label) => label.as_str(),
            None if self.density => "Density",
            None => "Frequency",
        }
    }

    pub fn set_y_label(&mut self, label: Option<String>) {
        self.y_label = label;
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn grid(&self) -> bool {
        self.grid
    }

    pub fn set_grid(&mut self, grid: bool) {
        self.grid = grid;
    }

    pub fn density(&self) -> bool {
        self.density
    }

    pub fn set_density(&mut self, density: bool) {
        self.density = density;
    }

    /// unit-wide bins with integer edges `bins_start..bins_end`
    pub fn bins(&self) -> Result<Bins, ConfigError> {
        Bins::integer(self.bins_start, self.bins_end)
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn set_bins(&mut self, start: i64, end: i64) {
        self.bins_start = start;
        self.bins_end = end;
    }

    pub fn x_max(&self) -> Option<f64> {
        self.x_max
    }

    pub fn set_x_max(&mut self, x_max: Option<f64>) {
        self.x_max = x_max;
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.bins()?;

        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "chart size {}x{} has no area",
                self.width, self.height
            )));
        }

        if let Some(x_max) = self.x_max {
            if !(x_max > self.bins_start as f64) {
                return Err(ConfigError::Invalid(format!(
                    "x_max {} must be greater than bins_start {}",
                    x_max, self.bins_start
                )));
            }
        }

        Ok(())
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Simulation {
    #[serde(default = "default_duration")]
    duration: f64,
    games: Option<usize>,
    #[serde(default = "default_small_games")]
    small_games: usize,
    #[serde(default = "default_small_table")]
    small_table: bool,
    seed: Option<u64>,
    output_dir: Option<String>,
}

fn default_duration() -> f64 {
    1.0
}

fn default_small_games() -> usize {
    100_000
}

fn default_small_table() -> bool {
    true
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            duration: default_duration(),
            games: None,
            small_games: default_small_games(),
            small_table: default_small_table(),
            seed: None,
            output_dir: None,
        }
    }
}

impl Simulation {
    /// minimum wall-clock time to spend simulating each setup
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration)
    }

    pub fn set_duration(&mut self, seconds: f64) {
        self.duration = seconds;
    }

    /// a fixed number of games per setup, which replaces the duration
    pub fn games(&self) -> Option<usize> {
        self.games
    }

    pub fn set_games(&mut self, games: Option<usize>) {
        self.games = games;
    }

    pub fn small_games(&self) -> usize {
        self.small_games
    }

    pub fn set_small_games(&mut self, games: usize) {
        self.small_games = games;
    }

    pub fn small_table(&self) -> bool {
        self.small_table
    }

    pub fn set_small_table(&mut self, enabled: bool) {
        self.small_table = enabled;
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.seed = seed;
    }

    /// directory for the game length files, the working directory if unset
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_default()
    }

    pub fn set_output_dir(&mut self, dir: Option<String>) {
        self.output_dir = dir;
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if Duration::try_from_secs_f64(self.duration).is_err() {
            return Err(ConfigError::Invalid(format!(
                "simulation duration {} is not a non-negative number of seconds",
                self.duration
            )));
        }

        if self.games == Some(0) {
            return Err(ConfigError::Invalid(
                "simulation games must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

impl Config {
    /// load the config from a TOML file, or the builtin defaults
    pub fn load(file: Option<&str>) -> Result<Config, ConfigError> {
        match file {
            Some(file) => {
                let mut content = String::new();
                std::fs::File::open(file)
                    .and_then(|mut f| f.read_to_string(&mut content))
                    .map_err(|source| ConfigError::Io {
                        path: file.to_string(),
                        source,
                    })?;
                Config::load_str(file, &content)
            }
            None => Ok(Default::default()),
        }
    }

    pub fn load_str(name: &str, content: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: name.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// check invariants again after command line overrides
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.chart.validate()?;
        self.simulation.validate()
    }

    pub fn general(&self) -> &General {
        &self.general
    }

    pub fn general_mut(&mut self) -> &mut General {
        &mut self.general
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn chart_mut(&mut self) -> &mut Chart {
        &mut self.chart
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut Simulation {
        &mut self.simulation
    }

    /// get logging level
    pub fn logging(&self) -> Level {
        self.general.logging()
    }

    pub fn print_chart(&self) {
        let chart = &self.chart;
        info!("-----");
        info!(
            "Config: Chart: Title: {:?} X: {:?} Y: {:?}",
            chart.title(),
            chart.x_label(),
            chart.y_label(),
        );
        info!(
            "Config: Chart: Size: {}x{} Grid: {} Density: {}",
            chart.width,
            chart.height,
            chart.grid(),
            chart.density(),
        );
        info!(
            "Config: Bins: {}..{} X-Max: {}",
            chart.bins_start,
            chart.bins_end,
            chart
                .x_max()
                .map(|v| format!("{}", v))
                .unwrap_or_else(|| "Full".to_string()),
        );
    }

    pub fn print_simulation(&self) {
        let simulation = &self.simulation;
        info!("-----");
        info!(
            "Config: Simulation: Budget: {} Small Games: {}",
            simulation
                .games()
                .map(|v| format!("{} games", v))
                .unwrap_or_else(|| format!("{:?}", simulation.duration())),
            if simulation.small_table() {
                format!("{}", simulation.small_games())
            } else {
                "Skipped".to_string()
            },
        );
        info!(
            "Config: Simulation: Output Dir: {}",
            simulation.output_dir().display()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::load(None).unwrap();
        let chart = config.chart();

        assert_eq!(config.logging(), Level::Info);
        assert_eq!(chart.title(), "Game Lengths");
        assert_eq!(chart.x_label(), "# Turns");
        assert_eq!(chart.y_label(), "Frequency");
        assert!(chart.grid());
        assert!(!chart.density());
        assert_eq!(chart.bins().unwrap(), Bins::default());

        let simulation = config.simulation();
        assert_eq!(simulation.duration(), Duration::from_secs(1));
        assert_eq!(simulation.games(), None);
        assert_eq!(simulation.small_games(), 100_000);
        assert_eq!(simulation.output_dir(), PathBuf::new());
    }

    #[test]
    fn load_config_str() {
        let config = Config::load_str(
            "war.toml",
            r#"
            [general]
            logging = "debug"

            [chart]
            title = "Standard vs Honorable"
            density = true
            x_max = 500.0

            [simulation]
            games = 2000
            seed = 42
            output_dir = "data"
            "#,
        )
        .unwrap();

        assert_eq!(config.logging(), Level::Debug);
        assert_eq!(config.chart().title(), "Standard vs Honorable");
        assert_eq!(config.chart().y_label(), "Density");
        assert_eq!(config.chart().x_max(), Some(500.0));
        assert_eq!(config.simulation().games(), Some(2000));
        assert_eq!(config.simulation().seed(), Some(42));
        assert_eq!(config.simulation().output_dir(), PathBuf::from("data"));
    }

    #[test]
    fn load_bundled_config() {
        let config = Config::load_str("compare.toml", include_str!("../configs/compare.toml"))
            .unwrap();

        assert!(config.chart().density());
        assert_eq!(config.chart().y_label(), "Density");
        assert_eq!(config.chart().x_max(), Some(500.0));
        assert_eq!(config.simulation().duration(), Duration::from_secs(1));
    }

    #[test]
    fn explicit_y_label_wins() {
        let mut config = Config::default();
        config.chart_mut().set_density(true);
        config.chart_mut().set_y_label(Some("Share of games".to_string()));
        assert_eq!(config.chart().y_label(), "Share of games");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = Config::load_str("bad.toml", "[chart]\ncolour = \"red\"\n");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bins = Config::load_str("bins.toml", "[chart]\nbins_start = 10\nbins_end = 11\n");
        assert!(matches!(bins, Err(ConfigError::Invalid(_))));

        let x_max = Config::load_str("x_max.toml", "[chart]\nx_max = -1.0\n");
        assert!(matches!(x_max, Err(ConfigError::Invalid(_))));

        let games = Config::load_str("games.toml", "[simulation]\ngames = 0\n");
        assert!(matches!(games, Err(ConfigError::Invalid(_))));

        let duration = Config::load_str("duration.toml", "[simulation]\nduration = -2.0\n");
        assert!(matches!(duration, Err(ConfigError::Invalid(_))));

        let duration = Config::load_str("duration.toml", "[simulation]\nduration = 1e30\n");
        assert!(matches!(duration, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn overridden_duration_is_validated() {
        let mut config = Config::load(None).unwrap();
        config.simulation_mut().set_duration(1e30);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.simulation_mut().set_duration(2.5);
        assert!(config.validate().is_ok());
        assert_eq!(config.simulation().duration(), Duration::from_millis(2500));
    }

    #[test]
    fn missing_file() {
        let result = Config::load(Some("/nonexistent/war-lengths.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
