use crate::Error;
use crate::Grid;
use crate::VariablesGrid;

use serde::Deserialize;

fn default_dimension() -> usize {
    1
}

/// equidistant time axis and the payload width
#[derive(Deserialize, Debug)]
pub struct GridConfig {
    #[serde(default)]
    pub start: f64,
    #[serde(default)]
    pub end: f64,
    /// no grid points are generated if this is zero
    #[serde(default)]
    pub num_points: usize,
    /// number of values stored per grid point
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 0.0,
            num_points: 0,
            dimension: default_dimension(),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct MergeConfig {
    /// instants closer than this collapse into one, 0 compares exactly
    #[serde(default)]
    pub tolerance: f64,
}

#[derive(Deserialize, Debug, Default)]
pub struct OutputConfig {
    /// fractional digits of the textual dump, unset writes the shortest
    /// representation that parses back to the same value
    #[serde(default)]
    pub precision: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Config {
    /// trajectory file to load instead of generating a grid. relative paths
    /// are resolved against the directory of the config file by [`load`]
    #[serde(default)]
    pub input: Option<std::path::PathBuf>,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub merge: MergeConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// the trajectory described by this config
    pub fn build(&self) -> Result<VariablesGrid, Error> {
        if let Some(input) = &self.input {
            return VariablesGrid::from_file(input);
        }

        let grid = &self.grid;
        if grid.num_points == 0 {
            return Ok(VariablesGrid::with_dimension(grid.dimension));
        }
        VariablesGrid::equidistant(grid.dimension, grid.start, grid.end, grid.num_points)
    }

    /// merge two time axes with the configured tolerance
    pub fn merge_grids(&self, a: &Grid, b: &Grid) -> Result<Grid, Error> {
        a.merge_with_tolerance(b, self.merge.tolerance)
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: toml::Value = toml::from_str(s)?;

        let mut has_unsupported: bool = false;
        let cfg: Config = serde_ignored::deserialize(value, |path| {
            log::error!("unsupported config: {:?}", path.to_string());
            has_unsupported = true;
        })?;
        if has_unsupported {
            return Err(Error::UnsupportedConfigs);
        }

        Ok(cfg)
    }
}

/// load config file
pub fn load<P: AsRef<std::path::Path>>(filename: P) -> Result<Config, Error> {
    let filename = filename.as_ref();
    let buffer = std::fs::read_to_string(filename)?;
    let mut cfg: Config = buffer.parse()?;

    // make the input path absolute
    if let Some(input) = cfg.input.take() {
        let cfgdir = filename.parent().unwrap_or_else(|| std::path::Path::new(""));
        cfg.input = Some(cfgdir.join(input));
    }

    log::debug!("config: {:#?}", cfg);
    Ok(cfg)
}
