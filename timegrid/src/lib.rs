//! Time grids and trajectories for discretization based solvers.
//!
//! A [`Grid`] is an ordered axis of time instants, a [`VariablesGrid`] stores
//! one vector of fixed dimension per instant of such an axis.

pub mod config;
mod error;
mod format;
mod grid;
mod variables_grid;

pub use error::*;
pub use format::Dump;
pub use grid::Grid;
pub use variables_grid::VariablesGrid;
