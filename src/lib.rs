// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#[macro_use]
extern crate rustcommon_logger;

mod config;
mod data;
pub mod sim;

pub use crate::config::*;
pub use crate::data::*;

pub use histgraph::{Bins, Histogram, HistogramPlot, PlotError, Summary};
