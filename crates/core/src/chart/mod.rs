//! `{name, value}` series for the rendering layer.

pub mod series;

pub use series::{ChartPoint, ChartSeries};
