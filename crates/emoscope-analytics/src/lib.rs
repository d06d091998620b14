//! Analytics over the frozen emotion time-series table.
//!
//! Every component in this crate is a pure, stateless function of the table
//! plus caller parameters; nothing here touches the video again. The pieces:
//!
//! - [`range`]: snap a requested frame window onto the sampled-frame set
//! - [`downsample`]: reduce row counts for dense plots and clustering input
//! - [`projection`]: 2-D embedding of the emotion-score space
//! - [`charts`]: chart-data builders consumed by the report layer
//! - [`fanout`]: per-face repetition of any analytics computation

pub mod charts;
pub mod downsample;
pub mod fanout;
pub mod projection;
pub mod range;

mod reduce;

pub use charts::{
    ClusterData, ClusterPoint, DominantShare, HeatmapData, RadarData, TrendSeries,
};
pub use downsample::{downsample, T_HIGH, T_LOW};
pub use fanout::{fan_out, FanoutUnit};
pub use projection::{
    project, Method, ParamSubstitution, Projection, ProjectionResult, ProjectorOptions,
};
pub use range::{resolve_range, Resolution};
