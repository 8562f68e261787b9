pub mod ranking;
pub mod write_lanes;

pub use ranking::{merge_into_top, TOP_SCORES_LIMIT};
pub use write_lanes::WriteLanes;
