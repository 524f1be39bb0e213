mod arc_length;
pub mod curve;
mod path;

pub use arc_length::ArcLengthTable;
pub use curve::{CatmullRom, Curve, CurveDomain};
pub use path::{
    Path, PathBuilder, PathConfig, Route, DEFAULT_SAMPLES_PER_SEGMENT, MAX_SAMPLES_PER_SEGMENT,
};
