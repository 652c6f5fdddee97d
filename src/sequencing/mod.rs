//! Project data model and musical timing.

pub mod clip;
pub mod pitch;
pub mod project;
pub mod time;

pub use clip::{ActiveRegion, ClipResolver};
pub use project::{any_soloed, Event, Region, Stem, Track};
