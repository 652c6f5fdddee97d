//! Lookahead step scheduling and stem synthesis for timeline sequencers.
//!
//! The host owns the project (tracks, regions, events, tempo) and pushes
//! snapshots into an [`Engine`]. A periodic tick turns due 16th-note steps into
//! sample-accurate voices on an [`AudioDevice`], which renders them through a
//! per-track mix bus.

pub mod config;
pub mod device;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod graph; // Composable audio graph nodes
pub mod render; // Device-side voice pool and mix bus
pub mod sequencing; // Project data model and musical timing
pub mod voices; // One synthesis routine per stem

pub use config::{DeviceConfig, EngineConfig};
pub use device::{AudioDevice, OfflineDevice};
pub use engine::{Engine, Player};
pub use error::{DeviceError, Error};
pub use sequencing::{Event, Region, Stem, Track};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
