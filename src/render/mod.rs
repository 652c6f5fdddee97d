//! Device-side rendering: scheduled voices, the voice pool and the mix bus.

pub mod mixer;
pub mod renderer;
pub mod voice;

pub use renderer::Renderer;
pub use voice::{Destination, ScheduledVoice};
