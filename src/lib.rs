//! Wavepool - interactive liquid surface with a floating sphere
//!
//! A height-field pool driven by drops and a rigid sphere, three liquids with
//! their own wave and drag behaviour, and ray picking that turns pointer input
//! into camera orbits, sphere drags or new ripples. Rendering sits behind the
//! `RenderBackend` trait.

pub mod body;
pub mod camera;
pub mod cli;
pub mod error;
#[cfg(feature = "gpu-probe")]
pub mod gpu;
pub mod interaction;
pub mod math;
pub mod params;
pub mod raytracer;
pub mod render;
pub mod simulation;
pub mod water;

pub use error::{SimError, SimResult};
pub use render::{FrameSnapshot, HeadlessRenderer, RenderBackend, RenderCapabilities};
pub use simulation::{InputEvent, Simulation, SimulationContext, TickOutcome};
