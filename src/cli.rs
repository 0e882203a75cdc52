//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::params::{LiquidProfile, RecordingConfig, RenderConfig, SimulationParams};

/// Scripted gesture played during a headless run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoGesture {
    /// Stir the water with a circular stroke
    Drop,
    /// Grab the sphere and lift it out of the pool
    Drag,
    /// Swing the camera around the pool
    Orbit,
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "wavepool")]
#[command(about = "Headless liquid pool simulation with a floating sphere", long_about = None)]
pub struct Args {
    /// Liquid profile
    #[arg(long, value_enum, default_value_t = LiquidProfile::Water)]
    pub liquid: LiquidProfile,

    /// Number of frames to run
    #[arg(long, value_name = "FRAMES", default_value = "240")]
    pub frames: u64,

    /// Frame time (seconds)
    #[arg(long, value_name = "SECONDS", default_value = "0.016666668")]
    pub dt: f32,

    /// Let the sphere fall and float under gravity
    #[arg(long)]
    pub physics: bool,

    /// Start paused (input still redraws, frames do not tick)
    #[arg(long)]
    pub paused: bool,

    /// Seed for the start-up drops
    #[arg(long, value_name = "SEED", default_value = "42")]
    pub seed: u64,

    /// Wave-field samples per side
    #[arg(long, value_name = "SAMPLES", default_value = "256")]
    pub grid_size: usize,

    /// Viewport width (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "1024")]
    pub width: u32,

    /// Viewport height (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "768")]
    pub height: u32,

    /// Scripted gesture to play
    #[arg(long, value_enum, value_name = "GESTURE")]
    pub demo: Option<DemoGesture>,

    /// Save the final height field as a grayscale PNG
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// Save every drawn frame's height field into this directory
    #[arg(long, value_name = "DIR")]
    pub record: Option<PathBuf>,

    /// Capture every n-th frame when recording
    #[arg(long, value_name = "N", default_value = "1")]
    pub record_every: usize,

    /// Check the GPU for float render-target support before starting
    #[arg(long)]
    pub probe_gpu: bool,
}

impl Args {
    /// Build simulation parameters from defaults plus command-line overrides
    pub fn to_params(&self) -> SimulationParams {
        let mut params = SimulationParams {
            profile: self.liquid,
            start_paused: self.paused,
            render: RenderConfig {
                width: self.width,
                height: self.height,
                ..RenderConfig::default()
            },
            ..SimulationParams::default()
        };
        params.water.grid_size = self.grid_size.max(2);
        params.water.seed = self.seed;
        params.body.use_physics = self.physics;
        params
    }

    /// Create recording configuration if recording mode is enabled
    pub fn create_recording_config(&self) -> Option<RecordingConfig> {
        self.record.as_ref().map(|dir| {
            let mut config = RecordingConfig::new(dir.clone());
            config.every_n_frames = self.record_every.max(1);
            config
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_params() {
        let args = Args::parse_from(["wavepool"]);
        let params = args.to_params();
        assert_eq!(params.profile, LiquidProfile::Water);
        assert_eq!(params.water.grid_size, 256);
        assert!(!params.body.use_physics);
        assert!(args.create_recording_config().is_none());
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "wavepool",
            "--liquid",
            "jello",
            "--physics",
            "--grid-size",
            "64",
            "--demo",
            "drag",
            "--record",
            "frames",
            "--record-every",
            "4",
        ]);
        let params = args.to_params();
        assert_eq!(params.profile, LiquidProfile::Jello);
        assert!(params.body.use_physics);
        assert_eq!(params.water.grid_size, 64);
        assert_eq!(args.demo, Some(DemoGesture::Drag));

        let recording = args.create_recording_config().unwrap();
        assert_eq!(recording.every_n_frames, 4);
        assert_eq!(recording.output_dir, PathBuf::from("frames"));
    }
}
