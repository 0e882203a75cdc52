//! Wavepool - headless driver
//!
//! Runs the pool for a number of frames, optionally plays a scripted gesture,
//! and writes the height field out as grayscale PNGs.

use clap::Parser;
use glam::{Vec2, Vec3};

use wavepool::cli::{Args, DemoGesture};
use wavepool::{HeadlessRenderer, InputEvent, RenderBackend, SimResult, Simulation};

/// Frame at which the scripted gesture presses
const DEMO_START_FRAME: u64 = 10;

/// Frames the scripted gesture stays pressed
const DEMO_FRAMES: u64 = 60;

/// Pointer script for one demo gesture, in CSS pixels
struct DemoScript {
    gesture: DemoGesture,
    anchor: Option<Vec2>,
}

impl DemoScript {
    fn new(gesture: DemoGesture) -> Self {
        Self {
            gesture,
            anchor: None,
        }
    }

    /// Where the gesture presses, from the camera at the moment of the press
    fn locate(&self, sim: &Simulation<HeadlessRenderer>, pixel_ratio: f32) -> Option<Vec2> {
        let transform = sim.renderer().camera_transform();
        let device = match self.gesture {
            DemoGesture::Drop => transform.project(Vec3::new(0.3, 0.0, -0.2))?,
            DemoGesture::Drag => transform.project(sim.body().body().center)?,
            DemoGesture::Orbit => Vec2::new(4.0, 4.0),
        };
        Some(device / pixel_ratio)
    }

    fn events(
        &mut self,
        frame: u64,
        sim: &Simulation<HeadlessRenderer>,
        pixel_ratio: f32,
    ) -> Vec<InputEvent> {
        if frame == DEMO_START_FRAME {
            self.anchor = self.locate(sim, pixel_ratio);
            return match self.anchor {
                Some(p) => vec![InputEvent::PointerDown { x: p.x, y: p.y }],
                None => {
                    log::warn!("Demo target is off screen, skipping {:?}", self.gesture);
                    Vec::new()
                }
            };
        }

        let Some(anchor) = self.anchor else {
            return Vec::new();
        };
        if frame == DEMO_START_FRAME + DEMO_FRAMES {
            self.anchor = None;
            return vec![InputEvent::PointerUp];
        }
        if frame < DEMO_START_FRAME {
            return Vec::new();
        }

        let k = (frame - DEMO_START_FRAME) as f32;
        let p = match self.gesture {
            DemoGesture::Drop => {
                let angle = k * 0.2;
                anchor + Vec2::new(angle.cos() - 1.0, angle.sin()) * 40.0
            }
            DemoGesture::Drag => anchor + Vec2::new(0.0, -3.0 * k),
            DemoGesture::Orbit => anchor + Vec2::new(4.0 * k, k),
        };
        vec![InputEvent::PointerMove { x: p.x, y: p.y }]
    }
}

#[cfg(feature = "gpu-probe")]
fn probe_gpu() -> SimResult<wavepool::RenderCapabilities> {
    wavepool::gpu::probe_capabilities()
}

#[cfg(not(feature = "gpu-probe"))]
fn probe_gpu() -> SimResult<wavepool::RenderCapabilities> {
    Err(wavepool::SimError::GpuProbe(
        "built without the gpu-probe feature".to_string(),
    ))
}

fn run(args: &Args) -> SimResult<()> {
    let params = args.to_params();
    let pixel_ratio = params.render.pixel_ratio;

    let mut renderer = HeadlessRenderer::new(params.render.clone(), params.camera.clone());
    if args.probe_gpu {
        renderer = renderer.with_capabilities(probe_gpu()?);
    }
    if let Some(recording) = args.create_recording_config() {
        log::info!("Recording to {}", recording.output_dir.display());
        renderer = renderer.with_recording(recording)?;
    }

    let mut sim = Simulation::new(params, renderer)?;
    let mut script = args.demo.map(DemoScript::new);

    for frame in 0..args.frames {
        let events = match script.as_mut() {
            Some(script) => script.events(frame, &sim, pixel_ratio),
            None => Vec::new(),
        };
        sim.run_frame(events, args.dt)?;
    }

    let (max_height, max_velocity) = sim.water().max_magnitudes();
    let body = sim.body().body();
    println!(
        "Ran {} frames of {} ({} drawn): max |h| = {:.5}, max |v| = {:.5}",
        args.frames,
        sim.context().profile,
        sim.frame_count(),
        max_height,
        max_velocity
    );
    println!(
        "Sphere at ({:.3}, {:.3}, {:.3})",
        body.center.x, body.center.y, body.center.z
    );

    if let Some(path) = &args.snapshot {
        if sim.renderer().save_snapshot(path)? {
            println!("Saved height field to {}", path.display());
        } else {
            log::warn!("No frame was drawn, snapshot not written");
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
