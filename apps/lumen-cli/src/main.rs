use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use lumen_common::{EngineConfig, MAX_FRAMES_IN_FLIGHT, Shape};
use lumen_geometry::{MAX_RESOLUTION, Vertex, generate};
use lumen_input::{Action, ActionSet, MovementController};
use lumen_render::{
    BillboardPass, Camera, DebugTextPass, FrameClock, FrameOrchestrator, FramePresenter,
    GlobalUbo, HeadlessPresenter, MAX_DELTA_TIME, MAX_POINT_LIGHTS, MeshDrawPass, RenderPass,
};
use lumen_scene::SceneBuilder;

#[derive(Parser)]
#[command(name = "lumen-cli", about = "Procedural meshes and a headless frame loop")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and layout constants
    Info,
    /// Generate a procedural mesh and print its statistics
    Generate {
        shape: ShapeArg,
        /// Subdivisions per face or axis
        #[arg(short, long, default_value = "16")]
        resolution: u32,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Build the configured scene and run the headless frame loop
    Run {
        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of frames to run
        #[arg(short, long, default_value = "10")]
        frames: u64,
        /// Override the configured frames in flight
        #[arg(long)]
        frames_in_flight: Option<usize>,
        /// Actions held every frame, comma separated
        #[arg(long, value_delimiter = ',', default_value = "forward,look_right")]
        actions: Vec<Action>,
        /// Use a fixed time step (seconds) instead of the wall clock
        #[arg(long, value_parser = parse_fixed_dt)]
        fixed_dt: Option<f32>,
        /// Print the debug text pass output for every frame
        #[arg(long)]
        print_frames: bool,
    },
    /// Print the effective configuration as YAML
    Config {
        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write the configuration here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ShapeArg {
    Cube,
    Quad,
    Terrain,
}

impl From<ShapeArg> for Shape {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::Cube => Shape::Cube,
            ShapeArg::Quad => Shape::Quad,
            ShapeArg::Terrain => Shape::Terrain,
        }
    }
}

#[derive(Serialize)]
struct MeshReport {
    shape: Shape,
    resolution: u32,
    vertices: usize,
    indices: usize,
    triangles: usize,
    vertex_bytes: usize,
    index_bytes: usize,
    bounds_min: [f32; 3],
    bounds_max: [f32; 3],
    fingerprint: String,
}

fn parse_fixed_dt(arg: &str) -> Result<f32, String> {
    let dt: f32 = arg.parse().map_err(|e| format!("{e}"))?;
    if dt.is_finite() && dt > 0.0 {
        Ok(dt)
    } else {
        Err(format!("time step must be a positive number of seconds, got {arg}"))
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    match cli.command {
        Commands::Info => {
            println!("lumen-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("vertex: {} bytes", std::mem::size_of::<Vertex>());
            println!("global uniform block: {} bytes", std::mem::size_of::<GlobalUbo>());
            println!("max point lights: {MAX_POINT_LIGHTS}");
            println!("max frames in flight: {MAX_FRAMES_IN_FLIGHT}");
            println!("max resolution: {MAX_RESOLUTION}");
            println!("max frame step: {MAX_DELTA_TIME}s");
        }
        Commands::Generate {
            shape,
            resolution,
            json,
        } => {
            let shape = Shape::from(shape);
            let mesh = generate(shape, resolution)
                .with_context(|| format!("generating {shape} at resolution {resolution}"))?;
            let (lo, hi) = mesh.bounds().unwrap_or_default();
            let report = MeshReport {
                shape,
                resolution,
                vertices: mesh.vertex_count(),
                indices: mesh.index_count(),
                triangles: mesh.triangle_count(),
                vertex_bytes: mesh.vertex_bytes().len(),
                index_bytes: mesh.index_bytes().len(),
                bounds_min: lo.to_array(),
                bounds_max: hi.to_array(),
                fingerprint: mesh.fingerprint().to_string(),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{} (resolution {})", report.shape, report.resolution);
                println!("  vertices:    {}", report.vertices);
                println!("  indices:     {}", report.indices);
                println!("  triangles:   {}", report.triangles);
                println!(
                    "  buffers:     {} + {} bytes",
                    report.vertex_bytes, report.index_bytes
                );
                println!(
                    "  bounds:      {:?} .. {:?}",
                    report.bounds_min, report.bounds_max
                );
                println!("  fingerprint: {}", report.fingerprint);
            }
        }
        Commands::Run {
            config,
            frames,
            frames_in_flight,
            actions,
            fixed_dt,
            print_frames,
        } => {
            let mut config = load_config(config.as_ref())?;
            if let Some(n) = frames_in_flight {
                config.frames_in_flight = n;
            }
            config.validate()?;
            run(&config, frames, actions.into_iter().collect(), fixed_dt, print_frames)?;
        }
        Commands::Config { config, output } => {
            let config = load_config(config.as_ref())?;
            match output {
                Some(path) => {
                    config
                        .save(&path)
                        .with_context(|| format!("writing config to {}", path.display()))?;
                    println!("Wrote {}", path.display());
                }
                None => print!("{}", config.to_yaml()?),
            }
        }
    }

    Ok(())
}

fn run(
    config: &EngineConfig,
    frames: u64,
    actions: ActionSet,
    fixed_dt: Option<f32>,
    print_frames: bool,
) -> anyhow::Result<()> {
    let mut scene = SceneBuilder::new().build(config)?;
    for skipped in scene.skipped() {
        println!("skipped {}: {}", skipped.name, skipped.error);
    }

    let mut camera = Camera::from_config(&config.camera);
    let controller = MovementController::default();
    let mut orchestrator = FrameOrchestrator::from_config(config)?;
    let mut presenter = HeadlessPresenter::new();
    let mut clock = FrameClock::new();
    let rig = scene.camera_rig();

    let mesh_pass = MeshDrawPass::new();
    let billboard_pass = BillboardPass::new();
    let text_pass = DebugTextPass::new();

    info!(
        frames,
        frames_in_flight = orchestrator.frames_in_flight(),
        actions = ?actions.iter().map(Action::name).collect::<Vec<_>>(),
        "starting frame loop"
    );

    let mut draws = 0usize;
    let mut billboards = 0usize;
    for _ in 0..frames {
        let dt = match fixed_dt {
            Some(dt) => clock.clamp_step(dt),
            None => clock.tick(),
        };

        let transform = scene.registry_mut().transform_mut(rig)?;
        controller.move_in_plane_xz(actions, dt, transform);
        let (position, rotation) = (transform.position, transform.rotation);
        camera.set_view_yxz(position, rotation);

        let registry = scene.registry();
        let token = orchestrator.acquire(&mut presenter, &camera.matrices(), registry, dt)?;
        {
            let ctx = orchestrator.context(&token, registry)?;
            let frame_draws = mesh_pass.render(&ctx);
            let frame_billboards = billboard_pass.render(&ctx);
            debug!(
                frame = ctx.info.frame_number,
                slot = ctx.info.slot_index,
                draws = frame_draws.len(),
                billboards = frame_billboards.len(),
                "frame recorded"
            );
            draws += frame_draws.len();
            billboards += frame_billboards.len();
            if print_frames {
                print!("{}", text_pass.render(&ctx));
            }
        }
        presenter.present(token);
    }
    presenter.wait_idle(orchestrator.ring_mut())?;

    let final_pose = scene.registry().transform(rig)?;
    println!(
        "Ran {} frames over {} slots: {} mesh draws, {} billboards",
        orchestrator.frame_counter(),
        orchestrator.frames_in_flight(),
        draws,
        billboards
    );
    println!(
        "Camera rig: pos=({:.3}, {:.3}, {:.3}) yaw={:.3} pitch={:.3}",
        final_pose.position.x,
        final_pose.position.y,
        final_pose.position.z,
        final_pose.rotation.y,
        final_pose.rotation.x
    );
    Ok(())
}
