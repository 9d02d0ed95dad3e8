use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cocoon", version)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render the whole scene as a numbered PNG sequence.
    Render(RenderArgs),
    /// Export the deformed mesh of one frame as Wavefront OBJ.
    Mesh(MeshArgs),
    /// Print the morphed position and masks of one unit-sphere point as JSON.
    Probe(ProbeArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON. Defaults to the built-in scene.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene JSON. Defaults to the built-in scene.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Output directory for `frame_00000.png`, ...
    #[arg(long)]
    out_dir: PathBuf,

    /// Render frames in parallel on a dedicated thread pool.
    #[arg(long)]
    parallel: bool,

    /// Worker thread count (implies `--parallel`).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames per batch.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,
}

#[derive(Parser, Debug)]
struct MeshArgs {
    /// Input scene JSON. Defaults to the built-in scene.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output OBJ path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Input scene JSON supplying the look parameters. Defaults to the built-in scene.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    #[arg(long, allow_hyphen_values = true)]
    x: f32,
    #[arg(long, allow_hyphen_values = true)]
    y: f32,
    #[arg(long, allow_hyphen_values = true)]
    z: f32,

    /// Scene time in seconds.
    #[arg(long, default_value_t = 0.0)]
    time: f32,

    /// Morph progress (clamped to [0, 1]).
    #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
    progress: f32,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Mesh(args) => cmd_mesh(args),
        Command::Probe(args) => cmd_probe(args),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_scene(path: Option<&Path>) -> anyhow::Result<cocoon::SceneConfig> {
    let scene = match path {
        Some(p) => cocoon::SceneConfig::from_path(p)
            .with_context(|| format!("load scene '{}'", p.display()))?,
        None => cocoon::SceneConfig::default(),
    };
    scene.validate().context("validate scene")?;
    Ok(scene)
}

fn create_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = read_scene(args.in_path.as_deref())?;
    let session = cocoon::RenderSession::new(&scene, cocoon::RenderSessionOpts::default())?;
    let frame = session.render_frame(cocoon::FrameIndex(args.frame))?;

    create_parent_dir(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let scene = read_scene(args.in_path.as_deref())?;
    let opts = cocoon::RenderSessionOpts {
        parallel: args.parallel || args.threads.is_some(),
        threads: args.threads,
        chunk_size: args.chunk_size,
    };
    let session = cocoon::RenderSession::new(&scene, opts)?;
    let range = cocoon::FrameRange::new(
        cocoon::FrameIndex(0),
        cocoon::FrameIndex(session.duration_frames()),
    )?;

    let mut sink = cocoon::PngSequenceSink::new(&args.out_dir);
    let stats = session.render_range(range, &mut sink)?;

    eprintln!(
        "wrote {} frames to {}",
        stats.frames_total,
        args.out_dir.display()
    );
    Ok(())
}

fn cmd_mesh(args: MeshArgs) -> anyhow::Result<()> {
    let scene = read_scene(args.in_path.as_deref())?;
    let session = cocoon::RenderSession::new(&scene, cocoon::RenderSessionOpts::default())?;
    let mesh = session.deform_frame(cocoon::FrameIndex(args.frame))?;

    create_parent_dir(&args.out)?;
    let f = File::create(&args.out)
        .with_context(|| format!("create obj '{}'", args.out.display()))?;
    cocoon::write_obj(BufWriter::new(f), &mesh)
        .with_context(|| format!("write obj '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let scene = read_scene(args.in_path.as_deref())?;
    let vertex = cocoon::Vertex::on_unit_sphere(cocoon::Vec3::new(args.x, args.y, args.z));
    let params = scene.morph.at(args.time, args.progress);
    let morphed = cocoon::evaluate(&vertex, &params);

    let out = serde_json::to_string_pretty(&morphed).context("serialize probe result")?;
    println!("{out}");
    Ok(())
}
