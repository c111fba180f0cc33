use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "showroom", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame of a scripted session as a PNG.
    Frame(FrameArgs),
    /// Render a scripted session as an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Write the built-in demo script as JSON.
    Script(ScriptArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input script JSON. Defaults to the built-in demo script.
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
    /// Input script JSON. Defaults to the built-in demo script.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Overwrite output if it already exists.
    #[arg(long, default_value_t = true)]
    overwrite: bool,
}

#[derive(Parser, Debug)]
struct ScriptArgs {
    /// Output JSON path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Script(args) => cmd_script(args),
    }
}

fn load_script(path: Option<&PathBuf>) -> anyhow::Result<showroom::Script> {
    match path {
        Some(p) => Ok(showroom::Script::from_json_path(p)?),
        None => Ok(showroom::Script::demo()),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let script = load_script(args.in_path.as_ref())?;
    if args.frame >= script.duration.0 {
        anyhow::bail!(
            "frame {} is out of range for a {}-frame script",
            args.frame,
            script.duration.0
        );
    }

    let mut session = showroom::Session::new(script)?;
    session.advance_to(showroom::FrameIndex(args.frame))?;

    let renderer = showroom::CpuRenderer::new();
    let scene = session.frame_scene()?;
    let frame = renderer.render(&scene)?;
    showroom::render::write_png(&frame, &args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let script = load_script(args.in_path.as_ref())?;

    let cfg = showroom::EncodeConfig::for_script(&script, args.out.clone(), args.overwrite);
    let mut encoder = showroom::FfmpegEncoder::new(cfg, showroom::compose::BACKDROP)?;

    let duration = script.duration;
    let mut session = showroom::Session::new(script)?;
    let renderer = showroom::CpuRenderer::new();

    for f in 0..duration.0 {
        session.advance_to(showroom::FrameIndex(f))?;
        let scene = session.frame_scene()?;
        let frame = renderer.render(&scene)?;
        encoder.encode_frame(&frame)?;
    }
    encoder.finish()?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_script(args: ScriptArgs) -> anyhow::Result<()> {
    let script = showroom::Script::demo();
    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let f = std::fs::File::create(&args.out)
        .with_context(|| format!("create script '{}'", args.out.display()))?;
    serde_json::to_writer_pretty(f, &script).with_context(|| "write script JSON")?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
