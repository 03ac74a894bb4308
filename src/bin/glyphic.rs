use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "glyphic", version)]
struct Cli {
    /// Options JSON (see `GlyphOpts`); `GLYPHIC_*` environment variables apply on top.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every pipeline record for a text file as JSON.
    Inspect(InspectArgs),
    /// Render frames of a glyph and write the last one as a PNG.
    Frame(FrameArgs),
    /// Check a binding output JSON file against its family contract.
    Validate(ValidateArgs),
}

#[derive(Parser, Debug)]
struct PostArgs {
    /// Input text (markdown) file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Seed hint; overrides the content-derived seed.
    #[arg(long)]
    seed: Option<String>,

    /// Force a family instead of the selected one.
    #[arg(long)]
    family: Option<String>,

    /// Renderer id mixed into the renderer seed.
    #[arg(long)]
    renderer: Option<String>,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    #[command(flatten)]
    post: PostArgs,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    post: PostArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Number of frames to run (at least 1).
    #[arg(long, default_value_t = 1)]
    frames: u64,

    #[arg(long, default_value_t = 256)]
    width: u32,

    #[arg(long, default_value_t = 256)]
    height: u32,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Binding output JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Treat the input as a v1 record of this family and adapt it first.
    #[arg(long)]
    legacy: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("glyphic=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let opts = load_opts(cli.config.as_deref())?;
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args, opts),
        Command::Frame(args) => cmd_frame(args, opts),
        Command::Validate(args) => cmd_validate(args),
    }
}

fn load_opts(path: Option<&Path>) -> anyhow::Result<glyphic::GlyphOpts> {
    let opts = match path {
        Some(p) => glyphic::GlyphOpts::from_path(p)
            .with_context(|| format!("load options '{}'", p.display()))?,
        None => glyphic::GlyphOpts::default(),
    };
    Ok(opts.with_env())
}

fn orchestrator_for(
    post: &PostArgs,
    opts: glyphic::GlyphOpts,
) -> anyhow::Result<(glyphic::Orchestrator, String, glyphic::PostMetadata)> {
    let root = post
        .in_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let content_id = post
        .in_path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("input path '{}' has no file name", post.in_path.display()))?
        .to_string();

    let mut meta = glyphic::PostMetadata::new();
    if let Some(seed) = &post.seed {
        meta.insert("seed", seed.as_str());
    }
    if let Some(family) = &post.family {
        meta.insert("family", family.as_str());
    }
    if let Some(renderer) = &post.renderer {
        meta.insert("renderer", renderer.as_str());
    }

    let orch = glyphic::Orchestrator::new(
        glyphic::Registry::with_defaults(),
        glyphic::FsContent::new(root),
        opts,
    );
    Ok((orch, content_id, meta))
}

fn cmd_inspect(args: InspectArgs, opts: glyphic::GlyphOpts) -> anyhow::Result<()> {
    let (orch, content_id, meta) = orchestrator_for(&args.post, opts)?;
    let trace = orch
        .prepare(&content_id, &meta)
        .with_context(|| format!("run pipeline for '{}'", args.post.in_path.display()))?;
    println!("{}", serde_json::to_string_pretty(&trace)?);
    Ok(())
}

fn cmd_frame(args: FrameArgs, opts: glyphic::GlyphOpts) -> anyhow::Result<()> {
    let fallback = opts.fallback.clone();
    let (mut orch, content_id, meta) = orchestrator_for(&args.post, opts)?;
    let mut canvas = glyphic::GlyphCanvas::with_fallback(args.width, args.height, fallback)?;

    // The first frame is drawn by `render_glyph`.
    let rendered = orch
        .render_glyph(&mut canvas, &content_id, &meta)
        .and_then(|binding| {
            canvas.run(args.frames.saturating_sub(1))?;
            Ok(binding)
        });

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        canvas.surface.data(),
        canvas.surface.width(),
        canvas.surface.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    let binding = rendered.context("glyph render failed; wrote fallback frame")?;
    eprintln!(
        "wrote {} ({} frame(s), family {})",
        args.out.display(),
        canvas.scheduler.frames_rendered(),
        binding.family
    );
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("open binding '{}'", args.in_path.display()))?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).context("parse binding JSON")?;

    if let Some(name) = args.legacy.as_deref() {
        let family = glyphic::Family::parse(name)?;
        let adapter = glyphic::V1Adapter;
        let adapted = glyphic::LegacyAdapter::adapt(&adapter, family, &value)?;
        glyphic::validate_family_binding(family, &adapted)?;
        println!("{}", serde_json::to_string_pretty(&adapted)?);
        return Ok(());
    }

    let family = value
        .get("family")
        .and_then(|f| f.as_str())
        .context("binding has no string 'family' field")?;
    glyphic::validate_family_binding_value(family, &value)?;
    let version = glyphic::CONTRACT_VERSION;
    println!("ok: {family} binding satisfies contract v{version}");
    Ok(())
}
