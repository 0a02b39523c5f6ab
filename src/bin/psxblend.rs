use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "psxblend", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a layered document into a PNG.
    Compose(ComposeArgs),
    /// List a document's layers and the opcode each one blends with.
    Layers(LayersArgs),
    /// Print the opcode a layer name resolves to.
    Resolve(ResolveArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Render tiles on a worker pool.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Tile edge length in pixels.
    #[arg(long, default_value_t = 64)]
    tile_size: u32,
}

#[derive(Parser, Debug)]
struct LayersArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    /// Layer names to resolve.
    #[arg(required = true)]
    names: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Layers(args) => cmd_layers(args),
        Command::Resolve(args) => cmd_resolve(args),
    }
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let doc = psxblend::Document::from_path(&args.in_path)?;
    let root = args.in_path.parent().unwrap_or_else(|| Path::new("."));
    let snapshot = psxblend::DocumentSnapshot::load(&doc, root)?;

    let threading = psxblend::RenderThreading {
        parallel: args.parallel,
        tile_size: args.tile_size,
        threads: args.threads,
    };
    let outcome =
        psxblend::render_document(&snapshot, &threading, &psxblend::CancelToken::new())?;
    let stats = outcome.stats;
    let frame = outcome.into_complete_frame()?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    tracing::info!(
        tiles = stats.tiles_total,
        blended = stats.pixels_blended,
        gated = stats.pixels_gated,
        "composited"
    );
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_layers(args: LayersArgs) -> anyhow::Result<()> {
    let doc = psxblend::Document::from_path(&args.in_path)?;
    doc.validate()?;
    let active = doc.active_layer_index();
    for (idx, layer) in doc.layers.iter().enumerate() {
        let state = if idx >= active {
            "inactive"
        } else if layer.visible {
            "visible"
        } else {
            "hidden"
        };
        println!(
            "{idx}\t{state}\t{}\t{}",
            layer.resolved_opcode(),
            layer.name
        );
    }
    Ok(())
}

fn cmd_resolve(args: ResolveArgs) -> anyhow::Result<()> {
    for name in &args.names {
        println!("{}\t{name}", psxblend::Opcode::from_layer_name(name));
    }
    Ok(())
}
