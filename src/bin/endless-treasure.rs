use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use endless_treasure::{
    DrawOpts, Rendered, TreasureSession, fit_for_display, parse_item_list, save_png,
};

#[derive(Parser, Debug)]
#[command(name = "endless-treasure", version)]
struct Cli {
    /// Folder holding the card JPEGs. Defaults to the folder of this executable.
    #[arg(short = 'c', long = "cards", global = true)]
    cards: Option<PathBuf>,

    /// Log debug details (per-file scan decisions, selections).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw a random treasure and write it as a PNG.
    Draw(DrawArgs),
    /// Render a treasure from five item numbers: back #1, back #2, back #3, cropped back, front.
    Pick(PickArgs),
    /// List the indexed cards and the deck counts.
    Index(IndexArgs),
}

#[derive(Args, Debug)]
struct DrawArgs {
    /// RNG seed. A random one is chosen (and logged) when omitted.
    #[arg(long)]
    seed: Option<u64>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct PickArgs {
    /// Five item numbers 1..=100. Values outside the range are clamped.
    #[arg(required = true, num_args = 5, allow_negative_numbers = true)]
    items: Vec<String>,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct IndexArgs {
    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output PNG path.
    #[arg(long, default_value = "treasure.png")]
    out: PathBuf,

    /// Badge the front card with its number and face.
    #[arg(long)]
    label: bool,

    /// Downscale the output to fit WIDTHxHEIGHT (never upscales).
    #[arg(long, value_name = "WxH", value_parser = parse_fit)]
    fit: Option<(u32, u32)>,

    /// Print a JSON report instead of the status line.
    #[arg(long)]
    json: bool,
}

fn parse_fit(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("width: {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("height: {e}"))?;
    if w == 0 || h == 0 {
        return Err("fit size must be non-zero".to_owned());
    }
    Ok((w, h))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    let folder = match cli.cards {
        Some(dir) => dir,
        None => default_cards_dir()?,
    };
    match cli.cmd {
        Command::Draw(args) => cmd_draw(&folder, args),
        Command::Pick(args) => cmd_pick(&folder, args),
        Command::Index(args) => cmd_index(&folder, args),
    }
}

fn default_cards_dir() -> anyhow::Result<PathBuf> {
    let exe = std::env::current_exe().context("locate executable")?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

fn cmd_draw(folder: &Path, args: DrawArgs) -> anyhow::Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "drawing random treasure");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut session = TreasureSession::open(folder);
    let opts = DrawOpts {
        label: args.output.label,
    };
    let rendered = session
        .draw_random(&mut rng, opts)
        .with_context(|| format!("draw from '{}'", folder.display()))?;
    write_output(rendered, &args.output, Some(seed))
}

fn cmd_pick(folder: &Path, args: PickArgs) -> anyhow::Result<()> {
    let request = parse_item_list(&args.items.join(" "))?;
    let mut session = TreasureSession::open(folder);
    let opts = DrawOpts {
        label: args.output.label,
    };
    let rendered = session
        .draw_items(request, opts)
        .with_context(|| format!("pick from '{}'", folder.display()))?;
    write_output(rendered, &args.output, None)
}

fn write_output(rendered: &Rendered, out: &OutputArgs, seed: Option<u64>) -> anyhow::Result<()> {
    let image = match out.fit {
        Some((w, h)) => fit_for_display(&rendered.canvas, w, h),
        None => std::borrow::Cow::Borrowed(&rendered.canvas),
    };

    save_png(&image, &out.out)?;

    if out.json {
        let report = serde_json::json!({
            "out": out.out,
            "width": image.width(),
            "height": image.height(),
            "seed": seed,
            "status": rendered.selection.status_line(),
            "selection": rendered.selection,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", rendered.selection.status_line());
        eprintln!("wrote {}", out.out.display());
    }
    Ok(())
}

fn cmd_index(folder: &Path, args: IndexArgs) -> anyhow::Result<()> {
    let session = TreasureSession::open(folder);
    let summary = session.summary();
    let cards: Vec<_> = session.index().iter().collect();

    if args.json {
        let report = serde_json::json!({
            "folder": session.folder(),
            "summary": summary,
            "first_inferred": session.index().first_was_inferred(),
            "cards": cards,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for card in &cards {
        println!("{:>3}  {:<5}  {}", card.number, card.face().name(), card.file_name());
    }
    println!(
        "{} fronts, {} backs{}",
        summary.fronts,
        summary.backs,
        if summary.drawable {
            ""
        } else {
            " (not enough for a draw)"
        }
    );
    Ok(())
}
