use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use image::ImageFormat;
use lindenmayer::{LSystem, LSystemSpec, RenderOptions, render};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Encapsulated PostScript
    Eps,
    /// PNG image
    Png,
    /// Recorded segments and trace as JSON
    Json,
}

#[derive(Parser)]
#[command(name = "lindenmayer")]
#[command(version)]
#[command(about = "Draw L-System grammars with turtle graphics", long_about = None)]
struct Cli {
    /// Grammar description (JSON)
    file: PathBuf,

    /// Number of rewriting rounds
    rounds: u32,

    /// Output format
    #[arg(short, long, value_enum, default_value = "eps")]
    format: Format,

    /// Output file (stdout if omitted; required for png)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Canvas width in pixels (png)
    #[arg(long, default_value = "1024")]
    width: u32,

    /// Canvas height in pixels (png)
    #[arg(long, default_value = "1024")]
    height: u32,

    /// Random seed, overrides the seed in the grammar file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Refuse to run if the expansion could evaluate more symbols than this
    #[arg(long, default_value = "50000000")]
    max_symbols: u128,

    /// Refuse to run more rounds than this
    #[arg(long, default_value = "1024")]
    max_rounds: u32,
}

fn open_output(path: Option<&PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("cannot create {}", p.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let spec = LSystemSpec::from_path(&cli.file)
        .with_context(|| format!("cannot load {}", cli.file.display()))?;
    let mut system: LSystem = spec.load()?;
    if let Some(seed) = cli.seed {
        system.grammar.set_seed(seed);
    }
    log::info!(
        "loaded {} symbols, seed {}",
        system.grammar.symbols().len(),
        system.grammar.seed()
    );

    let options = RenderOptions {
        canvas_size: (cli.width, cli.height),
        max_symbols: cli.max_symbols,
        max_rounds: cli.max_rounds,
        ..Default::default()
    };

    match cli.format {
        Format::Eps => {
            let title = cli
                .file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let out = open_output(cli.output.as_ref())?;
            render::render_eps(&system, cli.rounds, &title, &options, out)?;
        }
        Format::Json => {
            let out = open_output(cli.output.as_ref())?;
            render::render_json(&system, cli.rounds, &options, out)?;
        }
        Format::Png => {
            let Some(path) = cli.output.as_ref() else {
                bail!("--output is required for png");
            };
            let image = render::render_raster(&system, cli.rounds, &options)?;
            image
                .save_with_format(path, ImageFormat::Png)
                .with_context(|| format!("cannot write {}", path.display()))?;
        }
    }

    Ok(())
}
