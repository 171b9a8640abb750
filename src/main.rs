use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use prospectus::pagesize::Orientation;
use prospectus::{generate_from_json, FontSet, LayoutConfig};
use std::fs;
use std::path::PathBuf;

/// Generate a paginated PDF from a JSON document spec
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON document spec (title, subtitle, sections, ...)
    spec: PathBuf,

    /// Where to write the PDF; defaults to a name derived from the document title
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON layout config; fields left out keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the pages in landscape orientation
    #[arg(long)]
    landscape: bool,

    /// TrueType/OpenType font for regular text, embedded in the output
    #[arg(long, requires = "bold_font")]
    regular_font: Option<PathBuf>,

    /// TrueType/OpenType font for bold text, embedded in the output
    #[arg(long, requires = "regular_font")]
    bold_font: Option<PathBuf>,
}

fn load_fonts(args: &Args) -> Result<FontSet> {
    match (&args.regular_font, &args.bold_font) {
        (Some(regular), Some(bold)) => {
            let regular = fs::read(regular)
                .with_context(|| format!("failed to read font {}", regular.display()))?;
            let bold =
                fs::read(bold).with_context(|| format!("failed to read font {}", bold.display()))?;
            FontSet::truetype(regular, bold).context("failed to load fonts")
        }
        _ => Ok(FontSet::helvetica()),
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read layout config {}", path.display()))?;
            LayoutConfig::from_json(&json)
                .with_context(|| format!("invalid layout config {}", path.display()))?
        }
        None => LayoutConfig::default(),
    };
    if args.landscape {
        config.orientation = Some(Orientation::Landscape);
        config
            .validate()
            .context("layout config does not fit a landscape page")?;
    }
    let fonts = load_fonts(&args)?;

    let spec = fs::read_to_string(&args.spec)
        .with_context(|| format!("failed to read document spec {}", args.spec.display()))?;
    let artifact = generate_from_json(&spec, &config, &fonts)
        .with_context(|| format!("failed to generate {}", args.spec.display()))?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&artifact.filename));
    fs::write(&output, &artifact.bytes)
        .with_context(|| format!("failed to write {}", output.display()))?;
    info!("wrote {} bytes to {}", artifact.bytes.len(), output.display());

    Ok(())
}
