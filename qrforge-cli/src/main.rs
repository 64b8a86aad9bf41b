use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use qrforge::{
    AssetDirs, AssetWriter, FontFile, ModuleMatrix, RenderOpts, Renderer, StyleConfig,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "qrforge", version, about = "Render styled QR codes as SVG and PNG")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode, render and write `<id>.svg` and `<id>.png`.
    Render(RenderArgs),
    /// Encode and render, printing `svg_data`/`png_data` JSON instead of writing files.
    Preview(PreviewArgs),
    /// Compare the vector and raster outputs module by module.
    Check(PreviewArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// SVG output directory (default: $QR_FORGE_SVG_DIR or generated_svgs).
    #[arg(long)]
    svg_dir: Option<PathBuf>,

    /// PNG output directory (default: $QR_FORGE_PNG_DIR or generated_pngs).
    #[arg(long)]
    png_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    input: InputArgs,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Text to encode.
    #[arg(long)]
    data: String,

    /// Error correction level.
    #[arg(long, value_enum, ignore_case = true, default_value_t = Ecc::M)]
    ecc: Ecc,

    /// Style JSON file; the flags below override its fields.
    #[arg(long)]
    style: Option<PathBuf>,

    /// Foreground color, `#RRGGBB`.
    #[arg(long)]
    fg: Option<String>,

    /// Background color, `#RRGGBB` or `transparent`.
    #[arg(long)]
    bg: Option<String>,

    /// Module area side length in pixels.
    #[arg(long, allow_negative_numbers = true)]
    size: Option<i64>,

    /// Margin in pixels.
    #[arg(long, allow_negative_numbers = true)]
    padding: Option<i64>,

    /// Canvas corner radius in pixels.
    #[arg(long, allow_negative_numbers = true)]
    radius: Option<i64>,

    /// Short label drawn over the center of the PNG.
    #[arg(long)]
    text: Option<String>,

    /// TrueType/OpenType font for the label (default: embedded bitmap face).
    #[arg(long)]
    font: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Ecc {
    L,
    M,
    Q,
    H,
}

impl From<Ecc> for qrcode::EcLevel {
    fn from(e: Ecc) -> Self {
        match e {
            Ecc::L => Self::L,
            Ecc::M => Self::M,
            Ecc::Q => Self::Q,
            Ecc::H => Self::H,
        }
    }
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
        Command::Render(args) => cmd_render(args),
        Command::Preview(args) => cmd_preview(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (renderer, matrix, style) = args.input.prepare()?;
    let rendered = renderer.render(&matrix, &style)?;

    let env = AssetDirs::from_env();
    let dirs = AssetDirs::new(
        args.svg_dir.unwrap_or(env.svg_dir),
        args.png_dir.unwrap_or(env.png_dir),
    );
    let stored = AssetWriter::new(dirs).write(&rendered)?;

    println!("{}", stored.svg_path.display());
    println!("{}", stored.png_path.display());
    Ok(())
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let (renderer, matrix, style) = args.input.prepare()?;
    let preview = renderer.preview(&matrix, &style)?;
    println!("{}", serde_json::to_string(&preview)?);
    Ok(())
}

fn cmd_check(args: PreviewArgs) -> anyhow::Result<()> {
    let (renderer, matrix, style) = args.input.prepare()?;
    let report = renderer.check_parity(&matrix, &style)?;
    println!("{}", serde_json::to_string(&report)?);
    if !report.is_consistent() {
        anyhow::bail!(
            "{} of {} modules differ between SVG and PNG",
            report.mismatched.len(),
            report.checked
        );
    }
    Ok(())
}

impl InputArgs {
    fn prepare(&self) -> anyhow::Result<(Renderer, ModuleMatrix, StyleConfig)> {
        let mut style = match &self.style {
            Some(path) => StyleConfig::from_path(path)?,
            None => StyleConfig::default(),
        };
        if let Some(v) = &self.fg {
            style.foreground = v.clone();
        }
        if let Some(v) = &self.bg {
            style.background = v.clone();
        }
        if let Some(v) = self.size {
            style.size = v;
        }
        if let Some(v) = self.padding {
            style.padding = v;
        }
        if let Some(v) = self.radius {
            style.border_radius = v;
        }
        if let Some(v) = &self.text {
            style.overlay_text = Some(v.clone());
        }

        let mut opts = RenderOpts::default();
        if let Some(path) = &self.font {
            opts = opts.with_font(FontFile::open(path)?);
        }
        let renderer = Renderer::new(opts)?;
        let matrix = encode(&self.data, self.ecc)?;
        Ok((renderer, matrix, style))
    }
}

fn encode(data: &str, ecc: Ecc) -> anyhow::Result<ModuleMatrix> {
    let code = qrcode::QrCode::with_error_correction_level(data.as_bytes(), ecc.into())
        .with_context(|| format!("encode {} bytes at level {ecc:?}", data.len()))?;
    let cells = code
        .to_colors()
        .into_iter()
        .map(|c| c == qrcode::Color::Dark)
        .collect();
    tracing::debug!(modules = code.width(), version = ?code.version(), "encoded");
    Ok(ModuleMatrix::from_flat(code.width(), cells)?)
}
