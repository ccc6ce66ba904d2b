use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use pdf_assembly::{
    AssemblyState, SourceId, build_document, load_pdf, parse_ranges, save_pdf, split_to_files,
};
use pdf_stamp::{PreviewSpace, StampSpec, stamp_document};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfdesk", about = "PDF page assembly and stamping tools", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble an output document from one or more source PDFs
    Assemble {
        /// Primary input PDF
        #[arg(short, long)]
        input: PathBuf,

        /// Additional PDFs whose pages are appended after the primary's
        #[arg(long, num_args = 1..)]
        add: Vec<PathBuf>,

        /// Sequence positions to delete, as a 1-based range spec (e.g. "2,5-7")
        #[arg(long)]
        delete: Option<String>,

        /// Reorder steps FROM:TO (1-based positions), applied in order
        #[arg(long = "move", value_parser = parse_move)]
        moves: Vec<(usize, usize)>,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Extract selected pages into a new document
    Extract {
        /// Input PDF
        #[arg(short, long)]
        input: PathBuf,

        /// Pages to extract, as a 1-based range spec (e.g. "1-3,5")
        #[arg(short, long)]
        pages: String,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Split a document into one output per page range
    Split {
        /// Input PDF
        #[arg(short, long)]
        input: PathBuf,

        /// Page ranges, one output per range (e.g. "1-3,5,7-9")
        #[arg(short, long)]
        ranges: String,

        /// Output path stem; each file is named {stem}-{start}-{end}.pdf
        #[arg(short, long)]
        output_stem: PathBuf,
    },

    /// Burn a text stamp onto every page of a document
    Stamp {
        /// Input PDF
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Stamp text
        #[arg(short, long)]
        text: String,

        /// Font size in points
        #[arg(long, default_value = "20")]
        font_size: String,

        /// Stamp color
        #[arg(long, default_value = "red", value_enum)]
        color: ColorArg,

        /// Underline the stamp text
        #[arg(long)]
        underline: bool,

        /// Rotation in degrees, counter-clockwise (omit for horizontal)
        #[arg(long)]
        angle: Option<f64>,

        /// Page orientation of the stamped overlay
        #[arg(long, default_value = "portrait", value_enum)]
        orientation: OrientationArg,

        /// Stamp anchor x
        #[arg(short = 'x', long)]
        x: f64,

        /// Stamp anchor y
        #[arg(short = 'y', long)]
        y: f64,

        /// Treat x/y as preview-space coordinates (top-left origin) captured
        /// at this scale, instead of real page coordinates
        #[arg(long)]
        preview_scale: Option<f64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorArg {
    Red,
    Blue,
    Black,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<ColorArg> for pdf_stamp::StampColor {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Red => Self::Red,
            ColorArg::Blue => Self::Blue,
            ColorArg::Black => Self::Black,
        }
    }
}

impl From<OrientationArg> for pdf_stamp::Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

/// Parse a "FROM:TO" reorder step with 1-based positions.
fn parse_move(value: &str) -> std::result::Result<(usize, usize), String> {
    let (from, to) = value
        .split_once(':')
        .ok_or_else(|| format!("expected FROM:TO, got {value:?}"))?;
    let parse = |s: &str| -> std::result::Result<usize, String> {
        let position: usize = s
            .trim()
            .parse()
            .map_err(|_| format!("invalid position {s:?}"))?;
        if position == 0 {
            return Err("positions are 1-based".to_string());
        }
        Ok(position - 1)
    };
    Ok((parse(from)?, parse(to)?))
}

/// Expand a 1-based range spec over sequence positions into 0-based indices.
fn positions_from_spec(spec: &str) -> Result<Vec<usize>> {
    let ranges = parse_ranges(spec).with_context(|| format!("invalid selection {spec:?}"))?;
    Ok(ranges.iter().flat_map(|range| range.indices()).collect())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Assemble {
            input,
            add,
            delete,
            moves,
            output,
        } => {
            let mut documents = vec![load_pdf(&input).await?];
            for path in &add {
                documents.push(load_pdf(path).await?);
            }

            let mut state = AssemblyState::new();
            state.open(SourceId(0), documents[0].get_pages().len());
            for (index, document) in documents.iter().enumerate().skip(1) {
                state.append_source(SourceId(index as u32), document.get_pages().len())?;
            }
            println!(
                "Opened {} source(s), {} pages",
                documents.len(),
                state.len()
            );

            if let Some(spec) = delete {
                let positions = positions_from_spec(&spec)?;
                state.mark_deleted(&positions)?;
                println!("Marked {} page(s) for deletion", positions.len());
            }
            for (from, to) in moves {
                state.reorder(from, to)?;
            }

            let pages = state.materialize()?;
            let assembled = build_document(&documents, &pages)?;
            save_pdf(assembled, &output).await?;
            println!("Assembled {} pages → {}", pages.len(), output.display());
        }

        Commands::Extract {
            input,
            pages,
            output,
        } => {
            let document = load_pdf(&input).await?;

            let mut state = AssemblyState::new();
            state.open(SourceId(0), document.get_pages().len());

            let positions = positions_from_spec(&pages)?;
            let selected = state.extract(&positions)?;
            let extracted = build_document(&[document], &selected)?;
            save_pdf(extracted, &output).await?;
            println!("Extracted {} pages → {}", selected.len(), output.display());
        }

        Commands::Split {
            input,
            ranges,
            output_stem,
        } => {
            let document = load_pdf(&input).await?;
            let ranges = parse_ranges(&ranges)?;

            let written = split_to_files(&document, &ranges, &output_stem).await?;
            println!("Split into {} document(s):", written.len());
            for path in &written {
                println!("  {}", path.display());
            }
        }

        Commands::Stamp {
            input,
            output,
            text,
            font_size,
            color,
            underline,
            angle,
            orientation,
            x,
            y,
            preview_scale,
        } => {
            let orientation: pdf_stamp::Orientation = orientation.into();
            let position = match preview_scale {
                Some(scale) => {
                    let preview = PreviewSpace::for_page(orientation, scale);
                    preview.to_real(x, y)
                }
                None => (x, y),
            };

            let spec = StampSpec {
                text,
                font_size: StampSpec::font_size_from_str(&font_size)?,
                color: color.into(),
                underline,
                angle,
                orientation,
                position,
            };

            let document = load_pdf(&input).await?;
            let stamped = stamp_document(&document, &spec).await?;
            let page_count = stamped.get_pages().len();
            save_pdf(stamped, &output).await?;
            println!(
                "Stamped {} page(s) at ({:.0}, {:.0}) → {}",
                page_count,
                position.0,
                position.1,
                output.display()
            );
        }
    }

    Ok(())
}
