//! # Folio CLI
//!
//! Usage:
//!   folio brief.json -o brief.pdf
//!   cat brief.json | folio --style style.json
//!   folio --example > brief.json

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use folio::{Document, StyleConfig};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Export a structured project brief to a paginated PDF", long_about = None)]
struct Cli {
    /// Brief JSON file (stdin if not specified)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output PDF (conventional file name in the current directory if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Style configuration JSON
    #[arg(long, value_name = "STYLE")]
    style: Option<PathBuf>,

    /// Print a sample brief and exit
    #[arg(long)]
    example: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if cli.example {
        print!("{}", example_brief_json());
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Parse hints go on the same line
            eprintln!("✗ {}", e.to_string().replace("\n ", ""));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> folio::Result<()> {
    let input = match &cli.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let style = match &cli.style {
        Some(path) => StyleConfig::from_json(&fs::read_to_string(path)?)?,
        None => StyleConfig::default(),
    };

    let document: Document = serde_json::from_str(&input)?;
    let (pdf_bytes, summary) = folio::export_pdf_with_summary(&document, &style)?;

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| Path::new(".").join(&summary.file_name));
    fs::write(&output_path, &pdf_bytes)?;
    eprintln!(
        "✓ Written {} bytes ({} page(s)) to {}",
        pdf_bytes.len(),
        summary.page_count,
        output_path.display()
    );
    Ok(())
}

fn example_brief_json() -> &'static str {
    r##"{
  "metadata": {
    "subjectName": "Harbor Bridge Retrofit",
    "subtitle": "Seismic retrofit of the north approach spans",
    "generatedAt": "2026-02-14T09:30:00Z",
    "author": "Folio"
  },
  "sections": [
    {
      "title": "Overview",
      "blocks": [
        { "type": "LabelValue", "label": "Status", "value": "Design review" },
        { "type": "LabelValue", "label": "Owner", "value": "City Transport Authority" },
        { "type": "LabelValue", "label": "Budget", "value": "" },
        { "type": "LabelValue", "label": "Project site", "value": "https://example.com/harbor-bridge" },
        {
          "type": "TextBlock",
          "text": "The north approach consists of six steel girder spans built in 1962. This phase replaces the bearings, strengthens the piers and adds shear keys at each abutment.\n\nTraffic will remain open on two lanes throughout construction."
        }
      ]
    },
    {
      "title": "Scope",
      "blocks": [
        {
          "type": "BulletList",
          "items": [
            "Replace 24 rocker bearings with isolation bearings",
            "Jacket piers 3 through 7 with reinforced concrete",
            "Install shear keys at both abutments",
            "Repaint all exposed steel"
          ]
        },
        { "type": "SectionTitle", "text": "Out of scope" },
        { "type": "TextBlock", "text": "Deck replacement and lighting upgrades are planned as a separate contract." }
      ]
    },
    {
      "title": "Schedule",
      "blocks": [
        { "type": "LabelValue", "label": "Start", "value": "April 2026" },
        { "type": "LabelValue", "label": "Substantial completion", "value": "November 2027" }
      ]
    }
  ]
}
"##
}
