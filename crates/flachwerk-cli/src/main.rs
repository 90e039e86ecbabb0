// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// flachwerk — flatten spreadsheets and PDFs into page-image-only PDFs.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;

use flachwerk_core::config::{ExportConfig, resolution_presets, resolution_warning};
use flachwerk_core::error::Result;
use flachwerk_core::status::{status_for_error, status_ready};
use flachwerk_core::types::{ExportMode, SourceKind};
use flachwerk_engine::{
    ExportSession, export_all_sheets_with, export_selected_sheet, flatten_loaded_document,
};
use flachwerk_raster::FontCatalog;

#[derive(Parser)]
#[command(name = "flachwerk", version, about = "Flatten documents into page-image-only PDFs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Flatten a workbook sheet (or all sheets) into single-page PDFs.
    Sheet {
        /// Input .xlsx file.
        input: PathBuf,
        /// Sheet to export; defaults to the first sheet.
        #[arg(long)]
        sheet: Option<String>,
        /// Export every sheet as its own file.
        #[arg(long)]
        separate: bool,
        /// Resolution multiplier.
        #[arg(long, default_value_t = 30.0)]
        scale: f64,
        /// Extra font file or directory, searched before system fonts.
        #[arg(long)]
        font: Vec<PathBuf>,
        /// Output directory.
        #[arg(long, short, default_value = ".")]
        out: PathBuf,
    },
    /// Flatten an existing PDF into a page-image-only PDF.
    Flatten {
        /// Input .pdf file.
        input: PathBuf,
        /// Resolution multiplier.
        #[arg(long, default_value_t = 10.0)]
        scale: f64,
        /// Output file; defaults to `<stem>-flattened.pdf`.
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
    /// Print page count and page sizes of a PDF.
    Probe {
        /// Input .pdf file.
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let status = status_for_error(&err);
            error!(%err, "export failed");
            eprintln!("{}", status.message);
            if let Some(suggestion) = status.suggestion {
                eprintln!("{suggestion}");
            }
            ExitCode::FAILURE
        }
    }
}

fn warn_about_scale(kind: SourceKind, scale: f64) {
    let presets = resolution_presets(kind);
    if !presets.iter().any(|&p| f64::from(p) == scale) {
        eprintln!(
            "note: {scale}x is not a standard preset for this source ({})",
            presets
                .iter()
                .map(|p| format!("{p}x"))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    match resolution_warning(scale as u32) {
        flachwerk_core::config::ResolutionWarning::Heavy => {
            eprintln!("note: high resolution can be slow and memory-heavy; expect larger files");
        }
        flachwerk_core::config::ResolutionWarning::Elevated => {
            eprintln!("note: higher resolution may increase export time and file size");
        }
        flachwerk_core::config::ResolutionWarning::None => {}
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Sheet {
            input,
            sheet,
            separate,
            scale,
            font,
            out,
        } => {
            warn_about_scale(SourceKind::Spreadsheet, scale);
            let config = ExportConfig {
                mode: if separate { ExportMode::Separate } else { ExportMode::Combined },
                scale,
                font_paths: font.clone(),
                ..ExportConfig::default()
            };
            let mut session = ExportSession::new(config);
            let bytes = std::fs::read(&input)?;
            session.load_workbook_bytes(&bytes, Some(input.display().to_string()))?;
            if let Some(name) = &sheet {
                session.select_sheet(name)?;
            }

            let mut catalog = FontCatalog::new(font);
            std::fs::create_dir_all(&out)?;
            // Separate mode writes each file as soon as it is produced, so an
            // abort partway through leaves the finished files on disk.
            let mut write_file = |file: &flachwerk_engine::ExportedFile| -> Result<()> {
                let path = out.join(format!("{}.pdf", file.stem));
                std::fs::write(&path, &file.bytes)?;
                println!("wrote {}", path.display());
                Ok(())
            };
            if separate {
                export_all_sheets_with(&session, &mut catalog, &mut write_file)?;
            } else {
                let file = export_selected_sheet(&session, &mut catalog)?;
                write_file(&file)?;
            }
            println!("{}", status_ready().message);
            Ok(())
        }

        Command::Flatten { input, scale, out } => {
            warn_about_scale(SourceKind::Document, scale);
            let config = ExportConfig {
                scale,
                ..ExportConfig::default()
            };
            let mut session = ExportSession::new(config);
            let bytes = std::fs::read(&input)?;
            session.load_document(bytes, Some(input.display().to_string()))?;

            let output = flatten_loaded_document(&session, &mut |progress| {
                println!("{}", progress.message);
            })?;

            let path = out.unwrap_or_else(|| {
                let stem = input
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "document".into());
                input.with_file_name(format!("{stem}-flattened.pdf"))
            });
            std::fs::write(&path, &output)?;
            println!("wrote {}", path.display());
            Ok(())
        }

        Command::Probe { input } => {
            let bytes = std::fs::read(&input)?;
            let pages = probe_pages(bytes)?;
            println!("{} page(s)", pages.len());
            for (index, (w, h)) in pages.iter().enumerate() {
                println!("page {}: {:.1} x {:.1} pt", index + 1, w, h);
            }
            Ok(())
        }
    }
}

fn probe_pages(bytes: Vec<u8>) -> Result<Vec<(f64, f64)>> {
    let mut session = ExportSession::new(ExportConfig::default());
    session.load_document(bytes, None)?;
    let loaded = session.document()?;
    let count = loaded.probe.page_count();
    Ok((0..count)
        .filter_map(|i| loaded.probe.page_size_pt(i))
        .collect())
}
