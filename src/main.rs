// Entry point: reads the displacement workbook, renders the scatter figure
// with confidence ellipses, writes the PNG.
use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::debug;

use gaitplot::cli::Args;
use gaitplot::config::AppConfig;
use gaitplot::{render, sheet};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut cfg = AppConfig::load_or_default(&args.config);
    if let Some(n_std) = args.n_std {
        cfg.ellipse.n_std = n_std;
    }
    if let Some(sheet_name) = args.sheet.clone() {
        cfg.sheet.sheet_name = sheet_name;
    }

    let workbook_path = Path::new(&args.workbook_path);
    let labels = cfg.labels();
    let conditions = sheet::load_conditions(workbook_path, &cfg.sheet, &labels)?;
    let title = sheet::derive_title(workbook_path);
    debug!(%title, n_conditions = conditions.len(), "loaded workbook");

    let out_path = args
        .out
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| workbook_path.with_extension("png"));

    render::render_figure(&out_path, &title, &conditions, &cfg)?;
    println!("Saved figure to {}", out_path.display());
    Ok(())
}
