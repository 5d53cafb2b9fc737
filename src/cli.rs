use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Workbook path (.xlsx)
    #[arg(value_name = "WORKBOOK_PATH")]
    pub workbook_path: String,

    /// Path to config TOML
    #[arg(long, default_value = "gaitplot.toml")]
    pub config: String,

    /// Output image path (defaults to the workbook path with .png)
    #[arg(long)]
    pub out: Option<String>,

    /// Standard-deviation multiplier for the ellipses (overrides config)
    #[arg(long)]
    pub n_std: Option<f64>,

    /// Worksheet name (overrides config)
    #[arg(long)]
    pub sheet: Option<String>,
}
