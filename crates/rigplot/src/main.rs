use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use rigplot_core::summary::{summarize, RecordingSummary, SeriesSummary};
use rigplot_core::{all_presets, find_preset, prepare_preset, run_preset, RunConfig, SvgChartRenderer};
use rigplot_parser::LoadReport;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Plot recordings from the haptics control rig", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available recording presets
    List,
    /// Render a recording as an SVG line chart on stdout
    Plot(PresetArgs),
    /// Print per-channel statistics and the first rows of a recording
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct PresetArgs {
    /// Preset code, see `rigplot list`
    preset: String,
    /// Recording to read instead of the preset's default file
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    #[command(flatten)]
    target: PresetArgs,
    /// Emit the load report and channel summaries as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .init();

    let cli = Cli::parse();
    let config = RunConfig::from_env();

    match cli.command {
        Command::List => handle_list(),
        Command::Plot(args) => handle_plot(&config, args),
        Command::Inspect(args) => handle_inspect(&config, args),
    }
}

fn handle_list() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Preset", "Default file", "Fields", "Filter", "Description"]);
    for preset in all_presets() {
        table.add_row(vec![
            preset.code.to_string(),
            preset.default_file.to_string(),
            preset.expected_fields().to_string(),
            preset.mode.to_string(),
            preset.description.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn handle_plot(config: &RunConfig, args: PresetArgs) -> Result<()> {
    let preset = find_preset(&args.preset)?;
    let input = config.resolve_input(preset, args.input.as_deref());

    let output = run_preset(preset, &input, &SvgChartRenderer::default())
        .with_context(|| format!("failed to plot {}", input.display()))?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(output.document.as_bytes())
        .context("failed to write chart to stdout")?;
    stdout.flush()?;

    info!(
        preset = preset.code,
        samples = output.prepared.dataset.len(),
        "chart written to stdout"
    );
    Ok(())
}

fn handle_inspect(config: &RunConfig, args: InspectArgs) -> Result<()> {
    let preset = find_preset(&args.target.preset)?;
    let input = config.resolve_input(preset, args.target.input.as_deref());

    let prepared = prepare_preset(preset, &input)
        .with_context(|| format!("failed to load {}", input.display()))?;
    if args.json {
        let summary = RecordingSummary::new(preset, &prepared.dataset, prepared.report);
        println!("{}", summary.to_json()?);
        return Ok(());
    }

    let summaries = summarize(preset, &prepared.dataset);

    println!("{}", preset.resolve_title(&prepared.dataset));
    print_report(&prepared.report);
    println!("{}", summary_table(&summaries));

    let df = preset.dataframe(&prepared.dataset)?;
    println!("{}", df.head(Some(10)));
    Ok(())
}

fn print_report(report: &LoadReport) {
    println!(
        "rows read: {}, skipped: {}, emitted: {}",
        report.rows_read, report.rows_skipped, report.rows_emitted
    );
}

fn summary_table(summaries: &[SeriesSummary]) -> Table {
    let format_stat = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"));

    let mut table = Table::new();
    table.set_header(vec!["Channel", "Label", "Samples", "Min", "Max", "Mean"]);
    for summary in summaries {
        table.add_row(vec![
            summary.name.clone(),
            summary.label.clone(),
            summary.count.to_string(),
            format_stat(summary.min),
            format_stat(summary.max),
            format_stat(summary.mean),
        ]);
    }
    table
}
