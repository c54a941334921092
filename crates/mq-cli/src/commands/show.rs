//! Show command implementation

use anyhow::Result;
use mq_store::ExperimentSummary;

use crate::cli::{GlobalArgs, OutputFormat, ShowArgs};
use crate::commands::common::{open_store, or_unknown, parse_experiment, parse_session, print_json};

/// Execute the show command
pub fn execute(args: &ShowArgs, global: &GlobalArgs) -> Result<()> {
    let store = open_store(global)?;
    let session = parse_session(&args.session)?;
    let experiment = parse_experiment(&args.experiment)?;

    let summary = store.experiment_summary(&session, &experiment)?;
    match args.output {
        OutputFormat::Json => print_json(&summary),
        OutputFormat::Table => {
            print_summary(&summary);
            Ok(())
        }
    }
}

fn print_summary(summary: &ExperimentSummary) {
    let info = &summary.info;
    println!("Experiment:      {}", info.experiment_id);
    println!(
        "Run at:          {}",
        or_unknown(summary.run_at.map(|at| at.format("%Y-%m-%d %H:%M:%S")))
    );
    println!(
        "LOD threshold:   {}",
        or_unknown(info.lod_threshold.map(|lod| format!("{lod:?}")))
    );
    println!("MapQTL session:  {}", or_unknown(info.mapqtl_session.as_ref()));
    println!("Markers:         {}", or_unknown(info.marker_count));
    println!("Traits:          {}", or_unknown(info.trait_count));

    let series = &summary.series;
    if series.is_empty() {
        println!();
        println!("No QTL series available.");
        return;
    }

    let busiest = series.values.iter().copied().reduce(f64::max);
    println!("Markers with QTLs: {}", series.values.len());
    println!("Most QTLs on one marker: {}", or_unknown(busiest));
    println!();

    let group_width = series
        .linkage_groups
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(5)
        .max(5);
    let marker_width = series
        .markers
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(12)
        .max(12);

    println!(
        "{:<group_width$}  {:<marker_width$}  {:<marker_width$}  MARKERS",
        "GROUP", "FIRST MARKER", "LAST MARKER",
    );
    println!(
        "{:-<group_width$}  {:-<marker_width$}  {:-<marker_width$}  {}",
        "",
        "",
        "",
        "-".repeat(7),
    );

    let mut starts = vec![0];
    starts.extend(series.group_boundaries.iter().copied());
    let mut ends = series.group_boundaries.clone();
    ends.push(series.markers.len());

    for (group, (start, end)) in series.linkage_groups.iter().zip(starts.into_iter().zip(ends)) {
        println!(
            "{:<group_width$}  {:<marker_width$}  {:<marker_width$}  {}",
            group,
            series.markers[start],
            series.markers[end - 1],
            end - start,
        );
    }
}
