//! Marker command implementation

use anyhow::Result;

use crate::cli::{GlobalArgs, MarkerArgs};
use crate::commands::common::{open_store, parse_experiment, parse_session};

/// Execute the marker command
pub fn execute(args: &MarkerArgs, global: &GlobalArgs) -> Result<()> {
    let store = open_store(global)?;
    let session = parse_session(&args.session)?;
    let experiment = parse_experiment(&args.experiment)?;

    let detail = store.marker_detail(&session, &experiment, &args.marker)?;
    if detail.rows.is_empty() {
        println!("No QTLs found on marker {}", args.marker);
        return Ok(());
    }

    let widths: Vec<usize> = detail
        .headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            detail
                .rows
                .iter()
                .map(|row| row[i].len())
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect();

    print_row(&detail.headers, &widths);
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    print_row(&separator, &widths);
    for row in &detail.rows {
        print_row(row, &widths);
    }
    println!();
    println!("{} QTLs on marker {}", detail.rows.len(), args.marker);
    Ok(())
}

fn print_row(cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    println!("{}", line.join("  ").trim_end());
}
