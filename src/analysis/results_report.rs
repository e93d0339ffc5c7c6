//! Results table report: reads a results CSV and prints a comparison table,
//! per-setup impact analysis and ASCII bar charts to the terminal.
//!
//! Impact compares the smallest and largest instance count of each setup.

use std::path::PathBuf;

use clap::Parser;
use indexmap::IndexMap;
use log::info;

use pod_startup_analysis::utils::export::{ResultRow, read_results};

const BAR_WIDTH: usize = 40;

#[derive(Parser)]
#[command(about = "Summarise a pod start-up results table", long_about = None)]
struct CliArgs {
    /// Results table written by the `table` command.
    #[arg(default_value = "./results/experiment_4_results.csv")]
    results: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = CliArgs::parse();

    println!(" Pod Start-up Analysis");
    println!("============================\n");

    let rows = read_results(&args.results)?;
    info!("{} rows read from {}", rows.len(), args.results.display());

    if rows.is_empty() {
        eprintln!(" No results in {}. Run the table command first!", args.results.display());
        return Ok(());
    }

    print_table(&rows);

    let by_setup = group_by_setup(&rows);
    for (setup, rows) in &by_setup {
        print_impact(setup, rows);
    }

    println!("\nAVERAGE START-UP TIME");
    println!("============================\n");
    plot_metric(&rows, "█", |r| r.average_startup_time);

    println!("AVERAGE QUEUE TIME");
    println!("============================\n");
    plot_metric(&rows, "▓", |r| r.average_queue_time);

    println!("SCHEDULING LATENCY");
    println!("============================\n");
    plot_metric(&rows, "▒", |r| r.scheduling_latency);

    Ok(())
}

fn group_by_setup(rows: &[ResultRow]) -> IndexMap<&str, Vec<&ResultRow>> {
    let mut by_setup: IndexMap<&str, Vec<&ResultRow>> = IndexMap::new();
    for row in rows {
        by_setup.entry(row.setup.as_str()).or_default().push(row);
    }
    by_setup
}

/// Prints every row (human-readable).
fn print_table(rows: &[ResultRow]) {
    println!("EXPERIMENT RESULTS");
    println!("=====================\n");
    println!(
        "{:<16} {:>9} {:>14} {:>12} {:>14} {:>14}",
        "Setup", "Instances", "Start-up (s)", "Std Dev (s)", "Queue (s)", "Scheduling (s)"
    );
    println!("{}", "=".repeat(84));

    for r in rows {
        println!(
            "{:<16} {:>9} {:>14.4} {:>12.4} {:>14.4} {:>14.4}",
            r.setup,
            r.instances,
            r.average_startup_time,
            r.startup_std_dev,
            r.average_queue_time,
            r.scheduling_latency
        );
    }
    println!();
}

/// Percentage change from `from` to `to`; a zero baseline reports 0.
fn percent_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        0.0
    } else {
        (to - from) / from.abs() * 100.0
    }
}

/// Smallest vs largest instance count of one setup.
fn print_impact(setup: &str, rows: &[&ResultRow]) {
    let (Some(first), Some(last)) = (
        rows.iter().min_by_key(|r| r.instances),
        rows.iter().max_by_key(|r| r.instances),
    ) else {
        return;
    };
    if first.instances == last.instances {
        return;
    }

    println!(
        "IMPACT ANALYSIS {setup} (Instances: {} → {})",
        first.instances, last.instances
    );
    println!("==========================================\n");
    println!(
        "  Start-up Time:      {:+.1}%",
        percent_change(first.average_startup_time, last.average_startup_time)
    );
    println!(
        "  Queue Time:         {:+.1}%",
        percent_change(first.average_queue_time, last.average_queue_time)
    );
    println!(
        "  Scheduling Latency: {:+.1}%\n",
        percent_change(first.scheduling_latency, last.scheduling_latency)
    );
}

/// Bar length for `value` scaled against `max`; negative values draw no bar.
fn bar_len(value: f64, max: f64) -> usize {
    if max <= 0.0 || value <= 0.0 {
        0
    } else {
        ((value / max) * BAR_WIDTH as f64).round() as usize
    }
}

/// ASCII bar chart of one metric, one bar per row.
fn plot_metric(rows: &[ResultRow], block: &str, value: fn(&ResultRow) -> f64) {
    let max = rows.iter().map(value).fold(0.0, f64::max);

    for r in rows {
        let v = value(r);
        let width = bar_len(v, max).min(BAR_WIDTH);
        println!(
            "  {:<14} {:>4}: {}{} ({:.4}s)",
            r.setup,
            r.instances,
            block.repeat(width),
            " ".repeat(BAR_WIDTH - width),
            v
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(setup: &str, instances: u32, startup: f64) -> ResultRow {
        ResultRow {
            setup: setup.to_string(),
            instances,
            average_startup_time: startup,
            startup_std_dev: 0.0,
            average_queue_time: 0.0,
            scheduling_latency: 0.0,
        }
    }

    #[test]
    fn percent_change_handles_zero_baseline() {
        assert_eq!(percent_change(0.0, 5.0), 0.0);
        assert_eq!(percent_change(2.0, 3.0), 50.0);
        assert_eq!(percent_change(-2.0, -1.0), 50.0);
    }

    #[test]
    fn bars_scale_to_widest_value() {
        assert_eq!(bar_len(2.0, 2.0), BAR_WIDTH);
        assert_eq!(bar_len(1.0, 2.0), BAR_WIDTH / 2);
        assert_eq!(bar_len(-1.0, 2.0), 0);
        assert_eq!(bar_len(1.0, 0.0), 0);
    }

    #[test]
    fn groups_keep_setup_order() {
        let rows = vec![row("b", 1, 1.0), row("a", 1, 1.0), row("b", 5, 2.0)];
        let grouped = group_by_setup(&rows);

        assert_eq!(grouped.keys().copied().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(grouped["b"].len(), 2);
    }
}
