//! Charts of the results table: average start-up time bars and per-setup metric lines.

use std::{error::Error, fs::create_dir_all, path::Path};

use indexmap::IndexMap;
use log::info;
use plotters::prelude::*;

use crate::{
    plot::{PlotError, series_color},
    utils::export::ResultRow,
};

const X_DESC: &str = "Number of Instances Started at Once";

/// Results rows regrouped for plotting: setups and instance counts in first-appearance order.
struct Grouped<'a> {
    instances: Vec<u32>,
    setups: IndexMap<&'a str, Vec<&'a ResultRow>>,
}

impl<'a> Grouped<'a> {
    fn new(rows: &'a [ResultRow]) -> Self {
        let mut instances = Vec::new();
        let mut setups: IndexMap<&str, Vec<&ResultRow>> = IndexMap::new();
        for row in rows {
            if !instances.contains(&row.instances) {
                instances.push(row.instances);
            }
            setups.entry(row.setup.as_str()).or_default().push(row);
        }
        Self { instances, setups }
    }

    fn slot(&self, instances: u32) -> Option<f64> {
        self.instances
            .iter()
            .position(|&n| n == instances)
            .map(|idx| idx as f64)
    }

    fn x_range(&self) -> std::ops::Range<f64> {
        -0.5..(self.instances.len() as f64 - 0.5)
    }

    fn label_at(&self, x: f64) -> String {
        let idx = x.round();
        if (x - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        self.instances
            .get(idx as usize)
            .map(|n| n.to_string())
            .unwrap_or_default()
    }
}

/// Grouped bars of average start-up time per instance count, one bar per setup,
/// with one standard deviation error bars.
pub fn render_startup_bars<L>(path: &Path, rows: &[ResultRow], label_for: L) -> Result<(), PlotError>
where
    L: Fn(&str) -> String,
{
    prepare(path, rows)?;
    draw_startup_bars(path, &Grouped::new(rows), &label_for).map_err(|e| PlotError::Render {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    info!("Start-up bar chart written to {}", path.display());
    Ok(())
}

/// Line chart of the three averages per setup against the instance count.
pub fn render_metric_lines<L>(path: &Path, rows: &[ResultRow], label_for: L) -> Result<(), PlotError>
where
    L: Fn(&str) -> String,
{
    prepare(path, rows)?;
    draw_metric_lines(path, &Grouped::new(rows), &label_for).map_err(|e| PlotError::Render {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    info!("Metric line chart written to {}", path.display());
    Ok(())
}

fn prepare(path: &Path, rows: &[ResultRow]) -> Result<(), PlotError> {
    if rows.is_empty() {
        return Err(PlotError::Empty(path.display().to_string()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(|source| PlotError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

fn draw_startup_bars(
    path: &Path,
    grouped: &Grouped<'_>,
    label_for: &dyn Fn(&str) -> String,
) -> Result<(), Box<dyn Error>> {
    let setups = grouped.setups.len();
    let bar_width = 0.8 / setups as f64;

    let y_max = grouped
        .setups
        .values()
        .flatten()
        .map(|row| row.average_startup_time + row.startup_std_dev.abs())
        .fold(0.0, f64::max);
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let root = SVGBackend::new(path, (1200, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Average Start-up Time", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(grouped.x_range(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(grouped.instances.len())
        .x_label_formatter(&|x: &f64| grouped.label_at(*x))
        .x_desc(X_DESC)
        .y_desc("Average Start-up Time (seconds)")
        .draw()?;

    for (setup_idx, (setup, rows)) in grouped.setups.iter().enumerate() {
        let color = series_color(setup_idx);
        let offset = -0.4 + setup_idx as f64 * bar_width;
        let placed: Vec<(f64, &ResultRow)> = rows
            .iter()
            .filter_map(|row| grouped.slot(row.instances).map(|x| (x + offset, *row)))
            .collect();

        chart
            .draw_series(placed.iter().map(|(x0, row)| {
                Rectangle::new(
                    [(*x0, 0.0), (x0 + bar_width * 0.9, row.average_startup_time)],
                    color.filled(),
                )
            }))?
            .label(label_for(*setup))
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));

        chart.draw_series(placed.iter().map(|(x0, row)| {
            let avg = row.average_startup_time;
            let sd = row.startup_std_dev.abs();
            ErrorBar::new_vertical(
                x0 + bar_width * 0.45,
                avg - sd,
                avg,
                avg + sd,
                BLACK.stroke_width(1),
                6,
            )
        }))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn draw_metric_lines(
    path: &Path,
    grouped: &Grouped<'_>,
    label_for: &dyn Fn(&str) -> String,
) -> Result<(), Box<dyn Error>> {
    let (y_min, y_max) = padded_range(grouped.setups.values().flatten().flat_map(|row| {
        [
            row.average_startup_time,
            row.average_queue_time,
            row.scheduling_latency,
        ]
    }));

    let root = SVGBackend::new(path, (1200, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Performance Metrics", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(grouped.x_range(), y_min..y_max)?;

    chart
        .configure_mesh()
        .x_labels(grouped.instances.len())
        .x_label_formatter(&|x: &f64| grouped.label_at(*x))
        .x_desc(X_DESC)
        .y_desc("Time (seconds)")
        .draw()?;

    for (setup_idx, (setup, rows)) in grouped.setups.iter().enumerate() {
        let color = series_color(setup_idx);
        let label = label_for(*setup);
        let points = |value: fn(&ResultRow) -> f64| -> Vec<(f64, f64)> {
            rows.iter()
                .filter_map(|row| grouped.slot(row.instances).map(|x| (x, value(*row))))
                .collect()
        };

        chart
            .draw_series(LineSeries::new(
                points(|row| row.average_startup_time),
                color.stroke_width(2),
            ))?
            .label(format!("{label} start-up"))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));

        let faded = color.mix(0.6);
        chart
            .draw_series(LineSeries::new(
                points(|row| row.average_queue_time),
                faded.stroke_width(1),
            ))?
            .label(format!("{label} queue"))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], faded.stroke_width(1)));

        chart
            .draw_series(
                LineSeries::new(points(|row| row.scheduling_latency), color.stroke_width(1))
                    .point_size(3),
            )?
            .label(format!("{label} scheduling"))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(1)));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((0.0f64, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !max.is_finite() || max <= min {
        return (min, min + 1.0);
    }
    let pad = (max - min) * 0.05;
    (if min < 0.0 { min - pad } else { 0.0 }, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(setup: &str, instances: u32, startup: f64, scheduling: f64) -> ResultRow {
        ResultRow {
            setup: setup.to_string(),
            instances,
            average_startup_time: startup,
            startup_std_dev: 0.1,
            average_queue_time: 0.2,
            scheduling_latency: scheduling,
        }
    }

    fn sample() -> Vec<ResultRow> {
        vec![
            row("1_worker", 1, 1.0, 1.0),
            row("1_worker", 5, 2.0, 0.5),
            row("2_worker", 1, 0.8, 0.8),
            row("2_worker", 5, 1.5, -0.25),
            row("2_worker", 100, 4.0, 0.3),
        ]
    }

    #[test]
    fn groups_in_first_appearance_order() {
        let rows = sample();
        let grouped = Grouped::new(&rows);

        assert_eq!(grouped.instances, vec![1, 5, 100]);
        assert_eq!(grouped.setups.keys().copied().collect::<Vec<_>>(), vec!["1_worker", "2_worker"]);
        assert_eq!(grouped.setups["2_worker"].len(), 3);
        assert_eq!(grouped.slot(100), Some(2.0));
        assert_eq!(grouped.slot(7), None);
    }

    #[test]
    fn labels_only_whole_slots() {
        let rows = sample();
        let grouped = Grouped::new(&rows);

        assert_eq!(grouped.label_at(0.0), "1");
        assert_eq!(grouped.label_at(2.0), "100");
        assert_eq!(grouped.label_at(0.5), "");
        assert_eq!(grouped.label_at(-1.0), "");
        assert_eq!(grouped.label_at(3.0), "");
    }

    #[test]
    fn range_covers_negative_values() {
        let (lo, hi) = padded_range([1.0, -0.5, 2.0].into_iter());
        assert!(lo < -0.5);
        assert!(hi > 2.0);

        assert_eq!(padded_range([0.0, 0.0].into_iter()), (0.0, 1.0));
    }

    #[test]
    fn renders_both_charts() {
        let dir = tempfile::tempdir().unwrap();
        let bars = dir.path().join("images").join("bars.svg");
        let lines = dir.path().join("images").join("lines.svg");
        let rows = sample();

        render_startup_bars(&bars, &rows, |name| name.replace('_', " ")).unwrap();
        render_metric_lines(&lines, &rows, str::to_string).unwrap();

        assert!(std::fs::read_to_string(&bars).unwrap().contains("<svg"));
        assert!(std::fs::read_to_string(&lines).unwrap().contains("<svg"));
    }

    #[test]
    fn refuses_empty_results() {
        let dir = tempfile::tempdir().unwrap();
        let err = render_startup_bars(&dir.path().join("b.svg"), &[], str::to_string).unwrap_err();
        assert!(matches!(err, PlotError::Empty(_)));
    }
}
