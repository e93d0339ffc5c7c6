//! Grouped box plots: one group per instance count, one box per setup.

use std::{error::Error, fs::create_dir_all, path::Path};

use indexmap::IndexMap;
use log::{info, warn};
use plotters::{data::Quartiles, prelude::*};

use crate::{
    experiment::BatchResult,
    plot::{Distribution, PlotError, PlotMetric, series_color},
};

/// The boxes of one setup: values per instance count.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSeries {
    pub label: String,
    pub boxes: Vec<(u32, Vec<f64>)>,
}

/// Collects box plot values from batch results, grouped by setup in result order.
///
/// `PerRun` needs results computed with a per-run breakdown; batches without runs
/// produce empty boxes.
pub fn box_series_from_results(
    results: &[BatchResult],
    metric: PlotMetric,
    distribution: Distribution,
) -> Vec<BoxSeries> {
    let mut by_setup: IndexMap<&str, BoxSeries> = IndexMap::new();

    for result in results {
        let values = match distribution {
            Distribution::PerPod => metric.per_pod(&result.metrics.series).to_vec(),
            Distribution::PerRun => result
                .metrics
                .runs
                .iter()
                .map(|run| metric.average(run))
                .collect(),
        };

        by_setup
            .entry(result.setup.as_str())
            .or_insert_with(|| BoxSeries {
                label: result.label.clone(),
                boxes: Vec::new(),
            })
            .boxes
            .push((result.instances, values));
    }

    by_setup.into_values().collect()
}

/// Renders grouped box plots to an SVG file. Whiskers stop at 1.5 IQR; outliers are
/// not drawn.
pub fn render_grouped_boxplot(
    path: &Path,
    instances: &[u32],
    series: &[BoxSeries],
    y_label: &str,
) -> Result<(), PlotError> {
    let has_values = series
        .iter()
        .flat_map(|s| s.boxes.iter())
        .any(|(_, values)| !values.is_empty());
    if !has_values {
        return Err(PlotError::Empty(path.display().to_string()));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(|source| PlotError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    draw_grouped_boxplot(path, instances, series, y_label).map_err(|e| PlotError::Render {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    info!("Box plot written to {}", path.display());
    Ok(())
}

/// x position of a box: groups of `setups + 1` slots, the last slot left as a gap.
fn box_position(instance_idx: usize, setup_idx: usize, setups: usize) -> i32 {
    (instance_idx * (setups + 1) + setup_idx) as i32
}

fn draw_grouped_boxplot(
    path: &Path,
    instances: &[u32],
    series: &[BoxSeries],
    y_label: &str,
) -> Result<(), Box<dyn Error>> {
    let setups = series.len();
    let stride = setups as i32 + 1;
    let center = (setups as i32 - 1) / 2;
    let last_pos = box_position(instances.len(), 0, setups);

    let mut placed: Vec<(usize, i32, Quartiles)> = Vec::new();
    for (setup_idx, s) in series.iter().enumerate() {
        for (count, values) in &s.boxes {
            let Some(instance_idx) = instances.iter().position(|n| n == count) else {
                warn!("{}: instance count {count} not on the x axis, skipped", s.label);
                continue;
            };
            if values.is_empty() {
                warn!("{}: no values for {count} instances", s.label);
                continue;
            }
            placed.push((
                setup_idx,
                box_position(instance_idx, setup_idx, setups),
                Quartiles::new(values),
            ));
        }
    }

    let (y_min, y_max) = padded_range(placed.iter().flat_map(|(_, _, q)| q.values()));

    let root = SVGBackend::new(path, (1400, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(-1i32..last_pos, y_min..y_max)?;

    let label_for = |pos: &i32| -> String {
        if *pos < 0 || pos % stride != center {
            return String::new();
        }
        instances
            .get((pos / stride) as usize)
            .map(|n| n.to_string())
            .unwrap_or_default()
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(last_pos as usize + 2)
        .x_label_formatter(&label_for)
        .x_desc("Number of Instances Started at Once")
        .y_desc(y_label)
        .draw()?;

    for (setup_idx, s) in series.iter().enumerate() {
        let color = series_color(setup_idx);
        let boxes: Vec<_> = placed
            .iter()
            .filter(|(idx, _, _)| *idx == setup_idx)
            .map(|(_, pos, quartiles)| {
                Boxplot::new_vertical(*pos, quartiles)
                    .width(18)
                    .whisker_width(0.6)
                    .style(color.stroke_width(2))
            })
            .collect();

        chart
            .draw_series(boxes)?
            .label(s.label.clone())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
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

fn padded_range(values: impl Iterator<Item = f32>) -> (f32, f32) {
    let (min, max) = values.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((max - min) * 0.05).max(0.05);
    ((min - pad).min(0.0), max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{BatchMetrics, BatchSummary, MetricSeries};
    use pretty_assertions::assert_eq;

    fn result(setup: &str, instances: u32, durations: Vec<f64>, runs: Vec<f64>) -> BatchResult {
        BatchResult {
            setup: setup.to_string(),
            label: setup.to_uppercase(),
            instances,
            metrics: BatchMetrics {
                series: MetricSeries {
                    queue_times: vec![0.0; durations.len()],
                    durations,
                    scheduling_latencies: Vec::new(),
                },
                summary: BatchSummary::default(),
                runs: runs
                    .into_iter()
                    .map(|avg| BatchSummary {
                        average_startup_latency: avg,
                        ..BatchSummary::default()
                    })
                    .collect(),
            },
        }
    }

    #[test]
    fn groups_results_by_setup() {
        let results = vec![
            result("a", 1, vec![1.0], vec![]),
            result("a", 5, vec![2.0, 3.0], vec![]),
            result("b", 1, vec![4.0], vec![]),
        ];
        let series = box_series_from_results(&results, PlotMetric::Startup, Distribution::PerPod);

        assert_eq!(
            series,
            vec![
                BoxSeries {
                    label: "A".into(),
                    boxes: vec![(1, vec![1.0]), (5, vec![2.0, 3.0])],
                },
                BoxSeries {
                    label: "B".into(),
                    boxes: vec![(1, vec![4.0])],
                },
            ]
        );
    }

    #[test]
    fn per_run_boxes_use_run_averages() {
        let results = vec![result("a", 5, vec![1.0; 10], vec![0.5, 0.75])];
        let series = box_series_from_results(&results, PlotMetric::Startup, Distribution::PerRun);

        assert_eq!(series[0].boxes, vec![(5, vec![0.5, 0.75])]);
    }

    #[test]
    fn positions_leave_a_gap_between_groups() {
        assert_eq!(box_position(0, 0, 3), 0);
        assert_eq!(box_position(0, 2, 3), 2);
        assert_eq!(box_position(1, 0, 3), 4);
    }

    #[test]
    fn renders_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("images").join("box.svg");
        let series = vec![BoxSeries {
            label: "Setup".into(),
            boxes: vec![(1, vec![1.0, 2.0, 3.0]), (5, vec![2.0, 2.5, 4.0])],
        }];

        render_grouped_boxplot(&path, &[1, 5], &series, "Start-up Time (seconds)").unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn refuses_empty_plot() {
        let dir = tempfile::tempdir().unwrap();
        let series = vec![BoxSeries {
            label: "Setup".into(),
            boxes: vec![(1, vec![])],
        }];

        let err = render_grouped_boxplot(&dir.path().join("b.svg"), &[1], &series, "y").unwrap_err();
        assert!(matches!(err, PlotError::Empty(_)));
    }
}
