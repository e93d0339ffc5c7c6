use std::{fs, path::Path};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use pod_startup_analysis::{
    experiment::{AnalysisError, Breakdown, ExperimentConfig, run_experiment},
    plot::{Distribution, PlotMetric, box_series_from_results, render_grouped_boxplot},
    utils::export::{ResultRow, ResultsWriter, read_results},
};

fn event(kind: &str, pod: &str, node: &str, ts: f64) -> String {
    format!("I0610 16:07:22 1 event: {kind}, pod: {pod}, ns: default, node: {node}, at: {ts}")
}

fn write_log(path: &Path, lines: &[String]) {
    fs::write(path, lines.join("\n")).unwrap();
}

fn alpha_log() -> Vec<String> {
    vec![
        "starting experiment".to_string(),
        event("Created", "hello-1-a", "-", 100.0),
        event("Pulled", "hello-1-a", "n1", 100.5),
        event("Created", "hello-1-b", "-", 101.0),
        event("Scheduled", "hello-1-a", "n1", 102.0),
        event("Scheduled", "hello-1-b", "n2", 102.5),
        event("Created", "hello-5-a", "-", 200.0),
        event("Scheduled", "hello-5-a", "n1", 203.0),
        // never scheduled
        event("Created", "hello-5-b", "-", 201.0),
    ]
}

fn config(dir: &TempDir, beta_log: &str) -> ExperimentConfig {
    let text = format!(
        r#"
name = "pipeline"
instances = [1, 5]
log_path_template = "{dir}/logs_{{setup}}.txt"
output = "{dir}/results/pipeline_results.csv"
images_dir = "{dir}/images"

[[setups]]
name = "alpha"
label = "Alpha Cluster"

[[setups]]
name = "beta"
log_file = "{dir}/{beta_log}"
skip_instances = [5]
"#,
        dir = dir.path().display()
    );
    ExperimentConfig::from_toml_str(&text).unwrap()
}

fn write_table(config: &ExperimentConfig) -> Result<usize, AnalysisError> {
    let mut writer = ResultsWriter::create(&config.output)?;
    run_experiment(config, Breakdown::Batch, |result| {
        writer.append(&ResultRow::from(result)).map_err(AnalysisError::from)
    })?;
    Ok(writer.rows_written())
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn writes_one_row_per_batch() {
    let dir = tempfile::tempdir().unwrap();
    write_log(&dir.path().join("logs_alpha.txt"), &alpha_log());
    write_log(
        &dir.path().join("beta.txt"),
        &[
            event("Created", "hello-1-x", "-", 10.0),
            event("Scheduled", "hello-1-x", "n3", 10.25),
            // excluded batch, never read
            event("Created", "hello-5-x", "-", 20.0),
        ],
    );
    let config = config(&dir, "beta.txt");

    assert_eq!(write_table(&config).unwrap(), 3);

    let rows = read_results(&config.output).unwrap();
    let keys: Vec<(&str, u32)> = rows.iter().map(|r| (r.setup.as_str(), r.instances)).collect();
    assert_eq!(keys, vec![("alpha", 1), ("alpha", 5), ("beta", 1)]);

    assert_close(rows[0].average_startup_time, 1.75);
    assert_close(rows[0].startup_std_dev, 0.25);
    assert_close(rows[0].average_queue_time, 0.5);
    assert_close(rows[0].scheduling_latency, 1.5);

    assert_close(rows[1].average_startup_time, 3.0);
    assert_close(rows[1].startup_std_dev, 0.0);
    assert_close(rows[1].average_queue_time, 0.0);
    assert_close(rows[1].scheduling_latency, 0.0);

    assert_close(rows[2].average_startup_time, 0.25);

    let text = fs::read_to_string(&config.output).unwrap();
    assert!(text.starts_with(
        "setup, instances, average start-up time, start-up time std dev, average queue time, scheduling latency\n"
    ));
}

#[test]
fn schema_mismatch_keeps_earlier_rows() {
    let dir = tempfile::tempdir().unwrap();
    write_log(&dir.path().join("logs_alpha.txt"), &alpha_log());
    write_log(
        &dir.path().join("broken.txt"),
        &[
            event("Created", "hello-1-x", "-", 10.0),
            "Scheduled hello-1-x n3".to_string(),
        ],
    );
    let config = config(&dir, "broken.txt");

    let err = write_table(&config).unwrap_err();
    match err {
        AnalysisError::SchemaMismatch { line, .. } => assert_eq!(line, 2),
        other => panic!("unexpected error: {other}"),
    }

    let rows = read_results(&config.output).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.setup == "alpha"));
}

#[test]
fn missing_log_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    write_log(&dir.path().join("logs_alpha.txt"), &alpha_log());
    let config = config(&dir, "absent.txt");

    let err = run_experiment(&config, Breakdown::Batch, |_| Ok(())).unwrap_err();
    assert!(matches!(err, AnalysisError::Io { .. }));
}

#[test]
fn per_run_boxplot_from_logs() {
    let dir = tempfile::tempdir().unwrap();
    let mut lines = Vec::new();
    for run in 0..3 {
        let base = 1000.0 + run as f64 * 60.0;
        for pod in 0..5 {
            let name = format!("hello-5-r{run}p{pod}");
            let created = base + pod as f64 * 0.1;
            lines.push(event("Created", &name, "-", created));
            lines.push(event("Scheduled", &name, "n1", created + 1.0 + run as f64));
        }
    }
    write_log(&dir.path().join("logs_alpha.txt"), &lines);
    write_log(&dir.path().join("beta.txt"), &[]);

    let mut config = config(&dir, "beta.txt");
    config.instances = vec![5];
    config.setups.truncate(1);

    let results = run_experiment(&config, Breakdown::PerRun, |_| Ok(())).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].label, "Alpha Cluster");

    let runs: Vec<f64> = results[0]
        .metrics
        .runs
        .iter()
        .map(|run| run.average_startup_latency)
        .collect();
    assert_eq!(runs.len(), 3);
    for (actual, expected) in runs.iter().zip([1.0, 2.0, 3.0]) {
        assert_close(*actual, expected);
    }

    let series = box_series_from_results(&results, PlotMetric::Startup, Distribution::PerRun);
    let path = config
        .images_dir
        .join(Distribution::PerRun.file_name(&config.name, PlotMetric::Startup));
    render_grouped_boxplot(
        &path,
        &config.instances,
        &series,
        &Distribution::PerRun.axis_label(PlotMetric::Startup),
    )
    .unwrap();

    assert!(path.ends_with("avg_pipeline_boxplot_start_up_time.svg"));
    assert!(fs::read_to_string(&path).unwrap().contains("<svg"));
}
