use fuel_price_report::cleaner::clean;
use fuel_price_report::config::{ChartConfig, ReportConfig};
use fuel_price_report::loader::{LoadError, load_from_reader};
use fuel_price_report::pipeline::{OutputFormat, RunOptions, run};
use fuel_price_report::report::{Report, Verdict};
use fuel_price_report::schema::DROPPED_COLUMNS;
use std::path::{Path, PathBuf};

const FIXTURE: &str = include_str!("fixtures/sample.tsv");

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample.tsv")
}

fn font_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/DejaVuSans.ttf")
}

fn without_column(content: &str, idx: usize) -> String {
    content
        .lines()
        .map(|line| {
            let kept: Vec<&str> = line
                .split('\t')
                .enumerate()
                .filter(|(i, _)| *i != idx)
                .map(|(_, f)| f)
                .collect();
            format!("{}\n", kept.join("\t"))
        })
        .collect()
}

fn approx(a: Option<f64>, b: f64) -> bool {
    a.is_some_and(|a| (a - b).abs() < 1e-9)
}

fn report_from(content: &str) -> Report {
    let raw = load_from_reader(content.as_bytes())
        .expect("Failed to load fixture")
        .drop_columns(&DROPPED_COLUMNS)
        .expect("Failed to drop date columns");
    Report::from_table(&clean(raw), &ReportConfig::default(), "fixture")
}

#[test]
fn test_full_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let chart_path = dir.path().join("analise_combustiveis.png");
    let options = RunOptions {
        input: fixture_path(),
        chart: Some(ChartConfig {
            path: chart_path.clone(),
            dpi: 40,
            ..Default::default()
        }),
        ..Default::default()
    };

    let mut out = Vec::new();
    let report = run(&options, &mut out).expect("Pipeline failed");

    assert_eq!(report.overview.total_rows, 5);
    assert_eq!(report.overview.categories, 2);
    assert_eq!(report.overview.regions, 2);
    assert_eq!(report.overview.states, 3);

    let gas = report
        .category_prices
        .iter()
        .find(|p| p.key == "GASOLINA COMUM")
        .unwrap();
    let ethanol = report
        .category_prices
        .iter()
        .find(|p| p.key == "ETANOL HIDRATADO")
        .unwrap();
    assert_eq!(gas.count, 2);
    assert!(approx(gas.mean, 5.2));
    assert_eq!(ethanol.count, 1);
    assert!(approx(ethanol.mean, 3.4));

    let comparison = report.comparison.as_ref().unwrap();
    assert_eq!(comparison.verdict, Verdict::Favorable);

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Total records: 5"));
    assert!(text.contains("Charts saved to"));

    let size = std::fs::metadata(&chart_path).unwrap().len();
    assert!(size > 0);
}

#[test]
fn test_fixture_aggregates() {
    let report = report_from(FIXTURE);

    let counts: usize = report.category_counts.iter().map(|c| c.count).sum();
    assert_eq!(counts, 5);
    assert_eq!(report.category_counts[0].category, "GASOLINA COMUM");
    assert_eq!(report.category_counts[0].count, 3);

    assert_eq!(report.region_prices[0].key, "SUDESTE");
    assert!(approx(report.region_prices[0].value, 4.6));
    assert_eq!(report.region_prices[1].key, "NORDESTE");
    assert_eq!(report.region_prices[1].value, None);

    // dash margin in BAHIA ethanol is skipped, not zeroed
    let nordeste = report
        .region_margins
        .iter()
        .find(|r| r.key == "NORDESTE")
        .unwrap();
    assert!(approx(nordeste.value, 0.4));

    let states: Vec<_> = report
        .top_priced_states
        .iter()
        .map(|s| s.key.as_str())
        .collect();
    assert_eq!(states, vec!["RIO DE JANEIRO", "SAO PAULO", "BAHIA"]);

    assert_eq!(report.top_variable_states[0].key, "BAHIA");
    assert!(approx(report.top_variable_states[0].value, 0.0375));
}

#[test]
fn test_dates_do_not_affect_aggregates() {
    let shifted = FIXTURE
        .replace("2021-01-03", "1999-12-31")
        .replace("2021-01-09", "not a date");

    let a = report_from(FIXTURE);
    let b = report_from(&shifted);

    assert_eq!(a.overview, b.overview);
    assert_eq!(a.category_counts, b.category_counts);
    assert_eq!(a.category_prices, b.category_prices);
    assert_eq!(a.region_prices, b.region_prices);
    assert_eq!(a.region_margins, b.region_margins);
    assert_eq!(a.top_priced_states, b.top_priced_states);
    assert_eq!(a.top_variable_states, b.top_variable_states);
    assert_eq!(a.comparison, b.comparison);
}

#[test]
fn test_missing_resale_column_is_tolerated() {
    // COEF DE VARIAÇÃO REVENDA is the 13th column
    let report = report_from(&without_column(FIXTURE, 12));

    assert_eq!(report.missing_columns, vec!["COEF DE VARIAÇÃO REVENDA"]);
    assert!(report.top_variable_states.iter().all(|s| s.value.is_none()));
    assert!(approx(
        report.category_prices.iter().find(|p| p.key == "GASOLINA COMUM").unwrap().mean,
        5.2
    ));
}

#[test]
fn test_chart_without_resale_prices() {
    let dir = tempfile::tempdir().unwrap();
    // PREÇO MÉDIO REVENDA is the 8th column
    let input = dir.path().join("no_resale_price.tsv");
    std::fs::write(&input, without_column(FIXTURE, 7)).unwrap();
    let chart_path = dir.path().join("chart.png");

    let options = RunOptions {
        input,
        chart: Some(ChartConfig {
            path: chart_path.clone(),
            dpi: 30,
            font_path: Some(font_path()),
            ..Default::default()
        }),
        ..Default::default()
    };

    let report = run(&options, &mut Vec::<u8>::new()).expect("Pipeline failed");

    assert_eq!(report.missing_columns, vec!["PREÇO MÉDIO REVENDA"]);
    assert!(report.region_prices.iter().all(|r| r.value.is_none()));
    assert!(report.comparison.is_none());
    assert!(std::fs::metadata(&chart_path).unwrap().len() > 0);
}

#[test]
fn test_missing_required_column_fails() {
    let content: String = FIXTURE
        .lines()
        .map(|line| {
            let (_, rest) = line.split_once('\t').unwrap();
            format!("{rest}\n")
        })
        .collect();

    let result = load_from_reader(content.as_bytes());
    assert!(matches!(result, Err(LoadError::MissingColumn(ref c)) if c == "DATA INICIAL"));
}

#[test]
fn test_missing_input_file_fails() {
    let options = RunOptions {
        input: PathBuf::from("no/such/file.tsv"),
        chart: None,
        ..Default::default()
    };

    let err = run(&options, &mut Vec::<u8>::new()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LoadError>(),
        Some(LoadError::NotFound(_))
    ));
}

#[test]
fn test_json_output() {
    let options = RunOptions {
        input: fixture_path(),
        chart: None,
        format: OutputFormat::Json,
        ..Default::default()
    };

    let mut out = Vec::new();
    run(&options, &mut out).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(value["overview"]["total_rows"], 5);
    assert_eq!(value["comparison"]["verdict"], "favorable");
}
