use enrich_etl::{CliConfig, Engine, EnrichClient, EnrichPipeline, EtlError, Verdict};
use httpmock::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

fn write_input_csv(dir: &TempDir, rows: &[(&str, &str)]) -> String {
    let path = dir.path().join("events.csv");
    let mut writer = csv::Writer::from_path(&path).unwrap();
    writer
        .write_record(["EVENT_ID", "FULL_EVENT_PAYLOAD"])
        .unwrap();
    for (id, payload) in rows {
        writer.write_record([*id, *payload]).unwrap();
    }
    writer.flush().unwrap();
    path.to_str().unwrap().to_string()
}

fn config_for(server: &MockServer, input: String, output: String) -> CliConfig {
    CliConfig {
        endpoint: server.url("/enrich"),
        input,
        output,
        timeout_seconds: 5,
        progress_interval: 100,
        verbose: false,
        monitor: false,
    }
}

fn engine_for(config: CliConfig) -> Engine<EnrichClient, CliConfig> {
    let client = EnrichClient::new(&config.endpoint, config.timeout_seconds);
    Engine::new(EnrichPipeline::new(client, config))
}

fn read_output_rows(path: &str) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    assert_eq!(
        reader.headers().unwrap(),
        &csv::StringRecord::from(vec![
            "EVENT_ID",
            "TEST_RESULT",
            "FULL_EVENT_PAYLOAD",
            "ENRICHED_RESPONSE"
        ])
    );
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

fn complete_enrichment() -> Value {
    json!({
        "properties": {
            "ltv": "42.0",
            "cogs": "17.5",
            "ltv_net": "24.5",
            "products": [{"sku": "A", "ltv": "10", "cogs": "4"}]
        }
    })
}

#[tokio::test]
async fn test_end_to_end_all_records_pass() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input_csv(
        &temp_dir,
        &[
            ("evt-1", r#"{"properties": {"ltv": "1"}}"#),
            ("evt-2", r#"{"properties": {"cogs": "2"}}"#),
        ],
    );
    let output = temp_dir
        .path()
        .join("out.csv")
        .to_str()
        .unwrap()
        .to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/enrich")
            .header("content-type", "application/json");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(complete_enrichment());
    });

    let engine = engine_for(config_for(&server, input, output.clone()));
    let report = engine.run().await.unwrap();

    api_mock.assert_hits(2);
    assert_eq!(report.stats.total, 2);
    assert_eq!(report.stats.passed, 2);
    assert_eq!(report.stats.failed, 0);
    assert!(report.stats.meets_pass_threshold());
    assert!(!report.interrupted);

    let rows = read_output_rows(&output);
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row[1], Verdict::Pass.as_str());
        let response: Value = serde_json::from_str(&row[3]).unwrap();
        assert_eq!(response, complete_enrichment());
    }
    // Payload column is the verbatim input value
    assert_eq!(rows[0][2], r#"{"properties": {"ltv": "1"}}"#);
}

#[tokio::test]
async fn test_end_to_end_http_error_marks_rows_failed() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input_csv(&temp_dir, &[("evt-1", "{}")]);
    let output = temp_dir
        .path()
        .join("out.csv")
        .to_str()
        .unwrap()
        .to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/enrich");
        then.status(500);
    });

    let engine = engine_for(config_for(&server, input, output.clone()));
    let report = engine.run().await.unwrap();

    api_mock.assert();
    assert_eq!(report.stats.total, 1);
    assert_eq!(report.stats.failed, 1);
    assert!(!report.stats.meets_pass_threshold());

    let rows = read_output_rows(&output);
    assert_eq!(rows[0][1], "FAIL");
    assert_eq!(rows[0][3], r#"{"error":"HTTP 500"}"#);
}

#[tokio::test]
async fn test_end_to_end_parse_error_row_never_reaches_the_api() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input_csv(
        &temp_dir,
        &[
            ("evt-1", r#"{"properties": {}}"#),
            ("evt-2", "not json at all"),
        ],
    );
    let output = temp_dir
        .path()
        .join("out.csv")
        .to_str()
        .unwrap()
        .to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/enrich");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(complete_enrichment());
    });

    let engine = engine_for(config_for(&server, input, output.clone()));
    let report = engine.run().await.unwrap();

    // Only the parseable row hits the endpoint
    api_mock.assert_hits(1);
    assert_eq!(report.stats.total, 2);
    assert_eq!(report.stats.passed, 1);
    assert_eq!(report.stats.failed, 1);

    let rows = read_output_rows(&output);
    assert_eq!(rows[1][1], "FAIL");
    assert_eq!(rows[1][2], "not json at all");
    let envelope: Value = serde_json::from_str(&rows[1][3]).unwrap();
    assert!(envelope["error"]
        .as_str()
        .unwrap()
        .starts_with("Parse error:"));
}

#[tokio::test]
async fn test_end_to_end_validation_failure_envelope_keeps_response() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input_csv(&temp_dir, &[("evt-1", "{}")]);
    let output = temp_dir
        .path()
        .join("out.csv")
        .to_str()
        .unwrap()
        .to_string();

    let incomplete = json!({"properties": {"ltv": "1", "ltv_net": "1"}});
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/enrich");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(incomplete.clone());
    });

    let engine = engine_for(config_for(&server, input, output.clone()));
    let report = engine.run().await.unwrap();

    api_mock.assert();
    assert_eq!(report.stats.failed, 1);

    let rows = read_output_rows(&output);
    assert_eq!(rows[0][1], "FAIL");
    let envelope: Value = serde_json::from_str(&rows[0][3]).unwrap();
    assert_eq!(envelope["error"], "Missing fields: cogs");
    assert_eq!(envelope["response"], incomplete);
}

#[tokio::test]
async fn test_end_to_end_empty_input_produces_header_only_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input_csv(&temp_dir, &[]);
    let output = temp_dir
        .path()
        .join("out.csv")
        .to_str()
        .unwrap()
        .to_string();

    let server = MockServer::start();
    let engine = engine_for(config_for(&server, input, output.clone()));
    let report = engine.run().await.unwrap();

    assert_eq!(report.stats.total, 0);
    assert!(report.stats.meets_pass_threshold());

    let rows = read_output_rows(&output);
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_end_to_end_missing_input_file_aborts() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir
        .path()
        .join("out.csv")
        .to_str()
        .unwrap()
        .to_string();

    let server = MockServer::start();
    let config = config_for(
        &server,
        temp_dir
            .path()
            .join("missing.csv")
            .to_str()
            .unwrap()
            .to_string(),
        output,
    );

    let engine = engine_for(config);
    match engine.run().await {
        Err(EtlError::InputNotFound { path }) => assert!(path.ends_with("missing.csv")),
        other => panic!("expected InputNotFound, got {:?}", other.map(|r| r.stats)),
    }
}
