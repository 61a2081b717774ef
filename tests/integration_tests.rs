use httpmock::prelude::*;
use std::sync::Mutex;
use tempfile::TempDir;
use wa_checker::{
    BatchDispatcher, CheckEngine, DispatchSettings, EngineOptions, HttpCheckService,
    LocalStorage, RunProgress, RunState,
};

fn numbers_body(numbers: &[&str]) -> serde_json::Value {
    serde_json::json!({ "numbers": numbers, "timeout": 8 })
}

fn results_body(numbers: &[&str], status: &str) -> serde_json::Value {
    let results: Vec<serde_json::Value> = numbers
        .iter()
        .map(|n| serde_json::json!({ "number": n, "status": status }))
        .collect();
    serde_json::json!({ "results": results })
}

fn engine_for(
    server: &MockServer,
    output_path: &str,
    chunk_size: usize,
) -> CheckEngine<HttpCheckService, LocalStorage> {
    let service = HttpCheckService::new(server.url("/.netlify/functions/check-whatsapp"));
    let dispatcher = BatchDispatcher::new(service, DispatchSettings::new(chunk_size, 8));
    let options = EngineOptions {
        output_path: output_path.to_string(),
        ..EngineOptions::default()
    };
    CheckEngine::new(dispatcher, LocalStorage::new(output_path), options)
}

#[tokio::test]
async fn test_end_to_end_check_and_export() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/.netlify/functions/check-whatsapp")
            .json_body(numbers_body(&["62812", "62813"]));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "results": [
                    {"number": "62812", "status": "Aktif"},
                    {"number": "62813", "status": "Tidak Aktif"}
                ]
            }));
    });

    let engine = engine_for(&server, &output_path, 8);
    let outcome = engine
        .run(
            RunState::idle(),
            "0812, 0812\n813",
            &|_: usize| true,
            &|_: RunProgress| {},
        )
        .await
        .unwrap();

    api_mock.assert();
    assert_eq!(outcome.results.len(), 2);
    assert_eq!(outcome.summary.active, 1);
    assert!(outcome.state.can_export());

    let csv_path = engine.export(&outcome.results).await.unwrap();
    assert!(csv_path.ends_with("whatsapp_results.csv"));

    let csv = std::fs::read_to_string(temp_dir.path().join("whatsapp_results.csv")).unwrap();
    assert_eq!(csv, "number,status\n62812,Aktif\n62813,Tidak Aktif");
}

#[tokio::test]
async fn test_failed_middle_chunk_marks_only_that_chunk() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let first = ["62801", "62802", "62803", "62804"];
    let second = ["62805", "62806", "62807", "62808"];
    let third = ["62809", "62810"];

    let server = MockServer::start();
    let first_mock = server.mock(|when, then| {
        when.method(POST).json_body(numbers_body(&first));
        then.status(200).json_body(results_body(&first, "Aktif"));
    });
    let second_mock = server.mock(|when, then| {
        when.method(POST).json_body(numbers_body(&second));
        then.status(500).body("upstream exploded");
    });
    let third_mock = server.mock(|when, then| {
        when.method(POST).json_body(numbers_body(&third));
        then.status(200).json_body(results_body(&third, "Tidak Aktif"));
    });

    let progress = Mutex::new(Vec::new());
    let reporter = |p: RunProgress| progress.lock().unwrap().push(p);

    let engine = engine_for(&server, &output_path, 4);
    let raw = "62801 62802 62803 62804 62805 62806 62807 62808 62809 62810";
    let outcome = engine
        .run(RunState::idle(), raw, &|_: usize| true, &reporter)
        .await
        .unwrap();

    first_mock.assert_hits(1);
    second_mock.assert_hits(1);
    third_mock.assert_hits(1);

    let statuses: Vec<&str> = outcome.results.iter().map(|r| r.status.as_str()).collect();
    assert_eq!(
        statuses,
        vec![
            "Aktif", "Aktif", "Aktif", "Aktif", "Error", "Error", "Error", "Error",
            "Tidak Aktif", "Tidak Aktif"
        ]
    );
    assert_eq!(outcome.summary.errors, 4);
    assert_eq!(outcome.summary.batches, 3);
    assert_eq!(
        progress.into_inner().unwrap(),
        vec![
            RunProgress::new(4, 10),
            RunProgress::new(8, 10),
            RunProgress::new(10, 10)
        ]
    );
}

#[tokio::test]
async fn test_malformed_body_is_treated_as_failure() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST);
        then.status(200).body("<html>not json</html>");
    });

    let engine = engine_for(&server, &output_path, 8);
    let outcome = engine
        .run(RunState::idle(), "0812 0813", &|_: usize| true, &|_: RunProgress| {})
        .await
        .unwrap();

    api_mock.assert();
    assert!(outcome.results.iter().all(|r| r.is_error()));
    assert_eq!(outcome.results[0].number.as_str(), "62812");
    assert_eq!(outcome.results[1].number.as_str(), "62813");
}

#[tokio::test]
async fn test_empty_input_never_calls_service() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(serde_json::json!({"results": []}));
    });

    let engine = engine_for(&server, &output_path, 8);
    let result = engine
        .run(RunState::idle(), "  ;; ,, ", &|_: usize| true, &|_: RunProgress| {})
        .await;

    assert!(matches!(
        result,
        Err(wa_checker::CheckError::ValidationError { .. })
    ));
    api_mock.assert_hits(0);
}

#[tokio::test]
async fn test_declined_large_run_never_calls_service() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST);
        then.status(200).json_body(serde_json::json!({"results": []}));
    });

    let raw: Vec<String> = (0..501).map(|i| format!("0812{:05}", i)).collect();
    let asked = Mutex::new(None);
    let guard = |count: usize| {
        *asked.lock().unwrap() = Some(count);
        false
    };

    let engine = engine_for(&server, &output_path, 8);
    let result = engine
        .run(RunState::idle(), &raw.join("\n"), &guard, &|_: RunProgress| {})
        .await;

    assert!(matches!(
        result,
        Err(wa_checker::CheckError::RunDeclined { count: 501 })
    ));
    assert_eq!(*asked.lock().unwrap(), Some(501));
    api_mock.assert_hits(0);
}
