//! End-to-end pipeline tests over the public API, with the remote
//! collaborators replaced by in-process fakes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;

use fleetrag::application::services::{
    EmbeddingEngine, GenerationEngine, LogSearcher, QueryService, ServiceConfig,
};
use fleetrag::application::QueryRequest;
use fleetrag::domain::{DomainError, EmbeddingRole, LogRecord, SearchRequest};
use fleetrag::infrastructure::SimpleEmbedEngine;

struct FixedEmbedder {
    dims: usize,
    calls: AtomicUsize,
}

impl FixedEmbedder {
    fn new(dims: usize) -> Self {
        Self {
            dims,
            calls: AtomicUsize::new(0),
        }
    }
}

impl EmbeddingEngine for FixedEmbedder {
    fn embed(&self, _text: &str, _role: EmbeddingRole) -> Result<Vec<f32>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![0.5; self.dims])
    }

    fn dims(&self) -> Option<usize> {
        Some(self.dims)
    }
}

struct BrokenEmbedder;

impl EmbeddingEngine for BrokenEmbedder {
    fn embed(&self, _text: &str, _role: EmbeddingRole) -> Result<Vec<f32>, DomainError> {
        Err(DomainError::embedding("connection reset by peer"))
    }
}

struct RecordingSearcher {
    records: Vec<LogRecord>,
    calls: AtomicUsize,
    last_request: Mutex<Option<SearchRequest>>,
}

impl RecordingSearcher {
    fn returning(records: Vec<LogRecord>) -> Self {
        Self {
            records,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }
}

impl LogSearcher for RecordingSearcher {
    fn search(&self, request: &SearchRequest) -> Result<Vec<LogRecord>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().expect("request lock") = Some(request.clone());
        Ok(self.records.clone())
    }
}

struct CannedGenerator {
    answer: String,
    calls: AtomicUsize,
}

impl CannedGenerator {
    fn new(answer: &str) -> Self {
        Self {
            answer: answer.into(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl GenerationEngine for CannedGenerator {
    fn generate(&self, _question: &str, _context: &str) -> Result<String, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer.clone())
    }
}

fn record(error_code: &str, score: f64) -> LogRecord {
    LogRecord {
        score,
        timestamp: "2024-05-01T10:00:00Z".into(),
        message: "battery voltage below threshold".into(),
        service: "battery-monitor".into(),
        error_code: error_code.into(),
        vehicle_id: "VH-1042".into(),
        vehicle_state: "DRIVING".into(),
        sensor_readings: json!({ "battery_voltage": 11.2 }),
        diagnostic_info: json!({ "cell_count": 96 }),
    }
}

#[test]
fn battery_voltage_question_runs_the_full_pipeline() {
    let embedder = Arc::new(FixedEmbedder::new(1024));
    let searcher = Arc::new(RecordingSearcher::returning(vec![
        record("BAT_LOW", 0.95),
        record("BAT_LOW", 0.91),
        record("BAT_SAG", 0.88),
        record("BAT_SAG", 0.80),
        record("PWR_DIP", 0.77),
    ]));
    let generator = Arc::new(CannedGenerator::new(
        "Two vehicles reported voltage under 11.5V in the last hour.",
    ));

    let service = QueryService::new(
        Arc::clone(&embedder) as Arc<dyn EmbeddingEngine>,
        Arc::clone(&searcher) as Arc<dyn LogSearcher>,
        Arc::clone(&generator) as Arc<dyn GenerationEngine>,
        ServiceConfig::default(),
    );

    let response = service
        .answer(QueryRequest::new(
            "Show me vehicles with battery voltage below 11.5V in the last hour",
        ))
        .expect("answer");

    // The search request carried both the knn clause and the range filter.
    let request = searcher
        .last_request
        .lock()
        .expect("request lock")
        .clone()
        .expect("captured request");
    assert_eq!(request.vector.len(), 1024);
    let body = request.to_body();
    assert_eq!(
        body["query"]["bool"]["filter"]["range"]["timestamp"]["gte"],
        "now-1h"
    );
    assert_eq!(
        body["query"]["bool"]["must"]["knn"]["message_embedding"]["k"],
        5
    );

    assert!(!response.llm_response.is_empty());
    assert_eq!(response.similar_documents.len(), 3);
    assert!(response.processing_time > 0.0);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn plain_question_searches_without_time_filter() {
    let searcher = Arc::new(RecordingSearcher::returning(vec![record("NET_DROP", 0.6)]));
    let service = QueryService::new(
        Arc::new(SimpleEmbedEngine::default()),
        Arc::clone(&searcher) as Arc<dyn LogSearcher>,
        Arc::new(CannedGenerator::new("mostly telemetry dropouts")),
        ServiceConfig::default(),
    );

    service
        .answer(QueryRequest::new("which services fail most often?"))
        .expect("answer");

    let request = searcher
        .last_request
        .lock()
        .expect("request lock")
        .clone()
        .expect("captured request");
    assert!(request.window.is_none());
    assert!(request.to_body()["query"]["knn"]["message_embedding"]
        .is_object());
}

#[test]
fn embedding_outage_stops_before_retrieval_and_generation() {
    let searcher = Arc::new(RecordingSearcher::returning(vec![record("BAT_LOW", 0.9)]));
    let generator = Arc::new(CannedGenerator::new("unused"));
    let service = QueryService::new(
        Arc::new(BrokenEmbedder),
        Arc::clone(&searcher) as Arc<dyn LogSearcher>,
        Arc::clone(&generator) as Arc<dyn GenerationEngine>,
        ServiceConfig::default(),
    );

    let err = service
        .answer(QueryRequest::new("anything in the last 2 days"))
        .expect_err("embedding error");

    assert!(matches!(err, DomainError::Embedding(_)));
    assert!(!err.is_client_error());
    assert_eq!(searcher.calls.load(Ordering::SeqCst), 0);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn missing_query_is_rejected_without_downstream_calls() {
    let embedder = Arc::new(FixedEmbedder::new(16));
    let searcher = Arc::new(RecordingSearcher::returning(Vec::new()));
    let service = QueryService::new(
        Arc::clone(&embedder) as Arc<dyn EmbeddingEngine>,
        Arc::clone(&searcher) as Arc<dyn LogSearcher>,
        Arc::new(CannedGenerator::new("unused")),
        ServiceConfig::default(),
    );

    let err = service
        .answer(QueryRequest { query: None })
        .expect_err("validation error");

    assert!(err.is_client_error());
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(searcher.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn empty_index_still_produces_an_answer() {
    let generator = Arc::new(CannedGenerator::new(
        "No matching records were found for that question.",
    ));
    let service = QueryService::new(
        Arc::new(SimpleEmbedEngine::default()),
        Arc::new(RecordingSearcher::returning(Vec::new())),
        Arc::clone(&generator) as Arc<dyn GenerationEngine>,
        ServiceConfig::default(),
    );

    let response = service
        .answer(QueryRequest::new("any brake faults last week?"))
        .expect("answer");

    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    assert!(response.similar_documents.is_empty());
    assert!(!response.llm_response.is_empty());
}
