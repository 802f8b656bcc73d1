use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Fields projected out of the store for every hit. The embedding vector is
/// deliberately absent; it never leaves the index.
pub const SOURCE_FIELDS: [&str; 8] = [
    "timestamp",
    "message",
    "service",
    "error_code",
    "vehicle_id",
    "vehicle_state",
    "sensor_readings",
    "diagnostic_info",
];

/// Sentinel used when a hit lacks an optional field.
pub const MISSING_FIELD: &str = "N/A";

/// Time units the temporal parser recognizes, mapped to the store's
/// date-math symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Hour,
    Day,
    Week,
    Month,
}

impl TimeUnit {
    pub fn symbol(&self) -> char {
        match self {
            TimeUnit::Hour => 'h',
            TimeUnit::Day => 'd',
            TimeUnit::Week => 'w',
            TimeUnit::Month => 'M',
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "hour" => Some(TimeUnit::Hour),
            "day" => Some(TimeUnit::Day),
            "week" => Some(TimeUnit::Week),
            "month" => Some(TimeUnit::Month),
            _ => None,
        }
    }
}

/// A relative time window extracted from query text.
///
/// Only the lower bound is ever materialized; the upper bound is implicitly
/// "now" on the store side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalWindow {
    pub lower_bound: String,
}

impl TemporalWindow {
    /// Window covering the last `amount` units, expressed in date math
    /// (`now-3d`, `now-1h`, ...). `amount` must already be validated as
    /// positive by the parser.
    pub fn last(amount: u32, unit: TimeUnit) -> Self {
        Self {
            lower_bound: format!("now-{}{}", amount, unit.symbol()),
        }
    }
}

/// Distinguishes query-side from document-side embeddings for models that
/// shape the two differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingRole {
    SearchQuery,
    SearchDocument,
}

impl EmbeddingRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingRole::SearchQuery => "search_query",
            EmbeddingRole::SearchDocument => "search_document",
        }
    }
}

/// A fully-shaped hybrid search request: nearest-neighbor clause plus an
/// optional time-range filter. Built fresh for every query and turned into
/// the store's wire body by [`SearchRequest::to_body`].
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub vector_field: String,
    pub vector: Vec<f32>,
    pub k: usize,
    pub window: Option<TemporalWindow>,
}

impl SearchRequest {
    pub fn new(vector_field: impl Into<String>, vector: Vec<f32>, k: usize) -> Self {
        Self {
            vector_field: vector_field.into(),
            vector,
            k: k.max(1),
            window: None,
        }
    }

    pub fn with_window(mut self, window: Option<TemporalWindow>) -> Self {
        self.window = window;
        self
    }

    /// Render the request as a store search body.
    ///
    /// With a window present the query is a bool clause combining the knn
    /// match (`must`) with a range filter on `timestamp`; without one it is
    /// the bare knn clause. Deterministic, no I/O.
    pub fn to_body(&self) -> Value {
        let field = self.vector_field.as_str();
        let knn = json!({
            "knn": {
                field: {
                    "vector": &self.vector,
                    "k": self.k,
                }
            }
        });

        let query = match &self.window {
            Some(window) => json!({
                "bool": {
                    "must": knn,
                    "filter": {
                        "range": {
                            "timestamp": { "gte": &window.lower_bound }
                        }
                    }
                }
            }),
            None => knn,
        };

        json!({
            "size": self.k,
            "_source": SOURCE_FIELDS,
            "query": query,
        })
    }
}

/// One retrieved log record, shaped from a raw store hit.
///
/// `message`, `service` and `error_code` are required; everything else
/// defaults rather than failing the whole search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub score: f64,
    pub timestamp: String,
    pub message: String,
    pub service: String,
    pub error_code: String,
    pub vehicle_id: String,
    pub vehicle_state: String,
    pub sensor_readings: Value,
    pub diagnostic_info: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector() -> Vec<f32> {
        vec![0.1, 0.2, 0.3]
    }

    #[test]
    fn bare_knn_body_without_window() {
        let body = SearchRequest::new("message_embedding", vector(), 5).to_body();

        assert_eq!(body["size"], 5);
        assert_eq!(body["query"]["knn"]["message_embedding"]["k"], 5);
        assert!(body["query"]["bool"].is_null());
        assert!(
            body["query"]["knn"]["message_embedding"]["vector"]
                .as_array()
                .is_some()
        );
    }

    #[test]
    fn bool_body_with_window() {
        let window = TemporalWindow::last(3, TimeUnit::Day);
        let body = SearchRequest::new("message_embedding", vector(), 5)
            .with_window(Some(window))
            .to_body();

        assert_eq!(
            body["query"]["bool"]["must"]["knn"]["message_embedding"]["k"],
            5
        );
        assert_eq!(
            body["query"]["bool"]["filter"]["range"]["timestamp"]["gte"],
            "now-3d"
        );
    }

    #[test]
    fn source_projection_excludes_embedding_field() {
        let body = SearchRequest::new("message_embedding", vector(), 5).to_body();
        let source: Vec<&str> = body["_source"]
            .as_array()
            .expect("_source array")
            .iter()
            .filter_map(|v| v.as_str())
            .collect();

        assert_eq!(source.len(), SOURCE_FIELDS.len());
        assert!(source.contains(&"timestamp"));
        assert!(source.contains(&"diagnostic_info"));
        assert!(!source.contains(&"message_embedding"));
    }

    #[test]
    fn zero_k_is_clamped() {
        let request = SearchRequest::new("message_embedding", vector(), 0);
        assert_eq!(request.k, 1);
    }

    #[test]
    fn window_date_math_per_unit() {
        assert_eq!(TemporalWindow::last(1, TimeUnit::Hour).lower_bound, "now-1h");
        assert_eq!(TemporalWindow::last(2, TimeUnit::Week).lower_bound, "now-2w");
        assert_eq!(
            TemporalWindow::last(6, TimeUnit::Month).lower_bound,
            "now-6M"
        );
    }
}
