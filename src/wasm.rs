//! WASM entry points for browser use.

use wasm_bindgen::prelude::*;

use crate::config::DetectorConfig;
use crate::detect::{self, PassReport};
use crate::diagnostics::MemorySink;
use crate::error::DetectorError;

/// Load a network snapshot, run the detector and apply its marks.
/// Returns a JSON object with either `report` (success) or `errors` (failure).
#[wasm_bindgen]
pub fn detect_broken_segments(snapshot_json: &str, config_json: &str) -> JsValue {
    let result = detect_broken_segments_inner(snapshot_json, config_json);
    serde_wasm_bindgen::to_value(&result).unwrap_or_else(JsValue::from)
}

fn detect_broken_segments_inner(snapshot_json: &str, config_json: &str) -> DetectResult {
    // 1. Config (empty input means defaults)
    let config = if config_json.trim().is_empty() {
        DetectorConfig::default()
    } else {
        match DetectorConfig::from_json(config_json) {
            Ok(c) => c,
            Err(e) => {
                return DetectResult::Errors {
                    errors: vec![ErrorDto::from(e)],
                };
            }
        }
    };

    // 2. Load + build graph
    let mut graph = match crate::net::load_and_build(snapshot_json) {
        Ok(g) => g,
        Err(errors) => {
            return DetectResult::Errors {
                errors: errors.into_iter().map(ErrorDto::from).collect(),
            };
        }
    };

    // 3. Detect + commit
    let mut sink = MemorySink::new();
    let (report, playback) = detect::run_and_commit(&mut graph, &config, &mut sink);

    DetectResult::Success {
        report,
        applied: playback.applied,
        skipped: playback.skipped,
        log: sink.lines(),
    }
}

// ---------------------------------------------------------------------------
// DTOs for serialization to JS
// ---------------------------------------------------------------------------

#[derive(Debug, serde::Serialize)]
struct ErrorDto {
    code: String,
    phase: String,
    message: String,
    entity: Option<String>,
}

impl From<DetectorError> for ErrorDto {
    fn from(e: DetectorError) -> Self {
        ErrorDto {
            code: e.code,
            phase: e.phase.to_string(),
            message: e.message,
            entity: e.entity.map(|entity| entity.to_string()),
        }
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(tag = "status")]
enum DetectResult {
    #[serde(rename = "success")]
    Success {
        report: PassReport,
        applied: usize,
        skipped: usize,
        log: Vec<String>,
    },
    #[serde(rename = "errors")]
    Errors { errors: Vec<ErrorDto> },
}
