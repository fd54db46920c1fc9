//! WASM bindings for the canopy-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.
//! Every export returns a string; failures come back as a JSON object with
//! an `error` field, and the message is also logged to the console.

use wasm_bindgen::prelude::*;

use crate::error::LayoutError;
use crate::layout::LayoutConfig;
use crate::output::{layout_document, LayoutOutput};
use crate::render::render_document_svg;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

const FALLBACK_ERROR: &str =
    r#"{"error": {"kind": "serialization", "message": "serialization failed"}}"#;

fn error_json(e: &LayoutError) -> String {
    serde_json::to_string(&LayoutOutput::from_error(e))
        .unwrap_or_else(|_| FALLBACK_ERROR.to_string())
}

/// Response body, plus the message to log when it carries an error.
type Response = (String, Option<String>);

fn layout_response(document: &str, config: &str) -> Response {
    let output = match layout_document(document, config) {
        Ok(output) => output,
        Err(e) => return (error_json(&e), Some(format!("Error computing layout: {}", e))),
    };
    match serde_json::to_string(&output) {
        Ok(json) => (json, None),
        Err(e) => {
            let err = LayoutError::Serialization(e.to_string());
            (error_json(&err), Some(format!("Error serializing layout: {:?}", e)))
        }
    }
}

fn svg_response(document: &str, config: &str) -> Response {
    match render_document_svg(document, config) {
        Ok(svg) => (svg, None),
        Err(e) => (error_json(&e), Some(format!("Error rendering layout: {}", e))),
    }
}

fn respond((body, log): Response) -> String {
    if let Some(msg) = log {
        console_error(&msg);
    }
    body
}

/// Lay out a topic document. `config` may be empty for the defaults.
/// Returns the layout JSON, or a JSON object with an `error` field.
#[wasm_bindgen]
pub fn compute_layout(document: &str, config: &str) -> String {
    respond(layout_response(document, config))
}

/// Lay out a topic document and draw it as SVG markup.
/// Returns the SVG, or the same error JSON as `compute_layout`.
#[wasm_bindgen]
pub fn render_svg(document: &str, config: &str) -> String {
    respond(svg_response(document, config))
}

/// The default layout configuration as JSON, for seeding editor forms.
#[wasm_bindgen]
pub fn default_config() -> String {
    serde_json::to_string(&LayoutConfig::default()).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const DOC: &str = r#"{ "root": "A", "nodes": [
        { "name": "A", "children": ["B"] },
        { "name": "B" }
    ] }"#;

    #[test]
    fn test_layout_response_ok() {
        let (body, log) = layout_response(DOC, "");
        assert!(log.is_none());
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["nodes"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_svg_error_is_reported_as_json() {
        let (body, log) = svg_response(r#"{ "nodes": [] }"#, "");
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"]["kind"], "missing_root");
        assert!(log.unwrap().starts_with("Error rendering layout"));

        let (body, _) = svg_response(DOC, r#"{ "branch_length": 0.0 }"#);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"]["kind"], "invalid_configuration");
    }

    #[test]
    fn test_svg_and_layout_errors_match() {
        let bad = r#"{ "root": "A", "nodes": [{ "name": "A", "children": ["Z"] }] }"#;
        assert_eq!(svg_response(bad, "").0, layout_response(bad, "").0);
    }

    #[test]
    fn test_serialization_failure_json() {
        let body = error_json(&LayoutError::Serialization("boom".to_string()));
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"]["kind"], "serialization");

        let fallback: Value = serde_json::from_str(FALLBACK_ERROR).unwrap();
        assert_eq!(fallback["error"]["kind"], "serialization");
    }

    #[test]
    fn test_default_config_round_trips() {
        let cfg: LayoutConfig = serde_json::from_str(&default_config()).unwrap();
        assert_eq!(cfg, LayoutConfig::default());
    }
}
