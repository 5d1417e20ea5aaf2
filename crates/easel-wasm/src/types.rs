//! Conversions between JavaScript values and core types.
//!
//! The string parsers return `Option` so they can be tested natively; the
//! bindings turn `None` into a `JsValue` error.

use easel_core::{ExportFormat, FlipAxis, ShapeKind, Tool};
use wasm_bindgen::prelude::*;

/// Map any displayable error to a JavaScript string error.
pub(crate) fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Parse `"horizontal"`/`"vertical"` (also `"h"`/`"v"`).
pub(crate) fn parse_axis(name: &str) -> Option<FlipAxis> {
    match name.trim().to_ascii_lowercase().as_str() {
        "horizontal" | "h" | "x" => Some(FlipAxis::Horizontal),
        "vertical" | "v" | "y" => Some(FlipAxis::Vertical),
        _ => None,
    }
}

pub(crate) fn parse_tool(name: &str) -> Result<Tool, JsValue> {
    Tool::parse(name).ok_or_else(|| js_error(format!("Unknown tool: {}", name)))
}

pub(crate) fn parse_format(name: &str) -> Result<ExportFormat, JsValue> {
    ExportFormat::parse(name).ok_or_else(|| js_error(format!("Unsupported export format: {}", name)))
}

pub(crate) fn parse_shape(name: &str) -> Result<ShapeKind, JsValue> {
    ShapeKind::parse(name).ok_or_else(|| js_error(format!("Unknown shape: {}", name)))
}

pub(crate) fn parse_flip(name: &str) -> Result<FlipAxis, JsValue> {
    parse_axis(name).ok_or_else(|| js_error(format!("Unknown flip axis: {}", name)))
}

/// Treat empty strings from the host as absent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
