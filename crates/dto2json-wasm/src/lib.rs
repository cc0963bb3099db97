//! WASM bindings for dto2json-core.
//!
//! Exposes `parse`, `supports` and `detect` as `#[wasm_bindgen]` functions that can
//! be called from JavaScript/TypeScript. Built with `wasm-bindgen-cli`:
//!
//! ```sh
//! cargo build -p dto2json-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/dto2json_wasm.wasm
//! ```
//!
//! Failures are thrown as JS errors whose message is the JSON error body
//! (`{"kind": ..., "message": ...}`), so callers can `JSON.parse(e.message)`.

use dto2json_core::{DispatchError, ErrorBody, Language};
use wasm_bindgen::prelude::*;

/// Parse `input` as `language` (`JAVA`, `KOTLIN` or `CSHARP`) and return compact JSON.
#[wasm_bindgen]
pub fn parse(language: &str, input: &str) -> Result<String, JsValue> {
    parse_json(language, input).map_err(|body| JsValue::from_str(&body))
}

/// Whether the `language` parser would accept the shape of `input`.
///
/// Throws for an unknown language tag.
#[wasm_bindgen]
pub fn supports(language: &str, input: &str) -> Result<bool, JsValue> {
    supports_tag(language, input).map_err(|body| JsValue::from_str(&body))
}

/// JSON array of the language tags whose parser accepts `input`.
#[wasm_bindgen]
pub fn detect(input: &str) -> String {
    detect_json(input)
}

fn parse_json(language: &str, input: &str) -> Result<String, String> {
    let value = dto2json_core::dispatch(language, input).map_err(error_json)?;
    Ok(value.to_json().to_string())
}

fn supports_tag(language: &str, input: &str) -> Result<bool, String> {
    let language = language.parse::<Language>().map_err(error_json)?;
    Ok(dto2json_core::detect(input).contains(&language))
}

fn detect_json(input: &str) -> String {
    let tags: Vec<&str> = dto2json_core::detect(input)
        .into_iter()
        .map(Language::tag)
        .collect();
    serde_json::Value::from(tags).to_string()
}

fn error_json(err: DispatchError) -> String {
    let body = ErrorBody::from(err);
    serde_json::to_string(&body).unwrap_or(body.message)
}
