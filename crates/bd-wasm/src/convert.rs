//! Conversions between JS values and the core's JSON and settings types.

use bd_core::Settings;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Convert a JS value to JSON. Values `JSON.stringify` rejects read as `null`.
pub fn to_json(value: &JsValue) -> Value {
    if value.is_undefined() || value.is_null() {
        return Value::Null;
    }
    js_sys::JSON::stringify(value)
        .ok()
        .and_then(|s| s.as_string())
        .and_then(|s| serde_json::from_str(&s).ok())
        .unwrap_or(Value::Null)
}

/// Convert JSON to a JS value.
pub fn from_json(value: &Value) -> Result<JsValue, JsValue> {
    let text = serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&text)
}

/// Settings as a storage record object.
pub fn settings_to_js(settings: &Settings) -> Result<JsValue, JsValue> {
    from_json(&settings.to_json())
}

/// Human-readable text for a rejected promise or thrown value.
pub fn describe(error: &JsValue) -> String {
    if let Some(text) = error.as_string() {
        return text;
    }
    if let Some(err) = error.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{:?}", error)
}

/// Read a string property.
pub fn get_string(target: &JsValue, key: &str) -> Option<String> {
    js_sys::Reflect::get(target, &key.into())
        .ok()
        .and_then(|value| value.as_string())
}

/// Read an integer property.
pub fn get_i32(target: &JsValue, key: &str) -> Option<i32> {
    js_sys::Reflect::get(target, &key.into())
        .ok()
        .and_then(|value| value.as_f64())
        .map(|value| value as i32)
}
