use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::str::FromStr;

use super::error::{err, ok};
use crate::calc::CalcError;

/// Handler-local failure that still needs the request id before it becomes
/// a response. Mirrors the wire error envelope.
pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }

    pub fn bad_params(message: impl Into<String>) -> Self {
        HandlerErr {
            code: "bad_params",
            message: message.into(),
            details: None,
        }
    }
}

pub fn calc_err(id: &str, e: CalcError) -> serde_json::Value {
    err(id, &e.code, e.message, e.details)
}

pub fn respond_ok<T: Serialize>(id: &str, result: &T) -> serde_json::Value {
    match serde_json::to_value(result) {
        Ok(v) => ok(id, v),
        Err(e) => err(id, "internal", format!("serialize response: {}", e), None),
    }
}

pub fn str_param<'a>(params: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    params.get(key).and_then(|v| v.as_str())
}

pub fn i64_param(params: &serde_json::Value, key: &str) -> Option<i64> {
    params.get(key).and_then(|v| v.as_i64())
}

pub fn bool_param(params: &serde_json::Value, key: &str) -> Option<bool> {
    params.get(key).and_then(|v| v.as_bool())
}

pub fn i32_param(params: &serde_json::Value, key: &str) -> Result<Option<i32>, HandlerErr> {
    let Some(v) = i64_param(params, key) else {
        return Ok(None);
    };
    i32::try_from(v)
        .map(Some)
        .map_err(|_| HandlerErr::bad_params(format!("params.{} out of range", key)))
}

pub fn u8_param(params: &serde_json::Value, key: &str) -> Result<Option<u8>, HandlerErr> {
    let Some(v) = i64_param(params, key) else {
        return Ok(None);
    };
    u8::try_from(v)
        .map(Some)
        .map_err(|_| HandlerErr::bad_params(format!("params.{} out of range", key)))
}

/// Grade arithmetic inputs travel as JSON numbers or strings ("14.68" keeps
/// decimal digits exact); both are accepted here.
pub fn decimal_param(
    params: &serde_json::Value,
    key: &str,
) -> Result<Option<Decimal>, HandlerErr> {
    let Some(v) = params.get(key) else {
        return Ok(None);
    };
    if v.is_null() {
        return Ok(None);
    }
    let parsed = if let Some(s) = v.as_str() {
        Decimal::from_str(s.trim()).ok()
    } else if let Some(i) = v.as_i64() {
        Some(Decimal::from(i))
    } else {
        v.as_f64().and_then(Decimal::from_f64)
    };
    parsed.map(Some).ok_or_else(|| HandlerErr {
        code: "bad_params",
        message: format!("params.{} must be a number", key),
        details: Some(json!({ "value": v.clone() })),
    })
}

/// Typed extraction of a structured params field.
pub fn typed_param<T: DeserializeOwned>(
    params: &serde_json::Value,
    key: &str,
) -> Result<T, HandlerErr> {
    let Some(v) = params.get(key) else {
        return Err(HandlerErr::bad_params(format!("missing params.{}", key)));
    };
    serde_json::from_value(v.clone()).map_err(|e| HandlerErr {
        code: "bad_params",
        message: format!("params.{}: {}", key, e),
        details: None,
    })
}

pub fn opt_typed_param<T: DeserializeOwned>(
    params: &serde_json::Value,
    key: &str,
) -> Result<Option<T>, HandlerErr> {
    match params.get(key) {
        None => Ok(None),
        Some(v) if v.is_null() => Ok(None),
        Some(_) => typed_param(params, key).map(Some),
    }
}
