//! Lenient webhook body reading
//!
//! Callers send loosely typed JSON: numbers arrive as strings, ids as numbers,
//! and totals under either `totalAmount` or `newTotalAmount`. Everything is
//! normalised here before a typed record is built.

use serde_json::{Map, Value};
use shared::error::{AppError, AppResult};

pub struct Body(Map<String, Value>);

impl Body {
    pub fn parse(bytes: &[u8]) -> AppResult<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(AppError::invalid_request("Request body is empty"));
        }
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => Ok(Body(map)),
            Ok(_) => Err(AppError::invalid_request("Request body must be a JSON object")),
            Err(e) => Err(AppError::invalid_request(format!("Invalid JSON body: {e}"))),
        }
    }

    /// First non-null value under any of `keys`
    fn get(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|k| self.0.get(*k))
            .find(|v| !v.is_null())
    }

    /// Non-empty identifier; numeric ids are accepted
    pub fn required_id(&self, key: &str) -> AppResult<String> {
        self.optional_id(key)?.ok_or_else(|| AppError::required(key))
    }

    pub fn optional_id(&self, key: &str) -> AppResult<Option<String>> {
        match self.get(&[key]) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.trim().to_string()).filter(|s| !s.is_empty())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(type_error(key, "a string")),
        }
    }

    pub fn optional_text(&self, key: &str) -> AppResult<Option<String>> {
        match self.get(&[key]) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(type_error(key, "a string")),
        }
    }

    pub fn optional_u32(&self, keys: &[&str]) -> AppResult<Option<u32>> {
        let Some(value) = self.get(keys) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) if s.trim().is_empty() => return Ok(None),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        parsed
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| type_error(keys[0], "a non-negative integer"))
    }

    pub fn optional_amount(&self, keys: &[&str]) -> AppResult<Option<f64>> {
        let Some(value) = self.get(keys) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) if s.trim().is_empty() => return Ok(None),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed
            .filter(|n| n.is_finite() && *n >= 0.0)
            .map(Some)
            .ok_or_else(|| type_error(keys[0], "a non-negative number"))
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

fn type_error(field: &str, expected: &str) -> AppError {
    AppError::validation(format!("{field} must be {expected}")).with_detail("field", field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn rejects_non_objects() {
        for raw in ["", "  ", "[1]", "\"x\"", "{oops"] {
            let err = Body::parse(raw.as_bytes()).err().unwrap();
            assert_eq!(err.code, ErrorCode::InvalidRequest, "{raw}");
        }
    }

    #[test]
    fn ids_accept_numbers_and_reject_blanks() {
        let body = Body::parse(br#"{"orderId": 42, "tenantId": "  ", "tableId": true}"#).unwrap();
        assert_eq!(body.required_id("orderId").unwrap(), "42");
        assert_eq!(
            body.required_id("tenantId").unwrap_err().code,
            ErrorCode::RequiredField
        );
        assert_eq!(
            body.optional_id("tableId").unwrap_err().code,
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn numbers_accept_strings_and_aliases() {
        let body = Body::parse(
            br#"{"tableNumber": "5", "newTotalAmount": 100000, "itemCount": null, "newItemCount": 2}"#,
        )
        .unwrap();
        assert_eq!(body.optional_u32(&["tableNumber"]).unwrap(), Some(5));
        assert_eq!(
            body.optional_amount(&["totalAmount", "newTotalAmount"]).unwrap(),
            Some(100000.0)
        );
        assert_eq!(body.optional_u32(&["itemCount", "newItemCount"]).unwrap(), Some(2));
        assert_eq!(body.optional_u32(&["displayOrder"]).unwrap(), None);
    }

    #[test]
    fn numbers_reject_garbage() {
        let body = Body::parse(br#"{"tableNumber": "five", "totalAmount": -1, "itemCount": 1.5}"#).unwrap();
        assert!(body.optional_u32(&["tableNumber"]).is_err());
        assert!(body.optional_amount(&["totalAmount"]).is_err());
        assert!(body.optional_u32(&["itemCount"]).is_err());
    }
}
