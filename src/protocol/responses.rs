//! Hook responses
//!
//! Every command is answered with one JSON line shaped
//! `{"status": "success" | "error", "data": {...}}`.

use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

#[derive(Debug, Serialize)]
pub struct HookResponse {
    pub status: ResponseStatus,
    pub data: Value,
}

impl HookResponse {
    pub fn success(data: Value) -> Self {
        Self {
            status: ResponseStatus::Success,
            data,
        }
    }

    /// Error carrying a human-readable message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            data: json!({ "message": message.into() }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    /// Serialized line, newline-terminated
    pub fn to_line(&self) -> String {
        let mut line = serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"status":"error","data":{"message":"internal error"}}"#.into());
        line.push('\n');
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_line_shape() {
        let line = HookResponse::error("Kota servisi yanıt vermiyor.").to_line();
        let parsed: Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed["status"], "error");
        assert_eq!(parsed["data"]["message"], "Kota servisi yanıt vermiyor.");
        assert!(line.ends_with('\n'));
    }
}
