//! Typed view of the service's `{success, data, message}` response envelope.
//!
//! Every field is read on its own: a field of the wrong type is dropped
//! without affecting its siblings, and a body that is not an object yields an
//! empty envelope.

use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiEnvelope {
    pub success: Option<bool>,
    pub data: Option<Value>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl ApiEnvelope {
    /// Interpret a decoded body as an envelope
    pub fn from_body(body: Option<&Value>) -> Self {
        let Some(fields) = body.and_then(Value::as_object) else {
            return Self::default();
        };
        let text = |key: &str| fields.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            success: fields.get("success").and_then(Value::as_bool),
            data: fields.get("data").filter(|v| !v.is_null()).cloned(),
            message: text("message"),
            error: text("error"),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success.unwrap_or(false)
    }

    /// `data.id` for single-entity responses
    pub fn data_id(&self) -> Option<i64> {
        self.data.as_ref()?.get("id")?.as_i64()
    }

    pub fn data_str(&self, field: &str) -> Option<&str> {
        self.data.as_ref()?.get(field)?.as_str().filter(|s| !s.is_empty())
    }

    /// Items of a paginated list (`data.content`)
    pub fn page_items(&self) -> &[Value] {
        self.data
            .as_ref()
            .and_then(|d| d.get("content"))
            .and_then(|c| c.as_array())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Items of a flat list (`data` is the array)
    pub fn list_items(&self) -> &[Value] {
        self.data
            .as_ref()
            .and_then(|d| d.as_array())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `id` of the first item in a paginated list
    pub fn first_page_id(&self) -> Option<i64> {
        self.page_items().first()?.get("id")?.as_i64()
    }

    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message.as_deref().unwrap_or(fallback)
    }
}
