use serde::{Deserialize, Serialize};

/// Uniform response wrapper returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_endpoints: Option<Vec<String>>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            available_endpoints: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            message: Some(message.into()),
            available_endpoints: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
            available_endpoints: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failure_omits_data() {
        let envelope = Envelope::<()>::failure("Task not found");
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"success": false, "error": "Task not found"})
        );
    }

    #[derive(Debug, PartialEq, Deserialize)]
    struct Item {
        n: u8,
    }

    #[test]
    fn decodes_payloads_without_default() {
        let ok: Envelope<Vec<Item>> =
            serde_json::from_value(json!({"success": true, "data": [{"n": 1}]})).unwrap();
        assert_eq!(ok.data, Some(vec![Item { n: 1 }]));

        let failed: Envelope<Item> =
            serde_json::from_value(json!({"success": false, "error": "Task not found"})).unwrap();
        assert_eq!(failed.data, None);
        assert_eq!(failed.error.as_deref(), Some("Task not found"));
    }

    #[test]
    fn message_only_success() {
        let envelope = Envelope::<()>::message("Task deleted successfully");
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"success": true, "message": "Task deleted successfully"})
        );
    }
}
