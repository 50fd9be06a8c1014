//! Backend response envelope.
//!
//! Every admin endpoint answers with `{success, message, data}`.
//! `success: false` is a normal, non-exceptional failure path; transport
//! errors are a separate taxonomy handled by the API client.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,

    #[serde(default)]
    pub message: String,

    pub data: Option<T>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_success_envelope() {
        let env: ApiEnvelope<Vec<i64>> =
            serde_json::from_value(json!({"success": true, "message": "ok", "data": [1, 2]}))
                .unwrap();
        assert!(env.success);
        assert_eq!(env.data, Some(vec![1, 2]));
    }

    #[test]
    fn test_decodes_failure_envelope_without_data() {
        let env: ApiEnvelope<Vec<i64>> =
            serde_json::from_value(json!({"success": false, "message": "nope"})).unwrap();
        assert!(!env.success);
        assert_eq!(env.message, "nope");
        assert!(env.data.is_none());
    }
}
