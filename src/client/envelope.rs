//! Response envelopes of the brokerage REST API

use serde::{Deserialize, Serialize};

/// Body of a list response
///
/// The API answers either `{ "data": [...] }` or `{ "results": [...] }`;
/// `data` wins when both are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<T>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<T>>,
}

impl<T> ListEnvelope<T> {
    pub fn data(items: Vec<T>) -> Self {
        Self {
            data: Some(items),
            results: None,
        }
    }

    /// The listed items, `None` when neither key was present
    pub fn into_items(self) -> Option<Vec<T>> {
        self.data.or(self.results)
    }
}

/// Body of a get or mutation response: `{ success, data, message? }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutateEnvelope<T> {
    pub success: bool,

    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> MutateEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }

    /// Unwrap the payload, turning `success: false` into the API message
    pub fn into_result(self) -> Result<Option<T>, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self
                .message
                .unwrap_or_else(|| "request was not successful".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_accepts_both_keys() {
        let data: ListEnvelope<i64> = serde_json::from_value(json!({ "data": [1, 2] })).unwrap();
        let results: ListEnvelope<i64> =
            serde_json::from_value(json!({ "results": [3] })).unwrap();
        let both: ListEnvelope<i64> =
            serde_json::from_value(json!({ "data": [1], "results": [9] })).unwrap();
        let neither: ListEnvelope<i64> = serde_json::from_value(json!({})).unwrap();

        assert_eq!(data.into_items(), Some(vec![1, 2]));
        assert_eq!(results.into_items(), Some(vec![3]));
        assert_eq!(both.into_items(), Some(vec![1]));
        assert_eq!(neither.into_items(), None);
    }

    #[test]
    fn test_failed_mutation_carries_message() {
        let envelope: MutateEnvelope<serde_json::Value> = serde_json::from_value(
            json!({ "success": false, "message": "CRECI já cadastrado" }),
        )
        .unwrap();

        assert_eq!(envelope.into_result().unwrap_err(), "CRECI já cadastrado");
    }

    #[test]
    fn test_serialized_envelope_shape() {
        let value = serde_json::to_value(MutateEnvelope::ok(7)).unwrap();
        assert_eq!(value, json!({ "success": true, "data": 7 }));
    }
}
