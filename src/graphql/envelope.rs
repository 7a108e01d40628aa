//! GraphQL request and response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Named query variables.
pub type Variables = Map<String, Value>;

/// Outer JSON object of a GraphQL request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Variables>,
}

impl GraphQlRequest {
    pub fn new(query: impl Into<String>, variables: Option<Variables>) -> Self {
        Self {
            query: query.into(),
            variables,
        }
    }
}

/// Outer JSON object of a GraphQL response.
///
/// `data` is kept as an untyped map; the typed shape is decoded in a second pass.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlError>>,
}

/// A single entry of the response `errors` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub path: Option<Vec<Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_round_trip() {
        let mut variables = Variables::new();
        variables.insert("userId".into(), json!("alice"));
        variables.insert("limit".into(), json!(10));
        let request = GraphQlRequest::new("query($userId: String!) { user(userId: $userId) { id } }", Some(variables));

        let encoded = serde_json::to_string(&request).unwrap();
        let decoded: GraphQlRequest = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded, request);
    }

    #[test]
    fn test_request_omits_absent_variables() {
        let request = GraphQlRequest::new("{ users { id } }", None);
        let encoded = serde_json::to_value(&request).unwrap();

        assert_eq!(encoded, json!({ "query": "{ users { id } }" }));
    }

    #[test]
    fn test_response_with_errors_and_path() {
        let response: GraphQlResponse = serde_json::from_value(json!({
            "data": null,
            "errors": [
                { "message": "boom", "path": ["users", 0, "email"] },
                { "message": "second" }
            ]
        }))
        .unwrap();

        assert!(response.data.is_none());
        let errors = response.errors.unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "boom");
        assert_eq!(
            errors[0].path,
            Some(vec![json!("users"), json!(0), json!("email")])
        );
        assert_eq!(errors[1].path, None);
    }

    #[test]
    fn test_response_empty_object() {
        let response: GraphQlResponse = serde_json::from_str("{}").unwrap();
        assert!(response.data.is_none());
        assert!(response.errors.is_none());
    }
}
