use serde::Serialize;
use serde_json::Value;

/// A GraphQL request body: `{"query": "...", "variables": null}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQlRequest {
    pub query: String,
    pub variables: Option<Value>,
}

impl GraphQlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
        }
    }

    /// The JSON body sent to the service.
    pub fn to_body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_has_query_and_null_variables() {
        let body = GraphQlRequest::new("{ a(b: \"c\") }").to_body().unwrap();
        assert_eq!(body, r#"{"query":"{ a(b: \"c\") }","variables":null}"#);
    }
}
