//! Query DTOs
//!
//! Filter bodies for the `*/query` endpoints and the records they return.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of a `POST .../query` request
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest {
    #[serde(rename = "QueryFilter")]
    pub query_filter: QueryFilter,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryFilter {
    pub expression: Expression,
}

/// Filter expression
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Expression {
    /// `property <operator> argument`
    Simple {
        argument: Vec<Value>,
        operator: &'static str,
        property: &'static str,
    },
    /// Conjunction of nested expressions
    Grouping {
        operator: &'static str,
        #[serde(rename = "nestedExpression")]
        nested_expression: Vec<Expression>,
    },
}

impl Expression {
    /// `property EQUALS value`
    pub fn equals(property: &'static str, value: impl Into<Value>) -> Self {
        Expression::Simple {
            argument: vec![value.into()],
            operator: "EQUALS",
            property,
        }
    }

    /// All nested expressions must match
    pub fn and(expressions: Vec<Expression>) -> Self {
        Expression::Grouping {
            operator: "and",
            nested_expression: expressions,
        }
    }
}

impl QueryRequest {
    pub fn new(expression: Expression) -> Self {
        Self {
            query_filter: QueryFilter { expression },
        }
    }
}

/// Envelope returned by every query endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult<T> {
    /// Match count reported by the server
    pub number_of_results: Option<u64>,
    #[serde(default = "Vec::new")]
    pub result: Vec<T>,
}

impl<T> QueryResult<T> {
    /// Reported match count, treating a missing count as zero
    pub fn count(&self) -> u64 {
        self.number_of_results.unwrap_or(0)
    }
}

/// Atom record, as returned by `Atom/query`
#[derive(Debug, Clone, Deserialize)]
pub struct AtomRecord {
    pub id: String,
}

/// Environment attachment, as returned by `EnvironmentAtomAttachment/query`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentAttachment {
    pub environment_id: String,
}

/// Deployed package, as returned by `DeployedPackage/query`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedPackage {
    pub deployment_id: String,
    pub component_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simple_filter_body() {
        let body = serde_json::to_value(QueryRequest::new(Expression::equals("name", "myatom")))
            .unwrap();
        assert_eq!(
            body,
            json!({"QueryFilter": {"expression": {
                "argument": ["myatom"], "operator": "EQUALS", "property": "name"
            }}})
        );
    }

    #[test]
    fn test_grouping_filter_body() {
        let request = QueryRequest::new(Expression::and(vec![
            Expression::equals("environmentId", "env-1"),
            Expression::equals("active", true),
        ]));
        let body = serde_json::to_value(request).unwrap();
        assert_eq!(
            body,
            json!({"QueryFilter": {"expression": {
                "operator": "and",
                "nestedExpression": [
                    {"argument": ["env-1"], "operator": "EQUALS", "property": "environmentId"},
                    {"argument": [true], "operator": "EQUALS", "property": "active"}
                ]
            }}})
        );
    }

    #[test]
    fn test_query_result_defaults() {
        let result: QueryResult<AtomRecord> =
            serde_json::from_value(json!({"@type": "QueryResult"})).unwrap();
        assert_eq!(result.count(), 0);
        assert!(result.result.is_empty());
    }

    #[test]
    fn test_deployed_package_fields() {
        let result: QueryResult<DeployedPackage> = serde_json::from_value(json!({
            "@type": "QueryResult",
            "result": [{"@type": "DeployedPackage", "deploymentId": "45678", "componentId": "67890"}],
            "numberOfResults": 1
        }))
        .unwrap();
        assert_eq!(result.count(), 1);
        assert_eq!(result.result[0].deployment_id, "45678");
        assert_eq!(result.result[0].component_id, "67890");
    }
}
