//! Product attribute routes.

use axum::Router;
use serde::Deserialize;

use storedash_core::{ActiveStatus, Attribute, AttributeType};

use super::crud::{self, ListFilter, PageParams};
use crate::error::AppError;
use crate::extract::parse_filter;
use crate::state::AppState;

/// `GET /api/attributes` query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct AttributeQuery {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

impl ListFilter<Attribute> for AttributeQuery {
    fn page(&self) -> &PageParams {
        &self.page
    }

    fn apply(&self, records: Vec<Attribute>) -> Result<Vec<Attribute>, AppError> {
        let status = parse_filter::<ActiveStatus>("status", self.status.as_deref())?;
        let kind = parse_filter::<AttributeType>("type", self.kind.as_deref())?;

        let mut attributes: Vec<Attribute> = records
            .into_iter()
            .filter(|a| status.is_none_or(|s| a.status == s))
            .filter(|a| kind.is_none_or(|k| a.kind == k))
            .collect();

        attributes.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(attributes)
    }
}

pub fn router() -> Router<AppState> {
    crud::router::<Attribute, AttributeQuery>()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use storedash_core::{AttributeId, CreateAttributeInput, Entity};

    fn attribute(id: i32, name: &str, kind: AttributeType) -> Attribute {
        let input = CreateAttributeInput {
            name: name.to_string(),
            kind,
            options: "a,b".to_string(),
            ..Default::default()
        };
        Attribute::from_create(AttributeId::new(id), input, Utc::now()).unwrap()
    }

    #[test]
    fn test_type_filter_sorted_by_name() {
        let records = vec![
            attribute(1, "Size", AttributeType::Size),
            attribute(2, "Material", AttributeType::Select),
            attribute(3, "Finish", AttributeType::Select),
        ];
        let query = AttributeQuery {
            kind: Some("select".into()),
            ..Default::default()
        };
        let result = query.apply(records).unwrap();
        let names: Vec<&str> = result.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Finish", "Material"]);
    }
}
