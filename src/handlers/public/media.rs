// Public media reads served straight from the shared store

use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::{Media, UiMedia};
use crate::database::store::{Document, ID_FIELD};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Fields of a UI media slot exposed to the public site
const PUBLIC_FIELDS: [&str; 4] = [ID_FIELD, "title", "url", "thumbnailUrl"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationQuery {
    pub location_id: Option<String>,
    pub index: Option<String>,
}

impl LocationQuery {
    fn filter(&self) -> Result<Document, ApiError> {
        let location = self
            .location_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ApiError::bad_request("locationId is required"))?;

        let index = match self.index.as_deref().map(str::trim) {
            None | Some("") => 0,
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| ApiError::bad_request("index must be an integer"))?,
        };

        let mut filter = Document::new();
        filter.insert("locationIds".to_string(), json!([location]));
        filter.insert("index".to_string(), json!(index));
        filter.insert("isPublic".to_string(), json!(true));
        Ok(filter)
    }
}

/// GET /api/ui-media?locationId=&index=
pub async fn ui_media_by_location(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> ApiResult<Value> {
    let filter = query.filter()?;
    let Some(doc) = state.repo::<UiMedia>().find_one(&filter).await? else {
        return Err(ApiError::not_found("No media for this location"));
    };

    let public: Document = PUBLIC_FIELDS
        .iter()
        .map(|field| (field.to_string(), doc.get(*field).cloned().unwrap_or(Value::Null)))
        .collect();
    Ok(ApiResponse::success(Value::Object(public)))
}

/// GET /api/media - public media only
pub async fn media_list(State(state): State<AppState>) -> ApiResult<Vec<Document>> {
    let mut filter = Document::new();
    filter.insert("isPublic".to_string(), json!(true));

    let media = state.repo::<Media>().list(&filter).await?;
    Ok(ApiResponse::success(media))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(location_id: Option<&str>, index: Option<&str>) -> LocationQuery {
        LocationQuery {
            location_id: location_id.map(str::to_string),
            index: index.map(str::to_string),
        }
    }

    #[test]
    fn index_defaults_to_first_slot() {
        let filter = query(Some("home-hero"), None).filter().unwrap();
        assert_eq!(filter["index"], json!(0));
        assert_eq!(filter["locationIds"], json!(["home-hero"]));
        assert_eq!(filter["isPublic"], json!(true));
    }

    #[test]
    fn location_is_required() {
        assert_eq!(query(None, Some("1")).filter().unwrap_err().status_code(), 400);
        assert_eq!(query(Some("  "), None).filter().unwrap_err().status_code(), 400);
        assert_eq!(query(Some("a"), Some("two")).filter().unwrap_err().status_code(), 400);
    }
}
