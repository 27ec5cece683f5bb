//! Handlers for `/categories` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/categories` | The caller's categories, by name |
//! | `POST`   | `/categories` | Body: `{"name":"Friends"}` |
//! | `GET`    | `/categories/:id` | 404 if not found |
//! | `PUT`    | `/categories/:id` | Body carries `version` |
//! | `DELETE` | `/categories/:id` | 204; member contacts survive |
//! | `GET`    | `/categories/:id/roster` | Bulk-email recipient view |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use rolodex_core::{
  category::{Category, CategoryDraft, CategoryId},
  roster::Roster,
  store::AddressBookStore,
};
use serde::Deserialize;

use crate::{caller::CallerId, error::ApiError};

/// `GET /categories`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  caller: CallerId,
) -> Result<Json<Vec<Category>>, ApiError>
where
  S: AddressBookStore + 'static,
{
  let categories = store.list_categories(&caller.0).await?;
  Ok(Json(categories))
}

/// `POST /categories`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  caller: CallerId,
  Json(draft): Json<CategoryDraft>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AddressBookStore + 'static,
{
  let category = store.create_category(&caller.0, draft).await?;
  Ok((StatusCode::CREATED, Json(category)))
}

/// `GET /categories/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  caller: CallerId,
  Path(id): Path<CategoryId>,
) -> Result<Json<Category>, ApiError>
where
  S: AddressBookStore + 'static,
{
  let category = store
    .get_category(&caller.0, id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("category {id} not found")))?;
  Ok(Json(category))
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryBody {
  /// The version the caller read; a stale value yields 409.
  pub version: i64,
  #[serde(flatten)]
  pub draft:   CategoryDraft,
}

/// `PUT /categories/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  caller: CallerId,
  Path(id): Path<CategoryId>,
  Json(body): Json<UpdateCategoryBody>,
) -> Result<Json<Category>, ApiError>
where
  S: AddressBookStore + 'static,
{
  let category = store
    .update_category(&caller.0, id, body.version, body.draft)
    .await?;
  Ok(Json(category))
}

/// `DELETE /categories/:id`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  caller: CallerId,
  Path(id): Path<CategoryId>,
) -> Result<StatusCode, ApiError>
where
  S: AddressBookStore + 'static,
{
  store.delete_category(&caller.0, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /categories/:id/roster`
///
/// The recipient view the bulk-email compose form is populated from. The
/// email transport itself lives outside this service.
pub async fn roster<S>(
  State(store): State<Arc<S>>,
  caller: CallerId,
  Path(id): Path<CategoryId>,
) -> Result<Json<Roster>, ApiError>
where
  S: AddressBookStore + 'static,
{
  let roster = store.category_roster(&caller.0, id).await?;
  Ok(Json(roster))
}
