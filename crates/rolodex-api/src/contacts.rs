//! Handlers for `/contacts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/contacts` | Optional `?category=ID` or `?search=TEXT` |
//! | `POST`   | `/contacts` | Draft body; image bytes as base64 |
//! | `GET`    | `/contacts/:id` | 404 if not found |
//! | `PUT`    | `/contacts/:id` | Full-field edit; body carries `version` |
//! | `DELETE` | `/contacts/:id` | 204 |
//! | `POST`   | `/contacts/:id/categories` | Add to the association set |
//! | `PUT`    | `/contacts/:id/categories` | Replace the association set |
//! | `DELETE` | `/contacts/:id/categories` | Clear the association set |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use rolodex_core::{
  category::CategoryId,
  contact::{Contact, ContactDraft, ContactId},
  store::AddressBookStore,
  view::ContactListing,
};
use serde::Deserialize;

use crate::{caller::CallerId, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
  /// Filter to one category's members (association order).
  pub category: Option<CategoryId>,
  /// Free-text name search. Ignored when `category` is present.
  pub search:   Option<String>,
}

/// `GET /contacts[?category=ID|search=TEXT]`
///
/// Whatever the filter, the response also carries the caller's full
/// category set so the UI can draw its filter controls.
pub async fn list<S>(
  State(store): State<Arc<S>>,
  caller: CallerId,
  Query(params): Query<ListParams>,
) -> Result<Json<ContactListing>, ApiError>
where
  S: AddressBookStore + 'static,
{
  let contacts = match (params.category, params.search.as_deref()) {
    (Some(id), _) => store.contacts_in_category(&caller.0, id).await?,
    (None, Some(text)) => store.search_contacts(&caller.0, text).await?,
    (None, None) => store.list_contacts(&caller.0).await?,
  };
  let categories = store.list_categories(&caller.0).await?;
  Ok(Json(ContactListing { contacts, categories }))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateContactBody {
  #[serde(flatten)]
  pub draft:        ContactDraft,
  /// Categories to attach on creation; unknown ids are silently skipped.
  #[serde(default)]
  pub category_ids: Vec<CategoryId>,
}

/// `POST /contacts`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  caller: CallerId,
  Json(body): Json<CreateContactBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AddressBookStore + 'static,
{
  let contact = store.create_contact(&caller.0, body.draft).await?;
  if !body.category_ids.is_empty() {
    store
      .add_categories(&caller.0, contact.id, body.category_ids)
      .await?;
  }
  let contact = rehydrate(&store, &caller, contact.id).await?;
  Ok((StatusCode::CREATED, Json(contact)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /contacts/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  caller: CallerId,
  Path(id): Path<ContactId>,
) -> Result<Json<Contact>, ApiError>
where
  S: AddressBookStore + 'static,
{
  let contact = rehydrate(&store, &caller, id).await?;
  Ok(Json(contact))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateContactBody {
  /// The version the caller read; a stale value yields 409.
  pub version:      i64,
  #[serde(flatten)]
  pub draft:        ContactDraft,
  /// When present, the association set is replaced with exactly these ids.
  pub category_ids: Option<Vec<CategoryId>>,
}

/// `PUT /contacts/:id`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  caller: CallerId,
  Path(id): Path<ContactId>,
  Json(body): Json<UpdateContactBody>,
) -> Result<Json<Contact>, ApiError>
where
  S: AddressBookStore + 'static,
{
  store
    .update_contact(&caller.0, id, body.version, body.draft)
    .await?;
  if let Some(ids) = body.category_ids {
    store.replace_categories(&caller.0, id, ids).await?;
  }
  let contact = rehydrate(&store, &caller, id).await?;
  Ok(Json(contact))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /contacts/:id`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  caller: CallerId,
  Path(id): Path<ContactId>,
) -> Result<StatusCode, ApiError>
where
  S: AddressBookStore + 'static,
{
  store.delete_contact(&caller.0, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Association set ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CategoryIdsBody {
  pub category_ids: Vec<CategoryId>,
}

/// `POST /contacts/:id/categories`
pub async fn add_categories<S>(
  State(store): State<Arc<S>>,
  caller: CallerId,
  Path(id): Path<ContactId>,
  Json(body): Json<CategoryIdsBody>,
) -> Result<StatusCode, ApiError>
where
  S: AddressBookStore + 'static,
{
  store
    .add_categories(&caller.0, id, body.category_ids)
    .await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `PUT /contacts/:id/categories`
pub async fn replace_categories<S>(
  State(store): State<Arc<S>>,
  caller: CallerId,
  Path(id): Path<ContactId>,
  Json(body): Json<CategoryIdsBody>,
) -> Result<StatusCode, ApiError>
where
  S: AddressBookStore + 'static,
{
  store
    .replace_categories(&caller.0, id, body.category_ids)
    .await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /contacts/:id/categories`
pub async fn clear_categories<S>(
  State(store): State<Arc<S>>,
  caller: CallerId,
  Path(id): Path<ContactId>,
) -> Result<StatusCode, ApiError>
where
  S: AddressBookStore + 'static,
{
  store.clear_categories(&caller.0, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Shared ───────────────────────────────────────────────────────────────────

/// Read a contact back with its current category set, or 404.
async fn rehydrate<S>(
  store: &Arc<S>,
  caller: &CallerId,
  id: ContactId,
) -> Result<Contact, ApiError>
where
  S: AddressBookStore + 'static,
{
  store
    .get_contact(&caller.0, id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("contact {id} not found")))
}
