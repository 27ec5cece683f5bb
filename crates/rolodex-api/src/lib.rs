//! JSON REST API for the rolodex address book.
//!
//! Exposes an axum [`Router`] backed by any
//! [`rolodex_core::store::AddressBookStore`]. The identity provider, TLS,
//! and transport concerns are the caller's responsibility; handlers only
//! require the opaque user id asserted in the `x-user-id` header.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", rolodex_api::api_router(store.clone()))
//! ```

pub mod caller;
pub mod categories;
pub mod contacts;
pub mod error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use rolodex_core::store::AddressBookStore;
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: AddressBookStore + 'static,
{
  Router::new()
    // Contacts
    .route(
      "/contacts",
      get(contacts::list::<S>).post(contacts::create::<S>),
    )
    .route(
      "/contacts/{id}",
      get(contacts::get_one::<S>)
        .put(contacts::update::<S>)
        .delete(contacts::delete::<S>),
    )
    .route(
      "/contacts/{id}/categories",
      post(contacts::add_categories::<S>)
        .put(contacts::replace_categories::<S>)
        .delete(contacts::clear_categories::<S>),
    )
    // Categories
    .route(
      "/categories",
      get(categories::list::<S>).post(categories::create::<S>),
    )
    .route(
      "/categories/{id}",
      get(categories::get_one::<S>)
        .put(categories::update::<S>)
        .delete(categories::delete::<S>),
    )
    .route("/categories/{id}/roster", get(categories::roster::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use rolodex_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn make_store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open_in_memory().await.unwrap())
  }

  async fn send(
    store: Arc<SqliteStore>,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
      builder = builder.header(crate::caller::CALLER_HEADER, user);
    }
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&v).unwrap()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    api_router(store).oneshot(req).await.unwrap()
  }

  async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn contact_body(first: &str, last: &str, email: &str) -> Value {
    json!({ "first_name": first, "last_name": last, "email": email })
  }

  #[tokio::test]
  async fn missing_caller_header_is_unauthorized() {
    let store = make_store().await;
    let resp = send(store, "GET", "/contacts", None, None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn create_list_and_roster_flow() {
    let store = make_store().await;

    let resp = send(
      store.clone(),
      "POST",
      "/categories",
      Some("u1"),
      Some(json!({ "name": "Friends" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let friends = body_json(resp).await;
    let friends_id = friends["id"].as_i64().unwrap();

    let resp = send(
      store.clone(),
      "POST",
      "/contacts",
      Some("u1"),
      Some(json!({
        "first_name": "Alice",
        "last_name": "Smith",
        "email": "alice@x.com",
        "category_ids": [friends_id],
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let alice = body_json(resp).await;
    assert_eq!(alice["categories"][0]["name"], "Friends");

    let resp = send(store.clone(), "GET", "/contacts", Some("u1"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let listing = body_json(resp).await;
    assert_eq!(listing["contacts"].as_array().unwrap().len(), 1);
    assert_eq!(listing["categories"].as_array().unwrap().len(), 1);

    let resp = send(
      store,
      "GET",
      &format!("/categories/{friends_id}/roster"),
      Some("u1"),
      None,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let roster = body_json(resp).await;
    assert_eq!(roster["group_name"], "Friends");
    assert_eq!(roster["email_addresses"], "alice@x.com");
  }

  #[tokio::test]
  async fn contacts_are_invisible_across_tenants() {
    let store = make_store().await;

    let resp = send(
      store.clone(),
      "POST",
      "/contacts",
      Some("u1"),
      Some(contact_body("Alice", "Smith", "alice@x.com")),
    )
    .await;
    let alice = body_json(resp).await;
    let id = alice["id"].as_i64().unwrap();

    let resp =
      send(store.clone(), "GET", &format!("/contacts/{id}"), Some("u2"), None)
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(store, "GET", "/contacts", Some("u2"), None).await;
    let listing = body_json(resp).await;
    assert!(listing["contacts"].as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn invalid_draft_is_unprocessable() {
    let store = make_store().await;
    let resp = send(
      store,
      "POST",
      "/contacts",
      Some("u1"),
      Some(contact_body("A", "Smith", "not-an-email")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(resp).await;
    assert!(body["violations"].as_array().is_some());
  }

  #[tokio::test]
  async fn stale_version_is_a_conflict() {
    let store = make_store().await;

    let resp = send(
      store.clone(),
      "POST",
      "/contacts",
      Some("u1"),
      Some(contact_body("Alice", "Smith", "alice@x.com")),
    )
    .await;
    let alice = body_json(resp).await;
    let id = alice["id"].as_i64().unwrap();

    let edit = json!({
      "version": 1,
      "first_name": "Alice",
      "last_name": "Jones",
      "email": "alice@x.com",
    });
    let resp = send(
      store.clone(),
      "PUT",
      &format!("/contacts/{id}"),
      Some("u1"),
      Some(edit.clone()),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Replay with the version the first writer already consumed.
    let resp =
      send(store, "PUT", &format!("/contacts/{id}"), Some("u1"), Some(edit))
        .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
  }
}
