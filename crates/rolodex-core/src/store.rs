//! The `AddressBookStore` trait.
//!
//! Implemented by storage backends (e.g. `rolodex-store-sqlite`). Higher
//! layers (`rolodex-api`) depend on this abstraction, not on any concrete
//! backend.
//!
//! Every method is parameterised by the caller's opaque owner id, and
//! implementations must fold that id into the same lookup that matches the
//! row id — never fetch-then-check. A row owned by someone else behaves
//! exactly like a row that does not exist. An empty owner id is not an
//! error; it simply owns nothing.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use crate::{
  category::{Category, CategoryDraft, CategoryId},
  contact::{Contact, ContactDraft, ContactId},
  roster::Roster,
};

/// Abstraction over an address-book storage backend.
///
/// Errors use the [`crate::Error`] taxonomy directly so callers can map
/// variants (not-found, validation, conflict, storage) without knowing the
/// backend.
pub trait AddressBookStore: Send + Sync {
  // ── Contacts ──────────────────────────────────────────────────────────

  /// Validate `draft`, stamp the creation timestamp, and persist a new
  /// contact owned by `owner`.
  fn create_contact<'a>(
    &'a self,
    owner: &'a str,
    draft: ContactDraft,
  ) -> impl Future<Output = crate::Result<Contact>> + Send + 'a;

  /// Retrieve a contact by id, hydrated with its category set in
  /// association order. Returns `None` if absent or foreign-owned.
  fn get_contact<'a>(
    &'a self,
    owner: &'a str,
    id: ContactId,
  ) -> impl Future<Output = crate::Result<Option<Contact>>> + Send + 'a;

  /// Full-field edit. `expected_version` is the version the caller read;
  /// a moved version yields [`crate::Error::EditConflict`], a vanished row
  /// yields [`crate::Error::ContactNotFound`].
  fn update_contact<'a>(
    &'a self,
    owner: &'a str,
    id: ContactId,
    expected_version: i64,
    draft: ContactDraft,
  ) -> impl Future<Output = crate::Result<Contact>> + Send + 'a;

  /// Delete a contact. Association rows cascade; category rows are
  /// untouched. Deleting an absent contact is a no-op.
  fn delete_contact<'a>(
    &'a self,
    owner: &'a str,
    id: ContactId,
  ) -> impl Future<Output = crate::Result<()>> + Send + 'a;

  /// All of `owner`'s contacts, ordered by last name then first name
  /// (binary comparison — a stable total order).
  fn list_contacts<'a>(
    &'a self,
    owner: &'a str,
  ) -> impl Future<Output = crate::Result<Vec<Contact>>> + Send + 'a;

  /// The members of one category, in association order — deliberately not
  /// re-sorted by name. Empty when the category is absent or foreign.
  fn contacts_in_category<'a>(
    &'a self,
    owner: &'a str,
    category: CategoryId,
  ) -> impl Future<Output = crate::Result<Vec<Contact>>> + Send + 'a;

  /// Case-insensitive substring match over the full name, ordered by last
  /// name then first name. Blank `text` returns the unfiltered
  /// [`list_contacts`](Self::list_contacts) contents and order.
  fn search_contacts<'a>(
    &'a self,
    owner: &'a str,
    text: &'a str,
  ) -> impl Future<Output = crate::Result<Vec<Contact>>> + Send + 'a;

  // ── Categories ────────────────────────────────────────────────────────

  fn create_category<'a>(
    &'a self,
    owner: &'a str,
    draft: CategoryDraft,
  ) -> impl Future<Output = crate::Result<Category>> + Send + 'a;

  /// Returns `None` if absent or foreign-owned.
  fn get_category<'a>(
    &'a self,
    owner: &'a str,
    id: CategoryId,
  ) -> impl Future<Output = crate::Result<Option<Category>>> + Send + 'a;

  /// Edit with the same version-check semantics as
  /// [`update_contact`](Self::update_contact).
  fn update_category<'a>(
    &'a self,
    owner: &'a str,
    id: CategoryId,
    expected_version: i64,
    draft: CategoryDraft,
  ) -> impl Future<Output = crate::Result<Category>> + Send + 'a;

  /// Delete a category. Association rows cascade; member contacts are
  /// untouched. Deleting an absent category is a no-op.
  fn delete_category<'a>(
    &'a self,
    owner: &'a str,
    id: CategoryId,
  ) -> impl Future<Output = crate::Result<()>> + Send + 'a;

  /// All of `owner`'s categories, ordered by name.
  fn list_categories<'a>(
    &'a self,
    owner: &'a str,
  ) -> impl Future<Output = crate::Result<Vec<Category>>> + Send + 'a;

  // ── Associations ──────────────────────────────────────────────────────

  /// Attach categories to a contact, with set semantics: re-adding a pair
  /// is a no-op. Category ids that are absent or foreign-owned are
  /// silently skipped. If the contact is absent the whole call is a no-op.
  /// Runs in a single transaction — either all resolved additions commit
  /// or none do.
  fn add_categories<'a>(
    &'a self,
    owner: &'a str,
    contact: ContactId,
    categories: Vec<CategoryId>,
  ) -> impl Future<Output = crate::Result<()>> + Send + 'a;

  /// Remove every association for the contact, leaving the category rows
  /// themselves untouched. No-op if the contact is absent. Atomic.
  fn clear_categories<'a>(
    &'a self,
    owner: &'a str,
    contact: ContactId,
  ) -> impl Future<Output = crate::Result<()>> + Send + 'a;

  /// The edit flow's replace workflow: clear then add, in one transaction.
  /// A failed replace leaves the previous association set fully intact —
  /// a stronger guarantee than running the two calls back to back.
  fn replace_categories<'a>(
    &'a self,
    owner: &'a str,
    contact: ContactId,
    categories: Vec<CategoryId>,
  ) -> impl Future<Output = crate::Result<()>> + Send + 'a;

  // ── Roster ────────────────────────────────────────────────────────────

  /// Resolve the bulk-email roster for a category: display name, members
  /// in association order, and their "; "-joined email addresses. Fails
  /// with [`crate::Error::CategoryNotFound`] when the category is absent
  /// or foreign-owned.
  fn category_roster<'a>(
    &'a self,
    owner: &'a str,
    category: CategoryId,
  ) -> impl Future<Output = crate::Result<Roster>> + Send + 'a;
}
