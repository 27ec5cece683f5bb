//! [`SqliteStore`] — the SQLite implementation of [`AddressBookStore`].
//!
//! Owner scoping is enforced in SQL: every statement that matches a row id
//! also matches `owner_id` in the same WHERE clause. Association mutations
//! run inside a single transaction per call.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use rolodex_core::{
  Error, Result,
  category::{Category, CategoryDraft, CategoryId},
  contact::{Contact, ContactDraft, ContactId},
  roster::{Roster, join_emails},
  store::AddressBookStore,
};

use crate::{
  encode::{RawContact, encode_dt, encode_state},
  schema::SCHEMA,
};

const CONTACT_COLUMNS: &str = "contact_id, owner_id, first_name, last_name, \
   created_at, date_of_birth, address1, address2, city, state, zip_code, \
   email, phone, image_data, image_type, version";

/// Same column list, qualified for joins against `contacts c`.
const CONTACT_COLUMNS_C: &str = "c.contact_id, c.owner_id, c.first_name, \
   c.last_name, c.created_at, c.date_of_birth, c.address1, c.address2, \
   c.city, c.state, c.zip_code, c.email, c.phone, c.image_data, \
   c.image_type, c.version";

// ─── Store ───────────────────────────────────────────────────────────────────

/// An address-book store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(Error::storage)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(Error::storage)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(Error::storage)
  }
}

// ─── Row helpers (run inside the connection thread) ──────────────────────────

fn contact_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawContact> {
  Ok(RawContact {
    contact_id:    row.get(0)?,
    owner_id:      row.get(1)?,
    first_name:    row.get(2)?,
    last_name:     row.get(3)?,
    created_at:    row.get(4)?,
    date_of_birth: row.get(5)?,
    address1:      row.get(6)?,
    address2:      row.get(7)?,
    city:          row.get(8)?,
    state:         row.get(9)?,
    zip_code:      row.get(10)?,
    email:         row.get(11)?,
    phone:         row.get(12)?,
    image_data:    row.get(13)?,
    image_type:    row.get(14)?,
    version:       row.get(15)?,
  })
}

fn category_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
  Ok(Category {
    id:       row.get(0)?,
    owner_id: row.get(1)?,
    name:     row.get(2)?,
    version:  row.get(3)?,
  })
}

/// A contact's category set, in association order.
fn categories_for(
  conn: &rusqlite::Connection,
  contact: ContactId,
) -> rusqlite::Result<Vec<Category>> {
  let mut stmt = conn.prepare(
    "SELECT g.category_id, g.owner_id, g.name, g.version
     FROM categories g
     JOIN contact_categories cc ON cc.category_id = g.category_id
     WHERE cc.contact_id = ?1
     ORDER BY cc.rowid",
  )?;
  stmt
    .query_map(rusqlite::params![contact], category_from_row)?
    .collect()
}

fn hydrate(
  conn: &rusqlite::Connection,
  raws: Vec<RawContact>,
) -> rusqlite::Result<Vec<(RawContact, Vec<Category>)>> {
  let mut out = Vec::with_capacity(raws.len());
  for raw in raws {
    let categories = categories_for(conn, raw.contact_id)?;
    out.push((raw, categories));
  }
  Ok(out)
}

fn decode_all(rows: Vec<(RawContact, Vec<Category>)>) -> Result<Vec<Contact>> {
  rows
    .into_iter()
    .map(|(raw, categories)| raw.into_contact(categories))
    .collect()
}

/// `true` iff the contact exists and belongs to `owner` — one atomic filter.
fn contact_owned(
  conn: &rusqlite::Connection,
  owner: &str,
  id: ContactId,
) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM contacts WHERE contact_id = ?1 AND owner_id = ?2",
        rusqlite::params![id, owner],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

fn category_owned(
  conn: &rusqlite::Connection,
  owner: &str,
  id: CategoryId,
) -> rusqlite::Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM categories WHERE category_id = ?1 AND owner_id = ?2",
        rusqlite::params![id, owner],
        |_| Ok(true),
      )
      .optional()?
      .unwrap_or(false),
  )
}

/// Attach `ids` to a contact with set semantics. Each category id is looked
/// up scoped to `owner`; ids that are absent or foreign-owned are skipped,
/// which is what keeps cross-owner injection out of the association table.
fn attach_categories(
  conn: &rusqlite::Connection,
  owner: &str,
  contact: ContactId,
  ids: &[CategoryId],
) -> rusqlite::Result<()> {
  for &category in ids {
    if category_owned(conn, owner, category)? {
      conn.execute(
        "INSERT OR IGNORE INTO contact_categories (contact_id, category_id)
         VALUES (?1, ?2)",
        rusqlite::params![contact, category],
      )?;
    }
  }
  Ok(())
}

/// Outcome of a versioned UPDATE, resolved inside the transaction.
enum WriteOutcome<T> {
  Applied(T),
  Missing,
  Changed,
}

// ─── AddressBookStore impl ───────────────────────────────────────────────────

impl AddressBookStore for SqliteStore {
  // ── Contacts ──────────────────────────────────────────────────────────────

  async fn create_contact(
    &self,
    owner: &str,
    draft: ContactDraft,
  ) -> Result<Contact> {
    draft.validate()?;

    let created_at = Utc::now();

    let owner_s       = owner.to_owned();
    let first_name    = draft.first_name.clone();
    let last_name     = draft.last_name.clone();
    let created_at_s  = encode_dt(created_at);
    let dob_s         = draft.date_of_birth.map(encode_dt);
    let address1      = draft.address1.clone();
    let address2      = draft.address2.clone();
    let city          = draft.city.clone();
    let state_s       = draft.state.map(encode_state);
    let zip_code      = draft.zip_code;
    let email         = draft.email.clone();
    let phone         = draft.phone.clone();
    let (image_data, image_type) = match draft.image.clone() {
      Some(image) => (Some(image.data), Some(image.content_type)),
      None        => (None, None),
    };

    let id: ContactId = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO contacts (
             owner_id, first_name, last_name, created_at, date_of_birth,
             address1, address2, city, state, zip_code, email, phone,
             image_data, image_type
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
          rusqlite::params![
            owner_s,
            first_name,
            last_name,
            created_at_s,
            dob_s,
            address1,
            address2,
            city,
            state_s,
            zip_code,
            email,
            phone,
            image_data,
            image_type,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(Error::storage)?;

    Ok(Contact {
      id,
      owner_id: owner.to_owned(),
      first_name: draft.first_name,
      last_name: draft.last_name,
      created_at,
      date_of_birth: draft.date_of_birth,
      address1: draft.address1,
      address2: draft.address2,
      city: draft.city,
      state: draft.state,
      zip_code: draft.zip_code,
      email: draft.email,
      phone: draft.phone,
      image: draft.image,
      version: 1,
      categories: Vec::new(),
    })
  }

  async fn get_contact(
    &self,
    owner: &str,
    id: ContactId,
  ) -> Result<Option<Contact>> {
    let owner_s = owner.to_owned();

    let row: Option<(RawContact, Vec<Category>)> = self
      .conn
      .call(move |conn| {
        let raw = conn
          .query_row(
            &format!(
              "SELECT {CONTACT_COLUMNS} FROM contacts
               WHERE contact_id = ?1 AND owner_id = ?2"
            ),
            rusqlite::params![id, owner_s],
            contact_from_row,
          )
          .optional()?;

        match raw {
          Some(raw) => {
            let categories = categories_for(conn, raw.contact_id)?;
            Ok(Some((raw, categories)))
          }
          None => Ok(None),
        }
      })
      .await
      .map_err(Error::storage)?;

    row
      .map(|(raw, categories)| raw.into_contact(categories))
      .transpose()
  }

  async fn update_contact(
    &self,
    owner: &str,
    id: ContactId,
    expected_version: i64,
    draft: ContactDraft,
  ) -> Result<Contact> {
    draft.validate()?;

    let owner_s    = owner.to_owned();
    let first_name = draft.first_name;
    let last_name  = draft.last_name;
    let dob_s      = draft.date_of_birth.map(encode_dt);
    let address1   = draft.address1;
    let address2   = draft.address2;
    let city       = draft.city;
    let state_s    = draft.state.map(encode_state);
    let zip_code   = draft.zip_code;
    let email      = draft.email;
    let phone      = draft.phone;
    let (image_data, image_type) = match draft.image {
      Some(image) => (Some(image.data), Some(image.content_type)),
      None        => (None, None),
    };

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let affected = tx.execute(
          "UPDATE contacts SET
             first_name = ?1, last_name = ?2, date_of_birth = ?3,
             address1 = ?4, address2 = ?5, city = ?6, state = ?7,
             zip_code = ?8, email = ?9, phone = ?10,
             image_data = ?11, image_type = ?12,
             version = version + 1
           WHERE contact_id = ?13 AND owner_id = ?14 AND version = ?15",
          rusqlite::params![
            first_name,
            last_name,
            dob_s,
            address1,
            address2,
            city,
            state_s,
            zip_code,
            email,
            phone,
            image_data,
            image_type,
            id,
            owner_s,
            expected_version,
          ],
        )?;

        if affected == 0 {
          // Vanished row vs. moved version — probe scoped, then bail.
          let exists = contact_owned(&tx, &owner_s, id)?;
          tx.commit()?;
          return Ok(if exists {
            WriteOutcome::Changed
          } else {
            WriteOutcome::Missing
          });
        }

        let raw = tx.query_row(
          &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE contact_id = ?1"),
          rusqlite::params![id],
          contact_from_row,
        )?;
        let categories = categories_for(&tx, id)?;
        tx.commit()?;
        Ok(WriteOutcome::Applied((raw, categories)))
      })
      .await
      .map_err(Error::storage)?;

    match outcome {
      WriteOutcome::Applied((raw, categories)) => raw.into_contact(categories),
      WriteOutcome::Missing => Err(Error::ContactNotFound(id)),
      WriteOutcome::Changed => {
        Err(Error::EditConflict { entity: "contact", id })
      }
    }
  }

  async fn delete_contact(&self, owner: &str, id: ContactId) -> Result<()> {
    let owner_s = owner.to_owned();
    self
      .conn
      .call(move |conn| {
        // Association rows cascade; deleting a missing row is a no-op.
        conn.execute(
          "DELETE FROM contacts WHERE contact_id = ?1 AND owner_id = ?2",
          rusqlite::params![id, owner_s],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::storage)
  }

  async fn list_contacts(&self, owner: &str) -> Result<Vec<Contact>> {
    let owner_s = owner.to_owned();

    let rows = self
      .conn
      .call(move |conn| {
        let raws = {
          let mut stmt = conn.prepare(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts
             WHERE owner_id = ?1
             ORDER BY last_name, first_name"
          ))?;
          stmt
            .query_map(rusqlite::params![owner_s], contact_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(hydrate(conn, raws)?)
      })
      .await
      .map_err(Error::storage)?;

    decode_all(rows)
  }

  async fn contacts_in_category(
    &self,
    owner: &str,
    category: CategoryId,
  ) -> Result<Vec<Contact>> {
    let owner_s = owner.to_owned();

    let rows = self
      .conn
      .call(move |conn| {
        // A foreign or missing category yields an empty list, never another
        // user's contacts.
        if !category_owned(conn, &owner_s, category)? {
          return Ok(Vec::new());
        }

        let raws = {
          let mut stmt = conn.prepare(&format!(
            "SELECT {CONTACT_COLUMNS_C} FROM contacts c
             JOIN contact_categories cc ON cc.contact_id = c.contact_id
             WHERE cc.category_id = ?1 AND c.owner_id = ?2
             ORDER BY cc.rowid"
          ))?;
          stmt
            .query_map(rusqlite::params![category, owner_s], contact_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(hydrate(conn, raws)?)
      })
      .await
      .map_err(Error::storage)?;

    decode_all(rows)
  }

  async fn search_contacts(
    &self,
    owner: &str,
    text: &str,
  ) -> Result<Vec<Contact>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
      // Blank search degrades to the unfiltered listing.
      return self.list_contacts(owner).await;
    }

    let owner_s = owner.to_owned();
    let pattern = format!("%{trimmed}%");

    let rows = self
      .conn
      .call(move |conn| {
        let raws = {
          let mut stmt = conn.prepare(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts
             WHERE owner_id = ?1
               AND (first_name || ' ' || last_name) LIKE ?2
             ORDER BY last_name, first_name"
          ))?;
          stmt
            .query_map(rusqlite::params![owner_s, pattern], contact_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(hydrate(conn, raws)?)
      })
      .await
      .map_err(Error::storage)?;

    decode_all(rows)
  }

  // ── Categories ────────────────────────────────────────────────────────────

  async fn create_category(
    &self,
    owner: &str,
    draft: CategoryDraft,
  ) -> Result<Category> {
    draft.validate()?;

    let owner_s = owner.to_owned();
    let name    = draft.name.clone();

    let id: CategoryId = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO categories (owner_id, name) VALUES (?1, ?2)",
          rusqlite::params![owner_s, name],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(Error::storage)?;

    Ok(Category {
      id,
      owner_id: owner.to_owned(),
      name: draft.name,
      version: 1,
    })
  }

  async fn get_category(
    &self,
    owner: &str,
    id: CategoryId,
  ) -> Result<Option<Category>> {
    let owner_s = owner.to_owned();
    self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT category_id, owner_id, name, version FROM categories
               WHERE category_id = ?1 AND owner_id = ?2",
              rusqlite::params![id, owner_s],
              category_from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::storage)
  }

  async fn update_category(
    &self,
    owner: &str,
    id: CategoryId,
    expected_version: i64,
    draft: CategoryDraft,
  ) -> Result<Category> {
    draft.validate()?;

    let owner_s = owner.to_owned();
    let name    = draft.name;

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let affected = tx.execute(
          "UPDATE categories SET name = ?1, version = version + 1
           WHERE category_id = ?2 AND owner_id = ?3 AND version = ?4",
          rusqlite::params![name, id, owner_s, expected_version],
        )?;

        if affected == 0 {
          let exists = category_owned(&tx, &owner_s, id)?;
          tx.commit()?;
          return Ok(if exists {
            WriteOutcome::Changed
          } else {
            WriteOutcome::Missing
          });
        }

        let category = tx.query_row(
          "SELECT category_id, owner_id, name, version FROM categories
           WHERE category_id = ?1",
          rusqlite::params![id],
          category_from_row,
        )?;
        tx.commit()?;
        Ok(WriteOutcome::Applied(category))
      })
      .await
      .map_err(Error::storage)?;

    match outcome {
      WriteOutcome::Applied(category) => Ok(category),
      WriteOutcome::Missing => Err(Error::CategoryNotFound(id)),
      WriteOutcome::Changed => {
        Err(Error::EditConflict { entity: "category", id })
      }
    }
  }

  async fn delete_category(&self, owner: &str, id: CategoryId) -> Result<()> {
    let owner_s = owner.to_owned();
    self
      .conn
      .call(move |conn| {
        // Cascades association rows only; member contacts are untouched.
        conn.execute(
          "DELETE FROM categories WHERE category_id = ?1 AND owner_id = ?2",
          rusqlite::params![id, owner_s],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::storage)
  }

  async fn list_categories(&self, owner: &str) -> Result<Vec<Category>> {
    let owner_s = owner.to_owned();
    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT category_id, owner_id, name, version FROM categories
           WHERE owner_id = ?1
           ORDER BY name, category_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![owner_s], category_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::storage)
  }

  // ── Associations ──────────────────────────────────────────────────────────

  async fn add_categories(
    &self,
    owner: &str,
    contact: ContactId,
    categories: Vec<CategoryId>,
  ) -> Result<()> {
    let owner_s = owner.to_owned();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        // Nothing to attach to — the whole call is a no-op, not an error.
        if contact_owned(&tx, &owner_s, contact)? {
          attach_categories(&tx, &owner_s, contact, &categories)?;
        }
        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(Error::storage)
  }

  async fn clear_categories(
    &self,
    owner: &str,
    contact: ContactId,
  ) -> Result<()> {
    let owner_s = owner.to_owned();
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if contact_owned(&tx, &owner_s, contact)? {
          tx.execute(
            "DELETE FROM contact_categories WHERE contact_id = ?1",
            rusqlite::params![contact],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(Error::storage)
  }

  async fn replace_categories(
    &self,
    owner: &str,
    contact: ContactId,
    categories: Vec<CategoryId>,
  ) -> Result<()> {
    let owner_s = owner.to_owned();
    self
      .conn
      .call(move |conn| {
        // Clear-then-add in one transaction: a failed replace leaves the
        // previous association set intact.
        let tx = conn.transaction()?;
        if contact_owned(&tx, &owner_s, contact)? {
          tx.execute(
            "DELETE FROM contact_categories WHERE contact_id = ?1",
            rusqlite::params![contact],
          )?;
          attach_categories(&tx, &owner_s, contact, &categories)?;
        }
        tx.commit()?;
        Ok(())
      })
      .await
      .map_err(Error::storage)
  }

  // ── Roster ────────────────────────────────────────────────────────────────

  async fn category_roster(
    &self,
    owner: &str,
    category: CategoryId,
  ) -> Result<Roster> {
    let owner_s = owner.to_owned();

    let found: Option<(String, Vec<(RawContact, Vec<Category>)>)> = self
      .conn
      .call(move |conn| {
        let name: Option<String> = conn
          .query_row(
            "SELECT name FROM categories
             WHERE category_id = ?1 AND owner_id = ?2",
            rusqlite::params![category, owner_s],
            |row| row.get(0),
          )
          .optional()?;

        let Some(name) = name else {
          return Ok(None);
        };

        let raws = {
          let mut stmt = conn.prepare(&format!(
            "SELECT {CONTACT_COLUMNS_C} FROM contacts c
             JOIN contact_categories cc ON cc.contact_id = c.contact_id
             WHERE cc.category_id = ?1 AND c.owner_id = ?2
             ORDER BY cc.rowid"
          ))?;
          stmt
            .query_map(rusqlite::params![category, owner_s], contact_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(Some((name, hydrate(conn, raws)?)))
      })
      .await
      .map_err(Error::storage)?;

    let Some((group_name, rows)) = found else {
      return Err(Error::CategoryNotFound(category));
    };

    let members = decode_all(rows)?;
    let email_addresses = join_emails(members.iter().map(|c| c.email.as_str()));

    Ok(Roster { group_name, members, email_addresses })
  }
}
