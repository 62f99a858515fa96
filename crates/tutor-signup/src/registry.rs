//! Registry clients: the HTTP row store and an in-memory stand-in.
//!
//! The store is a generic row API with no query language and no
//! transactions: read everything, insert one row, delete by key. Each call
//! fully succeeds or fails; nothing here provides atomicity across calls.

use std::sync::Mutex;

use reqwest::Url;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::RegistryError;
use crate::record::{RawRow, RegistryRecord, SessionKind, Weekday};

/// Client contract against the external row store.
///
/// The engine is generic over this, so tests run against [`MemoryRegistry`]
/// and production against [`HttpRegistry`] with identical semantics.
#[allow(async_fn_in_trait)]
pub trait Registry {
    /// Read the full record set. Rows that fail to decode are skipped.
    async fn fetch_all(&self) -> Result<Vec<RegistryRecord>, RegistryError>;

    /// Insert one record.
    async fn insert(&self, record: &RegistryRecord) -> Result<(), RegistryError>;

    /// Delete every signup row matching the `(name, day, session)` triple.
    async fn delete(
        &self,
        name: &str,
        day: Weekday,
        session: SessionKind,
    ) -> Result<(), RegistryError>;
}

/// POST body wrapper expected by the row store.
#[derive(Serialize)]
struct InsertBody<'a> {
    data: &'a RawRow,
}

/// HTTP client for the row store.
///
/// Wire contract:
/// - `GET <base>` returns a JSON array of `{name, day, session}` rows
/// - `POST <base>` with `{"data": {name, day, session}}` inserts one row
/// - `DELETE <base>/name/<name>/day/<day>/session/<session>` deletes by key
#[derive(Debug, Clone)]
pub struct HttpRegistry {
    client: reqwest::Client,
    base: Url,
}

impl HttpRegistry {
    /// Create a client for the given base URL (trailing slash tolerated).
    pub fn new(base_url: &str) -> Result<Self, RegistryError> {
        let trimmed = base_url.trim_end_matches('/');
        let base = Url::parse(trimmed).map_err(|e| RegistryError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(RegistryError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot serve as a base".to_string(),
            });
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    /// Build the keyed DELETE URL. Path segments are percent-encoded, so
    /// names with spaces or slashes stay intact on the wire.
    fn delete_url(&self, name: &str, day: Weekday, session: SessionKind) -> Url {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .expect("base URL validated at construction")
            .extend(["name", name, "day", day.as_str(), "session", session.as_str()]);
        url
    }

    fn check_status(
        operation: &'static str,
        response: &reqwest::Response,
    ) -> Result<(), RegistryError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(RegistryError::UnexpectedStatus { operation, status })
        }
    }
}

impl Registry for HttpRegistry {
    async fn fetch_all(&self) -> Result<Vec<RegistryRecord>, RegistryError> {
        let response = self.client.get(self.base.clone()).send().await?;
        Self::check_status("fetch_all", &response)?;
        let rows: Vec<RawRow> = response.json().await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            match row.decode() {
                Ok(record) => records.push(record),
                Err(e) => warn!(name = %row.name, day = %row.day, session = %row.session,
                    error = %e, "skipping undecodable registry row"),
            }
        }
        debug!(rows = rows.len(), records = records.len(), "fetched registry");
        Ok(records)
    }

    async fn insert(&self, record: &RegistryRecord) -> Result<(), RegistryError> {
        let row = RawRow::encode(record);
        let response = self
            .client
            .post(self.base.clone())
            .json(&InsertBody { data: &row })
            .send()
            .await?;
        Self::check_status("insert", &response)?;
        debug!(name = %row.name, day = %row.day, session = %row.session, "inserted row");
        Ok(())
    }

    async fn delete(
        &self,
        name: &str,
        day: Weekday,
        session: SessionKind,
    ) -> Result<(), RegistryError> {
        let url = self.delete_url(name, day, session);
        let response = self.client.delete(url).send().await?;
        Self::check_status("delete", &response)?;
        debug!(%name, %day, %session, "deleted row");
        Ok(())
    }
}

/// In-process registry with the same semantics as the HTTP store.
///
/// Rows keep insertion order, and like the real store nothing enforces
/// uniqueness. Used by the test suite and usable as an offline backend.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    rows: Mutex<Vec<RegistryRecord>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the registry with an initial record set.
    pub fn with_records(records: impl IntoIterator<Item = RegistryRecord>) -> Self {
        Self {
            rows: Mutex::new(records.into_iter().collect()),
        }
    }

    /// Snapshot of the current rows, in insertion order.
    pub fn records(&self) -> Vec<RegistryRecord> {
        self.rows.lock().expect("registry mutex poisoned").clone()
    }
}

impl Registry for MemoryRegistry {
    async fn fetch_all(&self) -> Result<Vec<RegistryRecord>, RegistryError> {
        Ok(self.records())
    }

    async fn insert(&self, record: &RegistryRecord) -> Result<(), RegistryError> {
        self.rows
            .lock()
            .expect("registry mutex poisoned")
            .push(record.clone());
        Ok(())
    }

    async fn delete(
        &self,
        name: &str,
        day: Weekday,
        session: SessionKind,
    ) -> Result<(), RegistryError> {
        self.rows
            .lock()
            .expect("registry mutex poisoned")
            .retain(|record| match record {
                RegistryRecord::Signup(signup) => {
                    !(signup.name == name && signup.day == day && signup.session == session)
                }
                RegistryRecord::AfterSchoolFlag(_) => true,
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SignupRecord;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let registry = HttpRegistry::new("http://localhost:8080/rows/").unwrap();
        assert_eq!(registry.base.as_str(), "http://localhost:8080/rows");
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(matches!(
            HttpRegistry::new("not a url"),
            Err(RegistryError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_delete_url_percent_encodes_name() {
        let registry = HttpRegistry::new("http://localhost:8080/rows").unwrap();
        let url = registry.delete_url("Mary Jane/Watson", Weekday::Monday, SessionKind::Ep1);
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/rows/name/Mary%20Jane%2FWatson/day/Monday/session/EP1"
        );
    }

    #[tokio::test]
    async fn test_memory_registry_round_trip() {
        let registry = MemoryRegistry::new();
        let alice =
            RegistryRecord::Signup(SignupRecord::new("Alice", Weekday::Monday, SessionKind::Ep1));
        let flag = RegistryRecord::AfterSchoolFlag(Weekday::Friday);

        registry.insert(&alice).await.unwrap();
        registry.insert(&flag).await.unwrap();
        assert_eq!(registry.fetch_all().await.unwrap(), vec![alice.clone(), flag.clone()]);

        registry
            .delete("Alice", Weekday::Monday, SessionKind::Ep1)
            .await
            .unwrap();
        // Flag rows are untouched by keyed signup deletion.
        assert_eq!(registry.fetch_all().await.unwrap(), vec![flag]);
    }

    #[tokio::test]
    async fn test_memory_registry_delete_targets_exact_triple() {
        let registry = MemoryRegistry::with_records([
            RegistryRecord::Signup(SignupRecord::new("Alice", Weekday::Monday, SessionKind::Ep1)),
            RegistryRecord::Signup(SignupRecord::new("Alice", Weekday::Monday, SessionKind::Ep2)),
            RegistryRecord::Signup(SignupRecord::new("Alice", Weekday::Tuesday, SessionKind::Ep1)),
            RegistryRecord::Signup(SignupRecord::new("Bob", Weekday::Monday, SessionKind::Ep1)),
        ]);

        registry
            .delete("Alice", Weekday::Monday, SessionKind::Ep1)
            .await
            .unwrap();

        let remaining = registry.records();
        assert_eq!(remaining.len(), 3);
        assert!(!remaining.contains(&RegistryRecord::Signup(SignupRecord::new(
            "Alice",
            Weekday::Monday,
            SessionKind::Ep1
        ))));
    }
}
