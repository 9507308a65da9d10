//! The client record store.
//!
//! All state lives in two keys of a [`KeyValueStore`]: `clients` holds the
//! whole collection as a JSON array and `selectedClient` holds the record
//! handed from the list screen to the edit screen. Every mutation reads the
//! entire collection, changes it in memory and writes it back whole.

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::db::{KeyValueStore, StorageError};
use crate::models::{ClientFields, ClientRecord};

pub const CLIENTS_KEY: &str = "clients";
pub const SELECTED_CLIENT_KEY: &str = "selectedClient";

/// One or more required fields were blank at save time
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Preencha todos os campos. Faltando: {}", .missing.join(", "))]
pub struct ValidationError {
    pub missing: Vec<&'static str>,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Não foi possível acessar os dados dos clientes ({0})")]
    Storage(#[from] StorageError),

    #[error("Não foi possível codificar os dados dos clientes ({0})")]
    Encode(#[from] serde_json::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

fn validate(fields: &ClientFields) -> Result<(), ValidationError> {
    let missing = fields.missing_fields();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { missing })
    }
}

/// Absent collections and text that is not JSON read as empty. Records
/// missing a key keep their other fields (see `ClientRecord`).
fn decode_collection(raw: Option<String>) -> Vec<ClientRecord> {
    let Some(text) = raw else {
        return Vec::new();
    };

    serde_json::from_str(&text).unwrap_or_else(|err| {
        warn!(%err, "stored client collection could not be decoded, treating it as empty");
        Vec::new()
    })
}

pub struct ClientStore<S> {
    storage: S,
}

impl<S: KeyValueStore> ClientStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    async fn load_clients(&self) -> StoreResult<Vec<ClientRecord>> {
        let raw = self.storage.get_item(CLIENTS_KEY).await?;
        Ok(decode_collection(raw))
    }

    async fn save_clients(&self, clients: &[ClientRecord]) -> StoreResult<()> {
        let encoded = serde_json::to_string(clients)?;
        self.storage.set_item(CLIENTS_KEY, &encoded).await?;
        Ok(())
    }

    /// Every stored client, in insertion order. Never fails: unreadable
    /// storage is logged and reported as an empty list.
    pub async fn list_all(&self) -> Vec<ClientRecord> {
        match self.load_clients().await {
            Ok(clients) => clients,
            Err(err) => {
                warn!(%err, "failed to load clients");
                Vec::new()
            }
        }
    }

    /// Append a new client with a freshly generated id.
    pub async fn create(&self, fields: ClientFields) -> StoreResult<ClientRecord> {
        validate(&fields)?;

        let mut clients = self.load_clients().await?;

        let mut id = Uuid::new_v4().to_string();
        while clients.iter().any(|client| client.id == id) {
            id = Uuid::new_v4().to_string();
        }

        let record = ClientRecord::from_fields(id, fields);
        clients.push(record.clone());
        self.save_clients(&clients).await?;

        info!(id = %record.id, total = clients.len(), "client created");
        Ok(record)
    }

    /// Replace the stored client that has `record.id`.
    ///
    /// An unknown id is not an error: the collection is written back as it
    /// was and the record is still returned.
    pub async fn update(&self, record: ClientRecord) -> StoreResult<ClientRecord> {
        validate(&record.fields())?;

        let mut clients = self.load_clients().await?;

        match clients.iter_mut().find(|client| client.id == record.id) {
            Some(slot) => {
                *slot = record.clone();
                info!(id = %record.id, "client updated");
            }
            None => warn!(id = %record.id, "no client with this id, nothing updated"),
        }

        self.save_clients(&clients).await?;
        Ok(record)
    }

    /// Drop every client with `id`. Removing an unknown id is a no-op.
    pub async fn remove(&self, id: &str) -> StoreResult<()> {
        let mut clients = self.load_clients().await?;

        let before = clients.len();
        clients.retain(|client| client.id != id);
        self.save_clients(&clients).await?;

        info!(id, removed = before - clients.len(), "client removed");
        Ok(())
    }

    /// Put `record` in the hand-off slot read by the edit screen.
    pub async fn select(&self, record: &ClientRecord) -> StoreResult<()> {
        let encoded = serde_json::to_string(record)?;
        self.storage.set_item(SELECTED_CLIENT_KEY, &encoded).await?;

        debug!(id = %record.id, "client selected");
        Ok(())
    }

    pub async fn get_selected(&self) -> Option<ClientRecord> {
        let raw = match self.storage.get_item(SELECTED_CLIENT_KEY).await {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(%err, "failed to load selected client");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(%err, "selected client is not valid JSON");
                None
            }
        }
    }
}
