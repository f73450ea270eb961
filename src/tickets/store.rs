use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{NewTicket, Ticket, TicketError, TicketFilter, TicketResult, TicketStats, TicketUpdate};

/// Storage backend for tickets
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Validate and persist a new ticket, assigning its id and creation time
    async fn create(&self, ticket: NewTicket) -> TicketResult<Ticket>;

    async fn get(&self, id: u64) -> TicketResult<Ticket>;

    /// List tickets matching the filter, newest first
    async fn list(&self, filter: &TicketFilter) -> TicketResult<Vec<Ticket>>;

    /// Apply a partial update to an existing ticket
    async fn update(&self, id: u64, update: TicketUpdate) -> TicketResult<Ticket>;

    async fn stats(&self) -> TicketResult<TicketStats>;

    /// Get store name
    fn name(&self) -> &'static str;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    tickets: Vec<Ticket>,
}

/// In-memory ticket store, optionally snapshotted to a JSON file after every write
pub struct MemoryStore {
    state: RwLock<StoreState>,
    snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
    /// Create an empty, purely in-memory store
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            snapshot_path: None,
        }
    }

    /// Open a store backed by a JSON snapshot file, loading it if it exists
    pub async fn open(path: impl Into<PathBuf>) -> TicketResult<Self> {
        let path = path.into();

        let mut state = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str::<StoreState>(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No ticket snapshot at {}, starting empty", path.display());
                StoreState::default()
            }
            Err(e) => return Err(e.into()),
        };

        let max_id = state.tickets.iter().map(|t| t.id).max().unwrap_or(0);
        state.next_id = state.next_id.max(max_id);

        info!("Loaded {} tickets from {}", state.tickets.len(), path.display());

        Ok(Self {
            state: RwLock::new(state),
            snapshot_path: Some(path),
        })
    }

    async fn persist(&self, state: &StoreState) -> TicketResult<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Snapshot goes to a sibling tmp file, then replaces the old one
        let json = serde_json::to_vec_pretty(state)?;
        let tmp_path = path.with_extension("tmp");
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, path).await?;

        debug!("Persisted {} tickets to {}", state.tickets.len(), path.display());
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TicketStore for MemoryStore {
    async fn create(&self, ticket: NewTicket) -> TicketResult<Ticket> {
        ticket.validate()?;

        let mut state = self.state.write().await;
        let id = state.next_id + 1;
        let ticket = ticket.into_ticket(id, Utc::now());

        state.next_id = id;
        state.tickets.push(ticket.clone());

        if let Err(e) = self.persist(&state).await {
            state.tickets.pop();
            state.next_id = id - 1;
            return Err(e);
        }

        debug!("Created ticket {} ({}/{})", ticket.id, ticket.category, ticket.priority);
        Ok(ticket)
    }

    async fn get(&self, id: u64) -> TicketResult<Ticket> {
        let state = self.state.read().await;
        state
            .tickets
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(TicketError::NotFound(id))
    }

    async fn list(&self, filter: &TicketFilter) -> TicketResult<Vec<Ticket>> {
        let state = self.state.read().await;
        let mut tickets: Vec<Ticket> = state
            .tickets
            .iter()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();

        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tickets)
    }

    async fn update(&self, id: u64, update: TicketUpdate) -> TicketResult<Ticket> {
        update.validate()?;

        let mut state = self.state.write().await;
        let index = state
            .tickets
            .iter()
            .position(|t| t.id == id)
            .ok_or(TicketError::NotFound(id))?;

        let previous = state.tickets[index].clone();
        update.apply_to(&mut state.tickets[index]);
        let updated = state.tickets[index].clone();

        if let Err(e) = self.persist(&state).await {
            state.tickets[index] = previous;
            return Err(e);
        }

        debug!("Updated ticket {}", id);
        Ok(updated)
    }

    async fn stats(&self) -> TicketResult<TicketStats> {
        let state = self.state.read().await;
        Ok(TicketStats::compute(&state.tickets, Utc::now()))
    }

    fn name(&self) -> &'static str {
        if self.snapshot_path.is_some() {
            "memory+json"
        } else {
            "memory"
        }
    }
}
