//! Persistence backends for accounts and events
//!
//! Only the in-memory backend ships; the traits are the seam for anything
//! durable.

use crate::accounts::{Account, NewAccount};
use crate::events::{Event, NewEvent};
use async_trait::async_trait;
use chrono::Utc;
use eventhub_core::{AccountId, EventId};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

/// Store errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Email already registered: {email}")]
    DuplicateEmail { email: String },

    #[error("Event title already in use: {title}")]
    DuplicateTitle { title: String },

    #[error("Record not found: {resource}")]
    NotFound { resource: String },

    #[error("Storage backend failure: {message}")]
    Backend { message: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Account persistence
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account, refusing a duplicate email (case-insensitive)
    async fn insert_account(&self, account: NewAccount) -> StoreResult<Account>;

    async fn get_account(&self, id: AccountId) -> StoreResult<Option<Account>>;

    /// Case-insensitive email lookup
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>>;

    async fn list_accounts(&self) -> StoreResult<Vec<Account>>;

    /// Replace an existing account, refusing an email held by another account
    async fn update_account(&self, account: &Account) -> StoreResult<()>;

    async fn delete_account(&self, id: AccountId) -> StoreResult<()>;
}

/// Event persistence
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insert a new event, refusing a duplicate title
    async fn insert_event(&self, event: NewEvent) -> StoreResult<Event>;

    async fn get_event(&self, id: EventId) -> StoreResult<Option<Event>>;

    async fn list_events(&self) -> StoreResult<Vec<Event>>;

    /// Whether another event (other than `except`) already uses `title`
    async fn title_taken(&self, title: &str, except: Option<EventId>) -> StoreResult<bool>;

    /// Replace an existing event, refusing a title held by another event
    async fn update_event(&self, event: &Event) -> StoreResult<()>;

    async fn delete_event(&self, id: EventId) -> StoreResult<()>;

    /// Remove every event owned by `owner`, returning how many went
    async fn delete_events_by_owner(&self, owner: AccountId) -> StoreResult<usize>;
}

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<AccountId, Account>,
    events: BTreeMap<EventId, Event>,
    next_account_id: i64,
    next_event_id: i64,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<AccountId>) -> bool {
        self.accounts
            .values()
            .any(|account| Some(account.id) != except && account.has_email(email))
    }

    fn title_taken(&self, title: &str, except: Option<EventId>) -> bool {
        self.events
            .values()
            .any(|event| Some(event.id) != except && event.title == title)
    }
}

/// In-memory store backing both traits; ids start at 1 and are never reused
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn insert_account(&self, account: NewAccount) -> StoreResult<Account> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&account.email, None) {
            return Err(StoreError::DuplicateEmail {
                email: account.email,
            });
        }

        tables.next_account_id += 1;
        let record = Account {
            id: AccountId(tables.next_account_id),
            email: account.email,
            stored_secret: account.stored_secret,
            name_surname: account.name_surname,
            birth_date: account.birth_date,
            created_at: Utc::now(),
        };
        tables.accounts.insert(record.id, record.clone());
        debug!("Stored account {}", record.id);
        Ok(record)
    }

    async fn get_account(&self, id: AccountId) -> StoreResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .find(|account| account.has_email(email))
            .cloned())
    }

    async fn list_accounts(&self) -> StoreResult<Vec<Account>> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().cloned().collect())
    }

    async fn update_account(&self, account: &Account) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.accounts.contains_key(&account.id) {
            return Err(StoreError::NotFound {
                resource: format!("account {}", account.id),
            });
        }
        if tables.email_taken(&account.email, Some(account.id)) {
            return Err(StoreError::DuplicateEmail {
                email: account.email.clone(),
            });
        }

        tables.accounts.insert(account.id, account.clone());
        debug!("Updated account {}", account.id);
        Ok(())
    }

    async fn delete_account(&self, id: AccountId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        match tables.accounts.remove(&id) {
            Some(_) => {
                debug!("Deleted account {}", id);
                Ok(())
            }
            None => Err(StoreError::NotFound {
                resource: format!("account {}", id),
            }),
        }
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn insert_event(&self, event: NewEvent) -> StoreResult<Event> {
        let mut tables = self.tables.write().await;
        if tables.title_taken(&event.title, None) {
            return Err(StoreError::DuplicateTitle { title: event.title });
        }

        tables.next_event_id += 1;
        let record = Event {
            id: EventId(tables.next_event_id),
            owner_id: event.owner_id,
            title: event.title,
            start_date: event.start_date,
            end_date: event.end_date,
            short_description: event.short_description,
            long_description: event.long_description,
            image_path: event.image_path,
            is_active: event.is_active,
            created_at: Utc::now(),
        };
        tables.events.insert(record.id, record.clone());
        debug!("Stored event {} for owner {}", record.id, record.owner_id);
        Ok(record)
    }

    async fn get_event(&self, id: EventId) -> StoreResult<Option<Event>> {
        let tables = self.tables.read().await;
        Ok(tables.events.get(&id).cloned())
    }

    async fn list_events(&self) -> StoreResult<Vec<Event>> {
        let tables = self.tables.read().await;
        Ok(tables.events.values().cloned().collect())
    }

    async fn title_taken(&self, title: &str, except: Option<EventId>) -> StoreResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.title_taken(title, except))
    }

    async fn update_event(&self, event: &Event) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.events.contains_key(&event.id) {
            return Err(StoreError::NotFound {
                resource: format!("event {}", event.id),
            });
        }
        if tables.title_taken(&event.title, Some(event.id)) {
            return Err(StoreError::DuplicateTitle {
                title: event.title.clone(),
            });
        }

        tables.events.insert(event.id, event.clone());
        debug!("Updated event {}", event.id);
        Ok(())
    }

    async fn delete_event(&self, id: EventId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        match tables.events.remove(&id) {
            Some(_) => {
                debug!("Deleted event {}", id);
                Ok(())
            }
            None => Err(StoreError::NotFound {
                resource: format!("event {}", id),
            }),
        }
    }

    async fn delete_events_by_owner(&self, owner: AccountId) -> StoreResult<usize> {
        let mut tables = self.tables.write().await;
        let before = tables.events.len();
        tables.events.retain(|_, event| event.owner_id != owner);
        let removed = before - tables.events.len();
        debug!("Deleted {} events owned by {}", removed, owner);
        Ok(removed)
    }
}
