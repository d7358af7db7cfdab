//! In-process client store.
//!
//! # Responsibility
//! - Implement `ClientRepository` without SQLite, evaluating the pure
//!   `ClientFilter::matches` predicates directly.
//! - Let callers mark clients as having dependents to exercise integrity
//!   rejections.
//!
//! # Invariants
//! - Ids are assigned from a monotonic counter and never reused.
//! - Ordering matches the SQLite store: sort key, then `id ASC`.

use crate::model::client::{Client, ClientId};
use crate::query::filter::ClientFilter;
use crate::query::page::{Page, PageRequest, Sort, SortDirection, SortField};
use crate::repo::client_repo::{ClientRepository, RepoError, RepoResult};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Default)]
struct MemoryState {
    clients: BTreeMap<ClientId, Client>,
    dependents: BTreeSet<ClientId>,
    last_id: ClientId,
}

/// Single-threaded in-memory client repository.
#[derive(Debug, Default)]
pub struct InMemoryClientRepository {
    state: RefCell<MemoryState>,
}

impl InMemoryClientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store holding `clients`, assigning ids in order.
    pub fn with_clients(clients: impl IntoIterator<Item = Client>) -> RepoResult<Self> {
        let repo = Self::new();
        for client in clients {
            repo.insert(&client)?;
        }
        Ok(repo)
    }

    /// Marks `id` as referenced by dependent records so deletion is rejected.
    pub fn add_dependent(&self, id: ClientId) {
        self.state.borrow_mut().dependents.insert(id);
    }
}

impl ClientRepository for InMemoryClientRepository {
    fn get_by_id(&self, id: ClientId) -> RepoResult<Option<Client>> {
        Ok(self.state.borrow().clients.get(&id).cloned())
    }

    fn insert(&self, client: &Client) -> RepoResult<Client> {
        client.validate()?;
        let mut state = self.state.borrow_mut();
        state.last_id += 1;
        let id = state.last_id;
        let stored = client.clone().with_id(id);
        state.clients.insert(id, stored.clone());
        Ok(stored)
    }

    fn replace(&self, client: &Client) -> RepoResult<()> {
        client.validate()?;
        let id = client.id.ok_or(RepoError::MissingId)?;
        let mut state = self.state.borrow_mut();
        let stored = state.clients.get_mut(&id).ok_or(RepoError::NotFound(id))?;
        *stored = client.clone();
        Ok(())
    }

    fn delete_by_id(&self, id: ClientId) -> RepoResult<()> {
        let mut state = self.state.borrow_mut();
        if !state.clients.contains_key(&id) {
            return Err(RepoError::NotFound(id));
        }
        if state.dependents.contains(&id) {
            return Err(RepoError::IntegrityViolation(id));
        }
        state.clients.remove(&id);
        Ok(())
    }

    fn list_all(&self) -> RepoResult<Vec<Client>> {
        Ok(self.state.borrow().clients.values().cloned().collect())
    }

    fn count(&self) -> RepoResult<u64> {
        Ok(self.state.borrow().clients.len() as u64)
    }

    fn find_page(&self, filter: &ClientFilter, page: &PageRequest) -> RepoResult<Page<Client>> {
        let state = self.state.borrow();
        let mut matches: Vec<&Client> = state
            .clients
            .values()
            .filter(|client| filter.matches(client))
            .collect();
        if let Some(sort) = page.sort() {
            matches.sort_by(|left, right| compare_clients(left, right, sort));
        }

        let total = matches.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let content = matches
            .into_iter()
            .skip(offset)
            .take(page.size() as usize)
            .cloned()
            .collect();
        Ok(Page::new(content, page, total))
    }
}

fn compare_clients(left: &Client, right: &Client, sort: Sort) -> Ordering {
    let by_field = match sort.field {
        SortField::Id => left.id.cmp(&right.id),
        SortField::Name => left.name.cmp(&right.name),
        SortField::BirthDate => left.birth_date.cmp(&right.birth_date),
        SortField::Income => left
            .income
            .partial_cmp(&right.income)
            .unwrap_or(Ordering::Equal),
        SortField::Children => left.children.cmp(&right.children),
    };
    let by_field = match sort.direction {
        SortDirection::Asc => by_field,
        SortDirection::Desc => by_field.reverse(),
    };
    by_field.then_with(|| left.id.cmp(&right.id))
}
