use std::sync::Arc;

use tracing::trace;
use uuid::Uuid;

use super::run_user_query;
use super::types::{RoleFilter, SortField, StatusFilter, UserQuery, UserRow};
use crate::store::EntityStore;

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    store: Uuid,
    revision: u64,
    query: UserQuery,
}

/// Query state of the users tab with memoized results.
///
/// Rows are recomputed only when the query, the store, or the store's
/// revision changed since the last call to [`rows`](Self::rows).
#[derive(Debug, Default)]
pub struct UserListView {
    query: UserQuery,
    cache: Option<(CacheKey, Arc<[UserRow]>)>,
    computations: u64,
}

impl UserListView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &UserQuery {
        &self.query
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.query.search_term = term.into();
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.query.status = status;
    }

    pub fn set_role_filter(&mut self, role: RoleFilter) {
        self.query.role = role;
    }

    /// Apply the column toggle rule for `field`.
    pub fn sort_by(&mut self, field: SortField) {
        self.query.sort.toggle(field);
    }

    /// Number of times rows were actually computed.
    pub fn computations(&self) -> u64 {
        self.computations
    }

    /// Current rows for this view against `store`.
    pub fn rows(&mut self, store: &EntityStore) -> Arc<[UserRow]> {
        let store_id = store.instance_id();
        let revision = store.revision();
        if let Some((key, rows)) = &self.cache
            && key.store == store_id
            && key.revision == revision
            && key.query == self.query
        {
            return Arc::clone(rows);
        }

        let snapshot = store.snapshot();
        let rows: Arc<[UserRow]> =
            run_user_query(&snapshot.users, &snapshot.roles, &self.query)
                .into();
        self.computations += 1;
        trace!(
            revision = snapshot.revision,
            rows = rows.len(),
            "user list recomputed"
        );

        self.cache = Some((
            CacheKey {
                store: store_id,
                revision: snapshot.revision,
                query: self.query.clone(),
            },
            Arc::clone(&rows),
        ));
        rows
    }
}
