//! Owner of the lead list query state and the last fetched page.
//!
//! Every list request takes a new generation number. A response is applied
//! only if no newer request was issued meanwhile, so a slow page can never
//! overwrite a fresher one. Rows and pagination are swapped together under
//! one lock; the lock is never held across an `.await`.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::api::LeadsApi;
use crate::domain::filter::FilterDescriptor;
use crate::domain::lead::Lead;
use crate::domain::query::{PaginationState, QueryState};
use crate::domain::types::LeadId;
use crate::services::{ServiceError, ServiceResult};

pub const FETCH_FAILED_MESSAGE: &str =
    "Failed to fetch leads. Please check your connection and try again.";

/// Progress of the most recent list request.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Failed(String),
}

/// What the presentation layer renders.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct ListView {
    pub rows: Vec<Lead>,
    pub pagination: PaginationState,
    pub status: FetchStatus,
}

/// Whether a completed fetch was applied or superseded by a newer one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Stale,
}

/// Query and pagination kept between page loads.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuerySnapshot {
    pub query: QueryState,
    #[serde(default)]
    pub pagination: PaginationState,
}

struct ControllerState {
    generation: u64,
    query: QueryState,
    view: ListView,
}

pub struct LeadQueryController<A> {
    api: A,
    state: Mutex<ControllerState>,
}

impl<A: LeadsApi> LeadQueryController<A> {
    /// Controller with the default query `(1, 20, {})`.
    pub fn new(api: A) -> Self {
        Self::with_query(api, QueryState::default())
    }

    pub fn with_query(api: A, query: QueryState) -> Self {
        Self::restore(
            api,
            QuerySnapshot {
                query,
                pagination: PaginationState::default(),
            },
        )
    }

    /// Resumes from a snapshot taken by [`Self::snapshot`]; no rows are loaded.
    pub fn restore(api: A, snapshot: QuerySnapshot) -> Self {
        Self {
            api,
            state: Mutex::new(ControllerState {
                generation: 0,
                query: snapshot.query,
                view: ListView {
                    pagination: snapshot.pagination,
                    ..ListView::default()
                },
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn query(&self) -> QueryState {
        self.state().query.clone()
    }

    pub fn view(&self) -> ListView {
        self.state().view.clone()
    }

    pub fn snapshot(&self) -> QuerySnapshot {
        let state = self.state();
        QuerySnapshot {
            query: state.query.clone(),
            pagination: state.view.pagination,
        }
    }

    /// Replaces the filters and fetches the first page.
    pub async fn set_filters(&self, filters: FilterDescriptor) -> ServiceResult<FetchOutcome> {
        self.fetch_page(1, filters).await
    }

    pub async fn clear_filters(&self) -> ServiceResult<FetchOutcome> {
        self.set_filters(FilterDescriptor::new()).await
    }

    /// Re-fetches the current query.
    pub async fn refresh(&self) -> ServiceResult<FetchOutcome> {
        let query = self.query();
        self.fetch_page(query.page, query.filters).await
    }

    /// Moves to `page`, keeping the filters.
    ///
    /// Pages outside `1..=totalPages` are rejected without touching the state.
    pub async fn go_to_page(&self, page: usize) -> ServiceResult<FetchOutcome> {
        let (filters, pagination) = {
            let state = self.state();
            (state.query.filters.clone(), state.view.pagination)
        };
        if !pagination.contains_page(page) {
            return Err(ServiceError::PageOutOfRange {
                page,
                total_pages: pagination.total_pages,
            });
        }
        self.fetch_page(page, filters).await
    }

    /// Issues the list request and applies the result if it is still the
    /// latest one.
    pub async fn fetch_page(
        &self,
        page: usize,
        filters: FilterDescriptor,
    ) -> ServiceResult<FetchOutcome> {
        let (generation, query) = {
            let mut state = self.state();
            state.generation += 1;
            state.query = QueryState {
                page: page.max(1),
                limit: state.query.limit,
                filters,
            };
            state.view.status = FetchStatus::Loading;
            (state.generation, state.query.clone())
        };

        log::debug!(
            "Fetching leads page {} (request #{generation}, {} filters)",
            query.page,
            query.filters.len()
        );
        let result = self.api.list_leads(&query).await;

        let mut state = self.state();
        if state.generation != generation {
            log::debug!(
                "Discarding leads response #{generation}, #{} is newer",
                state.generation
            );
            return Ok(FetchOutcome::Stale);
        }

        match result {
            Ok(page) => {
                state.view = ListView {
                    rows: page.data,
                    pagination: page.pagination,
                    status: FetchStatus::Idle,
                };
                Ok(FetchOutcome::Applied)
            }
            Err(err) => {
                log::error!("Failed to fetch leads: {err}");
                state.view.rows.clear();
                state.view.status = FetchStatus::Failed(FETCH_FAILED_MESSAGE.to_string());
                Err(err.into())
            }
        }
    }

    /// Deletes a lead and re-fetches the current page from the backend.
    ///
    /// The row is never removed locally. If the current page no longer exists
    /// afterwards, the last remaining page is loaded instead.
    pub async fn delete_lead(&self, id: &str) -> ServiceResult<()> {
        let id = LeadId::new(id).map_err(|_| ServiceError::Validation("Invalid lead ID".into()))?;

        self.api.delete_lead(&id).await.map_err(|err| {
            log::error!("Failed to delete lead {id}: {err}");
            ServiceError::from(err)
        })?;
        log::info!("Deleted lead {id}");

        let query = self.query();
        match self.fetch_page(query.page, query.filters.clone()).await {
            Ok(FetchOutcome::Applied) => {
                let pagination = self.state().view.pagination;
                if pagination.total_pages > 0 && query.page > pagination.total_pages {
                    if let Err(err) = self.fetch_page(pagination.total_pages, query.filters).await {
                        log::error!("Failed to load the last page after delete: {err}");
                    }
                }
            }
            Ok(FetchOutcome::Stale) => {}
            Err(err) => log::error!("Failed to refresh leads after delete: {err}"),
        }

        Ok(())
    }
}
