//! Resource search and picker listing.
//!
//! [`ResourceQueryService`] fetches candidates from a [`ResourceStore`], ranks them
//! with [`rank_resources`] and returns one page plus the number of candidates.

use crate::ranking::{paginate, rank_resources};
use async_trait::async_trait;
use db::models::resource::Model as Resource;
use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("failed to load resources: {0}")]
    DataAccess(#[from] DbErr),
}

/// Read access to stored resources.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Resources whose city equals `city` exactly, or all resources for `None`.
    /// Order must be stable between calls.
    async fn find_resources_by_city(&self, city: Option<&str>) -> Result<Vec<Resource>, DbErr>;

    async fn list_all(&self) -> Result<Vec<Resource>, DbErr> {
        self.find_resources_by_city(None).await
    }
}

#[async_trait]
impl ResourceStore for DatabaseConnection {
    async fn find_resources_by_city(&self, city: Option<&str>) -> Result<Vec<Resource>, DbErr> {
        Resource::find_by_city(self, city).await
    }
}

/// A parsed search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Matched exactly against the resource city. Empty means every city.
    pub city: String,
    /// Requested service tags, in request order. Duplicates are kept.
    pub services: Vec<String>,
    /// 1-based page number, always >= 1.
    pub page: i64,
}

impl SearchQuery {
    /// Builds a query from raw query-string values.
    ///
    /// - `services` is a comma separated list; missing or empty means no tags.
    /// - `page` is read as a leading integer; missing, unparseable or < 1 means page 1.
    pub fn from_params(
        city: Option<String>,
        services: Option<String>,
        page: Option<String>,
    ) -> Self {
        let services = match services {
            Some(raw) if !raw.is_empty() => raw.split(',').map(str::to_owned).collect(),
            _ => Vec::new(),
        };

        let page = page
            .as_deref()
            .and_then(parse_leading_int)
            .filter(|p| *p >= 1)
            .unwrap_or(1);

        Self {
            city: city.unwrap_or_default(),
            services,
            page,
        }
    }
}

/// Parses an optional sign followed by digits at the start of `raw`, ignoring the rest.
fn parse_leading_int(raw: &str) -> Option<i64> {
    let raw = raw.trim_start();
    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// One page of ranked resources.
#[derive(Debug, Clone)]
pub struct RankedPage {
    pub resources: Vec<Resource>,
    /// Number of candidates in the city before pagination.
    pub total_count: usize,
}

/// Entry of the resource picker list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceSummary {
    pub title: String,
    pub id: i64,
}

pub struct ResourceQueryService<S: ResourceStore> {
    store: S,
    page_size: usize,
}

impl<S: ResourceStore> ResourceQueryService<S> {
    pub fn new(store: S, page_size: usize) -> Self {
        Self { store, page_size }
    }

    /// Ranks every resource in `query.city` by service match and returns the requested page.
    ///
    /// `total_count` counts all candidates in the city, matching or not.
    pub async fn search(&self, query: &SearchQuery) -> Result<RankedPage, SearchError> {
        let city = Some(query.city.as_str()).filter(|c| !c.is_empty());
        let candidates = self.store.find_resources_by_city(city).await?;
        let total_count = candidates.len();

        let ranked = rank_resources(candidates, &query.services);
        let resources = paginate(ranked, query.page, self.page_size);

        tracing::debug!(
            city = %query.city,
            services = query.services.len(),
            page = query.page,
            total_count,
            returned = resources.len(),
            "resource search"
        );

        Ok(RankedPage {
            resources,
            total_count,
        })
    }

    /// Titles and ids of every resource, in store order.
    pub async fn list_for_picker(&self) -> Result<Vec<ResourceSummary>, SearchError> {
        let all = self.store.list_all().await?;
        Ok(all
            .into_iter()
            .map(|resource| ResourceSummary {
                title: resource.title,
                id: resource.id,
            })
            .collect())
    }
}
