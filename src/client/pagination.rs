//! List options and page walking

use futures::stream::{self, StreamExt};
use log::debug;
use serde::de::DeserializeOwned;

use crate::client::{Context, Request, TfeClient};
use crate::config::api;
use crate::error::Result;
use crate::jsonapi::{resolve_included, Document, Pagination, Relationship, Resource};

/// Page selection for list endpoints
///
/// Zero means "unspecified" and is never sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub page_number: u32,
    pub page_size: u32,
}

impl ListOptions {
    pub fn page(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number,
            page_size,
        }
    }

    /// `page[number]` and `page[size]`, each only when non-zero
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if self.page_number > 0 {
            pairs.push((api::PAGE_NUMBER, self.page_number.to_string()));
        }
        if self.page_size > 0 {
            pairs.push((api::PAGE_SIZE, self.page_size.to_string()));
        }
        pairs
    }
}

/// One page of a list endpoint
#[derive(Debug, Clone)]
pub struct List<T> {
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
    /// Side-loaded resources requested with `include`
    pub included: Vec<Resource<serde_json::Value>>,
}

impl<T> List<T> {
    pub fn from_document(document: Document<Vec<T>>) -> Self {
        let pagination = document.pagination().cloned();
        Self {
            items: document.data,
            pagination,
            included: document.included,
        }
    }

    /// Resolve a to-one relationship of one item against `included`
    pub fn resolve<A, R>(
        &self,
        relationship: Option<&Relationship>,
    ) -> Result<Option<Resource<A, R>>>
    where
        A: DeserializeOwned + Default,
        R: DeserializeOwned + Default,
    {
        match relationship.and_then(|r| r.identifier()) {
            Some(identifier) => resolve_included(&self.included, identifier),
            None => Ok(None),
        }
    }

    /// Page number reported by the server, 1 when not reported
    pub fn current_page(&self) -> u32 {
        self.pagination.as_ref().map_or(1, |p| p.current_page)
    }

    pub fn next_page(&self) -> Option<u32> {
        self.pagination.as_ref().and_then(|p| p.next_page)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl TfeClient {
    /// Fetch one page of a list endpoint
    pub async fn list<T>(&self, ctx: &Context, request: Request) -> Result<List<T>>
    where
        T: DeserializeOwned,
    {
        let document = self.execute_document::<Vec<T>>(ctx, request).await?;
        Ok(List::from_document(document))
    }

    /// Fetch all pages of a list endpoint with parallel fetching
    ///
    /// Page 1 is fetched first to learn `total-pages`, then the remaining
    /// pages are fetched concurrently (bounded by
    /// `MAX_CONCURRENT_PAGE_REQUESTS`) and reassembled in page order.
    ///
    /// `build` produces the request for the endpoint without page options.
    pub async fn fetch_all_pages<T, F>(&self, ctx: &Context, build: F) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
        F: Fn() -> Request,
    {
        let first: List<T> = self
            .list(
                ctx,
                build().list_options(ListOptions::page(1, api::DEFAULT_PAGE_SIZE)),
            )
            .await?;

        let total_pages = match first.pagination {
            Some(ref p) => p.total_pages,
            None => return Ok(first.items),
        };
        let mut all_items = first.items;

        debug!("Page 1/{}, {} items so far", total_pages, all_items.len());

        if total_pages <= 1 {
            return Ok(all_items);
        }

        debug!(
            "Fetching {} remaining pages in parallel (max {} concurrent)",
            total_pages - 1,
            api::MAX_CONCURRENT_PAGE_REQUESTS
        );

        let page_futures = (2..=total_pages).map(|page_num| {
            let request =
                build().list_options(ListOptions::page(page_num, api::DEFAULT_PAGE_SIZE));
            async move {
                let page: List<T> = self.list(ctx, request).await?;
                debug!("Page {} returned {} items", page_num, page.len());
                Ok::<_, crate::error::TfeError>((page_num, page.items))
            }
        });

        let results: Vec<Result<(u32, Vec<T>)>> = stream::iter(page_futures)
            .buffer_unordered(api::MAX_CONCURRENT_PAGE_REQUESTS)
            .collect()
            .await;

        let mut pages = Vec::with_capacity(results.len());
        for result in results {
            pages.push(result?);
        }
        pages.sort_by_key(|(page_num, _)| *page_num);

        for (_, items) in pages {
            all_items.extend(items);
        }

        debug!("Fetched {} items across {} pages", all_items.len(), total_pages);
        Ok(all_items)
    }
}
