//! Page-number pagination for GitHub list endpoints.
//!
//! Reviews and check runs are listed with `per_page=100&page=N`. Pages are
//! requested in order and concatenated until one comes back short, which
//! GitHub uses to mark the final page.

use std::future::Future;

use super::error::MonitorError;

/// Items requested per page.
pub const PER_PAGE: u8 = 100;

/// Query string selecting `page` (1-based) at [`PER_PAGE`] items.
#[must_use]
pub fn page_query(page: u32) -> String {
    format!("per_page={PER_PAGE}&page={page}")
}

/// Appends the pagination query for `page` to an API path.
#[must_use]
pub fn paged_path(path: &str, page: u32) -> String {
    format!("{path}?{query}", query = page_query(page))
}

/// Fetches consecutive pages starting at 1 and concatenates their items in
/// page order.
///
/// Stops after the first page holding fewer than [`PER_PAGE`] items, so a
/// result whose length is an exact multiple of the page size costs one extra
/// empty request.
///
/// # Errors
///
/// Propagates the first error returned by `fetch_page`, or
/// [`MonitorError::InvalidPagination`] if the page counter would overflow.
pub async fn collect_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>, MonitorError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, MonitorError>>,
{
    let mut items = Vec::new();
    let mut page: u32 = 1;

    loop {
        let batch = fetch_page(page).await?;
        let is_last = batch.len() < usize::from(PER_PAGE);
        items.extend(batch);

        if is_last {
            return Ok(items);
        }

        page = page
            .checked_add(1)
            .ok_or_else(|| MonitorError::InvalidPagination {
                message: "page counter overflowed".to_owned(),
            })?;
    }
}
