//! Concurrent count-and-fetch for paginated reads.

use std::future::Future;

use pagination::{PageRequest, Paginated};

/// Run `fetch` and `count` concurrently and assemble the page.
///
/// Both futures must describe the same predicate; `fetch` already applies
/// the offset and limit from `request`. The first failure wins and the other
/// future is dropped. A page past the end yields no items but still reports
/// the full `total`.
pub async fn paginate<T, E, F, C>(
    request: PageRequest,
    fetch: F,
    count: C,
) -> Result<Paginated<T>, E>
where
    F: Future<Output = Result<Vec<T>, E>>,
    C: Future<Output = Result<u64, E>>,
{
    let (items, total) = tokio::try_join!(fetch, count)?;
    Ok(Paginated::new(items, request, total))
}
