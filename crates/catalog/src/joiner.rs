//! Detail enrichment: one concurrent detail fetch per entry, joined as a unit.

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::TransportError;
use crate::source::CatalogSource;
use crate::types::{CatalogDetail, CatalogEntry};

/// Fetches the detail of every entry concurrently.
///
/// All fetches are in flight at once and every one of them settles before
/// this returns. The output is index-aligned with `entries` whatever order
/// the fetches complete in. If any fetch fails, no details are returned and
/// the first failure in entry order is reported.
pub async fn enrich<S>(
    source: &S,
    entries: &[CatalogEntry],
) -> Result<Vec<CatalogDetail>, TransportError>
where
    S: CatalogSource + ?Sized,
{
    if entries.is_empty() {
        return Ok(Vec::new());
    }

    let fetches = entries.iter().map(|e| source.fetch_detail(&e.detail_url));
    let settled = join_all(fetches).await;

    let failed = settled.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        warn!(failed, total = entries.len(), "detail enrichment failed");
    } else {
        debug!(total = entries.len(), "detail enrichment complete");
    }

    settled.into_iter().collect()
}
