use crate::models::Notice;

/// Filters to notices whose title or content contains `query` (an empty
/// query matches everything) and orders by creation time, newest first.
/// The sort is stable, so same-millisecond notices keep the collection's
/// newest-first insertion order. Pure; callers recompute on every read
/// instead of caching the result.
pub fn project<'a>(notices: &'a [Notice], query: &str) -> Vec<&'a Notice> {
    let mut hits: Vec<&Notice> = notices
        .iter()
        .filter(|n| n.title.contains(query) || n.content.contains(query))
        .collect();
    hits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    hits
}
