pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Window `results` for presentation: page `page` (zero-based) of size
/// `page_size`, plus the total page count (ceil division).
///
/// A page index at or beyond the total is a valid request that yields an
/// empty window; clamping vs. erroring is the caller's navigation policy.
pub fn paginate<T: Clone>(results: &[T], page: usize, page_size: usize) -> (Vec<T>, usize) {
    assert!(page_size > 0, "page_size must be positive");
    let total_pages = results.len().div_ceil(page_size);
    let start = page.saturating_mul(page_size);
    let end = start.saturating_add(page_size).min(results.len());
    let window = if start >= results.len() { Vec::new() } else { results[start..end].to_vec() };
    (window, total_pages)
}
