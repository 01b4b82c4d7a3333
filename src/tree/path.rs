//! Path-text primitives for the route tree and the generated dispatcher.
//!
//! Everything higher up expresses its path manipulation in terms of
//! [`separate_path`]; the generated code embeds the same two functions so the
//! dispatcher stays dependency-free.

/// Normalize a request/route path.
///
/// Collapses repeated separators, strips a trailing separator, and forces a
/// leading one. The empty path and paths without a leading separator
/// normalize onto the root.
pub fn clean_path(p: &str) -> String {
    let mut out = String::with_capacity(p.len() + 1);
    for segment in p.split('/').filter(|s| !s.is_empty()) {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Split a path at the boundary after the n-th segment.
///
/// Returns `(normalized, "")` when the path has fewer than 2 segments.
/// Otherwise the head is the first `n` segments re-cleaned and the tail is
/// the normalized remainder (`"/"` when `n` consumes every segment). `n` is
/// clamped to the segment count, so the split is total.
pub fn separate_path(p: &str, n: usize) -> (String, String) {
    let p = clean_path(p);
    let segments: Vec<&str> = p[1..].split('/').collect();
    if segments.len() < 2 {
        return (p, String::new());
    }
    let n = n.min(segments.len());
    let head = clean_path(&segments[..n].join("/"));
    let tail = clean_path(&segments[n..].join("/"));
    (head, tail)
}
