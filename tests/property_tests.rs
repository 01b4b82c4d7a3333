//! Property-based tests for the routegen compiler
//!
//! These tests use proptest to verify invariants across many randomly
//! generated inputs, catching edge cases that hand-written tests might miss.

use proptest::prelude::*;

use routegen::tree::{clean_path, separate_path, HandlerRef, RouteTree};
use routegen_runtime::Method;

// =============================================================================
// Strategies
// =============================================================================

fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}"
}

fn path_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(segment_strategy(), 1..6).prop_map(|segments| {
        let mut p = String::new();
        for s in &segments {
            p.push('/');
            p.push_str(s);
        }
        p
    })
}

// Paths with sloppy separators, to exercise normalization.
fn messy_path_strategy() -> impl Strategy<Value = String> {
    (path_strategy(), prop::bool::ANY, prop::bool::ANY).prop_map(|(p, doubled, trailing)| {
        let mut p = if doubled { p.replace('/', "//") } else { p };
        if trailing {
            p.push('/');
        }
        p
    })
}

// =============================================================================
// Path Properties
// =============================================================================

proptest! {
    /// Property: clean_path is idempotent
    #[test]
    fn clean_path_is_idempotent(p in messy_path_strategy()) {
        let once = clean_path(&p);
        prop_assert_eq!(clean_path(&once), once);
    }

    /// Property: cleaned paths always start with exactly one separator
    #[test]
    fn clean_path_output_is_rooted(p in messy_path_strategy()) {
        let cleaned = clean_path(&p);
        prop_assert!(cleaned.starts_with('/'));
        prop_assert!(!cleaned.contains("//"));
        prop_assert!(cleaned == "/" || !cleaned.ends_with('/'));
    }

    /// Property: a split re-concatenates onto the normalized original
    #[test]
    fn separate_path_round_trips(p in messy_path_strategy(), n in 0usize..8) {
        let (head, tail) = separate_path(&p, n);
        prop_assert_eq!(clean_path(&format!("{head}{tail}")), clean_path(&p));
    }

    /// Property: both halves of a split are themselves normalized
    #[test]
    fn separate_path_halves_are_clean(p in messy_path_strategy(), n in 0usize..8) {
        let (head, tail) = separate_path(&p, n);
        prop_assert_eq!(clean_path(&head), head.clone());
        if !tail.is_empty() {
            prop_assert_eq!(clean_path(&tail), tail);
        }
    }
}

// =============================================================================
// Tree Properties
// =============================================================================

proptest! {
    /// Property: node count never exceeds one node per declared segment
    #[test]
    fn tree_growth_is_bounded_by_segments(paths in prop::collection::vec(path_strategy(), 1..8)) {
        let mut tree = RouteTree::new();
        let mut total_segments = 0;
        for p in &paths {
            total_segments += p.matches('/').count();
            tree.add(p, Method::GET, HandlerRef::new(None, "h"));
        }
        prop_assert!(tree.node_count() <= 1 + total_segments);
    }

    /// Property: re-registering every route changes nothing structurally
    #[test]
    fn reinsertion_is_structurally_idempotent(paths in prop::collection::vec(path_strategy(), 1..8)) {
        let mut tree = RouteTree::new();
        for p in &paths {
            tree.add(p, Method::GET, HandlerRef::new(None, "h"));
        }
        let before = tree.node_count();
        for p in &paths {
            tree.add(p, Method::GET, HandlerRef::new(None, "h"));
        }
        prop_assert_eq!(tree.node_count(), before);
    }

    /// Property: walk visits exactly the arena population, parents first
    #[test]
    fn walk_covers_the_tree(paths in prop::collection::vec(path_strategy(), 1..8)) {
        let mut tree = RouteTree::new();
        for p in &paths {
            tree.add(p, Method::GET, HandlerRef::new(None, "h"));
        }
        let mut visited = Vec::new();
        let mut parent_first = true;
        tree.walk(tree.root(), |id, node| {
            if let Some(parent) = node.parent {
                parent_first &= visited.contains(&parent);
            }
            visited.push(id);
            true
        });
        prop_assert!(parent_first);
        prop_assert_eq!(visited.len(), tree.node_count());
    }
}
