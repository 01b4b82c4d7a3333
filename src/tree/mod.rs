//! In-memory model of the declared route hierarchy.
//!
//! One [`Node`] exists per distinct path segment; parameter segments
//! (`:name`) are stored with the marker stripped and `is_param` set. Nodes
//! live in a single arena ([`RouteTree::nodes`]) and reference each other by
//! [`NodeId`], which keeps parent back-references cheap without ownership
//! cycles.
//!
//! ## Notes
//!
//! - Insertion ([`RouteTree::add`]) is a root-to-leaf descent that shifts a
//!   head/tail split of the route path one segment at a time; it never
//!   creates two siblings with the same segment, and re-registering a
//!   (path, method) pair overwrites the previous handler.
//! - Traversal ([`RouteTree::walk`]) is plain BFS with early stop; the
//!   generator leans on its parent-before-descendant ordering.

pub mod path;

use std::collections::VecDeque;

use routegen_runtime::Method;

pub use path::{clean_path, separate_path};

/// Index of a node in its [`RouteTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Opaque reference to a handler the generated code will call.
///
/// The compiler never looks at handler bodies; it only needs a path it can
/// splice back into source text (`namespace::name` or a bare `name`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerRef {
    /// Qualifying path, e.g. `handler` or `crate::api::admin`. `None` for a
    /// bare function name.
    pub namespace: Option<String>,
    /// Function name.
    pub name: String,
}

impl HandlerRef {
    pub fn new(namespace: Option<String>, name: impl Into<String>) -> HandlerRef {
        HandlerRef {
            namespace,
            name: name.into(),
        }
    }

    /// The full call path as written in source.
    pub fn qualified(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}::{}", ns, self.name),
            None => self.name.clone(),
        }
    }
}

/// One path segment in the route hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Distance from the root; the root is depth 0 and represents `/`.
    pub depth: usize,
    /// Literal segment text, or the parameter name with the marker stripped.
    pub segment: String,
    /// True when the segment was declared as `:name`.
    pub is_param: bool,
    /// Method-to-handler registrations, insertion order preserved.
    pub methods: Vec<(Method, HandlerRef)>,
    /// Back-reference for base-path reconstruction; `None` only on the root.
    pub parent: Option<NodeId>,
    /// Children in insertion order; this order is traversal order.
    pub children: Vec<NodeId>,
}

impl Node {
    fn new(depth: usize, segment: String, is_param: bool, parent: Option<NodeId>) -> Node {
        Node {
            depth,
            segment,
            is_param,
            methods: Vec::new(),
            parent,
            children: Vec::new(),
        }
    }

    /// Register `handler` under `method`, overwriting any previous handler
    /// for the same method.
    fn insert_method(&mut self, method: Method, handler: HandlerRef) {
        match self.methods.iter_mut().find(|(m, _)| *m == method) {
            Some((_, h)) => *h = handler,
            None => self.methods.push((method, handler)),
        }
    }

    /// Handler registered for `method`, if any.
    pub fn handler(&self, method: Method) -> Option<&HandlerRef> {
        self.methods
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, h)| h)
    }
}

/// Arena-backed tree of every declared path.
#[derive(Debug, Clone)]
pub struct RouteTree {
    nodes: Vec<Node>,
}

impl RouteTree {
    /// A tree containing only the root node (depth 0, empty segment).
    pub fn new() -> RouteTree {
        RouteTree {
            nodes: vec![Node::new(0, String::new(), false, None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Total number of nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Insert a route registration.
    ///
    /// Descends from the root, shifting a head/tail split of the route path
    /// one segment at a time. At each step the current node's child carrying
    /// the head segment is reused, or a new child is appended when none does;
    /// matching and creation stay on the descent chain, so routes in other
    /// subtrees are never touched. Parameter markers are detected and
    /// stripped as the head shifts. When no segments remain the handler is
    /// registered on the node reached.
    pub fn add(&mut self, route_path: &str, method: Method, handler: HandlerRef) {
        let cleaned = clean_path(route_path);
        if cleaned == "/" {
            let root = self.root();
            self.nodes[root.0].insert_method(method, handler);
            return;
        }

        let mut current = self.root();
        let mut remaining = cleaned;
        loop {
            let (head, rest) = separate_path(&remaining, 1);
            let is_param = head.len() > 1 && head.as_bytes()[1] == b':';
            let segment = if is_param {
                // "/:param" becomes "param"; the flag carries the marker.
                head[2..].to_string()
            } else {
                head[1..].to_string()
            };

            let existing = self.nodes[current.0]
                .children
                .iter()
                .copied()
                .find(|c| self.nodes[c.0].segment == segment);
            current = match existing {
                Some(child) => child,
                None => {
                    let child = NodeId(self.nodes.len());
                    self.nodes.push(Node::new(
                        self.nodes[current.0].depth + 1,
                        segment,
                        is_param,
                        Some(current),
                    ));
                    self.nodes[current.0].children.push(child);
                    child
                }
            };

            if rest.is_empty() {
                self.nodes[current.0].insert_method(method, handler);
                return;
            }
            remaining = rest;
        }
    }

    /// Breadth-first traversal from `start`.
    ///
    /// Visits the start node, then its children in insertion order, then
    /// grandchildren, and so on; stops the moment `visit` returns false
    /// (abandoning whatever is still queued).
    pub fn walk<F>(&self, start: NodeId, mut visit: F)
    where
        F: FnMut(NodeId, &Node) -> bool,
    {
        let mut queue: VecDeque<NodeId> = VecDeque::new();
        queue.push_back(start);
        while let Some(id) = queue.pop_front() {
            for &child in &self.nodes[id.0].children {
                queue.push_back(child);
            }
            if !visit(id, &self.nodes[id.0]) {
                return;
            }
        }
    }

    /// Literal path prefix from the nearest enclosing parameter boundary
    /// down to `id`'s parent.
    ///
    /// Walks parent links upward, accumulating segments, and stops without
    /// including the first ancestor that is itself a parameter. Yields `"/"`
    /// for a node directly under the root and `""` for a node directly under
    /// a parameter.
    pub fn base_path(&self, id: NodeId) -> String {
        let mut p = String::new();
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            if self.nodes[parent.0].is_param {
                break;
            }
            p = clean_path(&format!("/{}{}", self.nodes[parent.0].segment, p));
            current = parent;
        }
        p
    }
}

impl Default for RouteTree {
    fn default() -> RouteTree {
        RouteTree::new()
    }
}
