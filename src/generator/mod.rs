//! Synthesis of the standalone dispatcher from the extracted route table.
//!
//! The generated file has no dependency on the marker router. It contains a
//! concrete `Router` with a `serve` entry point, one dispatch function per
//! parameter boundary, and private copies of the path helpers, so it compiles
//! with nothing but the shared `Method`/`Request`/`Response` vocabulary.
//! Dispatch is nested conditionals over string comparisons; no tables, no
//! registries, nothing resolved at runtime.
//!
//! ## Partitioning
//!
//! The route hierarchy is cut at parameter segments. The region between two
//! consecutive boundaries becomes one function: it splits its path slice at
//! the next boundary's depth, matches the static endpoints it owns, and in
//! the fallthrough arm tries to capture the boundary parameter, handing the
//! unconsumed remainder to the next function together with every value
//! captured so far. The final region is closed by a sentinel at the tree's
//! maximum depth whose fallthrough is the not-found handler.
//!
//! The boundaries must form a single nested chain; a route table with
//! parameters in separate subtrees is rejected with
//! [`GenerateError::ParameterFork`] rather than miscompiled.

#![deny(clippy::unwrap_used)]

pub mod errors;

use proc_macro2::{Literal, TokenStream};
use quote::{format_ident, quote};
use syn::parse_quote;

use crate::analyzer::{RouterMetadata, MARKER_CRATE};
use crate::tree::{clean_path, HandlerRef, NodeId, RouteTree};

pub use errors::GenerateError;

/// Generated dispatcher source.
///
/// `format_warning` is set when the assembled tokens could not be pretty
/// printed; `code` then holds the raw token text, which is valid Rust but
/// unpleasant to read.
#[derive(Debug)]
pub struct GeneratedSource {
    pub code: String,
    pub format_warning: Option<String>,
}

/// Assembles the dispatcher for one extracted route table.
pub struct Generator<'a> {
    tree: &'a RouteTree,
    meta: &'a RouterMetadata,
    invocation: String,
}

impl<'a> Generator<'a> {
    /// `invocation` is reproduced verbatim in the generated-file header.
    pub fn new(tree: &'a RouteTree, meta: &'a RouterMetadata, invocation: &str) -> Generator<'a> {
        Generator {
            tree,
            meta,
            invocation: invocation.to_string(),
        }
    }

    /// Produce the complete generated source file.
    #[tracing::instrument(skip_all)]
    pub fn generate(&self) -> Result<GeneratedSource, GenerateError> {
        let mut items: Vec<TokenStream> = Vec::new();
        items.extend(self.import_items()?);
        items.push(self.router_items());
        items.extend(self.boundary_functions()?);
        items.push(path_helper_items());

        let tokens = quote! { #(#items)* };
        let (body, format_warning) = match syn::parse2::<syn::File>(tokens.clone()) {
            Ok(mut file) => {
                file.attrs.push(parse_quote!(
                    #![allow(dead_code, unused_variables, unreachable_patterns)]
                ));
                (prettyplease::unparse(&file), None)
            }
            Err(e) => (
                tokens.to_string(),
                Some(format!(
                    "generated source did not re-parse, emitting unformatted tokens: {e}"
                )),
            ),
        };

        let code = format!(
            "// Code generated by {}. DO NOT EDIT.\n\n{}",
            self.invocation, body
        );
        Ok(GeneratedSource {
            code,
            format_warning,
        })
    }

    // ========================================================================
    // Imports
    // ========================================================================

    /// The input file's imports minus the marker router, plus the runtime
    /// types generated code references unconditionally. Order is declaration
    /// order; duplicates keep their first occurrence.
    fn import_items(&self) -> Result<Vec<TokenStream>, GenerateError> {
        let marker_router = format!("{MARKER_CRATE}::Router");
        let mut paths: Vec<String> = Vec::new();
        let retained = self
            .meta
            .imports
            .iter()
            .filter(|s| s.as_str() != MARKER_CRATE && **s != marker_router)
            .cloned();
        let implied = ["Method", "Request", "Response"]
            .iter()
            .map(|name| format!("{MARKER_CRATE}::{name}"));
        for path in retained.chain(implied) {
            if !paths.contains(&path) {
                paths.push(path);
            }
        }

        let mut items = Vec::with_capacity(paths.len());
        for path in paths {
            let tokens: TokenStream =
                path.parse().map_err(|e| GenerateError::ImportSyntax {
                    import: path.clone(),
                    message: format!("{e}"),
                })?;
            items.push(quote! { use #tokens; });
        }
        Ok(items)
    }

    // ========================================================================
    // Router surface
    // ========================================================================

    /// The concrete `Router`, its `serve` entry point, and a `new_router`
    /// constructor shaped like the declarative one it replaces.
    fn router_items(&self) -> TokenStream {
        let local = format_ident!("{}", self.meta.router_local);
        quote! {
            pub struct Router;

            impl Router {
                pub fn serve(&self, w: &mut Response, r: &Request) {
                    handle_base(w, r, &r.path);
                }
            }

            pub fn new_router() -> Router {
                let #local = Router;
                #local
            }
        }
    }

    // ========================================================================
    // Boundary functions
    // ========================================================================

    /// One dispatch function per region, in boundary order.
    ///
    /// Each boundary must be nested under the previous one; a parameter in a
    /// different subtree has no region to dispatch from and is rejected.
    fn boundary_functions(&self) -> Result<Vec<TokenStream>, GenerateError> {
        let mut params: Vec<NodeId> = Vec::new();
        let mut max_depth = 0;
        self.tree.walk(self.tree.root(), |id, node| {
            if node.is_param {
                params.push(id);
            }
            max_depth = max_depth.max(node.depth);
            true
        });

        for pair in params.windows(2) {
            if !self.is_ancestor(pair[0], pair[1]) {
                return Err(GenerateError::ParameterFork {
                    outer: self.tree.node(pair[0]).segment.clone(),
                    inner: self.tree.node(pair[1]).segment.clone(),
                });
            }
        }

        let mut functions = Vec::with_capacity(params.len() + 1);
        for i in 0..=params.len() {
            let region_root = if i == 0 {
                self.tree.root()
            } else {
                params[i - 1]
            };
            let boundary = params.get(i).copied();
            functions.push(self.boundary_function(region_root, boundary, max_depth)?);
        }
        Ok(functions)
    }

    /// Emit the function for the region rooted at `region_root` and closed by
    /// `boundary` (or by the sentinel at `max_depth`).
    fn boundary_function(
        &self,
        region_root: NodeId,
        boundary: Option<NodeId>,
        max_depth: usize,
    ) -> Result<TokenStream, GenerateError> {
        let prev_depth = self.tree.node(region_root).depth;
        let bound_depth = boundary
            .map(|b| self.tree.node(b).depth)
            .unwrap_or(max_depth);
        let n = bound_depth.saturating_sub(prev_depth);
        let n_lit = Literal::usize_unsuffixed(n);

        let fn_name = self.boundary_fn_name(region_root);
        let outer = self.region_params(region_root);

        // Static endpoints this region owns, in traversal order.
        let mut region: Vec<NodeId> = Vec::new();
        self.tree.walk(region_root, |id, node| {
            if !self.outside_region(region_root, id) && !node.methods.is_empty() {
                region.push(id);
            }
            true
        });

        let mna = handler_path(&self.meta.method_not_allowed)?;
        let nf = handler_path(&self.meta.not_found)?;

        let mut arms: Vec<TokenStream> = Vec::new();
        for id in region {
            let node = self.tree.node(id);
            let label = if id == region_root {
                "/".to_string()
            } else {
                clean_path(&format!("{}/{}", self.tree.base_path(id), node.segment))
            };
            let mut method_arms: Vec<TokenStream> = Vec::new();
            for (method, handler) in &node.methods {
                let pattern = format_ident!("{}", method.as_str());
                let call = handler_path(handler)?;
                method_arms.push(quote! {
                    Method::#pattern => #call(w, r #(, #outer)*)
                });
            }
            arms.push(quote! {
                #label if terminal => match r.method {
                    #(#method_arms,)*
                    _ => #mna(w, r),
                },
            });
        }

        let fallthrough = match boundary {
            Some(bound_id) => {
                let bound = self.tree.node(bound_id);
                let value_ident = param_ident(&bound.segment);
                let next_fn = self.boundary_fn_name(bound_id);
                if n <= 1 {
                    // The parameter is the region's first segment; the
                    // endpoint itself is the candidate value.
                    quote! {
                        _ => {
                            if endpoint.len() > 1 {
                                let #value_ident = &endpoint[1..];
                                #next_fn(w, r, &tail #(, #outer)*, #value_ident);
                            } else {
                                #nf(w, r);
                            }
                        }
                    }
                } else {
                    let base_label = self.tree.base_path(bound_id);
                    let n2 = Literal::usize_unsuffixed(n - 1);
                    quote! {
                        _ => {
                            let (base, value) = separate_path(&endpoint, #n2);
                            if base == #base_label && value.len() > 1 {
                                let #value_ident = &value[1..];
                                #next_fn(w, r, &tail #(, #outer)*, #value_ident);
                            } else {
                                #nf(w, r);
                            }
                        }
                    }
                }
            }
            None => quote! { _ => #nf(w, r), },
        };

        Ok(quote! {
            fn #fn_name(w: &mut Response, r: &Request, p: &str #(, #outer: &str)*) {
                let (endpoint, tail) = separate_path(p, #n_lit);
                let terminal = tail.is_empty() || tail == "/";
                match endpoint.as_str() {
                    #(#arms)*
                    #fallthrough
                }
            }
        })
    }

    /// `handle_base` for the root region, `handle_<param>` otherwise.
    fn boundary_fn_name(&self, region_root: NodeId) -> proc_macro2::Ident {
        if region_root == self.tree.root() {
            format_ident!("handle_base")
        } else {
            format_ident!("handle_{}", sanitize(&self.tree.node(region_root).segment))
        }
    }

    /// Parameter idents in scope inside the region, outermost first.
    fn region_params(&self, region_root: NodeId) -> Vec<proc_macro2::Ident> {
        let mut chain = Vec::new();
        let mut cur = Some(region_root);
        while let Some(id) = cur {
            let node = self.tree.node(id);
            if node.is_param {
                chain.push(param_ident(&node.segment));
            }
            cur = node.parent;
        }
        chain.reverse();
        chain
    }

    /// True when `ancestor` lies on `id`'s parent chain.
    fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = self.tree.node(id).parent;
        while let Some(parent) = cur {
            if parent == ancestor {
                return true;
            }
            cur = self.tree.node(parent).parent;
        }
        false
    }

    /// True when `id` belongs to a deeper region than the one rooted at
    /// `region_root`, i.e. a parameter boundary sits between them.
    fn outside_region(&self, region_root: NodeId, id: NodeId) -> bool {
        if id == region_root {
            return false;
        }
        if self.tree.node(id).is_param {
            return true;
        }
        let mut cur = id;
        while let Some(parent) = self.tree.node(cur).parent {
            if parent == region_root {
                return false;
            }
            if self.tree.node(parent).is_param {
                return true;
            }
            cur = parent;
        }
        false
    }
}

/// Token copies of the path helpers, embedded so the generated file stands
/// alone.
fn path_helper_items() -> TokenStream {
    quote! {
        fn clean_path(p: &str) -> String {
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

        fn separate_path(p: &str, n: usize) -> (String, String) {
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
    }
}

fn handler_path(handler: &HandlerRef) -> Result<syn::Path, GenerateError> {
    syn::parse_str(&handler.qualified()).map_err(GenerateError::SynParse)
}

/// Map a path segment onto identifier-safe characters.
fn sanitize(segment: &str) -> String {
    let mut s: String = segment
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if s.is_empty() || s.starts_with(|c: char| c.is_ascii_digit()) {
        s.insert(0, '_');
    }
    s
}

/// Identifier for a captured parameter value. Keywords get a trailing
/// underscore.
fn param_ident(segment: &str) -> proc_macro2::Ident {
    let s = sanitize(segment);
    match syn::parse_str::<syn::Ident>(&s) {
        Ok(ident) => ident,
        Err(_) => format_ident!("{}_", s),
    }
}
