//! Extract the declared route table from a router source file.
//!
//! The input is ordinary Rust declaring routes against the marker API:
//!
//! ```ignore
//! use routegen_runtime::{Method, Router};
//!
//! pub fn new_router() -> Router {
//!     let r = Router::new();
//!     r.handle_func("/api/users/:user_id", Method::GET, handler::get_user);
//!     r.handle_not_found(handler::not_found);
//!     r.handle_method_not_allowed(handler::method_not_allowed);
//!     r
//! }
//! ```
//!
//! Extraction walks the `syn` syntax tree with one handler per statement
//! shape (use-item, constructor fn, router-local `let`, directive call) and a
//! deliberate no-op for everything else. It fails closed: any declaration
//! that does not match the expected shape is a hard error carrying the
//! `file:line:column` of the offending expression, never a guess.

use proc_macro2::Span;
use syn::spanned::Spanned;
use thiserror::Error;

use routegen_runtime::Method;

use crate::tree::{HandlerRef, RouteTree};

/// Name of the marker crate; its imports are dropped from generated output.
pub const MARKER_CRATE: &str = "routegen_runtime";

/// Required name of the router constructor function.
pub const CONSTRUCTOR_NAME: &str = "new_router";

/// Source position for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl Position {
    fn new(file: &str, span: Span) -> Position {
        let start = span.start();
        Position {
            file: file.to_string(),
            line: start.line,
            column: start.column + 1,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Errors raised while extracting the route table.
///
/// Parse errors and schema violations alike abort extraction; nothing is
/// generated from a file that does not match the declarative shape exactly.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("{pos}: failed to parse source: {message}")]
    Parse { pos: Position, message: String },

    #[error("{pos}: invalid function declaration: want `{CONSTRUCTOR_NAME}`, got `{found}`")]
    WrongConstructor { pos: Position, found: String },

    #[error("{pos}: duplicate `{CONSTRUCTOR_NAME}` declaration")]
    DuplicateConstructor { pos: Position },

    #[error("{file}: no `{CONSTRUCTOR_NAME}` constructor found")]
    MissingConstructor { file: String },

    #[error("{pos}: router constructor result must be bound to a plain identifier")]
    RouterBinding { pos: Position },

    #[error("{file}: no `Router::new()` assignment found in `{CONSTRUCTOR_NAME}`")]
    MissingRouterLocal { file: String },

    #[error("{pos}: `{directive}` expects {want} argument(s), got {got}")]
    ArgCount {
        pos: Position,
        directive: &'static str,
        want: usize,
        got: usize,
    },

    #[error("{pos}: first argument to `handle_func` must be a string literal path")]
    RoutePathShape { pos: Position },

    #[error("{pos}: method must be written as a `Method::…` token")]
    MethodShape { pos: Position },

    #[error("{pos}: unrecognized HTTP method token `{token}`")]
    UnknownMethod { pos: Position, token: String },

    #[error("{pos}: handler must be a bare or namespace-qualified function path")]
    HandlerShape { pos: Position },

    #[error("{pos}: unknown method called on the router: `{name}`")]
    UnknownDirective { pos: Position, name: String },

    #[error("{pos}: duplicate declaration: `{directive}`")]
    DuplicateFallback {
        pos: Position,
        directive: &'static str,
    },

    #[error("{file}: missing `{directive}` declaration")]
    MissingFallback {
        file: String,
        directive: &'static str,
    },
}

/// Package/import context and fallback handlers extracted alongside the tree.
///
/// Populated once during extraction and read-only afterwards; the generator
/// consumes it together with the [`RouteTree`] and nothing else.
#[derive(Debug, Clone)]
pub struct RouterMetadata {
    /// Flattened `use` paths in declaration order, marker imports included
    /// (the generator filters those out).
    pub imports: Vec<String>,
    /// Local name the router constructor result was bound to.
    pub router_local: String,
    /// Fallback for paths no route matches.
    pub not_found: HandlerRef,
    /// Fallback for matched paths with an unregistered method.
    pub method_not_allowed: HandlerRef,
}

/// The extraction result handed to the generator.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub tree: RouteTree,
    pub meta: RouterMetadata,
}

/// Extract the route table from `source`.
///
/// `file_name` is used for diagnostics only; reading the file is the
/// caller's concern.
#[tracing::instrument(skip_all, fields(file = %file_name))]
pub fn analyze_source(file_name: &str, source: &str) -> Result<Analysis, AnalyzeError> {
    let ast = syn::parse_file(source).map_err(|e| AnalyzeError::Parse {
        pos: Position::new(file_name, e.span()),
        message: e.to_string(),
    })?;

    let mut analyzer = Analyzer::new(file_name);
    for item in &ast.items {
        match item {
            syn::Item::Use(item_use) => analyzer.collect_imports(item_use),
            syn::Item::Fn(item_fn) => analyzer.inspect_constructor(item_fn)?,
            // Other item kinds carry no routing information.
            _ => {}
        }
    }
    analyzer.finish()
}

struct Analyzer {
    file: String,
    tree: RouteTree,
    imports: Vec<String>,
    router_local: Option<String>,
    not_found: Option<HandlerRef>,
    method_not_allowed: Option<HandlerRef>,
    constructor_seen: bool,
}

impl Analyzer {
    fn new(file: &str) -> Analyzer {
        Analyzer {
            file: file.to_string(),
            tree: RouteTree::new(),
            imports: Vec::new(),
            router_local: None,
            not_found: None,
            method_not_allowed: None,
            constructor_seen: false,
        }
    }

    fn pos(&self, span: Span) -> Position {
        Position::new(&self.file, span)
    }

    /// Flatten a `use` item into textual paths, preserving declaration order.
    fn collect_imports(&mut self, item: &syn::ItemUse) {
        let mut prefix: Vec<String> = Vec::new();
        flatten_use_tree(&item.tree, &mut prefix, &mut self.imports);
    }

    /// Validate the constructor function and read the declarations inside it.
    fn inspect_constructor(&mut self, item: &syn::ItemFn) -> Result<(), AnalyzeError> {
        let name = item.sig.ident.to_string();
        if name != CONSTRUCTOR_NAME {
            return Err(AnalyzeError::WrongConstructor {
                pos: self.pos(item.sig.ident.span()),
                found: name,
            });
        }
        if self.constructor_seen {
            return Err(AnalyzeError::DuplicateConstructor {
                pos: self.pos(item.sig.ident.span()),
            });
        }
        self.constructor_seen = true;

        for stmt in &item.block.stmts {
            match stmt {
                syn::Stmt::Local(local) => self.record_router_local(local)?,
                syn::Stmt::Expr(syn::Expr::MethodCall(call), _) => self.register_directive(call)?,
                // Tail expression (`r`), macros, nested items: no routing information.
                _ => {}
            }
        }
        Ok(())
    }

    /// Record the local name bound to `Router::new()`.
    fn record_router_local(&mut self, local: &syn::Local) -> Result<(), AnalyzeError> {
        let Some(init) = &local.init else {
            return Ok(());
        };
        let syn::Expr::Call(call) = init.expr.as_ref() else {
            return Ok(());
        };
        let syn::Expr::Path(path) = call.func.as_ref() else {
            return Ok(());
        };
        if !path_ends_with(&path.path, &["Router", "new"]) {
            return Ok(());
        }
        let syn::Pat::Ident(pat) = &local.pat else {
            return Err(AnalyzeError::RouterBinding {
                pos: self.pos(local.pat.span()),
            });
        };
        self.router_local = Some(pat.ident.to_string());
        Ok(())
    }

    /// Dispatch a method call on the router local by directive name.
    fn register_directive(&mut self, call: &syn::ExprMethodCall) -> Result<(), AnalyzeError> {
        let syn::Expr::Path(receiver) = call.receiver.as_ref() else {
            return Ok(());
        };
        let Some(receiver_ident) = receiver.path.get_ident() else {
            return Ok(());
        };
        // Calls on anything but the router local carry no declarations.
        if Some(receiver_ident.to_string()) != self.router_local {
            return Ok(());
        }

        let directive = call.method.to_string();
        match directive.as_str() {
            "handle_func" => self.register_route(call),
            "handle_not_found" => self.register_fallback(call, "handle_not_found"),
            "handle_method_not_allowed" => {
                self.register_fallback(call, "handle_method_not_allowed")
            }
            _ => Err(AnalyzeError::UnknownDirective {
                pos: self.pos(call.method.span()),
                name: directive,
            }),
        }
    }

    /// Validate a `handle_func(path, method, handler)` call and insert it.
    fn register_route(&mut self, call: &syn::ExprMethodCall) -> Result<(), AnalyzeError> {
        if call.args.len() != 3 {
            return Err(AnalyzeError::ArgCount {
                pos: self.pos(call.span()),
                directive: "handle_func",
                want: 3,
                got: call.args.len(),
            });
        }

        let route_path = match &call.args[0] {
            syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Str(lit),
                ..
            }) => lit.value(),
            other => {
                return Err(AnalyzeError::RoutePathShape {
                    pos: self.pos(other.span()),
                })
            }
        };

        let method = self.method_token(&call.args[1])?;
        let handler = self.handler_ref(&call.args[2])?;
        self.tree.add(&route_path, method, handler);
        Ok(())
    }

    /// Validate and record a fallback registration, rejecting duplicates.
    fn register_fallback(
        &mut self,
        call: &syn::ExprMethodCall,
        directive: &'static str,
    ) -> Result<(), AnalyzeError> {
        if call.args.len() != 1 {
            return Err(AnalyzeError::ArgCount {
                pos: self.pos(call.span()),
                directive,
                want: 1,
                got: call.args.len(),
            });
        }
        let handler = self.handler_ref(&call.args[0])?;
        let slot = if directive == "handle_not_found" {
            &mut self.not_found
        } else {
            &mut self.method_not_allowed
        };
        if slot.is_some() {
            return Err(AnalyzeError::DuplicateFallback {
                pos: self.pos(call.span()),
                directive,
            });
        }
        *slot = Some(handler);
        Ok(())
    }

    /// Read a `Method::GET`-style token and normalize its casing.
    fn method_token(&self, expr: &syn::Expr) -> Result<Method, AnalyzeError> {
        let syn::Expr::Path(path) = expr else {
            return Err(AnalyzeError::MethodShape {
                pos: self.pos(expr.span()),
            });
        };
        let segments: Vec<String> = path
            .path
            .segments
            .iter()
            .map(|s| s.ident.to_string())
            .collect();
        // Accept `Method::GET` and any qualification ending in `Method::GET`.
        if segments.len() < 2 || segments[segments.len() - 2] != "Method" {
            return Err(AnalyzeError::MethodShape {
                pos: self.pos(expr.span()),
            });
        }
        let token = &segments[segments.len() - 1];
        Method::from_token(token).ok_or_else(|| AnalyzeError::UnknownMethod {
            pos: self.pos(expr.span()),
            token: token.clone(),
        })
    }

    /// Read a handler reference, bare (`not_found`) or qualified
    /// (`handler::get_user`, `crate::api::get_user`).
    fn handler_ref(&self, expr: &syn::Expr) -> Result<HandlerRef, AnalyzeError> {
        let syn::Expr::Path(path) = expr else {
            return Err(AnalyzeError::HandlerShape {
                pos: self.pos(expr.span()),
            });
        };
        if path.qself.is_some() || path.path.segments.is_empty() {
            return Err(AnalyzeError::HandlerShape {
                pos: self.pos(expr.span()),
            });
        }
        let mut segments: Vec<String> = path
            .path
            .segments
            .iter()
            .map(|s| s.ident.to_string())
            .collect();
        let name = segments.pop().unwrap_or_default();
        let namespace = if segments.is_empty() {
            None
        } else {
            Some(segments.join("::"))
        };
        Ok(HandlerRef::new(namespace, name))
    }

    /// Check the hard preconditions and assemble the hand-off artifact.
    fn finish(self) -> Result<Analysis, AnalyzeError> {
        if !self.constructor_seen {
            return Err(AnalyzeError::MissingConstructor { file: self.file });
        }
        let Some(router_local) = self.router_local else {
            return Err(AnalyzeError::MissingRouterLocal { file: self.file });
        };
        let Some(not_found) = self.not_found else {
            return Err(AnalyzeError::MissingFallback {
                file: self.file,
                directive: "handle_not_found",
            });
        };
        let Some(method_not_allowed) = self.method_not_allowed else {
            return Err(AnalyzeError::MissingFallback {
                file: self.file,
                directive: "handle_method_not_allowed",
            });
        };
        Ok(Analysis {
            tree: self.tree,
            meta: RouterMetadata {
                imports: self.imports,
                router_local,
                not_found,
                method_not_allowed,
            },
        })
    }
}

/// True when the final path segments equal `suffix` in order.
fn path_ends_with(path: &syn::Path, suffix: &[&str]) -> bool {
    if path.segments.len() < suffix.len() {
        return false;
    }
    path.segments
        .iter()
        .rev()
        .zip(suffix.iter().rev())
        .all(|(seg, want)| seg.ident == want)
}

/// Flatten a `use` tree into textual paths (`a::b::C`, `a::*`, `a::B as C`).
fn flatten_use_tree(tree: &syn::UseTree, prefix: &mut Vec<String>, out: &mut Vec<String>) {
    match tree {
        syn::UseTree::Path(p) => {
            prefix.push(p.ident.to_string());
            flatten_use_tree(&p.tree, prefix, out);
            prefix.pop();
        }
        syn::UseTree::Name(n) => {
            let mut parts = prefix.clone();
            parts.push(n.ident.to_string());
            out.push(parts.join("::"));
        }
        syn::UseTree::Rename(r) => {
            let mut parts = prefix.clone();
            parts.push(r.ident.to_string());
            out.push(format!("{} as {}", parts.join("::"), r.rename));
        }
        syn::UseTree::Glob(_) => {
            let mut parts = prefix.clone();
            parts.push("*".to_string());
            out.push(parts.join("::"));
        }
        syn::UseTree::Group(g) => {
            for item in &g.items {
                flatten_use_tree(item, prefix, out);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const VALID: &str = r#"
use routegen_runtime::{Method, Router};

use crate::handler;

pub fn new_router() -> Router {
    let r = Router::new();
    r.handle_func("/", Method::GET, handler::root);
    r.handle_func("/api/users", Method::GET, handler::list_users);
    r.handle_func("/api/users/:user_id", Method::get, handler::get_user);
    r.handle_not_found(handler::not_found);
    r.handle_method_not_allowed(handler::method_not_allowed);
    r
}
"#;

    fn analyze(src: &str) -> Result<Analysis, AnalyzeError> {
        analyze_source("router.rs", src)
    }

    #[test]
    fn extracts_imports_local_and_fallbacks() {
        let analysis = analyze(VALID).unwrap();
        assert_eq!(
            analysis.meta.imports,
            vec![
                "routegen_runtime::Method",
                "routegen_runtime::Router",
                "crate::handler",
            ]
        );
        assert_eq!(analysis.meta.router_local, "r");
        assert_eq!(analysis.meta.not_found.qualified(), "handler::not_found");
        assert_eq!(
            analysis.meta.method_not_allowed.qualified(),
            "handler::method_not_allowed"
        );
    }

    #[test]
    fn extracts_routes_into_the_tree() {
        let analysis = analyze(VALID).unwrap();
        // root, api, users, user_id
        assert_eq!(analysis.tree.node_count(), 4);
        let mut params = 0;
        analysis.tree.walk(analysis.tree.root(), |_, node| {
            if node.is_param {
                params += 1;
                assert_eq!(node.segment, "user_id");
            }
            true
        });
        assert_eq!(params, 1);
    }

    #[test]
    fn method_casing_is_normalized() {
        let analysis = analyze(VALID).unwrap();
        let mut found = false;
        analysis.tree.walk(analysis.tree.root(), |_, node| {
            if node.segment == "user_id" {
                assert!(node.handler(Method::GET).is_some());
                found = true;
            }
            true
        });
        assert!(found);
    }

    #[test]
    fn rejects_wrong_constructor_name() {
        let src = VALID.replace("fn new_router", "fn build_router");
        let err = analyze(&src).unwrap_err();
        assert!(matches!(err, AnalyzeError::WrongConstructor { .. }), "{err}");
    }

    #[test]
    fn rejects_missing_constructor() {
        let err = analyze("use crate::handler;\n").unwrap_err();
        assert!(matches!(err, AnalyzeError::MissingConstructor { .. }), "{err}");
    }

    #[test]
    fn rejects_unknown_directive() {
        let src = VALID.replace(
            "r.handle_not_found(handler::not_found);",
            "r.handle_missing(handler::not_found);\n    r.handle_not_found(handler::not_found);",
        );
        let err = analyze(&src).unwrap_err();
        match err {
            AnalyzeError::UnknownDirective { name, .. } => assert_eq!(name, "handle_missing"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_duplicate_fallback_registrations() {
        let src = VALID.replace(
            "r.handle_not_found(handler::not_found);",
            "r.handle_not_found(handler::not_found);\n    r.handle_not_found(handler::other);",
        );
        let err = analyze(&src).unwrap_err();
        assert!(matches!(
            err,
            AnalyzeError::DuplicateFallback {
                directive: "handle_not_found",
                ..
            }
        ));
    }

    #[test]
    fn rejects_missing_fallback_registrations() {
        let src = VALID.replace("r.handle_not_found(handler::not_found);", "");
        let err = analyze(&src).unwrap_err();
        assert!(matches!(
            err,
            AnalyzeError::MissingFallback {
                directive: "handle_not_found",
                ..
            }
        ));
    }

    #[test]
    fn rejects_unrecognized_method_token() {
        let src = VALID.replace("Method::GET, handler::root", "Method::BREW, handler::root");
        let err = analyze(&src).unwrap_err();
        match err {
            AnalyzeError::UnknownMethod { token, .. } => assert_eq!(token, "BREW"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_non_literal_route_path() {
        let src = VALID.replace(r#"r.handle_func("/","#, "r.handle_func(root_path,");
        let err = analyze(&src).unwrap_err();
        assert!(matches!(err, AnalyzeError::RoutePathShape { .. }), "{err}");
    }

    #[test]
    fn rejects_wrong_argument_count() {
        let src = VALID.replace(
            r#"r.handle_func("/", Method::GET, handler::root);"#,
            r#"r.handle_func("/", Method::GET);"#,
        );
        let err = analyze(&src).unwrap_err();
        assert!(matches!(
            err,
            AnalyzeError::ArgCount {
                directive: "handle_func",
                want: 3,
                got: 2,
                ..
            }
        ));
    }

    #[test]
    fn rejects_closure_handlers() {
        let src = VALID.replace("handler::root", "|w, r| {}");
        let err = analyze(&src).unwrap_err();
        assert!(matches!(err, AnalyzeError::HandlerShape { .. }), "{err}");
    }

    #[test]
    fn ignores_calls_on_other_receivers() {
        let src = VALID.replace(
            "let r = Router::new();",
            "let logger = Logger::new();\n    logger.handle_func(1, 2, 3);\n    let r = Router::new();",
        );
        // `logger` is not the router local, so its calls are not directives.
        assert!(analyze(&src).is_ok());
    }

    #[test]
    fn parse_errors_carry_positions() {
        let err = analyze("fn new_router( {").unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("router.rs:"), "{msg}");
    }

    #[test]
    fn bare_handler_references_have_no_namespace() {
        let src = VALID.replace("handler::not_found", "not_found");
        let analysis = analyze(&src).unwrap();
        assert_eq!(analysis.meta.not_found.namespace, None);
        assert_eq!(analysis.meta.not_found.name, "not_found");
    }

    #[test]
    fn flattens_grouped_and_renamed_imports() {
        let src = r#"
use std::collections::{HashMap, HashSet};
use crate::handler as h;
use crate::api::*;
use routegen_runtime::{Method, Router};

pub fn new_router() -> Router {
    let r = Router::new();
    r.handle_not_found(h::not_found);
    r.handle_method_not_allowed(h::method_not_allowed);
    r
}
"#;
        let analysis = analyze(src).unwrap();
        assert_eq!(
            analysis.meta.imports,
            vec![
                "std::collections::HashMap",
                "std::collections::HashSet",
                "crate::handler as h",
                "crate::api::*",
                "routegen_runtime::Method",
                "routegen_runtime::Router",
            ]
        );
    }
}
