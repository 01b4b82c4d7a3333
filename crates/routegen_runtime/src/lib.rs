//! Marker API and runtime types for routegen-generated dispatch code.
//!
//! This crate has two halves:
//!
//! - [`Router`] is the *marker* API. Route declarations are written against it
//!   in `router.rs`, but every method is a no-op: the declarations exist to be
//!   read by the `routegen` compiler, never to run. The generated dispatcher
//!   replaces the marker router in the final build.
//! - [`Method`], [`Request`] and [`Response`] are the runtime vocabulary that
//!   handlers and generated code share. Generated code references these types;
//!   it never references [`Router`].

#![deny(clippy::unwrap_used)]

use std::fmt;

// ============================================================================
// Marker router
// ============================================================================

/// Declarative, do-nothing router the compiler reads route tables from.
///
/// Arguments are fully generic so any handler arity type-checks at the
/// declaration site; the compiler validates the shapes it actually supports.
#[derive(Debug, Default, Clone, Copy)]
pub struct Router;

impl Router {
    pub fn new() -> Router {
        Router
    }

    /// Declare a route: path pattern, method token, handler reference.
    pub fn handle_func<P, M, F>(&self, _path: P, _method: M, _handler: F) {}

    /// Declare the fallback invoked when no route matches the request path.
    pub fn handle_not_found<F>(&self, _handler: F) {}

    /// Declare the fallback invoked when the path matches but the method does not.
    pub fn handle_method_not_allowed<F>(&self, _handler: F) {}
}

// ============================================================================
// HTTP method vocabulary
// ============================================================================

/// The fixed set of HTTP method tokens route declarations may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
    HEAD,
    OPTIONS,
    CONNECT,
    TRACE,
}

impl Method {
    /// Every recognized method, in canonical order.
    pub const ALL: [Method; 9] = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::HEAD,
        Method::OPTIONS,
        Method::CONNECT,
        Method::TRACE,
    ];

    /// The canonical uppercase token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::CONNECT => "CONNECT",
            Method::TRACE => "TRACE",
        }
    }

    /// Parse a method token, ignoring case. `None` for unrecognized tokens.
    pub fn from_token(token: &str) -> Option<Method> {
        let upper = token.to_ascii_uppercase();
        Method::ALL.iter().copied().find(|m| m.as_str() == upper)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Request / response surface
// ============================================================================

/// Minimal inbound request the generated dispatcher routes on.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Request {
        Request {
            method,
            path: path.into(),
        }
    }
}

/// Minimal response handlers write into.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new() -> Response {
        Response {
            status: 200,
            body: String::new(),
        }
    }

    /// Append text to the response body.
    pub fn write_str(&mut self, s: &str) {
        self.body.push_str(s);
    }

    /// Replace the response with an error message and status, newline-terminated.
    pub fn error(&mut self, message: &str, status: u16) {
        self.status = status;
        self.body = format!("{message}\n");
    }
}

impl Default for Response {
    fn default() -> Response {
        Response::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn method_token_parsing_is_case_insensitive() {
        assert_eq!(Method::from_token("get"), Some(Method::GET));
        assert_eq!(Method::from_token("Get"), Some(Method::GET));
        assert_eq!(Method::from_token("DELETE"), Some(Method::DELETE));
        assert_eq!(Method::from_token("BREW"), None);
    }

    #[test]
    fn method_round_trips_through_canonical_token() {
        for m in Method::ALL {
            assert_eq!(Method::from_token(m.as_str()), Some(m));
        }
    }

    #[test]
    fn response_error_sets_status_and_body() {
        let mut w = Response::new();
        w.error("Not Found", 404);
        assert_eq!(w.status, 404);
        assert_eq!(w.body, "Not Found\n");
    }

    #[test]
    fn marker_router_accepts_any_handler_arity() {
        fn two(_w: &mut Response, _r: &Request) {}
        fn three(_w: &mut Response, _r: &Request, _id: &str) {}

        let r = Router::new();
        r.handle_func("/a", Method::GET, two);
        r.handle_func("/a/:id", Method::GET, three);
        r.handle_not_found(two);
        r.handle_method_not_allowed(two);
    }
}
