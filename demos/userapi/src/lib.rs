//! Example service compiled with routegen.
//!
//! `router` holds the declarative registrations against the marker API.
//! `router_gen` is the compiled dispatcher, produced by
//! `routegen -i demos/userapi/src/router.rs -o demos/userapi/src/router_gen.rs`.
//! Handlers are shared by both; only the generated router is actually served.

pub mod handler;
pub mod router;
pub mod router_gen;
