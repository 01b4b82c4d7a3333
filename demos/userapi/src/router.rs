//! Declarative route table, compiled by routegen into `router_gen`.

use routegen_runtime::{Method, Router};

use crate::handler;

pub fn new_router() -> Router {
    let r = Router::new();
    r.handle_func("/", Method::GET, handler::root);
    r.handle_func("/api", Method::GET, handler::api_root);
    r.handle_func("/api/users", Method::GET, handler::list_users);
    r.handle_func("/api/users/create", Method::POST, handler::create_user);
    r.handle_func("/api/users/:user_id", Method::GET, handler::get_user);
    r.handle_func("/api/users/:user_id", Method::PATCH, handler::update_user);
    r.handle_func("/api/users/:user_id", Method::DELETE, handler::delete_user);
    r.handle_func("/api/users/:user_id/posts", Method::GET, handler::list_posts);
    r.handle_func("/api/users/:user_id/posts/:post_id", Method::GET, handler::get_post);
    r.handle_not_found(handler::not_found);
    r.handle_method_not_allowed(handler::method_not_allowed);
    r
}
