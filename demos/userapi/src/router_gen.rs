// Code generated by routegen -i demos/userapi/src/router.rs -o demos/userapi/src/router_gen.rs. DO NOT EDIT.

#![allow(dead_code, unused_variables, unreachable_patterns)]
use routegen_runtime::Method;
use crate::handler;
use routegen_runtime::Request;
use routegen_runtime::Response;
pub struct Router;
impl Router {
    pub fn serve(&self, w: &mut Response, r: &Request) {
        handle_base(w, r, &r.path);
    }
}
pub fn new_router() -> Router {
    let r = Router;
    r
}
fn handle_base(w: &mut Response, r: &Request, p: &str) {
    let (endpoint, tail) = separate_path(p, 3);
    let terminal = tail.is_empty() || tail == "/";
    match endpoint.as_str() {
        "/" if terminal => match r.method {
            Method::GET => handler::root(w, r),
            _ => handler::method_not_allowed(w, r),
        },
        "/api" if terminal => match r.method {
            Method::GET => handler::api_root(w, r),
            _ => handler::method_not_allowed(w, r),
        },
        "/api/users" if terminal => match r.method {
            Method::GET => handler::list_users(w, r),
            _ => handler::method_not_allowed(w, r),
        },
        "/api/users/create" if terminal => match r.method {
            Method::POST => handler::create_user(w, r),
            _ => handler::method_not_allowed(w, r),
        },
        _ => {
            let (base, value) = separate_path(&endpoint, 2);
            if base == "/api/users" && value.len() > 1 {
                let user_id = &value[1..];
                handle_user_id(w, r, &tail, user_id);
            } else {
                handler::not_found(w, r);
            }
        }
    }
}
fn handle_user_id(w: &mut Response, r: &Request, p: &str, user_id: &str) {
    let (endpoint, tail) = separate_path(p, 2);
    let terminal = tail.is_empty() || tail == "/";
    match endpoint.as_str() {
        "/" if terminal => match r.method {
            Method::GET => handler::get_user(w, r, user_id),
            Method::PATCH => handler::update_user(w, r, user_id),
            Method::DELETE => handler::delete_user(w, r, user_id),
            _ => handler::method_not_allowed(w, r),
        },
        "/posts" if terminal => match r.method {
            Method::GET => handler::list_posts(w, r, user_id),
            _ => handler::method_not_allowed(w, r),
        },
        _ => {
            let (base, value) = separate_path(&endpoint, 1);
            if base == "/posts" && value.len() > 1 {
                let post_id = &value[1..];
                handle_post_id(w, r, &tail, user_id, post_id);
            } else {
                handler::not_found(w, r);
            }
        }
    }
}
fn handle_post_id(w: &mut Response, r: &Request, p: &str, user_id: &str, post_id: &str) {
    let (endpoint, tail) = separate_path(p, 0);
    let terminal = tail.is_empty() || tail == "/";
    match endpoint.as_str() {
        "/" if terminal => match r.method {
            Method::GET => handler::get_post(w, r, user_id, post_id),
            _ => handler::method_not_allowed(w, r),
        },
        _ => handler::not_found(w, r),
    }
}
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
