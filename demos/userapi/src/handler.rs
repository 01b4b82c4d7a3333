//! Request handlers for the user API.

use routegen_runtime::{Request, Response};

pub fn root(w: &mut Response, _r: &Request) {
    w.write_str("get root");
}

pub fn api_root(w: &mut Response, _r: &Request) {
    w.write_str("get api root");
}

pub fn list_users(w: &mut Response, _r: &Request) {
    w.write_str("get users");
}

pub fn create_user(w: &mut Response, _r: &Request) {
    w.write_str("create user");
}

pub fn get_user(w: &mut Response, _r: &Request, user_id: &str) {
    w.write_str(&format!("get user. user id: {user_id}"));
}

pub fn update_user(w: &mut Response, _r: &Request, user_id: &str) {
    w.write_str(&format!("update user. user id: {user_id}"));
}

pub fn delete_user(w: &mut Response, _r: &Request, user_id: &str) {
    w.write_str(&format!("delete user. user id: {user_id}"));
}

pub fn list_posts(w: &mut Response, _r: &Request, user_id: &str) {
    w.write_str(&format!("get posts. user id: {user_id}"));
}

pub fn get_post(w: &mut Response, _r: &Request, user_id: &str, post_id: &str) {
    w.write_str(&format!("get post. user id: {user_id}, post id: {post_id}"));
}

pub fn not_found(w: &mut Response, _r: &Request) {
    w.error("Not Found", 404);
}

pub fn method_not_allowed(w: &mut Response, _r: &Request) {
    w.error("Method Not Allowed", 405);
}
