//! Behavioral tests against the generated dispatcher, table-driven the same
//! way the service itself would be tested.

use routegen_runtime::{Method, Request, Response};
use userapi::router_gen::new_router;

struct Case {
    name: &'static str,
    method: Method,
    path: &'static str,
    want_status: u16,
    want_body: &'static str,
}

fn dispatch(method: Method, path: &str) -> Response {
    let router = new_router();
    let request = Request::new(method, path);
    let mut response = Response::new();
    router.serve(&mut response, &request);
    response
}

#[test]
fn routes_reach_their_handlers() {
    let cases = [
        Case {
            name: "/ [get]",
            method: Method::GET,
            path: "/",
            want_status: 200,
            want_body: "get root",
        },
        Case {
            name: "/api [get]",
            method: Method::GET,
            path: "/api",
            want_status: 200,
            want_body: "get api root",
        },
        Case {
            name: "/api/users [get]",
            method: Method::GET,
            path: "/api/users",
            want_status: 200,
            want_body: "get users",
        },
        Case {
            name: "/api/users/create [post]",
            method: Method::POST,
            path: "/api/users/create",
            want_status: 200,
            want_body: "create user",
        },
        Case {
            name: "/api/users/1 [get]",
            method: Method::GET,
            path: "/api/users/1",
            want_status: 200,
            want_body: "get user. user id: 1",
        },
        Case {
            name: "/api/users/1 [patch]",
            method: Method::PATCH,
            path: "/api/users/1",
            want_status: 200,
            want_body: "update user. user id: 1",
        },
        Case {
            name: "/api/users/1 [delete]",
            method: Method::DELETE,
            path: "/api/users/1",
            want_status: 200,
            want_body: "delete user. user id: 1",
        },
        Case {
            name: "/api/users/1/posts [get]",
            method: Method::GET,
            path: "/api/users/1/posts",
            want_status: 200,
            want_body: "get posts. user id: 1",
        },
        Case {
            name: "/api/users/7/posts/42 [get]",
            method: Method::GET,
            path: "/api/users/7/posts/42",
            want_status: 200,
            want_body: "get post. user id: 7, post id: 42",
        },
    ];

    for case in cases {
        let got = dispatch(case.method, case.path);
        assert_eq!(got.status, case.want_status, "{}: status", case.name);
        assert_eq!(got.body, case.want_body, "{}: body", case.name);
    }
}

#[test]
fn unregistered_method_is_method_not_allowed() {
    let got = dispatch(Method::DELETE, "/");
    assert_eq!(got.status, 405);
    assert_eq!(got.body, "Method Not Allowed\n");

    let got = dispatch(Method::GET, "/api/users/create");
    assert_eq!(got.status, 405);
}

#[test]
fn unregistered_path_is_not_found() {
    let got = dispatch(Method::GET, "/unregistered/path");
    assert_eq!(got.status, 404);
    assert_eq!(got.body, "Not Found\n");

    let got = dispatch(Method::GET, "/api/unregistered");
    assert_eq!(got.status, 404);
}

#[test]
fn deeper_paths_than_any_route_are_not_found() {
    let got = dispatch(Method::GET, "/api/users/1/posts/2/extra");
    assert_eq!(got.status, 404);

    let got = dispatch(Method::GET, "/api/users/1/unknown");
    assert_eq!(got.status, 404);
}

#[test]
fn paths_are_normalized_before_dispatch() {
    let got = dispatch(Method::GET, "/api/users/");
    assert_eq!(got.status, 200);
    assert_eq!(got.body, "get users");

    let got = dispatch(Method::GET, "//api//users//3");
    assert_eq!(got.status, 200);
    assert_eq!(got.body, "get user. user id: 3");
}
