//! End-to-end routing properties driven through the public API.

use axum::http::{Method, StatusCode};
use gantry::error::Error;
use gantry::routing::Target;
use gantry::{App, Context, Handler, Request, Response, Settings};

/// A user controller with one action, mirroring the typical registration
/// shape of an application.
struct UserHandler;

impl Handler for UserHandler {
    fn actions(&self) -> &'static [&'static str] {
        &["show", "index"]
    }

    fn call(&mut self, action: &str, cx: &mut Context<'_>, params: &[String]) -> Result<(), Error> {
        match action {
            "show" => {
                cx.response.set_type("text");
                cx.response.set_body(format!("show:{}", params[0]));
                Ok(())
            }
            "index" => {
                cx.response.set_body("index");
                Ok(())
            }
            other => Err(Error::UnknownAction {
                name: "UserHandler".into(),
                action: other.into(),
            }),
        }
    }
}

fn get(app: &App, path: &str) -> Response {
    dispatch(app, Method::GET, path)
}

fn dispatch(app: &App, method: Method, path: &str) -> Response {
    let request = Request::builder().method(method).path(path).build();
    app.handle(request)
}

#[test]
fn end_to_end_user_route() {
    let app = App::new(Settings::default())
        .routes(|r| {
            r.alias("id", "[0-9]+");
            r.get("/users/:id", Target::handler("UserHandler", "show"));
        })
        .handlers(|h| {
            h.register("UserHandler", || Box::new(UserHandler));
        });

    let ok = get(&app, "/users/17");
    assert_eq!(ok.status(), StatusCode::OK);
    assert_eq!(ok.body_text(), "show:17");

    let bad_param = get(&app, "/users/abc");
    assert_eq!(bad_param.status(), StatusCode::NOT_FOUND);

    let wrong_verb = dispatch(&app, Method::POST, "/users/17");
    assert_eq!(wrong_verb.status(), StatusCode::NOT_FOUND);
}

#[test]
fn exact_match_beats_alias_definitions() {
    let app = App::new(Settings::default()).routes(|r| {
        r.alias("anything", ".+");
        r.get(
            "/",
            Target::func(|cx, params| {
                assert!(params.is_empty());
                cx.response.set_body("root");
                Ok(())
            }),
        );
    });

    assert_eq!(get(&app, "/").body_text(), "root");
}

#[test]
fn wildcard_route_catches_everything() {
    let app = App::new(Settings::default()).routes(|r| {
        r.all(
            "*",
            Target::func(|cx, params| {
                assert!(params.is_empty());
                cx.response.set_body("caught");
                Ok(())
            }),
        );
    });

    assert_eq!(get(&app, "/deep/nested/path").body_text(), "caught");
    assert_eq!(dispatch(&app, Method::PUT, "/other").body_text(), "caught");
}

#[test]
fn first_match_wins_across_overlapping_routes() {
    let app = App::new(Settings::default()).routes(|r| {
        r.alias("num", "[0-9]+");
        r.get("/item/:num", Target::func(|cx, _| {
            cx.response.set_body("first");
            Ok(())
        }));
        r.get("/item/:num", Target::func(|cx, _| {
            cx.response.set_body("second");
            Ok(())
        }));
    });

    assert_eq!(get(&app, "/item/3").body_text(), "first");
}

#[test]
fn hooks_run_before_the_terminal_route_in_order() {
    let app = App::new(Settings::default()).routes(|r| {
        r.hook(
            "*",
            Target::func(|cx, _| {
                cx.response.set_header("x-first", "yes");
                Ok(())
            }),
        );
        r.hook(
            "/page",
            Target::func(|cx, _| {
                // The first hook must already have run.
                assert_eq!(cx.response.header("x-first"), Some("yes"));
                cx.response.set_header("x-second", "yes");
                Ok(())
            }),
        );
        r.get(
            "/page",
            Target::func(|cx, _| {
                cx.response.set_body("terminal");
                Ok(())
            }),
        );
    });

    let response = get(&app, "/page");
    assert_eq!(response.header("x-first"), Some("yes"));
    assert_eq!(response.header("x-second"), Some("yes"));
    assert_eq!(response.body_text(), "terminal");
}

#[test]
fn namespace_scoping_resolves_and_fails_as_registered() {
    let app = App::new(Settings::default())
        .routes(|r| {
            r.push_namespace("admin");
            r.get("/admin/users", Target::handler("UserHandler", "index"));
            r.pop_namespace();
            // Same handler name, registered unqualified: not in the
            // registry, so dispatching it is a configuration error.
            r.get("/users", Target::handler("UserHandler", "index"));
        })
        .handlers(|h| {
            h.register("admin::UserHandler", || Box::new(UserHandler));
        });

    assert_eq!(get(&app, "/admin/users").status(), StatusCode::OK);
    assert_eq!(
        get(&app, "/users").status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn not_found_on_empty_table_for_any_input() {
    let app = App::new(Settings::default());

    for path in ["/", "/a", "/a/b/c"] {
        for method in [Method::GET, Method::POST, Method::DELETE] {
            let response = dispatch(&app, method.clone(), path);
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }
    }
}

#[test]
fn dispatch_outcomes_are_repeatable() {
    let app = App::new(Settings::default())
        .routes(|r| {
            r.alias("id", "[0-9]+");
            r.get("/users/:id", Target::handler("UserHandler", "show"));
        })
        .handlers(|h| {
            h.register("UserHandler", || Box::new(UserHandler));
        });

    let first = get(&app, "/users/8");
    let second = get(&app, "/users/8");
    assert_eq!(first.status(), second.status());
    assert_eq!(first.body_text(), second.body_text());
}

#[test]
fn malformed_alias_surfaces_pattern_error() {
    let app = App::new(Settings::default()).routes(|r| {
        r.alias("broken", "[0-9");
        r.get("/x/:broken", Target::func(|_, _| Ok(())));
    });

    // A deployment bug, not a 404.
    assert_eq!(
        get(&app, "/x/1").status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn hook_redirect_short_circuits_the_terminal_route() {
    let app = App::new(Settings::default()).routes(|r| {
        r.hook(
            "/members",
            Target::func(|cx, _| {
                cx.response.redirect("/login", 302);
                Ok(())
            }),
        );
        r.get(
            "/members",
            Target::func(|cx, _| {
                cx.response.set_body("members area");
                Ok(())
            }),
        );
    });

    let response = get(&app, "/members");
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.header("location"), Some("/login"));
    assert_eq!(response.body_text(), "");
}
