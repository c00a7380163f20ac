//! Application entry point: wiring and per-request orchestration.
//!
//! # Responsibilities
//! - Own settings, route table, handler registry and session store
//! - Run the per-request pipeline: session open → dispatch → queue drain
//!   → error rendering → session persist
//! - Serve over HTTP
//!
//! # Design Decisions
//! - Everything is registered during construction; after that the App is
//!   immutable and shared behind an Arc
//! - The router never touches the response; this layer translates errors
//!   into environment-aware pages
//! - Not-found logs at info, configuration errors at error

use std::sync::Arc;

use tokio::net::TcpListener;
use uuid::Uuid;

use crate::config::Settings;
use crate::error::Error;
use crate::handler::{Context, Dispatcher, HandlerRegistry};
use crate::http::{HttpServer, Request, Response};
use crate::routing::Router;
use crate::storage::{Session, SessionStore};

/// A configured application.
pub struct App {
    settings: Settings,
    router: Router,
    registry: HandlerRegistry,
    sessions: SessionStore,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let sessions = SessionStore::new(settings.session.clone());
        Self {
            settings,
            router: Router::new(),
            registry: HandlerRegistry::new(),
            sessions,
        }
    }

    /// Register routes. Builder-style: call during construction.
    pub fn routes(mut self, configure: impl FnOnce(&mut Router)) -> Self {
        configure(&mut self.router);
        self
    }

    /// Register handlers. Builder-style: call during construction.
    pub fn handlers(mut self, configure: impl FnOnce(&mut HandlerRegistry)) -> Self {
        configure(&mut self.registry);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn session_store(&self) -> &SessionStore {
        &self.sessions
    }

    /// Run one request through the framework: pure routing, queue
    /// execution, error translation. Sync and side-effect free outside
    /// the session store.
    pub fn handle(&self, request: Request) -> Response {
        let mut session = self.open_session(&request);
        let mut response = Response::new();

        let outcome = self
            .router
            .dispatch(request.method(), request.path())
            .and_then(|queue| {
                let mut cx = Context {
                    request: &request,
                    response: &mut response,
                    settings: &self.settings,
                    session: &mut session,
                };
                Dispatcher::new(&self.registry).run(queue, &mut cx)
            });

        if let Err(error) = outcome {
            response = self.render_error(&error, &request);
        }

        self.sessions.persist(&session);
        self.attach_session_cookie(&mut response, &session, &request);
        response
    }

    /// Serve over HTTP until shutdown.
    pub async fn serve(self, listener: TcpListener) -> Result<(), std::io::Error> {
        crate::observability::logging::init(&self.settings.log);
        HttpServer::new(Arc::new(self)).run(listener).await
    }

    fn open_session(&self, request: &Request) -> Session {
        let identity = format!(
            "{}|{}",
            request.client_ip(),
            request.user_agent().unwrap_or_default()
        );
        let cookie_id = request
            .cookie(&self.settings.session.name)
            .and_then(|raw| Uuid::parse_str(raw).ok());

        let mut session = self.sessions.open(cookie_id, &identity);

        // Fixation hardening: full page loads get a new id, AJAX calls
        // keep theirs so parallel requests stay coherent.
        if !session.is_fresh() && !request.is_xhr() {
            session.regenerate_id();
        }
        session
    }

    fn attach_session_cookie(&self, response: &mut Response, session: &Session, request: &Request) {
        let config = &self.settings.session;
        let mut cookie = format!(
            "{}={}; Path={}; HttpOnly; SameSite=Lax",
            config.name,
            session.id(),
            config.cookie_path
        );
        if let Some(domain) = &config.cookie_domain {
            cookie.push_str("; Domain=");
            cookie.push_str(domain);
        }
        if config.lifetime_secs > 0 {
            cookie.push_str(&format!("; Max-Age={}", config.lifetime_secs));
        }
        if request.is_secure() {
            cookie.push_str("; Secure");
        }
        response.add_header("set-cookie", &cookie);
    }

    /// Translate a dispatch error into a response. Bodies are verbose in
    /// development and generic in production.
    fn render_error(&self, error: &Error, request: &Request) -> Response {
        let status = error.status();

        if error.is_server_error() {
            tracing::error!(%error, status = status.as_u16(), path = %request.path(), "request failed");
        } else {
            tracing::info!(%error, status = status.as_u16(), path = %request.path(), "request not served");
        }

        let message = if request.is_development() {
            error.to_string()
        } else {
            status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string()
        };

        let mut response = Response::new();
        response.set_status(status);
        response.set_type("html");
        response.set_body(format!(
            "<!DOCTYPE html><html><head><title>{code} {reason}</title></head>\
             <body><h1>{code} {reason}</h1><p>{message}</p></body></html>",
            code = status.as_u16(),
            reason = status.canonical_reason().unwrap_or(""),
            message = message,
        ));
        response.finish();
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Target;
    use axum::http::{Method, StatusCode};

    fn app() -> App {
        App::new(Settings::default())
            .routes(|r| {
                r.alias("num", "[0-9]+");
                r.get(
                    "/users/:num",
                    Target::func(|cx, params| {
                        cx.response.set_type("text");
                        cx.response.set_body(format!("user {}", params[0]));
                        Ok(())
                    }),
                );
                r.get(
                    "/boom",
                    Target::func(|_, _| Err(Error::app(500, "kaboom"))),
                );
                r.get("/ghost", Target::handler("Ghost", "show"));
            })
    }

    fn get(app: &App, path: &str) -> Response {
        let request = Request::builder().method(Method::GET).path(path).build();
        app.handle(request)
    }

    #[test]
    fn matched_route_runs_the_handler() {
        let app = app();
        let response = get(&app, "/users/17");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body_text(), "user 17");
    }

    #[test]
    fn unmatched_route_renders_404() {
        let app = app();
        let response = get(&app, "/users/abc");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn development_errors_are_verbose() {
        let app = app();
        let response = get(&app, "/boom");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.body_text().contains("kaboom"));
    }

    #[test]
    fn production_errors_are_generic() {
        let app = app();
        let request = Request::builder()
            .method(Method::GET)
            .path("/boom")
            .remote_addr("203.0.113.9".parse().unwrap())
            .build();
        let response = app.handle(request);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!response.body_text().contains("kaboom"));
    }

    #[test]
    fn unregistered_handler_maps_to_500() {
        let app = app();
        let response = get(&app, "/ghost");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn every_response_carries_a_session_cookie() {
        let app = app();
        let response = get(&app, "/users/1");
        let cookie = response.header("set-cookie").unwrap();
        assert!(cookie.starts_with("gantry_sid="));
        assert!(cookie.contains("HttpOnly"));
    }

    #[test]
    fn session_survives_across_requests() {
        let app = App::new(Settings::default()).routes(|r| {
            r.get(
                "/count",
                Target::func(|cx, _| {
                    let n: u64 = cx.session.get("n").unwrap_or(0);
                    cx.session.set("n", n + 1);
                    cx.response.set_body(format!("{}", n + 1));
                    Ok(())
                }),
            );
        });

        let first = get(&app, "/count");
        assert_eq!(first.body_text(), "1");

        let cookie = first.header("set-cookie").unwrap();
        let sid = cookie
            .split(';')
            .next()
            .and_then(|kv| kv.split_once('='))
            .map(|(_, v)| v.to_string())
            .unwrap();

        let request = Request::builder()
            .method(Method::GET)
            .path("/count")
            .header("cookie", &format!("gantry_sid={sid}"))
            .build();
        let second = app.handle(request);
        assert_eq!(second.body_text(), "2");
    }
}
