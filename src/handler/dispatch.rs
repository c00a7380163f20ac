//! Queue execution: turn match results into handler calls.
//!
//! # Responsibilities
//! - Drain the dispatch queue in enqueued order
//! - Resolve namespace-qualified handler names through the registry
//! - Verify the capability contract (handler exists, action exists)
//! - Invoke with positional parameters
//!
//! # Design Decisions
//! - An unresolvable handler or missing action is a configuration error,
//!   not a 404: the route table matched, so the deployment is broken
//! - Hooks run fire-and-continue; the only way to cut the chain short is
//!   finishing the response or returning an error

use crate::error::Error;
use crate::handler::registry::HandlerRegistry;
use crate::handler::Context;
use crate::routing::route::{DispatchQueue, MatchResult, Target};

/// Executes the matches produced by one routing pass.
pub struct Dispatcher<'a> {
    registry: &'a HandlerRegistry,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a HandlerRegistry) -> Self {
        Self { registry }
    }

    /// Run every queued match in order. Stops early when a previous entry
    /// finished the response (redirect, error page, file send).
    pub fn run(&self, queue: DispatchQueue, cx: &mut Context<'_>) -> Result<(), Error> {
        for matched in queue {
            if cx.response.is_finished() {
                tracing::debug!("response finished, skipping remaining queue entries");
                break;
            }
            self.invoke(matched, cx)?;
        }
        Ok(())
    }

    fn invoke(&self, matched: MatchResult, cx: &mut Context<'_>) -> Result<(), Error> {
        match matched.target {
            Target::Func(func) => {
                tracing::debug!(params = ?matched.params, "invoking callable target");
                func(cx, &matched.params)
            }
            Target::Handler { name, action } => {
                let qualified = match &matched.namespace {
                    Some(ns) => format!("{ns}{name}"),
                    None => name.clone(),
                };

                tracing::debug!(handler = %qualified, action = %action, "invoking handler target");

                let mut handler =
                    self.registry
                        .build(&qualified)
                        .ok_or_else(|| Error::HandlerNotFound {
                            name: qualified.clone(),
                        })?;

                if !handler.actions().contains(&action.as_str()) {
                    return Err(Error::UnknownAction {
                        name: qualified,
                        action,
                    });
                }

                handler.call(&action, cx, &matched.params)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::handler::Handler;
    use crate::http::{Request, Response};
    use crate::routing::Router;
    use crate::storage::{Session, SessionStore};
    use axum::http::Method;

    struct Echo;

    impl Handler for Echo {
        fn actions(&self) -> &'static [&'static str] {
            &["show"]
        }

        fn call(&mut self, _: &str, cx: &mut Context<'_>, params: &[String]) -> Result<(), Error> {
            cx.response.set_body(params.join(","));
            Ok(())
        }
    }

    fn run_queue(
        router: &Router,
        registry: &HandlerRegistry,
        method: Method,
        path: &str,
    ) -> Result<Response, Error> {
        let request = Request::builder().method(method).path(path).build();
        let mut response = Response::new();
        let settings = Settings::default();
        let store = SessionStore::new(settings.session.clone());
        let mut session: Session = store.open(None, "test");

        let queue = router.dispatch(request.method(), request.path())?;
        let mut cx = Context {
            request: &request,
            response: &mut response,
            settings: &settings,
            session: &mut session,
        };
        Dispatcher::new(registry).run(queue, &mut cx)?;
        Ok(response)
    }

    #[test]
    fn named_handler_receives_params() {
        let mut router = Router::new();
        router.alias("num", "[0-9]+");
        router.get("/e/:num", Target::handler("Echo", "show"));

        let mut registry = HandlerRegistry::new();
        registry.register("Echo", || Box::new(Echo));

        let response = run_queue(&router, &registry, Method::GET, "/e/41").unwrap();
        assert_eq!(response.body_text(), "41");
    }

    #[test]
    fn unregistered_handler_is_a_configuration_error() {
        let mut router = Router::new();
        router.get("/x", Target::handler("Ghost", "show"));

        let registry = HandlerRegistry::new();
        let err = run_queue(&router, &registry, Method::GET, "/x").unwrap_err();
        assert!(matches!(err, Error::HandlerNotFound { .. }));
    }

    #[test]
    fn unknown_action_is_a_configuration_error() {
        let mut router = Router::new();
        router.get("/x", Target::handler("Echo", "missing"));

        let mut registry = HandlerRegistry::new();
        registry.register("Echo", || Box::new(Echo));

        let err = run_queue(&router, &registry, Method::GET, "/x").unwrap_err();
        assert!(matches!(err, Error::UnknownAction { .. }));
    }

    #[test]
    fn namespaced_route_resolves_qualified_name() {
        let mut router = Router::new();
        router.push_namespace("admin");
        router.get("/x", Target::handler("Echo", "show"));
        router.pop_namespace();

        let mut registry = HandlerRegistry::new();
        registry.register("admin::Echo", || Box::new(Echo));

        assert!(run_queue(&router, &registry, Method::GET, "/x").is_ok());

        // The same route registered outside the namespace must not reach
        // the qualified binding.
        let mut bare = Router::new();
        bare.get("/x", Target::handler("Echo", "show"));
        let err = run_queue(&bare, &registry, Method::GET, "/x").unwrap_err();
        assert!(matches!(err, Error::HandlerNotFound { .. }));
    }

    #[test]
    fn hook_chain_runs_in_order() {
        let mut router = Router::new();
        router.hook(
            "*",
            Target::func(|cx, _| {
                cx.response.set_header("x-audit", "1");
                Ok(())
            }),
        );
        router.get(
            "/page",
            Target::func(|cx, _| {
                cx.response.set_body("terminal");
                Ok(())
            }),
        );

        let registry = HandlerRegistry::new();
        let response = run_queue(&router, &registry, Method::GET, "/page").unwrap();
        assert_eq!(response.header("x-audit"), Some("1"));
        assert_eq!(response.body_text(), "terminal");
    }

    #[test]
    fn finished_response_cuts_the_chain() {
        let mut router = Router::new();
        router.hook(
            "*",
            Target::func(|cx, _| {
                cx.response.redirect("/login", 302);
                Ok(())
            }),
        );
        router.get(
            "/secret",
            Target::func(|cx, _| {
                cx.response.set_body("should never run");
                Ok(())
            }),
        );

        let registry = HandlerRegistry::new();
        let response = run_queue(&router, &registry, Method::GET, "/secret").unwrap();
        assert_eq!(response.status().as_u16(), 302);
        assert_eq!(response.body_text(), "");
    }
}
