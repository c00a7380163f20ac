//! Route registration and dispatch.
//!
//! # Responsibilities
//! - Own the alias table, namespace stack and ordered route list
//! - Per-verb registration plus hook/middleware registration
//! - Walk the table for an incoming verb + path and produce the dispatch
//!   queue
//!
//! # Design Decisions
//! - Registration happens during startup; `dispatch` takes `&self` and is
//!   a pure function of (table, verb, path), so one router serves
//!   concurrent requests without locks
//! - First match wins: a terminal match stops the scan; hook matches
//!   accumulate in registration order ahead of it
//! - Non-matches are skipped silently; malformed patterns surface as
//!   configuration errors instead of turning into silent 404s

use axum::http::Method;

use crate::error::Error;
use crate::routing::alias::AliasTable;
use crate::routing::namespace::NamespaceStack;
use crate::routing::pattern::match_pattern;
use crate::routing::route::{DispatchQueue, MatchResult, RouteEntry, Target};

/// The route table: registration API plus the matching algorithm.
#[derive(Debug, Default)]
pub struct Router {
    aliases: AliasTable,
    namespaces: NamespaceStack,
    routes: Vec<RouteEntry>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            aliases: AliasTable::new(),
            namespaces: NamespaceStack::new(),
            routes: Vec::new(),
        }
    }

    /// Define a pattern alias, e.g. `alias("num", "[0-9]+")` lets routes
    /// use `:num`.
    pub fn alias(&mut self, needle: &str, fragment: &str) {
        self.aliases.define(needle, fragment);
    }

    /// Alias of [`Router::alias`], kept for callers that think of aliases
    /// as route parameters.
    pub fn param(&mut self, needle: &str, fragment: &str) {
        self.alias(needle, fragment);
    }

    /// Routes registered after this call resolve their handler names under
    /// `namespace` until the matching [`Router::pop_namespace`].
    pub fn push_namespace(&mut self, namespace: &str) {
        self.namespaces.push(namespace);
    }

    /// Leave the innermost namespace. A no-op when no namespace is active.
    pub fn pop_namespace(&mut self) -> Option<String> {
        self.namespaces.pop()
    }

    /// Register a route. `verb: None` answers every HTTP method. The
    /// namespace bound to the entry is snapshotted from the stack now, not
    /// at dispatch time.
    pub fn add(&mut self, verb: Option<Method>, pattern: &str, target: Target, stop_on_match: bool) {
        self.routes.push(RouteEntry {
            verb,
            pattern: pattern.to_string(),
            namespace: self.namespaces.current().map(str::to_string),
            target,
            stop_on_match,
        });
    }

    pub fn get(&mut self, pattern: &str, target: Target) {
        self.add(Some(Method::GET), pattern, target, true);
    }

    pub fn post(&mut self, pattern: &str, target: Target) {
        self.add(Some(Method::POST), pattern, target, true);
    }

    pub fn put(&mut self, pattern: &str, target: Target) {
        self.add(Some(Method::PUT), pattern, target, true);
    }

    pub fn delete(&mut self, pattern: &str, target: Target) {
        self.add(Some(Method::DELETE), pattern, target, true);
    }

    /// Register a terminal route answering every HTTP method.
    pub fn all(&mut self, pattern: &str, target: Target) {
        self.add(None, pattern, target, true);
    }

    /// Register a non-terminal route: on a match the target is enqueued
    /// and scanning continues, enabling hook chains ahead of a terminal
    /// route.
    pub fn hook(&mut self, pattern: &str, target: Target) {
        self.add(None, pattern, target, false);
    }

    /// Alias of [`Router::hook`].
    pub fn middleware(&mut self, pattern: &str, target: Target) {
        self.hook(pattern, target);
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Walk the table in registration order and collect the dispatch queue
    /// for `method` + `path`.
    ///
    /// The path is normalized first: trailing slashes are stripped except
    /// for the root. Entries for other verbs are skipped; non-matching
    /// patterns are tried-and-passed; the first terminal match ends the
    /// scan. An exhausted table yields [`Error::NotFound`].
    pub fn dispatch(&self, method: &Method, path: &str) -> Result<DispatchQueue, Error> {
        let path = normalize_path(path);
        let mut queue = DispatchQueue::default();

        tracing::debug!(method = %method, path = %path, routes = self.routes.len(), "route match attempt");

        for entry in &self.routes {
            if let Some(verb) = &entry.verb {
                if verb != method {
                    continue;
                }
            }

            let Some(params) = match_pattern(&entry.pattern, &path, &self.aliases)? else {
                continue;
            };

            tracing::debug!(
                pattern = %entry.pattern,
                params = ?params,
                terminal = entry.stop_on_match,
                "route matched"
            );

            queue.enqueue(MatchResult {
                namespace: entry.namespace.clone(),
                target: entry.target.clone(),
                params,
            });

            if entry.stop_on_match {
                break;
            }
        }

        if queue.is_empty() {
            return Err(Error::NotFound {
                method: method.clone(),
                path,
            });
        }

        Ok(queue)
    }
}

/// Strip trailing slashes, keeping the root path intact.
fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}
