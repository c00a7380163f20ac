//! Route table entries and match results.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use crate::error::Error;
use crate::handler::Context;

/// A function target invoked directly, without going through the handler
/// registry. Receives the request context and the positional parameters
/// extracted from the path.
pub type Callable = Arc<dyn Fn(&mut Context<'_>, &[String]) -> Result<(), Error> + Send + Sync>;

/// What a route dispatches to.
#[derive(Clone)]
pub enum Target {
    /// A named handler in the registry plus the action to invoke on it.
    Handler { name: String, action: String },
    /// A bare callable.
    Func(Callable),
}

impl Target {
    pub fn handler(name: impl Into<String>, action: impl Into<String>) -> Self {
        Target::Handler {
            name: name.into(),
            action: action.into(),
        }
    }

    pub fn func<F>(f: F) -> Self
    where
        F: Fn(&mut Context<'_>, &[String]) -> Result<(), Error> + Send + Sync + 'static,
    {
        Target::Func(Arc::new(f))
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Handler { name, action } => write!(f, "Handler({name}::{action})"),
            Target::Func(_) => write!(f, "Func"),
        }
    }
}

/// One registered route. Immutable once created; owned by the router's
/// ordered list.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    /// HTTP verb this route answers to; `None` matches every verb.
    pub(crate) verb: Option<Method>,
    /// The pattern as registered, before alias substitution.
    pub(crate) pattern: String,
    /// Namespace snapshot taken from the stack at registration time.
    pub(crate) namespace: Option<String>,
    pub(crate) target: Target,
    /// True for terminal routes: a match stops further table scanning.
    pub(crate) stop_on_match: bool,
}

/// A resolved route plus the parameters extracted from the path.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub namespace: Option<String>,
    pub target: Target,
    /// Positional parameters in capture order. A capture group that did
    /// not participate contributes an empty string at its position.
    pub params: Vec<String>,
}

/// FIFO queue of matches produced by one dispatch pass: zero or more hook
/// matches followed by at most one terminal match. Drained once by the
/// dispatcher.
#[derive(Debug, Default)]
pub struct DispatchQueue {
    matches: VecDeque<MatchResult>,
}

impl DispatchQueue {
    pub(crate) fn enqueue(&mut self, result: MatchResult) {
        self.matches.push_back(result);
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

impl IntoIterator for DispatchQueue {
    type Item = MatchResult;
    type IntoIter = std::collections::vec_deque::IntoIter<MatchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter()
    }
}
