//! Prefixed route groups.

use crate::error::Result;
use crate::http::handler::Handler;
use crate::http::middleware::Middleware;
use crate::routing::router::Router;
use crate::routing::scope::Scope;

/// A set of routes sharing a prefix and a middleware stack.
///
/// Created by [`Router::group`] or [`Router::with`]. A group writes into its
/// root's engine but keeps its own middleware list: nothing added to the
/// parent, a sibling or a child after creation reaches it.
#[derive(Debug)]
pub struct Group {
    scope: Scope,
}

impl Group {
    pub(crate) fn new(scope: Scope) -> Self {
        Self { scope }
    }

    /// The joined prefix of this group.
    pub fn prefix(&self) -> &str {
        self.scope.prefix()
    }
}

impl Router for Group {
    fn handle(&self, pattern: &str, handler: Handler) -> Result<()> {
        self.scope.register(pattern, handler)
    }

    fn use_middleware<I, M>(&mut self, middleware: I) -> Result<()>
    where
        I: IntoIterator<Item = M>,
        M: Into<Option<Middleware>>,
    {
        self.scope.append(middleware)
    }

    fn group(&self, prefix: &str) -> Result<Group> {
        self.scope.branch(prefix).map(Group::new)
    }
}
