//! State and behaviour shared by the root router and groups.

use tracing::debug;

use crate::error::{Error, Result};
use crate::http::handler::Handler;
use crate::http::middleware::{wrap, Middleware};
use crate::routing::engine::Engine;
use crate::routing::pattern::{join_pattern, validate_prefix};

/// A middleware list, an optional prefix and the engine routes land in.
///
/// The root has no prefix and registers patterns verbatim; every derived
/// scope has a prefix (possibly empty) and joins it onto each pattern.
#[derive(Debug, Clone)]
pub(crate) struct Scope {
    prefix: Option<String>,
    middleware: Vec<Middleware>,
    engine: Engine,
}

impl Scope {
    pub(crate) fn root(engine: Engine) -> Self {
        Self {
            prefix: None,
            middleware: Vec::new(),
            engine,
        }
    }

    pub(crate) fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or("")
    }

    pub(crate) fn engine(&self) -> &Engine {
        &self.engine
    }

    pub(crate) fn register(&self, pattern: &str, handler: Handler) -> Result<()> {
        let full = match &self.prefix {
            Some(prefix) => join_pattern(prefix, pattern),
            None => pattern.to_string(),
        };

        self.engine.register(&full, wrap(handler, &self.middleware))?;
        debug!(pattern = %full, middleware = self.middleware.len(), "Route registered");
        Ok(())
    }

    /// Validates everything before appending anything.
    pub(crate) fn append<I, M>(&mut self, middleware: I) -> Result<()>
    where
        I: IntoIterator<Item = M>,
        M: Into<Option<Middleware>>,
    {
        let incoming: Vec<Option<Middleware>> = middleware.into_iter().map(Into::into).collect();
        if let Some(index) = incoming.iter().position(Option::is_none) {
            return Err(Error::InvalidMiddleware { index });
        }

        self.middleware.extend(incoming.into_iter().flatten());
        Ok(())
    }

    pub(crate) fn branch(&self, prefix: &str) -> Result<Scope> {
        validate_prefix(prefix)?;

        let prefix = match &self.prefix {
            Some(parent) => join_pattern(parent, prefix),
            None => prefix.to_string(),
        };
        debug!(prefix = %prefix, inherited = self.middleware.len(), "Group created");

        Ok(Scope {
            prefix: Some(prefix),
            middleware: self.middleware.clone(),
            engine: self.engine.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Middleware {
        Middleware::new(|next| next)
    }

    #[test]
    fn test_append_rejects_none_without_mutation() {
        let mut scope = Scope::root(Engine::new());
        scope.append([noop()]).unwrap();

        let err = scope.append([Some(noop()), None, Some(noop())]).unwrap_err();
        assert!(matches!(err, Error::InvalidMiddleware { index: 1 }));
        assert_eq!(scope.middleware.len(), 1);
    }

    #[test]
    fn test_branch_copies_middleware() {
        let mut root = Scope::root(Engine::new());
        root.append([noop()]).unwrap();

        let mut child = root.branch("/child").unwrap();
        child.append([noop(), noop()]).unwrap();
        root.append([noop()]).unwrap();

        assert_eq!(root.middleware.len(), 2);
        assert_eq!(child.middleware.len(), 3);
    }

    #[test]
    fn test_branch_prefixes() {
        let root = Scope::root(Engine::new());
        assert_eq!(root.prefix(), "");

        let api = root.branch("/api").unwrap();
        assert_eq!(api.prefix(), "/api");
        assert_eq!(api.branch("/v1").unwrap().prefix(), "/api/v1");
        assert_eq!(api.branch("").unwrap().prefix(), "/api/");

        assert!(matches!(root.branch("api"), Err(Error::InvalidPrefix(_))));
        assert!(matches!(api.branch("v1"), Err(Error::InvalidPrefix(_))));
    }

    #[test]
    fn test_register_joins_prefix() {
        let engine = Engine::new();
        let root = Scope::root(engine.clone());
        let handler = Handler::new(|_req| async {});

        root.register("GET /", handler.clone()).unwrap();
        root.branch("/api/").unwrap().register("users", handler.clone()).unwrap();
        root.branch("").unwrap().register("GET health", handler).unwrap();

        assert_eq!(engine.patterns(), ["GET /", "/api/users", "GET /health"]);
    }
}
