//! Handler registry: qualified names to factories.

use std::collections::HashMap;
use std::sync::Arc;

use crate::handler::Handler;

type HandlerFactory = Arc<dyn Fn() -> Box<dyn Handler> + Send + Sync>;

/// The closed set of handlers the application can dispatch to.
///
/// Route targets name handlers by string; this registry binds those names
/// to constructor closures at startup. Names are stored fully qualified
/// (`admin::UserHandler`), matching what the namespace stack produces at
/// route-registration time.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    factories: HashMap<String, HandlerFactory>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to a factory producing a fresh handler per dispatch.
    /// Re-registering a name replaces the previous binding.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn Handler> + Send + Sync + 'static,
    {
        self.factories.insert(name.to_string(), Arc::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Instantiate the named handler, or `None` when it is not registered.
    pub(crate) fn build(&self, name: &str) -> Option<Box<dyn Handler>> {
        self.factories.get(name).map(|factory| factory())
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.factories.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Context;
    use crate::error::Error;

    struct Probe;

    impl Handler for Probe {
        fn actions(&self) -> &'static [&'static str] {
            &["index"]
        }

        fn call(&mut self, _: &str, _: &mut Context<'_>, _: &[String]) -> Result<(), Error> {
            Ok(())
        }
    }

    #[test]
    fn registered_names_resolve() {
        let mut registry = HandlerRegistry::new();
        registry.register("admin::Probe", || Box::new(Probe));

        assert!(registry.contains("admin::Probe"));
        assert!(registry.build("admin::Probe").is_some());
        assert!(registry.build("Probe").is_none());
    }

    #[test]
    fn each_build_is_a_fresh_instance() {
        let mut registry = HandlerRegistry::new();
        registry.register("Probe", || Box::new(Probe));

        let a = registry.build("Probe");
        let b = registry.build("Probe");
        assert!(a.is_some() && b.is_some());
    }
}
