// odm-core/src/hook.rs
//! Ordered chain of autoload hooks, in the shape of the resolver stacks
//! hosts keep for unresolved names.

use odm_common::config::HookPriority;
use odm_common::error::Result;
use tracing::debug;

use crate::loader::{Autoloader, LoadedModule, Loader, ModuleResolver};

/// Something that may be able to load a module by name.
pub trait Hook {
    fn autoload(&self, name: &str) -> Result<Option<LoadedModule>>;
}

impl<R: ModuleResolver, L: Loader> Hook for Autoloader<R, L> {
    fn autoload(&self, name: &str) -> Result<Option<LoadedModule>> {
        Autoloader::autoload(self, name)
    }
}

impl<F> Hook for F
where
    F: Fn(&str) -> Result<Option<LoadedModule>>,
{
    fn autoload(&self, name: &str) -> Result<Option<LoadedModule>> {
        self(name)
    }
}

#[derive(Default)]
pub struct HookChain<'a> {
    hooks: Vec<Box<dyn Hook + 'a>>,
}

impl<'a> HookChain<'a> {
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Puts `hook` at the front or back of the chain.
    pub fn register(&mut self, hook: impl Hook + 'a, priority: HookPriority) {
        debug!("Registering autoload hook ({})", priority);
        match priority {
            HookPriority::Prepend => self.hooks.insert(0, Box::new(hook)),
            HookPriority::Append => self.hooks.push(Box::new(hook)),
        }
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Asks each hook in order; the first one that loads `name` wins. A hook
    /// error stops the chain.
    pub fn autoload(&self, name: &str) -> Result<Option<LoadedModule>> {
        for hook in &self.hooks {
            if let Some(module) = hook.autoload(name)? {
                return Ok(Some(module));
            }
        }
        debug!("No hook could load '{}'", name);
        Ok(None)
    }
}
