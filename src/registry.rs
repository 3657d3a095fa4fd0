//! # Record Registry
//!
//! A write-once name-to-layout table. Registering a compiled layout under its
//! record name lets later definitions reference it by name
//! ([`crate::layout::TypeSpec::Named`]) instead of threading `Arc<Layout>`
//! handles through the program.
//!
//! Names are registered exactly once; a second definition under the same name
//! is refused rather than replaced, so every consumer of a name sees the same
//! layout for the life of the registry.
//!
//! The registry is internally synchronized and can be shared across threads
//! behind an `Arc`.

use crate::layout::{Layout, RecordDef};
use eyre::{ensure, Result};
use hashbrown::HashMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Shared table of compiled record layouts, keyed by record name.
#[derive(Debug, Default)]
pub struct Registry {
    layouts: RwLock<HashMap<String, Arc<Layout>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles a definition with this registry resolving named references,
    /// then registers the result under the definition's name.
    pub fn define(&self, def: &RecordDef) -> Result<Arc<Layout>> {
        // Refuse up front so a failed compile never burns the name.
        ensure!(
            !self.is_record(def.name()),
            "record '{}' is already registered",
            def.name()
        );
        let layout = def.compile_with(Some(self))?;
        self.register(layout.clone())?;
        Ok(layout)
    }

    /// Registers an already-compiled layout under its record name.
    pub fn register(&self, layout: Arc<Layout>) -> Result<()> {
        let mut layouts = self.layouts.write();
        ensure!(
            !layouts.contains_key(layout.name()),
            "record '{}' is already registered",
            layout.name()
        );
        layouts.insert(layout.name().to_string(), layout);
        Ok(())
    }

    /// True if a record is registered under `name`.
    pub fn is_record(&self, name: &str) -> bool {
        self.layouts.read().contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Layout>> {
        self.layouts.read().get(name).cloned()
    }

    /// Packed byte size of the named record type.
    pub fn size_of(&self, name: &str) -> Result<usize> {
        self.get(name)
            .map(|layout| layout.size())
            .ok_or_else(|| eyre::eyre!("'{}' is not a registered record", name))
    }

    pub fn len(&self) -> usize {
        self.layouts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.read().is_empty()
    }
}
