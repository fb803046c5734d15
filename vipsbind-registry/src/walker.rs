//! Registry traversal.
//!
//! Collects the operation and enumerated-type names that generation emits.
//! The hierarchy is walked pre-order with an explicit stack, so the result
//! order matches a recursive descent without any shared accumulator.

use crate::error::RegistryError;
use crate::introspect::Introspector;
use crate::registry::TypeRegistry;
use std::collections::HashSet;
use tracing::{debug, trace};

/// What an operation walk starts from and how its result is filtered.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Abstract root type of all operations.
    pub root: String,
    /// Names appended after the walk even though the hierarchy hides them.
    pub synonyms: Vec<String>,
    /// Names removed from the final list.
    pub deny: Vec<String>,
}

/// One operation found by the walk.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct WalkedOperation {
    /// Whether the operation has a receiver. Sorts static functions first.
    pub is_instance: bool,
    /// Operation nickname.
    pub name: String,
}

/// Walks a registry's type hierarchy.
pub struct RegistryWalker<'a, R: TypeRegistry + ?Sized> {
    registry: &'a R,
}

impl<'a, R: TypeRegistry + ?Sized> RegistryWalker<'a, R> {
    /// Creates a walker over a registry.
    #[must_use]
    pub const fn new(registry: &'a R) -> Self {
        Self { registry }
    }

    /// Returns every descendant of `root` in pre-order, root excluded.
    ///
    /// A type reachable through several parents is listed once, where it is
    /// first reached. A cyclic hierarchy still terminates.
    #[must_use]
    pub fn descendants(&self, root: &str) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::from([root]);
        let mut visited = Vec::new();
        let mut stack: Vec<&str> = self
            .registry
            .children(root)
            .iter()
            .rev()
            .map(String::as_str)
            .collect();

        while let Some(type_name) = stack.pop() {
            if !seen.insert(type_name) {
                continue;
            }
            visited.push(type_name.to_string());
            stack.extend(
                self.registry
                    .children(type_name)
                    .iter()
                    .rev()
                    .map(String::as_str),
            );
        }

        visited
    }

    /// Collects the operations to emit, sorted static-first then by name.
    ///
    /// Abstract and unresolvable candidates are skipped, as are deprecated
    /// operations. Synonyms are appended before de-duplication and sorting;
    /// the deny-list is applied last.
    ///
    /// # Errors
    /// Returns `RegistryError` if a synonym cannot be introspected.
    pub fn operations(&self, options: &WalkOptions) -> Result<Vec<WalkedOperation>, RegistryError> {
        let introspector = Introspector::new(self.registry);
        let mut found = Vec::new();

        for type_name in self.descendants(&options.root) {
            let Some(nickname) = self.registry.nickname(&type_name) else {
                trace!(type_name = %type_name, "skipping type without nickname");
                continue;
            };
            match introspector.introspect(nickname) {
                Ok(desc) if desc.deprecated => {
                    trace!(operation = %nickname, "skipping deprecated operation");
                }
                Ok(desc) => found.push(WalkedOperation {
                    is_instance: desc.is_instance_method(),
                    name: desc.name,
                }),
                Err(e) if e.is_skippable() => {
                    trace!(operation = %nickname, error = %e, "skipping candidate");
                }
                Err(e) => return Err(e),
            }
        }

        for synonym in &options.synonyms {
            let desc = introspector.introspect(synonym)?;
            found.push(WalkedOperation {
                is_instance: desc.is_instance_method(),
                name: synonym.clone(),
            });
        }

        found.sort();
        found.dedup();
        found.retain(|op| !options.deny.contains(&op.name));

        debug!(root = %options.root, count = found.len(), "collected operations");
        Ok(found)
    }

    /// Collects the enumerated types below each root, in walk order.
    ///
    /// Duplicates keep their first position.
    #[must_use]
    pub fn enums(&self, roots: &[&str]) -> Vec<String> {
        let mut seen = HashSet::new();
        let names: Vec<String> = roots
            .iter()
            .flat_map(|root| self.descendants(root))
            .filter(|name| seen.insert(name.clone()))
            .collect();

        debug!(count = names.len(), "collected enumerated types");
        names
    }
}
