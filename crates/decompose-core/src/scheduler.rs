//! Dependency-respecting emission order across services.
//!
//! Ordering works by repeated pruning: every pass drops dependencies that
//! are already emitted or not tracked at all, then emits each service left
//! without dependencies. A pass that emits nothing means the remaining
//! services wait on each other, which is reported as a cycle.

use std::collections::{BTreeSet, HashMap, HashSet};

use decompose_common::error::{DecomposeError, Result};
use decompose_common::types::Service;

/// Services and the dependencies they still wait on.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Entries in declaration order.
    remaining: Vec<(String, BTreeSet<String>)>,
}

impl DependencyGraph {
    /// Creates an empty dependency graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the graph from the in-scope services' `depends_on`.
    ///
    /// Targets are not checked here; untracked ones are pruned while resolving.
    pub fn from_services<'a>(services: impl IntoIterator<Item = &'a Service>) -> Self {
        let mut graph = Self::new();
        for service in services {
            graph.add_service(&service.name, service.depends_on.iter().cloned());
        }
        graph
    }

    /// Adds a service with its dependencies.
    pub fn add_service(&mut self, name: impl Into<String>, depends_on: impl IntoIterator<Item = String>) {
        self.remaining.push((name.into(), depends_on.into_iter().collect()));
    }

    /// Number of tracked services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.remaining.len()
    }

    /// Whether no services are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Consumes the graph and returns the emission order.
    ///
    /// Dependencies come before their dependents. Services that become ready
    /// in the same pass keep declaration order, and a service emitted earlier
    /// in a pass already satisfies those after it.
    ///
    /// # Errors
    ///
    /// Returns [`DecomposeError::DependencyCycle`] if the tracked services
    /// depend on each other in a cycle.
    pub fn resolve_order(mut self) -> Result<Vec<String>> {
        let mut pending: HashSet<String> = self.remaining.iter().map(|(n, _)| n.clone()).collect();
        let mut order = Vec::with_capacity(self.remaining.len());

        while !self.remaining.is_empty() {
            let before = self.remaining.len();
            self.remaining.retain_mut(|(name, deps)| {
                deps.retain(|dep| pending.contains(dep));
                if !deps.is_empty() {
                    return true;
                }
                let _ = pending.remove(name.as_str());
                order.push(std::mem::take(name));
                false
            });

            if self.remaining.len() == before {
                return Err(DecomposeError::DependencyCycle {
                    services: self.cycle_members(),
                });
            }
        }

        Ok(order)
    }

    /// Services lying on a cycle among the remaining entries.
    ///
    /// Services merely blocked behind a cycle are left out.
    fn cycle_members(&self) -> Vec<String> {
        let mut graph = petgraph::Graph::<&str, ()>::new();
        let nodes: HashMap<&str, petgraph::graph::NodeIndex> = self
            .remaining
            .iter()
            .map(|(name, _)| (name.as_str(), graph.add_node(name.as_str())))
            .collect();
        for (name, deps) in &self.remaining {
            for dep in deps {
                if let (Some(&from), Some(&to)) = (nodes.get(name.as_str()), nodes.get(dep.as_str())) {
                    let _ = graph.add_edge(from, to, ());
                }
            }
        }

        let cyclic: HashSet<&str> = petgraph::algo::tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
            .flatten()
            .filter_map(|idx| graph.node_weight(idx).copied())
            .collect();

        self.remaining
            .iter()
            .filter(|(name, _)| cyclic.contains(name.as_str()))
            .map(|(name, _)| name.clone())
            .collect()
    }
}
