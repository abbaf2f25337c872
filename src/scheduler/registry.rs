//! Name-keyed algorithm registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{AlgoFactory, AssignmentConfig, DefaultFactory, DistanceMetric, MatchingFactory, SquaredEuclidean};
use crate::assignment::{PtMost, TMost, TRandom};
use crate::error::SchedulerError;
use crate::ga::{Gga, GgaConfig};

/// Factories keyed by [`AlgoFactory::name`], listed in name order.
#[derive(Debug, Clone, Default)]
pub struct AlgorithmRegistry {
    factories: BTreeMap<String, Arc<dyn AlgoFactory>>,
}

impl AlgorithmRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// `DefaultAlgo`, `PTMost`, `T_Most`, `T_Random` and `GGA_I` with the
    /// squared-Euclidean metric.
    pub fn with_defaults(config: AssignmentConfig, gga: GgaConfig) -> Self {
        Self::with_defaults_and_metric(config, gga, Arc::new(SquaredEuclidean))
    }

    /// Like [`with_defaults`](Self::with_defaults) with a chosen metric.
    pub fn with_defaults_and_metric(
        config: AssignmentConfig,
        gga: GgaConfig,
        metric: Arc<dyn DistanceMetric>,
    ) -> Self {
        let matching = |factory: MatchingFactory| -> Arc<dyn AlgoFactory> {
            Arc::new(
                factory
                    .with_metric(Arc::clone(&metric))
                    .with_config(config.clone()),
            )
        };
        let factories: [Arc<dyn AlgoFactory>; 5] = [
            Arc::new(DefaultFactory),
            matching(MatchingFactory::new(PtMost)),
            matching(MatchingFactory::new(TMost)),
            matching(MatchingFactory::new(TRandom)),
            matching(MatchingFactory::new(Gga::new(gga))),
        ];
        Self {
            factories: factories
                .into_iter()
                .map(|f| (f.name().to_string(), f))
                .collect(),
        }
    }

    /// Adds a factory under its name.
    pub fn register(&mut self, factory: Arc<dyn AlgoFactory>) -> Result<(), SchedulerError> {
        let name = factory.name();
        if self.factories.contains_key(name) {
            return Err(SchedulerError::DuplicateAlgorithm(name.to_string()));
        }
        self.factories.insert(name.to_string(), factory);
        Ok(())
    }

    /// The factory registered under `name`.
    pub fn get(&self, name: &str) -> Result<Arc<dyn AlgoFactory>, SchedulerError> {
        self.factories
            .get(name)
            .cloned()
            .ok_or_else(|| SchedulerError::UnknownAlgorithm {
                name: name.to_string(),
                available: self.names(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_registered() {
        let registry = AlgorithmRegistry::with_defaults(AssignmentConfig::default(), GgaConfig::default());
        assert_eq!(
            registry.names(),
            vec!["DefaultAlgo", "GGA_I", "PTMost", "T_Most", "T_Random"]
        );
        assert_eq!(registry.get("T_Most").unwrap().name(), "T_Most");
    }

    #[test]
    fn test_unknown_lists_available() {
        let registry = AlgorithmRegistry::with_defaults(AssignmentConfig::default(), GgaConfig::default());
        match registry.get("Hungarian") {
            Err(SchedulerError::UnknownAlgorithm { name, available }) => {
                assert_eq!(name, "Hungarian");
                assert_eq!(available.len(), 5);
            }
            _ => panic!("expected UnknownAlgorithm"),
        }
    }

    #[test]
    fn test_register_rejects_duplicate() {
        let mut registry = AlgorithmRegistry::new();
        assert!(registry.is_empty());
        registry.register(Arc::new(DefaultFactory)).unwrap();
        match registry.register(Arc::new(DefaultFactory)) {
            Err(SchedulerError::DuplicateAlgorithm(name)) => assert_eq!(name, "DefaultAlgo"),
            _ => panic!("expected DuplicateAlgorithm"),
        }
        assert_eq!(registry.len(), 1);
    }
}
