use std::sync::Arc;

use tracing::{info, warn};

use crate::canonicalize::Canonicalizer;
use crate::dedupe::dedupe;
use crate::reconcile::Reconciler;
use crate::traits::ObservationSource;
use crate::types::{CycleReport, RawObservation};

/// One reconciliation cycle: fetch → canonicalize → dedupe → reconcile.
pub struct Engine {
    sources: Vec<Arc<dyn ObservationSource>>,
    canonicalizer: Canonicalizer,
    reconciler: Reconciler,
}

impl Engine {
    pub fn new(canonicalizer: Canonicalizer, reconciler: Reconciler) -> Self {
        Self {
            sources: Vec::new(),
            canonicalizer,
            reconciler,
        }
    }

    pub fn with_source(mut self, source: Arc<dyn ObservationSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Run a full cycle. A failing source aborts the cycle before any thread
    /// is touched; the next tick retries.
    pub async fn run_cycle(&self) -> CycleReport {
        let observations = match self.fetch_all().await {
            Ok(obs) => obs,
            Err(e) => {
                warn!(error = %e, "Source fetch failed, skipping cycle");
                return CycleReport {
                    aborted: true,
                    ..CycleReport::default()
                };
            }
        };

        let records = dedupe(self.canonicalizer.canonicalize_all(&observations));
        info!(
            observed = observations.len(),
            matches = records.len(),
            "Reconciling matches"
        );

        let outcome = self.reconciler.reconcile(&records).await;

        CycleReport {
            observed: observations.len(),
            canonical: records.len(),
            actions: outcome.actions,
            failures: outcome.failures,
            aborted: false,
        }
    }

    async fn fetch_all(&self) -> anyhow::Result<Vec<RawObservation>> {
        let mut all = Vec::new();
        for source in &self.sources {
            let batch = source
                .fetch_observations()
                .await
                .map_err(|e| e.context(format!("source {}", source.name())))?;
            info!(source = source.name(), count = batch.len(), "Fetched observations");
            all.extend(batch);
        }
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::PatternTable;
    use crate::store::{BindingStore, MemoryBindingStore};
    use crate::testing::{obs, MockGateway, MockSource};
    use crate::traits::ThreadGateway;

    fn engine_with(sources: Vec<MockSource>) -> (Engine, Arc<MockGateway>) {
        let patterns = PatternTable::for_team("india", "IND").unwrap();
        let gateway = Arc::new(MockGateway::new());
        let reconciler = Reconciler::new(
            patterns.clone(),
            Arc::new(MemoryBindingStore::new()) as Arc<dyn BindingStore>,
            gateway.clone() as Arc<dyn ThreadGateway>,
        );
        let engine = sources
            .into_iter()
            .fold(Engine::new(Canonicalizer::new(patterns), reconciler), |e, s| {
                e.with_source(Arc::new(s))
            });
        (engine, gateway)
    }

    #[tokio::test]
    async fn merges_sources_in_order() {
        let (engine, gateway) = engine_with(vec![
            MockSource::new().then(vec![obs("India vs Australia", "Live", "")]),
            MockSource::new().then(vec![obs("India vs Australia", "Live", "IND 10/0")]),
        ]);

        let report = engine.run_cycle().await;
        assert_eq!(report.observed, 2);
        assert_eq!(report.canonical, 1);
        assert_eq!(gateway.thread_count(), 1);
    }

    #[tokio::test]
    async fn one_failing_source_aborts_cycle() {
        let (engine, gateway) = engine_with(vec![
            MockSource::new().then(vec![obs("India vs Australia", "Live", "IND 10/0")]),
            MockSource::new().then_fail("503"),
        ]);

        let report = engine.run_cycle().await;
        assert!(report.aborted);
        assert!(report.actions.is_empty());
        assert!(gateway.calls().is_empty());
    }
}
