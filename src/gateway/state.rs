use std::sync::Arc;

use crate::images::ImageLoader;
use crate::pipeline::RecommendationOrchestrator;
use crate::store::RecommendationSink;
use crate::vision::VisionService;

/// Shared handler state: the orchestrator plus the result sink.
pub struct GatewayState<V, L, S>
where
    V: VisionService + 'static,
    L: ImageLoader + 'static,
    S: RecommendationSink + 'static,
{
    pub orchestrator: Arc<RecommendationOrchestrator<V, L>>,
    pub store: Arc<S>,
}

impl<V, L, S> GatewayState<V, L, S>
where
    V: VisionService + 'static,
    L: ImageLoader + 'static,
    S: RecommendationSink + 'static,
{
    pub fn new(orchestrator: Arc<RecommendationOrchestrator<V, L>>, store: Arc<S>) -> Self {
        Self {
            orchestrator,
            store,
        }
    }
}

// Derived Clone would require V, L, S: Clone; the Arcs make that unnecessary.
impl<V, L, S> Clone for GatewayState<V, L, S>
where
    V: VisionService + 'static,
    L: ImageLoader + 'static,
    S: RecommendationSink + 'static,
{
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
            store: Arc::clone(&self.store),
        }
    }
}
