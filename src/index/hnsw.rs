/// HNSW graph over the index records
///
/// Not persisted. The graph is rebuilt from the records, in record order,
/// whenever the record set changes.
use hnsw_rs::prelude::*;
use serde::{Deserialize, Serialize};

/// HNSW tuning parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HnswParams {
    /// Number of connections per layer
    pub m: usize,
    /// Construction beam width (higher = better recall, slower build)
    pub ef_construction: usize,
    /// Search beam width (higher = better recall, slower search)
    pub ef_search: usize,
}

impl Default for HnswParams {
    fn default() -> Self {
        Self {
            m: 16,
            ef_construction: 200,
            ef_search: 64,
        }
    }
}

const MAX_LAYERS: usize = 16;

pub(crate) struct HnswGraph {
    inner: Hnsw<'static, f32, DistL2>,
    params: HnswParams,
}

impl HnswGraph {
    /// Build a graph where each vector is keyed by its record position
    pub(crate) fn build<'a, I>(params: HnswParams, capacity: usize, vectors: I) -> Self
    where
        I: IntoIterator<Item = &'a [f32]>,
    {
        let inner = Hnsw::<f32, DistL2>::new(
            params.m,
            capacity.max(1),
            MAX_LAYERS,
            params.ef_construction,
            DistL2 {},
        );
        for (position, vector) in vectors.into_iter().enumerate() {
            inner.insert_slice((vector, position));
        }
        Self { inner, params }
    }

    /// Up to `k` (position, distance) pairs
    pub(crate) fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        let ef = self.params.ef_search.max(k);
        self.inner
            .search(query, k, ef)
            .into_iter()
            .map(|neighbour| (neighbour.d_id, neighbour.distance))
            .collect()
    }
}
