use crate::config::DashboardConfig;

use super::enrich::enrich;
use super::loader::{LoadOptions, Loaded, TableCache};

/// The precomputed analysis tables shown by the dashboard.
#[derive(Debug, Clone)]
pub struct Artifacts {
    /// Normalized household table with PCA coordinates, labels derived.
    pub prepared: Loaded,
    pub variance: Loaded,
    pub nodes: Loaded,
    pub edges: Loaded,
    pub centrality: Loaded,
    /// Household master table, first rows only.
    pub master: Loaded,
}

impl Artifacts {
    /// Load every artifact through the cache.
    pub fn load(cache: &mut TableCache, config: &DashboardConfig) -> Self {
        let names = &config.settings.artifacts;
        let mut load = |name: &str, options: LoadOptions| {
            cache.load(&config.artifact_path(name), options)
        };

        let prepared = load(&names.prepared, LoadOptions::all()).map(enrich);
        let variance = load(&names.variance, LoadOptions::all());
        let nodes = load(&names.nodes, LoadOptions::all());
        let edges = load(&names.edges, LoadOptions::all());
        let centrality = load(&names.centrality, LoadOptions::all());
        let master = load(
            &names.master,
            LoadOptions::all().rows(config.settings.master_rows),
        );

        let found = [&prepared, &variance, &nodes, &edges, &centrality, &master]
            .iter()
            .filter(|l| !l.is_absent())
            .count();
        log::info!("{found} of 6 artifacts available");

        Self {
            prepared,
            variance,
            nodes,
            edges,
            centrality,
            master,
        }
    }
}
