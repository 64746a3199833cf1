use std::collections::BTreeSet;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::artifacts::Artifacts;
use crate::data::enrich::{REGION_LABEL, SEX_LABEL};
use crate::data::explore::{self, ExploreQuery};
use crate::data::filter::{FilterState, Selection, filter};
use crate::data::loader::{Loaded, TableCache};
use crate::data::model::Table;
use crate::data::summary;

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Exploration,
    Prepared,
    Pca,
    Networks,
    Centrality,
    Master,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Exploration,
        Tab::Prepared,
        Tab::Pca,
        Tab::Networks,
        Tab::Centrality,
        Tab::Master,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Exploration => "Exploración ENIGH",
            Tab::Prepared => "Datos Preparados",
            Tab::Pca => "PCA",
            Tab::Networks => "Redes",
            Tab::Centrality => "Centralidad",
            Tab::Master => "Dataset Maestro",
        }
    }
}

// ---------------------------------------------------------------------------
// Explorer selection
// ---------------------------------------------------------------------------

/// Year / table / column picks for the raw-data explorer.
#[derive(Debug, Default)]
pub struct Explorer {
    pub years: Vec<String>,
    pub tables: Vec<String>,
    /// Header of the selected table.
    pub columns: Vec<String>,
    pub selected: BTreeSet<String>,
    pub query: ExploreQuery,
    pub result: Option<Loaded>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Memoized table loads, shared by every view.
    pub cache: TableCache,

    pub artifacts: Artifacts,

    pub tab: Tab,

    /// Sex / region selections on the PCA tab.
    pub pca_filters: FilterState,

    /// Prepared table after `pca_filters` (cached).
    pub pca_view: Option<Table>,

    /// Scatter colours by sex label.
    pub sex_colors: Option<ColorMap>,

    pub explorer: Explorer,

    /// Metric ranked on the centrality tab.
    pub centrality_metric: Option<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load the artifacts and initialise every view.
    pub fn new(config: DashboardConfig) -> Self {
        let mut cache = TableCache::new();
        let artifacts = Artifacts::load(&mut cache, &config);

        let sex_colors = artifacts
            .prepared
            .table()
            .and_then(|t| t.column(SEX_LABEL).map(|labels| ColorMap::new(labels)));
        let centrality_metric = artifacts
            .centrality
            .table()
            .and_then(|t| summary::metric_columns(t).into_iter().next());

        let mut state = Self {
            config,
            cache,
            artifacts,
            tab: Tab::default(),
            pca_filters: FilterState::new(),
            pca_view: None,
            sex_colors,
            explorer: Explorer::default(),
            centrality_metric,
            status_message: None,
        };
        state.refilter();
        state.refresh_years();
        state
    }

    /// Recompute `pca_view` after a filter change.
    pub fn refilter(&mut self) {
        self.pca_view = self
            .artifacts
            .prepared
            .table()
            .map(|t| filter(t, &self.pca_filters));
    }

    pub fn set_sex_filter(&mut self, selection: Selection) {
        self.set_filter(SEX_LABEL, selection);
    }

    pub fn set_region_filter(&mut self, selection: Selection) {
        self.set_filter(REGION_LABEL, selection);
    }

    fn set_filter(&mut self, column: &str, selection: Selection) {
        if self.pca_filters.get(column) == Some(&selection) {
            return;
        }
        self.pca_filters.insert(column.to_string(), selection);
        self.refilter();
    }

    pub fn selection(&self, column: &str) -> Selection {
        self.pca_filters.get(column).cloned().unwrap_or_default()
    }

    // -- Explorer --

    /// Re-list year directories and select the first one.
    pub fn refresh_years(&mut self) {
        self.explorer.years = explore::list_years(&self.config.raw_dir());
        match self.explorer.years.first().cloned() {
            Some(year) => self.select_year(year),
            None => self.explorer = Explorer::default(),
        }
    }

    pub fn select_year(&mut self, year: String) {
        self.explorer.tables = explore::list_tables(&self.config.raw_dir(), &year);
        self.explorer.query.year = year;
        match self.explorer.tables.first().cloned() {
            Some(table) => self.select_table(table),
            None => {
                self.explorer.query.table.clear();
                self.explorer.columns.clear();
                self.explorer.selected.clear();
                self.run_query();
            }
        }
    }

    /// Pick a table, read its header and pre-select the leading columns.
    pub fn select_table(&mut self, table: String) {
        let raw_dir = self.config.raw_dir();
        self.explorer.columns =
            explore::table_columns(&mut self.cache, &raw_dir, &self.explorer.query.year, &table);
        self.explorer.selected = self
            .explorer
            .columns
            .iter()
            .take(self.config.settings.explore_default_columns)
            .cloned()
            .collect();
        self.explorer.query.table = table;
        self.run_query();
    }

    pub fn toggle_column(&mut self, column: &str) {
        if !self.explorer.selected.remove(column) {
            self.explorer.selected.insert(column.to_string());
        }
        self.run_query();
    }

    fn run_query(&mut self) {
        let ex = &mut self.explorer;
        ex.query.columns = ex
            .columns
            .iter()
            .filter(|c| ex.selected.contains(*c))
            .cloned()
            .collect();
        ex.result = if ex.query.columns.is_empty() {
            None
        } else {
            Some(explore::explore(
                &mut self.cache,
                &self.config.raw_dir(),
                &ex.query,
                self.config.settings.explore_rows,
            ))
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;

    fn base_dir() -> tempfile::TempDir {
        let base = tempfile::tempdir().unwrap();
        let outputs = base.path().join("outputs");
        std::fs::create_dir(&outputs).unwrap();
        std::fs::write(
            outputs.join("01_preparacion_pca.csv"),
            "entidad,sexo_jefe,PC1,PC2,ingreso_real\n\
             9,1,0.1,0.2,1000\n\
             9,2,0.3,0.1,3000\n\
             14,1,-0.4,0.5,2000\n",
        )
        .unwrap();
        std::fs::write(
            outputs.join("04_centralidad.csv"),
            "variable,grado,cercania\nluz,0.4,0.1\n",
        )
        .unwrap();
        let year = base.path().join("ENIGH").join("2024");
        std::fs::create_dir_all(&year).unwrap();
        std::fs::write(
            year.join("viviendas.csv"),
            "folioviv,a,b,c,d,e,f\n1,1,2,3,4,5,6\n2,1,2,3,4,5,6\n",
        )
        .unwrap();
        base
    }

    #[test]
    fn test_initial_state() {
        let base = base_dir();
        let state = AppState::new(DashboardConfig::for_base_dir(base.path().to_path_buf()));
        assert_eq!(state.pca_view.as_ref().map(Table::len), Some(3));
        assert_eq!(state.centrality_metric.as_deref(), Some("grado"));
        assert_eq!(state.explorer.years, ["2024"]);
        assert_eq!(state.explorer.query.table, "viviendas.csv");
        assert_eq!(state.explorer.selected.len(), 5);
        let result = state.explorer.result.as_ref().unwrap().table().unwrap();
        assert_eq!(result.columns(), ["folioviv", "a", "b", "c", "d"]);
    }

    #[test]
    fn test_pca_filters() {
        let base = base_dir();
        let mut state = AppState::new(DashboardConfig::for_base_dir(base.path().to_path_buf()));

        state.set_sex_filter(Selection::Only(Value::from("Hombre")));
        assert_eq!(state.pca_view.as_ref().unwrap().len(), 2);
        state.set_region_filter(Selection::Only(Value::from("Jalisco")));
        assert_eq!(state.pca_view.as_ref().unwrap().len(), 1);
        state.set_sex_filter(Selection::All);
        state.set_region_filter(Selection::All);
        assert_eq!(state.pca_view.as_ref().unwrap().len(), 3);
        assert_eq!(state.selection(SEX_LABEL), Selection::All);
    }

    #[test]
    fn test_toggle_columns() {
        let base = base_dir();
        let mut state = AppState::new(DashboardConfig::for_base_dir(base.path().to_path_buf()));
        state.toggle_column("a");
        state.toggle_column("f");
        let result = state.explorer.result.as_ref().unwrap().table().unwrap();
        assert_eq!(result.columns(), ["folioviv", "b", "c", "d", "f"]);

        for col in ["folioviv", "b", "c", "d", "f"] {
            state.toggle_column(col);
        }
        assert!(state.explorer.result.is_none());
    }

    #[test]
    fn test_missing_base_dir() {
        let state = AppState::new(DashboardConfig::for_base_dir("/no/such/base".into()));
        assert!(state.pca_view.is_none());
        assert!(state.explorer.years.is_empty());
        assert!(state.centrality_metric.is_none());
    }
}
