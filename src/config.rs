use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable overriding the base directory.
pub const BASE_DIR_ENV: &str = "ENIGH_DASHBOARD_BASE";

/// Marker directory of the hosted notebook environment.
const HOSTED_MARKER: &str = "/content/drive/MyDrive";
const HOSTED_BASE: &str =
    "/content/drive/MyDrive/UNAM/Servicio Social/IER/Desarrollo del proyecto/PYTHON/proyecto_python";

/// Optional settings file inside the base directory.
pub const CONFIG_FILE: &str = "dashboard.json";

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// File names of the precomputed artifacts under `outputs/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArtifactNames {
    pub prepared: String,
    pub variance: String,
    pub nodes: String,
    pub edges: String,
    pub centrality: String,
    pub master: String,
}

impl Default for ArtifactNames {
    fn default() -> Self {
        Self {
            prepared: "01_preparacion_pca.csv".into(),
            variance: "02_varianza_explicada_pca.csv".into(),
            nodes: "03_red_nodos.csv".into(),
            edges: "03_red_aristas.csv".into(),
            centrality: "04_centralidad.csv".into(),
            master: "estructura_familiar_2024.csv".into(),
        }
    }
}

/// Directory layout and row limits, read from `dashboard.json` when present.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub outputs_dir: String,
    pub raw_dir: String,
    pub artifacts: ArtifactNames,
    /// Rows read from the master household table.
    pub master_rows: usize,
    pub master_preview: usize,
    /// Rows read per explorer query.
    pub explore_rows: usize,
    pub explore_preview: usize,
    /// Columns pre-selected in the explorer.
    pub explore_default_columns: usize,
    pub prepared_preview: usize,
    pub edges_preview: usize,
    pub top_n: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            outputs_dir: "outputs".into(),
            raw_dir: "ENIGH".into(),
            artifacts: ArtifactNames::default(),
            master_rows: 100,
            master_preview: 20,
            explore_rows: 100,
            explore_preview: 15,
            explore_default_columns: 5,
            prepared_preview: 50,
            edges_preview: 100,
            top_n: 15,
        }
    }
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Everything the dashboard needs to know about its environment, resolved once.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub base_dir: PathBuf,
    pub settings: Settings,
}

impl DashboardConfig {
    /// Resolve the base directory from the process environment and load settings.
    pub fn from_env() -> Self {
        let env_override = std::env::var_os(BASE_DIR_ENV).map(PathBuf::from);
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf));
        let base_dir = resolve_base_dir(
            env_override,
            Path::new(HOSTED_MARKER),
            Path::new(HOSTED_BASE),
            exe_dir,
        );
        log::info!("Base directory: {}", base_dir.display());
        Self::for_base_dir(base_dir)
    }

    /// Configuration rooted at `base_dir`; a broken settings file falls back to defaults.
    pub fn for_base_dir(base_dir: PathBuf) -> Self {
        let settings = match load_settings(&base_dir.join(CONFIG_FILE)) {
            Ok(Some(s)) => s,
            Ok(None) => Settings::default(),
            Err(e) => {
                log::warn!("Ignoring {CONFIG_FILE}: {e:#}");
                Settings::default()
            }
        };
        Self { base_dir, settings }
    }

    pub fn outputs_dir(&self) -> PathBuf {
        self.base_dir.join(&self.settings.outputs_dir)
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.base_dir.join(&self.settings.raw_dir)
    }

    pub fn artifact_path(&self, file_name: &str) -> PathBuf {
        self.outputs_dir().join(file_name)
    }
}

/// Pick the base directory: explicit override, then the hosted-notebook
/// location when its marker exists, then the executable's directory.
pub fn resolve_base_dir(
    env_override: Option<PathBuf>,
    hosted_marker: &Path,
    hosted_base: &Path,
    exe_dir: Option<PathBuf>,
) -> PathBuf {
    if let Some(dir) = env_override.filter(|d| !d.as_os_str().is_empty()) {
        return dir;
    }
    if hosted_marker.exists() {
        return hosted_base.to_path_buf();
    }
    exe_dir.unwrap_or_else(|| PathBuf::from("."))
}

fn load_settings(path: &Path) -> Result<Option<Settings>> {
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path).context("reading settings")?;
    let settings = serde_json::from_str(&text).context("parsing settings")?;
    Ok(Some(settings))
}
