use eframe::egui::{Color32, RichText, Ui};

use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Top bar – title and tab strip
// ---------------------------------------------------------------------------

/// Render the title and the tab selector.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Análisis Multivariado del Consumo Energético");
    ui.label("Servicio Social - IER UNAM | Prototipo de Visualización v1.1");
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.title());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GREEN
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – environment
// ---------------------------------------------------------------------------

/// Render the status side panel.
pub fn side_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("Estado");
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Estado del Servidor:");
        ui.label(RichText::new("Online").color(Color32::GREEN));
    });

    ui.strong("Ruta Activa:");
    ui.monospace(state.config.base_dir.display().to_string());
    ui.add_space(8.0);

    let artifacts = [
        ("Preparación PCA", &state.artifacts.prepared),
        ("Varianza", &state.artifacts.variance),
        ("Nodos", &state.artifacts.nodes),
        ("Aristas", &state.artifacts.edges),
        ("Centralidad", &state.artifacts.centrality),
        ("Maestro", &state.artifacts.master),
    ];
    ui.strong("Artefactos");
    for (name, loaded) in artifacts {
        let (mark, color) = match loaded.table() {
            Some(_) => ("✔", Color32::GREEN),
            None => ("—", Color32::GRAY),
        };
        ui.label(RichText::new(format!("{mark} {name}")).color(color));
    }

    ui.add_space(8.0);
    ui.weak(format!("{} lecturas en caché", state.cache.len()));
}
