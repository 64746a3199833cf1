use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::enrich::{FEMALE, MALE, REGION_LABEL, SEX_LABEL};
use crate::data::filter::{self, Selection};
use crate::data::loader::Loaded;
use crate::data::model::Value;
use crate::data::summary;
use crate::state::{AppState, Tab};
use crate::ui::plot;
use crate::ui::table::{data_table, export_button};

/// Render the body of the selected tab.
pub fn show(ui: &mut Ui, state: &mut AppState) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.tab {
            Tab::Exploration => exploration(ui, state),
            Tab::Prepared => prepared(ui, state),
            Tab::Pca => pca(ui, state),
            Tab::Networks => networks(ui, state),
            Tab::Centrality => centrality(ui, state),
            Tab::Master => master(ui, state),
        });
}

fn nothing_to_show(ui: &mut Ui) {
    ui.weak("Sin datos disponibles.");
}

// ---------------------------------------------------------------------------
// Exploración ENIGH
// ---------------------------------------------------------------------------

fn exploration(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Buscador Dinámico de Microdatos");

    if !state.config.raw_dir().is_dir() {
        ui.label("No se encontró la carpeta ENIGH. Verifique la ruta.");
        return;
    }
    if state.explorer.years.is_empty() {
        return;
    }

    // Clone what we need so we can mutate state afterwards.
    let years = state.explorer.years.clone();
    let tables = state.explorer.tables.clone();
    let columns = state.explorer.columns.clone();
    let year = state.explorer.query.year.clone();
    let table = state.explorer.query.table.clone();

    let mut picked_year = None;
    let mut picked_table = None;
    let mut toggled = None;

    ui.columns(2, |cols| {
        cols[0].label("1. Año");
        egui::ComboBox::from_id_salt("sb_anio")
            .selected_text(year.as_str())
            .show_ui(&mut cols[0], |ui: &mut Ui| {
                for y in &years {
                    if ui.selectable_label(*y == year, y.as_str()).clicked() {
                        picked_year = Some(y.clone());
                    }
                }
            });

        if !tables.is_empty() {
            cols[1].label("2. Tabla");
            egui::ComboBox::from_id_salt("sb_base")
                .selected_text(table.as_str())
                .show_ui(&mut cols[1], |ui: &mut Ui| {
                    for t in &tables {
                        if ui.selectable_label(*t == table, t.as_str()).clicked() {
                            picked_table = Some(t.clone());
                        }
                    }
                });
        }
    });

    if !columns.is_empty() {
        ui.label("3. Columnas:");
        egui::ScrollArea::vertical()
            .id_salt("explore_columns")
            .max_height(120.0)
            .show(ui, |ui: &mut Ui| {
                ui.horizontal_wrapped(|ui: &mut Ui| {
                    for col in &columns {
                        let mut checked = state.explorer.selected.contains(col);
                        if ui.checkbox(&mut checked, col.as_str()).changed() {
                            toggled = Some(col.clone());
                        }
                    }
                });
            });
    }

    if let Some(y) = picked_year.filter(|y| *y != year) {
        state.select_year(y);
    } else if let Some(t) = picked_table.filter(|t| *t != table) {
        state.select_table(t);
    } else if let Some(col) = toggled {
        state.toggle_column(&col);
    }

    ui.separator();
    match &state.explorer.result {
        Some(Loaded::Table(t)) => {
            data_table(ui, "explore_table", t, state.config.settings.explore_preview);
            if let Some(msg) = export_button(ui, "Descargar selección", t, "exploracion.csv") {
                state.status_message = Some(msg);
            }
        }
        Some(Loaded::Absent) => nothing_to_show(ui),
        None => {}
    }
}

// ---------------------------------------------------------------------------
// Datos Preparados
// ---------------------------------------------------------------------------

fn prepared(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Vista Previa de Datos Normalizados");
    let Some(t) = state.artifacts.prepared.table() else {
        nothing_to_show(ui);
        return;
    };
    data_table(ui, "prepared_table", t, state.config.settings.prepared_preview);
    if let Some(msg) = export_button(ui, "Descargar CSV", t, "datos_procesados.csv") {
        state.status_message = Some(msg);
    }
}

// ---------------------------------------------------------------------------
// PCA y métricas
// ---------------------------------------------------------------------------

fn pca(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Análisis de Componentes Principales");

    if let Some(variance) = state.artifacts.variance.table() {
        plot::variance_charts(ui, variance);
    }

    let Some(prepared) = state.artifacts.prepared.table() else {
        return;
    };
    let region_options = filter::options(prepared, REGION_LABEL);
    let sex_options = [Value::from(MALE), Value::from(FEMALE)];

    ui.separator();
    let mut sex = state.selection(SEX_LABEL);
    let mut region = state.selection(REGION_LABEL);
    ui.columns(2, |cols| {
        selection_combo(&mut cols[0], "pca_sexo", "Sexo Jefe/a", "Todos", &sex_options, &mut sex);
        selection_combo(&mut cols[1], "pca_entidad", "Estado", "Todas", &region_options, &mut region);
    });
    state.set_sex_filter(sex);
    state.set_region_filter(region);

    let Some(view) = &state.pca_view else {
        return;
    };

    if view.has_column("PC1") {
        ui.strong("Dispersión de Hogares");
        plot::pca_scatter(ui, view, state.sex_colors.as_ref());
    }

    ui.add_space(8.0);
    ui.strong("Resumen de la Selección");
    // Zero when the integration step has not produced these columns yet.
    let income = summary::mean(view, "ingreso_real");
    let spending = summary::mean(view, "gasto_real");
    ui.columns(3, |cols| {
        metric(&mut cols[0], "Hogares", summary::format_count(view.len()));
        metric(&mut cols[1], "Ingreso Promedio", summary::format_money(income));
        metric(&mut cols[2], "Gasto Energía Prom.", summary::format_money(spending));
    });
}

fn selection_combo(
    ui: &mut Ui,
    id: &str,
    label: &str,
    wildcard: &str,
    options: &[Value],
    current: &mut Selection,
) {
    ui.label(label);
    let text = match current {
        Selection::All => wildcard.to_string(),
        Selection::Only(v) => v.to_string(),
    };
    egui::ComboBox::from_id_salt(id)
        .selected_text(text)
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(current, Selection::All, wildcard);
            for v in options {
                ui.selectable_value(current, Selection::Only(v.clone()), v.to_string());
            }
        });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.label(label);
        ui.label(RichText::new(value).size(22.0).strong());
    });
}

// ---------------------------------------------------------------------------
// Redes
// ---------------------------------------------------------------------------

fn networks(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Redes de Variables Energéticas");
    let (Some(nodes), Some(edges)) = (
        state.artifacts.nodes.table(),
        state.artifacts.edges.table(),
    ) else {
        ui.label(
            RichText::new("Archivos de Red no detectados en /outputs.").color(Color32::YELLOW),
        );
        return;
    };
    let edges_preview = state.config.settings.edges_preview;
    ui.columns(2, |cols| {
        cols[0].strong("Nodos");
        data_table(&mut cols[0], "nodes_table", nodes, nodes.len());
        cols[1].strong("Aristas (Conexiones)");
        data_table(&mut cols[1], "edges_table", edges, edges_preview);
    });
}

// ---------------------------------------------------------------------------
// Centralidad
// ---------------------------------------------------------------------------

fn centrality(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Importancia de Variables");
    let Some(table) = state.artifacts.centrality.table() else {
        nothing_to_show(ui);
        return;
    };

    let metrics = summary::metric_columns(table);
    let mut chosen = state.centrality_metric.clone();
    ui.label("Seleccione Métrica");
    egui::ComboBox::from_id_salt("centrality_metric")
        .selected_text(chosen.clone().unwrap_or_default())
        .show_ui(ui, |ui: &mut Ui| {
            for m in &metrics {
                ui.selectable_value(&mut chosen, Some(m.clone()), m.as_str());
            }
        });

    if let Some(m) = &chosen {
        let ranked = summary::top_by(table, m, state.config.settings.top_n);
        plot::centrality_bars(ui, &ranked, m);
    }
    state.centrality_metric = chosen;
}

// ---------------------------------------------------------------------------
// Dataset Maestro
// ---------------------------------------------------------------------------

fn master(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Estructura Familiar (Maestro)");
    let Some(t) = state.artifacts.master.table() else {
        nothing_to_show(ui);
        return;
    };
    data_table(ui, "master_table", t, state.config.settings.master_preview);
    if let Some(msg) = export_button(ui, "Descargar Maestro", t, "maestro_completo.csv") {
        state.status_message = Some(msg);
    }
}
