use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::color::{ColorMap, ramp};
use crate::data::enrich::SEX_LABEL;
use crate::data::model::Table;
use crate::data::summary::{VARIABLE_COLUMN, xy_series};

const COMPONENT: &str = "Componente";
const EXPLAINED: &str = "Varianza_explicada";
const CUMULATIVE: &str = "Varianza_acumulada";

// ---------------------------------------------------------------------------
// PCA variance
// ---------------------------------------------------------------------------

/// Explained variance per component (bars) and cumulative variance (line).
pub fn variance_charts(ui: &mut Ui, variance: &Table) {
    let labels: Vec<String> = variance
        .column(COMPONENT)
        .map(|c| c.map(|v| v.to_string()).collect())
        .unwrap_or_default();

    ui.columns(2, |cols| {
        cols[0].strong("Varianza por Componente");
        let bars: Vec<Bar> = variance
            .column(EXPLAINED)
            .into_iter()
            .flatten()
            .enumerate()
            .filter_map(|(i, v)| {
                let name = labels.get(i).cloned().unwrap_or_else(|| format!("{}", i + 1));
                Some(Bar::new((i + 1) as f64, v.as_f64()?).name(name))
            })
            .collect();
        Plot::new("variance_bars")
            .height(260.0)
            .x_axis_label(COMPONENT)
            .y_axis_label(EXPLAINED)
            .show(&mut cols[0], |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE));
            });

        cols[1].strong("Varianza Acumulada");
        let cumulative: Vec<[f64; 2]> = variance
            .column(CUMULATIVE)
            .into_iter()
            .flatten()
            .enumerate()
            .filter_map(|(i, v)| Some([(i + 1) as f64, v.as_f64()?]))
            .collect();
        let line: PlotPoints = cumulative.iter().copied().collect();
        let markers: PlotPoints = cumulative.into_iter().collect();
        Plot::new("variance_cumulative")
            .height(260.0)
            .x_axis_label(COMPONENT)
            .y_axis_label(CUMULATIVE)
            .show(&mut cols[1], |plot_ui| {
                plot_ui.line(Line::new(line).color(Color32::LIGHT_BLUE).width(1.5));
                plot_ui.points(Points::new(markers).radius(3.0).color(Color32::LIGHT_BLUE));
            });
    });
}

// ---------------------------------------------------------------------------
// PCA scatter
// ---------------------------------------------------------------------------

/// Households on PC1/PC2, one series per sex label.
pub fn pca_scatter(ui: &mut Ui, households: &Table, colors: Option<&ColorMap>) {
    let groups = households.unique_values(SEX_LABEL);

    Plot::new("pca_scatter")
        .height(360.0)
        .legend(Legend::default())
        .x_axis_label("PC1")
        .y_axis_label("PC2")
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            if groups.is_empty() {
                let pts: PlotPoints = xy_series(households, "PC1", "PC2").into_iter().collect();
                plot_ui.points(Points::new(pts).radius(2.0).color(Color32::LIGHT_BLUE));
                return;
            }
            for group in &groups {
                let rows = (0..households.len())
                    .filter(|&r| households.value(r, SEX_LABEL) == Some(group));
                let subset = households.select_rows(rows);
                let pts: PlotPoints = xy_series(&subset, "PC1", "PC2").into_iter().collect();
                let color = colors
                    .map(|cm| cm.color_for(group))
                    .unwrap_or(Color32::LIGHT_BLUE);
                plot_ui.points(
                    Points::new(pts)
                        .radius(2.0)
                        .color(color)
                        .name(group.to_string()),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Centrality ranking
// ---------------------------------------------------------------------------

/// Ranked bars for one centrality metric, coloured by value.
pub fn centrality_bars(ui: &mut Ui, ranked: &Table, metric: &str) {
    let values: Vec<(String, f64)> = (0..ranked.len())
        .filter_map(|r| {
            let name = ranked
                .value(r, VARIABLE_COLUMN)
                .map(|v| v.to_string())
                .unwrap_or_else(|| format!("{}", r + 1));
            Some((name, ranked.value(r, metric)?.as_f64()?))
        })
        .collect();

    let min = values.iter().map(|(_, v)| *v).fold(f64::INFINITY, f64::min);
    let max = values.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);

    let bars: Vec<Bar> = values
        .iter()
        .enumerate()
        .map(|(i, (name, v))| {
            Bar::new(i as f64, *v)
                .name(name)
                .fill(ramp(*v, min, max))
        })
        .collect();

    Plot::new("centrality_bars")
        .height(360.0)
        .x_axis_label(VARIABLE_COLUMN)
        .y_axis_label(metric)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (i, (name, _)) in values.iter().enumerate() {
            ui.weak(format!("{i}: {name}"));
        }
    });
}
