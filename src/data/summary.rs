//! Aggregates and chart series derived from loaded tables.

use std::cmp::Ordering;

use super::model::Table;

/// Name column of the centrality table; every other column is a metric.
pub const VARIABLE_COLUMN: &str = "variable";

/// Mean of the numeric cells of `column`, ignoring nulls.
///
/// Returns 0.0 when the column is missing or holds no numbers.
pub fn mean(table: &Table, column: &str) -> f64 {
    let Some(values) = table.column(column) else {
        return 0.0;
    };
    let (sum, n) = values
        .filter_map(|v| v.as_f64())
        .fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

/// Rows sorted by `metric` descending and truncated to `n`.
///
/// Non-numeric cells sort last; ties keep their original order.
pub fn top_by(table: &Table, metric: &str, n: usize) -> Table {
    let Some(idx) = table.column_index(metric) else {
        return table.head(0);
    };
    let mut order: Vec<usize> = (0..table.len()).collect();
    order.sort_by(|&a, &b| {
        let va = table.rows()[a][idx].as_f64();
        let vb = table.rows()[b][idx].as_f64();
        match (va, vb) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    });
    order.truncate(n);
    table.select_rows(order)
}

/// Selectable centrality metrics.
pub fn metric_columns(table: &Table) -> Vec<String> {
    table
        .columns()
        .iter()
        .filter(|c| *c != VARIABLE_COLUMN)
        .cloned()
        .collect()
}

/// `(x, y)` pairs for a chart, skipping rows where either value is non-numeric.
pub fn xy_series(table: &Table, x: &str, y: &str) -> Vec<[f64; 2]> {
    let (Some(xi), Some(yi)) = (table.column_index(x), table.column_index(y)) else {
        return Vec::new();
    };
    table
        .rows()
        .iter()
        .filter_map(|row| Some([row[xi].as_f64()?, row[yi].as_f64()?]))
        .collect()
}

/// Integer with thousands separators: `12345` → `"12,345"`.
pub fn format_count(n: usize) -> String {
    group_thousands(&n.to_string())
}

/// Currency with two decimals: `1234.5` → `"$1,234.50"`.
pub fn format_money(v: f64) -> String {
    let text = format!("{:.2}", v.abs());
    let (int_part, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if v < 0.0 { "-" } else { "" };
    format!("{sign}${}.{frac}", group_thousands(int_part))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;

    fn centrality() -> Table {
        Table::from_rows(
            vec!["variable".into(), "grado".into(), "intermediacion".into()],
            vec![
                vec!["luz".into(), Value::Float(0.5), Value::Float(0.1)],
                vec!["gas".into(), Value::Float(0.9), Value::Null],
                vec!["lena".into(), Value::Null, Value::Float(0.7)],
                vec!["agua".into(), Value::Integer(1), Value::Float(0.2)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_mean() {
        let t = centrality();
        assert!((mean(&t, "grado") - 0.8).abs() < 1e-12);
        assert_eq!(mean(&t, "ingreso_real"), 0.0);
        assert_eq!(mean(&t, "variable"), 0.0);
    }

    #[test]
    fn test_top_by() {
        let t = centrality();
        let top = top_by(&t, "grado", 3);
        let names: Vec<String> = top.column("variable").unwrap().map(|v| v.to_string()).collect();
        assert_eq!(names, ["agua", "gas", "luz"]);

        let all = top_by(&t, "grado", 15);
        assert_eq!(all.value(3, "variable"), Some(&Value::from("lena")));
        assert!(top_by(&t, "missing", 5).is_empty());
    }

    #[test]
    fn test_metric_columns() {
        assert_eq!(metric_columns(&centrality()), ["grado", "intermediacion"]);
    }

    #[test]
    fn test_xy_series_skips_non_numeric() {
        let pts = xy_series(&centrality(), "grado", "intermediacion");
        assert_eq!(pts, vec![[0.5, 0.1], [1.0, 0.2]]);
        assert!(xy_series(&centrality(), "PC1", "PC2").is_empty());
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(12345), "12,345");
        assert_eq!(format_count(1234567), "1,234,567");
        assert_eq!(format_money(1234.5), "$1,234.50");
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money(-98765.432), "-$98,765.43");
    }
}
