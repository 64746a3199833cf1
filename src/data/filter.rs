use std::collections::BTreeMap;

use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Filter predicate: one optional value per column
// ---------------------------------------------------------------------------

/// Constraint on a single column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Wildcard: no restriction.
    #[default]
    All,
    /// Keep rows whose value equals this one.
    Only(Value),
}

/// Per-column selections: maps column_name → constraint.
/// A column absent from the map is unconstrained.
pub type FilterState = BTreeMap<String, Selection>;

/// Return indices of rows that pass every non-wildcard selection.
///
/// A row referencing a column the table does not have never matches a
/// concrete value, so such a selection yields no rows.
pub fn filtered_indices(table: &Table, filters: &FilterState) -> Vec<usize> {
    let active: Vec<(Option<usize>, &Value)> = filters
        .iter()
        .filter_map(|(col, sel)| match sel {
            Selection::All => None,
            Selection::Only(v) => Some((table.column_index(col), v)),
        })
        .collect();

    table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            active
                .iter()
                .all(|(idx, wanted)| idx.is_some_and(|i| row[i] == **wanted))
        })
        .map(|(i, _)| i)
        .collect()
}

/// The subset of `table` matching all selections.
pub fn filter(table: &Table, filters: &FilterState) -> Table {
    if filters.values().all(|s| *s == Selection::All) {
        return table.clone();
    }
    table.select_rows(filtered_indices(table, filters))
}

/// Selector choices for a column: distinct values in first-appearance order.
pub fn options(table: &Table, column: &str) -> Vec<Value> {
    table.unique_values(column)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn households() -> Table {
        let rows = [
            ("Hombre", "Jalisco", 1.0),
            ("Mujer", "Jalisco", 2.0),
            ("Hombre", "Colima", 3.0),
            ("Mujer", "Oaxaca", 4.0),
            ("Hombre", "Jalisco", 5.0),
        ]
        .into_iter()
        .map(|(s, r, pc)| vec![Value::from(s), Value::from(r), Value::Float(pc)])
        .collect();
        Table::from_rows(
            vec!["sex_label".into(), "region_label".into(), "PC1".into()],
            rows,
        )
        .unwrap()
    }

    fn only(pairs: &[(&str, &str)]) -> FilterState {
        pairs
            .iter()
            .map(|(c, v)| (c.to_string(), Selection::Only(Value::from(*v))))
            .collect()
    }

    #[test]
    fn test_wildcards_are_identity() {
        let t = households();
        assert_eq!(filter(&t, &FilterState::new()), t);

        let mut all = FilterState::new();
        all.insert("sex_label".into(), Selection::All);
        all.insert("region_label".into(), Selection::All);
        assert_eq!(filter(&t, &all), t);
    }

    #[test]
    fn test_conjunctive() {
        let t = households();
        let out = filter(&t, &only(&[("sex_label", "Hombre"), ("region_label", "Jalisco")]));
        assert_eq!(out.len(), 2);
        assert_eq!(filtered_indices(&t, &only(&[("sex_label", "Hombre"), ("region_label", "Jalisco")])), [0, 4]);
    }

    #[test]
    fn test_idempotent_and_commutative() {
        let t = households();
        let sex = only(&[("sex_label", "Mujer")]);
        let region = only(&[("region_label", "Oaxaca")]);

        let once = filter(&t, &sex);
        assert_eq!(filter(&once, &sex), once);
        assert_eq!(
            filter(&filter(&t, &sex), &region),
            filter(&filter(&t, &region), &sex)
        );
    }

    #[test]
    fn test_absent_value_or_column_yields_nothing() {
        let t = households();
        assert!(filter(&t, &only(&[("region_label", "Sonora")])).is_empty());
        assert!(filter(&t, &only(&[("no_such_column", "x")])).is_empty());
        assert_eq!(filter(&t, &only(&[("no_such_column", "x")])).columns(), t.columns());
    }

    #[test]
    fn test_options_in_appearance_order() {
        let t = households();
        assert_eq!(
            options(&t, "region_label"),
            [Value::from("Jalisco"), Value::from("Colima"), Value::from("Oaxaca")]
        );
    }
}
