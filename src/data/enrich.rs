use std::collections::{BTreeMap, BTreeSet};

use super::catalog;
use super::model::{Table, Value};

/// Sex code of the household head.
pub const SEX_CODE: &str = "sexo_jefe";
/// Federal entity code.
pub const REGION_CODE: &str = "entidad";

pub const SEX_LABEL: &str = "sex_label";
pub const REGION_LABEL: &str = "region_label";

pub const MALE: &str = "Hombre";
pub const FEMALE: &str = "Mujer";

/// Add human-readable `sex_label` / `region_label` columns.
///
/// Source columns are kept.  A derived column is only added when its source
/// column exists, and re-running on an enriched table rewrites the same values.
pub fn enrich(table: &Table) -> Table {
    let mut out = table.clone();
    out.derive_column(SEX_CODE, SEX_LABEL, sex_label);

    if let Some(codes) = table.column(REGION_CODE) {
        let mapping = region_mapping(codes);
        out.derive_column(REGION_CODE, REGION_LABEL, |code| {
            mapping.get(code).cloned().unwrap_or(Value::Null)
        });
    }

    out
}

/// Code 1 is "Hombre"; every other value, missing included, is "Mujer".
fn sex_label(code: &Value) -> Value {
    if code.as_f64() == Some(1.0) {
        Value::from(MALE)
    } else {
        Value::from(FEMALE)
    }
}

/// Label mapping over the distinct codes actually present.
fn region_mapping<'a>(codes: impl Iterator<Item = &'a Value>) -> BTreeMap<&'a Value, Value> {
    let distinct: BTreeSet<&Value> = codes.collect();
    let names = catalog::labels_for(distinct.iter().filter_map(|v| v.as_i64()));
    distinct
        .into_iter()
        .map(|code| {
            let label = match code {
                Value::Null => Value::Null,
                other => match other.as_i64() {
                    Some(c) => Value::from(
                        names
                            .get(&c)
                            .cloned()
                            .unwrap_or_else(|| catalog::lookup(c))
                            .into_owned(),
                    ),
                    None => Value::from(format!("Region {}", other.to_field())),
                },
            };
            (code, label)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str], rows: Vec<Vec<Value>>) -> Table {
        Table::from_rows(columns.iter().map(|s| s.to_string()).collect(), rows).unwrap()
    }

    fn labels(t: &Table, col: &str) -> Vec<String> {
        t.column(col).unwrap().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_region_labels() {
        let t = table(
            &[REGION_CODE],
            vec![
                vec![Value::Integer(1)],
                vec![Value::Integer(9)],
                vec![Value::Integer(99)],
            ],
        );
        let out = enrich(&t);
        assert_eq!(
            labels(&out, REGION_LABEL),
            ["Aguascalientes", "Ciudad de México", "Region 99"]
        );
        assert!(!out.has_column(SEX_LABEL));
    }

    #[test]
    fn test_region_float_and_null_codes() {
        let t = table(
            &[REGION_CODE],
            vec![
                vec![Value::Float(14.0)],
                vec![Value::Null],
                vec![Value::Float(2.5)],
            ],
        );
        let out = enrich(&t);
        assert_eq!(out.value(0, REGION_LABEL), Some(&Value::from("Jalisco")));
        assert_eq!(out.value(1, REGION_LABEL), Some(&Value::Null));
        assert_eq!(out.value(2, REGION_LABEL), Some(&Value::from("Region 2.5")));
    }

    #[test]
    fn test_out_of_range_region_codes_keep_their_code() {
        let t = table(
            &[REGION_CODE],
            vec![vec![Value::Float(1e30)], vec![Value::Float(2e30)]],
        );
        let out = enrich(&t);
        let first = out.value(0, REGION_LABEL).unwrap().to_string();
        let second = out.value(1, REGION_LABEL).unwrap().to_string();
        assert_ne!(first, second);
        assert_eq!(first, format!("Region {}", Value::Float(1e30).to_field()));
        assert!(!first.contains(&i64::MAX.to_string()));
    }

    #[test]
    fn test_sex_labels() {
        let t = table(
            &[SEX_CODE],
            vec![
                vec![Value::Integer(1)],
                vec![Value::Integer(2)],
                vec![Value::Integer(3)],
                vec![Value::Null],
                vec![Value::Float(1.0)],
            ],
        );
        let out = enrich(&t);
        assert_eq!(
            labels(&out, SEX_LABEL),
            [MALE, FEMALE, FEMALE, FEMALE, MALE]
        );
        assert!(!out.has_column(REGION_LABEL));
    }

    #[test]
    fn test_enrich_keeps_source_columns() {
        let t = table(
            &["folioviv", SEX_CODE, REGION_CODE],
            vec![vec![Value::Integer(7), Value::Integer(1), Value::Integer(19)]],
        );
        let out = enrich(&t);
        assert_eq!(
            out.columns(),
            ["folioviv", SEX_CODE, REGION_CODE, SEX_LABEL, REGION_LABEL]
        );
        assert_eq!(out.value(0, "folioviv"), Some(&Value::Integer(7)));
        assert_eq!(out.value(0, REGION_LABEL), Some(&Value::from("Nuevo León")));
    }

    #[test]
    fn test_enrich_is_idempotent() {
        let t = table(
            &[SEX_CODE, REGION_CODE],
            vec![
                vec![Value::Integer(1), Value::Integer(5)],
                vec![Value::Integer(2), Value::Integer(40)],
                vec![Value::Null, Value::Null],
            ],
        );
        let once = enrich(&t);
        assert_eq!(enrich(&once), once);
    }

    #[test]
    fn test_no_source_columns_is_noop() {
        let t = table(&["PC1"], vec![vec![Value::Float(0.3)]]);
        assert_eq!(enrich(&t), t);
    }
}
