use std::borrow::Cow;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Federal entity catalog (INEGI numbering)
// ---------------------------------------------------------------------------

const ENTITIES: [&str; 32] = [
    "Aguascalientes",
    "Baja California",
    "Baja California Sur",
    "Campeche",
    "Coahuila de Zaragoza",
    "Colima",
    "Chiapas",
    "Chihuahua",
    "Ciudad de México",
    "Durango",
    "Guanajuato",
    "Guerrero",
    "Hidalgo",
    "Jalisco",
    "México",
    "Michoacán de Ocampo",
    "Morelos",
    "Nayarit",
    "Nuevo León",
    "Oaxaca",
    "Puebla",
    "Querétaro",
    "Quintana Roo",
    "San Luis Potosí",
    "Sinaloa",
    "Sonora",
    "Tabasco",
    "Tamaulipas",
    "Tlaxcala",
    "Veracruz de Ignacio de la Llave",
    "Yucatán",
    "Zacatecas",
];

/// Canonical name for a known region code.
pub fn name(code: i64) -> Option<&'static str> {
    let idx = usize::try_from(code.checked_sub(1)?).ok()?;
    ENTITIES.get(idx).copied()
}

/// Region name for any code; unknown codes get a `"Region <code>"` placeholder.
pub fn lookup(code: i64) -> Cow<'static, str> {
    match name(code) {
        Some(n) => Cow::Borrowed(n),
        None => Cow::Owned(format!("Region {code}")),
    }
}

/// Every known code, ascending.
pub fn codes() -> impl Iterator<Item = i64> {
    1..=ENTITIES.len() as i64
}

/// Name mapping restricted to the given codes.
pub fn labels_for(codes: impl IntoIterator<Item = i64>) -> BTreeMap<i64, Cow<'static, str>> {
    codes.into_iter().map(|c| (c, lookup(c))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(lookup(1), "Aguascalientes");
        assert_eq!(lookup(9), "Ciudad de México");
        assert_eq!(lookup(32), "Zacatecas");
        assert!(codes().all(|c| name(c).is_some()));
        assert_eq!(codes().count(), 32);
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        assert_eq!(lookup(0), "Region 0");
        assert_eq!(lookup(33), "Region 33");
        assert_eq!(lookup(-4), "Region -4");
        assert_eq!(lookup(i64::MIN), format!("Region {}", i64::MIN));
        assert!(name(99).is_none());
    }

    #[test]
    fn test_labels_for_is_restricted() {
        let map = labels_for([15, 99]);
        assert_eq!(map.len(), 2);
        assert_eq!(map[&15], "México");
        assert_eq!(map[&99], "Region 99");
    }
}
