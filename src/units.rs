//! Mass conversion between kilograms (canonical) and pounds (display).

pub const KG_TO_LBS: f64 = 2.20462;

pub fn to_lbs(kg: f64) -> f64 {
    kg * KG_TO_LBS
}

pub fn to_kg(lbs: f64) -> f64 {
    lbs / KG_TO_LBS
}

/// Arithmetic reading of a weight field: empty or unparseable input is 0.
pub fn parse_weight(input: &str) -> f64 {
    input.trim().parse().unwrap_or(0.0)
}

/// Mirror an edited kg field into its lbs twin. The edited text itself is
/// left exactly as typed (a trailing "12." must survive), and clearing one
/// field clears the other instead of collapsing it to "0.0".
pub fn mirror_kg_to_lbs(kg_text: &str) -> String {
    if kg_text.is_empty() {
        String::new()
    } else {
        format!("{:.1}", to_lbs(parse_weight(kg_text)))
    }
}

pub fn mirror_lbs_to_kg(lbs_text: &str) -> String {
    if lbs_text.is_empty() {
        String::new()
    } else {
        format!("{:.1}", to_kg(parse_weight(lbs_text)))
    }
}
