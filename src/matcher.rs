//! Description similarity
//!
//! Decides whether two task descriptions name the same logical task. Checks
//! run from strict to loose and the first hit wins.

/// Minimum `shorter / longer` length ratio for a containment match.
pub const CONTAINMENT_RATIO: f64 = 0.70;

/// Whether `a` and `b` denote the same task.
///
/// Symmetric and total. Two empty strings are similar (exact equality), but an
/// empty string never matches a non-empty one through containment.
pub fn similar(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }

    if a.to_lowercase() == b.to_lowercase() {
        return true;
    }

    let a = normalize(a);
    let b = normalize(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }

    let (shorter, longer) = if a.len() <= b.len() { (&a, &b) } else { (&b, &a) };
    if !longer.contains(shorter.as_str()) {
        return false;
    }

    shorter.len() as f64 / longer.len() as f64 >= CONTAINMENT_RATIO
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
