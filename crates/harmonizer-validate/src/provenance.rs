//! Provenance stamping.
//!
//! Provenance cells record the application version that last validated the
//! row: `Harmonizer provenance: v0.13.16;<anything the user kept>`.

/// Prefix identifying a provenance tag segment.
pub const PROVENANCE_PREFIX: &str = "Harmonizer provenance";

pub fn provenance_tag(version: &str) -> String {
    format!("{PROVENANCE_PREFIX}: v{version}")
}

/// Stamp `value` with the tag for `version`.
///
/// An existing tag in the first `;`-segment is replaced; otherwise the tag is
/// prepended as a new first segment. The rest of the value is kept as is.
pub fn stamp_provenance(value: &str, version: &str) -> String {
    let tag = provenance_tag(version);
    if value.is_empty() {
        return tag;
    }
    let mut segments = value.splitn(2, ';');
    let first = segments.next().unwrap_or_default();
    let rest = segments.next();
    match (first.starts_with(PROVENANCE_PREFIX), rest) {
        (true, Some(rest)) => format!("{tag};{rest}"),
        (true, None) => tag,
        (false, _) => format!("{tag};{value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_empty_and_foreign_values() {
        assert_eq!(stamp_provenance("", "1.0.0"), "Harmonizer provenance: v1.0.0");
        assert_eq!(
            stamp_provenance("lab note", "1.0.0"),
            "Harmonizer provenance: v1.0.0;lab note"
        );
    }

    #[test]
    fn replaces_an_older_tag() {
        assert_eq!(
            stamp_provenance("Harmonizer provenance: v0.9.0;a;b", "1.0.0"),
            "Harmonizer provenance: v1.0.0;a;b"
        );
        assert_eq!(
            stamp_provenance("Harmonizer provenance: v0.9.0", "1.0.0"),
            "Harmonizer provenance: v1.0.0"
        );
    }

    #[test]
    fn stamping_is_stable() {
        let once = stamp_provenance("note", "2.0.0");
        assert_eq!(stamp_provenance(&once, "2.0.0"), once);
    }
}
