//! Base-directory field heuristic.

use crate::settings::FinalFieldPolicy;

use super::{FieldInfo, FieldType, Modifiers};

/// Finds a field that looks like the target's overridable base folder.
///
/// The field we're looking for is always `private static File name = null;`.
/// Fields are scanned in declaration order and the first match wins. Returns
/// `None` when no field qualifies; callers treat that as non-fatal.
pub fn find_base_dir_field(
    fields: &[FieldInfo],
    final_fields: FinalFieldPolicy,
) -> Option<&FieldInfo> {
    tracing::debug!("Resolving base directory field");

    for field in fields {
        // Has to be the directory handle type itself
        if field.ty != FieldType::File {
            continue;
        }

        if !field.modifiers.contains(Modifiers::STATIC) {
            tracing::debug!("Rejecting field {} because it is not static", field.name);
            continue;
        }

        if !field.modifiers.contains(Modifiers::PRIVATE) {
            tracing::debug!("Rejecting field {} because it is not private", field.name);
            continue;
        }

        if final_fields == FinalFieldPolicy::Reject && field.modifiers.contains(Modifiers::FINAL) {
            tracing::debug!("Rejecting field {} because it is final", field.name);
            continue;
        }

        tracing::debug!(
            "Identified field {} to match conditions for base directory field",
            field.name
        );
        return Some(field);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, modifiers: Modifiers) -> FieldInfo {
        FieldInfo::new(name, FieldType::File, modifiers)
    }

    fn tie_break_fields() -> Vec<FieldInfo> {
        vec![
            file("a", Modifiers::PUBLIC | Modifiers::STATIC),
            file("b", Modifiers::PRIVATE | Modifiers::STATIC),
            file("c", Modifiers::PRIVATE | Modifiers::STATIC | Modifiers::FINAL),
        ]
    }

    #[test]
    fn test_tie_break_rejecting_final() {
        let fields = tie_break_fields();
        let found = find_base_dir_field(&fields, FinalFieldPolicy::Reject).unwrap();
        assert_eq!(found.name, "b");
    }

    #[test]
    fn test_final_field_rejected_only_under_reject_policy() {
        let fields = vec![
            file("c", Modifiers::PRIVATE | Modifiers::STATIC | Modifiers::FINAL),
            file("b", Modifiers::PRIVATE | Modifiers::STATIC),
        ];
        assert_eq!(
            find_base_dir_field(&fields, FinalFieldPolicy::Reject).unwrap().name,
            "b"
        );
        assert_eq!(
            find_base_dir_field(&fields, FinalFieldPolicy::Allow).unwrap().name,
            "c"
        );
    }

    #[test]
    fn test_first_match_wins() {
        let fields = vec![
            file("first", Modifiers::PRIVATE | Modifiers::STATIC),
            file("second", Modifiers::PRIVATE | Modifiers::STATIC),
        ];
        let found = find_base_dir_field(&fields, FinalFieldPolicy::Reject).unwrap();
        assert_eq!(found.name, "first");
    }

    #[test]
    fn test_wrong_type_ignored() {
        let fields = vec![
            FieldInfo::new(
                "s",
                FieldType::Other("java.lang.String".to_string()),
                Modifiers::PRIVATE | Modifiers::STATIC,
            ),
            FieldInfo::new(
                "sub",
                FieldType::Other("com.example.FileSubclass".to_string()),
                Modifiers::PRIVATE | Modifiers::STATIC,
            ),
        ];
        assert!(find_base_dir_field(&fields, FinalFieldPolicy::Allow).is_none());
    }

    #[test]
    fn test_instance_field_ignored() {
        let fields = vec![file("dir", Modifiers::PRIVATE)];
        assert!(find_base_dir_field(&fields, FinalFieldPolicy::Reject).is_none());
    }

    #[test]
    fn test_no_fields() {
        assert!(find_base_dir_field(&[], FinalFieldPolicy::Reject).is_none());
    }
}
