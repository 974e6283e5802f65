use serde::Serialize;

/// A doctor role appointments are tracked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AppointmentRole {
    pub code: &'static str,
    pub label: &'static str,
}

/// Fixed role list. Its order is also the tie-break order for same-instant appointments.
pub const APPOINTMENT_ROLES: &[AppointmentRole] = &[
    AppointmentRole {
        code: "nephro",
        label: "Nephrologist",
    },
    AppointmentRole {
        code: "cardio",
        label: "Cardiologist",
    },
    AppointmentRole {
        code: "endo",
        label: "Endocrinologist",
    },
    AppointmentRole {
        code: "gp",
        label: "General practitioner",
    },
    AppointmentRole {
        code: "uro",
        label: "Urologist",
    },
];

pub fn find_role(code: &str) -> Option<&'static AppointmentRole> {
    APPOINTMENT_ROLES.iter().find(|role| role.code == code)
}

/// Human-readable label for `code`, or `None` for an unknown code.
pub fn role_label(code: &str) -> Option<&'static str> {
    find_role(code).map(|role| role.label)
}

/// Position of `code` in [`APPOINTMENT_ROLES`].
pub fn role_index(code: &str) -> Option<usize> {
    APPOINTMENT_ROLES.iter().position(|role| role.code == code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_code_resolves_label() {
        assert_eq!(role_label("nephro"), Some("Nephrologist"));
        assert_eq!(role_index("nephro"), Some(0));
    }

    #[test]
    fn unknown_code_has_no_label() {
        assert_eq!(role_label("dentist"), None);
        assert!(find_role("").is_none());
        assert_eq!(role_index("NEPHRO"), None);
    }

    #[test]
    fn role_codes_are_unique() {
        let mut codes: Vec<&str> = APPOINTMENT_ROLES.iter().map(|r| r.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), APPOINTMENT_ROLES.len());
    }
}
