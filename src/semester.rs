use serde::{Deserialize, Serialize};

/// One academic term as shown on the dashboard. Serialized field names match
/// the portal's grade payload so cached API responses deserialize directly.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct SemesterRecord {
    #[serde(rename = "stynumber")]
    pub semester_number: u32,
    pub sgpa: f64,
    #[serde(default)]
    pub cgpa: f64,
    #[serde(rename = "earnedgradepoints")]
    pub earned_grade_points: f64,
    #[serde(rename = "totalcoursecredit")]
    pub total_course_credit: f64,
    /// Marks a projected term added for planning. Presentation only; the
    /// arithmetic treats it like any other term.
    #[serde(default, rename = "speculative")]
    pub is_speculative: bool,
}

impl SemesterRecord {
    pub fn new(semester_number: u32, sgpa: f64, total_course_credit: f64) -> Self {
        SemesterRecord {
            semester_number,
            sgpa,
            cgpa: 0.0,
            earned_grade_points: sgpa * total_course_credit,
            total_course_credit,
            is_speculative: false,
        }
    }

    /// Copy of this record with a new SGPA and the earned grade points
    /// re-derived from it. CGPA is left for the recalculation pass.
    pub fn with_sgpa(&self, new_sgpa: f64) -> Self {
        SemesterRecord {
            sgpa: new_sgpa,
            earned_grade_points: new_sgpa * self.total_course_credit,
            ..self.clone()
        }
    }
}

/// Clamp an SGPA into the displayable domain. Values are never rejected.
pub fn clamp_sgpa(value: f64, min_sgpa: f64, max_sgpa: f64) -> f64 {
    value.max(min_sgpa).min(max_sgpa)
}

/// Round to the configured step, e.g. a step of 0.1 keeps one decimal.
/// Non-positive steps disable rounding.
pub fn round_to_precision(value: f64, precision: f64) -> f64 {
    if precision > 0.0 {
        (value / precision).round() * precision
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_sgpa_rederives_earned_points() {
        let sem = SemesterRecord::new(1, 8.0, 20.0);
        let edited = sem.with_sgpa(6.5);
        assert_eq!(edited.sgpa, 6.5);
        assert_eq!(edited.earned_grade_points, 130.0);
        assert_eq!(edited.total_course_credit, 20.0);
        assert_eq!(edited.semester_number, 1);
        // the source record is untouched
        assert_eq!(sem.sgpa, 8.0);
        assert_eq!(sem.earned_grade_points, 160.0);
    }

    #[test]
    fn clamp_keeps_domain() {
        assert_eq!(clamp_sgpa(15.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp_sgpa(-3.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp_sgpa(7.3, 0.0, 10.0), 7.3);
    }

    #[test]
    fn rounding_follows_step() {
        assert!((round_to_precision(8.34, 0.1) - 8.3).abs() < 1e-9);
        assert!((round_to_precision(8.35, 0.1) - 8.4).abs() < 1e-9);
        assert_eq!(round_to_precision(8.34, 0.0), 8.34);
    }

    #[test]
    fn portal_payload_field_names_roundtrip() {
        let json = r#"{"stynumber":3,"sgpa":7.5,"cgpa":7.8,"earnedgradepoints":165.0,"totalcoursecredit":22.0}"#;
        let sem: SemesterRecord = serde_json::from_str(json).unwrap();
        assert_eq!(sem.semester_number, 3);
        assert_eq!(sem.sgpa, 7.5);
        assert!(!sem.is_speculative);
        let back = serde_json::to_value(&sem).unwrap();
        assert_eq!(back["stynumber"], 3);
        assert_eq!(back["earnedgradepoints"], 165.0);
    }
}
