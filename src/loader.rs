#![cfg(not(tarpaulin_include))]

use std::error::Error;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::semester::SemesterRecord;

/// Shape of the portal's cached SGPA/CGPA response. The dashboard never
/// talks to the portal itself; it renders snapshots captured by the API
/// client and keeps them in memory for the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradePayload {
    #[serde(rename = "semesterList")]
    pub semester_list: Vec<SemesterRecord>,
}

/// A parsed snapshot plus the moment this process loaded it, surfaced in
/// API responses so the host can show how stale the cached data is.
#[derive(Debug, Clone)]
pub struct LoadedSnapshot {
    pub records: Vec<SemesterRecord>,
    pub fetched_at: DateTime<Utc>,
}

/// Parse a cached grade payload from its JSON text
///
/// This accepts the portal's SGPA/CGPA response as captured by the API
/// client and converts it into the dashboard's semester records. The
/// records keep the order the portal sent; position in the list is the
/// chronological order.
///
/// # Arguments
/// * `payload` - JSON text of the cached response
///
/// # Returns
/// * `Result<Vec<SemesterRecord>, Box<dyn Error>>` - The ordered records or an error
///
/// # Errors
/// * Malformed JSON or a missing `semesterList` key
/// * An empty semester list (the portal answers this way before any grade
///   sheet is published)
///
/// # Examples
/// ```
/// use gradeboard::loader::records_from_json;
///
/// let payload = r#"{"semesterList":[
///     {"stynumber":1,"sgpa":8.0,"cgpa":8.0,"earnedgradepoints":160.0,"totalcoursecredit":20.0}
/// ]}"#;
/// let records = records_from_json(payload).unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].sgpa, 8.0);
/// ```
pub fn records_from_json(payload: &str) -> Result<Vec<SemesterRecord>, Box<dyn Error>> {
    let parsed: GradePayload = serde_json::from_str(payload)?;

    if parsed.semester_list.is_empty() {
        return Err("grade sheet is not available".into());
    }

    Ok(parsed.semester_list)
}

/// Load a cached grade payload from a file
///
/// Reads a snapshot file written by the API client and stamps it with the
/// load time. The upstream values are taken as-is; this layer does not
/// second-guess the portal's arithmetic.
///
/// # Arguments
/// * `filepath` - Path to the snapshot JSON file
///
/// # Returns
/// * `Result<LoadedSnapshot, Box<dyn Error>>` - The snapshot or an error
///
/// # Examples
/// ```no_run
/// use gradeboard::loader::from_json_file;
///
/// match from_json_file("grades.json") {
///     Ok(snapshot) => println!("loaded {} semesters", snapshot.records.len()),
///     Err(e) => eprintln!("error loading snapshot: {}", e),
/// }
/// ```
pub fn from_json_file(filepath: impl AsRef<Path>) -> Result<LoadedSnapshot, Box<dyn Error>> {
    let payload = fs::read_to_string(filepath)?;
    let records = records_from_json(&payload)?;

    Ok(LoadedSnapshot {
        records,
        fetched_at: Utc::now(),
    })
}

/// A realistic eight-semester run used by the demo binaries and as the
/// fallback dataset when the server starts without a snapshot file.
pub fn example_semesters() -> Vec<SemesterRecord> {
    let raw = [
        (1u32, 7.6, 24.5),
        (2, 8.2, 23.0),
        (3, 6.9, 25.0),
        (4, 8.8, 22.0),
        (5, 7.4, 24.0),
        (6, 9.1, 21.5),
        (7, 8.0, 20.0),
        (8, 8.5, 18.0),
    ];

    let records: Vec<SemesterRecord> = raw
        .iter()
        .map(|&(number, sgpa, credit)| SemesterRecord::new(number, sgpa, credit))
        .collect();

    crate::gpa::recalculate_all_cgpas(&records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_portal_field_names() {
        let payload = r#"{"semesterList":[
            {"stynumber":1,"sgpa":8.0,"cgpa":8.0,"earnedgradepoints":160.0,"totalcoursecredit":20.0},
            {"stynumber":2,"sgpa":6.0,"cgpa":7.0,"earnedgradepoints":120.0,"totalcoursecredit":20.0}
        ]}"#;
        let records = records_from_json(payload).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].semester_number, 2);
        assert_eq!(records[1].earned_grade_points, 120.0);
        assert_eq!(records[1].cgpa, 7.0);
    }

    #[test]
    fn empty_semester_list_is_an_error() {
        let err = records_from_json(r#"{"semesterList":[]}"#).unwrap_err();
        assert!(err.to_string().contains("not available"));
    }

    #[test]
    fn malformed_payload_is_an_error() {
        assert!(records_from_json("{}").is_err());
        assert!(records_from_json("not json").is_err());
    }

    #[test]
    fn file_loader_stamps_fetch_time() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        use std::io::Write;
        write!(
            file,
            r#"{{"semesterList":[{{"stynumber":1,"sgpa":8.0,"cgpa":8.0,"earnedgradepoints":160.0,"totalcoursecredit":20.0}}]}}"#
        )
        .unwrap();
        let snapshot = from_json_file(file.path()).unwrap();
        assert_eq!(snapshot.records.len(), 1);
        assert!(snapshot.fetched_at <= Utc::now());
    }

    #[test]
    fn example_data_is_internally_consistent() {
        let records = example_semesters();
        assert_eq!(records.len(), 8);
        for (i, sem) in records.iter().enumerate() {
            assert_eq!(sem.semester_number as usize, i + 1);
            let points: f64 = records[..=i].iter().map(|s| s.earned_grade_points).sum();
            let credits: f64 = records[..=i].iter().map(|s| s.total_course_credit).sum();
            assert!((sem.cgpa - points / credits).abs() < 1e-9);
        }
    }
}
