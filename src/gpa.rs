use crate::semester::SemesterRecord;

/// Recalculates CGPA for all semesters after modifying one semester's SGPA.
///
/// Produces a full copy of `records` where `modified_index` carries
/// `new_sgpa` (earned grade points re-derived), then recomputes the
/// cumulative value for every semester with the running-sum formula.
/// The input slice is never mutated.
///
/// `new_sgpa` is taken verbatim; clamping to the display domain is the
/// caller's responsibility. `modified_index` must be in range.
pub fn recalculate_cgpa(
    records: &[SemesterRecord],
    modified_index: usize,
    new_sgpa: f64,
) -> Vec<SemesterRecord> {
    assert!(
        modified_index < records.len(),
        "semester index {} out of range for {} semesters",
        modified_index,
        records.len()
    );

    let mut updated: Vec<SemesterRecord> = records.to_vec();
    updated[modified_index] = updated[modified_index].with_sgpa(new_sgpa);
    recalculate_in_place(&mut updated);
    updated
}

/// Recalculates CGPA for every semester from the SGPA and earned grade
/// points already present on each record. SGPA, earned grade points,
/// credit loads and semester numbers are untouched; the input slice is
/// never mutated.
pub fn recalculate_all_cgpas(records: &[SemesterRecord]) -> Vec<SemesterRecord> {
    let mut updated: Vec<SemesterRecord> = records.to_vec();
    recalculate_in_place(&mut updated);
    updated
}

// Full recompute from semester 1 on every call; the sequence tops out
// around a dozen semesters.
fn recalculate_in_place(records: &mut [SemesterRecord]) {
    for i in 0..records.len() {
        let mut total_grade_points = 0.0;
        let mut total_credits = 0.0;

        // Sum grade points and credits from semester 1 through semester i
        for sem in records[..=i].iter() {
            total_grade_points += sem.earned_grade_points;
            total_credits += sem.total_course_credit;
        }

        records[i].cgpa = if total_credits > 0.0 {
            total_grade_points / total_credits
        } else {
            0.0
        };
    }
}
