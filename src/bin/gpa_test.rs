use gradeboard::gpa::{recalculate_all_cgpas, recalculate_cgpa};
use gradeboard::semester::SemesterRecord;

// Helper function to check the cumulative invariant over a prefix
fn assert_cumulative(records: &[SemesterRecord]) {
    for i in 0..records.len() {
        let points: f64 = records[..=i].iter().map(|s| s.earned_grade_points).sum();
        let credits: f64 = records[..=i].iter().map(|s| s.total_course_credit).sum();
        let expected = if credits > 0.0 { points / credits } else { 0.0 };
        assert!(
            (records[i].cgpa - expected).abs() < 1e-9,
            "semester {} cgpa {} expected {}",
            i + 1,
            records[i].cgpa,
            expected
        );
    }
    println!(
        "✓ Cumulative invariant holds across {} semesters",
        records.len()
    );
}

fn test_single_semester() {
    println!("\n====== Testing a single semester ======");
    let records = vec![SemesterRecord::new(1, 8.0, 20.0)];
    let updated = recalculate_all_cgpas(&records);
    assert_eq!(updated[0].earned_grade_points, 160.0);
    assert_eq!(updated[0].cgpa, 8.0);
    println!("✓ 160 grade points over 20 credits gives CGPA 8.0");
}

fn test_two_semester_edit() {
    println!("\n====== Testing a two semester edit ======");
    let records = recalculate_all_cgpas(&[
        SemesterRecord::new(1, 8.0, 20.0),
        SemesterRecord::new(2, 6.0, 20.0),
    ]);
    assert_eq!(records[1].cgpa, 7.0);
    println!("✓ Baseline CGPA is 7.0");

    let updated = recalculate_cgpa(&records, 1, 10.0);
    assert_eq!(updated[1].earned_grade_points, 200.0);
    assert_eq!(updated[0].cgpa, 8.0);
    assert_eq!(updated[1].cgpa, 9.0);
    println!("✓ Raising semester 2 to 10.0 moves CGPA to 9.0");

    // The edit never touches its input
    assert_eq!(records[1].sgpa, 6.0);
    assert_eq!(records[1].cgpa, 7.0);
    println!("✓ Input records are unchanged");
}

fn test_full_run() {
    println!("\n====== Testing a full eight semester run ======");
    let records = gradeboard::loader::example_semesters();
    assert_cumulative(&records);

    for index in 0..records.len() {
        let updated = recalculate_cgpa(&records, index, 5.0);
        assert_cumulative(&updated);
    }
    println!("✓ Every single-semester edit keeps the run consistent");
}

fn main() {
    println!("=== GPA Engine Test Suite ===");

    test_single_semester();
    test_two_semester_edit();
    test_full_run();

    println!("\nAll tests completed.");
}
