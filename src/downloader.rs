#![cfg(not(tarpaulin_include))]

use std::error::Error;

use crate::semester::SemesterRecord;

/// Convert the semester table to CSV format
///
/// This exports the current (possibly what-if-edited) semester table to
/// CSV so it can be downloaded from the dashboard. The layout is one row
/// per semester with:
/// - A header row naming the columns
/// - Values comma-separated, one decimal for the grade averages
/// - Fields escaped when they contain commas, quotes or newlines
///
/// # Arguments
/// * `records` - The semester records to export
///
/// # Returns
/// * `Result<String, Box<dyn Error>>` - CSV content as a string or an error
///
/// # Examples
/// ```
/// use gradeboard::downloader::to_csv;
/// use gradeboard::loader::example_semesters;
///
/// let csv = to_csv(&example_semesters()).unwrap();
/// assert!(csv.starts_with("Semester,SGPA,CGPA"));
/// ```
pub fn to_csv(records: &[SemesterRecord]) -> Result<String, Box<dyn Error>> {
    let mut csv_content = String::new();

    csv_content.push_str("Semester,SGPA,CGPA,EarnedGradePoints,TotalCourseCredit,Speculative\n");

    for sem in records {
        let fields = [
            sem.semester_number.to_string(),
            format!("{:.1}", sem.sgpa),
            format!("{:.2}", sem.cgpa),
            format!("{:.1}", sem.earned_grade_points),
            format!("{:.1}", sem.total_course_credit),
            if sem.is_speculative { "yes" } else { "no" }.to_string(),
        ];

        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                csv_content.push(',');
            }
            csv_content.push_str(&escape_csv_field(field));
        }
        csv_content.push('\n');
    }

    Ok(csv_content)
}

// Escape commas, quotes and newlines as needed
fn escape_csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        let escaped = value.replace('"', "\"\"");
        format!("\"{}\"", escaped)
    } else {
        value.to_string()
    }
}

/// Convert the semester table to XLSX format
///
/// This exports the semester table to XLSX (Excel) using the
/// rust_xlsxwriter library, preserving numeric types so spreadsheet
/// applications can chart the columns directly.
///
/// # Arguments
/// * `records` - The semester records to export
///
/// # Returns
/// * `Result<Vec<u8>, Box<dyn Error>>` - XLSX file content as bytes or an error
#[cfg(feature = "web")]
pub fn to_xlsx(records: &[SemesterRecord]) -> Result<Vec<u8>, Box<dyn Error>> {
    use rust_xlsxwriter::Workbook;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    let headers = [
        "Semester",
        "SGPA",
        "CGPA",
        "EarnedGradePoints",
        "TotalCourseCredit",
        "Speculative",
    ];
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (i, sem) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_number(row, 0, sem.semester_number as f64)?;
        worksheet.write_number(row, 1, sem.sgpa)?;
        worksheet.write_number(row, 2, sem.cgpa)?;
        worksheet.write_number(row, 3, sem.earned_grade_points)?;
        worksheet.write_number(row, 4, sem.total_course_credit)?;
        worksheet.write_string(row, 5, if sem.is_speculative { "yes" } else { "no" })?;
    }

    let buffer = workbook.save_to_buffer()?;
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::example_semesters;

    #[test]
    fn csv_has_header_and_one_row_per_semester() {
        let csv = to_csv(&example_semesters()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(
            lines[0],
            "Semester,SGPA,CGPA,EarnedGradePoints,TotalCourseCredit,Speculative"
        );
        assert!(lines[1].starts_with("1,7.6,"));
        assert!(lines[1].ends_with(",no"));
    }

    #[test]
    fn csv_of_empty_table_is_just_the_header() {
        let csv = to_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn escaping_quotes_fields_when_needed() {
        assert_eq!(escape_csv_field("8.5"), "8.5");
        assert_eq!(escape_csv_field("a,b"), "\"a,b\"");
        assert_eq!(escape_csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[cfg(feature = "web")]
    #[test]
    fn xlsx_export_produces_a_workbook() {
        let bytes = to_xlsx(&example_semesters()).unwrap();
        // XLSX files are zip archives, PK signature first
        assert!(bytes.starts_with(b"PK"));
    }
}
