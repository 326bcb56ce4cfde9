#![cfg(not(tarpaulin_include))]
#![cfg(feature = "web")]
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

use crate::semester::SemesterRecord;

/// Configuration options for chart rendering
///
/// This structure contains the customizable properties for the rendered
/// GPA chart.
#[derive(Clone, Debug)]
pub struct ChartStyle {
    /// Title displayed at the top of the chart
    pub title: String,

    /// Label for the X-axis
    pub x_label: String,

    /// Label for the Y-axis
    pub y_label: String,

    /// Width of the chart in pixels
    pub width: u32,

    /// Height of the chart in pixels
    pub height: u32,
}

impl Default for ChartStyle {
    /// Creates a default configuration for chart rendering
    ///
    /// # Returns
    /// * `ChartStyle` - Default configuration with:
    ///   - 800x600 pixel dimensions
    ///   - The dashboard's standard captions
    fn default() -> Self {
        Self {
            title: "SGPA and CGPA by semester".to_string(),
            x_label: "Semester".to_string(),
            y_label: "Grade points".to_string(),
            width: 800,
            height: 600,
        }
    }
}

/// Renders the GPA chart as a PNG image
///
/// This is the main entry point for rendering the dashboard's chart
/// server-side. It draws the CGPA line first so it sits behind the SGPA
/// line, mirroring the interactive chart's layering. The Y domain is
/// pinned to the SGPA scale of 0 to 10 regardless of the data.
///
/// # Arguments
/// * `records` - The semester records to plot, in chronological order
/// * `style` - Chart styling options
///
/// # Returns
/// * A Result containing the PNG image data as bytes or an error
///
/// # Examples
/// ```no_run
/// use gradeboard::graph::{ChartStyle, render_gpa_chart};
/// use gradeboard::loader::example_semesters;
///
/// match render_gpa_chart(&example_semesters(), &ChartStyle::default()) {
///     Ok(png_data) => println!("Chart rendered: {} bytes", png_data.len()),
///     Err(e) => eprintln!("Failed to render chart: {}", e),
/// }
/// ```
pub fn render_gpa_chart(
    records: &[SemesterRecord],
    style: &ChartStyle,
) -> Result<Vec<u8>, Box<dyn Error>> {
    // Scratch file for the bitmap backend; removed when the handle drops
    let tmp = tempfile::Builder::new().suffix(".png").tempfile()?;
    draw_chart(records, style, tmp.path())?;

    let buffer = std::fs::read(tmp.path())?;
    Ok(buffer)
}

/// Saves the GPA chart to a file
///
/// Renders the chart and writes it directly to the given path. Useful for
/// generating examples or saving charts without returning the image data.
///
/// # Arguments
/// * `records` - The semester records to plot
/// * `style` - Chart styling options
/// * `path` - File path where the chart should be saved
///
/// # Returns
/// * A Result indicating success or failure
pub fn save_gpa_chart(
    records: &[SemesterRecord],
    style: &ChartStyle,
    path: impl AsRef<Path>,
) -> Result<(), Box<dyn Error>> {
    draw_chart(records, style, path.as_ref())
}

fn draw_chart(
    records: &[SemesterRecord],
    style: &ChartStyle,
    path: &Path,
) -> Result<(), Box<dyn Error>> {
    if records.is_empty() {
        return Err("no semesters to plot".into());
    }

    let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let last = records.last().map(|s| s.semester_number).unwrap_or(1) as f64;
    let x_range = 0.5..last + 0.5;
    let y_range = 0.0..10.0;

    let mut chart = ChartBuilder::on(&root)
        .caption(&style.title, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(&style.x_label)
        .y_desc(&style.y_label)
        .x_labels(records.len())
        .y_labels(6)
        .draw()?;

    let cgpa_points: Vec<(f64, f64)> = records
        .iter()
        .map(|s| (s.semester_number as f64, s.cgpa))
        .collect();
    let sgpa_points: Vec<(f64, f64)> = records
        .iter()
        .map(|s| (s.semester_number as f64, s.sgpa))
        .collect();

    // CGPA behind, SGPA on top, matching the interactive chart
    chart
        .draw_series(LineSeries::new(cgpa_points.iter().copied(), &RED))?
        .label("CGPA")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
    chart.draw_series(
        cgpa_points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 3, RED.filled())),
    )?;

    chart
        .draw_series(LineSeries::new(sgpa_points.iter().copied(), &BLUE))?
        .label("SGPA")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart.draw_series(
        sgpa_points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
    )?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Renders the example dataset to `gpa_chart_demo.png` in the working
/// directory and returns the path. Used by the `chart_demo` binary.
pub fn create_example_chart() -> Result<String, Box<dyn Error>> {
    let records = crate::loader::example_semesters();
    let path = "gpa_chart_demo.png";
    save_gpa_chart(&records, &ChartStyle::default(), path)?;
    Ok(path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::example_semesters;

    #[test]
    fn renders_png_bytes() {
        let bytes = render_gpa_chart(&example_semesters(), &ChartStyle::default()).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
    }

    #[test]
    fn refuses_an_empty_table() {
        assert!(render_gpa_chart(&[], &ChartStyle::default()).is_err());
    }

    #[test]
    fn saves_to_a_chosen_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        save_gpa_chart(&example_semesters(), &ChartStyle::default(), &path).unwrap();
        assert!(path.exists());
    }
}
