#![cfg(not(tarpaulin_include))]
#[cfg(feature = "web")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Render the example dataset the way the dashboard would
    let path = gradeboard::graph::create_example_chart()?;

    println!("Created GPA chart at {path}");

    Ok(())
}
