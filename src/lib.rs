/*!
# Gradeboard

A student academic dashboard with an interactive GPA what-if chart, built in Rust.

## Overview

Gradeboard renders cached student-portal data (the per-semester SGPA/CGPA
grade sheet) and lets the user perturb the displayed numbers to explore
"what if this semester had gone differently". Every edit runs through a
small recalculation engine that keeps the cumulative GPA consistent with
the per-semester values; a short "dancing dots" intro animation sweeps the
chart once per mount to signal that the points are draggable.

The live portal API client (authentication, session headers, attendance,
marks, PDF parsing) is an external collaborator. This application only
consumes snapshots it captured.

## Architecture

### Core Layer
- **Technologies**: Rust
- **Key Components**:
  - Semester Model - The per-term record with the portal's field names
  - Recalculation Engine - Pure CGPA recomputation from per-term values
  - Chart Controller - Drag and animation state machine over the working
    sequence, publishing every change to a host listener
  - Wave Animation - Randomized two-sine motion with an ease-out tail

### Web Layer
- **Technologies**: Rust, axum, plotters
- **Core Components**:
  - JSON API - Pointer samples, what-if edits, intro control
  - Chart Renderer - Server-side PNG of the SGPA/CGPA lines
  - Export - CSV and XLSX downloads of the current table
  - Snapshot Loader - Cached portal payloads in, semester records out

## Key Features

- Drag a chart point vertically (or a bar horizontally) to edit a
  semester's SGPA; the CGPA line follows immediately
- Clamping to the 0-10 SGPA domain and rounding to one decimal
- One-shot intro animation that always settles back on the real data
- Typed what-if edits with the same rules as drags
- CSV/XLSX export and PNG chart rendering
- In-memory only; the session holds cached data, nothing is persisted

## Modules

- **semester**: SemesterRecord and the clamp/rounding helpers
- **gpa**: CGPA recalculation engine (pure functions)
- **animation**: wave parameters and frame math for the intro
- **chart**: ChartController state machine and ChartConfig
- **loader**: cached portal snapshot parsing
- **downloader**: CSV/XLSX export
- **graph**: chart rendering via plotters (web feature)
- **app**: axum routes and the intro tick task (web feature)

## REST API Endpoints

- `GET /api/semesters` - Current working table plus session metadata
- `POST /api/chart/intro` - Arm and drive the intro animation
- `POST /api/chart/pointer_down|pointer_move|pointer_up` - Point drag
- `POST /api/chart/bar_down|bar_move` - Bar drag
- `POST /api/whatif` - Typed SGPA edit
- `POST /api/reset` - Back to the loaded snapshot
- `GET /api/chart.png` - Rendered chart
- `GET /api/export/csv`, `GET /api/export/xlsx` - Downloads
- `POST /api/load` - Replace the session with a new snapshot
*/

// Re-export all modules so they appear in the documentation
pub mod animation;
#[cfg(feature = "web")]
pub mod app;
pub mod chart;
pub mod downloader;
pub mod gpa;
#[cfg(feature = "web")]
pub mod graph;
pub mod loader;
pub mod semester;

/// Re-export everything from these modules to make it easier to use
pub use animation::*;
pub use chart::*;
pub use downloader::*;
pub use gpa::*;
#[cfg(feature = "web")]
pub use graph::*;
pub use loader::*;
pub use semester::*;
