/// UI widgets for the cropping viewer
///
/// Only the crop rectangle overlay lives here; everything else in the view
/// is stock iced widgets assembled in main.rs.

pub mod canvas;
