pub mod app;
pub mod calibration_panel;
pub mod camera_controls;
pub mod follow_panel;
pub mod radar_view;
pub mod status_panel;
