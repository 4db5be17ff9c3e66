//! Property test modules

mod layout_tests;
mod output_boundary_tests;
mod session_controller_tests;
mod workspace_tests;
