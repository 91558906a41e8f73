// UI module
// Layout and reusable widgets for the MediBot screens

pub mod components;
pub mod layout;

pub use layout::render_app_layout;
