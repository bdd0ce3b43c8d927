/// View helpers for the main window
///
/// - Image panels for the original and processed previews (panels.rs)

pub mod panels;
