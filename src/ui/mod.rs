/// egui views over [`crate::state::SessionState`].
pub mod panels;
pub mod preview;
