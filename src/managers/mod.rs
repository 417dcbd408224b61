// Downloads state managers
// Managers hold state and mediate between the user or the download engine and the repository.

pub mod download_callback;
pub mod downloads_view_model;
