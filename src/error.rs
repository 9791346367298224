use std::path::PathBuf;

/// Fatal input problems that abort a run.
///
/// These are raised through `anyhow` like every other failure; callers that
/// care about the kind can `downcast_ref::<ReportError>()`.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// A required column is absent from an input table.
    #[error("{source_name} is missing columns: {}", missing.join(", "))]
    MissingColumns {
        source_name: String,
        missing: Vec<String>,
    },

    /// File discovery found no candidate for a required input.
    #[error(
        "no file matching {} in {}; available: [{}]",
        prefixes.join(" / "),
        dir.display(),
        available.join(", ")
    )]
    NoMatchingFile {
        prefixes: Vec<String>,
        dir: PathBuf,
        available: Vec<String>,
    },
}
