//! Common CLI types shared across commands

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty format - re-indented response body
    #[default]
    Pretty,
    /// JSON format - body wrapped with metadata, for scripts
    Json,
}
