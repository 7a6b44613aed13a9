// Core modules shared by the pipeline and the CLI.
pub mod error;
