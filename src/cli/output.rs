use std::path::PathBuf;

use clap::{Args, ValueEnum};
use strum::Display;

use crate::util::get_writer_for_file_or_stdout;

#[derive(Args, Debug, Clone, Default)]
#[command(next_help_heading = "Output Options")]
pub struct OutputArgs {
    /// Write the report to the specified path instead of stdout
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Report format
    #[arg(long, short, value_name = "FORMAT", default_value_t = ReportOutputFormat::Pretty)]
    pub format: ReportOutputFormat,
}

impl OutputArgs {
    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    pub fn get_writer(&self) -> std::io::Result<Box<dyn std::io::Write>> {
        get_writer_for_file_or_stdout(self.output.as_ref())
    }
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, ValueEnum, Default)]
#[strum(serialize_all = "kebab-case")]
pub enum ReportOutputFormat {
    /// Sorted list with a header line
    #[default]
    Pretty,
    /// Pretty-printed JSON object
    Json,
}
