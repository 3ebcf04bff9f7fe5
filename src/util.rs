use std::{
    fs::File,
    io::{stdout, BufWriter},
    path::Path,
};

/// Returns a buffered writer for a specified file path or stdout if none is
/// provided.
pub fn get_writer_for_file_or_stdout<P: AsRef<Path>>(
    path: Option<P>,
) -> std::io::Result<Box<dyn std::io::Write>> {
    match path {
        None => Ok(Box::new(BufWriter::new(stdout()))),
        Some(p) => Ok(Box::new(BufWriter::new(File::create(p)?))),
    }
}

/// Represents a countable item with properly pluralized log messages.
pub enum Counted<'a> {
    Regular { singular: &'a str, count: usize },
    Explicit { singular: &'a str, count: usize, plural: &'a str },
}

impl<'a> Counted<'a> {
    pub fn regular(count: usize, singular: &'a str) -> Self {
        Counted::Regular { singular, count }
    }

    pub fn new(count: usize, singular: &'a str, plural: &'a str) -> Self {
        Counted::Explicit { singular, plural, count }
    }
}

impl std::fmt::Display for Counted<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Counted::Regular { singular, count } => {
                if *count == 1 {
                    write!(f, "1 {singular}")
                } else {
                    write!(f, "{count} {singular}s")
                }
            }
            Counted::Explicit { singular, count, plural } => {
                if *count == 1 {
                    write!(f, "1 {singular}")
                } else {
                    write!(f, "{count} {plural}")
                }
            }
        }
    }
}
