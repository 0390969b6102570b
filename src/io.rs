//! CLI input plumbing: word lists come from a file or from stdin.

use color_eyre::eyre::Context;
use color_eyre::Result;
use std::{
    fs::File,
    io::{BufReader, Read, Stdin},
    path::PathBuf,
};

/// Sources the program can read a word list from
pub enum Input {
    File(File, PathBuf),
    Stdin(Stdin),
}

impl Input {
    /// Opens `path` read-only, or falls back to stdin when no path is given.
    pub fn open(path: Option<PathBuf>) -> Result<Self> {
        Ok(if let Some(path) = path {
            Self::File(
                File::open(&path).wrap_err(format!("Cannot open {} for input", path.display()))?,
                path,
            )
        } else {
            Self::Stdin(std::io::stdin())
        })
    }

    /// The underlying reader, buffered for line-oriented consumption.
    pub fn reader(&mut self) -> BufReader<&mut dyn Read> {
        let inner: &mut dyn Read = match self {
            Self::File(f, _) => f,
            Self::Stdin(s) => s,
        };
        BufReader::new(inner)
    }
}

/// Pretty-print for input sources
impl std::fmt::Display for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(_, path) => path.display().fmt(f),
            Self::Stdin(_) => write!(f, "stdin"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn missing_file_is_an_error() {
        let path = PathBuf::from("/definitely/not/here.txt");
        assert!(Input::open(Some(path)).is_err());
    }

    #[test]
    fn no_path_falls_back_to_stdin() {
        let input = Input::open(None).unwrap();
        assert_eq!(input.to_string(), "stdin");
    }

    #[test]
    fn files_open_and_read() {
        let path = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml"));
        let mut input = Input::open(Some(path.clone())).unwrap();
        assert_eq!(input.to_string(), path.display().to_string());

        let mut contents = String::new();
        input.reader().read_to_string(&mut contents).unwrap();
        assert!(contents.contains("[package]"));
    }
}
