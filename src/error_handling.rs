use std::fmt::Display;
use std::path::{Path, PathBuf};

pub trait ErrorType: Display + PartialEq {}

// Where in an input script something happened. Line 0 refers to the
// file as a whole.
#[derive(Debug, PartialEq, Clone)]
pub struct Location {
    pub file: PathBuf,
    pub line: usize
}

impl Location {
    pub fn whole_file(file: &Path) -> Self {
        Location {
            file: file.to_path_buf(),
            line: 0
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.file.display())
        } else {
            write!(f, "{}:{}", self.file.display(), self.line)
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct Error<T: ErrorType> {
    pub location: Location,
    pub error: T
}

impl<T: ErrorType> Display for Error<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\x1b[31;49;1m[{}]\x1b[39;49;1m  {}\x1b[0m", self.location, self.error)
    }
}
