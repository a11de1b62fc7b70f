use std::io::{BufRead, Lines};
use std::path::{Path, PathBuf};

use super::{TaskError, TaskErrorType, TaskResult};
use crate::error_handling::{Error, Location};

// Line-by-line script reader that tracks locations for error
// reporting. Every surfaced line has its surrounding whitespace
// trimmed.
pub struct TaskReader<R> {
    lines: Lines<R>,
    file: PathBuf,
    line_number: usize,
}

impl<R: BufRead> TaskReader<R> {
    pub fn new(input: R, file: &Path) -> Self {
        TaskReader {
            lines: input.lines(),
            file: file.to_path_buf(),
            line_number: 0,
        }
    }

    pub fn location(&self) -> Location {
        Location {
            file: self.file.clone(),
            line: self.line_number,
        }
    }

    pub fn error(&self, error: TaskErrorType) -> TaskError {
        Error {
            location: self.location(),
            error,
        }
    }

    pub fn next_line(&mut self) -> TaskResult<Option<String>> {
        let Some(line) = self.lines.next() else {
            return Ok(None);
        };
        self.line_number += 1;

        match line {
            Ok(line) => Ok(Some(line.trim().to_string())),
            Err(error) => Err(self.error(TaskErrorType::FileError(error))),
        }
    }

    // The next line even if blank; the script must not end here
    pub fn expect_raw_line(&mut self) -> TaskResult<String> {
        match self.next_line()? {
            Some(line) => Ok(line),
            None => Err(self.error(TaskErrorType::UnexpectedEnd)),
        }
    }

    // The next non-blank line
    pub fn expect_content_line(&mut self) -> TaskResult<String> {
        loop {
            let line = self.expect_raw_line()?;
            if !line.is_empty() {
                return Ok(line);
            }
        }
    }

    pub fn expect_number(&mut self) -> TaskResult<i64> {
        let line = self.expect_content_line()?;
        line.parse::<i64>()
            .map_err(|_| self.error(TaskErrorType::InvalidNumber(line.clone())))
    }
}
