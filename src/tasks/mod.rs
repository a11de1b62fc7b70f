/*
    This module runs line-oriented task scripts: grammar definitions,
    string generation, derivation rendering and membership checks
*/

mod reader;

use std::collections::HashSet;
use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use itertools::Itertools;
use log::{debug, info};

use crate::derivation::{self, DERIVATION_DEPTH, RECOGNITION_DEPTH};
use crate::error_handling::{Error, ErrorType, Location};
use crate::grammar::{Grammar, Productions, EPSILON};
use reader::TaskReader;

#[derive(Debug)]
pub enum TaskErrorType {
    // A line outside any block that is not a task header
    UnknownTask(String),
    // The script ended in the middle of a block
    UnexpectedEnd,
    // A parameter line that should hold an integer does not
    InvalidNumber(String),
    // A production rule line without the -> separator
    MissingArrow(String),
    // There was an issue with reading the script
    FileError(io::Error),
}

impl ErrorType for TaskErrorType {}

impl PartialEq for TaskErrorType {
    fn eq(&self, other: &Self) -> bool {
        if let TaskErrorType::FileError(a) = self {
            if let TaskErrorType::FileError(b) = other {
                return a.kind() == b.kind();
            }
        }
        return std::mem::discriminant(self) == std::mem::discriminant(other);
    }
}

impl Display for TaskErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskErrorType::UnknownTask(line) => write!(f, "Expected a task header, found `{}`", line),
            TaskErrorType::UnexpectedEnd => write!(f, "Script ended in the middle of a task block"),
            TaskErrorType::InvalidNumber(line) => write!(f, "Expected a number, found `{}`", line),
            TaskErrorType::MissingArrow(line) => write!(f, "Expected `->` in production rule `{}`", line),
            TaskErrorType::FileError(e) => write!(f, "File error: {}", e),
        }
    }
}

pub type TaskError = Error<TaskErrorType>;
pub type TaskResult<T> = std::result::Result<T, TaskError>;

fn io_error(error: io::Error, file: &Path) -> TaskError {
    Error {
        location: Location::whole_file(file),
        error: TaskErrorType::FileError(error),
    }
}

pub fn run_file(path: &Path, max_attempts: u32) -> TaskResult<()> {
    let file = File::open(path).map_err(|e| io_error(e, path))?;
    let mut session = Session::new(max_attempts);
    return session.run(BufReader::new(file), path);
}

// Holds the working grammar across task blocks. A definition replaces
// it only after validating, so a rejected definition leaves the last
// valid grammar in place.
pub struct Session {
    grammar: Option<Grammar>,
    defined: usize,
    max_attempts: u32,
}

impl Session {
    pub fn new(max_attempts: u32) -> Self {
        Session {
            grammar: None,
            defined: 0,
            max_attempts,
        }
    }

    pub fn run<R: BufRead>(&mut self, input: R, path: &Path) -> TaskResult<()> {
        let mut reader = TaskReader::new(input, path);

        while let Some(line) = reader.next_line()? {
            if line.is_empty() {
                continue;
            }
            let Some(number) = task_number(&line) else {
                return Err(reader.error(TaskErrorType::UnknownTask(line)));
            };
            debug!("running task{} at {}", number, reader.location());

            match number {
                1 => self.define_grammar(&mut reader)?,
                2 => self.generate_strings(&mut reader)?,
                3 => self.show_derivation(&mut reader)?,
                4 => self.check_membership(&mut reader)?,
                _ => self.run_showcase(),
            }
        }

        Ok(())
    }

    // task1: read a grammar definition block; it becomes the working
    // grammar only if it validates
    fn define_grammar<R: BufRead>(&mut self, reader: &mut TaskReader<R>) -> TaskResult<()> {
        let grammar = parse_grammar_block(reader)?;
        self.defined += 1;

        match grammar.validate() {
            Ok(()) => {
                info!("grammar #{} accepted as the working grammar", self.defined);
                println!("{}", grammar);
                self.grammar = Some(grammar);
            }
            Err(error) => {
                println!("Error: invalid CFG definition for grammar #{}: {}", self.defined, error);
                println!("Invalid CFG, continuing with the latest valid CFG");
            }
        }

        Ok(())
    }

    // task2: a string count line and a max length line, both clamped
    fn generate_strings<R: BufRead>(&mut self, reader: &mut TaskReader<R>) -> TaskResult<()> {
        let count = clamp_limit(reader.expect_number()?);
        let max_length = clamp_limit(reader.expect_number()?);

        let Some(grammar) = &self.grammar else {
            println!("No valid CFG provided");
            return Ok(());
        };
        for _ in 0..count {
            print_generated(grammar.generate(max_length, self.max_attempts), max_length, self.max_attempts);
        }

        Ok(())
    }

    // task3: one target line, which may be blank for the empty string
    fn show_derivation<R: BufRead>(&mut self, reader: &mut TaskReader<R>) -> TaskResult<()> {
        let target = reader.expect_raw_line()?;

        let Some(grammar) = &self.grammar else {
            println!("No valid CFG provided");
            return Ok(());
        };
        match grammar.derive(&target, DERIVATION_DEPTH) {
            Some(found) => println!("{}", derivation::render(&found)),
            None => println!("No leftmost derivation found for '{}'", target),
        }

        Ok(())
    }

    // task4: a target count line, then that many target lines
    fn check_membership<R: BufRead>(&mut self, reader: &mut TaskReader<R>) -> TaskResult<()> {
        let count = reader.expect_number()?.max(0);

        for _ in 0..count {
            let target = reader.expect_raw_line()?;
            match &self.grammar {
                Some(grammar) => println!("{}", grammar.recognizes(&target, RECOGNITION_DEPTH)),
                None => println!("No valid CFG provided"),
            }
        }

        Ok(())
    }

    // task5: exercise the built-in example grammar
    fn run_showcase(&self) {
        let grammar = showcase_grammar();

        println!("{}", grammar);
        print_generated(grammar.generate(10, self.max_attempts), 10, self.max_attempts);
        println!("{}", grammar.recognizes(&"abc".repeat(12), RECOGNITION_DEPTH));
    }
}

fn task_number(line: &str) -> Option<u32> {
    line.strip_prefix("task")
        .and_then(|rest| rest.parse().ok())
        .filter(|number| (1..=5).contains(number))
}

// Task parameters are clamped rather than rejected
fn clamp_limit(requested: i64) -> usize {
    requested.clamp(1, 10) as usize
}

fn print_generated(generated: Option<String>, max_length: usize, max_attempts: u32) {
    match generated {
        Some(string) if string.is_empty() => println!("{}", EPSILON),
        Some(string) => println!("{}", string),
        None => println!(
            "Warning: could not generate a string of max length {} after {} attempts",
            max_length, max_attempts
        ),
    }
}

fn showcase_grammar() -> Grammar {
    Grammar::new(
        HashSet::from(["S".to_string()]),
        HashSet::from(["a".to_string(), "b".to_string(), "c".to_string()]),
        Productions::from([("S".to_string(), vec!["abcS".to_string(), String::new()])]),
        "S".to_string(),
    )
}

// Reads the body of a task1 block, between the header and END
fn parse_grammar_block<R: BufRead>(reader: &mut TaskReader<R>) -> TaskResult<Grammar> {
    let mut non_terminals = HashSet::new();
    let mut terminals = HashSet::new();
    let mut start_symbol = String::new();
    let mut productions = Productions::new();

    loop {
        let line = reader.expect_raw_line()?;
        if line == "END" {
            break;
        }
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix("NON_TERMINALS:") {
            non_terminals.extend(split_symbols(rest));
        } else if let Some(rest) = line.strip_prefix("TERMINALS:") {
            terminals.extend(split_symbols(rest));
        } else if let Some(rest) = line.strip_prefix("START_SYMBOL:") {
            start_symbol = rest.trim().to_string();
        } else if line.starts_with("PRODUCTION_RULES:") {
            parse_production_rules(reader, &mut productions)?;
        }
        // Anything else inside the block is ignored
    }

    return Ok(Grammar::new(non_terminals, terminals, productions, start_symbol));
}

fn parse_production_rules<R: BufRead>(
    reader: &mut TaskReader<R>,
    productions: &mut Productions,
) -> TaskResult<()> {
    loop {
        let line = reader.expect_raw_line()?;
        if line == "END_PRODUCTION_RULES" {
            return Ok(());
        }
        if line.is_empty() {
            continue;
        }

        let (left, right) = match line.split_once("->") {
            Some(sides) => sides,
            None => return Err(reader.error(TaskErrorType::MissingArrow(line))),
        };
        let alternatives = right
            .split('|')
            .map(|alternative| alternative.trim().to_string())
            .collect_vec();
        productions.entry(left.trim().to_string()).or_default().extend(alternatives);
    }
}

// Symbol lists are comma separated; stray empty entries are dropped so
// a trailing comma cannot smuggle in the forbidden empty symbol
fn split_symbols(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split(',')
        .map(str::trim)
        .filter(|symbol| !symbol.is_empty())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn run_script(script: &str) -> (Session, TaskResult<()>) {
        let mut session = Session::new(100);
        let result = session.run(Cursor::new(script), Path::new("test_script"));
        (session, result)
    }

    #[test]
    fn task_headers_parse() {
        assert_eq!(task_number("task1"), Some(1));
        assert_eq!(task_number("task5"), Some(5));
        assert_eq!(task_number("task6"), None);
        assert_eq!(task_number("task12"), None);
        assert_eq!(task_number("task"), None);
        assert_eq!(task_number("granular"), None);
    }

    #[test]
    fn limits_are_clamped() {
        assert_eq!(clamp_limit(-3), 1);
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(7), 7);
        assert_eq!(clamp_limit(15), 10);
    }

    #[test]
    fn definition_block_builds_the_grammar() {
        let script = "task1\n\
            NON_TERMINALS: S\n\
            TERMINALS: a, b, c\n\
            START_SYMBOL: S\n\
            PRODUCTION_RULES:\n\
            S -> abcS |\n\
            END_PRODUCTION_RULES\n\
            END\n";
        let (session, result) = run_script(script);

        result.unwrap();
        let grammar = session.grammar.unwrap();
        assert_eq!(grammar.start_symbol, "S");
        assert_eq!(grammar.terminals.len(), 3);
        assert_eq!(grammar.productions["S"], vec!["abcS".to_string(), String::new()]);
    }

    #[test]
    fn rejected_definitions_keep_the_previous_grammar() {
        let script = "task1\n\
            NON_TERMINALS: S\n\
            TERMINALS: a, b, c\n\
            START_SYMBOL: S\n\
            PRODUCTION_RULES:\n\
            S -> abcS |\n\
            END_PRODUCTION_RULES\n\
            END\n\
            task1\n\
            NON_TERMINALS: X\n\
            TERMINALS: x\n\
            START_SYMBOL: Y\n\
            PRODUCTION_RULES:\n\
            X -> x\n\
            END_PRODUCTION_RULES\n\
            END\n";
        let (session, result) = run_script(script);

        result.unwrap();
        assert_eq!(session.defined, 2);
        assert_eq!(session.grammar.unwrap().start_symbol, "S");
    }

    #[test]
    fn unknown_lines_are_errors() {
        let (_, result) = run_script("task9\n");
        let error = result.unwrap_err();

        assert_eq!(error.error, TaskErrorType::UnknownTask("task9".to_string()));
        assert_eq!(error.location.line, 1);
    }

    #[test]
    fn truncated_blocks_are_errors() {
        let (_, result) = run_script("task1\nNON_TERMINALS: S\n");

        assert_eq!(result.unwrap_err().error, TaskErrorType::UnexpectedEnd);
    }

    #[test]
    fn production_rules_need_an_arrow() {
        let script = "task1\n\
            PRODUCTION_RULES:\n\
            S abcS\n";
        let (_, result) = run_script(script);

        assert_eq!(
            result.unwrap_err().error,
            TaskErrorType::MissingArrow("S abcS".to_string())
        );
    }

    #[test]
    fn tasks_without_a_grammar_still_consume_their_lines() {
        let script = "task3\nabc\n\
            task4\n1\nabc\n\
            task2\n2\n5\n";
        let (_, result) = run_script(script);

        result.unwrap();
    }

    #[test]
    fn showcase_grammar_is_valid() {
        let grammar = showcase_grammar();

        assert_eq!(grammar.validate(), Ok(()));
        assert!(grammar.recognizes(&"abc".repeat(12), RECOGNITION_DEPTH));
    }

    #[test]
    fn sample_script_runs_end_to_end() {
        let path = Path::new("example_data/sample_tasks.txt");
        let file = File::open(path).unwrap();
        let mut session = Session::new(100);

        session.run(BufReader::new(file), path).unwrap();

        let grammar = session.grammar.unwrap();
        assert_eq!(grammar.start_symbol, "S");
        assert_eq!(grammar.productions["S"], vec!["abcS".to_string(), String::new()]);
    }
}
