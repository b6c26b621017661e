use std::{
    fs::File,
    io::{self, BufRead},
    path::Path,
    process::{exit, Command},
};

use clap::Parser;
use console::{style, Term};
use glob::glob;
use regex::Regex;

const DATA_ERROR_EXIT_CODE: i32 = 65;

/// Runs every sample under the suite directory through the lox-expr binary
/// and checks its output against the `// expect` comments in the sample.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Only run samples whose path, relative to the suite directory, starts
    /// with this prefix.
    filter: Option<String>,

    /// The lox-expr binary under test.
    #[arg(short, long, default_value = "./target/release/lox-expr")]
    binary: String,

    /// Directory holding the `.lox` samples.
    #[arg(short, long, default_value = "samples")]
    suite: String,
}

struct ExpectedOutput {
    line: usize,
    output: String,
}

impl ExpectedOutput {
    pub fn new(line: usize, output: String) -> Self {
        ExpectedOutput { line, output }
    }
}

struct Patterns {
    expected_output: Regex,
    expected_error: Regex,
    non_test: Regex,
}

impl Patterns {
    fn new() -> Result<Self, regex::Error> {
        Ok(Patterns {
            expected_output: Regex::new(r"// expect: ?(.*)")?,
            expected_error: Regex::new(r"// expect error: (.+)")?,
            non_test: Regex::new(r"// nontest")?,
        })
    }
}

struct Test {
    path: String,
    expected_output: Vec<ExpectedOutput>,
    expected_error: Option<String>,
    expected_exit_code: i32,
    expectations: u32,
}

impl Test {
    fn new(path: String) -> Self {
        Test {
            path,
            expected_output: Vec::new(),
            expected_error: None,
            expected_exit_code: 0,
            expectations: 0,
        }
    }

    /// Collects the expectations in the sample. Returns false when the file
    /// is not a test.
    fn parse(&mut self, patterns: &Patterns) -> io::Result<bool> {
        for (line_num, line) in read_lines(&self.path)?.enumerate() {
            let line = line?;

            // Not a test file at all, so ignore it.
            if patterns.non_test.is_match(&line) {
                return Ok(false);
            }

            if let Some(matched) = capture(&patterns.expected_error, &line) {
                self.expected_error = Some(matched.to_string());
                self.expected_exit_code = DATA_ERROR_EXIT_CODE;
                self.expectations += 1;
                continue;
            }

            if let Some(matched) = capture(&patterns.expected_output, &line) {
                let expected = ExpectedOutput::new(line_num + 1, matched.to_string());
                self.expected_output.push(expected);
                self.expectations += 1;
            }
        }

        Ok(true)
    }

    fn run(&self, binary: &str) -> Vec<String> {
        let mut failures = Vec::new();

        let result = match Command::new(binary).arg(&self.path).output() {
            Ok(result) => result,
            Err(err) => {
                failures.push(format!("Failed to execute '{}': {}", binary, err));
                return failures;
            }
        };

        let stdout = String::from_utf8_lossy(&result.stdout);
        let stderr = String::from_utf8_lossy(&result.stderr);

        // Validate errors
        let mut error_lines = stderr.lines();
        match (&self.expected_error, error_lines.next()) {
            (Some(expected), Some(error)) if error != expected.as_str() => {
                failures.push(format!("Expected error '{}' and got:\n{}", expected, error));
            }
            (Some(expected), None) => {
                failures.push(format!("Missing expected error '{}'.", expected))
            }
            (None, Some(error)) => failures.push(format!("Unexpected error:\n{}", error)),
            _ => {}
        }

        // Validate exit code
        if result.status.code() != Some(self.expected_exit_code) {
            failures.push(format!(
                "Expected return code {} and got {:?}.",
                self.expected_exit_code,
                result.status.code()
            ));
        }

        // Validate output
        let output_lines: Vec<&str> = stdout.lines().collect();
        for (index, line) in output_lines.iter().enumerate() {
            match self.expected_output.get(index) {
                Some(expected) if expected.output != *line => failures.push(format!(
                    "Expected output '{}' on line {} and got '{}'.",
                    expected.output, expected.line, line
                )),
                Some(_) => {}
                None => failures.push(format!("Got output '{}' when none was expected.", line)),
            }
        }
        for expected in self.expected_output.iter().skip(output_lines.len()) {
            failures.push(format!(
                "Missing expected output '{}' on line {}.",
                expected.output, expected.line
            ));
        }

        failures
    }
}

struct Tester {
    args: Args,
    patterns: Patterns,
    passed: u32,
    failed: u32,
    skipped: u32,
    expectations: u32,
}

impl Tester {
    fn new(args: Args, patterns: Patterns) -> Self {
        Tester {
            args,
            patterns,
            passed: 0,
            failed: 0,
            skipped: 0,
            expectations: 0,
        }
    }

    fn run_suite(&mut self) -> io::Result<bool> {
        let term = Term::stdout();
        let pattern = format!("{}/**/*.lox", self.args.suite);

        let paths =
            glob(&pattern).map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
        for path in paths.flatten() {
            if let Some(path) = path.to_str() {
                self.run_test(&term, path)?;
            }
        }

        term.clear_last_lines(1)?;

        if self.failed == 0 {
            println!(
                "All {} tests passed ({} expectations).",
                style(self.passed).green(),
                self.expectations
            );
        } else {
            println!(
                "{} tests passed. {} tests failed.",
                style(self.passed).green(),
                style(self.failed).red()
            );
        }

        Ok(self.failed == 0)
    }

    fn run_test(&mut self, term: &Term, path: &str) -> io::Result<()> {
        // Check if we are just running a subset of the tests.
        if let Some(filter) = &self.args.filter {
            let relative = pathdiff::diff_paths(path, &self.args.suite)
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string());
            if !relative.starts_with(filter.as_str()) {
                return Ok(());
            }
        }

        term.clear_last_lines(1)?;
        term.write_line(&format!(
            "Passed: {} Failed: {} Skipped: {} ({})",
            style(self.passed).green(),
            style(self.failed).red(),
            style(self.skipped).yellow(),
            style(path)
        ))?;

        let mut test = Test::new(path.to_string());
        if !test.parse(&self.patterns)? {
            self.skipped += 1;
            return Ok(());
        }
        self.expectations += test.expectations;

        let failures = test.run(&self.args.binary);
        if failures.is_empty() {
            self.passed += 1;
        } else {
            self.failed += 1;
            println!("{}: {}", style("FAIL").red(), path);
            println!();
            for failure in &failures {
                println!("\t{}", style(failure).blue());
            }
            println!();
        }

        Ok(())
    }
}

fn main() -> io::Result<()> {
    let patterns =
        Patterns::new().map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    let mut tester = Tester::new(Args::parse(), patterns);
    if !tester.run_suite()? {
        exit(1);
    }

    Ok(())
}

// Returns the first capture group of `pattern` in `line`.
fn capture<'a>(pattern: &Regex, line: &'a str) -> Option<&'a str> {
    pattern
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|matched| matched.as_str())
}

// Returns an iterator over the lines of the file.
fn read_lines<P>(filename: P) -> io::Result<io::Lines<io::BufReader<File>>>
where
    P: AsRef<Path>,
{
    let file = File::open(filename)?;
    Ok(io::BufReader::new(file).lines())
}
