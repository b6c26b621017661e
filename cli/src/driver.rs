use std::{
    error::Error,
    fs,
    io::{self, BufRead, Write},
    time::{Duration, Instant},
};

use clap::ValueEnum;
use lox_expr::{
    debug::dump_tokens,
    parse,
    printers::{AstPrinter, RpnPrinter},
    scan, Expr,
};

pub type DriverResult = Result<(), Box<dyn Error>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PrintStyle {
    /// Parenthesised prefix form
    #[default]
    Ast,
    /// Reverse Polish notation
    Rpn,
}

#[derive(Debug, Clone, Default)]
pub struct Options {
    pub style: PrintStyle,
    pub dump_tokens: bool,
    pub timings: bool,
}

pub struct Driver {
    options: Options,
}

impl Driver {
    pub fn new(options: Options) -> Self {
        Driver { options }
    }

    pub fn run_file(&self, path: &str) -> DriverResult {
        let source = fs::read_to_string(path)?;
        let output = self.run(&source)?;
        print!("{}", output);
        Ok(())
    }

    pub fn run_prompt(&self) -> DriverResult {
        print!("> ");
        io::stdout().flush()?;

        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => match self.run(&line) {
                    Ok(output) => print!("{}", output),
                    Err(err) => eprintln!("{}", err),
                },
                Err(_) => break,
            };

            print!("> ");
            io::stdout().flush()?;
        }

        Ok(())
    }

    /// Scans and parses `source`, returning everything that should be
    /// printed on stdout. With timings enabled the elapsed time goes to
    /// stderr whether or not the run succeeded.
    pub fn run(&self, source: &str) -> Result<String, lox_expr::Error> {
        let (result, elapsed) = self.timed(source);
        if let Some(elapsed) = elapsed {
            eprintln!("Parsed in {:.3}ms", elapsed.as_secs_f64() * 1000.0);
        }

        result
    }

    fn timed(&self, source: &str) -> (Result<String, lox_expr::Error>, Option<Duration>) {
        let started = Instant::now();
        let result = self.front_end(source);
        let elapsed = self.options.timings.then(|| started.elapsed());
        (result, elapsed)
    }

    fn front_end(&self, source: &str) -> Result<String, lox_expr::Error> {
        let tokens = scan(source)?;
        let mut output = String::new();
        if self.options.dump_tokens {
            output.push_str(&dump_tokens(&tokens, "tokens"));
        }

        let expr = parse(tokens)?;
        output.push_str(&self.render(&expr));
        output.push('\n');
        Ok(output)
    }

    fn render(&self, expr: &Expr) -> String {
        match self.options.style {
            PrintStyle::Ast => AstPrinter.print(expr),
            PrintStyle::Rpn => RpnPrinter.print(expr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_the_selected_style() {
        let ast = Driver::new(Options::default());
        assert_eq!(ast.run("1 + 2 * 3").unwrap(), "(+ 1 (* 2 3))\n");

        let rpn = Driver::new(Options {
            style: PrintStyle::Rpn,
            ..Options::default()
        });
        assert_eq!(rpn.run("1 + 2 * 3").unwrap(), "1 2 3 * +\n");
    }

    #[test]
    fn dumps_tokens_before_the_tree() {
        let driver = Driver::new(Options {
            dump_tokens: true,
            ..Options::default()
        });
        let output = driver.run("nil").unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "== tokens ==");
        assert_eq!(lines.last(), Some(&"nil"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn reports_errors() {
        let driver = Driver::new(Options::default());
        let err = driver.run("(1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "[line 1] Error at end: Expected ')' after expression."
        );
    }

    #[test]
    fn timings_cover_failed_runs() {
        let driver = Driver::new(Options {
            timings: true,
            ..Options::default()
        });
        let (result, elapsed) = driver.timed("(1");
        assert!(result.is_err());
        assert!(elapsed.is_some());

        let (result, elapsed) = driver.timed("\"open");
        assert!(result.is_err());
        assert!(elapsed.is_some());

        let (result, elapsed) = driver.timed("1");
        assert_eq!(result.unwrap(), "1\n");
        assert!(elapsed.is_some());
    }

    #[test]
    fn timings_are_off_by_default() {
        let driver = Driver::new(Options::default());
        let (result, elapsed) = driver.timed("(1");
        assert!(result.is_err());
        assert!(elapsed.is_none());
    }
}
