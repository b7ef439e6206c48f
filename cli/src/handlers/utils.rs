use core::fmt;
use std::io::{self, BufRead, IsTerminal};

use anyhow::bail;

pub struct WriteAdapter<W>(pub W);

impl<W> fmt::Write for WriteAdapter<W>
where
    W: io::Write,
{
    fn write_str(&mut self, s: &str) -> Result<(), fmt::Error> {
        self.0.write_all(s.as_bytes()).map_err(|_| fmt::Error)
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), fmt::Error> {
        self.0.write_fmt(args).map_err(|_| fmt::Error)
    }
}

pub trait StdIn: Send + Sync {
    fn is_terminal(&self) -> bool;
    fn lines(&self) -> impl Iterator<Item = io::Result<String>>;
}

impl StdIn for io::Stdin {
    fn is_terminal(&self) -> bool {
        self.lock().is_terminal()
    }
    fn lines(&self) -> impl Iterator<Item = io::Result<String>> {
        io::BufReader::new(self.lock()).lines()
    }
}

/// Take each value from the command line if it was given there, otherwise from the next line of
/// stdin. Prompts go to `stderr`, and only when stdin is a terminal.
///
/// # Errors
///
/// Fails if stdin runs out before every value was read.
pub fn read_missing<W: fmt::Write>(
    stdin: &impl StdIn,
    stderr: &mut W,
    fields: &[(&str, Option<&str>)],
) -> anyhow::Result<Vec<String>> {
    let terminal = stdin.is_terminal();
    let mut lines = stdin.lines();
    let mut values = Vec::with_capacity(fields.len());

    for (prompt, given) in fields {
        if let Some(value) = given {
            values.push((*value).to_owned());
            continue;
        }
        if terminal {
            write!(stderr, "{prompt}: ")?;
        }
        let Some(line) = lines.next() else {
            bail!("no value given for {prompt}");
        };
        values.push(line?.trim_end_matches(['\r', '\n']).to_owned());
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Lines(Vec<&'static str>);

    impl StdIn for Lines {
        fn is_terminal(&self) -> bool {
            false
        }
        fn lines(&self) -> impl Iterator<Item = io::Result<String>> {
            self.0.clone().into_iter().map(|line| Ok(line.to_owned()))
        }
    }

    #[test]
    fn test_read_missing_prefers_given_values() {
        let stdin = Lines(vec!["from stdin"]);
        let mut stderr = String::new();

        let values = read_missing(
            &stdin,
            &mut stderr,
            &[("password", Some("given")), ("check", None)],
        )
        .unwrap();

        assert_eq!(values, vec!["given", "from stdin"]);
        assert!(stderr.is_empty());
    }

    #[test]
    fn test_read_missing_runs_out() {
        let stdin = Lines(vec![]);
        let result = read_missing(&stdin, &mut String::new(), &[("password", None)]);
        assert!(result.is_err());
    }
}
