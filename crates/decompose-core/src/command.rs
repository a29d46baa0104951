//! Structured command lines.
//!
//! Commands are assembled as ordered argument tokens and only rendered to
//! text at the output boundary.

use std::fmt;

/// A single argument of a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// Rendered verbatim.
    Bare(String),
    /// Rendered wrapped in double quotes.
    Quoted(String),
}

impl Arg {
    /// Returns the raw token, without quoting.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bare(s) | Self::Quoted(s) => s,
        }
    }
}

impl fmt::Display for Arg {
    // Embedded quotes are not escaped; values are passed through as written.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bare(s) => f.write_str(s),
            Self::Quoted(s) => write!(f, "\"{s}\""),
        }
    }
}

/// A program invocation as an ordered list of arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<Arg>,
}

impl CommandLine {
    /// Creates a command line invoking `program` with no arguments.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Creates a command line starting with unquoted `args`.
    #[must_use]
    pub fn with_args<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(|a| Arg::Bare(a.into())).collect(),
        }
    }

    /// Appends an unquoted argument.
    pub fn bare(&mut self, arg: impl Into<String>) {
        self.args.push(Arg::Bare(arg.into()));
    }

    /// Appends a double-quoted argument.
    pub fn quoted(&mut self, arg: impl Into<String>) {
        self.args.push(Arg::Quoted(arg.into()));
    }

    /// Appends `flag "value"`.
    pub fn flag(&mut self, flag: &str, value: impl Into<String>) {
        self.bare(flag);
        self.quoted(value);
    }

    /// Returns the program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the arguments in order.
    #[must_use]
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Returns the program followed by every raw argument token.
    #[must_use]
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(Arg::as_str))
            .collect()
    }

    /// Returns the value following the first occurrence of `flag`.
    #[must_use]
    pub fn flag_value<'a>(&'a self, flag: &'a str) -> Option<&'a str> {
        self.flag_values(flag).next()
    }

    /// Returns the values following every occurrence of `flag`.
    pub fn flag_values<'a>(&'a self, flag: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.args
            .windows(2)
            .filter(move |pair| matches!(&pair[0], Arg::Bare(f) if f == flag))
            .map(|pair| pair[1].as_str())
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Formats `name<op>value`, or just `name` when there is no value.
pub(crate) fn key_value(name: &str, value: Option<&str>, operator: char) -> String {
    value.map_or_else(|| name.to_owned(), |v| format!("{name}{operator}{v}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_bare_and_quoted_args() {
        let mut cmd = CommandLine::with_args("docker", ["build"]);
        cmd.flag("-t", "web");
        cmd.bare(".");
        assert_eq!(cmd.to_string(), r#"docker build -t "web" ."#);
    }

    #[test]
    fn quoted_values_are_not_escaped() {
        let mut cmd = CommandLine::new("docker");
        cmd.flag("-e", r#"MSG=say "hi""#);
        assert_eq!(cmd.to_string(), r#"docker -e "MSG=say "hi"""#);
    }

    #[test]
    fn argv_strips_quoting() {
        let mut cmd = CommandLine::with_args("docker", ["run"]);
        cmd.flag("--name", "db");
        assert_eq!(cmd.argv(), vec!["docker", "run", "--name", "db"]);
    }

    #[test]
    fn flag_values_collects_repeated_flags() {
        let mut cmd = CommandLine::new("docker");
        cmd.flag("-p", "80:80");
        cmd.flag("-e", "A=1");
        cmd.flag("-p", "443:443");
        let ports: Vec<&str> = cmd.flag_values("-p").collect();
        assert_eq!(ports, vec!["80:80", "443:443"]);
        assert_eq!(cmd.flag_value("-e"), Some("A=1"));
        assert_eq!(cmd.flag_value("-v"), None);
    }

    #[test]
    fn flag_value_outlives_the_flag_name() {
        let mut cmd = CommandLine::with_args("docker", ["run"]);
        cmd.flag("--name", "web");
        let value = {
            let flag = String::from("--name");
            cmd.flag_value(&flag).map(str::to_owned)
        };
        assert_eq!(value.as_deref(), Some("web"));
    }

    #[test]
    fn key_value_without_value_is_bare_name() {
        assert_eq!(key_value("DEBUG", None, '='), "DEBUG");
        assert_eq!(key_value("DEBUG", Some("1"), '='), "DEBUG=1");
        assert_eq!(key_value("/src", Some("/dst"), ':'), "/src:/dst");
    }
}
