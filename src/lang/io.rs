use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use crate::lang::value::Value;
use crate::util;

/// Where `spill` reads from.
pub trait InputChannel {
    /// Displays `prompt` (if any) and reads one line without its line terminator.
    /// Returns an empty string at end of input.
    fn read_line(&mut self, prompt: Option<&str>) -> io::Result<String>;
}

/// Where `say` writes to.
pub trait OutputChannel {
    fn write_values(&mut self, values: &[Value]) -> io::Result<()>;
}

fn strip_line_terminator(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();

        if line.ends_with('\r') {
            line.pop();
        }
    }

    line
}

#[derive(Debug, Default)]
pub struct StdInput;

impl InputChannel for StdInput {
    fn read_line(&mut self, prompt: Option<&str>) -> io::Result<String> {
        if let Some(prompt) = prompt {
            let mut stdout = io::stdout().lock();
            stdout.write_all(prompt.as_bytes())?;
            stdout.flush()?;
        }

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;

        Ok(strip_line_terminator(line))
    }
}

#[derive(Debug, Default)]
pub struct StdOutput;

impl OutputChannel for StdOutput {
    fn write_values(&mut self, values: &[Value]) -> io::Result<()> {
        writeln!(io::stdout().lock(), "{}", util::join(values, " "))
    }
}

/// Input served from a fixed list of lines. Prompts are recorded instead of displayed.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new<I, S>(lines: I) -> ScriptedInput
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedInput {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl InputChannel for ScriptedInput {
    fn read_line(&mut self, prompt: Option<&str>) -> io::Result<String> {
        if let Some(prompt) = prompt {
            self.prompts.push(prompt.to_owned());
        }

        Ok(self.lines.pop_front().unwrap_or_default())
    }
}

/// Output kept in memory, one entry per `say` call.
#[derive(Debug, Default)]
pub struct CapturedOutput {
    lines: Vec<String>,
}

impl CapturedOutput {
    pub fn new() -> CapturedOutput {
        CapturedOutput::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl OutputChannel for CapturedOutput {
    fn write_values(&mut self, values: &[Value]) -> io::Result<()> {
        self.lines.push(util::join(values, " "));
        Ok(())
    }
}

/// Writes `say` output line by line to any writer.
#[derive(Debug)]
pub struct WriterOutput<W: Write> {
    writer: W,
}

impl<W: Write> WriterOutput<W> {
    pub fn new(writer: W) -> WriterOutput<W> {
        WriterOutput { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputChannel for WriterOutput<W> {
    fn write_values(&mut self, values: &[Value]) -> io::Result<()> {
        writeln!(self.writer, "{}", util::join(values, " "))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    pub fn test_line_terminators_are_stripped() {
        assert_eq!("abc", strip_line_terminator(String::from("abc\r\n")));
        assert_eq!("abc", strip_line_terminator(String::from("abc\n")));
        assert_eq!("abc", strip_line_terminator(String::from("abc")));
    }

    #[test]
    pub fn test_scripted_input() {
        let mut input = ScriptedInput::new(["first"]);

        assert_eq!("first", input.read_line(Some("> ")).unwrap());
        assert_eq!("", input.read_line(None).unwrap());
        assert_eq!(vec![String::from("> ")], input.prompts().to_vec());
    }

    #[test]
    pub fn test_writer_output_joins_with_spaces() {
        let mut output = WriterOutput::new(Vec::new());
        output.write_values(&[Value::from("x ="), Value::Int(3)]).unwrap();
        output.write_values(&[]).unwrap();

        assert_eq!("x = 3\n\n", String::from_utf8(output.into_inner()).unwrap());
    }
}
