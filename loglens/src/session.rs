//! Line-oriented interactive session over an `AnalysisController`
//!
//! Each command edits one control or triggers an action:
//!
//! ```text
//! url <URL>        set the backend URL
//! mode <MODE>      set the analysis mode
//! type <TYPE|->    set or clear the log type hint
//! file <PATH|->    select or drop a log file
//! paste            read log lines until a lone "."
//! analyze          run the analysis
//! clear            reset text, file and output
//! show             print the current output
//! quit
//! ```

use crate::controller::AnalysisController;
use crate::request::{FileInput, KNOWN_MODES};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Terminates a `paste` block
const PASTE_END: &str = ".";

/// A parsed session command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Url(String),
    Mode(String),
    LogType(Option<String>),
    File(Option<PathBuf>),
    Paste,
    Analyze,
    Clear,
    Show,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, arg) = match line.split_once(char::is_whitespace) {
        Some((word, arg)) => (word, arg.trim()),
        None => (line, ""),
    };

    let optional = |arg: &str| match arg {
        "" | "-" => None,
        value => Some(value.to_string()),
    };

    let command = match word {
        "url" => Command::Url(arg.to_string()),
        "mode" if !arg.is_empty() => Command::Mode(arg.to_string()),
        "mode" => return Err("usage: mode <MODE>".to_string()),
        "type" => Command::LogType(optional(arg)),
        "file" => Command::File(optional(arg).map(PathBuf::from)),
        "paste" => Command::Paste,
        "analyze" | "a" => Command::Analyze,
        "clear" => Command::Clear,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(Some(command))
}

/// Read a log file into a `FileInput` named after the path's file name
pub fn read_file_input(path: &Path) -> io::Result<FileInput> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(FileInput::new(file_name, bytes))
}

/// Interactive session reading commands from `input` and writing to `out`
pub struct Session<R, W> {
    controller: AnalysisController,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(controller: AnalysisController, input: R, out: W) -> Self {
        Self {
            controller,
            input,
            out,
        }
    }

    pub fn controller(&self) -> &AnalysisController {
        &self.controller
    }

    /// Run until `quit` or end of input
    pub async fn run(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", "loglens session - type 'help' for commands".bold())?;
        self.print_status()?;

        loop {
            write!(self.out, "{} ", ">".cyan())?;
            self.out.flush()?;

            let Some(line) = self.read_line()? else {
                break;
            };

            match parse_command(&line) {
                Ok(None) => continue,
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => self.execute(command).await?,
                Err(message) => writeln!(self.out, "{}", message.yellow())?,
            }
        }
        Ok(())
    }

    /// Apply one command and print the status line
    pub async fn execute(&mut self, command: Command) -> io::Result<()> {
        match command {
            Command::Url(url) => self.controller.inputs_mut().backend_url = url,
            Command::Mode(mode) => {
                if !KNOWN_MODES.contains(&mode.as_str()) {
                    warn!(mode = %mode, "Unknown analysis mode, sending it anyway");
                }
                self.controller.inputs_mut().mode = mode;
            }
            Command::LogType(log_type) => {
                self.controller.inputs_mut().log_type = log_type.unwrap_or_default();
            }
            Command::File(None) => self.controller.inputs_mut().file = None,
            Command::File(Some(path)) => match read_file_input(&path) {
                Ok(file) => {
                    writeln!(
                        self.out,
                        "{} {} ({} bytes)",
                        "Selected".dimmed(),
                        file.file_name,
                        file.bytes.len()
                    )?;
                    self.controller.inputs_mut().file = Some(file);
                }
                Err(e) => {
                    let message = format!("Failed to read {}: {}", path.display(), e);
                    self.controller.set_status(message, true);
                }
            },
            Command::Paste => {
                let text = self.read_paste()?;
                writeln!(self.out, "{} {} lines", "Pasted".dimmed(), text.lines().count())?;
                self.controller.inputs_mut().text = text;
            }
            Command::Analyze => {
                writeln!(self.out, "{}", crate::status::ANALYZING.dimmed())?;
                if self.controller.analyze().await.is_completed() {
                    self.print_output()?;
                }
            }
            Command::Clear => self.controller.clear(),
            Command::Show => {
                self.print_inputs()?;
                self.print_output()?;
            }
            Command::Help => self.print_help()?,
            Command::Quit => {}
        }
        self.print_status()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn read_paste(&mut self) -> io::Result<String> {
        writeln!(self.out, "{}", "Paste logs, end with a line containing only '.'".dimmed())?;
        let mut text = String::new();
        while let Some(line) = self.read_line()? {
            let line = line.trim_end_matches(['\r', '\n']);
            if line == PASTE_END {
                break;
            }
            text.push_str(line);
            text.push('\n');
        }
        Ok(text)
    }

    fn print_status(&mut self) -> io::Result<()> {
        writeln!(self.out, "{} {}", "Status:".bold(), self.controller.state().status)
    }

    fn print_inputs(&mut self) -> io::Result<()> {
        let inputs = &self.controller.state().inputs;
        let file = inputs
            .file
            .as_ref()
            .map(|f| f.file_name.as_str())
            .unwrap_or("-");
        let log_type = if inputs.log_type.is_empty() { "-" } else { inputs.log_type.as_str() };
        writeln!(self.out, "{}  {}", "Backend:".dimmed(), inputs.backend_url)?;
        writeln!(self.out, "{}     {}", "Mode:".dimmed(), inputs.mode)?;
        writeln!(self.out, "{} {}", "Log type:".dimmed(), log_type)?;
        writeln!(self.out, "{}     {}", "File:".dimmed(), file)?;
        writeln!(
            self.out,
            "{}     {} chars",
            "Text:".dimmed(),
            inputs.text.trim().len()
        )
    }

    fn print_output(&mut self) -> io::Result<()> {
        let state = self.controller.state();
        writeln!(self.out, "{}", "Summary".bold())?;
        writeln!(self.out, "{}", state.summary)?;
        writeln!(self.out, "{}", "Details".bold())?;
        writeln!(self.out, "{}", state.detail)
    }

    fn print_help(&mut self) -> io::Result<()> {
        writeln!(
            self.out,
            "{}",
            r#"Commands:
  url <URL>        set the backend URL
  mode <MODE>      set the analysis mode (quick, standard, deep)
  type <TYPE|->    set or clear the log type hint
  file <PATH|->    select or drop a log file (a file takes precedence over pasted text)
  paste            read log lines until a line containing only '.'
  analyze          send the logs for analysis
  clear            reset text, file and output
  show             print the current inputs and output
  quit             leave the session"#
        )
    }
}
