//! Command trait, registry, and dispatch for the Wayfarer shell.

use std::collections::BTreeMap;

use wayfarer_nav::{BrowserController, ClearHistoryPrompt};
use wayfarer_types::error::{Result, WayfarerError};

use crate::sim_viewport::SimulatedViewport;

/// Output produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Plain text lines.
    Text(String),
    /// Command produced no visible output.
    None,
    /// Signal to the main loop to exit.
    Quit,
}

/// Everything a command may act on.
pub struct Session {
    pub controller: BrowserController<SimulatedViewport>,
    pub clear_prompt: ClearHistoryPrompt,
}

impl Session {
    pub fn new(controller: BrowserController<SimulatedViewport>) -> Self {
        Self {
            controller,
            clear_prompt: ClearHistoryPrompt::default(),
        }
    }

    /// Feed every queued viewport event back into the controller.
    /// Returns how many events were applied.
    pub fn pump_events(&mut self) -> usize {
        let events = self.controller.viewport_mut().drain_events();
        let count = events.len();
        for event in events {
            log::trace!("Viewport event: {event:?}");
            self.controller.handle_event(event);
        }
        count
    }
}

/// A single executable command.
pub trait Command {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// One-line description for `help`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "open <n>").
    fn usage(&self) -> &str;

    /// Execute the command with the given arguments.
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput>;

    /// Execute with the unsplit text following the command word. Commands
    /// that take free text override this; the default splits on whitespace.
    fn execute_raw(&self, rest: &str, session: &mut Session) -> Result<CommandOutput> {
        let args: Vec<&str> = rest.split_whitespace().collect();
        self.execute(&args, session)
    }
}

/// Split a line into its command word and the text after it. The separating
/// whitespace is dropped; the rest is kept verbatim apart from the line end.
fn split_command(line: &str) -> Option<(&str, &str)> {
    let line = line.trim_end_matches(['\r', '\n']).trim_start();
    if line.is_empty() {
        return None;
    }
    Some(match line.find(char::is_whitespace) {
        Some(end) => (&line[..end], line[end..].trim_start()),
        None => (line, ""),
    })
}

/// Registry of available commands with dispatch.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Replaces any existing command with the same name.
    pub fn register(&mut self, cmd: Box<dyn Command>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    /// Names of all registered commands, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Parse and execute one command line, then apply whatever the viewport
    /// emitted in response.
    ///
    /// The first word selects the command (case-insensitive); the text after
    /// it goes to [`Command::execute_raw`]. `help` and `quit` are handled here.
    pub fn execute(&self, line: &str, session: &mut Session) -> Result<CommandOutput> {
        let Some((name, rest)) = split_command(line) else {
            return Ok(CommandOutput::None);
        };
        let name = name.to_ascii_lowercase();

        let output = match name.as_str() {
            "help" => {
                let args: Vec<&str> = rest.split_whitespace().collect();
                self.execute_help(&args)
            },
            "quit" | "exit" => Ok(CommandOutput::Quit),
            _ => match self.commands.get(&name) {
                Some(cmd) => cmd.execute_raw(rest, session),
                None => Err(WayfarerError::Command(format!("unknown command: {name}"))),
            },
        };
        session.pump_events();
        output
    }

    /// Built-in help with access to the registry.
    fn execute_help(&self, args: &[&str]) -> Result<CommandOutput> {
        if let Some(&name) = args.first() {
            let name_lower = name.to_ascii_lowercase();
            return match self.commands.get(&name_lower) {
                Some(cmd) => Ok(CommandOutput::Text(format!(
                    "{}\n  {}\n  Usage: {}",
                    cmd.name(),
                    cmd.description(),
                    cmd.usage()
                ))),
                None => Err(WayfarerError::Command(format!("unknown command: {name}"))),
            };
        }

        let width = self.commands.keys().map(String::len).max().unwrap_or(4);
        let mut out = String::from("Commands:\n");
        for cmd in self.commands.values() {
            out.push_str(&format!("  {:<width$}  {}\n", cmd.name(), cmd.description()));
        }
        out.push_str(&format!("  {:<width$}  {}\n", "help", "List commands or describe one"));
        out.push_str(&format!("  {:<width$}  {}", "quit", "Save and exit"));
        Ok(CommandOutput::Text(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfarer_nav::BrowserState;
    use wayfarer_types::config::BrowserConfig;

    struct EchoCmd;
    impl Command for EchoCmd {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Print arguments"
        }
        fn usage(&self) -> &str {
            "echo [text...]"
        }
        fn execute(&self, args: &[&str], _session: &mut Session) -> Result<CommandOutput> {
            Ok(CommandOutput::Text(args.join(" ")))
        }
    }

    fn session() -> Session {
        let controller = BrowserController::new(
            BrowserState::default(),
            &BrowserConfig::default(),
            SimulatedViewport::new(),
        );
        Session::new(controller)
    }

    fn registry() -> CommandRegistry {
        let mut reg = CommandRegistry::new();
        reg.register(Box::new(EchoCmd));
        reg
    }

    #[test]
    fn dispatches_case_insensitively() {
        let mut s = session();
        let out = registry().execute("ECHO  hello   world", &mut s).unwrap();
        assert_eq!(out, CommandOutput::Text("hello world".into()));
    }

    #[test]
    fn split_keeps_remainder_verbatim() {
        assert_eq!(split_command("  type a   b \n"), Some(("type", "a   b ")));
        assert_eq!(split_command("go\r\n"), Some(("go", "")));
        assert_eq!(split_command("go\t x"), Some(("go", "x")));
        assert_eq!(split_command(" \n"), None);
    }

    #[test]
    fn blank_line_is_noop() {
        let mut s = session();
        assert_eq!(registry().execute("   ", &mut s).unwrap(), CommandOutput::None);
    }

    #[test]
    fn unknown_command_errors() {
        let mut s = session();
        let err = registry().execute("frobnicate", &mut s).unwrap_err();
        assert!(err.to_string().contains("unknown command: frobnicate"));
    }

    #[test]
    fn quit_signals_exit() {
        let mut s = session();
        assert_eq!(registry().execute("quit", &mut s).unwrap(), CommandOutput::Quit);
        assert_eq!(registry().execute("exit", &mut s).unwrap(), CommandOutput::Quit);
    }

    #[test]
    fn help_lists_registered_commands() {
        let mut s = session();
        let CommandOutput::Text(text) = registry().execute("help", &mut s).unwrap() else {
            panic!("expected text");
        };
        assert!(text.contains("echo"));
        assert!(text.contains("Print arguments"));
        assert!(text.contains("quit"));
    }

    #[test]
    fn help_describes_one_command() {
        let mut s = session();
        let CommandOutput::Text(text) = registry().execute("help echo", &mut s).unwrap() else {
            panic!("expected text");
        };
        assert!(text.contains("Usage: echo [text...]"));
        assert!(registry().execute("help nope", &mut s).is_err());
    }

    #[test]
    fn pump_applies_viewport_events() {
        let mut s = session();
        s.controller.load_committed();
        assert_eq!(s.pump_events(), 3);
        assert!(!s.controller.state().is_loading());
        assert_eq!(s.controller.state().history(), ["https://www.example.com"]);
        assert_eq!(s.pump_events(), 0);
    }
}
