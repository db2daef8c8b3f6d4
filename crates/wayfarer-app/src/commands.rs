//! Built-in commands for the Wayfarer shell.

use wayfarer_nav::{HistoryListing, Toolbar};
use wayfarer_types::config::AddressTracking;
use wayfarer_types::error::{Result, WayfarerError};

use crate::render::{history_panel, toolbar_line};
use crate::shell::{Command, CommandOutput, CommandRegistry, Session};

/// Register all built-in commands into a registry.
pub fn register_builtins(reg: &mut CommandRegistry) {
    reg.register(Box::new(TypeCmd));
    reg.register(Box::new(GoCmd));
    reg.register(Box::new(BackCmd));
    reg.register(Box::new(ForwardCmd));
    reg.register(Box::new(ReloadCmd));
    reg.register(Box::new(HistoryCmd));
    reg.register(Box::new(OpenCmd));
    reg.register(Box::new(ClearCmd));
    reg.register(Box::new(StatusCmd));
    reg.register(Box::new(PressBackCmd));
}

// ---------------------------------------------------------------------------
// type
// ---------------------------------------------------------------------------

struct TypeCmd;
impl Command for TypeCmd {
    fn name(&self) -> &str {
        "type"
    }
    fn description(&self) -> &str {
        "Edit the address bar without navigating"
    }
    fn usage(&self) -> &str {
        "type <text>"
    }
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        self.execute_raw(&args.join(" "), session)
    }
    fn execute_raw(&self, rest: &str, session: &mut Session) -> Result<CommandOutput> {
        let controller = &mut session.controller;
        controller.set_address_focus(true);
        controller.set_address_text(rest);
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// go
// ---------------------------------------------------------------------------

struct GoCmd;
impl Command for GoCmd {
    fn name(&self) -> &str {
        "go"
    }
    fn description(&self) -> &str {
        "Navigate to the given text, or to what the address bar holds"
    }
    fn usage(&self) -> &str {
        "go [text]"
    }
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        self.execute_raw(&args.join(" "), session)
    }
    fn execute_raw(&self, rest: &str, session: &mut Session) -> Result<CommandOutput> {
        let controller = &mut session.controller;
        if !rest.trim().is_empty() {
            controller.set_address_text(rest);
        }
        controller.submit_address();
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// back / forward / reload
// ---------------------------------------------------------------------------

struct BackCmd;
impl Command for BackCmd {
    fn name(&self) -> &str {
        "back"
    }
    fn description(&self) -> &str {
        "Go back one page"
    }
    fn usage(&self) -> &str {
        "back"
    }
    fn execute(&self, _args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        if !session.controller.state().can_go_back() {
            return Ok(CommandOutput::Text("Nothing to go back to".to_string()));
        }
        session.controller.request_go_back();
        Ok(CommandOutput::None)
    }
}

struct ForwardCmd;
impl Command for ForwardCmd {
    fn name(&self) -> &str {
        "forward"
    }
    fn description(&self) -> &str {
        "Go forward one page"
    }
    fn usage(&self) -> &str {
        "forward"
    }
    fn execute(&self, _args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        if !session.controller.state().can_go_forward() {
            return Ok(CommandOutput::Text("Nothing to go forward to".to_string()));
        }
        session.controller.request_go_forward();
        Ok(CommandOutput::None)
    }
}

struct ReloadCmd;
impl Command for ReloadCmd {
    fn name(&self) -> &str {
        "reload"
    }
    fn description(&self) -> &str {
        "Reload the current page"
    }
    fn usage(&self) -> &str {
        "reload"
    }
    fn execute(&self, _args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        session.controller.request_reload();
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

struct HistoryCmd;
impl Command for HistoryCmd {
    fn name(&self) -> &str {
        "history"
    }
    fn description(&self) -> &str {
        "List visited pages, or open/close the history panel"
    }
    fn usage(&self) -> &str {
        "history [show|hide]"
    }
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        let controller = &mut session.controller;
        match args.first().copied() {
            None | Some("show") => {
                if !args.is_empty() {
                    controller.show_history_panel();
                }
                let listing = HistoryListing::from_state(controller.state());
                Ok(CommandOutput::Text(history_panel(&listing)))
            },
            Some("hide") => {
                controller.hide_history_panel();
                Ok(CommandOutput::None)
            },
            Some(other) => Err(WayfarerError::Command(format!(
                "history: unknown option '{other}' (usage: {})",
                self.usage()
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// open
// ---------------------------------------------------------------------------

struct OpenCmd;
impl Command for OpenCmd {
    fn name(&self) -> &str {
        "open"
    }
    fn description(&self) -> &str {
        "Open a history entry by its number in the history list"
    }
    fn usage(&self) -> &str {
        "open <n>"
    }
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        let Some(arg) = args.first() else {
            return Err(WayfarerError::Command(format!("usage: {}", self.usage())));
        };
        let position: usize = arg
            .parse()
            .map_err(|_| WayfarerError::Command(format!("open: not a number: {arg}")))?;

        let listing = HistoryListing::from_state(session.controller.state());
        let url = listing
            .entry(position)
            .ok_or_else(|| WayfarerError::Command(format!("open: no history entry {position}")))?
            .to_string();
        session.controller.select_history_entry(&url);
        Ok(CommandOutput::None)
    }
}

// ---------------------------------------------------------------------------
// clear
// ---------------------------------------------------------------------------

struct ClearCmd;
impl Command for ClearCmd {
    fn name(&self) -> &str {
        "clear"
    }
    fn description(&self) -> &str {
        "Clear the history (asks for confirmation)"
    }
    fn usage(&self) -> &str {
        "clear [confirm|cancel]"
    }
    fn execute(&self, args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        let Session {
            controller,
            clear_prompt,
        } = session;
        match args.first().copied() {
            None => {
                if clear_prompt.request(controller.state()) {
                    Ok(CommandOutput::Text(format!(
                        "Clear {} history entries? Type 'clear confirm' or 'clear cancel'",
                        controller.state().history().len()
                    )))
                } else {
                    Ok(CommandOutput::Text("History is already empty".to_string()))
                }
            },
            Some("confirm") => {
                if clear_prompt.confirm(controller) {
                    Ok(CommandOutput::Text("History cleared".to_string()))
                } else {
                    Err(WayfarerError::Command(
                        "clear: nothing to confirm, run 'clear' first".to_string(),
                    ))
                }
            },
            Some("cancel") => {
                clear_prompt.cancel();
                Ok(CommandOutput::None)
            },
            Some(other) => Err(WayfarerError::Command(format!(
                "clear: unknown option '{other}' (usage: {})",
                self.usage()
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// status
// ---------------------------------------------------------------------------

struct StatusCmd;
impl Command for StatusCmd {
    fn name(&self) -> &str {
        "status"
    }
    fn description(&self) -> &str {
        "Show toolbar, committed URL and persistence counters"
    }
    fn usage(&self) -> &str {
        "status"
    }
    fn execute(&self, _args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        let controller = &session.controller;
        let state = controller.state();
        let mut out = toolbar_line(&Toolbar::from_state(state));
        out.push_str(&format!("\nCommitted: {}", state.committed_url()));
        if let Some(url) = controller.viewport().current_url() {
            out.push_str(&format!("\nShowing:   {url}"));
        }
        let store = controller.store();
        let tracking = match store.tracking() {
            AddressTracking::Live => "live",
            AddressTracking::PreserveWhileEditing => "preserve-while-editing",
        };
        let editing = if store.address_focused() { ", editing" } else { "" };
        out.push_str(&format!("\nTracking:  {tracking}{editing}"));
        out.push_str(&format!("\nHistory:   {} entries", state.history().len()));
        if state.history_panel_visible() {
            out.push_str(" (panel open)");
        }
        match controller.persistence() {
            Some(bridge) => {
                let stats = bridge.stats();
                out.push_str(&format!(
                    "\nStorage:   '{}' ({} writes, {} coalesced, {} failed)",
                    bridge.key(),
                    stats.writes(),
                    stats.coalesced(),
                    stats.failures()
                ));
            },
            None => out.push_str("\nStorage:   not persisted"),
        }
        Ok(CommandOutput::Text(out))
    }
}

// ---------------------------------------------------------------------------
// press-back
// ---------------------------------------------------------------------------

struct PressBackCmd;
impl Command for PressBackCmd {
    fn name(&self) -> &str {
        "press-back"
    }
    fn description(&self) -> &str {
        "Simulate the platform back button"
    }
    fn usage(&self) -> &str {
        "press-back"
    }
    fn execute(&self, _args: &[&str], session: &mut Session) -> Result<CommandOutput> {
        if session.controller.handle_back_press() {
            Ok(CommandOutput::None)
        } else {
            Ok(CommandOutput::Text(
                "Back press not consumed, the platform would leave the browser".to_string(),
            ))
        }
    }
}
