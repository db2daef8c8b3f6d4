//! Shared test utilities for the navigation core.
//!
//! Provides a [`RecordingViewport`] that records every command it receives so
//! tests can assert on exactly what the core asked the viewport to do.

use wayfarer_types::error::{Result, WayfarerError};

use crate::viewport::{NavigableViewport, ViewportCommand};

/// A viewport that records commands instead of rendering anything.
#[derive(Debug, Default)]
pub struct RecordingViewport {
    pub commands: Vec<ViewportCommand>,
    /// When set, every command is recorded and then reported as failed.
    pub fail: bool,
}

impl RecordingViewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A viewport whose commands all fail.
    pub fn failing() -> Self {
        Self {
            commands: Vec::new(),
            fail: true,
        }
    }

    /// URLs of every `NavigateTo` command, in order.
    pub fn navigations(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                ViewportCommand::NavigateTo(url) => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, command: ViewportCommand) -> Result<()> {
        self.commands.push(command);
        if self.fail {
            return Err(WayfarerError::Viewport("recording viewport set to fail".into()));
        }
        Ok(())
    }
}

impl NavigableViewport for RecordingViewport {
    fn navigate_to(&mut self, url: &str) -> Result<()> {
        self.record(ViewportCommand::NavigateTo(url.to_string()))
    }

    fn go_back(&mut self) -> Result<()> {
        self.record(ViewportCommand::GoBack)
    }

    fn go_forward(&mut self) -> Result<()> {
        self.record(ViewportCommand::GoForward)
    }

    fn reload(&mut self) -> Result<()> {
        self.record(ViewportCommand::Reload)
    }
}
