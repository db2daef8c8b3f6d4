//! Contract between the navigation core and the rendering viewport.
//!
//! The viewport is the engine that actually fetches and displays pages. The
//! core only ever talks to it through [`NavigableViewport`] commands, and the
//! viewport talks back by emitting [`ViewportEvent`]s that the controller
//! maps onto store actions.

use std::fmt;

use wayfarer_types::error::Result;

/// Identity of one load attempt inside the viewport.
///
/// Lets the store tell a stale load-end from an old navigation apart from the
/// end of the load currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadId(pub u64);

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "load#{}", self.0)
    }
}

/// A command issued by the core to the viewport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewportCommand {
    NavigateTo(String),
    GoBack,
    GoForward,
    Reload,
}

impl fmt::Display for ViewportCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NavigateTo(url) => write!(f, "navigate to {url}"),
            Self::GoBack => f.write_str("go back"),
            Self::GoForward => f.write_str("go forward"),
            Self::Reload => f.write_str("reload"),
        }
    }
}

/// An event emitted by the viewport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewportEvent {
    /// The viewport's current page changed (commit, link click, redirect,
    /// history step).
    NavigationStateChanged {
        url: String,
        can_go_back: bool,
        can_go_forward: bool,
    },
    /// A load began. `None` when the viewport does not track load identity.
    LoadStarted { load: Option<LoadId> },
    /// A load finished (successfully or not).
    LoadFinished { load: Option<LoadId> },
}

/// A content surface the core can drive.
///
/// Failures are the viewport's own business to surface; the controller only
/// logs them.
pub trait NavigableViewport {
    /// Load `url`, pushing a new entry onto the viewport's own stack.
    fn navigate_to(&mut self, url: &str) -> Result<()>;

    /// Step back in the viewport's stack.
    fn go_back(&mut self) -> Result<()>;

    /// Step forward in the viewport's stack.
    fn go_forward(&mut self) -> Result<()>;

    /// Reload the current page.
    fn reload(&mut self) -> Result<()>;

    /// Dispatch a [`ViewportCommand`] to the matching method.
    fn execute(&mut self, command: &ViewportCommand) -> Result<()> {
        match command {
            ViewportCommand::NavigateTo(url) => self.navigate_to(url),
            ViewportCommand::GoBack => self.go_back(),
            ViewportCommand::GoForward => self.go_forward(),
            ViewportCommand::Reload => self.reload(),
        }
    }
}
