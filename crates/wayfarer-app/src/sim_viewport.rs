//! A stand-in rendering engine.
//!
//! Keeps its own back/forward stacks the way a real engine does, and queues
//! the events a real engine would emit (load start, navigation change, load
//! end) for the main loop to feed back into the controller. Nothing is
//! fetched.

use std::collections::{HashMap, VecDeque};

use wayfarer_nav::{LoadId, NavigableViewport, ViewportEvent};
use wayfarer_types::error::{Result, WayfarerError};

/// Simulated viewport with a back/forward stack and optional redirects.
#[derive(Debug, Default)]
pub struct SimulatedViewport {
    back_stack: Vec<String>,
    forward_stack: Vec<String>,
    current: Option<String>,
    redirects: HashMap<String, String>,
    next_load: u64,
    events: VecDeque<ViewportEvent>,
}

impl SimulatedViewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make loads of `from` end up on `to`.
    #[cfg(test)]
    pub fn with_redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }

    pub fn current_url(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn can_go_back(&self) -> bool {
        !self.back_stack.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward_stack.is_empty()
    }

    /// Take every event emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<ViewportEvent> {
        self.events.drain(..).collect()
    }

    fn start_load(&mut self) -> LoadId {
        self.next_load += 1;
        let load = LoadId(self.next_load);
        self.events.push_back(ViewportEvent::LoadStarted { load: Some(load) });
        load
    }

    fn finish_load(&mut self, load: LoadId) {
        self.events.push_back(ViewportEvent::LoadFinished { load: Some(load) });
    }

    fn emit_navigation(&mut self) {
        if let Some(url) = self.current.clone() {
            self.events.push_back(ViewportEvent::NavigationStateChanged {
                url,
                can_go_back: self.can_go_back(),
                can_go_forward: self.can_go_forward(),
            });
        }
    }
}

/// Host part of an absolute URL, if there is one.
fn host_of(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("://")?;
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    (!host.is_empty()).then_some(host)
}

impl NavigableViewport for SimulatedViewport {
    fn navigate_to(&mut self, url: &str) -> Result<()> {
        let load = self.start_load();
        if host_of(url).is_none() {
            self.finish_load(load);
            return Err(WayfarerError::Viewport(format!("cannot resolve host of '{url}'")));
        }

        let target = self
            .redirects
            .get(url)
            .cloned()
            .unwrap_or_else(|| url.to_string());
        if let Some(previous) = self.current.take() {
            self.back_stack.push(previous);
        }
        self.forward_stack.clear();
        self.current = Some(target);

        self.emit_navigation();
        self.finish_load(load);
        Ok(())
    }

    fn go_back(&mut self) -> Result<()> {
        let previous = self
            .back_stack
            .pop()
            .ok_or_else(|| WayfarerError::Viewport("no page to go back to".to_string()))?;
        let load = self.start_load();
        if let Some(current) = self.current.take() {
            self.forward_stack.push(current);
        }
        self.current = Some(previous);
        self.emit_navigation();
        self.finish_load(load);
        Ok(())
    }

    fn go_forward(&mut self) -> Result<()> {
        let next = self
            .forward_stack
            .pop()
            .ok_or_else(|| WayfarerError::Viewport("no page to go forward to".to_string()))?;
        let load = self.start_load();
        if let Some(current) = self.current.take() {
            self.back_stack.push(current);
        }
        self.current = Some(next);
        self.emit_navigation();
        self.finish_load(load);
        Ok(())
    }

    fn reload(&mut self) -> Result<()> {
        if self.current.is_none() {
            return Err(WayfarerError::Viewport("nothing loaded".to_string()));
        }
        let load = self.start_load();
        self.emit_navigation();
        self.finish_load(load);
        Ok(())
    }
}
