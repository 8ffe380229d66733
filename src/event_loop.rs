use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// Single-threaded event pump for the page.
///
/// Every input event and every idle tick goes through one handler, and
/// after each batch the `settle` hook runs. Work deferred by a handler (the
/// focus trap's blur) therefore runs after the handler returns but before the
/// next event is read, which is the "next tick" the overlay relies on.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn poll(&mut self) -> io::Result<Option<Event>> {
        if self.driver.poll(self.poll_interval)? {
            Ok(Some(self.driver.read()?))
        } else {
            Ok(None)
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Runs the loop on the current thread until a callback returns `Quit`.
    ///
    /// `handler` receives `Some(event)` for input and `None` when the poll
    /// interval elapses without one (used for drawing and animation).
    /// `settle` runs after every handler call. Both borrow `state` in turn.
    pub fn run<T, F, S>(&mut self, state: &mut T, mut handler: F, mut settle: S) -> io::Result<()>
    where
        F: FnMut(&mut D, &mut T, Option<Event>) -> io::Result<ControlFlow>,
        S: FnMut(&mut D, &mut T) -> io::Result<ControlFlow>,
    {
        loop {
            if let ControlFlow::Quit = handler(&mut self.driver, state, None)? {
                break;
            }
            if let ControlFlow::Quit = settle(&mut self.driver, state)? {
                break;
            }

            if self.driver.poll(self.poll_interval)? {
                // Drain bursts (held keys, fast scrolling) before the next
                // idle tick so rendering does not fall behind input.
                loop {
                    let event = self.driver.read()?;
                    if let ControlFlow::Quit = handler(&mut self.driver, state, Some(event))? {
                        return Ok(());
                    }
                    if let ControlFlow::Quit = settle(&mut self.driver, state)? {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}
