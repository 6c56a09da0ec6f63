#![forbid(unsafe_code)]

//! Threaded driver: runs one [`VisibilityController`] on its own thread.
//!
//! Hosts that cannot call [`advance`](VisibilityController::advance) on a
//! schedule hand the controller to [`spawn`]. The driver thread blocks on its
//! command channel until the controller's next deadline, applies commands as
//! they arrive with the wall-clock time of arrival, and forwards lifecycle
//! events to [`DriverHandle::events`].
//!
//! # Shutdown
//!
//! [`DriverHandle::shutdown`] destroys the instance (emitting any pending
//! `hide`/`hidden`), joins the thread, and returns the controller. Dropping
//! the handle or disconnecting the command channel also destroys the
//! instance, but does not block on the join.

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;

use anchortip_core::{OptionLayers, TooltipHost, TriggerEvent};
use web_time::Instant;

use crate::controller::VisibilityController;
use crate::lifecycle::LifecycleEvent;

/// Work sent to the driver thread.
#[derive(Debug, Clone)]
pub enum DriverCommand {
    Event(TriggerEvent),
    Show,
    Hide,
    Reposition,
    Configure(OptionLayers),
    /// Destroy the instance and stop the thread.
    Shutdown,
}

/// Control side of a running driver.
pub struct DriverHandle<H> {
    commands: mpsc::Sender<DriverCommand>,
    events: mpsc::Receiver<LifecycleEvent>,
    thread: Option<thread::JoinHandle<VisibilityController<H>>>,
}

impl<H> std::fmt::Debug for DriverHandle<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverHandle")
            .field("running", &self.thread.is_some())
            .finish()
    }
}

/// Move `controller` onto a new driver thread.
pub fn spawn<H>(controller: VisibilityController<H>) -> io::Result<DriverHandle<H>>
where
    H: TooltipHost + Send + 'static,
{
    let (command_tx, command_rx) = mpsc::channel();
    let (event_tx, event_rx) = mpsc::channel();

    let thread = thread::Builder::new()
        .name("anchortip-driver".into())
        .spawn(move || run(controller, command_rx, event_tx))?;

    Ok(DriverHandle {
        commands: command_tx,
        events: event_rx,
        thread: Some(thread),
    })
}

fn run<H: TooltipHost>(
    mut controller: VisibilityController<H>,
    commands: mpsc::Receiver<DriverCommand>,
    events: mpsc::Sender<LifecycleEvent>,
) -> VisibilityController<H> {
    tracing::debug!("driver started");
    loop {
        let received = match controller.next_deadline() {
            Some(deadline) => {
                commands.recv_timeout(deadline.saturating_duration_since(Instant::now()))
            }
            None => commands.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        let now = Instant::now();

        let stop = match received {
            Ok(DriverCommand::Event(event)) => {
                controller.handle(event, now);
                false
            }
            Ok(DriverCommand::Show) => {
                controller.show(now);
                false
            }
            Ok(DriverCommand::Hide) => {
                controller.hide(now);
                false
            }
            Ok(DriverCommand::Reposition) => {
                controller.advance(now);
                controller.reposition();
                false
            }
            Ok(DriverCommand::Configure(layers)) => {
                controller.advance(now);
                controller.configure(layers);
                false
            }
            Ok(DriverCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => {
                controller.destroy(now);
                true
            }
            Err(RecvTimeoutError::Timeout) => {
                controller.advance(now);
                false
            }
        };

        for event in controller.drain_events() {
            // The handle may already be gone; the instance still runs down.
            let _ = events.send(event);
        }

        if stop {
            break;
        }
    }
    tracing::debug!("driver stopped");
    controller
}

impl<H> DriverHandle<H> {
    /// Queue a command. Returns `false` if the driver has stopped.
    pub fn send(&self, command: DriverCommand) -> bool {
        self.commands.send(command).is_ok()
    }

    /// Forward a trigger event.
    pub fn event(&self, event: TriggerEvent) -> bool {
        self.send(DriverCommand::Event(event))
    }

    pub fn show(&self) -> bool {
        self.send(DriverCommand::Show)
    }

    pub fn hide(&self) -> bool {
        self.send(DriverCommand::Hide)
    }

    pub fn reposition(&self) -> bool {
        self.send(DriverCommand::Reposition)
    }

    pub fn configure(&self, layers: OptionLayers) -> bool {
        self.send(DriverCommand::Configure(layers))
    }

    /// Lifecycle events forwarded by the driver thread.
    pub fn events(&self) -> &mpsc::Receiver<LifecycleEvent> {
        &self.events
    }

    /// Destroy the instance, join the thread, and hand the controller back.
    ///
    /// Returns `None` if the driver thread panicked.
    pub fn shutdown(mut self) -> Option<VisibilityController<H>> {
        let _ = self.commands.send(DriverCommand::Shutdown);
        self.thread.take()?.join().ok()
    }
}

impl<H> Drop for DriverHandle<H> {
    fn drop(&mut self) {
        if self.thread.is_some() {
            let _ = self.commands.send(DriverCommand::Shutdown);
            // Don't join in drop to avoid blocking
        }
    }
}
