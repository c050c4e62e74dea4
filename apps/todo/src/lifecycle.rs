//! Ordered start/stop orchestration for the server's components.
//!
//! Components start in registration order. A failed start stops the ones
//! already running in reverse order. Stopping always walks the running
//! components in reverse, each under its own timeout, and a hook that fails or
//! overruns is logged without blocking the hooks after it.
//!
//! Components that keep a background task alive report its unexpected exit
//! through an [`ExitReporter`], which ends [`Lifecycle::run_until`] early.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use eyre::{Result, WrapErr, eyre};
use futures::future::BoxFuture;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// A resource with a start action and a matching stop action
#[async_trait]
pub trait Component: Send {
    fn name(&self) -> &str;

    async fn start(&mut self) -> Result<()>;

    async fn stop(&mut self) -> Result<()>;

    /// Receives the reporter for background work spawned by `start`
    fn attach_exit_reporter(&mut self, _reporter: ExitReporter) {}
}

/// A running component whose background task ended on its own
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentExit {
    pub component: String,
    pub error: String,
}

/// Handle a component uses to announce that its background task died
#[derive(Debug, Clone)]
pub struct ExitReporter {
    component: String,
    tx: mpsc::UnboundedSender<ComponentExit>,
}

impl ExitReporter {
    pub fn report(&self, error: impl fmt::Display) {
        // Nobody is listening once the lifecycle is gone
        let _ = self.tx.send(ComponentExit {
            component: self.component.clone(),
            error: error.to_string(),
        });
    }
}

type Action = Box<dyn FnOnce() -> BoxFuture<'static, Result<()>> + Send>;

/// Closure-backed component, for resources that only need a start or a stop action
pub struct Hook {
    name: String,
    on_start: Option<Action>,
    on_stop: Option<Action>,
}

impl Hook {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            on_start: None,
            on_stop: None,
        }
    }

    pub fn on_start<F, Fut>(mut self, action: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.on_start = Some(Box::new(move || Box::pin(action())));
        self
    }

    pub fn on_stop<F, Fut>(mut self, action: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.on_stop = Some(Box::new(move || Box::pin(action())));
        self
    }
}

#[async_trait]
impl Component for Hook {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&mut self) -> Result<()> {
        match self.on_start.take() {
            Some(action) => action().await,
            None => Ok(()),
        }
    }

    async fn stop(&mut self) -> Result<()> {
        match self.on_stop.take() {
            Some(action) => action().await,
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Constructing,
    Starting,
    Running,
    Stopping,
    Stopped,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Constructing => "constructing",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

pub struct Lifecycle {
    components: Vec<Box<dyn Component>>,
    started: usize,
    state: LifecycleState,
    stop_timeout: Duration,
    exit_tx: mpsc::UnboundedSender<ComponentExit>,
    exits: mpsc::UnboundedReceiver<ComponentExit>,
}

impl Lifecycle {
    pub fn new(stop_timeout: Duration) -> Self {
        let (exit_tx, exits) = mpsc::unbounded_channel();
        Self {
            components: Vec::new(),
            started: 0,
            state: LifecycleState::Constructing,
            stop_timeout,
            exit_tx,
            exits,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Names of the registered components, in start order
    pub fn components(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.name()).collect()
    }

    /// Append a component. Only allowed before [`Lifecycle::start`].
    pub fn register(&mut self, mut component: impl Component + 'static) -> Result<()> {
        if self.state != LifecycleState::Constructing {
            return Err(eyre!(
                "cannot register '{}' while {}",
                component.name(),
                self.state
            ));
        }
        let reporter = ExitReporter {
            component: component.name().to_string(),
            tx: self.exit_tx.clone(),
        };
        component.attach_exit_reporter(reporter);
        self.components.push(Box::new(component));
        Ok(())
    }

    /// Start every component in registration order.
    ///
    /// On failure the components already started are stopped in reverse and
    /// the lifecycle ends up [`LifecycleState::Stopped`].
    pub async fn start(&mut self) -> Result<()> {
        if self.state != LifecycleState::Constructing {
            return Err(eyre!("cannot start while {}", self.state));
        }
        self.state = LifecycleState::Starting;

        for index in 0..self.components.len() {
            let component = &mut self.components[index];
            let name = component.name().to_string();
            info!(component = %name, "Starting");

            let started = component.start().await;
            if let Err(e) = started {
                error!(component = %name, error = %e, "Start failed, rolling back");
                // Rollback failures are logged by stop; the start error is what callers see
                let _ = self.stop().await;
                return Err(e).wrap_err_with(|| format!("failed to start '{name}'"));
            }
            self.started = index + 1;
        }

        self.state = LifecycleState::Running;
        info!(components = self.started, "All components started");
        Ok(())
    }

    /// Stop started components in reverse order.
    ///
    /// Every hook runs even if an earlier one failed or timed out; the
    /// returned error names the hooks that did not stop cleanly.
    pub async fn stop(&mut self) -> Result<()> {
        if self.state == LifecycleState::Stopped {
            return Ok(());
        }
        self.state = LifecycleState::Stopping;

        let mut failed = Vec::new();
        for component in self.components[..self.started].iter_mut().rev() {
            let name = component.name().to_string();
            info!(component = %name, "Stopping");

            match tokio::time::timeout(self.stop_timeout, component.stop()).await {
                Ok(Ok(())) => info!(component = %name, "Stopped"),
                Ok(Err(e)) => {
                    error!(component = %name, error = %e, "Stop failed");
                    failed.push(name);
                }
                Err(_) => {
                    warn!(component = %name, timeout = ?self.stop_timeout, "Stop timed out");
                    failed.push(name);
                }
            }
        }

        self.started = 0;
        self.state = LifecycleState::Stopped;

        if failed.is_empty() {
            Ok(())
        } else {
            Err(eyre!("components failed to stop cleanly: {}", failed.join(", ")))
        }
    }

    /// Start, wait for `shutdown` or a component exit, then stop.
    ///
    /// A component exit still stops everything else, and is returned as the
    /// error even when the stop itself succeeds.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        self.start().await?;

        let exit = tokio::select! {
            _ = shutdown => None,
            exit = self.exits.recv() => exit,
        };

        match exit {
            None => {
                info!("Shutdown requested");
                self.stop().await
            }
            Some(exit) => {
                error!(component = %exit.component, error = %exit.error, "Component exited, shutting down");
                if let Err(e) = self.stop().await {
                    warn!(error = %e, "Stop after component exit was not clean");
                }
                Err(eyre!("component '{}' exited: {}", exit.component, exit.error))
            }
        }
    }
}
