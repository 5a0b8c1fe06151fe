//! Wiring between the sandbox host and the admission controller.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use respawn_core::{
    ActiveSubjects, AdmissionController, AdmissionResult, Caller, Clock, Collaborators,
    CommandTable, CompletionHandler, ConfigProvider, CooldownTracker, DeathNotice,
    FileConfigProvider, Scheduler, Subject, SystemClock, TokioScheduler,
};
use respawn_types::COMMAND_NAME;

use crate::sandbox::Sandbox;

/// Commands reachable through the routing table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Gate,
}

pub struct App {
    pub sandbox: Arc<Sandbox>,
    config: Arc<dyn ConfigProvider>,
    controller: AdmissionController,
    completion: CompletionHandler,
    routes: Mutex<CommandTable<Route>>,
}

impl App {
    /// Production wiring: file-backed config, wall clock, tokio timers.
    /// Must be called from inside a tokio runtime.
    pub fn open(config_path: PathBuf) -> Result<Self, String> {
        let config = FileConfigProvider::open(config_path).map_err(|e| e.to_string())?;
        tracing::info!(path = %config.path().display(), "Loaded configuration");

        let scheduler = TokioScheduler::current().ok_or("error: No async runtime available")?;
        Ok(Self::with_host(
            Arc::new(config),
            Arc::new(SystemClock),
            Arc::new(scheduler),
        ))
    }

    pub fn with_host(
        config: Arc<dyn ConfigProvider>,
        clock: Arc<dyn Clock>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        let sandbox = Arc::new(Sandbox::new());
        let active = Arc::new(ActiveSubjects::new());

        let host = Collaborators {
            permissions: sandbox.clone(),
            context: sandbox.clone(),
            effects: sandbox.clone(),
            config: config.clone(),
            clock,
            scheduler,
        };
        let controller =
            AdmissionController::new(host, Arc::new(CooldownTracker::new()), active.clone());
        let completion = CompletionHandler::new(active, config.clone());

        let app = Self {
            sandbox,
            config,
            controller,
            completion,
            routes: Mutex::new(CommandTable::new()),
        };
        app.register_routes();
        app
    }

    pub fn config(&self) -> &Arc<dyn ConfigProvider> {
        &self.config
    }

    pub fn controller(&self) -> &AdmissionController {
        &self.controller
    }

    /// Route `label` typed by `caller` to its command.
    pub fn dispatch(
        &self,
        caller: &Caller,
        label: &str,
        args: &[&str],
    ) -> Result<AdmissionResult, String> {
        let route = self
            .routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .resolve(label)
            .map(|(_, route)| *route);

        match route {
            Some(Route::Gate) => {
                let result = self
                    .controller
                    .admit(caller, args, |subject| self.perform(subject));
                if result == AdmissionResult::Reloaded {
                    self.register_routes();
                }
                Ok(result)
            }
            None => Err(format!("error: Unknown command /{label}")),
        }
    }

    /// Labels currently routed to the gate command
    pub fn labels(&self) -> Vec<String> {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .labels_for(COMMAND_NAME)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    // (Re)install the command under its configured aliases
    fn register_routes(&self) {
        let snapshot = self.config.current_snapshot();
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);

        let skipped = routes.register(COMMAND_NAME, snapshot.aliases.as_slice(), Route::Gate);
        if !skipped.is_empty() {
            tracing::warn!(?skipped, "Some aliases could not be registered");
        }
        tracing::debug!(labels = ?routes.labels_for(COMMAND_NAME), "Command registered");
    }

    // The protected action. The death event fires synchronously, the way a server
    // reports a death caused by setting health to zero.
    fn perform(&self, subject: &Subject) {
        self.sandbox.kill(subject.id);

        match self.completion.on_death(subject.id) {
            DeathNotice::Default => println!("{} died", subject.name),
            DeathNotice::Suppressed => {}
        }

        self.sandbox.respawn(subject.id);
    }
}
