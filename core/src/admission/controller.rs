//! Admission controller
//!
//! Owns the shared stores (cooldowns, active subjects) and the host collaborators,
//! and drives one request at a time through the admission state machine. Nothing
//! here takes a lock that outlives a single store operation; concurrent admissions
//! for the same subject are serialized only by the cooldown tracker's per-key
//! check-and-arm.

use std::sync::Arc;
use std::time::Duration;

use respawn_types::{GateConfig, formatting, permissions};

use super::active::ActiveSubjects;
use super::outcome::{AdmissionResult, Rejection};
use super::pipeline::run_pipeline;
use crate::clock::Clock;
use crate::config::ConfigProvider;
use crate::cooldown::CooldownTracker;
use crate::host::{ContextPolicy, EffectHandlers, PermissionOracle};
use crate::scheduler::Scheduler;
use crate::subject::{Caller, Subject};

const RELOAD_ARG: &str = "reload";

/// Host-side services the controller calls through
#[derive(Clone)]
pub struct Collaborators {
    pub permissions: Arc<dyn PermissionOracle>,
    pub context: Arc<dyn ContextPolicy>,
    pub effects: Arc<dyn EffectHandlers>,
    pub config: Arc<dyn ConfigProvider>,
    pub clock: Arc<dyn Clock>,
    pub scheduler: Arc<dyn Scheduler>,
}

pub struct AdmissionController {
    cooldowns: Arc<CooldownTracker>,
    active: Arc<ActiveSubjects>,
    host: Collaborators,
}

impl AdmissionController {
    pub fn new(
        host: Collaborators,
        cooldowns: Arc<CooldownTracker>,
        active: Arc<ActiveSubjects>,
    ) -> Self {
        Self {
            cooldowns,
            active,
            host,
        }
    }

    pub fn cooldowns(&self) -> &Arc<CooldownTracker> {
        &self.cooldowns
    }

    pub fn active_subjects(&self) -> &Arc<ActiveSubjects> {
        &self.active
    }

    /// Run one admission for `caller` with command arguments `args`.
    ///
    /// On acceptance `action` is invoked exactly once, synchronously, before any
    /// effect runs. It is never invoked on rejection or for `reload`.
    pub fn admit<F>(&self, caller: &Caller, args: &[&str], action: F) -> AdmissionResult
    where
        F: FnOnce(&Subject),
    {
        // One snapshot for the whole admission, even if a reload lands midway
        let config = self.host.config.current_snapshot();

        // ─── Permission ──────────────────────────────────────────────────────
        if !self.has_permission(caller, permissions::COMMAND) {
            return self.reject(caller, &config, Rejection::NoPermission);
        }

        if let [arg] = args {
            if arg.eq_ignore_ascii_case(RELOAD_ARG) {
                return self.reload(caller, &config);
            }
        }

        // ─── Syntax ──────────────────────────────────────────────────────────
        if !args.is_empty() {
            return self.reject(caller, &config, Rejection::InvalidSyntax);
        }

        let Caller::Player(subject) = caller else {
            tracing::error!("This command can only be run in-game!");
            return AdmissionResult::Rejected(Rejection::NotAPlayer);
        };

        // ─── Context ─────────────────────────────────────────────────────────
        if let Some(context) = self.host.context.current_context(subject.id) {
            if self.host.context.is_context_disabled(&context, &config) {
                return self.reject(caller, &config, Rejection::ContextDisabled { context });
            }
        }

        // ─── Cooldown ────────────────────────────────────────────────────────
        if self.cooldown_applies(subject, &config) {
            let now = self.host.clock.now();
            let duration = Duration::from_millis(config.cooldown.duration_ms());

            match self.cooldowns.try_arm(subject.id, now, duration) {
                Ok(expires_at) => {
                    self.cooldowns.schedule_expiry(
                        self.host.scheduler.as_ref(),
                        subject.id,
                        expires_at,
                        now,
                    );
                    tracing::debug!(subject = %subject.id, ?duration, "Cooldown armed");
                }
                Err(remaining_secs) => {
                    return self.reject(caller, &config, Rejection::OnCooldown { remaining_secs });
                }
            }
        }

        // ─── Execute ─────────────────────────────────────────────────────────
        self.active.insert(subject.id);
        action(subject);

        // ─── Effects ─────────────────────────────────────────────────────────
        let location = self.host.context.location(subject.id);
        let report = run_pipeline(
            self.host.effects.as_ref(),
            &config,
            subject,
            location.as_ref(),
        );
        tracing::debug!(
            subject = %subject.id,
            completed = report.completed.len(),
            skipped = report.skipped.len(),
            failed = report.failures.len(),
            "Admission accepted"
        );

        AdmissionResult::Accepted
    }

    fn reload(&self, caller: &Caller, config: &GateConfig) -> AdmissionResult {
        if !self.has_permission(caller, permissions::RELOAD) {
            return self.reject(caller, config, Rejection::NoPermission);
        }

        match self.host.config.reload() {
            Ok(()) => {
                // Confirm using the freshly loaded messages
                let fresh = self.host.config.current_snapshot();
                self.notify(caller, &fresh.messages.reload);
                AdmissionResult::Reloaded
            }
            Err(e) => {
                tracing::warn!(error = %e, "Configuration reload failed");
                let cause = e.to_string();
                self.notify(caller, &format!("&cFailed to reload configuration: {}", cause));
                AdmissionResult::Rejected(Rejection::ReloadFailed { cause })
            }
        }
    }

    fn has_permission(&self, caller: &Caller, key: &str) -> bool {
        match caller {
            Caller::Console => true,
            Caller::Player(subject) => self.host.permissions.has_permission(subject.id, key),
        }
    }

    fn cooldown_applies(&self, subject: &Subject, config: &GateConfig) -> bool {
        config.cooldown.enabled
            && !self
                .host
                .permissions
                .has_permission(subject.id, permissions::BYPASS)
    }

    /// Report a rejection to the caller with exactly one notice.
    fn reject(&self, caller: &Caller, config: &GateConfig, rejection: Rejection) -> AdmissionResult {
        let messages = &config.messages;
        let notice = match &rejection {
            Rejection::NoPermission => messages.no_permission.clone(),
            Rejection::InvalidSyntax => messages.invalid_syntax.clone(),
            Rejection::ContextDisabled { .. } => messages.disabled.clone(),
            Rejection::OnCooldown { remaining_secs } => {
                formatting::cooldown_notice(&messages.on_cooldown, *remaining_secs)
            }
            Rejection::NotAPlayer | Rejection::ReloadFailed { .. } => String::new(),
        };

        tracing::debug!(reason = rejection.kind(), "Admission rejected");
        if !notice.is_empty() {
            self.notify(caller, &notice);
        }
        AdmissionResult::Rejected(rejection)
    }

    fn notify(&self, caller: &Caller, message: &str) {
        match caller {
            Caller::Console => self.host.effects.console_message(message),
            Caller::Player(subject) => {
                if let Err(e) = self.host.effects.send_message(subject, message) {
                    tracing::warn!(subject = %subject.id, error = %e, "Failed to deliver notice");
                }
            }
        }
    }
}
