//! Per-mount gate state
//!
//! A [`GateInstance`] guards one view. It starts a new pass only when the
//! supplied session or the required roles change, drops results from passes
//! that a newer one has overtaken, and owns the profile cell handed to the
//! view on `granted`.

use crate::access_control::{AuthorizationDecision, Redirect, RequiredRoles};
use crate::gate::access_gate::{AccessGate, Evaluation, GateRequest};
use crate::identity::Session;
use crate::profile::Profile;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::debug;

/// What the surrounding router supplies on each render
#[derive(Debug, Clone)]
pub struct GateInputs {
    pub session: Option<Session>,
    pub required_roles: RequiredRoles,
    pub destination: String,
}

impl GateInputs {
    pub fn new(
        session: Option<Session>,
        required_roles: RequiredRoles,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            session,
            required_roles,
            destination: destination.into(),
        }
    }

    /// Whether switching from `self` to `other` calls for a new pass.
    ///
    /// The destination is read when a pass starts but does not trigger one.
    fn triggers_pass(&self, other: &GateInputs) -> bool {
        self.session != other.session || self.required_roles != other.required_roles
    }
}

/// Result of driving a pass to completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// The pass was the latest one; its decision is now current
    Applied(AuthorizationDecision),
    /// A newer pass started meanwhile; the result was discarded
    Superseded,
}

/// What the router should do right now
pub enum GateOutcome<'a, V> {
    /// A pass is in flight; show a loading affordance
    Loading,
    Redirect(Redirect),
    Render { view: &'a V, props: ViewProps },
}

/// Props injected into a granted view
#[derive(Clone)]
pub struct ViewProps {
    pub profile: ProfileHandle,
}

/// Read/replace access to the instance's profile cell
///
/// A view that edits the signed-in user's profile pushes the new record
/// through [`ProfileHandle::set`]; the change is visible immediately and does
/// not start a new pass.
#[derive(Clone)]
pub struct ProfileHandle {
    cell: Arc<watch::Sender<Option<Profile>>>,
}

impl ProfileHandle {
    pub fn get(&self) -> Option<Profile> {
        self.cell.borrow().clone()
    }

    /// Borrow the profile without cloning it
    pub fn with<R>(&self, f: impl FnOnce(Option<&Profile>) -> R) -> R {
        let current = self.cell.borrow();
        f(Option::as_ref(&*current))
    }

    pub fn set(&self, profile: Profile) {
        self.cell.send_replace(Some(profile));
    }

    /// Edit the profile in place; returns false when there is none
    pub fn update(&self, f: impl FnOnce(&mut Profile)) -> bool {
        self.cell.send_if_modified(|current| match current {
            Some(profile) => {
                f(profile);
                true
            }
            None => false,
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Profile>> {
        self.cell.subscribe()
    }
}

/// Latest started pass and the inputs it was started with
struct PassState {
    sequence: u64,
    /// `None` until a pass starts, and again after a pass is dropped unfinished
    inputs: Option<GateInputs>,
}

struct Shared {
    gate: Arc<AccessGate>,
    latest: Mutex<PassState>,
    decision: watch::Sender<AuthorizationDecision>,
    profile: Arc<watch::Sender<Option<Profile>>>,
}

impl Shared {
    fn state(&self) -> MutexGuard<'_, PassState> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(&self, sequence: u64, evaluation: Evaluation) -> PassOutcome {
        let decision = evaluation.decision;
        {
            // Held across the writes so a newer pass cannot start in between
            let state = self.state();
            if state.sequence != sequence {
                debug!(
                    sequence,
                    latest = state.sequence,
                    "Discarding superseded pass"
                );
                return PassOutcome::Superseded;
            }

            self.profile.send_replace(evaluation.profile);
            self.decision.send_replace(decision);
        }

        // Outside the lock: the navigator may re-enter the instance
        if decision == AuthorizationDecision::DeniedWrongPortal {
            self.gate
                .navigator()
                .navigate_external(&self.gate.portal().client_portal_url);
        }

        PassOutcome::Applied(decision)
    }

    /// Forget the inputs of an unfinished pass so the same inputs start a
    /// fresh one
    fn abandon(&self, sequence: u64) {
        let mut state = self.state();
        if state.sequence == sequence {
            debug!(sequence, "Pass dropped before completion");
            state.inputs = None;
        }
    }
}

/// One started evaluation pass
///
/// Owned and `'static`, so the caller may await it inline or spawn it. The
/// instance reads `pending` until the pass is run; dropping it unfinished
/// lets the next `update` start over even with unchanged inputs.
#[must_use = "the instance stays pending until the pass is run"]
pub struct EvaluationPass {
    sequence: u64,
    inputs: GateInputs,
    shared: Arc<Shared>,
    finished: bool,
}

impl EvaluationPass {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub async fn run(mut self) -> PassOutcome {
        let request = GateRequest {
            session: self.inputs.session.as_ref(),
            required_roles: &self.inputs.required_roles,
            destination: &self.inputs.destination,
        };
        let evaluation = self.shared.gate.evaluate(request).await;
        let outcome = self.shared.apply(self.sequence, evaluation);
        self.finished = true;
        outcome
    }
}

impl Drop for EvaluationPass {
    fn drop(&mut self) {
        if !self.finished {
            self.shared.abandon(self.sequence);
        }
    }
}

/// Gate state for one protected mount point
pub struct GateInstance<V> {
    view: V,
    shared: Arc<Shared>,
}

impl<V> GateInstance<V> {
    pub fn new(gate: Arc<AccessGate>, view: V) -> Self {
        let (decision, _) = watch::channel(AuthorizationDecision::Pending);
        let (profile, _) = watch::channel(None);
        Self {
            view,
            shared: Arc::new(Shared {
                gate,
                latest: Mutex::new(PassState {
                    sequence: 0,
                    inputs: None,
                }),
                decision,
                profile: Arc::new(profile),
            }),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn decision(&self) -> AuthorizationDecision {
        *self.shared.decision.borrow()
    }

    /// Watch decision changes
    pub fn subscribe(&self) -> watch::Receiver<AuthorizationDecision> {
        self.shared.decision.subscribe()
    }

    pub fn profile(&self) -> ProfileHandle {
        ProfileHandle {
            cell: Arc::clone(&self.shared.profile),
        }
    }

    /// Feed the latest inputs; returns a pass to drive when they changed.
    ///
    /// While the returned pass runs the decision reads `pending`.
    pub fn update(&mut self, inputs: GateInputs) -> Option<EvaluationPass> {
        let sequence = {
            let mut state = self.shared.state();
            if let Some(previous) = &state.inputs
                && !previous.triggers_pass(&inputs)
            {
                return None;
            }

            state.sequence += 1;
            state.inputs = Some(inputs.clone());
            self.shared
                .decision
                .send_replace(AuthorizationDecision::Pending);
            state.sequence
        };
        debug!(
            sequence,
            required = %inputs.required_roles,
            destination = %inputs.destination,
            "Starting authorization pass"
        );

        Some(EvaluationPass {
            sequence,
            inputs,
            shared: Arc::clone(&self.shared),
            finished: false,
        })
    }

    /// Update and drive any resulting pass inline
    pub async fn sync(&mut self, inputs: GateInputs) -> AuthorizationDecision {
        if let Some(pass) = self.update(inputs) {
            pass.run().await;
        }
        self.decision()
    }

    pub fn outcome(&self) -> GateOutcome<'_, V> {
        let decision = self.decision();
        if decision.is_pending() {
            return GateOutcome::Loading;
        }

        match self.shared.gate.redirect_for(decision) {
            Some(redirect) => GateOutcome::Redirect(redirect),
            None => GateOutcome::Render {
                view: &self.view,
                props: ViewProps {
                    profile: self.profile(),
                },
            },
        }
    }
}
