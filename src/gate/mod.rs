//! Access gate module
//!
//! [`AccessGate`] runs one authorization pass; [`GateInstance`] wraps it for
//! a single protected mount point.
//!
//! ```text
//! navigation ──► GateInstance::update ──► EvaluationPass::run
//!                                            │
//!                  resolve session ◄─────────┘
//!                  fetch profile
//!                  AccessPolicy::evaluate
//!                                            │
//!                  GateInstance::outcome ◄───┘  Loading | Redirect | Render
//! ```

pub mod access_gate;
pub mod instance;
pub mod navigator;

pub use access_gate::{AccessGate, Evaluation, GateRequest};
pub use instance::{
    EvaluationPass, GateInputs, GateInstance, GateOutcome, PassOutcome, ProfileHandle, ViewProps,
};
pub use navigator::{ExternalNavigator, SharedNavigator, TracingNavigator};
