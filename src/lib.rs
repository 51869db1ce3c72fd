//! Admin Portal Access Gate
//!
//! Decides, per navigation, whether the current visitor may see a protected
//! screen of the admin portal.
//!
//! ## Features
//!
//! - **Session resolution** from the caller or the identity provider (Supabase Auth)
//! - **Profile lookup** from the profile store (Supabase PostgREST)
//! - **Role policy** with a client-portal hand-off and an onboarding carve-out
//! - **Per-mount instances** that skip redundant passes and drop stale results
//!
//! ## Decision Flow
//!
//! ```text
//! session? ─no─► denied-unauthenticated ─► /login
//!    │
//! profile? ─no/error─► denied-unauthenticated ─► /login
//!    │
//! role == standard ─► denied-wrong-portal ─► client portal (full-origin)
//!    │
//! onboarding incomplete and not on setup route ─► denied-onboarding-incomplete ─► /setup-profile
//!    │
//! role ∈ required ─► granted (render view with profile)
//!    └─ otherwise ─► denied-role ─► /login
//! ```
//!
//! ## Example Configuration
//!
//! ```toml
//! [supabase]
//! url = "https://abcd.supabase.co"
//! # anon_key from SUPABASE_ANON_KEY env var
//!
//! [portal]
//! login_path = "/login"
//! setup_path = "/setup-profile"
//! client_portal_url = "https://app.rule27design.com"
//! default_required_roles = ["admin", "contributor", "client_manager"]
//!
//! [gate]
//! evaluation_timeout_ms = 10000
//! ```

pub mod access_control;
pub mod config;
pub mod error;
pub mod gate;
pub mod identity;
pub mod profile;
pub mod supabase;
pub mod util;

// Re-export main types
pub use access_control::{AuthorizationDecision, Redirect, RequiredRoles, Role};
pub use config::{AppConfig, load_config};
pub use error::{AppError, Result};
pub use gate::{AccessGate, GateInputs, GateInstance, GateOutcome};
