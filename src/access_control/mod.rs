//! Access control module
//!
//! Role model, decisions and the policy that maps a profile to a decision.
//!
//! ## Decision Order
//!
//! For an authenticated visitor with a loaded profile:
//!
//! 1. **Portal** - `standard` profiles are sent to the client portal
//! 2. **Onboarding** - incomplete onboarding only reaches the setup route
//! 3. **Role** - the profile's role must be one of the mount point's required roles
//!
//! A missing session or an unloadable profile never reaches the policy; the
//! gate decides `denied-unauthenticated` for those.
//!
//! ## Redirects
//!
//! | Decision | Target |
//! |---|---|
//! | `denied-unauthenticated` | login route |
//! | `denied-role` | login route |
//! | `denied-onboarding-incomplete` | setup route |
//! | `denied-wrong-portal` | client portal (full-origin) |

pub mod decision;
pub mod policy;
pub mod types;

pub use decision::{AuthorizationDecision, Redirect};
pub use policy::AccessPolicy;
pub use types::{ParseRoleError, RequiredRoles, Role};
