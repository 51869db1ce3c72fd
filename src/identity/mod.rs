//! Identity module
//!
//! Sessions, the provider seam they come from, and the resolver the gate
//! uses to obtain one per authorization pass.

pub mod provider;
pub mod resolver;
pub mod session;
pub mod supabase;

pub use provider::{IdentityProvider, NoIdentityProvider, SharedIdentityProvider};
pub use resolver::SessionResolver;
pub use session::{Session, SessionUser};
pub use supabase::SupabaseIdentity;
