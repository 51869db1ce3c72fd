//! Profile module
//!
//! The portal's profile record and the stores it is loaded from.

pub mod store;
pub mod supabase;
pub mod types;

pub use store::{ProfileStore, SharedProfileStore};
pub use supabase::SupabaseProfileStore;
pub use types::Profile;
