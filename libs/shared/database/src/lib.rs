pub mod memory;
pub mod postgrest;
pub mod repository;
pub mod state;
pub mod store;
pub mod supabase;

pub use memory::InMemoryStore;
pub use postgrest::SupabaseStore;
pub use repository::{Record, Repository};
pub use state::AppState;
pub use store::{Collection, Condition, Direction, DocumentStore, Order, Query};
