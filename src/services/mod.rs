// Service exports
pub mod cache;
pub mod supabase;

pub use cache::{CacheKey, CacheStats, CandidateCache};
pub use supabase::{SupabaseClient, SupabaseError, SupabaseTables};
