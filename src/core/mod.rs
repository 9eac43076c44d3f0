// Core algorithm exports
pub mod filters;
pub mod matcher;
pub mod normalize;
pub mod reviews;
pub mod scoring;
pub mod thread;

pub use filters::{is_complementary, is_excluded, same_skill};
pub use matcher::{Matcher, RankingResult};
pub use normalize::{normalize_skill_name, requester_from_skills, validate_candidate, RecordError};
pub use reviews::{submit_review, trust_score, trust_score_for, user_stats, validate_review};
pub use scoring::calculate_match_score;
pub use thread::{sort_messages, MessageThread};
