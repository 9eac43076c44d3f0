//! Maven Match - skill-exchange matching service for the Maven platform
//!
//! This library ranks users who teach what the requester wants to learn and
//! want to learn what the requester teaches, scoring each pair on level
//! compatibility and trust. It also carries the match lifecycle, chat
//! ordering and review rules the ranking feeds into.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{Matcher, RankingResult, normalize::{normalize_skill_name, requester_from_skills}};
pub use models::{CandidateRecord, ScoredMatch, ScoringWeights, SkillInput, SkillLevel, UserSkills};
