// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Candidate, CandidateRecord, DomainError, MatchStatus, Message, ParseLevelError, Profile,
    Requester, Review, ScoredMatch, ScoringWeights, SkillDeclaration, SkillDirection, SkillInput,
    SkillLevel, SkillMatch, SkillSlot, SkippedRecord, UserSkills, UserStats,
};
pub use requests::{FindMatchesRequest, RankMatchesRequest};
pub use responses::{ErrorResponse, HealthResponse, MatchesResponse, TrustScoreResponse};
