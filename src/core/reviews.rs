use chrono::Utc;
use uuid::Uuid;
use crate::models::{DomainError, MatchStatus, Profile, Review, SkillMatch, UserStats};

/// Create a review of the other participant of a completed match
///
/// The reviewer must be one of the two participants; the reviewee is the
/// other one. Ratings are whole stars from 1 to 5.
pub fn submit_review(
    skill_match: &SkillMatch,
    reviewer_id: &str,
    rating: u8,
    comment: Option<String>,
) -> Result<Review, DomainError> {
    if skill_match.status != MatchStatus::Completed {
        return Err(DomainError::MatchNotCompleted(skill_match.id));
    }

    let reviewee_id = skill_match
        .partner_of(reviewer_id)
        .ok_or_else(|| DomainError::NotParticipant(reviewer_id.to_string()))?;

    let review = Review {
        id: Uuid::new_v4(),
        match_id: skill_match.id,
        reviewer_id: reviewer_id.to_string(),
        reviewee_id: reviewee_id.to_string(),
        rating,
        comment: comment.filter(|c| !c.trim().is_empty()),
        created_at: Utc::now(),
    };

    validate_review(&review, skill_match)?;
    Ok(review)
}

/// Check a review against the match it claims to belong to
pub fn validate_review(review: &Review, skill_match: &SkillMatch) -> Result<(), DomainError> {
    if review.match_id != skill_match.id || skill_match.status != MatchStatus::Completed {
        return Err(DomainError::MatchNotCompleted(review.match_id));
    }
    if review.reviewer_id == review.reviewee_id {
        return Err(DomainError::SelfReview);
    }
    for participant in [&review.reviewer_id, &review.reviewee_id] {
        if !skill_match.involves(participant) {
            return Err(DomainError::NotParticipant(participant.clone()));
        }
    }
    if !(1..=5).contains(&review.rating) {
        return Err(DomainError::RatingOutOfRange(review.rating));
    }
    Ok(())
}

/// Mean of a set of ratings, `None` when there are none
pub fn trust_score<I>(ratings: I) -> Option<f64>
where
    I: IntoIterator<Item = u8>,
{
    let (sum, count) = ratings
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), r| (sum + u64::from(r), count + 1));

    if count == 0 {
        None
    } else {
        Some(sum as f64 / count as f64)
    }
}

/// Trust score of `profile_id` from the reviews where it is the reviewee
pub fn trust_score_for(reviews: &[Review], profile_id: &str) -> Option<f64> {
    trust_score(
        reviews
            .iter()
            .filter(|r| r.reviewee_id == profile_id)
            .map(|r| r.rating),
    )
}

/// Assemble a profile's stats from its completed sessions and ratings
pub fn user_stats(profile: &Profile, sessions_completed: usize, ratings: &[u8]) -> UserStats {
    UserStats {
        id: profile.id.clone(),
        full_name: profile.full_name.clone(),
        trust_score: profile.trust_score,
        sessions_completed,
        avg_rating: trust_score(ratings.iter().copied()),
        total_reviews: ratings.len(),
    }
}
