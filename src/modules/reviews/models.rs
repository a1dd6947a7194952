use serde::{Deserialize, Serialize};
use serde_json::json;

use super::ranking::MAX_STARS;

/// Author recorded when a submission leaves the name blank.
pub const ANONYMOUS_AUTHOR: &str = "Anónimo";

/// A star-rated review of one book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Unique identifier for the review
    pub id: String,
    /// Identifier of the reviewed book
    pub book_id: String,
    /// Display name of the reviewer
    pub author: String,
    /// Star rating, 1 to 5
    pub rating: u8,
    /// Review text
    pub comment: String,
    /// Submission date, `YYYY-MM-DD`
    pub date: String,
    /// Net votes; may be negative
    pub votes: i64,
}

impl Review {
    /// Build a fresh review with zero votes from a validated submission.
    pub fn create(id: String, book_id: &str, submission: ValidReview, date: String) -> Self {
        Self {
            id,
            book_id: book_id.to_string(),
            author: submission.author,
            rating: submission.rating,
            comment: submission.comment,
            date,
            votes: 0,
        }
    }
}

/// Request model for submitting a review.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReview {
    #[serde(default)]
    pub author: String,
    pub rating: i64,
    pub comment: String,
}

/// A submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidReview {
    pub author: String,
    pub rating: u8,
    pub comment: String,
}

impl NewReview {
    /// Check the submission, collecting one detail entry per failing field.
    pub fn validate(self, max_comment_chars: usize) -> Result<ValidReview, Vec<serde_json::Value>> {
        let mut details = Vec::new();

        let rating = match u8::try_from(self.rating) {
            Ok(rating) if (1..=MAX_STARS).contains(&rating) => rating,
            _ => {
                details.push(json!({"field": "rating", "error": "must be between 1 and 5"}));
                0
            }
        };

        let comment = self.comment.trim().to_string();
        if comment.is_empty() {
            details.push(json!({"field": "comment", "error": "required"}));
        } else if comment.chars().count() > max_comment_chars {
            details.push(json!({
                "field": "comment",
                "error": format!("must be at most {} characters", max_comment_chars)
            }));
        }

        let author = match self.author.trim() {
            "" => ANONYMOUS_AUTHOR.to_string(),
            name => name.to_string(),
        };

        if details.is_empty() {
            Ok(ValidReview {
                author,
                rating,
                comment,
            })
        } else {
            Err(details)
        }
    }
}

/// Vote request body.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VoteRequest {
    pub delta: i64,
}

/// A review as presented in a ranked list.
#[derive(Debug, Clone, Serialize)]
pub struct RankedReview {
    #[serde(flatten)]
    pub review: Review,
    /// Star glyphs for the rating, e.g. `★★★★☆`
    pub stars: String,
}

/// Reviews of one book with their aggregate rating.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewSummary {
    pub book_id: String,
    pub average_rating: f64,
    /// Average with exactly one decimal, e.g. `4.5`
    pub average_label: String,
    pub review_count: usize,
    pub reviews: Vec<RankedReview>,
}
