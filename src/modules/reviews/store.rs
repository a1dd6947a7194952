use tokio::sync::RwLock;

use super::models::{RankedReview, Review, ReviewSummary, ValidReview};
use super::ranking;

/// In-memory review list shared by the request handlers.
///
/// Reviews live for the lifetime of the process. Every mutation threads the
/// current list through a pure transformation and swaps in the result.
#[derive(Debug, Default)]
pub struct ReviewStore {
    reviews: RwLock<Vec<Review>>,
}

impl ReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reviews of `book_id`, highest voted first.
    pub async fn list(&self, book_id: &str) -> Vec<Review> {
        let reviews = self.reviews.read().await;
        let for_book: Vec<Review> = reviews
            .iter()
            .filter(|review| review.book_id == book_id)
            .cloned()
            .collect();
        ranking::sort_by_votes_descending(&for_book)
    }

    /// Ranked reviews of `book_id` with their average rating.
    pub async fn summary(&self, book_id: &str) -> ReviewSummary {
        let ranked = self.list(book_id).await;
        let average = ranking::average_rating(&ranked);

        ReviewSummary {
            book_id: book_id.to_string(),
            average_rating: average,
            average_label: ranking::format_rating(average),
            review_count: ranked.len(),
            reviews: ranked
                .into_iter()
                .map(|review| RankedReview {
                    stars: ranking::star_glyphs(review.rating),
                    review,
                })
                .collect(),
        }
    }

    /// Record a validated submission and return the stored review.
    pub async fn add(&self, book_id: &str, submission: ValidReview) -> Review {
        let review = Review::create(new_review_id(), book_id, submission, today());
        self.reviews.write().await.push(review.clone());

        tracing::info!(
            review_id = %review.id,
            book_id = %review.book_id,
            rating = review.rating,
            "review added"
        );
        review
    }

    /// Adjust the votes of `review_id`; `None` when no such review exists.
    pub async fn vote(&self, review_id: &str, delta: i64) -> Option<Review> {
        let mut reviews = self.reviews.write().await;
        if !reviews.iter().any(|review| review.id == review_id) {
            return None;
        }

        *reviews = ranking::apply_vote(&reviews, review_id, delta);
        let updated = reviews.iter().find(|review| review.id == review_id).cloned();

        if let Some(review) = &updated {
            tracing::debug!(review_id, delta, votes = review.votes, "review voted");
        }
        updated
    }

    /// Total number of stored reviews across all books.
    pub async fn len(&self) -> usize {
        self.reviews.read().await.len()
    }
}

fn new_review_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

fn today() -> String {
    time::OffsetDateTime::now_utc().date().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(author: &str, rating: u8) -> ValidReview {
        ValidReview {
            author: author.to_string(),
            rating,
            comment: format!("{} says hi", author),
        }
    }

    #[tokio::test]
    async fn added_reviews_are_scoped_to_their_book() {
        let store = ReviewStore::new();
        store.add("book-1", submission("Ana", 4)).await;
        store.add("book-2", submission("Luis", 2)).await;
        store.add("book-1", submission("Eva", 5)).await;

        assert_eq!(store.len().await, 3);
        let reviews = store.list("book-1").await;
        assert_eq!(reviews.len(), 2);
        assert!(reviews.iter().all(|r| r.book_id == "book-1"));
        assert!(reviews.iter().all(|r| r.votes == 0));
    }

    #[tokio::test]
    async fn new_review_carries_todays_date() {
        let store = ReviewStore::new();
        let review = store.add("book-1", submission("Ana", 4)).await;
        assert_eq!(review.date.len(), 10);
        assert_eq!(&review.date[4..5], "-");
        assert!(uuid::Uuid::parse_str(&review.id).is_ok());
    }

    #[tokio::test]
    async fn summary_ranks_and_averages() {
        let store = ReviewStore::new();
        let first = store.add("book-1", submission("Ana", 4)).await;
        let second = store.add("book-1", submission("Eva", 5)).await;

        store.vote(&second.id, 1).await.unwrap();

        let summary = store.summary("book-1").await;
        assert_eq!(summary.review_count, 2);
        assert_eq!(summary.average_rating, 4.5);
        assert_eq!(summary.average_label, "4.5");
        assert_eq!(summary.reviews[0].review.id, second.id);
        assert_eq!(summary.reviews[0].stars, "★★★★★");
        assert_eq!(summary.reviews[1].review.id, first.id);
    }

    #[tokio::test]
    async fn summary_of_unreviewed_book_is_empty() {
        let store = ReviewStore::new();
        let summary = store.summary("nothing").await;
        assert_eq!(summary.review_count, 0);
        assert_eq!(summary.average_label, "0.0");
    }

    #[tokio::test]
    async fn voting_unknown_review_returns_none() {
        let store = ReviewStore::new();
        store.add("book-1", submission("Ana", 4)).await;
        assert!(store.vote("missing", 1).await.is_none());
    }

    #[tokio::test]
    async fn downvote_reorders_leader() {
        let store = ReviewStore::new();
        let leader = store.add("book-1", submission("Ana", 4)).await;
        let runner = store.add("book-1", submission("Eva", 3)).await;

        store.vote(&leader.id, 1).await.unwrap();
        assert_eq!(store.list("book-1").await[0].id, leader.id);

        let updated = store.vote(&leader.id, -1).await.unwrap();
        assert_eq!(updated.votes, 0);
        store.vote(&leader.id, -1).await.unwrap();

        let ranked = store.list("book-1").await;
        assert_eq!(ranked[0].id, runner.id);
        assert_eq!(ranked[1].votes, -1);
    }
}
