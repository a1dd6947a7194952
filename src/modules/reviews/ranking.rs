//! Review aggregation: averages, vote ordering and vote adjustment.
//!
//! All functions are pure; callers thread the review list through them.

use super::models::Review;

/// Size of the star rating scale.
pub const MAX_STARS: u8 = 5;

const FILLED_STAR: char = '★';
const EMPTY_STAR: char = '☆';

/// Mean rating rounded to one decimal, `0.0` for no reviews.
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let sum: f64 = reviews.iter().map(|review| f64::from(review.rating)).sum();
    let mean = sum / reviews.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// Render an average with exactly one decimal, e.g. `4.5` or `0.0`.
pub fn format_rating(average: f64) -> String {
    format!("{:.1}", average)
}

/// Reviews ordered by votes, highest first. Ties keep their input order.
pub fn sort_by_votes_descending(reviews: &[Review]) -> Vec<Review> {
    let mut ranked = reviews.to_vec();
    // `sort_by` is stable
    ranked.sort_by(|a, b| b.votes.cmp(&a.votes));
    ranked
}

/// Copy of `reviews` with `delta` added to the votes of `review_id`.
///
/// An unknown id yields the input unchanged.
pub fn apply_vote(reviews: &[Review], review_id: &str, delta: i64) -> Vec<Review> {
    reviews
        .iter()
        .map(|review| {
            if review.id == review_id {
                Review {
                    votes: review.votes.saturating_add(delta),
                    ..review.clone()
                }
            } else {
                review.clone()
            }
        })
        .collect()
}

/// `rating` filled stars followed by empty ones up to [`MAX_STARS`].
pub fn star_glyphs(rating: u8) -> String {
    let filled = rating.min(MAX_STARS);
    std::iter::repeat(FILLED_STAR)
        .take(usize::from(filled))
        .chain(std::iter::repeat(EMPTY_STAR).take(usize::from(MAX_STARS - filled)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(id: &str, author: &str, rating: u8, votes: i64) -> Review {
        Review {
            id: id.to_string(),
            book_id: "1".to_string(),
            author: author.to_string(),
            rating,
            comment: format!("comment from {}", author),
            date: "2023-01-01".to_string(),
            votes,
        }
    }

    fn sample() -> Vec<Review> {
        vec![
            review("1", "User 1", 4, 5),
            review("2", "User 2", 5, 3),
            review("3", "User 3", 3, 10),
        ]
    }

    fn authors(reviews: &[Review]) -> Vec<&str> {
        reviews.iter().map(|r| r.author.as_str()).collect()
    }

    #[test]
    fn average_of_nothing_is_zero() {
        assert_eq!(average_rating(&[]), 0.0);
        assert_eq!(format_rating(average_rating(&[])), "0.0");
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        let four_five = [review("1", "a", 4, 0), review("2", "b", 5, 0)];
        assert_eq!(average_rating(&four_five), 4.5);

        let three_four = [review("1", "a", 3, 0), review("2", "b", 4, 0)];
        assert_eq!(average_rating(&three_four), 3.5);

        let thirds = [
            review("1", "a", 4, 0),
            review("2", "b", 4, 0),
            review("3", "c", 5, 0),
        ];
        assert_eq!(average_rating(&thirds), 4.3);
        assert_eq!(format_rating(average_rating(&thirds)), "4.3");
        assert_eq!(format_rating(5.0), "5.0");
    }

    #[test]
    fn sorts_by_votes_descending() {
        let ranked = sort_by_votes_descending(&sample());
        assert_eq!(authors(&ranked), vec!["User 3", "User 1", "User 2"]);
        let votes: Vec<i64> = ranked.iter().map(|r| r.votes).collect();
        assert_eq!(votes, vec![10, 5, 3]);
    }

    #[test]
    fn equal_votes_keep_input_order() {
        let reviews = vec![
            review("a", "First", 3, 5),
            review("b", "Second", 4, 5),
            review("c", "Third", 2, 3),
        ];
        let ranked = sort_by_votes_descending(&reviews);
        assert_eq!(authors(&ranked), vec!["First", "Second", "Third"]);

        let reviews = vec![
            review("a", "Low", 3, -2),
            review("b", "Tie A", 4, 1),
            review("c", "Tie B", 2, 1),
        ];
        let ranked = sort_by_votes_descending(&reviews);
        assert_eq!(authors(&ranked), vec!["Tie A", "Tie B", "Low"]);
    }

    #[test]
    fn vote_touches_only_the_target() {
        let reviews = sample();
        let voted = apply_vote(&reviews, "3", 1);
        assert_eq!(voted[2].votes, 11);
        assert_eq!(voted[0], reviews[0]);
        assert_eq!(voted[1], reviews[1]);
        assert_eq!(reviews[2].votes, 10);
    }

    #[test]
    fn vote_on_missing_review_changes_nothing() {
        let reviews = sample();
        assert_eq!(apply_vote(&reviews, "missing", 1), reviews);
    }

    #[test]
    fn vote_accepts_any_delta() {
        let voted = apply_vote(&sample(), "2", -7);
        assert_eq!(voted[1].votes, -4);
    }

    #[test]
    fn downvoted_leader_drops_below_reviews_it_no_longer_beats() {
        let reviews = vec![review("1", "Leader", 4, 4), review("2", "Runner", 5, 4)];
        let reviews = apply_vote(&reviews, "1", 1);
        assert_eq!(authors(&sort_by_votes_descending(&reviews))[0], "Leader");

        let reviews = apply_vote(&reviews, "1", -1);
        let reviews = apply_vote(&reviews, "1", -1);
        let ranked = sort_by_votes_descending(&reviews);
        assert_eq!(authors(&ranked), vec!["Runner", "Leader"]);
    }

    #[test]
    fn star_glyphs_fill_from_the_left() {
        assert_eq!(star_glyphs(0), "☆☆☆☆☆");
        assert_eq!(star_glyphs(3), "★★★☆☆");
        assert_eq!(star_glyphs(5), "★★★★★");
        for review in sample() {
            assert_eq!(star_glyphs(review.rating).chars().count(), 5);
        }
    }

    #[test]
    fn star_glyphs_saturate_above_scale() {
        assert_eq!(star_glyphs(9), "★★★★★");
    }
}
