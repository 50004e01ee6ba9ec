//! Result list shaping: drop entries without artwork, best rated first.

use crate::state::TitleSummary;

pub fn with_posters<'a, I>(items: I) -> Vec<&'a TitleSummary>
where
    I: IntoIterator<Item = &'a TitleSummary>,
{
    items.into_iter().filter(|item| item.has_poster()).collect()
}

/// Stable sort, highest rating first.
pub fn rank_by_rating(items: &mut [&TitleSummary]) {
    items.sort_by(|a, b| b.rating_score().total_cmp(&a.rating_score()));
}

pub fn ranked_titles(items: &[TitleSummary]) -> Vec<&TitleSummary> {
    let mut shown = with_posters(items);
    rank_by_rating(&mut shown);
    shown
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MediaType;
    use pretty_assertions::assert_eq;

    fn item(id: &str, poster: bool, rating: Option<f32>) -> TitleSummary {
        TitleSummary {
            id: id.into(),
            media_type: MediaType::Movie,
            title: id.to_uppercase(),
            year: None,
            poster: poster.then(|| format!("https://img/{id}.jpg")),
            rating,
        }
    }

    fn ids(items: &[&TitleSummary]) -> Vec<String> {
        items.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn only_titles_with_posters_are_shown() {
        let items = vec![item("with", true, Some(8.8)), item("without", false, Some(9.0))];
        assert_eq!(ids(&ranked_titles(&items)), vec!["with"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let items = vec![
            item("a", true, None),
            item("b", false, None),
            item("c", true, Some(3.0)),
        ];
        let once = with_posters(&items);
        let twice = with_posters(once.iter().copied());
        assert_eq!(once, twice);
    }

    #[test]
    fn sorted_by_rating_with_absent_as_zero() {
        let items = vec![
            item("none", true, None),
            item("seven", true, Some(7.0)),
            item("top", true, Some(9.2)),
        ];
        assert_eq!(ids(&ranked_titles(&items)), vec!["top", "seven", "none"]);
    }

    #[test]
    fn equal_ratings_keep_server_order() {
        let items = vec![
            item("first", true, Some(0.0)),
            item("second", true, None),
            item("third", true, Some(5.0)),
            item("fourth", true, Some(5.0)),
        ];
        assert_eq!(
            ids(&ranked_titles(&items)),
            vec!["third", "fourth", "first", "second"]
        );
    }

    #[test]
    fn ranking_is_a_permutation_of_filtered() {
        let items = vec![
            item("a", true, Some(1.0)),
            item("b", true, Some(6.5)),
            item("c", false, Some(9.9)),
            item("d", true, None),
        ];
        let ranked = ranked_titles(&items);
        let mut sorted_ids = ids(&ranked);
        sorted_ids.sort();
        let mut filtered_ids = ids(&with_posters(&items));
        filtered_ids.sort();
        assert_eq!(sorted_ids, filtered_ids);
        assert!(ranked
            .windows(2)
            .all(|pair| pair[0].rating_score() >= pair[1].rating_score()));
    }
}
