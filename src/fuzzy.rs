use strsim::normalized_levenshtein;

/// Word-order-insensitive similarity between two strings, scaled to 0-100.
///
/// Both sides are lowercased, split on non-alphanumeric characters and
/// token-sorted before comparison, so "horizon event" scores 100 against
/// "Event Horizon". A side with no alphanumeric content scores 0.
pub fn token_sort_ratio(a: &str, b: &str) -> u8 {
    let a = process(a);
    let b = process(b);

    if a.is_empty() || b.is_empty() {
        return 0;
    }

    (normalized_levenshtein(&a, &b) * 100.0).round() as u8
}

fn process(s: &str) -> String {
    let lowered = s.to_lowercase();
    let mut tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_100() {
        assert_eq!(token_sort_ratio("Event Horizon", "Event Horizon"), 100);
    }

    #[test]
    fn case_is_ignored() {
        assert_eq!(token_sort_ratio("event horizon", "Event Horizon"), 100);
        assert_eq!(token_sort_ratio("EVENT HORIZON", "event horizon"), 100);
    }

    #[test]
    fn token_order_is_ignored() {
        assert_eq!(token_sort_ratio("horizon event", "Event Horizon"), 100);
    }

    #[test]
    fn punctuation_is_ignored() {
        assert_eq!(token_sort_ratio("event-horizon", "Event Horizon"), 100);
    }

    #[test]
    fn near_miss_scores_below_100() {
        let score = token_sort_ratio("evemt horizon", "Event Horizon");
        assert_eq!(score, 92);
    }

    #[test]
    fn disjoint_strings_score_0() {
        assert_eq!(token_sort_ratio("qqqq", "Event Horizon"), 0);
    }

    #[test]
    fn empty_input_scores_0() {
        assert_eq!(token_sort_ratio("", "Event Horizon"), 0);
        assert_eq!(token_sort_ratio("Event Horizon", ""), 0);
        assert_eq!(token_sort_ratio("", ""), 0);
    }

    #[test]
    fn punctuation_only_input_scores_0() {
        assert_eq!(token_sort_ratio("!!!", "???"), 0);
    }

    #[test]
    fn unicode_titles_are_comparable() {
        assert_eq!(token_sort_ratio("痙攣", "痙攣"), 100);
    }
}
