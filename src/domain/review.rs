pub const MIN_LEAD_RATING: f64 = 3.0;

const RECENT_UNIT_WORDS: [&str; 6] = ["month", "week", "day", "hour", "minute", "second"];
const MAX_RECENT_YEARS: u32 = 3;

pub fn parse_rating(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

/*
 Classify a review recency label, e.g. "2 weeks ago" or "4 years ago":
 1. Any sub-year unit word means the review is recent
 2. "year" labels are recent iff the leading integer is <= 3
 3. Anything else ("a year ago" included, it has no integer) is not recent
*/
pub fn is_recent_review(label: &str) -> bool {
    let label = label.to_lowercase();

    if RECENT_UNIT_WORDS.iter().any(|word| label.contains(word)) {
        return true;
    }

    match label.contains("year") {
        true => match leading_integer(&label) {
            Some(years) => years <= MAX_RECENT_YEARS,
            None => false,
        },
        false => false,
    }
}

pub fn meets_lead_criteria(rating: f64, has_recent_review: bool) -> bool {
    rating >= MIN_LEAD_RATING && has_recent_review
}

fn leading_integer(label: &str) -> Option<u32> {
    let digits: String = label
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    digits.parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::{is_recent_review, meets_lead_criteria, parse_rating};

    #[test]
    fn sub_year_unit_words_are_recent() {
        let labels = [
            "2 months ago",
            "a week ago",
            "3 days ago",
            "5 hours ago",
            "a minute ago",
            "30 seconds ago",
        ];

        for label in labels {
            assert!(is_recent_review(label), "expected recent: {}", label);
        }
    }

    #[test]
    fn year_labels_recent_up_to_three_years() {
        assert!(!is_recent_review("a year ago"));
        assert!(is_recent_review("1 year ago"));
        assert!(is_recent_review("3 years ago"));
        assert!(!is_recent_review("4 years ago"));
        assert!(!is_recent_review("10 years ago"));
    }

    #[test]
    fn unrecognized_labels_are_not_recent() {
        assert!(!is_recent_review(""));
        assert!(!is_recent_review("edited"));
        assert!(!is_recent_review("some time back"));
    }

    #[test]
    fn labels_are_matched_case_insensitively() {
        assert!(is_recent_review("2 Weeks Ago"));
        assert!(is_recent_review("3 YEARS AGO"));
    }

    #[test]
    fn parse_rating_valid() {
        assert_eq!(parse_rating("4.2"), Some(4.2));
        assert_eq!(parse_rating(" 4.8 \n"), Some(4.8));
        assert_eq!(parse_rating("5"), Some(5.0));
    }

    #[test]
    fn parse_rating_invalid() {
        assert_eq!(parse_rating(""), None);
        assert_eq!(parse_rating("N/A"), None);
        assert_eq!(parse_rating("4,2"), None);
    }

    #[test]
    fn lead_criteria_gates_are_independent() {
        // rating 4.2 + recent review qualifies
        assert!(meets_lead_criteria(4.2, true));
        // rating 4.2 without a recent review is rejected
        assert!(!meets_lead_criteria(4.2, false));
        // rating 2.9 is rejected even with a recent review
        assert!(!meets_lead_criteria(2.9, true));
        // 3.0 is inclusive
        assert!(meets_lead_criteria(3.0, true));
    }
}
