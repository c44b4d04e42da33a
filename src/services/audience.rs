//! User-base breakdowns: gender mix and DSGD earning methods

use crate::types::UserProfile;
use serde::Serialize;

const COLOUR_PRIMARY: &str = "#6366F1";
const COLOUR_SECONDARY: &str = "#EC4899";
const COLOUR_TERTIARY: &str = "#10B981";

const ROUND_UP_METHOD: &str = "Round Up";

/// One slice of a pie breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub name: String,
    pub value: f64,
    pub color: String,
}

impl Share {
    fn new(name: &str, value: f64, color: &str) -> Self {
        Self {
            name: name.to_string(),
            value,
            color: color.to_string(),
        }
    }
}

/// Users per gender. "Other" covers any non-empty value besides Male/Female
/// and only appears when non-zero; zero slices are dropped.
pub fn gender_distribution(users: &[UserProfile]) -> Vec<Share> {
    let (mut male, mut female, mut other) = (0u64, 0u64, 0u64);
    for gender in users.iter().filter_map(|u| u.user_gender.as_deref()) {
        match gender {
            "Male" => male += 1,
            "Female" => female += 1,
            "" => {}
            _ => other += 1,
        }
    }

    [
        Share::new("Male", male as f64, COLOUR_PRIMARY),
        Share::new("Female", female as f64, COLOUR_SECONDARY),
        Share::new("Other", other as f64, COLOUR_TERTIARY),
    ]
    .into_iter()
    .filter(|s| s.value > 0.0)
    .collect()
}

/// Round-up vs forfeit-discount default donation methods, as whole percentages.
/// Empty when no user uses either.
pub fn earning_methods(users: &[UserProfile]) -> Vec<Share> {
    let methods = || {
        users
            .iter()
            .filter_map(|u| u.user_default_donation_method.as_deref())
    };
    let round_up = methods().filter(|m| *m == ROUND_UP_METHOD).count();
    let discount = methods()
        .filter(|m| m.to_lowercase().contains("discount"))
        .count();

    let total = round_up + discount;
    if total == 0 {
        return Vec::new();
    }

    let percent = |n: usize| (n as f64 / total as f64 * 100.0).round();
    vec![
        Share::new("Round-Up", percent(round_up), COLOUR_PRIMARY),
        Share::new("Forfeit Discount", percent(discount), COLOUR_SECONDARY),
    ]
}
