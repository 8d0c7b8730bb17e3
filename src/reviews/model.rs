use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: Uuid,
    pub product_id: String,
    pub author_id: Uuid,
    pub author_email: String,
    pub author_name: String,
    pub rating: u8,
    pub comment: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub edited: bool,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reply {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_email: String,
    pub author_name: String,
    pub comment: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RatingSummary {
    /// Mean rating rounded to one decimal, `0.0` without reviews.
    pub average: f64,
    pub total: usize,
    /// Review count per star, always keyed 1 through 5.
    pub distribution: BTreeMap<u8, usize>,
}

impl RatingSummary {
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let mut distribution: BTreeMap<u8, usize> = (1..=5).map(|s| (s, 0)).collect();
        let mut sum = 0u64;
        let mut total = 0usize;
        for r in ratings {
            if let Some(count) = distribution.get_mut(&r) {
                *count += 1;
                sum += u64::from(r);
                total += 1;
            }
        }
        let average = if total == 0 {
            0.0
        } else {
            (sum as f64 / total as f64 * 10.0).round() / 10.0
        };
        Self {
            average,
            total,
            distribution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_summary() {
        let s = RatingSummary::from_ratings([]);
        assert_eq!(s.average, 0.0);
        assert_eq!(s.total, 0);
        assert_eq!(s.distribution.len(), 5);
        assert!(s.distribution.values().all(|&c| c == 0));
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        // 13 / 3 = 4.333..
        let s = RatingSummary::from_ratings([5, 4, 4]);
        assert_eq!(s.average, 4.3);
        assert_eq!(s.total, 3);
        assert_eq!(s.distribution[&4], 2);
        assert_eq!(s.distribution[&5], 1);

        // 9 / 2 = 4.5
        assert_eq!(RatingSummary::from_ratings([5, 4]).average, 4.5);
        // 29 / 7 = 4.142..
        assert_eq!(RatingSummary::from_ratings([5, 5, 5, 5, 5, 3, 1]).average, 4.1);
    }

    #[test]
    fn serializes_distribution_as_object() {
        let json = serde_json::to_value(RatingSummary::from_ratings([3])).unwrap();
        assert_eq!(json["distribution"]["3"], 1);
        assert_eq!(json["distribution"]["1"], 0);
    }
}
