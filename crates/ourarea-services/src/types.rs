use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceCategory {
    Food,
    Taxi,
    Delivery,
    Offers,
}

impl ServiceCategory {
    pub const ALL: [ServiceCategory; 4] = [
        ServiceCategory::Food,
        ServiceCategory::Taxi,
        ServiceCategory::Delivery,
        ServiceCategory::Offers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::Food => "Food",
            ServiceCategory::Taxi => "Taxi",
            ServiceCategory::Delivery => "Delivery",
            ServiceCategory::Offers => "Offers",
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category selection in the service list. `All` shows everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(ServiceCategory),
}

impl CategoryFilter {
    pub fn matches(&self, category: ServiceCategory) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(only) => *only == category,
        }
    }

    /// `(value, label)` pairs for a category picker, `all` first.
    pub fn options() -> Vec<(&'static str, &'static str)> {
        let mut options = vec![("all", "All Categories")];
        options.extend(ServiceCategory::ALL.iter().map(|c| (c.as_str(), c.as_str())));
        options
    }
}

impl FromStr for CategoryFilter {
    type Err = DirectoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        ServiceCategory::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .map(|c| CategoryFilter::Only(*c))
            .ok_or_else(|| DirectoryError::UnknownCategory(s.to_string()))
    }
}

/// How widely a service operates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaScope {
    District,
    City,
    State,
    Country,
}

/// A coupon offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: String,
    pub title: String,
    pub description: String,
    pub coupon_code: String,
    /// Last day the coupon can be used
    pub expiry: NaiveDate,
    pub terms: String,
}

impl Offer {
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.expiry >= today
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub logo_url: String,
    pub category: ServiceCategory,
    pub rating: f32,
    /// Human-readable typical wait, e.g. "25-35 mins"
    pub avg_time: String,
    pub tagline: String,
    pub area_scope: AreaScope,
    pub popular_tags: Vec<String>,
    pub app_url: String,
    pub offers: Vec<Offer>,
}

/// Service directory errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Unknown service category: {0}")]
    UnknownCategory(String),
}

impl DirectoryError {
    pub fn user_message(&self) -> &'static str {
        match self {
            DirectoryError::UnknownService(_) => "This service is no longer listed.",
            DirectoryError::UnknownCategory(_) => "Please pick a category from the list.",
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_parse_category_filter() {
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert_eq!(
            "taxi".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(ServiceCategory::Taxi)
        );
        assert_eq!(
            "Spa".parse::<CategoryFilter>(),
            Err(DirectoryError::UnknownCategory("Spa".to_string()))
        );
    }

    #[test]
    fn test_filter_options_start_with_all() {
        let options = CategoryFilter::options();
        assert_eq!(options[0], ("all", "All Categories"));
        assert_eq!(options.len(), 5);
    }

    #[test]
    fn test_offer_active_through_expiry_day() {
        let offer = Offer {
            id: "x".into(),
            title: "t".into(),
            description: "d".into(),
            coupon_code: "C".into(),
            expiry: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            terms: String::new(),
        };
        assert!(offer.is_active(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()));
        assert!(!offer.is_active(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()));
    }

    #[test]
    fn test_area_scope_serde() {
        let json = serde_json::to_string(&AreaScope::Country).unwrap();
        assert_eq!(json, "\"country\"");
    }
}
