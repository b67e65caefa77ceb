//! Built-in directory of local services.

use chrono::NaiveDate;
use ourarea_geo::Area;

use crate::types::{AreaScope, CategoryFilter, DirectoryError, Offer, Service, ServiceCategory};

#[derive(Debug, Clone)]
pub struct ServiceDirectory {
    services: Vec<Service>,
}

impl ServiceDirectory {
    pub fn new(services: Vec<Service>) -> Self {
        Self { services }
    }

    /// The services listed for Bengaluru.
    pub fn builtin() -> Self {
        Self::new(builtin_services())
    }

    pub fn all(&self) -> &[Service] {
        &self.services
    }

    pub fn get(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    /// Services in the selected category, in directory order.
    pub fn filter(&self, filter: CategoryFilter) -> Vec<&Service> {
        self.services
            .iter()
            .filter(|s| filter.matches(s.category))
            .collect()
    }

    /// Services available in `area`.
    ///
    /// With no area the category-filtered list is returned as is.
    pub fn nearby(&self, area: Option<&Area>, filter: CategoryFilter) -> Vec<&Service> {
        let services = self.filter(filter);
        let Some(area) = area else {
            return services;
        };

        let visible: Vec<&Service> = services
            .into_iter()
            .filter(|s| serves(s.area_scope, area))
            .collect();
        tracing::debug!("{} services near {}", visible.len(), area.name);
        visible
    }

    /// Offers of `service_id` that have not expired by `today`.
    ///
    /// # Errors
    /// Returns `DirectoryError::UnknownService` if the id is not listed.
    pub fn active_offers(
        &self,
        service_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<&Offer>, DirectoryError> {
        let service = self
            .get(service_id)
            .ok_or_else(|| DirectoryError::UnknownService(service_id.to_string()))?;
        Ok(service.offers.iter().filter(|o| o.is_active(today)).collect())
    }
}

impl Default for ServiceDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Whether a service with `scope` operates in `area`.
///
/// Every catalog area lies in one city, so any scope from district upwards
/// covers it.
fn serves(scope: AreaScope, _area: &Area) -> bool {
    match scope {
        AreaScope::District | AreaScope::City | AreaScope::State | AreaScope::Country => true,
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn offer(id: &str, title: &str, description: &str, code: &str, expiry: NaiveDate, terms: &str) -> Offer {
    Offer {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        coupon_code: code.to_string(),
        expiry,
        terms: terms.to_string(),
    }
}

fn service(
    id: &str,
    name: &str,
    category: ServiceCategory,
    rating: f32,
    avg_time: &str,
    tagline: &str,
    area_scope: AreaScope,
    tags: &[&str],
    app_url: &str,
    offers: Vec<Offer>,
) -> Service {
    Service {
        id: id.to_string(),
        name: name.to_string(),
        logo_url: format!("https://picsum.photos/seed/{}/100/100", id),
        category,
        rating,
        avg_time: avg_time.to_string(),
        tagline: tagline.to_string(),
        area_scope,
        popular_tags: tags.iter().map(|t| (*t).to_string()).collect(),
        app_url: app_url.to_string(),
        offers,
    }
}

fn builtin_services() -> Vec<Service> {
    use AreaScope::{City, Country, State};
    use ServiceCategory::{Delivery, Food, Offers, Taxi};

    vec![
        service(
            "zomato",
            "Zomato",
            Food,
            4.3,
            "25-35 mins",
            "Food delivery & dining",
            City,
            &["Discounts", "Fast", "Variety"],
            "https://zomato.com",
            vec![
                offer(
                    "zomato-1",
                    "50% OFF on first order",
                    "Get 50% discount up to ₹100 on your first food order",
                    "FIRST50",
                    date(2024, 12, 31),
                    "Valid for new users only. Minimum order ₹199.",
                ),
                offer(
                    "zomato-2",
                    "Free delivery",
                    "Free delivery on orders above ₹299",
                    "FREEDEL",
                    date(2024, 12, 25),
                    "Valid on all restaurants. No minimum order.",
                ),
            ],
        ),
        service(
            "swiggy",
            "Swiggy",
            Food,
            4.2,
            "20-30 mins",
            "Food & grocery delivery",
            City,
            &["Fast", "Trusted", "Grocery"],
            "https://swiggy.com",
            vec![offer(
                "swiggy-1",
                "60% OFF + Free delivery",
                "Get 60% off up to ₹120 + free delivery",
                "WELCOME60",
                date(2024, 12, 30),
                "Valid for new users. Minimum order ₹149.",
            )],
        ),
        service(
            "rapido",
            "Rapido",
            Taxi,
            4.1,
            "5-10 mins",
            "Bike taxi & delivery",
            City,
            &["Quick", "Affordable", "Bike"],
            "https://rapido.bike",
            vec![offer(
                "rapido-1",
                "₹50 OFF on rides",
                "Get ₹50 off on your next 3 rides",
                "RIDE50",
                date(2024, 12, 28),
                "Valid on bike rides only. Maximum discount ₹50 per ride.",
            )],
        ),
        service(
            "uber",
            "Uber",
            Taxi,
            4.0,
            "8-15 mins",
            "Rides & food delivery",
            Country,
            &["Reliable", "Global", "Premium"],
            "https://uber.com",
            vec![offer(
                "uber-1",
                "25% OFF first ride",
                "Get 25% discount up to ₹75 on your first ride",
                "FIRST25",
                date(2024, 12, 31),
                "Valid for new users only.",
            )],
        ),
        service(
            "dunzo",
            "Dunzo",
            Delivery,
            3.9,
            "45-60 mins",
            "Instant delivery service",
            City,
            &["Instant", "Groceries", "Medicine"],
            "https://dunzo.com",
            vec![offer(
                "dunzo-1",
                "Free delivery on groceries",
                "Free delivery on grocery orders above ₹500",
                "GROCERY",
                date(2024, 12, 29),
                "Valid on grocery orders only.",
            )],
        ),
        service(
            "bigbasket",
            "BigBasket",
            Delivery,
            4.2,
            "2-4 hours",
            "Online grocery store",
            State,
            &["Groceries", "Fresh", "Bulk"],
            "https://bigbasket.com",
            vec![offer(
                "bigbasket-1",
                "₹200 OFF on ₹1000",
                "Get ₹200 off on orders above ₹1000",
                "BB200",
                date(2024, 12, 27),
                "Valid on first order. Minimum order ₹1000.",
            )],
        ),
        service(
            "bookmyshow",
            "BookMyShow",
            Offers,
            4.4,
            "Instant",
            "Movie & event tickets",
            Country,
            &["Movies", "Events", "Entertainment"],
            "https://bookmyshow.com",
            vec![offer(
                "bms-1",
                "Buy 1 Get 1 FREE",
                "Buy 1 movie ticket and get 1 free on weekdays",
                "BUY1GET1",
                date(2024, 12, 26),
                "Valid on weekdays only. Select cinemas.",
            )],
        ),
        service(
            "paytm",
            "Paytm",
            Offers,
            4.1,
            "Instant",
            "Digital payments & offers",
            Country,
            &["Cashback", "Recharge", "Bills"],
            "https://paytm.com",
            vec![offer(
                "paytm-1",
                "₹50 Cashback on recharge",
                "Get ₹50 cashback on mobile recharge above ₹199",
                "RECHARGE50",
                date(2024, 12, 31),
                "Valid once per user. Minimum recharge ₹199.",
            )],
        ),
    ]
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use ourarea_geo::AreaCatalog;

    #[test]
    fn test_builtin_directory() {
        let directory = ServiceDirectory::builtin();
        assert_eq!(directory.all().len(), 8);
        assert_eq!(directory.get("uber").unwrap().area_scope, AreaScope::Country);
        assert!(directory.get("ola").is_none());
    }

    #[test]
    fn test_filter_by_category() {
        let directory = ServiceDirectory::builtin();
        let taxis: Vec<&str> = directory
            .filter(CategoryFilter::Only(ServiceCategory::Taxi))
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(taxis, vec!["rapido", "uber"]);
        assert_eq!(directory.filter(CategoryFilter::All).len(), 8);
    }

    #[test]
    fn test_nearby_without_area_is_filtered_list() {
        let directory = ServiceDirectory::builtin();
        let filter = CategoryFilter::Only(ServiceCategory::Food);
        assert_eq!(directory.nearby(None, filter), directory.filter(filter));
    }

    #[test]
    fn test_nearby_includes_every_scope() {
        let directory = ServiceDirectory::builtin();
        let catalog = AreaCatalog::bengaluru();
        for area in catalog.iter() {
            assert_eq!(directory.nearby(Some(area), CategoryFilter::All).len(), 8);
        }
    }

    #[test]
    fn test_active_offers_by_date() {
        let directory = ServiceDirectory::builtin();

        let before = directory.active_offers("zomato", date(2024, 12, 20)).unwrap();
        assert_eq!(before.len(), 2);

        let after_first = directory.active_offers("zomato", date(2024, 12, 26)).unwrap();
        let codes: Vec<&str> = after_first.iter().map(|o| o.coupon_code.as_str()).collect();
        assert_eq!(codes, vec!["FIRST50"]);

        assert!(directory.active_offers("zomato", date(2025, 1, 1)).unwrap().is_empty());
    }

    #[test]
    fn test_active_offers_unknown_service() {
        let directory = ServiceDirectory::builtin();
        assert_eq!(
            directory.active_offers("ola", date(2024, 12, 1)),
            Err(DirectoryError::UnknownService("ola".to_string()))
        );
    }
}
