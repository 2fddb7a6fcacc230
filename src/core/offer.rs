//! Special offer evaluation.
//!
//! An offer is a two-state gate re-evaluated on every render: it is ACTIVE only while
//! the item is flagged special, the reference instant lies inside the optional
//! `[starts_at, ends_at]` window (both bounds inclusive) and, when recurring weekdays
//! are set, the instant's wall-clock weekday is one of them. Nothing is cached between
//! calls, so an offer flips purely by the clock advancing.

use chrono::{DateTime, Datelike, TimeZone, Utc, Weekday};

/// Tag shown on an active offer that has no text of its own.
pub const DEFAULT_SPECIAL_TAG: &str = "Special Offer";

/// Result of evaluating an offer at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferState {
    Inactive,
    Active,
}

/// Time- and weekday-scoped promotion attached to a menu item.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Offer {
    /// Master switch, an offer is never active while this is false
    pub is_special: bool,
    /// Tag text (e.g., "Happy Hour")
    pub text: Option<String>,
    /// Percentage taken off every variant price while active
    pub discount_percent: Option<f64>,
    /// First instant the offer is active
    pub starts_at: Option<DateTime<Utc>>,
    /// Last instant the offer is active
    pub ends_at: Option<DateTime<Utc>>,
    /// Weekdays the offer recurs on, empty means every day
    pub weekdays: Vec<Weekday>,
}

impl Offer {
    /// Evaluates the offer at `now`. The weekday is taken in `now`'s own timezone.
    pub fn state<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> OfferState {
        if !self.is_special {
            return OfferState::Inactive;
        }

        let instant = now.with_timezone(&Utc);
        if self.starts_at.is_some_and(|start| start > instant) {
            return OfferState::Inactive;
        }
        if self.ends_at.is_some_and(|end| end < instant) {
            return OfferState::Inactive;
        }

        if !self.weekdays.is_empty() && !self.weekdays.contains(&now.weekday()) {
            return OfferState::Inactive;
        }

        OfferState::Active
    }

    /// Shorthand for `state(now) == OfferState::Active`.
    pub fn is_active<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> bool {
        self.state(now) == OfferState::Active
    }

    /// Tag to display while the offer is active.
    #[must_use]
    pub fn tag(&self) -> &str {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(DEFAULT_SPECIAL_TAG)
    }

    /// Applies the discount to `price`, or `None` when the offer has no discount.
    /// Activity is not checked here.
    #[must_use]
    pub fn discounted(&self, price: f64) -> Option<f64> {
        self.discount_percent
            .map(|percent| round_cents(price * (1.0 - percent / 100.0)))
    }
}

/// Rounds a money amount to 2 decimal places.
#[must_use]
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Parses a weekday name (`"Friday"`, `"fri"`), ignoring case.
#[must_use]
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    name.trim().parse::<Weekday>().ok()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use chrono::{Duration, FixedOffset};

    // 2024-03-15 was a Friday
    fn friday_noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    fn special() -> Offer {
        Offer {
            is_special: true,
            ..Offer::default()
        }
    }

    #[test]
    fn test_unbounded_special_is_always_active() {
        assert!(special().is_active(&friday_noon()));
        assert!(special().is_active(&(friday_noon() + Duration::days(3))));
    }

    #[test]
    fn test_not_special_is_never_active() {
        let offer = Offer {
            is_special: false,
            discount_percent: Some(50.0),
            text: Some("Half price".to_string()),
            ..Offer::default()
        };
        assert_eq!(offer.state(&friday_noon()), OfferState::Inactive);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let now = friday_noon();

        let starts_now = Offer {
            starts_at: Some(now),
            ..special()
        };
        assert!(starts_now.is_active(&now));

        let ends_now = Offer {
            ends_at: Some(now),
            ..special()
        };
        assert!(ends_now.is_active(&now));

        let ended = Offer {
            ends_at: Some(now - Duration::milliseconds(1)),
            ..special()
        };
        assert!(!ended.is_active(&now));

        let not_started = Offer {
            starts_at: Some(now + Duration::milliseconds(1)),
            ..special()
        };
        assert!(!not_started.is_active(&now));
    }

    #[test]
    fn test_weekday_restriction() {
        let fridays = Offer {
            weekdays: vec![Weekday::Fri],
            ..special()
        };
        assert!(fridays.is_active(&friday_noon()));
        assert!(!fridays.is_active(&(friday_noon() + Duration::days(1))));
    }

    #[test]
    fn test_weekday_uses_wall_clock_of_reference_instant() {
        // 23:30 UTC on Friday is already Saturday at UTC+2
        let late_friday_utc = Utc.with_ymd_and_hms(2024, 3, 15, 23, 30, 0).unwrap();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let saturday_local = late_friday_utc.with_timezone(&plus_two);

        let fridays = Offer {
            weekdays: vec![Weekday::Fri],
            ..special()
        };
        assert!(fridays.is_active(&late_friday_utc));
        assert!(!fridays.is_active(&saturday_local));
    }

    #[test]
    fn test_discount_rounds_to_cents() {
        let offer = Offer {
            discount_percent: Some(15.0),
            ..special()
        };
        assert_eq!(offer.discounted(85.0), Some(72.25));
        assert_eq!(offer.discounted(10.0), Some(8.5));

        let third = Offer {
            discount_percent: Some(33.0),
            ..special()
        };
        assert_eq!(third.discounted(9.99), Some(6.69));
        assert_eq!(special().discounted(10.0), None);
    }

    #[test]
    fn test_tag_falls_back_to_default() {
        assert_eq!(special().tag(), DEFAULT_SPECIAL_TAG);
        let blank = Offer {
            text: Some("   ".to_string()),
            ..special()
        };
        assert_eq!(blank.tag(), DEFAULT_SPECIAL_TAG);
        let named = Offer {
            text: Some("Happy Hour".to_string()),
            ..special()
        };
        assert_eq!(named.tag(), "Happy Hour");
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("Friday"), Some(Weekday::Fri));
        assert_eq!(parse_weekday("mon"), Some(Weekday::Mon));
        assert_eq!(parse_weekday("Funday"), None);
    }
}
