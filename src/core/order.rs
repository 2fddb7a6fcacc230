//! Order basket - a guest's chosen (item, variant) quantities and the checkout handoff.
//!
//! A session lives in memory for as long as the bot runs. Checkout does not record
//! the order anywhere; it only turns the basket into a pre-filled WhatsApp message
//! for the lounge's contact number.

use crate::{
    core::{offer::round_cents, variant::PriceKey},
    errors::Result,
};
use url::{Url, form_urlencoded};

/// One basket line, keyed by (item id, variant).
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub item_id: i64,
    pub variant: PriceKey,
    pub name: String,
    pub variant_label: String,
    /// Always at least 1
    pub quantity: u32,
    /// Price per unit captured when the line was last changed
    pub unit_price: f64,
}

impl OrderLine {
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

/// Aggregate of the basket, recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    pub item_count: u32,
    pub amount_due: f64,
}

/// Business details used to word the checkout message.
#[derive(Debug, Clone)]
pub struct MessageStyle {
    pub business_name: String,
    pub currency: String,
}

/// Result of a checkout: the message and the deep link that opens it in WhatsApp.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderHandoff {
    pub text: String,
    pub url: Url,
}

/// Display data for a line about to be changed.
#[derive(Debug, Clone)]
pub struct LineDetails {
    pub name: String,
    pub variant_label: String,
    pub unit_price: f64,
}

/// A guest's basket. Lines keep the order in which they were first added.
#[derive(Debug, Clone, Default)]
pub struct OrderSession {
    lines: Vec<OrderLine>,
}

impl OrderSession {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Adjusts the quantity of (`item_id`, `variant`) by `delta` and returns the new
    /// quantity. The quantity never drops below zero and a line reaching zero is
    /// removed. Name, label and unit price are refreshed from `details` on every
    /// change that leaves the line in the basket.
    pub fn set_quantity(
        &mut self,
        item_id: i64,
        variant: &PriceKey,
        delta: i32,
        details: LineDetails,
    ) -> u32 {
        let position = self
            .lines
            .iter()
            .position(|line| line.item_id == item_id && line.variant == *variant);
        let current = position.map_or(0, |index| self.lines[index].quantity);
        let new_quantity = current.saturating_add_signed(delta);

        match (position, new_quantity) {
            (Some(index), 0) => {
                self.lines.remove(index);
            }
            (None, 0) => {}
            (Some(index), quantity) => {
                let line = &mut self.lines[index];
                line.quantity = quantity;
                line.name = details.name;
                line.variant_label = details.variant_label;
                line.unit_price = details.unit_price;
            }
            (None, quantity) => self.lines.push(OrderLine {
                item_id,
                variant: variant.clone(),
                name: details.name,
                variant_label: details.variant_label,
                quantity,
                unit_price: details.unit_price,
            }),
        }

        new_quantity
    }

    /// Current quantity of (`item_id`, `variant`), zero when absent.
    #[must_use]
    pub fn quantity_of(&self, item_id: i64, variant: &PriceKey) -> u32 {
        self.lines
            .iter()
            .find(|line| line.item_id == item_id && line.variant == *variant)
            .map_or(0, |line| line.quantity)
    }

    #[must_use]
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        self.lines.iter().fold(
            OrderTotals {
                item_count: 0,
                amount_due: 0.0,
            },
            |totals, line| OrderTotals {
                item_count: totals.item_count + line.quantity,
                amount_due: round_cents(totals.amount_due + line.subtotal()),
            },
        )
    }

    /// Builds the checkout message and its `wa.me` link for `contact`, a phone number
    /// in international form. Returns `None` for an empty basket.
    ///
    /// # Errors
    /// Returns `Error::Url` if `contact` cannot form a valid link.
    pub fn to_order_message(
        &self,
        contact: &str,
        style: &MessageStyle,
    ) -> Result<Option<OrderHandoff>> {
        if self.is_empty() {
            return Ok(None);
        }

        let currency = &style.currency;
        let mut text = format!("Hello {}! I'd like to place an order:\n\n", style.business_name);
        for line in &self.lines {
            text.push_str(&format!(
                "• {}x {} ({}) - {currency} {:.2}\n",
                line.quantity,
                line.name,
                line.variant_label,
                line.subtotal()
            ));
        }
        text.push_str(&format!(
            "\n*Grand Total: {currency} {:.2}*",
            self.totals().amount_due
        ));

        let url = whatsapp_link(contact, &text)?;
        Ok(Some(OrderHandoff { text, url }))
    }
}

/// `https://wa.me/<digits>?text=<message>` with the message percent-encoded.
///
/// # Errors
/// Returns `Error::Url` if the resulting link does not parse.
pub fn whatsapp_link(contact: &str, text: &str) -> Result<Url> {
    let digits: String = contact.chars().filter(char::is_ascii_digit).collect();
    // form encoding writes spaces as '+', a literal '+' is already %2B
    let encoded = form_urlencoded::byte_serialize(text.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    Url::parse(&format!("https://wa.me/{digits}?text={encoded}")).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::variant::Variant;

    const BURGER: i64 = 7;

    fn medium() -> PriceKey {
        PriceKey::Known(Variant::Medium)
    }

    fn large() -> PriceKey {
        PriceKey::Known(Variant::Large)
    }

    fn details(label: &str, price: f64) -> LineDetails {
        LineDetails {
            name: "Burger".to_string(),
            variant_label: label.to_string(),
            unit_price: price,
        }
    }

    fn style() -> MessageStyle {
        MessageStyle {
            business_name: "Icon Lounge".to_string(),
            currency: "GHS".to_string(),
        }
    }

    #[test]
    fn test_decrementing_absent_line_leaves_it_absent() {
        let mut session = OrderSession::new();
        assert_eq!(session.set_quantity(BURGER, &medium(), -1, details("Medium", 50.0)), 0);
        assert!(session.is_empty());
        assert_eq!(session.quantity_of(BURGER, &medium()), 0);
    }

    #[test]
    fn test_totals_follow_quantity_changes() {
        let mut session = OrderSession::new();
        session.set_quantity(BURGER, &medium(), 1, details("Medium", 50.0));
        session.set_quantity(BURGER, &medium(), 1, details("Medium", 50.0));
        session.set_quantity(BURGER, &large(), 1, details("Large", 70.0));

        let totals = session.totals();
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.amount_due, 170.0);

        session.set_quantity(BURGER, &medium(), -1, details("Medium", 50.0));
        assert_eq!(session.set_quantity(BURGER, &medium(), -1, details("Medium", 50.0)), 0);

        let totals = session.totals();
        assert_eq!(totals.item_count, 1);
        assert_eq!(totals.amount_due, 70.0);
        assert_eq!(session.lines().len(), 1);
        assert_eq!(session.lines()[0].variant, large());
    }

    #[test]
    fn test_quantity_never_goes_negative() {
        let mut session = OrderSession::new();
        session.set_quantity(BURGER, &medium(), 2, details("Medium", 50.0));
        assert_eq!(session.set_quantity(BURGER, &medium(), -5, details("Medium", 50.0)), 0);
        assert!(session.is_empty());
    }

    #[test]
    fn test_empty_session_has_no_handoff() {
        let session = OrderSession::new();
        assert!(session.to_order_message("233240000000", &style()).unwrap().is_none());
    }

    #[test]
    fn test_order_message_format() {
        let mut session = OrderSession::new();
        session.set_quantity(BURGER, &medium(), 2, details("Medium", 50.0));
        session.set_quantity(BURGER, &large(), 1, details("Large", 70.0));

        let handoff = session
            .to_order_message("+233 24 045 2792", &style())
            .unwrap()
            .unwrap();

        assert_eq!(
            handoff.text,
            "Hello Icon Lounge! I'd like to place an order:\n\n\
             • 2x Burger (Medium) - GHS 100.00\n\
             • 1x Burger (Large) - GHS 70.00\n\
             \n*Grand Total: GHS 170.00*"
        );
        assert_eq!(handoff.url.host_str(), Some("wa.me"));
        assert_eq!(handoff.url.path(), "/233240452792");

        let (key, value) = handoff.url.query_pairs().next().unwrap();
        assert_eq!(key, "text");
        assert_eq!(value, handoff.text);
        assert!(!handoff.url.as_str().contains('+'));
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut session = OrderSession::new();
        session.set_quantity(2, &large(), 1, details("Large", 70.0));
        session.set_quantity(1, &medium(), 1, details("Medium", 50.0));
        session.set_quantity(2, &large(), 1, details("Large", 70.0));

        let ids: Vec<i64> = session.lines().iter().map(|line| line.item_id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(session.quantity_of(2, &large()), 2);
    }
}
