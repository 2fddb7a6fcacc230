//! Turns menu and basket view models into Discord message text.
//!
//! All user-controlled text (item, category and customer names, descriptions, offer
//! tags) goes through [`escape_markdown`] before it is embedded in formatting.

use crate::core::{
    catalog::{ItemView, MenuGroup},
    order::{OrderSession, OrderTotals},
};
use std::fmt::Write;

/// Discord's message length limit in characters.
pub const DISCORD_MESSAGE_LIMIT: usize = 2000;

pub const LOADING_NOTICE: &str = "⏳ The menu is still loading, please try again in a moment.";
pub const NO_ITEMS_NOTICE: &str = "No items found.";

const MARKDOWN_SPECIALS: &[char] = &['\\', '*', '_', '~', '`', '|', '>', '#', '[', ']', '(', ')'];

/// Escapes Discord markdown control characters.
#[must_use]
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_SPECIALS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// `GHS 72.25`
#[must_use]
pub fn format_money(currency: &str, amount: f64) -> String {
    format!("{currency} {amount:.2}")
}

/// Renders filtered menu groups, or [`NO_ITEMS_NOTICE`] when there are none.
pub fn render_menu<I>(groups: I, currency: &str) -> String
where
    I: IntoIterator<Item = MenuGroup>,
{
    let mut out = String::new();

    for group in groups {
        let _ = writeln!(out, "__**{}**__", escape_markdown(&group.category));
        if let Some(banner) = &group.banner {
            let _ = writeln!(out, "> 🎉 {}", escape_markdown(banner));
        }
        for section in &group.sections {
            let _ = writeln!(out, "**{}**", escape_markdown(&section.name));
            for item in &section.items {
                out.push_str(&render_item(item, currency));
            }
        }
        out.push('\n');
    }

    if out.is_empty() {
        NO_ITEMS_NOTICE.to_string()
    } else {
        out.trim_end().to_string()
    }
}

/// Renders one item card: name and tag, description, then one price per variant.
#[must_use]
pub fn render_item(item: &ItemView, currency: &str) -> String {
    let mut out = format!("• **{}**", escape_markdown(&item.name));
    if let Some(tag) = &item.special_tag {
        let _ = write!(out, " 🔥 *{}*", escape_markdown(tag));
    }
    out.push('\n');

    if !item.description.trim().is_empty() {
        let _ = writeln!(out, "  *{}*", escape_markdown(item.description.trim()));
    }

    let prices: Vec<String> = item
        .prices
        .iter()
        .map(|price| match price.discounted {
            Some(discounted) => format!(
                "{}: ~~{}~~ {}",
                escape_markdown(price.label()),
                format_money(currency, price.price),
                format_money(currency, discounted)
            ),
            None => format!(
                "{}: {}",
                escape_markdown(price.label()),
                format_money(currency, price.price)
            ),
        })
        .collect();
    let _ = writeln!(out, "  {}", prices.join(" · "));
    out
}

/// Renders the featured widget; images are linked only when they are web URLs.
#[must_use]
pub fn render_featured(items: &[ItemView], currency: &str) -> String {
    if items.is_empty() {
        return NO_ITEMS_NOTICE.to_string();
    }

    let mut out = String::from("⭐ **Featured**\n");
    for item in items {
        out.push_str(&render_item(item, currency));
        if item.image.starts_with("http://") || item.image.starts_with("https://") {
            let _ = writeln!(out, "  <{}>", item.image);
        }
    }
    out.trim_end().to_string()
}

/// One-line basket summary shown after every quantity change.
#[must_use]
pub fn render_totals(totals: OrderTotals, currency: &str) -> String {
    format!(
        "🛒 {} item(s) · {}",
        totals.item_count,
        format_money(currency, totals.amount_due)
    )
}

/// Renders the basket lines and totals.
#[must_use]
pub fn render_basket(session: &OrderSession, currency: &str) -> String {
    if session.is_empty() {
        return "🛒 Your basket is empty. Add items with `/order add`.".to_string();
    }

    let mut out = String::from("🛒 **Your basket**\n");
    for line in session.lines() {
        let _ = writeln!(
            out,
            "• {}x {} ({}) - {}",
            line.quantity,
            escape_markdown(&line.name),
            escape_markdown(&line.variant_label),
            format_money(currency, line.subtotal())
        );
    }
    let totals = session.totals();
    let _ = write!(
        out,
        "\n**Total: {}** ({} item(s))",
        format_money(currency, totals.amount_due),
        totals.item_count
    );
    out
}

/// Splits `text` into chunks of at most `limit` characters, breaking on line
/// boundaries. A single line longer than `limit` is cut at character boundaries.
#[must_use]
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        let needed = if current.is_empty() { line_len } else { line_len + 1 };

        if current_len + needed <= limit {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
            current_len += needed;
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if line_len <= limit {
            current.push_str(line);
            current_len = line_len;
        } else {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(limit) {
                chunks.push(piece.iter().collect());
            }
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        catalog::{MenuSection, PriceView},
        order::LineDetails,
        variant::{PriceKey, Variant},
    };

    fn tilapia() -> ItemView {
        ItemView {
            id: 1,
            name: "Grilled_Tilapia".to_string(),
            description: "With *banku*".to_string(),
            image: "images/placeholder.png".to_string(),
            special_tag: Some("Happy Hour".to_string()),
            prices: vec![
                PriceView {
                    key: PriceKey::Known(Variant::Medium),
                    price: 85.0,
                    discounted: Some(72.25),
                },
                PriceView {
                    key: PriceKey::Other("family".to_string()),
                    price: 150.0,
                    discounted: None,
                },
            ],
        }
    }

    #[test]
    fn test_escape_markdown() {
        assert_eq!(escape_markdown("a*b_c"), r"a\*b\_c");
        assert_eq!(escape_markdown("plain"), "plain");
    }

    #[test]
    fn test_render_item_shows_original_and_discounted_price() {
        let text = render_item(&tilapia(), "GHS");
        assert!(text.starts_with(r"• **Grilled\_Tilapia** 🔥 *Happy Hour*"));
        assert!(text.contains(r"*With \*banku\**"));
        assert!(text.contains("Medium: ~~GHS 85.00~~ GHS 72.25"));
        assert!(text.contains("family: GHS 150.00"));
    }

    #[test]
    fn test_render_menu_empty_and_banner() {
        assert_eq!(render_menu(Vec::<MenuGroup>::new(), "GHS"), NO_ITEMS_NOTICE);

        let group = MenuGroup {
            category: "Food".to_string(),
            banner: Some("Platters 10% off".to_string()),
            sections: vec![MenuSection {
                name: "Grill".to_string(),
                items: vec![tilapia()],
            }],
        };
        let text = render_menu(vec![group], "GHS");
        assert!(text.starts_with("__**Food**__\n> 🎉 Platters 10% off\n**Grill**\n"));
    }

    #[test]
    fn test_render_basket() {
        let mut session = OrderSession::new();
        assert!(render_basket(&session, "GHS").contains("empty"));

        session.set_quantity(
            1,
            &PriceKey::Known(Variant::Medium),
            2,
            LineDetails {
                name: "Burger".to_string(),
                variant_label: "Medium".to_string(),
                unit_price: 50.0,
            },
        );
        let text = render_basket(&session, "GHS");
        assert!(text.contains("• 2x Burger (Medium) - GHS 100.00"));
        assert!(text.ends_with("**Total: GHS 100.00** (2 item(s))"));
    }

    #[test]
    fn test_split_message_on_line_boundaries() {
        let text = "aaaa\nbbbb\ncccc";
        assert_eq!(split_message(text, 9), vec!["aaaa\nbbbb", "cccc"]);
        assert_eq!(split_message(text, 2000), vec![text]);
    }

    #[test]
    fn test_split_message_cuts_overlong_lines() {
        let chunks = split_message("abcdefg\nhi", 3);
        assert_eq!(chunks, vec!["abc", "def", "g", "hi"]);
        assert!(split_message("", 10).is_empty());
    }
}
