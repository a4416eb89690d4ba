//! Display and JSON presentation of a [`PriceRecord`].

use serde_json::{json, Map, Value};

use crate::PriceRecord;

/// Quotes rendered as dollar amounts.
pub const USD_LIKE_QUOTES: [&str; 3] = ["USD", "USDT", "USDC"];

pub fn is_usd_like(quote: &str) -> bool {
    USD_LIKE_QUOTES
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(quote))
}

/// `$65,000.00` for dollar quotes, `0.000123 BTC` otherwise.
pub fn format_price(value: f64, quote: &str) -> String {
    if is_usd_like(quote) {
        format!("${}", group_thousands(&format!("{value:.2}")))
    } else {
        format!("{} {}", group_thousands(&format!("{value:.6}")), quote)
    }
}

/// Signed percentage with two decimals, e.g. `+1.56%`.
pub fn format_change(pct: f64) -> String {
    format!("{pct:+.2}%")
}

fn format_amount(value: f64) -> String {
    group_thousands(&format!("{value:.2}"))
}

/// Inserts `,` separators into the integer part of a fixed-point string.
fn group_thousands(fixed: &str) -> String {
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(fixed.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Multi-line chat block for one record.
pub fn render(record: &PriceRecord) -> String {
    let quote = record.pair.quote();
    let mut lines = vec![
        format!("{} ({})", record.display_name, record.pair),
        format!("Price: {}", format_price(record.price, quote)),
        format!("24h change: {}", format_change(record.change_24h_pct)),
        format!("24h high: {}", format_price(record.high_24h, quote)),
        format!("24h low: {}", format_price(record.low_24h, quote)),
    ];
    if let Some(volume) = record.volume_24h {
        lines.push(format!("24h volume: {} {}", format_amount(volume), record.pair.base()));
    }
    if let Some(market_cap) = record.market_cap {
        lines.push(format!("Market cap: {}", format_price(market_cap, quote)));
    }
    lines.push(format!("Source: {}", record.source.display_name()));
    lines.push(format!("Updated: {} UTC", record.fetched_at.format_display()));

    lines.join("\n")
}

/// Flat JSON object served by the HTTP endpoints.
pub fn to_json(record: &PriceRecord) -> Value {
    let quote = record.pair.quote();
    let mut object = Map::new();
    object.insert(String::from("symbol"), json!(record.pair.to_string()));
    object.insert(String::from("name"), json!(record.display_name));
    object.insert(String::from("price"), json!(record.price));
    object.insert(
        String::from("price_formatted"),
        json!(format_price(record.price, quote)),
    );
    object.insert(String::from("change_24h"), json!(record.change_24h_pct));
    object.insert(
        String::from("change_formatted"),
        json!(format_change(record.change_24h_pct)),
    );
    object.insert(String::from("quote_currency"), json!(quote));
    object.insert(String::from("high_24h"), json!(record.high_24h));
    object.insert(String::from("low_24h"), json!(record.low_24h));
    if let Some(volume) = record.volume_24h {
        object.insert(String::from("volume"), json!(volume));
    }
    if let Some(market_cap) = record.market_cap {
        object.insert(String::from("market_cap"), json!(market_cap));
    }
    object.insert(String::from("source"), json!(record.source.display_name()));
    object.insert(
        String::from("last_updated"),
        json!(record.fetched_at.format_rfc3339()),
    );

    Value::Object(object)
}
