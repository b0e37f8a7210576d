use rust_decimal::{Decimal, RoundingStrategy};

/// Format a price for display using Turkish number conventions.
///
/// Thousands are grouped with `.` and decimals use `,`. Two decimals are shown
/// only when the amount has a non-zero cent part; whole amounts have none.
/// `TRY` is rendered as `TL`, every other code verbatim.
///
/// ```
/// use rust_decimal::Decimal;
/// use newilano_core::format_price;
///
/// assert_eq!(format_price(Decimal::new(5499, 0), "TRY"), "5.499 TL");
/// assert_eq!(format_price(Decimal::new(499, 1), "TRY"), "49,90 TL");
/// ```
#[must_use]
pub fn format_price(amount: Decimal, currency: &str) -> String {
    let cents = (amount.fract() * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let decimals = if cents.is_zero() { 0 } else { 2 };

    let rounded = amount.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.*}", decimals as usize, rounded.abs());
    let (whole, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), ""));

    let mut formatted = String::with_capacity(plain.len() + whole.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        formatted.push('-');
    }
    formatted.push_str(&group_thousands(whole));
    if !fraction.is_empty() {
        formatted.push(',');
        formatted.push_str(fraction);
    }

    let symbol = if currency == "TRY" { "TL" } else { currency };
    format!("{formatted} {symbol}")
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
