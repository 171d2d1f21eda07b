//! Verdict copy and negotiation strings.
//!
//! Pure formatting over numbers the comparison engine already decided.
//! Nothing here branches on anything but the verdict itself and a
//! magnitude threshold that picks the stronger phrasing.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Verdict;

/// Absolute delta percent at which Go/NoGo copy switches to the
/// stronger phrasing.
const STRONG_PHRASE_THRESHOLD: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Explanatory copy for a verdict, addressed to the destination city.
///
/// `delta_percent` is on the 0..100 scale the verdict ladder uses.
pub fn verdict_message(
    verdict: Verdict,
    delta_percent: Decimal,
    destination_city: &str,
) -> String {
    let strong = delta_percent.abs() >= STRONG_PHRASE_THRESHOLD;
    match verdict {
        Verdict::Go if strong => format!(
            "An overwhelming advantage. Relocating to {} compounds your wealth trajectory by {}% and the numbers leave no room for debate.",
            destination_city,
            format_percent(delta_percent)
        ),
        Verdict::Go => format!(
            "A statistically superior move. Relocating to {} accelerates your wealth trajectory by {}% and provides a clear strategic advantage.",
            destination_city,
            format_percent(delta_percent)
        ),
        Verdict::Conditional => {
            "This move is a lateral shift. Negotiate for a sign-on bonus or equity kicker to justify the transition risk.".to_string()
        }
        Verdict::Warning => {
            "Proceed with extreme caution. The nominal raise is almost entirely consumed by hidden cost-of-living leaks and localized inflation.".to_string()
        }
        Verdict::NoGo if strong => format!(
            "A wealth-destroying move. No realistic negotiation closes a {}% purchasing-power regression in {}.",
            format_percent(delta_percent.abs()),
            destination_city
        ),
        Verdict::NoGo => format!(
            "High personal risk. Unless you negotiate well above parity, moving to {} is a regression in purchasing power.",
            destination_city
        ),
    }
}

/// Copy for the salary negotiation, anchored on the annual gross gap to
/// fiscal parity. A non-positive gap means the offer already clears it.
pub fn negotiation_lever(annual_gap: Decimal) -> String {
    if annual_gap <= Decimal::ZERO {
        return "You have full leverage. Reiterate your value and focus on non-monetary perks.".to_string();
    }
    format!(
        "Fiscal parity requires an additional ${} in base compensation. Use this as your primary negotiation anchor.",
        group_thousands(annual_gap)
    )
}

/// Signed dollar string for the monthly residual change, e.g. `+$1,234`.
pub fn monthly_gain_message(monthly_gain: Decimal) -> String {
    if monthly_gain >= Decimal::ZERO {
        format!("+${}", group_thousands(monthly_gain))
    } else {
        format!("-${}", group_thousands(monthly_gain.abs()))
    }
}

/// One-decimal percent figure for copy, without the sign conventions of
/// the callers changed.
fn format_percent(delta_percent: Decimal) -> String {
    format!(
        "{:.1}",
        delta_percent.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Whole dollars with thousands separators; the sign is the caller's.
fn group_thousands(amount: Decimal) -> String {
    let digits = amount
        .abs()
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
