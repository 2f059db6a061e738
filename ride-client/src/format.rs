//! Formatting helpers for trip data.
//!
//! Currency, distances, icons and star ratings as they are shown to riders.

/// Earth's mean radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// ============================================================================
// Numbers
// ============================================================================

/// Format an amount as Indian rupees with no fractional part.
///
/// Uses Indian digit grouping (lakh/crore): the last three digits form one
/// group and the rest are grouped in pairs. Halves round away from zero,
/// and negative amounts keep their sign even when they round to zero.
///
/// ```
/// use ride_client::format::format_currency;
///
/// assert_eq!(format_currency(123456.7), "₹1,23,457");
/// assert_eq!(format_currency(-999.0), "-₹999");
/// ```
pub fn format_currency(amount: f64) -> String {
    if amount.is_nan() {
        return "₹NaN".to_string();
    }

    let rounded = amount.round();
    let sign = if amount.is_sign_negative() { "-" } else { "" };

    if rounded.is_infinite() {
        return format!("{sign}₹∞");
    }

    let digits = format!("{:.0}", rounded.abs());
    format!("{sign}₹{}", group_indian(&digits))
}

/// Insert en-IN grouping separators into a string of ASCII digits.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);

    let first = head.len() % 2;
    if first == 1 {
        out.push_str(&head[..1]);
    }
    for (i, pair) in head.as_bytes()[first..].chunks(2).enumerate() {
        if i > 0 || first == 1 {
            out.push(',');
        }
        // Digits are ASCII
        out.extend(pair.iter().map(|&b| b as char));
    }

    out.push(',');
    out.push_str(tail);
    out
}

/// Format a distance with one decimal place.
///
/// Exact ties such as 12.25 round away from zero.
pub fn format_distance(km: f64) -> String {
    let scaled = km * 10.0;
    let exact_tie = scaled.fract().abs() == 0.5 && km.mul_add(10.0, -scaled) == 0.0;
    let km = if exact_tie { scaled.round() / 10.0 } else { km };
    format!("{km:.1} km")
}

/// Convert degrees to radians.
pub fn to_rad(deg: f64) -> f64 {
    deg * (std::f64::consts::PI / 180.0)
}

/// Great-circle distance in kilometres between two coordinates.
///
/// Haversine formula on a sphere of radius [`EARTH_RADIUS_KM`].
pub fn calculate_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = to_rad(lat2 - lat1);
    let d_lon = to_rad(lon2 - lon1);

    let a = (d_lat / 2.0).sin().powi(2)
        + to_rad(lat1).cos() * to_rad(lat2).cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

// ============================================================================
// Icons and ratings
// ============================================================================

/// Icon for a vendor type (`food`, `hotel`, `workshop`).
pub fn vendor_icon(vendor_type: &str) -> &'static str {
    match vendor_type {
        "food" => "🍽️",
        "hotel" => "🏨",
        "workshop" => "🔧",
        _ => "📍",
    }
}

/// Icon for an emergency service type.
pub fn emergency_icon(service_type: &str) -> &'static str {
    match service_type {
        "police" => "🚔",
        "hospital" => "🏥",
        "ambulance" => "🚑",
        "fire" => "🚒",
        "roadside" => "🚗",
        _ => "📞",
    }
}

/// Render a 0-5 rating as stars, e.g. `★★★½☆` for 3.5.
///
/// Ratings outside 0-5 are clamped; NaN renders as zero stars.
pub fn render_stars(rating: f64) -> String {
    let rating = if rating.is_nan() {
        0.0
    } else {
        rating.clamp(0.0, 5.0)
    };

    let full = rating.floor() as usize;
    let half = rating.fract() >= 0.5;
    let empty = 5 - full - usize::from(half);

    let mut stars = "★".repeat(full);
    if half {
        stars.push('½');
    }
    stars.push_str(&"☆".repeat(empty));
    stars
}
