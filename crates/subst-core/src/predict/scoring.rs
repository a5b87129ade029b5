//! Attribute scoring for substitute candidates.

use subst_config::ScoringParams;

use super::catalog::ProductRecord;

/// Price similarity in `[0, price_weight]`.
///
/// With `r = candidate / base`, the score rises linearly from 0 at
/// `price_ratio_low` to the full weight at `r = 1`, then falls linearly to 0
/// at `price_ratio_high`. Outside that band, or when the base price is 0, it
/// is 0.
pub fn price_score(base_price: f64, candidate_price: f64, params: &ScoringParams) -> f64 {
    if base_price == 0.0 {
        return 0.0;
    }
    let ratio = candidate_price / base_price;
    let low = params.price_ratio_low;
    let high = params.price_ratio_high;

    if !ratio.is_finite() || ratio <= low || ratio >= high {
        0.0
    } else if ratio <= 1.0 {
        params.price_weight * (ratio - low) / (1.0 - low)
    } else {
        params.price_weight * (high - ratio) / (high - 1.0)
    }
}

/// Confidence that `candidate` can replace `base`.
///
/// Price score plus brand, origin and premium bonuses, halved (by default)
/// for candidates from a sibling family.
pub fn attribute_confidence(
    base: &ProductRecord,
    candidate: &ProductRecord,
    params: &ScoringParams,
) -> f64 {
    let mut total = price_score(base.price, candidate.price, params);
    if base.same_brand(candidate) {
        total += params.brand_weight;
    }
    if base.origin == candidate.origin {
        total += params.origin_weight;
    }
    if base.premium == candidate.premium {
        total += params.premium_weight;
    }

    let multiplier = if base.same_family(candidate) {
        1.0
    } else {
        params.cross_family_multiplier
    };
    total * multiplier
}
