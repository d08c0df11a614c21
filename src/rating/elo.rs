use super::types::RatingValue;
use crate::config::settings::{MAX_DECIMAL_PLACES, RatingSettings};

/// Points of rating difference that correspond to 10:1 odds
const ELO_SCALE: f64 = 400.0;

/// Expected score of `rating` against `opponent`
pub fn expected_score(rating: RatingValue, opponent: RatingValue) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - rating) / ELO_SCALE))
}

/// Returns `(new_winner, new_loser)` after one judged comparison.
///
/// The loser gives up exactly what the winner gains, so the sum of both
/// ratings is preserved (up to rounding).
pub fn apply_comparison(
    winner: RatingValue,
    loser: RatingValue,
    settings: &RatingSettings,
) -> (RatingValue, RatingValue) {
    let delta = settings.k_factor * (1.0 - expected_score(winner, loser));

    (
        round_to(winner + delta, settings.decimal_places),
        round_to(loser - delta, settings.decimal_places),
    )
}

fn round_to(value: RatingValue, decimal_places: Option<u32>) -> RatingValue {
    match decimal_places {
        Some(places) => {
            let factor = 10f64.powi(places.min(MAX_DECIMAL_PLACES) as i32);
            (value * factor).round() / factor
        }
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unrounded() -> RatingSettings {
        RatingSettings {
            decimal_places: None,
            ..RatingSettings::default()
        }
    }

    #[test]
    fn test_expected_score_even_match() {
        assert_eq!(expected_score(1200.0, 1200.0), 0.5);
    }

    #[test]
    fn test_expected_score_400_points_is_ten_to_one() {
        let p = expected_score(1600.0, 1200.0);
        assert!((p - 10.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_first_comparison_from_baseline() {
        let (w, l) = apply_comparison(1200.0, 1200.0, &RatingSettings::default());
        assert_eq!(w, 1216.0);
        assert_eq!(l, 1184.0);
    }

    #[test]
    fn test_winner_gains_and_loser_drops() {
        let settings = unrounded();
        for (w, l) in [(1200.0, 1200.0), (1500.0, 1000.0), (900.0, 1700.0)] {
            let (new_w, new_l) = apply_comparison(w, l, &settings);
            assert!(new_w > w, "winner {} -> {}", w, new_w);
            assert!(new_l < l, "loser {} -> {}", l, new_l);
            assert!(((new_w + new_l) - (w + l)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_upset_moves_more_than_expected_win() {
        let settings = unrounded();
        let (favourite_win, _) = apply_comparison(1400.0, 1200.0, &settings);
        let (underdog_win, _) = apply_comparison(1200.0, 1400.0, &settings);
        assert!(underdog_win - 1200.0 > favourite_win - 1400.0);
    }

    #[test]
    fn test_mirror_symmetry() {
        let settings = RatingSettings::default();
        let (a_wins, b_loses) = apply_comparison(1200.0, 1200.0, &settings);
        let (b_wins, a_loses) = apply_comparison(1200.0, 1200.0, &settings);
        assert_eq!((a_wins, b_loses), (b_wins, a_loses));
        assert_eq!(a_wins - 1200.0, 1200.0 - b_loses);
    }

    #[test]
    fn test_huge_precision_keeps_ratings_finite() {
        let settings = RatingSettings {
            decimal_places: Some(400),
            ..RatingSettings::default()
        };
        let (w, l) = apply_comparison(1200.0, 1200.0, &settings);
        assert_eq!((w, l), (1216.0, 1184.0));
    }

    #[test]
    fn test_rounding_to_hundredths() {
        let (w, l) = apply_comparison(1216.0, 1184.0, &RatingSettings::default());
        assert_eq!(w, (w * 100.0).round() / 100.0);
        assert_eq!(l, (l * 100.0).round() / 100.0);
    }
}
