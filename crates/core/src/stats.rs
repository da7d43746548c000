//! Score arithmetic shared by the progress and user aggregates.

/// Points awarded for completing a module, independent of score.
pub const POINTS_PER_MODULE: u32 = 12_250;

/// Highest module the unlock pointer may reach.
pub const MAX_MODULE: u32 = 99;

/// Percentage of correct answers, rounded to the nearest integer.
///
/// Returns `0` when no answers were given at all.
#[must_use]
pub fn accuracy_percent(correct: u32, wrong: u32) -> u32 {
    let total = correct + wrong;
    if total == 0 {
        return 0;
    }

    // Counts are bounded by human-scale quiz sizes; f64 holds them exactly.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        (f64::from(correct) / f64::from(total) * 100.0).round() as u32
    }
}

/// Extracts the module number from a human-readable achievement title.
///
/// Takes the first contiguous run of digits (e.g. `"Módulo 12 Concluído"`
/// yields `12`); titles without any digits default to module 1.
#[must_use]
pub fn module_number_from_title(title: &str) -> u32 {
    let digits: String = title
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(1)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accuracy_is_zero_without_answers() {
        assert_eq!(accuracy_percent(0, 0), 0);
    }

    #[test]
    fn accuracy_rounds_to_nearest_percent() {
        assert_eq!(accuracy_percent(7, 3), 70);
        assert_eq!(accuracy_percent(2, 1), 67);
        assert_eq!(accuracy_percent(1, 2), 33);
        assert_eq!(accuracy_percent(9, 1), 90);
        assert_eq!(accuracy_percent(10, 0), 100);
        assert_eq!(accuracy_percent(0, 5), 0);
    }

    #[test]
    fn title_with_number_yields_that_module() {
        assert_eq!(module_number_from_title("Módulo 2 Concluído"), 2);
        assert_eq!(module_number_from_title("Módulo 12 Concluído"), 12);
    }

    #[test]
    fn title_without_number_defaults_to_one() {
        assert_eq!(module_number_from_title("Parabéns!"), 1);
        assert_eq!(module_number_from_title(""), 1);
    }

    #[test]
    fn only_first_digit_run_is_used() {
        assert_eq!(module_number_from_title("Módulo 3 de 10"), 3);
    }
}
