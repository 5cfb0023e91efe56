use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters counted as "special" by the strength heuristic
const SPECIAL_CHARS: &[char] = &['!', '#', '@', '$', '%', '^', '&', '*', ')', '(', '+', '=', '.', '_', '-'];

/// Display color token for a strength level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum StrengthColor {
    ErrorMain,
    WarningMain,
    WarningDark,
    SuccessMain,
    SuccessDark,
}

impl StrengthColor {
    pub fn as_str(&self) -> &str {
        match self {
            StrengthColor::ErrorMain => "error.main",
            StrengthColor::WarningMain => "warning.main",
            StrengthColor::WarningDark => "warning.dark",
            StrengthColor::SuccessMain => "success.main",
            StrengthColor::SuccessDark => "success.dark",
        }
    }
}

impl fmt::Display for StrengthColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Password strength rating shown under the password field
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct StrengthResult {
    /// 0 (poor) to 4 (strong)
    pub score: u8,
    pub label: &'static str,
    pub color: StrengthColor,
}

impl StrengthResult {
    fn from_criteria(count: u8) -> Self {
        let (score, label, color) = match count {
            0 | 1 => (0, "Poor", StrengthColor::ErrorMain),
            2 => (1, "Weak", StrengthColor::WarningMain),
            3 => (2, "Normal", StrengthColor::WarningDark),
            4 => (3, "Good", StrengthColor::SuccessMain),
            _ => (4, "Strong", StrengthColor::SuccessDark),
        };

        Self { score, label, color }
    }
}

impl Default for StrengthResult {
    fn default() -> Self {
        score("")
    }
}

/// Rate a password by length and character-class diversity.
///
/// One point each for: more than 5 characters, more than 7 characters,
/// a digit, a special character, and mixed-case letters. The point count
/// is then bucketed into five levels. Appending characters can only add
/// points, so a longer password never rates below its prefix.
pub fn score(password: &str) -> StrengthResult {
    let length = password.chars().count();
    let mut criteria = 0u8;

    if length > 5 {
        criteria += 1;
    }
    if length > 7 {
        criteria += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        criteria += 1;
    }
    if password.chars().any(|c| SPECIAL_CHARS.contains(&c)) {
        criteria += 1;
    }
    if password.chars().any(|c| c.is_ascii_lowercase()) && password.chars().any(|c| c.is_ascii_uppercase()) {
        criteria += 1;
    }

    StrengthResult::from_criteria(criteria)
}
