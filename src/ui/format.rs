//! Display helpers shared by panels and screen chrome
//!
//! Three-tier status colouring, width-bounded truncation and signed formatting.

use ratatui::style::{Color, Style};

/// Three-tier status used for every threshold-coloured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Good,
    Warning,
    Critical,
}

impl Tier {
    pub fn color(self) -> Color {
        match self {
            Tier::Good => Color::Green,
            Tier::Warning => Color::Yellow,
            Tier::Critical => Color::Red,
        }
    }

    pub fn style(self) -> Style {
        Style::default().fg(self.color())
    }

    /// Higher is better: good above `good`, warning above `warn`.
    pub fn above(value: f64, good: f64, warn: f64) -> Tier {
        if value > good {
            Tier::Good
        } else if value > warn {
            Tier::Warning
        } else {
            Tier::Critical
        }
    }

    /// Lower is better: good below `good`, warning below `warn`.
    pub fn below(value: f64, good: f64, warn: f64) -> Tier {
        if value < good {
            Tier::Good
        } else if value < warn {
            Tier::Warning
        } else {
            Tier::Critical
        }
    }

    /// Maps a status word reported by the backend.
    pub fn from_status(status: &str) -> Tier {
        match status.to_ascii_uppercase().as_str() {
            "OK" | "HEALTHY" | "STABLE" | "FILLED" | "IN" | "ACTIVE" | "COMPLETED" | "RUNNING" => {
                Tier::Good
            }
            "WARN" | "WARNING" | "DEGRADED" | "TRANSITIONAL" | "PARTIAL" | "PENDING"
            | "RENDERING" => Tier::Warning,
            _ => Tier::Critical,
        }
    }
}

/// Colour for a market regime label.
pub fn regime_color(label: &str) -> Color {
    match label.to_ascii_uppercase().as_str() {
        "GROWTH" | "RISK_ON" => Color::Green,
        "DEFENSIVE" | "RISK_OFF" | "NEUTRAL" | "TRANSITION" => Color::Yellow,
        "CRISIS" => Color::Red,
        _ => Color::White,
    }
}

/// Truncates `text` to at most `width` characters, ending in `...` when cut.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width <= 3 {
        return ".".repeat(width);
    }
    let mut out: String = text.chars().take(width - 3).collect();
    out.push_str("...");
    out
}

/// Fixed two-decimal value with an explicit sign.
pub fn signed(value: f64) -> String {
    format!("{:+.2}", value)
}

/// Signed money amount, e.g. `+$1234.56`.
pub fn signed_money(value: f64) -> String {
    let sign = if value < 0.0 { '-' } else { '+' };
    format!("{}${:.2}", sign, value.abs())
}

/// Ratio rendered as a signed percentage, e.g. `-4.20%`.
pub fn signed_pct(ratio: f64) -> String {
    format!("{:+.2}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_never_exceeds_width() {
        let text = "Transformer-Base with a rather long name";
        for width in 0..50 {
            let out = truncate(text, width);
            assert!(out.chars().count() <= width, "width {}", width);
            if width < text.len() && width > 3 {
                assert!(out.ends_with("..."));
            }
        }
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Apple Incorporated Holdings", 20), "Apple Incorporate...");
    }

    #[test]
    fn signed_values_carry_sign() {
        assert_eq!(signed(1.5), "+1.50");
        assert_eq!(signed(-0.25), "-0.25");
        assert_eq!(signed_money(1234.56), "+$1234.56");
        assert_eq!(signed_money(-450.0), "-$450.00");
        assert_eq!(signed_pct(-0.042), "-4.20%");
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(Tier::above(0.872, 0.7, 0.5), Tier::Good);
        assert_eq!(Tier::above(0.6, 0.7, 0.5), Tier::Warning);
        assert_eq!(Tier::above(0.5, 0.7, 0.5), Tier::Critical);
        assert_eq!(Tier::below(0.42, 0.5, 0.75), Tier::Good);
        assert_eq!(Tier::below(0.89, 0.5, 0.75), Tier::Critical);
        assert_eq!(Tier::from_status("partial"), Tier::Warning);
        assert_eq!(Tier::from_status("FAILED"), Tier::Critical);
    }
}
