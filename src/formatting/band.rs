use colored::Color;

/// Severity band of a normalized score, driving display emphasis.
///
/// - **Low** (< 0.5)
/// - **Mid** (0.5 to 0.75, both included)
/// - **High** (> 0.75)
///
/// # Examples
///
/// ```
/// use scoretree::formatting::Band;
///
/// assert_eq!(Band::from_score(0.49), Band::Low);
/// assert_eq!(Band::from_score(0.75), Band::Mid);
/// assert_eq!(Band::from_score(0.76), Band::High);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Band {
    Low,
    Mid,
    High,
}

impl Band {
    /// Pure function: score → band
    ///
    /// Scores outside [0, 1] fall into the nearest band. NaN is `Low`.
    #[inline]
    pub fn from_score(score: f64) -> Self {
        if score > 0.75 {
            Self::High
        } else if score >= 0.5 {
            Self::Mid
        } else {
            Self::Low
        }
    }

    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Mid => "MID",
            Self::Low => "LOW",
        }
    }

    /// Returns the terminal color for this band.
    ///
    /// ```
    /// use scoretree::formatting::Band;
    /// use colored::Color;
    ///
    /// assert_eq!(Band::Low.color(), Color::Red);
    /// assert_eq!(Band::Mid.color(), Color::Yellow);
    /// assert_eq!(Band::High.color(), Color::Green);
    /// ```
    #[inline]
    pub const fn color(self) -> Color {
        match self {
            Self::High => Color::Green,
            Self::Mid => Color::Yellow,
            Self::Low => Color::Red,
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
