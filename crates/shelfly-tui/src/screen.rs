//! Screen trait and screen identifier enum.

use std::fmt;

/// Identifies each primary TUI screen, navigable by number keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Dashboard, // 1
    TodaysBooks, // 2
    ComingSoon, // 3
    /// Sign-in gate — not in the tab bar, shown whenever the session
    /// is absent.
    SignIn,
}

impl ScreenId {
    /// All screens in tab-bar order. SignIn is the gate, not a tab.
    pub const ALL: [ScreenId; 3] = [Self::Dashboard, Self::TodaysBooks, Self::ComingSoon];

    /// Whether this screen requires a signed-in session.
    pub fn protected(self) -> bool {
        self != Self::SignIn
    }

    /// Numeric key (1-3) for this screen. SignIn has no number key.
    pub fn number(self) -> u8 {
        match self {
            Self::Dashboard => 1,
            Self::TodaysBooks => 2,
            Self::ComingSoon => 3,
            Self::SignIn => 0,
        }
    }

    /// Screen from a numeric key (1-3). Returns None for out-of-range.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Dashboard),
            2 => Some(Self::TodaysBooks),
            3 => Some(Self::ComingSoon),
            _ => None,
        }
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Short label for the tab bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::TodaysBooks => "Added Today",
            Self::ComingSoon => "Coming Soon",
            Self::SignIn => "Sign In",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
