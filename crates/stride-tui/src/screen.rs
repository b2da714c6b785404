//! Screen trait and screen identifier enum.

use std::fmt;

/// Identifies each primary TUI screen, navigable by number keys 1-4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Members, // 1
    Records,  // 2
    Groups,   // 3
    Settings, // 4
}

impl ScreenId {
    /// All screens in tab-bar order.
    pub const ALL: [ScreenId; 4] = [Self::Members, Self::Records, Self::Groups, Self::Settings];

    /// Numeric key (1-4) for this screen.
    pub fn number(self) -> u8 {
        match self {
            Self::Members => 1,
            Self::Records => 2,
            Self::Groups => 3,
            Self::Settings => 4,
        }
    }

    /// Screen from a numeric key (1-4). Returns None for out-of-range.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Members),
            2 => Some(Self::Records),
            3 => Some(Self::Groups),
            4 => Some(Self::Settings),
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
            Self::Members => "Members",
            Self::Records => "Records",
            Self::Groups => "Groups",
            Self::Settings => "Settings",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
