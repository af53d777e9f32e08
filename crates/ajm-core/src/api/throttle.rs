//! Admission pressure pair.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pressure reported for the two admission scopes, each roughly 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThrottlePressure {
    /// Application-scope pressure.
    pub app: f64,
    /// Account-scope pressure.
    pub account: f64,
}

impl ThrottlePressure {
    pub fn new(app: f64, account: f64) -> Self {
        Self { app, account }
    }

    /// Value used for admission decisions: the smaller of the two scopes.
    ///
    /// The account scope can sit at 100 long after capacity has freed up, so
    /// the more optimistic reading wins.
    pub fn effective(&self) -> f64 {
        self.app.min(self.account)
    }
}

impl fmt::Display for ThrottlePressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(app {:.1}, account {:.1})", self.app, self.account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_is_min_of_scopes() {
        assert_eq!(ThrottlePressure::new(10.0, 100.0).effective(), 10.0);
        assert_eq!(ThrottlePressure::new(95.0, 40.0).effective(), 40.0);
        assert_eq!(ThrottlePressure::new(70.0, 70.0).effective(), 70.0);
    }

    #[test]
    fn display_shows_both_scopes() {
        assert_eq!(
            ThrottlePressure::new(12.0, 99.5).to_string(),
            "(app 12.0, account 99.5)"
        );
    }
}
