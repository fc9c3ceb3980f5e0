use crate::SWIPE_THRESHOLD_FRACTION;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDecision {
    Accept,
    Reject,
    NoOp,
}

/// How far a card has to travel, relative to the viewport, before a release counts.
///
/// The comparison is strict: a release at exactly the threshold is a `NoOp`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeThreshold {
    fraction: f64,
}

impl SwipeThreshold {
    /// Fractions outside `(0, 1]` fall back to the default.
    pub fn new(fraction: f64) -> Self {
        if fraction.is_finite() && fraction > 0. && fraction <= 1. {
            Self { fraction }
        } else {
            log::warn!("Invalid swipe threshold {fraction}, using {SWIPE_THRESHOLD_FRACTION}");
            Self::default()
        }
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    pub fn distance(&self, viewport_width: f64) -> f64 {
        viewport_width * self.fraction
    }

    /// Maps the horizontal displacement at release to a decision.
    pub fn decide(&self, displacement: f64, viewport_width: f64) -> SwipeDecision {
        if !displacement.is_finite() || !viewport_width.is_finite() || viewport_width <= 0. {
            return SwipeDecision::NoOp;
        }

        let distance = self.distance(viewport_width);

        if displacement > distance {
            SwipeDecision::Accept
        } else if displacement < -distance {
            SwipeDecision::Reject
        } else {
            SwipeDecision::NoOp
        }
    }
}

impl Default for SwipeThreshold {
    fn default() -> Self {
        Self {
            fraction: SWIPE_THRESHOLD_FRACTION,
        }
    }
}

pub fn decide_swipe(displacement: f64, viewport_width: f64) -> SwipeDecision {
    SwipeThreshold::default().decide(displacement, viewport_width)
}
