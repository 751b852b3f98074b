/// Easing curves for the timer animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    Linear,
    OutCubic,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        for ease in [Ease::Linear, Ease::OutCubic] {
            assert_eq!(ease.apply(0.0), 0.0);
            assert_eq!(ease.apply(1.0), 1.0);
        }
    }

    #[test]
    fn out_of_range_input_clamps() {
        assert_eq!(Ease::OutCubic.apply(-1.0), 0.0);
        assert_eq!(Ease::OutCubic.apply(2.0), 1.0);
    }

    #[test]
    fn out_cubic_leads_linear_mid_curve() {
        for t in [0.1, 0.25, 0.5, 0.75, 0.9] {
            assert!(Ease::OutCubic.apply(t) > Ease::Linear.apply(t));
        }
    }

    #[test]
    fn monotonic_spot_check() {
        let a = Ease::OutCubic.apply(0.25);
        let b = Ease::OutCubic.apply(0.5);
        let c = Ease::OutCubic.apply(0.75);
        assert!(a < b);
        assert!(b < c);
    }
}
