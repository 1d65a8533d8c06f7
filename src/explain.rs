//! Plain-text description of a configuration
//!
//! Regenerated by the host whenever the configuration changes and again when
//! a run settles.

use std::f64::consts::PI;

use crate::sim::StartConfig;
use crate::sim::collision::reduced_mass;

/// Describe what a run with `config` will do and which physics drives it.
pub fn explain(config: &StartConfig) -> String {
    let mut out = String::from("Physics explanation\n\n");
    let (m1, m2) = (config.mass1, config.mass2);
    let ratio = config.mass_ratio();

    if let (Some(forced), Some(expected), Some(digits)) = (
        config.pi_mode.mass_ratio(),
        config.pi_mode.expected_collisions(),
        config.pi_mode.pi_digits(),
    ) {
        out.push_str(&format!(
            "Pi mode {}: the heavy block is {forced}:1 the mass of the light one. \
             The run should end after exactly {expected} collisions, the digits of pi {digits}.\n",
            config.pi_mode.get()
        ));
        out.push_str(&format!(
            "Both momentum and kinetic energy are conserved. When block 1 ({m1}) meets block 2 ({m2}):\n  \
             v1' = ((m1 - m2)v1 + 2 m2 v2) / (m1 + m2)\n"
        ));
        out.push_str(&format!(
            "The light block rattles between the heavy block and the wall, and every hit \
             changes the heavy block's velocity by about {:.6} times the light block's velocity.\n",
            2.0 * m2 / (m1 + m2)
        ));
    } else {
        out.push_str(&format!(
            "Free mode: block 1 weighs {m1} and block 2 weighs {m2}, a mass ratio of {ratio:.2}:1.\n"
        ));
        if ratio > 100.0 {
            out.push_str(&format!(
                "The mass gap is large enough for the pi pattern: the light block bounces \
                 between the heavy block and the wall many times before the heavy block turns back. \
                 Expect about {} collisions (pi * sqrt(M/m)).\n",
                (PI * ratio.sqrt()).floor()
            ));
        } else if ratio > 10.0 {
            out.push_str(
                "A moderate ratio: block 1 visibly slows on every hit while block 2 \
                 rebounds with most of its speed.\n",
            );
        } else {
            out.push_str(
                "The masses are close, so the blocks trade most of their velocity on every hit.\n",
            );
        }
        out.push_str(
            "Collisions are perfectly elastic:\n  \
             v1' = ((m1 - m2)v1 + 2 m2 v2) / (m1 + m2)\n  \
             v2' = ((m2 - m1)v2 + 2 m1 v1) / (m1 + m2)\n",
        );
    }

    out.push_str(&format!(
        "Impact force uses the reduced mass: F = mu * |dv| with mu = m1 m2 / (m1 + m2) = {:.4}.",
        reduced_mass(m1, m2)
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pi_mode_mentions_expected_count() {
        let text = explain(&StartConfig::pi(3).unwrap());
        assert!(text.contains("Pi mode 3"));
        assert!(text.contains("10000:1"));
        assert!(text.contains("314 collisions"));
        assert!(text.contains("3.14"));
        assert!(text.contains("reduced mass"));
    }

    #[test]
    fn free_mode_estimates_count_for_large_ratios() {
        let config = StartConfig {
            mass1: 400.0,
            mass2: 1.0,
            ..Default::default()
        };
        let text = explain(&config);
        assert!(text.contains("400.00:1"));
        // floor(pi * 20)
        assert!(text.contains("about 62 collisions"));
        assert!(text.contains("v2' ="));
    }

    #[test]
    fn free_mode_ratio_bands() {
        let moderate = StartConfig {
            mass1: 50.0,
            mass2: 1.0,
            ..Default::default()
        };
        assert!(explain(&moderate).contains("moderate ratio"));

        let similar = StartConfig {
            mass1: 2.0,
            mass2: 1.0,
            ..Default::default()
        };
        let text = explain(&similar);
        assert!(text.contains("masses are close"));
        assert!(!text.contains("sqrt"));
    }
}
