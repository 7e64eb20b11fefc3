//! The Plackett–Luce ranked update (Weng & Lin, 2011), specialized to
//! single-competitor teams.
//!
//! One contest's finish order is treated as a single ranked match. The
//! update moves each competitor's mean toward the observed order and
//! shrinks every participant's uncertainty, bounded below by `kappa` so
//! sigma never collapses to zero.

/// A competitor's belief paired with their finish rank for one contest.
/// Lower rank is a better finish.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RankedBelief {
    pub mu: f64,
    pub sigma: f64,
    pub rank: u32,
}

/// Applies one Plackett–Luce update in place.
pub(crate) fn update(beliefs: &mut [RankedBelief], beta: f64, kappa: f64) {
    let n = beliefs.len();
    if n < 2 {
        // A single-entrant contest carries no ranking information.
        return;
    }

    let beta_sq = beta * beta;
    let c = beliefs
        .iter()
        .map(|b| b.sigma * b.sigma + beta_sq)
        .sum::<f64>()
        .sqrt();

    // exp(mu_i / c), the Plackett–Luce strength of each competitor.
    let strengths: Vec<f64> = beliefs.iter().map(|b| (b.mu / c).exp()).collect();

    // For each position q: the combined strength of everyone who finished
    // at q's rank or worse.
    let tail_strength: Vec<f64> = beliefs
        .iter()
        .map(|q| {
            beliefs
                .iter()
                .zip(&strengths)
                .filter(|(other, _)| other.rank >= q.rank)
                .map(|(_, s)| *s)
                .sum()
        })
        .collect();

    // How many competitors share each position's rank.
    let tie_counts: Vec<f64> = beliefs
        .iter()
        .map(|q| beliefs.iter().filter(|other| other.rank == q.rank).count() as f64)
        .collect();

    let updated: Vec<(f64, f64)> = beliefs
        .iter()
        .enumerate()
        .map(|(i, belief)| {
            let sigma_sq = belief.sigma * belief.sigma;
            let mut omega = 0.0;
            let mut delta = 0.0;

            for q in 0..n {
                // Only positions that finished at our rank or better
                // contribute to our update.
                if beliefs[q].rank > belief.rank {
                    continue;
                }
                let p = strengths[i] / tail_strength[q];
                if q == i {
                    omega += (1.0 - p) / tie_counts[q];
                } else {
                    omega -= p / tie_counts[q];
                }
                delta += p * (1.0 - p) / tie_counts[q];
            }

            let gamma = belief.sigma / c;
            let mu = belief.mu + (sigma_sq / c) * omega;
            let shrink = 1.0 - gamma * (sigma_sq / (c * c)) * delta;
            let sigma = belief.sigma * shrink.max(kappa).sqrt();
            (mu, sigma)
        })
        .collect();

    for (belief, (mu, sigma)) in beliefs.iter_mut().zip(updated) {
        belief.mu = mu;
        belief.sigma = sigma;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BETA: f64 = 25.0 / 6.0;
    const KAPPA: f64 = 0.0001;

    fn default_belief(rank: u32) -> RankedBelief {
        RankedBelief {
            mu: 25.0,
            sigma: 25.0 / 3.0,
            rank,
        }
    }

    #[test]
    fn head_to_head_matches_reference_values() {
        // Two default-prior competitors, one decisive result. The winner
        // lands at mu ~= 27.635 and both shrink to sigma ~= 8.0655.
        let mut beliefs = vec![default_belief(1), default_belief(2)];
        update(&mut beliefs, BETA, KAPPA);

        assert!((beliefs[0].mu - 27.6353).abs() < 1e-3);
        assert!((beliefs[1].mu - 22.3647).abs() < 1e-3);
        assert!((beliefs[0].sigma - 8.0655).abs() < 1e-3);
        assert!((beliefs[1].sigma - 8.0655).abs() < 1e-3);
    }

    #[test]
    fn update_is_zero_sum_for_symmetric_priors() {
        let mut beliefs = vec![default_belief(1), default_belief(2), default_belief(3)];
        update(&mut beliefs, BETA, KAPPA);

        let total_mu: f64 = beliefs.iter().map(|b| b.mu).sum();
        assert!((total_mu - 75.0).abs() < 1e-9);
    }

    #[test]
    fn mu_tracks_finish_order() {
        let mut beliefs = vec![
            default_belief(1),
            default_belief(2),
            default_belief(3),
            default_belief(4),
        ];
        update(&mut beliefs, BETA, KAPPA);

        for pair in beliefs.windows(2) {
            assert!(pair[0].mu > pair[1].mu);
        }
    }

    #[test]
    fn sigma_shrinks_for_every_participant() {
        let mut beliefs = vec![default_belief(1), default_belief(2), default_belief(3)];
        update(&mut beliefs, BETA, KAPPA);

        for belief in &beliefs {
            assert!(belief.sigma > 0.0);
            assert!(belief.sigma < 25.0 / 3.0);
        }
    }

    #[test]
    fn tied_ranks_share_the_update() {
        let mut beliefs = vec![default_belief(1), default_belief(1), default_belief(2)];
        update(&mut beliefs, BETA, KAPPA);

        // The two tied leaders come out identical.
        assert!((beliefs[0].mu - beliefs[1].mu).abs() < 1e-12);
        assert!((beliefs[0].sigma - beliefs[1].sigma).abs() < 1e-12);
        assert!(beliefs[0].mu > beliefs[2].mu);
    }

    #[test]
    fn single_entrant_is_left_untouched() {
        let mut beliefs = vec![default_belief(1)];
        update(&mut beliefs, BETA, KAPPA);

        assert_eq!(beliefs[0].mu, 25.0);
        assert_eq!(beliefs[0].sigma, 25.0 / 3.0);
    }

    #[test]
    fn kappa_keeps_sigma_positive_under_repeated_updates() {
        let mut beliefs = vec![default_belief(1), default_belief(2)];
        for _ in 0..10_000 {
            beliefs[0].rank = 1;
            beliefs[1].rank = 2;
            update(&mut beliefs, BETA, KAPPA);
        }
        assert!(beliefs[0].sigma > 0.0);
        assert!(beliefs[1].sigma > 0.0);
    }
}
