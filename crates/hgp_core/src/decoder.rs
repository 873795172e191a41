use crate::gf2::BitMatrix;
use crate::graph::TannerGraph;
use crate::{HgpError, Result};
use tracing::{debug, trace};

// Priors are clamped into [EPS, 1 - EPS] before conversion to LLRs.
const PRIOR_EPS: f64 = 1e-10;
// Bound on |prod tanh| so that atanh stays finite.
const TANH_CLAMP: f64 = 1.0 - 1e-15;

pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Check-node update rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BpMethod {
    /// Exact sum-product rule, `2·atanh(∏ tanh(m/2))`.
    #[default]
    ProductSum,
    /// Min-sum approximation, `α·∏ sign(m)·min |m|`.
    MinSum,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BpConfig {
    pub method: BpMethod,
    /// Hard bound on message-passing rounds. Zero only tests the prior.
    pub max_iterations: usize,
    /// Scaling factor `α` applied to min-sum check messages.
    pub min_sum_scaling: f64,
}

impl Default for BpConfig {
    fn default() -> Self {
        Self {
            method: BpMethod::ProductSum,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            min_sum_scaling: 1.0,
        }
    }
}

/// Result of a single decode call.
///
/// When `converged` is false, `error` is the hard decision of the final
/// round and does not reproduce the syndrome.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeOutcome {
    pub error: Vec<u8>,
    pub converged: bool,
    /// Rounds run; 0 if the prior decision already matched.
    pub iterations: usize,
    pub posterior_llrs: Vec<f64>,
}

impl DecodeOutcome {
    pub fn weight(&self) -> usize {
        self.error.iter().filter(|&&b| b == 1).count()
    }
}

fn prob_to_llr(p: f64) -> f64 {
    let p = p.clamp(PRIOR_EPS, 1.0 - PRIOR_EPS);
    ((1.0 - p) / p).ln()
}

fn validate_probability(p: f64) -> Result<()> {
    if p.is_finite() && p > 0.0 && p < 1.0 {
        Ok(())
    } else {
        Err(HgpError::Validation(format!(
            "error probability {} is outside (0, 1)",
            p
        )))
    }
}

/// Flooding-schedule belief-propagation decoder bound to one Tanner graph.
///
/// The decoder holds only immutable data; every call to
/// [`BpDecoder::decode`] allocates its own message buffers, so a single
/// decoder can serve concurrent calls with different syndromes.
#[derive(Clone, Debug)]
pub struct BpDecoder<'g> {
    graph: &'g TannerGraph,
    prior_llrs: Vec<f64>,
    config: BpConfig,
}

impl<'g> BpDecoder<'g> {
    /// Creates a decoder for an independent channel with per-bit error
    /// probability `p`, which must lie strictly between 0 and 1.
    pub fn new(graph: &'g TannerGraph, p: f64, config: BpConfig) -> Result<Self> {
        validate_probability(p)?;
        Ok(Self {
            graph,
            prior_llrs: vec![prob_to_llr(p); graph.num_bits()],
            config,
        })
    }

    /// Creates a decoder with one error probability per bit.
    pub fn with_priors(graph: &'g TannerGraph, priors: &[f64], config: BpConfig) -> Result<Self> {
        if priors.len() != graph.num_bits() {
            return Err(HgpError::Validation(format!(
                "{} priors supplied for {} bits",
                priors.len(),
                graph.num_bits()
            )));
        }
        for &p in priors {
            validate_probability(p)?;
        }
        Ok(Self {
            graph,
            prior_llrs: priors.iter().map(|&p| prob_to_llr(p)).collect(),
            config,
        })
    }

    pub fn graph(&self) -> &TannerGraph {
        self.graph
    }

    pub fn config(&self) -> &BpConfig {
        &self.config
    }

    /// Estimates an error vector reproducing `syndrome`.
    ///
    /// Runs at most `max_iterations` flooding rounds. After the prior and
    /// after every round the hard decision (bit is 1 iff its posterior LLR
    /// is negative) is checked against the syndrome and the decoder stops
    /// at the first match.
    ///
    /// # Returns
    ///
    /// The outcome, [`HgpError::InvalidSyndrome`] if the syndrome length
    /// differs from the number of checks, or [`HgpError::Validation`] if it
    /// contains a value other than 0 or 1. Running out of iterations is not
    /// an error.
    pub fn decode(&self, syndrome: &[u8]) -> Result<DecodeOutcome> {
        let graph = self.graph;
        if syndrome.len() != graph.num_checks() {
            return Err(HgpError::InvalidSyndrome {
                expected: graph.num_checks(),
                found: syndrome.len(),
            });
        }
        if let Some(pos) = syndrome.iter().position(|&s| s > 1) {
            return Err(HgpError::Validation(format!(
                "syndrome entry {} is {}, expected 0 or 1",
                pos, syndrome[pos]
            )));
        }

        let num_edges = graph.num_edges();
        let mut bit_to_check: Vec<f64> = (0..num_edges)
            .map(|e| self.prior_llrs[graph.edge(e).1])
            .collect();
        let mut check_to_bit = vec![0.0f64; num_edges];
        let mut posterior = self.prior_llrs.clone();
        let mut error = hard_decision(&posterior);

        if graph.syndrome_of(&error) == syndrome {
            return Ok(self.finish(error, true, 0, posterior));
        }

        // Scratch for exclusive tanh products, sized to the largest check.
        let max_degree = (0..graph.num_checks())
            .map(|c| graph.check_degree(c))
            .max()
            .unwrap_or(0);
        let mut prefix = vec![0.0f64; max_degree + 1];

        for iteration in 1..=self.config.max_iterations {
            for c in 0..graph.num_checks() {
                let range = graph.edges_of_check(c);
                let sign = if syndrome[c] == 1 { -1.0 } else { 1.0 };
                let incoming = &bit_to_check[range.clone()];
                let outgoing = &mut check_to_bit[range];
                match self.config.method {
                    BpMethod::ProductSum => {
                        product_sum_check(incoming, outgoing, sign, &mut prefix)
                    }
                    BpMethod::MinSum => {
                        min_sum_check(incoming, outgoing, sign * self.config.min_sum_scaling)
                    }
                }
            }

            for b in 0..graph.num_bits() {
                let edges = graph.edges_of_bit(b);
                let total = self.prior_llrs[b]
                    + edges
                        .iter()
                        .map(|&e| check_to_bit[e as usize])
                        .sum::<f64>();
                posterior[b] = total;
                for &e in edges {
                    bit_to_check[e as usize] = total - check_to_bit[e as usize];
                }
            }

            error = hard_decision(&posterior);
            let satisfied = graph.syndrome_of(&error) == syndrome;
            trace!(iteration, satisfied, "bp round");
            if satisfied {
                return Ok(self.finish(error, true, iteration, posterior));
            }
        }

        Ok(self.finish(error, false, self.config.max_iterations, posterior))
    }

    fn finish(
        &self,
        error: Vec<u8>,
        converged: bool,
        iterations: usize,
        posterior_llrs: Vec<f64>,
    ) -> DecodeOutcome {
        debug!(converged, iterations, "bp decode finished");
        DecodeOutcome {
            error,
            converged,
            iterations,
            posterior_llrs,
        }
    }
}

fn hard_decision(llrs: &[f64]) -> Vec<u8> {
    llrs.iter().map(|&l| (l < 0.0) as u8).collect()
}

/// Sum-product check update using prefix/suffix products, so that no
/// division by a (possibly zero) tanh is needed.
fn product_sum_check(incoming: &[f64], outgoing: &mut [f64], sign: f64, prefix: &mut [f64]) {
    let degree = incoming.len();
    prefix[0] = 1.0;
    for k in 0..degree {
        prefix[k + 1] = prefix[k] * (incoming[k] / 2.0).tanh();
    }
    let mut suffix = 1.0;
    for k in (0..degree).rev() {
        let excl = (prefix[k] * suffix).clamp(-TANH_CLAMP, TANH_CLAMP);
        outgoing[k] = sign * 2.0 * excl.atanh();
        suffix *= (incoming[k] / 2.0).tanh();
    }
}

fn min_sum_check(incoming: &[f64], outgoing: &mut [f64], scale: f64) {
    let mut sign_product = 1.0;
    let mut min1 = f64::MAX;
    let mut min2 = f64::MAX;
    let mut min_idx = 0;
    for (k, &m) in incoming.iter().enumerate() {
        sign_product *= m.signum();
        let a = m.abs();
        if a < min1 {
            min2 = min1;
            min1 = a;
            min_idx = k;
        } else if a < min2 {
            min2 = a;
        }
    }
    for (k, out) in outgoing.iter_mut().enumerate() {
        let magnitude = if k == min_idx { min2 } else { min1 };
        // A degree-1 check has no other neighbours to combine.
        let magnitude = if magnitude == f64::MAX { 0.0 } else { magnitude };
        *out = scale * sign_product * incoming[k].signum() * magnitude;
    }
}

/// Decodes one syndrome against a check matrix.
///
/// Convenience wrapper that builds the Tanner graph of `h` and runs the
/// default sum-product decoder with the given iteration bound. Callers
/// decoding many syndromes against the same matrix should build a
/// [`TannerGraph`] and [`BpDecoder`] once instead.
pub fn bp_decode(
    h: &BitMatrix,
    syndrome: &[u8],
    p: f64,
    max_iterations: usize,
) -> Result<DecodeOutcome> {
    if syndrome.len() != h.row_count() {
        return Err(HgpError::InvalidSyndrome {
            expected: h.row_count(),
            found: syndrome.len(),
        });
    }
    let graph = TannerGraph::from_matrix(h);
    let config = BpConfig {
        max_iterations,
        ..BpConfig::default()
    };
    BpDecoder::new(&graph, p, config)?.decode(syndrome)
}
