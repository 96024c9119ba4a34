//! Configurable bit-string operators for GA drivers.
//!
//! Crossover works on raw gene buffers and returns child buffers for
//! [`BitChromosome::from_genes`], which evaluates them. Mutation flips
//! bits in place and leaves re-evaluation to the caller.
//!
//! # Usage
//!
//! ```
//! use u_rcpsp::ga::operators::{CrossoverType, GeneticOperators};
//!
//! let ops = GeneticOperators::default();
//! assert_eq!(ops.crossover_type, CrossoverType::OnePoint);
//! assert!(ops.mutation_rate > 0.0);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::BitChromosome;
use crate::error::{RcpspError, Result};

/// Crossover strategy for bit-string chromosomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossoverType {
    /// Single cut point; heads and tails are exchanged.
    OnePoint,
    /// Each bit is taken from either parent with probability 1/2.
    Uniform,
}

/// Runtime-selectable operators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticOperators {
    /// Crossover strategy.
    pub crossover_type: CrossoverType,
    /// Per-bit flip probability.
    pub mutation_rate: f64,
}

impl Default for GeneticOperators {
    fn default() -> Self {
        Self {
            crossover_type: CrossoverType::OnePoint,
            mutation_rate: 0.01,
        }
    }
}

impl GeneticOperators {
    /// Performs crossover using the configured strategy.
    pub fn crossover<R: Rng>(
        &self,
        a: &BitChromosome,
        b: &BitChromosome,
        rng: &mut R,
    ) -> Result<(Vec<bool>, Vec<bool>)> {
        match self.crossover_type {
            CrossoverType::OnePoint => one_point_crossover(a.genes(), b.genes(), rng),
            CrossoverType::Uniform => uniform_crossover(a.genes(), b.genes(), rng),
        }
    }

    /// Flips bits at the configured rate and re-evaluates if anything changed.
    ///
    /// Returns the number of flipped bits.
    pub fn mutate<R: Rng>(&self, chromosome: &mut BitChromosome, rng: &mut R) -> Result<usize> {
        let flips = bit_flip_mutation(chromosome, self.mutation_rate, rng)?;
        if flips > 0 {
            chromosome.evaluate()?;
        }
        Ok(flips)
    }
}

fn check_lengths(a: &[bool], b: &[bool]) -> Result<()> {
    if a.len() != b.len() {
        return Err(RcpspError::InvalidGeneLength {
            expected: a.len(),
            actual: b.len(),
        });
    }
    Ok(())
}

/// One-point crossover: children swap tails after a random cut.
pub fn one_point_crossover<R: Rng>(
    a: &[bool],
    b: &[bool],
    rng: &mut R,
) -> Result<(Vec<bool>, Vec<bool>)> {
    check_lengths(a, b)?;
    if a.len() < 2 {
        return Ok((a.to_vec(), b.to_vec()));
    }
    let cut = rng.random_range(1..a.len());

    let mut c1 = a[..cut].to_vec();
    c1.extend_from_slice(&b[cut..]);
    let mut c2 = b[..cut].to_vec();
    c2.extend_from_slice(&a[cut..]);
    Ok((c1, c2))
}

/// Uniform crossover: each position is swapped with probability 1/2.
pub fn uniform_crossover<R: Rng>(
    a: &[bool],
    b: &[bool],
    rng: &mut R,
) -> Result<(Vec<bool>, Vec<bool>)> {
    check_lengths(a, b)?;
    let (mut c1, mut c2) = (a.to_vec(), b.to_vec());
    for i in 0..a.len() {
        if rng.random_bool(0.5) {
            std::mem::swap(&mut c1[i], &mut c2[i]);
        }
    }
    Ok((c1, c2))
}

/// Flips each bit with probability `rate`. Does not re-evaluate.
///
/// `rate` is clamped to `[0, 1]`; a NaN or infinite rate flips nothing.
/// Returns the number of flipped bits.
pub fn bit_flip_mutation<R: Rng>(
    chromosome: &mut BitChromosome,
    rate: f64,
    rng: &mut R,
) -> Result<usize> {
    let rate = if rate.is_finite() {
        rate.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut flips = 0;
    for index in 0..chromosome.len() {
        if rng.random_bool(rate) {
            chromosome.flip_gene(index)?;
            flips += 1;
        }
    }
    Ok(flips)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Element, Problem, Task};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::sync::Arc;

    fn sample_problem() -> Arc<Problem> {
        Arc::new(
            Problem::new(
                vec![
                    Task::new("A", 10, "dev"),
                    Task::new("B", 20, "dev").with_precedence(0),
                    Task::new("C", 15, "qa"),
                    Task::new("D", 5, "qa").with_precedences([1, 2]),
                ],
                vec![
                    Element::new("E1").with_skill("dev", 1.0),
                    Element::new("E2").with_skill("dev", 0.5).with_skill("qa", 1.0),
                    Element::new("E3").with_skill("qa", 2.0),
                ],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_one_point_crossover() {
        let a = vec![true; 10];
        let b = vec![false; 10];
        let mut rng = SmallRng::seed_from_u64(42);
        let (c1, c2) = one_point_crossover(&a, &b, &mut rng).unwrap();

        assert_eq!(c1.len(), 10);
        let cut = c1.iter().position(|&x| !x).unwrap();
        assert!(cut >= 1);
        assert!(c1[..cut].iter().all(|&x| x) && c1[cut..].iter().all(|&x| !x));
        assert!(c2[..cut].iter().all(|&x| !x) && c2[cut..].iter().all(|&x| x));
    }

    #[test]
    fn test_uniform_crossover_complements() {
        let a = vec![true; 32];
        let b = vec![false; 32];
        let mut rng = SmallRng::seed_from_u64(42);
        let (c1, c2) = uniform_crossover(&a, &b, &mut rng).unwrap();
        assert!(c1.iter().zip(&c2).all(|(x, y)| x != y));
    }

    #[test]
    fn test_crossover_length_mismatch() {
        let mut rng = SmallRng::seed_from_u64(42);
        let err = one_point_crossover(&[true; 4], &[true; 5], &mut rng).unwrap_err();
        assert!(matches!(err, RcpspError::InvalidGeneLength { .. }));
    }

    #[test]
    fn test_children_evaluate() {
        let p = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let a = BitChromosome::random(p.clone(), &mut rng).unwrap();
        let b = BitChromosome::random(p.clone(), &mut rng).unwrap();

        for crossover_type in [CrossoverType::OnePoint, CrossoverType::Uniform] {
            let ops = GeneticOperators {
                crossover_type,
                ..GeneticOperators::default()
            };
            let (g1, g2) = ops.crossover(&a, &b, &mut rng).unwrap();
            for genes in [g1, g2] {
                let child = BitChromosome::from_genes(p.clone(), genes).unwrap();
                assert!(child.fitness() > 0);
                assert!(child.schedule().unwrap().is_feasible(&p));
            }
        }
    }

    #[test]
    fn test_bit_flip_mutation_rates() {
        let p = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut ch = BitChromosome::random(p, &mut rng).unwrap();
        let before = ch.genes().to_vec();

        assert_eq!(bit_flip_mutation(&mut ch, 0.0, &mut rng).unwrap(), 0);
        assert_eq!(ch.genes(), before.as_slice());

        let len = ch.len();
        assert_eq!(bit_flip_mutation(&mut ch, 1.0, &mut rng).unwrap(), len);
        assert!(ch.genes().iter().zip(&before).all(|(x, y)| x != y));
    }

    #[test]
    fn test_non_finite_rate_flips_nothing() {
        let p = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut ch = BitChromosome::random(p, &mut rng).unwrap();
        let before = ch.genes().to_vec();

        for rate in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert_eq!(bit_flip_mutation(&mut ch, rate, &mut rng).unwrap(), 0);
        }
        assert_eq!(ch.genes(), before.as_slice());

        let ops = GeneticOperators {
            mutation_rate: f64::NAN,
            ..GeneticOperators::default()
        };
        assert_eq!(ops.mutate(&mut ch, &mut rng).unwrap(), 0);
    }

    #[test]
    fn test_mutate_reevaluates() {
        let p = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let mut ch = BitChromosome::random(p.clone(), &mut rng).unwrap();
        let ops = GeneticOperators {
            mutation_rate: 0.3,
            ..GeneticOperators::default()
        };

        ops.mutate(&mut ch, &mut rng).unwrap();
        let fresh = BitChromosome::from_genes(p, ch.genes().to_vec()).unwrap();
        assert_eq!(ch.fitness(), fresh.fitness());
    }

    #[test]
    fn test_operators_from_json() {
        let ops: GeneticOperators =
            serde_json::from_str(r#"{ "crossover_type": "uniform" }"#).unwrap();
        assert_eq!(ops.crossover_type, CrossoverType::Uniform);
        assert!((ops.mutation_rate - 0.01).abs() < 1e-12);
    }
}
