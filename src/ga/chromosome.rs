//! Fixed-length bit-string chromosome for project scheduling.
//!
//! # Encoding
//!
//! `task_count` slots of `min_bits(task_count) + element_count` bits each.
//! A slot's task-ID field says which task comes next in the execution
//! order; its mask lists the elements preferred for that task. See
//! [`SlotLayout`] for the exact bit positions and [`crate::ga::decode`] for how
//! damaged encodings are repaired.
//!
//! # Fitness
//!
//! Fitness is the simulated makespan (lower = better schedule). It is
//! computed on construction and cached; after [`BitChromosome::flip_gene`]
//! the cached value is stale until [`BitChromosome::evaluate`] is called.

use std::cmp::Ordering;
use std::sync::Arc;

use rand::Rng;
use tracing::instrument;

use super::decoder::decode_slots;
use super::{DecodedGenes, SlotLayout, feasible_genes};
use crate::error::{RcpspError, Result};
use crate::models::{Problem, Schedule};
use crate::scheduler::{self, SimulationConfig};

/// Bit-string chromosome with a cached makespan.
///
/// Cloning is a deep copy of the genes and the cached fitness; the
/// problem is shared through its `Arc`.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use rand::SeedableRng;
/// use rand::rngs::SmallRng;
/// use u_rcpsp::ga::BitChromosome;
/// use u_rcpsp::models::{Element, Problem, Task};
///
/// let problem = Arc::new(
///     Problem::new(
///         vec![
///             Task::new("A", 10, "dev"),
///             Task::new("B", 10, "dev"),
///             Task::new("C", 10, "dev"),
///         ],
///         vec![Element::new("E1").with_skill("dev", 1.0)],
///     )
///     .unwrap(),
/// );
/// let mut rng = SmallRng::seed_from_u64(42);
/// let chromosome = BitChromosome::random(problem, &mut rng).unwrap();
/// assert_eq!(chromosome.len(), 3 * (2 + 1));
/// assert_eq!(chromosome.fitness(), 30);
/// ```
#[derive(Debug, Clone)]
pub struct BitChromosome {
    genes: Vec<bool>,
    fitness: i64,
    layout: SlotLayout,
    problem: Arc<Problem>,
    config: SimulationConfig,
}

impl BitChromosome {
    /// Creates a chromosome encoding a random precedence-feasible order,
    /// with random resource preferences, and evaluates it.
    pub fn random<R: Rng>(problem: Arc<Problem>, rng: &mut R) -> Result<Self> {
        Self::random_with_config(problem, SimulationConfig::default(), rng)
    }

    /// Like [`random`](Self::random) with an explicit simulator configuration.
    #[instrument(level = "debug", skip_all, fields(tasks = problem.task_count(), elements = problem.element_count()))]
    pub fn random_with_config<R: Rng>(
        problem: Arc<Problem>,
        config: SimulationConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let layout = SlotLayout::new(problem.task_count(), problem.element_count());
        let genes = feasible_genes(&problem, &layout, rng)?;
        Self::build(problem, genes, layout, config)
    }

    /// Creates a chromosome from a raw bit string (e.g. a crossover child)
    /// and evaluates it.
    ///
    /// # Errors
    /// `InvalidGeneLength` if `genes` does not match the problem's layout,
    /// plus any simulation error.
    pub fn from_genes(problem: Arc<Problem>, genes: Vec<bool>) -> Result<Self> {
        Self::from_genes_with_config(problem, genes, SimulationConfig::default())
    }

    /// Like [`from_genes`](Self::from_genes) with an explicit simulator configuration.
    #[instrument(level = "debug", skip_all, fields(tasks = problem.task_count(), length = genes.len()))]
    pub fn from_genes_with_config(
        problem: Arc<Problem>,
        genes: Vec<bool>,
        config: SimulationConfig,
    ) -> Result<Self> {
        let layout = SlotLayout::new(problem.task_count(), problem.element_count());
        if genes.len() != layout.chromosome_length() {
            return Err(RcpspError::InvalidGeneLength {
                expected: layout.chromosome_length(),
                actual: genes.len(),
            });
        }
        Self::build(problem, genes, layout, config)
    }

    fn build(
        problem: Arc<Problem>,
        genes: Vec<bool>,
        layout: SlotLayout,
        config: SimulationConfig,
    ) -> Result<Self> {
        let mut chromosome = Self {
            genes,
            fitness: i64::MAX,
            layout,
            problem,
            config,
        };
        chromosome.evaluate()?;
        Ok(chromosome)
    }

    /// Cached makespan (lower = better).
    #[inline]
    pub fn fitness(&self) -> i64 {
        self.fitness
    }

    /// The raw bit string.
    pub fn genes(&self) -> &[bool] {
        &self.genes
    }

    /// Number of bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the chromosome has no bits (never true for a valid problem).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Slot geometry.
    pub fn layout(&self) -> &SlotLayout {
        &self.layout
    }

    /// The shared problem instance.
    pub fn problem(&self) -> &Arc<Problem> {
        &self.problem
    }

    /// Simulator configuration used by [`evaluate`](Self::evaluate).
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Toggles one bit. The cached fitness is stale until the next
    /// [`evaluate`](Self::evaluate).
    pub fn flip_gene(&mut self, index: usize) -> Result<()> {
        let length = self.genes.len();
        let bit = self
            .genes
            .get_mut(index)
            .ok_or(RcpspError::GeneIndexOutOfRange { index, length })?;
        *bit = !*bit;
        Ok(())
    }

    /// Decodes the genes into a task order and candidate lists.
    pub fn decode(&self) -> DecodedGenes {
        decode_slots(&self.genes, &self.layout)
    }

    /// Decodes and simulates, returning the full schedule.
    pub fn schedule(&self) -> Result<Schedule> {
        scheduler::simulate(&self.problem, &self.decode(), &self.config)
    }

    /// Re-runs decoding and simulation and refreshes the cached fitness.
    pub fn evaluate(&mut self) -> Result<i64> {
        let decoded = self.decode();
        if decoded.repaired() > 0 {
            tracing::debug!(repaired = decoded.repaired(), "Decoded genes needed repair");
        }
        self.fitness = scheduler::makespan(&self.problem, &decoded, &self.config)?;
        Ok(self.fitness)
    }

    /// Independent copy of the genes and cached fitness, sharing the problem.
    pub fn deep_copy(&self) -> Self {
        self.clone()
    }

    /// Ranks by fitness: the chromosome with the **higher** fitness
    /// (longer makespan) sorts first.
    ///
    /// This is the ordering GA drivers built against this encoding expect,
    /// even though makespan is minimized. Drivers that select "the first"
    /// chromosome after sorting must account for it.
    ///
    /// ```
    /// # use std::cmp::Ordering;
    /// # use std::sync::Arc;
    /// # use u_rcpsp::ga::BitChromosome;
    /// # use u_rcpsp::models::{Element, Problem, Task};
    /// let problem = Arc::new(Problem::new(
    ///     vec![Task::new("A", 10, "dev"), Task::new("B", 10, "dev")],
    ///     vec![Element::new("E1").with_skill("dev", 1.0), Element::new("E2").with_skill("dev", 1.0)],
    /// ).unwrap());
    /// // slot = [id | e0 e1]; both tasks on E1 vs. one task per element
    /// let serial = BitChromosome::from_genes(problem.clone(), vec![false, true, false, true, true, false]).unwrap();
    /// let parallel = BitChromosome::from_genes(problem, vec![false, true, false, true, false, true]).unwrap();
    /// assert!(serial.fitness() > parallel.fitness());
    /// assert_eq!(serial.compare(&parallel), Ordering::Less);
    /// ```
    pub fn compare(&self, other: &Self) -> Ordering {
        other.fitness.cmp(&self.fitness)
    }
}

/// Sorts a population by [`BitChromosome::compare`] (highest fitness first).
pub fn sort_population(population: &mut [BitChromosome]) {
    population.sort_by(|a, b| a.compare(b));
}
