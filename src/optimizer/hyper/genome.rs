//! The hyper-heuristic genome: `2·L` integers indexing into the
//! proposal-selection and slot-selection heuristic families.

use rand::Rng;

use super::heuristics::{ProposalHeuristic, SlotHeuristic, NUM_PROPOSAL_HEURISTICS, NUM_SLOT_HEURISTICS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicGenome {
    /// Length `L`, each entry an index into [`ProposalHeuristic::ALL`].
    pub proposal_genes: Vec<u8>,
    /// Length `L`, each entry an index into [`SlotHeuristic::ALL`].
    pub slot_genes: Vec<u8>,
}

impl HeuristicGenome {
    pub fn len(&self) -> usize {
        self.proposal_genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposal_genes.is_empty()
    }

    pub fn random(length: usize, rng: &mut impl Rng) -> Self {
        Self {
            proposal_genes: (0..length)
                .map(|_| rng.gen_range(0..NUM_PROPOSAL_HEURISTICS as u8))
                .collect(),
            slot_genes: (0..length)
                .map(|_| rng.gen_range(0..NUM_SLOT_HEURISTICS as u8))
                .collect(),
        }
    }

    pub fn proposal_heuristic(&self, step: usize) -> ProposalHeuristic {
        let l = self.len();
        ProposalHeuristic::ALL[self.proposal_genes[step % l] as usize % NUM_PROPOSAL_HEURISTICS]
    }

    pub fn slot_heuristic(&self, step: usize) -> SlotHeuristic {
        let l = self.len();
        SlotHeuristic::ALL[self.slot_genes[step % l] as usize % NUM_SLOT_HEURISTICS]
    }

    /// Single-point crossover over the concatenated `2L` genome.
    pub fn crossover(&self, other: &HeuristicGenome, rng: &mut impl Rng) -> HeuristicGenome {
        let l = self.len();
        debug_assert_eq!(l, other.len());
        let total = 2 * l;
        let point = rng.gen_range(0..total.max(1));

        let mut proposal_genes = Vec::with_capacity(l);
        let mut slot_genes = Vec::with_capacity(l);
        for i in 0..l {
            proposal_genes.push(if i < point { self.proposal_genes[i] } else { other.proposal_genes[i] });
        }
        for i in 0..l {
            let flat_index = l + i;
            slot_genes.push(if flat_index < point { self.slot_genes[i] } else { other.slot_genes[i] });
        }
        HeuristicGenome { proposal_genes, slot_genes }
    }

    /// Per-gene uniform mutation with the given rate.
    pub fn mutate(&self, rate: f64, rng: &mut impl Rng) -> HeuristicGenome {
        let proposal_genes = self
            .proposal_genes
            .iter()
            .map(|&g| if rng.gen::<f64>() < rate { rng.gen_range(0..NUM_PROPOSAL_HEURISTICS as u8) } else { g })
            .collect();
        let slot_genes = self
            .slot_genes
            .iter()
            .map(|&g| if rng.gen::<f64>() < rate { rng.gen_range(0..NUM_SLOT_HEURISTICS as u8) } else { g })
            .collect();
        HeuristicGenome { proposal_genes, slot_genes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn random_genome_has_matching_gene_lengths() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(1);
        let genome = HeuristicGenome::random(6, &mut rng);
        assert_eq!(genome.proposal_genes.len(), 6);
        assert_eq!(genome.slot_genes.len(), 6);
    }

    #[test]
    fn crossover_preserves_gene_count() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(2);
        let a = HeuristicGenome::random(5, &mut rng);
        let b = HeuristicGenome::random(5, &mut rng);
        let child = a.crossover(&b, &mut rng);
        assert_eq!(child.len(), 5);
    }

    #[test]
    fn heuristic_lookup_wraps_by_step_modulo_length() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let genome = HeuristicGenome::random(3, &mut rng);
        let h0 = genome.proposal_heuristic(0);
        let h3 = genome.proposal_heuristic(3);
        assert_eq!(h0, h3);
    }
}
