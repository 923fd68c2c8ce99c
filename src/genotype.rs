//! Genotypes: concrete gene vectors sampled from a genome.

use crate::allele::Gene;
use std::fmt;
use std::ops::Index;

/// An immutable, ordered vector of gene values, one per locus.
///
/// Genotypes carry no reference to the genome that produced them. They are
/// `Eq + Hash` (floats compare bitwise), so they can key a fitness cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Genotype(Vec<Gene>);

impl Genotype {
    pub fn new(genes: Vec<Gene>) -> Self {
        Self(genes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn genes(&self) -> &[Gene] {
        &self.0
    }

    pub fn get(&self, locus: usize) -> Option<&Gene> {
        self.0.get(locus)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Gene> {
        self.0.iter()
    }

    /// Numeric view of every locus (see [`Gene::to_f64`]).
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.0.iter().map(Gene::to_f64).collect()
    }

    /// Compact rendering: booleans as `0`/`1`, floats in full.
    ///
    /// Only meaningful when every locus is squeezable; callers usually go
    /// through [`Genome::format_genotype`](crate::Genome::format_genotype).
    pub fn squeeze(&self) -> String {
        self.0
            .iter()
            .map(|g| match g {
                Gene::Bool(true) => "1".to_string(),
                Gene::Bool(false) => "0".to_string(),
                Gene::Float(x) => x.to_string(),
            })
            .collect()
    }
}

impl From<Vec<Gene>> for Genotype {
    fn from(genes: Vec<Gene>) -> Self {
        Self(genes)
    }
}

impl FromIterator<Gene> for Genotype {
    fn from_iter<T: IntoIterator<Item = Gene>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Index<usize> for Genotype {
    type Output = Gene;

    fn index(&self, locus: usize) -> &Gene {
        &self.0[locus]
    }
}

impl<'a> IntoIterator for &'a Genotype {
    type Item = &'a Gene;
    type IntoIter = std::slice::Iter<'a, Gene>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, g) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{g}")?;
        }
        write!(f, ")")
    }
}
