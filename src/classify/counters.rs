//! Aggregate label counts.

use std::marker::PhantomData;

use crate::config::OwnershipProfile;

use super::labels::{
    DmarcOwnershipLabel, DmarcPolicyLabel, Label, MxLabel, SpfLabel, Taxonomy, WhoisLabel,
};
use super::Classification;

/// Label → count map for one taxonomy, in rule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally<L: Label> {
    counts: Vec<usize>,
    _label: PhantomData<L>,
}

impl<L: Label> Default for Tally<L> {
    fn default() -> Self {
        Self {
            counts: vec![0; L::count()],
            _label: PhantomData,
        }
    }
}

impl<L: Label> Tally<L> {
    pub fn increment(&mut self, label: L) {
        self.counts[label.index()] += 1;
    }

    pub fn get(&self, label: L) -> usize {
        self.counts[label.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(label, count)` pairs in rule order.
    pub fn iter(&self) -> impl Iterator<Item = (L, usize)> + '_ {
        L::iter().map(move |label| (label, self.get(label)))
    }

    /// First label with a non-zero count, in rule order.
    pub fn first_nonzero(&self) -> Option<(L, usize)> {
        self.iter().find(|(_, count)| *count > 0)
    }

    fn buckets(&self, profile: &OwnershipProfile) -> Vec<Bucket> {
        self.iter()
            .map(|(label, count)| Bucket {
                label: label.display(profile),
                count,
            })
            .collect()
    }
}

/// A display label and its count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

/// Counts for all five taxonomies over one job.
///
/// Only the merge step writes these; each domain contributes exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateCounters {
    pub spf: Tally<SpfLabel>,
    pub mx: Tally<MxLabel>,
    pub dmarc_ownership: Tally<DmarcOwnershipLabel>,
    pub dmarc_policy: Tally<DmarcPolicyLabel>,
    pub whois: Tally<WhoisLabel>,
    /// Domains with a DMARC record matching no ownership rule.
    pub unclassified_dmarc_ownership: usize,
    /// Domains merged so far.
    pub domains: usize,
}

impl AggregateCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one domain's labels.
    pub fn record(&mut self, classification: &Classification) {
        self.domains += 1;
        self.spf.increment(classification.spf);
        self.mx.increment(classification.mx);
        self.dmarc_policy.increment(classification.dmarc_policy);
        self.whois.increment(classification.whois);
        match classification.dmarc_ownership {
            Some(label) => self.dmarc_ownership.increment(label),
            None => self.unclassified_dmarc_ownership += 1,
        }

        debug_assert_eq!(self.spf.total(), self.domains);
        debug_assert_eq!(self.mx.total(), self.domains);
        debug_assert_eq!(self.dmarc_policy.total(), self.domains);
        debug_assert_eq!(self.whois.total(), self.domains);
        debug_assert_eq!(
            self.dmarc_ownership.total() + self.unclassified_dmarc_ownership,
            self.domains
        );
    }

    /// Display buckets of one taxonomy, in rule order.
    pub fn buckets(&self, taxonomy: Taxonomy, profile: &OwnershipProfile) -> Vec<Bucket> {
        match taxonomy {
            Taxonomy::Spf => self.spf.buckets(profile),
            Taxonomy::Mx => self.mx.buckets(profile),
            Taxonomy::DmarcOwnership => self.dmarc_ownership.buckets(profile),
            Taxonomy::DmarcPolicy => self.dmarc_policy.buckets(profile),
            Taxonomy::Whois => self.whois.buckets(profile),
        }
    }

    /// Sum of the counts of one taxonomy.
    pub fn total(&self, taxonomy: Taxonomy) -> usize {
        match taxonomy {
            Taxonomy::Spf => self.spf.total(),
            Taxonomy::Mx => self.mx.total(),
            Taxonomy::DmarcOwnership => self.dmarc_ownership.total(),
            Taxonomy::DmarcPolicy => self.dmarc_policy.total(),
            Taxonomy::Whois => self.whois.total(),
        }
    }
}
