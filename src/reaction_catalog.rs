use crate::error::Result;
use crate::reaction::{Reaction, ReactionMatcher, ReactionRecord};
use crate::user_funcs::UserFuncs;
use std::collections::BTreeMap;

/// Collection of reactions keyed by their canonical string
/// (`"n + fe56 -> fe57 + gamma"`).
#[derive(Debug, Clone, Default)]
pub struct ReactionCatalog {
    reactions: BTreeMap<String, Reaction>,
}

impl ReactionCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        ReactionCatalog {
            reactions: BTreeMap::new(),
        }
    }

    /// Decode every record. The first record without rate data aborts the
    /// decode with [`crate::WnError::UnknownRateType`].
    pub fn from_records<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = ReactionRecord>,
    {
        let mut catalog = ReactionCatalog::new();
        for record in records {
            catalog.insert(Reaction::from_record(record)?);
        }
        log::debug!("Decoded {} reaction(s)", catalog.len());
        Ok(catalog)
    }

    /// Decode a JSON array of reaction records.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<ReactionRecord> = serde_json::from_str(json)?;
        ReactionCatalog::from_records(records)
    }

    /// Add a reaction under its canonical string, replacing any previous one.
    pub fn insert(&mut self, reaction: Reaction) -> Option<Reaction> {
        self.reactions.insert(reaction.string(), reaction)
    }

    pub fn get(&self, key: &str) -> Option<&Reaction> {
        self.reactions.get(key)
    }

    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Reaction)> {
        self.reactions.iter()
    }

    /// Reactions selected by `matcher`, in key order.
    pub fn find<'a>(&'a self, matcher: &'a ReactionMatcher) -> impl Iterator<Item = &'a Reaction> + 'a {
        self.reactions.values().filter(move |r| matcher.matches(r))
    }

    /// Rate of every reaction at `t9`. Reactions whose user function is not
    /// registered map to `None`; the rest of the batch is still evaluated.
    pub fn compute_rates(&self, t9: f64, user_funcs: &UserFuncs) -> BTreeMap<String, Option<f64>> {
        self.reactions
            .iter()
            .map(|(key, reaction)| (key.clone(), reaction.compute_rate(t9, user_funcs)))
            .collect()
    }
}
