use crate::error::{Result, WnError};
use crate::naming::{is_non_nuclide_token, latex_string};
use crate::rate::{non_smoker_rate, RateExpression, RateRecord};
use crate::user_funcs::UserFuncs;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A reaction as decoded from a webnucleo reaction record.
///
/// `reactants`/`products` keep source order; `nuclide_reactants` and
/// `nuclide_products` are the same lists without the non-nuclide tokens
/// (gamma, electron, positron, neutrinos). The canonical string
/// (`"n + fe56 -> fe57 + gamma"`) is the reaction's lookup key.
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    pub reactants: Vec<String>,
    pub nuclide_reactants: Vec<String>,
    pub products: Vec<String>,
    pub nuclide_products: Vec<String>,
    /// Provenance of the rate data (may be empty).
    pub source: String,
    pub rate: RateExpression,
}

/// Serialized form of a reaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReactionRecord {
    #[serde(default, alias = "reactant")]
    pub reactants: Vec<String>,
    #[serde(default, alias = "product")]
    pub products: Vec<String>,
    #[serde(default)]
    pub source: String,
    #[serde(flatten)]
    pub rate: RateRecord,
}

fn nuclide_tokens(tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .filter(|t| !is_non_nuclide_token(t))
        .cloned()
        .collect()
}

impl Reaction {
    pub fn new(reactants: Vec<String>, products: Vec<String>, source: &str, rate: RateExpression) -> Self {
        Reaction {
            nuclide_reactants: nuclide_tokens(&reactants),
            nuclide_products: nuclide_tokens(&products),
            reactants,
            products,
            source: source.to_string(),
            rate,
        }
    }

    /// Decode a record. Fails with [`WnError::UnknownRateType`] when the
    /// record carries no rate data.
    pub fn from_record(record: ReactionRecord) -> Result<Self> {
        let name = reaction_string(&record.reactants, &record.products);
        let rate = record.rate.decode(&name)?;
        Ok(Reaction::new(record.reactants, record.products, &record.source, rate))
    }

    /// Decode a reaction from a JSON record.
    pub fn from_json(json: &str) -> Result<Self> {
        let record: ReactionRecord = serde_json::from_str(json)?;
        Reaction::from_record(record)
    }

    /// Canonical string `"r1 + r2 -> p1 + p2"`.
    pub fn string(&self) -> String {
        reaction_string(&self.reactants, &self.products)
    }

    /// LaTeX form, e.g. `$^{1}\rm{H} + ^{1}\rm{H} \to ^{2}\rm{H} + {\rm e}^+$`.
    pub fn latex_string(&self) -> String {
        let reactants: Vec<String> = self.reactants.iter().map(|r| latex_string(r)).collect();
        let products: Vec<String> = self.products.iter().map(|p| latex_string(p)).collect();
        format!("${} \\to {}$", reactants.join(" + "), products.join(" + "))
    }

    /// Matcher selecting this reaction by its reactants and products.
    pub fn matcher(&self) -> ReactionMatcher {
        ReactionMatcher::new(&self.reactants, &self.products)
    }

    /// Rate at `t9` (billions of K).
    ///
    /// `user_rate` reactions are delegated to the function registered under
    /// their key; if none is registered the problem is logged and `None`
    /// returned so batch evaluation can continue. Every other representation
    /// always yields `Some`.
    ///
    /// `t9` must be positive; NON-SMOKER fits take `1/T` and `ln(T)`.
    pub fn compute_rate(&self, t9: f64, user_funcs: &UserFuncs) -> Option<f64> {
        match self.try_compute_rate(t9, user_funcs) {
            Ok(rate) => Some(rate),
            Err(e) => {
                log::warn!("{}: {}", self, e);
                None
            }
        }
    }

    /// Like [`Reaction::compute_rate`] but reports a missing user function as
    /// [`WnError::UserFunctionNotFound`].
    pub fn try_compute_rate(&self, t9: f64, user_funcs: &UserFuncs) -> Result<f64> {
        match &self.rate {
            RateExpression::SingleRate { rate } => Ok(*rate),
            RateExpression::RateTable(table) => Ok(table.rate_at(t9)),
            RateExpression::NonSmokerFit { fits } => Ok(non_smoker_rate(fits, t9)),
            RateExpression::UserRate { key, .. } => {
                let func = user_funcs
                    .get(key)
                    .ok_or_else(|| WnError::UserFunctionNotFound { key: key.clone() })?;
                Ok(func(self, t9))
            }
        }
    }

    /// Rates at each temperature in `t9`. The user function, if any, is
    /// called once per temperature.
    pub fn compute_rates(&self, t9: &[f64], user_funcs: &UserFuncs) -> Option<Vec<f64>> {
        match &self.rate {
            RateExpression::UserRate { key, .. } => match user_funcs.get(key) {
                Some(func) => Some(t9.iter().map(|&t| func(self, t)).collect()),
                None => {
                    log::warn!("{}: Function not defined for key {}", self, key);
                    None
                }
            },
            builtin => builtin.builtin_rates_at(t9),
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.string())
    }
}

/// Canonical reaction string from reactant and product tokens.
pub fn reaction_string<S: AsRef<str>>(reactants: &[S], products: &[S]) -> String {
    let join = |tokens: &[S]| {
        tokens
            .iter()
            .map(|t| t.as_ref())
            .collect::<Vec<&str>>()
            .join(" + ")
    };
    format!("{} -> {}", join(reactants), join(products))
}

/// Selects reactions having every listed reactant and product, in any order.
///
/// Displays as the XPath predicate used to select the same reactions in a
/// webnucleo XML document, e.g.
/// `[reactant = 'n' and reactant = 'fe56' and product = 'fe57' and product = 'gamma']`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionMatcher {
    pub reactants: Vec<String>,
    pub products: Vec<String>,
}

impl ReactionMatcher {
    pub fn new<S: AsRef<str>>(reactants: &[S], products: &[S]) -> Self {
        ReactionMatcher {
            reactants: reactants.iter().map(|r| r.as_ref().to_string()).collect(),
            products: products.iter().map(|p| p.as_ref().to_string()).collect(),
        }
    }

    pub fn matches(&self, reaction: &Reaction) -> bool {
        self.reactants.iter().all(|r| reaction.reactants.contains(r))
            && self.products.iter().all(|p| reaction.products.contains(p))
    }
}

impl fmt::Display for ReactionMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let clauses: Vec<String> = self
            .reactants
            .iter()
            .map(|r| format!("reactant = '{}'", r))
            .chain(self.products.iter().map(|p| format!("product = '{}'", p)))
            .collect();
        write!(f, "[{}]", clauses.join(" and "))
    }
}
