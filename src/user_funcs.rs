// Registry of caller-supplied rate functions for `user_rate` reactions.
use crate::reaction::Reaction;
use std::collections::HashMap;
use std::fmt;

/// A user rate function: `(reaction, t9) -> rate`.
pub type UserRateFn = Box<dyn Fn(&Reaction, f64) -> f64 + Send + Sync>;

/// Mapping from a `user_rate` key to the function that computes it.
///
/// This is the only injectable behaviour of rate evaluation. Callers build
/// one registry and pass it by reference to every `compute_rate` call; keys
/// that are absent make `user_rate` reactions evaluate to `None`.
#[derive(Default)]
pub struct UserFuncs {
    funcs: HashMap<String, UserRateFn>,
}

impl UserFuncs {
    /// Create an empty registry
    pub fn new() -> Self {
        UserFuncs {
            funcs: HashMap::new(),
        }
    }

    /// Register (or replace) the function for `key`.
    pub fn set<F>(&mut self, key: &str, func: F)
    where
        F: Fn(&Reaction, f64) -> f64 + Send + Sync + 'static,
    {
        self.funcs.insert(key.to_string(), Box::new(func));
    }

    /// Builder form of [`UserFuncs::set`].
    pub fn with<F>(mut self, key: &str, func: F) -> Self
    where
        F: Fn(&Reaction, f64) -> f64 + Send + Sync + 'static,
    {
        self.set(key, func);
        self
    }

    /// Register many functions at once
    pub fn set_many<T>(&mut self, input: T)
    where
        T: IntoUserFuncs,
    {
        input.apply(self);
    }

    pub fn get(&self, key: &str) -> Option<&UserRateFn> {
        self.funcs.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.funcs.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<UserRateFn> {
        self.funcs.remove(key)
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.funcs.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }

    /// Remove every registered function
    pub fn clear(&mut self) {
        self.funcs.clear();
    }
}

impl fmt::Debug for UserFuncs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserFuncs").field("keys", &self.keys()).finish()
    }
}

/// Trait to allow flexible input types for [`UserFuncs::set_many`]
pub trait IntoUserFuncs {
    fn apply(self, funcs: &mut UserFuncs);
}

impl IntoUserFuncs for HashMap<String, UserRateFn> {
    fn apply(self, funcs: &mut UserFuncs) {
        funcs.funcs.extend(self);
    }
}

impl IntoUserFuncs for Vec<(String, UserRateFn)> {
    fn apply(self, funcs: &mut UserFuncs) {
        funcs.funcs.extend(self);
    }
}

impl IntoUserFuncs for UserFuncs {
    fn apply(self, funcs: &mut UserFuncs) {
        funcs.funcs.extend(self.funcs);
    }
}
