use std::collections::{HashMap, HashSet};

use crate::error::Error;

/// Presentation settings handed explicitly to whatever renders activities.
///
/// The default translates every key to itself and treats every user as active.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Presentation {
    pub translator: Translator,
    pub activation: ActivationStatus,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Translator {
    /// Returns the key unchanged
    #[default]
    Identity,
    /// Looks keys up in a catalog, falling back to the key
    Catalog(HashMap<String, String>),
}

impl Translator {
    /// Parses a flat JSON object of `key: text` pairs
    pub fn from_json(text: &str) -> Result<Self, Error> {
        let catalog: HashMap<String, String> = serde_json::from_str(text)?;
        Ok(Translator::Catalog(catalog))
    }

    pub fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        match self {
            Translator::Identity => key,
            Translator::Catalog(catalog) => catalog.get(key).map(String::as_str).unwrap_or(key),
        }
    }
}

/// Which accounts are considered active. Empty means everyone is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActivationStatus {
    deactivated: HashSet<String>,
}

impl ActivationStatus {
    pub fn with_deactivated<I, S>(user_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            deactivated: user_ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_active(&self, user_id: &str) -> bool {
        !self.deactivated.contains(user_id)
    }
}
