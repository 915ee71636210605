//! Token kinds and footprint sizes.
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};

/// Category of a token; tokens of one kind share a diameter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TokenKind {
    Leader,
    Troop,
    Other(String),
}

impl TokenKind {
    pub fn as_str(&self) -> &str {
        match self {
            TokenKind::Leader => "leader",
            TokenKind::Troop => "troop",
            TokenKind::Other(name) => name,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps token names to kinds and kinds to diameters.
#[derive(Debug, Clone, Default)]
pub struct TokenSizes {
    diameters: BTreeMap<TokenKind, f64>,
    kinds: BTreeMap<String, TokenKind>,
}

impl TokenSizes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the diameter shared by every token of `kind`.
    pub fn with_diameter(mut self, kind: TokenKind, diameter: f64) -> Self {
        self.diameters.insert(kind, diameter);
        self
    }

    /// Assigns `name` to `kind`.
    pub fn with_token(mut self, name: impl Into<String>, kind: TokenKind) -> Self {
        self.kinds.insert(name.into(), kind);
        self
    }

    /// Assigns every name in `names` to `kind`.
    pub fn with_tokens<I, S>(mut self, names: I, kind: TokenKind) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.kinds.insert(name.into(), kind.clone());
        }
        self
    }

    pub fn kind_of(&self, name: &str) -> Result<&TokenKind> {
        self.kinds.get(name).ok_or_else(|| Error::UnknownToken {
            name: name.to_string(),
        })
    }

    pub fn diameter_of(&self, name: &str) -> Result<f64> {
        let kind = self.kind_of(name)?;
        self.diameters
            .get(kind)
            .copied()
            .ok_or_else(|| Error::InvalidConfig(format!("no diameter for token kind '{kind}'")))
    }

    /// Half the diameter of the token's kind.
    pub fn radius_of(&self, name: &str) -> Result<f64> {
        Ok(self.diameter_of(name)? / 2.0)
    }

    /// Validates the table, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        for (kind, &diameter) in &self.diameters {
            if !(diameter.is_finite() && diameter > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "diameter of '{kind}' must be finite and > 0, got {diameter}"
                )));
            }
        }
        for (name, kind) in &self.kinds {
            if !self.diameters.contains_key(kind) {
                return Err(Error::InvalidConfig(format!(
                    "token '{name}' has kind '{kind}' without a diameter"
                )));
            }
        }
        Ok(())
    }
}
