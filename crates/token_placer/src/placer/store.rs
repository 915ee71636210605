//! Caller-owned store of placed token coordinates.
use std::collections::BTreeMap;

use glam::DVec2;

use crate::placer::tokens::TokenKind;

/// Position of one placed token, with the count shown on it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenRecord {
    pub token: String,
    pub kind: Option<TokenKind>,
    pub x: f64,
    pub y: f64,
    pub amount: u32,
}

impl TokenRecord {
    pub fn new(
        token: impl Into<String>,
        kind: Option<TokenKind>,
        position: DVec2,
        amount: u32,
    ) -> Self {
        Self {
            token: token.into(),
            kind,
            x: position.x,
            y: position.y,
            amount,
        }
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

type SubRegions = BTreeMap<String, BTreeMap<String, TokenRecord>>;

/// Placed tokens keyed area, then sub-region, then token name.
///
/// Placement only ever adds or overwrites records.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TokenStore {
    areas: BTreeMap<String, SubRegions>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, area: &str, sub_region: &str, token: &str) -> Option<&TokenRecord> {
        self.areas.get(area)?.get(sub_region)?.get(token)
    }

    #[inline]
    pub fn contains(&self, area: &str, sub_region: &str, token: &str) -> bool {
        self.get(area, sub_region, token).is_some()
    }

    /// Stores `record` under its token name, returning the record it replaced.
    pub fn insert(
        &mut self,
        area: impl Into<String>,
        sub_region: impl Into<String>,
        record: TokenRecord,
    ) -> Option<TokenRecord> {
        self.areas
            .entry(area.into())
            .or_default()
            .entry(sub_region.into())
            .or_default()
            .insert(record.token.clone(), record)
    }

    /// Records of one sub-region, sorted by token name.
    pub fn records<'s>(
        &'s self,
        area: &str,
        sub_region: &str,
    ) -> impl Iterator<Item = &'s TokenRecord> + 's {
        self.areas
            .get(area)
            .and_then(|subs| subs.get(sub_region))
            .into_iter()
            .flat_map(|tokens| tokens.values())
    }

    /// Every record with its area and sub-region.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &TokenRecord)> {
        self.areas.iter().flat_map(|(area, subs)| {
            subs.iter().flat_map(move |(sub, tokens)| {
                tokens
                    .values()
                    .map(move |record| (area.as_str(), sub.as_str(), record))
            })
        })
    }

    pub fn len(&self) -> usize {
        self.areas
            .values()
            .flat_map(|subs| subs.values())
            .map(BTreeMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
