//! Creature catalog
//!
//! Static table of everything that can be spawned. Exactly one entry is the
//! bonus creature that turns on the score multiplier; the rest are standard.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Creature category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatureKind {
    Standard,
    /// Activates the score multiplier when smashed
    #[serde(alias = "multiplier")]
    Bonus,
}

/// Opaque image reference (a URL on the web). The sim never resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageHandle(pub String);

impl ImageHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureDefinition {
    pub name: String,
    pub points: u32,
    pub kind: CreatureKind,
    pub image: ImageHandle,
}

impl CreatureDefinition {
    fn new(name: &str, points: u32, kind: CreatureKind, url: &str) -> Self {
        Self {
            name: name.to_string(),
            points,
            kind,
            image: ImageHandle(url.to_string()),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog has {0} bonus creatures, expected exactly one")]
    BonusCount(usize),
    #[error("catalog has no standard creatures")]
    NoStandard,
    #[error("creature #{0} has an empty name")]
    EmptyName(usize),
    #[error("invalid catalog JSON: {0}")]
    Parse(String),
}

/// Validated creature table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    definitions: Vec<CreatureDefinition>,
    bonus: usize,
    standard: Vec<usize>,
}

impl Catalog {
    pub fn new(definitions: Vec<CreatureDefinition>) -> Result<Self, CatalogError> {
        if let Some(i) = definitions.iter().position(|d| d.name.trim().is_empty()) {
            return Err(CatalogError::EmptyName(i));
        }

        let bonus_indices = indices_of(&definitions, CreatureKind::Bonus);
        let standard = indices_of(&definitions, CreatureKind::Standard);

        let [bonus] = bonus_indices[..] else {
            return Err(CatalogError::BonusCount(bonus_indices.len()));
        };
        if standard.is_empty() {
            return Err(CatalogError::NoStandard);
        }

        Ok(Self {
            definitions,
            bonus,
            standard,
        })
    }

    /// Parse a JSON array of definitions. Negative point values fail to parse.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let definitions: Vec<CreatureDefinition> =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(definitions)
    }

    /// The insects shipped with the game
    pub fn builtin() -> Self {
        use CreatureKind::*;
        let definitions = vec![
            CreatureDefinition::new("Ladybug", 1, Standard, "https://media.tenor.com/pPOVCdk6jYUAAAAi/ladybug-flap-wings.gif"),
            CreatureDefinition::new("Cockroach", 1, Standard, "https://media.tenor.com/ntPn1ftrTkkAAAAi/cockroach-ipis.gif"),
            CreatureDefinition::new("Dragonfly", 3, Standard, "https://media.tenor.com/J6mHiFhG7fkAAAAm/yanmega-flying.webp"),
            CreatureDefinition::new("Mantis", 3, Standard, "https://media.tenor.com/VISiRM_3gLoAAAAm/%E8%9E%B3%E8%9E%82-praying-mantis.webp"),
            CreatureDefinition::new("Spider", 5, Standard, "https://media.tenor.com/3dgbcMt6Kx4AAAAm/spider-insect.webp"),
            CreatureDefinition::new("Bee", 5, Standard, "https://media.tenor.com/Jg9fOjEk2lYAAAAi/dm4uz3-foekoe.gif"),
            CreatureDefinition::new("Butterfly", 0, Bonus, "https://media.tenor.com/IL_Mx0jUaIIAAAAi/borboletas-butterflies.gif"),
        ];
        Self {
            bonus: 6,
            standard: (0..6).collect(),
            definitions,
        }
    }

    pub fn get(&self, index: usize) -> Option<&CreatureDefinition> {
        self.definitions.get(index)
    }

    pub fn definitions(&self) -> &[CreatureDefinition] {
        &self.definitions
    }

    /// Index of the bonus definition
    pub fn bonus_index(&self) -> usize {
        self.bonus
    }

    /// Indices of the standard definitions, in catalog order
    pub fn standard_indices(&self) -> &[usize] {
        &self.standard
    }

    /// Catalog index by name
    pub fn find(&self, name: &str) -> Option<usize> {
        self.definitions.iter().position(|d| d.name == name)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn indices_of(definitions: &[CreatureDefinition], kind: CreatureKind) -> Vec<usize> {
    definitions
        .iter()
        .enumerate()
        .filter(|(_, d)| d.kind == kind)
        .map(|(i, _)| i)
        .collect()
}
