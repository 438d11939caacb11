//! The four fixed taxonomy layers and the layer filter used by analytics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the four ordered layers a strategy's categories live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKey {
    Layer1,
    Layer2,
    Layer3,
    Layer4,
}

impl LayerKey {
    pub const ALL: [LayerKey; 4] = [
        LayerKey::Layer1,
        LayerKey::Layer2,
        LayerKey::Layer3,
        LayerKey::Layer4,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            LayerKey::Layer1 => "Identity",
            LayerKey::Layer2 => "Logic",
            LayerKey::Layer3 => "Temporal & Risk",
            LayerKey::Layer4 => "Reflection",
        }
    }
}

impl fmt::Display for LayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKey::Layer1 => write!(f, "layer1"),
            LayerKey::Layer2 => write!(f, "layer2"),
            LayerKey::Layer3 => write!(f, "layer3"),
            LayerKey::Layer4 => write!(f, "layer4"),
        }
    }
}

impl FromStr for LayerKey {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "layer1" | "1" | "identity" => Ok(LayerKey::Layer1),
            "layer2" | "2" | "logic" | "strategy" => Ok(LayerKey::Layer2),
            "layer3" | "3" | "temporal" | "risk" => Ok(LayerKey::Layer3),
            "layer4" | "4" | "reflection" => Ok(LayerKey::Layer4),
            _ => Err(format!("Unknown layer: {s}")),
        }
    }
}

/// Restricts tag statistics to a single layer, or keeps everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayerFilter {
    #[default]
    All,
    Layer(LayerKey),
}

impl LayerFilter {
    /// Entries whose category could not be resolved only pass `All`.
    pub fn matches(&self, layer: Option<LayerKey>) -> bool {
        match self {
            LayerFilter::All => true,
            LayerFilter::Layer(key) => layer == Some(*key),
        }
    }
}

impl fmt::Display for LayerFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerFilter::All => write!(f, "all"),
            LayerFilter::Layer(key) => write!(f, "{key}"),
        }
    }
}

impl Serialize for LayerFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for LayerFilter {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(LayerFilter::All);
        }
        s.parse().map(LayerFilter::Layer)
    }
}
