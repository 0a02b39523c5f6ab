use std::{fmt, str::FromStr};

use crate::blend::channel;
use crate::foundation::error::{BlendError, BlendResult};

/// Blend operation applied when drawing a layer onto the layers below it.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Opcode {
    /// Replace the destination pixel with the source pixel.
    #[default]
    Copy,
    /// `B/2 + F/2`.
    Average,
    /// `B + F`.
    Add,
    /// `B - F`.
    Subtract,
    /// `B + F/4`.
    AddQuarter,
    /// `B - (248 - F)`, for sources ripped against white.
    InvertedSubtract,
}

/// Layer-name markers in resolution priority order.
///
/// The first marker contained anywhere in a name wins, so `"a**2 b**1"` is
/// [`Opcode::Average`] and `"a**12"` is too.
pub const NAME_MARKERS: [(&str, Opcode); 5] = [
    ("**1", Opcode::Average),
    ("**2", Opcode::Add),
    ("**3", Opcode::Subtract),
    ("**4", Opcode::AddQuarter),
    ("**s3", Opcode::InvertedSubtract),
];

impl Opcode {
    /// Every opcode, `Copy` first.
    pub const ALL: [Self; 6] = [
        Self::Copy,
        Self::Average,
        Self::Add,
        Self::Subtract,
        Self::AddQuarter,
        Self::InvertedSubtract,
    ];

    /// Resolve the opcode encoded in a layer's display name.
    ///
    /// Markers are plain case-sensitive substrings checked in [`NAME_MARKERS`]
    /// order. A name without any marker is a normal paste ([`Opcode::Copy`]).
    pub fn from_layer_name(name: &str) -> Self {
        NAME_MARKERS
            .iter()
            .find(|(marker, _)| name.contains(marker))
            .map_or(Self::Copy, |&(_, op)| op)
    }

    /// The layer-name marker selecting this opcode, if any.
    pub fn marker(self) -> Option<&'static str> {
        NAME_MARKERS
            .iter()
            .find(|(_, op)| *op == self)
            .map(|&(marker, _)| marker)
    }

    /// Stable snake_case name, matching the serde representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Average => "average",
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::AddQuarter => "add_quarter",
            Self::InvertedSubtract => "inverted_subtract",
        }
    }

    /// Per-channel formula for arithmetic opcodes; `None` for [`Opcode::Copy`].
    pub fn channel_fn(self) -> Option<fn(u8, u8) -> u8> {
        match self {
            Self::Copy => None,
            Self::Average => Some(channel::average),
            Self::Add => Some(channel::add),
            Self::Subtract => Some(channel::subtract),
            Self::AddQuarter => Some(channel::add_quarter),
            Self::InvertedSubtract => Some(channel::inverted_subtract),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Opcode {
    type Err = BlendError;

    fn from_str(s: &str) -> BlendResult<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| BlendError::validation(format!("unknown blend opcode '{s}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blend/opcode.rs"]
mod tests;
