use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::blend::opcode::Opcode;
use crate::document::color::ColorDef;
use crate::foundation::core::Canvas;
use crate::foundation::error::{BlendError, BlendResult};

/// A layered document as stored on disk (JSON).
///
/// Layers are listed bottom to top. Only layers strictly below
/// [`Document::active_layer`] are composited; the active layer is where the
/// result is drawn.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Document {
    /// Output canvas dimensions.
    pub canvas: Canvas,
    /// Color the output starts from before any layer is drawn.
    #[serde(default)]
    pub background: ColorDef,
    /// Index of the active layer. Defaults to `layers.len()` (composite everything).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_layer: Option<usize>,
    /// Layers, bottom first.
    pub layers: Vec<LayerDef>,
}

/// One layer entry of a [`Document`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LayerDef {
    /// Display name. May carry a blend marker such as `**2`.
    pub name: String,
    /// Hidden layers are skipped entirely.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Image path relative to the document file.
    pub source: String,
    /// Canvas position of the image's top-left pixel.
    #[serde(default)]
    pub offset: [i32; 2],
    /// Explicit blend opcode. Overrides any marker in `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<Opcode>,
}

fn default_visible() -> bool {
    true
}

impl LayerDef {
    /// The opcode this layer blends with: `op` when set, else resolved from `name`.
    pub fn resolved_opcode(&self) -> Opcode {
        self.op.unwrap_or_else(|| Opcode::from_layer_name(&self.name))
    }
}

impl Document {
    /// Parse a document from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> BlendResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| BlendError::serde(format!("parse document JSON: {e}")))
    }

    /// Parse a document from a JSON string.
    pub fn from_json_str(s: &str) -> BlendResult<Self> {
        serde_json::from_str(s).map_err(|e| BlendError::serde(format!("parse document JSON: {e}")))
    }

    /// Parse a document from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> BlendResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            BlendError::validation(format!("open document JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_string_pretty(&self) -> BlendResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BlendError::serde(format!("serialize document JSON: {e}")))
    }

    /// Index of the active layer after applying the default.
    pub fn active_layer_index(&self) -> usize {
        self.active_layer.unwrap_or(self.layers.len())
    }

    /// Validate canvas, active layer and layer sources.
    pub fn validate(&self) -> BlendResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(BlendError::validation("canvas width/height must be > 0"));
        }
        if i32::try_from(self.canvas.width).is_err() || i32::try_from(self.canvas.height).is_err()
        {
            return Err(BlendError::validation(
                "canvas width/height must fit in a signed 32-bit coordinate",
            ));
        }
        if let Some(active) = self.active_layer
            && active > self.layers.len()
        {
            return Err(BlendError::validation(format!(
                "active_layer {active} is out of range for {} layers",
                self.layers.len()
            )));
        }
        for (idx, layer) in self.layers.iter().enumerate() {
            let field = format!("layer {idx} ('{}') source", layer.name);
            validate_rel_source(&layer.source, &field)?;
        }
        Ok(())
    }
}

fn validate_rel_source(source: &str, field: &str) -> BlendResult<()> {
    if source.trim().is_empty() {
        return Err(BlendError::validation(format!("{field} must be non-empty")));
    }
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(BlendError::validation(format!("{field} must be a relative path")));
    }
    if s.split('/').any(|part| part == "..") {
        return Err(BlendError::validation(format!("{field} must not contain '..'")));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/document/model.rs"]
mod tests;
