use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::assets::decode::load_layer_image;
use crate::blend::opcode::Opcode;
use crate::document::model::Document;
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{BlendError, BlendResult};
use crate::surface::bitmap::{Bitmap, PixelSource};

/// One layer as seen by the compositor: pixels plus an already resolved opcode.
#[derive(Clone)]
pub struct LayerSnapshot {
    name: String,
    visible: bool,
    opcode: Opcode,
    source: Arc<dyn PixelSource>,
}

impl LayerSnapshot {
    /// Visible layer whose opcode is resolved from `name`.
    pub fn new(name: impl Into<String>, source: Arc<dyn PixelSource>) -> Self {
        let name = name.into();
        let opcode = Opcode::from_layer_name(&name);
        Self {
            name,
            visible: true,
            opcode,
            source,
        }
    }

    /// Replace the resolved opcode.
    pub fn with_opcode(mut self, opcode: Opcode) -> Self {
        self.opcode = opcode;
        self
    }

    /// Set the visibility flag.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the layer takes part in compositing.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Opcode used for every pixel of this layer.
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Pixel source of the layer.
    pub fn source(&self) -> &dyn PixelSource {
        self.source.as_ref()
    }
}

impl fmt::Debug for LayerSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerSnapshot")
            .field("name", &self.name)
            .field("visible", &self.visible)
            .field("opcode", &self.opcode)
            .field("bounds", &self.source.bounds())
            .finish()
    }
}

/// Immutable view of a document taken for one render.
///
/// Cheap to clone and safe to share between tile workers; later edits to the
/// host document do not affect a snapshot already handed to the renderer.
#[derive(Clone, Debug)]
pub struct DocumentSnapshot {
    canvas: Canvas,
    background: Rgba8,
    active_layer: usize,
    layers: Arc<[LayerSnapshot]>,
}

impl DocumentSnapshot {
    /// Build a snapshot. `active_layer` may be at most `layers.len()`.
    pub fn new(
        canvas: Canvas,
        layers: Vec<LayerSnapshot>,
        active_layer: usize,
    ) -> BlendResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(BlendError::validation("canvas width/height must be > 0"));
        }
        if active_layer > layers.len() {
            return Err(BlendError::validation(format!(
                "active_layer {active_layer} is out of range for {} layers",
                layers.len()
            )));
        }
        Ok(Self {
            canvas,
            background: Rgba8::TRANSPARENT,
            active_layer,
            layers: layers.into(),
        })
    }

    /// Snapshot with every layer below the active position composited.
    pub fn with_all_layers(canvas: Canvas, layers: Vec<LayerSnapshot>) -> BlendResult<Self> {
        let active = layers.len();
        Self::new(canvas, layers, active)
    }

    /// Set the color the output starts from.
    pub fn with_background(mut self, background: Rgba8) -> Self {
        self.background = background;
        self
    }

    /// Validate `doc` and load the images of the visible layers below its active layer.
    ///
    /// Layer sources are resolved relative to `root`. Each layer's opcode is
    /// fixed here, once.
    #[tracing::instrument(level = "debug", skip(doc, root), fields(layers = doc.layers.len()))]
    pub fn load(doc: &Document, root: &Path) -> BlendResult<Self> {
        doc.validate()?;
        let active = doc.active_layer_index();
        let mut layers = Vec::with_capacity(active);
        for def in &doc.layers[..active] {
            let [x, y] = def.offset;
            let opcode = def.resolved_opcode();
            // Hidden layers are never read, so their images need not exist.
            let bitmap = if def.visible {
                load_layer_image(&root.join(&def.source))?.with_origin(x, y)?
            } else {
                Bitmap::empty_at(x, y)
            };
            tracing::debug!(layer = %def.name, %opcode, visible = def.visible, "loaded layer");
            layers.push(
                LayerSnapshot::new(def.name.clone(), Arc::new(bitmap))
                    .with_opcode(opcode)
                    .with_visible(def.visible),
            );
        }
        Ok(Self::new(doc.canvas, layers, active)?.with_background(doc.background.0))
    }

    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Initial output color.
    pub fn background(&self) -> Rgba8 {
        self.background
    }

    /// Index of the active layer.
    pub fn active_layer(&self) -> usize {
        self.active_layer
    }

    /// All layers, bottom first.
    pub fn layers(&self) -> &[LayerSnapshot] {
        &self.layers
    }

    /// Visible layers strictly below the active layer, bottom first.
    pub fn composited_layers(&self) -> impl Iterator<Item = &LayerSnapshot> {
        self.layers[..self.active_layer]
            .iter()
            .filter(|layer| layer.visible)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/snapshot.rs"]
mod tests;
