/// tri3d Web - the software rasterizer compiled to WASM
///
/// Frames are rendered on the CPU by `tri3d-core` and blitted into a 2D
/// canvas as `ImageData`; no GPU context is involved.
use tri3d_core::{
    LightMode, Mesh, MeshCache, Orientation, ParseError, Rasterizer, RenderParams, Rgb, ShapeKind,
    Viewport,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

/// Viewer state shared by the JS bindings
#[derive(Debug)]
pub struct Scene {
    orientation: Orientation,
    shape: ShapeKind,
    color: Rgb,
    light: LightMode,
    meshes: MeshCache,
    mesh: Mesh,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        let mut meshes = MeshCache::new();
        let (shape, color) = (ShapeKind::Cube, Rgb::WHITE);
        Self {
            orientation: Orientation::zero(),
            shape,
            color,
            light: LightMode::Flat,
            mesh: meshes.get(shape, color),
            meshes,
        }
    }

    pub fn set_shape(&mut self, descriptor: &str) -> Result<(), ParseError> {
        self.shape = descriptor.parse()?;
        self.mesh = self.meshes.get(self.shape, self.color);
        Ok(())
    }

    pub fn set_color(&mut self, descriptor: &str) -> Result<(), ParseError> {
        self.color = descriptor.parse()?;
        self.mesh = self.meshes.get(self.shape, self.color);
        Ok(())
    }

    pub fn set_directional(&mut self, on: bool) {
        self.light = if on {
            LightMode::directional()
        } else {
            LightMode::Flat
        };
    }

    pub fn rotate(&mut self, d_heading: f64, d_pitch: f64) {
        self.orientation.rotate(d_heading, d_pitch);
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Render to RGBA bytes, row-major, ready for `ImageData`
    pub fn render_rgba(&self, width: u32, height: u32) -> Vec<u8> {
        let params = RenderParams {
            orientation: self.orientation,
            viewport: Viewport::new(width, height),
            light: self.light,
        };
        Rasterizer::new().render(&self.mesh, &params).to_rgba8()
    }
}

fn js_error(err: ParseError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct WebRenderer {
    scene: Scene,
}

#[wasm_bindgen]
impl WebRenderer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebRenderer {
        WebRenderer {
            scene: Scene::new(),
        }
    }

    /// Select a shape by descriptor, e.g. `"cube"` or `"icosphere:3"`
    #[wasm_bindgen(js_name = setShape)]
    pub fn set_shape(&mut self, descriptor: &str) -> Result<(), JsValue> {
        self.scene.set_shape(descriptor).map_err(js_error)
    }

    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&mut self, descriptor: &str) -> Result<(), JsValue> {
        self.scene.set_color(descriptor).map_err(js_error)
    }

    #[wasm_bindgen(js_name = setDirectionalLight)]
    pub fn set_directional_light(&mut self, on: bool) {
        self.scene.set_directional(on);
    }

    /// Apply heading/pitch deltas in radians
    pub fn rotate(&mut self, d_heading: f64, d_pitch: f64) {
        self.scene.rotate(d_heading, d_pitch);
    }

    pub fn render(&self, width: u32, height: u32) -> Vec<u8> {
        self.scene.render_rgba(width, height)
    }

    /// Render at the canvas size and put the pixels on it
    pub fn draw(&self, canvas_id: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id '{canvas_id}'")))?
            .dyn_into()?;
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into()?;

        let (width, height) = (canvas.width(), canvas.height());
        if width == 0 || height == 0 {
            return Ok(());
        }
        let bytes = self.scene.render_rgba(width, height);
        let image = ImageData::new_with_u8_clamped_array_and_sh(Clamped(&bytes), width, height)?;
        context.put_image_data(&image, 0.0, 0.0)
    }
}

impl Default for WebRenderer {
    fn default() -> Self {
        Self::new()
    }
}
