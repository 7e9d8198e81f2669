//! Geometry over the live DOM.

use undertone_core::{GeometryProvider, Rect};
use web_sys as web;

/// Measures the scroll container and registered paragraph elements through
/// `getBoundingClientRect`, all in viewport-relative pixels.
pub struct DomGeometry {
    container: web::Element,
}

impl DomGeometry {
    pub fn new(container: web::Element) -> Self {
        Self { container }
    }
}

impl GeometryProvider for DomGeometry {
    type Element = web::Element;

    fn viewport(&self) -> Option<Rect> {
        let rect = self.container.get_bounding_client_rect();
        (rect.height() > 0.0).then(|| Rect::new(rect.top(), rect.height()))
    }

    fn bounding_box(&self, element: &web::Element) -> Option<Rect> {
        let rect = element.get_bounding_client_rect();
        (rect.height() > 0.0).then(|| Rect::new(rect.top(), rect.height()))
    }
}
