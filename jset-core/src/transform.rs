//! Pure gesture → view-state transforms.
//!
//! None of these functions mutate their input; each returns the point or
//! state the caller should act on.

use tracing::debug;

use crate::viewport::ViewportState;

/// A point on the complex plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanePoint {
    pub x: f64,
    pub y: f64,
}

/// On-screen rectangle the image is drawn into, in the same units as the
/// click coordinates. It may be scaled relative to the image's pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// How a click changes the zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoomModifier {
    /// Recenter only.
    #[default]
    None,
    ZoomIn,
    ZoomOut,
}

/// Keyboard modifiers held during a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickModifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl ClickModifiers {
    /// Shift zooms in, ctrl zooms out; shift wins when both are held.
    pub fn zoom_modifier(self) -> ZoomModifier {
        if self.shift {
            ZoomModifier::ZoomIn
        } else if self.ctrl {
            ZoomModifier::ZoomOut
        } else {
            ZoomModifier::None
        }
    }
}

/// Direction of a button-driven zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Map a click inside `rect` to the plane point under it.
///
/// Screen y grows downward while plane y grows upward, hence the subtraction.
pub fn pixel_click_to_plane_point(
    click_x: f64,
    click_y: f64,
    rect: CanvasRect,
    viewport: &ViewportState,
) -> PlanePoint {
    let xfrac = (click_x - rect.left) / rect.width;
    let yfrac = (click_y - rect.top) / rect.height;
    PlanePoint {
        x: viewport.origin_x + xfrac * viewport.plane_width,
        y: viewport.origin_y - yfrac * viewport.plane_height(),
    }
}

/// Center the view on `point`, zooming by the viewport's factor according
/// to `modifier`.
pub fn recenter_and_zoom(
    point: PlanePoint,
    modifier: ZoomModifier,
    viewport: &ViewportState,
) -> ViewportState {
    let applied = match modifier {
        ZoomModifier::None => 1.0,
        ZoomModifier::ZoomIn => viewport.zoom_factor,
        ZoomModifier::ZoomOut => 1.0 / viewport.zoom_factor,
    };

    let new_width = viewport.plane_width / applied;
    let new_height = viewport.plane_height() / applied;

    debug!(
        x = point.x,
        y = point.y,
        ?modifier,
        new_width,
        "Recentering view"
    );

    ViewportState {
        origin_x: point.x - new_width / 2.0,
        origin_y: point.y + new_height / 2.0,
        plane_width: new_width,
        ..viewport.clone()
    }
}

/// Zoom about the current view center by the viewport's factor.
pub fn incremental_zoom(direction: ZoomDirection, viewport: &ViewportState) -> ViewportState {
    let zoom = viewport.zoom_factor;
    let width = viewport.plane_width;
    let height = viewport.plane_height();

    let (origin_x, origin_y, plane_width) = match direction {
        ZoomDirection::In => {
            let frac = (1.0 - 1.0 / zoom) / 2.0;
            (
                viewport.origin_x + frac * width,
                viewport.origin_y - frac * height,
                width / zoom,
            )
        }
        ZoomDirection::Out => {
            let frac = (zoom - 1.0) / 2.0;
            (
                viewport.origin_x - frac * width,
                viewport.origin_y + frac * height,
                width * zoom,
            )
        }
    };

    debug!(?direction, zoom, plane_width, "Button zoom");

    ViewportState {
        origin_x,
        origin_y,
        plane_width,
        ..viewport.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-10;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn canvas(vp: &ViewportState) -> CanvasRect {
        CanvasRect::new(0.0, 0.0, vp.pixel_width as f64, vp.pixel_height as f64)
    }

    #[test]
    fn click_at_upper_left_is_origin() {
        let vp = ViewportState::default();
        let p = pixel_click_to_plane_point(0.0, 0.0, canvas(&vp), &vp);
        assert!(approx(p.x, -2.0));
        assert!(approx(p.y, 1.0));
    }

    #[test]
    fn click_y_axis_points_up() {
        let vp = ViewportState::default();
        let p = pixel_click_to_plane_point(0.0, 800.0, canvas(&vp), &vp);
        assert!(approx(p.y, -1.0));
    }

    #[test]
    fn click_respects_offset_and_scaled_rect() {
        let vp = ViewportState::default();
        // Image drawn at half size, 10 units in from the window corner.
        let rect = CanvasRect::new(10.0, 20.0, 600.0, 400.0);
        let p = pixel_click_to_plane_point(310.0, 220.0, rect, &vp);
        assert!(approx(p.x, -0.5));
        assert!(approx(p.y, 0.0));
    }

    #[test]
    fn plain_click_at_center_recenters() {
        let vp = ViewportState::default();
        let p = pixel_click_to_plane_point(600.0, 400.0, canvas(&vp), &vp);
        assert!(approx(p.x, -0.5));
        assert!(approx(p.y, 0.0));
        let next = recenter_and_zoom(p, ZoomModifier::None, &vp);
        // Clicking the existing center is a no-op recenter.
        assert!(approx(next.origin_x, -2.0));
        assert!(approx(next.origin_y, 1.0));
        assert!(approx(next.plane_width, 3.0));
        let (cx, cy) = next.center();
        assert!(approx(cx, -0.5));
        assert!(approx(cy, 0.0));
    }

    #[test]
    fn shift_click_halves_width_and_stays_centered() {
        let vp = ViewportState::default();
        let p = pixel_click_to_plane_point(600.0, 400.0, canvas(&vp), &vp);
        let shift = ClickModifiers {
            shift: true,
            ctrl: false,
        };
        let next = recenter_and_zoom(p, shift.zoom_modifier(), &vp);
        assert!(approx(next.plane_width, 1.5));
        assert!(approx(next.plane_height(), 1.0));
        let (cx, cy) = next.center();
        assert!(approx(cx, p.x));
        assert!(approx(cy, p.y));
    }

    #[test]
    fn ctrl_click_doubles_width() {
        let vp = ViewportState::default();
        let p = PlanePoint { x: 0.25, y: -0.1 };
        let next = recenter_and_zoom(p, ZoomModifier::ZoomOut, &vp);
        assert!(approx(next.plane_width, 6.0));
        let (cx, cy) = next.center();
        assert!(approx(cx, 0.25));
        assert!(approx(cy, -0.1));
    }

    #[test]
    fn carries_over_pixel_size_and_zoom() {
        let vp = ViewportState::default().with_zoom_factor(3.0);
        let next = recenter_and_zoom(PlanePoint { x: 0.0, y: 0.0 }, ZoomModifier::ZoomIn, &vp);
        assert_eq!(next.pixel_width, vp.pixel_width);
        assert_eq!(next.pixel_height, vp.pixel_height);
        assert_eq!(next.zoom_factor, 3.0);
        assert_eq!(next.iterator, vp.iterator);
    }

    #[test]
    fn zoom_in_then_out_at_same_anchor_round_trips() {
        let vp = ViewportState::default().with_zoom_factor(2.5);
        let anchor = vp.center();
        let anchor = PlanePoint {
            x: anchor.0,
            y: anchor.1,
        };
        let zoomed = recenter_and_zoom(anchor, ZoomModifier::ZoomIn, &vp);
        let back = recenter_and_zoom(anchor, ZoomModifier::ZoomOut, &zoomed);
        assert!(approx(back.plane_width, vp.plane_width));
        assert!(approx(back.origin_x, vp.origin_x));
        assert!(approx(back.origin_y, vp.origin_y));
    }

    #[test]
    fn shift_wins_over_ctrl() {
        let both = ClickModifiers {
            shift: true,
            ctrl: true,
        };
        assert_eq!(both.zoom_modifier(), ZoomModifier::ZoomIn);
        assert_eq!(ClickModifiers::default().zoom_modifier(), ZoomModifier::None);
    }

    #[test]
    fn incremental_zoom_round_trips() {
        let vp = ViewportState::default().with_zoom_factor(1.7);
        let zin = incremental_zoom(ZoomDirection::In, &vp);
        let back = incremental_zoom(ZoomDirection::Out, &zin);
        assert!(approx(back.plane_width, vp.plane_width));
        assert!(approx(back.origin_x, vp.origin_x));
        assert!(approx(back.origin_y, vp.origin_y));
    }

    #[test]
    fn incremental_zoom_keeps_center() {
        let vp = ViewportState::default();
        let zin = incremental_zoom(ZoomDirection::In, &vp);
        let (cx, cy) = zin.center();
        let (ox, oy) = vp.center();
        assert!(approx(cx, ox));
        assert!(approx(cy, oy));
    }

    #[test]
    fn incremental_and_click_zoom_agree_on_extent() {
        let vp = ViewportState::default();
        let (cx, cy) = vp.center();
        let by_click = recenter_and_zoom(PlanePoint { x: cx, y: cy }, ZoomModifier::ZoomIn, &vp);
        let by_button = incremental_zoom(ZoomDirection::In, &vp);
        assert!(approx(by_click.plane_width, by_button.plane_width));
        assert!(approx(by_click.plane_height(), by_button.plane_height()));
        assert!(approx(by_click.origin_x, by_button.origin_x));
        assert!(approx(by_click.origin_y, by_button.origin_y));

        let by_click = recenter_and_zoom(PlanePoint { x: cx, y: cy }, ZoomModifier::ZoomOut, &vp);
        let by_button = incremental_zoom(ZoomDirection::Out, &vp);
        assert!(approx(by_click.plane_width, by_button.plane_width));
        assert!(approx(by_click.origin_x, by_button.origin_x));
    }
}
