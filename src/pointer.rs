// pointer.rs
// Single writer (the pointer-move handler), single reader (the blender),
// value semantics throughout — copies, never references.

/// Pointer position normalized to [-0.5, 0.5] on both axes, with {0, 0} at
/// the viewport center.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerSignal {
    pub x: f32,
    pub y: f32,
}

/// Head-rotation target derived from the pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LookTarget {
    pub pitch: f32,
    pub yaw: f32,
}

impl PointerSignal {
    /// Normalize raw client coordinates against the viewport size. A
    /// degenerate viewport yields the centered signal rather than NaN.
    pub fn from_client(client: (f32, f32), viewport: (f32, f32)) -> Self {
        if viewport.0 <= 0.0 || viewport.1 <= 0.0 {
            return Self::default();
        }
        Self {
            x: (client.0 / viewport.0 - 0.5).clamp(-0.5, 0.5),
            y: (client.1 / viewport.1 - 0.5).clamp(-0.5, 0.5),
        }
    }

    /// Axis swap is deliberate: vertical pointer motion drives head pitch
    /// and horizontal motion drives yaw, each with its own gain.
    pub fn look_target(self) -> LookTarget {
        LookTarget { pitch: self.y * 0.3, yaw: self.x * 0.2 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_maps_to_origin() {
        let p = PointerSignal::from_client((640.0, 360.0), (1280.0, 720.0));
        assert_eq!(p, PointerSignal { x: 0.0, y: 0.0 });
    }

    #[test]
    fn top_left_maps_to_negative_half() {
        let p = PointerSignal::from_client((0.0, 0.0), (1280.0, 720.0));
        assert_eq!(p, PointerSignal { x: -0.5, y: -0.5 });
    }

    #[test]
    fn bottom_right_maps_to_positive_half() {
        let p = PointerSignal::from_client((1280.0, 720.0), (1280.0, 720.0));
        assert_eq!(p, PointerSignal { x: 0.5, y: 0.5 });
    }

    #[test]
    fn look_target_swaps_axes() {
        let look = PointerSignal { x: 0.5, y: -0.5 }.look_target();
        assert!((look.pitch - (-0.15)).abs() < 1e-6, "pitch comes from y: {}", look.pitch);
        assert!((look.yaw - 0.1).abs() < 1e-6, "yaw comes from x: {}", look.yaw);
    }

    #[test]
    fn zero_viewport_is_centered_not_nan() {
        let p = PointerSignal::from_client((100.0, 100.0), (0.0, 0.0));
        assert_eq!(p, PointerSignal::default());
    }
}
