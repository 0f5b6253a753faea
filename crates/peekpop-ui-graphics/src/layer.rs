//! Transform and opacity state of a drawn element.

/// Affine scale/translation plus opacity, applied around the element's
/// centre. The default is the identity transform at full opacity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GraphicsLayer {
    pub alpha: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub translation_x: f32,
    pub translation_y: f32,
}

impl Default for GraphicsLayer {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl GraphicsLayer {
    pub const IDENTITY: GraphicsLayer = GraphicsLayer {
        alpha: 1.0,
        scale_x: 1.0,
        scale_y: 1.0,
        translation_x: 0.0,
        translation_y: 0.0,
    };

    /// Pure scale, no translation, full opacity.
    pub fn scaled(scale_x: f32, scale_y: f32) -> Self {
        Self {
            scale_x,
            scale_y,
            ..Self::IDENTITY
        }
    }

    /// Pure translation, no scale, full opacity.
    pub fn translated(translation_x: f32, translation_y: f32) -> Self {
        Self {
            translation_x,
            translation_y,
            ..Self::IDENTITY
        }
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_scale(mut self, scale_x: f32, scale_y: f32) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    /// Same opacity, transform reset to identity.
    pub fn with_identity_transform(self) -> Self {
        Self::IDENTITY.with_alpha(self.alpha)
    }

    pub fn has_identity_transform(&self) -> bool {
        self.scale_x == 1.0
            && self.scale_y == 1.0
            && self.translation_x == 0.0
            && self.translation_y == 0.0
    }
}
