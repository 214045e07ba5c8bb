//! How batched quads combine with what is already in the target.

/// Blend function attached to every [`DrawCommand`](crate::DrawCommand).
///
/// Batch containers default to [`BlendMode::AlphaNonPremultiplied`], which
/// matches textures whose color channels were not multiplied by alpha on load.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BlendMode {
    /// Source replaces destination.
    Opaque,

    /// `src.rgb * src.a + dst.rgb * (1 - src.a)`
    #[default]
    AlphaNonPremultiplied,

    /// `src.rgb + dst.rgb * (1 - src.a)`
    AlphaPremultiplied,

    /// `src.rgb * src.a + dst.rgb`
    Additive,

    /// Any other blend state.
    Custom(wgpu::BlendState),
}

impl BlendMode {
    /// Pick the alpha blend matching how a texture's pixels were stored.
    pub fn from_premultiplied(premultiplied: bool) -> Self {
        if premultiplied {
            BlendMode::AlphaPremultiplied
        } else {
            BlendMode::AlphaNonPremultiplied
        }
    }

    pub fn is_opaque(self) -> bool {
        matches!(self, BlendMode::Opaque)
    }

    /// `None` disables blending.
    pub fn to_blend_state(self) -> Option<wgpu::BlendState> {
        match self {
            BlendMode::Opaque => None,
            BlendMode::AlphaNonPremultiplied => Some(wgpu::BlendState::ALPHA_BLENDING),
            BlendMode::AlphaPremultiplied => Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
            BlendMode::Additive => Some(wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
            }),
            BlendMode::Custom(state) => Some(state),
        }
    }

    pub fn to_color_target_state(self, format: wgpu::TextureFormat) -> wgpu::ColorTargetState {
        wgpu::ColorTargetState {
            format,
            blend: self.to_blend_state(),
            write_mask: wgpu::ColorWrites::ALL,
        }
    }
}

impl From<wgpu::BlendState> for BlendMode {
    fn from(state: wgpu::BlendState) -> Self {
        BlendMode::Custom(state)
    }
}
