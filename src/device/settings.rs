//! Functions for loading device settings.

use serde::{Deserialize, Serialize};

use crate::errors::*;

use super::state::{BlendState, DepthStencilState, RasterizerState};
use super::viewport::DisplayOrientation;

/// Describes the back-buffer the device presents into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationParameters {
    /// The width in pixels of the back-buffer.
    pub back_buffer_width: u32,
    /// The height in pixels of the back-buffer.
    pub back_buffer_height: u32,
    /// The orientation of the display, used to rotate scissor rectangles.
    pub display_orientation: DisplayOrientation,
}

impl Default for PresentationParameters {
    fn default() -> Self {
        PresentationParameters {
            back_buffer_width: 800,
            back_buffer_height: 480,
            display_orientation: DisplayOrientation::Default,
        }
    }
}

/// A structure containing configuration data for the graphics device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceParams {
    pub presentation: PresentationParameters,
    /// States pushed to the native context when the device gets created.
    pub blend_state: BlendState,
    pub depth_stencil_state: DepthStencilState,
    pub rasterizer_state: RasterizerState,
}

impl DeviceParams {
    /// Loads device params from a JSON document. Missing fields fall back to
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| Error::Params(format!("{}", err)))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::device::state::CullMode;

    #[test]
    fn defaults() {
        let params = DeviceParams::from_json("{}").unwrap();
        assert_eq!(params, DeviceParams::default());
        assert_eq!(params.presentation.back_buffer_width, 800);
        assert_eq!(params.presentation.back_buffer_height, 480);
    }

    #[test]
    fn partial() {
        let json = r#"{
            "presentation": {
                "back_buffer_width": 1024,
                "display_orientation": "LandscapeLeft"
            },
            "rasterizer_state": {
                "cull_mode": "None"
            }
        }"#;

        let params = DeviceParams::from_json(json).unwrap();
        assert_eq!(params.presentation.back_buffer_width, 1024);
        assert_eq!(params.presentation.back_buffer_height, 480);
        assert_eq!(
            params.presentation.display_orientation,
            DisplayOrientation::LandscapeLeft
        );
        assert_eq!(params.rasterizer_state.cull_mode, CullMode::None);
        assert_eq!(params.blend_state, BlendState::opaque());
    }

    #[test]
    fn malformed() {
        match DeviceParams::from_json("{ \"presentation\": 3 }") {
            Err(Error::Params(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }
}
