extern crate pastel;

use rand::Rng;

use pastel::backends::headless::Call;
use pastel::prelude::*;

fn device(width: u32, height: u32, orientation: DisplayOrientation) -> GraphicsDevice<HeadlessVisitor> {
    let _ = env_logger::try_init();

    let mut params = DeviceParams::default();
    params.presentation.back_buffer_width = width;
    params.presentation.back_buffer_height = height;
    params.presentation.display_orientation = orientation;

    GraphicsDevice::new(HeadlessVisitor::new(), params).unwrap()
}

#[test]
fn initial_states() {
    let json = r#"{
        "presentation": { "back_buffer_width": 320, "back_buffer_height": 240 },
        "blend_state": {
            "color_blend": ["Add", "One", { "OneMinusValue": "SourceAlpha" }]
        }
    }"#;

    let params = DeviceParams::from_json(json).unwrap();
    let device = GraphicsDevice::new(HeadlessVisitor::new(), params).unwrap();

    assert_eq!(*device.blend_state(), BlendState::alpha_blend());
    assert_eq!(*device.viewport(), Viewport::new(0, 0, 320, 240));
    assert_eq!(
        device.visitor().calls(),
        &[
            Call::SetBlendState(BlendState::alpha_blend()),
            Call::SetDepthStencilState(DepthStencilState::default()),
            Call::SetRasterizerState(RasterizerState::default()),
            Call::SetViewport(Viewport::new(0, 0, 320, 240)),
        ]
    );
}

#[test]
fn push_on_write() {
    let mut device = device(800, 600, DisplayOrientation::Default);
    device.visitor_mut().clear_calls();

    device.set_blend_state(BlendState::additive()).unwrap();
    device
        .set_depth_stencil_state(DepthStencilState::depth_read())
        .unwrap();
    device
        .set_rasterizer_state(RasterizerState::cull_none())
        .unwrap();
    device
        .set_sampler_state(3, SamplerState::point_clamp())
        .unwrap();

    assert_eq!(*device.blend_state(), BlendState::additive());
    assert_eq!(*device.depth_stencil_state(), DepthStencilState::depth_read());
    assert_eq!(*device.rasterizer_state(), RasterizerState::cull_none());
    assert_eq!(device.sampler_states().get(3), Some(&SamplerState::point_clamp()));
    assert_eq!(device.sampler_states().get(0), Some(&SamplerState::default()));

    assert_eq!(
        device.visitor().calls(),
        &[
            Call::SetBlendState(BlendState::additive()),
            Call::SetDepthStencilState(DepthStencilState::depth_read()),
            Call::SetRasterizerState(RasterizerState::cull_none()),
            Call::SetSamplerState(3, SamplerState::point_clamp()),
        ]
    );

    match device.set_sampler_state(MAX_SAMPLERS, SamplerState::default()) {
        Err(Error::OutOfBounds(_)) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn scissor() {
    let mut device = device(800, 600, DisplayOrientation::Default);
    device.visitor_mut().clear_calls();

    let rect = Rect::new(10, 10, 50, 50);
    device.set_scissor_rectangle(rect).unwrap();

    assert_eq!(device.scissor_rectangle(), rect);
    assert_eq!(
        device.visitor().calls(),
        &[Call::SetScissor(Rect::new(10, 540, 50, 50))]
    );
}

#[test]
fn scissor_orientations() {
    let rect = Rect::new(10, 20, 30, 40);
    let cases = [
        (DisplayOrientation::Portrait, Rect::new(10, 540, 30, 40)),
        (DisplayOrientation::LandscapeLeft, Rect::new(740, 560, 40, 30)),
        (DisplayOrientation::LandscapeRight, Rect::new(20, 10, 40, 30)),
        (DisplayOrientation::PortraitUpsideDown, Rect::new(760, 540, 30, 40)),
    ];

    for &(orientation, expected) in &cases {
        let mut device = device(800, 600, orientation);
        device.visitor_mut().clear_calls();
        device.set_scissor_rectangle(rect).unwrap();

        assert_eq!(device.scissor_rectangle(), rect);
        assert_eq!(device.visitor().calls(), &[Call::SetScissor(expected)]);
    }
}

#[test]
fn orientation_round_trip() {
    let mut rng = rand::thread_rng();

    for _ in 0..256 {
        let width = rng.gen_range(1, 4096);
        let height = rng.gen_range(1, 4096);
        let vp = Viewport::new(0, 0, width, height);
        let swapped = Viewport::new(0, 0, height, width);

        let rect = Rect::new(
            rng.gen_range(-64, 4096),
            rng.gen_range(-64, 4096),
            rng.gen_range(-64, 1024),
            rng.gen_range(-64, 1024),
        );

        for &v in &[
            DisplayOrientation::Default,
            DisplayOrientation::Portrait,
            DisplayOrientation::PortraitUpsideDown,
        ] {
            assert_eq!(v.orient_scissor(v.orient_scissor(rect, &vp), &vp), rect);
        }

        for &v in &[
            DisplayOrientation::LandscapeLeft,
            DisplayOrientation::LandscapeRight,
        ] {
            assert_eq!(v.orient_scissor(v.orient_scissor(rect, &vp), &swapped), rect);
        }
    }
}

#[test]
fn clear() {
    let mut device = device(800, 600, DisplayOrientation::Default);
    device.visitor_mut().clear_calls();

    device.clear_color(Color::cornflower_blue()).unwrap();
    device
        .clear(ClearOptions::default(), Color::black(), 1.0, 0)
        .unwrap();
    device
        .clear(ClearOptions::target().with_stencil(), Color::white(), 0.5, 7)
        .unwrap();

    assert_eq!(
        device.visitor().calls(),
        &[
            Call::Clear(ClearOptions::all(), Color::cornflower_blue(), 1.0, 0),
            Call::Clear(ClearOptions::target().with_stencil(), Color::white(), 0.5, 7),
        ]
    );

    let regions = [Rect::new(0, 0, 1, 1)];
    match device.clear_regions(ClearOptions::all(), Vector4::new(0.0, 0.0, 0.0, 1.0), 1.0, 0, &regions) {
        Err(Error::Unsupported(_)) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn present() {
    let mut device = device(800, 600, DisplayOrientation::Default);
    device.visitor_mut().clear_calls();

    device.present().unwrap();
    device.present_region(None, None).unwrap();
    assert_eq!(device.visitor().calls(), &[Call::Flush, Call::Flush]);

    match device.present_region(Some(Rect::new(0, 0, 8, 8)), None) {
        Err(Error::Unsupported(_)) => {}
        other => panic!("unexpected {:?}", other),
    }
}
