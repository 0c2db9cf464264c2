#[macro_use]
extern crate pastel;

use std::cell::RefCell;
use std::rc::Rc;

use pastel::backends::headless::Call;
use pastel::prelude::*;

impl_vertex! {
    Vertex {
        position => [Position; Float; 3; false],
    }
}

type Log = Rc<RefCell<Vec<&'static str>>>;

struct Recorder(Log);

impl DeviceListener for Recorder {
    fn on_device_lost(&mut self) -> failure::Fallible<()> {
        self.0.borrow_mut().push("lost");
        Ok(())
    }

    fn on_device_resetting(&mut self) -> failure::Fallible<()> {
        self.0.borrow_mut().push("resetting");
        Ok(())
    }

    fn on_device_reset(&mut self) -> failure::Fallible<()> {
        self.0.borrow_mut().push("reset");
        Ok(())
    }
}

struct Content(Log);

impl ContentReloader for Content {
    fn reload_all_content(&mut self) -> failure::Fallible<()> {
        self.0.borrow_mut().push("reload");
        Ok(())
    }
}

fn triangle() -> [Vertex; 3] {
    [Vertex::new([0.0; 3]); 3]
}

fn device(log: &Log) -> GraphicsDevice<HeadlessVisitor> {
    let _ = env_logger::try_init();

    let mut device = GraphicsDevice::new(HeadlessVisitor::new(), DeviceParams::default()).unwrap();
    device.add_listener(Recorder(log.clone()));
    device.set_content_reloader(Content(log.clone()));
    device
}

#[test]
fn reset() {
    let log = Log::default();
    let mut device = device(&log);

    device.set_viewport(Viewport::new(4, 4, 16, 16)).unwrap();
    device.reset().unwrap();

    assert_eq!(*log.borrow(), ["resetting", "reset"]);
    assert_eq!(*device.viewport(), Viewport::new(4, 4, 800, 480));

    let mut params = *device.presentation_parameters();
    params.back_buffer_width = 1024;
    params.back_buffer_height = 768;
    device.set_presentation_parameters(params);
    device.reset().unwrap();
    assert_eq!(*device.viewport(), Viewport::new(4, 4, 1024, 768));
}

#[test]
fn reload_lost_resources() {
    let log = Log::default();
    let mut device = device(&log);

    device.set_resources_lost(true);
    device.reset().unwrap();
    assert_eq!(*log.borrow(), ["resetting", "reload", "reset"]);
    assert!(!device.resources_lost());

    log.borrow_mut().clear();
    device.reset().unwrap();
    assert_eq!(*log.borrow(), ["resetting", "reset"]);
}

#[test]
fn device_lost() {
    let log = Log::default();
    let mut device = device(&log);

    let rt = Rc::new(RenderTarget2D::new(1, 64, 64));
    device.set_render_target(Some(rt)).unwrap();
    device
        .draw_user_primitives::<Vertex>(PrimitiveType::TriangleList, &triangle(), 0, 1)
        .unwrap();

    device.notify_device_lost().unwrap();
    assert!(device.is_lost());
    assert!(device.resources_lost());
    assert!(device.render_targets().is_empty());
    assert_eq!(*log.borrow(), ["lost"]);

    device.reset().unwrap();
    assert!(!device.is_lost());
    assert!(!device.resources_lost());
    assert_eq!(*log.borrow(), ["lost", "resetting", "reload", "reset"]);

    // Buffer objects are recreated on the next draw.
    device
        .draw_user_primitives::<Vertex>(PrimitiveType::TriangleList, &triangle(), 0, 1)
        .unwrap();
    assert_eq!(device.visitor().live_buffers(), 2);
}

#[test]
fn restore_states_after_loss() {
    let log = Log::default();
    let mut device = device(&log);

    device
        .set_depth_stencil_state(DepthStencilState::depth_read())
        .unwrap();
    device.set_blend_state(BlendState::additive()).unwrap();
    device
        .set_rasterizer_state(RasterizerState::cull_none())
        .unwrap();
    device.set_scissor_rectangle(Rect::new(1, 2, 3, 4)).unwrap();
    device
        .set_sampler_state(2, SamplerState::point_clamp())
        .unwrap();

    device.notify_device_lost().unwrap();
    device.visitor_mut().clear_calls();
    device.reset().unwrap();

    assert_eq!(
        device.visitor().calls(),
        &[
            Call::InvalidateState,
            Call::SetBlendState(BlendState::additive()),
            Call::SetDepthStencilState(DepthStencilState::depth_read()),
            Call::SetRasterizerState(RasterizerState::cull_none()),
            Call::SetViewport(Viewport::new(0, 0, 800, 480)),
            Call::SetScissor(Rect::new(1, 480 - 2 - 4, 3, 4)),
            Call::SetSamplerState(2, SamplerState::point_clamp()),
        ]
    );

    // A reset without a loss only resizes the viewport.
    device.visitor_mut().clear_calls();
    device.reset().unwrap();
    assert_eq!(
        device.visitor().calls(),
        &[Call::SetViewport(Viewport::new(0, 0, 800, 480))]
    );
}

#[test]
fn lose_bound_targets() {
    let log = Log::default();
    let mut device = device(&log);

    device.set_viewport(Viewport::new(8, 8, 320, 200)).unwrap();
    let rt = Rc::new(RenderTarget2D::new(1, 64, 64));
    device.set_render_target(Some(rt)).unwrap();
    assert_eq!(*device.viewport(), Viewport::new(0, 0, 64, 64));

    device.visitor_mut().clear_calls();
    device.notify_device_lost().unwrap();

    assert!(device.render_targets().is_empty());
    assert_eq!(*device.viewport(), Viewport::new(8, 8, 320, 200));
    assert!(device.visitor().calls().is_empty());
}

#[test]
fn remove_listener() {
    let log = Log::default();
    let mut device = GraphicsDevice::new(HeadlessVisitor::new(), DeviceParams::default()).unwrap();

    let handle = device.add_listener(Recorder(log.clone()));
    let cloned = log.clone();
    device.add_listener(move |e: DeviceEvent| -> failure::Fallible<()> {
        if e == DeviceEvent::Reset {
            cloned.borrow_mut().push("closure");
        }

        Ok(())
    });

    device.reset().unwrap();
    assert_eq!(*log.borrow(), ["resetting", "reset", "closure"]);

    assert!(device.remove_listener(handle));
    assert!(!device.remove_listener(handle));

    log.borrow_mut().clear();
    device.reset().unwrap();
    assert_eq!(*log.borrow(), ["closure"]);
}

#[test]
fn failures() {
    let log = Log::default();
    let mut device = GraphicsDevice::new(HeadlessVisitor::new(), DeviceParams::default()).unwrap();
    device.add_listener(|_: DeviceEvent| -> failure::Fallible<()> {
        Err(failure::err_msg("listener"))
    });

    match device.reset() {
        Err(Error::Listener(_)) => {}
        other => panic!("unexpected {:?}", other),
    }

    let mut device = GraphicsDevice::new(HeadlessVisitor::new(), DeviceParams::default()).unwrap();
    device.add_listener(Recorder(log.clone()));
    device.set_content_reloader(Failing);
    device.set_resources_lost(true);

    match device.reset() {
        Err(Error::ContentReload(_)) => {}
        other => panic!("unexpected {:?}", other),
    }

    assert!(device.resources_lost());
    assert_eq!(*log.borrow(), ["resetting"]);

    match device.reset_with(PresentationParameters::default()) {
        Err(Error::Unsupported(_)) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn disposed() {
    let log = Log::default();
    let mut device = device(&log);

    device.dispose().unwrap();
    match device.reset() {
        Err(Error::Disposed) => {}
        other => panic!("unexpected {:?}", other),
    }

    match device.set_blend_state(BlendState::default()) {
        Err(Error::Disposed) => {}
        other => panic!("unexpected {:?}", other),
    }

    assert!(log.borrow().is_empty());
}

struct Failing;

impl ContentReloader for Failing {
    fn reload_all_content(&mut self) -> failure::Fallible<()> {
        Err(failure::err_msg("content"))
    }
}
