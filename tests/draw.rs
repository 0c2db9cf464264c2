#[macro_use]
extern crate pastel;

use std::rc::Rc;

use pastel::backends::headless::Call;
use pastel::backends::BufferTarget;
use pastel::device::buffer::as_bytes;
use pastel::prelude::*;

impl_vertex! {
    Vertex {
        position => [Position; Float; 2; false],
        color => [Color0; UByte; 4; true],
    }
}

fn device() -> GraphicsDevice<HeadlessVisitor> {
    let _ = env_logger::try_init();
    GraphicsDevice::new(HeadlessVisitor::new(), DeviceParams::default()).unwrap()
}

fn quad() -> Vec<Vertex> {
    vec![
        Vertex::new([0.0, 0.0], [255, 0, 0, 255]),
        Vertex::new([1.0, 0.0], [0, 255, 0, 255]),
        Vertex::new([1.0, 1.0], [0, 0, 255, 255]),
        Vertex::new([0.0, 1.0], [255, 255, 255, 255]),
    ]
}

fn draws(device: &GraphicsDevice<HeadlessVisitor>) -> Vec<Call> {
    device
        .visitor()
        .calls()
        .iter()
        .filter(|v| match **v {
            Call::DrawArrays(..) | Call::DrawElements(..) => true,
            _ => false,
        })
        .cloned()
        .collect()
}

#[test]
fn bracket() {
    let mut device = device();
    let vertices = quad();
    device.set_vertex_buffer(Some(Rc::new(VertexBuffer::new(&vertices))));
    device.visitor_mut().clear_calls();

    device
        .draw_primitives(PrimitiveType::TriangleStrip, 0, 2)
        .unwrap();

    let layout = Vertex::layout();
    let expected = vec![
        Call::SetRasterizerState(RasterizerState::default()),
        Call::SetBlendState(BlendState::default()),
        Call::CreateBuffer(1),
        Call::BindBuffer(BufferTarget::Vertex, 1),
        Call::BufferData(BufferTarget::Vertex, Vec::new()),
        Call::BufferData(BufferTarget::Vertex, as_bytes(&vertices).to_vec()),
        Call::EnableVertexLayout(layout),
        Call::DrawArrays(Topology::TriangleStrip, 0, 4),
        Call::BindBuffer(BufferTarget::Vertex, 0),
        Call::UnbindProgram,
        Call::DisableVertexLayout,
    ];

    assert_eq!(device.visitor().calls(), &expected[..]);
}

#[test]
fn reuse_buffer_objects() {
    let mut device = device();
    let vertices = quad();
    let indices = [0u16, 1, 2, 0, 2, 3];

    for _ in 0..4 {
        device
            .draw_user_indexed_primitives(
                PrimitiveType::TriangleList,
                &vertices,
                0,
                4,
                &indices,
                0,
                2,
            )
            .unwrap();
    }

    let created = device
        .visitor()
        .calls()
        .iter()
        .filter(|v| match **v {
            Call::CreateBuffer(_) => true,
            _ => false,
        })
        .count();

    assert_eq!(created, 2);
    assert_eq!(device.visitor().live_buffers(), 2);
    assert_eq!(draws(&device).len(), 4);

    device.dispose().unwrap();
    assert_eq!(device.visitor().live_buffers(), 0);
}

#[test]
fn indexed() {
    let mut device = device();
    let vertices = quad();
    let indices = [0u16, 1, 2, 0, 2, 3, 3, 2, 1];

    device.set_vertex_buffer(Some(Rc::new(VertexBuffer::new(&vertices))));
    device.set_indices(Some(Rc::new(IndexBuffer::new(&indices))));
    device
        .draw_indexed_primitives(PrimitiveType::TriangleList, 0, 0, 4, 3, 2)
        .unwrap();

    assert_eq!(
        draws(&device),
        [Call::DrawElements(Topology::Triangles, 6, IndexFormat::U16, 6)]
    );

    assert!(device.visitor().calls().contains(&Call::BufferData(
        BufferTarget::Index,
        as_bytes(&indices).to_vec()
    )));
}

#[test]
fn reject_base_vertex() {
    let mut device = device();
    device.set_vertex_buffer(Some(Rc::new(VertexBuffer::new(&quad()))));
    device.set_index_buffer(Some(Rc::new(IndexBuffer::new(&[0u16, 1, 2]))));
    device.visitor_mut().clear_calls();

    for &(base, min) in &[(1, 0), (0, 1), (4, 4), (-1, 0)] {
        match device.draw_indexed_primitives(PrimitiveType::TriangleList, base, min, 4, 0, 1) {
            Err(Error::Unsupported(_)) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    assert!(device.visitor().calls().is_empty());
}

#[test]
fn user_indexed_u32() {
    let mut device = device();
    let vertices = quad();
    let indices = [9u32, 0, 1, 2, 0, 2, 3];

    device
        .draw_user_indexed_primitives(
            PrimitiveType::TriangleList,
            &vertices,
            1,
            3,
            &indices,
            1,
            2,
        )
        .unwrap();

    assert_eq!(
        draws(&device),
        [Call::DrawElements(Topology::Triangles, 6, IndexFormat::U32, 4)]
    );

    assert!(device.visitor().calls().contains(&Call::BufferData(
        BufferTarget::Vertex,
        as_bytes(&vertices[1..4]).to_vec()
    )));
}

#[test]
fn user_primitives() {
    let mut device = device();
    let vertices = quad();

    device
        .draw_user_primitives(PrimitiveType::LineStrip, &vertices, 1, 2)
        .unwrap();

    assert_eq!(draws(&device), [Call::DrawArrays(Topology::LineStrip, 1, 3)]);

    match device.draw_user_primitives(PrimitiveType::LineList, &vertices, 1, 2) {
        Err(Error::OutOfBounds(_)) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn zero_primitives() {
    let mut device = device();
    device.set_vertex_buffer(Some(Rc::new(VertexBuffer::new(&quad()))));
    device.visitor_mut().clear_calls();

    device
        .draw_primitives(PrimitiveType::TriangleStrip, 0, 0)
        .unwrap();
    device
        .draw_user_primitives(PrimitiveType::LineStrip, &quad(), 0, 0)
        .unwrap();

    assert!(device.visitor().calls().is_empty());
}

#[test]
fn invalid_topology() {
    let mut device = device();
    device.set_vertex_buffer(Some(Rc::new(VertexBuffer::new(&quad()))));
    device.visitor_mut().clear_calls();

    match device.draw_primitives(PrimitiveType::PointList, 0, 1) {
        Err(Error::InvalidTopology(PrimitiveType::PointList)) => {}
        other => panic!("unexpected {:?}", other),
    }

    assert!(device.visitor().calls().is_empty());
}

#[test]
fn missing_resources() {
    let mut device = device();

    match device.draw_primitives(PrimitiveType::TriangleList, 0, 1) {
        Err(Error::VertexBufferMissing) => {}
        other => panic!("unexpected {:?}", other),
    }

    device.set_vertex_buffer(Some(Rc::new(VertexBuffer::new(&quad()))));
    match device.draw_indexed_primitives(PrimitiveType::TriangleList, 0, 0, 4, 0, 1) {
        Err(Error::IndexBufferMissing) => {}
        other => panic!("unexpected {:?}", other),
    }

    match device.draw_primitives(PrimitiveType::TriangleList, 2, 1) {
        Err(Error::OutOfBounds(_)) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn declaration_fallback() {
    let mut device = device();
    let vertices = quad();
    let bytes = as_bytes(&vertices).to_vec();

    device.set_vertex_buffer(Some(Rc::new(VertexBuffer::from_bytes(bytes, 4))));
    match device.draw_primitives(PrimitiveType::TriangleList, 0, 1) {
        Err(Error::VertexDeclarationMissing) => {}
        other => panic!("unexpected {:?}", other),
    }

    let layout = VertexLayout::build()
        .with(Attribute::Position, VertexFormat::Float, 2, false)
        .with(Attribute::Color0, VertexFormat::UByte, 4, true)
        .finish();

    assert_eq!(layout, Vertex::layout());

    device.set_vertex_declaration(Some(layout));
    device
        .draw_primitives(PrimitiveType::TriangleList, 0, 1)
        .unwrap();

    assert!(device
        .visitor()
        .calls()
        .contains(&Call::EnableVertexLayout(layout)));
}

#[test]
fn short_raw_buffer() {
    let mut device = device();
    device.visitor_mut().clear_calls();

    // Claims 100 vertices, but only holds the bytes of none.
    let vb = VertexBuffer::from_bytes(vec![0; 8], 100).with_declaration(Vertex::layout());
    device.set_vertex_buffer(Some(Rc::new(vb)));

    match device.draw_primitives(PrimitiveType::TriangleList, 0, 33) {
        Err(Error::OutOfBounds(_)) => {}
        other => panic!("unexpected {:?}", other),
    }

    device.set_index_buffer(Some(Rc::new(IndexBuffer::new(&[0u16, 1, 2]))));
    match device.draw_indexed_primitives(PrimitiveType::TriangleList, 0, 0, 3, 0, 1) {
        Err(Error::OutOfBounds(_)) => {}
        other => panic!("unexpected {:?}", other),
    }

    assert!(device.visitor().calls().is_empty());

    let vertices = quad();
    let vb = VertexBuffer::from_bytes(as_bytes(&vertices[..3]).to_vec(), 4)
        .with_declaration(Vertex::layout());
    device.set_vertex_buffer(Some(Rc::new(vb)));

    device
        .draw_primitives(PrimitiveType::TriangleList, 0, 1)
        .unwrap();
    match device.draw_primitives(PrimitiveType::TriangleStrip, 0, 2) {
        Err(Error::OutOfBounds(_)) => {}
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn disposed() {
    let mut device = device();
    device.set_vertex_buffer(Some(Rc::new(VertexBuffer::new(&quad()))));
    device
        .draw_primitives(PrimitiveType::TriangleList, 0, 1)
        .unwrap();

    device.dispose().unwrap();
    device.dispose().unwrap();
    assert!(device.is_disposed());
    assert!(device.is_content_lost());

    let deleted = device
        .visitor()
        .calls()
        .iter()
        .filter(|v| match **v {
            Call::DeleteBuffer(_) => true,
            _ => false,
        })
        .count();
    assert_eq!(deleted, 1);

    match device.draw_primitives(PrimitiveType::TriangleList, 0, 1) {
        Err(Error::Disposed) => {}
        other => panic!("unexpected {:?}", other),
    }
}
