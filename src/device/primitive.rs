//! Translation from portable primitive types to native topologies and
//! element counts.

use serde::{Deserialize, Serialize};

use crate::errors::*;

/// Defines how vertex data is ordered.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    /// Separate points. Not available on this device.
    PointList,
    /// The data is ordered as a sequence of line segments; each line segment
    /// is described by two new vertices.
    LineList,
    /// The data is ordered as a sequence of line segments; each line segment
    /// is described by one new vertex and the last vertex from the previous
    /// line segment.
    LineStrip,
    /// The data is ordered as a sequence of triangles; each triangle is
    /// described by three new vertices.
    TriangleList,
    /// The data is ordered as a sequence of triangles; each triangle is
    /// described by two new vertices and one vertex from the previous triangle.
    TriangleStrip,
}

/// The native topology a draw call is submitted with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Topology {
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
}

impl PrimitiveType {
    /// Maps the primitive type into the native topology.
    pub fn topology(self) -> Result<Topology> {
        match self {
            PrimitiveType::LineList => Ok(Topology::Lines),
            PrimitiveType::LineStrip => Ok(Topology::LineStrip),
            PrimitiveType::TriangleList => Ok(Topology::Triangles),
            PrimitiveType::TriangleStrip => Ok(Topology::TriangleStrip),
            _ => Err(Error::InvalidTopology(self)),
        }
    }

    /// Returns the number of vertices (or indices) consumed by `primitives`
    /// primitives of this type.
    ///
    /// Zero primitives always consume zero elements, strips included.
    pub fn element_count(self, primitives: u32) -> Result<u32> {
        let topology = self.topology()?;
        if primitives == 0 {
            return Ok(0);
        }

        let count = match topology {
            Topology::Lines => primitives.checked_mul(2),
            Topology::LineStrip => primitives.checked_add(1),
            Topology::Triangles => primitives.checked_mul(3),
            Topology::TriangleStrip => primitives.checked_add(2),
        };

        count.ok_or_else(|| {
            Error::OutOfBounds(format!("{} primitives of {:?}", primitives, self))
        })
    }
}
