use crate::container::{Handle, HandleContainer, MAX_CONTAINER_OBJECTS};
use crate::device::{GpuHandle, release_buffer};

use super::{
    Body, DrawPasses, Face, FaceRecord, NORMAL_TOLERANCE, RegistryError, misaligned_normals,
};

/// Identifier of a body inside a [`ModelRegistry`].
pub type BodyId = Handle;

const RECORD_SIZE: u64 = std::mem::size_of::<FaceRecord>() as u64;

/// The shared triangle buffer as last bound by [`ModelRegistry::to_compute`].
#[derive(Debug, Copy, Clone)]
pub struct TriangleBinding<'a> {
    /// Binding index requested by the last upload.
    pub binding: u32,
    pub buffer: &'a wgpu::Buffer,
    /// Number of valid records at the front of `buffer`.
    pub triangle_count: u32,
    /// Bumped whenever the buffer object is recreated; consumers rebuild bind groups on change.
    pub generation: u64,
}

/// Catalog of every [`Body`] plus the storage buffer that aggregates their triangles
/// for the ray-tracing pass.
///
/// Owned explicitly by the application. On drop, the shared buffer is released
/// first, then every remaining body in slot order.
pub struct ModelRegistry {
    shared: GpuHandle<wgpu::Buffer>,
    shared_capacity: u64,
    generation: u64,
    binding: u32,
    triangle_count: u32,

    bodies: HandleContainer<Body, Vec<Face>>,

    /// Live bodies in creation order.
    body_ids: Vec<BodyId>,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new(MAX_CONTAINER_OBJECTS)
    }
}

impl ModelRegistry {
    pub fn new(capacity: u32) -> Self {
        Self {
            shared: GpuHandle::empty(),
            shared_capacity: 0,
            generation: 0,
            binding: 0,
            triangle_count: 0,
            bodies: HandleContainer::with_capacity(capacity, Body::new, |mut body: Body| {
                body.release()
            }),
            body_ids: Vec::new(),
        }
    }

    /// Stores a copy of `faces` as a new body.
    pub fn create_body(&mut self, faces: &[Face]) -> Result<BodyId, RegistryError> {
        if let Some(face) = faces.iter().find(|f| !f.is_triangle()) {
            log::warn!(
                "body created from a {}-node face; only its first triangle reaches the ray tracer",
                face.len()
            );
        }

        let id = self
            .bodies
            .create(faces.to_vec())
            .ok_or(RegistryError::Full { capacity: self.bodies.capacity() })?;
        self.body_ids.push(id);

        if log::log_enabled!(log::Level::Debug) {
            if let Some(body) = self.bodies.get(id) {
                log::debug!("created body {id} ({} faces)\n{}", faces.len(), body.describe());
            }
        }

        Ok(id)
    }

    /// Releases the body's GPU buffers and frees its id.
    ///
    /// The shared triangle buffer keeps its old contents until the next
    /// [`to_compute`](Self::to_compute).
    pub fn destroy_body(&mut self, id: BodyId) -> Result<(), RegistryError> {
        self.bodies
            .destroy(id)
            .map_err(|_| RegistryError::UnknownBody { id })?;
        self.body_ids.retain(|&b| b != id);
        log::debug!("destroyed body {id}");
        Ok(())
    }

    #[inline]
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id)
    }

    #[inline]
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id)
    }

    /// Live body ids in creation order.
    #[inline]
    pub fn body_ids(&self) -> &[BodyId] {
        &self.body_ids
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.body_ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.body_ids.is_empty()
    }

    /// Uploads every body's raster streams.
    pub fn upload_all(&mut self, device: &wgpu::Device) {
        for &id in &self.body_ids {
            if let Some(body) = self.bodies.get_mut(id) {
                body.to_gpu(device);
            }
        }
    }

    /// Releases every body's raster streams. The shared triangle buffer is kept.
    pub fn release_all(&mut self) {
        for (_, body) in self.bodies.iter_mut() {
            body.release();
        }
    }

    /// Draws every body in creation order.
    pub fn draw_all<P: DrawPasses + ?Sized>(&self, pass: &mut wgpu::RenderPass<'_>, passes: &P) {
        for &id in &self.body_ids {
            if let Some(body) = self.bodies.get(id) {
                body.draw(pass, passes);
            }
        }
    }

    /// Aggregates the records of `ids` (in that order) and checks that every
    /// normal lies orthogonal to its triangle.
    pub fn collect_records(&self, ids: &[BodyId]) -> Result<Vec<FaceRecord>, RegistryError> {
        let mut records = Vec::new();
        for &id in ids {
            let body = self.bodies.get(id).ok_or(RegistryError::UnknownBody { id })?;
            body.to_compute(&mut records);
        }

        let misaligned = misaligned_normals(&records, NORMAL_TOLERANCE);
        if !misaligned.is_empty() {
            log::warn!(
                "{} of {} triangles have a normal off their plane (first: {})",
                misaligned.len(),
                records.len(),
                misaligned[0]
            );
        }
        debug_assert!(misaligned.is_empty(), "face normals must be orthogonal to their edges");

        Ok(records)
    }

    /// Uploads every registered body to the shared triangle buffer and binds it
    /// at `binding`. Returns the number of triangles uploaded.
    pub fn to_compute(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        binding: u32,
    ) -> Result<u32, RegistryError> {
        let ids = self.body_ids.clone();
        self.to_compute_subset(device, queue, binding, &ids)
    }

    /// Like [`to_compute`](Self::to_compute) but restricted to `ids`, in the order given.
    pub fn to_compute_subset(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        binding: u32,
        ids: &[BodyId],
    ) -> Result<u32, RegistryError> {
        let records = self.collect_records(ids)?;

        // Storage bindings must not be empty; keep room for at least one record.
        let required = (records.len() as u64).max(1);
        if !self.shared.is_valid() || self.shared_capacity < required {
            release_buffer(&mut self.shared);

            let capacity = required.next_power_of_two();
            self.shared.replace(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("kiln triangle storage"),
                size: capacity * RECORD_SIZE,
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.shared_capacity = capacity;
            self.generation += 1;
            log::debug!("triangle storage resized to {capacity} records");
        }

        if let Some(buffer) = self.shared.get() {
            if !records.is_empty() {
                queue.write_buffer(buffer, 0, bytemuck::cast_slice(&records));
            }
        }

        self.binding = binding;
        self.triangle_count = records.len() as u32;
        log::debug!("uploaded {} triangles at binding {binding}", self.triangle_count);

        Ok(self.triangle_count)
    }

    /// The shared triangle buffer, once [`to_compute`](Self::to_compute) has run.
    pub fn triangle_binding(&self) -> Option<TriangleBinding<'_>> {
        self.shared.get().map(|buffer| TriangleBinding {
            binding: self.binding,
            buffer,
            triangle_count: self.triangle_count,
            generation: self.generation,
        })
    }
}

impl Drop for ModelRegistry {
    fn drop(&mut self) {
        if release_buffer(&mut self.shared) {
            log::debug!("released triangle storage");
        }
        // Bodies are released by the container's deallocator when it drops.
    }
}
