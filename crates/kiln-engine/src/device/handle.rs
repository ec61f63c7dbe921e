/// Owning slot for a GPU resource.
///
/// An empty handle means "no GPU resource": never uploaded, or already released.
#[derive(Debug)]
pub struct GpuHandle<T>(Option<T>);

impl<T> GpuHandle<T> {
    #[inline]
    pub const fn empty() -> Self {
        Self(None)
    }

    #[inline]
    pub const fn new(resource: T) -> Self {
        Self(Some(resource))
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.0.as_ref()
    }

    /// Moves the resource out, leaving the handle empty.
    #[inline]
    pub fn take(&mut self) -> Option<T> {
        self.0.take()
    }

    /// Stores `resource`, returning the previous one (if any).
    #[inline]
    pub fn replace(&mut self, resource: T) -> Option<T> {
        self.0.replace(resource)
    }
}

impl<T> Default for GpuHandle<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Destroys the buffer held by `handle` (if any) and leaves it empty.
///
/// Returns `true` when a buffer was released.
pub fn release_buffer(handle: &mut GpuHandle<wgpu::Buffer>) -> bool {
    match handle.take() {
        Some(buffer) => {
            buffer.destroy();
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_invalid() {
        let handle: GpuHandle<u32> = GpuHandle::default();
        assert!(!handle.is_valid());
        assert_eq!(handle.get(), None);
    }

    #[test]
    fn take_empties_the_handle() {
        let mut handle = GpuHandle::new(7u32);
        assert!(handle.is_valid());
        assert_eq!(handle.take(), Some(7));
        assert!(!handle.is_valid());
        assert_eq!(handle.take(), None);
    }

    #[test]
    fn replace_returns_previous() {
        let mut handle = GpuHandle::new(1u32);
        assert_eq!(handle.replace(2), Some(1));
        assert_eq!(handle.get(), Some(&2));
    }

    #[test]
    fn release_of_empty_buffer_is_noop() {
        let mut handle: GpuHandle<wgpu::Buffer> = GpuHandle::empty();
        assert!(!release_buffer(&mut handle));
        assert!(!release_buffer(&mut handle));
        assert!(!handle.is_valid());
    }
}
