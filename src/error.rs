use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("image dimensions cannot be zero")]
    ZeroDimension,

    #[error("pixel buffer length {len} does not match dimensions {width}x{height} (RGBA8)")]
    BufferMismatch {
        len: usize,
        width: u32,
        height: u32,
    },

    #[error("{name} must be a finite number, got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("failed to allocate {0} elements for intermediate buffers")]
    Allocation(usize),
}

/// Allocate `len` copies of `value`, reporting allocator failure instead of aborting.
pub(crate) fn try_filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>, ExtractError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| ExtractError::Allocation(len))?;
    v.resize(len, value);
    Ok(v)
}
