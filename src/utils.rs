use crate::error::CarpetError;

/// True for 1, 3, 9, 27, ... and false for everything else, including n < 1.
pub fn is_power_of_three(n: i64) -> bool {
    if n < 1 {
        return false;
    }
    let mut n = n;
    while n % 3 == 0 {
        n /= 3;
    }
    n == 1
}

/// Largest accepted canvas side, 3^9. An RGB canvas this wide is about 1.1 GiB.
pub const MAX_SIZE: i64 = 19_683;

/// Gate the canvas size. Anything accepted here divides evenly by 3 at every
/// level of the recursion down to a side of 1, and can be allocated.
pub fn validate_size(size: i64) -> Result<u32, CarpetError> {
    if !is_power_of_three(size) || size > MAX_SIZE {
        return Err(CarpetError::InvalidSize(size));
    }
    u32::try_from(size).map_err(|_| CarpetError::InvalidSize(size))
}

/// Gate a count-like parameter (`depth`, `threads`) that must be at least one.
pub fn validate_positive(name: &'static str, value: i64) -> Result<u32, CarpetError> {
    if value < 1 {
        return Err(CarpetError::InvalidParameter { name, value });
    }
    u32::try_from(value).map_err(|_| CarpetError::InvalidParameter { name, value })
}

/// Hardware threads available to this process, at least one.
pub fn available_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
