/// Rounds `value` up to the next multiple of `alignment`, which must be a
/// power of two.
///
/// Used to grow a requested page size to the granularity `mmap` works with.
///
/// # Examples
///
/// ```rust
/// use blockalloc::align_to;
///
/// assert_eq!(align_to!(1, 4096), 4096);
/// assert_eq!(align_to!(4096, 4096), 4096);
/// assert_eq!(align_to!(4097, 4096), 8192);
/// ```
#[macro_export]
macro_rules! align_to {
  ($value:expr, $alignment:expr) => {
    (($value) + ($alignment) - 1) & !(($alignment) - 1)
  };
}
