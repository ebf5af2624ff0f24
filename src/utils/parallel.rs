//! Data-parallel primitives used by the tree construction.
//!
//! With the `parallel` feature enabled, these dispatch to `rayon`. Otherwise, the exact same
//! closures are executed sequentially, in index order.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Calls `f(i)` for every `i` in `0..len`, possibly in parallel and in any order.
#[inline]
pub(crate) fn par_for_each(len: usize, f: impl Fn(usize) + Sync + Send) {
    #[cfg(feature = "parallel")]
    (0..len).into_par_iter().for_each(f);
    #[cfg(not(feature = "parallel"))]
    (0..len).for_each(f);
}

/// Calls `f(i, &mut out[i])` for every element of `out`, possibly in parallel and in any order.
#[inline]
pub(crate) fn par_for_each_mut<T: Send>(out: &mut [T], f: impl Fn(usize, &mut T) + Sync + Send) {
    #[cfg(feature = "parallel")]
    out.par_iter_mut().enumerate().for_each(|(i, elt)| f(i, elt));
    #[cfg(not(feature = "parallel"))]
    out.iter_mut().enumerate().for_each(|(i, elt)| f(i, elt));
}

/// Appends `f(0), f(1), …, f(len - 1)` to `out`, in this order.
///
/// The elements are computed possibly in parallel. The caller is expected to have reserved
/// enough capacity in `out` beforehand.
#[inline]
pub(crate) fn par_extend<T: Send>(
    out: &mut Vec<T>,
    len: usize,
    f: impl Fn(usize) -> T + Sync + Send,
) {
    #[cfg(feature = "parallel")]
    out.par_extend((0..len).into_par_iter().map(f));
    #[cfg(not(feature = "parallel"))]
    out.extend((0..len).map(f));
}

/// Maps every element of `0..len` with `map` and combines the results with `reduce`.
///
/// `reduce` must be associative and `identity()` must be its neutral element.
#[inline]
pub(crate) fn par_map_reduce<T: Send>(
    len: usize,
    identity: impl Fn() -> T + Sync + Send,
    map: impl Fn(usize) -> T + Sync + Send,
    reduce: impl Fn(T, T) -> T + Sync + Send,
) -> T {
    #[cfg(feature = "parallel")]
    return (0..len).into_par_iter().map(map).reduce(identity, reduce);
    #[cfg(not(feature = "parallel"))]
    return (0..len).map(map).fold(identity(), reduce);
}

/// Sorts `data` in increasing order, possibly in parallel.
///
/// The sort is unstable: callers needing a deterministic order for equal elements must make
/// their elements totally ordered.
#[inline]
pub(crate) fn par_sort_unstable<T: Ord + Send>(data: &mut [T]) {
    #[cfg(feature = "parallel")]
    data.par_sort_unstable();
    #[cfg(not(feature = "parallel"))]
    data.sort_unstable();
}
