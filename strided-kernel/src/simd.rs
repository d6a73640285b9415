//! Runtime SIMD dispatch for contiguous inner loops.
//!
//! With the `simd` feature the closure runs under `pulp`'s detected target
//! features so LLVM can vectorize it for the host CPU. Without the feature it
//! is a plain call.

#[inline(always)]
pub(crate) fn dispatch<R>(f: impl FnOnce() -> R) -> R {
    #[cfg(feature = "simd")]
    {
        pulp::Arch::new().dispatch(f)
    }
    #[cfg(not(feature = "simd"))]
    {
        f()
    }
}

/// Dispatch only when the loop is long enough to amortize detection.
#[inline(always)]
pub(crate) fn dispatch_if_large<R>(len: usize, f: impl FnOnce() -> R) -> R {
    if len >= 64 {
        dispatch(f)
    } else {
        f()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_runs_closure() {
        let v: Vec<f64> = (0..100).map(f64::from).collect();
        assert_eq!(dispatch_if_large(v.len(), || v.iter().sum::<f64>()), 4950.0);
        assert_eq!(dispatch_if_large(3, || 7), 7);
        assert_eq!(dispatch(|| "ok"), "ok");
    }
}
