//! Parallel per-plane driver shared by the kernels

use rayon::prelude::*;
use tessera_core::{Plane, Progress, ProgressCounter, Raster};

use crate::{TransformError, TransformResult};

/// Apply `op` to every plane of `src` on the rayon pool and reassemble the
/// results into a raster with the same plane counts and calibration.
///
/// Each worker produces its own output plane. Cancellation is polled
/// before each plane starts.
pub(crate) fn map_planes<F>(
    src: &Raster,
    label: &'static str,
    progress: &dyn Progress,
    op: F,
) -> TransformResult<Raster>
where
    F: Fn(&Plane) -> TransformResult<Plane> + Sync,
{
    let counter = ProgressCounter::new(progress, src.plane_count());
    let planes = src
        .indexed_planes()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|(index, plane)| {
            if counter.is_cancelled() {
                return Err(TransformError::Cancelled);
            }
            let out = op(plane)?;
            tracing::trace!(op = label, plane = %index, "plane done");
            counter.step();
            Ok(out)
        })
        .collect::<TransformResult<Vec<_>>>();

    let planes = match planes {
        Ok(planes) => planes,
        Err(TransformError::Cancelled) => {
            tracing::warn!(op = label, "cancelled");
            return Err(TransformError::Cancelled);
        }
        Err(e) => return Err(e),
    };

    let mut out = Raster::from_planes(src.dimensions(), planes)?.into_mut();
    out.copy_calibration_from(src);
    Ok(out.into())
}
