use std::collections::BTreeMap;

use gm_core::{Grid, GridView};
use gm_register::{AffineTransform, PixelShift, Warper};

use crate::GrainError;
use crate::grain::GrainRegistry;

/// Matches each registry grain to its counterpart in an independently
/// labeled reference grid.
///
/// The deformed label grid is padded by the pixel shift (zeros on top/left,
/// mirroring the shift applied during boundary extraction), warped into the
/// reference frame through the inverse transform with nearest-neighbor
/// sampling, and each grain takes the modal strictly-positive reference
/// label under its warped footprint; ties go to the smallest label. The
/// winning label minus one is the reference grain index, attached to the
/// grain and returned in registry order.
///
/// A grain whose footprint holds no positive reference label resolves to
/// `None`; resolution continues for the remaining grains.
pub fn resolve_correspondence(
    registry: &mut GrainRegistry,
    reference_labels: &GridView<'_, i32>,
    transform: &AffineTransform,
    shift: PixelShift,
    warper: &dyn Warper,
) -> Result<Vec<Option<usize>>, GrainError> {
    let labels = registry.labels();
    let width = labels.width();
    let height = labels.height();

    let mut padded = Grid::new_fill(width + shift.x, height + shift.y, 0i32);
    for y in 0..height {
        for x in 0..width {
            let v = labels.get(x, y).expect("label grid read in bounds");
            *padded
                .get_mut(x + shift.x, y + shift.y)
                .expect("padded grid write in bounds") = v;
        }
    }

    let inverse = transform.inverse()?;
    let warped = warper.warp_labels(
        &padded.as_view(),
        &inverse,
        reference_labels.width(),
        reference_labels.height(),
    );

    let n = registry.len();
    let mut votes: Vec<BTreeMap<i32, usize>> = vec![BTreeMap::new(); n];

    for y in 0..reference_labels.height() {
        for x in 0..reference_labels.width() {
            let k = *warped.get(x, y).expect("warped grid read in bounds");
            if k < 1 || k as usize > n {
                continue;
            }
            let r = *reference_labels.get(x, y).expect("reference read in bounds");
            if r > 0 {
                *votes[k as usize - 1].entry(r).or_insert(0) += 1;
            }
        }
    }

    let mut resolved = Vec::with_capacity(n);
    for (i, vote) in votes.iter().enumerate() {
        // Ascending key order plus a strict comparison implements the
        // smallest-label tie-break.
        let mut winner: Option<(i32, usize)> = None;
        for (&label, &count) in vote {
            if winner.map_or(true, |(_, best)| count > best) {
                winner = Some((label, count));
            }
        }

        let reference_index = winner.map(|(label, _)| (label - 1) as usize);
        if let Some(idx) = reference_index {
            registry
                .grain_mut(i)
                .expect("vote index within registry")
                .set_reference_grain(idx);
        }
        resolved.push(reference_index);
    }

    Ok(resolved)
}
