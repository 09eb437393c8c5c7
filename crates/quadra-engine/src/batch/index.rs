pub const VERTICES_PER_QUAD: usize = 4;
pub const INDICES_PER_QUAD: usize = 6;

/// Largest batch whose index count still fits a `u32` draw.
pub const MAX_QUADS_PER_BATCH: usize = u32::MAX as usize / INDICES_PER_QUAD;

/// Index pattern for `max_quads` quads: quad `i` uses `4i+{0,1,2,2,3,0}`.
///
/// Callers must keep `max_quads <= MAX_QUADS_PER_BATCH`.
pub fn quad_indices(max_quads: usize) -> Vec<u32> {
    (0..max_quads as u32)
        .flat_map(|quad| {
            let base = quad * VERTICES_PER_QUAD as u32;
            [base, base + 1, base + 2, base + 2, base + 3, base]
        })
        .collect()
}
