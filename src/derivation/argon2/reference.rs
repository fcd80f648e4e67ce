//! Reference block position computation for Argon2.
//!
//! When filling a block at position (lane, index), Argon2 mixes the previous
//! block with a pseudo-randomly chosen reference block. The reference must
//! already be computed and, across lanes, must lie outside the slice that is
//! currently being filled in parallel.

use super::memory::MemoryLayout;
use super::params::SYNC_POINTS;

/// Position of the block being filled.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Position {
    pub pass: u32,
    pub lane: u32,
    pub slice: u32,
    /// Index of the block within its segment.
    pub index: u32,
}

/// Selects the reference lane for a pseudo-random value.
///
/// In the first slice of the first pass, no other lane has produced
/// anything usable yet, so the own lane is forced. Afterwards the high
/// 32 bits of the pseudo-random value pick the lane.
#[inline]
pub(crate) fn reference_lane(position: &Position, lanes: u32, pseudo_rand: u64) -> u32 {
    if position.pass == 0 && position.slice == 0 {
        position.lane
    } else {
        ((pseudo_rand >> 32) as u32) % lanes
    }
}

/// Computes the index within `ref_lane` of the reference block
/// (RFC 9106 §3.4.1.3).
///
/// The reference area holds every block that may be referenced:
///
/// | pass | same lane | area size |
/// |------|-----------|-----------|
/// | 0, slice 0 | (always) | `index - 1` |
/// | 0 | yes | `slice·S + index - 1` |
/// | 0 | no | `slice·S - [index == 0]` |
/// | > 0 | yes | `L - S + index - 1` |
/// | > 0 | no | `L - S - [index == 0]` |
///
/// with `S` the segment length and `L` the lane length. The low 32 bits of
/// the pseudo-random value are mapped into the area through
/// `x = J1² / 2³²`, `W - 1 - W·x / 2³²`, which favours recent blocks, and
/// the result is offset by the start of the area (the segment after the
/// current one on later passes).
pub(crate) fn reference_index(
    position: &Position,
    layout: &MemoryLayout,
    pseudo_rand: u64,
    same_lane: bool,
) -> u32 {
    let segment_len = layout.segment_len;
    let lane_len = layout.lane_len;
    let Position {
        pass, slice, index, ..
    } = *position;

    let first_of_segment = u32::from(index == 0);

    let area_size = match (pass, slice, same_lane) {
        (0, 0, _) => index - 1,
        (0, _, true) => slice * segment_len + index - 1,
        (0, _, false) => slice * segment_len - first_of_segment,
        (_, _, true) => lane_len - segment_len + index - 1,
        (_, _, false) => lane_len - segment_len - first_of_segment,
    };

    let j1 = pseudo_rand & 0xFFFF_FFFF;
    let x = (j1 * j1) >> 32;
    let y = ((area_size as u64) * x) >> 32;
    let relative_position = (area_size as u64 - 1 - y) as u32;

    let start_position = if pass == 0 || slice == SYNC_POINTS - 1 {
        0
    } else {
        (slice + 1) * segment_len
    };

    ((start_position as u64 + relative_position as u64) % lane_len as u64) as u32
}
