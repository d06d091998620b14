//! Per-face repetition of downstream analytics.
//!
//! Multi-face ingestion interleaves rows for several faces at the same
//! sampled frame. Splitting by face id before charting keeps every chart
//! single-subject; a table with only one distinct id yields exactly one
//! unit, so single-face output is unchanged by the split.

use emoscope_models::FaceObservation;

/// One face's rows, in table order.
#[derive(Debug)]
pub struct FanoutUnit<'a> {
    pub face_id: u32,
    pub rows: Vec<&'a FaceObservation>,
}

/// Split rows into one unit per distinct face id, ascending by id.
pub fn fan_out<'a>(rows: &[&'a FaceObservation]) -> Vec<FanoutUnit<'a>> {
    let mut ids: Vec<u32> = rows.iter().map(|r| r.face_id).collect();
    ids.sort_unstable();
    ids.dedup();

    ids.into_iter()
        .map(|face_id| FanoutUnit {
            face_id,
            rows: rows
                .iter()
                .copied()
                .filter(|r| r.face_id == face_id)
                .collect(),
        })
        .collect()
}
