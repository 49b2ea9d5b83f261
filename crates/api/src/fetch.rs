//! Upstream batching
//!
//! Station lists are chunked to respect the per-call id limit and fetched
//! concurrently; an area query is always a single call. Failed chunks are
//! logged and contribute nothing, the remaining chunks still count
//! (partial-failure tolerance). The report keeps the failure detail so the
//! caller can tell "everything failed" apart from "nothing matched".

use futures::future::join_all;
use log::warn;

use crate::awc::MetarSource;
use crate::observations::RawMetar;
use crate::query::ResolvedQuery;

/// Upstream limit on ids per call.
pub const MAX_IDS_PER_CALL: usize = 50;

#[derive(Debug)]
pub struct ChunkFailure {
    pub chunk_index: usize,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct FetchReport {
    /// Merged records, in chunk order (dedup happens in normalization).
    pub records: Vec<RawMetar>,
    pub failures: Vec<ChunkFailure>,
    pub chunk_count: usize,
}

impl FetchReport {
    pub fn all_chunks_failed(&self) -> bool {
        self.chunk_count > 0 && self.failures.len() == self.chunk_count
    }
}

pub async fn fetch_observations(source: &dyn MetarSource, resolved: &ResolvedQuery) -> FetchReport {
    match resolved {
        ResolvedQuery::Area(bbox) => {
            let mut report = FetchReport {
                chunk_count: 1,
                ..Default::default()
            };
            match source.by_bbox(bbox).await {
                Ok(records) => report.records = records,
                Err(e) => {
                    warn!("bbox fetch failed for {}: {}", bbox.to_query(), e);
                    report.failures.push(ChunkFailure {
                        chunk_index: 0,
                        reason: e.to_string(),
                    });
                }
            }
            report
        }
        ResolvedQuery::Stations(ids) => {
            let chunks: Vec<&[String]> = ids.chunks(MAX_IDS_PER_CALL).collect();

            let mut report = FetchReport {
                chunk_count: chunks.len(),
                ..Default::default()
            };

            let outcomes = join_all(chunks.iter().map(|chunk| source.by_ids(chunk))).await;
            for (chunk_index, outcome) in outcomes.into_iter().enumerate() {
                match outcome {
                    Ok(mut records) => report.records.append(&mut records),
                    Err(e) => {
                        warn!(
                            "chunk {}/{} ({} ids) failed: {}",
                            chunk_index + 1,
                            report.chunk_count,
                            chunks[chunk_index].len(),
                            e
                        );
                        report.failures.push(ChunkFailure {
                            chunk_index,
                            reason: e.to_string(),
                        });
                    }
                }
            }
            report
        }
    }
}
