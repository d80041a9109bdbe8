use game_types::{EXACT_RANK, Severity, Tier};

/// Default population for the percentile policy.
pub const DEFAULT_POPULATION: u32 = 100_000;
/// Default cap for the saturating policy; oracle ranks rarely exceed it.
pub const DEFAULT_MAX_RANK: u32 = 10_000;
/// Ranks at or below this are reported as "close".
pub const DEFAULT_NEAR_THRESHOLD: u32 = 1_000;

/// How a rank is mapped to a colour band.
///
/// Both policies are total and non-decreasing in rank, and both reserve
/// `Tier::Exact` for rank 1. Bands are multiples of ten in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketPolicy {
    /// Band is the rank's percentile within a known vocabulary size.
    Percentile { population: u32 },
    /// Bands spread linearly over `2..=max_rank`; anything beyond saturates at 100.
    Saturating { max_rank: u32 },
}

impl BucketPolicy {
    pub fn bucket(&self, rank: u32) -> Tier {
        if rank <= EXACT_RANK {
            return Tier::Exact;
        }

        let band = match *self {
            BucketPolicy::Percentile { population } => {
                let population = u64::from(population.max(1));
                let percent = (u64::from(rank) * 100 / population).min(100);
                percent / 10 * 10
            }
            BucketPolicy::Saturating { max_rank } => {
                if max_rank <= EXACT_RANK + 1 {
                    100
                } else {
                    let clamped = u64::from(rank.min(max_rank));
                    let span = u64::from(max_rank - 1);
                    let scaled = 10 + (clamped - 1) * 90 / span;
                    (scaled / 10 * 10).min(100)
                }
            }
        };

        Tier::Band(band as u8)
    }
}

impl Default for BucketPolicy {
    fn default() -> Self {
        BucketPolicy::Saturating {
            max_rank: DEFAULT_MAX_RANK,
        }
    }
}

pub fn severity(rank: u32, near_threshold: u32) -> Severity {
    if rank <= EXACT_RANK {
        Severity::Exact
    } else if rank <= near_threshold {
        Severity::Close
    } else {
        Severity::Far
    }
}

/// Bucket policy plus severity threshold, i.e. everything a presenter needs
/// to style a rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankScale {
    pub policy: BucketPolicy,
    pub near_threshold: u32,
}

impl RankScale {
    pub fn new(policy: BucketPolicy, near_threshold: u32) -> Self {
        Self {
            policy,
            near_threshold,
        }
    }

    pub fn classify(&self, rank: u32) -> (Tier, Severity) {
        (self.policy.bucket(rank), severity(rank, self.near_threshold))
    }
}

impl Default for RankScale {
    fn default() -> Self {
        Self::new(BucketPolicy::default(), DEFAULT_NEAR_THRESHOLD)
    }
}
