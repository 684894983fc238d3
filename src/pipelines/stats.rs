use std::time::{Duration, Instant};

/// Statistics for one annotation run.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStats {
    /// Total execution time.
    pub total_time: Duration,
    /// Number of sentences processed.
    pub sentences: usize,
    /// Number of tokens that received a prediction string.
    pub tokens_annotated: usize,
}

impl AnnotationStats {
    /// Create a new stats tracker (call at start of operation).
    pub(crate) fn start() -> AnnotationStatsBuilder {
        AnnotationStatsBuilder {
            start_time: Instant::now(),
            sentences: 0,
            tokens_annotated: 0,
        }
    }
}

/// Builder for AnnotationStats - tracks timing from creation to finish.
pub(crate) struct AnnotationStatsBuilder {
    start_time: Instant,
    sentences: usize,
    tokens_annotated: usize,
}

impl AnnotationStatsBuilder {
    pub fn record_sentence(&mut self) {
        self.sentences += 1;
    }

    pub fn record_token(&mut self) {
        self.tokens_annotated += 1;
    }

    pub fn finish(self) -> AnnotationStats {
        AnnotationStats {
            total_time: self.start_time.elapsed(),
            sentences: self.sentences,
            tokens_annotated: self.tokens_annotated,
        }
    }
}
