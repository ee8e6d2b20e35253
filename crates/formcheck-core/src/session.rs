//! Frame sequencing for one client session.
//!
//! Frames carry a sequence number. A frame is dropped when it is not newer
//! than the last accepted one or when it predates the most recent reset,
//! so a late frame can never be scored against freshly reset state.

use formcheck_models::{ClientMessage, Landmark, ServerMessage, SessionId, SessionSummary};
use std::time::Duration;
use tracing::{info, info_span, warn, Span};

use crate::analyzer::ExerciseAnalyzer;
use crate::metrics;

/// One analyzer plus the sequence bookkeeping of its stream.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    analyzer: ExerciseAnalyzer,
    span: Span,
    /// Lowest sequence number still accepted.
    baseline: u64,
    last_seq: Option<u64>,
}

impl Session {
    pub fn new(analyzer: ExerciseAnalyzer) -> Self {
        Self::with_id(SessionId::new(), analyzer)
    }

    pub fn with_id(id: SessionId, analyzer: ExerciseAnalyzer) -> Self {
        let span = info_span!("session", session_id = %id, exercise = %analyzer.kind());
        span.in_scope(|| info!("Session opened"));
        metrics::record_session_opened();
        Self {
            id,
            analyzer,
            span,
            baseline: 0,
            last_seq: None,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn analyzer(&self) -> &ExerciseAnalyzer {
        &self.analyzer
    }

    pub fn baseline(&self) -> u64 {
        self.baseline
    }

    /// Handle one client message and produce the reply.
    pub fn handle(&mut self, message: ClientMessage) -> ServerMessage {
        match message {
            ClientMessage::Frame {
                seq,
                timestamp_ms,
                landmarks,
            } => self.frame(seq, timestamp_ms, &landmarks),
            ClientMessage::Reset => self.reset(),
        }
    }

    /// Analyze a frame unless it is stale.
    pub fn frame(
        &mut self,
        seq: u64,
        timestamp_ms: Option<u64>,
        landmarks: &[Landmark],
    ) -> ServerMessage {
        let _guard = self.span.enter();

        let out_of_order = self.last_seq.is_some_and(|last| seq <= last);
        if seq < self.baseline || out_of_order {
            warn!(
                seq,
                baseline = self.baseline,
                last_seq = ?self.last_seq,
                "Dropping stale frame"
            );
            metrics::record_stale_frame();
            return ServerMessage::Stale {
                seq,
                baseline: self.baseline,
            };
        }

        self.last_seq = Some(seq);
        let result = match timestamp_ms {
            Some(ms) => self
                .analyzer
                .process_at(landmarks, Duration::from_millis(ms)),
            None => self.analyzer.process(landmarks),
        };
        ServerMessage::Analysis { seq, result }
    }

    /// Reset the analyzer and move the baseline past every frame seen so far.
    ///
    /// Calling it repeatedly without frames in between yields the same baseline.
    pub fn reset(&mut self) -> ServerMessage {
        let _guard = self.span.enter();

        self.analyzer.reset();
        if let Some(last) = self.last_seq {
            self.baseline = self.baseline.max(last.saturating_add(1));
        }
        metrics::record_reset();
        info!(baseline = self.baseline, "Session reset");
        ServerMessage::reset_ack(self.baseline)
    }

    pub fn summary(&self) -> SessionSummary {
        self.analyzer.summary().clone()
    }

    /// Summary wrapped as a wire message.
    pub fn summary_message(&self) -> ServerMessage {
        ServerMessage::Summary {
            summary: self.summary(),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        metrics::record_session_closed();
    }
}
