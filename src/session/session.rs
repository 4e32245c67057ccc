use super::config::{SchedulerConfig, SessionConfig};
use super::error::SessionError;
use super::model::{EndReason, GdSession, SessionPhase, SessionSummary};
use super::scheduler::Scheduler;
use super::state::{Effect, FollowUp, SessionEvent, SessionNotice, SessionState};
use super::stats::SessionStats;
use crate::random::{RandomSource, StdRandom};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Buffered notices per subscriber before the oldest are dropped
const NOTICE_CAPACITY: usize = 256;

/// Everything mutated under the session lock
struct Core {
    state: SessionState,
    random: Box<dyn RandomSource>,
    summary: Option<SessionSummary>,
}

/// State shared between the handle and its scheduled tasks
struct Shared {
    session_id: String,
    timing: SchedulerConfig,
    core: Mutex<Core>,
    scheduler: Scheduler,
    notices: broadcast::Sender<SessionNotice>,
    phase: watch::Sender<SessionPhase>,
}

/// A running group-discussion session
///
/// Owns the countdown, the AI line scheduler and every transient timer. All
/// of them check the session phase inside the same critical section as their
/// mutation, so nothing lands after `end_session` or `dispose` returns.
pub struct SessionHandle {
    shared: Arc<Shared>,
    phase_rx: watch::Receiver<SessionPhase>,
    disposed: AtomicBool,
}

impl SessionHandle {
    /// Create and start a session. Must be called from within a tokio runtime.
    pub fn create(
        config: SessionConfig,
        random: Box<dyn RandomSource>,
    ) -> Result<Self, SessionError> {
        config.validate()?;

        let session_id = format!("gd-{}", uuid::Uuid::new_v4());
        info!(
            "Creating discussion session: {} ({} AI participants, {}s)",
            session_id,
            config.ai_participants.len(),
            config.duration_secs
        );

        let (notices, _) = broadcast::channel(NOTICE_CAPACITY);
        let (phase, phase_rx) = watch::channel(SessionPhase::Active);

        let shared = Arc::new(Shared {
            session_id,
            timing: config.scheduler.clone(),
            core: Mutex::new(Core {
                state: SessionState::new(&config, Utc::now()),
                random,
                summary: None,
            }),
            scheduler: Scheduler::new(),
            notices,
            phase,
        });

        Shared::start_timer(&shared);
        Shared::start_ai_lines(&shared);

        info!("Discussion session started: {}", shared.session_id);

        Ok(Self {
            shared,
            phase_rx,
            disposed: AtomicBool::new(false),
        })
    }

    /// Create a session with the stock topic, roster and timings
    pub fn create_default() -> Result<Self, SessionError> {
        Self::create(SessionConfig::default(), Box::new(StdRandom::from_entropy()))
    }

    pub fn id(&self) -> &str {
        &self.shared.session_id
    }

    /// Snapshot of the whole session
    pub async fn session(&self) -> GdSession {
        self.shared.core.lock().await.state.snapshot()
    }

    pub async fn time_remaining(&self) -> u32 {
        self.shared.core.lock().await.state.time_remaining()
    }

    pub fn phase(&self) -> SessionPhase {
        *self.phase_rx.borrow()
    }

    pub fn is_active(&self) -> bool {
        self.phase().is_active()
    }

    pub async fn stats(&self) -> SessionStats {
        let core = self.shared.core.lock().await;
        SessionStats::from_state(&core.state)
    }

    /// Final view of the session, available once it has ended
    pub async fn summary(&self) -> Option<SessionSummary> {
        self.shared.core.lock().await.summary.clone()
    }

    /// Receive change notices from now on
    pub fn subscribe(&self) -> broadcast::Receiver<SessionNotice> {
        self.shared.notices.subscribe()
    }

    /// Watch the lifecycle phase
    pub fn watch_phase(&self) -> watch::Receiver<SessionPhase> {
        self.phase_rx.clone()
    }

    /// Resolve once the session has ended, by timeout or explicitly
    pub async fn wait_until_ended(&self) -> Option<SessionSummary> {
        let mut rx = self.phase_rx.clone();
        let ended = rx.wait_for(|p| *p == SessionPhase::Ended).await.is_ok();
        if !ended {
            warn!("Phase channel closed before session {} ended", self.id());
        }
        self.summary().await
    }

    pub async fn toggle_mute(&self) {
        self.shared.apply(SessionEvent::ToggleMute).await;
    }

    pub async fn toggle_video(&self) {
        self.shared.apply(SessionEvent::ToggleVideo).await;
    }

    pub async fn toggle_hand_raise(&self) {
        self.shared.apply(SessionEvent::ToggleHandRaise).await;
    }

    pub async fn toggle_recording(&self) {
        self.shared.apply(SessionEvent::ToggleRecording).await;
    }

    pub async fn toggle_screen_share(&self) {
        self.shared.apply(SessionEvent::ToggleScreenShare).await;
    }

    /// Send a line as the human participant; blank input is ignored.
    /// Returns whether the line reached the transcript.
    pub async fn send_message(&self, text: &str) -> bool {
        self.shared
            .apply(SessionEvent::Send {
                content: text.to_string(),
                at: Utc::now(),
            })
            .await
    }

    /// Float an emoji reaction over the room
    pub async fn react(&self, emoji: &str) {
        self.shared
            .apply(SessionEvent::React {
                emoji: emoji.to_string(),
                at: Utc::now(),
            })
            .await;
    }

    /// End the session now. No-op if it already ended.
    pub async fn end_session(&self) {
        self.shared
            .apply(SessionEvent::End(EndReason::EndedByUser))
            .await;
    }

    /// Cancel all pending timed work and end the session if still active
    pub async fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            debug!("Session {} already disposed", self.id());
            return;
        }

        info!("Disposing discussion session: {}", self.id());
        self.shared.apply(SessionEvent::End(EndReason::Disposed)).await;
        self.shared.scheduler.cancel_all();
    }

    /// Number of scheduled tasks still in flight
    pub fn pending_tasks(&self) -> usize {
        self.shared.scheduler.pending()
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if !self.disposed.load(Ordering::SeqCst) {
            warn!("Session {} dropped without dispose", self.shared.session_id);
        }
        self.shared.scheduler.cancel_all();
    }
}

impl Shared {
    /// Lock, apply one event and act on its effect
    /// Returns false when the state machine ignored the event
    async fn apply(self: &Arc<Self>, event: SessionEvent) -> bool {
        let mut core = self.core.lock().await;
        let effect = core.state.apply(event);
        let applied = !effect.is_ignored();
        self.dispatch(&mut core, effect);
        applied
    }

    /// Publish notices, schedule follow-ups and tear down on deactivation.
    /// Runs with the session lock held.
    fn dispatch(self: &Arc<Self>, core: &mut Core, effect: Effect) {
        if effect.is_ignored() {
            return;
        }

        for notice in effect.notices {
            // No subscribers is fine
            let _ = self.notices.send(notice);
        }

        match effect.follow_up {
            Some(FollowUp::ResetSpeaking { participant_id }) => {
                let shared = Arc::clone(self);
                self.scheduler.spawn_after(self.timing.speaking_window, async move {
                    shared
                        .apply(SessionEvent::SpeakingElapsed { participant_id })
                        .await;
                });
            }
            Some(FollowUp::ExpireReaction { reaction_id }) => {
                let shared = Arc::clone(self);
                self.scheduler.spawn_after(self.timing.reaction_ttl, async move {
                    shared
                        .apply(SessionEvent::ReactionExpired { reaction_id })
                        .await;
                });
            }
            None => {}
        }

        if let Some(reason) = effect.ended {
            self.conclude(core, reason);
        }
    }

    /// Ending → Ended: stop every timer, freeze the transcript
    fn conclude(&self, core: &mut Core, reason: EndReason) {
        self.phase.send_replace(SessionPhase::Ending);
        self.scheduler.cancel_all();

        core.summary = core.state.finish(Utc::now());
        self.phase.send_replace(SessionPhase::Ended);

        let time_remaining = core.state.time_remaining();
        let _ = self.notices.send(SessionNotice::Ended {
            reason,
            time_remaining,
        });

        info!(
            "Session {} ended ({:?}, {}s remaining, {} transcript lines)",
            self.session_id,
            reason,
            time_remaining,
            core.state.transcript().len()
        );
    }

    fn start_timer(shared: &Arc<Self>) {
        let tick = shared.timing.tick;
        let this = Arc::clone(shared);

        shared.scheduler.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + tick, tick);
            loop {
                ticker.tick().await;

                let mut core = this.core.lock().await;
                if !core.state.is_active() {
                    break;
                }
                let effect = core.state.apply(SessionEvent::Tick);
                let ended = effect.ended.is_some();
                this.dispatch(&mut core, effect);
                if ended {
                    break;
                }
            }
            debug!("Countdown stopped for {}", this.session_id);
        });
    }

    fn start_ai_lines(shared: &Arc<Self>) {
        let initial = Arc::clone(shared);
        shared
            .scheduler
            .spawn_after(shared.timing.initial_delay, async move {
                initial.emit_ai_line().await;
            });

        // Cadence is anchored at session start, independent of the first line
        let this = Arc::clone(shared);
        shared.scheduler.spawn(async move {
            loop {
                let gap = match this.next_interval().await {
                    Some(gap) => gap,
                    None => break,
                };
                tokio::time::sleep(gap).await;
                if !this.emit_ai_line().await {
                    break;
                }
            }
            debug!("AI line scheduler stopped for {}", this.session_id);
        });
    }

    /// Draw the next gap between AI lines, or `None` once inactive
    async fn next_interval(&self) -> Option<Duration> {
        let mut core = self.core.lock().await;
        if !core.state.is_active() {
            return None;
        }
        let min = self.timing.min_interval;
        let spread = self.timing.max_interval.saturating_sub(min);
        Some(min + spread.mul_f64(core.random.next_unit()))
    }

    /// Emit one scripted line from a random AI participant.
    /// Returns false once the session is no longer active.
    async fn emit_ai_line(self: &Arc<Self>) -> bool {
        let mut core = self.core.lock().await;
        if !core.state.is_active() {
            return false;
        }

        let ai_count = core.state.ai_count();
        let speaker_slot = core.random.next_index(ai_count);
        let effect = core.state.apply(SessionEvent::AiTurn {
            speaker_slot,
            at: Utc::now(),
        });

        if let Some(SessionNotice::MessageAppended(message)) = effect.notices.first() {
            debug!(
                "AI line #{} from {}",
                core.state.response_cursor(),
                message.participant_name
            );
        }

        self.dispatch(&mut core, effect);
        true
    }
}
