//! The session actor.
//!
//! A live session is one tokio task that owns its [`SessionController`].
//! Player input, timer expiry and explicit stop requests are awaited in a
//! single `select!`, so they are handled strictly one at a time and never
//! race on the same state.

use std::future;
use std::sync::Arc;

use branchtale_content::application::loader::GraphLoader;
use branchtale_content::domain::catalog::{GameCatalog, GameInfo};
use branchtale_core::clock::Clock;
use branchtale_core::command::Command;
use branchtale_core::error::DomainError;
use branchtale_core::input::{InputEvent, InputSource, Subscription};
use branchtale_core::presentation::{PresentationChannel, SurfaceHandle, UserId};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::domain::commands::StartAdventure;
use crate::domain::render::{self, LOG_GLYPH, REPLAY_GLYPH, TIMEOUT_NOTICE};
use crate::domain::state::SessionState;
use crate::domain::timeout::TimeoutSupervisor;

/// Collaborators shared by every session of a process.
#[derive(Clone)]
pub struct SessionServices {
    /// The adventure catalog.
    pub catalog: Arc<GameCatalog>,
    /// Source of story graphs.
    pub loader: Arc<dyn GraphLoader>,
    /// Where sessions render.
    pub channel: Arc<dyn PresentationChannel>,
    /// Where player input comes from.
    pub input: Arc<dyn InputSource>,
    /// Time source for the choice log.
    pub clock: Arc<dyn Clock>,
}

/// Outcome of a start request.
#[derive(Debug)]
pub enum Started {
    /// The catalog was listed; nothing is running.
    Listing(SurfaceHandle),
    /// A session is live on its own task.
    Session(SessionHandle),
}

/// What the actor loop does after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep waiting for events.
    Continue,
    /// Start a fresh session of the same game on the same surface.
    Replay,
    /// The session is over.
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Choose(usize),
    ToggleLog,
    Replay,
}

/// Handles a start request.
///
/// Without a selector the catalog is listed and nothing else happens.
/// Otherwise the selector is resolved, the session is set up and its task
/// spawned.
///
/// # Errors
///
/// Returns `DomainError::GameNotFound` if the selector does not name a
/// catalogued game with a story, or the channel's error if the first render
/// could not be sent.
#[instrument(
    skip_all,
    fields(
        command_type = command.command_type(),
        correlation_id = %command.correlation_id(),
        user = %command.user,
    )
)]
pub async fn start(
    services: &SessionServices,
    command: &StartAdventure,
) -> Result<Started, DomainError> {
    let Some(selector) = command.selector.as_deref() else {
        let listing = render::render_catalog(&services.catalog);
        let surface = services.channel.send(&listing).await?;
        info!(%surface, games = services.catalog.len(), "catalog listed");
        return Ok(Started::Listing(surface));
    };

    let game_id = services.catalog.resolve(selector);
    let controller =
        SessionController::begin(services.clone(), command.user, &game_id, None).await?;
    Ok(Started::Session(controller.spawn()))
}

/// Owns one session: its state, surface, subscription and timer.
pub struct SessionController {
    services: SessionServices,
    user: UserId,
    info: GameInfo,
    state: SessionState,
    surface: SurfaceHandle,
    subscription: Option<Subscription>,
    timer: TimeoutSupervisor,
    offered: bool,
}

impl SessionController {
    /// Sets up a fresh session of `game_id` for `user`.
    ///
    /// Renders the start room onto `surface` if given (replay), or onto a
    /// newly sent surface. Then subscribes to input, arms the timer and
    /// offers the start room's glyphs.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::GameNotFound` if the id has no catalog entry or
    /// no story. Loader and channel errors are passed through.
    #[instrument(skip(services, user), fields(user = %user))]
    pub async fn begin(
        services: SessionServices,
        user: UserId,
        game_id: &str,
        surface: Option<SurfaceHandle>,
    ) -> Result<Self, DomainError> {
        let info = services
            .catalog
            .get(game_id)
            .cloned()
            .ok_or_else(|| DomainError::GameNotFound(game_id.to_owned()))?;
        let graph = services.loader.load(game_id).await?;
        let state = SessionState::new(game_id, graph, services.clock.as_ref());
        let rendered = render::render_state(&state, &info)?;

        let surface = match surface {
            Some(surface) => {
                services.channel.update(surface, &rendered.payload).await?;
                surface
            }
            None => services.channel.send(&rendered.payload).await?,
        };

        let subscription = services.input.subscribe(surface);
        let mut timer = TimeoutSupervisor::for_game(Some(&info));
        timer.arm();

        let mut controller = Self {
            services,
            user,
            info,
            state,
            surface,
            subscription: Some(subscription),
            timer,
            offered: false,
        };
        controller.offer(&rendered.affordances).await;

        info!(
            session_id = %controller.state.id(),
            game_id,
            %surface,
            timeout_secs = controller.timer.duration().as_secs(),
            "session started"
        );
        Ok(controller)
    }

    /// The session state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The surface this session renders to.
    #[must_use]
    pub fn surface(&self) -> SurfaceHandle {
        self.surface
    }

    /// Whether the decision timer is counting down.
    #[must_use]
    pub fn is_timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    /// Handles one input event.
    ///
    /// Events for another surface or from another user, and tokens that
    /// select nothing in the current state, are ignored without touching the
    /// timer or the surface.
    pub async fn handle_input(&mut self, event: InputEvent) -> Flow {
        if self.state.is_stopped() {
            return Flow::Stopped;
        }
        if event.surface() != self.surface {
            return Flow::Continue;
        }

        let (user, token) = match event {
            InputEvent::SurfaceRemoved { .. } => {
                info!(session_id = %self.state.id(), surface = %self.surface, "surface removed");
                self.stop();
                return Flow::Stopped;
            }
            InputEvent::Selection { user, token, .. } => (user, token),
        };

        if user != self.user {
            debug!(session_id = %self.state.id(), %user, "selection from another user ignored");
            return Flow::Continue;
        }
        let Some(action) = self.classify(&token) else {
            debug!(session_id = %self.state.id(), token = %token, "token selects nothing");
            return Flow::Continue;
        };

        self.timer.reset();
        self.clear_affordances().await;

        match action {
            Action::Replay => {
                info!(session_id = %self.state.id(), "replay requested");
                self.stop();
                return Flow::Replay;
            }
            Action::ToggleLog => {
                if let Err(e) = self.state.toggle_log() {
                    warn!(session_id = %self.state.id(), error = %e, "log toggle rejected");
                }
            }
            Action::Choose(index) => {
                if let Err(e) = self.state.apply_choice(index, self.services.clock.as_ref()) {
                    warn!(session_id = %self.state.id(), error = %e, "choice rejected");
                } else {
                    debug!(
                        session_id = %self.state.id(),
                        room = self.state.current_room_id(),
                        "choice applied"
                    );
                }
            }
        }

        if let Err(e) = self.render().await {
            warn!(session_id = %self.state.id(), error = %e, "render failed");
        }
        Flow::Continue
    }

    /// Handles timer expiry: notifies the player unless the story already
    /// ended, clears the glyphs and stops.
    pub async fn on_timeout(&mut self) {
        if self.state.is_stopped() {
            return;
        }
        info!(
            session_id = %self.state.id(),
            ending = self.state.is_in_ending_room(),
            "session timed out"
        );
        if !self.state.is_in_ending_room() {
            if let Err(e) = self.services.channel.notify(self.surface, TIMEOUT_NOTICE).await {
                warn!(session_id = %self.state.id(), error = %e, "timeout notice failed");
            }
        }
        self.clear_affordances().await;
        self.stop();
    }

    /// Stops the session: cancels the timer, revokes the input subscription
    /// and marks the state stopped. Returns `false` if it was already
    /// stopped.
    pub fn stop(&mut self) -> bool {
        self.timer.cancel();
        if let Some(subscription) = self.subscription.take() {
            self.services.input.revoke(subscription.id());
        }
        let stopped = self.state.stop();
        if stopped {
            info!(session_id = %self.state.id(), surface = %self.surface, "session stopped");
        }
        stopped
    }

    /// Spawns the actor task driving this session.
    #[must_use]
    pub fn spawn(self) -> SessionHandle {
        let surface = self.surface;
        let (stop, requested) = oneshot::channel();
        let task = tokio::spawn(drive(self, StopSignal(Some(requested))));
        SessionHandle {
            surface,
            stop: Some(stop),
            task,
        }
    }

    fn classify(&self, token: &str) -> Option<Action> {
        if self.state.is_in_ending_room() {
            match token {
                REPLAY_GLYPH => Some(Action::Replay),
                LOG_GLYPH => Some(Action::ToggleLog),
                _ => None,
            }
        } else {
            self.state.visible_index_of(token).map(Action::Choose)
        }
    }

    async fn render(&mut self) -> Result<(), DomainError> {
        let rendered = render::render_state(&self.state, &self.info)?;
        if let Err(e) = self
            .services
            .channel
            .update(self.surface, &rendered.payload)
            .await
        {
            warn!(session_id = %self.state.id(), error = %e, "surface update failed");
        }
        if self.offered {
            self.clear_affordances().await;
        }
        self.offer(&rendered.affordances).await;
        Ok(())
    }

    async fn offer(&mut self, glyphs: &[String]) {
        if let Err(e) = self
            .services
            .channel
            .offer_affordances(self.surface, glyphs)
            .await
        {
            warn!(surface = %self.surface, error = %e, "offering glyphs failed");
        }
        self.offered = true;
    }

    async fn clear_affordances(&mut self) {
        if let Err(e) = self.services.channel.clear_affordances(self.surface).await {
            warn!(surface = %self.surface, error = %e, "clearing glyphs failed");
        }
        self.offered = false;
    }
}

/// Receiving end of an explicit stop request. A dropped sender detaches the
/// session instead of stopping it.
struct StopSignal(Option<oneshot::Receiver<()>>);

impl StopSignal {
    async fn requested(&mut self) {
        if let Some(receiver) = self.0.as_mut() {
            if receiver.await.is_ok() {
                return;
            }
            self.0 = None;
        }
        future::pending::<()>().await;
    }
}

async fn next_event(subscription: &mut Option<Subscription>) -> Option<InputEvent> {
    match subscription {
        Some(subscription) => subscription.next().await,
        None => future::pending().await,
    }
}

async fn drive(mut controller: SessionController, mut stop: StopSignal) {
    loop {
        let flow = tokio::select! {
            event = next_event(&mut controller.subscription) => match event {
                Some(event) => controller.handle_input(event).await,
                None => {
                    controller.stop();
                    Flow::Stopped
                }
            },
            () = controller.timer.expired() => {
                controller.on_timeout().await;
                Flow::Stopped
            }
            () = stop.requested() => {
                controller.clear_affordances().await;
                controller.stop();
                Flow::Stopped
            }
        };

        match flow {
            Flow::Continue => {}
            Flow::Stopped => break,
            Flow::Replay => {
                let game_id = controller.state.game_id().to_owned();
                match SessionController::begin(
                    controller.services.clone(),
                    controller.user,
                    &game_id,
                    Some(controller.surface),
                )
                .await
                {
                    Ok(fresh) => controller = fresh,
                    Err(e) => {
                        warn!(game_id = %game_id, surface = %controller.surface, error = %e, "replay failed");
                        break;
                    }
                }
            }
        }
    }
}

/// Handle to a running session task.
///
/// Dropping the handle detaches the session; it keeps running until it ends
/// on its own.
#[derive(Debug)]
pub struct SessionHandle {
    surface: SurfaceHandle,
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// The surface the session renders to. Stays the same across replays.
    #[must_use]
    pub fn surface(&self) -> SurfaceHandle {
        self.surface
    }

    /// Whether the session task has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Asks the session to stop without waiting for it.
    pub fn request_stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            // The task may already be gone.
            let _ = stop.send(());
        }
    }

    /// Stops the session and waits for its task to end.
    pub async fn stop(mut self) {
        self.request_stop();
        if let Err(e) = self.task.await {
            warn!(surface = %self.surface, error = %e, "session task failed");
        }
    }
}
