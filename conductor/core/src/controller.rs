//! Friend-Action Button Controller
//!
//! The controller owns the page's button board and turns clicks into friend
//! actions:
//!
//! 1. A surface reports a click ([`SurfaceEvent`] or a direct call)
//! 2. The button's current status picks the action
//! 3. The action is POSTed through the [`FriendApi`] with the CSRF token
//! 4. On success the button moves to its next status and the surface is told
//!    to redraw it; on failure the button keeps its status and shows an error
//!
//! # Concurrency
//!
//! A click returns as soon as its request is spawned; the caller can await the
//! returned [`PendingAction`] or drop it (dropping does not cancel the
//! request). While a button's action is in flight, further clicks on it are
//! ignored. Clicks on different buttons run independently and complete in any
//! order.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend::{ActionResponse, ApiError, FriendApi, HttpFriendApi};
use crate::button::{
    ActionButton, AttributeError, AuthorId, ButtonAttributes, ButtonBoard, ButtonId,
};
use crate::csrf::TokenSource;
use crate::endpoint::Endpoint;
use crate::events::SurfaceEvent;
use crate::messages::ButtonMessage;
use crate::payload::FriendActionRequest;
use crate::render::ButtonView;
use crate::status::{ButtonStatus, FriendAction};

/// Controller configuration
///
/// Everything the page used to read from globals is passed in here.
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// Identity of the logged-in author
    pub author: AuthorId,
    /// Site base URL (e.g., `http://localhost:8000`)
    pub base_url: String,
    /// Page the actions are POSTed to
    pub endpoint: Endpoint,
    /// Request timeout; `None` leaves the HTTP client's default
    pub request_timeout: Option<Duration>,
}

impl ControllerConfig {
    /// Configuration posting to the logged-in author's friends page
    pub fn new(author: AuthorId, base_url: impl Into<String>) -> Self {
        Self {
            author,
            base_url: base_url.into(),
            endpoint: Endpoint::ManageFriends(author),
            request_timeout: None,
        }
    }

    /// Use a different endpoint
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Apply a request timeout
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Full URL actions are POSTed to
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        self.endpoint.url(&self.base_url)
    }
}

/// Why a click did not send a request
#[derive(Debug, Error)]
pub enum IgnoreReason {
    /// No button with this id is on the page
    #[error("no button with id {0}")]
    UnknownButton(ButtonId),

    /// The button already has an action in flight
    #[error("button {0} already has an action in flight")]
    InFlight(ButtonId),

    /// The clicked element's attributes do not describe a valid button
    #[error(transparent)]
    InvalidAttributes(#[from] AttributeError),
}

/// A successful action
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionSuccess {
    /// Button the action was for
    pub id: ButtonId,
    /// Action that was sent
    pub action: FriendAction,
    /// Status before the action
    pub previous: ButtonStatus,
    /// Status after the action
    pub status: ButtonStatus,
    /// Backend reply
    pub response: ActionResponse,
}

/// A failed action
#[derive(Debug)]
pub struct ActionFailure {
    /// Button the action was for
    pub id: ButtonId,
    /// Action that was sent
    pub action: FriendAction,
    /// What went wrong
    pub error: ApiError,
}

/// Typed result of one action
pub type ActionResult = Result<ActionSuccess, ActionFailure>;

/// An action in flight
pub struct PendingAction {
    /// Button the action is for
    pub id: ButtonId,
    /// Action being sent
    pub action: FriendAction,
    handle: JoinHandle<ActionResult>,
}

impl PendingAction {
    /// Wait for the action to finish
    pub async fn outcome(self) -> ActionResult {
        match self.handle.await {
            Ok(result) => result,
            Err(e) => Err(ActionFailure {
                id: self.id,
                action: self.action,
                error: ApiError::Transport(format!("action task ended early: {e}")),
            }),
        }
    }
}

impl std::fmt::Debug for PendingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingAction")
            .field("id", &self.id)
            .field("action", &self.action)
            .finish_non_exhaustive()
    }
}

/// What happened to a click
#[derive(Debug)]
pub enum ClickOutcome {
    /// A request was sent
    Dispatched(PendingAction),
    /// Nothing was sent
    Ignored(IgnoreReason),
}

impl ClickOutcome {
    /// Whether a request was sent
    #[must_use]
    pub fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched(_))
    }
}

/// Board plus a counter bumped on every page load
///
/// Completions from a previous page load are dropped instead of being applied
/// to a re-rendered button that happens to reuse the id.
#[derive(Default)]
struct PageState {
    board: ButtonBoard,
    generation: u64,
}

/// The friend-action button controller
pub struct ButtonController<A: FriendApi> {
    /// Configuration
    config: ControllerConfig,
    /// Social backend
    api: Arc<A>,
    /// Anti-forgery token source
    tokens: Arc<dyn TokenSource>,
    /// Buttons of the current page
    page: Arc<Mutex<PageState>>,
    /// Channel to the rendering surface
    tx: mpsc::Sender<ButtonMessage>,
}

impl ButtonController<HttpFriendApi> {
    /// Create a controller that posts over HTTP to the configured endpoint
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be built.
    pub fn with_http(
        config: ControllerConfig,
        tokens: impl TokenSource + 'static,
        tx: mpsc::Sender<ButtonMessage>,
    ) -> Result<Self, ApiError> {
        let api = HttpFriendApi::new(config.endpoint_url(), config.request_timeout)?;
        Ok(Self::new(api, config, tokens, tx))
    }
}

impl<A: FriendApi + 'static> ButtonController<A> {
    /// Create a new controller with the given backend
    pub fn new(
        api: A,
        config: ControllerConfig,
        tokens: impl TokenSource + 'static,
        tx: mpsc::Sender<ButtonMessage>,
    ) -> Self {
        Self {
            config,
            api: Arc::new(api),
            tokens: Arc::new(tokens),
            page: Arc::new(Mutex::new(PageState::default())),
            tx,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Backend name
    pub fn api_name(&self) -> &str {
        self.api.name()
    }

    /// Snapshot of one button
    pub fn button(&self, id: &ButtonId) -> Option<ActionButton> {
        self.page.lock().board.get(id).cloned()
    }

    /// Views of every button, in render order
    pub fn buttons(&self) -> Vec<ButtonView> {
        self.page.lock().board.iter().map(ButtonView::from).collect()
    }

    /// Replace the board with a freshly rendered page
    ///
    /// Buttons with invalid attributes are left off the board; their errors
    /// are returned.
    pub async fn load_page(&self, buttons: Vec<ButtonAttributes>) -> Vec<AttributeError> {
        let mut errors = Vec::new();
        let views = {
            let mut page = self.page.lock();
            page.board.remove_all();
            page.generation += 1;

            for attrs in &buttons {
                if let Err(e) = page.board.load(attrs) {
                    debug!(error = %e, "Skipping button");
                    errors.push(e);
                }
            }
            page.board.iter().map(ButtonView::from).collect::<Vec<_>>()
        };

        debug!(buttons = views.len(), skipped = errors.len(), "Page loaded");
        for view in views {
            self.send(ButtonMessage::Rendered(view)).await;
        }
        errors
    }

    /// Handle a click on an element, reading its bound attributes
    ///
    /// An element whose attributes do not describe a valid button (for
    /// example an unrecognized status) sends nothing. If the page already
    /// knows the button, its tracked status wins over the attributes.
    pub async fn handle_click(&self, attributes: &ButtonAttributes) -> ClickOutcome {
        let button = match ActionButton::from_attributes(attributes) {
            Ok(button) => button,
            Err(e) => {
                debug!(button_id = %attributes.id, error = %e, "Ignoring click");
                return self
                    .ignore(ButtonId::new(attributes.id.clone()), e.into())
                    .await;
            }
        };

        let id = button.id.clone();
        {
            let mut page = self.page.lock();
            if !page.board.contains(&id) {
                page.board.insert(button);
            }
        }

        self.click(&id).await
    }

    /// Handle a click on a button already on the page
    pub async fn click(&self, id: &ButtonId) -> ClickOutcome {
        let claimed = {
            let mut page = self.page.lock();
            let generation = page.generation;
            match page.board.get_mut(id) {
                None => Err(IgnoreReason::UnknownButton(id.clone())),
                Some(button) if button.is_pending() => Err(IgnoreReason::InFlight(id.clone())),
                Some(button) => {
                    let request = FriendActionRequest::for_button(button, self.config.author);
                    let username = button.username.clone();
                    button.mark_pending();
                    Ok((request, username, ButtonView::from(&*button), generation))
                }
            }
        };

        let (request, username, view, generation) = match claimed {
            Ok(claimed) => claimed,
            Err(reason) => {
                debug!(button_id = %id, reason = %reason, "Ignoring click");
                return self.ignore(id.clone(), reason).await;
            }
        };

        let action = request.action;
        info!(
            button_id = %id,
            action = %action,
            username = %username,
            "Author wants to {action} {username}"
        );

        let token = self.tokens.token();
        if token.is_none() {
            warn!(button_id = %id, "No CSRF token available; sending without it");
        }

        self.send(ButtonMessage::Pending {
            id: id.clone(),
            view,
        })
        .await;

        let api = Arc::clone(&self.api);
        let page = Arc::clone(&self.page);
        let tx = self.tx.clone();
        let task_id = id.clone();

        let handle = tokio::spawn(async move {
            let result = api.submit(&request, token.as_ref()).await;
            complete(&page, &tx, generation, task_id, action, result).await
        });

        ClickOutcome::Dispatched(PendingAction {
            id: id.clone(),
            action,
            handle,
        })
    }

    /// Clear the error shown on a button
    ///
    /// Buttons without an error are left alone and nothing is sent.
    pub async fn dismiss_error(&self, id: &ButtonId) {
        let view = {
            let mut page = self.page.lock();
            page.board
                .get_mut(id)
                .and_then(|button| button.clear_error().then(|| ButtonView::from(&*button)))
        };

        if let Some(view) = view {
            self.send(ButtonMessage::Rendered(view)).await;
        }
    }

    /// Handle an event from the UI surface
    ///
    /// Clicks are dispatched without waiting for their outcome; the surface
    /// learns about it through [`ButtonMessage`]s.
    pub async fn handle_event(&self, event: SurfaceEvent) -> anyhow::Result<()> {
        match event {
            SurfaceEvent::PageLoaded { buttons } => {
                self.load_page(buttons).await;
            }
            SurfaceEvent::ButtonClicked { id } => {
                self.click(&id).await;
            }
            SurfaceEvent::ElementClicked { attributes } => {
                self.handle_click(&attributes).await;
            }
            SurfaceEvent::ErrorDismissed { id } => {
                self.dismiss_error(&id).await;
            }
        }
        Ok(())
    }

    /// Report an ignored click to the surface
    async fn ignore(&self, id: ButtonId, reason: IgnoreReason) -> ClickOutcome {
        self.send(ButtonMessage::Rejected {
            id,
            reason: reason.to_string(),
        })
        .await;
        ClickOutcome::Ignored(reason)
    }

    /// Send a message to the surface
    async fn send(&self, msg: ButtonMessage) {
        if self.tx.send(msg).await.is_err() {
            debug!("Surface channel closed");
        }
    }
}

/// Apply a finished action to the board and notify the surface
async fn complete(
    page: &Mutex<PageState>,
    tx: &mpsc::Sender<ButtonMessage>,
    generation: u64,
    id: ButtonId,
    action: FriendAction,
    result: Result<ActionResponse, ApiError>,
) -> ActionResult {
    let (message, outcome) = {
        let mut page = page.lock();
        let current = page.generation == generation;
        let button = page.board.get_mut(&id).filter(|_| current);

        match (result, button) {
            (Ok(response), Some(button)) => {
                let previous = button.status;
                button.apply_success();
                info!(
                    button_id = %id,
                    action = %action,
                    status = %button.status,
                    "{action} successful"
                );
                let success = ActionSuccess {
                    id: id.clone(),
                    action,
                    previous,
                    status: button.status,
                    response,
                };
                (Some(ButtonMessage::Updated(ButtonView::from(&*button))), Ok(success))
            }
            (Err(error), Some(button)) => {
                warn!(button_id = %id, action = %action, error = %error, "Friend action failed");
                button.mark_failed(error.summary());
                let message = ButtonMessage::ActionFailed {
                    view: ButtonView::from(&*button),
                    error: error.to_string(),
                };
                (Some(message), Err(ActionFailure { id, action, error }))
            }
            (Ok(response), None) => {
                debug!(button_id = %id, "Button gone before action finished");
                let previous = action_status(action);
                let success = ActionSuccess {
                    id,
                    action,
                    previous,
                    status: previous.next(),
                    response,
                };
                (None, Ok(success))
            }
            (Err(error), None) => {
                debug!(button_id = %id, error = %error, "Button gone before action failed");
                (None, Err(ActionFailure { id, action, error }))
            }
        }
    };

    if let Some(message) = message {
        if tx.send(message).await.is_err() {
            debug!("Surface channel closed");
        }
    }
    outcome
}

/// Status whose click sends `action`
fn action_status(action: FriendAction) -> ButtonStatus {
    match action {
        FriendAction::Follow => ButtonStatus::Follow,
        FriendAction::Unfollow => ButtonStatus::Unfollow,
        FriendAction::Unfriend => ButtonStatus::Unfriend,
        FriendAction::AcceptFriendRequest => ButtonStatus::AcceptFriendRequest,
    }
}
