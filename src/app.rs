use crate::enhance::Enhance;
use crate::error::Error;
use crate::models::{self, Notice, NoticeDraft, User, DEFAULT_AUTHOR};
use crate::query;
use crate::session::{AdminCredentials, SessionController};
use crate::storage::KvStore;
use crate::store::NoticeStore;
use crate::view::{transition, LoginForm, View, ViewEvent, ViewState};

/// The single-user controller: owns the persistence adapter, the notice
/// collection, the session and the view state, and routes every UI event
/// through the pure transition function with the live session check.
pub struct App<S: KvStore> {
    kv: S,
    store: NoticeStore,
    session: SessionController,
    state: ViewState,
    search: String,
    polishing: bool,
}

impl<S: KvStore> App<S> {
    pub fn new(kv: S, credentials: AdminCredentials) -> Result<Self, Error> {
        let store = NoticeStore::load(&kv, models::now_millis())?;
        Self::from_parts(kv, store, credentials)
    }

    /// Wires a controller around an already-loaded store. `main` uses this
    /// after deciding how to handle a corrupt collection document.
    pub fn from_parts(
        kv: S,
        store: NoticeStore,
        credentials: AdminCredentials,
    ) -> Result<Self, Error> {
        let mut session = SessionController::new(credentials);
        session.restore(&kv)?;
        Ok(Self {
            kv,
            store,
            session,
            state: ViewState::default(),
            search: String::new(),
            polishing: false,
        })
    }

    pub fn dispatch(&mut self, event: ViewEvent) {
        let state = std::mem::take(&mut self.state);
        self.state = transition(state, event, self.session.is_authenticated());
    }

    /// The screen to render right now. Privileged screens are re-derived
    /// against the live session on every call.
    pub fn current_view(&self) -> View {
        self.state.effective_view(self.session.is_authenticated())
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Recomputed from the live collection and query on every read.
    pub fn visible_notices(&self) -> Vec<&Notice> {
        query::project(self.store.notices(), &self.search)
    }

    pub fn notices(&self) -> &[Notice] {
        self.store.notices()
    }

    /// Opens the detail screen for an existing notice; an unknown id is a
    /// no-op.
    pub fn open_notice(&mut self, id: &str) {
        if self.store.get(id).is_some() {
            self.dispatch(ViewEvent::SelectNotice(id.to_string()));
        }
    }

    /// Resolved against the collection on every read, so a notice deleted
    /// while selected simply renders as absent.
    pub fn selected_notice(&self) -> Option<&Notice> {
        self.state
            .selected
            .as_deref()
            .and_then(|id| self.store.get(id))
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<User, Error> {
        let user = self.session.login(&self.kv, username, password)?;
        tracing::info!(username = %user.username, "admin session opened");
        self.dispatch(ViewEvent::LoginSucceeded);
        Ok(user)
    }

    /// Submits the in-progress login form.
    pub fn submit_login(&mut self) -> Result<User, Error> {
        let LoginForm { username, password } = self.state.login_form.clone();
        self.login(&username, &password)
    }

    pub fn logout(&mut self) -> Result<(), Error> {
        self.session.logout(&self.kv)?;
        tracing::info!("admin session closed");
        self.dispatch(ViewEvent::Logout);
        Ok(())
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.current()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn login_form_mut(&mut self) -> &mut LoginForm {
        &mut self.state.login_form
    }

    pub fn notice_form(&self) -> &NoticeDraft {
        &self.state.notice_form
    }

    pub fn notice_form_mut(&mut self) -> &mut NoticeDraft {
        &mut self.state.notice_form
    }

    /// Publishes the in-progress draft. The author is the live session's
    /// display name, or the office default when nobody is logged in.
    pub fn create_notice(&mut self) -> Result<Notice, Error> {
        let author = self
            .session
            .current()
            .map(|user| user.username.clone())
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_string());
        let draft = self.state.notice_form.clone();
        let notice = self.store.create(&self.kv, draft, &author)?;
        tracing::info!(id = %notice.id, category = %notice.category, "notice created");
        self.dispatch(ViewEvent::NoticeCreated);
        Ok(notice)
    }

    pub fn delete_notice(&mut self, id: &str) -> Result<bool, Error> {
        let removed = self.store.delete(&self.kv, id)?;
        if removed {
            tracing::info!(id, "notice deleted");
        }
        Ok(removed)
    }

    /// Replaces the stored collection with the seed set; the explicit
    /// recovery action for a corrupt document.
    pub fn reset_to_seed(&mut self) -> Result<(), Error> {
        self.store = NoticeStore::reseed(&self.kv, models::now_millis())?;
        Ok(())
    }

    pub fn is_polishing(&self) -> bool {
        self.polishing
    }

    /// Sends the draft through the text gateway. No-op while a call is
    /// already in flight or when there is nothing to polish; on failure the
    /// draft is kept as-is and the error stays out of the UI path. Returns
    /// whether the draft content was replaced.
    pub async fn polish_draft<E: Enhance>(&mut self, enhancer: &E) -> bool {
        if self.polishing || self.state.notice_form.content.is_empty() {
            return false;
        }
        self.polishing = true;
        let title = self.state.notice_form.title.clone();
        let content = self.state.notice_form.content.clone();
        let result = enhancer.enhance(&title, &content).await;
        self.polishing = false;
        match result {
            Ok(polished) => {
                self.state.notice_form.content = polished;
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "text polish failed, keeping the draft");
                false
            }
        }
    }
}
