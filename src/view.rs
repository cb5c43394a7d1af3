use crate::models::NoticeDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Detail,
    Login,
    Admin,
    Create,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Which screen is active plus the transient state scoped to it. Drafts are
/// discarded whenever navigation leaves their view without a submit.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub view: View,
    pub selected: Option<String>,
    pub login_form: LoginForm,
    pub notice_form: NoticeDraft,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            view: View::Home,
            selected: None,
            login_form: LoginForm::default(),
            notice_form: NoticeDraft::default(),
        }
    }
}

impl ViewState {
    /// Privileged screens exist only while a session is live. This is
    /// recomputed on every read rather than trusting however `view` was
    /// reached, so a stale transition history cannot expose the admin area.
    pub fn effective_view(&self, authenticated: bool) -> View {
        match self.view {
            View::Admin | View::Create if !authenticated => View::Home,
            view => view,
        }
    }

    fn goto(mut self, next: View) -> Self {
        if self.view == View::Login && next != View::Login {
            self.login_form = LoginForm::default();
        }
        if self.view == View::Create && next != View::Create {
            self.notice_form = NoticeDraft::default();
        }
        if next != View::Detail {
            self.selected = None;
        }
        self.view = next;
        self
    }
}

#[derive(Debug, Clone)]
pub enum ViewEvent {
    SelectNotice(String),
    Back,
    OpenLogin,
    CancelLogin,
    LoginSucceeded,
    GoHome,
    GoAdmin,
    Compose,
    CancelCompose,
    NoticeCreated,
    Logout,
}

/// Pure reducer over navigation events. Illegal moves return the state
/// unchanged; `admin` and `create` are only enterable with a live session.
pub fn transition(state: ViewState, event: ViewEvent, authenticated: bool) -> ViewState {
    match (state.view, event) {
        (View::Home, ViewEvent::SelectNotice(id)) => {
            let mut next = state.goto(View::Detail);
            next.selected = Some(id);
            next
        }
        (View::Detail, ViewEvent::Back) => state.goto(View::Home),
        (View::Home, ViewEvent::OpenLogin) if !authenticated => state.goto(View::Login),
        (View::Login, ViewEvent::LoginSucceeded) if authenticated => state.goto(View::Admin),
        (View::Login, ViewEvent::CancelLogin) => state.goto(View::Home),
        (View::Admin, ViewEvent::Compose) if authenticated => state.goto(View::Create),
        (View::Create, ViewEvent::CancelCompose) => state.goto(View::Admin),
        (View::Create, ViewEvent::NoticeCreated) => state.goto(View::Admin),
        (_, ViewEvent::GoHome) => state.goto(View::Home),
        (_, ViewEvent::GoAdmin) if authenticated => state.goto(View::Admin),
        (_, ViewEvent::Logout) => state.goto(View::Home),
        (_, _) => state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(view: View) -> ViewState {
        ViewState {
            view,
            ..ViewState::default()
        }
    }

    #[test]
    fn select_notice_moves_home_to_detail() {
        let state = transition(at(View::Home), ViewEvent::SelectNotice("n1".into()), false);
        assert_eq!(state.view, View::Detail);
        assert_eq!(state.selected.as_deref(), Some("n1"));

        let state = transition(state, ViewEvent::Back, false);
        assert_eq!(state.view, View::Home);
        assert!(state.selected.is_none());
    }

    #[test]
    fn select_notice_outside_home_is_ignored() {
        let state = transition(at(View::Admin), ViewEvent::SelectNotice("n1".into()), true);
        assert_eq!(state.view, View::Admin);
        assert!(state.selected.is_none());
    }

    #[test]
    fn login_flow() {
        let state = transition(at(View::Home), ViewEvent::OpenLogin, false);
        assert_eq!(state.view, View::Login);
        let state = transition(state, ViewEvent::LoginSucceeded, true);
        assert_eq!(state.view, View::Admin);
    }

    #[test]
    fn open_login_while_authenticated_is_ignored() {
        let state = transition(at(View::Home), ViewEvent::OpenLogin, true);
        assert_eq!(state.view, View::Home);
    }

    #[test]
    fn cancel_login_discards_the_draft() {
        let mut state = at(View::Login);
        state.login_form.username = "admin".into();
        state.login_form.password = "hunter2".into();
        let state = transition(state, ViewEvent::CancelLogin, false);
        assert_eq!(state.view, View::Home);
        assert!(state.login_form.username.is_empty());
        assert!(state.login_form.password.is_empty());
    }

    #[test]
    fn compose_requires_authentication() {
        let state = transition(at(View::Admin), ViewEvent::Compose, true);
        assert_eq!(state.view, View::Create);
        let state = transition(at(View::Admin), ViewEvent::Compose, false);
        assert_eq!(state.view, View::Admin);
    }

    #[test]
    fn leaving_create_resets_the_notice_draft() {
        let mut state = at(View::Create);
        state.notice_form.title = "测试".into();
        let state = transition(state, ViewEvent::CancelCompose, true);
        assert_eq!(state.view, View::Admin);
        assert!(state.notice_form.title.is_empty());
    }

    #[test]
    fn go_admin_denied_without_session_regardless_of_history() {
        // the state says admin, the session is gone: navigation stays put
        let state = transition(at(View::Home), ViewEvent::GoAdmin, false);
        assert_eq!(state.view, View::Home);

        let state = transition(at(View::Detail), ViewEvent::GoAdmin, true);
        assert_eq!(state.view, View::Admin);
        let state = transition(state, ViewEvent::Logout, false);
        assert_eq!(state.view, View::Home);
        let state = transition(state, ViewEvent::GoAdmin, false);
        assert_eq!(state.view, View::Home);
    }

    #[test]
    fn effective_view_downgrades_stale_privileged_views() {
        assert_eq!(at(View::Admin).effective_view(false), View::Home);
        assert_eq!(at(View::Create).effective_view(false), View::Home);
        assert_eq!(at(View::Admin).effective_view(true), View::Admin);
        assert_eq!(at(View::Detail).effective_view(false), View::Detail);
    }
}
