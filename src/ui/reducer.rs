use crate::auth::Session;
use crate::ui::state::{Banner, UiState};
use crate::workflow::WorkflowEvent;

pub const LOGIN_SUCCESS_BANNER: &str =
    "You're logged in successfully. Your data is safe with us.";

/// Everything the boundary feeds into the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// A login callback was consumed.
    SessionEstablished {
        session: Session,
        clean_location: String,
    },
    /// The backend handed over the authorization URL.
    LoginUrlReceived { url: String },
    LoginFailed { message: String },
    Workflow(WorkflowEvent),
    /// The banner timer fired for the given generation.
    BannerExpired { generation: u64 },
    ThemeToggled,
}

/// One-shot side effects the boundary executes exactly once per transition,
/// never re-derived from state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Full navigation to the authorization URL.
    Navigate { url: String },
    /// Rewrite the visible location (same path, no query) so the login
    /// callback cannot be replayed.
    RewriteLocation { location: String },
    /// Arm the banner-expiry timer, replacing any previous one. The expiry
    /// window is boundary policy (config, 5 seconds by default).
    ScheduleBannerExpiry { generation: u64 },
}

/// Pure state transition. The returned snapshot stays mutually consistent:
/// while loading there is no error and no result, an error always clears the
/// progress log, and the theme never interacts with the rest.
pub fn reduce(state: &UiState, event: UiEvent) -> (UiState, Vec<Command>) {
    let mut next = state.clone();
    let mut commands = Vec::new();

    match event {
        UiEvent::SessionEstablished {
            session,
            clean_location,
        } => {
            // First session wins; a duplicate callback still strips its query.
            if next.session.is_none() {
                next.session = Some(session);
            }
            next.banner_generation += 1;
            let generation = next.banner_generation;
            next.banner = Some(Banner {
                message: LOGIN_SUCCESS_BANNER.to_string(),
                generation,
            });
            commands.push(Command::RewriteLocation {
                location: clean_location,
            });
            commands.push(Command::ScheduleBannerExpiry { generation });
        }
        UiEvent::LoginUrlReceived { url } => {
            next.error = None;
            commands.push(Command::Navigate { url });
        }
        UiEvent::LoginFailed { message } => {
            next.error = Some(message);
        }
        UiEvent::Workflow(WorkflowEvent::RunStarted) => {
            next.loading = true;
            next.error = None;
            next.result = None;
            next.progress.clear();
        }
        UiEvent::Workflow(WorkflowEvent::Stage(entry)) => {
            next.progress.append(entry);
        }
        UiEvent::Workflow(WorkflowEvent::Completed(result)) => {
            next.loading = false;
            next.result = Some(result);
        }
        UiEvent::Workflow(WorkflowEvent::Failed(message)) => {
            next.loading = false;
            next.error = Some(message);
            next.progress.clear();
        }
        UiEvent::BannerExpired { generation } => {
            if next
                .banner
                .as_ref()
                .is_some_and(|banner| banner.generation == generation)
            {
                next.banner = None;
            }
        }
        UiEvent::ThemeToggled => {
            next.theme_dark = !next.theme_dark;
        }
    }

    (next, commands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ConversionResult;

    fn established(clean_location: &str) -> UiEvent {
        UiEvent::SessionEstablished {
            session: Session::mock(),
            clean_location: clean_location.to_string(),
        }
    }

    #[test]
    fn run_start_clears_previous_outcome() {
        let mut state = UiState::default();
        state.error = Some("playlist not found".to_string());
        state.result = Some(ConversionResult::mock(2, 1));
        state.progress.append("stale entry".to_string());

        let (next, commands) = reduce(&state, UiEvent::Workflow(WorkflowEvent::RunStarted));

        assert!(next.loading);
        assert!(next.error.is_none());
        assert!(next.result.is_none());
        assert!(next.progress.is_empty());
        assert!(commands.is_empty());
    }

    #[test]
    fn failure_clears_log_and_loading() {
        let mut state = UiState::default();
        state.loading = true;
        state.progress.append("Fetching source playlist...".to_string());

        let (next, _) = reduce(
            &state,
            UiEvent::Workflow(WorkflowEvent::Failed("playlist not found".to_string())),
        );

        assert!(!next.loading);
        assert_eq!(next.error.as_deref(), Some("playlist not found"));
        assert!(next.progress.is_empty());
    }

    #[test]
    fn completion_stores_result_and_clears_loading() {
        let mut state = UiState::default();
        state.loading = true;

        let result = ConversionResult::mock(10, 7);
        let (next, _) = reduce(
            &state,
            UiEvent::Workflow(WorkflowEvent::Completed(result.clone())),
        );

        assert!(!next.loading);
        assert!(next.error.is_none());
        assert_eq!(next.result, Some(result));
    }

    #[test]
    fn stages_append_in_order() {
        let mut state = UiState::default();
        for entry in ["one", "two", "three"] {
            let (next, _) = reduce(
                &state,
                UiEvent::Workflow(WorkflowEvent::Stage(entry.to_string())),
            );
            state = next;
        }

        assert_eq!(state.progress.entries(), ["one", "two", "three"]);
    }

    #[test]
    fn session_raises_banner_and_commands() {
        let state = UiState::default();
        let (next, commands) = reduce(&state, established("https://app.example.com/"));

        assert_eq!(next.session, Some(Session::mock()));
        let banner = next.banner.expect("banner");
        assert_eq!(banner.message, LOGIN_SUCCESS_BANNER);
        assert_eq!(banner.generation, 1);
        assert_eq!(
            commands,
            vec![
                Command::RewriteLocation {
                    location: "https://app.example.com/".to_string()
                },
                Command::ScheduleBannerExpiry { generation: 1 },
            ]
        );
    }

    #[test]
    fn first_session_wins() {
        let (state, _) = reduce(&UiState::default(), established("https://app.example.com/"));

        let mut other = Session::mock();
        other.user_id = "someone_else".to_string();
        let (next, _) = reduce(
            &state,
            UiEvent::SessionEstablished {
                session: other,
                clean_location: "https://app.example.com/".to_string(),
            },
        );

        assert_eq!(
            next.session.map(|s| s.user_id),
            Some("mock_user".to_string())
        );
    }

    #[test]
    fn stale_banner_expiry_is_ignored() {
        let (state, _) = reduce(&UiState::default(), established("https://app.example.com/"));
        // A second callback supersedes the banner; the old timer is stale.
        let (state, _) = reduce(&state, established("https://app.example.com/"));
        assert_eq!(state.banner.as_ref().map(|b| b.generation), Some(2));

        let (state, _) = reduce(&state, UiEvent::BannerExpired { generation: 1 });
        assert!(state.banner.is_some());

        let (state, _) = reduce(&state, UiEvent::BannerExpired { generation: 2 });
        assert!(state.banner.is_none());
    }

    #[test]
    fn banner_generations_never_repeat_after_expiry() {
        let (state, _) = reduce(&UiState::default(), established("https://app.example.com/"));
        let (state, _) = reduce(&state, UiEvent::BannerExpired { generation: 1 });
        assert!(state.banner.is_none());

        let (state, commands) = reduce(&state, established("https://app.example.com/"));
        assert_eq!(state.banner.as_ref().map(|b| b.generation), Some(2));
        assert!(commands.contains(&Command::ScheduleBannerExpiry { generation: 2 }));
    }

    #[test]
    fn theme_toggle_touches_nothing_else() {
        let mut state = UiState::default();
        state.loading = true;
        state.error = None;
        state.progress.append("Matching tracks...".to_string());

        let (next, commands) = reduce(&state, UiEvent::ThemeToggled);
        assert!(next.theme_dark);
        assert!(next.loading);
        assert_eq!(next.progress.entries(), ["Matching tracks..."]);
        assert!(commands.is_empty());

        let (back, _) = reduce(&next, UiEvent::ThemeToggled);
        assert!(!back.theme_dark);
    }

    #[test]
    fn login_failure_surfaces_message_without_navigation() {
        let (next, commands) = reduce(
            &UiState::default(),
            UiEvent::LoginFailed {
                message: "Failed to initiate login: connection refused".to_string(),
            },
        );

        assert!(
            next.error
                .as_deref()
                .expect("error")
                .starts_with("Failed to initiate login")
        );
        assert!(commands.is_empty());
    }

    #[test]
    fn login_url_navigates_and_clears_error() {
        let mut state = UiState::default();
        state.error = Some("Failed to initiate login: timeout".to_string());

        let (next, commands) = reduce(
            &state,
            UiEvent::LoginUrlReceived {
                url: "https://auth.example/authorize".to_string(),
            },
        );

        assert!(next.error.is_none());
        assert_eq!(
            commands,
            vec![Command::Navigate {
                url: "https://auth.example/authorize".to_string()
            }]
        );
    }
}
