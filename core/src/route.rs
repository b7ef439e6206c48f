//! The views of the client and how to move between them.

use std::{convert::Infallible, fmt, str::FromStr, sync::Arc, time::Duration};

use log::{debug, info};
use sekai_api::{AuthFailureHook, Code};
use sekai_types::Id;
use tokio::sync::watch;

/// Every view of the client, addressed by its path.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum Route {
    /// `/`
    #[default]
    Top,
    /// `/master`
    Master,
    /// `/master/artist`
    MasterArtist,
    /// `/master/singer`
    MasterSinger,
    /// `/master/unit`
    MasterUnit,
    /// `/master/song`
    MasterSong,
    /// `/master/chart`
    MasterChart,
    /// `/signup`
    Signup,
    /// `/login`
    Login,
    /// `/user`
    User,
    /// `/mylist`
    MyLists,
    /// `/mylist/:id`
    MyListDetail { my_list_id: Id },
    /// `/mylist/:id/edit`
    MyListEdit { my_list_id: Id },
    /// `/mylist/:id/chart/:chartId`
    MyListChartDetail { my_list_id: Id, my_list_chart_id: Id },
    /// Anything else.
    NotFound(String),
}

impl Route {
    /// Whether the view only makes sense for a signed in user.
    #[must_use]
    pub const fn requires_session(&self) -> bool {
        matches!(
            self,
            Self::User
                | Self::MyLists
                | Self::MyListDetail { .. }
                | Self::MyListEdit { .. }
                | Self::MyListChartDetail { .. }
        )
    }

    /// Whether the view is reserved to administrators.
    #[must_use]
    pub const fn requires_admin(&self) -> bool {
        matches!(
            self,
            Self::Master
                | Self::MasterArtist
                | Self::MasterSinger
                | Self::MasterUnit
                | Self::MasterSong
                | Self::MasterChart
        )
    }
}

impl FromStr for Route {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        fn id(segment: &str) -> Option<Id> {
            segment.parse().ok()
        }

        let route = match segments.as_slice() {
            [] => Self::Top,
            ["master"] => Self::Master,
            ["master", "artist"] => Self::MasterArtist,
            ["master", "singer"] => Self::MasterSinger,
            ["master", "unit"] => Self::MasterUnit,
            ["master", "song"] => Self::MasterSong,
            ["master", "chart"] => Self::MasterChart,
            ["signup"] => Self::Signup,
            ["login"] => Self::Login,
            ["user"] => Self::User,
            ["mylist"] => Self::MyLists,
            ["mylist", list] => match id(list) {
                Some(my_list_id) => Self::MyListDetail { my_list_id },
                None => Self::NotFound(path.to_owned()),
            },
            ["mylist", list, "edit"] => match id(list) {
                Some(my_list_id) => Self::MyListEdit { my_list_id },
                None => Self::NotFound(path.to_owned()),
            },
            ["mylist", list, "chart", entry] => match (id(list), id(entry)) {
                (Some(my_list_id), Some(my_list_chart_id)) => Self::MyListChartDetail {
                    my_list_id,
                    my_list_chart_id,
                },
                _ => Self::NotFound(path.to_owned()),
            },
            _ => Self::NotFound(path.to_owned()),
        };
        Ok(route)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => write!(f, "/"),
            Self::Master => write!(f, "/master"),
            Self::MasterArtist => write!(f, "/master/artist"),
            Self::MasterSinger => write!(f, "/master/singer"),
            Self::MasterUnit => write!(f, "/master/unit"),
            Self::MasterSong => write!(f, "/master/song"),
            Self::MasterChart => write!(f, "/master/chart"),
            Self::Signup => write!(f, "/signup"),
            Self::Login => write!(f, "/login"),
            Self::User => write!(f, "/user"),
            Self::MyLists => write!(f, "/mylist"),
            Self::MyListDetail { my_list_id } => write!(f, "/mylist/{my_list_id}"),
            Self::MyListEdit { my_list_id } => write!(f, "/mylist/{my_list_id}/edit"),
            Self::MyListChartDetail {
                my_list_id,
                my_list_chart_id,
            } => write!(f, "/mylist/{my_list_id}/chart/{my_list_chart_id}"),
            Self::NotFound(path) => write!(f, "{path}"),
        }
    }
}

/// Shared handle to the current [`Route`].
///
/// Pages navigate through it; front ends [`Navigator::subscribe`] to learn where to go next.
#[derive(Clone, Debug)]
pub struct Navigator {
    current: Arc<watch::Sender<Route>>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Top)
    }
}

impl Navigator {
    #[must_use]
    pub fn new(initial: Route) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            current: Arc::new(sender),
        }
    }

    pub fn navigate(&self, route: Route) {
        debug!("navigating to {route}");
        self.current.send_replace(route);
    }

    #[must_use]
    pub fn current(&self) -> Route {
        self.current.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }

    /// Wait for `delay`, then navigate.
    pub async fn navigate_after(&self, route: Route, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.navigate(route);
    }

    /// A hook for [`sekai_api::ApiClient::with_auth_failure_hook`] that sends the user to the
    /// login view.
    #[must_use]
    pub fn auth_failure_hook(&self) -> AuthFailureHook {
        let navigator = self.clone();
        Arc::new(move |code: Code| {
            info!("session rejected ({code}), redirecting to {}", Route::Login);
            navigator.navigate(Route::Login);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::{assert_eq, assert_str_eq};
    use rstest::rstest;

    #[rstest]
    #[case("/", Route::Top)]
    #[case("", Route::Top)]
    #[case("/master", Route::Master)]
    #[case("/master/artist", Route::MasterArtist)]
    #[case("/master/chart/", Route::MasterChart)]
    #[case("/login?next=/user", Route::Login)]
    #[case("/mylist", Route::MyLists)]
    #[case("/mylist/4", Route::MyListDetail { my_list_id: 4 })]
    #[case("/mylist/4/edit", Route::MyListEdit { my_list_id: 4 })]
    #[case(
        "/mylist/4/chart/12",
        Route::MyListChartDetail { my_list_id: 4, my_list_chart_id: 12 }
    )]
    #[case("/mylist/four", Route::NotFound("/mylist/four".into()))]
    #[case("/mylist/4/chart/x", Route::NotFound("/mylist/4/chart/x".into()))]
    #[case("/settings", Route::NotFound("/settings".into()))]
    fn test_parse(#[case] path: &str, #[case] expected: Route) {
        assert_eq!(path.parse::<Route>().unwrap(), expected);
    }

    #[rstest]
    #[case(Route::Top, "/")]
    #[case(Route::MasterSong, "/master/song")]
    #[case(Route::MyListDetail { my_list_id: 1 }, "/mylist/1")]
    #[case(Route::MyListChartDetail { my_list_id: 1, my_list_chart_id: 9 }, "/mylist/1/chart/9")]
    fn test_display_parses_back(#[case] route: Route, #[case] expected: &str) {
        assert_str_eq!(route.to_string(), expected);
        assert_eq!(expected.parse::<Route>().unwrap(), route);
    }

    #[test]
    fn test_guards() {
        assert!(Route::MasterArtist.requires_admin());
        assert!(!Route::MasterArtist.requires_session());
        assert!(Route::MyListEdit { my_list_id: 1 }.requires_session());
        assert!(!Route::Login.requires_session());
    }

    #[test]
    fn test_auth_failure_hook_navigates_to_login() {
        let navigator = Navigator::new(Route::User);
        let receiver = navigator.subscribe();

        (navigator.auth_failure_hook())(Code::Unauthenticated);

        assert_eq!(navigator.current(), Route::Login);
        assert!(receiver.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigate_after_waits() {
        let navigator = Navigator::new(Route::Login);
        let delayed = navigator.clone();

        let handle = tokio::spawn(async move {
            delayed
                .navigate_after(Route::User, Duration::from_secs(1))
                .await;
        });
        tokio::task::yield_now().await;
        assert_eq!(navigator.current(), Route::Login);

        handle.await.unwrap();
        assert_eq!(navigator.current(), Route::User);
    }
}
