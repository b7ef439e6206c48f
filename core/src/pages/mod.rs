//! The state behind every view of the client.
//!
//! A page owns the local state of one view. Mounting it fetches what the view shows, and each
//! user interaction is a method that calls the API and then patches or refetches that state.
//! Pages never render anything themselves; front ends read their state after each interaction.
//!
//! Results that come back after a page was unmounted are dropped, see [`Mount`].

pub mod auth;
pub mod chart_detail;
pub mod guard;
pub mod master;
pub mod mylist;
pub mod mylist_detail;
pub mod mylist_edit;
pub mod user;

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::Duration,
};

use log::debug;
use sekai_api::{ApiClient, Transport};

use crate::route::{Navigator, Route};

/// What every page needs: the API, a way to navigate, and timing settings.
pub struct PageContext<T> {
    pub api: ApiClient<T>,
    pub navigator: Navigator,
    /// How long to show the login confirmation before moving to the user page.
    pub redirect_delay: Duration,
}

impl<T> Clone for PageContext<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            navigator: self.navigator.clone(),
            redirect_delay: self.redirect_delay,
        }
    }
}

impl<T> fmt::Debug for PageContext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageContext")
            .field("api", &self.api)
            .field("route", &self.navigator.current())
            .field("redirect_delay", &self.redirect_delay)
            .finish()
    }
}

impl<T: Transport> PageContext<T> {
    #[must_use]
    pub const fn new(api: ApiClient<T>, navigator: Navigator, redirect_delay: Duration) -> Self {
        Self {
            api,
            navigator,
            redirect_delay,
        }
    }

    pub fn navigate(&self, route: Route) {
        self.navigator.navigate(route);
    }
}

#[derive(Debug, Default)]
struct MountState {
    generation: AtomicU64,
    mounted: AtomicBool,
}

/// Tracks whether a page is still on screen.
///
/// Every call takes a [`Ticket`] before awaiting the API, and its result is applied only if the
/// ticket is still current when it comes back. Unmounting (or mounting again) bumps the
/// generation, which invalidates all outstanding tickets.
///
/// Cloning gives another handle to the same state, so a front end can unmount a page while one
/// of its calls is in flight.
#[derive(Clone, Debug, Default)]
pub struct Mount {
    state: Arc<MountState>,
}

/// Proof of the generation a call was started in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

impl Mount {
    pub fn mount(&self) {
        self.state.generation.fetch_add(1, Ordering::SeqCst);
        self.state.mounted.store(true, Ordering::SeqCst);
    }

    pub fn unmount(&self) {
        self.state.mounted.store(false, Ordering::SeqCst);
        self.state.generation.fetch_add(1, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.state.mounted.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn ticket(&self) -> Ticket {
        Ticket(self.state.generation.load(Ordering::SeqCst))
    }

    /// Whether a result obtained with `ticket` may still be applied.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        let current = self.is_mounted() && self.state.generation.load(Ordering::SeqCst) == ticket.0;
        if !current {
            debug!("dropping a result that arrived after the page went away");
        }
        current
    }
}
