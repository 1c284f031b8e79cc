//! The seam between the engine and wherever page content lives.

use crate::blocks::BlockSet;
use crate::route::RouteDescriptor;
use crate::signals::PageSignals;

/// Source of uniqueness blocks and page signals for a route.
///
/// Implementations are expected to be read-only snapshots; the engine may
/// ask for the same route more than once.
pub trait RouteContent {
    fn blocks(&self, route: &RouteDescriptor) -> BlockSet;

    fn signals(&self, route: &RouteDescriptor) -> PageSignals {
        let _ = route;
        PageSignals::default()
    }
}

impl RouteContent for BlockSet {
    fn blocks(&self, _route: &RouteDescriptor) -> BlockSet {
        self.clone()
    }
}
