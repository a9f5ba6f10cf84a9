//! Inbound admission predicates.
//!
//! The dispatcher evaluates a subscription's filter before invoking its
//! handler; plugins never re-validate these conditions. Predicates are
//! named types composed explicitly with [`all_of`], so each one is
//! independently testable.

use mavbridge_types::WireHeader;

use crate::link::LinkContext;

/// A boolean admission predicate evaluated against a decoded frame's header
/// and the shared link state.
pub trait InboundFilter: Send + Sync {
    fn accept(&self, header: &WireHeader, link: &LinkContext) -> bool;
}

/// Accepts frames whose source system id matches the bound FCU identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceSystemFilter;

impl InboundFilter for SourceSystemFilter {
    fn accept(&self, header: &WireHeader, link: &LinkContext) -> bool {
        header.system_id == link.target_system()
    }
}

/// Accepts frames only while the link health flag is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkHealthFilter;

impl InboundFilter for LinkHealthFilter {
    fn accept(&self, _header: &WireHeader, link: &LinkContext) -> bool {
        link.is_connected()
    }
}

/// Conjunction of filters: accepts iff every member accepts.
///
/// An empty conjunction accepts everything.
pub struct AllOf {
    filters: Vec<Box<dyn InboundFilter>>,
}

impl InboundFilter for AllOf {
    fn accept(&self, header: &WireHeader, link: &LinkContext) -> bool {
        self.filters.iter().all(|f| f.accept(header, link))
    }
}

/// Compose filters into an explicit conjunction.
///
/// The direction-finder subscription uses
/// `all_of(vec![Box::new(SourceSystemFilter), Box::new(LinkHealthFilter)])`:
/// frames must come from the bound system *and* arrive while the link is
/// healthy.
pub fn all_of(filters: Vec<Box<dyn InboundFilter>>) -> Box<dyn InboundFilter> {
    Box::new(AllOf { filters })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::config::BridgeConfig;
    use crate::link::ChannelTransport;
    use std::sync::Arc;

    fn make_link(target_system_id: u8) -> LinkContext {
        let (transport, _rx) = ChannelTransport::new();
        LinkContext::new(
            BridgeConfig {
                target_system_id,
                ..BridgeConfig::default()
            },
            Arc::new(SystemClock),
            Arc::new(transport),
        )
    }

    fn header(system_id: u8) -> WireHeader {
        WireHeader {
            system_id,
            component_id: 1,
        }
    }

    #[test]
    fn source_system_filter_matches_bound_identity() {
        let link = make_link(3);
        let filter = SourceSystemFilter;

        assert!(filter.accept(&header(3), &link));
        assert!(!filter.accept(&header(4), &link));
    }

    #[test]
    fn link_health_filter_tracks_connection_flag() {
        let link = make_link(1);
        let filter = LinkHealthFilter;

        assert!(!filter.accept(&header(1), &link));
        link.set_connected(true);
        assert!(filter.accept(&header(1), &link));
    }

    #[test]
    fn all_of_requires_every_predicate() {
        let link = make_link(3);
        let filter = all_of(vec![
            Box::new(SourceSystemFilter),
            Box::new(LinkHealthFilter),
        ]);

        // Right system, link down.
        assert!(!filter.accept(&header(3), &link));

        // Link up, wrong system.
        link.set_connected(true);
        assert!(!filter.accept(&header(9), &link));

        // Both hold.
        assert!(filter.accept(&header(3), &link));
    }

    #[test]
    fn empty_conjunction_accepts_everything() {
        let link = make_link(1);
        let filter = all_of(vec![]);
        assert!(filter.accept(&header(200), &link));
    }
}
