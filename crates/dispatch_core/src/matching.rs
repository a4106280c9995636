use crate::graph::Node;
use crate::partners::{Partner, PartnerId};
use crate::routing::RouteProvider;

/// The partner chosen for a dispatch and its route to the pickup point.
#[derive(Debug, Clone, PartialEq)]
pub struct PartnerMatch {
    pub partner_id: PartnerId,
    pub partner_name: String,
    pub distance: f64,
    pub path: Vec<Node>,
}

/// Nearest dispatchable partner to `pickup`, by shortest-path distance.
///
/// One route query per candidate. Only a strictly smaller distance replaces the
/// current best, so the first partner in iteration order wins ties. Partners
/// that cannot reach the pickup point are never selected.
pub fn find_nearest_partner<'a, I>(
    partners: I,
    router: &dyn RouteProvider,
    pickup: &Node,
) -> Option<PartnerMatch>
where
    I: IntoIterator<Item = &'a Partner>,
{
    let mut best: Option<PartnerMatch> = None;

    for partner in partners {
        if !partner.can_dispatch() {
            continue;
        }

        let route = router.route(&partner.location, pickup);
        if !route.is_reachable() {
            continue;
        }

        match &best {
            Some(current) if route.distance >= current.distance => {}
            _ => {
                best = Some(PartnerMatch {
                    partner_id: partner.id,
                    partner_name: partner.name.clone(),
                    distance: route.distance,
                    path: route.path,
                })
            }
        }
    }

    best
}
