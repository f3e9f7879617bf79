//! Connection requirement evaluation.

use crate::net::graph::{Edge, NetGraph, Node, Prefab};
use crate::net::types::{CompositionFlags, ConnectionRequirement, GeneralFlags, Service};

/// Whether an electricity requirement is satisfied.
///
/// `lighting_elsewhere` is only ever true for node subjects whose incident
/// edges carry street lighting. Requirements other than "none" and
/// "lighting only" are never satisfied.
pub fn evaluate(
    requirement: &ConnectionRequirement,
    lighting_elsewhere: bool,
    own_upgrade: Option<&CompositionFlags>,
) -> bool {
    if requirement.is_empty() {
        return true;
    }

    if requirement.general == GeneralFlags::LIGHTING {
        return lighting_elsewhere || own_upgrade.is_some_and(|u| u.has_lighting());
    }

    false
}

/// Whether a water pipe requirement is satisfied.
pub fn evaluate_water(requires_water_pipe: bool, has_water_marker: bool) -> bool {
    !requires_water_pipe || has_water_marker
}

/// The entity a prefab requirement is evaluated against.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    Node(&'a Node),
    /// An edge reached through delegation from a node.
    Edge(&'a Edge),
}

/// First service the prefab requires that the subject lacks, if any.
pub fn unmet_service(prefab: &Prefab, subject: Subject<'_>, graph: &NetGraph) -> Option<Service> {
    if let Some(requirement) = &prefab.electricity {
        let (lighting_elsewhere, own_upgrade) = match subject {
            Subject::Node(node) => (incident_lighting(node, graph), node.upgrade.as_ref()),
            Subject::Edge(edge) => (false, edge.upgrade.as_ref()),
        };
        if !evaluate(requirement, lighting_elsewhere, own_upgrade) {
            return Some(Service::Electricity);
        }
    }

    let has_water_marker = match subject {
        Subject::Node(node) => node.services.water,
        Subject::Edge(edge) => edge.water_connected,
    };
    if !evaluate_water(prefab.water_pipe, has_water_marker) {
        return Some(Service::WaterPipe);
    }

    None
}

fn incident_lighting(node: &Node, graph: &NetGraph) -> bool {
    node.incident_edges()
        .iter()
        .filter_map(|&e| graph.edge(e))
        .any(|edge| edge.upgrade.is_some_and(|u| u.has_lighting()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::types::SideFlags;

    fn req(general: GeneralFlags, left: SideFlags, right: SideFlags) -> ConnectionRequirement {
        CompositionFlags {
            general,
            left,
            right,
        }
    }

    #[test]
    fn empty_requirement_always_satisfied() {
        let empty = ConnectionRequirement::default();
        let upgrades = [
            None,
            Some(CompositionFlags::default()),
            Some(CompositionFlags::general(GeneralFlags::LIGHTING)),
            Some(CompositionFlags::general(GeneralFlags::TUNNEL)),
        ];
        for upgrade in upgrades.iter() {
            for lighting in [false, true] {
                assert!(evaluate(&empty, lighting, upgrade.as_ref()));
            }
        }
    }

    #[test]
    fn lighting_requirement_needs_lighting_somewhere() {
        let lighting = req(GeneralFlags::LIGHTING, SideFlags::NONE, SideFlags::NONE);
        let lit = CompositionFlags::general(GeneralFlags::LIGHTING | GeneralFlags::CROSSWALK);
        let unlit = CompositionFlags::general(GeneralFlags::CROSSWALK | GeneralFlags::ELEVATED);

        assert!(evaluate(&lighting, false, Some(&lit)));
        assert!(evaluate(&lighting, true, None));
        assert!(evaluate(&lighting, true, Some(&unlit)));
        assert!(!evaluate(&lighting, false, None));
        assert!(!evaluate(&lighting, false, Some(&unlit)));
    }

    #[test]
    fn lighting_side_bits_do_not_count() {
        let lighting = req(GeneralFlags::LIGHTING, SideFlags::NONE, SideFlags::NONE);
        let sides = CompositionFlags {
            general: GeneralFlags::NONE,
            left: SideFlags(GeneralFlags::LIGHTING.0),
            right: SideFlags(GeneralFlags::LIGHTING.0),
        };
        assert!(!evaluate(&lighting, false, Some(&sides)));
    }

    #[test]
    fn lighting_rule_keys_on_general_only() {
        let with_sides = req(GeneralFlags::LIGHTING, SideFlags::NONE, SideFlags::TREES);
        let lit = CompositionFlags::general(GeneralFlags::LIGHTING);
        assert!(evaluate(&with_sides, false, Some(&lit)));
        assert!(!evaluate(&with_sides, false, None));
    }

    #[test]
    fn other_requirements_are_unmet() {
        let lit = CompositionFlags::general(GeneralFlags::LIGHTING);
        for requirement in [
            req(GeneralFlags::LIGHTING | GeneralFlags::WIDE_MEDIAN, SideFlags::NONE, SideFlags::NONE),
            req(GeneralFlags::TUNNEL, SideFlags::NONE, SideFlags::NONE),
            req(GeneralFlags::NONE, SideFlags::SIDEWALK, SideFlags::NONE),
        ] {
            assert!(!evaluate(&requirement, true, Some(&lit)), "{:?}", requirement);
        }
    }

    #[test]
    fn water_requirement_is_a_presence_check() {
        assert!(evaluate_water(false, false));
        assert!(evaluate_water(true, true));
        assert!(!evaluate_water(true, false));
    }
}
