//! Event impact calculator: a pure function mapping a [`TensionEvent`] to a
//! signed delta against a [`TensionConfig`]'s impact table.

use tension_types::{EventKind, TensionConfig, TensionEvent};

/// The per-event-type modifier table is a closed set of formulas; any event
/// kind not named here resolves to its configured `base_impact` untouched
/// (still using the event's specific config entry if one exists, else the
/// `"default"` entry).
pub fn calculate_event_impact(event: &TensionEvent, config: &TensionConfig) -> f64 {
    let kind_key = event.kind.as_str();
    let impact_config = config.event_impact_for(kind_key);
    let base = impact_config.base_impact;

    match event.kind {
        EventKind::PlayerCombat => {
            let mut impact = base;
            if event.parameters.flag("lethal") {
                impact += impact_config.modifier("lethal_modifier", 0.3);
            }
            if event.parameters.flag("stealth") {
                impact += impact_config.modifier("stealth_modifier", -0.1);
            }
            let enemies_defeated = event.parameters.number("enemies_defeated", 1.0);
            impact *= (1.0 + 0.2 * (enemies_defeated - 1.0)).min(2.0);
            impact
        }
        EventKind::NpcDeath => {
            let mut impact = base;
            if event.parameters.flag("important") {
                impact *= 2.0;
            } else if event.parameters.flag("civilian") {
                impact *= 1.5;
            }
            impact
        }
        EventKind::Festival => {
            let success_level = event.parameters.number("success_level", 1.0);
            -base.abs() * success_level
        }
        EventKind::EnvironmentalDisaster => {
            let severity = event.parameters.number("severity", 1.0);
            base * severity
        }
        EventKind::EconomicCrisis | EventKind::MarketCrash => {
            let severity = event.parameters.number("severity", 1.0);
            base * severity
        }
        EventKind::PoliticalChange => {
            if event.parameters.flag("regime_change") {
                base * (1.0 + impact_config.modifier("regime_change_modifier", 0.5))
            } else {
                base * (1.0 - impact_config.modifier("peaceful_transition_modifier", 0.1))
            }
        }
        EventKind::NpcArrival => {
            let mut impact = base;
            if event.parameters.flag("authority") {
                impact += impact_config.modifier("authority_modifier", -0.1);
            }
            if event.parameters.flag("hostile") {
                impact += impact_config.modifier("hostile_modifier", 0.15);
            }
            impact
        }
        _ => base,
    }
}

/// The classification of an event's originating actor, used only by
/// [`apply_actor_impact`] — never applied automatically by
/// [`calculate_event_impact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorCategory {
    Player,
    Npc,
    Environmental,
}

/// Scales a raw impact by the location's per-actor-category multiplier.
/// Callers that want `player_impact`/`npc_impact`/`environmental_impact`
/// applied must call this explicitly; the baseline calculation path never
/// does it for them.
pub fn apply_actor_impact(raw_impact: f64, actor: ActorCategory, location_type: &str, config: &TensionConfig) -> f64 {
    let loc = config.location_config_for(location_type);
    let multiplier = match actor {
        ActorCategory::Player => loc.player_impact,
        ActorCategory::Npc => loc.npc_impact,
        ActorCategory::Environmental => loc.environmental_impact,
    };
    raw_impact * multiplier
}
