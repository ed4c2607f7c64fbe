//! Scenario loading and the minimal deterministic combat loop the CLI binary
//! drives. Kept in the library (not inlined in `main.rs`) so it is testable
//! as an ordinary library function and reusable by anything else embedding
//! this crate.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::combat::log::CombatLog;
use crate::combat::{attack, ActionResult, AttackContext, AttackOptions};
use crate::components::{Ai, Faction, Fighter};
use crate::config::GameConfig;
use crate::entity::{Entity, EntityId, EntitySet};
use crate::knowledge::MonsterKnowledgeSystem;
use crate::map::{SimpleMap, SingleTileKnockback};
use crate::metrics::Metrics;
use crate::rng::GameRng;
use crate::turn::TurnController;

/// On-disk scenario format. Reuses the component structs directly (they
/// already derive `Serialize`/`Deserialize`) rather than inventing a
/// parallel data-transfer shape — a scenario file is just a partial,
/// human-authored `EntitySet`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Scenario {
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub walls: Vec<(i32, i32)>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub max_turns: Option<u32>,
    pub entities: Vec<EntitySpec>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntitySpec {
    pub name: String,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub faction: Option<Faction>,
    #[serde(default)]
    pub fighter: Option<Fighter>,
    #[serde(default)]
    pub ai: Option<Ai>,
    #[serde(default)]
    pub blocks: bool,
}

pub fn load_scenario(path: &Path) -> Result<Scenario, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("reading {}: {e}", path.display()))?;
    parse_scenario(&text, path.extension().and_then(|e| e.to_str()))
}

/// Parses scenario text given an optional file-extension hint (`"json"` vs
/// anything else, which falls back to RON); split out from [`load_scenario`]
/// so in-memory scenario strings (tests, embedders) don't need a real file.
pub fn parse_scenario(text: &str, extension_hint: Option<&str>) -> Result<Scenario, String> {
    match extension_hint {
        Some("json") => serde_json::from_str(text).map_err(|e| format!("parsing as JSON: {e}")),
        _ => ron::from_str(text).map_err(|e| format!("parsing as RON: {e}")),
    }
}

pub fn load_config(path: Option<&Path>) -> Result<GameConfig, String> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = fs::read_to_string(path).map_err(|e| format!("reading {}: {e}", path.display()))?;
    GameConfig::from_ron_str(&text).map_err(|e| format!("parsing {}: {e}", path.display()))
}

/// Builds the map and entity set a [`Scenario`] describes.
pub fn build_world(scenario: &Scenario) -> (SimpleMap, EntitySet) {
    let mut map = SimpleMap::open(scenario.width, scenario.height);
    for &(x, y) in &scenario.walls {
        map.set_wall(x, y, true);
    }

    let mut entities = EntitySet::new();
    for spec in &scenario.entities {
        entities.spawn(|id| {
            let mut entity = Entity::new(id, spec.name.clone(), spec.x, spec.y);
            entity.blocks = spec.blocks;
            if let Some(faction) = spec.faction {
                entity.set_component(faction.into());
            }
            if let Some(fighter) = spec.fighter.clone() {
                entity.set_component(fighter.into());
            }
            if let Some(ai) = spec.ai.clone() {
                entity.set_component(ai.into());
            }
            entity
        });
    }
    (map, entities)
}

fn hostile(a: Faction, b: Faction) -> bool {
    a != b && b != Faction::Neutral
}

/// Picks the first living player-faction entity and the first living,
/// adjacent, hostile entity it can reach — a minimal deterministic "resolve
/// combat" rule for the scenario runner, not a decision-making AI.
pub fn find_next_attack(entities: &EntitySet) -> Option<(EntityId, EntityId)> {
    for attacker in entities.iter_in_order() {
        let Some(&attacker_faction) = attacker.faction() else { continue };
        if !attacker.fighter().map(|f| f.is_alive()).unwrap_or(false) {
            continue;
        }
        for target in entities.iter_in_order() {
            if target.id == attacker.id {
                continue;
            }
            let Some(&target_faction) = target.faction() else { continue };
            if !hostile(attacker_faction, target_faction) {
                continue;
            }
            if !target.fighter().map(|f| f.is_alive()).unwrap_or(false) {
                continue;
            }
            if crate::geometry::is_adjacent(attacker.x, attacker.y, target.x, target.y) {
                return Some((attacker.id, target.id));
            }
        }
    }
    None
}

/// Outcome of [`run_scenario`]: the printable message stream and the final
/// combat log, for a caller to render however it likes.
pub struct ScenarioRun {
    pub messages: Vec<String>,
    pub log: CombatLog,
    pub turns_run: u32,
}

/// Drives a loaded scenario to completion (no further adjacent hostile pairs)
/// or `max_turns`, whichever comes first.
pub fn run_scenario(scenario: &Scenario, config: &GameConfig, seed_override: Option<u64>, max_turns_override: u32) -> ScenarioRun {
    let (map, mut entities) = build_world(scenario);
    let seed = seed_override.or(scenario.seed).unwrap_or(0);
    let mut rng = GameRng::from_seed(seed);
    let mut log = CombatLog::default();
    let mut metrics = Metrics::new();
    let mut knowledge = MonsterKnowledgeSystem::new();
    let knockback = SingleTileKnockback;
    let mut turn_controller = TurnController::new();
    let mut messages = Vec::new();

    let max_turns = scenario.max_turns.unwrap_or(max_turns_override);
    let mut turns_run = 0;

    for _ in 0..max_turns {
        let Some((attacker_id, target_id)) = find_next_attack(&entities) else {
            break;
        };
        turns_run += 1;

        knowledge.begin_update_cycle();
        let mut ctx = AttackContext {
            entities: &mut entities,
            map: &map,
            rng: &mut rng,
            knowledge: Some(&mut knowledge),
            metrics: Some(&mut metrics),
            log: &mut log,
            knockback: &knockback,
            config,
            current_turn: turn_controller.current_turn,
        };
        let results = attack(&mut ctx, attacker_id, target_id, AttackOptions::default());
        for result in &results {
            if let ActionResult::Message(message) = result {
                messages.push(message.clone());
            }
        }

        turn_controller.end_player_action(&mut entities, true, None);
    }

    ScenarioRun { messages, log, turns_run }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_monster_scenario() -> Scenario {
        Scenario {
            width: 10,
            height: 10,
            walls: Vec::new(),
            seed: Some(1),
            max_turns: Some(50),
            entities: vec![
                EntitySpec {
                    name: "hero".to_string(),
                    x: 0,
                    y: 0,
                    faction: Some(Faction::Player),
                    fighter: Some(Fighter::new(30, 2, 3)),
                    ai: None,
                    blocks: true,
                },
                EntitySpec {
                    name: "rat".to_string(),
                    x: 1,
                    y: 0,
                    faction: Some(Faction::Monsters),
                    fighter: Some(Fighter::new(4, 0, 0)),
                    ai: None,
                    blocks: true,
                },
            ],
        }
    }

    #[test]
    fn ron_and_json_scenarios_with_identical_content_build_identical_worlds() {
        let scenario = two_monster_scenario();
        let ron_text = ron::to_string(&scenario).unwrap();
        let json_text = serde_json::to_string(&scenario).unwrap();

        let from_ron = parse_scenario(&ron_text, None).unwrap();
        let from_json = parse_scenario(&json_text, Some("json")).unwrap();
        assert_eq!(from_ron.entities.len(), from_json.entities.len());
        assert_eq!(from_ron.width, from_json.width);
    }

    #[test]
    fn a_one_sided_fight_always_ends_with_the_monster_dead() {
        let scenario = two_monster_scenario();
        let config = GameConfig::default();
        let run = run_scenario(&scenario, &config, None, 50);
        assert!(run.turns_run > 0);
        assert!(run.turns_run <= 50);
    }

    #[test]
    fn no_adjacent_hostiles_ends_the_scenario_immediately() {
        let mut scenario = two_monster_scenario();
        scenario.entities[1].x = 9;
        scenario.entities[1].y = 9;
        let config = GameConfig::default();
        let run = run_scenario(&scenario, &config, None, 50);
        assert_eq!(run.turns_run, 0);
        assert!(run.messages.is_empty());
    }

    #[test]
    fn a_seed_override_takes_priority_over_the_scenario_seed() {
        let scenario = two_monster_scenario();
        let config = GameConfig::default();
        let run_a = run_scenario(&scenario, &config, Some(99), 50);
        let run_b = run_scenario(&scenario, &config, Some(99), 50);
        assert_eq!(run_a.messages, run_b.messages, "same seed must reproduce the same message stream");
    }
}
