//! Interaction dispatcher coverage from outside the crate: priority ordering,
//! the adjacent-tile picker, and the deferred-goal auto-action path together.

use rogue_core::auto_action;
use rogue_core::components::{Chest, Component, Faction, Fighter, Item, Stairs};
use rogue_core::entity::Entity;
use rogue_core::entity::EntitySet;
use rogue_core::interaction;
use rogue_core::map::{AlwaysVisible, SimpleMap};
use rogue_core::pathfind;
use rogue_core::rng::GameRng;

#[test]
fn a_hostile_enemy_outranks_an_item_stacked_on_the_same_cell() {
    let mut entities = EntitySet::new();
    let actor = entities.spawn(|id| {
        let mut e = Entity::new(id, "hero", 0, 0);
        e.set_component(Component::Faction(Faction::Player));
        e
    });
    entities.spawn(|id| {
        let mut e = Entity::new(id, "orc", 1, 0);
        e.set_component(Component::Faction(Faction::Monsters));
        e.set_component(Component::Fighter(Fighter::new(10, 0, 0)));
        e
    });
    entities.spawn(|id| {
        let mut e = Entity::new(id, "potion", 1, 0);
        e.set_component(Component::Item(Item::default()));
        e
    });
    let map = SimpleMap::open(5, 5);
    let mut rng = GameRng::from_seed(1);

    let outcome = interaction::interact(&mut entities, &map, &mut rng, actor, (1, 0), 64);
    assert!(matches!(
        outcome.results.first(),
        Some(rogue_core::combat::ActionResult::Targeting(_))
    ));
}

#[test]
fn stairs_clicked_from_across_the_room_paths_there_and_fires_on_arrival() {
    let mut entities = EntitySet::new();
    let actor = entities.spawn(|id| {
        let mut e = Entity::new(id, "hero", 0, 0);
        e.set_component(Component::Faction(Faction::Player));
        e
    });
    entities.spawn(|id| {
        let mut e = Entity::new(id, "stairs down", 3, 0);
        e.set_component(Component::Stairs(Stairs { descending: true }));
        e
    });
    let mut map = SimpleMap::open(10, 10);
    let fov = AlwaysVisible;
    let mut rng = GameRng::from_seed(1);

    let outcome = interaction::interact(&mut entities, &map, &mut rng, actor, (3, 0), 64);
    assert!(outcome.start_pathfinding);
    assert!(!outcome.consume_turn);

    let mut last_outcome = auto_action::step(&mut entities, &mut map, &fov, &mut rng, actor);
    let mut guard = 0;
    while !last_outcome.interrupted && guard < 20 {
        last_outcome = auto_action::step(&mut entities, &mut map, &fov, &mut rng, actor);
        guard += 1;
    }
    assert!(last_outcome
        .results
        .iter()
        .any(|r| matches!(r, rogue_core::combat::ActionResult::TakeStairs)));
}

#[test]
fn the_adjacent_tile_picker_never_blindly_defaults_to_northwest() {
    let mut entities = EntitySet::new();
    let actor = entities.spawn(|id| Entity::new(id, "hero", 5, 5));
    // Block the northwest-most candidates so a naive "always NW" picker would
    // fail, while a closer southeast tile remains open.
    let map = SimpleMap::open(10, 10);
    let chosen = interaction::pick_adjacent_tile(&entities, &map, actor, (3, 3), (5, 5));
    // The southeast neighbor (4, 4) is strictly closer to the actor than the
    // north neighbor (3, 2), which reading order alone would favor first.
    assert_eq!(chosen, Some((4, 4)));
}

#[test]
fn opening_an_already_open_chest_takes_no_action() {
    let mut entities = EntitySet::new();
    let actor = entities.spawn(|id| Entity::new(id, "hero", 0, 0));
    entities.spawn(|id| {
        let mut e = Entity::new(id, "chest", 1, 0);
        e.add_tag("openable");
        e.set_component(Component::Chest(Chest {
            opened: true,
            ..Default::default()
        }));
        e
    });
    let map = SimpleMap::open(5, 5);
    let mut rng = GameRng::from_seed(1);

    let outcome = interaction::interact(&mut entities, &map, &mut rng, actor, (1, 0), 64);
    assert!(!outcome.action_taken);
    assert!(!outcome.consume_turn);
    assert!(outcome
        .results
        .iter()
        .any(|r| matches!(r, rogue_core::combat::ActionResult::Message(m) if m.contains("already empty"))));
}

#[test]
fn set_destination_refuses_a_destination_outside_the_map() {
    let mut entities = EntitySet::new();
    let actor = entities.spawn(|id| Entity::new(id, "hero", 0, 0));
    let map = SimpleMap::open(5, 5);
    assert!(!pathfind::set_destination(&mut entities, &map, actor, 50, 50, 64));
}
