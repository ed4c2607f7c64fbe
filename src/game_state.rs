//! The outer game-state surface: an enumeration the core only *observes*,
//! never owns. The high-level screen machine (menus, inventory
//! panels, the death screen, the wizard console) lives entirely outside the
//! core; this module exists only so the core can answer the two predicates
//! it actually needs to gate its own behavior on.

/// Enumerated states the outer state machine can be in. The core never
/// transitions between these itself — it only reads the current one via
/// [`allows_movement`] / [`allows_pickup`] before dispatching a player
/// action, and emits signals (e.g. `ActionResult::TakeStairs`,
/// `ActionResult::VictoryTriggered`) that the *caller* uses to decide the
/// next state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    PlayersTurn,
    EnemyTurn,
    PlayerDead,
    ShowInventory,
    DropInventory,
    Targeting,
    ThrowSelectItem,
    ThrowTargeting,
    LevelUp,
    CharacterScreen,
    WizardMenu,
    NpcDialogue,
    Confrontation,
    RubyHeartObtained,
    Victory,
}

/// Whether the player may move/attack/interact while in this state. The core
/// checks only this and `allows_pickup` — it never inspects the state
/// further.
pub fn allows_movement(state: GameState) -> bool {
    matches!(state, GameState::PlayersTurn)
}

/// Whether an auto-pickup or manual pickup may proceed while in this state.
/// Strictly narrower than `allows_movement` would suggest: e.g. the player's
/// turn still allows movement while `ShowInventory` is merely a read-only
/// overlay in some callers, but the core takes no position on that — it only
/// gates on the one state known to require pickup to be blocked.
pub fn allows_pickup(state: GameState) -> bool {
    matches!(state, GameState::PlayersTurn)
}
