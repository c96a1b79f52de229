use boing_engine::{
    Behaviour, Collider, ColliderTag, CollisionEvent, CollisionPhase, EngineError, Entity, EntityId, World,
};
use glam::DVec2;

use crate::background::Background;
use crate::config::DoodleConfig;
use crate::scroll_view::ScrollView;

/// Remembers whether the player has fallen out.
#[derive(Debug, Default)]
pub struct GameOverTrigger {
    over: bool,
}

impl GameOverTrigger {
    pub fn is_over(&self) -> bool {
        self.over
    }
}

impl Behaviour for GameOverTrigger {
    boing_engine::behaviour_any!();
}

/// Who to notify when the player falls out.
#[derive(Debug, Clone, Copy)]
pub struct GameOverTargets {
    pub scroll_root: EntityId,
    pub background: EntityId,
}

/// Spawn a one-pixel line just below the screen. A player crossing it ends
/// the game: the view scrolls back up, the background slides away and the
/// line switches itself off.
pub fn spawn_game_over_trigger(
    world: &mut World,
    targets: GameOverTargets,
    config: &DoodleConfig,
) -> Result<EntityId, EngineError> {
    let id = world.next_id();
    let scroll = config.game_over_scroll;
    let line = Collider::rectangle(ColliderTag::GameOverTrigger, DVec2::new(config.canvas_width, 1.0))
        .with_listener(CollisionPhase::Enter, move |w, e| {
            if e.other_tag != ColliderTag::Player {
                return;
            }
            if let Err(err) = end_game(w, e, targets, scroll) {
                w.report(err);
            }
        });

    world.spawn_root(
        Entity::new(id)
            .with_tag("game_over")
            .with_position(DVec2::new(0.0, config.canvas_height))
            .with_behaviour(GameOverTrigger::default())
            .with_component(line),
    )
}

fn end_game(world: &mut World, event: &CollisionEvent, targets: GameOverTargets, scroll: f64) -> Result<(), EngineError> {
    log::info!("game over");
    world.with_behaviour::<GameOverTrigger, _, _>(event.collider.entity, |trigger, _| trigger.over = true)?;
    world.with_behaviour::<Background, _, _>(targets.background, |background, _| background.set_game_over())?;
    world.with_behaviour::<ScrollView, _, _>(targets.scroll_root, |view, _| view.set_scroll_distance(scroll))?;
    world.set_component_active(event.collider, false)
}
