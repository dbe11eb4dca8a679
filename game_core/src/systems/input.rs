use hecs::World;

use crate::components::{Paddle, PaddleIntent};
use crate::resources::InputQueue;

/// Apply queued movement commands to paddle intents
pub fn ingest_inputs(world: &mut World, queue: &mut InputQueue) {
    for (player, dir) in queue.inputs.drain(..) {
        for (_entity, (paddle, intent)) in world.query_mut::<(&Paddle, &mut PaddleIntent)>() {
            if paddle.player == player {
                intent.dir = dir;
            }
        }
    }
}
