// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Weft Sandbox
// Demo binary driving the component store through a small drone patrol

use anyhow::Result;
use weft_data::ecs::{ComponentBit, Descriptor, Query, Term, World};

const POPULATION: u32 = 24;
const FRAMES: usize = 4;

#[derive(Debug, Clone, Copy)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Debug, Clone, Copy)]
struct Velocity {
    dx: f32,
    dy: f32,
}

#[derive(Debug)]
struct Tuning {
    time_step: f32,
}

struct Patrol {
    position: ComponentBit,
    velocity: ComponentBit,
    frozen: ComponentBit,
}

impl Patrol {
    fn register(world: &mut World) -> Result<Self> {
        Ok(Self {
            position: world
                .register_per_entity(|(x, y): (f32, f32)| Position { x, y }, Some("position"))?,
            velocity: world.register_per_entity(
                |(dx, dy): (f32, f32)| Velocity { dx, dy },
                Some("velocity"),
            )?,
            frozen: world.register_tag(Some("frozen"))?,
        })
    }
}

/// One frame of the movement system over every unfrozen drone.
fn run_movement(world: &mut World, movement: &mut Query) -> usize {
    let mut moved = 0;
    for record in movement.iter_mut(world) {
        let step = record
            .get_as::<Tuning>("tuning")
            .expect("every drone carries the shared tuning")
            .time_step;
        let velocity = *record
            .get_as::<Velocity>("velocity")
            .expect("matched drones carry a velocity");
        let position = record
            .get_mut_as::<Position>("position")
            .expect("matched drones carry a position");
        position.x += velocity.dx * step;
        position.y += velocity.dy * step;
        moved += 1;
    }
    moved
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    log::info!("Weft sandbox: registering component kinds...");
    let mut world = World::new();
    let patrol = Patrol::register(&mut world)?;
    let tuning = world.register_shared(Tuning { time_step: 0.5 }, Some("tuning"))?;
    log::info!(" -> {} kinds registered", world.kind_count());

    // Spawn the patrol: every drone moves, every eighth starts frozen.
    for i in 0..POPULATION {
        let start: (f32, f32) = (i as f32 * 3.0, 0.0);
        let heading: (f32, f32) = ((i % 5) as f32 - 2.0, 1.0);
        let mut drone = vec![
            Descriptor::with_args(patrol.position, start),
            Descriptor::with_args(patrol.velocity, heading),
            Descriptor::new(tuning),
        ];
        if i % 8 == 0 {
            drone.push(Descriptor::new(patrol.frozen));
        }
        world.spawn(drone)?;
    }
    log::info!(" -> {} drones spawned", world.entity_count());

    let mut movement = world.query([
        Term::With(patrol.position),
        Term::With(patrol.velocity),
        Term::Without(patrol.frozen),
    ])?;

    for frame in 0..FRAMES {
        let moved = run_movement(&mut world, &mut movement);
        log::info!(
            "Frame {frame}: moved {moved} drones ({} scans so far)",
            movement.rescans()
        );

        // Halfway through, ground one drone and send in a replacement. The
        // replacement's spawn is what grows the candidate index and makes
        // the next frame pick up both changes.
        if frame == FRAMES / 2 - 1 {
            let grounded = world
                .records()
                .map(|record| record.entity())
                .nth(1)
                .expect("population is not empty");
            world.attach(grounded, [Descriptor::new(patrol.frozen)])?;

            let start: (f32, f32) = (-10.0, -10.0);
            let heading: (f32, f32) = (1.0, 1.0);
            world.spawn(vec![
                Descriptor::with_args(patrol.position, start),
                Descriptor::with_args(patrol.velocity, heading),
                Descriptor::new(tuning),
            ])?;
            log::info!("Frame {frame}: grounded drone {} and spawned a replacement", grounded.index);
        }
    }

    let mut grounded_units = world.query([Term::With(patrol.frozen)])?;
    log::info!(
        "Patrol finished: {} drones total, {} grounded, {} movement scans",
        world.entity_count(),
        grounded_units.iter(&world).count(),
        movement.rescans()
    );

    // Farthest active drone from the origin, read through the same query.
    let farthest = movement
        .iter(&world)
        .map(|record| {
            let position = record
                .get_as::<Position>("position")
                .expect("matched drones carry a position");
            (record.entity(), position.x.hypot(position.y))
        })
        .max_by(|(_, a), (_, b)| a.total_cmp(b));
    if let Some((entity, distance)) = farthest {
        log::info!(" -> drone {} ranged farthest at {distance:.1} units", entity.index);
    }

    Ok(())
}
