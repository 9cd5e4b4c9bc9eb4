//! Bone Snake headless driver
//!
//! Runs the body through a fixed timestep loop with a seeded gunner
//! shooting at random segments, and logs what happens.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use bone_snake::consts::*;
    use bone_snake::sim::{BodyEvent, BoneSnake, Shot, resolve_shot};
    use bone_snake::{BodyConfig, ScreenBounds};

    /// Frame time of the simulated host, deliberately off the sim step
    const FRAME_DT: f32 = 1.0 / 50.0;

    #[derive(Parser, Debug)]
    #[command(author, version, about, long_about = None)]
    struct Args {
        /// Seconds of simulated time
        #[arg(long, default_value_t = 60.0)]
        seconds: f32,

        /// Seed for the gunner
        #[arg(long, default_value_t = 1)]
        seed: u64,

        /// Body config (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Damage per shot
        #[arg(long, default_value_t = 10)]
        damage: u32,

        /// Seconds between shots
        #[arg(long, default_value_t = 0.5)]
        fire_interval: f32,
    }

    /// Totals for the end-of-run summary
    #[derive(Debug, Default)]
    struct Tally {
        shots: u32,
        hits: u32,
        spawned: u32,
        destroyed: u32,
        rewound: f32,
    }

    impl Tally {
        fn record(&mut self, event: &BodyEvent) {
            match event {
                BodyEvent::SegmentSpawned { .. } => self.spawned += 1,
                BodyEvent::GroupDestroyed { rewind, .. } => {
                    self.destroyed += 1;
                    self.rewound += rewind;
                }
                BodyEvent::Hit => self.hits += 1,
                _ => {}
            }
        }
    }

    /// Fire one shot at a random body segment
    fn fire(body: &mut BoneSnake, rng: &mut Pcg32, damage: u32) -> bool {
        let targets: Vec<_> = body
            .segments()
            .iter()
            .filter(|s| !s.is_head)
            .map(|s| s.pos)
            .collect();
        if targets.is_empty() {
            return false;
        }
        let pos = targets[rng.random_range(0..targets.len())];
        let shot = Shot {
            pos,
            radius: 2.0,
            damage,
        };
        if let Some(outcome) = resolve_shot(body, &shot) {
            if let Some(report) = outcome.recovery {
                log::info!(
                    "Group {} destroyed: rewound {:.1}, head at {:?}, {:?}",
                    report.group,
                    report.rewind,
                    report.truncation.head,
                    report.state
                );
            }
        }
        true
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let args = Args::parse();
        log::info!("Bone Snake starting: {:?}", args);

        let bounds = ScreenBounds::default();
        let config = match &args.config {
            Some(path) => BodyConfig::load_or_default(path),
            None => BodyConfig::default(),
        };
        let config = match config.validate_for(&bounds) {
            Ok(()) => config,
            Err(e) => {
                log::error!("{}, using defaults", e);
                BodyConfig::default()
            }
        };

        let mut body = BoneSnake::new(config, bounds);
        let mut rng = Pcg32::seed_from_u64(args.seed);
        let mut tally = Tally::default();

        let mut accumulator = 0.0;
        let mut fire_timer = args.fire_interval;
        let mut elapsed = 0.0;
        while elapsed < args.seconds {
            elapsed += FRAME_DT;
            accumulator += FRAME_DT;

            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                body.update(SIM_DT);
                accumulator -= SIM_DT;
                substeps += 1;
            }

            fire_timer -= FRAME_DT;
            if fire_timer <= 0.0 {
                fire_timer += args.fire_interval.max(SIM_DT);
                if fire(&mut body, &mut rng, args.damage) {
                    tally.shots += 1;
                }
            }

            for event in body.drain_events() {
                log::debug!("{:?}", event);
                tally.record(&event);
            }
        }

        log::info!(
            "After {:.1}s ({} ticks): {} segments in {} groups, head at {:?} facing {:?}",
            elapsed,
            body.ticks(),
            body.segments().len(),
            body.groups().len(),
            body.head_position(),
            body.head_facing()
        );
        log::info!(
            "Shots {}, hits {}, spawned {}, groups destroyed {}, total rewind {:.1}",
            tally.shots,
            tally.hits,
            tally.spawned,
            tally.destroyed,
            tally.rewound
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No headless driver on wasm
}
