//! Fixed-step arena loop driving a warren store.
//!
//! Spawns a bestiary of three kinds, then runs a fixed-step loop that
//! applies an integrator, burns projectile lifetime, and periodically
//! logs a population snapshot. Expired projectiles are swept through
//! the raw lane, since the store exposes no removal of its own.
//!
//! Usage: `warren-demo [ticks] [population]`

use eyre::WrapErr;
use tracing::info;
use warren_store::{Identity, Kind, Member, Store};

/// Fixed simulation step, 60 ticks per simulated second.
const TICK_SECONDS: f32 = 1.0 / 60.0;

/// Ticks between population snapshots in the log.
const REPORT_EVERY: u32 = 30;

/// Hit points cycle through the spawn loop.
const HP_CYCLE: [i32; 5] = [10, 11, 12, 13, 14];

/// A walking inhabitant with hit points.
struct Npc {
    identity: Identity,
    name: String,
    hp: i32,
    x: f32,
    y: f32,
    speed: f32,
}

impl Kind for Npc {
    type Args = (String, i32, f32);

    fn create(identity: Identity, (name, hp, speed): Self::Args) -> Self {
        Self {
            identity,
            name,
            hp,
            x: 0.0,
            y: 0.0,
            speed,
        }
    }

    fn identity(&self) -> Identity {
        self.identity
    }
}

/// A shot fired from the origin, dead once its lifetime runs out.
struct Projectile {
    identity: Identity,
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    ttl: f32,
}

impl Kind for Projectile {
    /// `(angle, speed, ttl)` - velocity is derived at spawn.
    type Args = (f32, f32, f32);

    fn create(identity: Identity, (angle, speed, ttl): Self::Args) -> Self {
        Self {
            identity,
            x: 0.0,
            y: 0.0,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            ttl,
        }
    }

    fn identity(&self) -> Identity {
        self.identity
    }
}

/// A healing item resting on the field.
struct Pickup {
    identity: Identity,
    x: f32,
    y: f32,
    heal: i32,
}

impl Kind for Pickup {
    type Args = (f32, f32, i32);

    fn create(identity: Identity, (x, y, heal): Self::Args) -> Self {
        Self {
            identity,
            x,
            y,
            heal,
        }
    }

    fn identity(&self) -> Identity {
        self.identity
    }
}

warren_store::registry! {
    /// Everything the arena can hold.
    pub ArenaKinds {
        holder: ArenaHolder,
        visitor: ArenaVisitor,
        kinds: {
            Npc => visit_npc,
            Projectile => visit_projectile,
            Pickup => visit_pickup,
        },
    }
}

/// Advances everything that moves by one fixed step.
struct Integrate {
    dt: f32,
}

impl ArenaVisitor for Integrate {
    fn visit_npc(&mut self, npc: &mut Npc) {
        npc.x += npc.speed * self.dt;
    }

    fn visit_projectile(&mut self, projectile: &mut Projectile) {
        projectile.x += projectile.vx * self.dt;
        projectile.y += projectile.vy * self.dt;
    }
}

/// Burns projectile lifetime; the loop sweeps out expired ones.
struct Decay {
    dt: f32,
}

impl ArenaVisitor for Decay {
    fn visit_projectile(&mut self, projectile: &mut Projectile) {
        projectile.ttl -= self.dt;
    }
}

/// Aggregates a population snapshot for the tick log.
#[derive(Default)]
struct Report {
    npcs: usize,
    total_hp: i64,
    projectiles: usize,
    pickups: usize,
    heal_available: i64,
}

impl ArenaVisitor for Report {
    fn visit_npc(&mut self, npc: &mut Npc) {
        self.npcs += 1;
        self.total_hp += i64::from(npc.hp);
    }

    fn visit_projectile(&mut self, _projectile: &mut Projectile) {
        self.projectiles += 1;
    }

    fn visit_pickup(&mut self, pickup: &mut Pickup) {
        self.pickups += 1;
        self.heal_available += i64::from(pickup.heal);
    }
}

fn parse_arg<T>(args: &[String], index: usize, default: T, what: &str) -> eyre::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match args.get(index) {
        Some(raw) => raw
            .parse()
            .wrap_err_with(|| format!("invalid {what}: {raw:?}")),
        None => Ok(default),
    }
}

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("warren_demo=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let ticks: u32 = parse_arg(&args, 1, 240, "tick count")?;
    let population: usize = parse_arg(&args, 2, 12, "population")?;

    let mut store = Store::<ArenaKinds>::with_capacity(population);

    for i in 0..population {
        store.spawn::<Npc>((
            format!("npc-{i}"),
            HP_CYCLE[i % HP_CYCLE.len()],
            0.5 + i as f32 * 0.1,
        ));
    }
    for i in 0..population / 2 {
        store.spawn::<Pickup>((i as f32 * 4.0, 2.0, 2));
    }

    info!(
        npcs = store.len::<Npc>(),
        pickups = store.len::<Pickup>(),
        "spawned initial population"
    );

    let mut integrate = Integrate { dt: TICK_SECONDS };
    let mut decay = Decay { dt: TICK_SECONDS };

    for tick in 0..ticks {
        // Opening volley, one shot per tick until the arena is seeded.
        if (tick as usize) < population {
            let angle = tick as f32 * 0.39;
            store.spawn::<Projectile>((angle, 30.0, 1.5));
        }

        store.visit(&mut integrate);
        store.visit(&mut decay);

        // Expired projectiles are swept through the raw lane.
        store
            .access::<Projectile>()
            .retain(|holder| Projectile::unwrap_ref(holder).ttl > 0.0);

        if tick % REPORT_EVERY == 0 {
            let mut report = Report::default();
            store.visit(&mut report);
            info!(
                tick,
                npcs = report.npcs,
                hp = report.total_hp,
                projectiles = report.projectiles,
                pickups = report.pickups,
                heal = report.heal_available,
                "tick snapshot"
            );
        }
    }

    for npc in store.view::<Npc>() {
        info!(
            identity = npc.identity(),
            name = %npc.name,
            x = npc.x,
            y = npc.y,
            hp = npc.hp,
            "final npc"
        );
    }

    info!(
        ticks,
        spawned = store.spawned(),
        remaining = store.total(),
        "simulation finished"
    );

    Ok(())
}
