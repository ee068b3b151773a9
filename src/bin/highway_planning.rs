// Highway planning demo
//
// Builds a synthetic circular track with three lanes, scripts a handful of
// slower vehicles onto it, and runs the planning session cycle by cycle,
// consuming a few waypoints of each plan before asking for the next one.
// The final state of the world is saved as a PNG.

use std::f64::consts::PI;

use highway_planner::utils::{PathStyle, Visualizer};
use highway_planner::utils::visualization::colors;
use highway_planner::{
    PlannerConfig, PlannerState, PlanningSession, ReferencePath, ReferenceWaypoint, Snapshot,
    TrackedVehicle, Trajectory,
};

/// Waypoints consumed by the simulated vehicle between snapshots
const CONSUMED_PER_CYCLE: usize = 3;
const CYCLES: usize = 300;

fn build_track(n: usize, radius: f64) -> ReferencePath {
    let chord = 2.0 * radius * (PI / n as f64).sin();
    let waypoints = (0..n)
        .map(|i| {
            let ang = 2.0 * PI * i as f64 / n as f64;
            ReferenceWaypoint::new(
                radius * ang.cos(),
                radius * ang.sin(),
                chord * i as f64,
                ang.cos(),
                ang.sin(),
            )
        })
        .collect();
    ReferencePath::new(waypoints, chord * n as f64).expect("valid synthetic track")
}

/// Scripted traffic: constant speed, fixed lane
struct ScriptedVehicle {
    id: u64,
    s: f64,
    d: f64,
    speed: f64,
}

impl ScriptedVehicle {
    fn tracked(&self, path: &ReferencePath) -> TrackedVehicle {
        let here = path.to_cartesian(self.s, self.d);
        let ahead = path.to_cartesian(self.s + 1.0, self.d);
        let heading = (ahead.y - here.y).atan2(ahead.x - here.x);
        TrackedVehicle::new(
            self.id,
            here.x,
            here.y,
            self.speed * heading.cos(),
            self.speed * heading.sin(),
            self.s,
            self.d,
        )
    }
}

fn main() {
    println!("Highway planning demo start!");

    let config = PlannerConfig::default();
    let path = build_track(120, 300.0);
    let mut session = PlanningSession::new(path.clone(), config.clone(), PlannerState::new(1, 2.0))
        .expect("valid session");

    let mut traffic = vec![
        ScriptedVehicle { id: 0, s: 60.0, d: 6.0, speed: 14.0 },
        ScriptedVehicle { id: 1, s: 140.0, d: 2.0, speed: 18.0 },
        ScriptedVehicle { id: 2, s: 220.0, d: 10.0, speed: 16.0 },
    ];

    // Ego bookkeeping the transport layer would normally do
    let mut ego_s = 0.0;
    let mut ego_d = config.lane_center(1);
    let mut leftovers = Trajectory::new();
    let mut last_plan = Trajectory::new();

    for cycle in 0..CYCLES {
        let here = path.to_cartesian(ego_s, ego_d);
        let ahead = path.to_cartesian(ego_s + 1.0, ego_d);
        let yaw = (ahead.y - here.y).atan2(ahead.x - here.x);

        let snapshot = Snapshot {
            x: here.x,
            y: here.y,
            s: ego_s,
            d: ego_d,
            yaw_deg: yaw.to_degrees(),
            speed: session.state().target_speed,
            previous_path_x: leftovers.x.clone(),
            previous_path_y: leftovers.y.clone(),
            end_path_s: ego_s + leftovers.len() as f64 * config.cycle_duration
                * session.state().target_speed,
            end_path_d: config.lane_center(session.state().target_lane),
            tracked: traffic.iter().map(|v| v.tracked(&path)).collect(),
        };

        let plan = match session.step(&snapshot) {
            Ok(plan) => plan,
            Err(err) => {
                println!("cycle {} skipped: {}", cycle, err);
                continue;
            }
        };

        // Consume the head of the plan, keep the tail for the next cycle
        let consumed = CONSUMED_PER_CYCLE.min(plan.len());
        let dt = consumed as f64 * config.cycle_duration;
        let speed = session.state().target_speed;
        ego_s = (ego_s + dt * speed).rem_euclid(path.max_s());
        ego_d = config.lane_center(session.state().target_lane);
        leftovers = Trajectory {
            x: plan.x[consumed..].to_vec(),
            y: plan.y[consumed..].to_vec(),
        };
        for vehicle in traffic.iter_mut() {
            vehicle.s = (vehicle.s + dt * vehicle.speed).rem_euclid(path.max_s());
        }
        last_plan = plan;

        if cycle % 50 == 0 {
            println!(
                "cycle {:3}: lane {} speed {:.2} s {:.1}",
                cycle,
                session.state().target_lane,
                session.state().target_speed,
                ego_s
            );
        }
    }

    println!(
        "Done: lane {} at speed {:.2}",
        session.state().target_lane,
        session.state().target_speed
    );

    std::fs::create_dir_all("img").unwrap_or_default();

    let tracked: Vec<TrackedVehicle> =
        traffic.iter().map(|v| v.tracked(&path)).collect();
    let mut vis = Visualizer::new();
    vis.set_title("Highway Planning");
    vis.plot_reference_path(&path);
    vis.plot_trajectory(&last_plan, &PathStyle::new(colors::TRAJECTORY, "Plan"));
    vis.plot_vehicles(&tracked);
    vis.plot_ego(path.to_cartesian(ego_s, ego_d));

    match vis.save_png("img/highway_planning.png", 800, 600) {
        Ok(()) => println!("Plot saved to img/highway_planning.png"),
        Err(err) => println!("Plot skipped: {}", err),
    }

    println!("Highway planning demo finish!");
}
