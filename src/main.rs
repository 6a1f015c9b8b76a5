use std::path::Path;

use nalgebra::Vector3;

use rocket_sim::component::motor::Motor;
use rocket_sim::component::Fin;
use rocket_sim::material::{Finish, Material};
use rocket_sim::shapes::{Cylinder, Nosecone, TrapezoidalPrism};
use rocket_sim::{io, AeroNode, LaunchConditions, SimConfig};

const JEFF1_MOTOR: &str = "\
F27R 29 124 0 0.0602 0.1193 AeroTech
0.0 0.0
0.1 38.0
0.2 42.0
0.3 35.0
0.5 30.0
0.8 22.0
1.0 14.0
1.2 0.0
";

const JEFF2_MOTOR: &str = "\
G80 29 164 0 0.1153 0.1984 AeroTech
0.0 0.0
0.1 85.0
0.3 95.0
0.6 80.0
1.0 70.0
1.4 60.0
1.7 40.0
1.9 0.0
";

fn build_jeff1() -> AeroNode {
    let mut rocket = AeroNode::rocket("Jeff 1");
    let mut stage = AeroNode::stage("Sustainer", Vector3::zeros());

    let nose = AeroNode::nosecone(
        "Nose cone",
        Vector3::zeros(),
        Nosecone::new(0.13, 0.0316, 0.003, 0.0),
        Material::pla(),
        Finish::smooth(),
    );

    let mut body = AeroNode::body_tube(
        "Body tube",
        Vector3::new(0.13, 0.0, 0.0),
        Cylinder::hollow(0.0316, 0.66, 0.0016),
        Material::cardboard(),
        Finish::smooth(),
    );

    let fin = Fin {
        shape: TrapezoidalPrism::new(0.10, 0.03, 0.06, 0.06, 0.003),
        material: Material::plywood(),
    };
    body.add_child(AeroNode::fin_set("Fin set", Vector3::new(0.56, 0.0, 0.0), fin, 4))
        .expect("fin set attaches to body tube");

    body.add_child(AeroNode::motor(
        "F27R",
        Vector3::new(0.48, 0.0, 0.0),
        Motor::from_str(JEFF1_MOTOR).expect("embedded motor file parses"),
    ))
    .expect("motor attaches to body tube");

    stage.add_child(nose).expect("nose attaches to stage");
    stage.add_child(body).expect("body attaches to stage");
    rocket.add_child(stage).expect("stage attaches to rocket");
    rocket
}

fn build_jeff2() -> AeroNode {
    let mut rocket = AeroNode::rocket("Jeff 2");
    let mut stage = AeroNode::stage("Sustainer", Vector3::zeros());

    let nose = AeroNode::nosecone(
        "Nose cone",
        Vector3::zeros(),
        Nosecone::new(0.18, 0.0316, 0.0025, 1.0 / 3.0),
        Material::pla(),
        Finish::smooth(),
    );

    let mut body = AeroNode::body_tube(
        "Body tube",
        Vector3::new(0.18, 0.0, 0.0),
        Cylinder::hollow(0.0316, 0.90, 0.0016),
        Material::cardboard(),
        Finish::smooth(),
    );

    let fin = Fin {
        shape: TrapezoidalPrism::new(0.12, 0.04, 0.08, 0.08, 0.003),
        material: Material::plywood(),
    };
    body.add_child(AeroNode::fin_set("Fin set", Vector3::new(0.78, 0.0, 0.0), fin, 4))
        .expect("fin set attaches to body tube");

    body.add_child(AeroNode::internal("Payload bay", Vector3::new(0.2, 0.0, 0.0), 0.05))
        .expect("internal component attaches to body tube");

    body.add_child(AeroNode::motor(
        "G80",
        Vector3::new(0.68, 0.0, 0.0),
        Motor::from_str(JEFF2_MOTOR).expect("embedded motor file parses"),
    ))
    .expect("motor attaches to body tube");

    stage.add_child(nose).expect("nose attaches to stage");
    stage.add_child(body).expect("body attaches to stage");
    rocket.add_child(stage).expect("stage attaches to rocket");
    rocket
}

fn fly(name: &str, rocket: &AeroNode) {
    let config = SimConfig::default();
    let launch = LaunchConditions::default();

    log::info!("simulating {name}: mass at liftoff {:.3} kg", rocket.mass(0.0));

    let trajectory = match rocket_sim::simulate(rocket, &config, &launch) {
        Ok(t) => t,
        Err(e) => {
            log::error!("{name} simulation failed: {e}");
            return;
        }
    };

    let summary = io::json::FlightSummary::from_trajectory(&trajectory);

    std::fs::create_dir_all("output").ok();
    let slug = name.to_lowercase().replace(' ', "_");
    let csv_path = Path::new("output").join(format!("{slug}.csv"));
    let json_path = Path::new("output").join(format!("{slug}.json"));

    if let Err(e) = io::csv::write_trajectory_file(csv_path.to_str().unwrap(), &trajectory) {
        log::error!("failed to write {}: {e}", csv_path.display());
    }
    if let Err(e) = io::json::write_summary_file(json_path.to_str().unwrap(), name, &summary) {
        log::error!("failed to write {}: {e}", json_path.display());
    }

    println!("+{:-<40}+", "");
    println!("| {name:<38} |");
    println!("+{:-<40}+", "");
    println!("| apogee        {:>10.1} m        |", summary.apogee_m);
    println!("| apogee time   {:>10.2} s        |", summary.apogee_time);
    println!("| max speed     {:>10.1} m/s      |", summary.max_speed);
    println!("| max mach      {:>10.3}          |", summary.max_mach);
    println!("| max accel     {:>10.1} m/s^2    |", summary.max_accel);
    println!("| flight time   {:>10.2} s        |", summary.flight_time);
    println!("| impact speed  {:>10.1} m/s      |", summary.impact_speed);
    println!("+{:-<40}+", "");
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    fly("Jeff 1", &build_jeff1());
    fly("Jeff 2", &build_jeff2());
}
