// src/main.rs
//
// Batch driver for the MHD rotor test problem.
//
// `init` builds the t=0 rotor state and writes it (plus config.json) into
// the data directory; `render` draws one figure per snapshot found there;
// `all` (the default) does both. Snapshots produced later by an external
// evolver land in the same directory and are picked up by `render` in
// time-index order.
//
// Examples:
//
//   cargo run --release -- init n=64 ng=2 out=data
//   cargo run --release -- render out=data
//   cargo run --release -- all n=128

use std::env;
use std::error::Error;
use std::fs::create_dir_all;
use std::path::PathBuf;
use std::process::exit;

use mhd_rotor::config::RunConfig;
use mhd_rotor::initial_state::build_initial_state;
use mhd_rotor::params::SimParams;
use mhd_rotor::snapshot::{snapshot_path, write_snapshot};
use mhd_rotor::visualisation::render_directory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Init,
    Render,
    All,
}

impl Mode {
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "init" => Some(Self::Init),
            "render" => Some(Self::Render),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

fn print_usage() {
    eprintln!(
        r#"Usage:
  cargo run -- [init|render|all]
             [n=CELLS] [ng=GHOST] [length=VAL] [cfl=VAL] [gamma=VAL] [time=VAL]
             [out=DIR]

Modes:
  init    build the t=0 rotor state and write <out>/0.snap + config.json
  render  draw one PNG per snapshot in <out>, ascending by time index
  all     init, then render (default)

Defaults: n=64 ng=2 length=1.0 cfl=0.5 gamma=5/3 time=0.0 out=data
"#
    );
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> T {
    match value.parse() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("invalid value for {}: {}", key, value);
            print_usage();
            exit(2);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let argv: Vec<String> = env::args().collect();

    let mut mode = Mode::All;
    let mut params = SimParams::default();
    let mut out_root = String::from("data");

    for arg in &argv[1..] {
        if let Some(m) = Mode::from_str(arg) {
            mode = m;
            continue;
        }
        match arg.split_once('=') {
            Some(("n", v)) => params.n_cells = parse_value("n", v),
            Some(("ng", v)) => params.n_ghost = parse_value("ng", v),
            Some(("length", v)) => params.domain_length = parse_value("length", v),
            Some(("cfl", v)) => params.cfl = parse_value("cfl", v),
            Some(("gamma", v)) => params.gamma = parse_value("gamma", v),
            Some(("time", v)) => params.evolution_time = parse_value("time", v),
            Some(("out", v)) => out_root = v.to_string(),
            _ => {
                eprintln!("unknown argument: {}", arg);
                print_usage();
                exit(2);
            }
        }
    }

    let dir = PathBuf::from(&out_root);

    if mode == Mode::Init || mode == Mode::All {
        create_dir_all(&dir)?;
        let snap = build_initial_state(&params);
        let path = snapshot_path(&dir, 0);
        write_snapshot(&path, &snap)?;
        RunConfig::from_params(&params, &dir).write_to_dir(&dir)?;
        println!(
            "wrote {} ({} interior cells per axis, {} with ghost pad)",
            path.display(),
            params.n_cells,
            params.grid().n_total()
        );
    }

    if mode == Mode::Render || mode == Mode::All {
        let written = render_directory(&dir)?;
        if written.is_empty() {
            println!("no snapshots found in {}", dir.display());
        }
        for p in &written {
            println!("rendered {}", p.display());
        }
    }

    Ok(())
}
