//! Driver lifecycle: static/initial/final regions, display output,
//! configuration and ROM binding.

use std::sync::Arc;

use vela_common::Bits;
use vela_config::{InitConfig, InitPolicy, SimConfig};
use vela_ir::{Design, DesignBuilder, EdgeSensitivity, Expr, Statement};
use vela_sim::{Lifecycle, RomBindings, SimError, Simulator};

#[test]
fn initial_values_do_not_count_as_edges() {
    let mut b = DesignBuilder::new();
    let trig = b.reg("trig", 1).unwrap();
    let hits = b.reg("hits", 8).unwrap();
    b.initial("boot", Statement::assign(trig, Expr::lit(1, 1)));
    b.clocked(
        "count",
        vec![EdgeSensitivity::posedge(trig)],
        Statement::nonblocking(hits, Expr::signal(hits).add(Expr::lit(1, 8))),
    );
    let mut sim = Simulator::with_defaults(Arc::new(b.build().unwrap())).unwrap();
    let stats = sim.evaluate().unwrap();
    assert_eq!(sim.peek(trig).as_u64(), 1);
    assert_eq!(sim.peek(hits).as_u64(), 0);
    assert_eq!(stats.active_iterations, 0);
}

#[test]
fn static_runs_before_initial() {
    let mut b = DesignBuilder::new();
    let r = b.reg("r", 8).unwrap();
    b.static_init("preset", Statement::assign(r, Expr::lit(5, 8)));
    b.initial(
        "double",
        Statement::assign(r, Expr::signal(r).add(Expr::signal(r))),
    );
    let mut sim = Simulator::with_defaults(Arc::new(b.build().unwrap())).unwrap();
    sim.evaluate().unwrap();
    sim.evaluate().unwrap();
    // Both ran exactly once.
    assert_eq!(sim.output(r).unwrap().as_u64(), 10);
}

fn reporting_design() -> Design {
    let mut b = DesignBuilder::new();
    let clk = b.input("clk", 1).unwrap();
    let cnt = b.reg("cnt", 4).unwrap();
    b.initial("hello", Statement::display("boot cnt=%d", vec![Expr::signal(cnt)]));
    b.clocked(
        "count",
        vec![EdgeSensitivity::posedge(clk)],
        Statement::nonblocking(cnt, Expr::signal(cnt).add(Expr::lit(1, 4))),
    );
    b.final_block("report", Statement::display("cnt=%h (%b)", vec![Expr::signal(cnt), Expr::signal(cnt)]));
    b.build().unwrap()
}

#[test]
fn display_and_final() {
    let design = Arc::new(reporting_design());
    let clk = design.find_signal("clk").unwrap();
    let mut sim = Simulator::with_defaults(design).unwrap();
    sim.evaluate().unwrap();
    for _ in 0..11 {
        sim.set_input(clk, 1).unwrap();
        sim.evaluate().unwrap();
        sim.set_input(clk, 0).unwrap();
        sim.evaluate().unwrap();
    }
    sim.finalize().unwrap();
    assert_eq!(sim.state(), Lifecycle::Final);
    assert_eq!(
        sim.display_output(),
        &["boot cnt=0".to_string(), "cnt=b (1011)".to_string()]
    );
    assert_eq!(sim.take_display_output().len(), 2);
    assert!(sim.display_output().is_empty());
    assert!(matches!(sim.finalize(), Err(SimError::Finalized)));
    assert!(matches!(sim.set_input(clk, 1), Err(SimError::Finalized)));
}

#[test]
fn outputs_refused_until_evaluated() {
    let design = Arc::new(reporting_design());
    let mut sim = Simulator::with_defaults(design).unwrap();
    assert!(matches!(
        sim.output_by_name("cnt"),
        Err(SimError::NotReady { .. })
    ));
    sim.evaluate().unwrap();
    assert_eq!(sim.output_by_name("cnt").unwrap(), Bits::zero(4));
    sim.set_input_by_name("clk", 1).unwrap();
    assert!(matches!(
        sim.output_by_name("cnt"),
        Err(SimError::NotReady { reason }) if reason.contains("inputs changed")
    ));
    sim.evaluate().unwrap();
    assert_eq!(sim.output_by_name("cnt").unwrap().as_u64(), 1);
    assert!(matches!(
        sim.output_by_name("nope"),
        Err(SimError::UnknownSignal(_))
    ));
}

#[test]
fn config_loaded_from_directory() {
    let mut b = DesignBuilder::new();
    let x = b.wire("x", 1).unwrap();
    b.assign(x, Expr::signal(x).not());
    let design = Arc::new(b.build().unwrap());

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("vela.toml"),
        "[kernel]\nsettle_limit = 3\nactive_limit = 7\n",
    )
    .unwrap();
    let mut sim = Simulator::from_config_dir(Arc::clone(&design), dir.path(), &RomBindings::new())
        .unwrap();
    assert_eq!(sim.config().kernel.settle_limit, 3);
    assert_eq!(sim.config().kernel.active_limit, 7);
    assert!(matches!(
        sim.evaluate(),
        Err(SimError::NonConvergence { iterations: 3, .. })
    ));

    let empty = tempfile::tempdir().unwrap();
    let err = Simulator::from_config_dir(design, empty.path(), &RomBindings::new()).unwrap_err();
    assert!(matches!(err, SimError::Config(_)));
}

#[test]
fn init_policy_fills_registers() {
    let mut b = DesignBuilder::new();
    let wide = b.reg("wide", 16).unwrap();
    let fixed = b.reg("fixed", 16).unwrap();
    b.set_init(fixed, 0x1234).unwrap();
    let design = Arc::new(b.build().unwrap());

    let with_policy = |policy, seed| {
        let config = SimConfig {
            init: InitConfig { policy, seed },
            ..SimConfig::default()
        };
        Simulator::new(Arc::clone(&design), config, &RomBindings::new()).unwrap()
    };

    let ones = with_policy(InitPolicy::Ones, 0);
    assert_eq!(ones.peek(wide), Bits::ones(16));
    assert_eq!(ones.peek(fixed).as_u64(), 0x1234);

    let r1 = with_policy(InitPolicy::Random, 7);
    let r2 = with_policy(InitPolicy::Random, 7);
    assert_eq!(r1.peek(wide), r2.peek(wide));
    assert_eq!(r1.peek(fixed).as_u64(), 0x1234);
}

#[test]
fn rom_lookup_through_design() {
    let mut b = DesignBuilder::new();
    let addr = b.input("addr", 4).unwrap();
    let data = b.output("data", 8).unwrap();
    let font = b.rom("font", 16).unwrap();
    b.assign(data, Expr::rom(font, Expr::signal(addr)));
    let design = Arc::new(b.build().unwrap());

    let err = Simulator::with_defaults(Arc::clone(&design)).unwrap_err();
    assert!(matches!(err, SimError::MissingRom(name) if name == "font"));

    let table: Vec<u8> = (0..16).map(|i| i * 3).collect();
    let mut roms = RomBindings::new();
    roms.bind("font", Arc::new(table));
    let mut sim = Simulator::new(design, SimConfig::default(), &roms).unwrap();
    sim.set_input(addr, 5).unwrap();
    sim.evaluate().unwrap();
    assert_eq!(sim.output(data).unwrap().as_u64(), 15);
}
