mod common;

use common::{
    Event, MEM_END, MockPlatform, MockServices, Stop, blob, bring_up, capture_logs, logged,
    shutdown_events, until_stop,
};
use kernel_boot::{BootOutcome, InitStage, StatsSource, Usage, boot, run, shutdown};
use kernel_info::memory::ptov;
use kernel_memory_addresses::{PhysicalAddress, PhysicalPage};
use kernel_vmem::AddressSpace;
use log::Level;
use std::cell::RefCell;
use std::rc::Rc;

fn fixtures() -> (common::Log, MockServices, MockPlatform) {
    let events = Rc::new(RefCell::new(Vec::new()));
    let services = MockServices::new(&events);
    let platform = MockPlatform::new(&events);
    (events, services, platform)
}

fn events(log: &common::Log) -> Vec<Event> {
    log.borrow().clone()
}

const ROOT: PhysicalPage = PhysicalPage::from_number(0);

#[test]
fn quiet_run_boots_runs_and_powers_off() {
    let (log, mut services, mut platform) = fixtures();
    let (blob, count) = blob(&["-q", "run", "alarm-single"]);

    let stop = until_stop(|| boot(&blob, count, &mut services, &mut platform));
    assert_eq!(stop, Stop::PowerOff);

    let mut expected = bring_up(0, ROOT);
    expected.push(Event::Action("run alarm-single".into()));
    expected.extend(shutdown_events());
    assert_eq!(events(&log), expected);
    assert_eq!(
        platform.console,
        "Kernel command line: -q run alarm-single\n"
    );
}

#[test]
fn without_quiet_the_initial_thread_exits() {
    let (log, mut services, mut platform) = fixtures();
    let (blob, count) = blob(&["run", "alarm-single"]);

    let stop = until_stop(|| boot(&blob, count, &mut services, &mut platform));
    assert_eq!(stop, Stop::ExitThread);

    let events = events(&log);
    assert_eq!(events.last(), Some(&Event::ExitThread));
    assert!(!events.contains(&Event::PowerOff));
    assert!(!events.iter().any(|e| matches!(e, Event::Stats(_))));
}

#[cfg(all(feature = "filesys", feature = "userprog"))]
#[test]
fn options_reach_the_collaborators() {
    let (log, mut services, mut platform) = fixtures();
    let (blob, count) = blob(&["-rs=42", "-ul=300", "ls"]);

    let outcome = run(&blob, count, &mut services, &mut platform).expect("boot");
    let BootOutcome::Completed { options, actions } = outcome else {
        panic!("expected a completed boot, got {outcome:?}");
    };
    assert_eq!(actions, 1);
    assert_eq!(options.random_seed, 42);
    assert_eq!(options.user_page_limit, 300);
    assert!(!options.power_off_when_done);
    assert_eq!(services.options, Some(options));

    let events = events(&log);
    assert_eq!(
        events[0],
        Event::Configure {
            seed: 42,
            first_random: 0x5bba_4177
        }
    );
    assert_eq!(events.last(), Some(&Event::Action("ls".into())));
}

#[test]
fn activated_map_covers_memory_with_read_only_text() {
    let (_log, mut services, mut platform) = fixtures();
    let (blob, count) = blob(&["-q"]);

    let outcome = run(&blob, count, &mut services, &mut platform).expect("boot");
    assert!(matches!(outcome, BootOutcome::Completed { actions: 0, .. }));

    let map = platform.active.expect("activated");
    assert_eq!(map.root, ROOT);
    assert_eq!(map.stats.pages, MEM_END / 4096);
    assert_eq!(map.stats.read_only, 2);
    // PML4 + PDPT + PD + PT
    assert_eq!(map.stats.tables, 4);

    let space = AddressSpace::from_root(&platform.ram, map.root);
    let leaf = |pa: u64| {
        space
            .leaf(ptov(PhysicalAddress::new(pa)))
            .expect("mapped")
    };
    assert!(leaf(0).writable());
    assert!(!leaf(0x1000).writable());
    assert!(!leaf(0x2000).writable());
    assert!(leaf(0x3000).writable());
    assert_eq!(
        space.query(ptov(PhysicalAddress::new(0x8_1234))),
        Some(PhysicalAddress::new(0x8_1234))
    );
    assert_eq!(space.leaf(ptov(PhysicalAddress::new(MEM_END))), None);
}

#[test]
fn unknown_action_halts_after_bring_up() {
    let (log, mut services, mut platform) = fixtures();
    let (blob, count) = blob(&["frobnicate"]);

    let stop = until_stop(|| boot(&blob, count, &mut services, &mut platform));
    assert_eq!(stop, Stop::Halt);

    let mut expected = bring_up(0, ROOT);
    expected.push(Event::Halt);
    assert_eq!(events(&log), expected);
}

#[test]
fn fatal_error_logs_one_kernel_panic_line() {
    capture_logs();
    let (_log, mut services, mut platform) = fixtures();
    let (blob, count) = blob(&["frobnicate"]);

    let stop = until_stop(|| boot(&blob, count, &mut services, &mut platform));
    assert_eq!(stop, Stop::Halt);
    assert_eq!(
        logged(Level::Error),
        ["Kernel PANIC: unknown action `frobnicate' (use -h for help)"]
    );
    assert!(logged(Level::Info).iter().any(|m| m == "Boot complete."));
}

#[test]
fn quiet_shutdown_logs_powering_off() {
    capture_logs();
    let (_log, mut services, mut platform) = fixtures();
    let (blob, count) = blob(&["-q"]);

    let stop = until_stop(|| boot(&blob, count, &mut services, &mut platform));
    assert_eq!(stop, Stop::PowerOff);
    assert!(logged(Level::Error).is_empty());
    assert_eq!(
        logged(Level::Info).last().map(String::as_str),
        Some("Powering off...")
    );
}

#[test]
fn unknown_action_with_quiet_powers_off_without_stats() {
    let (log, mut services, mut platform) = fixtures();
    let (blob, count) = blob(&["-q", "frobnicate"]);

    let failure = run(&blob, count, &mut services, &mut platform).expect_err("fatal");
    assert!(failure.power_off);
    assert_eq!(
        failure.to_string(),
        "unknown action `frobnicate' (use -h for help)"
    );

    log.borrow_mut().clear();
    let stop = until_stop(|| boot(&blob, count, &mut services, &mut platform));
    assert_eq!(stop, Stop::PowerOff);
    let events = events(&log);
    assert_eq!(events.last(), Some(&Event::PowerOff));
    assert!(!events.iter().any(|e| matches!(e, Event::Stats(_))));
}

#[test]
fn actions_before_a_bad_one_still_run() {
    let (log, mut services, mut platform) = fixtures();
    let (blob, count) = blob(&["run", "a", "run"]);

    let failure = run(&blob, count, &mut services, &mut platform).expect_err("fatal");
    assert!(!failure.power_off);
    assert_eq!(failure.to_string(), "action `run' requires 1 argument(s)");
    assert_eq!(
        events(&log).last(),
        Some(&Event::Action("run a".into()))
    );
}

#[test]
fn argument_overflow_stops_before_anything_starts() {
    let (log, mut services, mut platform) = fixtures();
    let (blob, _) = blob(&["-q", "run", "x"]);

    let stop = until_stop(|| boot(&blob, 100, &mut services, &mut platform));
    assert_eq!(stop, Stop::Halt);
    assert_eq!(events(&log), [Event::Halt]);
    assert!(platform.console.is_empty());
}

#[test]
fn unknown_option_is_fatal_before_bring_up() {
    let (log, mut services, mut platform) = fixtures();
    let (blob, count) = blob(&["-q", "-x", "run", "a"]);

    let failure = run(&blob, count, &mut services, &mut platform).expect_err("fatal");
    assert!(failure.power_off);
    assert_eq!(failure.to_string(), "unknown option `-x' (use -h for help)");
    assert!(events(&log).is_empty());
    assert_eq!(platform.console, "Kernel command line: -q -x run a\n");
}

#[test]
fn help_prints_usage_and_shuts_down() {
    let (log, mut services, mut platform) = fixtures();
    let (blob, count) = blob(&["-h", "run", "ignored"]);

    let stop = until_stop(|| boot(&blob, count, &mut services, &mut platform));
    assert_eq!(stop, Stop::PowerOff);
    assert_eq!(events(&log), shutdown_events());
    assert_eq!(
        platform.console,
        format!("Kernel command line: -h run ignored\n{Usage}")
    );
}

#[test]
fn running_out_of_frames_while_mapping_is_fatal() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut services = MockServices::with_frames(&events, 3);
    let mut platform = MockPlatform::new(&events);
    let (blob, count) = blob(&["-q", "run", "a"]);

    let failure = run(&blob, count, &mut services, &mut platform).expect_err("fatal");
    assert!(failure.power_off);
    assert_eq!(
        failure.to_string(),
        "out of memory while mapping 0x0000008004000000"
    );
    assert!(platform.active.is_none());
    assert_eq!(
        events.borrow().last(),
        Some(&Event::Init(InitStage::Heap))
    );
}

#[test]
fn shutdown_flushes_then_reports_then_powers_off() {
    let (log, mut services, mut platform) = fixtures();

    let stop = until_stop(|| shutdown(&mut services, &mut platform));
    assert_eq!(stop, Stop::PowerOff);

    let events = events(&log);
    assert_eq!(events, shutdown_events());
    let first_stats = events
        .iter()
        .position(|e| matches!(e, Event::Stats(_)))
        .expect("statistics");
    assert_eq!(events[first_stats], Event::Stats(StatsSource::Timer));
    #[cfg(feature = "filesys")]
    assert_eq!(events[..first_stats], [Event::FilesysDone]);
}
