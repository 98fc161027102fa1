#![allow(dead_code)]

use kernel_boot::{
    ActionExecutor, BootOptions, Collaborators, InitStage, Platform, Random, StatsSource,
};
use kernel_info::loader::LOADER_ARGS_LEN;
use kernel_info::memory::ptov;
use kernel_memory_addresses::{PhysicalAddress, PhysicalPage, VirtualAddress};
use kernel_vmem::{FrameAlloc, KernelMap, PhysMapper};
use log::{Level, LevelFilter, Metadata, Record};
use std::cell::{RefCell, UnsafeCell};
use std::fmt::{self, Write};
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::Once;

/// Something the mocks observed, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Configure { seed: u32, first_random: u32 },
    Init(InitStage),
    InitMemory,
    Activate { root: PhysicalPage },
    Action(String),
    FilesysDone,
    Stats(StatsSource),
    ExitThread,
    PowerOff,
    Halt,
}

/// Why a never-returning path was left.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Stop {
    PowerOff,
    Halt,
    ExitThread,
}

pub type Log = Rc<RefCell<Vec<Event>>>;

/// Run `f`, which must end in one of the mocks' stop points.
pub fn until_stop(f: impl FnOnce()) -> Stop {
    let payload = panic::catch_unwind(AssertUnwindSafe(f)).expect_err("boot returned");
    *payload.downcast::<Stop>().expect("stopped by a mock")
}

/// A loader argument blob holding `tokens`.
pub fn blob(tokens: &[&str]) -> ([u8; LOADER_ARGS_LEN], u32) {
    let mut blob = [0u8; LOADER_ARGS_LEN];
    let mut pos = 0;
    for t in tokens {
        blob[pos..pos + t.len()].copy_from_slice(t.as_bytes());
        pos += t.len() + 1;
    }
    (blob, u32::try_from(tokens.len()).unwrap())
}

#[repr(C, align(4096))]
struct Frame([u8; 4096]);

/// Fake physical memory for page tables; frame `n` backs `n << 12`.
pub struct FakeRam {
    frames: Box<[UnsafeCell<Frame>]>,
}

impl FakeRam {
    pub fn with_frames(n: usize) -> Self {
        Self {
            frames: (0..n).map(|_| UnsafeCell::new(Frame([0x5a; 4096]))).collect(),
        }
    }
}

impl PhysMapper for FakeRam {
    unsafe fn phys_to_mut<'a, T>(&self, pa: PhysicalAddress) -> &'a mut T {
        let idx = usize::try_from(pa.as_u64() >> 12).unwrap();
        unsafe { &mut *self.frames[idx].get().cast::<T>() }
    }
}

pub struct FakeFrames {
    next: u64,
    end: u64,
}

impl FrameAlloc for FakeFrames {
    fn alloc_4k(&mut self) -> Option<PhysicalPage> {
        (self.next < self.end).then(|| {
            self.next += 1;
            PhysicalPage::from_number(self.next - 1)
        })
    }
}

pub const MEM_END: u64 = 1024 * 1024;

pub struct MockPlatform {
    pub events: Log,
    pub ram: FakeRam,
    pub console: String,
    pub text: Range<VirtualAddress>,
    pub active: Option<KernelMap>,
}

impl MockPlatform {
    pub fn new(events: &Log) -> Self {
        Self {
            events: Rc::clone(events),
            ram: FakeRam::with_frames(8),
            console: String::new(),
            text: ptov(PhysicalAddress::new(0x1000))..ptov(PhysicalAddress::new(0x3000)),
            active: None,
        }
    }
}

impl Platform for MockPlatform {
    type Mapper = FakeRam;

    fn phys_mapper(&self) -> &FakeRam {
        &self.ram
    }

    fn kernel_text(&self) -> Range<VirtualAddress> {
        self.text.clone()
    }

    fn activate(&mut self, map: &KernelMap) {
        self.events
            .borrow_mut()
            .push(Event::Activate { root: map.root });
        self.active = Some(*map);
    }

    fn console(&mut self, args: fmt::Arguments<'_>) {
        self.console.write_fmt(args).unwrap();
    }

    fn power_off(&mut self) -> ! {
        self.events.borrow_mut().push(Event::PowerOff);
        panic::panic_any(Stop::PowerOff)
    }

    fn halt(&mut self) -> ! {
        self.events.borrow_mut().push(Event::Halt);
        panic::panic_any(Stop::Halt)
    }
}

pub struct MockServices {
    pub events: Log,
    pub frames: FakeFrames,
    pub mem_end: PhysicalAddress,
    pub options: Option<BootOptions>,
}

impl MockServices {
    pub fn new(events: &Log) -> Self {
        Self::with_frames(events, 8)
    }

    pub fn with_frames(events: &Log, frames: u64) -> Self {
        Self {
            events: Rc::clone(events),
            frames: FakeFrames {
                next: 0,
                end: frames,
            },
            mem_end: PhysicalAddress::new(MEM_END),
            options: None,
        }
    }

    fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

impl ActionExecutor for MockServices {
    fn run_task(&mut self, task: &str, options: &BootOptions) {
        let kind = if options.thread_tests { "test" } else { "run" };
        self.push(Event::Action(format!("{kind} {task}")));
    }

    #[cfg(feature = "filesys")]
    fn list_files(&mut self) {
        self.push(Event::Action("ls".into()));
    }

    #[cfg(feature = "filesys")]
    fn print_file(&mut self, file: &str) {
        self.push(Event::Action(format!("cat {file}")));
    }

    #[cfg(feature = "filesys")]
    fn remove_file(&mut self, file: &str) {
        self.push(Event::Action(format!("rm {file}")));
    }

    #[cfg(feature = "filesys")]
    fn put_file(&mut self, file: &str) {
        self.push(Event::Action(format!("put {file}")));
    }

    #[cfg(feature = "filesys")]
    fn get_file(&mut self, file: &str) {
        self.push(Event::Action(format!("get {file}")));
    }
}

impl Collaborators for MockServices {
    type Alloc = FakeFrames;

    fn configure(&mut self, options: &BootOptions, mut random: Random) {
        self.options = Some(*options);
        self.push(Event::Configure {
            seed: options.random_seed,
            first_random: random.next_u32(),
        });
    }

    fn init(&mut self, stage: InitStage, _options: &BootOptions) {
        self.push(Event::Init(stage));
    }

    fn init_memory(&mut self, _options: &BootOptions) -> PhysicalAddress {
        self.push(Event::InitMemory);
        self.mem_end
    }

    fn frame_allocator(&mut self) -> &mut FakeFrames {
        &mut self.frames
    }

    #[cfg(feature = "filesys")]
    fn filesys_done(&mut self) {
        self.push(Event::FilesysDone);
    }

    fn print_stats(&mut self, source: StatsSource) {
        self.push(Event::Stats(source));
    }

    fn exit_initial_thread(&mut self) -> ! {
        self.push(Event::ExitThread);
        panic::panic_any(Stop::ExitThread)
    }
}

/// Events of a boot that gets as far as the action list.
pub fn bring_up(seed: u32, root: PhysicalPage) -> Vec<Event> {
    let mut events = vec![Event::Configure {
        seed,
        first_random: Random::new(seed).next_u32(),
    }];
    events.extend(InitStage::BEFORE_PAGING.iter().copied().map(Event::Init));
    events.push(Event::InitMemory);
    events.push(Event::Init(InitStage::Heap));
    events.push(Event::Activate { root });
    events.extend(InitStage::AFTER_PAGING.iter().copied().map(Event::Init));
    events
}

/// Events of the shutdown sequencer.
pub fn shutdown_events() -> Vec<Event> {
    let mut events = Vec::new();
    #[cfg(feature = "filesys")]
    events.push(Event::FilesysDone);
    events.extend(StatsSource::ORDER.iter().copied().map(Event::Stats));
    events.push(Event::PowerOff);
    events
}

thread_local! {
    static LOGGED: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Keeps log records per test thread.
struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        LOGGED.with(|lines| {
            lines
                .borrow_mut()
                .push((record.level(), record.args().to_string()));
        });
    }

    fn flush(&self) {}
}

static CAPTURE: CaptureLogger = CaptureLogger;

/// Install the capturing logger and forget what this thread logged so far.
pub fn capture_logs() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        log::set_logger(&CAPTURE).expect("no other logger");
        log::set_max_level(LevelFilter::Trace);
    });
    LOGGED.with(|lines| lines.borrow_mut().clear());
}

/// Messages this thread logged at `level`.
pub fn logged(level: Level) -> Vec<String> {
    LOGGED.with(|lines| {
        lines
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, msg)| msg.clone())
            .collect()
    })
}
