use clap::{Parser, ValueEnum};
use crossbeam_channel::{bounded, Receiver, Sender};
use cursive::CbSink;
use log::{error, info};
use std::time::{Duration, Instant};

use chip8_vm::chip::{
    chip8::cursive_display::Display, chip8::Chip8, chip8::Chip8Config, chip8::TimerMode, Chip,
    ChipWithCursiveDisplay,
};

/// Runs a CHIP-8 program in the terminal.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Path to the program image to load.
    program: String,

    /// Time to sleep after each cycle, in microseconds.
    #[arg(long, default_value_t = 1400)]
    cycle_sleep_us: u64,

    /// What drives the delay and sound timers.
    #[arg(long, value_enum, default_value_t = TimerSource::WallClock)]
    timer_mode: TimerSource,
}

#[derive(Clone, Copy, ValueEnum)]
enum TimerSource {
    /// One decrement per executed instruction.
    Cycles,
    /// 60 Hz decrements measured on the wall clock.
    WallClock,
}

impl From<TimerSource> for TimerMode {
    fn from(source: TimerSource) -> TimerMode {
        match source {
            TimerSource::Cycles => TimerMode::Cycles(1),
            TimerSource::WallClock => TimerMode::WallClock,
        }
    }
}

/// Represents an event to be processed by the event loop. It is generic
/// over the type representing the pressed key.
enum Event<T> {
    /// Occurs when the key passed in the enum value was pressed.
    Key(T),

    /// Indicates that all keys are released. Terminals do not report key
    /// releases, so one key is assigned to release all keys.
    KeyRelease,

    /// Decreases the sleep time after each cycle.
    SpeedUp,

    /// Increases the sleep time after each cycle.
    SlowDown,

    /// Shut down.
    Quit,
}

/// Represents the channels available to the event loop. It is generic
/// over the type representing the pressed keys.
#[derive(Clone)]
struct EventLoopChannels<T> {
    /// The channel to send the UI refresh messages to.
    gfx_sender: CbSink,

    /// The channel on which the Events are received.
    key_receiver: Receiver<Event<T>>,

    /// A channel to report that the thread has completed
    /// shutdown.
    shutdown_sender: Sender<()>,
}

/// The event loop. Constantly loops over (1) process event if there
/// is any. (2) Invoke cycle on the chip. (3) Feed the elapsed time to the
/// timers. (4) Update the UI. (5) Sleep for the cycle sleep time. (6) Start over.
fn event_loop(mut chip: Chip8, io_channels: EventLoopChannels<u8>, cycle_sleep_us: u64) {
    const SLEEP_STEP_US: u64 = 200;

    let mut cycle_sleep = cycle_sleep_us;
    let mut last_tick = Instant::now();
    loop {
        match io_channels.key_receiver.try_recv() {
            Ok(Event::Key(key)) => {
                chip.set_input_pin(key, true);
            }
            Ok(Event::KeyRelease) => {
                chip.reset_input_pins();
            }
            Ok(Event::Quit) => {
                break;
            }
            Ok(Event::SpeedUp) => {
                cycle_sleep = cycle_sleep.saturating_sub(SLEEP_STEP_US);
            }
            Ok(Event::SlowDown) => {
                cycle_sleep += SLEEP_STEP_US;
            }
            Err(_) => { /* do nothing */ }
        };

        if let Err(e) = chip.cycle() {
            error!("Stopping execution: {}", e);
            io_channels
                .gfx_sender
                .send(Box::new(|s: &mut cursive::Cursive| s.quit()))
                .ok();
            break;
        }

        let now = Instant::now();
        chip.advance_timers(now - last_tick);
        last_tick = now;

        chip.update_ui(&io_channels.gfx_sender);

        std::thread::sleep(Duration::from_micros(cycle_sleep));
    }

    // the receiving end is gone if the loop stopped on its own
    io_channels.shutdown_sender.send(()).ok();
}

/// Constructs the UI and spawns the event loop and the UI thread.
fn main() {
    env_logger::init();
    let args = Args::parse();

    let mut chip8 = Chip8::with_config(Chip8Config::with_timer_mode(args.timer_mode.into()));

    match chip8.load_program(&args.program) {
        Ok(size) => info!("Loaded {} ({} bytes)", args.program, size),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }

    let mut siv = cursive::default();

    let cb_sink = siv.cb_sink().clone();
    let (key_sender, key_receiver) = bounded::<Event<u8>>(10);
    let (shutdown_sender, shutdown_receiver) = bounded::<()>(1);

    let cycle_sleep_us = args.cycle_sleep_us;
    let event_loop_handle = std::thread::spawn(move || {
        event_loop(
            chip8,
            EventLoopChannels {
                gfx_sender: cb_sink,
                key_receiver,
                shutdown_sender,
            },
            cycle_sleep_us,
        );
    });

    let sender = key_sender.clone();
    siv.add_global_callback(cursive::event::Key::Esc, move |s| {
        if sender.send(Event::Quit).is_ok() {
            shutdown_receiver.recv().ok();
        }
        s.quit();
    });

    for (i, j) in &[
        ('1', 0x1),
        ('2', 0x2),
        ('3', 0x3),
        ('4', 0xC),
        ('q', 0x4),
        ('w', 0x5),
        ('e', 0x6),
        ('r', 0xD),
        ('a', 0x7),
        ('s', 0x8),
        ('d', 0x9),
        ('f', 0xE),
        ('z', 0xA),
        ('x', 0x0),
        ('c', 0xB),
        ('v', 0xF),
    ] {
        let sender = key_sender.clone();
        let key = *j as u8;
        siv.add_global_callback(*i, move |_s| {
            sender.send(Event::Key(key)).ok();
        });
    }

    let sender = key_sender.clone();
    siv.add_global_callback(' ', move |_s| {
        sender.send(Event::KeyRelease).ok();
    });

    let sender = key_sender.clone();
    siv.add_global_callback(cursive::event::Key::Up, move |_s| {
        sender.send(Event::SpeedUp).ok();
    });

    let sender = key_sender;
    siv.add_global_callback(cursive::event::Key::Down, move |_s| {
        sender.send(Event::SlowDown).ok();
    });

    siv.add_layer(Display::default());

    siv.run();

    if event_loop_handle.join().is_err() {
        error!("Event loop panicked");
    }
}
