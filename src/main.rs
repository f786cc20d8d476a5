use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};

use morsepad::config::Config;
use morsepad::engine::{contact, Contact, EngineEvent, MorseEngine, SEQUENCE_TIMEOUT};
use morsepad::inject::Injector;
use morsepad::suppress::GestureSuppressor;
use morsepad::symbols::SymbolTable;

#[cfg(not(windows))]
use morsepad::platform::sim::{SimBackend, SimHook};
#[cfg(windows)]
use morsepad::platform::windows::{WindowsBackend, WindowsPointerHook};

#[derive(Parser)]
#[command(name = "morsepad")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Synthesize the contact stream that would type TEXT
    Simulate { text: String },
}

enum ShellKey {
    Toggle,
    Quit,
}

// Tap timings used by the simulated contact script.
const SIM_DOT_HOLD: Duration = Duration::from_millis(100);
const SIM_DASH_HOLD: Duration = Duration::from_millis(300);
const SIM_SYMBOL_GAP: Duration = Duration::from_millis(250);

fn main() -> Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

async fn async_main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load();

    let (contact_tx, contact_rx) = flume::unbounded::<Vec<Contact>>();
    let (event_tx, event_rx) = flume::unbounded::<EngineEvent>();
    let (shutdown_tx, shutdown_rx) = flume::unbounded::<()>();

    let mut engine = MorseEngine::new(event_tx).with_verbose(config.verbose);

    #[cfg(windows)]
    let mut injector = Injector::new(WindowsBackend::new()).with_verbose(config.verbose);
    #[cfg(windows)]
    let mut suppressor = GestureSuppressor::new(WindowsPointerHook::new());

    #[cfg(not(windows))]
    let mut injector = Injector::new(SimBackend::new()).with_verbose(config.verbose);
    #[cfg(not(windows))]
    let mut suppressor = GestureSuppressor::new(SimHook::new());

    let simulating = match &cli.command {
        Some(Command::Simulate { text }) => {
            spawn_contact_script(text.clone(), contact_tx.clone(), shutdown_tx.clone());
            true
        }
        None => {
            // Raw-input registration belongs to the embedding shell; with
            // no device feed attached the decoder simply stays idle.
            println!("No raw-input source attached.");
            println!("Feed contacts through the library, or run `morsepad simulate <TEXT>`.");
            false
        }
    };

    engine.set_enabled(simulating || config.start_enabled);
    if engine.is_enabled() && config.suppress_gestures {
        suppressor.set_enabled(true);
    }
    print_status(engine.is_enabled(), suppressor.is_enabled());

    {
        let shutdown_tx = shutdown_tx.clone();
        ctrlc::set_handler(move || {
            let _ = shutdown_tx.send(());
        })?;
    }

    let keys_rx = spawn_key_listener();
    println!("space = toggle decoding, q = quit\n");

    loop {
        let sequence_sleep = sleep_until_opt(engine.sequence_deadline());
        let feedback_sleep = sleep_until_opt(engine.feedback_deadline());

        tokio::select! {
            biased;

            Ok(()) = shutdown_rx.recv_async() => break,

            Ok(key) = keys_rx.recv_async() => match key {
                ShellKey::Quit => break,
                ShellKey::Toggle => {
                    let enable = !engine.is_enabled();
                    engine.set_enabled(enable);
                    suppressor.set_enabled(enable && config.suppress_gestures);
                    print_status(engine.is_enabled(), suppressor.is_enabled());
                }
            },

            Ok(snapshot) = contact_rx.recv_async() => {
                engine.observe(&snapshot);
            }

            _ = sequence_sleep, if engine.sequence_deadline().is_some() => {
                if let Some(ch) = engine.on_sequence_timeout() {
                    // Keep the hook from eating the injected event.
                    let _pause = suppressor.pause();
                    injector.inject(ch);
                }
            }

            _ = feedback_sleep, if engine.feedback_deadline().is_some() => {
                engine.on_tap_feedback(Instant::now());
            }

            Ok(engine_event) = event_rx.recv_async() => render_event(&engine_event),
        }
    }

    suppressor.set_enabled(false);
    Ok(())
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await
        }
        None => std::future::pending::<()>().await,
    }
}

/// Keyboard thread feeding shell commands into the dispatch loop.
fn spawn_key_listener() -> flume::Receiver<ShellKey> {
    let (tx, rx) = flume::unbounded();
    thread::spawn(move || loop {
        if event::poll(Duration::from_millis(200)).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let message = match key.code {
                    KeyCode::Char(' ') => Some(ShellKey::Toggle),
                    KeyCode::Char('q') | KeyCode::Esc => Some(ShellKey::Quit),
                    _ => None,
                };
                if let Some(message) = message {
                    if tx.send(message).is_err() {
                        break;
                    }
                }
            }
        }
    });
    rx
}

/// Replay TEXT as a contact stream: two resting fingers, third-finger taps
/// timed per symbol, and inactivity gaps long enough for each character to
/// resolve.
fn spawn_contact_script(
    text: String,
    contacts: flume::Sender<Vec<Contact>>,
    done: flume::Sender<()>,
) {
    thread::spawn(move || {
        let table = SymbolTable::new();
        let resting = contact::snapshot(&[1, 2]);
        let tapping = contact::snapshot(&[1, 2, 3]);

        let _ = contacts.send(resting.clone());
        for ch in text.chars() {
            let Some(sequence) = table.sequence_for(ch) else {
                eprintln!("[SIM] no sequence for '{}', skipped", ch);
                continue;
            };
            for symbol in sequence.chars() {
                let hold = match symbol {
                    '.' => SIM_DOT_HOLD,
                    '-' => SIM_DASH_HOLD,
                    // The space mapping has no tappable symbols.
                    _ => continue,
                };
                if contacts.send(tapping.clone()).is_err() {
                    return;
                }
                thread::sleep(hold);
                if contacts.send(resting.clone()).is_err() {
                    return;
                }
                thread::sleep(SIM_SYMBOL_GAP);
            }
            // Let the inactivity timeout resolve the character.
            thread::sleep(SEQUENCE_TIMEOUT + Duration::from_millis(200));
        }
        let _ = contacts.send(Vec::new());
        thread::sleep(Duration::from_millis(200));
        let _ = done.send(());
    });
}

fn print_status(enabled: bool, suppressing: bool) {
    if enabled {
        let suffix = if suppressing {
            " - gesture suppression active"
        } else {
            ""
        };
        println!("Morse decoding enabled{}", suffix);
    } else {
        println!("Morse decoding disabled");
    }
}

fn render_event(engine_event: &EngineEvent) {
    match engine_event {
        EngineEvent::SequenceChanged(sequence) if sequence.is_empty() => {
            print!("\r\x1b[K");
        }
        EngineEvent::SequenceChanged(sequence) => {
            print!("\r\x1b[K\x1b[90mCurrent: {}\x1b[0m", sequence);
        }
        EngineEvent::CharacterTyped(ch) => {
            print!("\r\x1b[KTyped: '{}'\n", ch);
        }
    }
    io::stdout().flush().ok();
}
