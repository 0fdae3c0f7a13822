use handheld_input::{
    raw_event_from_sdl, ChordOptions, ControllerHub, DirectionalRepeat, EngineConfig,
    InputEngine, SequenceOptions, VirtualButton,
};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const FRAME: Duration = Duration::from_millis(16);

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run() {
        error!("input monitor error: {}", e);
        std::process::exit(1);
    }
}

fn export_path() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--export-mapping" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

fn run() -> Result<(), String> {
    let resolved = EngineConfig::from_env().resolve_mapping();
    info!(origin = ?resolved.origin, "input mapping resolved");

    if let Some(path) = export_path() {
        resolved.mapping.save_to_file(&path).map_err(|e| e.to_string())?;
        info!(path = %path.display(), "mapping exported");
        return Ok(());
    }

    // Required for certain controllers to work on Windows
    sdl2::hint::set("SDL_JOYSTICK_THREAD", "1");

    let sdl_context = sdl2::init()?;
    let _video = sdl_context.video()?;
    let controller_subsystem = sdl_context.game_controller()?;
    let joystick_subsystem = sdl_context.joystick()?;
    let hub = ControllerHub::open(&controller_subsystem, &joystick_subsystem)?;
    if hub.controller_count() + hub.joystick_count() == 0 {
        info!("No controller found, keyboard input only");
    }

    let mut engine = InputEngine::new(resolved.mapping);
    engine
        .register_chord(
            "quick_menu",
            &[VirtualButton::L1, VirtualButton::R1],
            ChordOptions::new().window(Duration::from_millis(150)),
        )
        .map_err(|e| e.to_string())?;
    engine
        .register_sequence(
            "up_up_down_down",
            &[
                VirtualButton::Up,
                VirtualButton::Up,
                VirtualButton::Down,
                VirtualButton::Down,
            ],
            SequenceOptions::new().on_trigger(|combo| info!(combo = %combo.combo_id, "sequence entered")),
        )
        .map_err(|e| e.to_string())?;

    let mut repeat = DirectionalRepeat::default();
    let mut event_pump = sdl_context.event_pump()?;

    'frame: loop {
        for sdl_event in event_pump.poll_iter() {
            if let sdl2::event::Event::Quit { .. } = sdl_event {
                break 'frame;
            }

            let raw = raw_event_from_sdl(&sdl_event);
            let mut delivered = engine.process_event(&raw).into_iter().collect::<Vec<_>>();
            delivered.extend(engine.take_pending());

            for event in delivered {
                info!(
                    button = %event.button,
                    pressed = event.pressed,
                    source = %event.source,
                    raw_code = event.raw_code,
                    "input"
                );
                repeat.on_event(&event, Instant::now());
            }
        }

        while let Some(combo) = engine.next_combo_event() {
            info!(
                combo = %combo.combo_id,
                kind = ?combo.kind,
                triggered = combo.triggered,
                "combo"
            );
        }

        for button in repeat.poll(Instant::now()) {
            info!(button = %button, "repeat");
        }

        thread::sleep(FRAME);
    }

    Ok(())
}
