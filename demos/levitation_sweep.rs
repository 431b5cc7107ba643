use meissner::prelude::*;
use meissner::snapshot;

/// Readings the sweep steps through, with the time spent at each
const SWEEP: [(&str, f64); 7] = [
    ("25", 400.0),
    ("-87.5", 700.0),
    ("-150.2", 700.0),
    ("-185", 700.0),
    ("-200", 1500.0),
    ("-120", 700.0),
    ("-199", 1500.0),
];

fn main() -> Result<()> {
    env_logger::init();

    let tween_library = std::env::args().all(|arg| arg != "--manual");
    let stage = Stage::new(StageConfig::default().tween_library(tween_library));
    log::info!("Sweeping with the {} backend", stage.backend_name());

    for (reading, hold_ms) in SWEEP {
        stage.input(reading)?;
        stage.advance(hold_ms);

        if let Some(state) = stage.simulation() {
            log::info!(
                "{:>7.1} °C  {:<17} offset {:>6.1}  shadow {:.1}x{:.1} @ {:.2}",
                state.temperature,
                state.checkpoint().title,
                state.vertical_offset,
                state.shadow.rx,
                state.shadow.ry,
                state.shadow.opacity
            );
        }
    }

    let path = std::env::temp_dir().join("meissner-levitation.png");
    snapshot::save_png(&stage.scene(), &path)?;
    println!("Snapshot written to {}", path.display());
    Ok(())
}
