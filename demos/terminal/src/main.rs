use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;
use std::time::Duration;

use typewrite::prelude::*;
use typewrite_platform::{Headless, HeadlessOptions};

const LINES: [&str; 3] = [
    "Hello, terminal.",
    "Graphemes stay whole: e\u{301}, 👩‍👩‍👧.",
    "Typed, rewound, and looped.",
];

fn render(text: &str) {
    // Clear the line, then redraw; the sink only sees changed text.
    print!("\r\x1b[2K{text}");
    if let Err(e) = std::io::stdout().flush() {
        log::debug!("stdout flush failed: {e}");
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    log::info!("Starting terminal demo");

    let options = match std::env::args().nth(1) {
        Some(json) => OptionsPatch::from_json(&json)?,
        None => OptionsPatch::new()
            .typing_delay(ms(60))
            .delay_after_typing(ms(1200))
            .looping(false),
    };

    let headless = Headless::new();
    let tw = headless
        .typewriter()
        .strings(LINES)
        .options(options)
        .callback(render)
        .build();

    let finished = Rc::new(Cell::new(false));
    let f = finished.clone();
    tw.on_array_finished(move || f.set(true), true)?;
    tw.on_after_untyping(|i| log::debug!("rewound line {i}"), false)?;
    tw.start()?;

    let summary = headless.run(
        HeadlessOptions {
            frame_interval: Duration::from_millis(16),
            max_duration: Some(Duration::from_secs(120)),
        },
        move || !finished.get(),
    )?;
    println!();
    log::info!("done: {summary:?}");

    tw.dispose()?;
    Ok(())
}
